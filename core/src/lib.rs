//! Client core for a paginated todo service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and keeps the incrementally
//! loaded todo list in a `PaginatedCache` driven by a `ViewportTrigger`.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//!   `Gateway` composes the two around a host `Transport`.
//! - `PaginatedCache` hands out `PageFetch` tickets instead of awaiting
//!   futures; the host resolves them when the response arrives.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod cache;
pub mod client;
pub mod error;
pub mod gateway;
pub mod http;
pub mod trigger;
pub mod types;

pub use cache::{FetchStatus, PageFetch, PaginatedCache, QueryKey, Resolution, TODOS_QUERY};
pub use client::TodoClient;
pub use error::{ApiError, Operation, TransportError};
pub use gateway::{Gateway, Transport};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use trigger::{ViewportTrigger, Visibility};
pub use types::{CreateTodo, Page, Todo, ToggleTodo, FIRST_PAGE, PAGE_SIZE};
