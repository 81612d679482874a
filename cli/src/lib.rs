//! Terminal host for `todo-core`.
//!
//! Executes the core's requests with ureq, reads commands from stdin and
//! prints the list after every event.

pub mod app;
pub mod command;
pub mod config;
pub mod transport;
pub mod view;

pub use app::{App, Event, Job, Mutation};
pub use config::Config;
pub use transport::UreqTransport;
