//! Blocking gateway that pairs `TodoClient` with a host-supplied transport.
//!
//! The gateway is a pure request/response wrapper: one HTTP call per
//! operation, no retry, no timeout, no caching.

use crate::client::TodoClient;
use crate::error::{ApiError, Operation, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Page, Todo};

/// Executes a single HTTP round-trip.
///
/// Implementations must return non-2xx responses as `Ok`; status
/// interpretation belongs to `TodoClient`.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// The four logical todo operations over a `Transport`.
#[derive(Debug, Clone)]
pub struct Gateway<T> {
    client: TodoClient,
    transport: T,
}

impl<T: Transport> Gateway<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    pub fn list_page(&self, page_param: u32) -> Result<Page, ApiError> {
        let request = self.client.build_list_page(page_param);
        let response = self.round_trip(request, Operation::ListTodos)?;
        self.client.parse_list_page(page_param, response)
    }

    pub fn create(&self, title: &str, user_id: u64) -> Result<Todo, ApiError> {
        let input = CreateTodo {
            title: title.to_string(),
            user_id,
        };
        let request = self.client.build_create_todo(&input)?;
        let response = self.round_trip(request, Operation::CreateTodo)?;
        self.client.parse_create_todo(response)
    }

    pub fn toggle(&self, todo: &Todo) -> Result<Todo, ApiError> {
        let request = self.client.build_toggle_todo(todo)?;
        let response = self.round_trip(request, Operation::UpdateTodo)?;
        self.client.parse_toggle_todo(response)
    }

    pub fn remove(&self, id: u64) -> Result<(), ApiError> {
        let request = self.client.build_delete_todo(id);
        let response = self.round_trip(request, Operation::DeleteTodo)?;
        self.client.parse_delete_todo(response)
    }

    fn round_trip(&self, request: HttpRequest, operation: Operation) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = %request.method, path = %request.path, "sending request");
        let response = self
            .transport
            .execute(request)
            .map_err(|e| {
                tracing::warn!(error = %e, ?operation, "transport failure");
                e.into_api_error(operation)
            })?;
        tracing::debug!(status = response.status, ?operation, "received response");
        Ok(response)
    }
}
