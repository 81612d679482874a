//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the core
//! deterministic and free of I/O dependencies.

use serde::de::DeserializeOwned;

use crate::error::{ApiError, Operation};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Page, Todo, ToggleTodo, PAGE_SIZE};

/// Response header carrying the total number of todos across all pages.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Synchronous, stateless client for the todo API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_page(&self, page_param: u32) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/todos?_page={page_param}&_limit={PAGE_SIZE}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/todos", self.base_url),
            headers: json_headers(),
            body: Some(body),
        })
    }

    /// Build a PATCH that flips `todo.completed`. `todo` itself is untouched.
    pub fn build_toggle_todo(&self, todo: &Todo) -> Result<HttpRequest, ApiError> {
        let input = ToggleTodo::for_todo(todo);
        let body = serde_json::to_string(&input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Patch,
            path: format!("{}/todos/{}", self.base_url, todo.id),
            headers: json_headers(),
            body: Some(body),
        })
    }

    pub fn build_delete_todo(&self, id: u64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/todos/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Parse one page of todos. `page_param` must be the value the request
    /// was built with; it determines the next cursor together with the
    /// `x-total-count` header.
    pub fn parse_list_page(&self, page_param: u32, response: HttpResponse) -> Result<Page, ApiError> {
        check_status(&response, Operation::ListTodos)?;
        let items: Vec<Todo> = parse_body(&response, Operation::ListTodos)?;
        let total_count = match response.header(TOTAL_COUNT_HEADER) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(total) => Some(total),
                Err(_) => {
                    tracing::warn!(value = raw, "unparseable {TOTAL_COUNT_HEADER} header, treating page {page_param} as last");
                    None
                }
            },
            None => {
                tracing::warn!("missing {TOTAL_COUNT_HEADER} header, treating page {page_param} as last");
                None
            }
        };
        Ok(Page::from_total(items, page_param, total_count))
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, Operation::CreateTodo)?;
        parse_body(&response, Operation::CreateTodo)
    }

    pub fn parse_toggle_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, Operation::UpdateTodo)?;
        parse_body(&response, Operation::UpdateTodo)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, Operation::DeleteTodo)
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn parse_body<T: DeserializeOwned>(response: &HttpResponse, operation: Operation) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError {
        operation,
        detail: e.to_string(),
    })
}

/// Any non-2xx status is a failure of `operation`; 4xx and 5xx are not
/// distinguished.
fn check_status(response: &HttpResponse, operation: Operation) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Fetch {
        operation,
        status: Some(response.status),
        body: response.body.clone(),
    })
}
