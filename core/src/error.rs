//! Error types for the todo API client.
//!
//! # Design
//! Every failed round-trip, whatever the status code or transport failure,
//! is a single `Fetch` kind tagged with the operation that produced it. The
//! operation decides the user-facing message. Payload encoding problems keep
//! their own variants because they indicate a client/server schema mismatch
//! rather than a failed request.

use thiserror::Error;

/// The logical operation a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListTodos,
    CreateTodo,
    UpdateTodo,
    DeleteTodo,
}

impl Operation {
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::ListTodos => "Failed to fetch todos",
            Operation::CreateTodo => "Failed to create todo",
            Operation::UpdateTodo => "Failed to update todo",
            Operation::DeleteTodo => "Failed to delete todo",
        }
    }
}

/// Errors returned by `TodoClient` parse methods and the `Gateway`.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request did not succeed: non-2xx status, or no response at all
    /// (`status` is `None`).
    #[error("{}", .operation.failure_message())]
    Fetch {
        operation: Operation,
        status: Option<u16>,
        body: String,
    },

    /// A 2xx response whose body is not the expected shape. Reported with
    /// the operation's failure message; `detail` carries the serde error.
    #[error("{}", .operation.failure_message())]
    DeserializationError { operation: Operation, detail: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    pub fn operation(&self) -> Option<Operation> {
        match self {
            ApiError::Fetch { operation, .. } | ApiError::DeserializationError { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

/// A transport could not complete the round-trip (connection refused, DNS,
/// broken body stream, ...).
#[derive(Debug, Clone, Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn into_api_error(self, operation: Operation) -> ApiError {
        ApiError::Fetch {
            operation,
            status: None,
            body: self.0,
        }
    }
}
