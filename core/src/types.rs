//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! The remote service speaks camelCase (`userId`); serde renames keep the Rust
//! side snake_case. Integration tests catch any schema drift between the two
//! crates.

use serde::{Deserialize, Serialize};

/// Number of todos requested per page.
pub const PAGE_SIZE: u32 = 10;

/// Page parameter of the first page. Pages are 1-based.
pub const FIRST_PAGE: u32 = 1;

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub completed: bool,
    pub user_id: u64,
}

/// Request payload for creating a new todo. `completed` is left to the
/// server default (false).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub title: String,
    pub user_id: u64,
}

/// Request payload for flipping a todo's completion flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ToggleTodo {
    pub completed: bool,
}

impl ToggleTodo {
    /// Payload that negates `todo.completed`.
    pub fn for_todo(todo: &Todo) -> Self {
        Self {
            completed: !todo.completed,
        }
    }
}

/// One fetched page of todos.
///
/// `next_cursor` is the page parameter to request next, or `None` on the
/// last page. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<Todo>,
    pub next_cursor: Option<u32>,
}

impl Page {
    /// Build a page from the items of `page_param` and the server-reported
    /// total count. A missing total means there is nothing after this page.
    pub fn from_total(items: Vec<Todo>, page_param: u32, total_count: Option<u64>) -> Self {
        let has_next = total_count
            .is_some_and(|total| u64::from(page_param) * u64::from(PAGE_SIZE) < total);
        Self {
            items,
            next_cursor: has_next.then_some(page_param + 1),
        }
    }

    pub fn has_next(&self) -> bool {
        self.next_cursor.is_some()
    }
}
