//! Text rendering of the todo list and the scroll window over it.

use std::ops::Range;

use todo_core::{FetchStatus, PaginatedCache, Todo};

pub const LOADING: &str = "Loading...";

/// What the row after the last todo shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelState {
    LoadingMore,
    MoreAvailable,
    NothingMore,
}

impl SentinelState {
    pub fn of(cache: &PaginatedCache) -> Self {
        if cache.is_fetching_next_page() {
            SentinelState::LoadingMore
        } else if cache.has_next_page() {
            SentinelState::MoreAvailable
        } else {
            SentinelState::NothingMore
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SentinelState::LoadingMore => "Loading more...",
            SentinelState::MoreAvailable => "Load more",
            SentinelState::NothingMore => "Nothing more to load",
        }
    }
}

/// A window of `rows` lines over the scrollable list.
#[derive(Debug, Clone)]
pub struct Viewport {
    rows: usize,
    offset: usize,
}

impl Viewport {
    pub fn new(rows: usize) -> Self {
        Self {
            rows: rows.max(1),
            offset: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn scroll_down(&mut self, by: usize, content_len: usize) {
        self.offset = self.offset.saturating_add(by);
        self.clamp(content_len);
    }

    pub fn scroll_up(&mut self, by: usize) {
        self.offset = self.offset.saturating_sub(by);
    }

    /// Keep the window inside the content after it shrank.
    pub fn clamp(&mut self, content_len: usize) {
        self.offset = self.offset.min(content_len.saturating_sub(self.rows));
    }

    pub fn window(&self, content_len: usize) -> Range<usize> {
        let start = self.offset.min(content_len);
        start..(start + self.rows).min(content_len)
    }

    /// Rows are atomic: a row is either fully inside the window or not at all.
    pub fn visible_fraction(&self, row: usize) -> f32 {
        if (self.offset..self.offset + self.rows).contains(&row) {
            1.0
        } else {
            0.0
        }
    }
}

/// Scrollable rows: one per todo plus the sentinel. `None` while the list
/// area shows a loading or error placeholder instead.
pub fn content_len(cache: &PaginatedCache) -> Option<usize> {
    let count = cache.item_count();
    if count == 0 && matches!(cache.status(), FetchStatus::LoadingFirstPage | FetchStatus::Error) {
        return None;
    }
    Some(count + 1)
}

/// Visible fraction of the sentinel row, 0 when it is not rendered.
pub fn sentinel_fraction(cache: &PaginatedCache, viewport: &Viewport) -> f32 {
    content_len(cache).map_or(0.0, |len| viewport.visible_fraction(len - 1))
}

pub fn todo_row(todo: &Todo) -> String {
    let mark = if todo.completed { 'x' } else { ' ' };
    format!("[{mark}] #{:<4} {}", todo.id, todo.title)
}

pub fn render(cache: &PaginatedCache, viewport: &Viewport, user_id: u64, notice: Option<&str>) -> String {
    let mut lines = vec![format!(
        "Todos for user {user_id}: {} loaded in {} page(s)",
        cache.item_count(),
        cache.page_count()
    )];
    lines.extend(notice.map(|notice| format!("! {notice}")));

    match content_len(cache) {
        None => lines.push(match cache.error() {
            Some(err) => format!("Error: {err}"),
            None => LOADING.to_string(),
        }),
        Some(len) => {
            let items: Vec<&Todo> = cache.items().collect();
            for row in viewport.window(len) {
                match items.get(row) {
                    Some(todo) => lines.push(todo_row(todo)),
                    None => {
                        lines.extend(cache.error().map(|err| format!("Error: {err}")));
                        lines.push(format!("-- {}", SentinelState::of(cache).label()));
                    }
                }
            }
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
