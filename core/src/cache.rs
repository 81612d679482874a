//! Paginated cache for the todo list query.
//!
//! # Design
//! The cache never performs I/O. Every operation that needs the network
//! returns a `PageFetch` ticket; the host executes the request for
//! `ticket.page_param()` and hands the outcome back through `resolve`. The
//! span between the two calls is the suspension point, and the cache
//! refuses to issue a second page ticket while one is outstanding.
//!
//! Tickets carry the generation they were issued in. `invalidate` starts a
//! new generation, so a result that arrives for a superseded ticket is
//! dropped instead of being appended to the fresh page sequence.

use crate::error::ApiError;
use crate::types::{Page, Todo, FIRST_PAGE};

/// Identity of a cached query. There is a single todo list, so the key is
/// a constant in practice, but it is kept explicit for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryKey(pub &'static str);

pub const TODOS_QUERY: QueryKey = QueryKey("todos");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    LoadingFirstPage,
    LoadingNextPage,
    Error,
}

/// An outstanding page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageFetch {
    generation: u64,
    page_param: u32,
}

impl PageFetch {
    pub fn page_param(&self) -> u32 {
        self.page_param
    }

    pub fn is_first_page(&self) -> bool {
        self.page_param == FIRST_PAGE
    }
}

/// What `resolve` did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The page was appended.
    Applied,
    /// The fetch failed; previously loaded pages are kept.
    Failed,
    /// The ticket was superseded by an invalidation and the result was dropped.
    Discarded,
}

#[derive(Debug)]
pub struct PaginatedCache {
    key: QueryKey,
    pages: Vec<Page>,
    status: FetchStatus,
    error: Option<ApiError>,
    in_flight: Option<PageFetch>,
    generation: u64,
}

impl Default for PaginatedCache {
    fn default() -> Self {
        Self::new(TODOS_QUERY)
    }
}

impl PaginatedCache {
    pub fn new(key: QueryKey) -> Self {
        Self {
            key,
            pages: Vec::new(),
            status: FetchStatus::Idle,
            error: None,
            in_flight: None,
            generation: 0,
        }
    }

    /// Request the first page. No-op when pages are already loaded or a
    /// fetch is pending; after a failed first page this is the retry.
    pub fn initial_load(&mut self) -> Option<PageFetch> {
        if self.in_flight.is_some() || !self.pages.is_empty() {
            return None;
        }
        Some(self.issue(FIRST_PAGE, FetchStatus::LoadingFirstPage))
    }

    /// Request the page named by the last page's cursor. Returns `None`
    /// without side effects when nothing is loaded yet, when the last page
    /// has no cursor, or when any fetch is pending.
    pub fn fetch_next_page(&mut self) -> Option<PageFetch> {
        if self.in_flight.is_some() {
            tracing::trace!(key = self.key.0, "next page requested while a fetch is pending");
            return None;
        }
        let cursor = self.pages.last()?.next_cursor?;
        Some(self.issue(cursor, FetchStatus::LoadingNextPage))
    }

    /// Drop every page and start over from the first page. Any pending
    /// ticket becomes stale.
    pub fn invalidate(&mut self) -> PageFetch {
        tracing::debug!(key = self.key.0, pages = self.pages.len(), "invalidating");
        self.generation += 1;
        self.pages.clear();
        self.error = None;
        self.in_flight = None;
        self.issue(FIRST_PAGE, FetchStatus::LoadingFirstPage)
    }

    /// Feed back the outcome of a ticket previously handed out.
    pub fn resolve(&mut self, fetch: PageFetch, result: Result<Page, ApiError>) -> Resolution {
        if self.in_flight != Some(fetch) {
            tracing::debug!(
                key = self.key.0,
                page = fetch.page_param,
                generation = fetch.generation,
                current = self.generation,
                "discarding stale page result"
            );
            return Resolution::Discarded;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                tracing::debug!(
                    key = self.key.0,
                    page = fetch.page_param,
                    items = page.items.len(),
                    next = ?page.next_cursor,
                    "page loaded"
                );
                self.pages.push(page);
                self.status = FetchStatus::Idle;
                self.error = None;
                Resolution::Applied
            }
            Err(err) => {
                tracing::warn!(key = self.key.0, page = fetch.page_param, error = %err, "page fetch failed");
                self.status = FetchStatus::Error;
                self.error = Some(err);
                Resolution::Failed
            }
        }
    }

    fn issue(&mut self, page_param: u32, status: FetchStatus) -> PageFetch {
        let fetch = PageFetch {
            generation: self.generation,
            page_param,
        };
        tracing::debug!(key = self.key.0, page = page_param, "fetching page");
        self.in_flight = Some(fetch);
        self.status = status;
        fetch
    }

    pub fn key(&self) -> QueryKey {
        self.key
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    /// Error from the most recent failed fetch, cleared by the next success
    /// or by `invalidate`.
    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn has_next_page(&self) -> bool {
        self.pages.last().is_some_and(Page::has_next)
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_fetching_next_page(&self) -> bool {
        self.status == FetchStatus::LoadingNextPage
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All loaded todos, page by page, in server order.
    pub fn items(&self) -> impl Iterator<Item = &Todo> + '_ {
        self.pages.iter().flat_map(|page| page.items.iter())
    }

    pub fn item_count(&self) -> usize {
        self.pages.iter().map(|page| page.items.len()).sum()
    }

    pub fn find(&self, id: u64) -> Option<&Todo> {
        self.items().find(|todo| todo.id == id)
    }
}
