//! Viewport trigger for infinite scrolling.
//!
//! The host measures how much of the sentinel (the row after the last todo)
//! is visible and reports it through `observe`. The trigger turns those
//! samples into at most one "fetch the next page" signal per transition into
//! view. Deduplication of concurrent fetches is left to
//! `PaginatedCache::fetch_next_page`.

/// Fraction of the sentinel that must be visible to count as in view.
pub const DEFAULT_THRESHOLD: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    OutOfView,
    InView,
}

#[derive(Debug, Clone)]
pub struct ViewportTrigger {
    threshold: f32,
    state: Visibility,
    armed: bool,
    connected: bool,
}

impl Default for ViewportTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl ViewportTrigger {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            state: Visibility::OutOfView,
            armed: false,
            connected: true,
        }
    }

    pub fn state(&self) -> Visibility {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Record a visibility sample. Returns `true` when the caller should
    /// request the next page.
    pub fn observe(&mut self, visible_fraction: f32, has_next_page: bool) -> bool {
        if !self.connected {
            return false;
        }
        let next = if visible_fraction >= self.threshold && visible_fraction > 0.0 {
            Visibility::InView
        } else {
            Visibility::OutOfView
        };
        if next == Visibility::InView && self.state == Visibility::OutOfView {
            self.armed = true;
        }
        self.state = next;

        if self.state == Visibility::InView && self.armed && has_next_page {
            self.armed = false;
            return true;
        }
        false
    }

    /// A page arrived. If the sentinel is still in view on the next sample
    /// the trigger fires again, so short pages keep loading.
    pub fn page_loaded(&mut self) {
        if self.connected && self.state == Visibility::InView {
            self.armed = true;
        }
    }

    /// Stop observing. Later samples never signal.
    pub fn disconnect(&mut self) {
        self.connected = false;
        self.armed = false;
        self.state = Visibility::OutOfView;
    }
}
