//! Intersection-driven incremental loading for grid results.
//!
//! The rendered grid ends with a sentinel element identified by a
//! [`SentinelId`]. The integration layer reports intersections of that
//! element; the coordinator answers with at most one [`PageRequest`] at a
//! time. Every reset issues a new sentinel so completions and intersections
//! belonging to a previous query are recognised and ignored.

use std::fmt;

/// Identity of the sentinel element after the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SentinelId(u64);

impl fmt::Display for SentinelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sentinel-{}", self.0)
    }
}

/// Next page to fetch, tagged with the sentinel that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Sentinel current when the request was issued.
    pub sentinel: SentinelId,
    /// One-based page number.
    pub page: u32,
}

/// Result of appending a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appended {
    /// Index of the first new item (the length before appending).
    pub offset: usize,
    /// Number of items appended.
    pub count: usize,
}

/// Accumulated items and the loading guard.
#[derive(Debug, Clone)]
pub struct InfiniteScroll<T> {
    items: Vec<T>,
    page: u32,
    has_more: bool,
    loading: bool,
    error: Option<String>,
    sentinel: SentinelId,
    max_pages: u32,
}

impl<T> InfiniteScroll<T> {
    /// Creates an empty coordinator that will never load past `max_pages`.
    #[must_use]
    pub const fn new(max_pages: u32) -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            has_more: true,
            loading: false,
            error: None,
            sentinel: SentinelId(0),
            max_pages,
        }
    }

    /// Creates an empty coordinator whose next [`reset`](Self::reset) issues
    /// the sentinel after `last`. Keeps ids unique across coordinators that
    /// replace one another.
    #[must_use]
    pub const fn after(last: SentinelId, max_pages: u32) -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            has_more: true,
            loading: false,
            error: None,
            sentinel: last,
            max_pages,
        }
    }

    /// Drops everything accumulated for the previous query and returns the
    /// fresh sentinel. The next load fetches page 1.
    pub fn reset(&mut self) -> SentinelId {
        self.items.clear();
        self.page = 0;
        self.has_more = true;
        self.loading = false;
        self.error = None;
        self.sentinel = SentinelId(self.sentinel.0 + 1);
        tracing::debug!(sentinel = %self.sentinel, "infinite scroll reset");
        self.sentinel
    }

    /// Handles the sentinel entering the viewport (including its lookahead
    /// margin). Returns the page to fetch, or `None` when a load is already
    /// running, no more pages remain, or `sentinel` is outdated.
    pub fn on_intersect(&mut self, sentinel: SentinelId) -> Option<PageRequest> {
        if sentinel != self.sentinel {
            tracing::debug!(%sentinel, current = %self.sentinel, "intersection from old sentinel");
            return None;
        }
        if self.loading || !self.has_more || self.page >= self.max_pages {
            tracing::trace!(loading = self.loading, has_more = self.has_more, "intersection ignored");
            return None;
        }

        self.loading = true;
        self.page += 1;
        tracing::debug!(page = self.page, "loading next page");
        Some(PageRequest {
            sentinel,
            page: self.page,
        })
    }

    /// Applies a page completion.
    ///
    /// On success the items are appended and `has_more` updated. On failure
    /// the page counter is rolled back so the same page is retried by the next
    /// intersection, and the error is kept for inline display. The loading
    /// guard is cleared on both paths. Completions for an old sentinel are
    /// ignored.
    pub fn on_page_loaded(
        &mut self,
        sentinel: SentinelId,
        result: Result<(Vec<T>, bool), String>,
    ) -> Option<Appended> {
        if sentinel != self.sentinel {
            tracing::debug!(%sentinel, current = %self.sentinel, "discarding page for old sentinel");
            return None;
        }
        self.loading = false;

        match result {
            Ok((items, has_more)) => {
                let offset = self.items.len();
                let count = items.len();
                self.items.extend(items);
                self.has_more = has_more && count > 0;
                self.error = None;
                tracing::debug!(offset, count, has_more = self.has_more, "page appended");
                Some(Appended { offset, count })
            }
            Err(e) => {
                tracing::warn!(page = self.page, error = %e, "page load failed");
                self.page = self.page.saturating_sub(1);
                self.error = Some(e);
                None
            }
        }
    }

    /// Accumulated items.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Last page requested.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Whether more pages may be loaded.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// Whether a page load is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Error of the last failed load.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current sentinel.
    #[must_use]
    pub const fn sentinel(&self) -> SentinelId {
        self.sentinel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_intersection_while_loading_is_ignored() {
        let mut scroll: InfiniteScroll<u32> = InfiniteScroll::new(100);
        let sentinel = scroll.reset();
        let first = scroll.on_intersect(sentinel);
        assert_eq!(first, Some(PageRequest { sentinel, page: 1 }));
        assert_eq!(scroll.on_intersect(sentinel), None);
        assert!(scroll.is_loading());
    }

    #[test]
    fn replacement_coordinator_continues_sentinel_sequence() {
        let mut first: InfiniteScroll<u32> = InfiniteScroll::new(100);
        let old = first.reset();

        let mut second: InfiniteScroll<u32> = InfiniteScroll::after(old, 100);
        let fresh = second.reset();
        assert!(fresh > old);
        second.on_intersect(fresh);
        assert_eq!(second.on_page_loaded(old, Ok((vec![9], true))), None);
        assert!(second.is_loading());
    }

    #[test]
    fn appends_report_offsets() {
        let mut scroll = InfiniteScroll::new(100);
        let sentinel = scroll.reset();
        scroll.on_intersect(sentinel);
        let a = scroll.on_page_loaded(sentinel, Ok((vec![1, 2, 3], true)));
        assert_eq!(a, Some(Appended { offset: 0, count: 3 }));

        let next = scroll.on_intersect(sentinel);
        assert_eq!(next.map(|r| r.page), Some(2));
        let b = scroll.on_page_loaded(sentinel, Ok((vec![4, 5], false)));
        assert_eq!(b, Some(Appended { offset: 3, count: 2 }));
        assert_eq!(scroll.items(), &[1, 2, 3, 4, 5]);
        assert!(!scroll.has_more());
        assert_eq!(scroll.on_intersect(sentinel), None);
    }

    #[test]
    fn failure_clears_guard_and_rolls_back_page() {
        let mut scroll: InfiniteScroll<u8> = InfiniteScroll::new(100);
        let sentinel = scroll.reset();
        scroll.on_intersect(sentinel);
        scroll.on_page_loaded(sentinel, Ok((vec![1], true)));
        scroll.on_intersect(sentinel);

        assert_eq!(scroll.on_page_loaded(sentinel, Err("HTTP 502: Bad Gateway".into())), None);
        assert!(!scroll.is_loading());
        assert_eq!(scroll.page(), 1);
        assert_eq!(scroll.error(), Some("HTTP 502: Bad Gateway"));

        let retry = scroll.on_intersect(sentinel);
        assert_eq!(retry.map(|r| r.page), Some(2));
    }

    #[test]
    fn reset_invalidates_old_sentinel() {
        let mut scroll = InfiniteScroll::new(100);
        let old = scroll.reset();
        scroll.on_intersect(old);

        let fresh = scroll.reset();
        assert_ne!(old, fresh);
        assert!(!scroll.is_loading());
        assert_eq!(scroll.on_page_loaded(old, Ok((vec!["stale"], true))), None);
        assert!(scroll.items().is_empty());
        assert_eq!(scroll.on_intersect(old), None);
        assert_eq!(scroll.on_intersect(fresh).map(|r| r.page), Some(1));
    }

    #[test]
    fn page_cap_stops_loading() {
        let mut scroll = InfiniteScroll::new(1);
        let sentinel = scroll.reset();
        scroll.on_intersect(sentinel);
        scroll.on_page_loaded(sentinel, Ok((vec![0u8; 10], true)));
        assert_eq!(scroll.on_intersect(sentinel), None);
    }
}
