//! Classic numbered pagination.
//!
//! Page state lives in the URL: every button carries the full route URL with
//! `page` embedded, so back/forward navigation restores the page without any
//! coordinator memory.

use crate::domain::{SearchQuery, SearchResponse, Vertical};
use std::ops::RangeInclusive;

/// Upper bound on reachable pages regardless of the reported total.
pub const MAX_PAGES: u32 = 100;

/// Number of page buttons rendered.
pub const PAGE_WINDOW: u32 = 10;

/// Pages shown before the current page when the window is not clamped.
pub const WINDOW_LEAD: u32 = 4;

/// Number of pages for `total_results`, capped at `max_pages`.
///
/// ```
/// use search_shell::paginate::total_pages;
///
/// assert_eq!(total_pages(1000, 10, 100), 100);
/// assert_eq!(total_pages(95, 10, 100), 10);
/// assert_eq!(total_pages(1_000_000, 10, 100), 100);
/// ```
#[must_use]
pub fn total_pages(total_results: u64, per_page: u32, max_pages: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    let pages = total_results.div_ceil(u64::from(per_page));
    u32::try_from(pages.min(u64::from(max_pages))).unwrap_or(max_pages)
}

/// Consecutive page numbers to render around `current`.
///
/// The window starts [`WINDOW_LEAD`] pages before `current`, is clamped to
/// `[1, total_pages]` and shifted back near the end so it stays full whenever
/// enough pages exist.
#[must_use]
pub fn page_window(current: u32, total_pages: u32, size: u32) -> RangeInclusive<u32> {
    if total_pages == 0 || size == 0 {
        return 1..=0;
    }
    let current = current.clamp(1, total_pages);
    let mut start = current.saturating_sub(WINDOW_LEAD).max(1);
    let end = start.saturating_add(size - 1).min(total_pages);
    if end - start + 1 < size {
        start = end.saturating_sub(size - 1).max(1);
    }
    start..=end
}

/// Pagination state of one result page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// One-based page being shown.
    pub current_page: u32,
    /// Whether the backend reported more results.
    pub has_more: bool,
    /// Reported total hit count.
    pub total_results: u64,
    /// Page size.
    pub per_page: u32,
    /// Cap on reachable pages.
    pub max_pages: u32,
}

impl Pagination {
    /// Derives the state from a response envelope.
    #[must_use]
    pub fn from_response<T>(response: &SearchResponse<T>, current_page: u32, max_pages: u32) -> Self {
        Self {
            current_page: current_page.max(1),
            has_more: response.has_more,
            total_results: response.total_results,
            per_page: response.per_page,
            max_pages,
        }
    }

    /// Reachable page count.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_results, self.per_page, self.max_pages)
    }

    /// Builds the button row for `query` on `vertical`.
    #[must_use]
    pub fn view(&self, query: &SearchQuery, vertical: Vertical, window: u32) -> PaginationView {
        let total = self.total_pages();
        let current = self.current_page;
        let link = |page: u32| query.with_page(page).to_route_url(vertical);

        let pages = page_window(current, total, window)
            .map(|page| PageLink {
                page,
                href: link(page),
                current: page == current,
            })
            .collect();

        PaginationView {
            pages,
            prev: (current > 1).then(|| link(current - 1)),
            next: (current < total).then(|| link(current + 1)),
            current_page: current,
            total_pages: total,
        }
    }
}

/// One numbered button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    /// Page number.
    pub page: u32,
    /// Route URL of that page.
    pub href: String,
    /// Whether this is the page being shown.
    pub current: bool,
}

/// Renderable pagination row. `None` links are disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    /// Numbered buttons in order.
    pub pages: Vec<PageLink>,
    /// Previous page link.
    pub prev: Option<String>,
    /// Next page link.
    pub next: Option<String>,
    /// Page being shown.
    pub current_page: u32,
    /// Reachable page count.
    pub total_pages: u32,
}
