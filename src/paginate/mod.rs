//! Result paging strategies.
//!
//! Grid verticals load incrementally through [`InfiniteScroll`]; list
//! verticals render a numbered [`PaginationView`] whose links carry the page in
//! the URL.

pub mod infinite;
pub mod pagination;

pub use infinite::{Appended, InfiniteScroll, PageRequest, SentinelId};
pub use pagination::{
    page_window, total_pages, PageLink, Pagination, PaginationView, MAX_PAGES, PAGE_WINDOW,
    WINDOW_LEAD,
};
