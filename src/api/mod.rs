//! Backend API access.
//!
//! The shell talks to the search backend only through the [`SearchApi`] trait,
//! so the runtime and tests can swap the HTTP client for an in-process fake.
//! Futures are boxed and `'static`: implementations clone whatever they need
//! before returning, which lets the runtime spawn them directly.
//!
//! # Modules
//!
//! - [`client`]: `reqwest`-based implementation with generic JSON helpers
//! - [`payload`]: Tolerant decoding of suggestion bodies

pub mod client;
pub mod payload;

pub use client::HttpSearchApi;
pub use payload::{SuggestEntry, SuggestPayload};

use crate::domain::error::Result;
use crate::domain::{ResultItem, SearchQuery, SearchResponse, Shortcut, Vertical};
use futures_util::future::BoxFuture;

/// Read-only operations the shell needs from the backend.
pub trait SearchApi: Send + Sync {
    /// One page of results for `query` on `vertical`.
    fn search(&self, vertical: Vertical, query: &SearchQuery) -> BoxFuture<'static, Result<SearchResponse<ResultItem>>>;

    /// Completions for a partial query.
    fn suggest(&self, query: &str) -> BoxFuture<'static, Result<Vec<String>>>;

    /// Currently trending queries.
    fn trending(&self) -> BoxFuture<'static, Result<Vec<String>>>;

    /// The shortcut ("bang") directory.
    fn shortcuts(&self) -> BoxFuture<'static, Result<Vec<Shortcut>>>;
}
