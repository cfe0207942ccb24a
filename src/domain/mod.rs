//! Domain layer for the search shell.
//!
//! This module contains the core domain types, independent of routing, storage
//! or transport concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`search`]: Verticals, typed search queries and response models
//! - [`suggestion`]: Autocomplete suggestions and the shortcut directory entry
//!
//! # Examples
//!
//! ```
//! use search_shell::domain::{SearchQuery, Vertical};
//!
//! let query = SearchQuery::new("rust").with_page(2);
//! assert_eq!(query.to_route_url(Vertical::Images), "/images?q=rust&page=2");
//! ```

pub mod error;
pub mod search;
pub mod suggestion;

pub use error::{Result, ShellError};
pub use search::{
    InstantAnswer, ResultItem, SafeSearch, SearchFilters, SearchQuery, SearchResponse,
    TimeRange, Vertical,
};
pub use suggestion::{Shortcut, Suggestion, SuggestionKind, SHORTCUT_SENTINEL};
