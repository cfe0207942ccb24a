//! View model types representing renderable UI state.
//!
//! View models are immutable snapshots computed by
//! [`App::compute_viewmodel`](crate::app::App::compute_viewmodel). They carry
//! display-ready data only: highlight ranges are precomputed, links are full
//! URLs and every optional element is either present or absent. A browser
//! integration would map them onto DOM nodes; the crate ships a plain-text
//! renderer.
//!
//! # Example
//!
//! ```rust
//! use search_shell::ui::viewmodel::{PageBody, SearchBarInfo, UIViewModel};
//!
//! let vm = UIViewModel {
//!     location: "/".to_string(),
//!     search_bar: SearchBarInfo { query: String::new(), tabs: vec![] },
//!     dropdown: None,
//!     body: PageBody::Blank,
//! };
//! assert!(vm.dropdown.is_none());
//! ```

use crate::domain::{SuggestionKind, Vertical};
use crate::paginate::PaginationView;
use crate::store::Settings;

/// Complete UI view model for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct UIViewModel {
    /// Resolved path including the query string.
    pub location: String,

    /// Search input and vertical tabs.
    pub search_bar: SearchBarInfo,

    /// Suggestion dropdown, present only while open.
    pub dropdown: Option<DropdownInfo>,

    /// Content of the current page.
    pub body: PageBody,
}

/// Search input display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    /// Live input value.
    pub query: String,

    /// One tab per vertical.
    pub tabs: Vec<TabInfo>,
}

/// A vertical tab above the results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabInfo {
    /// Vertical the tab switches to.
    pub vertical: Vertical,

    /// Tab caption.
    pub label: &'static str,

    /// Target URL; `None` when there is no query to carry over.
    pub href: Option<String>,

    /// Whether this vertical is being shown.
    pub active: bool,
}

/// Open suggestion dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownInfo {
    /// Items in display order.
    pub items: Vec<SuggestionItem>,
}

/// One dropdown row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionItem {
    /// Text inserted on commit.
    pub text: String,

    /// Secondary text (shortcut name).
    pub detail: Option<String>,

    /// Icon name for the item's source.
    pub icon: &'static str,

    /// Source of the item.
    pub kind: SuggestionKind,

    /// Whether the item is keyboard-highlighted.
    pub is_selected: bool,

    /// Character ranges of `text` matching the typed input.
    ///
    /// Each tuple is `(start_index, end_index)` in character indices, end
    /// exclusive.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// Page content.
#[derive(Debug, Clone, PartialEq)]
pub enum PageBody {
    /// Nothing resolved yet.
    Blank,

    /// Landing page.
    Home(HomeView),

    /// Results list or grid.
    Results(ResultsView),

    /// Preferences.
    Settings(Settings),

    /// Recent searches with removal links.
    History {
        /// Most recent first.
        entries: Vec<String>,
    },

    /// Shortcut detail.
    Bang(BangView),

    /// Unmatched path.
    NotFound {
        /// Path that failed to match.
        path: String,
    },
}

/// Landing page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    /// Recent searches, capped by configuration.
    pub recent: Vec<String>,

    /// Trending queries once loaded.
    pub trending: Vec<String>,

    /// Whether trending queries are still loading.
    pub trending_loading: bool,
}

/// Results page content.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    /// Vertical being shown.
    pub vertical: Vertical,

    /// Query text.
    pub query: String,

    /// Whether the first request is in flight.
    pub loading: bool,

    /// Inline error for a failed request.
    pub error: Option<String>,

    /// Result count line, e.g. `About 1,230 results (0.12s)`.
    pub summary: Option<String>,

    /// Backend spelling correction.
    pub corrected_query: Option<String>,

    /// One-line instant answer.
    pub instant_answer: Option<String>,

    /// Rendered results.
    pub rows: Vec<ResultRow>,

    /// Whether rows lay out as a grid.
    pub grid: bool,

    /// Related queries.
    pub related: Vec<RelatedLink>,

    /// Page buttons for paged verticals.
    pub pagination: Option<PaginationView>,

    /// Infinite-scroll sentinel for grid verticals.
    pub sentinel: Option<SentinelInfo>,
}

/// A single result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    /// Result title.
    pub title: String,

    /// Target URL.
    pub url: String,

    /// Vertical-specific secondary line.
    pub detail: String,

    /// Publication date, `YYYY-MM-DD`.
    pub published: Option<String>,

    /// Thumbnail URL when thumbnails are enabled.
    pub thumbnail: Option<String>,

    /// Whether the link opens in a new tab.
    pub new_tab: bool,
}

/// Related search rendered as an in-app link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedLink {
    /// Query text.
    pub text: String,

    /// In-app URL searching for it on the same vertical.
    pub href: String,
}

/// Sentinel element after a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentinelInfo {
    /// Element id; intersection reports carry it back.
    pub id: String,

    /// Lookahead margin in pixels.
    pub margin_px: u32,

    /// Whether a page is loading.
    pub loading: bool,

    /// Inline error from the last page load.
    pub error: Option<String>,

    /// Whether there is nothing more to load.
    pub exhausted: bool,
}

/// Shortcut detail page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BangView {
    /// Trigger without the sentinel.
    pub trigger: String,

    /// Whether the directory is still loading.
    pub loading: bool,

    /// Directory load error.
    pub error: Option<String>,

    /// Matching entry, if any.
    pub shortcut: Option<BangDetail>,
}

/// Fields of a known shortcut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BangDetail {
    /// Display name.
    pub name: String,

    /// Category label.
    pub category: Option<String>,

    /// Target URL template.
    pub url_template: Option<String>,

    /// Example expansion for the query `example`.
    pub example: Option<String>,
}
