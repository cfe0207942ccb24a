//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only entry point that mutates an [`App`]. It
//! pattern-matches the event, delegates to the state methods and returns
//! whether the view must be re-rendered together with the actions to
//! execute.
//!
//! # Event Types
//!
//! - **Navigation**: `Start`, `Navigate`, `LinkClicked`, `PopState`,
//!   `SelectVertical`
//! - **Search input**: `Suggest` wrapping a controller event
//! - **Completions**: `ResultsLoaded`, `PageLoaded`, `TrendingLoaded`, and
//!   the controller's `SuggestionsLoaded`/`ShortcutsLoaded`
//! - **Scrolling**: `SentinelVisible`
//! - **Preferences and history**: `UpdateSettings`, `RemoveRecent`,
//!   `ClearRecent`, `OpenResult`
//!
//! # Example
//!
//! ```rust
//! use search_shell::app::{handle_event, App, Event};
//! use search_shell::router::MemoryHistory;
//! use search_shell::store::Store;
//! use search_shell::Config;
//!
//! let mut app = App::new(Config::default(), Store::in_memory(), MemoryHistory::new("/"));
//! handle_event(&mut app, &Event::Start)?;
//! let (render, _) = handle_event(&mut app, &Event::Navigate("/history".into()))?;
//! assert!(render);
//! # Ok::<(), search_shell::ShellError>(())
//! ```

use crate::app::{Action, App};
use crate::domain::error::{Result, ShellError};
use crate::domain::{ResultItem, SearchResponse, Vertical};
use crate::paginate::SentinelId;
use crate::router::{History, LinkClick};
use crate::store::Settings;
use crate::suggest::SuggestEvent;

/// Largest page size the backend accepts.
const MAX_RESULTS_PER_PAGE: u32 = 100;

/// Events triggered by user input, history changes or completed requests.
///
/// Completions carry `Result<_, String>` with the error's display string, so
/// events stay cheap to clone and compare.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Resolves the initial location.
    Start,

    /// Programmatic navigation to an in-app href.
    Navigate(String),

    /// Click on an anchor.
    LinkClicked(LinkClick),

    /// The history moved (back/forward).
    PopState,

    /// Event for the search input's suggestion controller.
    Suggest(SuggestEvent),

    /// Vertical tab selected.
    SelectVertical(Vertical),

    /// A paged results request completed.
    ResultsLoaded {
        /// Request id from [`Action::FetchResults`].
        request: u64,
        /// Response or error message.
        result: std::result::Result<SearchResponse<ResultItem>, String>,
    },

    /// An infinite-scroll page request completed.
    PageLoaded {
        /// Sentinel from [`Action::FetchPage`].
        sentinel: SentinelId,
        /// Response or error message.
        result: std::result::Result<SearchResponse<ResultItem>, String>,
    },

    /// The grid sentinel intersected the viewport.
    SentinelVisible(SentinelId),

    /// Trending queries arrived.
    TrendingLoaded(std::result::Result<Vec<String>, String>),

    /// A result was activated.
    OpenResult(usize),

    /// Preferences form submitted.
    UpdateSettings(Settings),

    /// Remove one entry from recent searches.
    RemoveRecent(String),

    /// Remove all recent searches.
    ClearRecent,
}

impl Event {
    /// Short name used in tracing spans.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Navigate(_) => "navigate",
            Self::LinkClicked(_) => "link_clicked",
            Self::PopState => "pop_state",
            Self::Suggest(_) => "suggest",
            Self::SelectVertical(_) => "select_vertical",
            Self::ResultsLoaded { .. } => "results_loaded",
            Self::PageLoaded { .. } => "page_loaded",
            Self::SentinelVisible(_) => "sentinel_visible",
            Self::TrendingLoaded(_) => "trending_loaded",
            Self::OpenResult(_) => "open_result",
            Self::UpdateSettings(_) => "update_settings",
            Self::RemoveRecent(_) => "remove_recent",
            Self::ClearRecent => "clear_recent",
        }
    }
}

/// Processes an event, mutates application state, and returns actions to
/// execute.
///
/// The boolean is `true` when the view changed and should be re-rendered;
/// store changes observed by the current page count as view changes.
///
/// # Errors
///
/// Returns [`ShellError::Config`] for settings that fail validation. The
/// state is left unchanged in that case.
pub fn handle_event<H: History>(app: &mut App<H>, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event.name()).entered();

    let (render, actions) = match event {
        Event::Start => (true, app.start()),
        Event::Navigate(href) => app.navigate(href),
        Event::LinkClicked(click) => app.follow_link(click),
        Event::PopState => app.pop_state(),
        Event::Suggest(inner) => app.suggest(inner),
        Event::SelectVertical(vertical) => app.select_vertical(*vertical),
        Event::ResultsLoaded { request, result } => (app.apply_results(*request, result), vec![]),
        Event::PageLoaded { sentinel, result } => (app.apply_page(*sentinel, result), vec![]),
        Event::SentinelVisible(sentinel) => {
            let actions = app.load_next_page(*sentinel);
            (!actions.is_empty(), actions)
        }
        Event::TrendingLoaded(result) => (app.apply_trending(result), vec![]),
        Event::OpenResult(index) => (false, app.open_result(*index).into_iter().collect()),
        Event::UpdateSettings(settings) => {
            validate_settings(settings)?;
            tracing::debug!(?settings, "updating settings");
            app.store().update_settings(settings.clone());
            (false, vec![])
        }
        Event::RemoveRecent(query) => {
            app.store().remove_search(query);
            (false, vec![])
        }
        Event::ClearRecent => {
            app.store().clear_searches();
            (false, vec![])
        }
    };

    let render = app.take_store_changed() || render;
    if !actions.is_empty() {
        tracing::debug!(count = actions.len(), "actions emitted");
    }
    Ok((render, actions))
}

fn validate_settings(settings: &Settings) -> Result<()> {
    if settings.results_per_page == 0 || settings.results_per_page > MAX_RESULTS_PER_PAGE {
        return Err(ShellError::Config(format!(
            "results per page must be between 1 and {MAX_RESULTS_PER_PAGE}, got {}",
            settings.results_per_page
        )));
    }
    Ok(())
}
