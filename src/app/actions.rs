//! Side effects requested by the event handler.
//!
//! [`handle_event`](crate::app::handle_event) never performs I/O. It returns
//! a `Vec<Action>` which the runtime executes in order; completions come
//! back as [`Event`](crate::app::Event)s.
//!
//! # Example
//!
//! ```rust
//! use search_shell::app::Action;
//! use search_shell::domain::{SearchQuery, Vertical};
//!
//! let actions = vec![Action::FetchResults {
//!     request: 1,
//!     vertical: Vertical::Web,
//!     query: SearchQuery::new("rust"),
//! }];
//! assert!(actions[0].is_fetch());
//! ```

use crate::domain::{SearchQuery, Vertical};
use crate::paginate::SentinelId;
use crate::suggest::{SuggestAction, TimerId};
use std::time::Duration;

/// Commands executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Deliver a `TimerFired` event after `delay`.
    ArmTimer {
        /// Timer identity reported back.
        id: TimerId,
        /// Delay before firing.
        delay: Duration,
    },

    /// Abort a pending timer. Unknown ids are ignored.
    CancelTimer(TimerId),

    /// Request completions for the search input.
    FetchSuggestions {
        /// Trimmed input value at request time.
        query: String,
    },

    /// Request the shortcut directory.
    FetchShortcuts,

    /// Request trending queries for the home page.
    FetchTrending,

    /// Request one page of results for a paged results view.
    FetchResults {
        /// Id echoed in the completion so stale pages can be dropped.
        request: u64,
        /// Vertical to search.
        vertical: Vertical,
        /// Query including the page number.
        query: SearchQuery,
    },

    /// Request the next page for an infinite-scroll grid.
    FetchPage {
        /// Sentinel the request belongs to.
        sentinel: SentinelId,
        /// Vertical to search.
        vertical: Vertical,
        /// Query including the page number.
        query: SearchQuery,
    },

    /// Leave the shell for an external URL.
    OpenExternal {
        /// Target URL.
        url: String,
        /// Whether to open in a new tab or window.
        new_tab: bool,
    },
}

impl Action {
    /// Whether the action performs a network request.
    #[must_use]
    pub const fn is_fetch(&self) -> bool {
        matches!(
            self,
            Self::FetchSuggestions { .. }
                | Self::FetchShortcuts
                | Self::FetchTrending
                | Self::FetchResults { .. }
                | Self::FetchPage { .. }
        )
    }

    /// Converts a controller action. `Submit` has no direct counterpart and
    /// is handled by the application, so it yields `None`.
    #[must_use]
    pub fn from_suggest(action: SuggestAction) -> Option<Self> {
        match action {
            SuggestAction::ArmTimer { id, delay } => Some(Self::ArmTimer { id, delay }),
            SuggestAction::CancelTimer(id) => Some(Self::CancelTimer(id)),
            SuggestAction::FetchSuggestions { query } => Some(Self::FetchSuggestions { query }),
            SuggestAction::FetchShortcuts => Some(Self::FetchShortcuts),
            SuggestAction::Submit { .. } => None,
        }
    }
}
