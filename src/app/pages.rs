//! Page models produced by the router and the per-page state they own.
//!
//! Routing is split in two steps. The router's renderers are pure and only
//! turn a matched path into a [`PageRoute`]. The application then runs page
//! setup for that route, which builds the corresponding [`PageState`] and
//! emits the fetches the page needs.
//!
//! # Route table
//!
//! | Path             | Route                         |
//! |------------------|-------------------------------|
//! | `/`              | [`PageRoute::Home`]           |
//! | `/search`        | [`PageRoute::Results`] (web)  |
//! | `/images`        | [`PageRoute::Results`]        |
//! | `/videos`        | [`PageRoute::Results`]        |
//! | `/news`          | [`PageRoute::Results`]        |
//! | `/settings`      | [`PageRoute::Settings`]       |
//! | `/history`       | [`PageRoute::History`]        |
//! | `/bang/:trigger` | [`PageRoute::Bang`]           |
//! | anything else    | [`PageRoute::NotFound`]       |

use crate::domain::{ResultItem, SearchQuery, SearchResponse, Vertical};
use crate::paginate::InfiniteScroll;
use crate::router::{History, Router};

/// Page selected by the router for the current location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRoute {
    /// Landing page with recent and trending searches.
    Home,
    /// Result list or grid for one vertical.
    Results {
        /// Vertical whose route matched.
        vertical: Vertical,
        /// Query parsed from the location's query string.
        query: SearchQuery,
    },
    /// Preferences form.
    Settings,
    /// Full recent-search list.
    History,
    /// Detail page of one shortcut.
    Bang {
        /// Trigger as it appeared in the path.
        trigger: String,
    },
    /// No route matched.
    NotFound,
}

/// Builds the application router over `history`.
pub fn build_router<H: History>(history: H) -> Router<PageRoute, H> {
    let mut router = Router::new(history);
    router.add_route("/", |_, _| PageRoute::Home);
    for vertical in Vertical::ALL {
        router.add_route(vertical.route(), move |_, query| PageRoute::Results {
            vertical,
            query: SearchQuery::from_query_params(query),
        });
    }
    router
        .add_route("/settings", |_, _| PageRoute::Settings)
        .add_route("/history", |_, _| PageRoute::History)
        .add_route("/bang/:trigger", |params, _| PageRoute::Bang {
            trigger: params.get("trigger").cloned().unwrap_or_default(),
        })
        .set_not_found(|_, _| PageRoute::NotFound);
    router
}

/// Progress of a single request owned by a page.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus<T> {
    /// Request in flight.
    Loading,
    /// Request succeeded.
    Loaded(T),
    /// Request failed; carries the error's display string.
    Failed(String),
}

impl<T> LoadStatus<T> {
    /// Maps a completion into a status.
    pub fn from_result(result: &Result<T, String>) -> Self
    where
        T: Clone,
    {
        match result {
            Ok(value) => Self::Loaded(value.clone()),
            Err(message) => Self::Failed(message.clone()),
        }
    }

    /// Whether the request is still in flight.
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Response metadata kept for grid pages, whose items live in the scroller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridSummary {
    /// Estimated total match count.
    pub total_results: u64,
    /// Spelling correction suggested by the backend.
    pub corrected_query: Option<String>,
    /// Related queries.
    pub related_searches: Vec<String>,
}

/// How a results page loads its content.
#[derive(Debug)]
pub enum ResultsContent {
    /// Classic pagination: one request per page, page number in the URL.
    Paged {
        /// Id matched against [`crate::app::Event::ResultsLoaded`].
        request: u64,
        /// Progress of that request.
        status: LoadStatus<SearchResponse<ResultItem>>,
    },
    /// Incremental loading triggered by the sentinel.
    Grid {
        /// Loaded items and paging state.
        scroll: InfiniteScroll<ResultItem>,
        /// Metadata from the most recent page.
        summary: Option<GridSummary>,
    },
}

/// State of a results page.
#[derive(Debug)]
pub struct ResultsPage {
    /// Vertical being shown.
    pub vertical: Vertical,
    /// Query as it appears in the URL. Page links are built from it.
    pub query: SearchQuery,
    /// Query actually sent, with unset options filled from settings.
    pub request: SearchQuery,
    /// Loaded content.
    pub content: ResultsContent,
}

/// State of the page currently shown.
#[derive(Debug, Default)]
pub enum PageState {
    /// Nothing resolved yet.
    #[default]
    Blank,
    /// Landing page.
    Home {
        /// Trending queries.
        trending: LoadStatus<Vec<String>>,
    },
    /// Results page.
    Results(ResultsPage),
    /// Preferences form.
    Settings,
    /// Recent-search list.
    History,
    /// Shortcut detail page.
    Bang {
        /// Trigger without the leading `!`.
        trigger: String,
        /// Set when the directory could not be loaded.
        error: Option<String>,
    },
    /// Unmatched path.
    NotFound {
        /// Path that failed to match.
        path: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::MemoryHistory;

    #[test]
    fn route_table_covers_every_page() {
        let mut router = build_router(MemoryHistory::new("/"));
        assert_eq!(router.start(), Some(PageRoute::Home));
        assert_eq!(router.navigate("/settings"), Some(PageRoute::Settings));
        assert_eq!(router.navigate("/history"), Some(PageRoute::History));
        assert_eq!(
            router.navigate("/bang/gh"),
            Some(PageRoute::Bang { trigger: "gh".to_string() })
        );
        assert_eq!(router.navigate("/nope/nope"), Some(PageRoute::NotFound));
    }

    #[test]
    fn vertical_routes_parse_their_query() {
        let mut router = build_router(MemoryHistory::new("/videos?q=rust%20talks&page=3"));
        match router.start() {
            Some(PageRoute::Results { vertical, query }) => {
                assert_eq!(vertical, Vertical::Videos);
                assert_eq!(query.q, "rust talks");
                assert_eq!(query.page, 3);
            }
            other => panic!("unexpected route: {other:?}"),
        }
    }
}
