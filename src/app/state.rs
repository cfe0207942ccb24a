//! Application state management and view model computation.
//!
//! [`App`] is the single owner of everything the shell shows: the router and
//! its history, the store handle, the search input's suggestion controller
//! and the state of the current page. It is mutated only through
//! [`handle_event`](crate::app::handle_event) and never performs I/O itself.
//!
//! # Page lifecycle
//!
//! Every resolved route runs page setup ([`App::enter`]):
//!
//! 1. The previous page is torn down: its store subscription guard is
//!    dropped and the suggestion controller is dismissed.
//! 2. The new [`PageState`] is built and the input is prefilled.
//! 3. Pages that display persisted data subscribe to the store; a change
//!    marks the view dirty so the next event re-renders.
//! 4. The fetches the page needs are returned as actions.
//!
//! # View Model Computation
//!
//! [`App::compute_viewmodel`] turns the current state into a
//! [`UIViewModel`], including fuzzy highlight ranges for dropdown items,
//! page links and the infinite-scroll sentinel.

use super::actions::Action;
use super::pages::{
    build_router, GridSummary, LoadStatus, PageRoute, PageState, ResultsContent, ResultsPage,
};
use crate::domain::{ResultItem, SearchQuery, SearchResponse, Shortcut, Vertical};
use crate::paginate::{InfiniteScroll, Pagination, SentinelId};
use crate::router::{History, LinkClick, LinkOutcome, MemoryHistory, Router};
use crate::store::{Settings, Store, Subscription};
use crate::suggest::{SuggestAction, SuggestEvent, SuggestionController};
use crate::ui::viewmodel::{
    BangDetail, BangView, DropdownInfo, HomeView, PageBody, RelatedLink, ResultRow, ResultsView,
    SearchBarInfo, SentinelInfo, SuggestionItem, TabInfo, UIViewModel,
};
use crate::Config;
use fuzzy_matcher::skim::SkimMatcherV2;
use std::cell::Cell;
use std::rc::Rc;

/// Central application state container.
pub struct App<H: History = MemoryHistory> {
    config: Config,
    store: Store,
    router: Router<PageRoute, H>,
    controller: SuggestionController,
    page: PageState,
    /// Store subscription owned by the current page.
    subscription: Option<Subscription>,
    /// Set by the page's store subscription, cleared on read.
    store_changed: Rc<Cell<bool>>,
    next_request: u64,
    /// Last sentinel issued to any grid.
    last_sentinel: SentinelId,
}

impl<H: History> App<H> {
    /// Creates the application over `history`. Nothing is resolved until
    /// [`App::start`].
    pub fn new(config: Config, store: Store, history: H) -> Self {
        let controller = SuggestionController::new(config.suggest_config());
        Self {
            router: build_router(history),
            config,
            store,
            controller,
            page: PageState::Blank,
            subscription: None,
            store_changed: Rc::new(Cell::new(false)),
            next_request: 0,
            last_sentinel: SentinelId::default(),
        }
    }

    /// Configuration the app was built with.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Store handle.
    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// Router and its history.
    pub const fn router(&self) -> &Router<PageRoute, H> {
        &self.router
    }

    /// Mutable router access for the integration layer, e.g. to move a
    /// [`MemoryHistory`] before delivering [`Event::PopState`](crate::app::Event::PopState).
    pub fn router_mut(&mut self) -> &mut Router<PageRoute, H> {
        &mut self.router
    }

    /// Suggestion controller of the search input.
    pub const fn controller(&self) -> &SuggestionController {
        &self.controller
    }

    /// Current page state.
    pub const fn page(&self) -> &PageState {
        &self.page
    }

    /// Last resolved path including the query string.
    pub fn current_path(&self) -> Option<&str> {
        self.router.current_path()
    }

    /// Whether a subscribed store change happened since the last call.
    pub fn take_store_changed(&self) -> bool {
        self.store_changed.replace(false)
    }

    /// Vertical used for submissions: the one being shown, else web.
    pub fn current_vertical(&self) -> Vertical {
        match &self.page {
            PageState::Results(page) => page.vertical,
            _ => Vertical::Web,
        }
    }

    /// Resolves the history's current location.
    pub fn start(&mut self) -> Vec<Action> {
        tracing::debug!(location = %self.router.history().location(), "starting router");
        match self.router.start() {
            Some(route) => self.enter(route),
            None => vec![],
        }
    }

    /// Navigates to `href`. A navigation to the current path is a no-op.
    pub fn navigate(&mut self, href: &str) -> (bool, Vec<Action>) {
        match self.router.navigate(href) {
            Some(route) => (true, self.enter(route)),
            None => (false, vec![]),
        }
    }

    /// Re-resolves after the history moved.
    pub fn pop_state(&mut self) -> (bool, Vec<Action>) {
        match self.router.on_pop_state() {
            Some(route) => (true, self.enter(route)),
            None => (false, vec![]),
        }
    }

    /// Routes an anchor click. Clicks the router leaves alone leave the
    /// shell.
    pub fn follow_link(&mut self, click: &LinkClick) -> (bool, Vec<Action>) {
        match self.router.on_link_click(click) {
            LinkOutcome::Intercepted(Some(route)) => (true, self.enter(route)),
            LinkOutcome::Intercepted(None) => (false, vec![]),
            LinkOutcome::Default => {
                tracing::debug!(href = %click.href, "link left to default navigation");
                (
                    false,
                    vec![Action::OpenExternal {
                        url: click.href.clone(),
                        new_tab: click.modifier,
                    }],
                )
            }
        }
    }

    /// Runs page setup for `route`.
    pub fn enter(&mut self, route: PageRoute) -> Vec<Action> {
        let _span = tracing::debug_span!("page_setup", route = ?route).entered();

        let mut actions = self.teardown();
        match route {
            PageRoute::Home => {
                self.controller.set_input("");
                self.page = PageState::Home {
                    trending: LoadStatus::Loading,
                };
                self.watch_store();
                actions.push(Action::FetchTrending);
            }
            PageRoute::Results { vertical, query } => {
                if query.q.trim().is_empty() {
                    tracing::debug!("results route without a query, redirecting home");
                    self.page = PageState::Blank;
                    if let Some(route) = self.router.navigate_with("/", true) {
                        actions.extend(self.enter(route));
                    }
                    return actions;
                }
                actions.extend(self.enter_results(vertical, query));
            }
            PageRoute::Settings => {
                self.controller.set_input("");
                self.page = PageState::Settings;
                self.watch_store();
            }
            PageRoute::History => {
                self.controller.set_input("");
                self.page = PageState::History;
                self.watch_store();
            }
            PageRoute::Bang { trigger } => {
                self.controller.set_input("");
                let trigger = trigger.trim_start_matches(crate::domain::SHORTCUT_SENTINEL).to_string();
                if self.controller.shortcuts().is_none() {
                    actions.push(Action::FetchShortcuts);
                }
                self.page = PageState::Bang {
                    trigger,
                    error: None,
                };
            }
            PageRoute::NotFound => {
                let path = self.router.current_path().unwrap_or_default().to_string();
                tracing::debug!(path = %path, "no route matched");
                self.page = PageState::NotFound { path };
            }
        }
        actions
    }

    fn enter_results(&mut self, vertical: Vertical, query: SearchQuery) -> Vec<Action> {
        self.controller.set_input(query.q.clone());
        let settings = self.store.with(|s| s.settings.clone());
        let request = effective_query(&query, &settings);

        let (content, actions) = if vertical.is_grid() && settings.infinite_scroll {
            let mut scroll = InfiniteScroll::after(self.last_sentinel, self.config.max_pages);
            let sentinel = scroll.reset();
            self.last_sentinel = sentinel;
            // The empty grid leaves the sentinel in view.
            let actions = scroll
                .on_intersect(sentinel)
                .map(|next| Action::FetchPage {
                    sentinel: next.sentinel,
                    vertical,
                    query: request.with_page(next.page),
                })
                .into_iter()
                .collect();
            (ResultsContent::Grid { scroll, summary: None }, actions)
        } else {
            self.next_request += 1;
            let id = self.next_request;
            let actions = vec![Action::FetchResults {
                request: id,
                vertical,
                query: request.clone(),
            }];
            (
                ResultsContent::Paged {
                    request: id,
                    status: LoadStatus::Loading,
                },
                actions,
            )
        };

        tracing::debug!(?vertical, q = %query.q, page = query.page, "results page set up");
        self.page = PageState::Results(ResultsPage {
            vertical,
            query,
            request,
            content,
        });
        self.watch_store();
        actions
    }

    fn teardown(&mut self) -> Vec<Action> {
        if let Some(subscription) = self.subscription.take() {
            subscription.dispose();
        }
        self.controller
            .dismiss()
            .into_iter()
            .filter_map(Action::from_suggest)
            .collect()
    }

    fn watch_store(&mut self) {
        let changed = Rc::clone(&self.store_changed);
        self.subscription = Some(self.store.subscribe(move |_| changed.set(true)));
    }

    /// Records `query` and navigates to it on the current vertical. Blank
    /// queries are ignored.
    pub fn submit(&mut self, query: &str) -> Vec<Action> {
        let query = query.trim();
        if query.is_empty() {
            return vec![];
        }
        self.store.record_search(query);
        let href = SearchQuery::new(query).to_route_url(self.current_vertical());
        tracing::debug!(href = %href, "navigating to submitted query");
        self.navigate(&href).1
    }

    /// Feeds an event to the suggestion controller and translates its
    /// actions; submissions become navigations.
    pub fn suggest(&mut self, event: &SuggestEvent) -> (bool, Vec<Action>) {
        let recent = self.store.with(|s| s.recent_searches.clone());
        let (mut render, requested) = self.controller.handle(event, &recent);

        if let SuggestEvent::ShortcutsLoaded(result) = event {
            render |= self.apply_shortcuts(result);
        }

        let mut actions = Vec::new();
        for action in requested {
            match action {
                SuggestAction::Submit { query } => {
                    actions.extend(self.submit(&query));
                    render = true;
                }
                other => actions.extend(Action::from_suggest(other)),
            }
        }
        (render, actions)
    }

    fn apply_shortcuts(&mut self, result: &Result<Vec<Shortcut>, String>) -> bool {
        let PageState::Bang { error, .. } = &mut self.page else {
            return false;
        };
        *error = result.as_ref().err().cloned();
        true
    }

    /// Switches the current search to another vertical, starting at page 1.
    pub fn select_vertical(&mut self, vertical: Vertical) -> (bool, Vec<Action>) {
        let href = match &self.page {
            PageState::Results(page) => page.query.with_page(1).to_route_url(vertical),
            _ => {
                let q = self.controller.input().trim();
                if q.is_empty() {
                    return (false, vec![]);
                }
                SearchQuery::new(q).to_route_url(vertical)
            }
        };
        self.navigate(&href)
    }

    /// Applies a paged results completion. Completions for a request other
    /// than the page's current one are ignored.
    pub fn apply_results(&mut self, request: u64, result: &Result<SearchResponse<ResultItem>, String>) -> bool {
        let PageState::Results(ResultsPage {
            content: ResultsContent::Paged { request: expected, status },
            ..
        }) = &mut self.page
        else {
            tracing::debug!(request, "results arrived for a page no longer shown");
            return false;
        };
        if *expected != request {
            tracing::debug!(request, expected = *expected, "discarding stale results");
            return false;
        }
        if let Err(e) = result {
            tracing::warn!(error = %e, "search request failed");
        }
        *status = LoadStatus::from_result(result);
        true
    }

    /// Applies an infinite-scroll page completion.
    pub fn apply_page(&mut self, sentinel: SentinelId, result: &Result<SearchResponse<ResultItem>, String>) -> bool {
        let PageState::Results(ResultsPage {
            content: ResultsContent::Grid { scroll, summary },
            ..
        }) = &mut self.page
        else {
            return false;
        };
        if scroll.sentinel() != sentinel {
            tracing::debug!(%sentinel, "discarding page for replaced grid");
            return false;
        }

        let page = match result {
            Ok(response) => {
                *summary = Some(GridSummary {
                    total_results: response.total_results,
                    corrected_query: response.corrected_query.clone(),
                    related_searches: response.related_searches.clone(),
                });
                Ok((response.results.clone(), response.has_more))
            }
            Err(e) => Err(e.clone()),
        };
        scroll.on_page_loaded(sentinel, page);
        true
    }

    /// Handles the sentinel scrolling into view.
    pub fn load_next_page(&mut self, sentinel: SentinelId) -> Vec<Action> {
        let PageState::Results(page) = &mut self.page else {
            return vec![];
        };
        let ResultsContent::Grid { scroll, .. } = &mut page.content else {
            return vec![];
        };
        scroll
            .on_intersect(sentinel)
            .map(|next| Action::FetchPage {
                sentinel: next.sentinel,
                vertical: page.vertical,
                query: page.request.with_page(next.page),
            })
            .into_iter()
            .collect()
    }

    /// Applies trending queries to the home page.
    pub fn apply_trending(&mut self, result: &Result<Vec<String>, String>) -> bool {
        let PageState::Home { trending } = &mut self.page else {
            return false;
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "trending request failed");
        }
        *trending = LoadStatus::from_result(result);
        true
    }

    /// Result at `index` on the current results page.
    pub fn result_at(&self, index: usize) -> Option<&ResultItem> {
        let PageState::Results(page) = &self.page else {
            return None;
        };
        match &page.content {
            ResultsContent::Paged {
                status: LoadStatus::Loaded(response),
                ..
            } => response.results.get(index),
            ResultsContent::Grid { scroll, .. } => scroll.items().get(index),
            ResultsContent::Paged { .. } => None,
        }
    }

    /// Opens the result at `index` honouring the new-tab preference.
    pub fn open_result(&self, index: usize) -> Option<Action> {
        let item = self.result_at(index)?;
        let new_tab = self.store.with(|s| s.settings.open_in_new_tab);
        Some(Action::OpenExternal {
            url: item.url().to_string(),
            new_tab,
        })
    }

    /// Computes the renderable view model for the current state.
    #[must_use]
    pub fn compute_viewmodel(&self) -> UIViewModel {
        UIViewModel {
            location: self.current_path().unwrap_or_default().to_string(),
            search_bar: self.compute_search_bar(),
            dropdown: self.compute_dropdown(),
            body: self.compute_body(),
        }
    }

    fn compute_search_bar(&self) -> SearchBarInfo {
        let input = self.controller.input();
        let (active, base) = match &self.page {
            PageState::Results(page) => (Some(page.vertical), Some(page.query.with_page(1))),
            _ => (None, Some(SearchQuery::new(input.trim())).filter(|q| !q.q.is_empty())),
        };

        let tabs = Vertical::ALL
            .into_iter()
            .map(|vertical| TabInfo {
                vertical,
                label: vertical.label(),
                href: base.as_ref().map(|q| q.to_route_url(vertical)),
                active: active == Some(vertical),
            })
            .collect();

        SearchBarInfo {
            query: input.to_string(),
            tabs,
        }
    }

    fn compute_dropdown(&self) -> Option<DropdownInfo> {
        let dropdown = self.controller.dropdown();
        if !dropdown.is_open() {
            return None;
        }

        let pattern = self.controller.input().trim();
        let matcher = (!pattern.is_empty()).then(SkimMatcherV2::default);

        let items = dropdown
            .items()
            .iter()
            .enumerate()
            .map(|(index, suggestion)| {
                let text = suggestion.text();
                let highlight_ranges = matcher
                    .as_ref()
                    .map_or_else(Vec::new, |m| compute_highlight_ranges(&text, pattern, m));
                SuggestionItem {
                    detail: suggestion.detail().map(String::from),
                    icon: suggestion.icon(),
                    kind: suggestion.kind(),
                    is_selected: dropdown.active_index() == Some(index),
                    highlight_ranges,
                    text,
                }
            })
            .collect();

        Some(DropdownInfo { items })
    }

    fn compute_body(&self) -> PageBody {
        match &self.page {
            PageState::Blank => PageBody::Blank,
            PageState::Home { trending } => {
                let recent = self.store.with(|s| {
                    s.recent_searches
                        .iter()
                        .take(self.config.recent_limit)
                        .cloned()
                        .collect()
                });
                PageBody::Home(HomeView {
                    recent,
                    trending: match trending {
                        LoadStatus::Loaded(list) => list.clone(),
                        LoadStatus::Loading | LoadStatus::Failed(_) => vec![],
                    },
                    trending_loading: trending.is_loading(),
                })
            }
            PageState::Results(page) => PageBody::Results(self.compute_results(page)),
            PageState::Settings => PageBody::Settings(self.store.with(|s| s.settings.clone())),
            PageState::History => PageBody::History {
                entries: self.store.with(|s| s.recent_searches.clone()),
            },
            PageState::Bang { trigger, error } => {
                let directory = self.controller.shortcuts();
                let shortcut = directory
                    .and_then(|list| {
                        list.iter()
                            .find(|s| s.normalized_trigger().eq_ignore_ascii_case(trigger))
                    })
                    .map(|s| BangDetail {
                        name: s.name.clone(),
                        category: s.category.clone(),
                        url_template: s.url_template.clone(),
                        example: s.expand("example"),
                    });
                PageBody::Bang(BangView {
                    trigger: trigger.clone(),
                    loading: directory.is_none() && error.is_none(),
                    error: error.clone(),
                    shortcut,
                })
            }
            PageState::NotFound { path } => PageBody::NotFound { path: path.clone() },
        }
    }

    fn compute_results(&self, page: &ResultsPage) -> ResultsView {
        let settings = self.store.with(|s| s.settings.clone());
        let vertical = page.vertical;
        let rows = |items: &[ResultItem]| -> Vec<ResultRow> {
            items.iter().map(|item| result_row(item, &settings)).collect()
        };
        let related = |searches: &[String]| -> Vec<RelatedLink> {
            searches
                .iter()
                .map(|text| RelatedLink {
                    text: text.clone(),
                    href: SearchQuery::new(text.as_str()).to_route_url(vertical),
                })
                .collect()
        };

        let mut view = ResultsView {
            vertical,
            query: page.query.q.clone(),
            loading: false,
            error: None,
            summary: None,
            corrected_query: None,
            instant_answer: None,
            rows: vec![],
            grid: vertical.is_grid(),
            related: vec![],
            pagination: None,
            sentinel: None,
        };

        match &page.content {
            ResultsContent::Paged { status, .. } => match status {
                LoadStatus::Loading => view.loading = true,
                LoadStatus::Failed(message) => view.error = Some(message.clone()),
                LoadStatus::Loaded(response) => {
                    view.summary = Some(result_summary(response.total_results, Some(response.search_time_ms)));
                    view.corrected_query.clone_from(&response.corrected_query);
                    view.instant_answer = response.instant_answer.as_ref().and_then(|a| a.summary());
                    view.rows = rows(&response.results);
                    view.related = related(&response.related_searches);

                    let pagination = Pagination::from_response(response, page.query.page, self.config.max_pages);
                    if pagination.total_pages() > 1 {
                        view.pagination = Some(pagination.view(&page.query, vertical, self.config.page_window));
                    }
                }
            },
            ResultsContent::Grid { scroll, summary } => {
                view.loading = scroll.is_loading() && scroll.items().is_empty();
                view.rows = rows(scroll.items());
                if let Some(summary) = summary {
                    view.summary = Some(result_summary(summary.total_results, None));
                    view.corrected_query.clone_from(&summary.corrected_query);
                    view.related = related(&summary.related_searches);
                }
                view.sentinel = Some(SentinelInfo {
                    id: scroll.sentinel().to_string(),
                    margin_px: self.config.scroll_margin_px,
                    loading: scroll.is_loading(),
                    error: scroll.error().map(String::from),
                    exhausted: !scroll.has_more(),
                });
            }
        }
        view
    }
}

impl<H: History> std::fmt::Debug for App<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("current_path", &self.current_path())
            .field("page", &self.page)
            .field("input", &self.controller.input())
            .finish_non_exhaustive()
    }
}

/// Fills options the URL leaves unset from the user's settings.
fn effective_query(query: &SearchQuery, settings: &Settings) -> SearchQuery {
    let mut request = query.clone();
    request.per_page = request.per_page.or(Some(settings.results_per_page));

    let filters = &mut request.filters;
    filters.safe_search = filters.safe_search.or(Some(settings.safe_search));
    if filters.region.is_none() && !settings.region.is_empty() {
        filters.region = Some(settings.region.clone());
    }
    if filters.language.is_none() && !settings.language.is_empty() {
        filters.language = Some(settings.language.clone());
    }
    request
}

fn result_row(item: &ResultItem, settings: &Settings) -> ResultRow {
    let (detail, thumbnail) = match item {
        ResultItem::Web(r) => (
            join_parts([r.domain.clone(), Some(r.snippet.clone())]),
            None,
        ),
        ResultItem::Image(r) => {
            let size = r.width.zip(r.height).map(|(w, h)| format!("{w}×{h}"));
            (
                join_parts([size, r.source_domain.clone()]),
                r.thumbnail_url.clone(),
            )
        }
        ResultItem::Video(r) => (
            join_parts([
                r.duration.clone(),
                r.channel.clone(),
                r.views.map(|v| format!("{} views", group_thousands(v))),
            ]),
            r.thumbnail_url.clone(),
        ),
        ResultItem::News(r) => (
            join_parts([Some(r.source.clone()), Some(r.snippet.clone())]),
            r.image_url.clone(),
        ),
    };

    ResultRow {
        title: item.title().to_string(),
        url: item.url().to_string(),
        detail,
        published: item.published().map(|d| d.format("%Y-%m-%d").to_string()),
        thumbnail: thumbnail.filter(|_| settings.show_thumbnails),
        new_tab: settings.open_in_new_tab,
    }
}

fn join_parts<const N: usize>(parts: [Option<String>; N]) -> String {
    parts
        .into_iter()
        .flatten()
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" · ")
}

fn result_summary(total: u64, search_time_ms: Option<f64>) -> String {
    let count = group_thousands(total);
    match search_time_ms {
        Some(ms) => format!("About {count} results ({:.2}s)", ms / 1000.0),
        None => format!("About {count} results"),
    }
}

/// Formats `n` with comma thousands separators.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Computes character index ranges of `text` matched by `pattern`.
///
/// Uses the Skim fuzzy matcher to find matching character positions, then
/// coalesces consecutive indices into `(start, end)` ranges (exclusive end).
fn compute_highlight_ranges(text: &str, pattern: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
    use fuzzy_matcher::FuzzyMatcher;

    let Some((_score, indices)) = matcher.fuzzy_indices(text, pattern) else {
        return vec![];
    };

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end = idx + 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::{ImageResult, WebResult};
    use crate::store::StatePatch;

    fn app_at(path: &str) -> App {
        App::new(Config::default(), Store::in_memory(), MemoryHistory::new(path))
    }

    fn web(title: &str) -> ResultItem {
        ResultItem::Web(WebResult {
            url: format!("https://example.com/{title}"),
            title: title.to_string(),
            snippet: format!("about {title}"),
            domain: Some("example.com".to_string()),
            published: None,
        })
    }

    fn response(results: Vec<ResultItem>, total: u64, page: u32, has_more: bool) -> SearchResponse<ResultItem> {
        SearchResponse {
            query: "q".to_string(),
            results,
            total_results: total,
            page,
            per_page: 10,
            has_more,
            search_time_ms: 120.0,
            corrected_query: None,
            instant_answer: None,
            related_searches: vec!["rust book".to_string()],
        }
    }

    #[test]
    fn results_page_fills_unset_options_from_settings() {
        let mut app = app_at("/search?q=rust&region=de");
        let actions = app.start();

        let [Action::FetchResults { request, vertical, query }] = actions.as_slice() else {
            panic!("unexpected actions: {actions:?}");
        };
        assert_eq!(*request, 1);
        assert_eq!(*vertical, Vertical::Web);
        assert_eq!(query.per_page, Some(10));
        assert_eq!(query.filters.region.as_deref(), Some("de"));
        assert_eq!(query.filters.language.as_deref(), Some("en"));
        assert_eq!(app.controller().input(), "rust");
    }

    #[test]
    fn empty_query_redirects_home_replacing_history() {
        let mut app = app_at("/search?q=%20");
        let actions = app.start();
        assert_eq!(app.current_path(), Some("/"));
        assert!(matches!(app.page(), PageState::Home { .. }));
        assert_eq!(actions, vec![Action::FetchTrending]);
        assert_eq!(app.router().history().len(), 1);
    }

    #[test]
    fn stale_results_are_ignored() {
        let mut app = app_at("/search?q=a");
        app.start();
        app.navigate("/search?q=b");

        assert!(!app.apply_results(1, &Ok(response(vec![web("a")], 1, 1, false))));
        assert!(app.apply_results(2, &Ok(response(vec![web("b")], 1, 1, false))));
        assert_eq!(app.result_at(0).map(ResultItem::title), Some("b"));
    }

    #[test]
    fn failed_results_render_inline_error() {
        let mut app = app_at("/news?q=storm");
        app.start();
        app.apply_results(1, &Err("HTTP 503: Service Unavailable".to_string()));

        let PageBody::Results(view) = app.compute_viewmodel().body else {
            panic!("expected results body");
        };
        assert_eq!(view.error.as_deref(), Some("HTTP 503: Service Unavailable"));
        assert!(!view.loading);
    }

    #[test]
    fn paged_view_carries_window_and_summary() {
        let mut app = app_at("/search?q=rust&page=50");
        app.start();
        app.apply_results(1, &Ok(response(vec![web("x")], 1000, 50, true)));

        let PageBody::Results(view) = app.compute_viewmodel().body else {
            panic!("expected results body");
        };
        let pagination = view.pagination.unwrap();
        assert_eq!(pagination.pages.first().map(|p| p.page), Some(46));
        assert_eq!(pagination.pages.last().map(|p| p.page), Some(55));
        assert_eq!(pagination.prev.as_deref(), Some("/search?q=rust&page=49"));
        assert_eq!(view.summary.as_deref(), Some("About 1,000 results (0.12s)"));
        assert_eq!(view.related[0].href, "/search?q=rust%20book");
    }

    #[test]
    fn image_grid_loads_through_sentinel() {
        let mut app = app_at("/images?q=cats");
        let actions = app.start();
        let [Action::FetchPage { sentinel, query, .. }] = actions.as_slice() else {
            panic!("unexpected actions: {actions:?}");
        };
        let sentinel = *sentinel;
        assert_eq!(query.page, 1);

        // Loading guard admits one request at a time.
        assert!(app.load_next_page(sentinel).is_empty());

        let image = ResultItem::Image(ImageResult {
            url: "https://i/1.jpg".to_string(),
            thumbnail_url: Some("https://i/1_t.jpg".to_string()),
            title: "cat".to_string(),
            source_domain: Some("i".to_string()),
            width: Some(640),
            height: Some(480),
        });
        assert!(app.apply_page(sentinel, &Ok(response(vec![image], 40, 1, true))));

        let next = app.load_next_page(sentinel);
        assert!(matches!(next.as_slice(), [Action::FetchPage { query, .. }] if query.page == 2));

        let PageBody::Results(view) = app.compute_viewmodel().body else {
            panic!("expected results body");
        };
        assert!(view.grid);
        assert_eq!(view.rows[0].detail, "640×480 · i");
        let info = view.sentinel.unwrap();
        assert_eq!(info.id, sentinel.to_string());
        assert!(info.loading);
        assert_eq!(info.margin_px, 400);
    }

    #[test]
    fn page_for_a_replaced_grid_is_rejected() {
        let mut app = app_at("/images?q=cats");
        let actions = app.start();
        let [Action::FetchPage { sentinel: cats, .. }] = actions.as_slice() else {
            panic!("unexpected actions: {actions:?}");
        };
        let cats = *cats;

        let (_, actions) = app.navigate("/images?q=dogs");
        let [Action::FetchPage { sentinel: dogs, .. }] = actions.as_slice() else {
            panic!("unexpected actions: {actions:?}");
        };
        assert_ne!(cats, *dogs);

        let cat = ResultItem::Image(ImageResult {
            url: "https://cat.jpg".to_string(),
            thumbnail_url: None,
            title: "cat".to_string(),
            source_domain: None,
            width: None,
            height: None,
        });
        assert!(!app.apply_page(cats, &Ok(response(vec![cat], 1, 1, false))));
        assert!(app.result_at(0).is_none());

        let PageBody::Results(view) = app.compute_viewmodel().body else {
            panic!("expected results body");
        };
        assert!(view.sentinel.is_some_and(|s| s.loading));
    }

    #[test]
    fn images_page_without_infinite_scroll_is_paged() {
        let store = Store::in_memory();
        store.update_settings(Settings {
            infinite_scroll: false,
            ..Settings::default()
        });
        let mut app = App::new(Config::default(), store, MemoryHistory::new("/images?q=cats"));
        let actions = app.start();
        assert!(matches!(actions.as_slice(), [Action::FetchResults { .. }]));
    }

    #[test]
    fn store_changes_mark_subscribed_pages_dirty() {
        let mut app = app_at("/history");
        app.start();
        assert!(!app.take_store_changed());

        app.store().record_search("rust");
        assert!(app.take_store_changed());
        assert!(!app.take_store_changed());

        app.navigate("/bang/gh");
        assert_eq!(app.store().subscriber_count(), 0);
        app.store().set(StatePatch::recent_searches(vec![]));
        assert!(!app.take_store_changed());
    }

    #[test]
    fn submit_records_and_navigates_on_current_vertical() {
        let mut app = app_at("/videos?q=old");
        app.start();
        let actions = app.submit("  rust talks ");

        assert_eq!(app.current_path(), Some("/videos?q=rust%20talks"));
        assert_eq!(app.store().get().recent_searches, vec!["rust talks"]);
        assert!(matches!(actions.as_slice(), [Action::FetchResults { vertical: Vertical::Videos, .. }]));
        assert!(app.submit("   ").is_empty());
    }

    #[test]
    fn tabs_carry_query_and_filters() {
        let mut app = app_at("/search?q=rust&page=3&time_range=week");
        app.start();
        let bar = app.compute_viewmodel().search_bar;
        let images = bar.tabs.iter().find(|t| t.vertical == Vertical::Images).unwrap();
        assert_eq!(images.href.as_deref(), Some("/images?q=rust&time_range=week"));
        assert!(bar.tabs.iter().find(|t| t.vertical == Vertical::Web).unwrap().active);
    }

    #[test]
    fn highlight_ranges_coalesce_runs() {
        let matcher = SkimMatcherV2::default();
        assert_eq!(
            compute_highlight_ranges("weather London", "weather Lon", &matcher),
            vec![(0, 11)]
        );
        assert!(compute_highlight_ranges("abc", "xyz", &matcher).is_empty());
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }
}
