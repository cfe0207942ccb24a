//! Action executor running on tokio.
//!
//! The [`Runtime`] owns the [`SearchApi`] handle and a completion channel.
//! Timers and fetches are spawned as tasks that only send a [`Completion`]
//! back; the [`App`] itself never leaves the calling task, so it can hold
//! `Rc`-based state.
//!
//! Timers are tracked by [`TimerId`] with their abort handles: cancelling a
//! timer aborts its task, and a fire for an id no longer tracked is dropped.
//! Fetches are never aborted; staleness is decided by the application when
//! the completion arrives.

use crate::api::SearchApi;
use crate::app::{handle_event, Action, App, Event};
use crate::domain::error::Result;
use crate::router::History;
use crate::suggest::{SuggestEvent, TimerId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::Instrument;

/// Message sent by a spawned task when it finishes.
#[derive(Debug)]
pub enum Completion {
    /// A timer elapsed.
    Timer(TimerId),
    /// A fetch finished; the event carries the outcome.
    Fetched(Event),
}

/// Executes actions and feeds their completions back into an [`App`].
pub struct Runtime {
    api: Arc<dyn SearchApi>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    timers: HashMap<TimerId, AbortHandle>,
    in_flight: usize,
    opened: Vec<(String, bool)>,
}

impl Runtime {
    /// Creates a runtime issuing requests through `api`.
    pub fn new(api: Arc<dyn SearchApi>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            tx,
            rx,
            timers: HashMap::new(),
            in_flight: 0,
            opened: Vec::new(),
        }
    }

    /// Number of armed timers plus fetches in flight.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.timers.len() + self.in_flight
    }

    /// External URLs requested so far, with their new-tab flag.
    #[must_use]
    pub fn opened(&self) -> &[(String, bool)] {
        &self.opened
    }

    /// Handles `event` and executes the resulting actions. Returns whether
    /// the view should be re-rendered.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`handle_event`]; no actions run in that case.
    pub fn dispatch<H: History>(&mut self, app: &mut App<H>, event: &Event) -> Result<bool> {
        let (render, actions) = handle_event(app, event)?;
        self.execute(actions);
        Ok(render)
    }

    /// Executes actions in order.
    ///
    /// Must be called from within a tokio runtime.
    pub fn execute(&mut self, actions: Vec<Action>) {
        for action in actions {
            self.execute_one(action);
        }
    }

    fn execute_one(&mut self, action: Action) {
        tracing::trace!(?action, "executing action");
        match action {
            Action::ArmTimer { id, delay } => {
                let tx = self.tx.clone();
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(Completion::Timer(id));
                });
                if let Some(previous) = self.timers.insert(id, handle.abort_handle()) {
                    previous.abort();
                }
            }
            Action::CancelTimer(id) => {
                if let Some(handle) = self.timers.remove(&id) {
                    handle.abort();
                    tracing::trace!(timer = %id, "timer cancelled");
                }
            }
            Action::FetchSuggestions { query } => {
                let request = self.api.suggest(&query);
                self.spawn_fetch("suggest", async move {
                    let result = request.await.map_err(|e| e.to_string());
                    Event::Suggest(SuggestEvent::SuggestionsLoaded { query, result })
                });
            }
            Action::FetchShortcuts => {
                let request = self.api.shortcuts();
                self.spawn_fetch("shortcuts", async move {
                    let result = request.await.map_err(|e| e.to_string());
                    Event::Suggest(SuggestEvent::ShortcutsLoaded(result))
                });
            }
            Action::FetchTrending => {
                let request = self.api.trending();
                self.spawn_fetch("trending", async move {
                    Event::TrendingLoaded(request.await.map_err(|e| e.to_string()))
                });
            }
            Action::FetchResults {
                request,
                vertical,
                query,
            } => {
                let fetch = self.api.search(vertical, &query);
                self.spawn_fetch("results", async move {
                    Event::ResultsLoaded {
                        request,
                        result: fetch.await.map_err(|e| e.to_string()),
                    }
                });
            }
            Action::FetchPage {
                sentinel,
                vertical,
                query,
            } => {
                let fetch = self.api.search(vertical, &query);
                self.spawn_fetch("page", async move {
                    Event::PageLoaded {
                        sentinel,
                        result: fetch.await.map_err(|e| e.to_string()),
                    }
                });
            }
            Action::OpenExternal { url, new_tab } => {
                tracing::info!(url = %url, new_tab, "opening external url");
                self.opened.push((url, new_tab));
            }
        }
    }

    fn spawn_fetch<F>(&mut self, kind: &'static str, fetch: F)
    where
        F: std::future::Future<Output = Event> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.tx.clone();
        let span = tracing::debug_span!("fetch", kind);
        tokio::spawn(
            async move {
                let event = fetch.await;
                tracing::debug!("fetch completed");
                let _ = tx.send(Completion::Fetched(event));
            }
            .instrument(span),
        );
    }

    /// Waits for the next completion and applies it. Returns `None` when
    /// nothing is pending.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`handle_event`].
    pub async fn step<H: History>(&mut self, app: &mut App<H>) -> Option<Result<bool>> {
        if self.pending() == 0 {
            return None;
        }
        let completion = self.rx.recv().await?;
        Some(self.complete(app, completion))
    }

    fn complete<H: History>(&mut self, app: &mut App<H>, completion: Completion) -> Result<bool> {
        match completion {
            Completion::Timer(id) => {
                if self.timers.remove(&id).is_none() {
                    tracing::trace!(timer = %id, "dropping fire of cancelled timer");
                    return Ok(false);
                }
                self.dispatch(app, &Event::Suggest(SuggestEvent::TimerFired(id)))
            }
            Completion::Fetched(event) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.dispatch(app, &event)
            }
        }
    }

    /// Applies completions until no timer or fetch is pending. Returns
    /// whether any of them changed the view.
    ///
    /// Errors from individual events are logged and do not stop the loop.
    pub async fn run_until_idle<H: History>(&mut self, app: &mut App<H>) -> bool {
        let mut render = false;
        while let Some(result) = self.step(app).await {
            match result {
                Ok(changed) => render |= changed,
                Err(e) => tracing::warn!(error = %e, "event handling failed"),
            }
        }
        render
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("timers", &self.timers.len())
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::WebResult;
    use crate::domain::{ResultItem, SearchQuery, SearchResponse, ShellError, Shortcut, Vertical};
    use crate::router::MemoryHistory;
    use crate::store::Store;
    use crate::Config;
    use futures_util::future::BoxFuture;
    use futures_util::FutureExt;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeApi {
        calls: Mutex<Vec<String>>,
        fail_search: bool,
    }

    impl FakeApi {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl SearchApi for FakeApi {
        fn search(&self, vertical: Vertical, query: &SearchQuery) -> BoxFuture<'static, Result<SearchResponse<ResultItem>>> {
            self.calls.lock().unwrap().push(format!("search {vertical:?} {} p{}", query.q, query.page));
            let result = if self.fail_search {
                Err(ShellError::Http {
                    status: 502,
                    status_text: "Bad Gateway".into(),
                })
            } else {
                Ok(SearchResponse {
                    query: query.q.clone(),
                    results: vec![ResultItem::Web(WebResult {
                        url: "https://example.com".into(),
                        title: format!("{} result", query.q),
                        snippet: String::new(),
                        domain: None,
                        published: None,
                    })],
                    total_results: 1,
                    page: query.page,
                    per_page: 10,
                    has_more: false,
                    search_time_ms: 5.0,
                    corrected_query: None,
                    instant_answer: None,
                    related_searches: vec![],
                })
            };
            async move {
                tokio::time::sleep(Duration::from_millis(30)).await;
                result
            }
            .boxed()
        }

        fn suggest(&self, query: &str) -> BoxFuture<'static, Result<Vec<String>>> {
            self.calls.lock().unwrap().push(format!("suggest {query}"));
            let list = vec![format!("{query}don")];
            async move {
                tokio::time::sleep(Duration::from_millis(40)).await;
                Ok(list)
            }
            .boxed()
        }

        fn trending(&self) -> BoxFuture<'static, Result<Vec<String>>> {
            self.calls.lock().unwrap().push("trending".into());
            async { Ok(vec!["eclipse".to_string()]) }.boxed()
        }

        fn shortcuts(&self) -> BoxFuture<'static, Result<Vec<Shortcut>>> {
            self.calls.lock().unwrap().push("shortcuts".into());
            async { Ok(vec![]) }.boxed()
        }
    }

    fn setup(api: FakeApi, path: &str) -> (Arc<FakeApi>, Runtime, App) {
        let api = Arc::new(api);
        let runtime = Runtime::new(api.clone());
        let app = App::new(Config::default(), Store::in_memory(), MemoryHistory::new(path));
        (api, runtime, app)
    }

    fn typed(value: &str) -> Event {
        Event::Suggest(SuggestEvent::InputChanged(value.to_string()))
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_typing_sends_one_request() {
        let (api, mut runtime, mut app) = setup(FakeApi::default(), "/");
        runtime.dispatch(&mut app, &Event::Start).unwrap();
        runtime.run_until_idle(&mut app).await;

        for value in ["w", "we", "weather Lon"] {
            runtime.dispatch(&mut app, &typed(value)).unwrap();
            tokio::time::advance(Duration::from_millis(50)).await;
        }
        assert!(runtime.run_until_idle(&mut app).await);

        assert_eq!(api.calls(), vec!["trending", "suggest weather Lon"]);
        let items = app.controller().dropdown().items().to_vec();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text(), "weather London");
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_for_old_input_is_discarded() {
        let (api, mut runtime, mut app) = setup(FakeApi::default(), "/");
        runtime.dispatch(&mut app, &Event::Start).unwrap();

        runtime.dispatch(&mut app, &typed("rust")).unwrap();
        tokio::time::advance(Duration::from_millis(160)).await;
        // Let the timer fire and the request go out.
        while app.controller().debounce().pending_timer().is_some() {
            runtime.step(&mut app).await;
        }
        runtime.dispatch(&mut app, &typed("rust book")).unwrap();
        runtime.run_until_idle(&mut app).await;

        assert_eq!(
            api.calls().iter().filter(|c| c.starts_with("suggest")).count(),
            2
        );
        let texts: Vec<String> = app.controller().dropdown().items().iter().map(|s| s.text()).collect();
        assert_eq!(texts, vec!["rust bookdon"]);
    }

    #[tokio::test(start_paused = true)]
    async fn search_failure_is_rendered_inline() {
        let api = FakeApi {
            fail_search: true,
            ..FakeApi::default()
        };
        let (_, mut runtime, mut app) = setup(api, "/search?q=rust");
        runtime.dispatch(&mut app, &Event::Start).unwrap();
        runtime.run_until_idle(&mut app).await;

        let crate::ui::viewmodel::PageBody::Results(view) = app.compute_viewmodel().body else {
            panic!("expected results body");
        };
        assert_eq!(view.error.as_deref(), Some("HTTP 502: Bad Gateway"));
        assert_eq!(runtime.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn opening_a_result_uses_the_new_tab_setting() {
        let (_, mut runtime, mut app) = setup(FakeApi::default(), "/search?q=rust");
        runtime.dispatch(&mut app, &Event::Start).unwrap();
        runtime.run_until_idle(&mut app).await;

        runtime.dispatch(&mut app, &Event::OpenResult(0)).unwrap();
        assert_eq!(runtime.opened(), &[("https://example.com".to_string(), false)]);
    }
}
