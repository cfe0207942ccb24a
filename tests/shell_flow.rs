//! End-to-end flows through the runtime with a scripted backend.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use search_shell::api::SearchApi;
use search_shell::domain::search::{ImageResult, WebResult};
use search_shell::domain::{ResultItem, SearchQuery, SearchResponse, Shortcut, Vertical};
use search_shell::router::MemoryHistory;
use search_shell::runtime::Runtime;
use search_shell::store::{JsonFileStorage, Store};
use search_shell::suggest::{Key, SuggestEvent};
use search_shell::ui::{render_to_string, PageBody};
use search_shell::{App, Config, Event, Result};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct ScriptedApi {
    calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn response(query: &SearchQuery, results: Vec<ResultItem>, has_more: bool) -> SearchResponse<ResultItem> {
    SearchResponse {
        query: query.q.clone(),
        total_results: 1230,
        page: query.page,
        per_page: results.len() as u32,
        has_more,
        search_time_ms: 120.0,
        corrected_query: None,
        instant_answer: None,
        related_searches: vec!["weather radar".to_string()],
        results,
    }
}

impl SearchApi for ScriptedApi {
    fn search(&self, vertical: Vertical, query: &SearchQuery) -> BoxFuture<'static, Result<SearchResponse<ResultItem>>> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("search {vertical:?} {} p{}", query.q, query.page));

        let results = match vertical {
            Vertical::Images => (0..3)
                .map(|i| {
                    ResultItem::Image(ImageResult {
                        url: format!("https://img.test/{}/{i}.jpg", query.page),
                        thumbnail_url: None,
                        title: format!("{} {i}", query.q),
                        source_domain: None,
                        width: None,
                        height: None,
                    })
                })
                .collect(),
            _ => vec![ResultItem::Web(WebResult {
                url: "https://weather.test".to_string(),
                title: format!("{} forecast", query.q),
                snippet: "Hourly forecast".to_string(),
                domain: Some("weather.test".to_string()),
                published: None,
            })],
        };
        let body = response(query, results, query.page < 2);
        async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(body)
        }
        .boxed()
    }

    fn suggest(&self, query: &str) -> BoxFuture<'static, Result<Vec<String>>> {
        self.calls.lock().unwrap().push(format!("suggest {query}"));
        let list = vec![format!("{query}don"), format!("{query}g Beach")];
        async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(list)
        }
        .boxed()
    }

    fn trending(&self) -> BoxFuture<'static, Result<Vec<String>>> {
        async { Ok(vec!["eclipse".to_string()]) }.boxed()
    }

    fn shortcuts(&self) -> BoxFuture<'static, Result<Vec<Shortcut>>> {
        async { Ok(vec![]) }.boxed()
    }
}

fn setup(path: &str, store: Store) -> (Arc<ScriptedApi>, Runtime, App) {
    let api = Arc::new(ScriptedApi::default());
    let runtime = Runtime::new(api.clone());
    let app = App::new(Config::default(), store, MemoryHistory::new(path));
    (api, runtime, app)
}

#[tokio::test(start_paused = true)]
async fn typing_selecting_and_submitting_a_suggestion() {
    let (api, mut runtime, mut app) = setup("/", Store::in_memory());
    runtime.dispatch(&mut app, &Event::Start).unwrap();
    runtime.run_until_idle(&mut app).await;

    runtime
        .dispatch(&mut app, &Event::Suggest(SuggestEvent::InputChanged("weather Lon".to_string())))
        .unwrap();
    runtime.run_until_idle(&mut app).await;

    let items: Vec<String> = app
        .compute_viewmodel()
        .dropdown
        .map(|d| d.items.into_iter().map(|i| i.text).collect())
        .unwrap_or_default();
    assert_eq!(items, vec!["weather London", "weather Long Beach"]);

    runtime
        .dispatch(&mut app, &Event::Suggest(SuggestEvent::Key(Key::ArrowDown)))
        .unwrap();
    runtime
        .dispatch(&mut app, &Event::Suggest(SuggestEvent::Key(Key::Enter)))
        .unwrap();
    runtime.run_until_idle(&mut app).await;

    assert_eq!(app.current_path(), Some("/search?q=weather%20London"));
    assert_eq!(app.store().get().recent_searches, vec!["weather London"]);
    assert_eq!(
        api.calls(),
        vec!["suggest weather Lon", "search Web weather London p1"]
    );

    let vm = app.compute_viewmodel();
    assert!(vm.dropdown.is_none());
    let PageBody::Results(results) = vm.body else {
        panic!("expected results page");
    };
    assert_eq!(results.rows.len(), 1);
    assert_eq!(results.summary.as_deref(), Some("About 1,230 results (0.12s)"));

    let screen = render_to_string(&app.compute_viewmodel());
    assert!(screen.contains("1. weather London forecast <https://weather.test>"), "{screen}");
}

#[tokio::test(start_paused = true)]
async fn back_returns_home_with_the_recent_search() {
    let (_, mut runtime, mut app) = setup("/", Store::in_memory());
    runtime.dispatch(&mut app, &Event::Start).unwrap();
    runtime
        .dispatch(&mut app, &Event::Suggest(SuggestEvent::InputChanged("rust".to_string())))
        .unwrap();
    runtime
        .dispatch(&mut app, &Event::Suggest(SuggestEvent::Key(Key::Enter)))
        .unwrap();
    runtime.run_until_idle(&mut app).await;
    assert_eq!(app.current_path(), Some("/search?q=rust"));

    assert!(app.router_mut().history_mut().back());
    runtime.dispatch(&mut app, &Event::PopState).unwrap();
    runtime.run_until_idle(&mut app).await;

    let PageBody::Home(home) = app.compute_viewmodel().body else {
        panic!("expected home page");
    };
    assert_eq!(home.recent, vec!["rust"]);
    assert_eq!(home.trending, vec!["eclipse"]);
}

#[tokio::test(start_paused = true)]
async fn image_grid_loads_pages_as_the_sentinel_shows() {
    let (api, mut runtime, mut app) = setup("/images?q=cats", Store::in_memory());
    runtime.dispatch(&mut app, &Event::Start).unwrap();
    runtime.run_until_idle(&mut app).await;

    let sentinel_of = |app: &App| match app.compute_viewmodel().body {
        PageBody::Results(view) => view.sentinel,
        _ => None,
    };
    let sentinel = sentinel_of(&app).expect("grid sentinel");
    assert!(!sentinel.loading);
    assert!(!sentinel.exhausted);

    let id = match app.page() {
        search_shell::app::PageState::Results(page) => match &page.content {
            search_shell::app::ResultsContent::Grid { scroll, .. } => scroll.sentinel(),
            search_shell::app::ResultsContent::Paged { .. } => panic!("expected grid"),
        },
        _ => panic!("expected results"),
    };
    runtime.dispatch(&mut app, &Event::SentinelVisible(id)).unwrap();
    runtime.run_until_idle(&mut app).await;

    assert_eq!(
        api.calls(),
        vec!["search Images cats p1", "search Images cats p2"]
    );
    let PageBody::Results(view) = app.compute_viewmodel().body else {
        panic!("expected results page");
    };
    assert_eq!(view.rows.len(), 6);
    assert!(view.sentinel.is_some_and(|s| s.exhausted));
}

#[tokio::test(start_paused = true)]
async fn recent_searches_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = Store::load(Box::new(JsonFileStorage::new(dir.path())));
        let (_, mut runtime, mut app) = setup("/", store);
        runtime.dispatch(&mut app, &Event::Start).unwrap();
        runtime.dispatch(&mut app, &Event::Navigate("/history".to_string())).unwrap();
        app.store().record_search("weather London");
        app.store().record_search("rust book");
    }

    let store = Store::load(Box::new(JsonFileStorage::new(dir.path())));
    let (_, mut runtime, mut app) = setup("/history", store);
    runtime.dispatch(&mut app, &Event::Start).unwrap();

    let PageBody::History { entries } = app.compute_viewmodel().body else {
        panic!("expected history page");
    };
    assert_eq!(entries, vec!["rust book", "weather London"]);
}
