//! search-shell: a headless application shell for a multi-vertical search UI.
//!
//! The crate implements the interactive parts of a search front end (web,
//! images, videos, news) without a DOM:
//! - A client-side router mapping URL paths to typed page models
//! - A reactive store persisting preferences and recent searches
//! - A debounced autocomplete controller with keyboard selection state
//! - Classic pagination and intersection-driven infinite scroll
//! - A tokio runtime executing timers and backend requests

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI driver (main.rs)                               │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Runtime (runtime/)                                 │  ← Timers, fetches
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, page setup                       │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!     │            │             │              │
//! ┌─────────┐ ┌──────────┐ ┌───────────┐ ┌────────────┐
//! │ router/ │ │ store/   │ │ suggest/  │ │ paginate/  │
//! └─────────┘ └──────────┘ └───────────┘ └────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain, API client, infrastructure, observability  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`api`]: `SearchApi` trait and the `reqwest` implementation
//! - [`app`]: Application state machine with event/action model
//! - [`domain`]: Queries, responses, suggestions, errors
//! - [`infrastructure`]: Platform paths
//! - [`paginate`]: Page windows and the infinite-scroll coordinator
//! - [`router`]: Path matcher, router and history
//! - [`runtime`]: Async executor for actions
//! - [`store`]: Reactive persisted state
//! - [`suggest`]: Autocomplete controller
//! - [`ui`]: View models and the text renderer
//! - `observability`: Tracing subscriber setup
//!
//! # Configuration
//!
//! ```toml
//! api_base_url = "http://localhost:8080"
//! trace_level = "debug"
//! debounce_ms = 150
//! max_pages = 100
//! ```
//!
//! # Example
//!
//! ```rust
//! use search_shell::{handle_event, App, Config, Event};
//! use search_shell::router::MemoryHistory;
//! use search_shell::store::Store;
//!
//! let mut app = App::new(Config::default(), Store::in_memory(), MemoryHistory::new("/settings"));
//! let (render, _actions) = handle_event(&mut app, &Event::Start)?;
//! assert!(render);
//! assert_eq!(app.current_path(), Some("/settings"));
//! # Ok::<(), search_shell::ShellError>(())
//! ```

pub mod api;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod paginate;
pub mod router;
pub mod runtime;
pub mod store;
pub mod suggest;
pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, App, Event};
pub use domain::{Result, ShellError};

use crate::store::{JsonFileStorage, Store};
use crate::suggest::SuggestConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Shell configuration.
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the backend serving `/api/...`. Default:
    /// `"http://localhost:8080"`
    pub api_base_url: String,

    /// Directory for persisted state and the log file. Default: platform
    /// data directory, see [`infrastructure::paths`].
    pub data_dir: Option<PathBuf>,

    /// Tracing level filter. `RUST_LOG` takes precedence. Default: `"info"`
    pub trace_level: Option<String>,

    /// Quiet period after a keystroke before suggestions resolve.
    pub debounce_ms: u64,

    /// Delay between the input losing focus and the dropdown closing.
    pub blur_close_ms: u64,

    /// Maximum recent-search or shortcut items in the dropdown. Remote
    /// completions are shown in full.
    pub suggestion_limit: usize,

    /// Recent searches listed on the home page.
    pub recent_limit: usize,

    /// Highest reachable page number.
    pub max_pages: u32,

    /// Number of page buttons shown at once.
    pub page_window: u32,

    /// Lookahead margin of the infinite-scroll sentinel.
    pub scroll_margin_px: u32,

    /// Per-request timeout for backend calls.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            data_dir: None,
            trace_level: None,
            debounce_ms: 150,
            blur_close_ms: 200,
            suggestion_limit: 8,
            recent_limit: 10,
            max_pages: paginate::MAX_PAGES,
            page_window: paginate::PAGE_WINDOW,
            scroll_margin_px: 400,
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Parses configuration from a string map, e.g. environment-style
    /// overrides.
    ///
    /// Unknown keys are ignored; values that fail to parse keep their default.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use search_shell::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("debounce_ms".to_string(), "250".to_string());
    /// map.insert("max_pages".to_string(), "lots".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.debounce_ms, 250);
    /// assert_eq!(config.max_pages, 100);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        fn parsed<T: std::str::FromStr>(map: &BTreeMap<String, String>, key: &str, default: T) -> T {
            map.get(key)
                .and_then(|s| s.trim().parse::<T>().ok())
                .unwrap_or(default)
        }

        let defaults = Self::default();
        let text = |key: &str| {
            map.get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        Self {
            api_base_url: text("api_base_url").unwrap_or(defaults.api_base_url),
            data_dir: text("data_dir").map(PathBuf::from),
            trace_level: text("trace_level"),
            debounce_ms: parsed(map, "debounce_ms", defaults.debounce_ms),
            blur_close_ms: parsed(map, "blur_close_ms", defaults.blur_close_ms),
            suggestion_limit: parsed(map, "suggestion_limit", defaults.suggestion_limit),
            recent_limit: parsed(map, "recent_limit", defaults.recent_limit),
            max_pages: parsed(map, "max_pages", defaults.max_pages),
            page_window: parsed(map, "page_window", defaults.page_window),
            scroll_margin_px: parsed(map, "scroll_margin_px", defaults.scroll_margin_px),
            request_timeout_secs: parsed(map, "request_timeout_secs", defaults.request_timeout_secs),
        }
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Io`] if the file cannot be read and
    /// [`ShellError::Config`] if it is not valid TOML for this struct.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| ShellError::Config(format!("{}: {e}", path.display())))
    }

    /// Controller settings derived from this configuration.
    #[must_use]
    pub const fn suggest_config(&self) -> SuggestConfig {
        SuggestConfig {
            debounce: Duration::from_millis(self.debounce_ms),
            blur_close: Duration::from_millis(self.blur_close_ms),
            limit: self.suggestion_limit,
        }
    }

    /// Backend request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Opens the file-backed store for `config`.
///
/// The store lives in the configured data directory, or the platform default
/// when none is set.
#[must_use]
pub fn open_store(config: &Config) -> Store {
    let dir = infrastructure::paths::data_dir(config);
    tracing::debug!(dir = %dir.display(), "opening store");
    Store::load(Box::new(JsonFileStorage::new(dir)))
}
