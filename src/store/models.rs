//! Persisted application state.
//!
//! The whole state is serialised as a single JSON blob:
//!
//! ```json
//! {
//!   "recentSearches": ["weather London", "rust tokio"],
//!   "settings": {
//!     "safeSearch": "moderate",
//!     "resultsPerPage": 10,
//!     "region": "us",
//!     "language": "en",
//!     "theme": "system",
//!     "openInNewTab": false,
//!     "showThumbnails": true,
//!     "infiniteScroll": true
//!   }
//! }
//! ```

use crate::domain::SafeSearch;
use serde::{Deserialize, Serialize};

/// Storage key the state blob lives under.
pub const STORAGE_KEY: &str = "search-shell:state";

/// Maximum number of recent searches kept.
pub const MAX_RECENT_SEARCHES: usize = 20;

/// Colour scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    /// Follow the platform.
    #[default]
    System,
    /// Light theme.
    Light,
    /// Dark theme.
    Dark,
}

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Default safe-search level for result requests.
    pub safe_search: SafeSearch,
    /// Default page size.
    pub results_per_page: u32,
    /// Default region code.
    pub region: String,
    /// Default language code.
    pub language: String,
    /// Colour scheme.
    pub theme: ColorScheme,
    /// Open results in a new tab.
    pub open_in_new_tab: bool,
    /// Show thumbnails next to results.
    pub show_thumbnails: bool,
    /// Load grid verticals incrementally instead of paging.
    pub infinite_scroll: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            safe_search: SafeSearch::Moderate,
            results_per_page: 10,
            region: "us".to_string(),
            language: "en".to_string(),
            theme: ColorScheme::System,
            open_in_new_tab: false,
            show_thumbnails: true,
            infinite_scroll: true,
        }
    }
}

/// Complete persisted state owned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    /// Most-recent-first, deduplicated, at most [`MAX_RECENT_SEARCHES`].
    #[serde(default)]
    pub recent_searches: Vec<String>,

    /// User preferences.
    #[serde(default)]
    pub settings: Settings,
}

/// Partial update applied by `Store::set`. Present fields replace the
/// corresponding top-level field wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatePatch {
    /// Replacement recent-search list.
    pub recent_searches: Option<Vec<String>>,
    /// Replacement settings.
    pub settings: Option<Settings>,
}

impl StatePatch {
    /// Patch replacing only the recent searches.
    #[must_use]
    pub const fn recent_searches(list: Vec<String>) -> Self {
        Self {
            recent_searches: Some(list),
            settings: None,
        }
    }

    /// Patch replacing only the settings.
    #[must_use]
    pub const fn settings(settings: Settings) -> Self {
        Self {
            recent_searches: None,
            settings: Some(settings),
        }
    }
}

impl PersistedState {
    /// Applies a one-level-deep merge.
    pub fn merge(&mut self, patch: StatePatch) {
        if let Some(list) = patch.recent_searches {
            self.recent_searches = list;
        }
        if let Some(settings) = patch.settings {
            self.settings = settings;
        }
    }

    /// Restores the recent-search invariants on a freshly loaded blob.
    pub(crate) fn normalize(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.recent_searches.retain(|q| seen.insert(q.clone()));
        self.recent_searches.truncate(MAX_RECENT_SEARCHES);
    }
}

/// Returns `list` with `query` moved (or inserted) at the front.
///
/// The query is trimmed; empty queries leave the list unchanged. Duplicates
/// are detected by exact match and the result is capped at `cap` entries.
///
/// ```
/// use search_shell::store::record_into;
///
/// let list = vec!["a".to_string(), "b".to_string()];
/// assert_eq!(record_into(&list, " b ", 20), vec!["b", "a"]);
/// ```
#[must_use]
pub fn record_into(list: &[String], query: &str, cap: usize) -> Vec<String> {
    let query = query.trim();
    if query.is_empty() {
        return list.to_vec();
    }

    let mut out = Vec::with_capacity(list.len() + 1);
    out.push(query.to_string());
    out.extend(list.iter().filter(|q| q.as_str() != query).cloned());
    out.truncate(cap);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_moves_existing_entry_to_front() {
        let list: Vec<String> = ["x", "y", "z"].iter().map(ToString::to_string).collect();
        let out = record_into(&list, "z", MAX_RECENT_SEARCHES);
        assert_eq!(out, vec!["z", "x", "y"]);
    }

    #[test]
    fn record_is_case_sensitive_for_duplicates() {
        let list = vec!["Rust".to_string()];
        assert_eq!(record_into(&list, "rust", 20), vec!["rust", "Rust"]);
    }

    #[test]
    fn record_caps_length() {
        let list: Vec<String> = (0..MAX_RECENT_SEARCHES).map(|i| format!("q{i}")).collect();
        let out = record_into(&list, "new", MAX_RECENT_SEARCHES);
        assert_eq!(out.len(), MAX_RECENT_SEARCHES);
        assert_eq!(out[0], "new");
        assert!(!out.contains(&format!("q{}", MAX_RECENT_SEARCHES - 1)));
    }

    #[test]
    fn settings_fill_missing_fields_with_defaults() {
        let state: PersistedState =
            serde_json::from_str(r#"{"settings":{"region":"de"}}"#).unwrap_or_default();
        assert_eq!(state.settings.region, "de");
        assert_eq!(state.settings.results_per_page, 10);
        assert!(state.recent_searches.is_empty());
    }

    #[test]
    fn serialized_keys_are_camel_case() {
        let json = serde_json::to_value(PersistedState::default()).unwrap_or_default();
        assert!(json.get("recentSearches").is_some());
        assert_eq!(json["settings"]["resultsPerPage"], 10);
        assert_eq!(json["settings"]["safeSearch"], "moderate");
    }

    #[test]
    fn normalize_dedupes_and_caps() {
        let mut state = PersistedState {
            recent_searches: (0..30).map(|i| format!("q{}", i % 25)).collect(),
            settings: Settings::default(),
        };
        state.normalize();
        assert_eq!(state.recent_searches.len(), MAX_RECENT_SEARCHES);
        assert_eq!(state.recent_searches[0], "q0");
    }
}
