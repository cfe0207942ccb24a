//! Suggestion and shortcut domain types.
//!
//! A [`Suggestion`] is one row of the autocomplete dropdown. Every suggestion
//! comes from exactly one source (remote endpoint, shortcut directory or the
//! local recent-search list) and the variant records which one.

use serde::{Deserialize, Serialize};

/// Character that marks the start of a shortcut ("bang") query.
pub const SHORTCUT_SENTINEL: char = '!';

/// A single autocomplete entry, discriminated by its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Suggestion {
    /// Completion returned by the remote suggestion endpoint.
    Query {
        /// Suggested query text.
        text: String,
    },

    /// Entry from the shortcut directory.
    Bang {
        /// Trigger without the sentinel (`"g"` for `!g`).
        trigger: String,
        /// Human-readable target name.
        name: String,
    },

    /// Previously submitted query from local history.
    Recent {
        /// Recorded query text.
        text: String,
    },
}

/// Source category of a [`Suggestion`], used by renderers for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestionKind {
    /// Remote completion.
    Suggestion,
    /// Shortcut directory entry.
    Bang,
    /// Local recent search.
    Recent,
}

impl Suggestion {
    /// Creates a remote completion.
    pub fn query(text: impl Into<String>) -> Self {
        Self::Query { text: text.into() }
    }

    /// Creates a recent-search entry.
    pub fn recent(text: impl Into<String>) -> Self {
        Self::Recent { text: text.into() }
    }

    /// Creates a shortcut entry; a leading sentinel on `trigger` is stripped.
    pub fn bang(trigger: &str, name: impl Into<String>) -> Self {
        Self::Bang {
            trigger: trigger.trim_start_matches(SHORTCUT_SENTINEL).to_string(),
            name: name.into(),
        }
    }

    /// Text shown in the dropdown row.
    ///
    /// For shortcuts this is the trigger including the sentinel (`!g`).
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Query { text } | Self::Recent { text } => text.clone(),
            Self::Bang { trigger, .. } => format!("{SHORTCUT_SENTINEL}{trigger}"),
        }
    }

    /// Secondary label, only present for shortcuts.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Bang { name, .. } => Some(name),
            Self::Query { .. } | Self::Recent { .. } => None,
        }
    }

    /// Source category.
    #[must_use]
    pub const fn kind(&self) -> SuggestionKind {
        match self {
            Self::Query { .. } => SuggestionKind::Suggestion,
            Self::Bang { .. } => SuggestionKind::Bang,
            Self::Recent { .. } => SuggestionKind::Recent,
        }
    }

    /// Icon name for the row.
    #[must_use]
    pub const fn icon(&self) -> &'static str {
        match self.kind() {
            SuggestionKind::Suggestion => "search",
            SuggestionKind::Bang => "bolt",
            SuggestionKind::Recent => "history",
        }
    }

    /// Sentinel-prefixed trigger for shortcut entries.
    #[must_use]
    pub fn shortcut_trigger(&self) -> Option<String> {
        match self {
            Self::Bang { trigger, .. } => Some(format!("{SHORTCUT_SENTINEL}{trigger}")),
            Self::Query { .. } | Self::Recent { .. } => None,
        }
    }
}

/// Entry in the shortcut directory served by `/api/bangs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    /// Trigger token, with or without the leading sentinel.
    pub trigger: String,

    /// Display name of the redirect target.
    pub name: String,

    /// Redirect URL with a `{query}` placeholder.
    #[serde(default)]
    pub url_template: Option<String>,

    /// Grouping label such as "Search" or "Shopping".
    #[serde(default)]
    pub category: Option<String>,
}

impl Shortcut {
    /// Trigger without the sentinel character.
    #[must_use]
    pub fn normalized_trigger(&self) -> &str {
        self.trigger.trim_start_matches(SHORTCUT_SENTINEL)
    }

    /// Expands the URL template with percent-encoded search terms.
    ///
    /// ```
    /// use search_shell::domain::Shortcut;
    ///
    /// let wiki = Shortcut {
    ///     trigger: "w".into(),
    ///     name: "Wikipedia".into(),
    ///     url_template: Some("https://en.wikipedia.org/w/index.php?search={query}".into()),
    ///     category: None,
    /// };
    /// assert_eq!(
    ///     wiki.expand("rust lang").as_deref(),
    ///     Some("https://en.wikipedia.org/w/index.php?search=rust%20lang")
    /// );
    /// ```
    #[must_use]
    pub fn expand(&self, terms: &str) -> Option<String> {
        self.url_template
            .as_ref()
            .map(|template| template.replace("{query}", &urlencoding::encode(terms)))
    }
}
