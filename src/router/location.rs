//! Location parsing and browser-history abstraction.

use std::collections::BTreeMap;

/// Query parameters of a location; the first occurrence of a key wins.
pub type QueryParams = BTreeMap<String, String>;

/// A parsed in-app location (`/path?query`). Fragments are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Path component, always starting with `/`.
    pub path: String,
    /// Raw query string without the leading `?`.
    pub search: String,
    /// Decoded query parameters.
    pub query: QueryParams,
}

impl Location {
    /// Parses an in-app href.
    ///
    /// ```
    /// use search_shell::router::Location;
    ///
    /// let loc = Location::parse("/search?q=a+b&q=ignored#top");
    /// assert_eq!(loc.path, "/search");
    /// assert_eq!(loc.query.get("q").map(String::as_str), Some("a b"));
    /// assert_eq!(loc.href(), "/search?q=a+b&q=ignored");
    /// ```
    #[must_use]
    pub fn parse(href: &str) -> Self {
        let without_fragment = href.split_once('#').map_or(href, |(before, _)| before);
        let (path, search) = without_fragment
            .split_once('?')
            .unwrap_or((without_fragment, ""));

        let path = if path.is_empty() {
            "/".to_string()
        } else if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        let mut query = QueryParams::new();
        for (key, value) in url::form_urlencoded::parse(search.as_bytes()) {
            query.entry(key.into_owned()).or_insert_with(|| value.into_owned());
        }

        Self {
            path,
            search: search.to_string(),
            query,
        }
    }

    /// Normalised href used for identity comparisons.
    #[must_use]
    pub fn href(&self) -> String {
        if self.search.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.search)
        }
    }
}

/// Session history the router pushes to and reads from.
///
/// A browser integration maps these onto `pushState`/`replaceState`; the
/// in-memory [`MemoryHistory`] serves headless runs and tests.
pub trait History {
    /// Current href.
    fn location(&self) -> String;

    /// Appends a new entry and makes it current.
    fn push(&mut self, href: &str);

    /// Replaces the current entry.
    fn replace(&mut self, href: &str);
}

/// In-memory history stack with back/forward support.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    index: usize,
    mutations: usize,
}

impl MemoryHistory {
    /// Creates a history whose only entry is `initial`.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            index: 0,
            mutations: 0,
        }
    }

    /// Moves one entry back. Returns `false` at the oldest entry.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Moves one entry forward. Returns `false` at the newest entry.
    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Number of entries in the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the stack is empty (never true after construction).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count of push/replace calls since construction.
    #[must_use]
    pub const fn mutations(&self) -> usize {
        self.mutations
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl History for MemoryHistory {
    fn location(&self) -> String {
        self.entries.get(self.index).cloned().unwrap_or_else(|| "/".to_string())
    }

    fn push(&mut self, href: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(href.to_string());
        self.index = self.entries.len() - 1;
        self.mutations += 1;
    }

    fn replace(&mut self, href: &str) {
        if let Some(entry) = self.entries.get_mut(self.index) {
            *entry = href.to_string();
        }
        self.mutations += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalises_missing_path() {
        let loc = Location::parse("?q=x");
        assert_eq!(loc.path, "/");
        assert_eq!(loc.href(), "/?q=x");
        assert_eq!(Location::parse("").href(), "/");
    }

    #[test]
    fn push_drops_forward_entries() {
        let mut h = MemoryHistory::new("/");
        h.push("/a");
        h.push("/b");
        assert!(h.back());
        h.push("/c");
        assert_eq!(h.len(), 3);
        assert!(!h.forward());
        assert_eq!(h.location(), "/c");
        assert_eq!(h.mutations(), 3);
    }

    #[test]
    fn replace_keeps_length() {
        let mut h = MemoryHistory::default();
        h.replace("/x");
        assert_eq!(h.len(), 1);
        assert_eq!(h.location(), "/x");
        assert!(!h.back());
    }
}
