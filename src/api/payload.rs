//! Wire shapes accepted from the suggestion endpoints.

use serde::Deserialize;

/// Body of `/api/suggest` and `/api/suggest/trending`.
///
/// Both a bare array and an object wrapping a `suggestions` array are
/// accepted; entries may be strings or `{ "text": ... }` objects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SuggestPayload {
    /// `["a", "b"]`
    Plain(Vec<SuggestEntry>),
    /// `{"suggestions": [...]}`
    Wrapped {
        /// Wrapped entries.
        suggestions: Vec<SuggestEntry>,
    },
}

/// One completion entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SuggestEntry {
    /// Bare string.
    Text(String),
    /// Object with a `text` field; other fields are ignored.
    Object {
        /// Completion text.
        text: String,
    },
}

impl SuggestPayload {
    /// Flattens the payload into completion strings, dropping blanks.
    #[must_use]
    pub fn into_texts(self) -> Vec<String> {
        let entries = match self {
            Self::Plain(entries) | Self::Wrapped { suggestions: entries } => entries,
        };
        entries
            .into_iter()
            .map(|e| match e {
                SuggestEntry::Text(text) | SuggestEntry::Object { text } => text,
            })
            .filter(|t| !t.trim().is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_both_shapes() {
        let plain: SuggestPayload = serde_json::from_str(r#"["a","b",""]"#).unwrap();
        assert_eq!(plain.into_texts(), vec!["a", "b"]);

        let wrapped: SuggestPayload =
            serde_json::from_str(r#"{"suggestions":[{"text":"x","score":3},"y"]}"#).unwrap();
        assert_eq!(wrapped.into_texts(), vec!["x", "y"]);
    }
}
