//! Local suggestion sources: the cached shortcut directory and recent searches.

use crate::domain::{Shortcut, Suggestion};

/// Shortcut entries matching `input` (with or without the leading sentinel).
///
/// An entry matches when its trigger starts with the typed remainder or its
/// name contains it, both case-insensitive. At most `limit` entries are kept,
/// in directory order.
#[must_use]
pub fn filter_shortcuts(directory: &[Shortcut], input: &str, limit: usize) -> Vec<Suggestion> {
    let needle = input
        .trim()
        .trim_start_matches(crate::domain::SHORTCUT_SENTINEL)
        .trim()
        .to_lowercase();

    directory
        .iter()
        .filter(|s| {
            s.normalized_trigger().to_lowercase().starts_with(&needle)
                || s.name.to_lowercase().contains(&needle)
        })
        .take(limit)
        .map(|s| Suggestion::bang(s.normalized_trigger(), s.name.clone()))
        .collect()
}

/// Recent searches containing `filter` (case-insensitive), as suggestions.
///
/// An empty filter keeps every entry.
#[must_use]
pub fn recent_suggestions(recent: &[String], filter: &str, limit: usize) -> Vec<Suggestion> {
    let needle = filter.trim().to_lowercase();
    recent
        .iter()
        .filter(|q| needle.is_empty() || q.to_lowercase().contains(&needle))
        .take(limit)
        .map(Suggestion::recent)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> Vec<Shortcut> {
        [("!g", "Google"), ("gh", "GitHub"), ("w", "Wikipedia"), ("yt", "YouTube")]
            .iter()
            .map(|(t, n)| Shortcut {
                trigger: (*t).into(),
                name: (*n).into(),
                url_template: None,
                category: None,
            })
            .collect()
    }

    #[test]
    fn shortcuts_match_trigger_prefix_or_name() {
        let dir = directory();
        let hits = filter_shortcuts(&dir, "!g", 8);
        assert_eq!(
            hits,
            vec![Suggestion::bang("g", "Google"), Suggestion::bang("gh", "GitHub")]
        );

        let by_name = filter_shortcuts(&dir, "!TUBE", 8);
        assert_eq!(by_name, vec![Suggestion::bang("yt", "YouTube")]);

        assert_eq!(filter_shortcuts(&dir, "!", 2).len(), 2);
        assert!(filter_shortcuts(&dir, "!zzz", 8).is_empty());
    }

    #[test]
    fn recent_filter_is_case_insensitive_substring() {
        let recent = vec!["Weather London".to_string(), "rust".to_string()];
        assert_eq!(
            recent_suggestions(&recent, "LOND", 8),
            vec![Suggestion::recent("Weather London")]
        );
        assert_eq!(recent_suggestions(&recent, "  ", 8).len(), 2);
        assert_eq!(recent_suggestions(&recent, "", 1).len(), 1);
    }
}
