//! Shared rendering utilities.
//!
//! - **Match Highlighting**: Marks highlighted character ranges in text
//! - **UTF-8 Safe**: Operates on character indices, not byte indices
//!
//! # Example
//!
//! ```rust
//! use search_shell::ui::helpers::highlight;
//!
//! assert_eq!(highlight("weather london", &[(8, 11)]), "weather [lon]don");
//! ```

/// Opening marker around a highlighted section.
pub const MARK_OPEN: char = '[';

/// Closing marker around a highlighted section.
pub const MARK_CLOSE: char = ']';

/// Returns `text` with each range wrapped in [`MARK_OPEN`]/[`MARK_CLOSE`].
///
/// # Parameters
///
/// * `text` - The text to mark up
/// * `ranges` - Character index ranges `(start, end)`, end exclusive, sorted
///   and non-overlapping as produced by the view model
///
/// Ranges running past the end of the text are clamped; empty or
/// out-of-order ranges are skipped.
#[must_use]
pub fn highlight(text: &str, ranges: &[(usize, usize)]) -> String {
    if ranges.is_empty() {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + ranges.len() * 2);
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start < current_pos || end <= start {
            continue;
        }

        out.extend(&chars[current_pos..start]);
        out.push(MARK_OPEN);
        out.extend(&chars[start..end]);
        out.push(MARK_CLOSE);
        current_pos = end;
    }

    out.extend(&chars[current_pos..]);
    out
}

/// Checkbox glyph for a boolean setting.
#[must_use]
pub const fn checkbox(on: bool) -> &'static str {
    if on {
        "[x]"
    } else {
        "[ ]"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlights_multiple_ranges() {
        assert_eq!(highlight("my-project", &[(0, 2), (3, 4)]), "[my]-[p]roject");
    }

    #[test]
    fn no_ranges_returns_text() {
        assert_eq!(highlight("plain", &[]), "plain");
    }

    #[test]
    fn works_on_characters_not_bytes() {
        assert_eq!(highlight("café au lait", &[(3, 4)]), "caf[é] au lait");
    }

    #[test]
    fn clamps_and_skips_bad_ranges() {
        assert_eq!(highlight("abc", &[(1, 10)]), "a[bc]");
        assert_eq!(highlight("abc", &[(2, 2), (5, 6)]), "abc");
    }

    #[test]
    fn checkbox_glyphs() {
        assert_eq!(checkbox(true), "[x]");
        assert_eq!(checkbox(false), "[ ]");
    }
}
