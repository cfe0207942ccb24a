//! Route pattern parsing and path matching.
//!
//! Patterns are `/`-separated sequences of literal segments and `:name`
//! parameter segments. Matching is exact-length and segment-wise: a path
//! matches only when it has as many non-empty segments as the pattern and
//! every literal segment is equal (case-sensitive).

use std::collections::BTreeMap;

/// Captured route parameters, keyed by parameter name.
///
/// An empty map is a successful match of a pattern without parameters; a
/// failed match is represented by `None` at the call site.
pub type RouteParams = BTreeMap<String, String>;

/// One segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the path segment exactly.
    Literal(String),
    /// Captures the path segment under this name.
    Param(String),
}

/// Parsed route pattern such as `/bang/:trigger`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parses a pattern; empty segments are dropped so `/` has zero segments.
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        let segments = split_path(pattern)
            .into_iter()
            .map(|seg| {
                seg.strip_prefix(':').map_or_else(
                    || Segment::Literal(seg.to_string()),
                    |name| Segment::Param(name.to_string()),
                )
            })
            .collect();

        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    /// Pattern as registered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl From<&str> for RoutePattern {
    fn from(pattern: &str) -> Self {
        Self::parse(pattern)
    }
}

/// Splits a path on `/`, dropping empty segments.
#[must_use]
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Matches a concrete path against a pattern.
///
/// Returns `None` when segment counts differ or any literal mismatches,
/// otherwise the captured, URL-decoded parameters.
///
/// ```
/// use search_shell::router::{match_path, RoutePattern};
///
/// let pattern = RoutePattern::parse("/bang/:trigger");
/// let params = match_path(&pattern, "/bang/gh%20x").unwrap_or_default();
/// assert_eq!(params.get("trigger").map(String::as_str), Some("gh x"));
///
/// assert!(match_path(&RoutePattern::parse("/"), "/").is_some_and(|p| p.is_empty()));
/// assert!(match_path(&pattern, "/bang").is_none());
/// ```
#[must_use]
pub fn match_path(pattern: &RoutePattern, path: &str) -> Option<RouteParams> {
    let parts = split_path(path);
    if parts.len() != pattern.segments.len() {
        return None;
    }

    let mut params = RouteParams::new();
    for (segment, part) in pattern.segments.iter().zip(parts) {
        match segment {
            Segment::Literal(literal) => {
                if literal != part {
                    return None;
                }
            }
            Segment::Param(name) => {
                params.insert(name.clone(), decode_segment(part));
            }
        }
    }
    Some(params)
}

/// Percent-decodes a path segment; undecodable input is kept verbatim.
fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment).map_or_else(|_| segment.to_string(), std::borrow::Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_count_mismatch_is_no_match() {
        let p = RoutePattern::parse("/search");
        assert!(match_path(&p, "/").is_none());
        assert!(match_path(&p, "/search/extra").is_none());
    }

    #[test]
    fn literal_match_is_case_sensitive_and_parameterless_match_is_empty() {
        let p = RoutePattern::parse("/search");
        assert_eq!(match_path(&p, "/search"), Some(RouteParams::new()));
        assert_eq!(match_path(&p, "//search/"), Some(RouteParams::new()));
        assert!(match_path(&p, "/Search").is_none());
    }

    #[test]
    fn params_capture_unconditionally() {
        let p = RoutePattern::parse("/a/:x/b/:y");
        let m = match_path(&p, "/a/1/b/%E2%9C%93").unwrap_or_default();
        assert_eq!(m.get("x").map(String::as_str), Some("1"));
        assert_eq!(m.get("y").map(String::as_str), Some("✓"));
        assert!(match_path(&p, "/a/1/c/2").is_none());
    }

    #[test]
    fn invalid_percent_encoding_is_captured_raw() {
        let p = RoutePattern::parse("/:v");
        let m = match_path(&p, "/%FF").unwrap_or_default();
        assert_eq!(m.get("v").map(String::as_str), Some("%FF"));
    }

    #[test]
    fn root_pattern_has_no_segments() {
        let p = RoutePattern::parse("/");
        assert!(p.segments().is_empty());
        assert_eq!(p.as_str(), "/");
        assert_eq!(match_path(&p, ""), Some(RouteParams::new()));
    }
}
