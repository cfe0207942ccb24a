//! Search request and response models.
//!
//! [`SearchQuery`] is the typed form of a result page's URL: the free-text
//! query, the page number and the vertical-specific filters. It converts in
//! both directions, from route query parameters and back into URLs for
//! pagination links, and into the backend's query-parameter list.
//!
//! Responses are generic over the result item so each vertical can decode its
//! own shape; the application stores them as [`ResultItem`] unions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result vertical. Each vertical has a route and a backend endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vertical {
    /// General web results.
    Web,
    /// Image grid.
    Images,
    /// Video results.
    Videos,
    /// News articles.
    News,
}

impl Vertical {
    /// All verticals in tab order.
    pub const ALL: [Self; 4] = [Self::Web, Self::Images, Self::Videos, Self::News];

    /// Application route serving this vertical.
    #[must_use]
    pub const fn route(self) -> &'static str {
        match self {
            Self::Web => "/search",
            Self::Images => "/images",
            Self::Videos => "/videos",
            Self::News => "/news",
        }
    }

    /// Backend endpoint for this vertical.
    #[must_use]
    pub const fn api_path(self) -> &'static str {
        match self {
            Self::Web => "/api/search",
            Self::Images => "/api/search/images",
            Self::Videos => "/api/search/videos",
            Self::News => "/api/search/news",
        }
    }

    /// Tab label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Web => "All",
            Self::Images => "Images",
            Self::Videos => "Videos",
            Self::News => "News",
        }
    }

    /// Whether results render as a grid loaded incrementally.
    #[must_use]
    pub const fn is_grid(self) -> bool {
        matches!(self, Self::Images)
    }
}

/// Recency filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    /// No restriction.
    #[default]
    Any,
    /// Past 24 hours.
    Day,
    /// Past week.
    Week,
    /// Past month.
    Month,
    /// Past year.
    Year,
}

impl TimeRange {
    /// Parameter value, `None` for [`TimeRange::Any`].
    #[must_use]
    pub const fn as_param(self) -> Option<&'static str> {
        match self {
            Self::Any => None,
            Self::Day => Some("day"),
            Self::Week => Some("week"),
            Self::Month => Some("month"),
            Self::Year => Some("year"),
        }
    }

    /// Parses a parameter value; unknown values map to `Any`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "day" => Self::Day,
            "week" => Self::Week,
            "month" => Self::Month,
            "year" => Self::Year,
            _ => Self::Any,
        }
    }
}

/// Safe-search level, shared by filters and persisted settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafeSearch {
    /// No filtering.
    Off,
    /// Default filtering.
    #[default]
    Moderate,
    /// Strict filtering.
    Strict,
}

impl SafeSearch {
    /// Parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Moderate => "moderate",
            Self::Strict => "strict",
        }
    }

    /// Parses a parameter value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "off" => Some(Self::Off),
            "moderate" => Some(Self::Moderate),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }
}

/// Vertical-independent result filters carried in the URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchFilters {
    /// Recency restriction.
    pub time_range: TimeRange,
    /// Region code such as `us`.
    pub region: Option<String>,
    /// Language code such as `en`.
    pub language: Option<String>,
    /// Explicit safe-search override.
    pub safe_search: Option<SafeSearch>,
    /// Restrict results to this site.
    pub site: Option<String>,
    /// Exclude this site.
    pub exclude_site: Option<String>,
    /// Lens id.
    pub lens: Option<String>,
    /// Disable query rewriting.
    pub verbatim: bool,
}

/// Typed search request for one result page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free-text query.
    pub q: String,
    /// One-based page number.
    pub page: u32,
    /// Results per page, `None` to use the backend default.
    pub per_page: Option<u32>,
    /// Active filters.
    pub filters: SearchFilters,
}

impl SearchQuery {
    /// Creates a first-page query without filters.
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            page: 1,
            per_page: None,
            filters: SearchFilters::default(),
        }
    }

    /// Builds a query from route query parameters.
    ///
    /// Missing or malformed `page` falls back to 1; empty strings count as unset.
    #[must_use]
    pub fn from_query_params(params: &BTreeMap<String, String>) -> Self {
        let text = |key: &str| {
            params
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        let page = params
            .get("page")
            .and_then(|p| p.parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        let per_page = params
            .get("per_page")
            .and_then(|p| p.parse::<u32>().ok())
            .filter(|p| *p >= 1);

        Self {
            q: params.get("q").cloned().unwrap_or_default(),
            page,
            per_page,
            filters: SearchFilters {
                time_range: params
                    .get("time_range")
                    .map_or(TimeRange::Any, |v| TimeRange::parse(v)),
                region: text("region"),
                language: text("language"),
                safe_search: params.get("safe_search").and_then(|v| SafeSearch::parse(v)),
                site: text("site"),
                exclude_site: text("exclude_site"),
                lens: text("lens"),
                verbatim: params
                    .get("verbatim")
                    .is_some_and(|v| v == "1" || v == "true"),
            },
        }
    }

    /// Returns a copy pointing at another page.
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    /// Whether `other` differs in anything but the page number.
    #[must_use]
    pub fn same_search(&self, other: &Self) -> bool {
        self.q == other.q && self.per_page == other.per_page && self.filters == other.filters
    }

    /// Parameters for the backend request, omitting unset and empty values.
    #[must_use]
    pub fn api_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("q", self.q.clone())];
        pairs.push(("page", self.page.to_string()));
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page", per_page.to_string()));
        }
        self.push_filters(&mut pairs);
        pairs.retain(|(_, v)| !v.is_empty());
        pairs
    }

    /// In-app URL for this query on the given vertical.
    ///
    /// Page 1 is left implicit so a fresh search and its first page share a URL.
    ///
    /// ```
    /// use search_shell::domain::{SearchQuery, Vertical};
    ///
    /// let url = SearchQuery::new("weather London").to_route_url(Vertical::Web);
    /// assert_eq!(url, "/search?q=weather%20London");
    /// ```
    #[must_use]
    pub fn to_route_url(&self, vertical: Vertical) -> String {
        let mut pairs = vec![("q", self.q.clone())];
        if self.page > 1 {
            pairs.push(("page", self.page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page", per_page.to_string()));
        }
        self.push_filters(&mut pairs);
        pairs.retain(|(_, v)| !v.is_empty());
        format!("{}?{}", vertical.route(), encode_pairs(&pairs))
    }

    fn push_filters(&self, pairs: &mut Vec<(&'static str, String)>) {
        let f = &self.filters;
        if let Some(time) = f.time_range.as_param() {
            pairs.push(("time_range", time.to_string()));
        }
        let optional = [
            ("region", &f.region),
            ("language", &f.language),
            ("site", &f.site),
            ("exclude_site", &f.exclude_site),
            ("lens", &f.lens),
        ];
        for (key, value) in optional {
            if let Some(v) = value {
                pairs.push((key, v.clone()));
            }
        }
        if let Some(safe) = f.safe_search {
            pairs.push(("safe_search", safe.as_str().to_string()));
        }
        if f.verbatim {
            pairs.push(("verbatim", "1".to_string()));
        }
    }
}

/// Percent-encodes `key=value` pairs joined by `&`; spaces become `%20`.
#[must_use]
pub fn encode_pairs(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    10
}

/// Response envelope shared by every search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse<T> {
    /// Query as understood by the backend.
    #[serde(default)]
    pub query: String,

    /// Result items for the requested page.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,

    /// Estimated total hit count.
    #[serde(default)]
    pub total_results: u64,

    /// Page these results belong to.
    #[serde(default = "default_page")]
    pub page: u32,

    /// Page size used by the backend.
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Whether another page exists.
    #[serde(default)]
    pub has_more: bool,

    /// Backend timing.
    #[serde(default)]
    pub search_time_ms: f64,

    /// Spelling correction offered by the backend.
    #[serde(default)]
    pub corrected_query: Option<String>,

    /// Instant answer shown above results.
    #[serde(default)]
    pub instant_answer: Option<InstantAnswer>,

    /// Related queries.
    #[serde(default)]
    pub related_searches: Vec<String>,
}

impl<T> SearchResponse<T> {
    /// Converts the result items, keeping the envelope.
    pub fn map_results<U>(self, f: impl FnMut(T) -> U) -> SearchResponse<U> {
        SearchResponse {
            query: self.query,
            results: self.results.into_iter().map(f).collect(),
            total_results: self.total_results,
            page: self.page,
            per_page: self.per_page,
            has_more: self.has_more,
            search_time_ms: self.search_time_ms,
            corrected_query: self.corrected_query,
            instant_answer: self.instant_answer,
            related_searches: self.related_searches,
        }
    }
}

/// Web result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebResult {
    /// Target URL.
    pub url: String,
    /// Page title.
    pub title: String,
    /// Text excerpt.
    #[serde(default)]
    pub snippet: String,
    /// Display domain.
    #[serde(default)]
    pub domain: Option<String>,
    /// Publication time when known.
    #[serde(default)]
    pub published: Option<DateTime<Utc>>,
}

/// Image result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    /// Full-size image URL.
    pub url: String,
    /// Thumbnail URL.
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Caption.
    #[serde(default)]
    pub title: String,
    /// Hosting page domain.
    #[serde(default)]
    pub source_domain: Option<String>,
    /// Pixel width.
    #[serde(default)]
    pub width: Option<u32>,
    /// Pixel height.
    #[serde(default)]
    pub height: Option<u32>,
}

/// Video result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoResult {
    /// Watch URL.
    pub url: String,
    /// Title.
    pub title: String,
    /// Thumbnail URL.
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Display duration, e.g. `12:04`.
    #[serde(default)]
    pub duration: Option<String>,
    /// Publishing channel.
    #[serde(default)]
    pub channel: Option<String>,
    /// View count.
    #[serde(default)]
    pub views: Option<u64>,
    /// Publication time.
    #[serde(default)]
    pub published: Option<DateTime<Utc>>,
}

/// News article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsResult {
    /// Article URL.
    pub url: String,
    /// Headline.
    pub title: String,
    /// Lead paragraph.
    #[serde(default)]
    pub snippet: String,
    /// Publisher name.
    #[serde(default)]
    pub source: String,
    /// Article image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Publication time.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// Result item of any vertical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultItem {
    /// Web result.
    Web(WebResult),
    /// Image result.
    Image(ImageResult),
    /// Video result.
    Video(VideoResult),
    /// News article.
    News(NewsResult),
}

impl ResultItem {
    /// Title shown for the item.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Web(r) => &r.title,
            Self::Image(r) => &r.title,
            Self::Video(r) => &r.title,
            Self::News(r) => &r.title,
        }
    }

    /// Link target.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Web(r) => &r.url,
            Self::Image(r) => &r.url,
            Self::Video(r) => &r.url,
            Self::News(r) => &r.url,
        }
    }

    /// Publication time if the item carries one.
    #[must_use]
    pub const fn published(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Web(r) => r.published,
            Self::Video(r) => r.published,
            Self::News(r) => r.published_at,
            Self::Image(_) => None,
        }
    }
}

/// Instant answer attached to a web response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InstantAnswer {
    /// Arithmetic evaluation.
    Calculator {
        /// Input expression.
        expression: String,
        /// Formatted result.
        result: String,
    },
    /// Unit conversion.
    Conversion {
        /// Source amount.
        from_value: f64,
        /// Source unit.
        from_unit: String,
        /// Converted amount.
        to_value: f64,
        /// Target unit.
        to_unit: String,
    },
    /// Currency conversion.
    Currency {
        /// Source amount.
        amount: f64,
        /// Source currency code.
        from: String,
        /// Target currency code.
        to: String,
        /// Converted amount.
        result: f64,
    },
    /// Current weather.
    Weather {
        /// Place name.
        location: String,
        /// Temperature in degrees Celsius.
        temperature: f64,
        /// Short condition text.
        condition: String,
    },
    /// Dictionary definition.
    Definition {
        /// Defined word.
        word: String,
        /// Definitions, most common first.
        #[serde(default)]
        definitions: Vec<String>,
    },
    /// Local time.
    Time {
        /// Place name.
        location: String,
        /// Formatted time.
        time: String,
    },
    /// Answer type this client does not know.
    #[serde(other)]
    Unknown,
}

impl InstantAnswer {
    /// One-line summary, `None` for unknown answer types.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        match self {
            Self::Calculator { expression, result } => Some(format!("{expression} = {result}")),
            Self::Conversion {
                from_value,
                from_unit,
                to_value,
                to_unit,
            } => Some(format!("{from_value} {from_unit} = {to_value} {to_unit}")),
            Self::Currency {
                amount,
                from,
                to,
                result,
            } => Some(format!("{amount} {from} = {result:.2} {to}")),
            Self::Weather {
                location,
                temperature,
                condition,
            } => Some(format!("{location}: {temperature:.0}°C, {condition}")),
            Self::Definition { word, definitions } => definitions
                .first()
                .map(|d| format!("{word}: {d}")),
            Self::Time { location, time } => Some(format!("{location}: {time}")),
            Self::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn query_params_parse_with_defaults() {
        let q = SearchQuery::from_query_params(&params(&[("q", "rust"), ("page", "0")]));
        assert_eq!(q.q, "rust");
        assert_eq!(q.page, 1);
        assert_eq!(q.filters, SearchFilters::default());

        let q = SearchQuery::from_query_params(&params(&[
            ("q", "rust"),
            ("page", "3"),
            ("time_range", "week"),
            ("site", " docs.rs "),
            ("region", ""),
            ("verbatim", "1"),
        ]));
        assert_eq!(q.page, 3);
        assert_eq!(q.filters.time_range, TimeRange::Week);
        assert_eq!(q.filters.site.as_deref(), Some("docs.rs"));
        assert_eq!(q.filters.region, None);
        assert!(q.filters.verbatim);
    }

    #[test]
    fn api_pairs_omit_unset_values() {
        let mut q = SearchQuery::new("rust");
        q.filters.lens = Some("dev".into());
        let pairs = q.api_pairs();
        assert_eq!(
            pairs,
            vec![
                ("q", "rust".to_string()),
                ("page", "1".to_string()),
                ("lens", "dev".to_string()),
            ]
        );
    }

    #[test]
    fn route_url_embeds_page_after_first() {
        let q = SearchQuery::new("a b").with_page(4);
        assert_eq!(q.to_route_url(Vertical::News), "/news?q=a%20b&page=4");
        assert!(q.same_search(&SearchQuery::new("a b")));
    }

    #[test]
    fn response_decodes_with_missing_fields_and_unknown_answer() {
        let json = r#"{"results":[{"url":"https://a","title":"A"}],
            "instant_answer":{"type":"horoscope","sign":"leo"}}"#;
        let resp: SearchResponse<WebResult> = serde_json::from_str(json).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(resp.page, 1);
        assert_eq!(resp.per_page, 10);
        assert_eq!(resp.results[0].snippet, "");
        assert_eq!(resp.instant_answer, Some(InstantAnswer::Unknown));
    }

    #[test]
    fn instant_answer_summaries() {
        let calc = InstantAnswer::Calculator {
            expression: "2+2".into(),
            result: "4".into(),
        };
        assert_eq!(calc.summary().as_deref(), Some("2+2 = 4"));
        let empty = InstantAnswer::Definition {
            word: "x".into(),
            definitions: vec![],
        };
        assert_eq!(empty.summary(), None);
    }
}
