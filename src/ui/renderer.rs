//! Plain-text renderer.
//!
//! Turns a [`UIViewModel`] into a line-oriented text screen for the CLI
//! driver. Layout, top to bottom:
//!
//! ```text
//! location
//! search bar + dropdown
//! vertical tabs (results pages)
//! page body
//! ```
//!
//! Links are shown as `text <href>`; highlighted suggestion characters are
//! wrapped in brackets.

use std::fmt::Write;

use crate::domain::SuggestionKind;
use crate::paginate::PaginationView;
use crate::store::{ColorScheme, Settings};
use crate::ui::helpers::{checkbox, highlight};
use crate::ui::viewmodel::{
    BangView, HomeView, PageBody, ResultsView, SearchBarInfo, SentinelInfo, UIViewModel,
};

/// Renders the whole screen to a string.
///
/// # Example
///
/// ```rust
/// use search_shell::ui::render_to_string;
/// use search_shell::ui::viewmodel::{PageBody, SearchBarInfo, UIViewModel};
///
/// let vm = UIViewModel {
///     location: "/nowhere".to_string(),
///     search_bar: SearchBarInfo { query: String::new(), tabs: vec![] },
///     dropdown: None,
///     body: PageBody::NotFound { path: "/nowhere".to_string() },
/// };
/// let out = render_to_string(&vm);
/// assert!(out.contains("Page not found: /nowhere"));
/// ```
#[must_use]
pub fn render_to_string(vm: &UIViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "@ {}", vm.location);
    render_search_bar(&mut out, vm);

    match &vm.body {
        PageBody::Blank => {}
        PageBody::Home(home) => render_home(&mut out, home),
        PageBody::Results(results) => {
            render_tabs(&mut out, &vm.search_bar);
            render_results(&mut out, results);
        }
        PageBody::Settings(settings) => render_settings(&mut out, settings),
        PageBody::History { entries } => render_history(&mut out, entries),
        PageBody::Bang(bang) => render_bang(&mut out, bang),
        PageBody::NotFound { path } => {
            let _ = writeln!(out, "Page not found: {path}");
            let _ = writeln!(out, "Back to search </>");
        }
    }

    out
}

fn render_search_bar(out: &mut String, vm: &UIViewModel) {
    let _ = writeln!(out, "> {}", vm.search_bar.query);

    let Some(dropdown) = &vm.dropdown else {
        return;
    };

    for item in &dropdown.items {
        let marker = if item.is_selected { '>' } else { ' ' };
        let text = if item.is_selected {
            item.text.clone()
        } else {
            highlight(&item.text, &item.highlight_ranges)
        };
        let _ = write!(out, "  {marker} {} {text}", item.icon);
        if let Some(detail) = &item.detail {
            let _ = write!(out, "  ({detail})");
        }
        if item.kind == SuggestionKind::Recent {
            out.push_str("  [recent]");
        }
        out.push('\n');
    }
}

fn render_tabs(out: &mut String, bar: &SearchBarInfo) {
    if bar.tabs.is_empty() {
        return;
    }

    let tabs: Vec<String> = bar
        .tabs
        .iter()
        .map(|tab| {
            if tab.active {
                format!("*{}*", tab.label)
            } else {
                tab.label.to_string()
            }
        })
        .collect();
    let _ = writeln!(out, "{}", tabs.join(" | "));
}

fn render_home(out: &mut String, home: &HomeView) {
    if !home.recent.is_empty() {
        let _ = writeln!(out, "Recent searches:");
        for query in &home.recent {
            let _ = writeln!(out, "  {query}");
        }
    }

    if home.trending_loading {
        let _ = writeln!(out, "Trending: loading...");
    } else if !home.trending.is_empty() {
        let _ = writeln!(out, "Trending:");
        for query in &home.trending {
            let _ = writeln!(out, "  {query}");
        }
    }
}

fn render_results(out: &mut String, results: &ResultsView) {
    if results.loading {
        let _ = writeln!(out, "Searching for \"{}\"...", results.query);
        return;
    }

    if let Some(error) = &results.error {
        let _ = writeln!(out, "Error: {error}");
        return;
    }

    if let Some(summary) = &results.summary {
        let _ = writeln!(out, "{summary}");
    }
    if let Some(corrected) = &results.corrected_query {
        let _ = writeln!(out, "Did you mean: {corrected}");
    }
    if let Some(answer) = &results.instant_answer {
        let _ = writeln!(out, "= {answer}");
    }

    if results.rows.is_empty() && results.sentinel.is_none() {
        let _ = writeln!(out, "No results for \"{}\"", results.query);
    }

    for (index, row) in results.rows.iter().enumerate() {
        let target = if row.new_tab { " (new tab)" } else { "" };
        let _ = writeln!(out, "{}. {} <{}>{target}", index + 1, row.title, row.url);
        if !row.detail.is_empty() {
            let _ = writeln!(out, "   {}", row.detail);
        }
        if let Some(date) = &row.published {
            let _ = writeln!(out, "   {date}");
        }
        if let Some(thumbnail) = &row.thumbnail {
            let _ = writeln!(out, "   [thumb {thumbnail}]");
        }
    }

    if !results.related.is_empty() {
        let _ = writeln!(out, "Related searches:");
        for link in &results.related {
            let _ = writeln!(out, "  {} <{}>", link.text, link.href);
        }
    }

    if let Some(pagination) = &results.pagination {
        render_pagination(out, pagination);
    }
    if let Some(sentinel) = &results.sentinel {
        render_sentinel(out, sentinel);
    }
}

fn render_pagination(out: &mut String, pagination: &PaginationView) {
    let mut parts = Vec::with_capacity(pagination.pages.len() + 2);
    parts.push(if pagination.prev.is_some() { "< Prev" } else { "(Prev)" }.to_string());
    for link in &pagination.pages {
        if link.current {
            parts.push(format!("[{}]", link.page));
        } else {
            parts.push(link.page.to_string());
        }
    }
    parts.push(if pagination.next.is_some() { "Next >" } else { "(Next)" }.to_string());

    let _ = writeln!(
        out,
        "{}   page {} of {}",
        parts.join(" "),
        pagination.current_page,
        pagination.total_pages
    );
}

fn render_sentinel(out: &mut String, sentinel: &SentinelInfo) {
    if sentinel.loading {
        let _ = writeln!(out, "Loading more...");
    } else if let Some(error) = &sentinel.error {
        let _ = writeln!(out, "Error: {error} (scroll to retry)");
    } else if sentinel.exhausted {
        let _ = writeln!(out, "End of results");
    } else {
        let _ = writeln!(out, "-- more --");
    }
}

fn render_settings(out: &mut String, settings: &Settings) {
    let theme = match settings.theme {
        ColorScheme::System => "system",
        ColorScheme::Light => "light",
        ColorScheme::Dark => "dark",
    };

    let _ = writeln!(out, "Settings");
    let _ = writeln!(out, "  Safe search:      {}", settings.safe_search.as_str());
    let _ = writeln!(out, "  Results per page: {}", settings.results_per_page);
    let _ = writeln!(out, "  Region:           {}", settings.region);
    let _ = writeln!(out, "  Language:         {}", settings.language);
    let _ = writeln!(out, "  Theme:            {theme}");
    let _ = writeln!(out, "  {} Open results in a new tab", checkbox(settings.open_in_new_tab));
    let _ = writeln!(out, "  {} Show thumbnails", checkbox(settings.show_thumbnails));
    let _ = writeln!(out, "  {} Infinite scroll", checkbox(settings.infinite_scroll));
}

fn render_history(out: &mut String, entries: &[String]) {
    if entries.is_empty() {
        let _ = writeln!(out, "No recent searches");
        return;
    }

    let _ = writeln!(out, "Recent searches:");
    for (index, query) in entries.iter().enumerate() {
        let _ = writeln!(out, "  {}. {query}  [remove]", index + 1);
    }
}

fn render_bang(out: &mut String, bang: &BangView) {
    if bang.loading {
        let _ = writeln!(out, "Loading !{}...", bang.trigger);
        return;
    }
    if let Some(error) = &bang.error {
        let _ = writeln!(out, "Error: {error}");
        return;
    }

    let Some(detail) = &bang.shortcut else {
        let _ = writeln!(out, "Unknown shortcut: !{}", bang.trigger);
        return;
    };

    let _ = writeln!(out, "!{}  {}", bang.trigger, detail.name);
    if let Some(category) = &detail.category {
        let _ = writeln!(out, "  Category: {category}");
    }
    if let Some(template) = &detail.url_template {
        let _ = writeln!(out, "  URL:      {template}");
    }
    if let Some(example) = &detail.example {
        let _ = writeln!(out, "  Example:  {example}");
    }
}
