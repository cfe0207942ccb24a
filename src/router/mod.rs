//! Client-side router mapping URL paths to page models.
//!
//! The router owns the registered routes, the last resolved path and a
//! [`History`] implementation. Resolving a location runs the renderer of the
//! first route (in registration order) whose pattern matches, falling back to
//! an optional not-found renderer.
//!
//! Renderers are pure: they turn route and query parameters into a value of
//! type `T` (the application uses its page model) which the router hands back
//! to the caller. Nothing is rendered when a navigation is a no-op.
//!
//! # Modules
//!
//! - [`matcher`]: Route patterns and the path matcher
//! - [`location`]: Location parsing and the history abstraction
//!
//! # Example
//!
//! ```rust
//! use search_shell::router::{MemoryHistory, Router};
//!
//! let mut router: Router<String> = Router::new(MemoryHistory::new("/"));
//! router.add_route("/", |_, _| "home".to_string());
//! router.add_route("/bang/:trigger", |params, _| format!("bang {}", params["trigger"]));
//!
//! assert_eq!(router.start().as_deref(), Some("home"));
//! assert_eq!(router.navigate("/bang/gh").as_deref(), Some("bang gh"));
//! assert_eq!(router.navigate("/bang/gh"), None);
//! ```

pub mod location;
pub mod matcher;

pub use location::{History, Location, MemoryHistory, QueryParams};
pub use matcher::{match_path, split_path, RouteParams, RoutePattern, Segment};

/// Renderer invoked with captured route parameters and query parameters.
pub type Renderer<T> = Box<dyn FnMut(&RouteParams, &QueryParams) -> T>;

/// A registered route.
pub struct Route<T> {
    pattern: RoutePattern,
    renderer: Renderer<T>,
}

impl<T> Route<T> {
    /// Pattern this route was registered with.
    #[must_use]
    pub const fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }
}

impl<T> std::fmt::Debug for Route<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// A click on an anchor, as reported by the integration layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkClick {
    /// Target href.
    pub href: String,
    /// Whether the anchor is marked as an in-app link.
    pub in_app: bool,
    /// Whether a modifier key (ctrl, meta, shift, alt) was held.
    pub modifier: bool,
}

impl LinkClick {
    /// Plain primary click on an in-app link.
    pub fn in_app(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            in_app: true,
            modifier: false,
        }
    }
}

/// Outcome of [`Router::on_link_click`].
#[derive(Debug, PartialEq, Eq)]
pub enum LinkOutcome<T> {
    /// Default navigation was prevented and the router navigated instead.
    /// Carries the renderer output, `None` for a no-op navigation.
    Intercepted(Option<T>),
    /// The click is left to the browser.
    Default,
}

/// Path router generic over the renderer output.
pub struct Router<T, H: History = MemoryHistory> {
    routes: Vec<Route<T>>,
    not_found: Option<Renderer<T>>,
    current_path: Option<String>,
    history: H,
}

impl<T, H: History> Router<T, H> {
    /// Creates a router over the given history with no routes.
    pub fn new(history: H) -> Self {
        Self {
            routes: Vec::new(),
            not_found: None,
            current_path: None,
            history,
        }
    }

    /// Appends a route. Order of registration is the tie-break between
    /// overlapping patterns.
    pub fn add_route<F>(&mut self, pattern: &str, renderer: F) -> &mut Self
    where
        F: FnMut(&RouteParams, &QueryParams) -> T + 'static,
    {
        tracing::trace!(pattern, "route registered");
        self.routes.push(Route {
            pattern: RoutePattern::parse(pattern),
            renderer: Box::new(renderer),
        });
        self
    }

    /// Sets the renderer used when no route matches.
    pub fn set_not_found<F>(&mut self, renderer: F) -> &mut Self
    where
        F: FnMut(&RouteParams, &QueryParams) -> T + 'static,
    {
        self.not_found = Some(Box::new(renderer));
        self
    }

    /// Registered routes in match order.
    #[must_use]
    pub fn routes(&self) -> &[Route<T>] {
        &self.routes
    }

    /// Href of the last resolved location.
    #[must_use]
    pub fn current_path(&self) -> Option<&str> {
        self.current_path.as_deref()
    }

    /// Underlying history.
    #[must_use]
    pub const fn history(&self) -> &H {
        &self.history
    }

    /// Mutable access to the history, e.g. to step back before
    /// [`Router::on_pop_state`].
    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    /// Performs the initial resolve of the history's current location.
    pub fn start(&mut self) -> Option<T> {
        tracing::debug!(location = %self.history.location(), "router starting");
        self.resolve()
    }

    /// Pushes `path` onto the history and resolves it.
    pub fn navigate(&mut self, path: &str) -> Option<T> {
        self.navigate_with(path, false)
    }

    /// Navigates to `path`, replacing the current history entry when
    /// `replace` is set.
    ///
    /// Navigating to the path that is already resolved is a no-op: no history
    /// entry is written and no renderer runs.
    pub fn navigate_with(&mut self, path: &str, replace: bool) -> Option<T> {
        let href = Location::parse(path).href();
        if self.current_path.as_deref() == Some(href.as_str()) {
            tracing::debug!(path = %href, "navigation to current path skipped");
            return None;
        }

        if replace {
            self.history.replace(&href);
        } else {
            self.history.push(&href);
        }
        self.resolve()
    }

    /// Re-resolves after the history moved (back/forward).
    pub fn on_pop_state(&mut self) -> Option<T> {
        self.resolve()
    }

    /// Intercepts plain clicks on in-app links.
    ///
    /// Clicks with modifiers, on links not marked in-app, or on absolute
    /// URLs keep their default behaviour.
    pub fn on_link_click(&mut self, click: &LinkClick) -> LinkOutcome<T> {
        let external = click.href.contains("://") || click.href.starts_with("//");
        if !click.in_app || click.modifier || external {
            return LinkOutcome::Default;
        }
        LinkOutcome::Intercepted(self.navigate(&click.href))
    }

    /// Resolves the history's current location against the route table.
    pub fn resolve(&mut self) -> Option<T> {
        let location = Location::parse(&self.history.location());
        let _span = tracing::debug_span!("resolve", path = %location.path).entered();

        for route in &mut self.routes {
            if let Some(params) = match_path(&route.pattern, &location.path) {
                // Stored before rendering so a renderer that navigates to the
                // same path hits the no-op branch.
                self.current_path = Some(location.href());
                tracing::debug!(pattern = route.pattern.as_str(), "route matched");
                return Some((route.renderer)(&params, &location.query));
            }
        }

        self.current_path = Some(location.href());
        if let Some(not_found) = self.not_found.as_mut() {
            tracing::debug!("no route matched, rendering not-found");
            Some(not_found(&RouteParams::new(), &location.query))
        } else {
            tracing::debug!("no route matched and no not-found handler");
            None
        }
    }
}

impl<T, H: History + std::fmt::Debug> std::fmt::Debug for Router<T, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .field("has_not_found", &self.not_found.is_some())
            .field("current_path", &self.current_path)
            .field("history", &self.history)
            .finish()
    }
}
