//! Suggestion controller bound to one search input.
//!
//! The controller is a pure state machine. [`SuggestionController::handle`]
//! applies one [`SuggestEvent`] and returns whether the dropdown or input
//! changed together with the [`SuggestAction`]s the runtime must perform:
//! arming or cancelling timers, fetching remote suggestions or the shortcut
//! directory, and submitting a final query.
//!
//! # Resolution order
//!
//! When the debounce timer fires, suggestions come from exactly one source:
//!
//! 1. Empty input: recent searches.
//! 2. Input starting with `!`: the shortcut directory (fetched once, cached).
//! 3. Otherwise the remote endpoint; responses whose query no longer equals
//!    the live input are discarded.
//! 4. Empty or failed remote result: recent searches filtered by the input.

use crate::domain::{Shortcut, Suggestion, SHORTCUT_SENTINEL};
use crate::suggest::debounce::{DebounceState, TimerId, TimerKind};
use crate::suggest::dropdown::Dropdown;
use crate::suggest::sources::{filter_shortcuts, recent_suggestions};
use std::time::Duration;

/// Timing and size knobs for a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestConfig {
    /// Quiet period after the last keystroke before resolving.
    pub debounce: Duration,
    /// Delay between losing focus and closing the dropdown.
    pub blur_close: Duration,
    /// Maximum recent-search or shortcut items shown. Remote completions
    /// are not truncated.
    pub limit: usize,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(150),
            blur_close: Duration::from_millis(200),
            limit: 8,
        }
    }
}

/// Keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Move highlight down, or reopen when closed.
    ArrowDown,
    /// Move highlight up.
    ArrowUp,
    /// Commit the highlight or submit the raw text.
    Enter,
    /// Close without submitting.
    Escape,
    /// Close without submitting.
    Tab,
    /// Any other key.
    Other,
}

/// Inputs to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestEvent {
    /// The input's value changed.
    InputChanged(String),
    /// A timer armed by this controller fired.
    TimerFired(TimerId),
    /// Remote suggestions for `query` arrived.
    SuggestionsLoaded {
        /// Query the request was sent with.
        query: String,
        /// Completions, or the error's display string.
        result: Result<Vec<String>, String>,
    },
    /// The shortcut directory arrived.
    ShortcutsLoaded(Result<Vec<Shortcut>, String>),
    /// Key pressed while the input has focus.
    Key(Key),
    /// Pointer pressed on a dropdown item.
    PointerDown(usize),
    /// Pointer entered a dropdown item.
    PointerEnter(usize),
    /// The input gained focus.
    Focus,
    /// The input lost focus.
    Blur,
}

/// Side effects requested by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestAction {
    /// Fire [`SuggestEvent::TimerFired`] after `delay`.
    ArmTimer {
        /// Timer identity to report back.
        id: TimerId,
        /// Delay before firing.
        delay: Duration,
    },
    /// Drop a previously armed timer.
    CancelTimer(TimerId),
    /// Request remote completions for `query`.
    FetchSuggestions {
        /// Text to complete.
        query: String,
    },
    /// Request the shortcut directory.
    FetchShortcuts,
    /// Submit a final, non-empty query.
    Submit {
        /// Trimmed query text.
        query: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum ShortcutCache {
    #[default]
    Unloaded,
    Loading,
    Loaded(Vec<Shortcut>),
    Failed,
}

/// Autocomplete state for one input.
#[derive(Debug, Clone, Default)]
pub struct SuggestionController {
    config: SuggestConfig,
    input: String,
    dropdown: Dropdown,
    debounce: DebounceState,
    shortcuts: ShortcutCache,
    awaiting_shortcuts: bool,
    blur_timer: Option<TimerId>,
    generation: u64,
}

impl SuggestionController {
    /// Creates a controller with an empty input.
    #[must_use]
    pub fn new(config: SuggestConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Live input value.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Dropdown state.
    #[must_use]
    pub const fn dropdown(&self) -> &Dropdown {
        &self.dropdown
    }

    /// Debounce state.
    #[must_use]
    pub const fn debounce(&self) -> &DebounceState {
        &self.debounce
    }

    /// Whether the shortcut directory has been cached.
    #[must_use]
    pub const fn shortcuts_loaded(&self) -> bool {
        matches!(self.shortcuts, ShortcutCache::Loaded(_))
    }

    /// Cached shortcut directory, once loaded.
    #[must_use]
    pub fn shortcuts(&self) -> Option<&[Shortcut]> {
        match &self.shortcuts {
            ShortcutCache::Loaded(directory) => Some(directory),
            _ => None,
        }
    }

    /// Prefills the input without resolving suggestions, e.g. with the query
    /// of the page being shown.
    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    /// Seeds the shortcut cache, e.g. when the directory is already known.
    pub fn preload_shortcuts(&mut self, directory: Vec<Shortcut>) {
        self.shortcuts = ShortcutCache::Loaded(directory);
    }

    /// Closes the dropdown and cancels outstanding timers, e.g. when the page
    /// this input belongs to is torn down.
    pub fn dismiss(&mut self) -> Vec<SuggestAction> {
        let mut actions = self.cancel_debounce();
        actions.extend(self.cancel_blur());
        self.awaiting_shortcuts = false;
        self.dropdown.close();
        actions
    }

    /// Applies one event. `recent` is the store's current recent-search list.
    ///
    /// Returns whether the view changed and the actions to perform.
    pub fn handle(&mut self, event: &SuggestEvent, recent: &[String]) -> (bool, Vec<SuggestAction>) {
        let _span = tracing::debug_span!("suggest", event = ?event).entered();

        match event {
            SuggestEvent::InputChanged(value) => {
                self.input.clone_from(value);
                (true, self.arm_debounce())
            }

            SuggestEvent::TimerFired(id) => match id.kind {
                TimerKind::Debounce => {
                    if !self.debounce.is_armed(*id) {
                        tracing::debug!(timer = %id, "ignoring superseded debounce timer");
                        return (false, vec![]);
                    }
                    self.debounce = DebounceState::Idle;
                    self.resolve(recent)
                }
                TimerKind::BlurClose => {
                    if self.blur_timer != Some(*id) {
                        tracing::debug!(timer = %id, "ignoring cancelled blur timer");
                        return (false, vec![]);
                    }
                    self.blur_timer = None;
                    (self.close(), vec![])
                }
            },

            SuggestEvent::SuggestionsLoaded { query, result } => {
                if query.as_str() != self.input.trim() || !self.debounce.awaits(query) {
                    tracing::debug!(query = %query, live = %self.input, "discarding stale suggestions");
                    return (false, vec![]);
                }
                self.debounce = DebounceState::Idle;

                let items = match result {
                    Ok(list) if !list.is_empty() => list
                        .iter()
                        .map(|text| Suggestion::query(text.as_str()))
                        .collect(),
                    Ok(_) => recent_suggestions(recent, query, self.config.limit),
                    Err(e) => {
                        tracing::warn!(error = %e, "suggestion request failed, using recent searches");
                        recent_suggestions(recent, query, self.config.limit)
                    }
                };
                tracing::debug!(count = items.len(), "suggestions rendered");
                self.dropdown.populate(items);
                (true, vec![])
            }

            SuggestEvent::ShortcutsLoaded(result) => {
                self.shortcuts = match result {
                    Ok(directory) => {
                        tracing::debug!(count = directory.len(), "shortcut directory cached");
                        ShortcutCache::Loaded(directory.clone())
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "shortcut directory unavailable");
                        ShortcutCache::Failed
                    }
                };
                if std::mem::take(&mut self.awaiting_shortcuts) {
                    self.resolve(recent)
                } else {
                    (false, vec![])
                }
            }

            SuggestEvent::Key(key) => self.handle_key(*key, recent),

            SuggestEvent::PointerDown(index) => {
                let mut actions = self.cancel_blur();
                let (render, more) = self.commit(*index, recent);
                actions.extend(more);
                (render, actions)
            }

            SuggestEvent::PointerEnter(index) => {
                let before = self.dropdown.active_index();
                self.dropdown.hover(*index);
                (before != self.dropdown.active_index(), vec![])
            }

            SuggestEvent::Focus => (false, self.cancel_blur()),

            SuggestEvent::Blur => {
                let mut actions = self.cancel_blur();
                let id = self.next_timer(TimerKind::BlurClose);
                self.blur_timer = Some(id);
                actions.push(SuggestAction::ArmTimer {
                    id,
                    delay: self.config.blur_close,
                });
                (false, actions)
            }
        }
    }

    fn handle_key(&mut self, key: Key, recent: &[String]) -> (bool, Vec<SuggestAction>) {
        let open = self.dropdown.is_open();
        match key {
            Key::ArrowDown if open => {
                self.dropdown.move_down();
                (true, vec![])
            }
            Key::ArrowDown => {
                let mut actions = self.cancel_debounce();
                let (render, more) = self.resolve(recent);
                actions.extend(more);
                (render, actions)
            }
            Key::ArrowUp if open => {
                self.dropdown.move_up();
                (true, vec![])
            }
            Key::Enter => match self.dropdown.active_index() {
                Some(index) if open => self.commit(index, recent),
                _ => {
                    let raw = self.input.clone();
                    self.submit(&raw)
                }
            },
            Key::Escape | Key::Tab if open => {
                let actions = self.cancel_debounce();
                (self.close(), actions)
            }
            Key::ArrowUp | Key::Escape | Key::Tab | Key::Other => (false, vec![]),
        }
    }

    /// Resolves suggestions for the live input from the highest-priority
    /// source that applies.
    fn resolve(&mut self, recent: &[String]) -> (bool, Vec<SuggestAction>) {
        let trimmed = self.input.trim().to_string();

        if trimmed.is_empty() {
            self.debounce = DebounceState::Idle;
            self.dropdown
                .populate(recent_suggestions(recent, "", self.config.limit));
            return (true, vec![]);
        }

        if trimmed.starts_with(SHORTCUT_SENTINEL) {
            match &self.shortcuts {
                ShortcutCache::Loaded(directory) => {
                    let hits = filter_shortcuts(directory, &trimmed, self.config.limit);
                    if !hits.is_empty() {
                        self.debounce = DebounceState::Idle;
                        self.dropdown.populate(hits);
                        return (true, vec![]);
                    }
                }
                ShortcutCache::Unloaded => {
                    self.shortcuts = ShortcutCache::Loading;
                    self.awaiting_shortcuts = true;
                    return (false, vec![SuggestAction::FetchShortcuts]);
                }
                ShortcutCache::Loading => {
                    self.awaiting_shortcuts = true;
                    return (false, vec![]);
                }
                ShortcutCache::Failed => {}
            }
        }

        tracing::debug!(query = %trimmed, "requesting remote suggestions");
        self.debounce = DebounceState::InFlight {
            query: trimmed.clone(),
        };
        (false, vec![SuggestAction::FetchSuggestions { query: trimmed }])
    }

    fn commit(&mut self, index: usize, recent: &[String]) -> (bool, Vec<SuggestAction>) {
        let Some(item) = self.dropdown.items().get(index).cloned() else {
            return (false, vec![]);
        };
        tracing::debug!(index, kind = ?item.kind(), "committing suggestion");

        if let Some(trigger) = item.shortcut_trigger() {
            self.input = format!("{trigger} ");
            self.dropdown.close();
            let mut actions = self.cancel_debounce();
            let (_, more) = self.resolve(recent);
            actions.extend(more);
            return (true, actions);
        }

        self.input = item.text();
        self.submit(&item.text())
    }

    fn submit(&mut self, raw: &str) -> (bool, Vec<SuggestAction>) {
        let query = raw.trim();
        if query.is_empty() {
            tracing::debug!("ignoring empty submission");
            return (false, vec![]);
        }

        let mut actions = self.cancel_debounce();
        actions.extend(self.cancel_blur());
        self.dropdown.close();
        tracing::debug!(query, "submitting query");
        actions.push(SuggestAction::Submit {
            query: query.to_string(),
        });
        (true, actions)
    }

    fn close(&mut self) -> bool {
        let was_open = self.dropdown.is_open();
        self.dropdown.close();
        if matches!(self.debounce, DebounceState::InFlight { .. }) {
            self.debounce = DebounceState::Idle;
        }
        was_open
    }

    fn arm_debounce(&mut self) -> Vec<SuggestAction> {
        let mut actions = self.cancel_debounce();
        let id = self.next_timer(TimerKind::Debounce);
        self.debounce = DebounceState::Pending {
            generation: id.generation,
        };
        actions.push(SuggestAction::ArmTimer {
            id,
            delay: self.config.debounce,
        });
        actions
    }

    fn cancel_debounce(&mut self) -> Vec<SuggestAction> {
        let pending = self.debounce.pending_timer();
        self.debounce = DebounceState::Idle;
        pending.map(SuggestAction::CancelTimer).into_iter().collect()
    }

    fn cancel_blur(&mut self) -> Vec<SuggestAction> {
        self.blur_timer
            .take()
            .map(SuggestAction::CancelTimer)
            .into_iter()
            .collect()
    }

    fn next_timer(&mut self, kind: TimerKind) -> TimerId {
        self.generation += 1;
        TimerId {
            kind,
            generation: self.generation,
        }
    }
}
