//! Debounced autocomplete for the search input.
//!
//! # Modules
//!
//! - [`controller`]: The per-input state machine and its events/actions
//! - [`debounce`]: `{Idle, Pending, InFlight}` debounce state and timer ids
//! - [`dropdown`]: Item list with clamped keyboard highlight
//! - [`sources`]: Shortcut-directory and recent-search filtering

pub mod controller;
pub mod debounce;
pub mod dropdown;
pub mod sources;

pub use controller::{Key, SuggestAction, SuggestConfig, SuggestEvent, SuggestionController};
pub use debounce::{DebounceState, TimerId, TimerKind};
pub use dropdown::Dropdown;
pub use sources::{filter_shortcuts, recent_suggestions};
