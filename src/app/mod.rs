//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the runtime and the router/store/controller
//! components. It implements the event-driven architecture of the shell.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └──────── Completion Events ───────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`pages`]: Route table, page models and per-page state
//! - [`state`]: Central application state container and view model computation

pub mod actions;
pub mod handler;
pub mod pages;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use pages::{build_router, LoadStatus, PageRoute, PageState, ResultsContent, ResultsPage};
pub use state::App;
