//! Async execution of application actions.
//!
//! The application layer is pure; this module gives its actions effect on a
//! tokio runtime. Spawned tasks never touch the [`App`](crate::app::App):
//! they post a [`Completion`] over an unbounded channel and the owning task
//! applies it through [`handle_event`](crate::app::handle_event).
//!
//! # Modules
//!
//! - [`executor`]: The [`Runtime`] with timer tracking and fetch dispatch

pub mod executor;

pub use executor::{Completion, Runtime};
