//! Logging setup.
//!
//! All modules emit `tracing` spans and events with structured fields. The
//! binary installs a subscriber that writes them, unformatted for terminals,
//! to `search-shell.log` in the data directory.
//!
//! # Configuration
//!
//! Level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` config option
//! 3. Default: `"info"`
//!
//! # Features
//!
//! - **Automatic Rotation**: Files rotate at 10MB with 3-backup retention
//!
//! # Usage
//!
//! ```no_run
//! use search_shell::observability::init_tracing;
//! use search_shell::Config;
//!
//! init_tracing(&Config::default());
//! tracing::debug!("shell started");
//! ```
//!
//! # Modules
//!
//! - `init`: Subscriber setup
//! - `file_writer`: Rotating file writer with size-based rotation

mod file_writer;
mod init;

pub use file_writer::FileWriter;
pub use init::init_tracing;
