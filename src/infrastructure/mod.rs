//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where the shell keeps its persisted state and log file.

pub mod paths;

pub use paths::{data_dir, data_dir_from, log_file, APP_DIR_NAME};
