//! Data directory resolution.
//!
//! Persisted state (`search-shell_state.json`) and the log file live in one
//! directory. Resolution order: the configured `data_dir`, then
//! `$XDG_DATA_HOME/search-shell`, then `$HOME/.local/share/search-shell`,
//! then `.search-shell` in the working directory.

use crate::Config;
use std::path::{Path, PathBuf};

/// Directory name used under the platform data directory.
pub const APP_DIR_NAME: &str = "search-shell";

/// Log file name inside the data directory.
const LOG_FILE_NAME: &str = "search-shell.log";

/// Returns the data directory for `config`, reading the environment for the
/// fallbacks.
#[must_use]
pub fn data_dir(config: &Config) -> PathBuf {
    if let Some(dir) = &config.data_dir {
        return dir.clone();
    }
    data_dir_from(
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

/// Resolves the default data directory from explicit environment values.
///
/// Empty values count as unset.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use search_shell::infrastructure::data_dir_from;
///
/// let dir = data_dir_from(None, Some(PathBuf::from("/home/ada")));
/// assert_eq!(dir, PathBuf::from("/home/ada/.local/share/search-shell"));
/// ```
#[must_use]
pub fn data_dir_from(xdg_data_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    let non_empty = |p: &PathBuf| !p.as_os_str().is_empty();

    if let Some(xdg) = xdg_data_home.filter(non_empty) {
        return xdg.join(APP_DIR_NAME);
    }
    if let Some(home) = home.filter(non_empty) {
        return home.join(".local").join("share").join(APP_DIR_NAME);
    }
    PathBuf::from(format!(".{APP_DIR_NAME}"))
}

/// Path of the log file inside `dir`.
#[must_use]
pub fn log_file(dir: &Path) -> PathBuf {
    dir.join(LOG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_dir_wins() {
        let config = Config {
            data_dir: Some(PathBuf::from("/srv/shell")),
            ..Config::default()
        };
        assert_eq!(data_dir(&config), PathBuf::from("/srv/shell"));
    }

    #[test]
    fn xdg_takes_precedence_over_home() {
        let dir = data_dir_from(Some(PathBuf::from("/xdg")), Some(PathBuf::from("/home/u")));
        assert_eq!(dir, PathBuf::from("/xdg/search-shell"));
    }

    #[test]
    fn empty_values_fall_through() {
        let dir = data_dir_from(Some(PathBuf::new()), None);
        assert_eq!(dir, PathBuf::from(".search-shell"));
    }
}
