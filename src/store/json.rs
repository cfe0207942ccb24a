//! JSON file-based storage backend.
//!
//! Each key maps to one file in a data directory. Writes go to a temporary
//! file first and are then renamed over the target, so a crash never leaves a
//! half-written blob behind.

use crate::domain::error::Result;
use crate::store::backend::StorageBackend;
use std::path::{Path, PathBuf};

/// File-per-key storage backend.
///
/// # File Layout
///
/// ```text
/// <data_dir>/
///   search-shell_state.json      ← key "search-shell:state"
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    /// Directory holding one file per key.
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Creates a backend rooted at `dir`.
    ///
    /// The directory is created on first write, not here, so constructing a
    /// backend over a read-only location still allows reads.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use search_shell::store::{JsonFileStorage, StorageBackend};
    ///
    /// let storage = JsonFileStorage::new("/tmp/search-shell");
    /// let blob = storage.read("search-shell:state")?;
    /// # Ok::<(), search_shell::ShellError>(())
    /// ```
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        tracing::debug!(path = ?dir, "initializing JSON file storage");
        Self { dir }
    }

    /// Directory this backend writes to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path backing `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl StorageBackend for JsonFileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        let _span = tracing::debug_span!("json_read", path = ?path).entered();

        if !path.exists() {
            tracing::debug!("no stored value");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)?;
        tracing::debug!(bytes = contents.len(), "loaded stored value");
        Ok(Some(contents))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let _span = tracing::debug_span!("json_write", path = ?path).entered();

        std::fs::create_dir_all(&self.dir)?;

        let tmp_path = path.with_extension("tmp");
        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, value)?;

        tracing::trace!("renaming temporary file to final location");
        std::fs::rename(&tmp_path, &path)?;

        tracing::debug!(bytes = value.len(), "stored value saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path());
        assert!(storage.read("search-shell:state").unwrap().is_none());
    }

    #[test]
    fn write_creates_directory_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let mut storage = JsonFileStorage::new(&nested);

        storage.write("search-shell:state", "{\"x\":1}").unwrap();
        assert_eq!(
            storage.read("search-shell:state").unwrap().as_deref(),
            Some("{\"x\":1}")
        );
        assert!(nested.join("search-shell_state.json").exists());
        assert!(!nested.join("search-shell_state.tmp").exists());
    }

    #[test]
    fn keys_map_to_safe_file_names() {
        let storage = JsonFileStorage::new("/data");
        assert_eq!(
            storage.path_for("a/b:c"),
            PathBuf::from("/data/a_b_c.json")
        );
    }
}
