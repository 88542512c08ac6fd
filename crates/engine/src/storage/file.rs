//! File-based KeyValueStore implementation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::{KeyValueStore, Result, StorageError};

/// File-based implementation of [`KeyValueStore`].
///
/// Each key maps to one file under the base directory. Writes go through a
/// temp file plus atomic rename so a crash mid-save never leaves a
/// truncated blob behind.
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base_dir`, creating it if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(StorageError::Io)?;
        Ok(Self { base_dir })
    }

    /// Create a store under the platform's per-user data directory.
    pub fn at_default_dir() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "algebra-quest").ok_or_else(|| {
            StorageError::Io(std::io::Error::other("no home directory available"))
        })?;
        Self::new(dirs.data_dir().join("saves"))
    }

    /// Path for a key's blob file.
    fn value_path(&self, key: &str) -> Result<PathBuf> {
        // Keys become file names; reject anything that could escape the
        // base directory.
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            || key.starts_with('.')
        {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.base_dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let value = fs::read_to_string(&path).map_err(StorageError::Io)?;
        tracing::debug!(target: "engine::storage", key, path = %path.display(), "loaded blob");
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.value_path(key)?;
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, value).map_err(StorageError::Io)?;
        fs::rename(&temp_path, &path).map_err(StorageError::Io)?;

        tracing::debug!(target: "engine::storage", key, path = %path.display(), "saved blob");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.value_path(key)?;
        if path.exists() {
            fs::remove_file(&path).map_err(StorageError::Io)?;
            tracing::debug!(target: "engine::storage", key, "removed blob");
        }
        Ok(())
    }
}
