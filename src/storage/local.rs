//! Local filesystem storage implementation.
//!
//! One file per key under a root directory. Writes go to a temp file first
//! and are renamed into place, so a crash never leaves a half-written value.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── config.toml               # Client configuration
//! ├── govtjobs_saved_ids        # Bookmark id set
//! ├── govtjobs_saved_data       # Bookmark snapshots
//! └── govtjobs_selected_state   # Onboarding answer
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::storage::KeyValueStore;

/// Local filesystem key/value store.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root_dir: PathBuf,
}

impl LocalStore {
    /// Create a new LocalStore rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Get the full path for a key, rejecting keys that could escape the root.
    fn path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(AppError::persistence(key, "invalid storage key"));
        }
        Ok(self.root_dir.join(key))
    }

    /// Ensure the root directory exists.
    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.root_dir)?;
        Ok(())
    }

    /// Write bytes to the temp sibling of `path`.
    fn stage(path: &Path, bytes: &[u8]) -> Result<PathBuf> {
        let tmp = path.with_extension("tmp");
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        Ok(tmp)
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::persistence(key, e)),
        }
    }

    fn set_all(&self, entries: &[(&str, String)]) -> Result<()> {
        let paths = entries
            .iter()
            .map(|(key, _)| self.path(key))
            .collect::<Result<Vec<_>>>()?;
        self.ensure_dir()?;

        // Stage every value before the first rename.
        let mut staged = Vec::with_capacity(entries.len());
        for ((key, value), path) in entries.iter().zip(paths) {
            match Self::stage(&path, value.as_bytes()) {
                Ok(tmp) => staged.push((tmp, path)),
                Err(e) => {
                    for (tmp, _) in &staged {
                        let _ = fs::remove_file(tmp);
                    }
                    return Err(AppError::persistence(*key, e));
                }
            }
        }

        // Entries commit in order; a failed rename discards the rest.
        for (i, (tmp, path)) in staged.iter().enumerate() {
            if let Err(e) = fs::rename(tmp, path) {
                for (pending, _) in &staged[i..] {
                    let _ = fs::remove_file(pending);
                }
                return Err(AppError::persistence(path.display().to_string(), e));
            }
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::persistence(key, e)),
        }
    }
}
