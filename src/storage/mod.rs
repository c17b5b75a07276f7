//! Local persistence for session-spanning state.
//!
//! Mirrors browser local storage: a flat string key/value space that survives
//! restarts. Values written by one [`KeyValueStore::set_all`] call land
//! together.
//!
//! ## Keys
//!
//! ```text
//! govtjobs_saved_ids        # JSON array of bookmarked notice ids
//! govtjobs_saved_data       # JSON array of bookmarked notice snapshots
//! govtjobs_selected_state   # onboarding answer ("" = skipped)
//! ```

pub mod local;
pub mod memory;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};

// Re-export for convenience
pub use local::LocalStore;
pub use memory::MemoryStore;

/// Synchronous string key/value store.
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `None` when the key was never written or was removed.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write several values as one operation.
    fn set_all(&self, entries: &[(&str, String)]) -> Result<()>;

    /// Delete a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Write a single value.
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_all(&[(key, value.to_string())])
    }
}

/// Read and decode a JSON value.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| AppError::persistence(key, e)),
        None => Ok(None),
    }
}

/// Encode a value as JSON for [`KeyValueStore::set_all`].
pub fn to_json<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| AppError::persistence(key, e))
}
