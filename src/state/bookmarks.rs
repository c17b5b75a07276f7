// src/state/bookmarks.rs

//! Bookmark store.
//!
//! Keeps the saved notice ids together with a full snapshot of each notice,
//! so saved items stay viewable after they drop out of every feed. Both
//! values are persisted in one write on every toggle, and memory is updated
//! only after that write succeeded.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{Notice, NoticeId};
use crate::storage::{self, KeyValueStore};

pub const SAVED_IDS_KEY: &str = "govtjobs_saved_ids";
pub const SAVED_DATA_KEY: &str = "govtjobs_saved_data";

/// Saved notices, in the order they were saved.
pub struct BookmarkStore {
    store: Arc<dyn KeyValueStore>,
    ids: Vec<NoticeId>,
    notices: Vec<Notice>,
}

impl BookmarkStore {
    /// Restore bookmarks from persisted state.
    ///
    /// Unreadable or corrupt values fall back to an empty set.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let ids: Vec<NoticeId> = read_or_empty(store.as_ref(), SAVED_IDS_KEY);
        let notices: Vec<Notice> = read_or_empty(store.as_ref(), SAVED_DATA_KEY);

        // Only pairs survive: an id without a snapshot or a snapshot without
        // an id is left over from an interrupted write.
        let known: HashSet<&NoticeId> = ids.iter().collect();
        let mut seen = HashSet::new();
        let notices: Vec<Notice> = notices
            .into_iter()
            .filter(|n| known.contains(&n.id) && seen.insert(n.id.clone()))
            .collect();
        let ids: Vec<NoticeId> = ids.into_iter().filter(|id| seen.contains(id)).collect();

        log::debug!("Loaded {} bookmarks", ids.len());
        Self {
            store,
            ids,
            notices,
        }
    }

    pub fn is_saved(&self, id: &NoticeId) -> bool {
        self.ids.contains(id)
    }

    /// Save `notice` if it is not saved yet, otherwise remove it.
    ///
    /// Returns whether the notice is saved afterwards.
    pub fn toggle_save(&mut self, notice: &Notice) -> Result<bool> {
        let mut ids = self.ids.clone();
        let mut notices = self.notices.clone();
        let saved = if ids.contains(&notice.id) {
            ids.retain(|id| id != &notice.id);
            notices.retain(|n| n.id != notice.id);
            false
        } else {
            ids.push(notice.id.clone());
            notices.push(notice.clone());
            true
        };

        // Snapshots commit first, so a partial write never leaves a bare id.
        self.store.set_all(&[
            (SAVED_DATA_KEY, storage::to_json(SAVED_DATA_KEY, &notices)?),
            (SAVED_IDS_KEY, storage::to_json(SAVED_IDS_KEY, &ids)?),
        ])?;

        self.ids = ids;
        self.notices = notices;
        log::info!(
            "{} bookmark {} ({} saved)",
            if saved { "Added" } else { "Removed" },
            notice.id,
            self.ids.len()
        );
        Ok(saved)
    }

    pub fn saved_ids(&self) -> &[NoticeId] {
        &self.ids
    }

    pub fn saved_notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

fn read_or_empty<T: serde::de::DeserializeOwned + Default>(
    store: &dyn KeyValueStore,
    key: &str,
) -> T {
    match storage::read_json(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            log::warn!("Ignoring unreadable bookmarks: {}", e);
            T::default()
        }
    }
}
