//! Onboarding state holder.
//!
//! Remembers whether the user picked a home state. A persisted empty value
//! means the question was answered with "skip".

use std::sync::Arc;

use crate::error::Result;
use crate::storage::KeyValueStore;

pub const SELECTED_STATE_KEY: &str = "govtjobs_selected_state";

/// The user's onboarding answer.
pub struct OnboardingHolder {
    store: Arc<dyn KeyValueStore>,
    selected_state: Option<String>,
    answered: bool,
}

impl OnboardingHolder {
    /// Restore the answer from persisted state. Read failures count as unanswered.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let raw = store.get(SELECTED_STATE_KEY).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable onboarding answer: {}", e);
            None
        });
        let (selected_state, answered) = match raw {
            None => (None, false),
            Some(value) => (normalise(&value), true),
        };
        Self {
            store,
            selected_state,
            answered,
        }
    }

    /// Record the answer; `None` (or blank) means the user skipped.
    pub fn complete(&mut self, state: Option<&str>) -> Result<()> {
        let selected = state.and_then(normalise);
        self.store
            .set(SELECTED_STATE_KEY, selected.as_deref().unwrap_or(""))?;
        log::info!(
            "Onboarding answered: {}",
            selected.as_deref().unwrap_or("skipped")
        );
        self.selected_state = selected;
        self.answered = true;
        Ok(())
    }

    /// Forget the answer so onboarding shows again.
    pub fn reset(&mut self) -> Result<()> {
        self.store.remove(SELECTED_STATE_KEY)?;
        self.selected_state = None;
        self.answered = false;
        Ok(())
    }

    pub fn selected_state(&self) -> Option<&str> {
        self.selected_state.as_deref()
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }

    pub fn should_show(&self) -> bool {
        !self.answered
    }
}

fn normalise(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "null" {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_first_load_is_unanswered() {
        let holder = OnboardingHolder::load(Arc::new(MemoryStore::new()));
        assert!(holder.should_show());
        assert_eq!(holder.selected_state(), None);
    }

    #[test]
    fn test_complete_with_state_persists() {
        let store = Arc::new(MemoryStore::new());
        let mut holder = OnboardingHolder::load(store.clone());
        holder.complete(Some("Kerala")).unwrap();
        assert!(!holder.should_show());

        let reloaded = OnboardingHolder::load(store);
        assert!(reloaded.is_answered());
        assert_eq!(reloaded.selected_state(), Some("Kerala"));
    }

    #[test]
    fn test_skip_is_remembered() {
        let store = Arc::new(MemoryStore::new());
        let mut holder = OnboardingHolder::load(store.clone());
        holder.complete(None).unwrap();

        let reloaded = OnboardingHolder::load(store);
        assert!(reloaded.is_answered());
        assert!(!reloaded.should_show());
        assert_eq!(reloaded.selected_state(), None);
    }

    #[test]
    fn test_reset_shows_onboarding_again() {
        let store = Arc::new(MemoryStore::new());
        let mut holder = OnboardingHolder::load(store.clone());
        holder.complete(Some("Bihar")).unwrap();
        holder.reset().unwrap();
        assert!(holder.should_show());
        assert!(OnboardingHolder::load(store).should_show());
    }

    #[test]
    fn test_failed_write_keeps_previous_answer() {
        let store = Arc::new(MemoryStore::new());
        let mut holder = OnboardingHolder::load(store.clone());
        store.fail_writes(true);
        assert!(holder.complete(Some("Goa")).is_err());
        assert!(holder.should_show());
    }
}
