//! Session-spanning user state: bookmarks and the onboarding answer.

mod bookmarks;
mod onboarding;

pub use bookmarks::{BookmarkStore, SAVED_DATA_KEY, SAVED_IDS_KEY};
pub use onboarding::{OnboardingHolder, SELECTED_STATE_KEY};
