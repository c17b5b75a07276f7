//! Engineering feed: PSU, JE and apprenticeship notices narrowed by branch.

use std::sync::Arc;

use crate::api::NoticeApi;
use crate::error::Result;
use crate::feed::{FeedReconciler, FilterController, FilterState, FilterUpdate, LoadOutcome};

/// Branch codes understood by the `branch` query parameter, with labels.
pub const ENGINEERING_BRANCHES: [(&str, &str); 8] = [
    ("CIVIL", "Civil"),
    ("MECH", "Mechanical"),
    ("EEE", "Electrical/EEE"),
    ("ECE", "Electronics/ECE"),
    ("CSE", "CSE/IT"),
    ("CHEM", "Chemical"),
    ("INST", "Instrumentation"),
    ("GENERAL_ENGG", "General Engg"),
];

/// Notice types offered on the engineering feed.
pub const ENGINEERING_NOTICE_TYPES: [&str; 4] =
    ["RECRUITMENT", "APPRENTICESHIP", "RESULT", "EXAM_ADMIT_CARD"];

pub fn branch_label(code: &str) -> Option<&'static str> {
    ENGINEERING_BRANCHES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, label)| *label)
}

pub struct EngineeringFeed {
    filters: FilterController,
    feed: FeedReconciler,
}

impl EngineeringFeed {
    pub fn new(api: Arc<dyn NoticeApi>, size: u32) -> Self {
        let defaults = FilterState::with_size(size);
        Self {
            feed: FeedReconciler::new("engineering", api, defaults.clone()),
            filters: FilterController::new(defaults),
        }
    }

    pub fn feed(&self) -> &FeedReconciler {
        &self.feed
    }

    pub fn filters(&self) -> &FilterState {
        self.filters.current()
    }

    /// Select a branch (`None` for all engineering) and reload from page 0.
    pub async fn set_branch(&mut self, branch: Option<&str>) -> Result<LoadOutcome> {
        self.apply(FilterUpdate::new().branch(branch)).await
    }

    /// Select a notice type (`None` for all types) and reload from page 0.
    pub async fn set_notice_type(&mut self, notice_type: Option<&str>) -> Result<LoadOutcome> {
        self.apply(FilterUpdate::new().notice_type(notice_type)).await
    }

    /// Set branch and notice type together with a single reload.
    pub async fn select(
        &mut self,
        branch: Option<&str>,
        notice_type: Option<&str>,
    ) -> Result<LoadOutcome> {
        self.apply(FilterUpdate::new().branch(branch).notice_type(notice_type))
            .await
    }

    async fn apply(&mut self, update: FilterUpdate) -> Result<LoadOutcome> {
        self.filters.apply(&update);
        let filters = self.filters.current().clone();
        self.feed.load(&filters, 0, true).await
    }

    pub async fn load_more(&self) -> Result<LoadOutcome> {
        self.feed.request_next_page().await
    }

    pub async fn reload(&self) -> Result<LoadOutcome> {
        let filters = self.filters.current().clone();
        self.feed.load(&filters, 0, true).await
    }
}
