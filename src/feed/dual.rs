// src/feed/dual.rs

//! Dual-feed coordinator.
//!
//! Shows the user's home state next to central government notices. Each
//! column is its own [`FeedReconciler`] with its own pagination; sort order,
//! period and notice type are shared and a change to any of them reloads
//! both columns from page 0.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::NoticeApi;
use crate::error::Result;
use crate::feed::{FeedReconciler, FilterState, FilterUpdate, LoadOutcome, Period, Reloadable, SortBy};
use crate::models::CENTRAL;

/// Page length of each column.
pub const DUAL_PAGE_SIZE: u32 = 15;

/// Filter fields applied identically to both columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedFilters {
    pub sort_by: SortBy,
    pub period: Period,
    pub notice_type: Option<String>,
}

impl SharedFilters {
    /// Take the shared fields of `update`; every other field is ignored.
    pub fn apply_update(&self, update: &FilterUpdate) -> SharedFilters {
        let mut next = self.clone();
        if let Some(sort_by) = update.sort_by {
            next.sort_by = sort_by;
        }
        if let Some(period) = update.period {
            next.period = period;
        }
        if let Some(notice_type) = &update.notice_type {
            next.notice_type = notice_type.clone();
        }
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// The user's home state
    State,
    /// Central government notices
    Central,
}

/// Results of loading both columns together.
#[derive(Debug)]
pub struct DualLoad {
    pub state: Result<LoadOutcome>,
    pub central: Result<LoadOutcome>,
}

impl DualLoad {
    /// Both outcomes, or the first error.
    pub fn into_result(self) -> Result<(LoadOutcome, LoadOutcome)> {
        Ok((self.state?, self.central?))
    }
}

pub struct DualFeedCoordinator {
    home_state: String,
    shared: SharedFilters,
    size: u32,
    state_feed: FeedReconciler,
    central_feed: FeedReconciler,
}

impl DualFeedCoordinator {
    pub fn new(api: Arc<dyn NoticeApi>, home_state: impl Into<String>, size: u32) -> Self {
        let home_state = home_state.into();
        let shared = SharedFilters::default();
        let state_filters = column_filters(&shared, &home_state, size);
        let central_filters = column_filters(&shared, CENTRAL, size);
        Self {
            state_feed: FeedReconciler::new(home_state.clone(), api.clone(), state_filters),
            central_feed: FeedReconciler::new(CENTRAL, api, central_filters),
            home_state,
            shared,
            size,
        }
    }

    pub fn home_state(&self) -> &str {
        &self.home_state
    }

    pub fn shared(&self) -> &SharedFilters {
        &self.shared
    }

    pub fn column(&self, column: Column) -> &FeedReconciler {
        match column {
            Column::State => &self.state_feed,
            Column::Central => &self.central_feed,
        }
    }

    /// Full filter tuple a column fetches with.
    pub fn filters_for(&self, column: Column) -> FilterState {
        let state = match column {
            Column::State => self.home_state.as_str(),
            Column::Central => CENTRAL,
        };
        column_filters(&self.shared, state, self.size)
    }

    /// Replace the shared filters; reloads both columns when they changed.
    pub async fn apply_shared(&mut self, shared: SharedFilters) -> Option<DualLoad> {
        if shared == self.shared {
            return None;
        }
        log::debug!("Dual feed: shared filters changed to {:?}", shared);
        self.shared = shared;
        Some(self.reload_all().await)
    }

    /// Restore default shared filters without loading.
    pub fn reset_shared(&mut self) {
        self.shared = SharedFilters::default();
    }

    /// Reload both columns from page 0, concurrently.
    pub async fn reload_all(&self) -> DualLoad {
        let state_filters = self.filters_for(Column::State);
        let central_filters = self.filters_for(Column::Central);
        let (state, central) = futures::join!(
            self.state_feed.load(&state_filters, 0, true),
            self.central_feed.load(&central_filters, 0, true)
        );
        DualLoad { state, central }
    }

    /// Continue one column; the other is untouched.
    pub async fn request_next_page(&self, column: Column) -> Result<LoadOutcome> {
        self.column(column).request_next_page().await
    }
}

fn column_filters(shared: &SharedFilters, state: &str, size: u32) -> FilterState {
    FilterState {
        state: Some(state.to_string()),
        notice_type: shared.notice_type.clone(),
        period: shared.period,
        sort_by: shared.sort_by,
        ..FilterState::with_size(size)
    }
}

#[async_trait]
impl Reloadable for DualFeedCoordinator {
    fn name(&self) -> &str {
        "dual"
    }

    async fn reload_from_start(&self) -> Result<()> {
        self.reload_all().await.into_result().map(|_| ())
    }
}
