// src/feed/reconciler.rs

//! Feed reconciler.
//!
//! Owns the in-memory list of one feed and merges fetched pages into it.
//!
//! ## Merge Rules
//!
//! - page 0 or an explicit reset replaces the list with the response, in
//!   server order
//! - any other page appends only ids not already present, so fetching the
//!   same page twice never duplicates entries
//! - `totalPages` / `totalElements` always come from the latest response
//!
//! ## Ordering
//!
//! Every load takes a fresh request token before it suspends. When the
//! response arrives it is applied only if its token is still the latest one
//! issued for this feed; older responses are dropped.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::api::{NoticeApi, NoticeQuery};
use crate::error::{AppError, Result};
use crate::feed::{FilterState, Reloadable};
use crate::models::{Notice, NoticeId};
use crate::utils::dates;

/// Load status of a feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeedStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// What happened to one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response was merged; `added` notices were not in the list before
    Applied { page: u32, added: usize },
    /// A newer load was issued before this one completed
    Superseded,
    /// Nothing to do: already loading, no more pages or nothing to retry
    Skipped,
}

impl LoadOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, LoadOutcome::Applied { .. })
    }
}

/// Point-in-time copy of a feed for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSnapshot {
    /// Notices after the new-only projection
    pub notices: Vec<Notice>,
    /// Number of notices loaded, before the projection
    pub loaded: usize,
    pub page: u32,
    pub total_pages: u32,
    pub total_elements: u64,
    pub status: FeedStatus,
    pub error: Option<String>,
    pub show_new_only: bool,
}

impl FeedSnapshot {
    pub fn has_more(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    /// Loaded successfully but nothing matched.
    pub fn is_empty_result(&self) -> bool {
        self.status == FeedStatus::Ready && self.notices.is_empty()
    }
}

/// Merge a fetched page into `current`.
///
/// Returns how many notices the merge added.
pub fn merge_page(current: &mut Vec<Notice>, incoming: Vec<Notice>, replace: bool) -> usize {
    if replace {
        *current = incoming;
        return current.len();
    }
    let mut seen: HashSet<NoticeId> = current.iter().map(|n| n.id.clone()).collect();
    let before = current.len();
    current.extend(incoming.into_iter().filter(|n| seen.insert(n.id.clone())));
    current.len() - before
}

#[derive(Debug, Default)]
struct FeedState {
    /// Latest request token handed out
    issued: u64,
    notices: Vec<Notice>,
    filters: FilterState,
    page: u32,
    total_pages: u32,
    total_elements: u64,
    status: FeedStatus,
    error: Option<String>,
    /// Page and reset flag of the latest load, for `retry`
    last_request: Option<(u32, bool)>,
}

impl FeedState {
    fn has_more(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    fn issue(&mut self, filters: &FilterState, page: u32, reset: bool) -> u64 {
        self.issued += 1;
        self.status = FeedStatus::Loading;
        self.filters = filters.clone();
        self.last_request = Some((page, reset));
        self.issued
    }
}

/// One paginated feed bound to a filter tuple.
pub struct FeedReconciler {
    label: String,
    api: Arc<dyn NoticeApi>,
    state: Mutex<FeedState>,
}

impl FeedReconciler {
    /// Create an idle feed. `label` names the feed in errors and logs.
    pub fn new(label: impl Into<String>, api: Arc<dyn NoticeApi>, filters: FilterState) -> Self {
        Self {
            label: label.into(),
            api,
            state: Mutex::new(FeedState {
                filters,
                ..FeedState::default()
            }),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch `page` for `filters` and merge it.
    ///
    /// Settles the feed to `Ready` or `Error` unless a newer load was issued
    /// meanwhile, in which case the response is dropped and
    /// [`LoadOutcome::Superseded`] returned.
    pub async fn load(&self, filters: &FilterState, page: u32, reset: bool) -> Result<LoadOutcome> {
        let token = self.lock().issue(filters, page, reset);
        self.fetch(token, filters, page, reset).await
    }

    /// Reload page 0 with the current filters.
    pub async fn reload(&self) -> Result<LoadOutcome> {
        let filters = self.filters();
        self.load(&filters, 0, true).await
    }

    /// Continue with the next page, unless a load is running or the last
    /// page was reached.
    pub async fn request_next_page(&self) -> Result<LoadOutcome> {
        let (token, filters, page) = {
            let mut state = self.lock();
            if state.status == FeedStatus::Loading || !state.has_more() {
                log::debug!("{} feed: continuation skipped", self.label);
                return Ok(LoadOutcome::Skipped);
            }
            let page = state.page + 1;
            let filters = state.filters.clone();
            (state.issue(&filters, page, false), filters, page)
        };
        self.fetch(token, &filters, page, false).await
    }

    /// Repeat the latest load after it failed.
    pub async fn retry(&self) -> Result<LoadOutcome> {
        let (token, filters, page, reset) = {
            let mut state = self.lock();
            let Some((page, reset)) = state.last_request else {
                return Ok(LoadOutcome::Skipped);
            };
            if state.status != FeedStatus::Error {
                return Ok(LoadOutcome::Skipped);
            }
            let filters = state.filters.clone();
            (state.issue(&filters, page, reset), filters, page, reset)
        };
        self.fetch(token, &filters, page, reset).await
    }

    async fn fetch(
        &self,
        token: u64,
        filters: &FilterState,
        page: u32,
        reset: bool,
    ) -> Result<LoadOutcome> {
        log::debug!(
            "{} feed: loading page {} (token {}, reset {})",
            self.label,
            page,
            token,
            reset
        );
        let query = NoticeQuery::from_filters(filters, page);
        let result = self.api.fetch_notices(&query).await;

        let mut state = self.lock();
        if state.issued != token {
            log::debug!(
                "{} feed: dropping response for token {} (latest is {})",
                self.label,
                token,
                state.issued
            );
            return Ok(LoadOutcome::Superseded);
        }

        let replace = reset || page == 0;
        match result {
            Ok(fetched) => {
                let added = merge_page(&mut state.notices, fetched.content, replace);
                state.page = page;
                state.total_pages = fetched.total_pages;
                state.total_elements = fetched.total_elements;
                state.status = FeedStatus::Ready;
                state.error = None;
                log::debug!(
                    "{} feed: page {} added {} notices ({} of {})",
                    self.label,
                    page,
                    added,
                    state.notices.len(),
                    state.total_elements
                );
                Ok(LoadOutcome::Applied { page, added })
            }
            Err(e) => {
                log::warn!("{} feed: page {} failed: {}", self.label, page, e);
                if replace {
                    state.notices.clear();
                    state.page = 0;
                    state.total_pages = 0;
                    state.total_elements = 0;
                }
                let err = AppError::fetch(&self.label, e);
                state.status = FeedStatus::Error;
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Switch the new-only projection without fetching.
    pub fn set_show_new_only(&self, show_new_only: bool) {
        self.lock().filters.show_new_only = show_new_only;
    }

    /// Filters of the latest load.
    pub fn filters(&self) -> FilterState {
        self.lock().filters.clone()
    }

    /// Every loaded notice, ignoring the new-only projection.
    pub fn notices(&self) -> Vec<Notice> {
        self.lock().notices.clone()
    }

    /// Notices as displayed on `today`.
    pub fn visible_on(&self, today: NaiveDate) -> Vec<Notice> {
        let state = self.lock();
        project(&state, today)
    }

    pub fn visible(&self) -> Vec<Notice> {
        self.visible_on(dates::today())
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        let state = self.lock();
        FeedSnapshot {
            notices: project(&state, dates::today()),
            loaded: state.notices.len(),
            page: state.page,
            total_pages: state.total_pages,
            total_elements: state.total_elements,
            status: state.status,
            error: state.error.clone(),
            show_new_only: state.filters.show_new_only,
        }
    }

    pub fn status(&self) -> FeedStatus {
        self.lock().status
    }

    pub fn is_loading(&self) -> bool {
        self.status() == FeedStatus::Loading
    }

    pub fn page(&self) -> u32 {
        self.lock().page
    }

    pub fn total_pages(&self) -> u32 {
        self.lock().total_pages
    }

    pub fn total_elements(&self) -> u64 {
        self.lock().total_elements
    }

    pub fn has_more(&self) -> bool {
        self.lock().has_more()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }
}

fn project(state: &FeedState, today: NaiveDate) -> Vec<Notice> {
    if state.filters.show_new_only {
        state
            .notices
            .iter()
            .filter(|n| n.is_new_on(today))
            .cloned()
            .collect()
    } else {
        state.notices.clone()
    }
}

#[async_trait]
impl Reloadable for FeedReconciler {
    fn name(&self) -> &str {
        &self.label
    }

    async fn reload_from_start(&self) -> Result<()> {
        self.reload().await.map(|_| ())
    }
}
