// src/feed/filter.rs

//! Filter state controller.
//!
//! Owns the canonical query tuple and the pagination-reset rule: any update
//! that does not name `page` restarts at page 0. Each update is classified
//! into a [`FilterChange`] so the caller fetches only when the query that
//! goes on the wire actually changed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default page length of the aggregated feed.
pub const DEFAULT_PAGE_SIZE: u32 = 18;

/// Publication window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    #[default]
    All,
    Today,
    ThisWeek,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::All => "all",
            Period::Today => "today",
            Period::ThisWeek => "this_week",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Period::All),
            "today" => Ok(Period::Today),
            "this_week" | "week" => Ok(Period::ThisWeek),
            other => Err(AppError::validation(format!("unknown period '{other}'"))),
        }
    }
}

/// Server-side ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Newest,
    Deadline,
    Fetched,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Newest => "newest",
            SortBy::Deadline => "deadline",
            SortBy::Fetched => "fetched",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(SortBy::Newest),
            "deadline" => Ok(SortBy::Deadline),
            "fetched" | "recent" => Ok(SortBy::Fetched),
            other => Err(AppError::validation(format!("unknown sort order '{other}'"))),
        }
    }
}

/// The query tuple behind a feed.
///
/// `category`, `state`, `notice_type` and `branch` are free strings: values the
/// backend does not recognise are passed through and treated there as "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub category: Option<String>,
    pub state: Option<String>,
    pub notice_type: Option<String>,
    /// Engineering branch code, only used by the engineering feed
    pub branch: Option<String>,
    pub period: Period,
    pub sort_by: SortBy,
    /// Display-time projection; never sent to the backend
    pub show_new_only: bool,
    /// Zero-based page
    pub page: u32,
    pub size: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::with_size(DEFAULT_PAGE_SIZE)
    }
}

impl FilterState {
    /// Default tuple with a custom page length.
    pub fn with_size(size: u32) -> Self {
        Self {
            category: None,
            state: None,
            notice_type: None,
            branch: None,
            period: Period::All,
            sort_by: SortBy::Newest,
            show_new_only: false,
            page: 0,
            size,
        }
    }

    /// Merge `update` over this state.
    ///
    /// `page` comes from the update when it names one and is forced to 0
    /// otherwise.
    pub fn apply_update(&self, update: &FilterUpdate) -> FilterState {
        let mut next = self.clone();
        if let Some(category) = &update.category {
            next.category = category.clone();
        }
        if let Some(state) = &update.state {
            next.state = state.clone();
        }
        if let Some(notice_type) = &update.notice_type {
            next.notice_type = notice_type.clone();
        }
        if let Some(branch) = &update.branch {
            next.branch = branch.clone();
        }
        if let Some(period) = update.period {
            next.period = period;
        }
        if let Some(sort_by) = update.sort_by {
            next.sort_by = sort_by;
        }
        if let Some(show_new_only) = update.show_new_only {
            next.show_new_only = show_new_only;
        }
        if let Some(size) = update.size {
            next.size = size;
        }
        next.page = update.page.unwrap_or(0);
        next
    }

    /// True when both tuples put the same filters on the wire (ignoring page).
    pub fn same_query(&self, other: &FilterState) -> bool {
        self.category == other.category
            && self.state == other.state
            && self.notice_type == other.notice_type
            && self.branch == other.branch
            && self.period == other.period
            && self.sort_by == other.sort_by
            && self.size == other.size
    }
}

/// A partial update to [`FilterState`].
///
/// Outer `None` leaves a field untouched; `Some(None)` clears a string filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub category: Option<Option<String>>,
    pub state: Option<Option<String>>,
    pub notice_type: Option<Option<String>>,
    pub branch: Option<Option<String>>,
    pub period: Option<Period>,
    pub sort_by: Option<SortBy>,
    pub show_new_only: Option<bool>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl FilterUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: Option<impl Into<String>>) -> Self {
        self.category = Some(category.map(Into::into));
        self
    }

    pub fn state(mut self, state: Option<impl Into<String>>) -> Self {
        self.state = Some(state.map(Into::into));
        self
    }

    pub fn notice_type(mut self, notice_type: Option<impl Into<String>>) -> Self {
        self.notice_type = Some(notice_type.map(Into::into));
        self
    }

    pub fn branch(mut self, branch: Option<impl Into<String>>) -> Self {
        self.branch = Some(branch.map(Into::into));
        self
    }

    pub fn period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    pub fn show_new_only(mut self, show_new_only: bool) -> Self {
        self.show_new_only = Some(show_new_only);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }
}

/// What a filter update requires from the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChange {
    /// Nothing observable changed
    Unchanged,
    /// Only the new-only projection changed; no fetch
    Projection { show_new_only: bool },
    /// Fetch `page` and replace the list
    Reload { page: u32 },
    /// Fetch `page` and append it
    Continue { page: u32 },
}

impl FilterChange {
    pub fn needs_fetch(&self) -> bool {
        matches!(self, FilterChange::Reload { .. } | FilterChange::Continue { .. })
    }
}

/// Holds the current filter tuple of one view.
#[derive(Debug, Clone)]
pub struct FilterController {
    defaults: FilterState,
    current: FilterState,
}

impl Default for FilterController {
    fn default() -> Self {
        Self::new(FilterState::default())
    }
}

impl FilterController {
    pub fn new(defaults: FilterState) -> Self {
        Self {
            current: defaults.clone(),
            defaults,
        }
    }

    pub fn current(&self) -> &FilterState {
        &self.current
    }

    /// Apply a partial update and classify the transition.
    pub fn apply(&mut self, update: &FilterUpdate) -> FilterChange {
        let previous = std::mem::replace(&mut self.current, FilterState::default());
        self.current = previous.apply_update(update);
        let change = Self::classify(&previous, &self.current);
        log::debug!("Filter update classified as {:?}", change);
        change
    }

    /// Record the page the feed actually holds, so later page updates are
    /// judged against what is already loaded.
    pub fn record_page(&mut self, page: u32) {
        self.current.page = page;
    }

    /// Restore the default tuple, e.g. when the active view is switched.
    pub fn reset(&mut self) -> FilterChange {
        self.current = self.defaults.clone();
        FilterChange::Reload { page: 0 }
    }

    fn classify(previous: &FilterState, next: &FilterState) -> FilterChange {
        if !previous.same_query(next) {
            return FilterChange::Reload { page: next.page };
        }
        if next.page != previous.page && next.page > 0 {
            return FilterChange::Continue { page: next.page };
        }
        if next.show_new_only != previous.show_new_only {
            return FilterChange::Projection {
                show_new_only: next.show_new_only,
            };
        }
        if next.page != previous.page {
            return FilterChange::Reload { page: 0 };
        }
        FilterChange::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paged(page: u32) -> FilterState {
        FilterState {
            page,
            ..FilterState::default()
        }
    }

    #[test]
    fn test_update_without_page_resets_to_zero() {
        let state = paged(4);
        let next = state.apply_update(&FilterUpdate::new().category(Some("BANK")));
        assert_eq!(next.page, 0);
        assert_eq!(next.category.as_deref(), Some("BANK"));
    }

    #[test]
    fn test_update_with_page_keeps_page() {
        let state = paged(0);
        let next = state.apply_update(&FilterUpdate::new().page(5));
        assert_eq!(next.page, 5);
    }

    #[test]
    fn test_every_field_update_resets_page() {
        let updates = [
            FilterUpdate::new().category(Some("SSC")),
            FilterUpdate::new().state(Some("Kerala")),
            FilterUpdate::new().notice_type(Some("RESULT")),
            FilterUpdate::new().branch(Some("CIVIL")),
            FilterUpdate::new().period(Period::Today),
            FilterUpdate::new().sort_by(SortBy::Deadline),
            FilterUpdate::new().show_new_only(true),
            FilterUpdate::new().size(30),
            FilterUpdate::new(),
        ];
        for start in [0, 1, 7] {
            for update in &updates {
                assert_eq!(paged(start).apply_update(update).page, 0, "{update:?}");
            }
        }
    }

    #[test]
    fn test_clearing_a_filter() {
        let state = FilterState::default()
            .apply_update(&FilterUpdate::new().state(Some("Bihar")));
        let cleared = state.apply_update(&FilterUpdate::new().state(None::<String>));
        assert_eq!(cleared.state, None);
    }

    #[test]
    fn test_unknown_values_pass_through() {
        let next =
            FilterState::default().apply_update(&FilterUpdate::new().category(Some("ASTRONAUT")));
        assert_eq!(next.category.as_deref(), Some("ASTRONAUT"));
    }

    #[test]
    fn test_classify_query_change_reloads() {
        let mut controller = FilterController::default();
        let change = controller.apply(&FilterUpdate::new().sort_by(SortBy::Deadline));
        assert_eq!(change, FilterChange::Reload { page: 0 });
    }

    #[test]
    fn test_classify_page_advance_continues() {
        let mut controller = FilterController::default();
        assert_eq!(
            controller.apply(&FilterUpdate::new().page(1)),
            FilterChange::Continue { page: 1 }
        );
    }

    #[test]
    fn test_classify_new_only_is_projection() {
        let mut controller = FilterController::default();
        controller.apply(&FilterUpdate::new().page(2));
        let change = controller.apply(&FilterUpdate::new().show_new_only(true));
        assert_eq!(change, FilterChange::Projection { show_new_only: true });
        assert!(!change.needs_fetch());
        assert_eq!(controller.current().page, 0);
    }

    #[test]
    fn test_classify_identical_update_is_unchanged() {
        let mut controller = FilterController::default();
        controller.apply(&FilterUpdate::new().category(Some("PSU")));
        let change = controller.apply(&FilterUpdate::new().category(Some("PSU")));
        assert_eq!(change, FilterChange::Unchanged);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut controller = FilterController::new(FilterState::with_size(12));
        controller.apply(&FilterUpdate::new().category(Some("UPSC")).page(3));
        assert_eq!(controller.reset(), FilterChange::Reload { page: 0 });
        assert_eq!(controller.current(), &FilterState::with_size(12));
    }

    #[test]
    fn test_period_and_sort_parse() {
        assert_eq!("this_week".parse::<Period>().unwrap(), Period::ThisWeek);
        assert_eq!("Deadline".parse::<SortBy>().unwrap(), SortBy::Deadline);
        assert!("yesterday".parse::<Period>().is_err());
    }
}
