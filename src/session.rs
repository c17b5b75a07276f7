// src/session.rs

//! Client session: one reconciliation core behind tabs, the onboarding gate
//! and the choice between the aggregated and the dual feed.
//!
//! ## Views
//!
//! ```text
//! Jobs         aggregated feed, or home state + Central when a state was chosen
//! Engineering  branch-filtered feed
//! Saved        bookmark snapshots
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::api::NoticeApi;
use crate::error::Result;
use crate::feed::{
    Column, DualFeedCoordinator, EngineeringFeed, FeedReconciler, FilterChange, FilterController,
    FilterState, FilterUpdate, LoadOutcome, RefreshOrchestrator, Reloadable, FeedStatus,
};
use crate::models::{Config, Notice, NoticeId, RefreshSummary, find_region, selectable_states};
use crate::state::{BookmarkStore, OnboardingHolder};
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Jobs,
    Engineering,
    Saved,
}

/// How the Jobs tab is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedMode {
    /// Onboarding not answered yet; no jobs feed is loaded
    Onboarding,
    /// Single filterable feed
    Aggregated,
    /// Home state next to Central
    Dual,
}

pub struct Session {
    api: Arc<dyn NoticeApi>,
    tab: Tab,
    filters: FilterController,
    feed: FeedReconciler,
    dual: Option<DualFeedCoordinator>,
    dual_page_size: u32,
    engineering: EngineeringFeed,
    bookmarks: BookmarkStore,
    onboarding: OnboardingHolder,
    refresh: RefreshOrchestrator,
    states: Vec<String>,
}

impl Session {
    /// Restore persisted user state and build idle feeds. Nothing is fetched
    /// until [`Session::start`].
    pub fn new(api: Arc<dyn NoticeApi>, store: Arc<dyn KeyValueStore>, config: &Config) -> Self {
        let defaults = FilterState::with_size(config.feed.page_size);
        let onboarding = OnboardingHolder::load(store.clone());
        let dual_page_size = config.feed.dual_page_size;
        let dual = onboarding
            .selected_state()
            .map(|state| DualFeedCoordinator::new(api.clone(), state, dual_page_size));

        Self {
            feed: FeedReconciler::new("all", api.clone(), defaults.clone()),
            filters: FilterController::new(defaults),
            dual,
            dual_page_size,
            engineering: EngineeringFeed::new(api.clone(), config.feed.engineering_page_size),
            bookmarks: BookmarkStore::load(store),
            onboarding,
            refresh: RefreshOrchestrator::new(
                api.clone(),
                Duration::from_secs(config.refresh.toast_secs),
            ),
            states: Vec::new(),
            tab: Tab::Jobs,
            api,
        }
    }

    /// Fetch the state list and new count, then load the Jobs feed unless
    /// onboarding is still pending.
    ///
    /// Only a failed feed load is returned; the other two are advisory.
    pub async fn start(&mut self) -> Result<()> {
        let (states, count) = futures::join!(self.api.fetch_states(), self.refresh.sync_new_count());
        match states {
            Ok(states) => self.states = states,
            Err(e) => log::warn!("State list unavailable: {}", e),
        }
        if let Err(e) = count {
            log::warn!("New count unavailable: {}", e);
        }

        if self.needs_onboarding() {
            log::info!("Waiting for onboarding before loading notices");
            return Ok(());
        }
        self.load_jobs().await
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn mode(&self) -> FeedMode {
        if self.needs_onboarding() {
            FeedMode::Onboarding
        } else if self.dual.is_some() {
            FeedMode::Dual
        } else {
            FeedMode::Aggregated
        }
    }

    pub fn needs_onboarding(&self) -> bool {
        self.onboarding.should_show()
    }

    /// Switch tabs. Entering Jobs restores default filters and reloads;
    /// Engineering loads on first visit.
    pub async fn select_tab(&mut self, tab: Tab) -> Result<()> {
        log::debug!("Switching to {:?}", tab);
        self.tab = tab;
        match tab {
            Tab::Jobs => {
                self.filters.reset();
                if let Some(dual) = self.dual.as_mut() {
                    dual.reset_shared();
                }
                if self.needs_onboarding() {
                    return Ok(());
                }
                self.load_jobs().await
            }
            Tab::Engineering => {
                if self.engineering.feed().status() == FeedStatus::Idle {
                    self.engineering.reload().await?;
                }
                Ok(())
            }
            Tab::Saved => Ok(()),
        }
    }

    async fn load_jobs(&self) -> Result<()> {
        match &self.dual {
            Some(dual) => dual.reload_all().await.into_result().map(|_| ()),
            None => {
                let filters = self.filters.current().clone();
                self.feed.load(&filters, filters.page, true).await.map(|_| ())
            }
        }
    }

    /// Apply a filter change to the Jobs feed and fetch only when needed.
    ///
    /// In dual mode only sort order, period and notice type apply.
    pub async fn update_filters(&mut self, update: &FilterUpdate) -> Result<FilterChange> {
        // Continuations and refreshes move the feed without going through the controller.
        self.filters.record_page(self.feed.page());
        let change = self.filters.apply(update);
        if let Some(dual) = self.dual.as_mut() {
            let shared = dual.shared().apply_update(update);
            return match dual.apply_shared(shared).await {
                Some(load) => load.into_result().map(|_| FilterChange::Reload { page: 0 }),
                None => Ok(FilterChange::Unchanged),
            };
        }

        let filters = self.filters.current().clone();
        match change {
            FilterChange::Unchanged => {}
            FilterChange::Projection { show_new_only } => self.feed.set_show_new_only(show_new_only),
            FilterChange::Reload { page } => {
                self.feed.load(&filters, page, true).await?;
            }
            FilterChange::Continue { page } => {
                self.feed.load(&filters, page, false).await?;
            }
        }
        Ok(change)
    }

    /// Continuation trigger for the aggregated feed.
    pub async fn request_next_page(&self) -> Result<LoadOutcome> {
        self.feed.request_next_page().await
    }

    /// Continuation trigger for one dual column.
    pub async fn request_next_page_in(&self, column: Column) -> Result<LoadOutcome> {
        match &self.dual {
            Some(dual) => dual.request_next_page(column).await,
            None => Ok(LoadOutcome::Skipped),
        }
    }

    /// Answer onboarding; `None` skips to the aggregated feed.
    ///
    /// Known state names are normalised to their catalogue spelling.
    pub async fn complete_onboarding(&mut self, state: Option<&str>) -> Result<()> {
        let state = state.map(|s| find_region(s).map(|r| r.name).unwrap_or(s));
        self.onboarding.complete(state)?;
        self.dual = self
            .onboarding
            .selected_state()
            .map(|s| DualFeedCoordinator::new(self.api.clone(), s, self.dual_page_size));
        self.filters.reset();
        if self.tab == Tab::Jobs {
            self.load_jobs().await?;
        }
        Ok(())
    }

    /// Forget the onboarding answer so the picker shows again.
    pub fn reset_onboarding(&mut self) -> Result<()> {
        self.onboarding.reset()?;
        self.dual = None;
        Ok(())
    }

    pub fn toggle_save(&mut self, notice: &Notice) -> Result<bool> {
        self.bookmarks.toggle_save(notice)
    }

    pub fn is_saved(&self, id: &NoticeId) -> bool {
        self.bookmarks.is_saved(id)
    }

    /// Trigger a backend refresh and reload every feed that was loaded.
    pub async fn refresh(&self) -> Result<RefreshSummary> {
        let mut targets: Vec<&dyn Reloadable> = Vec::new();
        if !self.needs_onboarding() {
            match &self.dual {
                Some(dual) => targets.push(dual),
                None => targets.push(&self.feed),
            }
        }
        if self.engineering.feed().status() != FeedStatus::Idle {
            targets.push(self.engineering.feed());
        }
        self.refresh.refresh(&targets).await
    }

    /// One-line summary of what is on screen.
    pub fn headline(&self) -> String {
        match self.tab {
            Tab::Engineering => "Engineering Govt Jobs India".to_string(),
            Tab::Saved => format!("Your Saved Notices ({})", self.bookmarks.len()),
            Tab::Jobs => match (self.onboarding.selected_state(), &self.filters.current().state) {
                (Some(home), _) => format!("{home} + Central Govt Jobs"),
                (None, Some(state)) if !state.trim().is_empty() => {
                    format!("{state} Sarkari Naukri")
                }
                _ => "Latest Government Job Notifications".to_string(),
            },
        }
    }

    pub fn filters(&self) -> &FilterState {
        self.filters.current()
    }

    pub fn feed(&self) -> &FeedReconciler {
        &self.feed
    }

    pub fn dual(&self) -> Option<&DualFeedCoordinator> {
        self.dual.as_ref()
    }

    pub fn engineering(&self) -> &EngineeringFeed {
        &self.engineering
    }

    pub fn engineering_mut(&mut self) -> &mut EngineeringFeed {
        &mut self.engineering
    }

    pub fn bookmarks(&self) -> &BookmarkStore {
        &self.bookmarks
    }

    pub fn onboarding(&self) -> &OnboardingHolder {
        &self.onboarding
    }

    pub fn refresher(&self) -> &RefreshOrchestrator {
        &self.refresh
    }

    /// States offered by the filter, without the Central sentinel.
    pub fn states(&self) -> Vec<String> {
        selectable_states(&self.states)
    }
}
