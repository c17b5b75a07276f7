// src/models/mod.rs

//! Domain models for the notice client.
//!
//! This module contains the data structures exchanged with the backend and
//! the application configuration.

mod config;
mod notice;
mod page;
mod states;

// Re-export all public types
pub use config::{
    API_URL_ENV, ApiConfig, Config, FeedConfig, MAX_PAGE_SIZE, OutputConfig, RefreshConfig,
};
pub use notice::{Category, Notice, NoticeId, NoticeType};
pub use page::{ApiEnvelope, FeedPage, RefreshSummary};
pub use states::{
    CENTRAL, INDIAN_REGIONS, Region, RegionKind, find_region, search_regions, selectable_states,
};
