// src/lib.rs

//! GovtJobs notice client library
//!
//! Headless core of the government job notices front-end: filter state,
//! feed reconciliation, the home-state/central dual view, bookmarks,
//! onboarding and manual refresh.

pub mod api;
pub mod error;
pub mod feed;
pub mod models;
pub mod session;
pub mod state;
pub mod storage;
pub mod utils;

pub use error::{AppError, Result};
pub use session::{FeedMode, Session, Tab};
