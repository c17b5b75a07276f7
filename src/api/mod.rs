//! Backend REST collaborator.
//!
//! The feed core only talks to the backend through [`NoticeApi`]; the
//! reqwest-backed [`HttpNoticeApi`] is the production implementation.

mod http;
mod query;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{FeedPage, Notice, NoticeId, RefreshSummary};

pub use http::HttpNoticeApi;
pub use query::NoticeQuery;

/// Endpoints consumed by the client.
#[async_trait]
pub trait NoticeApi: Send + Sync {
    /// `GET /notices` with filter parameters.
    async fn fetch_notices(&self, query: &NoticeQuery) -> Result<FeedPage>;

    /// `GET /notices/{id}`.
    async fn fetch_notice(&self, id: &NoticeId) -> Result<Notice>;

    /// `GET /categories`.
    async fn fetch_categories(&self) -> Result<Vec<String>>;

    /// `GET /states`, in backend order.
    async fn fetch_states(&self) -> Result<Vec<String>>;

    /// `GET /notices/new-count`.
    async fn fetch_new_count(&self) -> Result<u64>;

    /// `POST /admin/refresh`.
    async fn trigger_refresh(&self) -> Result<RefreshSummary>;
}
