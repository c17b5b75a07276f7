// src/api/http.rs

//! reqwest implementation of the notices API.

use async_trait::async_trait;
use reqwest::Client;

use crate::api::{NoticeApi, NoticeQuery};
use crate::error::Result;
use crate::models::{ApiConfig, FeedPage, Notice, NoticeId, RefreshSummary};
use crate::utils::http::{create_async_client, send_enveloped};
use crate::utils::links::endpoint;

/// Notices API over HTTP.
#[derive(Clone)]
pub struct HttpNoticeApi {
    client: Client,
    base_url: String,
}

impl HttpNoticeApi {
    /// Create a client for the configured base URL.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        url::Url::parse(&config.base_url)?;
        Ok(Self {
            client: create_async_client(config)?,
            base_url: config.base_url.clone(),
        })
    }

    /// Create from an existing client, e.g. to share a connection pool.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        endpoint(&self.base_url, path)
    }
}

#[async_trait]
impl NoticeApi for HttpNoticeApi {
    async fn fetch_notices(&self, query: &NoticeQuery) -> Result<FeedPage> {
        log::debug!(
            "GET /notices page={} size={} state={:?}",
            query.page,
            query.size,
            query.state
        );
        let request = self.client.get(self.url("notices")).query(&query.params());
        send_enveloped(request).await
    }

    async fn fetch_notice(&self, id: &NoticeId) -> Result<Notice> {
        let request = self.client.get(self.url(&format!("notices/{id}")));
        send_enveloped(request).await
    }

    async fn fetch_categories(&self) -> Result<Vec<String>> {
        send_enveloped(self.client.get(self.url("categories"))).await
    }

    async fn fetch_states(&self) -> Result<Vec<String>> {
        send_enveloped(self.client.get(self.url("states"))).await
    }

    async fn fetch_new_count(&self) -> Result<u64> {
        send_enveloped(self.client.get(self.url("notices/new-count"))).await
    }

    async fn trigger_refresh(&self) -> Result<RefreshSummary> {
        log::info!("POST /admin/refresh");
        send_enveloped(self.client.post(self.url("admin/refresh"))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Config;

    #[test]
    fn test_rejects_invalid_base_url() {
        let mut config = Config::default();
        config.api.base_url = "::nope".to_string();
        assert!(HttpNoticeApi::new(&config.api).is_err());
    }

    #[test]
    fn test_endpoint_urls() {
        let api = HttpNoticeApi::new(&Config::default().api).unwrap();
        assert_eq!(
            api.url("notices/new-count"),
            "http://localhost:8080/api/notices/new-count"
        );
    }
}
