// src/feed/refresh.rs

//! Manual refresh and the "new notices" counter.
//!
//! A refresh asks the backend to re-ingest its sources, then reloads every
//! active feed from page 0 and re-reads the new count. Only one refresh may
//! run at a time. The outcome is reported through a short-lived toast.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::future::join_all;

use crate::api::NoticeApi;
use crate::error::{AppError, Result};
use crate::models::RefreshSummary;

pub const REFRESH_FAILED_MESSAGE: &str = "Refresh failed. Try again later.";

/// A feed (or group of feeds) that can restart from its first page.
#[async_trait]
pub trait Reloadable: Send + Sync {
    /// Name used in log lines.
    fn name(&self) -> &str;

    async fn reload_from_start(&self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Failure,
}

/// Transient user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub expires_at: Instant,
}

impl Toast {
    pub fn is_visible_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible_at(Instant::now())
    }
}

/// Clears the in-flight flag when the refresh settles.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Single-flight refresh plus the advisory new-notice count.
pub struct RefreshOrchestrator {
    api: Arc<dyn NoticeApi>,
    in_flight: AtomicBool,
    new_count: Mutex<Option<u64>>,
    toast: Mutex<Option<Toast>>,
    toast_ttl: Duration,
}

impl RefreshOrchestrator {
    pub fn new(api: Arc<dyn NoticeApi>, toast_ttl: Duration) -> Self {
        Self {
            api,
            in_flight: AtomicBool::new(false),
            new_count: Mutex::new(None),
            toast: Mutex::new(None),
            toast_ttl,
        }
    }

    /// Trigger a backend refresh and reload `targets` on success.
    ///
    /// Fails with [`AppError::RefreshInFlight`] while another refresh runs.
    /// When the backend call fails the feeds are left as they are.
    pub async fn refresh(&self, targets: &[&dyn Reloadable]) -> Result<RefreshSummary> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            log::debug!("Refresh rejected: already in flight");
            return Err(AppError::RefreshInFlight);
        }
        let _guard = FlightGuard(&self.in_flight);

        log::info!("Triggering backend refresh");
        let summary = match self.api.trigger_refresh().await {
            Ok(summary) => summary,
            Err(e) => {
                log::error!("Refresh failed: {}", e);
                self.show_toast(ToastKind::Failure, REFRESH_FAILED_MESSAGE);
                return Err(AppError::refresh(e));
            }
        };

        log::info!(
            "Refresh saved {} new notices ({} seen, {} skipped, {} errors)",
            summary.saved,
            summary.total,
            summary.skipped,
            summary.errors
        );
        self.show_toast(
            ToastKind::Success,
            format!("Refreshed! {} new notices added.", summary.saved),
        );

        let results = join_all(targets.iter().map(|t| t.reload_from_start())).await;
        for (target, result) in targets.iter().zip(results) {
            if let Err(e) = result {
                log::warn!("Reload of {} after refresh failed: {}", target.name(), e);
            }
        }
        if let Err(e) = self.sync_new_count().await {
            log::warn!("New count unavailable after refresh: {}", e);
        }
        Ok(summary)
    }

    /// Re-read the new-notice count. A failure keeps the previous value.
    pub async fn sync_new_count(&self) -> Result<u64> {
        let count = self.api.fetch_new_count().await?;
        *self.new_count.lock().unwrap_or_else(PoisonError::into_inner) = Some(count);
        log::debug!("New notice count: {}", count);
        Ok(count)
    }

    /// Last known count; `None` until the first successful read.
    pub fn new_count(&self) -> Option<u64> {
        *self.new_count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// The current toast, if it has not expired.
    pub fn toast(&self) -> Option<Toast> {
        self.toast_at(Instant::now())
    }

    pub fn toast_at(&self, now: Instant) -> Option<Toast> {
        self.toast
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|t| t.is_visible_at(now))
            .cloned()
    }

    pub fn dismiss_toast(&self) {
        *self.toast.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn show_toast(&self, kind: ToastKind, message: impl Into<String>) {
        let toast = Toast {
            kind,
            message: message.into(),
            expires_at: Instant::now() + self.toast_ttl,
        };
        *self.toast.lock().unwrap_or_else(PoisonError::into_inner) = Some(toast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_expiry() {
        let now = Instant::now();
        let toast = Toast {
            kind: ToastKind::Success,
            message: "Refreshed! 2 new notices added.".to_string(),
            expires_at: now + Duration::from_secs(3),
        };
        assert!(toast.is_visible_at(now));
        assert!(toast.is_visible_at(now + Duration::from_secs(2)));
        assert!(!toast.is_visible_at(now + Duration::from_secs(3)));
    }

    #[test]
    fn test_flight_guard_releases_flag() {
        let flag = AtomicBool::new(true);
        {
            let _guard = FlightGuard(&flag);
        }
        assert!(!flag.load(Ordering::SeqCst));
    }
}
