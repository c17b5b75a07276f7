//! Scripted in-memory backend for feed tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use futures::channel::oneshot;

use govtjobs::api::{NoticeApi, NoticeQuery};
use govtjobs::error::{AppError, Result};
use govtjobs::models::{Category, FeedPage, Notice, NoticeId, RefreshSummary};

type Responder = Box<dyn Fn(&NoticeQuery) -> Result<FeedPage> + Send + Sync>;

/// Answers `fetch_notices` through a closure and records every query.
///
/// `hold_next` parks the next listing call until the returned sender fires,
/// which lets a test decide the order in which responses arrive.
pub struct FakeApi {
    responder: Responder,
    calls: Mutex<Vec<NoticeQuery>>,
    gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    fail_fetches: AtomicBool,
    states: Vec<String>,
    new_count: AtomicU64,
    refresh_saved: Mutex<Option<u64>>,
    refresh_gate: Mutex<Option<oneshot::Receiver<()>>>,
    refresh_calls: AtomicU64,
}

impl FakeApi {
    pub fn new(responder: impl Fn(&NoticeQuery) -> Result<FeedPage> + Send + Sync + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
            gates: Mutex::new(VecDeque::new()),
            fail_fetches: AtomicBool::new(false),
            states: vec!["Central".to_string(), "Kerala".to_string(), "Bihar".to_string()],
            new_count: AtomicU64::new(0),
            refresh_saved: Mutex::new(Some(0)),
            refresh_gate: Mutex::new(None),
            refresh_calls: AtomicU64::new(0),
        }
    }

    /// Park the next `fetch_notices` call until the sender is fired.
    pub fn hold_next(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        tx
    }

    /// Park the next `trigger_refresh` call until the sender is fired.
    pub fn hold_refresh(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.refresh_gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.fail_fetches.store(fail, Ordering::SeqCst);
    }

    pub fn set_new_count(&self, count: u64) {
        self.new_count.store(count, Ordering::SeqCst);
    }

    /// `Some(n)` makes the refresh save `n` notices, `None` makes it fail.
    pub fn set_refresh_result(&self, saved: Option<u64>) {
        *self.refresh_saved.lock().unwrap() = saved;
    }

    pub fn calls(&self) -> Vec<NoticeQuery> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn refresh_calls(&self) -> u64 {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NoticeApi for FakeApi {
    async fn fetch_notices(&self, query: &NoticeQuery) -> Result<FeedPage> {
        self.calls.lock().unwrap().push(query.clone());
        let gate = self.gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(AppError::Status {
                status: 503,
                url: "http://fake/notices".to_string(),
            });
        }
        (self.responder)(query)
    }

    async fn fetch_notice(&self, id: &NoticeId) -> Result<Notice> {
        Ok(Notice::new(id.clone(), format!("Notice {id}")))
    }

    async fn fetch_categories(&self) -> Result<Vec<String>> {
        Ok(Category::ALL.iter().map(|c| c.as_str().to_string()).collect())
    }

    async fn fetch_states(&self) -> Result<Vec<String>> {
        Ok(self.states.clone())
    }

    async fn fetch_new_count(&self) -> Result<u64> {
        Ok(self.new_count.load(Ordering::SeqCst))
    }

    async fn trigger_refresh(&self) -> Result<RefreshSummary> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.refresh_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let saved = *self.refresh_saved.lock().unwrap();
        match saved {
            Some(saved) => Ok(RefreshSummary {
                total: saved,
                saved,
                skipped: 0,
                errors: 0,
            }),
            None => Err(AppError::Status {
                status: 500,
                url: "http://fake/admin/refresh".to_string(),
            }),
        }
    }
}

pub fn notice(id: &str) -> Notice {
    Notice::new(id, format!("Notice {id}"))
}

pub fn flagged(id: &str, is_new: bool) -> Notice {
    Notice {
        is_new: Some(is_new),
        ..notice(id)
    }
}

pub fn page(ids: &[&str], total_pages: u32, total_elements: u64) -> FeedPage {
    FeedPage::new(ids.iter().map(|id| notice(id)).collect(), total_pages, total_elements)
}

pub fn ids(notices: &[Notice]) -> Vec<String> {
    notices.iter().map(|n| n.id.to_string()).collect()
}
