mod common;

use std::sync::Arc;

use common::{FakeApi, ids, notice, page};
use govtjobs::feed::{Column, FilterChange, FilterUpdate, Period, ToastKind};
use govtjobs::models::{Config, NoticeId};
use govtjobs::state::{SAVED_DATA_KEY, SAVED_IDS_KEY, SELECTED_STATE_KEY};
use govtjobs::storage::{KeyValueStore, LocalStore, MemoryStore};
use govtjobs::{AppError, FeedMode, Session, Tab};
use tempfile::TempDir;

fn backend() -> Arc<FakeApi> {
    Arc::new(FakeApi::new(|q| {
        Ok(match (q.state.as_deref(), q.page) {
            (Some("Central"), _) => page(&["c1"], 1, 1),
            (Some(_), _) => page(&["s1"], 1, 1),
            (None, 0) => page(&["1", "2"], 2, 4),
            (None, _) => page(&["2", "3"], 2, 4),
        })
    }))
}

fn answered(state: &str) -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_values([(SELECTED_STATE_KEY, state)]))
}

#[tokio::test]
async fn test_first_run_waits_for_onboarding() {
    let api = backend();
    let mut session = Session::new(api.clone(), Arc::new(MemoryStore::new()), &Config::default());
    session.start().await.unwrap();

    assert_eq!(session.mode(), FeedMode::Onboarding);
    assert_eq!(api.call_count(), 0);
    assert_eq!(session.states(), ["Kerala", "Bihar"]);
}

#[tokio::test]
async fn test_skipping_onboarding_shows_aggregated_feed() {
    let api = backend();
    let store = Arc::new(MemoryStore::new());
    let mut session = Session::new(api.clone(), store.clone(), &Config::default());
    session.complete_onboarding(None).await.unwrap();

    assert_eq!(session.mode(), FeedMode::Aggregated);
    assert_eq!(ids(&session.feed().notices()), ["1", "2"]);
    assert_eq!(store.get(SELECTED_STATE_KEY).unwrap().as_deref(), Some(""));

    let again = Session::new(api, store, &Config::default());
    assert_eq!(again.mode(), FeedMode::Aggregated);
}

#[tokio::test]
async fn test_choosing_a_state_enables_dual_feed() {
    let api = backend();
    let mut session = Session::new(api, Arc::new(MemoryStore::new()), &Config::default());
    session.complete_onboarding(Some("kerala")).await.unwrap();

    assert_eq!(session.mode(), FeedMode::Dual);
    assert_eq!(session.onboarding().selected_state(), Some("Kerala"));
    assert_eq!(session.headline(), "Kerala + Central Govt Jobs");
    let dual = session.dual().unwrap();
    assert_eq!(ids(&dual.column(Column::State).notices()), ["s1"]);
    assert_eq!(ids(&dual.column(Column::Central).notices()), ["c1"]);

    session.reset_onboarding().unwrap();
    assert_eq!(session.mode(), FeedMode::Onboarding);
}

#[tokio::test]
async fn test_filter_update_resets_page_and_reloads() {
    let api = backend();
    let mut session = Session::new(api.clone(), answered(""), &Config::default());
    session.start().await.unwrap();
    session.request_next_page().await.unwrap();
    assert_eq!(ids(&session.feed().notices()), ["1", "2", "3"]);

    let change = session
        .update_filters(&FilterUpdate::new().period(Period::Today))
        .await
        .unwrap();
    assert_eq!(change, FilterChange::Reload { page: 0 });
    assert_eq!(session.filters().page, 0);
    assert_eq!(ids(&session.feed().notices()), ["1", "2"]);
    assert_eq!(api.calls().last().unwrap().period, Period::Today);
}

#[tokio::test]
async fn test_explicit_page_update_appends() {
    let api = backend();
    let mut session = Session::new(api, answered(""), &Config::default());
    session.start().await.unwrap();

    let change = session.update_filters(&FilterUpdate::new().page(1)).await.unwrap();
    assert_eq!(change, FilterChange::Continue { page: 1 });
    assert_eq!(session.filters().page, 1);
    assert_eq!(ids(&session.feed().notices()), ["1", "2", "3"]);
}

#[tokio::test]
async fn test_page_update_after_continuation_does_not_refetch() {
    let api = backend();
    let mut session = Session::new(api.clone(), answered(""), &Config::default());
    session.start().await.unwrap();
    session.request_next_page().await.unwrap();
    assert_eq!(session.feed().page(), 1);
    let calls = api.call_count();

    let change = session.update_filters(&FilterUpdate::new().page(1)).await.unwrap();
    assert_eq!(change, FilterChange::Unchanged);
    assert_eq!(session.filters().page, 1);
    assert_eq!(session.feed().page(), 1);
    assert_eq!(api.call_count(), calls);

    // A refresh puts the feed back on page 0, so page 1 is fetched again.
    api.set_refresh_result(Some(0));
    session.refresh().await.unwrap();
    let change = session.update_filters(&FilterUpdate::new().page(1)).await.unwrap();
    assert_eq!(change, FilterChange::Continue { page: 1 });
    assert_eq!(ids(&session.feed().notices()), ["1", "2", "3"]);
}

#[tokio::test]
async fn test_new_only_toggle_does_not_fetch() {
    let api = backend();
    let mut session = Session::new(api.clone(), answered(""), &Config::default());
    session.start().await.unwrap();
    let calls = api.call_count();

    let change = session
        .update_filters(&FilterUpdate::new().show_new_only(true))
        .await
        .unwrap();
    assert_eq!(change, FilterChange::Projection { show_new_only: true });
    assert!(session.feed().visible().is_empty());

    session
        .update_filters(&FilterUpdate::new().show_new_only(false))
        .await
        .unwrap();
    assert_eq!(ids(&session.feed().visible()), ["1", "2"]);
    assert_eq!(api.call_count(), calls);
}

#[tokio::test]
async fn test_switching_to_jobs_restores_default_filters() {
    let api = backend();
    let mut session = Session::new(api, answered(""), &Config::default());
    session.start().await.unwrap();
    session
        .update_filters(&FilterUpdate::new().state(Some("Bihar")))
        .await
        .unwrap();
    assert_eq!(session.headline(), "Bihar Sarkari Naukri");

    session.select_tab(Tab::Saved).await.unwrap();
    session.select_tab(Tab::Jobs).await.unwrap();
    assert_eq!(session.filters().state, None);
    assert_eq!(session.headline(), "Latest Government Job Notifications");
    assert_eq!(ids(&session.feed().notices()), ["1", "2"]);
}

#[tokio::test]
async fn test_engineering_tab_uses_branch_parameter() {
    let api = backend();
    let mut session = Session::new(api.clone(), answered(""), &Config::default());
    session.select_tab(Tab::Engineering).await.unwrap();
    session
        .engineering_mut()
        .set_branch(Some("CSE"))
        .await
        .unwrap();

    let last = api.calls().pop().unwrap();
    assert_eq!(last.branch.as_deref(), Some("CSE"));
    assert_eq!(last.page, 0);

    session
        .engineering_mut()
        .set_notice_type(Some("RESULT"))
        .await
        .unwrap();
    let last = api.calls().pop().unwrap();
    assert_eq!(last.branch.as_deref(), Some("CSE"));
    assert_eq!(last.notice_type.as_deref(), Some("RESULT"));
    assert_eq!(session.headline(), "Engineering Govt Jobs India");
}

#[tokio::test]
async fn test_engineering_filters_load_once() {
    let api = backend();
    let mut session = Session::new(api.clone(), answered(""), &Config::default());
    session
        .engineering_mut()
        .select(Some("CIVIL"), Some("RESULT"))
        .await
        .unwrap();
    session.select_tab(Tab::Engineering).await.unwrap();

    let calls = api.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].branch.as_deref(), Some("CIVIL"));
    assert_eq!(calls[0].notice_type.as_deref(), Some("RESULT"));
}

#[tokio::test]
async fn test_bookmark_double_toggle_is_a_no_op_on_disk() {
    let tmp = TempDir::new().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(LocalStore::new(tmp.path()));
    let mut session = Session::new(backend(), store.clone(), &Config::default());
    session.toggle_save(&notice("1")).unwrap();

    let ids_before = store.get(SAVED_IDS_KEY).unwrap();
    let data_before = store.get(SAVED_DATA_KEY).unwrap();

    assert!(session.toggle_save(&notice("9")).unwrap());
    assert!(!session.toggle_save(&notice("9")).unwrap());

    assert_eq!(store.get(SAVED_IDS_KEY).unwrap(), ids_before);
    assert_eq!(store.get(SAVED_DATA_KEY).unwrap(), data_before);
    assert!(session.is_saved(&NoticeId::from("1")));
    assert!(!session.is_saved(&NoticeId::from("9")));
}

#[tokio::test]
async fn test_refresh_reloads_feed_and_new_count() {
    let api = backend();
    let mut session = Session::new(api.clone(), answered(""), &Config::default());
    session.start().await.unwrap();
    session.request_next_page().await.unwrap();
    api.set_refresh_result(Some(5));
    api.set_new_count(5);

    let summary = session.refresh().await.unwrap();
    assert_eq!(summary.saved, 5);
    assert_eq!(session.feed().page(), 0);
    assert_eq!(ids(&session.feed().notices()), ["1", "2"]);
    assert_eq!(session.refresher().new_count(), Some(5));

    let toast = session.refresher().toast().unwrap();
    assert_eq!(toast.kind, ToastKind::Success);
    assert_eq!(toast.message, "Refreshed! 5 new notices added.");
}

#[tokio::test]
async fn test_failed_refresh_leaves_feed_untouched() {
    let api = backend();
    let mut session = Session::new(api.clone(), answered(""), &Config::default());
    session.start().await.unwrap();
    session.request_next_page().await.unwrap();
    let before = session.feed().snapshot();
    let calls = api.call_count();
    api.set_refresh_result(None);

    let err = session.refresh().await.unwrap_err();
    assert!(err.is_refresh());
    assert_eq!(session.feed().snapshot(), before);
    assert_eq!(api.call_count(), calls);

    let toast = session.refresher().toast().unwrap();
    assert_eq!(toast.kind, ToastKind::Failure);
    assert_eq!(toast.message, "Refresh failed. Try again later.");
}

#[tokio::test]
async fn test_concurrent_refresh_is_rejected() {
    let api = backend();
    let session = Session::new(api.clone(), answered(""), &Config::default());
    let gate = api.hold_refresh();

    let (first, second, ()) = futures::join!(session.refresh(), session.refresh(), async move {
        tokio::task::yield_now().await;
        gate.send(()).unwrap();
    });

    assert!(first.is_ok());
    assert!(matches!(second, Err(AppError::RefreshInFlight)));
    assert_eq!(api.refresh_calls(), 1);
    assert!(!session.refresher().is_refreshing());
}
