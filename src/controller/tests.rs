// Controller tests
//
// `ScriptedApi` answers immediately with canned values unless a oneshot
// receiver has been queued for the endpoint, in which case the response is
// held until the test releases it. That lets a test force any completion
// order.

use super::*;
use crate::api::models::{DatesResponse, ThreatLevel};
use crate::api::query::{AlertQuery, SessionQuery, SortKey, SortOrder, StatisticsQuery};
use futures::future::BoxFuture;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::oneshot;

type Pending<T> = oneshot::Receiver<ApiResult<T>>;

#[derive(Default)]
struct ScriptedApi {
    dates: Mutex<Option<ApiResult<DatesResponse>>>,
    held_dates: Mutex<Option<Pending<DatesResponse>>>,
    dashboards: Mutex<VecDeque<ApiResult<DashboardResponse>>>,
    sessions: Mutex<VecDeque<Pending<SessionListResponse>>>,
    details: Mutex<VecDeque<Pending<SessionDetail>>>,
    session_queries: Mutex<Vec<SessionQuery>>,
    alert_queries: Mutex<Vec<AlertQuery>>,
    statistics_queries: Mutex<Vec<StatisticsQuery>>,
}

impl ScriptedApi {
    fn with_dates(dates: ApiResult<DatesResponse>) -> Self {
        Self {
            dates: Mutex::new(Some(dates)),
            ..Default::default()
        }
    }

    fn hold_dates(&self) -> oneshot::Sender<ApiResult<DatesResponse>> {
        let (tx, rx) = oneshot::channel();
        *self.held_dates.lock().unwrap() = Some(rx);
        tx
    }

    fn hold_sessions(&self) -> oneshot::Sender<ApiResult<SessionListResponse>> {
        let (tx, rx) = oneshot::channel();
        self.sessions.lock().unwrap().push_back(rx);
        tx
    }

    fn hold_detail(&self) -> oneshot::Sender<ApiResult<SessionDetail>> {
        let (tx, rx) = oneshot::channel();
        self.details.lock().unwrap().push_back(rx);
        tx
    }

    fn queue_dashboard(&self, result: ApiResult<DashboardResponse>) {
        self.dashboards.lock().unwrap().push_back(result);
    }

    fn session_queries(&self) -> Vec<SessionQuery> {
        self.session_queries.lock().unwrap().clone()
    }
}

async fn released<T: Default>(pending: Option<Pending<T>>) -> ApiResult<T> {
    match pending {
        Some(rx) => rx
            .await
            .unwrap_or_else(|_| Err(ApiError::Transport("sender dropped".into()))),
        None => Ok(T::default()),
    }
}

impl DashboardApi for ScriptedApi {
    fn get_dashboard(&self, _date: Option<String>) -> BoxFuture<'static, ApiResult<DashboardResponse>> {
        let result = self
            .dashboards
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(DashboardResponse::default()));
        Box::pin(async move { result })
    }

    fn get_sessions(&self, query: SessionQuery) -> BoxFuture<'static, ApiResult<SessionListResponse>> {
        self.session_queries.lock().unwrap().push(query);
        let pending = self.sessions.lock().unwrap().pop_front();
        Box::pin(released(pending))
    }

    fn get_session(&self, uuid: String) -> BoxFuture<'static, ApiResult<SessionDetail>> {
        let pending = self.details.lock().unwrap().pop_front();
        Box::pin(async move {
            match pending {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(ApiError::Transport("sender dropped".into()))),
                None => Ok(SessionDetail::stub(uuid)),
            }
        })
    }

    fn get_alerts(&self, query: AlertQuery) -> BoxFuture<'static, ApiResult<AlertListResponse>> {
        self.alert_queries.lock().unwrap().push(query);
        Box::pin(async { Ok(AlertListResponse::default()) })
    }

    fn get_statistics(
        &self,
        query: StatisticsQuery,
    ) -> BoxFuture<'static, ApiResult<StatisticsResponse>> {
        self.statistics_queries.lock().unwrap().push(query);
        Box::pin(async { Ok(StatisticsResponse::default()) })
    }

    fn get_threat_intelligence(
        &self,
        _date: Option<String>,
    ) -> BoxFuture<'static, ApiResult<ThreatIntelligenceResponse>> {
        Box::pin(async { Ok(ThreatIntelligenceResponse::default()) })
    }

    fn get_dates(&self) -> BoxFuture<'static, ApiResult<DatesResponse>> {
        if let Some(held) = self.held_dates.lock().unwrap().take() {
            return Box::pin(released(Some(held)));
        }
        let result = self
            .dates
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(DatesResponse::default()));
        Box::pin(async move { result })
    }
}

/// Records copied text; fails every copy when `broken`
#[derive(Clone, Default)]
struct FakeClipboard {
    copied: Arc<Mutex<Vec<String>>>,
    broken: bool,
}

impl ClipboardSink for FakeClipboard {
    fn copy(&mut self, text: &str) -> anyhow::Result<()> {
        if self.broken {
            anyhow::bail!("no display");
        }
        self.copied.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

fn controller_with(
    api: Arc<ScriptedApi>,
    clipboard: FakeClipboard,
) -> (Controller, mpsc::UnboundedReceiver<Completion>) {
    Controller::new(api, Box::new(clipboard), ControllerOptions::default())
}

fn controller(api: Arc<ScriptedApi>) -> (Controller, mpsc::UnboundedReceiver<Completion>) {
    controller_with(api, FakeClipboard::default())
}

/// Wait for the next completion and apply it
async fn pump(ctrl: &mut Controller, rx: &mut mpsc::UnboundedReceiver<Completion>) {
    let completion = rx.recv().await.expect("completion channel closed");
    ctrl.apply_completion(completion);
}

fn page(total: u64, has_more: bool) -> SessionListResponse {
    SessionListResponse {
        total,
        limit: 50,
        has_more,
        ..Default::default()
    }
}

fn http_500() -> ApiError {
    ApiError::Http {
        status: 500,
        status_text: "Internal Server Error".into(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// init / dates
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_init_selects_newest_date() {
    let api = Arc::new(ScriptedApi::with_dates(Ok(DatesResponse {
        dates: vec!["2025-10-26".into(), "2025-10-25".into()],
    })));
    let (mut ctrl, mut rx) = controller(api);

    ctrl.init();
    assert!(ctrl.store().is_loading());
    pump(&mut ctrl, &mut rx).await;
    assert_eq!(ctrl.store().selected_date(), Some("2025-10-26"));
    assert_eq!(ctrl.store().available_dates().len(), 2);
    assert!(ctrl.store().is_loading());

    pump(&mut ctrl, &mut rx).await;
    assert!(!ctrl.store().is_loading());
    assert!(ctrl.store().dashboard_data().is_some());
}

#[tokio::test]
async fn test_dates_failure_falls_back_to_today() {
    let api = Arc::new(ScriptedApi::with_dates(Err(http_500())));
    let (mut ctrl, mut rx) = controller(api);

    ctrl.init();
    pump(&mut ctrl, &mut rx).await;

    let today = today();
    assert_eq!(ctrl.store().selected_date(), Some(today.as_str()));
    assert_eq!(ctrl.store().available_dates(), [today.clone()]);
    // Silent degradation: no banner
    assert_eq!(ctrl.store().error(), None);

    pump(&mut ctrl, &mut rx).await;
    assert_eq!(ctrl.store().error(), None);
}

#[tokio::test]
async fn test_empty_dates_falls_back_to_today() {
    let api = Arc::new(ScriptedApi::with_dates(Ok(DatesResponse::default())));
    let (mut ctrl, mut rx) = controller(api);

    ctrl.init();
    pump(&mut ctrl, &mut rx).await;
    assert_eq!(ctrl.store().available_dates(), [today()]);
}

#[tokio::test]
async fn test_init_returns_before_dates_arrive() {
    let api = Arc::new(ScriptedApi::default());
    let release = api.hold_dates();
    let (mut ctrl, mut rx) = controller(api.clone());

    ctrl.init();
    assert!(ctrl.store().is_loading());
    assert_eq!(ctrl.store().selected_date(), None);

    // Navigation still works; the load goes out without a date
    ctrl.switch_tab(Tab::Sessions);
    pump(&mut ctrl, &mut rx).await;
    assert_eq!(api.session_queries()[0].date, None);

    release
        .send(Ok(DatesResponse {
            dates: vec!["2025-10-26".into()],
        }))
        .unwrap();
    pump(&mut ctrl, &mut rx).await;
    assert_eq!(ctrl.store().selected_date(), Some("2025-10-26"));

    // The active tab is reloaded for the selected date
    pump(&mut ctrl, &mut rx).await;
    assert_eq!(api.session_queries()[1].date.as_deref(), Some("2025-10-26"));
    assert!(!ctrl.store().is_loading());
}

// ─────────────────────────────────────────────────────────────────────────────
// Load cycle
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_failed_load_keeps_last_good_data() {
    let api = Arc::new(ScriptedApi::default());
    let good = DashboardResponse {
        recent_alerts: vec![],
        ..Default::default()
    };
    api.queue_dashboard(Ok(good.clone()));
    api.queue_dashboard(Err(http_500()));
    let (mut ctrl, mut rx) = controller(api);

    ctrl.load_data();
    pump(&mut ctrl, &mut rx).await;
    assert_eq!(ctrl.store().dashboard_data(), Some(&good));

    ctrl.refresh();
    pump(&mut ctrl, &mut rx).await;

    assert_eq!(ctrl.store().dashboard_data(), Some(&good));
    assert!(!ctrl.store().is_loading());
    assert_eq!(
        ctrl.store().error(),
        Some("Failed to load data: Could not load dashboard: HTTP 500: Internal Server Error")
    );
}

#[tokio::test]
async fn test_load_clears_previous_error() {
    let api = Arc::new(ScriptedApi::default());
    api.queue_dashboard(Err(http_500()));
    let (mut ctrl, mut rx) = controller(api);

    ctrl.load_data();
    pump(&mut ctrl, &mut rx).await;
    assert!(ctrl.store().error().is_some());

    ctrl.refresh();
    assert_eq!(ctrl.store().error(), None);
}

#[tokio::test]
async fn test_latest_issued_filter_request_wins_when_it_lands_first() {
    let api = Arc::new(ScriptedApi::default());
    let (mut ctrl, mut rx) = controller(api.clone());
    ctrl.switch_tab(Tab::Sessions);
    pump(&mut ctrl, &mut rx).await;

    let first = api.hold_sessions();
    let second = api.hold_sessions();
    ctrl.apply_session_filters(&FilterInput {
        threat_level: "HIGH".into(),
        ..Default::default()
    })
    .unwrap();
    ctrl.apply_session_filters(&FilterInput {
        threat_level: "CRITICAL".into(),
        ..Default::default()
    })
    .unwrap();

    second.send(Ok(page(2, false))).unwrap();
    pump(&mut ctrl, &mut rx).await;
    assert!(!ctrl.store().is_loading());

    // The earlier request resolves last and is discarded
    first.send(Ok(page(1, false))).unwrap();
    pump(&mut ctrl, &mut rx).await;

    assert_eq!(ctrl.store().sessions_data().unwrap().total, 2);
    assert_eq!(
        ctrl.store().session_filters().threat_level,
        Some(ThreatLevel::Critical)
    );
}

#[tokio::test]
async fn test_latest_issued_filter_request_wins_when_it_lands_last() {
    let api = Arc::new(ScriptedApi::default());
    let (mut ctrl, mut rx) = controller(api.clone());
    ctrl.switch_tab(Tab::Sessions);
    pump(&mut ctrl, &mut rx).await;

    let first = api.hold_sessions();
    let second = api.hold_sessions();
    ctrl.apply_session_filters(&FilterInput {
        attack_type: "xss".into(),
        ..Default::default()
    })
    .unwrap();
    ctrl.apply_session_filters(&FilterInput {
        attack_type: "sqli".into(),
        ..Default::default()
    })
    .unwrap();

    first.send(Ok(page(1, false))).unwrap();
    pump(&mut ctrl, &mut rx).await;
    // Stale: cache untouched, still waiting on the newer request
    assert_eq!(ctrl.store().sessions_data().unwrap().total, 0);
    assert!(ctrl.store().is_loading());

    second.send(Ok(page(2, false))).unwrap();
    pump(&mut ctrl, &mut rx).await;
    assert_eq!(ctrl.store().sessions_data().unwrap().total, 2);
    assert!(!ctrl.store().is_loading());
}

#[tokio::test]
async fn test_loading_tracks_active_tab_only() {
    let api = Arc::new(ScriptedApi::default());
    let (mut ctrl, mut rx) = controller(api.clone());

    let sessions = api.hold_sessions();
    ctrl.switch_tab(Tab::Sessions);
    ctrl.switch_tab(Tab::Alerts);

    // Alerts answers immediately
    pump(&mut ctrl, &mut rx).await;
    assert!(!ctrl.store().is_loading());
    assert!(ctrl.store().alerts_data().is_some());

    // A sessions result landing while on Alerts still fills its cache
    sessions.send(Ok(page(7, false))).unwrap();
    pump(&mut ctrl, &mut rx).await;
    assert_eq!(ctrl.store().sessions_data().unwrap().total, 7);
    assert_eq!(ctrl.store().current_tab(), Tab::Alerts);
}

// ─────────────────────────────────────────────────────────────────────────────
// Filters & pagination
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_next_page_disabled_without_has_more() {
    let api = Arc::new(ScriptedApi::default());
    let (mut ctrl, mut rx) = controller(api.clone());

    let first = api.hold_sessions();
    ctrl.switch_tab(Tab::Sessions);
    first.send(Ok(page(100, true))).unwrap();
    pump(&mut ctrl, &mut rx).await;

    let second = api.hold_sessions();
    assert!(ctrl.next_sessions_page());
    second
        .send(Ok(SessionListResponse {
            offset: 50,
            ..page(100, false)
        }))
        .unwrap();
    pump(&mut ctrl, &mut rx).await;

    let issued = api.session_queries().len();
    assert!(!ctrl.next_sessions_page());
    assert_eq!(api.session_queries().len(), issued);
    assert_eq!(ctrl.store().pagination().sessions.offset, 50);
}

#[tokio::test]
async fn test_prev_page_disabled_on_first_page() {
    let api = Arc::new(ScriptedApi::default());
    let (mut ctrl, mut rx) = controller(api.clone());
    ctrl.switch_tab(Tab::Sessions);
    pump(&mut ctrl, &mut rx).await;

    assert!(!ctrl.prev_sessions_page());
    assert!(!ctrl.prev_alerts_page());
    assert_eq!(api.session_queries().len(), 1);
}

#[tokio::test]
async fn test_paging_keeps_active_filters() {
    let api = Arc::new(ScriptedApi::default());
    let (mut ctrl, mut rx) = controller(api.clone());
    ctrl.switch_tab(Tab::Sessions);
    pump(&mut ctrl, &mut rx).await;

    let filtered = api.hold_sessions();
    ctrl.apply_session_filters(&FilterInput {
        threat_level: "critical".into(),
        min_risk: "80".into(),
        ..Default::default()
    })
    .unwrap();
    filtered.send(Ok(page(120, true))).unwrap();
    pump(&mut ctrl, &mut rx).await;

    assert!(ctrl.next_sessions_page());
    let query = api.session_queries().pop().unwrap();
    assert_eq!(query.offset, 50);
    assert_eq!(query.threat_level, Some(ThreatLevel::Critical));
    assert_eq!(query.min_risk, Some(80));
}

#[tokio::test]
async fn test_apply_filters_resets_pagination() {
    let api = Arc::new(ScriptedApi::default());
    let (mut ctrl, mut rx) = controller(api.clone());

    let first = api.hold_sessions();
    ctrl.switch_tab(Tab::Sessions);
    first.send(Ok(page(100, true))).unwrap();
    pump(&mut ctrl, &mut rx).await;
    assert!(ctrl.next_sessions_page());
    pump(&mut ctrl, &mut rx).await;

    ctrl.apply_session_filters(&FilterInput {
        peer_ip: "203.0".into(),
        ..Default::default()
    })
    .unwrap();

    let query = api.session_queries().pop().unwrap();
    assert_eq!(query.offset, 0);
    assert_eq!(query.peer_ip.as_deref(), Some("203.0"));
}

#[tokio::test]
async fn test_clear_filters_sends_only_default_sort() {
    let api = Arc::new(ScriptedApi::default());
    let (mut ctrl, _rx) = controller(api.clone());

    ctrl.switch_tab(Tab::Sessions);
    ctrl.apply_session_filters(&FilterInput {
        threat_level: "HIGH".into(),
        sess_uuid: "abc".into(),
        sort: "processed_at_asc".into(),
        ..Default::default()
    })
    .unwrap();
    ctrl.clear_session_filters();

    let query = api.session_queries().pop().unwrap();
    assert_eq!(query.sort_by, Some(SortKey::RiskScore));
    assert_eq!(query.order, Some(SortOrder::Desc));

    let value = serde_json::to_value(&query).unwrap();
    let mut keys: Vec<&str> = value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["limit", "offset", "order", "sort_by"]);
}

#[tokio::test]
async fn test_invalid_filter_input_changes_nothing() {
    let api = Arc::new(ScriptedApi::default());
    let (mut ctrl, _rx) = controller(api.clone());

    let err = ctrl
        .apply_session_filters(&FilterInput {
            min_risk: "250".into(),
            ..Default::default()
        })
        .unwrap_err();

    assert_eq!(err, FilterError::MinRisk("250".into()));
    assert_eq!(ctrl.store().session_filters(), &SessionFilters::default());
    assert!(api.session_queries().is_empty());
    assert_eq!(ctrl.store().error(), Some(err.to_string().as_str()));
}

#[tokio::test]
async fn test_view_requires_review() {
    let api = Arc::new(ScriptedApi::default());
    let (mut ctrl, _rx) = controller(api.clone());

    ctrl.view_requires_review();

    assert_eq!(ctrl.store().current_tab(), Tab::Sessions);
    let query = api.session_queries().pop().unwrap();
    assert_eq!(query.requires_review, Some(true));
    assert_eq!(query.offset, 0);
    assert_eq!(query.threat_level, None);
}

#[tokio::test]
async fn test_change_stats_days() {
    let api = Arc::new(ScriptedApi::default());
    let (mut ctrl, _rx) = controller(api.clone());
    ctrl.switch_tab(Tab::Statistics);

    ctrl.change_stats_days(30).unwrap();
    assert_eq!(ctrl.store().stats_window(), StatsWindow::Month);
    assert_eq!(
        api.statistics_queries.lock().unwrap().last().map(|q| q.days),
        Some(30)
    );

    let issued = api.statistics_queries.lock().unwrap().len();
    assert_eq!(ctrl.change_stats_days(14), Err(InvalidStatsWindow(14)));
    assert_eq!(ctrl.store().stats_window(), StatsWindow::Month);
    assert_eq!(api.statistics_queries.lock().unwrap().len(), issued);
    assert!(ctrl.store().error().is_some());
}

#[tokio::test]
async fn test_set_stats_window_reloads_statistics() {
    let api = Arc::new(ScriptedApi::default());
    let (mut ctrl, _rx) = controller(api.clone());

    ctrl.set_stats_window(StatsWindow::Day);
    assert_eq!(ctrl.store().stats_window(), StatsWindow::Day);
    assert_eq!(
        api.statistics_queries.lock().unwrap().last().map(|q| q.days),
        Some(1)
    );
    assert_eq!(ctrl.store().error(), None);
}

// ─────────────────────────────────────────────────────────────────────────────
// Session detail modal
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_detail_fills_modal() {
    let api = Arc::new(ScriptedApi::default());
    let (mut ctrl, mut rx) = controller(api.clone());

    let pending = api.hold_detail();
    ctrl.show_session_detail("abc");
    assert!(ctrl.store().modal().is_loading());
    assert_eq!(ctrl.store().modal().data().unwrap().sess_uuid, "abc");

    pending
        .send(Ok(SessionDetail {
            risk_score: 93,
            ..SessionDetail::stub("abc")
        }))
        .unwrap();
    pump(&mut ctrl, &mut rx).await;

    let modal = ctrl.store().modal();
    assert!(modal.is_open());
    assert!(!modal.is_loading());
    assert_eq!(modal.data().unwrap().risk_score, 93);
}

#[tokio::test]
async fn test_detail_failure_closes_modal() {
    let api = Arc::new(ScriptedApi::default());
    let (mut ctrl, mut rx) = controller(api.clone());

    let pending = api.hold_detail();
    ctrl.show_session_detail("gone");
    pending
        .send(Err(ApiError::Http {
            status: 404,
            status_text: "Not Found".into(),
        }))
        .unwrap();
    pump(&mut ctrl, &mut rx).await;

    assert!(!ctrl.store().modal().is_open());
    assert_eq!(
        ctrl.store().error(),
        Some("Failed to load session detail: HTTP 404: Not Found")
    );
}

#[tokio::test]
async fn test_late_detail_after_close_is_dropped() {
    let api = Arc::new(ScriptedApi::default());
    let (mut ctrl, mut rx) = controller(api.clone());

    let pending = api.hold_detail();
    ctrl.show_session_detail("abc");
    ctrl.close_modal();

    pending.send(Ok(SessionDetail::stub("abc"))).unwrap();
    pump(&mut ctrl, &mut rx).await;

    assert!(!ctrl.store().modal().is_open());
    assert!(ctrl.store().modal().data().is_none());
    assert_eq!(ctrl.store().error(), None);
}

#[tokio::test]
async fn test_superseded_detail_is_dropped() {
    let api = Arc::new(ScriptedApi::default());
    let (mut ctrl, mut rx) = controller(api.clone());

    let first = api.hold_detail();
    let second = api.hold_detail();
    ctrl.show_session_detail("first");
    ctrl.show_session_detail("second");

    second
        .send(Ok(SessionDetail {
            risk_score: 20,
            ..SessionDetail::stub("second")
        }))
        .unwrap();
    pump(&mut ctrl, &mut rx).await;
    first
        .send(Ok(SessionDetail {
            risk_score: 99,
            ..SessionDetail::stub("first")
        }))
        .unwrap();
    pump(&mut ctrl, &mut rx).await;

    let data = ctrl.store().modal().data().unwrap();
    assert_eq!(data.sess_uuid, "second");
    assert_eq!(data.risk_score, 20);
}

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_copy_array_shows_success() {
    let clipboard = FakeClipboard::default();
    let copied = clipboard.copied.clone();
    let (mut ctrl, _rx) = controller_with(Arc::new(ScriptedApi::default()), clipboard);

    ctrl.copy_to_clipboard(&json!(["203.0.113.9", "198.51.100.4"]));

    assert_eq!(
        copied.lock().unwrap().as_slice(),
        ["203.0.113.9\n198.51.100.4".to_string()]
    );
    assert_eq!(ctrl.store().success_message(), Some(COPY_OK));
}

#[tokio::test]
async fn test_copy_failure_shows_error() {
    let clipboard = FakeClipboard {
        broken: true,
        ..Default::default()
    };
    let (mut ctrl, _rx) = controller_with(Arc::new(ScriptedApi::default()), clipboard);

    ctrl.copy_to_clipboard(&json!({"a": 1}));

    assert_eq!(ctrl.store().error(), Some(COPY_FAILED));
    assert_eq!(ctrl.store().success_message(), None);
}

#[tokio::test]
async fn test_copy_session_detail_needs_open_modal() {
    let clipboard = FakeClipboard::default();
    let copied = clipboard.copied.clone();
    let (mut ctrl, mut rx) = controller_with(Arc::new(ScriptedApi::default()), clipboard);

    assert!(!ctrl.copy_session_detail());

    ctrl.show_session_detail("abc");
    pump(&mut ctrl, &mut rx).await;
    assert!(ctrl.copy_session_detail());

    let text = copied.lock().unwrap().pop().unwrap();
    assert!(text.contains("\"sess_uuid\": \"abc\""));
}

#[tokio::test(start_paused = true)]
async fn test_error_banner_auto_dismisses() {
    let api = Arc::new(ScriptedApi::default());
    api.queue_dashboard(Err(http_500()));
    let (mut ctrl, mut rx) = controller(api);

    ctrl.load_data();
    pump(&mut ctrl, &mut rx).await;
    let deadline = ctrl.next_deadline().unwrap();

    tokio::time::sleep_until(deadline).await;
    ctrl.expire_messages(Instant::now());
    assert_eq!(ctrl.store().error(), None);
    assert_eq!(ctrl.next_deadline(), None);
}
