// Dashboard controller
//
// Translates user intents (tab switch, paging, filter submit, detail open)
// into a store mutation followed by one delegated load. Fetches run on
// spawned tasks and come back as `Completion`s over an unbounded channel;
// the event loop hands each one to `apply_completion`, so every store write
// happens on the loop that owns the controller.
//
// Each load target carries a monotonically increasing generation. A
// completion is applied only if it belongs to the latest request issued for
// its target, so an older response arriving late can never overwrite a newer
// one. Nothing is cancelled; stale results are dropped at apply time.

use crate::api::models::{
    AlertListResponse, DashboardResponse, DatesResponse, SessionDetail, SessionListResponse,
    StatisticsResponse, ThreatIntelligenceResponse,
};
use crate::api::{ApiError, ApiResult, DashboardApi};
use crate::clipboard::{copy_payload, ClipboardSink};
use crate::config::Config;
use crate::store::{
    AppStore, FilterError, FilterInput, InvalidStatsWindow, SessionFilters, StatsWindow, Tab,
};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

pub const LOAD_FAILED_PREFIX: &str = "Failed to load data";
pub const DETAIL_FAILED_PREFIX: &str = "Failed to load session detail";
pub const COPY_OK: &str = "Copied to clipboard";
pub const COPY_FAILED: &str = "Copy failed, please retry";

// ─────────────────────────────────────────────────────────────────────────────
// Completions
// ─────────────────────────────────────────────────────────────────────────────

/// What a generation counter is tracked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadTarget {
    Dates,
    Tab(Tab),
    SessionDetail,
}

/// A finished fetch, tagged with its payload kind
#[derive(Debug)]
pub enum Fetched {
    Dates(ApiResult<DatesResponse>),
    Dashboard(ApiResult<DashboardResponse>),
    Sessions(ApiResult<SessionListResponse>),
    Alerts(ApiResult<AlertListResponse>),
    Statistics(ApiResult<StatisticsResponse>),
    Intel(ApiResult<ThreatIntelligenceResponse>),
    SessionDetail(ApiResult<SessionDetail>),
}

impl Fetched {
    pub fn target(&self) -> LoadTarget {
        match self {
            Self::Dates(_) => LoadTarget::Dates,
            Self::Dashboard(_) => LoadTarget::Tab(Tab::Dashboard),
            Self::Sessions(_) => LoadTarget::Tab(Tab::Sessions),
            Self::Alerts(_) => LoadTarget::Tab(Tab::Alerts),
            Self::Statistics(_) => LoadTarget::Tab(Tab::Statistics),
            Self::Intel(_) => LoadTarget::Tab(Tab::Intel),
            Self::SessionDetail(_) => LoadTarget::SessionDetail,
        }
    }
}

/// Message sent from a fetch task back to the event loop
#[derive(Debug)]
pub struct Completion {
    pub generation: u64,
    pub fetched: Fetched,
}

/// Latest issued generation per load target
#[derive(Debug, Default)]
struct Generations {
    dates: u64,
    tabs: [u64; Tab::ALL.len()],
    detail: u64,
}

impl Generations {
    fn slot(&mut self, target: LoadTarget) -> &mut u64 {
        match target {
            LoadTarget::Dates => &mut self.dates,
            LoadTarget::Tab(tab) => &mut self.tabs[tab.index()],
            LoadTarget::SessionDetail => &mut self.detail,
        }
    }

    /// Issue the next generation for a target
    fn bump(&mut self, target: LoadTarget) -> u64 {
        let slot = self.slot(target);
        *slot += 1;
        *slot
    }

    fn is_latest(&mut self, target: LoadTarget, generation: u64) -> bool {
        *self.slot(target) == generation
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// A tab load that failed, with a view-specific message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    pub tab: Tab,
    pub source: ApiError,
}

impl LoadError {
    fn view_message(&self) -> &'static str {
        match self.tab {
            Tab::Dashboard => "Could not load dashboard",
            Tab::Sessions => "Could not load session list",
            Tab::Alerts => "Could not load alerts",
            Tab::Statistics => "Could not load statistics",
            Tab::Intel => "Could not load threat intelligence",
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.view_message(), self.source)
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Controller
// ─────────────────────────────────────────────────────────────────────────────

/// Tunables the controller takes from configuration
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub page_size: u32,
    pub error_duration: Duration,
    pub success_duration: Duration,
    pub stats_window: StatsWindow,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            page_size: crate::store::DEFAULT_PAGE_SIZE,
            error_duration: Duration::from_millis(5000),
            success_duration: Duration::from_millis(3000),
            stats_window: StatsWindow::Week,
        }
    }
}

impl From<&Config> for ControllerOptions {
    fn from(config: &Config) -> Self {
        let stats_window = StatsWindow::try_from(config.stats_days).unwrap_or_else(|e| {
            tracing::warn!("{}; using 7", e);
            StatsWindow::Week
        });
        Self {
            page_size: config.page_size,
            error_duration: Duration::from_millis(config.error_message_ms),
            success_duration: Duration::from_millis(config.success_message_ms),
            stats_window,
        }
    }
}

pub struct Controller {
    store: AppStore,
    api: Arc<dyn DashboardApi>,
    clipboard: Box<dyn ClipboardSink>,
    generations: Generations,
    completions: mpsc::UnboundedSender<Completion>,
    options: ControllerOptions,
}

impl Controller {
    /// Create a controller and the receiving end of its completion channel
    pub fn new(
        api: Arc<dyn DashboardApi>,
        clipboard: Box<dyn ClipboardSink>,
        options: ControllerOptions,
    ) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut store = AppStore::with_page_size(options.page_size);
        store.set_stats_window(options.stats_window);

        let controller = Self {
            store,
            api,
            clipboard,
            generations: Generations::default(),
            completions: tx,
            options,
        };
        (controller, rx)
    }

    pub fn store(&self) -> &AppStore {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────────────
    // Load cycle
    // ─────────────────────────────────────────────────────────────────────

    /// Request the available dates
    ///
    /// Returns immediately; the loop stays responsive while `/dates` is in
    /// flight. When it lands, `apply_completion` selects the newest date and
    /// loads the active tab.
    pub fn init(&mut self) {
        self.store.set_loading(true);
        let generation = self.generations.bump(LoadTarget::Dates);
        tracing::debug!("Loading dates (generation {})", generation);

        let fut = self.api.get_dates();
        self.spawn(generation, async move { Fetched::Dates(fut.await) });
    }

    /// Store the date list and load the active tab
    ///
    /// An empty list or a failed fetch falls back to today's date without
    /// surfacing an error.
    fn apply_dates(&mut self, result: ApiResult<DatesResponse>) {
        let dates = match result {
            Ok(response) if !response.dates.is_empty() => response.dates,
            Ok(_) => {
                tracing::warn!("Backend reported no dates, falling back to today");
                vec![today()]
            }
            Err(e) => {
                tracing::warn!("Failed to load dates, falling back to today: {}", e);
                vec![today()]
            }
        };

        if let Some(newest) = dates.first() {
            self.store.set_selected_date(newest.clone());
        }
        self.store.set_available_dates(dates);
        self.load_data();
    }

    /// Start a load cycle for the active tab
    pub fn load_data(&mut self) {
        self.load_tab(self.store.current_tab());
    }

    /// Fetch one tab's data; the loading flag only tracks the active tab
    fn load_tab(&mut self, tab: Tab) {
        self.store.clear_error();
        if tab == self.store.current_tab() {
            self.store.set_loading(true);
        }

        let generation = self.generations.bump(LoadTarget::Tab(tab));
        tracing::debug!("Loading {} (generation {})", tab.name(), generation);

        let date = self.store.selected_date().map(str::to_string);
        match tab {
            Tab::Dashboard => {
                let fut = self.api.get_dashboard(date);
                self.spawn(generation, async move { Fetched::Dashboard(fut.await) });
            }
            Tab::Sessions => {
                let fut = self.api.get_sessions(self.store.sessions_query());
                self.spawn(generation, async move { Fetched::Sessions(fut.await) });
            }
            Tab::Alerts => {
                let fut = self.api.get_alerts(self.store.alerts_query());
                self.spawn(generation, async move { Fetched::Alerts(fut.await) });
            }
            Tab::Statistics => {
                let fut = self.api.get_statistics(self.store.statistics_query());
                self.spawn(generation, async move { Fetched::Statistics(fut.await) });
            }
            Tab::Intel => {
                let fut = self.api.get_threat_intelligence(date);
                self.spawn(generation, async move { Fetched::Intel(fut.await) });
            }
        }
    }

    fn spawn<F>(&self, generation: u64, fetch: F)
    where
        F: Future<Output = Fetched> + Send + 'static,
    {
        let tx = self.completions.clone();
        tokio::spawn(async move {
            let fetched = fetch.await;
            if tx.send(Completion { generation, fetched }).is_err() {
                tracing::debug!("Completion channel closed, dropping result");
            }
        });
    }

    /// Apply a finished fetch if it is still the latest for its target
    pub fn apply_completion(&mut self, completion: Completion) {
        let Completion {
            generation,
            fetched,
        } = completion;
        let target = fetched.target();

        if !self.generations.is_latest(target, generation) {
            tracing::debug!("Dropping stale {:?} response (generation {})", target, generation);
            return;
        }

        let tab = match fetched {
            Fetched::Dates(result) => {
                self.apply_dates(result);
                return;
            }
            Fetched::SessionDetail(result) => {
                self.apply_session_detail(result);
                return;
            }
            Fetched::Dashboard(result) => {
                self.apply_tab_result(Tab::Dashboard, result, AppStore::set_dashboard_data)
            }
            Fetched::Sessions(result) => {
                self.apply_tab_result(Tab::Sessions, result, AppStore::set_sessions_data)
            }
            Fetched::Alerts(result) => {
                self.apply_tab_result(Tab::Alerts, result, AppStore::set_alerts_data)
            }
            Fetched::Statistics(result) => {
                self.apply_tab_result(Tab::Statistics, result, AppStore::set_statistics_data)
            }
            Fetched::Intel(result) => {
                self.apply_tab_result(Tab::Intel, result, AppStore::set_intel_data)
            }
        };

        if tab == self.store.current_tab() {
            self.store.set_loading(false);
        }
    }

    fn apply_tab_result<T>(
        &mut self,
        tab: Tab,
        result: ApiResult<T>,
        write: fn(&mut AppStore, T),
    ) -> Tab {
        match result {
            Ok(data) => write(&mut self.store, data),
            Err(source) => {
                let err = LoadError { tab, source };
                tracing::error!("{}", err);
                self.store.show_error(
                    format!("{}: {}", LOAD_FAILED_PREFIX, err),
                    self.options.error_duration,
                );
            }
        }
        tab
    }

    // ─────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────

    pub fn switch_tab(&mut self, tab: Tab) {
        self.store.set_current_tab(tab);
        self.load_data();
    }

    pub fn set_selected_date(&mut self, date: impl Into<String>) {
        self.store.set_selected_date(date);
        self.load_data();
    }

    pub fn refresh(&mut self) {
        self.load_data();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Session filters
    // ─────────────────────────────────────────────────────────────────────

    /// Normalise and persist filter form input, then reload from page one
    ///
    /// Invalid input is reported on the error banner and changes nothing.
    pub fn apply_session_filters(&mut self, input: &FilterInput) -> Result<(), FilterError> {
        let filters = match input.normalize() {
            Ok(filters) => filters,
            Err(e) => {
                self.store
                    .show_error(e.to_string(), self.options.error_duration);
                return Err(e);
            }
        };

        tracing::debug!("Applying session filters: {}", filters);
        self.store.set_session_filters(filters);
        self.store.reset_sessions_pagination();
        self.load_tab(Tab::Sessions);
        Ok(())
    }

    /// Back to default sort with no filters
    pub fn clear_session_filters(&mut self) {
        self.store.reset_session_filters();
        self.store.reset_sessions_pagination();
        self.load_tab(Tab::Sessions);
    }

    /// Jump to the server-flagged "requires review" session subset
    pub fn view_requires_review(&mut self) {
        self.store.set_current_tab(Tab::Sessions);
        self.store
            .set_session_filters(SessionFilters::requires_review());
        self.store.reset_sessions_pagination();
        self.load_data();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Pagination
    // ─────────────────────────────────────────────────────────────────────
    //
    // Each reloads its own tab, or returns false without loading when the
    // control is disabled.

    pub fn next_sessions_page(&mut self) -> bool {
        if !self.store.sessions_can_next() {
            return false;
        }
        self.store.next_sessions_page();
        self.load_tab(Tab::Sessions);
        true
    }

    pub fn prev_sessions_page(&mut self) -> bool {
        if !self.store.sessions_can_prev() {
            return false;
        }
        self.store.prev_sessions_page();
        self.load_tab(Tab::Sessions);
        true
    }

    pub fn next_alerts_page(&mut self) -> bool {
        if !self.store.alerts_can_next() {
            return false;
        }
        self.store.next_alerts_page();
        self.load_tab(Tab::Alerts);
        true
    }

    pub fn prev_alerts_page(&mut self) -> bool {
        if !self.store.alerts_can_prev() {
            return false;
        }
        self.store.prev_alerts_page();
        self.load_tab(Tab::Alerts);
        true
    }

    /// Change the statistics window; only 1, 7 and 30 days are accepted
    pub fn change_stats_days(&mut self, days: u32) -> Result<(), InvalidStatsWindow> {
        let window = match StatsWindow::try_from(days) {
            Ok(window) => window,
            Err(e) => {
                self.store
                    .show_error(e.to_string(), self.options.error_duration);
                return Err(e);
            }
        };
        self.set_stats_window(window);
        Ok(())
    }

    /// Switch to an already validated window and reload statistics
    pub fn set_stats_window(&mut self, window: StatsWindow) {
        self.store.set_stats_window(window);
        self.load_tab(Tab::Statistics);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Session detail modal
    // ─────────────────────────────────────────────────────────────────────

    /// Open the modal with a stub and fetch the full detail
    pub fn show_session_detail(&mut self, sess_uuid: impl Into<String>) {
        let sess_uuid = sess_uuid.into();
        self.store.open_modal(SessionDetail::stub(sess_uuid.clone()));

        let generation = self.generations.bump(LoadTarget::SessionDetail);
        let fut = self.api.get_session(sess_uuid);
        self.spawn(generation, async move { Fetched::SessionDetail(fut.await) });
    }

    /// Close the modal; any detail fetch still in flight becomes stale
    pub fn close_modal(&mut self) {
        self.generations.bump(LoadTarget::SessionDetail);
        self.store.close_modal();
    }

    fn apply_session_detail(&mut self, result: ApiResult<SessionDetail>) {
        if !self.store.modal().is_loading() {
            tracing::debug!("Session detail arrived for a modal that is no longer waiting");
            return;
        }
        match result {
            Ok(detail) => self.store.set_modal_data(detail),
            Err(e) => {
                tracing::error!("{}: {}", DETAIL_FAILED_PREFIX, e);
                self.store.close_modal();
                self.store.show_error(
                    format!("{}: {}", DETAIL_FAILED_PREFIX, e),
                    self.options.error_duration,
                );
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Clipboard
    // ─────────────────────────────────────────────────────────────────────

    /// Copy the modal's session detail as pretty JSON
    ///
    /// Returns false when there is nothing to copy.
    pub fn copy_session_detail(&mut self) -> bool {
        let Some(detail) = self.store.modal().data() else {
            return false;
        };
        match serde_json::to_value(detail) {
            Ok(value) => {
                self.copy_to_clipboard(&value);
                true
            }
            Err(e) => {
                tracing::warn!("Failed to serialize session detail: {}", e);
                self.store
                    .show_error(COPY_FAILED, self.options.error_duration);
                false
            }
        }
    }

    /// Copy a value and report the outcome on the banner
    pub fn copy_to_clipboard(&mut self, value: &Value) {
        let text = copy_payload(value);
        match self.clipboard.copy(&text) {
            Ok(()) => self
                .store
                .show_success(COPY_OK, self.options.success_duration),
            Err(e) => {
                tracing::warn!("Clipboard copy failed: {:#}", e);
                self.store
                    .show_error(COPY_FAILED, self.options.error_duration);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Messages
    // ─────────────────────────────────────────────────────────────────────

    /// Dismiss whichever banner is showing; the error goes first
    pub fn dismiss_message(&mut self) {
        if self.store.error().is_some() {
            self.store.clear_error();
        } else {
            self.store.clear_success();
        }
    }

    pub fn expire_messages(&mut self, now: Instant) {
        self.store.expire_messages(now);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.store.next_deadline()
    }
}

/// Today's UTC date as `YYYY-MM-DD`
fn today() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests;
