// Application state store
//
// Single source of truth for the dashboard's UI state: the active tab, the
// selected date, the last successful payload per tab, pagination cursors,
// session filters, the session detail modal and the banner messages.
//
// The store is plain in-memory mutation and none of its operations fail.
// Fields are private; callers go through the mutators so the whole state can
// never be swapped out from under the controller.

mod filters;
mod messages;

pub use filters::{FilterError, FilterInput, SessionFilters};
pub use messages::MessageSlot;

use crate::api::models::{
    AlertListResponse, DashboardResponse, SessionDetail, SessionListResponse,
    StatisticsResponse, ThreatIntelligenceResponse,
};
use crate::api::query::{AlertQuery, SessionQuery, StatisticsQuery};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Default page size for sessions and alerts
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Dashboard tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Sessions,
    Alerts,
    Statistics,
    Intel,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Dashboard,
        Tab::Sessions,
        Tab::Alerts,
        Tab::Statistics,
        Tab::Intel,
    ];

    /// Get the next tab in cycle
    pub fn next(self) -> Self {
        match self {
            Tab::Dashboard => Tab::Sessions,
            Tab::Sessions => Tab::Alerts,
            Tab::Alerts => Tab::Statistics,
            Tab::Statistics => Tab::Intel,
            Tab::Intel => Tab::Dashboard,
        }
    }

    /// Get the previous tab in cycle
    pub fn prev(self) -> Self {
        match self {
            Tab::Dashboard => Tab::Intel,
            Tab::Sessions => Tab::Dashboard,
            Tab::Alerts => Tab::Sessions,
            Tab::Statistics => Tab::Alerts,
            Tab::Intel => Tab::Statistics,
        }
    }

    /// Position in the tab bar
    pub fn index(self) -> usize {
        match self {
            Tab::Dashboard => 0,
            Tab::Sessions => 1,
            Tab::Alerts => 2,
            Tab::Statistics => 3,
            Tab::Intel => 4,
        }
    }

    /// Get display name for the tab bar
    pub fn name(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Sessions => "Sessions",
            Tab::Alerts => "Alerts",
            Tab::Statistics => "Statistics",
            Tab::Intel => "Threat Intel",
        }
    }
}

/// Statistics aggregation window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsWindow {
    Day,
    #[default]
    Week,
    Month,
}

impl StatsWindow {
    pub const ALL: [StatsWindow; 3] = [StatsWindow::Day, StatsWindow::Week, StatsWindow::Month];

    pub fn days(self) -> u32 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Month => 30,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Day => Self::Week,
            Self::Week => Self::Month,
            Self::Month => Self::Day,
        }
    }
}

impl TryFrom<u32> for StatsWindow {
    type Error = InvalidStatsWindow;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        match days {
            1 => Ok(Self::Day),
            7 => Ok(Self::Week),
            30 => Ok(Self::Month),
            other => Err(InvalidStatsWindow(other)),
        }
    }
}

/// A statistics window outside {1, 7, 30} days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidStatsWindow(pub u32);

impl fmt::Display for InvalidStatsWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Statistics window must be 1, 7 or 30 days, got {}",
            self.0
        )
    }
}

impl std::error::Error for InvalidStatsWindow {}

/// Offset/limit cursor for a paged list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub offset: u32,
    pub limit: u32,
}

impl PageCursor {
    /// Limit is clamped to at least 1
    pub fn new(limit: u32) -> Self {
        Self {
            offset: 0,
            limit: limit.max(1),
        }
    }

    /// Advance one page; unbounded, the server decides `has_more`
    pub fn next(&mut self) {
        self.offset = self.offset.saturating_add(self.limit);
    }

    /// Go back one page, stopping at 0
    pub fn prev(&mut self) {
        self.offset = self.offset.saturating_sub(self.limit);
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// 1-based page number for display
    pub fn page(&self) -> u32 {
        self.offset / self.limit + 1
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Independent cursors for the two paged lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    pub sessions: PageCursor,
    pub alerts: PageCursor,
}

/// Session detail modal lifecycle: Closed -> Opening -> Open -> Closed
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ModalState {
    #[default]
    Closed,
    /// Waiting for the full detail; holds the stub the modal was opened with
    Opening(SessionDetail),
    Open(SessionDetail),
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Opening(_))
    }

    pub fn data(&self) -> Option<&SessionDetail> {
        match self {
            Self::Closed => None,
            Self::Opening(detail) | Self::Open(detail) => Some(detail),
        }
    }
}

/// Application state
#[derive(Debug)]
pub struct AppStore {
    current_tab: Tab,
    loading: bool,
    error: MessageSlot,
    success: MessageSlot,
    selected_date: Option<String>,
    available_dates: Vec<String>,

    dashboard: Option<DashboardResponse>,
    sessions: Option<SessionListResponse>,
    alerts: Option<AlertListResponse>,
    statistics: Option<StatisticsResponse>,
    intel: Option<ThreatIntelligenceResponse>,

    modal: ModalState,
    pagination: Pagination,
    session_filters: SessionFilters,
    stats_window: StatsWindow,
}

impl AppStore {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            current_tab: Tab::default(),
            loading: false,
            error: MessageSlot::new(),
            success: MessageSlot::new(),
            selected_date: None,
            available_dates: Vec::new(),
            dashboard: None,
            sessions: None,
            alerts: None,
            statistics: None,
            intel: None,
            modal: ModalState::Closed,
            pagination: Pagination {
                sessions: PageCursor::new(page_size),
                alerts: PageCursor::new(page_size),
            },
            session_filters: SessionFilters::default(),
            stats_window: StatsWindow::default(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // UI state
    // ─────────────────────────────────────────────────────────────────────

    pub fn current_tab(&self) -> Tab {
        self.current_tab
    }

    pub fn set_current_tab(&mut self, tab: Tab) {
        self.current_tab = tab;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn selected_date(&self) -> Option<&str> {
        self.selected_date.as_deref()
    }

    /// No format validation; callers pass ISO dates
    pub fn set_selected_date(&mut self, date: impl Into<String>) {
        self.selected_date = Some(date.into());
    }

    pub fn available_dates(&self) -> &[String] {
        &self.available_dates
    }

    /// Replaced wholesale, kept in delivery order (newest first)
    pub fn set_available_dates(&mut self, dates: Vec<String>) {
        self.available_dates = dates;
    }

    pub fn stats_window(&self) -> StatsWindow {
        self.stats_window
    }

    pub fn set_stats_window(&mut self, window: StatsWindow) {
        self.stats_window = window;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Data caches
    // ─────────────────────────────────────────────────────────────────────

    pub fn dashboard_data(&self) -> Option<&DashboardResponse> {
        self.dashboard.as_ref()
    }

    pub fn set_dashboard_data(&mut self, data: DashboardResponse) {
        self.dashboard = Some(data);
    }

    pub fn sessions_data(&self) -> Option<&SessionListResponse> {
        self.sessions.as_ref()
    }

    pub fn set_sessions_data(&mut self, data: SessionListResponse) {
        self.sessions = Some(data);
    }

    pub fn alerts_data(&self) -> Option<&AlertListResponse> {
        self.alerts.as_ref()
    }

    pub fn set_alerts_data(&mut self, data: AlertListResponse) {
        self.alerts = Some(data);
    }

    pub fn statistics_data(&self) -> Option<&StatisticsResponse> {
        self.statistics.as_ref()
    }

    pub fn set_statistics_data(&mut self, data: StatisticsResponse) {
        self.statistics = Some(data);
    }

    pub fn intel_data(&self) -> Option<&ThreatIntelligenceResponse> {
        self.intel.as_ref()
    }

    pub fn set_intel_data(&mut self, data: ThreatIntelligenceResponse) {
        self.intel = Some(data);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Modal
    // ─────────────────────────────────────────────────────────────────────

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    /// Open with a partial stub; any previous modal data is discarded
    pub fn open_modal(&mut self, stub: SessionDetail) {
        self.modal = ModalState::Opening(stub);
    }

    /// Fill the modal with the full detail
    pub fn set_modal_data(&mut self, detail: SessionDetail) {
        self.modal = ModalState::Open(detail);
    }

    /// Always safe; returns to Closed from any state
    pub fn close_modal(&mut self) {
        self.modal = ModalState::Closed;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Pagination & filters
    // ─────────────────────────────────────────────────────────────────────

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn reset_sessions_pagination(&mut self) {
        self.pagination.sessions.reset();
    }

    pub fn next_sessions_page(&mut self) {
        self.pagination.sessions.next();
    }

    pub fn prev_sessions_page(&mut self) {
        self.pagination.sessions.prev();
    }

    pub fn next_alerts_page(&mut self) {
        self.pagination.alerts.next();
    }

    pub fn prev_alerts_page(&mut self) {
        self.pagination.alerts.prev();
    }

    pub fn sessions_can_prev(&self) -> bool {
        self.pagination.sessions.offset > 0
    }

    /// Next is actionable only when the last loaded page said there is more
    pub fn sessions_can_next(&self) -> bool {
        self.sessions.as_ref().is_some_and(|s| s.has_more)
    }

    pub fn alerts_can_prev(&self) -> bool {
        self.pagination.alerts.offset > 0
    }

    pub fn alerts_can_next(&self) -> bool {
        self.alerts.as_ref().is_some_and(|a| {
            a.has_more || u64::from(self.pagination.alerts.offset) + (a.alerts.len() as u64) < a.total
        })
    }

    pub fn session_filters(&self) -> &SessionFilters {
        &self.session_filters
    }

    pub fn set_session_filters(&mut self, filters: SessionFilters) {
        self.session_filters = filters;
    }

    pub fn reset_session_filters(&mut self) {
        self.session_filters = SessionFilters::default();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Outbound queries
    // ─────────────────────────────────────────────────────────────────────

    /// Sessions query from the date, cursor and persisted filters
    pub fn sessions_query(&self) -> SessionQuery {
        let cursor = self.pagination.sessions;
        let mut query = SessionQuery {
            date: self.selected_date.clone(),
            limit: cursor.limit,
            offset: cursor.offset,
            ..Default::default()
        };
        self.session_filters.apply_to(&mut query);
        query
    }

    pub fn alerts_query(&self) -> AlertQuery {
        let cursor = self.pagination.alerts;
        AlertQuery {
            date: self.selected_date.clone(),
            limit: cursor.limit,
            offset: cursor.offset,
        }
    }

    pub fn statistics_query(&self) -> StatisticsQuery {
        StatisticsQuery {
            date: self.selected_date.clone(),
            days: self.stats_window.days(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Messages
    // ─────────────────────────────────────────────────────────────────────

    pub fn error(&self) -> Option<&str> {
        self.error.text()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success.text()
    }

    /// Show an error banner; a zero duration disables auto-dismiss
    pub fn show_error(&mut self, message: impl Into<String>, duration: Duration) {
        self.error.show(message, duration, Instant::now());
    }

    /// Show a success banner; a zero duration disables auto-dismiss
    pub fn show_success(&mut self, message: impl Into<String>, duration: Duration) {
        self.success.show(message, duration, Instant::now());
    }

    pub fn clear_error(&mut self) {
        self.error.clear();
    }

    pub fn clear_success(&mut self) {
        self.success.clear();
    }

    /// Dismiss any banner whose timer has run out
    pub fn expire_messages(&mut self, now: Instant) {
        if self.error.expire(now) {
            tracing::trace!("Error banner dismissed");
        }
        if self.success.expire(now) {
            tracing::trace!("Success banner dismissed");
        }
    }

    /// Earliest pending dismissal across both banners
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.error.deadline(), self.success.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}
