// TUI application state
//
// Wraps the controller with the purely visual state: row selection per list,
// overlays, the logs panel toggle. Everything that touches the backend goes
// through the controller so load ordering stays in one place.

use super::modal::Modal;
use super::theme::Theme;
use crate::controller::Controller;
use crate::logging::LogBuffer;
use crate::store::{AppStore, FilterInput, Tab};
use serde_json::Value;

/// Main application state for the TUI
pub struct App {
    pub controller: Controller,

    /// Log buffer for the logs panel
    pub log_buffer: LogBuffer,

    pub theme: Theme,

    /// Help or filter form overlay (the session detail lives in the store)
    pub overlay: Option<Modal>,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Whether the logs panel is visible
    pub show_logs: bool,

    /// Highlighted row in the sessions table
    pub selected_session: usize,

    /// Highlighted row in the alerts table
    pub selected_alert: usize,

    /// Scroll offset for the session detail modal
    pub detail_scroll: u16,
}

impl App {
    pub fn new(controller: Controller, log_buffer: LogBuffer) -> Self {
        Self {
            controller,
            log_buffer,
            theme: Theme::default(),
            overlay: None,
            should_quit: false,
            show_logs: false,
            selected_session: 0,
            selected_alert: 0,
            detail_scroll: 0,
        }
    }

    pub fn store(&self) -> &AppStore {
        self.controller.store()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Row selection
    // ─────────────────────────────────────────────────────────────────────

    /// Rows in the list shown by the active tab
    fn row_count(&self) -> usize {
        let store = self.store();
        match store.current_tab() {
            Tab::Sessions => store.sessions_data().map_or(0, |d| d.sessions.len()),
            Tab::Alerts => store.alerts_data().map_or(0, |d| d.alerts.len()),
            _ => 0,
        }
    }

    fn selection_mut(&mut self) -> Option<&mut usize> {
        match self.store().current_tab() {
            Tab::Sessions => Some(&mut self.selected_session),
            Tab::Alerts => Some(&mut self.selected_alert),
            _ => None,
        }
    }

    /// Selected row for the active tab, clamped to what is loaded
    pub fn selected_row(&self) -> Option<usize> {
        let count = self.row_count();
        if count == 0 {
            return None;
        }
        let raw = match self.store().current_tab() {
            Tab::Sessions => self.selected_session,
            Tab::Alerts => self.selected_alert,
            _ => return None,
        };
        Some(raw.min(count - 1))
    }

    pub fn select_next(&mut self) {
        let count = self.row_count();
        if let Some(sel) = self.selection_mut() {
            if count > 0 {
                *sel = (*sel + 1).min(count - 1);
            }
        }
    }

    pub fn select_prev(&mut self) {
        let current = self.selected_row();
        if let (Some(current), Some(sel)) = (current, self.selection_mut()) {
            *sel = current.saturating_sub(1);
        }
    }

    fn reset_selection(&mut self) {
        if let Some(sel) = self.selection_mut() {
            *sel = 0;
        }
    }

    /// Session UUID of the highlighted session or alert
    pub fn selected_uuid(&self) -> Option<String> {
        let row = self.selected_row()?;
        let store = self.store();
        match store.current_tab() {
            Tab::Sessions => store
                .sessions_data()
                .and_then(|d| d.sessions.get(row))
                .map(|s| s.sess_uuid.clone()),
            Tab::Alerts => store
                .alerts_data()
                .and_then(|d| d.alerts.get(row))
                .map(|a| a.sess_uuid.clone()),
            _ => None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Actions
    // ─────────────────────────────────────────────────────────────────────

    pub fn switch_tab(&mut self, tab: Tab) {
        self.controller.switch_tab(tab);
    }

    /// Move the selected date; dates are listed newest first
    ///
    /// Returns false at either end of the list.
    pub fn shift_date(&mut self, older: bool) -> bool {
        let store = self.store();
        let dates = store.available_dates();
        let Some(current) = store
            .selected_date()
            .and_then(|d| dates.iter().position(|x| x == d))
        else {
            return false;
        };

        let target = if older {
            current + 1
        } else {
            match current.checked_sub(1) {
                Some(i) => i,
                None => return false,
            }
        };
        let Some(date) = dates.get(target).cloned() else {
            return false;
        };

        self.controller.set_selected_date(date);
        self.selected_session = 0;
        self.selected_alert = 0;
        true
    }

    pub fn next_page(&mut self) {
        let moved = match self.store().current_tab() {
            Tab::Sessions => self.controller.next_sessions_page(),
            Tab::Alerts => self.controller.next_alerts_page(),
            _ => false,
        };
        if moved {
            self.reset_selection();
        }
    }

    pub fn prev_page(&mut self) {
        let moved = match self.store().current_tab() {
            Tab::Sessions => self.controller.prev_sessions_page(),
            Tab::Alerts => self.controller.prev_alerts_page(),
            _ => false,
        };
        if moved {
            self.reset_selection();
        }
    }

    /// Step the statistics window 1 → 7 → 30 → 1 days
    pub fn cycle_stats_window(&mut self) {
        let next = self.store().stats_window().next();
        self.controller.set_stats_window(next);
    }

    pub fn open_filter_form(&mut self) {
        let input = FilterInput::from_filters(self.store().session_filters());
        self.overlay = Some(Modal::filter(input));
    }

    /// Apply the form; on invalid input the form stays open behind the banner
    pub fn submit_filters(&mut self, input: FilterInput) {
        if self.controller.apply_session_filters(&input).is_ok() {
            self.overlay = None;
            self.selected_session = 0;
        }
    }

    pub fn clear_filters(&mut self) {
        self.controller.clear_session_filters();
        self.selected_session = 0;
    }

    pub fn view_requires_review(&mut self) {
        self.controller.view_requires_review();
        self.selected_session = 0;
    }

    pub fn open_selected_detail(&mut self) {
        if let Some(uuid) = self.selected_uuid() {
            self.detail_scroll = 0;
            self.controller.show_session_detail(uuid);
        }
    }

    pub fn close_detail(&mut self) {
        self.detail_scroll = 0;
        self.controller.close_modal();
    }

    /// Copy whatever the current context offers
    ///
    /// The open session detail wins; otherwise the malicious IP list on the
    /// intel tab, or the highlighted session UUID on the list tabs.
    pub fn copy_current(&mut self) {
        if self.store().modal().is_open() {
            self.controller.copy_session_detail();
            return;
        }

        let value = match self.store().current_tab() {
            Tab::Intel => self.store().intel_data().map(|intel| {
                Value::Array(
                    intel
                        .malicious_ips
                        .iter()
                        .cloned()
                        .map(Value::String)
                        .collect(),
                )
            }),
            // One-element list so the UUID pastes without JSON quotes
            Tab::Sessions | Tab::Alerts => self
                .selected_uuid()
                .map(|uuid| Value::Array(vec![Value::String(uuid)])),
            _ => None,
        };

        if let Some(value) = value {
            self.controller.copy_to_clipboard(&value);
        }
    }

    pub fn scroll_detail(&mut self, down: bool) {
        self.detail_scroll = if down {
            self.detail_scroll.saturating_add(1)
        } else {
            self.detail_scroll.saturating_sub(1)
        };
    }
}
