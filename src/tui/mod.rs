// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - The event loop (keyboard input, fetch completions, banner deadlines)
// - Layered key dispatch: overlay, session detail, then global keys

pub mod app;
pub mod modal;
pub mod theme;
pub mod views;

use crate::controller::Completion;
use crate::store::Tab;
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use modal::{Modal, ModalAction};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

/// Lines moved per PageUp/PageDown in the detail modal
const DETAIL_PAGE: u16 = 10;

/// Run the TUI
///
/// Sets up the terminal, loads the initial data, runs the event loop and
/// restores the terminal even when the loop fails.
pub async fn run_tui(mut app: App, mut completions: mpsc::UnboundedReceiver<Completion>) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut app, &mut completions).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Wakes on terminal input, on a finished fetch, or when a banner is due to
/// expire. A slow tick keeps the logs panel fresh while it is open.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    completions: &mut mpsc::UnboundedReceiver<Completion>,
) -> Result<()> {
    // Dates arrive as a completion like every other load
    app.controller.init();

    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(Duration::from_millis(500));
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw terminal")?;

        let deadline = app.controller.next_deadline();

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => handle_key(app, key),
                // Resize and friends just need the redraw at the top of the loop
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                None => break,
            },

            Some(completion) = completions.recv() => {
                app.controller.apply_completion(completion);
            }

            _ = wait_until(deadline) => {
                app.controller.expire_messages(Instant::now());
            }

            _ = tick.tick(), if app.show_logs => {}
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

/// Handle keyboard input
/// Layered dispatch: Overlay → Session detail → Global
fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // Layer 1: help or filter form captures all input
    if let Some(overlay) = app.overlay.as_mut() {
        match overlay.handle_input(key.code) {
            ModalAction::None => {}
            ModalAction::Close => app.overlay = None,
            ModalAction::Submit(input) => app.submit_filters(input),
        }
        return;
    }

    // Layer 2: session detail modal
    if app.store().modal().is_open() {
        handle_detail_key(app, key.code);
        return;
    }

    // Layer 3: global keys
    let tab = app.store().current_tab();
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char(c @ '1'..='5') => {
            let idx = c as usize - '1' as usize;
            app.switch_tab(Tab::ALL[idx]);
        }
        KeyCode::Tab => app.switch_tab(tab.next()),
        KeyCode::BackTab => app.switch_tab(tab.prev()),
        KeyCode::Char('r') => app.controller.refresh(),
        KeyCode::Char('[') => {
            app.shift_date(true);
        }
        KeyCode::Char(']') => {
            app.shift_date(false);
        }
        KeyCode::Char('n') | KeyCode::Right => app.next_page(),
        KeyCode::Char('p') | KeyCode::Left => app.prev_page(),
        KeyCode::Char('f') if tab == Tab::Sessions => app.open_filter_form(),
        KeyCode::Char('c') if tab == Tab::Sessions => app.clear_filters(),
        KeyCode::Char('v') => app.view_requires_review(),
        KeyCode::Char('d') if tab == Tab::Statistics => app.cycle_stats_window(),
        KeyCode::Enter => app.open_selected_detail(),
        KeyCode::Char('y') => app.copy_current(),
        KeyCode::Char('x') | KeyCode::Esc => app.controller.dismiss_message(),
        KeyCode::Char('l') => app.show_logs = !app.show_logs,
        KeyCode::Char('?') => app.overlay = Some(Modal::help()),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc | KeyCode::Char('q') => app.close_detail(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_detail(false),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_detail(true),
        KeyCode::PageUp => app.detail_scroll = app.detail_scroll.saturating_sub(DETAIL_PAGE),
        KeyCode::PageDown => app.detail_scroll = app.detail_scroll.saturating_add(DETAIL_PAGE),
        KeyCode::Home => app.detail_scroll = 0,
        KeyCode::Char('y') => app.copy_current(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::app::tests::{app, settle, unstarted};
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_number_keys_switch_tabs() {
        let (mut app, _rx, _) = app().await;
        handle_key(&mut app, press(KeyCode::Char('4')));
        assert_eq!(app.store().current_tab(), Tab::Statistics);

        handle_key(&mut app, press(KeyCode::Tab));
        assert_eq!(app.store().current_tab(), Tab::Intel);

        handle_key(&mut app, press(KeyCode::BackTab));
        handle_key(&mut app, press(KeyCode::BackTab));
        assert_eq!(app.store().current_tab(), Tab::Alerts);
    }

    #[tokio::test]
    async fn test_overlay_swallows_global_keys() {
        let (mut app, _rx, _) = app().await;
        handle_key(&mut app, press(KeyCode::Char('2')));
        handle_key(&mut app, press(KeyCode::Char('f')));
        assert!(matches!(app.overlay, Some(Modal::Filter(_))));

        // Would switch tabs or quit without the overlay
        handle_key(&mut app, press(KeyCode::Char('3')));
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert_eq!(app.store().current_tab(), Tab::Sessions);
        assert!(!app.should_quit);

        handle_key(&mut app, press(KeyCode::Esc));
        assert!(app.overlay.is_none());
    }

    #[tokio::test]
    async fn test_filter_key_only_on_sessions() {
        let (mut app, _rx, _) = app().await;
        handle_key(&mut app, press(KeyCode::Char('f')));
        assert!(app.overlay.is_none());
    }

    #[tokio::test]
    async fn test_detail_modal_open_and_close() {
        let (mut app, mut rx, _) = app().await;
        handle_key(&mut app, press(KeyCode::Char('2')));
        settle(&mut app, &mut rx).await;

        handle_key(&mut app, press(KeyCode::Enter));
        assert!(app.store().modal().is_open());

        // q closes the modal rather than quitting
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.store().modal().is_open());
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_ctrl_c_always_quits() {
        let (mut app, _rx, _) = app().await;
        app.overlay = Some(Modal::help());
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_release_events_ignored() {
        let (mut app, _rx, _) = app().await;
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        handle_key(&mut app, key);
        assert!(!app.should_quit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_handled_while_dates_never_arrive() {
        let (mut app, mut rx, _) = unstarted(true);
        app.controller.init();

        tokio::time::advance(Duration::from_secs(600)).await;
        settle(&mut app, &mut rx).await;
        assert!(app.store().available_dates().is_empty());
        assert!(app.store().is_loading());

        handle_key(&mut app, press(KeyCode::Char('2')));
        assert_eq!(app.store().current_tab(), Tab::Sessions);

        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(app.should_quit);
    }
}
