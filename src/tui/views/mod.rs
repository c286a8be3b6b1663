// Views module - screen-level rendering logic
//
// Fixed shell: tab bar, message banner, tab content, optional logs panel and
// a status line. Overlays (session detail, help, filter form) draw last.

mod alerts;
mod dashboard;
mod intel;
mod logs;
mod modal;
mod sessions;
mod statistics;

use super::app::App;
use crate::store::Tab;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

/// Height of the logs panel when visible
const LOGS_HEIGHT: u16 = 10;

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &App) {
    let store = app.store();
    let has_banner = store.error().is_some() || store.success_message().is_some();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(u16::from(has_banner)),
            Constraint::Min(5),
            Constraint::Length(if app.show_logs { LOGS_HEIGHT } else { 0 }),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], app);
    if has_banner {
        render_banner(f, chunks[1], app);
    }

    match store.current_tab() {
        Tab::Dashboard => dashboard::render(f, chunks[2], app),
        Tab::Sessions => sessions::render(f, chunks[2], app),
        Tab::Alerts => alerts::render(f, chunks[2], app),
        Tab::Statistics => statistics::render(f, chunks[2], app),
        Tab::Intel => intel::render(f, chunks[2], app),
    }

    if app.show_logs {
        logs::render(f, chunks[3], app);
    }
    render_status(f, chunks[4], app);

    if store.modal().is_open() {
        modal::render_session_detail(f, app);
    }
    if let Some(overlay) = &app.overlay {
        modal::render_overlay(f, overlay, app);
    }
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let store = app.store();
    let theme = &app.theme;

    let titles: Vec<String> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| format!(" {}│{} ", i + 1, tab.name()))
        .collect();

    let date = store.selected_date().unwrap_or("no date");
    let mut right = vec![Span::styled(
        format!(" {} ", date),
        Style::default().fg(theme.highlight),
    )];
    if store.is_loading() {
        right.push(Span::styled("loading… ", Style::default().fg(theme.muted)));
    }

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .title(Span::styled(" honeyscope ", theme.title_style()))
                .title_top(Line::from(right).right_aligned()),
        )
        .select(store.current_tab().index())
        .style(Style::default().fg(theme.fg))
        .highlight_style(
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

/// One-line banner; an error takes precedence over a success message
fn render_banner(f: &mut Frame, area: Rect, app: &App) {
    let store = app.store();
    let theme = &app.theme;

    let (text, bg) = match (store.error(), store.success_message()) {
        (Some(err), _) => (format!(" ✗ {}  (x to dismiss)", err), theme.error_bg),
        (None, Some(msg)) => (format!(" ✓ {}  (x to dismiss)", msg), theme.success_bg),
        (None, None) => return,
    };

    let banner = Paragraph::new(text).style(
        Style::default()
            .fg(theme.banner_fg)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(banner, area);
}

fn render_status(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let key = Style::default().fg(theme.key);
    let desc = Style::default().fg(theme.muted);

    let mut hints: Vec<(&str, &str)> = vec![("1-5", "tabs"), ("r", "refresh"), ("[ ]", "date")];
    match app.store().current_tab() {
        Tab::Sessions => hints.extend([
            ("n/p", "page"),
            ("Enter", "detail"),
            ("f", "filter"),
            ("c", "clear"),
            ("v", "review"),
        ]),
        Tab::Alerts => hints.extend([("n/p", "page"), ("Enter", "detail")]),
        Tab::Statistics => hints.push(("d", "window")),
        Tab::Intel => hints.push(("y", "copy IPs")),
        Tab::Dashboard => hints.push(("v", "review")),
    }
    hints.extend([("l", "logs"), ("?", "help"), ("q", "quit")]);

    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (k, d) in hints {
        spans.push(Span::styled(format!(" {}", k), key));
        spans.push(Span::styled(format!(" {} ", d), desc));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Bordered block with the theme's title style
pub(super) fn panel<'a>(title: impl Into<String>, app: &App) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
        .title(Span::styled(format!(" {} ", title.into()), app.theme.title_style()))
}

/// Placeholder for a tab with nothing cached yet
pub(super) fn render_placeholder(f: &mut Frame, area: Rect, title: &str, app: &App) {
    let text = if app.store().is_loading() {
        "Loading…"
    } else {
        "No data"
    };
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.muted))
        .block(panel(title, app));
    f.render_widget(paragraph, area);
}

/// `label  value` line for summary panels
pub(super) fn field<'a>(label: &str, value: impl Into<Span<'a>>, app: &App) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<16}", label), Style::default().fg(app.theme.muted)),
        value.into(),
    ])
}

/// Horizontal bar scaled against `max`
pub(super) fn bar(value: u64, max: u64, width: usize) -> String {
    if max == 0 || width == 0 {
        return String::new();
    }
    let filled = ((value as f64 / max as f64) * width as f64).round() as usize;
    "█".repeat(filled.clamp(usize::from(value > 0), width))
}
