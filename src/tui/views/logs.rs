// Logs panel - tail of the in-memory tracing buffer

use super::panel;
use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let visible = area.height.saturating_sub(2) as usize;
    let theme = &app.theme;

    let items: Vec<ListItem> = app
        .log_buffer
        .recent(visible)
        .into_iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    entry.timestamp.format("%H:%M:%S ").to_string(),
                    Style::default().fg(theme.muted),
                ),
                Span::styled(
                    format!("{:<5} ", entry.level.as_str()),
                    Style::default().fg(theme.log_level(entry.level)),
                ),
                Span::styled(
                    format!("{:<10} ", entry.short_target()),
                    Style::default().fg(theme.key),
                ),
                Span::styled(entry.message, Style::default().fg(theme.fg)),
            ]))
        })
        .collect();

    let title = format!("Logs ({})", app.log_buffer.len());
    f.render_widget(List::new(items).block(panel(title, app)), area);
}
