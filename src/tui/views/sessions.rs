// Sessions view - filterable, paged session list

use super::{panel, render_placeholder};
use crate::format::{format_number, format_timestamp, is_private_ip, risk_color, threat_badge, truncate};
use crate::store::PageCursor;
use crate::tui::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let filters = app.store().session_filters();
    let label = if filters.is_filtered() {
        Span::styled(format!(" Filters: {}", filters), Style::default().fg(app.theme.highlight))
    } else {
        Span::styled(format!(" No filters  {}", filters), Style::default().fg(app.theme.muted))
    };
    f.render_widget(Paragraph::new(Line::from(label)), chunks[0]);

    let Some(data) = app.store().sessions_data() else {
        render_placeholder(f, chunks[1], "Sessions", app);
        return;
    };

    let rows = data.sessions.iter().map(|s| {
        let (badge, color) = threat_badge(&s.threat_level);
        let ip_color = if is_private_ip(&s.peer_ip) {
            app.theme.private_ip
        } else {
            app.theme.public_ip
        };
        let tool = s.tool_identified.as_deref().unwrap_or("");
        Row::new(vec![
            Cell::from(format_timestamp(&s.processed_at)),
            Cell::from(Span::styled(s.peer_ip.clone(), Style::default().fg(ip_color))),
            Cell::from(Span::styled(badge, Style::default().fg(color))),
            Cell::from(Span::styled(
                s.risk_score.to_string(),
                Style::default().fg(risk_color(s.risk_score)),
            )),
            Cell::from(truncate(&s.attack_types.join(", "), 28)),
            Cell::from(format_number(s.total_requests)),
            Cell::from(truncate(tool, 14)),
            Cell::from(truncate(&s.sess_uuid, 12)),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(18),
            Constraint::Length(16),
            Constraint::Length(9),
            Constraint::Length(5),
            Constraint::Min(12),
            Constraint::Length(8),
            Constraint::Length(14),
            Constraint::Length(12),
        ],
    )
    .header(
        Row::new(vec!["Time", "Peer IP", "Threat", "Risk", "Attacks", "Reqs", "Tool", "UUID"])
            .style(Style::default().fg(app.theme.muted)),
    )
    .row_highlight_style(app.theme.selected_style())
    .highlight_symbol("▶ ")
    .block(panel(format!("Sessions ({})", format_number(data.total)), app));

    let mut state = TableState::default().with_selected(app.selected_row());
    f.render_stateful_widget(table, chunks[1], &mut state);

    let cursor = &app.store().pagination().sessions;
    let footer = page_footer(
        cursor,
        data.sessions.len(),
        data.total,
        app.store().sessions_can_prev(),
        app.store().sessions_can_next(),
    );
    f.render_widget(
        Paragraph::new(footer).style(Style::default().fg(app.theme.muted)),
        chunks[2],
    );
}

/// `Page 2 · 51-100 of 240 · ‹ prev  next ›`
pub(super) fn page_footer(
    cursor: &PageCursor,
    shown: usize,
    total: u64,
    can_prev: bool,
    can_next: bool,
) -> String {
    let range = if shown == 0 {
        "no rows".to_string()
    } else {
        let first = u64::from(cursor.offset) + 1;
        let last = u64::from(cursor.offset) + shown as u64;
        format!("{}-{} of {}", first, last, format_number(total))
    };
    let prev = if can_prev { "‹ p prev" } else { "" };
    let next = if can_next { "n next ›" } else { "" };
    format!(" Page {} · {}  {}  {}", cursor.page(), range, prev, next)
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footer_on_second_page() {
        let mut cursor = PageCursor::new(50);
        cursor.next();
        assert_eq!(
            page_footer(&cursor, 50, 240, true, true),
            " Page 2 · 51-100 of 240  ‹ p prev  n next ›"
        );
    }

    #[test]
    fn test_footer_empty_first_page() {
        let cursor = PageCursor::new(50);
        assert_eq!(page_footer(&cursor, 0, 0, false, false), " Page 1 · no rows");
    }
}
