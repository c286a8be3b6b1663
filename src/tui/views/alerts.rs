// Alerts view - paged alert list with a per-level tally of the current page

use super::sessions::page_footer;
use super::{panel, render_placeholder};
use crate::api::models::ThreatLevel;
use crate::format::{format_timestamp, risk_color, threat_badge, threat_color, truncate};
use crate::tui::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let Some(data) = app.store().alerts_data() else {
        render_placeholder(f, area, "Alerts", app);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let mut tally = vec![Span::raw(" ")];
    for level in ThreatLevel::ALL {
        tally.push(Span::styled(
            format!("{} {}", level, data.count_at(level)),
            Style::default()
                .fg(threat_color(level))
                .add_modifier(Modifier::BOLD),
        ));
        tally.push(Span::raw("   "));
    }
    f.render_widget(Paragraph::new(Line::from(tally)), chunks[0]);

    let rows = data.alerts.iter().map(|alert| {
        let (alert_badge, alert_color) = threat_badge(&alert.alert_level);
        let (threat, threat_col) = threat_badge(&alert.threat_level);
        Row::new(vec![
            Cell::from(format_timestamp(&alert.processed_at)),
            Cell::from(alert.peer_ip.clone()),
            Cell::from(Span::styled(alert_badge, Style::default().fg(alert_color))),
            Cell::from(Span::styled(threat, Style::default().fg(threat_col))),
            Cell::from(Span::styled(
                alert.risk_score.to_string(),
                Style::default().fg(risk_color(alert.risk_score)),
            )),
            Cell::from(truncate(&alert.attack_types.join(", "), 28)),
            Cell::from(truncate(alert.tool_identified.as_deref().unwrap_or(""), 14)),
            Cell::from(alert.recommendations_count.to_string()),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(18),
            Constraint::Length(16),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(5),
            Constraint::Min(12),
            Constraint::Length(14),
            Constraint::Length(5),
        ],
    )
    .header(
        Row::new(vec!["Time", "Peer IP", "Alert", "Threat", "Risk", "Attacks", "Tool", "Recs"])
            .style(Style::default().fg(app.theme.muted)),
    )
    .row_highlight_style(app.theme.selected_style())
    .highlight_symbol("▶ ")
    .block(panel(format!("Alerts ({})", data.total), app));

    let mut state = TableState::default().with_selected(app.selected_row());
    f.render_stateful_widget(table, chunks[1], &mut state);

    let footer = page_footer(
        &app.store().pagination().alerts,
        data.alerts.len(),
        data.total,
        app.store().alerts_can_prev(),
        app.store().alerts_can_next(),
    );
    f.render_widget(
        Paragraph::new(footer).style(Style::default().fg(app.theme.muted)),
        chunks[2],
    );
}
