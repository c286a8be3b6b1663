// Dashboard view - today's headline numbers, hourly trend, recent alerts, top threats

use super::{bar, panel, render_placeholder};
use crate::api::models::{top_n, DashboardResponse};
use crate::format::{format_number, format_timestamp, risk_color, threat_badge, truncate};
use crate::tui::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Sparkline, Table},
    Frame,
};
use std::collections::BTreeMap;

const TOP_N: usize = 5;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let Some(data) = app.store().dashboard_data() else {
        render_placeholder(f, area, "Dashboard", app);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(6),
            Constraint::Min(0),
        ])
        .split(area);

    render_summary(f, rows[0], data, app);
    render_trend(f, rows[1], data, app);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[2]);

    render_recent_alerts(f, cols[0], data, app);
    render_top_threats(f, cols[1], data, app);
}

fn render_summary(f: &mut Frame, area: Rect, data: &DashboardResponse, app: &App) {
    let summary = &data.today_summary;
    let avg = summary.average_risk.round().clamp(0.0, 100.0) as u8;

    let cards = [
        ("Sessions", format_number(summary.total_sessions), app.theme.fg),
        ("High risk", format_number(summary.high_risk_count), risk_color(70)),
        ("Critical alerts", format_number(summary.critical_alerts), risk_color(90)),
        ("Avg risk", format!("{:.1}", summary.average_risk), risk_color(avg)),
        ("Unique IPs", format_number(summary.unique_ips), app.theme.fg),
    ];

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, cards.len() as u32); 5])
        .split(area);

    for ((label, value, color), col) in cards.into_iter().zip(cols.iter()) {
        let text = vec![Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .centered()];
        f.render_widget(Paragraph::new(text).block(panel(label, app)), *col);
    }
}

fn render_trend(f: &mut Frame, area: Rect, data: &DashboardResponse, app: &App) {
    let counts = data.trend_counts();
    if counts.is_empty() {
        let empty = Paragraph::new("  No hourly data")
            .style(Style::default().fg(app.theme.muted))
            .block(panel("Sessions per hour", app));
        f.render_widget(empty, area);
        return;
    }

    let peak = counts.iter().max().copied().unwrap_or(0);
    let title = format!("Sessions per hour ({}h, peak {})", counts.len(), peak);
    let sparkline = Sparkline::default()
        .block(panel(title, app))
        .data(&counts)
        .style(Style::default().fg(app.theme.border_focused));

    f.render_widget(sparkline, area);
}

fn render_recent_alerts(f: &mut Frame, area: Rect, data: &DashboardResponse, app: &App) {
    if data.recent_alerts.is_empty() {
        let empty = Paragraph::new("  No alerts today")
            .style(Style::default().fg(app.theme.muted))
            .block(panel("Recent alerts", app));
        f.render_widget(empty, area);
        return;
    }

    let rows = data.recent_alerts.iter().map(|alert| {
        let (badge, color) = threat_badge(&alert.alert_level);
        Row::new(vec![
            Cell::from(format_timestamp(&alert.processed_at)),
            Cell::from(alert.peer_ip.clone()),
            Cell::from(Span::styled(badge, Style::default().fg(color))),
            Cell::from(Span::styled(
                alert.risk_score.to_string(),
                Style::default().fg(risk_color(alert.risk_score)),
            )),
            Cell::from(truncate(&alert.attack_types.join(", "), 30)),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(18),
            Constraint::Length(16),
            Constraint::Length(9),
            Constraint::Length(5),
            Constraint::Min(10),
        ],
    )
    .header(
        Row::new(vec!["Time", "Peer IP", "Level", "Risk", "Attacks"])
            .style(Style::default().fg(app.theme.muted)),
    )
    .block(panel("Recent alerts", app));

    f.render_widget(table, area);
}

fn render_top_threats(f: &mut Frame, area: Rect, data: &DashboardResponse, app: &App) {
    let threats = &data.top_threats;
    let mut lines = Vec::new();

    let mut section = |title: &str, counts: &BTreeMap<String, u64>| {
        lines.push(Line::from(Span::styled(
            format!(" {}", title),
            Style::default()
                .fg(app.theme.highlight)
                .add_modifier(Modifier::BOLD),
        )));
        let top = top_n(counts, TOP_N);
        if top.is_empty() {
            lines.push(Line::from(Span::styled(
                "   none",
                Style::default().fg(app.theme.muted),
            )));
        }
        let max = top.first().map_or(0, |(_, c)| *c);
        for (name, count) in top {
            lines.push(Line::from(vec![
                Span::raw(format!("   {:<18}", truncate(name, 18))),
                Span::styled(format!("{:>6} ", count), Style::default().fg(app.theme.fg)),
                Span::styled(bar(count, max, 10), Style::default().fg(app.theme.border_focused)),
            ]));
        }
        lines.push(Line::raw(""));
    };

    section("Source IPs", &threats.top_ips);
    section("Attack types", &threats.top_attacks);
    section("Tools", &threats.top_tools);

    f.render_widget(Paragraph::new(lines).block(panel("Top threats", app)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::tests::{app, settle};
    use ratatui::{backend::TestBackend, Terminal};

    #[tokio::test]
    async fn test_hourly_trend_panel_rendered() {
        let (mut app, mut rx, _) = app().await;
        settle(&mut app, &mut rx).await;
        assert!(app.store().dashboard_data().is_some());

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| render(f, f.area(), &app)).unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Sessions per hour (3h, peak 9)"));
    }
}
