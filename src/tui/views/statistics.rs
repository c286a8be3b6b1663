// Statistics view - distributions over the selected 1/7/30 day window
//
// Six panels in a 3x2 grid. Threat and risk distributions keep their natural
// order; the rest are ranked by count.

use super::{bar, field, panel, render_placeholder};
use crate::api::models::{top_n, StatisticsResponse, ThreatLevel};
use crate::format::{format_number, risk_color, threat_color, truncate};
use crate::store::StatsWindow;
use crate::tui::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::collections::BTreeMap;

const TOP_N: usize = 8;
const BAR_WIDTH: usize = 16;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let Some(stats) = app.store().statistics_data() else {
        render_placeholder(f, area, "Statistics", app);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Percentage(50),
            Constraint::Percentage(50),
        ])
        .split(area);

    render_overview(f, rows[0], stats, app);

    let top = thirds(rows[1]);
    let bottom = thirds(rows[2]);

    let threat_rows: Vec<(String, u64, Color)> = ThreatLevel::ALL
        .iter()
        .map(|level| {
            let count = stats
                .threat_level_distribution
                .get(level.as_str())
                .copied()
                .unwrap_or(0);
            (level.as_str().to_string(), count, threat_color(*level))
        })
        .collect();
    render_distribution(f, top[0], "Threat levels", threat_rows, app);

    let risk_rows = stats
        .risk_score_distribution
        .iter()
        .map(|(bucket, count)| (bucket.clone(), *count, risk_color(bucket_floor(bucket))))
        .collect();
    render_distribution(f, top[1], "Risk scores", risk_rows, app);

    render_ranked(f, top[2], "Attack types", &stats.attack_type_distribution, app);
    render_ranked(f, bottom[0], "Top source IPs", &stats.top_source_ips, app);
    render_ranked(f, bottom[1], "Top user agents", &stats.top_user_agents, app);
    render_ranked(f, bottom[2], "Alert counts", &stats.alert_counts, app);
}

fn thirds(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area)
}

fn render_overview(f: &mut Frame, area: Rect, stats: &StatisticsResponse, app: &App) {
    let window = app.store().stats_window();
    let avg = stats.average_risk_score.round().clamp(0.0, 100.0) as u8;

    let mut window_line = vec![Span::styled(
        format!("  {:<16}", "Window"),
        Style::default().fg(app.theme.muted),
    )];
    window_line.extend(StatsWindow::ALL.iter().flat_map(|w| {
        let style = if *w == window {
            Style::default()
                .fg(app.theme.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.muted)
        };
        [Span::styled(format!("{}d", w.days()), style), Span::raw("  ")]
    }));

    let lines = vec![
        Line::from(window_line),
        field("Sessions", format_number(stats.total_sessions), app),
        field(
            "Average risk",
            Span::styled(
                format!("{:.1}", stats.average_risk_score),
                Style::default().fg(risk_color(avg)),
            ),
            app,
        ),
        field("Needs review", format_number(stats.requires_review_count), app),
    ];

    let title = if stats.date.is_empty() {
        "Overview".to_string()
    } else {
        format!("Overview · {} · {} days (d to change)", stats.date, window.days())
    };
    f.render_widget(Paragraph::new(lines).block(panel(title, app)), area);
}

/// Lower bound of a bucket label such as `40-59`
fn bucket_floor(bucket: &str) -> u8 {
    bucket
        .split(|c: char| !c.is_ascii_digit())
        .find(|part| !part.is_empty())
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

fn render_ranked(f: &mut Frame, area: Rect, title: &str, counts: &BTreeMap<String, u64>, app: &App) {
    let rows = top_n(counts, TOP_N)
        .into_iter()
        .map(|(name, count)| (name.to_string(), count, app.theme.border_focused))
        .collect();
    render_distribution(f, area, title, rows, app);
}

fn render_distribution(
    f: &mut Frame,
    area: Rect,
    title: &str,
    rows: Vec<(String, u64, Color)>,
    app: &App,
) {
    let max = rows.iter().map(|(_, c, _)| *c).max().unwrap_or(0);
    let label_width = (area.width as usize).saturating_sub(BAR_WIDTH + 12).clamp(6, 24);

    let lines: Vec<Line> = if rows.is_empty() {
        vec![Line::from(Span::styled(
            "  No data",
            Style::default().fg(app.theme.muted),
        ))]
    } else {
        rows.into_iter()
            .map(|(label, count, color)| {
                Line::from(vec![
                    Span::raw(format!(
                        " {:<width$}",
                        truncate(&label, label_width),
                        width = label_width
                    )),
                    Span::styled(format!("{:>7} ", count), Style::default().fg(app.theme.fg)),
                    Span::styled(bar(count, max, BAR_WIDTH), Style::default().fg(color)),
                ])
            })
            .collect()
    };

    f.render_widget(Paragraph::new(lines).block(panel(title, app)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_floor() {
        assert_eq!(bucket_floor("40-59"), 40);
        assert_eq!(bucket_floor("90+"), 90);
        assert_eq!(bucket_floor("low"), 0);
    }
}
