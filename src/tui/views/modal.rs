// Modal overlay rendering
//
// Modals are rendered on top of the main content:
// - Session detail: full record for one session (scrollable)
// - Help: keyboard shortcuts
// - Filter form: session list filters

use crate::api::models::{AttackType, SessionDetail};
use crate::api::query::SortSpec;
use crate::format::{
    format_bytes, format_timestamp, is_private_ip, reputation_label, risk_color, threat_badge,
};
use crate::tui::app::App;
use crate::tui::modal::{FilterField, FilterForm, Modal};
use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use serde_json::Value;

/// Requests listed before the "showing first N" note
const MAX_PATHS: usize = 10;

/// Calculate centered rect for modal dialog
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

pub fn render_overlay(f: &mut Frame, modal: &Modal, app: &App) {
    match modal {
        Modal::Help => render_help(f, app),
        Modal::Filter(form) => render_filter_form(f, form, app),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session detail
// ─────────────────────────────────────────────────────────────────────────────

pub fn render_session_detail(f: &mut Frame, app: &App) {
    let modal = app.store().modal();
    let Some(detail) = modal.data() else {
        return;
    };

    let frame_area = f.area();
    let width = (frame_area.width * 90 / 100).max(60);
    let height = (frame_area.height * 85 / 100).max(20);
    let area = centered_rect(width, height, frame_area);
    f.render_widget(Clear, area);

    let lines = detail_lines(detail, modal.is_loading(), &app.theme);
    let viewport = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(viewport);
    let offset = (app.detail_scroll as usize).min(max_scroll);

    let scroll_info = if lines.len() > viewport {
        format!(" ({}/{})", offset + 1, lines.len())
    } else {
        String::new()
    };

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(app.theme.fg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border_focused))
                .title(format!(" Session {}{} ", detail.sess_uuid, scroll_info))
                .title_bottom(Line::from(" ↑↓:scroll  y:copy JSON  Esc:close ").centered()),
        )
        .scroll((offset as u16, 0));

    f.render_widget(paragraph, area);
}

/// Every line of the detail modal
///
/// While the full record is loading only the UUID from the stub is known.
pub(super) fn detail_lines(detail: &SessionDetail, loading: bool, theme: &Theme) -> Vec<Line<'static>> {
    let header = Style::default()
        .fg(theme.highlight)
        .add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(theme.muted);
    let row = |label: &str, value: Span<'static>| {
        Line::from(vec![
            Span::styled(format!("  {:<16}", label), muted),
            value,
        ])
    };
    let section = |title: &str| Line::from(Span::styled(format!(" {}", title), header));

    let mut lines = Vec::new();

    if loading {
        lines.push(row("Session UUID", Span::raw(detail.sess_uuid.clone())));
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled("  Loading session detail…", muted)));
        return lines;
    }

    // Basic information
    lines.push(section("Basic information"));
    lines.push(row("Session UUID", Span::raw(detail.sess_uuid.clone())));
    let ip_color = if is_private_ip(&detail.peer_ip) {
        theme.private_ip
    } else {
        theme.public_ip
    };
    lines.push(row(
        "Peer",
        Span::styled(
            format!("{}:{}", detail.peer_ip, detail.peer_port),
            Style::default().fg(ip_color),
        ),
    ));
    lines.push(row("User agent", Span::raw(detail.user_agent.clone())));
    lines.push(row("Started", Span::raw(timestamp_or(&detail.start_time, "-"))));
    lines.push(row("Ended", Span::raw(timestamp_or(&detail.end_time, "ongoing"))));
    lines.push(row("Processed", Span::raw(timestamp_or(&detail.processed_at, "-"))));
    lines.push(row("Requests", Span::raw(detail.total_requests.to_string())));
    lines.push(Line::raw(""));

    // Threat assessment
    lines.push(section("Threat assessment"));
    lines.push(row(
        "Risk score",
        Span::styled(
            detail.risk_score.to_string(),
            Style::default()
                .fg(risk_color(detail.risk_score))
                .add_modifier(Modifier::BOLD),
        ),
    ));
    let (threat, threat_color) = threat_badge(&detail.threat_level);
    lines.push(row("Threat level", Span::styled(threat, Style::default().fg(threat_color))));
    let (alert, alert_color) = threat_badge(&detail.alert_level);
    lines.push(row("Alert level", Span::styled(alert, Style::default().fg(alert_color))));
    lines.push(row(
        "Priority",
        Span::raw(detail.priority.clone().unwrap_or_else(|| "N/A".to_string())),
    ));
    if detail.has_malicious_activity {
        lines.push(Line::from(Span::styled(
            "  Malicious activity detected",
            Style::default().fg(risk_color(90)),
        )));
    }
    if detail.requires_review {
        lines.push(Line::from(Span::styled(
            "  Flagged for analyst review",
            Style::default().fg(theme.highlight),
        )));
    }
    lines.push(Line::raw(""));

    // Attacks
    lines.push(section("Attacks"));
    let mut kinds: Vec<&str> = Vec::new();
    for kind in &detail.attack_types {
        if !kinds.contains(&kind.as_str()) {
            kinds.push(kind);
        }
    }
    let kinds = if kinds.is_empty() {
        "none".to_string()
    } else {
        kinds.join(", ")
    };
    lines.push(row("Types", Span::raw(kinds)));
    if let Some(tool) = detail.extra.get("tool_identified").and_then(Value::as_str) {
        lines.push(row("Tool", Span::raw(tool.to_string())));
    }
    if detail.extra.get("is_scanner").and_then(Value::as_bool) == Some(true) {
        lines.push(row("Scanner", Span::raw("automated scanner detected")));
    }
    lines.push(Line::raw(""));

    // Location
    lines.push(section("Location"));
    lines.extend(location_lines(detail).into_iter().map(|(label, value)| {
        row(&label, Span::raw(value))
    }));
    lines.push(Line::raw(""));

    // Reputation
    if let Some(rep) = &detail.ip_reputation {
        lines.push(section("IP reputation"));
        if let Some(score) = rep.get("reputation_score").and_then(Value::as_f64) {
            let (label, color) = reputation_label(score);
            lines.push(row(
                "Score",
                Span::styled(
                    format!("{:.0} ({})", score * 100.0, label),
                    Style::default().fg(color),
                ),
            ));
        }
        for (key, label) in [
            ("is_private", "Private"),
            ("is_tor", "Tor exit"),
            ("is_vpn", "VPN"),
            ("is_cloud", "Cloud"),
        ] {
            let yes = rep.get(key).and_then(Value::as_bool).unwrap_or(false);
            lines.push(row(label, Span::raw(if yes { "yes" } else { "no" })));
        }
        if let Some(Value::Array(notes)) = rep.get("notes") {
            for note in notes.iter().filter_map(Value::as_str) {
                lines.push(Line::raw(format!("    • {}", note)));
            }
        }
        lines.push(Line::raw(""));
    }

    // Recommendations
    if !detail.recommendations.is_empty() {
        lines.push(section("Recommendations"));
        for rec in &detail.recommendations {
            lines.push(Line::raw(format!("    ▸ {}", rec)));
        }
        lines.push(Line::raw(""));
    }

    // Requests
    if !detail.paths.is_empty() {
        lines.push(section(&format!("Requests ({})", detail.paths.len())));
        for req in detail.paths.iter().take(MAX_PATHS) {
            lines.push(request_line(req, theme));
        }
        if detail.paths.len() > MAX_PATHS {
            lines.push(Line::from(Span::styled(
                format!("    showing first {} of {}", MAX_PATHS, detail.paths.len()),
                muted,
            )));
        }
        lines.push(Line::raw(""));
    }

    // Raw JSON
    let raw = serde_json::to_string_pretty(detail).unwrap_or_default();
    lines.push(section(&format!(
        "Raw JSON ({})",
        format_bytes(raw.len() as u64)
    )));
    lines.extend(
        raw.lines()
            .map(|l| Line::from(Span::styled(format!("  {}", l), muted))),
    );

    lines
}

fn timestamp_or(ts: &Option<String>, fallback: &str) -> String {
    match ts.as_deref() {
        Some(ts) if !ts.is_empty() => format_timestamp(ts),
        _ => fallback.to_string(),
    }
}

/// Label/value rows for the location section
fn location_lines(detail: &SessionDetail) -> Vec<(String, String)> {
    let loc = detail.location.as_ref();
    let text = |key: &str| {
        loc.and_then(|l| l.get(key))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let country = text("country");
    let city = text("city");
    if country.is_none() && city.is_none() {
        let note = if is_private_ip(&detail.peer_ip) {
            "Private IP address, no geolocation"
        } else {
            "Geolocation unavailable"
        };
        return vec![("Status".to_string(), note.to_string())];
    }

    let mut rows = Vec::new();
    if let Some(country) = country {
        let label = match text("country_code") {
            Some(code) => format!("{} {}", code, country),
            None => country,
        };
        rows.push(("Country".to_string(), label));
    }
    rows.push(("City".to_string(), city.unwrap_or_else(|| "-".to_string())));
    if let Some(zip) = text("zip_code") {
        rows.push(("Zip code".to_string(), zip));
    }
    let coord = |key: &str| loc.and_then(|l| l.get(key)).and_then(Value::as_f64);
    if let (Some(lat), Some(lon)) = (coord("latitude"), coord("longitude")) {
        rows.push(("Coordinates".to_string(), format!("{}, {}", lat, lon)));
    }
    rows
}

fn request_line(req: &Value, theme: &Theme) -> Line<'static> {
    let text = |key: &str| req.get(key).and_then(Value::as_str).unwrap_or_default().to_string();
    let kind = text("attack_type");
    let status = req
        .get("response_status")
        .map(|s| match s {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| "-".to_string());

    Line::from(vec![
        Span::styled(
            format!("    {:<6} ", text("method")),
            Style::default().fg(theme.key).add_modifier(Modifier::BOLD),
        ),
        Span::raw(text("path")),
        Span::styled(
            format!("  {}", if kind.is_empty() { "normal" } else { kind.as_str() }),
            Style::default().fg(theme.highlight),
        ),
        Span::styled(format!("  {}", status), Style::default().fg(theme.muted)),
    ])
}

// ─────────────────────────────────────────────────────────────────────────────
// Help
// ─────────────────────────────────────────────────────────────────────────────

fn render_help(f: &mut Frame, app: &App) {
    let key_style = Style::default().fg(app.theme.key);
    let desc_style = Style::default().fg(app.theme.fg);
    let header_style = Style::default()
        .fg(app.theme.highlight)
        .add_modifier(Modifier::BOLD);

    let kb = |key: &str, desc: &str| -> Line {
        Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("{:<12}", key), key_style),
            Span::styled(desc.to_string(), desc_style),
        ])
    };

    let content = Text::from(vec![
        Line::raw(""),
        Line::from(Span::styled("  Navigation", header_style)),
        kb("1-5", "Jump to tab"),
        kb("Tab/S-Tab", "Next / previous tab"),
        kb("[ / ]", "Older / newer date"),
        kb("r", "Refresh current tab"),
        kb("↑/↓, j/k", "Move selection"),
        Line::raw(""),
        Line::from(Span::styled("  Lists", header_style)),
        kb("n / p", "Next / previous page"),
        kb("Enter", "Open session detail"),
        kb("f", "Filter sessions"),
        kb("c", "Clear session filters"),
        kb("v", "Sessions needing review"),
        kb("d", "Cycle statistics window"),
        Line::raw(""),
        Line::from(Span::styled("  General", header_style)),
        kb("y", "Copy (detail, IPs, UUID)"),
        kb("x", "Dismiss error"),
        kb("l", "Toggle logs panel"),
        kb("?", "Toggle this help"),
        kb("q", "Quit"),
    ]);

    let area = centered_rect(48, 26, f.area());
    f.render_widget(Clear, area);

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.highlight))
            .title(" Help ")
            .title_bottom(Line::from(" Press ? or Esc to close ").centered()),
    );
    f.render_widget(paragraph, area);
}

// ─────────────────────────────────────────────────────────────────────────────
// Filter form
// ─────────────────────────────────────────────────────────────────────────────

fn render_filter_form(f: &mut Frame, form: &FilterForm, app: &App) {
    let theme = &app.theme;
    let mut lines = vec![Line::raw("")];

    for field in FilterField::ALL {
        let focused = field == form.focus;
        let raw = form.value(field);
        let shown = match field {
            FilterField::Sort => SortSpec::from_token(raw)
                .map(|s| s.label().to_string())
                .unwrap_or_else(|| raw.to_string()),
            FilterField::AttackType if !raw.is_empty() => AttackType::parse(raw)
                .map(|a| a.label().to_string())
                .unwrap_or_else(|| raw.to_string()),
            _ if raw.is_empty() && field.is_choice() => "any".to_string(),
            _ => raw.to_string(),
        };
        let value = if field.is_choice() {
            format!("‹ {} ›", shown)
        } else if focused {
            format!("{}▏", shown)
        } else {
            shown
        };

        let marker = if focused { "▶ " } else { "  " };
        let label_style = if focused {
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {}{:<14}", marker, field.label()), label_style),
            Span::styled(value, Style::default().fg(theme.fg)),
        ]));
    }

    let area = centered_rect(56, 10, f.area());
    f.render_widget(Clear, area);

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_focused))
            .title(" Filter sessions ")
            .title_bottom(Line::from(" Tab:field  ←→:choose  Enter:apply  Esc:cancel ").centered()),
    );
    f.render_widget(paragraph, area);
}
