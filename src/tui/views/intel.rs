// Threat intel view - indicators harvested from high-risk sessions

use super::{field, panel, render_placeholder};
use crate::format::{format_number, is_private_ip, truncate};
use crate::tui::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};
use serde_json::Value;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let Some(intel) = app.store().intel_data() else {
        render_placeholder(f, area, "Threat Intel", app);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Percentage(55),
            Constraint::Percentage(45),
        ])
        .split(area);

    let summary = vec![
        field("Malicious IPs", format_number(intel.malicious_ips_count), app),
        field("Signatures", format_number(intel.attack_signatures_count), app),
        field(
            "Malicious UAs",
            format_number(intel.malicious_user_agents.len() as u64),
            app,
        ),
    ];
    let title = if intel.date.is_empty() {
        "Threat Intel".to_string()
    } else {
        format!("Threat Intel · {}", intel.date)
    };
    f.render_widget(Paragraph::new(summary).block(panel(title, app)), rows[0]);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[1]);

    let ips: Vec<ListItem> = intel
        .malicious_ips
        .iter()
        .map(|ip| {
            let color = if is_private_ip(ip) {
                app.theme.private_ip
            } else {
                app.theme.public_ip
            };
            ListItem::new(Span::styled(format!(" {}", ip), Style::default().fg(color)))
        })
        .collect();
    f.render_widget(
        List::new(empty_hint(ips, app)).block(panel("Malicious IPs (y to copy)", app)),
        top[0],
    );

    let width = top[1].width.saturating_sub(4) as usize;
    let signatures: Vec<ListItem> = intel
        .attack_signatures
        .iter()
        .map(|sig| ListItem::new(format!(" {}", truncate(sig, width))))
        .collect();
    f.render_widget(
        List::new(empty_hint(signatures, app)).block(panel("Attack signatures", app)),
        top[1],
    );

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[2]);

    let ua_width = bottom[0].width.saturating_sub(4) as usize;
    let agents: Vec<ListItem> = intel
        .malicious_user_agents
        .iter()
        .map(|ua| ListItem::new(format!(" {}", truncate(ua, ua_width))))
        .collect();
    f.render_widget(
        List::new(empty_hint(agents, app)).block(panel("Malicious user agents", app)),
        bottom[0],
    );

    let payload_width = bottom[1].width.saturating_sub(4) as usize;
    let payloads: Vec<ListItem> = intel
        .sample_payloads
        .iter()
        .map(|p| payload_item(p, payload_width, app))
        .collect();
    f.render_widget(
        List::new(empty_hint(payloads, app)).block(panel("Sample payloads", app)),
        bottom[1],
    );
}

fn empty_hint<'a>(items: Vec<ListItem<'a>>, app: &App) -> Vec<ListItem<'a>> {
    if items.is_empty() {
        vec![ListItem::new(Span::styled(
            " none",
            Style::default().fg(app.theme.muted),
        ))]
    } else {
        items
    }
}

fn payload_item<'a>(payload: &Value, width: usize, app: &App) -> ListItem<'a> {
    let (method, path, kind, patterns) = payload_parts(payload);
    let mut spans = vec![
        Span::styled(
            format!(" {:<6} ", method),
            Style::default()
                .fg(app.theme.key)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(truncate(&path, width.saturating_sub(24))),
    ];
    if !kind.is_empty() {
        spans.push(Span::styled(
            format!("  [{}]", kind),
            Style::default().fg(app.theme.highlight),
        ));
    }
    if !patterns.is_empty() {
        spans.push(Span::styled(
            format!("  {}", patterns),
            Style::default().fg(app.theme.muted),
        ));
    }
    ListItem::new(Line::from(spans))
}

/// Method, path, attack type and matched patterns of a payload sample
///
/// Samples are objects with those keys; anything else is shown as compact
/// JSON in the path slot.
fn payload_parts(payload: &Value) -> (String, String, String, String) {
    let text = |key: &str| {
        payload
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    match payload {
        Value::Object(_) => {
            let patterns = match payload.get("patterns") {
                Some(Value::Array(items)) => items
                    .iter()
                    .map(|p| p.as_str().map(str::to_string).unwrap_or_else(|| p.to_string()))
                    .collect::<Vec<_>>()
                    .join(", "),
                _ => String::new(),
            };
            (text("method"), text("path"), text("attack_type"), patterns)
        }
        Value::String(s) => (String::new(), s.clone(), String::new(), String::new()),
        other => (String::new(), other.to_string(), String::new(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_parts_from_object() {
        let sample = json!({
            "path": "/login.php",
            "method": "POST",
            "attack_type": "sql_injection",
            "patterns": ["' OR 1=1", "UNION SELECT"]
        });
        assert_eq!(
            payload_parts(&sample),
            (
                "POST".to_string(),
                "/login.php".to_string(),
                "sql_injection".to_string(),
                "' OR 1=1, UNION SELECT".to_string()
            )
        );
    }

    #[test]
    fn test_payload_parts_tolerates_other_shapes() {
        let (method, path, _, _) = payload_parts(&json!("/etc/passwd"));
        assert_eq!(method, "");
        assert_eq!(path, "/etc/passwd");

        let (_, path, kind, patterns) = payload_parts(&json!({"path": null}));
        assert_eq!(path, "");
        assert_eq!(kind, "");
        assert_eq!(patterns, "");
    }
}
