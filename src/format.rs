// Display formatters
//
// Leaf helpers shared by the views: colours for risk and threat level,
// timestamp and byte formatting, and a few string utilities.

use crate::api::models::ThreatLevel;
use chrono::{DateTime, NaiveDateTime};
use ratatui::style::Color;
use std::net::IpAddr;
use unicode_width::UnicodeWidthChar;

/// Colour band for a 0-100 risk score
pub fn risk_color(score: u8) -> Color {
    match score {
        90..=u8::MAX => Color::Red,
        70..=89 => Color::LightRed,
        40..=69 => Color::Yellow,
        20..=39 => Color::Green,
        _ => Color::Gray,
    }
}

/// Label and colour for a threat/alert level string
///
/// Unknown or missing levels render as INFO.
pub fn threat_badge(level: &str) -> (&'static str, Color) {
    let level = ThreatLevel::parse(level).unwrap_or(ThreatLevel::Info);
    (level.as_str(), threat_color(level))
}

pub fn threat_color(level: ThreatLevel) -> Color {
    match level {
        ThreatLevel::Critical => Color::Red,
        ThreatLevel::High => Color::LightRed,
        ThreatLevel::Medium => Color::Yellow,
        ThreatLevel::Low => Color::Green,
        ThreatLevel::Info => Color::Gray,
    }
}

/// Format an ISO timestamp as `Oct 26, 2025 14:03`
///
/// Accepts RFC 3339 and the offset-less form the backend writes. Anything
/// unparseable is returned as-is.
pub fn format_timestamp(timestamp: &str) -> String {
    const OUT: &str = "%b %d, %Y %H:%M";

    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return dt.format(OUT).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(OUT).to_string();
    }
    timestamp.to_string()
}

/// Format a byte count with binary units, e.g. `1.5 KB`
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    // Two decimals, trailing zeros dropped
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// Format a large number with commas for readability
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();

    for (count, ch) in s.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, ch);
    }

    result
}

/// Verdict for an IP reputation score in 0.0-1.0
pub fn reputation_label(score: f64) -> (&'static str, Color) {
    if score >= 0.8 {
        ("Good", Color::Green)
    } else if score >= 0.5 {
        ("Neutral", Color::Blue)
    } else if score >= 0.3 {
        ("Suspicious", Color::Yellow)
    } else {
        ("Malicious", Color::Red)
    }
}

/// True for RFC 1918 ranges, loopback and `localhost`
pub fn is_private_ip(ip: &str) -> bool {
    let ip = ip.trim();
    if ip.eq_ignore_ascii_case("localhost") {
        return true;
    }
    match ip.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => v4.is_private() || v4.is_loopback(),
        Ok(IpAddr::V6(v6)) => v6.is_loopback(),
        Err(_) => false,
    }
}

/// Truncate to a display width, appending `…` when cut
pub fn truncate(s: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for (i, ch) in s.char_indices() {
        let w = ch.width().unwrap_or(0);
        if width + w > max_width.saturating_sub(1) {
            let rest_width: usize = s[i..].chars().map(|c| c.width().unwrap_or(0)).sum();
            if width + rest_width <= max_width {
                out.push_str(&s[i..]);
            } else {
                out.push('…');
            }
            return out;
        }
        width += w;
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_color_bands() {
        assert_eq!(risk_color(100), Color::Red);
        assert_eq!(risk_color(90), Color::Red);
        assert_eq!(risk_color(89), Color::LightRed);
        assert_eq!(risk_color(70), Color::LightRed);
        assert_eq!(risk_color(40), Color::Yellow);
        assert_eq!(risk_color(20), Color::Green);
        assert_eq!(risk_color(19), Color::Gray);
    }

    #[test]
    fn test_unknown_badge_falls_back_to_info() {
        assert_eq!(threat_badge("critical"), ("CRITICAL", Color::Red));
        assert_eq!(threat_badge("whatever"), ("INFO", Color::Gray));
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp("2025-10-26T14:03:59.123456"),
            "Oct 26, 2025 14:03"
        );
        assert_eq!(
            format_timestamp("2025-10-26T14:03:00+00:00"),
            "Oct 26, 2025 14:03"
        );
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1024 * 1024), "1 MB");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(42), "42");
    }

    #[test]
    fn test_private_ip() {
        assert!(is_private_ip("192.168.1.5"));
        assert!(is_private_ip("10.0.0.1"));
        assert!(is_private_ip("172.20.3.4"));
        assert!(is_private_ip("127.0.0.1"));
        assert!(is_private_ip("localhost"));
        assert!(!is_private_ip("172.32.0.1"));
        assert!(!is_private_ip("203.0.113.9"));
        assert!(!is_private_ip(""));
    }

    #[test]
    fn test_reputation_bands() {
        assert_eq!(reputation_label(0.9).0, "Good");
        assert_eq!(reputation_label(0.5).0, "Neutral");
        assert_eq!(reputation_label(0.3).0, "Suspicious");
        assert_eq!(reputation_label(0.1).0, "Malicious");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("Mozilla/5.0 (X11)", 8), "Mozilla…");
    }
}
