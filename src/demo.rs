// Demo mode: a mock honeypot query API to showcase the dashboard
//
// Serves deterministic canned data for every endpoint the dashboard uses,
// including filtering, sorting and pagination on /sessions, so the TUI can be
// explored without a real backend. The same router backs the client tests.
//
// Run with: honeyscope --demo (or honeyscope serve-demo for the backend alone)

use crate::api::models::{
    AlertListResponse, AlertSummary, DashboardResponse, DatesResponse, SessionDetail,
    SessionListResponse, SessionSummary, StatisticsResponse, ThreatIntelligenceResponse,
    ThreatLevel, TodaySummary, TopThreats,
};
use anyhow::Context;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::net::SocketAddr;

/// Sessions generated per day
const SESSIONS_PER_DAY: usize = 137;

/// Days of history the demo advertises via /dates
const DEMO_DAYS: i64 = 10;

const ATTACKS: [&str; 5] = ["sqli", "xss", "cmd_exec", "lfi", "rfi"];

const USER_AGENTS: [&str; 6] = [
    "sqlmap/1.7.2#stable (https://sqlmap.org)",
    "Mozilla/5.0 (compatible; Nmap Scripting Engine)",
    "curl/7.68.0",
    "python-requests/2.31.0",
    "Nikto/2.5.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64)",
];

const TOOLS: [Option<&str>; 6] = [
    Some("sqlmap"),
    Some("nmap"),
    None,
    None,
    Some("nikto"),
    None,
];

/// Build the demo router, mounted under `/api` like the real backend
pub fn router() -> Router {
    Router::new()
        .route("/api/dashboard", get(dashboard))
        .route("/api/sessions", get(sessions))
        .route("/api/sessions/:uuid", get(session_detail))
        .route("/api/alerts", get(alerts))
        .route("/api/statistics", get(statistics))
        .route("/api/threat-intelligence", get(threat_intelligence))
        .route("/api/dates", get(dates))
}

/// Serve the demo backend in the foreground
pub async fn serve(addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind demo backend to {}", addr))?;
    tracing::info!("Demo backend listening on http://{}/api", addr);
    axum::serve(listener, router()).await?;
    Ok(())
}

/// Bind now and serve on a background task
///
/// Binding before returning means the dashboard's first request cannot race
/// the listener.
pub async fn spawn(addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind demo backend to {}", addr))?;
    tracing::info!("Demo backend listening on http://{}/api", addr);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router()).await {
            tracing::error!("Demo backend stopped: {}", e);
        }
    });
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Deterministic data generation
// ─────────────────────────────────────────────────────────────────────────────

/// Small LCG so the same (date, index) always yields the same session
fn mix(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
        .rotate_left(17)
}

fn date_seed(date: &str) -> u64 {
    date.bytes()
        .fold(0xcbf29ce484222325, |acc, b| (acc ^ b as u64).wrapping_mul(0x100000001b3))
}

fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

fn level_for(score: u8) -> ThreatLevel {
    match score {
        90.. => ThreatLevel::Critical,
        70..=89 => ThreatLevel::High,
        40..=69 => ThreatLevel::Medium,
        20..=39 => ThreatLevel::Low,
        _ => ThreatLevel::Info,
    }
}

fn generate_session(date: &str, index: usize) -> SessionSummary {
    let r = mix(date_seed(date) ^ index as u64);
    let risk_score = (r % 101) as u8;
    let level = level_for(risk_score);
    let attack_count = (r >> 8) as usize % 3;
    let attack_types = (0..attack_count)
        .map(|i| ATTACKS[((r >> (12 + i * 3)) as usize + i) % ATTACKS.len()].to_string())
        .collect();
    let ua = (r >> 20) as usize % USER_AGENTS.len();
    let octets = [(r >> 24) as u8, (r >> 32) as u8, (r >> 40) as u8];
    // Spread across the day with a little jitter
    let minute = (index * 24 * 60 / SESSIONS_PER_DAY + (r >> 56) as usize % 10) % (24 * 60);

    SessionSummary {
        sess_uuid: format!("{:016x}-{:04x}", r, index),
        peer_ip: format!("{}.{}.{}.{}", 45 + octets[0] % 150, octets[1], octets[2], index % 254 + 1),
        peer_port: 1024 + (r % 60000) as u16,
        user_agent: USER_AGENTS[ua].to_string(),
        attack_types,
        risk_score,
        threat_level: level.as_str().to_string(),
        alert_level: level.as_str().to_string(),
        processed_at: format!("{}T{:02}:{:02}:00Z", date, minute / 60, minute % 60),
        total_requests: 1 + (r >> 48) % 400,
        has_malicious_activity: risk_score >= 40,
        is_scanner: Some(TOOLS[ua].is_some()),
        tool_identified: TOOLS[ua].map(str::to_string),
    }
}

fn sessions_for(date: &str) -> Vec<SessionSummary> {
    (0..SESSIONS_PER_DAY)
        .map(|i| generate_session(date, i))
        .collect()
}

fn requires_review(session: &SessionSummary) -> bool {
    session.risk_score >= 60 && session.tool_identified.is_none()
}

fn to_alert(s: &SessionSummary) -> AlertSummary {
    AlertSummary {
        sess_uuid: s.sess_uuid.clone(),
        peer_ip: s.peer_ip.clone(),
        alert_level: s.alert_level.clone(),
        threat_level: s.threat_level.clone(),
        risk_score: s.risk_score,
        attack_types: s.attack_types.clone(),
        tool_identified: s.tool_identified.clone(),
        processed_at: s.processed_at.clone(),
        recommendations_count: (s.risk_score / 25) as u32,
    }
}

/// Sessions per hour of the day, as `{"hour": "HH:00", "count": n}` points
fn hourly_trend(rows: &[SessionSummary]) -> Vec<serde_json::Value> {
    let mut buckets = [0u64; 24];
    for row in rows {
        // processed_at is RFC 3339, so the hour sits at bytes 11..13
        let hour = row.processed_at.get(11..13).and_then(|h| h.parse::<usize>().ok());
        if let Some(slot) = hour.and_then(|h| buckets.get_mut(h)) {
            *slot += 1;
        }
    }
    buckets
        .iter()
        .enumerate()
        .map(|(hour, count)| json!({"hour": format!("{:02}:00", hour), "count": count}))
        .collect()
}

fn count_by<'a>(items: impl Iterator<Item = &'a str>) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(item.to_string()).or_insert(0) += 1;
    }
    counts
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct DateParams {
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionParams {
    date: Option<String>,
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default)]
    offset: usize,
    threat_level: Option<String>,
    attack_type: Option<String>,
    min_risk: Option<u8>,
    peer_ip: Option<String>,
    sess_uuid: Option<String>,
    sort_by: Option<String>,
    order: Option<String>,
    requires_review: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct PageParams {
    date: Option<String>,
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default)]
    offset: usize,
}

#[derive(Debug, Deserialize)]
struct StatisticsParams {
    date: Option<String>,
    #[serde(default = "default_days")]
    days: i64,
}

fn default_limit() -> usize {
    50
}

fn default_days() -> i64 {
    1
}

async fn dates() -> Json<DatesResponse> {
    let now = Utc::now().date_naive();
    let dates = (0..DEMO_DAYS)
        .map(|d| (now - Duration::days(d)).format("%Y-%m-%d").to_string())
        .collect();
    Json(DatesResponse { dates })
}

async fn sessions(Query(params): Query<SessionParams>) -> Json<SessionListResponse> {
    let date = params.date.unwrap_or_else(today);
    let mut rows: Vec<SessionSummary> = sessions_for(&date)
        .into_iter()
        .filter(|s| {
            params
                .threat_level
                .as_deref()
                .is_none_or(|t| s.threat_level.eq_ignore_ascii_case(t))
        })
        .filter(|s| {
            params
                .attack_type
                .as_deref()
                .is_none_or(|a| s.attack_types.iter().any(|t| t == a))
        })
        .filter(|s| params.min_risk.is_none_or(|m| s.risk_score >= m))
        .filter(|s| {
            params
                .peer_ip
                .as_deref()
                .is_none_or(|ip| s.peer_ip.contains(ip))
        })
        .filter(|s| {
            params
                .sess_uuid
                .as_deref()
                .is_none_or(|u| s.sess_uuid.contains(u))
        })
        .filter(|s| params.requires_review.is_none_or(|r| requires_review(s) == r))
        .collect();

    match params.sort_by.as_deref() {
        Some("risk_score") => rows.sort_by_key(|s| s.risk_score),
        _ => rows.sort_by(|a, b| a.processed_at.cmp(&b.processed_at)),
    }
    if params.order.as_deref() != Some("asc") {
        rows.reverse();
    }

    let total = rows.len();
    let page: Vec<SessionSummary> = rows
        .into_iter()
        .skip(params.offset)
        .take(params.limit)
        .collect();

    Json(SessionListResponse {
        has_more: params.offset + page.len() < total,
        sessions: page,
        total: total as u64,
        limit: params.limit as u32,
        offset: params.offset as u32,
    })
}

async fn session_detail(Path(uuid): Path<String>) -> Result<Json<SessionDetail>, StatusCode> {
    let now = Utc::now().date_naive();
    let found = (0..DEMO_DAYS)
        .map(|d| (now - Duration::days(d)).format("%Y-%m-%d").to_string())
        .flat_map(|date| sessions_for(&date))
        .find(|s| s.sess_uuid == uuid)
        .ok_or(StatusCode::NOT_FOUND)?;

    let mut extra = serde_json::Map::new();
    extra.insert("behavior_tags".into(), json!(["automated", "reconnaissance"]));
    extra.insert("confidence_score".into(), json!(0.87));
    extra.insert("is_scanner".into(), json!(found.is_scanner));
    extra.insert("tool_identified".into(), json!(found.tool_identified));

    let detail = SessionDetail {
        sess_uuid: found.sess_uuid.clone(),
        peer_ip: found.peer_ip.clone(),
        peer_port: found.peer_port,
        user_agent: found.user_agent.clone(),
        start_time: Some(found.processed_at.clone()),
        end_time: None,
        processed_at: Some(found.processed_at.clone()),
        total_requests: found.total_requests,
        attack_types: found.attack_types.clone(),
        risk_score: found.risk_score,
        threat_level: found.threat_level.clone(),
        alert_level: found.alert_level.clone(),
        priority: Some(if found.risk_score >= 70 { "P1" } else { "P3" }.to_string()),
        has_malicious_activity: found.has_malicious_activity,
        requires_review: requires_review(&found),
        recommendations: vec![
            format!("Block {} at the perimeter firewall", found.peer_ip),
            "Review web server logs for the same time window".to_string(),
        ],
        location: Some(json!({"country": "Unknown", "city": null})),
        ip_reputation: Some(json!({"score": 0.2, "source": "demo"})),
        paths: vec![
            json!({"path": "/login.php", "method": "POST", "status": 200}),
            json!({"path": "/index.php?id=1' OR '1'='1", "method": "GET", "status": 500}),
        ],
        extra,
    };
    Ok(Json(detail))
}

async fn alerts(Query(params): Query<PageParams>) -> Json<AlertListResponse> {
    let date = params.date.unwrap_or_else(today);
    let mut flagged: Vec<SessionSummary> = sessions_for(&date)
        .into_iter()
        .filter(|s| level_for(s.risk_score) >= ThreatLevel::High)
        .collect();
    flagged.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));

    let total = flagged.len();
    let page: Vec<AlertSummary> = flagged
        .iter()
        .skip(params.offset)
        .take(params.limit)
        .map(to_alert)
        .collect();

    Json(AlertListResponse {
        has_more: params.offset + page.len() < total,
        alerts: page,
        total: total as u64,
        limit: params.limit as u32,
        offset: params.offset as u32,
    })
}

async fn statistics(Query(params): Query<StatisticsParams>) -> Json<StatisticsResponse> {
    let date = params.date.unwrap_or_else(today);
    let anchor = chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .unwrap_or_else(|_| Utc::now().date_naive());
    let rows: Vec<SessionSummary> = (0..params.days.clamp(1, 30))
        .map(|d| (anchor - Duration::days(d)).format("%Y-%m-%d").to_string())
        .flat_map(|day| sessions_for(&day))
        .collect();

    let buckets = rows.iter().map(|s| match s.risk_score {
        90.. => "critical",
        70..=89 => "high",
        40..=69 => "medium",
        20..=39 => "low",
        _ => "info",
    });
    let total_risk: u64 = rows.iter().map(|s| s.risk_score as u64).sum();

    Json(StatisticsResponse {
        date,
        total_sessions: rows.len() as u64,
        threat_level_distribution: count_by(rows.iter().map(|s| s.threat_level.as_str())),
        risk_score_distribution: count_by(buckets),
        attack_type_distribution: count_by(
            rows.iter()
                .flat_map(|s| s.attack_types.iter().map(String::as_str)),
        ),
        top_source_ips: count_by(rows.iter().map(|s| s.peer_ip.as_str())),
        top_user_agents: count_by(rows.iter().map(|s| s.user_agent.as_str())),
        alert_counts: count_by(rows.iter().map(|s| s.alert_level.as_str())),
        average_risk_score: if rows.is_empty() {
            0.0
        } else {
            total_risk as f64 / rows.len() as f64
        },
        requires_review_count: rows.iter().filter(|s| requires_review(s)).count() as u64,
    })
}

async fn dashboard(Query(params): Query<DateParams>) -> Json<DashboardResponse> {
    let date = params.date.unwrap_or_else(today);
    let rows = sessions_for(&date);

    let mut recent: Vec<&SessionSummary> = rows
        .iter()
        .filter(|s| s.risk_score >= 70)
        .collect();
    recent.sort_by(|a, b| b.processed_at.cmp(&a.processed_at));

    let unique_ips = count_by(rows.iter().map(|s| s.peer_ip.as_str())).len() as u64;
    let total_risk: u64 = rows.iter().map(|s| s.risk_score as u64).sum();

    Json(DashboardResponse {
        today_summary: TodaySummary {
            total_sessions: rows.len() as u64,
            high_risk_count: rows.iter().filter(|s| s.risk_score >= 70).count() as u64,
            critical_alerts: rows.iter().filter(|s| s.risk_score >= 90).count() as u64,
            average_risk: total_risk as f64 / rows.len().max(1) as f64,
            unique_ips,
        },
        recent_alerts: recent.into_iter().take(10).map(to_alert).collect(),
        hourly_trend: hourly_trend(&rows),
        top_threats: TopThreats {
            top_ips: count_by(rows.iter().map(|s| s.peer_ip.as_str())),
            top_attacks: count_by(
                rows.iter()
                    .flat_map(|s| s.attack_types.iter().map(String::as_str)),
            ),
            top_tools: count_by(rows.iter().filter_map(|s| s.tool_identified.as_deref())),
        },
    })
}

async fn threat_intelligence(
    Query(params): Query<DateParams>,
) -> Json<ThreatIntelligenceResponse> {
    let date = params.date.unwrap_or_else(today);
    let rows = sessions_for(&date);

    let malicious: Vec<&SessionSummary> =
        rows.iter().filter(|s| s.has_malicious_activity).collect();
    let malicious_ips: Vec<String> =
        count_by(malicious.iter().map(|s| s.peer_ip.as_str())).into_keys().collect();
    let signatures: Vec<String> = malicious
        .iter()
        .filter(|s| !s.attack_types.is_empty())
        .map(|s| s.attack_types.join("-"))
        .collect();
    let attack_signatures: Vec<String> = count_by(signatures.iter().map(String::as_str))
        .into_keys()
        .collect();
    let malicious_user_agents: Vec<String> =
        count_by(malicious.iter().map(|s| s.user_agent.as_str())).into_keys().collect();

    Json(ThreatIntelligenceResponse {
        date,
        malicious_ips_count: malicious_ips.len() as u64,
        malicious_ips,
        attack_signatures_count: attack_signatures.len() as u64,
        attack_signatures,
        malicious_user_agents,
        sample_payloads: vec![
            json!({"type": "sqli", "payload": "' OR '1'='1' --"}),
            json!({"type": "xss", "payload": "<script>alert(1)</script>"}),
            json!({"type": "cmd_exec", "payload": "; cat /etc/passwd"}),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(
            generate_session("2025-10-26", 7),
            generate_session("2025-10-26", 7)
        );
        assert_ne!(
            generate_session("2025-10-26", 7).sess_uuid,
            generate_session("2025-10-25", 7).sess_uuid
        );
    }

    #[test]
    fn test_level_matches_score_band() {
        for i in 0..SESSIONS_PER_DAY {
            let s = generate_session("2025-10-26", i);
            assert_eq!(s.threat_level, level_for(s.risk_score).as_str());
            assert!(s.risk_score <= 100);
        }
    }

    #[tokio::test]
    async fn test_last_page_has_no_more() {
        let Json(page) = sessions(Query(SessionParams {
            date: Some("2025-10-26".into()),
            limit: 50,
            offset: 100,
            threat_level: None,
            attack_type: None,
            min_risk: None,
            peer_ip: None,
            sess_uuid: None,
            sort_by: None,
            order: None,
            requires_review: None,
        }))
        .await;

        assert_eq!(page.total, SESSIONS_PER_DAY as u64);
        assert_eq!(page.sessions.len(), SESSIONS_PER_DAY - 100);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn test_hourly_trend_covers_the_day() {
        let Json(data) = dashboard(Query(DateParams {
            date: Some("2025-10-26".into()),
        }))
        .await;

        let counts = data.trend_counts();
        assert_eq!(counts.len(), 24);
        assert_eq!(counts.iter().sum::<u64>(), SESSIONS_PER_DAY as u64);
        assert!(counts.iter().filter(|&&c| c > 0).count() > 12);
    }
}
