// Payload types for the honeypot query API
//
// Every endpoint returns JSON; these types mirror what the backend sends.
// Fields the dashboard can live without are `#[serde(default)]` so a sparse
// payload renders a "no data" placeholder instead of failing to decode.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Ordinal severity tag shared by threat level and alert level
///
/// Ordering follows severity: `Info < Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThreatLevel {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl ThreatLevel {
    pub const ALL: [ThreatLevel; 5] = [
        ThreatLevel::Critical,
        ThreatLevel::High,
        ThreatLevel::Medium,
        ThreatLevel::Low,
        ThreatLevel::Info,
    ];

    /// Wire representation (`CRITICAL`, `HIGH`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Info => "INFO",
        }
    }

    /// Case-insensitive parse; unknown strings yield `None`
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attack categories the session filter offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackType {
    Sqli,
    Xss,
    CmdExec,
    Lfi,
    Rfi,
}

impl AttackType {
    pub const ALL: [AttackType; 5] = [
        AttackType::Sqli,
        AttackType::Xss,
        AttackType::CmdExec,
        AttackType::Lfi,
        AttackType::Rfi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqli => "sqli",
            Self::Xss => "xss",
            Self::CmdExec => "cmd_exec",
            Self::Lfi => "lfi",
            Self::Rfi => "rfi",
        }
    }

    /// Human label for the filter form
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sqli => "SQL injection",
            Self::Xss => "XSS",
            Self::CmdExec => "Command execution",
            Self::Lfi => "Local file inclusion",
            Self::Rfi => "Remote file inclusion",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for AttackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sessions
// ─────────────────────────────────────────────────────────────────────────────

/// One row of the session list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub sess_uuid: String,
    pub peer_ip: String,
    #[serde(default)]
    pub peer_port: u16,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub attack_types: Vec<String>,
    #[serde(default)]
    pub risk_score: u8,
    #[serde(default)]
    pub threat_level: String,
    #[serde(default)]
    pub alert_level: String,
    #[serde(default)]
    pub processed_at: String,
    #[serde(default)]
    pub total_requests: u64,
    #[serde(default)]
    pub has_malicious_activity: bool,
    #[serde(default)]
    pub is_scanner: Option<bool>,
    #[serde(default)]
    pub tool_identified: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionListResponse {
    #[serde(default)]
    pub sessions: Vec<SessionSummary>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub has_more: bool,
}

/// Full session detail shown in the modal
///
/// The backend sends many nested analysis blocks; the ones the dashboard
/// renders are typed, everything else lands in `extra` and is kept for the
/// raw JSON view and clipboard copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionDetail {
    pub sess_uuid: String,
    #[serde(default)]
    pub peer_ip: String,
    #[serde(default)]
    pub peer_port: u16,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub processed_at: Option<String>,
    #[serde(default)]
    pub total_requests: u64,
    #[serde(default)]
    pub attack_types: Vec<String>,
    #[serde(default)]
    pub risk_score: u8,
    #[serde(default)]
    pub threat_level: String,
    #[serde(default)]
    pub alert_level: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub has_malicious_activity: bool,
    #[serde(default)]
    pub requires_review: bool,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub location: Option<serde_json::Value>,
    #[serde(default)]
    pub ip_reputation: Option<serde_json::Value>,
    #[serde(default)]
    pub paths: Vec<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SessionDetail {
    /// Placeholder shown while the full detail is loading
    pub fn stub(sess_uuid: impl Into<String>) -> Self {
        Self {
            sess_uuid: sess_uuid.into(),
            ..Default::default()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Alerts
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertSummary {
    pub sess_uuid: String,
    pub peer_ip: String,
    #[serde(default)]
    pub alert_level: String,
    #[serde(default)]
    pub threat_level: String,
    #[serde(default)]
    pub risk_score: u8,
    #[serde(default)]
    pub attack_types: Vec<String>,
    #[serde(default)]
    pub tool_identified: Option<String>,
    #[serde(default)]
    pub processed_at: String,
    #[serde(default)]
    pub recommendations_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertListResponse {
    #[serde(default)]
    pub alerts: Vec<AlertSummary>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub has_more: bool,
}

impl AlertListResponse {
    /// Number of alerts on this page at the given level
    pub fn count_at(&self, level: ThreatLevel) -> usize {
        self.alerts
            .iter()
            .filter(|a| ThreatLevel::parse(&a.alert_level) == Some(level))
            .count()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Statistics
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResponse {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub total_sessions: u64,
    #[serde(default)]
    pub threat_level_distribution: BTreeMap<String, u64>,
    #[serde(default)]
    pub risk_score_distribution: BTreeMap<String, u64>,
    #[serde(default)]
    pub attack_type_distribution: BTreeMap<String, u64>,
    #[serde(default)]
    pub top_source_ips: BTreeMap<String, u64>,
    #[serde(default)]
    pub top_user_agents: BTreeMap<String, u64>,
    #[serde(default)]
    pub alert_counts: BTreeMap<String, u64>,
    #[serde(default)]
    pub average_risk_score: f64,
    #[serde(default)]
    pub requires_review_count: u64,
}

/// Sort a count map descending by count and keep the first `n` entries
///
/// Ties are broken by key so the output is stable between renders.
pub fn top_n(counts: &BTreeMap<String, u64>, n: usize) -> Vec<(&str, u64)> {
    let mut entries: Vec<(&str, u64)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries.truncate(n);
    entries
}

// ─────────────────────────────────────────────────────────────────────────────
// Dashboard
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodaySummary {
    #[serde(default)]
    pub total_sessions: u64,
    #[serde(default)]
    pub high_risk_count: u64,
    #[serde(default)]
    pub critical_alerts: u64,
    #[serde(default)]
    pub average_risk: f64,
    #[serde(default)]
    pub unique_ips: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopThreats {
    #[serde(default)]
    pub top_ips: BTreeMap<String, u64>,
    #[serde(default)]
    pub top_attacks: BTreeMap<String, u64>,
    #[serde(default)]
    pub top_tools: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    #[serde(default)]
    pub today_summary: TodaySummary,
    #[serde(default)]
    pub recent_alerts: Vec<AlertSummary>,
    #[serde(default)]
    pub hourly_trend: Vec<serde_json::Value>,
    #[serde(default)]
    pub top_threats: TopThreats,
}

impl DashboardResponse {
    /// Per-hour counts from `hourly_trend`, in delivery order
    ///
    /// Points are `{"hour": .., "count": n}` objects or bare numbers. Anything
    /// else counts as zero so one bad point does not shift the series.
    pub fn trend_counts(&self) -> Vec<u64> {
        self.hourly_trend
            .iter()
            .map(|point| match point {
                serde_json::Value::Number(n) => n.as_u64().unwrap_or(0),
                serde_json::Value::Object(fields) => fields
                    .get("count")
                    .and_then(serde_json::Value::as_u64)
                    .unwrap_or(0),
                _ => 0,
            })
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Threat intelligence
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreatIntelligenceResponse {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub malicious_ips: Vec<String>,
    #[serde(default)]
    pub malicious_ips_count: u64,
    #[serde(default)]
    pub attack_signatures: Vec<String>,
    #[serde(default)]
    pub attack_signatures_count: u64,
    #[serde(default)]
    pub malicious_user_agents: Vec<String>,
    #[serde(default)]
    pub sample_payloads: Vec<serde_json::Value>,
}

/// `GET /dates` - newest first, as delivered
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatesResponse {
    #[serde(default)]
    pub dates: Vec<String>,
}
