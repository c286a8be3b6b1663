// Outbound query parameters
//
// Each struct serialises straight into the URL query string. Optional fields
// are skipped when `None`, so an unset filter never reaches the backend as an
// empty string.

use super::models::{AttackType, ThreatLevel};
use serde::Serialize;
use std::fmt;

/// Column the session list is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    RiskScore,
    ProcessedAt,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RiskScore => "risk_score",
            Self::ProcessedAt => "processed_at",
        }
    }

    /// Accepts the wire name and the short form used by older sort tokens
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "risk_score" | "risk" => Some(Self::RiskScore),
            "processed_at" | "processed" => Some(Self::ProcessedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Sort column plus direction, encoded in the UI as one token
/// (`risk_score_desc`, `processed_at_asc`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortSpec {
    pub const CHOICES: [SortSpec; 4] = [
        SortSpec::new(SortKey::RiskScore, SortOrder::Desc),
        SortSpec::new(SortKey::RiskScore, SortOrder::Asc),
        SortSpec::new(SortKey::ProcessedAt, SortOrder::Desc),
        SortSpec::new(SortKey::ProcessedAt, SortOrder::Asc),
    ];

    pub const fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    /// Encode as `<key>_<order>`
    pub fn token(&self) -> String {
        format!("{}_{}", self.key.as_str(), self.order.as_str())
    }

    /// Decode a `<key>_<order>` token
    ///
    /// The key itself contains underscores, so the split happens on the last
    /// one. Returns `None` for anything that isn't a known key and order.
    pub fn from_token(token: &str) -> Option<Self> {
        let (key, order) = token.trim().rsplit_once('_')?;
        Some(Self {
            key: SortKey::parse(key)?,
            order: SortOrder::parse(order)?,
        })
    }

    pub fn label(&self) -> &'static str {
        match (self.key, self.order) {
            (SortKey::RiskScore, SortOrder::Desc) => "Risk: high to low",
            (SortKey::RiskScore, SortOrder::Asc) => "Risk: low to high",
            (SortKey::ProcessedAt, SortOrder::Desc) => "Time: newest first",
            (SortKey::ProcessedAt, SortOrder::Asc) => "Time: oldest first",
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key.as_str(), self.order.as_str())
    }
}

/// `GET /sessions`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub limit: u32,
    pub offset: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threat_level: Option<ThreatLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack_type: Option<AttackType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_risk: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sess_uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_review: Option<bool>,
}

/// `GET /alerts`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

/// `GET /statistics`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatisticsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub days: u32,
}

/// `GET /dashboard` and `GET /threat-intelligence`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DateQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}
