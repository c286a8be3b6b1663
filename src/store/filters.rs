//! Session list filters
//!
//! `FilterInput` is what the filter form hands over: raw strings, possibly
//! blank. `SessionFilters` is the normalised, typed form that persists in the
//! store and is merged into every sessions query until cleared.

use crate::api::models::{AttackType, ThreatLevel};
use crate::api::query::{SessionQuery, SortSpec};
use std::fmt;

/// Persisted session filters; `None` means "no filter"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionFilters {
    pub threat_level: Option<ThreatLevel>,
    pub attack_type: Option<AttackType>,
    pub min_risk: Option<u8>,
    pub peer_ip: Option<String>,
    pub sess_uuid: Option<String>,
    pub requires_review: Option<bool>,
    pub sort: SortSpec,
}

impl SessionFilters {
    /// Defaults plus the server-side "requires review" flag
    pub fn requires_review() -> Self {
        Self {
            requires_review: Some(true),
            ..Self::default()
        }
    }

    /// True if anything beyond the sort order is set
    pub fn is_filtered(&self) -> bool {
        self.threat_level.is_some()
            || self.attack_type.is_some()
            || self.min_risk.is_some()
            || self.peer_ip.is_some()
            || self.sess_uuid.is_some()
            || self.requires_review.is_some()
    }

    /// Copy the set filters and the sort order into a query
    pub fn apply_to(&self, query: &mut SessionQuery) {
        query.threat_level = self.threat_level;
        query.attack_type = self.attack_type;
        query.min_risk = self.min_risk;
        query.peer_ip = self.peer_ip.clone();
        query.sess_uuid = self.sess_uuid.clone();
        query.requires_review = self.requires_review;
        query.sort_by = Some(self.sort.key);
        query.order = Some(self.sort.order);
    }
}

impl fmt::Display for SessionFilters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(level) = self.threat_level {
            parts.push(format!("level={}", level));
        }
        if let Some(kind) = self.attack_type {
            parts.push(format!("attack={}", kind));
        }
        if let Some(min) = self.min_risk {
            parts.push(format!("risk>={}", min));
        }
        if let Some(ip) = &self.peer_ip {
            parts.push(format!("ip~{}", ip));
        }
        if let Some(uuid) = &self.sess_uuid {
            parts.push(format!("uuid~{}", uuid));
        }
        if self.requires_review == Some(true) {
            parts.push("requires review".to_string());
        }
        parts.push(format!("sort: {}", self.sort.label()));
        f.write_str(&parts.join("  "))
    }
}

/// Raw filter form values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterInput {
    pub threat_level: String,
    pub attack_type: String,
    pub min_risk: String,
    pub peer_ip: String,
    pub sess_uuid: String,
    /// Combined sort token, e.g. `risk_score_desc`
    pub sort: String,
}

impl FilterInput {
    /// Pre-fill the form from persisted filters
    pub fn from_filters(filters: &SessionFilters) -> Self {
        Self {
            threat_level: filters
                .threat_level
                .map(|l| l.as_str().to_string())
                .unwrap_or_default(),
            attack_type: filters
                .attack_type
                .map(|a| a.as_str().to_string())
                .unwrap_or_default(),
            min_risk: filters.min_risk.map(|m| m.to_string()).unwrap_or_default(),
            peer_ip: filters.peer_ip.clone().unwrap_or_default(),
            sess_uuid: filters.sess_uuid.clone().unwrap_or_default(),
            sort: filters.sort.token(),
        }
    }

    /// Validate and convert to typed filters
    ///
    /// Blank fields become `None`; a blank sort token falls back to the
    /// default `risk_score desc`.
    pub fn normalize(&self) -> Result<SessionFilters, FilterError> {
        let threat_level = match non_blank(&self.threat_level) {
            Some(raw) => Some(
                ThreatLevel::parse(raw).ok_or_else(|| FilterError::ThreatLevel(raw.to_string()))?,
            ),
            None => None,
        };

        let attack_type = match non_blank(&self.attack_type) {
            Some(raw) => Some(
                AttackType::parse(raw).ok_or_else(|| FilterError::AttackType(raw.to_string()))?,
            ),
            None => None,
        };

        let min_risk = match non_blank(&self.min_risk) {
            Some(raw) => {
                let value: u8 = raw
                    .parse()
                    .map_err(|_| FilterError::MinRisk(raw.to_string()))?;
                if value > 100 {
                    return Err(FilterError::MinRisk(raw.to_string()));
                }
                Some(value)
            }
            None => None,
        };

        let sort = match non_blank(&self.sort) {
            Some(raw) => SortSpec::from_token(raw).ok_or_else(|| FilterError::Sort(raw.to_string()))?,
            None => SortSpec::default(),
        };

        Ok(SessionFilters {
            threat_level,
            attack_type,
            min_risk,
            peer_ip: non_blank(&self.peer_ip).map(str::to_string),
            sess_uuid: non_blank(&self.sess_uuid).map(str::to_string),
            requires_review: None,
            sort,
        })
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Rejected filter form input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    ThreatLevel(String),
    AttackType(String),
    MinRisk(String),
    Sort(String),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThreatLevel(v) => write!(f, "Unknown threat level '{}'", v),
            Self::AttackType(v) => write!(f, "Unknown attack type '{}'", v),
            Self::MinRisk(v) => write!(f, "Minimum risk must be 0-100, got '{}'", v),
            Self::Sort(v) => write!(f, "Unknown sort order '{}'", v),
        }
    }
}

impl std::error::Error for FilterError {}
