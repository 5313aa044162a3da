//! Access Log Model

use serde::{Deserialize, Serialize};

/// Outcome of a token presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessStatus {
    Granted,
    Denied,
}

/// Why a presentation was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    UnknownToken,
    NoActiveMembership,
    ExpiredMembership,
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenyReason::UnknownToken => write!(f, "unknown_token"),
            DenyReason::NoActiveMembership => write!(f, "no_active_membership"),
            DenyReason::ExpiredMembership => write!(f, "expired_membership"),
        }
    }
}

/// Immutable audit record, one per decision (append-only)
///
/// `member_id` is None when the token could not be resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessLogEntry {
    #[serde(default)]
    pub member_id: Option<String>,
    pub name: String,
    pub token: String,
    pub timestamp: i64,
    pub status: AccessStatus,
    #[serde(default)]
    pub reason: Option<DenyReason>,
    pub device_type: String,
}
