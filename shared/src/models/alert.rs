//! Alert Model

use serde::{Deserialize, Serialize};

/// Alert classification
///
/// Serialized with the operator-facing display strings so the stored
/// records read well in the dashboard without a mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertType {
    #[serde(rename = "Unknown NFC")]
    UnknownNfc,
    #[serde(rename = "Multiple Failed Attempts")]
    MultipleFailedAttempts,
    #[serde(rename = "No Active Membership")]
    NoActiveMembership,
    #[serde(rename = "Membership Expired")]
    MembershipExpired,
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertType::UnknownNfc => write!(f, "Unknown NFC"),
            AlertType::MultipleFailedAttempts => write!(f, "Multiple Failed Attempts"),
            AlertType::NoActiveMembership => write!(f, "No Active Membership"),
            AlertType::MembershipExpired => write!(f, "Membership Expired"),
        }
    }
}

/// Immutable operator alert (append-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub name: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub location: String,
    pub timestamp: i64,
}
