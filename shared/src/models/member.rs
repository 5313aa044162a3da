//! Member Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Member lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Inactive,
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberStatus::Active => write!(f, "active"),
            MemberStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// Member entity (会员)
///
/// Balance is the prepaid credit used for membership renewals and product
/// purchases; it never goes negative. `nfc_token` is the card bound through
/// the pairing flow; at most one member binds a given token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub balance: Decimal,
    pub status: MemberStatus,
    #[serde(default)]
    pub nfc_token: Option<String>,
}
