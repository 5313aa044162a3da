//! Pairing Code Model

use serde::{Deserialize, Serialize};

/// Pairing code lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairingStatus {
    Waiting,
    Used,
}

/// TTL-gated one-time code binding an NFC token to a member
///
/// The record is keyed by the code itself. The store adapter has no delete
/// operation, so redeemed codes transition to `Used` instead of being
/// removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairingCode {
    pub member_id: String,
    pub created_at: i64,
    pub status: PairingStatus,
}
