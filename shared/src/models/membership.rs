//! Membership Model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Membership status
///
/// Expiry is derived from `end_date` at decision time; this field is never
/// eagerly flipped to `Expired` by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Active,
    Expired,
    Cancelled,
}

/// Time-bounded entitlement owned by a member (会籍)
///
/// `end_date` is inclusive: the membership is valid through the entirety of
/// that calendar day in the facility timezone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub id: String,
    pub member_id: String,
    pub plan_id: String,
    pub status: MembershipStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub auto_renew: bool,
    pub price_paid: Decimal,
}

/// Fields written when creating or renewing a membership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipCreate {
    pub member_id: String,
    pub plan_id: String,
    pub status: MembershipStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub auto_renew: bool,
    pub price_paid: Decimal,
}

impl Membership {
    /// Pick the current membership out of a set of records with
    /// status=active.
    ///
    /// Zero or one is the expected cardinality; more than one is a
    /// data-integrity defect. The pick is deterministic: latest end date
    /// wins, ties broken by latest start date. Returns the winner and the
    /// number of discarded duplicates so the caller can surface the defect.
    pub fn pick_current(mut candidates: Vec<Membership>) -> (Option<Membership>, usize) {
        if candidates.len() <= 1 {
            return (candidates.pop(), 0);
        }
        let discarded = candidates.len() - 1;
        candidates.sort_by(|a, b| {
            b.end_date
                .cmp(&a.end_date)
                .then(b.start_date.cmp(&a.start_date))
        });
        (Some(candidates.remove(0)), discarded)
    }
}
