//! Access Decision Engine
//!
//! Pure grant/deny rule over a resolved identity. Unknown tokens never
//! reach this point (the resolver miss is handled by the caller), so the
//! inputs are the membership and the facility-local calendar day.

use chrono::NaiveDate;

use shared::models::{DenyReason, Membership};

/// Decide whether a resolved member gets in today.
///
/// Ok carries the membership that justified the grant. Expiry uses
/// calendar-date semantics: a membership is valid through the entirety of
/// its end date, so only `end_date < today` denies.
pub fn decide(membership: Option<&Membership>, today: NaiveDate) -> Result<&Membership, DenyReason> {
    match membership {
        None => Err(DenyReason::NoActiveMembership),
        Some(m) if m.end_date < today => Err(DenyReason::ExpiredMembership),
        Some(m) => Ok(m),
    }
}

/// Operator-facing denial message
pub fn deny_message(reason: DenyReason) -> &'static str {
    match reason {
        DenyReason::UnknownToken => "Member not found",
        DenyReason::NoActiveMembership => "No active membership",
        DenyReason::ExpiredMembership => "Membership expired",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::MembershipStatus;

    fn membership(end: NaiveDate) -> Membership {
        Membership {
            id: "ms1".to_string(),
            member_id: "m1".to_string(),
            plan_id: "p1".to_string(),
            status: MembershipStatus::Active,
            start_date: end - chrono::Duration::days(30),
            end_date: end,
            auto_renew: true,
            price_paid: Decimal::new(2500, 2),
        }
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn no_membership_denies() {
        assert_eq!(
            decide(None, day("2024-05-01")).unwrap_err(),
            DenyReason::NoActiveMembership
        );
    }

    #[test]
    fn valid_through_end_date() {
        let m = membership(day("2024-05-01"));
        // still valid on the end date itself
        assert!(decide(Some(&m), day("2024-05-01")).is_ok());
        assert!(decide(Some(&m), day("2024-04-30")).is_ok());
    }

    #[test]
    fn expired_the_day_after() {
        let m = membership(day("2024-05-01"));
        assert_eq!(
            decide(Some(&m), day("2024-05-02")).unwrap_err(),
            DenyReason::ExpiredMembership
        );
    }
}
