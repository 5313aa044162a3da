//! Fraud / Alert Monitor
//!
//! Every unknown-token denial raises an "Unknown NFC" alert; repeated
//! denials of the same token inside a sliding window escalate to a
//! higher-severity alert. The window count is a live query over the
//! access log, recomputed per denial — idempotent under re-execution and
//! monotonic under repeated calls.

use crate::db::repository::{AccessLogRepository, AlertRepository, RepoResult};
use shared::models::{Alert, AlertType, DenyReason};

/// Sliding window length for repeated-failure detection
const FAILURE_WINDOW_MINUTES: i64 = 10;

/// Unknown-token denials within the window that trigger escalation
const FAILURE_THRESHOLD: usize = 3;

/// Subject name used when no member could be resolved
pub const UNKNOWN_SUBJECT: &str = "Unknown";

#[derive(Clone)]
pub struct FraudMonitor {
    access_logs: AccessLogRepository,
    alerts: AlertRepository,
    location: String,
}

impl FraudMonitor {
    pub fn new(
        access_logs: AccessLogRepository,
        alerts: AlertRepository,
        location: String,
    ) -> Self {
        Self {
            access_logs,
            alerts,
            location,
        }
    }

    /// Unknown-token escalation path.
    ///
    /// The caller appends the denial log entry first so the recount below
    /// sees the current attempt; the 3rd denial within the window is the
    /// one that raises the escalation alert.
    pub async fn on_unknown_token(&self, token: &str, now_millis: i64) -> RepoResult<()> {
        self.alerts
            .append(&Alert {
                name: UNKNOWN_SUBJECT.to_string(),
                alert_type: AlertType::UnknownNfc,
                location: self.location.clone(),
                timestamp: now_millis,
            })
            .await?;

        let since = now_millis - FAILURE_WINDOW_MINUTES * 60_000;
        let failures = self
            .access_logs
            .count_unknown_denials(token, since)
            .await?;
        if failures >= FAILURE_THRESHOLD {
            tracing::warn!(
                target: "fraud",
                token = %token,
                failures,
                window_minutes = FAILURE_WINDOW_MINUTES,
                "repeated unknown-token denials"
            );
            self.alerts
                .append(&Alert {
                    name: UNKNOWN_SUBJECT.to_string(),
                    alert_type: AlertType::MultipleFailedAttempts,
                    location: self.location.clone(),
                    timestamp: now_millis,
                })
                .await?;
        }

        Ok(())
    }

    /// Visibility alert for a resolved member who was denied.
    ///
    /// These do not contribute to the unknown-token failure count.
    pub async fn on_member_denied(
        &self,
        name: &str,
        reason: DenyReason,
        now_millis: i64,
    ) -> RepoResult<()> {
        let alert_type = match reason {
            DenyReason::NoActiveMembership => AlertType::NoActiveMembership,
            DenyReason::ExpiredMembership => AlertType::MembershipExpired,
            DenyReason::UnknownToken => AlertType::UnknownNfc,
        };
        self.alerts
            .append(&Alert {
                name: name.to_string(),
                alert_type,
                location: self.location.clone(),
                timestamp: now_millis,
            })
            .await?;
        Ok(())
    }
}
