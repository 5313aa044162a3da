//! Access gate - token presentation to grant/deny and presence toggle
//!
//! This module handles:
//! - Token validation and identity resolution
//! - The grant/deny decision (membership presence + calendar-day expiry)
//! - The per-member presence state machine (entry/exit + dwell)
//! - Fraud escalation for unknown tokens
//! - Dashboard statistics recompute
//!
//! # Request Flow
//!
//! ```text
//! present_token(raw)
//!     ├─ 1. Validate token (length gate, no side effects on reject)
//!     ├─ 2. Resolve member + active membership (pure read)
//!     ├─ 3. Unknown token → 404, background: audit log + fraud monitor
//!     ├─ 4. Decide: no membership / expired → denied outcome,
//!     │            background: audit log + visibility alert
//!     ├─ 5. Grant → per-member lock, read aggregate, toggle entry/exit
//!     └─ 6. Background: audit log + stats recompute
//! ```

pub mod decision;
pub mod fraud;
pub mod presence;
pub mod resolver;
pub mod scheduler;
pub mod stats;

#[cfg(test)]
mod tests;

pub use fraud::FraudMonitor;
pub use presence::Transition;
pub use resolver::{IdentityResolver, ResolvedIdentity};
pub use scheduler::StatsRefreshScheduler;
pub use stats::StatsAggregator;

use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::core::state::{IntegrityCounters, MemberLocks};
use crate::core::tasks::spawn_best_effort;
use crate::db::repository::{
    AccessLogRepository, AlertRepository, DashboardRepository, MemberRepository,
    MembershipRepository, PlanRepository,
};
use crate::db::store::RecordStore;
use crate::utils::validation::validate_token;
use crate::utils::{AppError, AppResult, time};
use shared::models::{AccessLogEntry, AccessStatus, DenyReason, Member, MemberStatus};

/// Source device type recorded in access logs
const DEVICE_TYPE: &str = "card";

/// What one token presentation resolved to, for the transport layer
#[derive(Debug, Clone)]
pub struct AccessOutcome {
    pub token: String,
    pub name: String,
    pub member_status: MemberStatus,
    pub granted: bool,
    pub message: String,
    pub plan: Option<String>,
    pub membership_end: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct GateService {
    resolver: IdentityResolver,
    plans: PlanRepository,
    access_logs: AccessLogRepository,
    fraud: FraudMonitor,
    dashboard: DashboardRepository,
    stats: StatsAggregator,
    locks: Arc<MemberLocks>,
    tz: Tz,
}

impl GateService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        locks: Arc<MemberLocks>,
        integrity: Arc<IntegrityCounters>,
        tz: Tz,
        location: String,
    ) -> Self {
        let access_logs = AccessLogRepository::new(store.clone());
        let alerts = AlertRepository::new(store.clone());
        let dashboard = DashboardRepository::new(store.clone());
        Self {
            resolver: IdentityResolver::new(
                MemberRepository::new(store.clone()),
                MembershipRepository::new(store.clone()),
                integrity,
            ),
            plans: PlanRepository::new(store),
            access_logs: access_logs.clone(),
            fraud: FraudMonitor::new(access_logs, alerts, location),
            dashboard: dashboard.clone(),
            stats: StatsAggregator::new(dashboard, tz),
            locks,
            tz,
        }
    }

    /// The statistics aggregator, for the periodic refresher
    pub fn stats(&self) -> &StatsAggregator {
        &self.stats
    }

    /// Handle one token presentation at the gate.
    ///
    /// Errors: `Validation` (short token, nothing written), `NotFound`
    /// (unknown token, audited + alerted in the background), `Database`
    /// (store unavailable). Membership denials are not errors: they come
    /// back as an outcome with `granted = false`.
    pub async fn present_token(&self, raw_token: &str) -> AppResult<AccessOutcome> {
        let token = validate_token(raw_token)?;
        let now = shared::util::now_millis();

        let Some(ResolvedIdentity { member, membership }) =
            self.resolver.resolve(token).await.map_err(AppError::from)?
        else {
            self.spawn_unknown_token_effects(token.to_string(), now);
            return Err(AppError::NotFound("Member not found".to_string()));
        };

        let today = time::local_today(self.tz);
        let membership = match decision::decide(membership.as_ref(), today) {
            Ok(m) => m,
            Err(reason) => {
                self.spawn_denied_effects(member.clone(), token.to_string(), reason, now);
                return Ok(AccessOutcome {
                    token: token.to_string(),
                    name: member.name,
                    member_status: member.status,
                    granted: false,
                    message: decision::deny_message(reason).to_string(),
                    plan: None,
                    membership_end: None,
                });
            }
        };

        // A missing plan record degrades to an empty display name; only a
        // store failure aborts the grant.
        let plan_name = self
            .plans
            .find_by_id(&membership.plan_id)
            .await
            .map_err(AppError::from)?
            .map(|p| p.name)
            .unwrap_or_default();

        // Read-check-write over the shared aggregate: the per-member lock
        // is what stops a double card read from double-registering an
        // entry or losing an exit. The store itself offers no conditional
        // write to close this race at the document level.
        let transition = {
            let lock = self.locks.acquire(&member.id);
            let _guard = lock.lock().await;

            let now = shared::util::now_millis();
            let dashboard = self.dashboard.load().await.map_err(AppError::from)?;
            let transition =
                presence::plan_transition(&dashboard, &member, &plan_name, membership.end_date, now);
            match &transition {
                Transition::Entry {
                    session_id,
                    session,
                } => self
                    .dashboard
                    .record_entry(session_id, session)
                    .await
                    .map_err(AppError::from)?,
                Transition::Exit {
                    session_id,
                    exit,
                    dwell_secs,
                } => self
                    .dashboard
                    .record_exit(session_id, *exit, *dwell_secs)
                    .await
                    .map_err(AppError::from)?,
            }
            transition
        };

        let message = transition.message();
        let membership_end = membership.end_date;
        self.spawn_granted_effects(member.clone(), token.to_string(), now);

        Ok(AccessOutcome {
            token: token.to_string(),
            name: member.name,
            member_status: member.status,
            granted: true,
            message,
            plan: Some(plan_name),
            membership_end: Some(membership_end),
        })
    }

    /// Unknown token: audit entry first, then the fraud monitor, so the
    /// sliding-window recount sees the current denial.
    fn spawn_unknown_token_effects(&self, token: String, now: i64) {
        let access_logs = self.access_logs.clone();
        let fraud = self.fraud.clone();
        spawn_best_effort("unknown_token_audit", async move {
            access_logs
                .append(&AccessLogEntry {
                    member_id: None,
                    name: fraud::UNKNOWN_SUBJECT.to_string(),
                    token: token.clone(),
                    timestamp: now,
                    status: AccessStatus::Denied,
                    reason: Some(DenyReason::UnknownToken),
                    device_type: DEVICE_TYPE.to_string(),
                })
                .await?;
            fraud.on_unknown_token(&token, now).await?;
            Ok(())
        });
    }

    fn spawn_denied_effects(&self, member: Member, token: String, reason: DenyReason, now: i64) {
        let access_logs = self.access_logs.clone();
        let fraud = self.fraud.clone();
        spawn_best_effort("denied_audit", async move {
            access_logs
                .append(&AccessLogEntry {
                    member_id: Some(member.id.clone()),
                    name: member.name.clone(),
                    token,
                    timestamp: now,
                    status: AccessStatus::Denied,
                    reason: Some(reason),
                    device_type: DEVICE_TYPE.to_string(),
                })
                .await?;
            fraud.on_member_denied(&member.name, reason, now).await?;
            Ok(())
        });
    }

    fn spawn_granted_effects(&self, member: Member, token: String, now: i64) {
        let access_logs = self.access_logs.clone();
        let stats = self.stats.clone();
        spawn_best_effort("granted_audit", async move {
            access_logs
                .append(&AccessLogEntry {
                    member_id: Some(member.id.clone()),
                    name: member.name.clone(),
                    token,
                    timestamp: now,
                    status: AccessStatus::Granted,
                    reason: None,
                    device_type: DEVICE_TYPE.to_string(),
                })
                .await?;
            stats.recompute_best_effort().await;
            Ok(())
        });
    }
}
