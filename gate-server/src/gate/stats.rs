//! Statistics Aggregator
//!
//! Full recompute of the dashboard counters from the session log — not an
//! incremental counter, so it is idempotent and safe to retry or run out
//! of order relative to the toggle that triggered it. The O(sessions)
//! scan is the accepted ceiling: the log is append-only and never pruned.

use chrono_tz::Tz;

use crate::db::repository::{DashboardRepository, RepoResult};
use crate::utils::time;
use shared::models::DashboardStats;

#[derive(Clone)]
pub struct StatsAggregator {
    dashboard: DashboardRepository,
    tz: Tz,
}

impl StatsAggregator {
    pub fn new(dashboard: DashboardRepository, tz: Tz) -> Self {
        Self { dashboard, tz }
    }

    /// Recompute and persist `active_members` and `daily_activity`, plus
    /// today's `activity_per_day` history entry.
    pub async fn recompute(&self) -> RepoResult<DashboardStats> {
        let dashboard = self.dashboard.load().await?;
        let today = time::local_today(self.tz);

        let active_members = dashboard.sessions.values().filter(|s| s.is_open()).count();
        let daily_activity = dashboard
            .sessions
            .values()
            .filter(|s| {
                time::millis_to_local_date(s.entry, self.tz) == today
                    || s
                        .exit
                        .is_some_and(|exit| time::millis_to_local_date(exit, self.tz) == today)
            })
            .count();

        let stats = DashboardStats {
            active_members: active_members as u32,
            daily_activity: daily_activity as u32,
        };
        self.dashboard
            .write_stats(&stats, &time::date_key(today), shared::util::now_millis())
            .await?;
        Ok(stats)
    }

    /// Background variant: statistics are best-effort, a store failure is
    /// logged and swallowed instead of failing the triggering request.
    pub async fn recompute_best_effort(&self) {
        if let Err(e) = self.recompute().await {
            tracing::warn!(error = %e, "dashboard stats recompute failed");
        }
    }
}
