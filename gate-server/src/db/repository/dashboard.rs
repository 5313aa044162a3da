//! Dashboard Repository
//!
//! The presence aggregate lives in a single document (`dashboard/main`):
//! the session log, the derived stats, daily activity history and monthly
//! revenue. Writes here rely on the store's single-document atomicity;
//! read-check-write sequences are serialized by the callers (per-member
//! lock for sessions, revenue lock for the monthly roll-up).

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;

use super::{RepoError, RepoResult, decode, encode};
use crate::db::DASHBOARD_DOC;
use crate::db::collections::DASHBOARD;
use crate::db::store::RecordStore;
use shared::models::{Dashboard, DashboardStats, Session};

#[derive(Clone)]
pub struct DashboardRepository {
    store: Arc<dyn RecordStore>,
}

impl DashboardRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Load the aggregate; a missing document decodes as empty.
    pub async fn load(&self) -> RepoResult<Dashboard> {
        match self.store.get(DASHBOARD, DASHBOARD_DOC).await? {
            Some(record) => decode(record),
            None => Ok(Dashboard::default()),
        }
    }

    /// Open a new session (entry). Merge-set so sibling sessions and the
    /// rest of the aggregate are preserved.
    ///
    /// Session ids must not contain '.', which would split the dotted
    /// update paths used on exit; millisecond-timestamp ids satisfy this.
    pub async fn record_entry(&self, session_id: &str, session: &Session) -> RepoResult<()> {
        self.store
            .set(
                DASHBOARD,
                DASHBOARD_DOC,
                json!({ "sessions": { session_id: encode(session)? } }),
                true,
            )
            .await?;
        Ok(())
    }

    /// Close a session (exit): fill the exit timestamp and dwell.
    pub async fn record_exit(
        &self,
        session_id: &str,
        exit_millis: i64,
        dwell_secs: i64,
    ) -> RepoResult<()> {
        self.store
            .update(
                DASHBOARD,
                DASHBOARD_DOC,
                &[
                    (format!("sessions.{session_id}.exit"), json!(exit_millis)),
                    (
                        format!("sessions.{session_id}.dwell_secs"),
                        json!(dwell_secs),
                    ),
                ],
            )
            .await?;
        Ok(())
    }

    /// Write the recomputed counters plus today's history entry.
    pub async fn write_stats(
        &self,
        stats: &DashboardStats,
        day_key: &str,
        updated_at: i64,
    ) -> RepoResult<()> {
        self.store
            .set(
                DASHBOARD,
                DASHBOARD_DOC,
                json!({
                    "stats": encode(stats)?,
                    "activity_per_day": { day_key: stats.daily_activity },
                    "updated_at": updated_at,
                }),
                true,
            )
            .await?;
        Ok(())
    }

    /// Roll an amount into the month's revenue and return the new total.
    ///
    /// Read-modify-write on a shared key: the caller must hold the ledger's
    /// revenue lock, two concurrent roll-ups would otherwise lose one.
    pub async fn add_revenue(&self, year_month: &str, amount: Decimal) -> RepoResult<Decimal> {
        let dashboard = self.load().await?;
        let total = dashboard
            .monthly_revenue
            .get(year_month)
            .copied()
            .unwrap_or_default()
            + amount;
        let value = serde_json::to_value(total).map_err(|e| RepoError::Corrupt(e.to_string()))?;
        self.store
            .set(
                DASHBOARD,
                DASHBOARD_DOC,
                json!({ "monthly_revenue": { year_month: value } }),
                true,
            )
            .await?;
        Ok(total)
    }
}
