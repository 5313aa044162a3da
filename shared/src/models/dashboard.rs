//! Presence Dashboard Model
//!
//! 单文档聚合：所有进出 session、统计数字、每日活动和月度营收
//! 都保存在一个 dashboard 文档里（member-keyed 变体）。
//! Session 日志是 append-only 的，从不清理。

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One open-to-close presence interval for a member
///
/// Invariant: per member at most one session has `entry` set and `exit`
/// null — that is the "currently inside" predicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub member_id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub plan: String,
    pub membership_end: NaiveDate,
    /// Entry timestamp, unix millis
    pub entry: i64,
    /// Exit timestamp, unix millis; None while the member is inside
    #[serde(default)]
    pub exit: Option<i64>,
    /// Dwell in whole seconds, filled together with `exit`
    #[serde(default)]
    pub dwell_secs: Option<i64>,
}

impl Session {
    pub fn is_open(&self) -> bool {
        self.exit.is_none()
    }
}

/// Derived dashboard counters, recomputed from the session log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Sessions with a null exit
    pub active_members: u32,
    /// Sessions whose entry or exit falls on the current local day
    pub daily_activity: u32,
}

/// The shared dashboard aggregate (one document per gate context)
///
/// All fields default so a missing or partially-written document decodes
/// to an empty dashboard instead of failing the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub sessions: BTreeMap<String, Session>,
    #[serde(default)]
    pub stats: DashboardStats,
    /// "YYYY-MM-DD" → activity count history
    #[serde(default)]
    pub activity_per_day: BTreeMap<String, u32>,
    /// "YYYY-MM" → accumulated revenue
    #[serde(default)]
    pub monthly_revenue: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

impl Dashboard {
    /// Locate the member's open session, if any
    pub fn open_session(&self, member_id: &str) -> Option<(&String, &Session)> {
        self.sessions
            .iter()
            .find(|(_, s)| s.member_id == member_id && s.is_open())
    }
}
