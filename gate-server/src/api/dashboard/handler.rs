//! Dashboard API Handlers

use std::collections::BTreeMap;

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::ServerState;
use crate::db::repository::DashboardRepository;
use crate::utils::AppResult;
use shared::models::DashboardStats;

/// Dashboard read-through (counters + history, without the session log)
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub activity_per_day: BTreeMap<String, u32>,
    pub monthly_revenue: BTreeMap<String, Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

/// GET /api/dashboard - 仪表盘统计
pub async fn get_dashboard(State(state): State<ServerState>) -> AppResult<Json<DashboardView>> {
    let dashboard = DashboardRepository::new(state.store.clone()).load().await?;
    Ok(Json(DashboardView {
        stats: dashboard.stats,
        activity_per_day: dashboard.activity_per_day,
        monthly_revenue: dashboard.monthly_revenue,
        updated_at: dashboard.updated_at,
    }))
}
