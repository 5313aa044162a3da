//! Access API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::PageQuery;
use crate::core::ServerState;
use crate::db::repository::{AccessLogRepository, AlertRepository};
use crate::gate::AccessOutcome;
use crate::utils::AppResult;
use shared::models::{AccessLogEntry, Alert};

/// Token presentation from a reader
#[derive(Debug, Deserialize)]
pub struct AccessRequest {
    pub nfc_id: String,
}

/// Decision response sent back to the reader
///
/// 未解析 token 走 404（不是 granted=false 的 200）；
/// 会籍类拒绝返回 200 + access_granted=false。
#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub id: String,
    pub name: String,
    pub status: String,
    pub access_granted: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl From<AccessOutcome> for AccessResponse {
    fn from(outcome: AccessOutcome) -> Self {
        Self {
            id: outcome.token,
            name: outcome.name,
            status: outcome.member_status.to_string(),
            access_granted: outcome.granted,
            message: outcome.message,
            plan: outcome.plan,
            end_date: outcome.membership_end,
        }
    }
}

/// POST /api/access - 验证 NFC token 并切换在场状态
pub async fn check_access(
    State(state): State<ServerState>,
    Json(req): Json<AccessRequest>,
) -> AppResult<Json<AccessResponse>> {
    let outcome = state.gate.present_token(&req.nfc_id).await?;
    Ok(Json(AccessResponse::from(outcome)))
}

/// GET /api/access/logs - 访问日志（新到旧）
pub async fn list_logs(
    State(state): State<ServerState>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Vec<AccessLogEntry>>> {
    let logs = AccessLogRepository::new(state.store.clone())
        .recent(page.limit, page.skip)
        .await?;
    Ok(Json(logs))
}

/// GET /api/access/logs/:member_id - 单个会员的访问日志
pub async fn logs_by_member(
    State(state): State<ServerState>,
    Path(member_id): Path<String>,
) -> AppResult<Json<Vec<AccessLogEntry>>> {
    let logs = AccessLogRepository::new(state.store.clone())
        .for_member(&member_id)
        .await?;
    Ok(Json(logs))
}

/// GET /api/access/alerts - 告警列表（新到旧）
pub async fn list_alerts(
    State(state): State<ServerState>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Vec<Alert>>> {
    let alerts = AlertRepository::new(state.store.clone())
        .recent(page.limit, page.skip)
        .await?;
    Ok(Json(alerts))
}

/// GET /api/access/alerts/:name - 按主体名过滤告警
pub async fn alerts_by_name(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> AppResult<Json<Vec<Alert>>> {
    let alerts = AlertRepository::new(state.store.clone())
        .for_name(&name)
        .await?;
    Ok(Json(alerts))
}
