//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`access`] - 门禁决策和审计日志接口
//! - [`payments`] - 余额支付接口
//! - [`pairing`] - NFC 配对接口
//! - [`dashboard`] - 仪表盘统计读取

pub mod access;
pub mod dashboard;
pub mod health;
pub mod pairing;
pub mod payments;

use axum::Router;
use serde::Deserialize;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// 列表接口通用分页参数
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub skip: usize,
}

fn default_limit() -> usize {
    50
}

/// 组装全部 API 路由
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(access::router())
        .merge(payments::router())
        .merge(pairing::router())
        .merge(dashboard::router())
}
