//! Payments API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::api::PageQuery;
use crate::core::ServerState;
use crate::db::repository::{PaymentLogRepository, PlanRepository, ProductRepository};
use crate::ledger::PaymentReceipt;
use crate::utils::AppResult;
use shared::models::{PaymentLogEntry, Plan, Product};

/// Membership purchase request
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub nfc_id: String,
    pub plan_id: String,
}

/// Product purchase request
#[derive(Debug, Deserialize)]
pub struct ProductPaymentRequest {
    pub nfc_id: String,
    pub product_id: String,
}

/// POST /api/payments/membership - 从余额购买/续费会籍
pub async fn pay_membership(
    State(state): State<ServerState>,
    Json(req): Json<PaymentRequest>,
) -> AppResult<Json<PaymentReceipt>> {
    let receipt = state.ledger.pay_membership(&req.nfc_id, &req.plan_id).await?;
    Ok(Json(receipt))
}

/// POST /api/payments/product - 从余额购买商品
pub async fn pay_product(
    State(state): State<ServerState>,
    Json(req): Json<ProductPaymentRequest>,
) -> AppResult<Json<PaymentReceipt>> {
    let receipt = state.ledger.pay_product(&req.nfc_id, &req.product_id).await?;
    Ok(Json(receipt))
}

/// GET /api/payments/history - 支付记录（新到旧）
pub async fn history(
    State(state): State<ServerState>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Vec<PaymentLogEntry>>> {
    let entries = PaymentLogRepository::new(state.store.clone())
        .recent(page.limit, page.skip)
        .await?;
    Ok(Json(entries))
}

/// GET /api/payments/plans - 会籍方案目录
pub async fn list_plans(State(state): State<ServerState>) -> AppResult<Json<Vec<Plan>>> {
    let plans = PlanRepository::new(state.store.clone()).find_all().await?;
    Ok(Json(plans))
}

/// GET /api/payments/products - 商品目录
pub async fn list_products(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.store.clone())
        .find_all()
        .await?;
    Ok(Json(products))
}
