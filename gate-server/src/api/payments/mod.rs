//! Payments API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/payments", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/membership", post(handler::pay_membership))
        .route("/product", post(handler::pay_product))
        .route("/history", get(handler::history))
        .route("/plans", get(handler::list_plans))
        .route("/products", get(handler::list_products))
}
