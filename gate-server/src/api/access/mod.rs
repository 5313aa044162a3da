//! Access API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/access", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::check_access))
        .route("/logs", get(handler::list_logs))
        .route("/logs/{member_id}", get(handler::logs_by_member))
        .route("/alerts", get(handler::list_alerts))
        .route("/alerts/{name}", get(handler::alerts_by_name))
}
