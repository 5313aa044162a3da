//! Pairing API 模块

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/pairing", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/code", post(handler::generate_code))
        .route("/link", post(handler::link_card))
}
