//! Pairing API Handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct PairingCodeRequest {
    pub member_id: String,
}

#[derive(Debug, Serialize)]
pub struct PairingCodeResponse {
    pub pairing_code: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct LinkRequest {
    pub pairing_code: String,
    pub nfc_id: String,
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub message: String,
    pub member_id: String,
    pub nfc_id: String,
}

/// POST /api/pairing/code - 为未绑卡会员生成配对码
pub async fn generate_code(
    State(state): State<ServerState>,
    Json(req): Json<PairingCodeRequest>,
) -> AppResult<Json<PairingCodeResponse>> {
    let code = state.pairing.generate_code(&req.member_id).await?;
    Ok(Json(PairingCodeResponse {
        pairing_code: code,
        message: "Pairing code issued. Use it in the mobile app to link the NFC card."
            .to_string(),
    }))
}

/// POST /api/pairing/link - 用配对码绑定 NFC 卡
pub async fn link_card(
    State(state): State<ServerState>,
    Json(req): Json<LinkRequest>,
) -> AppResult<Json<LinkResponse>> {
    let member_id = state.pairing.link(&req.pairing_code, &req.nfc_id).await?;
    Ok(Json(LinkResponse {
        message: "NFC card linked to member".to_string(),
        member_id,
        nfc_id: req.nfc_id,
    }))
}
