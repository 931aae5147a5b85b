use crate::{
    store::decode_payload,
    types::{StatusResponse, TransientData, TransientQuery},
    AppState,
};
use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::Value;
use tracing::debug;

/// Store a payload for a single later read
#[utoipa::path(
    post,
    path = "/api/_temp_localstorage_data",
    request_body = TransientData,
    responses(
        (status = 200, description = "Acknowledged", body = StatusResponse)
    ),
    tag = "transient"
)]
pub async fn save_transient(
    State(state): State<AppState>,
    Json(payload): Json<TransientData>,
) -> Json<StatusResponse> {
    let stored = state
        .transient
        .put(&payload.uuid, decode_payload(payload.data));
    debug!(uuid = %payload.uuid, stored, "Transient payload received");

    Json(StatusResponse { status: 200 })
}

/// Take a stored payload after the rendezvous delay; `null` when absent
#[utoipa::path(
    get,
    path = "/api/_temp_localstorage_data",
    params(
        ("uuid" = String, Query, description = "Key the payload was stored under")
    ),
    responses(
        (status = 200, description = "Stored payload or null")
    ),
    tag = "transient"
)]
pub async fn take_transient(
    State(state): State<AppState>,
    Query(query): Query<TransientQuery>,
) -> Json<Option<Value>> {
    Json(state.transient.take_when_ready(&query.uuid).await)
}
