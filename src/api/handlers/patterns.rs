use crate::{
    types::{
        PatternKind, PatternRequest, PatternResponse, PromptPreview, Result, ShortcutResponse,
        SubclassResponse,
    },
    AppState,
};
use axum::{extract::State, Json};
use tracing::warn;

async fn generate(
    state: &AppState,
    pattern: PatternKind,
    request: &PatternRequest,
) -> Result<PatternResponse> {
    state
        .patterns
        .generate(pattern, request)
        .await
        .inspect_err(|e| {
            warn!(pattern = %pattern, model = %request.model_name, error = %e, "Generation failed")
        })
}

/// Suggest a shortcut property for an A-p-B-r-C chain
#[utoipa::path(
    post,
    path = "/api/generate_shortcut",
    request_body = PatternRequest,
    responses(
        (status = 200, description = "Suggested property", body = ShortcutResponse),
        (status = 400, description = "Unknown model or invalid input"),
        (status = 500, description = "Template or configuration error"),
        (status = 502, description = "Provider failed or replied with invalid JSON"),
        (status = 503, description = "Provider not reachable")
    ),
    tag = "patterns"
)]
pub async fn generate_shortcut(
    State(state): State<AppState>,
    Json(payload): Json<PatternRequest>,
) -> Result<Json<PatternResponse>> {
    let response = generate(&state, PatternKind::Shortcut, &payload).await?;
    Ok(Json(response))
}

/// Suggest a subclass name for the range of a property
#[utoipa::path(
    post,
    path = "/api/generate_subclass",
    request_body = PatternRequest,
    responses(
        (status = 200, description = "Suggested class", body = SubclassResponse),
        (status = 400, description = "Unknown model or invalid input"),
        (status = 500, description = "Template or configuration error"),
        (status = 502, description = "Provider failed or replied with invalid JSON"),
        (status = 503, description = "Provider not reachable")
    ),
    tag = "patterns"
)]
pub async fn generate_subclass(
    State(state): State<AppState>,
    Json(payload): Json<PatternRequest>,
) -> Result<Json<PatternResponse>> {
    let response = generate(&state, PatternKind::Subclass, &payload).await?;
    Ok(Json(response))
}

/// Full prompt the shortcut generator would send
#[utoipa::path(
    post,
    path = "/api/shortcut_prompt",
    request_body = PatternRequest,
    responses(
        (status = 200, description = "Rendered prompt", body = PromptPreview),
        (status = 400, description = "Unknown model or invalid input"),
        (status = 500, description = "Template not found")
    ),
    tag = "patterns"
)]
pub async fn shortcut_prompt(
    State(state): State<AppState>,
    Json(payload): Json<PatternRequest>,
) -> Result<Json<PromptPreview>> {
    let prompt = state
        .patterns
        .preview(PatternKind::Shortcut, &payload)
        .await?;
    Ok(Json(PromptPreview { prompt }))
}

/// Full prompt the subclass generator would send
#[utoipa::path(
    post,
    path = "/api/subclass_prompt",
    request_body = PatternRequest,
    responses(
        (status = 200, description = "Rendered prompt", body = PromptPreview),
        (status = 400, description = "Unknown model or invalid input"),
        (status = 500, description = "Template not found")
    ),
    tag = "patterns"
)]
pub async fn subclass_prompt(
    State(state): State<AppState>,
    Json(payload): Json<PatternRequest>,
) -> Result<Json<PromptPreview>> {
    let prompt = state
        .patterns
        .preview(PatternKind::Subclass, &payload)
        .await?;
    Ok(Json(PromptPreview { prompt }))
}
