use crate::{types::ModelProviderMap, AppState};
use axum::{extract::State, Json};

/// Map of every routable model to the provider that serves it
#[utoipa::path(
    get,
    path = "/api/model_provider_map",
    responses(
        (status = 200, description = "Model name to provider", body = std::collections::BTreeMap<String, crate::llm::ProviderKind>)
    ),
    tag = "models"
)]
pub async fn model_provider_map(State(state): State<AppState>) -> Json<ModelProviderMap> {
    Json(state.registry.model_map())
}
