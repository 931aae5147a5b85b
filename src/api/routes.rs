use crate::api::handlers::{models, patterns, transient};
use crate::llm::ProviderKind;
use crate::types::{
    FewShotExample, GenerationParams, PatternRequest, PromptPreview, ShortcutResponse,
    StatusResponse, SubclassResponse, TransientData,
};
use crate::utils::toml_config::ServerConfig;
use crate::AppState;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::OpenApi;

/// OpenAPI document for the `/api` surface
#[derive(OpenApi)]
#[openapi(
    info(title = "Ontology Patterns API"),
    paths(
        models::model_provider_map,
        patterns::generate_shortcut,
        patterns::generate_subclass,
        patterns::shortcut_prompt,
        patterns::subclass_prompt,
        transient::save_transient,
        transient::take_transient,
    ),
    components(schemas(
        ProviderKind,
        PatternRequest,
        FewShotExample,
        GenerationParams,
        ShortcutResponse,
        SubclassResponse,
        PromptPreview,
        TransientData,
        StatusResponse,
    )),
    tags(
        (name = "models", description = "Routable models"),
        (name = "patterns", description = "Pattern generation and prompt preview"),
        (name = "transient", description = "One-time hand-off storage")
    )
)]
pub struct ApiDoc;

/// Routes served under `/api`
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/model_provider_map", get(models::model_provider_map))
        .route("/generate_shortcut", post(patterns::generate_shortcut))
        .route("/generate_subclass", post(patterns::generate_subclass))
        .route("/shortcut_prompt", post(patterns::shortcut_prompt))
        .route("/subclass_prompt", post(patterns::subclass_prompt))
        .route(
            "/_temp_localstorage_data",
            get(transient::take_transient).post(transient::save_transient),
        )
        .route(
            "/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
}

/// CORS layer for the configured origins; any origin when none are set.
pub fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

/// Complete application: `/api` routes, health check, CORS and request tracing.
pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server);

    let app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api", create_router());

    #[cfg(feature = "swagger-ui")]
    let app = app.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
