//! HTTP API Handlers and Routes
//!
//! Axum layer over [`PatternService`](crate::patterns::PatternService) and
//! the [`TransientStore`](crate::store::TransientStore).
//!
//! # API Endpoints
//!
//! ## Models
//! - `GET /api/model_provider_map` - Routable models and their providers
//!
//! ## Patterns
//! - `POST /api/generate_shortcut` - Suggest a shortcut property name
//! - `POST /api/generate_subclass` - Suggest a subclass name
//! - `POST /api/shortcut_prompt` - Preview the shortcut prompt
//! - `POST /api/subclass_prompt` - Preview the subclass prompt
//!
//! ## Transient storage
//! - `POST /api/_temp_localstorage_data` - Store a payload once
//! - `GET /api/_temp_localstorage_data?uuid=` - Take it, after the rendezvous delay
//!
//! ## Other
//! - `GET /health` - Liveness check
//! - `GET /api/openapi.json` - OpenAPI document
//!
//! Errors are returned as `{"detail": "<message>"}` with a status code
//! matching the [`AppError`](crate::types::AppError) variant.
//!
//! # OpenAPI Documentation
//!
//! When the `swagger-ui` feature is enabled, interactive API documentation
//! is available at `/swagger-ui/`.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
