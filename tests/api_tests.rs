//! HTTP API tests with mock provider clients.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::mocks::MockProviderClient;
use common::write_prompt_tree;
use ontopat::api::routes::build_app;
use ontopat::llm::{ProviderKind, ProviderRegistry};
use ontopat::{AppState, OntoConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

struct TestApp {
    server: TestServer,
    openai: MockProviderClient,
    ollama: MockProviderClient,
    _prompts: TempDir,
}

fn test_config(prompts: &TempDir) -> OntoConfig {
    let mut config = OntoConfig::default();
    config.prompts.dir = prompts.path().to_path_buf();
    config.transient.rendezvous_delay_ms = 0;
    config
}

fn create_test_app(openai: MockProviderClient, ollama: MockProviderClient) -> TestApp {
    let prompts = TempDir::new().expect("Failed to create temp dir");
    write_prompt_tree(prompts.path());

    let config = test_config(&prompts);
    let mut registry = ProviderRegistry::new();
    for (model, kind) in &config.models {
        registry.register_model(model, *kind);
    }
    // Routed to TGI but no client registered: the startup probe failed
    registry.register_model("llama-3.1-8b-instruct(fp16)", ProviderKind::Tgi);
    registry.register_client(Arc::new(openai.clone()));
    registry.register_client(Arc::new(ollama.clone()));

    let app = build_app(AppState::with_registry(config, registry));
    TestApp {
        server: TestServer::new(app).expect("Failed to create test server"),
        openai,
        ollama,
        _prompts: prompts,
    }
}

fn default_app() -> TestApp {
    create_test_app(
        MockProviderClient::new(
            ProviderKind::OpenAI,
            "```json\n{\"property_name\":\"hasCity\",\"explanation\":\"derived shortcut\"}\n```",
        ),
        MockProviderClient::new(
            ProviderKind::Ollama,
            r#"{"class_name":"CityAddress","explanation":"an address in a city"}"#,
        ),
    )
}

fn shortcut_request(model: &str) -> Value {
    json!({
        "A_label": "Person",
        "p_label": "hasAddress",
        "B_label": "Address",
        "r_label": "locatedIn",
        "C_label": "City",
        "use_few_shot": false,
        "model_name": model
    })
}

fn subclass_request(model: &str) -> Value {
    json!({
        "A_label": "Person",
        "p_label": "hasAddress",
        "B_label": "Address",
        "C_label": "CityAddress",
        "use_few_shot": false,
        "model_name": model
    })
}

// ============= Health & Models =============

#[tokio::test]
async fn test_health_check() {
    let app = default_app();
    let response = app.server.get("/health").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "OK");
}

#[tokio::test]
async fn test_model_provider_map() {
    let app = default_app();
    let response = app.server.get("/api/model_provider_map").await;

    response.assert_status_ok();
    let map: Value = response.json();
    assert_eq!(map["gpt-4o"], "openai");
    assert_eq!(map["llama-3.3-70b-instruct:q4"], "ollama");
    assert_eq!(map["llama-3.1-8b-instruct(fp16)"], "tgi");
}

#[tokio::test]
async fn test_openapi_document() {
    let app = default_app();
    let response = app.server.get("/api/openapi.json").await;

    response.assert_status_ok();
    let doc: Value = response.json();
    assert!(doc["paths"]["/api/generate_shortcut"].is_object());
}

// ============= Generation =============

#[tokio::test]
async fn test_generate_shortcut_strips_fence() {
    let app = default_app();
    let response = app
        .server
        .post("/api/generate_shortcut")
        .json(&shortcut_request("gpt-4o"))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({"property_name": "hasCity", "explanation": "derived shortcut"})
    );

    let calls = app.openai.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].model, "gpt-4o");
    assert!(calls[0].prompt.starts_with("[baseline]"));
    assert!(calls[0].prompt.contains("r=locatedIn"));
    // OpenAI templates get no schema
    assert!(calls[0].schema.is_none());
    assert!(calls[0].prompt.contains("schema=null"));
}

#[tokio::test]
async fn test_generate_subclass_via_ollama_sends_schema() {
    let app = default_app();
    let response = app
        .server
        .post("/api/generate_subclass")
        .json(&subclass_request("llama-3.3-70b-instruct:q4"))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({"class_name": "CityAddress", "explanation": "an address in a city"})
    );

    let calls = app.ollama.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].schema,
        Some(json!({"type":"object","required":["class_name","explanation"]}))
    );
    assert!(app.openai.calls().is_empty());
}

#[tokio::test]
async fn test_generation_params_forwarded() {
    let app = default_app();
    let mut request = shortcut_request("gpt-4o");
    request["temperature"] = json!(0.4);
    request["top_p"] = json!(0.9);
    request["presence_penalty"] = json!(0.5);

    app.server
        .post("/api/generate_shortcut")
        .json(&request)
        .await
        .assert_status_ok();

    let params = app.openai.calls()[0].params;
    assert_eq!(params.temperature, 0.4);
    assert_eq!(params.top_p, 0.9);
    assert_eq!(params.presence_penalty, 0.5);
    assert_eq!(params.frequency_penalty, 0.0);
}

#[tokio::test]
async fn test_missing_fields_default() {
    let app = create_test_app(
        MockProviderClient::new(ProviderKind::OpenAI, "{}"),
        MockProviderClient::new(ProviderKind::Ollama, "{}"),
    );

    let response = app
        .server
        .post("/api/generate_subclass")
        .json(&subclass_request("gpt-4o"))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({"class_name": "UnknownClass", "explanation": ""})
    );
}

#[tokio::test]
async fn test_invalid_json_reply_includes_raw_text() {
    let raw = "I think the best name would be hasCity.";
    let app = create_test_app(
        MockProviderClient::new(ProviderKind::OpenAI, raw),
        MockProviderClient::new(ProviderKind::Ollama, "{}"),
    );

    let response = app
        .server
        .post("/api/generate_shortcut")
        .json(&shortcut_request("gpt-4o"))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let detail = response.json::<Value>()["detail"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(detail.contains("did not return valid JSON"));
    assert!(detail.contains(raw));
}

#[tokio::test]
async fn test_unknown_model_rejected() {
    let app = default_app();
    let response = app
        .server
        .post("/api/generate_shortcut")
        .json(&shortcut_request("gpt-9"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["detail"]
        .as_str()
        .unwrap()
        .contains("gpt-9"));
    assert!(app.openai.calls().is_empty());
}

#[tokio::test]
async fn test_unreachable_provider() {
    let app = default_app();
    let response = app
        .server
        .post("/api/generate_subclass")
        .json(&subclass_request("llama-3.1-8b-instruct(fp16)"))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_upstream_failure() {
    let app = create_test_app(
        MockProviderClient::failing(ProviderKind::OpenAI),
        MockProviderClient::new(ProviderKind::Ollama, "{}"),
    );

    let response = app
        .server
        .post("/api/generate_shortcut")
        .json(&shortcut_request("gpt-4o"))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(
        response.json::<Value>()["detail"],
        "OpenAI API call failed: connection refused"
    );
}

#[tokio::test]
async fn test_shortcut_without_r_label() {
    let app = default_app();
    let response = app
        .server
        .post("/api/generate_shortcut")
        .json(&subclass_request("gpt-4o"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(app.openai.calls().is_empty());
}

#[tokio::test]
async fn test_missing_template() {
    let app = default_app();
    let mut request = shortcut_request("gpt-4o");
    request["pattern_name"] = json!("9_unknown");

    let response = app
        .server
        .post("/api/generate_shortcut")
        .json(&request)
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.json::<Value>()["detail"]
        .as_str()
        .unwrap()
        .contains("template not found"));
}

// ============= Prompt Preview =============

#[tokio::test]
async fn test_shortcut_prompt_preview() {
    let app = default_app();
    let response = app
        .server
        .post("/api/shortcut_prompt")
        .json(&shortcut_request("gpt-4o"))
        .await;

    response.assert_status_ok();
    let prompt = response.json::<Value>()["prompt"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(
        prompt,
        "[baseline]\nA=Person p=hasAddress B=Address r=locatedIn C=City\nschema=null"
    );
    // Preview never calls a provider
    assert!(app.openai.calls().is_empty());
}

#[tokio::test]
async fn test_subclass_prompt_preview_with_few_shot() {
    let app = default_app();
    let mut request = subclass_request("llama-3.3-70b-instruct:q4");
    request["use_few_shot"] = json!(true);
    request["few_shot_examples"] = json!([{
        "A_label": "Book",
        "p_label": "hasAuthor",
        "B_label": "Person",
        "C_label": "Novelist",
        "Subclass": "Novel"
    }]);

    let response = app
        .server
        .post("/api/subclass_prompt")
        .json(&request)
        .await;

    response.assert_status_ok();
    let prompt = response.json::<Value>()["prompt"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(prompt.starts_with("[few_shot]Input:\n- Class A: Book:"));
    assert!(prompt.contains("- Class C: Novelist, a subclass of Person"));
    assert!(prompt.contains("Suggested Class Name: Novel\n---\nA=Person"));
    assert!(prompt.contains("schema={"));
    assert!(prompt.contains(r#""required":["class_name","explanation"]"#));
    assert!(app.ollama.calls().is_empty());
}

#[tokio::test]
async fn test_few_shot_without_examples() {
    let app = default_app();
    let mut request = shortcut_request("gpt-4o");
    request["use_few_shot"] = json!(true);

    let response = app
        .server
        .post("/api/shortcut_prompt")
        .json(&request)
        .await;

    response.assert_status_ok();
    let prompt = response.json::<Value>()["prompt"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(prompt.starts_with("[few_shot]\nA=Person"));
}

// ============= Transient Storage =============

#[tokio::test]
async fn test_transient_store_read_once() {
    let app = default_app();

    let response = app
        .server
        .post("/api/_temp_localstorage_data")
        .json(&json!({"uuid": "abc-123", "data": "[\"{\\\"A_label\\\": \\\"Person\\\"}\"]"}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({"status": 200}));

    let first = app
        .server
        .get("/api/_temp_localstorage_data")
        .add_query_param("uuid", "abc-123")
        .await;
    first.assert_status_ok();
    assert_eq!(first.json::<Value>(), json!([{"A_label": "Person"}]));

    let second = app
        .server
        .get("/api/_temp_localstorage_data")
        .add_query_param("uuid", "abc-123")
        .await;
    second.assert_status_ok();
    assert_eq!(second.json::<Value>(), Value::Null);
}

#[tokio::test]
async fn test_transient_store_first_write_wins() {
    let app = default_app();

    for data in [json!({"v": 1}), json!({"v": 2})] {
        app.server
            .post("/api/_temp_localstorage_data")
            .json(&json!({"uuid": "k", "data": data}))
            .await
            .assert_status_ok();
    }

    let response = app
        .server
        .get("/api/_temp_localstorage_data")
        .add_query_param("uuid", "k")
        .await;
    assert_eq!(response.json::<Value>(), json!({"v": 1}));
}

#[tokio::test]
async fn test_transient_unknown_key_is_null() {
    let app = default_app();
    let response = app
        .server
        .get("/api/_temp_localstorage_data")
        .add_query_param("uuid", "never-set")
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), Value::Null);
}
