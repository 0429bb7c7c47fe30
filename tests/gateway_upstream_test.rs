//! Assistant gateway against a mocked Gemini endpoint.
//!
//! Covers the request shape, markup cleaning on success, and the mapping of
//! each upstream failure to its fallback reply.

use std::time::Duration;

use wiremock::matchers::{ body_partial_json, header, method, path };
use wiremock::{ Mock, MockServer, ResponseTemplate };

use prime_assistant::assistant::{ AssistantGateway, FallbackKind, ReplyOrigin };
use prime_assistant::config::persona::GENERATION;
use prime_assistant::llm::LlmConfig;

const ENDPOINT: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn config_for(server: &MockServer) -> LlmConfig {
    LlmConfig {
        api_key: Some("test-key".into()),
        base_url: Some(server.uri()),
        ..LlmConfig::default()
    }
}

fn gateway_for(server: &MockServer) -> AssistantGateway {
    AssistantGateway::from_config(&config_for(server)).unwrap()
}

fn text_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

fn error_body(code: u16, message: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "error": { "code": code, "message": message, "status": status }
    })
}

async fn mount_error(server: &MockServer, code: u16, message: &str, status: &str) {
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(code).set_body_json(error_body(code, message, status)))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Success path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sends_persona_utterance_and_generation_settings() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("x-goog-api-key", "test-key"))
        .and(
            body_partial_json(
                serde_json::json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Who is your CTO?" }] }],
                "generationConfig": {
                    "maxOutputTokens": GENERATION.max_output_tokens,
                    "topK": GENERATION.top_k
                }
            })
            )
        )
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body("Aubrey Gale Mendoza.")))
        .expect(1)
        .mount(&server).await;

    let reply = gateway_for(&server).respond("Who is your CTO?").await;

    assert_eq!(reply.origin, ReplyOrigin::Model);
    assert_eq!(reply.text, "Aubrey Gale Mendoza.");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let persona = body["systemInstruction"]["parts"][0]["text"].as_str().unwrap();
    assert!(persona.contains("PrimeAI"));
}

#[tokio::test]
async fn markup_laden_reply_is_cleaned() {
    let server = MockServer::start().await;
    let raw =
        "## Services\n\n\n\nWe offer **Intelligent Automation**, *AI Modernization* and `RPA`.\n\
         # Next steps\n_Book_ a consultation.\n\n\n\n";

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body(raw)))
        .mount(&server).await;

    let reply = gateway_for(&server).respond("What services do you offer?").await;

    assert_eq!(reply.origin, ReplyOrigin::Model);
    assert!(!reply.text.contains("**"));
    assert!(!reply.text.contains('*'));
    assert!(!reply.text.contains('`'));
    assert!(!reply.text.contains('_'));
    assert!(!reply.text.lines().any(|l| l.trim_start().starts_with('#')));
    assert!(!reply.text.contains("\n\n\n"));
    assert_eq!(
        reply.text,
        "Services\n\nWe offer Intelligent Automation, AI Modernization and RPA.\nNext steps\nBook a consultation."
    );
}

#[tokio::test]
async fn empty_candidate_yields_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(
                serde_json::json!({ "candidates": [{ "finishReason": "SAFETY" }] })
            )
        )
        .mount(&server).await;

    let reply = gateway_for(&server).respond("hello").await;
    assert_eq!(reply.origin, ReplyOrigin::Fallback);
    assert_eq!(reply.fallback, Some(FallbackKind::EmptyReply));
}

// ---------------------------------------------------------------------------
// Failure mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rate_limit_error_maps_to_quota_reply() {
    let server = MockServer::start().await;
    mount_error(&server, 429, "Rate limit exceeded for requests per minute", "RESOURCE_EXHAUSTED").await;

    let reply = gateway_for(&server).respond("hello").await;

    assert_eq!(reply.text, FallbackKind::Quota.text());
    assert_eq!(reply.fallback, Some(FallbackKind::Quota));
}

#[tokio::test]
async fn rejected_api_key_maps_to_authentication_reply() {
    let server = MockServer::start().await;
    mount_error(
        &server,
        400,
        "API key not valid. Please pass a valid API key.",
        "INVALID_ARGUMENT"
    ).await;

    let reply = gateway_for(&server).respond("hello").await;
    assert_eq!(reply.text, FallbackKind::Authentication.text());
}

#[tokio::test]
async fn unknown_model_maps_to_model_reply() {
    let server = MockServer::start().await;
    mount_error(
        &server,
        404,
        "models/gemini-2.5-flash is not found for API version v1beta",
        "NOT_FOUND"
    ).await;

    let reply = gateway_for(&server).respond("hello").await;
    assert_eq!(reply.text, FallbackKind::ModelUnavailable.text());
}

#[tokio::test]
async fn unclassified_error_maps_to_generic_reply() {
    let server = MockServer::start().await;
    mount_error(&server, 500, "Internal error encountered.", "INTERNAL").await;

    let reply = gateway_for(&server).respond("hello").await;
    assert_eq!(reply.text, FallbackKind::Generic.text());
}

#[tokio::test]
async fn non_json_error_body_is_still_classified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(503).set_body_string("quota gateway overloaded"))
        .mount(&server).await;

    let reply = gateway_for(&server).respond("hello").await;
    assert_eq!(reply.fallback, Some(FallbackKind::Quota));
}

#[tokio::test]
async fn slow_upstream_times_out_to_generic_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(text_body("too late"))
                .set_delay(Duration::from_secs(5))
        )
        .mount(&server).await;

    let config = LlmConfig {
        timeout: Duration::from_millis(200),
        ..config_for(&server)
    };
    let gateway = AssistantGateway::from_config(&config).unwrap();

    let reply = gateway.respond("hello").await;
    assert_eq!(reply.fallback, Some(FallbackKind::Generic));
}

#[tokio::test]
async fn unreachable_upstream_maps_to_generic_reply() {
    // Port 9 (discard) on loopback is not expected to accept connections.
    let config = LlmConfig {
        api_key: Some("test-key".into()),
        base_url: Some("http://127.0.0.1:9".into()),
        ..LlmConfig::default()
    };
    let gateway = AssistantGateway::from_config(&config).unwrap();

    let reply = gateway.respond("hello").await;
    // The request URL contains "models/", which must not be read as a model error.
    assert_eq!(reply.fallback, Some(FallbackKind::Generic));
}

// ---------------------------------------------------------------------------
// Missing credential
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_credential_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body("unreachable")))
        .expect(0)
        .mount(&server).await;

    for api_key in [None, Some(String::new()), Some("   ".to_string())] {
        let config = LlmConfig { api_key, ..config_for(&server) };
        let gateway = AssistantGateway::from_config(&config).unwrap();
        assert!(!gateway.is_configured());

        let reply = gateway.respond("hello").await;
        assert_eq!(reply.text, FallbackKind::NotConfigured.text());
    }

    assert!(server.received_requests().await.unwrap().is_empty());
}
