//! HTTP API served from `server::api::router` on an ephemeral port.

use std::sync::Arc;

use wiremock::matchers::{ method, path };
use wiremock::{ Mock, MockServer, ResponseTemplate };

use prime_assistant::assistant::{ AssistantGateway, FallbackKind, ReplyOrigin };
use prime_assistant::llm::LlmConfig;
use prime_assistant::server::api::{ router, AskResponse, HealthResponse };

async fn start(gateway: AssistantGateway) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(Arc::new(gateway));
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn health_reports_missing_credential() {
    let base = start(AssistantGateway::new(None)).await;

    let health: HealthResponse = reqwest
        ::get(format!("{}/api/health", base)).await
        .unwrap()
        .json().await
        .unwrap();

    assert_eq!(health.status, "ok");
    assert!(!health.assistant_configured);
    assert_eq!(health.model, "gemini-2.5-flash");
}

#[tokio::test]
async fn ask_returns_cleaned_model_reply() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(
                serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "### Yes\nWe build **web apps**." }] } }]
            })
            )
        )
        .expect(1)
        .mount(&upstream).await;

    let config = LlmConfig {
        api_key: Some("test-key".into()),
        base_url: Some(upstream.uri()),
        ..LlmConfig::default()
    };
    let base = start(AssistantGateway::from_config(&config).unwrap()).await;

    let resp: AskResponse = reqwest::Client
        ::new()
        .post(format!("{}/api/ask", base))
        .json(&serde_json::json!({ "message": " Do you build web apps? " }))
        .send().await
        .unwrap()
        .json().await
        .unwrap();

    assert_eq!(resp.origin, ReplyOrigin::Model);
    assert_eq!(resp.reply, "Yes\nWe build web apps.");
    assert!(resp.fallback.is_none());
}

#[tokio::test]
async fn ask_without_credential_returns_setup_notice() {
    let base = start(AssistantGateway::new(None)).await;

    let resp: AskResponse = reqwest::Client
        ::new()
        .post(format!("{}/api/ask", base))
        .json(&serde_json::json!({ "message": "hello" }))
        .send().await
        .unwrap()
        .json().await
        .unwrap();

    assert_eq!(resp.origin, ReplyOrigin::Fallback);
    assert_eq!(resp.fallback, Some(FallbackKind::NotConfigured));
    assert_eq!(resp.reply, FallbackKind::NotConfigured.text());
}

#[tokio::test]
async fn ask_rejects_blank_message() {
    let base = start(AssistantGateway::new(None)).await;

    let status = reqwest::Client
        ::new()
        .post(format!("{}/api/ask", base))
        .json(&serde_json::json!({ "message": "   " }))
        .send().await
        .unwrap()
        .status();

    assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
}
