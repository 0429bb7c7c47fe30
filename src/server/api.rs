use crate::assistant::{ AssistantGateway, FallbackKind, ReplyOrigin };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Router,
    extract::State,
    response::IntoResponse,
    http::StatusCode,
    Json,
};
use serde::{ Deserialize, Serialize };
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, error };

#[derive(Deserialize)]
pub struct AskRequest {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AskResponse {
    pub reply: String,
    pub origin: ReplyOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackKind>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub assistant_configured: bool,
    pub model: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Clone)]
struct AppState {
    gateway: Arc<AssistantGateway>,
}

pub fn router(gateway: Arc<AssistantGateway>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/ask", post(ask_handler))
        .layer(cors)
        .with_state(AppState { gateway })
}

pub async fn start_http_server(
    http_port: u16,
    gateway: Arc<AssistantGateway>
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = format!("0.0.0.0:{}", http_port).parse::<SocketAddr>()?;
    info!("Starting HTTP API server on: http://{}", addr);

    let app = router(gateway);

    tokio::spawn(async move {
        match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => {
                if let Err(e) = axum::serve(listener, app.into_make_service()).await {
                    error!("HTTP server error: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e);
            }
        }
    });

    info!("HTTP server started");
    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".into(),
        assistant_configured: state.gateway.is_configured(),
        model: state.gateway.model(),
    })
}

/// Stateless single question: nothing is remembered between calls.
async fn ask_handler(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>
) -> impl IntoResponse {
    let utterance = req.message.trim();
    if utterance.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse { error: "message is empty".into() }),
        ).into_response();
    }

    let reply = state.gateway.respond(utterance).await;
    (
        StatusCode::OK,
        Json(AskResponse {
            reply: reply.text,
            origin: reply.origin,
            fallback: reply.fallback,
        }),
    ).into_response()
}
