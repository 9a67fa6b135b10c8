//! REST API Server for the transaction bot
//!
//! Exposes the classifier and the message intake via HTTP endpoints, so a
//! chat transport (or any other client) can forward messages here.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::classifier::TransactionClassifier;
use crate::intake::MessageIntake;
use crate::lexicon::LexiconConfig;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TextRequest {
    pub text: String,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub intake: Arc<MessageIntake>,
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Classification Endpoints
/// =============================

/// Classify only; nothing is booked
async fn parse_text(
    State(state): State<ApiState>,
    Json(req): Json<TextRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let parsed = state.intake.classify(&req.text).await;
    (StatusCode::OK, Json(ApiResponse::success(parsed)))
}

/// Full message handling: commands, booking, confirmation prompts
async fn handle_message(
    State(state): State<ApiState>,
    Json(req): Json<TextRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    info!("Received message: {}", req.text);
    let outcome = state.intake.handle(&req.text).await;
    (StatusCode::OK, Json(ApiResponse::success(outcome)))
}

/// =============================
/// Ledger Endpoints
/// =============================

async fn balances(State(state): State<ApiState>) -> (StatusCode, Json<ApiResponse>) {
    match state.intake.ledger().balances().await {
        Ok(balances) => (StatusCode::OK, Json(ApiResponse::success(balances))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to read balances: {}", e))),
        ),
    }
}

/// =============================
/// Lexicon Endpoint
/// =============================

/// Replace the whole lexicon. In-flight classifications finish on the old one.
async fn replace_lexicon(
    State(state): State<ApiState>,
    Json(lexicon): Json<LexiconConfig>,
) -> (StatusCode, Json<ApiResponse>) {
    let classifier = lexicon
        .validate()
        .and_then(|_| TransactionClassifier::new(lexicon));

    match classifier {
        Ok(classifier) => {
            let summary = serde_json::json!({
                "categories": classifier.lexicon().categories.len(),
                "accounts": classifier.lexicon().accounts.len(),
                "alias_collisions": classifier.lexicon().alias_collisions().len(),
            });
            state.intake.replace_classifier(classifier).await;
            (StatusCode::OK, Json(ApiResponse::success(summary)))
        }
        Err(e) => {
            warn!(error = %e, "Rejected lexicon update");
            (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e.to_string())))
        }
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(intake: Arc<MessageIntake>) -> Router {
    let state = ApiState { intake };

    Router::new()
        .route("/health", get(health))
        .route("/api/parse", post(parse_text))
        .route("/api/messages", post(handle_message))
        .route("/api/balances", get(balances))
        .route("/api/lexicon", put(replace_lexicon))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    intake: Arc<MessageIntake>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(intake);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
