//! HTTP surface tests: the router is driven in-process with `oneshot`.

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use catat_keuangan::{
    api::create_router, config::IntakePolicy, intake::MessageIntake, ledger::InMemoryLedger,
    LexiconConfig, TransactionClassifier,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn router() -> Router {
    let intake = MessageIntake::new(
        TransactionClassifier::new(LexiconConfig::indonesian()).unwrap(),
        Arc::new(InMemoryLedger::new()),
        IntakePolicy::default(),
    );
    create_router(Arc::new(intake))
}

async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(body) => Body::from(body.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (status, body) = call(&router(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_parse_endpoint_returns_reading() {
    let (status, body) = call(
        &router(),
        Method::POST,
        "/api/parse",
        Some(json!({ "text": "Gaji masuk 2jt di BCA" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["type"], "income");
    assert_eq!(body["data"]["amount"], 2_000_000);
    assert_eq!(body["data"]["source_account"], "BCA");
    assert_eq!(body["data"]["confidence"], 35);
}

#[tokio::test]
async fn test_message_is_booked_and_balance_moves() {
    let router = router();

    let (_, body) = call(
        &router,
        Method::POST,
        "/api/messages",
        Some(json!({ "text": "Beli makan siang 20rb di BRI" })),
    )
    .await;
    assert_eq!(body["data"]["outcome"], "recorded");
    assert!(body["data"]["reply"].as_str().unwrap().contains("Rp 20.000"));

    let (status, body) = call(&router, Method::GET, "/api/balances", None).await;
    assert_eq!(status, StatusCode::OK);
    let bri = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["account"] == "BRI")
        .unwrap();
    assert_eq!(bri["balance"], -20_000);
}

#[tokio::test]
async fn test_lexicon_replacement() {
    let router = router();

    let mut lexicon = LexiconConfig::indonesian();
    lexicon.categories[0].keywords.push("gudeg".to_string());
    let (status, body) = call(
        &router,
        Method::PUT,
        "/api/lexicon",
        Some(serde_json::to_value(&lexicon).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["alias_collisions"], 0);

    let (_, body) = call(
        &router,
        Method::POST,
        "/api/parse",
        Some(json!({ "text": "nasi gudeg 35rb" })),
    )
    .await;
    assert_eq!(body["data"]["category"], "makan");

    lexicon.accounts.clear();
    let (status, body) = call(
        &router,
        Method::PUT,
        "/api/lexicon",
        Some(serde_json::to_value(&lexicon).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}
