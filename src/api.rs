// 🌐 HTTP API - Axum router for receipt processing
//
// POST /receipts/process      -> {"id": "..."}
// GET  /receipts/:id/points   -> {"points": n}
// GET  /health                -> {"status": "ok"}

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::ScoreError;
use crate::model::Receipt;
use crate::scoring::{PointsScorer, ScoringPolicy};
use crate::store::ReceiptStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    store: Arc<ReceiptStore>,
    scorer: PointsScorer,
}

impl AppState {
    pub fn new(store: Arc<ReceiptStore>, policy: ScoringPolicy) -> Self {
        AppState {
            store,
            scorer: PointsScorer::new(policy),
        }
    }

    pub fn store(&self) -> &ReceiptStore {
        &self.store
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PointsResponse {
    pub points: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidJson(String),

    #[error(transparent)]
    Rejected(#[from] ScoreError),

    #[error("not found")]
    NotFound,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson(_) | ApiError::Rejected(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidJson(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /health - Health check
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /receipts/process - Store a receipt and return its id
async fn process_receipt(
    State(state): State<AppState>,
    payload: Result<Json<Receipt>, JsonRejection>,
) -> Result<Json<IdResponse>, ApiError> {
    let Json(receipt) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected receipt payload");
        ApiError::from(rejection)
    })?;

    // Strict scoring refuses receipts it could not score later
    if state.scorer.policy() == ScoringPolicy::Strict {
        if let Err(e) = state.scorer.score(&receipt) {
            warn!(error = %e, retailer = %receipt.retailer, "Rejected unscorable receipt");
            return Err(e.into());
        }
    }

    let id = state.store.insert(receipt);
    info!(%id, "Processed receipt");

    Ok(Json(IdResponse { id }))
}

/// GET /receipts/:id/points - Score a stored receipt
async fn get_points(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PointsResponse>, ApiError> {
    let receipt = state.store.get(&id).ok_or(ApiError::NotFound)?;
    let points = state.scorer.score(&receipt)?;

    Ok(Json(PointsResponse { points }))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/receipts/process", post(process_receipt))
        .route("/receipts/:id/points", get(get_points))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    const TARGET_RECEIPT: &str = include_str!("../fixtures/target_receipt.json");
    const CORNER_MARKET_RECEIPT: &str = include_str!("../fixtures/mm_corner_market.json");

    fn create_test_app(policy: ScoringPolicy) -> (Router, AppState) {
        let state = AppState::new(Arc::new(ReceiptStore::new()), policy);
        (router(state.clone()), state)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn parse<T: DeserializeOwned>(body: &[u8]) -> T {
        serde_json::from_slice(body).unwrap()
    }

    fn post_receipt(json: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/receipts/process")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap()
    }

    fn get_points_request(id: &str) -> Request<Body> {
        Request::builder()
            .uri(format!("/receipts/{}/points", id))
            .body(Body::empty())
            .unwrap()
    }

    async fn process_and_score(app: &Router, json: &str) -> u64 {
        let (status, body) = send(app, post_receipt(json)).await;
        assert_eq!(status, StatusCode::OK);
        let IdResponse { id } = parse(&body);

        let (status, body) = send(app, get_points_request(&id)).await;
        assert_eq!(status, StatusCode::OK);
        parse::<PointsResponse>(&body).points
    }

    #[tokio::test]
    async fn test_target_receipt_scores_28() {
        let (app, _) = create_test_app(ScoringPolicy::Lenient);
        assert_eq!(process_and_score(&app, TARGET_RECEIPT).await, 28);
    }

    #[tokio::test]
    async fn test_corner_market_receipt_scores_109() {
        let (app, _) = create_test_app(ScoringPolicy::Lenient);
        assert_eq!(process_and_score(&app, CORNER_MARKET_RECEIPT).await, 109);
    }

    #[tokio::test]
    async fn test_process_stores_receipt() {
        let (app, state) = create_test_app(ScoringPolicy::Lenient);

        let (_, body) = send(&app, post_receipt(TARGET_RECEIPT)).await;
        let IdResponse { id } = parse(&body);

        let stored = state.store().get(&id).unwrap();
        assert_eq!(stored.retailer, "Target");
        assert_eq!(stored.items.len(), 5);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (app, state) = create_test_app(ScoringPolicy::Lenient);

        let (status, body) = send(&app, post_receipt("{\"retailer\": ")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!parse::<ErrorResponse>(&body).error.is_empty());
        assert!(state.store().is_empty());
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let (app, _) = create_test_app(ScoringPolicy::Lenient);

        let (status, body) = send(&app, post_receipt(r#"{"retailer": "Target"}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(parse::<ErrorResponse>(&body).error.contains("purchaseDate"));
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let (app, _) = create_test_app(ScoringPolicy::Lenient);

        let (status, body) = send(&app, get_points_request("no-such-receipt")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(parse::<ErrorResponse>(&body).error, "not found");
    }

    #[tokio::test]
    async fn test_lenient_accepts_unparsable_total() {
        let (app, _) = create_test_app(ScoringPolicy::Lenient);
        let json = CORNER_MARKET_RECEIPT.replace("\"9.00\"", "\"nine\"");

        // Total is checked as zero cents, so it still earns 75
        assert_eq!(process_and_score(&app, &json).await, 109);
    }

    #[tokio::test]
    async fn test_strict_rejects_unparsable_total() {
        let (app, state) = create_test_app(ScoringPolicy::Strict);
        let json = CORNER_MARKET_RECEIPT.replace("\"9.00\"", "\"nine\"");

        let (status, body) = send(&app, post_receipt(&json)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(parse::<ErrorResponse>(&body).error.contains("nine"));
        assert!(state.store().is_empty());
    }

    #[tokio::test]
    async fn test_points_are_stable_across_lookups() {
        let (app, _) = create_test_app(ScoringPolicy::Lenient);

        let (_, body) = send(&app, post_receipt(TARGET_RECEIPT)).await;
        let IdResponse { id } = parse(&body);

        let (_, first) = send(&app, get_points_request(&id)).await;
        let (_, second) = send(&app, get_points_request(&id)).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _) = create_test_app(ScoringPolicy::Lenient);
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse::<serde_json::Value>(&body)["status"], "ok");
    }
}
