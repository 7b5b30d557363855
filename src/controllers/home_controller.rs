use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "API is working", body = String))
)]
pub async fn home() -> impl IntoResponse {
    (StatusCode::OK, "Blockchain price tracker is running")
}

pub async fn health_db(State(state): State<AppState>) -> Response {
    match state.prices.ping().await {
        Ok(()) => (StatusCode::OK, "mongo: ok".to_string()).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("mongo error: {}", e),
        )
            .into_response(),
    }
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "statusCode": 404, "error": "Not Found" })),
    )
}
