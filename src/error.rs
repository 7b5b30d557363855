use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Field name => human readable message. `_form` holds errors that are not
/// tied to a single field.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("db error: {0}")]
    Db(#[from] mongodb::error::Error),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("MORALIS_API_KEY is missing in .env")]
    MissingKey,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("price provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid price data for {0}")]
    InvalidPrice(String),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid address {0}")]
    Address(String),

    #[error("template error: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error("mail transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(FieldErrors),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "statusCode": 400,
                    "error": "Bad Request",
                    "message": errors,
                })),
            )
                .into_response(),
            other => {
                tracing::error!("request failed: {other}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "statusCode": 500,
                        "error": "Internal Server Error",
                    })),
                )
                    .into_response()
            }
        }
    }
}
