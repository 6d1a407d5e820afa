//! HTTP mapping of [`Error`].
//!
//! Client mistakes become 400 or 404 with the error text; everything else is
//! logged and reported as a generic 500.

use crate::errors::Error;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::Validation { message } => {
                tracing::warn!("Rejected request: {message}");
                let body = Json(json!({
                    "message": message,
                    "errors": [message],
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            Self::NotFound { entity, id } => {
                let body = Json(json!({
                    "message": format!("{} not found", capitalize(entity)),
                    "id": id,
                }));
                (StatusCode::NOT_FOUND, body).into_response()
            }
            other => {
                tracing::error!("Request failed: {other}");
                let body = Json(json!({ "message": "Internal Server Error" }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}
