//! Request extractors: caller identity and body/path/query wrappers whose
//! rejections use the JSON error shape.

use super::AppState;
use crate::errors::Error;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user a request acts on behalf of.
///
/// Taken from the `x-user-id` header, or the configured demo user when the
/// header is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserContext {
    /// Caller's user id
    pub user_id: i64,
}

#[async_trait]
impl FromRequestParts<AppState> for UserContext {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Error> {
        let Some(value) = parts.headers.get(USER_ID_HEADER) else {
            return Ok(Self {
                user_id: state.demo_user_id,
            });
        };

        value
            .to_str()
            .ok()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .map(|user_id| Self { user_id })
            .ok_or_else(|| Error::validation(format!("{USER_ID_HEADER} must be an integer")))
    }
}

/// JSON body extractor that rejects with a 400 `{message}` body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// Path extractor that rejects with a 400 `{message}` body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct ApiPath<T>(pub T);

/// Query extractor that rejects with a 400 `{message}` body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct ApiQuery<T>(pub T);
