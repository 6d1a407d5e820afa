//! Notification routes.

use super::{
    AppState, Success,
    extract::{ApiJson, ApiPath, UserContext},
};
use crate::{
    core::notification::NewNotification,
    entities::notification,
    errors::{Error, Result},
};
use axum::{
    Json, Router,
    extract::State,
    routing::{get, put},
};
use serde::Serialize;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/notifications",
            get(list_notifications).post(create_notification),
        )
        .route("/api/notifications/unread-count", get(unread_count))
        .route("/api/notifications/:id/read", put(mark_read))
}

#[derive(Debug, Serialize)]
struct UnreadCount {
    count: u64,
}

async fn list_notifications(
    State(state): State<AppState>,
    caller: UserContext,
) -> Result<Json<Vec<notification::Model>>> {
    Ok(Json(state.storage.list_notifications(caller.user_id).await?))
}

async fn create_notification(
    State(state): State<AppState>,
    caller: UserContext,
    ApiJson(body): ApiJson<NewNotification>,
) -> Result<Json<notification::Model>> {
    let created = state
        .storage
        .create_notification(caller.user_id, body)
        .await?;
    Ok(Json(created))
}

async fn unread_count(State(state): State<AppState>, caller: UserContext) -> Result<Json<UnreadCount>> {
    let count = state
        .storage
        .unread_notification_count(caller.user_id)
        .await?;
    Ok(Json(UnreadCount { count }))
}

async fn mark_read(
    State(state): State<AppState>,
    caller: UserContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Success>> {
    if state
        .storage
        .mark_notification_read(caller.user_id, id)
        .await?
    {
        Ok(Json(Success::default()))
    } else {
        Err(Error::not_found("notification", id))
    }
}
