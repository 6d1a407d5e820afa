//! Garden log routes.

use super::{
    AppState,
    extract::{ApiJson, UserContext},
};
use crate::{entities::garden_progress, errors::Result};
use axum::{Json, Router, extract::State, routing::get};
use serde::Deserialize;

pub(super) fn routes() -> Router<AppState> {
    Router::new().route("/api/garden", get(list_progress).post(add_progress))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewGardenEntry {
    plant_type: String,
    eco_action: String,
}

async fn list_progress(
    State(state): State<AppState>,
    caller: UserContext,
) -> Result<Json<Vec<garden_progress::Model>>> {
    Ok(Json(state.storage.garden_progress(caller.user_id).await?))
}

async fn add_progress(
    State(state): State<AppState>,
    caller: UserContext,
    ApiJson(body): ApiJson<NewGardenEntry>,
) -> Result<Json<garden_progress::Model>> {
    let entry = state
        .storage
        .add_garden_progress(caller.user_id, &body.plant_type, &body.eco_action)
        .await?;
    Ok(Json(entry))
}
