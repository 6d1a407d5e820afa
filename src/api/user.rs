//! Caller profile and Progress Ledger routes.

use super::{
    AppState,
    extract::{ApiJson, UserContext},
};
use crate::{
    core::ledger::{self, EcoProgress},
    entities::user,
    errors::{Error, Result},
};
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use tracing::info;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/user", get(get_user))
        .route("/api/user/budget", put(update_budget))
        .route("/api/user/co2", post(record_co2_saving))
        .route("/api/eco-action", post(reward_eco_action))
        .route("/api/eco-choice", post(reward_eco_action))
}

/// A user together with the eco-point total that unlocks the next garden level.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserProfile {
    #[serde(flatten)]
    user: user::Model,
    next_level_at: i32,
}

impl From<user::Model> for UserProfile {
    fn from(user: user::Model) -> Self {
        let next_level_at = ledger::level_threshold(user.garden_level);
        Self {
            user,
            next_level_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct BudgetUpdate {
    budget: String,
}

#[derive(Debug, Deserialize)]
struct Co2Saving {
    amount: String,
}

#[derive(Debug, Serialize)]
struct EcoActionReward {
    message: &'static str,
    progress: EcoProgress,
}

async fn get_user(State(state): State<AppState>, caller: UserContext) -> Result<Json<UserProfile>> {
    state
        .storage
        .get_user(caller.user_id)
        .await?
        .map(|user| Json(user.into()))
        .ok_or_else(|| Error::not_found("user", caller.user_id))
}

async fn update_budget(
    State(state): State<AppState>,
    caller: UserContext,
    ApiJson(body): ApiJson<BudgetUpdate>,
) -> Result<Json<UserProfile>> {
    let user = state
        .storage
        .update_budget(caller.user_id, &body.budget)
        .await?;
    Ok(Json(user.into()))
}

async fn record_co2_saving(
    State(state): State<AppState>,
    caller: UserContext,
    ApiJson(body): ApiJson<Co2Saving>,
) -> Result<Json<UserProfile>> {
    let user = state
        .storage
        .record_co2_saving(caller.user_id, &body.amount)
        .await?;
    Ok(Json(user.into()))
}

async fn reward_eco_action(
    State(state): State<AppState>,
    caller: UserContext,
) -> Result<Json<EcoActionReward>> {
    let progress = state.storage.reward_eco_action(caller.user_id).await?;
    info!(user_id = caller.user_id, ?progress, "Eco action rewarded");
    Ok(Json(EcoActionReward {
        message: "Eco action rewarded successfully!",
        progress,
    }))
}
