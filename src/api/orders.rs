//! Order history and checkout.

use super::{
    AppState,
    extract::{ApiJson, UserContext},
};
use crate::{core::order::NewOrder, entities::order, errors::Result};
use axum::{Json, Router, extract::State, routing::get};
use tracing::info;

pub(super) fn routes() -> Router<AppState> {
    Router::new().route("/api/orders", get(list_orders).post(create_order))
}

async fn list_orders(
    State(state): State<AppState>,
    caller: UserContext,
) -> Result<Json<Vec<order::Model>>> {
    Ok(Json(state.storage.list_orders(caller.user_id).await?))
}

/// Checkout. A body without `items` orders the current cart.
async fn create_order(
    State(state): State<AppState>,
    caller: UserContext,
    ApiJson(body): ApiJson<NewOrder>,
) -> Result<Json<order::Model>> {
    let created = state.storage.create_order(caller.user_id, body).await?;
    info!(
        user_id = caller.user_id,
        order_id = created.id,
        total = %created.total,
        "Order placed"
    );
    Ok(Json(created))
}
