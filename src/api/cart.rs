//! Cart routes.

use super::{
    AppState, Success,
    extract::{ApiJson, ApiPath, UserContext},
};
use crate::{
    core::cart::CartLine,
    entities::cart_item,
    errors::{Error, Result},
};
use axum::{
    Json, Router,
    extract::State,
    routing::{get, put},
};
use serde::Deserialize;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/cart", get(list_cart).post(add_to_cart).delete(clear_cart))
        .route("/api/cart/:id", put(update_cart_item).delete(remove_from_cart))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddToCart {
    product_id: i64,
    #[serde(default = "one")]
    quantity: i32,
}

const fn one() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
struct UpdateQuantity {
    quantity: i32,
}

async fn list_cart(
    State(state): State<AppState>,
    caller: UserContext,
) -> Result<Json<Vec<CartLine>>> {
    Ok(Json(state.storage.list_cart(caller.user_id).await?))
}

async fn add_to_cart(
    State(state): State<AppState>,
    caller: UserContext,
    ApiJson(body): ApiJson<AddToCart>,
) -> Result<Json<cart_item::Model>> {
    let item = state
        .storage
        .add_to_cart(caller.user_id, body.product_id, body.quantity)
        .await?;
    Ok(Json(item))
}

async fn update_cart_item(
    State(state): State<AppState>,
    caller: UserContext,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<UpdateQuantity>,
) -> Result<Json<cart_item::Model>> {
    state
        .storage
        .update_cart_item(caller.user_id, id, body.quantity)
        .await?
        .map(Json)
        .ok_or_else(|| Error::not_found("cart item", id))
}

async fn remove_from_cart(
    State(state): State<AppState>,
    caller: UserContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Success>> {
    if state.storage.remove_from_cart(caller.user_id, id).await? {
        Ok(Json(Success::default()))
    } else {
        Err(Error::not_found("cart item", id))
    }
}

async fn clear_cart(State(state): State<AppState>, caller: UserContext) -> Result<Json<Success>> {
    state.storage.clear_cart(caller.user_id).await?;
    Ok(Json(Success::default()))
}
