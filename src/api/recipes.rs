//! Recipe routes.

use super::{AppState, extract::ApiPath};
use crate::{
    entities::recipe,
    errors::{Error, Result},
};
use axum::{Json, Router, extract::State, routing::get};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/recipes", get(list_recipes))
        .route("/api/recipes/:id", get(get_recipe))
        .route("/api/recipes/by-product/:product_id", get(recipes_using_product))
}

async fn list_recipes(State(state): State<AppState>) -> Result<Json<Vec<recipe::Model>>> {
    Ok(Json(state.storage.list_recipes().await?))
}

async fn get_recipe(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<recipe::Model>> {
    state
        .storage
        .get_recipe(id)
        .await?
        .map(Json)
        .ok_or_else(|| Error::not_found("recipe", id))
}

async fn recipes_using_product(
    State(state): State<AppState>,
    ApiPath(product_id): ApiPath<i64>,
) -> Result<Json<Vec<recipe::Model>>> {
    Ok(Json(state.storage.recipes_using_product(product_id).await?))
}
