//! Catalog routes: products, categories and eco swaps.

use super::{
    AppState,
    extract::{ApiPath, ApiQuery},
};
use crate::{
    core::catalog::{EcoSwapSuggestion, ProductFilter},
    entities::{category, product},
    errors::{Error, Result},
};
use axum::{Json, Router, extract::State, routing::get};
use serde::Deserialize;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products))
        .route("/api/products/:id", get(get_product))
        .route("/api/categories", get(list_categories))
        .route("/api/eco-swaps/:product_id", get(eco_swaps))
}

#[derive(Debug, Deserialize)]
struct ProductQuery {
    category: Option<i64>,
    search: Option<String>,
}

async fn list_products(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProductQuery>,
) -> Result<Json<Vec<product::Model>>> {
    let filter = ProductFilter::from_query(query.category, query.search.as_deref());
    Ok(Json(state.storage.list_products(&filter).await?))
}

async fn get_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<product::Model>> {
    state
        .storage
        .get_product(id)
        .await?
        .map(Json)
        .ok_or_else(|| Error::not_found("product", id))
}

async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<category::Model>>> {
    Ok(Json(state.storage.list_categories().await?))
}

async fn eco_swaps(
    State(state): State<AppState>,
    ApiPath(product_id): ApiPath<i64>,
) -> Result<Json<Vec<EcoSwapSuggestion>>> {
    Ok(Json(state.storage.eco_swaps(product_id).await?))
}
