//! JSON REST API over a [`Storage`] adapter.
//!
//! Handlers stay thin: they resolve the caller, call one storage operation
//! and serialize the result. Errors go through the `IntoResponse`
//! implementation in [`error`].

mod cart;
mod error;
pub mod extract;
mod garden;
mod notifications;
mod orders;
mod products;
mod recipes;
mod user;

use crate::storage::Storage;
use axum::{Json, Router, routing::get};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Backing store
    pub storage: Arc<dyn Storage>,
    /// User that requests without an `x-user-id` header act as
    pub demo_user_id: i64,
}

impl AppState {
    /// Bundles a store with the fallback caller id.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, demo_user_id: i64) -> Self {
        Self {
            storage,
            demo_user_id,
        }
    }
}

/// `{"success": true}` acknowledgement for deletes and flag updates.
#[derive(Debug, Serialize)]
struct Success {
    success: bool,
}

impl Default for Success {
    fn default() -> Self {
        Self { success: true }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(products::routes())
        .merge(cart::routes())
        .merge(recipes::routes())
        .merge(user::routes())
        .merge(notifications::routes())
        .merge(garden::routes())
        .merge(orders::routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        errors::Result,
        storage::MemoryStorage,
        test_utils::{create_custom_product, create_test_product, create_test_user},
    };
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    async fn test_app() -> Result<(Router, Arc<MemoryStorage>)> {
        let storage = Arc::new(MemoryStorage::new());
        create_test_user(storage.as_ref(), "eco_shopper").await?;
        create_custom_product(storage.as_ref(), "Organic Tomatoes", None, 10, true).await?;
        create_test_product(storage.as_ref(), "Bamboo Toothbrush").await?;
        let state = AppState::new(Arc::clone(&storage) as Arc<dyn Storage>, 1);
        Ok((router(state), storage))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn with_json(method: &str, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() -> Result<()> {
        let (app, _) = test_app().await?;
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_product_is_404_with_message() -> Result<()> {
        let (app, _) = test_app().await?;
        let (status, body) = send(&app, get("/api/products/999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Product not found");
        Ok(())
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_400() -> Result<()> {
        let (app, _) = test_app().await?;
        let (status, body) = send(&app, get("/api/products/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
        Ok(())
    }

    #[tokio::test]
    async fn test_product_search_uses_camel_case() -> Result<()> {
        let (app, _) = test_app().await?;
        let (status, body) = send(&app, get("/api/products?search=tomato&category=7")).await;
        assert_eq!(status, StatusCode::OK);
        let products = body.as_array().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["name"], "Organic Tomatoes");
        assert_eq!(products[0]["isOrganic"], true);
        assert_eq!(products[0]["carbonFootprint"], "0.50");
        Ok(())
    }

    #[tokio::test]
    async fn test_bad_budget_is_400() -> Result<()> {
        let (app, _) = test_app().await?;
        let (status, body) = send(
            &app,
            with_json("PUT", "/api/user/budget", &json!({ "budget": "-5.00" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["errors"].is_array());

        let (status, body) = send(
            &app,
            with_json("PUT", "/api/user/budget", &json!({ "budget": "42.50" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["budget"], "42.50");
        Ok(())
    }

    #[tokio::test]
    async fn test_cart_add_awards_points_and_checkout_drains_cart() -> Result<()> {
        let (app, storage) = test_app().await?;

        let (status, item) = send(
            &app,
            with_json("POST", "/api/cart", &json!({ "productId": 1, "quantity": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(item["quantity"], 2);

        let (_, cart) = send(&app, get("/api/cart")).await;
        assert_eq!(cart[0]["product"]["name"], "Organic Tomatoes");
        assert_eq!(cart[0]["productId"], 1);

        let (_, user) = send(&app, get("/api/user")).await;
        assert_eq!(user["ecoPoints"], 10);
        assert_eq!(user["nextLevelAt"], 200);

        let (status, order) = send(&app, with_json("POST", "/api/orders", &json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(order["total"], "5.98");
        assert_eq!(order["items"][0]["productName"], "Organic Tomatoes");

        assert!(storage.list_cart(1).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_eco_action_returns_progress() -> Result<()> {
        let (app, _) = test_app().await?;
        let request = Request::builder()
            .method("POST")
            .uri("/api/eco-action")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Eco action rewarded successfully!");
        assert_eq!(body["progress"]["ecoBadges"], 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_user_header_selects_the_caller() -> Result<()> {
        let (app, storage) = test_app().await?;
        let other = create_test_user(storage.as_ref(), "other").await?;

        let request = Request::builder()
            .uri("/api/user")
            .header("x-user-id", other.id.to_string())
            .body(Body::empty())
            .unwrap();
        let (_, body) = send(&app, request).await;
        assert_eq!(body["username"], "other");

        let request = Request::builder()
            .uri("/api/user")
            .header("x-user-id", "nobody")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let request = Request::builder()
            .uri("/api/user")
            .header("x-user-id", "404")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn test_notification_flow() -> Result<()> {
        let (app, _) = test_app().await?;

        let (status, created) = send(
            &app,
            with_json(
                "POST",
                "/api/notifications",
                &json!({ "type": "deal", "title": "Half price", "message": "Oat milk" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["type"], "deal");
        assert_eq!(created["isRead"], false);

        let (_, unread) = send(&app, get("/api/notifications/unread-count")).await;
        assert_eq!(unread["count"], 1);

        let uri = format!("/api/notifications/{}/read", created["id"]);
        let request = Request::builder()
            .method("PUT")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (_, unread) = send(&app, get("/api/notifications/unread-count")).await;
        assert_eq!(unread["count"], 0);

        let (status, _) = send(
            &app,
            with_json(
                "POST",
                "/api/notifications",
                &json!({ "type": "spam", "title": "x", "message": "y" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn test_removing_missing_cart_row_is_404() -> Result<()> {
        let (app, _) = test_app().await?;
        let request = Request::builder()
            .method("DELETE")
            .uri("/api/cart/42")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Cart item not found");
        Ok(())
    }

    #[tokio::test]
    async fn test_garden_log_round_trip() -> Result<()> {
        let (app, _) = test_app().await?;
        let (status, entry) = send(
            &app,
            with_json(
                "POST",
                "/api/garden",
                &json!({ "plantType": "sunflower", "ecoAction": "reusable bag" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(entry["plantType"], "sunflower");

        let (_, log) = send(&app, get("/api/garden")).await;
        assert_eq!(log.as_array().unwrap().len(), 1);
        Ok(())
    }
}
