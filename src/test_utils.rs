//! Shared test utilities for the storefront.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test rows with sensible defaults.

use crate::{
    core::{
        account::NewUser,
        catalog::{NewCategory, NewProduct},
    },
    entities::{category, product, user},
    errors::Result,
    storage::{DatabaseStorage, Storage},
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A [`DatabaseStorage`] over a fresh in-memory database.
pub async fn database_storage() -> Result<DatabaseStorage> {
    Ok(DatabaseStorage::new(setup_test_db().await?))
}

/// Product input with sensible defaults.
///
/// # Defaults
/// * `price`: "2.99"
/// * `carbon_footprint`: "0.50"
/// * `eco_rating`: 4
/// * `stock`: 10
/// * no category, not organic, not local
#[must_use]
pub fn sample_new_product(name: &str) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: "Everyday pantry staple".to_string(),
        price: "2.99".to_string(),
        original_price: None,
        image_url: String::new(),
        category_id: None,
        carbon_footprint: "0.5".to_string(),
        eco_rating: 4,
        stock: 10,
        is_organic: false,
        is_local: false,
        is_fair_trade: false,
        is_reusable: false,
        is_biodegradable: false,
        expiry_discount: None,
        expiry_days: None,
        provenance: None,
    }
}

/// Creates a test user named `username` with an `@ecomart.test` address.
pub async fn create_test_user(storage: &dyn Storage, username: &str) -> Result<user::Model> {
    storage
        .create_user(NewUser {
            username: username.to_string(),
            email: format!("{username}@ecomart.test"),
            budget: None,
        })
        .await
}

/// Creates a test category with a fixed icon and color.
pub async fn create_test_category(
    storage: &dyn Storage,
    name: &str,
) -> Result<category::Model> {
    storage
        .create_category(NewCategory {
            name: name.to_string(),
            icon: "leaf".to_string(),
            color: "green".to_string(),
        })
        .await
}

/// Creates a test product from [`sample_new_product`].
pub async fn create_test_product(storage: &dyn Storage, name: &str) -> Result<product::Model> {
    storage.create_product(sample_new_product(name)).await
}

/// Creates a test product with custom parameters.
/// Use this when a test depends on category, stock or the organic flag.
pub async fn create_custom_product(
    storage: &dyn Storage,
    name: &str,
    category_id: Option<i64>,
    stock: i32,
    is_organic: bool,
) -> Result<product::Model> {
    storage
        .create_product(NewProduct {
            category_id,
            stock,
            is_organic,
            ..sample_new_product(name)
        })
        .await
}
