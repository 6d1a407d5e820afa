//! Storage layer - the contract every backing store implements.
//!
//! Two adapters implement [`Storage`]: [`MemoryStorage`] keeps every table in
//! process memory, [`DatabaseStorage`] persists through `SeaORM`. Both run
//! multi-row operations (cart adds with their stock and eco-point side
//! effects, checkout with its cart drain, ledger updates) as one atomic unit.
//!
//! User-scoped operations take the caller's id explicitly; nothing in this
//! layer assumes a particular user.

pub mod database;
pub mod memory;
pub mod seed;


pub use database::DatabaseStorage;
pub use memory::MemoryStorage;

use crate::{
    core::{
        account::NewUser,
        cart::CartLine,
        catalog::{EcoSwapSuggestion, NewCategory, NewEcoSwap, NewProduct, NewRecipe, ProductFilter},
        ledger::EcoProgress,
        notification::NewNotification,
        order::NewOrder,
    },
    entities::{
        cart_item, category, eco_swap, garden_progress, notification, order, product, recipe, user,
    },
    errors::Result,
};
use async_trait::async_trait;

/// Operations over users, the catalog, carts, orders and the garden log.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Short name of the adapter, used in logs.
    fn backend_tag(&self) -> &'static str;

    // Users and the Progress Ledger

    /// Inserts a new user with zeroed ledger counters.
    async fn create_user(&self, user: NewUser) -> Result<user::Model>;

    /// Looks a user up by id.
    async fn get_user(&self, user_id: i64) -> Result<Option<user::Model>>;

    /// Replaces the user's budget with a validated two-place decimal.
    async fn update_budget(&self, user_id: i64, budget: &str) -> Result<user::Model>;

    /// Adds eco-points and levels the garden up as far as the total allows.
    async fn update_eco_points(&self, user_id: i64, delta: i32) -> Result<user::Model>;

    /// Advances the badge → seed → plant → fruit odometer by one eco action.
    async fn reward_eco_action(&self, user_id: i64) -> Result<EcoProgress>;

    /// Adds a non-negative CO₂ saving to the user's running total.
    async fn record_co2_saving(&self, user_id: i64, saving: &str) -> Result<user::Model>;

    // Catalog

    /// Inserts a category.
    async fn create_category(&self, category: NewCategory) -> Result<category::Model>;

    /// All categories, by id.
    async fn list_categories(&self) -> Result<Vec<category::Model>>;

    /// Inserts a product.
    async fn create_product(&self, product: NewProduct) -> Result<product::Model>;

    /// Products passing `filter`, by id.
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<product::Model>>;

    /// Looks a product up by id.
    async fn get_product(&self, product_id: i64) -> Result<Option<product::Model>>;

    /// Overwrites a product's stock level.
    async fn update_product_stock(
        &self,
        product_id: i64,
        stock: i32,
    ) -> Result<Option<product::Model>>;

    // Cart

    /// The user's cart rows joined with their products.
    async fn list_cart(&self, user_id: i64) -> Result<Vec<CartLine>>;

    /// Adds units to the cart, merging with an existing row for the same product.
    ///
    /// In the same atomic unit, decrements stock (never below zero) and awards
    /// the organic/local eco-point bonus.
    async fn add_to_cart(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i32,
    ) -> Result<cart_item::Model>;

    /// Sets the quantity of one of the user's cart rows.
    async fn update_cart_item(
        &self,
        user_id: i64,
        cart_item_id: i64,
        quantity: i32,
    ) -> Result<Option<cart_item::Model>>;

    /// Removes one of the user's cart rows. Returns whether a row was removed.
    async fn remove_from_cart(&self, user_id: i64, cart_item_id: i64) -> Result<bool>;

    /// Removes every cart row of the user.
    async fn clear_cart(&self, user_id: i64) -> Result<()>;

    // Recipes

    /// Inserts a recipe.
    async fn create_recipe(&self, recipe: NewRecipe) -> Result<recipe::Model>;

    /// All recipes, by id.
    async fn list_recipes(&self) -> Result<Vec<recipe::Model>>;

    /// Looks a recipe up by id.
    async fn get_recipe(&self, recipe_id: i64) -> Result<Option<recipe::Model>>;

    /// Recipes with an ingredient linked to `product_id`.
    async fn recipes_using_product(&self, product_id: i64) -> Result<Vec<recipe::Model>>;

    // Eco swaps

    /// Inserts an eco swap. Both products must exist.
    async fn create_eco_swap(&self, swap: NewEcoSwap) -> Result<eco_swap::Model>;

    /// Greener substitutes for `product_id`, joined with the suggested product.
    async fn eco_swaps(&self, product_id: i64) -> Result<Vec<EcoSwapSuggestion>>;

    // Notifications

    /// Inserts an unread notification for the user.
    async fn create_notification(
        &self,
        user_id: i64,
        notification: NewNotification,
    ) -> Result<notification::Model>;

    /// The user's notifications, newest first.
    async fn list_notifications(&self, user_id: i64) -> Result<Vec<notification::Model>>;

    /// Marks one of the user's notifications read. Returns whether it exists.
    async fn mark_notification_read(&self, user_id: i64, notification_id: i64) -> Result<bool>;

    /// Number of unread notifications for the user.
    async fn unread_notification_count(&self, user_id: i64) -> Result<u64>;

    // Garden log

    /// Appends a garden progress entry.
    async fn add_garden_progress(
        &self,
        user_id: i64,
        plant_type: &str,
        eco_action: &str,
    ) -> Result<garden_progress::Model>;

    /// The user's garden history, oldest first.
    async fn garden_progress(&self, user_id: i64) -> Result<Vec<garden_progress::Model>>;

    // Orders

    /// Stores an order snapshot and drains the user's cart atomically.
    async fn create_order(&self, user_id: i64, order: NewOrder) -> Result<order::Model>;

    /// The user's orders, newest first.
    async fn list_orders(&self, user_id: i64) -> Result<Vec<order::Model>>;
}
