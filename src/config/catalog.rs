//! Seed catalog loading from catalog.toml
//!
//! The seed catalog describes the demo storefront: categories, products,
//! recipes, eco swaps, a demo shopper with some ledger history, sample
//! notifications and past orders. Rows reference each other by name here;
//! [`crate::storage::seed`] resolves the names to ids while inserting.

use crate::{
    core::{
        catalog::NewProduct,
        notification::{NewNotification, NotificationKind},
        order::OrderStatus,
    },
    entities::product::Provenance,
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire catalog.toml file
#[derive(Debug, Default, Deserialize)]
pub struct CatalogConfig {
    /// Shopper created on first run
    #[serde(default)]
    pub demo_user: Option<DemoUserConfig>,
    /// Product categories
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    /// Products, each optionally filed under a category by name
    #[serde(default)]
    pub products: Vec<ProductConfig>,
    /// Recipes; ingredients may link to a product by name
    #[serde(default)]
    pub recipes: Vec<RecipeConfig>,
    /// Eco swap suggestions between two named products
    #[serde(default)]
    pub eco_swaps: Vec<EcoSwapConfig>,
    /// Notifications delivered to the demo user
    #[serde(default)]
    pub notifications: Vec<NotificationConfig>,
    /// Garden log entries of the demo user
    #[serde(default)]
    pub garden: Vec<GardenEntryConfig>,
    /// Past orders of the demo user
    #[serde(default)]
    pub orders: Vec<OrderConfig>,
}

/// The demo shopper and the ledger history to replay for them
#[derive(Debug, Clone, Deserialize)]
pub struct DemoUserConfig {
    /// Login name
    pub username: String,
    /// Contact address
    pub email: String,
    /// Starting budget, defaults to `100.00`
    #[serde(default)]
    pub budget: Option<String>,
    /// Eco-points to award up front
    #[serde(default)]
    pub eco_points: i32,
    /// kg of CO₂ already saved
    #[serde(default)]
    pub co2_saved: Option<String>,
    /// Eco actions to replay through the badge odometer
    #[serde(default)]
    pub eco_actions: u32,
}

/// Configuration for a single category
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    /// Category name, referenced by products
    pub name: String,
    /// Icon identifier
    pub icon: String,
    /// Accent color
    pub color: String,
}

/// Configuration for a single product
#[derive(Debug, Clone, Deserialize)]
pub struct ProductConfig {
    /// Product name, referenced by recipes, swaps and orders
    pub name: String,
    /// Marketing description
    pub description: String,
    /// Current price
    pub price: String,
    /// Price before discount
    #[serde(default)]
    pub original_price: Option<String>,
    /// Product photo
    #[serde(default)]
    pub image_url: String,
    /// Name of the owning category
    #[serde(default)]
    pub category: Option<String>,
    /// kg of CO₂ per unit
    pub carbon_footprint: String,
    /// 1 to 5
    pub eco_rating: i32,
    /// Units on hand
    pub stock: i32,
    /// Certified organic
    #[serde(default)]
    pub is_organic: bool,
    /// Locally sourced
    #[serde(default)]
    pub is_local: bool,
    /// Fair-trade certified
    #[serde(default)]
    pub is_fair_trade: bool,
    /// Designed for reuse
    #[serde(default)]
    pub is_reusable: bool,
    /// Breaks down naturally
    #[serde(default)]
    pub is_biodegradable: bool,
    /// Discount percentage near expiry
    #[serde(default)]
    pub expiry_discount: Option<i32>,
    /// Days until expiry
    #[serde(default)]
    pub expiry_days: Option<i32>,
    /// Provenance details
    #[serde(default)]
    pub provenance: Option<Provenance>,
}

impl ProductConfig {
    /// Converts the entry into a product input filed under `category_id`.
    #[must_use]
    pub fn into_new_product(self, category_id: Option<i64>) -> NewProduct {
        NewProduct {
            name: self.name,
            description: self.description,
            price: self.price,
            original_price: self.original_price,
            image_url: self.image_url,
            category_id,
            carbon_footprint: self.carbon_footprint,
            eco_rating: self.eco_rating,
            stock: self.stock,
            is_organic: self.is_organic,
            is_local: self.is_local,
            is_fair_trade: self.is_fair_trade,
            is_reusable: self.is_reusable,
            is_biodegradable: self.is_biodegradable,
            expiry_discount: self.expiry_discount,
            expiry_days: self.expiry_days,
            provenance: self.provenance,
        }
    }
}

/// Configuration for a single recipe
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeConfig {
    /// Recipe title
    pub name: String,
    /// Short description
    pub description: String,
    /// Photo of the dish
    #[serde(default)]
    pub image_url: String,
    /// Minutes of preparation
    pub prep_time: i32,
    /// 1 to 5, defaults to 3
    #[serde(default)]
    pub eco_rating: Option<i32>,
    /// Ingredient lines
    #[serde(default)]
    pub ingredients: Vec<IngredientConfig>,
    /// Steps in order
    pub instructions: Vec<String>,
}

/// One ingredient line of a recipe
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientConfig {
    /// Ingredient name
    pub name: String,
    /// Amount, as written in the recipe
    pub quantity: String,
    /// Unit of the amount
    #[serde(default)]
    pub unit: String,
    /// Name of the store product that supplies this ingredient
    #[serde(default)]
    pub product: Option<String>,
}

/// An eco swap between two products named in the catalog
#[derive(Debug, Clone, Deserialize)]
pub struct EcoSwapConfig {
    /// Product being replaced
    pub original: String,
    /// Suggested replacement
    pub swap: String,
    /// kg of CO₂ saved
    pub co2_savings: String,
    /// Pitch shown to the shopper
    pub description: String,
}

/// A notification for the demo user
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Kind of notification
    pub kind: NotificationKind,
    /// Short headline
    pub title: String,
    /// Body text
    pub message: String,
}

impl From<NotificationConfig> for NewNotification {
    fn from(config: NotificationConfig) -> Self {
        Self {
            kind: config.kind,
            title: config.title,
            message: config.message,
        }
    }
}

/// A plant the demo user has already unlocked
#[derive(Debug, Clone, Deserialize)]
pub struct GardenEntryConfig {
    /// Plant that was unlocked
    pub plant_type: String,
    /// Eco action that unlocked it
    pub eco_action: String,
}

/// A past order of the demo user
#[derive(Debug, Clone, Deserialize)]
pub struct OrderConfig {
    /// How long ago the order was placed
    #[serde(default)]
    pub days_ago: u32,
    /// Order status, defaults to completed
    #[serde(default)]
    pub status: OrderStatus,
    /// Ordered products
    pub items: Vec<OrderItemConfig>,
}

/// One line of a past order
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemConfig {
    /// Name of the ordered product
    pub product: String,
    /// Units ordered
    pub quantity: i32,
}

/// Loads the seed catalog from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!(
            "Failed to read catalog file {}: {e}",
            path.as_ref().display()
        ),
    })?;

    parse_catalog(&contents)
}

/// Parses seed catalog TOML
pub fn parse_catalog(contents: &str) -> Result<CatalogConfig> {
    Ok(toml::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_catalog() {
        let toml_str = r#"
            [demo_user]
            username = "eco_shopper"
            email = "eco@ecomart.test"
            eco_points = 450
            eco_actions = 12

            [[categories]]
            name = "Fresh Produce"
            icon = "leaf"
            color = "green"

            [[products]]
            name = "Organic Tomatoes"
            description = "Vine-ripened tomatoes"
            price = "3.49"
            category = "Fresh Produce"
            carbon_footprint = "0.4"
            eco_rating = 5
            stock = 40
            is_organic = true

            [products.provenance]
            origin = "Somerset, UK"
            manufacturing = "Hand-picked"
            packaging = "Compostable punnet"
            certifications = ["Soil Association"]

            [[recipes]]
            name = "Tomato Salad"
            description = "Quick summer salad"
            prep_time = 10
            instructions = ["Slice", "Season"]

            [[recipes.ingredients]]
            name = "Tomatoes"
            quantity = "4"
            product = "Organic Tomatoes"

            [[notifications]]
            kind = "tip"
            title = "Seasonal"
            message = "Tomatoes are in season"

            [[garden]]
            plant_type = "Basil"
            eco_action = "Chose local produce"

            [[orders]]
            days_ago = 3
            [[orders.items]]
            product = "Organic Tomatoes"
            quantity = 2
        "#;

        let config = parse_catalog(toml_str).unwrap();
        let demo = config.demo_user.unwrap();
        assert_eq!(demo.username, "eco_shopper");
        assert_eq!(demo.eco_points, 450);
        assert_eq!(demo.eco_actions, 12);
        assert!(demo.budget.is_none());

        assert_eq!(config.categories.len(), 1);
        let product = &config.products[0];
        assert_eq!(product.category.as_deref(), Some("Fresh Produce"));
        assert!(product.is_organic);
        assert!(!product.is_local);
        assert_eq!(
            product.provenance.as_ref().unwrap().certifications,
            vec!["Soil Association".to_string()]
        );

        let recipe = &config.recipes[0];
        assert_eq!(recipe.eco_rating, None);
        assert_eq!(
            recipe.ingredients[0].product.as_deref(),
            Some("Organic Tomatoes")
        );

        assert_eq!(config.notifications[0].kind, NotificationKind::Tip);
        assert_eq!(config.garden[0].plant_type, "Basil");
        assert_eq!(config.orders[0].status, OrderStatus::Completed);
        assert_eq!(config.orders[0].items[0].quantity, 2);
        assert!(config.eco_swaps.is_empty());
    }

    #[test]
    fn test_empty_catalog_is_valid() {
        let config = parse_catalog("").unwrap();
        assert!(config.demo_user.is_none());
        assert!(config.products.is_empty());
    }

    #[test]
    fn test_missing_required_field_is_an_error() {
        let result = parse_catalog(
            r#"
            [[categories]]
            name = "Pantry"
        "#,
        );
        assert!(matches!(result, Err(Error::Toml(_))));
    }

    #[test]
    fn test_missing_file_is_a_config_error() {
        let result = load_catalog("does/not/exist.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
