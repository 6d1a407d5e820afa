//! Recipe entity - cooking ideas that link ingredients back to the catalog.

use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// One ingredient line of a recipe.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    /// Ingredient name
    pub name: String,
    /// Amount, kept as free text ("200", "1/2")
    pub quantity: String,
    /// Unit of measure
    pub unit: String,
    /// Catalog product that can be bought for this ingredient
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
}

/// Ingredient list stored as a JSON column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Ingredients(pub Vec<Ingredient>);

/// Ordered instruction steps stored as a JSON column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Instructions(pub Vec<String>);

/// Recipe database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    /// Unique identifier for the recipe
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Recipe title
    pub name: String,
    /// Short description
    pub description: String,
    /// Photo of the dish
    pub image_url: String,
    /// Preparation time in minutes
    pub prep_time: i32,
    /// Ingredient lines
    #[sea_orm(column_type = "Json")]
    pub ingredients: Ingredients,
    /// Steps in order
    #[sea_orm(column_type = "Json")]
    pub instructions: Instructions,
    /// Sustainability score from 1 to 5
    pub eco_rating: i32,
}

impl Model {
    /// Whether any ingredient links to the given catalog product.
    #[must_use]
    pub fn uses_product(&self, product_id: i64) -> bool {
        self.ingredients
            .0
            .iter()
            .any(|ingredient| ingredient.product_id == Some(product_id))
    }
}

/// Recipes have no foreign keys
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
