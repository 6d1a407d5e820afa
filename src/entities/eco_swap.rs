//! Eco swap entity - a greener substitute suggested for a product.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Eco swap database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "eco_swaps")]
pub struct Model {
    /// Unique identifier for the swap
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Product the shopper is looking at
    pub original_product_id: i64,
    /// Suggested replacement
    pub swap_product_id: i64,
    /// Estimated kg of CO₂ saved by swapping
    pub co2_savings: String,
    /// Pitch shown to the shopper
    pub description: String,
}

/// Defines relationships between `EcoSwap` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The product being replaced
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::OriginalProductId",
        to = "super::product::Column::Id"
    )]
    OriginalProduct,
    /// The suggested replacement
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::SwapProductId",
        to = "super::product::Column::Id"
    )]
    SwapProduct,
}

impl ActiveModelBehavior for ActiveModel {}
