//! Product entity - catalog items with sustainability metadata.
//!
//! Everything except `stock` is fixed once a product is created. Prices are
//! two-place decimal strings; `original_price` is set only for discounted items.

use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// Where a product comes from and how it is made, shown behind the QR code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Provenance {
    /// Farm/factory and transport distance
    pub origin: String,
    /// How the product is manufactured
    pub manufacturing: String,
    /// Packaging materials
    pub packaging: String,
    /// Certifications such as "USDA Organic"
    #[serde(default)]
    pub certifications: Vec<String>,
}

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product (e.g., "Organic Vegetable Box")
    pub name: String,
    /// Short marketing description
    pub description: String,
    /// Current price, e.g. `"24.99"`
    pub price: String,
    /// Price before discount, if discounted
    pub original_price: Option<String>,
    /// Product photo
    pub image_url: String,
    /// Owning category, if any
    pub category_id: Option<i64>,
    /// Estimated kg of CO₂ per unit
    pub carbon_footprint: String,
    /// Sustainability score from 1 to 5
    pub eco_rating: i32,
    /// Units on hand
    pub stock: i32,
    /// Certified organic
    pub is_organic: bool,
    /// Locally sourced
    pub is_local: bool,
    /// Fair-trade certified
    pub is_fair_trade: bool,
    /// Designed for reuse
    pub is_reusable: bool,
    /// Breaks down naturally
    pub is_biodegradable: bool,
    /// Discount percentage applied close to expiry
    pub expiry_discount: Option<i32>,
    /// Days until expiry
    pub expiry_days: Option<i32>,
    /// Provenance details, if known
    #[sea_orm(column_type = "Json", nullable)]
    pub provenance: Option<Provenance>,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product optionally belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    /// One product appears in many cart rows
    #[sea_orm(has_many = "super::cart_item::Entity")]
    CartItems,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::cart_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
