//! Order entity - a completed checkout.
//!
//! `items` is a snapshot of the cart taken at checkout time. It is a copy,
//! so later price or name changes on the product never alter past orders.
use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// One purchased line as it looked at checkout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    /// Product that was bought
    pub product_id: i64,
    /// Product name at checkout
    pub product_name: String,
    /// Units bought
    pub quantity: i32,
    /// Unit price at checkout, e.g. `"24.99"`
    pub price: String,
    /// Product photo at checkout
    #[serde(default)]
    pub image_url: String,
}

/// Snapshot list stored as a JSON column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct OrderItems(pub Vec<OrderLineItem>);

/// Order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Buyer
    pub user_id: i64,
    /// Order total, e.g. `"67.98"`
    pub total: String,
    /// `"pending"`, `"completed"` or `"cancelled"`
    pub status: String,
    /// When the order was placed
    pub order_date: DateTimeUtc,
    /// Line items captured at checkout
    #[sea_orm(column_type = "Json")]
    pub items: OrderItems,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
