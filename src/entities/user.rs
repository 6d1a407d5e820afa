//! User entity - the shopper and their Progress Ledger counters.
//!
//! Budget and CO₂ totals are stored as two-place decimal strings so they
//! round-trip exactly through JSON. The gamification counters obey the
//! rollover bounds enforced by [`crate::core::ledger`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display/login name
    #[sea_orm(unique)]
    pub username: String,
    /// Contact address
    #[sea_orm(unique)]
    pub email: String,
    /// Shopping budget, e.g. `"100.00"`
    pub budget: String,
    /// Accumulated eco-points
    pub eco_points: i32,
    /// Garden level, starts at 1
    pub garden_level: i32,
    /// Kilograms of CO₂ saved, e.g. `"12.40"`
    pub co2_saved: String,
    /// Badges earned towards the next seed (0..10)
    pub eco_badges: i32,
    /// Seeds earned towards the next plant (0..3)
    pub seeds: i32,
    /// Plants earned towards the next fruit (0..3)
    pub plants: i32,
    /// Fruits harvested, unbounded
    pub fruits: i32,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user has many cart rows
    #[sea_orm(has_many = "super::cart_item::Entity")]
    CartItems,
    /// One user has many orders
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
}

impl Related<super::cart_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItems.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
