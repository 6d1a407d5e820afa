//! Garden progress entity - append-only history of unlocked plants.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Garden progress database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "garden_progress")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    /// What grew (e.g., "sunflower")
    pub plant_type: String,
    /// The eco action that unlocked it
    pub eco_action: String,
    pub unlocked_at: DateTimeUtc,
}

/// Defines relationships between `GardenProgress` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one user
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
