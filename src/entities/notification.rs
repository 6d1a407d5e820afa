//! Notification entity - messages shown in the storefront's bell menu.
//!
//! `kind` holds one of the values of [`crate::core::notification::NotificationKind`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Notification database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    /// Unique identifier for the notification
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Recipient
    pub user_id: i64,
    /// `"eco"`, `"order"`, `"tip"`, `"promo"`, `"badge"`, `"deal"`, `"stock"` or `"budget"`
    #[serde(rename = "type")]
    pub kind: String,
    /// Headline
    pub title: String,
    /// Body text
    pub message: String,
    /// Whether the user has opened it
    pub is_read: bool,
    /// When the notification was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Notification and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each notification belongs to one user
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
