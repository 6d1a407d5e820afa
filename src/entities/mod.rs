//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! The same `Model` structs are the domain values returned by every storage adapter.

pub mod cart_item;
pub mod category;
pub mod eco_swap;
pub mod garden_progress;
pub mod notification;
pub mod order;
pub mod product;
pub mod recipe;
pub mod user;

// Re-export specific types to avoid conflicts
pub use cart_item::{Column as CartItemColumn, Entity as CartItem, Model as CartItemModel};
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use eco_swap::{Column as EcoSwapColumn, Entity as EcoSwap, Model as EcoSwapModel};
pub use garden_progress::{
    Column as GardenProgressColumn, Entity as GardenProgress, Model as GardenProgressModel,
};
pub use notification::{
    Column as NotificationColumn, Entity as Notification, Model as NotificationModel,
};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use recipe::{Column as RecipeColumn, Entity as Recipe, Model as RecipeModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
