//! Database configuration module for the storefront.
//!
//! This module handles database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written SQL. Creation is idempotent, which lets the
//! service restart against an existing `SQLite` file.

use crate::entities::{
    CartItem, Category, EcoSwap, GardenProgress, Notification, Order, Product, Recipe, User,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::debug;

/// Default `SQLite` location, created on first run.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/ecomart.sqlite?mode=rwc";

/// Opens a connection to the database at `database_url`.
///
/// For file-backed `SQLite` URLs the parent directory is created first.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(dir) = sqlite_parent_dir(database_url) {
        std::fs::create_dir_all(dir)?;
    }
    Database::connect(database_url).await.map_err(Into::into)
}

/// Directory holding the database file of a `sqlite://` URL, if any.
fn sqlite_parent_dir(database_url: &str) -> Option<&str> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next().unwrap_or(path);
    if path.contains(":memory:") {
        return None;
    }
    path.rsplit_once('/')
        .map(|(dir, _)| dir)
        .filter(|dir| !dir.is_empty())
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates every table the storefront needs, skipping ones that exist.
///
/// Referenced tables are created before the tables pointing at them.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, User).await?;
    create_table(db, &schema, Category).await?;
    create_table(db, &schema, Product).await?;
    create_table(db, &schema, CartItem).await?;
    create_table(db, &schema, Recipe).await?;
    create_table(db, &schema, EcoSwap).await?;
    create_table(db, &schema, Notification).await?;
    create_table(db, &schema, GardenProgress).await?;
    create_table(db, &schema, Order).await?;

    debug!("database tables ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _ = User::find().limit(1).all(&db).await?;
        let _ = Category::find().limit(1).all(&db).await?;
        let _ = Product::find().limit(1).all(&db).await?;
        let _ = CartItem::find().limit(1).all(&db).await?;
        let _ = Recipe::find().limit(1).all(&db).await?;
        let _ = EcoSwap::find().limit(1).all(&db).await?;
        let _ = Notification::find().limit(1).all(&db).await?;
        let _ = GardenProgress::find().limit(1).all(&db).await?;
        let _ = Order::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_twice_is_harmless() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[test]
    fn test_sqlite_parent_dir() {
        assert_eq!(
            sqlite_parent_dir("sqlite://data/ecomart.sqlite?mode=rwc"),
            Some("data")
        );
        assert_eq!(sqlite_parent_dir("sqlite://ecomart.sqlite"), None);
        assert_eq!(sqlite_parent_dir("sqlite::memory:"), None);
        assert_eq!(sqlite_parent_dir("postgres://localhost/ecomart"), None);
    }
}
