//! `SeaORM` storage adapter.
//!
//! Multi-row operations run inside a database transaction. Writes are also
//! serialized through an in-process lock so that read-modify-write updates
//! of ledger counters never interleave, whichever pool size the connection
//! uses. Reads take no lock.

use super::Storage;
use crate::{
    core::{
        account::{self, NewUser},
        cart::{self, CartLine},
        catalog::{EcoSwapSuggestion, NewCategory, NewEcoSwap, NewProduct, NewRecipe, ProductFilter},
        ledger::{self, EcoProgress, GardenStanding},
        notification::NewNotification,
        order::{self, NewOrder},
    },
    entities::{
        CartItem, Category, EcoSwap, GardenProgress, Notification, Order, Product, Recipe, User,
        cart_item, category, eco_swap, garden_progress, notification, order as order_entity,
        product, recipe, user,
    },
    errors::{Error, Result},
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveValue::NotSet, Condition, IntoActiveModel, PaginatorTrait, QueryOrder, Set,
    TransactionTrait, prelude::*, sea_query::Expr,
};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// Storage adapter backed by a `SeaORM` connection.
#[derive(Debug)]
pub struct DatabaseStorage {
    db: DatabaseConnection,
    write_lock: Mutex<()>,
}

impl DatabaseStorage {
    /// Wraps an open connection. Tables must already exist, see
    /// [`crate::config::database::create_tables`].
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            write_lock: Mutex::new(()),
        }
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

async fn find_user<C>(db: &C, user_id: i64) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("user", user_id))
}

async fn find_product<C>(db: &C, product_id: i64) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("product", product_id))
}

/// Writes every column of a modified user row back.
async fn save_user<C>(db: &C, user: user::Model) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    Ok(user.into_active_model().reset_all().update(db).await?)
}

/// Applies an eco-point delta and the resulting level-ups.
async fn apply_points<C>(db: &C, user_id: i64, delta: i32) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    let mut user = find_user(db, user_id).await?;
    GardenStanding::from(&user)
        .with_points(delta)
        .apply_to(&mut user);
    save_user(db, user).await
}

/// Takes `quantity` units off a product's stock, never going below zero.
async fn decrement_stock<C>(db: &C, product_id: i64, quantity: i32) -> Result<()>
where
    C: ConnectionTrait,
{
    let taken = Product::update_many()
        .col_expr(
            product::Column::Stock,
            Expr::col(product::Column::Stock).sub(quantity),
        )
        .filter(product::Column::Id.eq(product_id))
        .filter(product::Column::Stock.gte(quantity))
        .exec(db)
        .await?;

    if taken.rows_affected == 0 {
        // Fewer units left than requested
        Product::update_many()
            .col_expr(product::Column::Stock, Expr::value(0))
            .filter(product::Column::Id.eq(product_id))
            .filter(product::Column::Stock.gt(0))
            .exec(db)
            .await?;
    }
    Ok(())
}

async fn cart_lines<C>(db: &C, user_id: i64) -> Result<Vec<CartLine>>
where
    C: ConnectionTrait,
{
    let rows = CartItem::find()
        .filter(cart_item::Column::UserId.eq(user_id))
        .order_by_asc(cart_item::Column::Id)
        .find_also_related(Product)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(item, product)| product.map(|product| CartLine { item, product }))
        .collect())
}

#[async_trait]
impl Storage for DatabaseStorage {
    fn backend_tag(&self) -> &'static str {
        "database"
    }

    async fn create_user(&self, new_user: NewUser) -> Result<user::Model> {
        let candidate = new_user.into_model(0)?;
        let _guard = self.write_lock.lock().await;

        let taken = User::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(candidate.username.as_str()))
                    .add(user::Column::Email.eq(candidate.email.as_str())),
            )
            .one(&self.db)
            .await?;
        if taken.is_some() {
            return Err(Error::validation(format!(
                "User '{}' already exists",
                candidate.username
            )));
        }

        let mut active = candidate.into_active_model().reset_all();
        active.id = NotSet;
        Ok(active.insert(&self.db).await?)
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<user::Model>> {
        Ok(User::find_by_id(user_id).one(&self.db).await?)
    }

    async fn update_budget(&self, user_id: i64, budget: &str) -> Result<user::Model> {
        let budget = ledger::validate_budget(budget)?;
        let _guard = self.write_lock.lock().await;

        let mut user = find_user(&self.db, user_id).await?;
        user.budget = budget;
        save_user(&self.db, user).await
    }

    #[instrument(skip(self))]
    async fn update_eco_points(&self, user_id: i64, delta: i32) -> Result<user::Model> {
        let _guard = self.write_lock.lock().await;
        let txn = self.db.begin().await?;
        let user = apply_points(&txn, user_id, delta).await?;
        txn.commit().await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn reward_eco_action(&self, user_id: i64) -> Result<EcoProgress> {
        let _guard = self.write_lock.lock().await;
        let txn = self.db.begin().await?;

        let mut user = find_user(&txn, user_id).await?;
        let progress = EcoProgress::from(&user).after_eco_action();
        progress.apply_to(&mut user);
        save_user(&txn, user).await?;

        txn.commit().await?;
        debug!(?progress, "eco action rewarded");
        Ok(progress)
    }

    async fn record_co2_saving(&self, user_id: i64, saving: &str) -> Result<user::Model> {
        let _guard = self.write_lock.lock().await;
        let mut user = find_user(&self.db, user_id).await?;
        user.co2_saved = ledger::add_co2_saving(&user.co2_saved, saving)?;
        save_user(&self.db, user).await
    }

    async fn create_category(&self, new_category: NewCategory) -> Result<category::Model> {
        let candidate = new_category.into_model(0)?;
        let category = category::ActiveModel {
            name: Set(candidate.name),
            icon: Set(candidate.icon),
            color: Set(candidate.color),
            ..Default::default()
        };
        let _guard = self.write_lock.lock().await;
        Ok(category.insert(&self.db).await?)
    }

    async fn list_categories(&self) -> Result<Vec<category::Model>> {
        Ok(Category::find()
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn create_product(&self, new_product: NewProduct) -> Result<product::Model> {
        let candidate = new_product.into_model(0)?;
        let _guard = self.write_lock.lock().await;

        if let Some(category_id) = candidate.category_id {
            if Category::find_by_id(category_id)
                .one(&self.db)
                .await?
                .is_none()
            {
                return Err(Error::not_found("category", category_id));
            }
        }

        let mut active = candidate.into_active_model().reset_all();
        active.id = NotSet;
        Ok(active.insert(&self.db).await?)
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<product::Model>> {
        let query = Product::find().order_by_asc(product::Column::Id);
        match filter {
            ProductFilter::All => Ok(query.all(&self.db).await?),
            ProductFilter::Category(category_id) => Ok(query
                .filter(product::Column::CategoryId.eq(*category_id))
                .all(&self.db)
                .await?),
            // Unicode-aware case folding happens in Rust
            ProductFilter::Search(_) => Ok(query
                .all(&self.db)
                .await?
                .into_iter()
                .filter(|product| filter.matches(product))
                .collect()),
        }
    }

    async fn get_product(&self, product_id: i64) -> Result<Option<product::Model>> {
        Ok(Product::find_by_id(product_id).one(&self.db).await?)
    }

    async fn update_product_stock(
        &self,
        product_id: i64,
        stock: i32,
    ) -> Result<Option<product::Model>> {
        if stock < 0 {
            return Err(Error::validation("Stock cannot be negative"));
        }
        let _guard = self.write_lock.lock().await;

        let Some(product) = Product::find_by_id(product_id).one(&self.db).await? else {
            return Ok(None);
        };
        let mut active = product.into_active_model();
        active.stock = Set(stock);
        Ok(Some(active.update(&self.db).await?))
    }

    async fn list_cart(&self, user_id: i64) -> Result<Vec<CartLine>> {
        cart_lines(&self.db, user_id).await
    }

    #[instrument(skip(self))]
    async fn add_to_cart(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i32,
    ) -> Result<cart_item::Model> {
        let quantity = cart::validate_quantity(quantity)?;
        let _guard = self.write_lock.lock().await;
        let txn = self.db.begin().await?;

        find_user(&txn, user_id).await?;
        let product = find_product(&txn, product_id).await?;

        let existing = CartItem::find()
            .filter(cart_item::Column::UserId.eq(user_id))
            .filter(cart_item::Column::ProductId.eq(product_id))
            .one(&txn)
            .await?;

        let item = match existing {
            Some(row) => {
                let merged = row.quantity.saturating_add(quantity);
                let mut active = row.into_active_model();
                active.quantity = Set(merged);
                active.update(&txn).await?
            }
            None => {
                cart_item::ActiveModel {
                    user_id: Set(user_id),
                    product_id: Set(product_id),
                    quantity: Set(quantity),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };

        decrement_stock(&txn, product_id, quantity).await?;

        if ledger::earns_cart_bonus(product.is_organic, product.is_local) {
            apply_points(&txn, user_id, ledger::ORGANIC_OR_LOCAL_BONUS).await?;
        }

        txn.commit().await?;
        debug!(cart_item_id = item.id, quantity = item.quantity, "cart updated");
        Ok(item)
    }

    async fn update_cart_item(
        &self,
        user_id: i64,
        cart_item_id: i64,
        quantity: i32,
    ) -> Result<Option<cart_item::Model>> {
        let quantity = cart::validate_quantity(quantity)?;
        let _guard = self.write_lock.lock().await;

        let Some(row) = CartItem::find_by_id(cart_item_id)
            .filter(cart_item::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active = row.into_active_model();
        active.quantity = Set(quantity);
        Ok(Some(active.update(&self.db).await?))
    }

    async fn remove_from_cart(&self, user_id: i64, cart_item_id: i64) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let removed = CartItem::delete_many()
            .filter(cart_item::Column::Id.eq(cart_item_id))
            .filter(cart_item::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(removed.rows_affected > 0)
    }

    async fn clear_cart(&self, user_id: i64) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        CartItem::delete_many()
            .filter(cart_item::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn create_recipe(&self, new_recipe: NewRecipe) -> Result<recipe::Model> {
        let candidate = new_recipe.into_model(0)?;
        let mut active = candidate.into_active_model().reset_all();
        active.id = NotSet;
        let _guard = self.write_lock.lock().await;
        Ok(active.insert(&self.db).await?)
    }

    async fn list_recipes(&self) -> Result<Vec<recipe::Model>> {
        Ok(Recipe::find()
            .order_by_asc(recipe::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn get_recipe(&self, recipe_id: i64) -> Result<Option<recipe::Model>> {
        Ok(Recipe::find_by_id(recipe_id).one(&self.db).await?)
    }

    async fn recipes_using_product(&self, product_id: i64) -> Result<Vec<recipe::Model>> {
        // Ingredients live in a JSON column
        Ok(self
            .list_recipes()
            .await?
            .into_iter()
            .filter(|recipe| recipe.uses_product(product_id))
            .collect())
    }

    async fn create_eco_swap(&self, new_swap: NewEcoSwap) -> Result<eco_swap::Model> {
        let candidate = new_swap.into_model(0)?;
        let _guard = self.write_lock.lock().await;

        find_product(&self.db, candidate.original_product_id).await?;
        find_product(&self.db, candidate.swap_product_id).await?;

        let swap = eco_swap::ActiveModel {
            original_product_id: Set(candidate.original_product_id),
            swap_product_id: Set(candidate.swap_product_id),
            co2_savings: Set(candidate.co2_savings),
            description: Set(candidate.description),
            ..Default::default()
        };
        Ok(swap.insert(&self.db).await?)
    }

    async fn eco_swaps(&self, product_id: i64) -> Result<Vec<EcoSwapSuggestion>> {
        let swaps = EcoSwap::find()
            .filter(eco_swap::Column::OriginalProductId.eq(product_id))
            .order_by_asc(eco_swap::Column::Id)
            .all(&self.db)
            .await?;
        if swaps.is_empty() {
            return Ok(Vec::new());
        }

        let products: HashMap<i64, product::Model> = Product::find()
            .filter(product::Column::Id.is_in(swaps.iter().map(|s| s.swap_product_id)))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(swaps
            .into_iter()
            .filter_map(|swap| {
                products
                    .get(&swap.swap_product_id)
                    .cloned()
                    .map(|swap_product| EcoSwapSuggestion { swap, swap_product })
            })
            .collect())
    }

    async fn create_notification(
        &self,
        user_id: i64,
        new_notification: NewNotification,
    ) -> Result<notification::Model> {
        let new_notification = new_notification.validate()?;
        let _guard = self.write_lock.lock().await;
        find_user(&self.db, user_id).await?;

        let notification = notification::ActiveModel {
            user_id: Set(user_id),
            kind: Set(new_notification.kind.as_str().to_string()),
            title: Set(new_notification.title),
            message: Set(new_notification.message),
            is_read: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        Ok(notification.insert(&self.db).await?)
    }

    async fn list_notifications(&self, user_id: i64) -> Result<Vec<notification::Model>> {
        Ok(Notification::find()
            .filter(notification::Column::UserId.eq(user_id))
            .order_by_desc(notification::Column::CreatedAt)
            .order_by_desc(notification::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn mark_notification_read(&self, user_id: i64, notification_id: i64) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let updated = Notification::update_many()
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .filter(notification::Column::Id.eq(notification_id))
            .filter(notification::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(updated.rows_affected > 0)
    }

    async fn unread_notification_count(&self, user_id: i64) -> Result<u64> {
        Ok(Notification::find()
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false))
            .count(&self.db)
            .await?)
    }

    async fn add_garden_progress(
        &self,
        user_id: i64,
        plant_type: &str,
        eco_action: &str,
    ) -> Result<garden_progress::Model> {
        let (plant_type, eco_action) = account::validate_garden_entry(plant_type, eco_action)?;
        let _guard = self.write_lock.lock().await;
        find_user(&self.db, user_id).await?;

        let entry = garden_progress::ActiveModel {
            user_id: Set(user_id),
            plant_type: Set(plant_type),
            eco_action: Set(eco_action),
            unlocked_at: Set(Utc::now()),
            ..Default::default()
        };
        Ok(entry.insert(&self.db).await?)
    }

    async fn garden_progress(&self, user_id: i64) -> Result<Vec<garden_progress::Model>> {
        Ok(GardenProgress::find()
            .filter(garden_progress::Column::UserId.eq(user_id))
            .order_by_asc(garden_progress::Column::UnlockedAt)
            .order_by_asc(garden_progress::Column::Id)
            .all(&self.db)
            .await?)
    }

    #[instrument(skip(self, new_order))]
    async fn create_order(&self, user_id: i64, new_order: NewOrder) -> Result<order_entity::Model> {
        let _guard = self.write_lock.lock().await;
        let txn = self.db.begin().await?;

        find_user(&txn, user_id).await?;
        let cart = cart_lines(&txn, user_id).await?;
        let prepared = order::prepare(new_order, &cart)?;

        let created = order_entity::ActiveModel {
            user_id: Set(user_id),
            total: Set(prepared.total),
            status: Set(prepared.status.as_str().to_string()),
            order_date: Set(prepared.order_date),
            items: Set(prepared.items),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        CartItem::delete_many()
            .filter(cart_item::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        debug!(order_id = created.id, total = %created.total, "order placed, cart cleared");
        Ok(created)
    }

    async fn list_orders(&self, user_id: i64) -> Result<Vec<order_entity::Model>> {
        Ok(Order::find()
            .filter(order_entity::Column::UserId.eq(user_id))
            .order_by_desc(order_entity::Column::OrderDate)
            .order_by_desc(order_entity::Column::Id)
            .all(&self.db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn shopper() -> user::Model {
        user::Model {
            id: 1,
            username: "eco_shopper".to_string(),
            email: "eco_shopper@ecomart.test".to_string(),
            budget: "100.00".to_string(),
            eco_points: 0,
            garden_level: 1,
            co2_saved: "0.00".to_string(),
            eco_badges: 0,
            seeds: 0,
            plants: 0,
            fruits: 0,
        }
    }

    #[tokio::test]
    async fn test_get_user_reads_through_the_connection() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([vec![shopper()]])
            .into_connection();
        let storage = DatabaseStorage::new(db);

        let user = storage.get_user(1).await?.unwrap();
        assert_eq!(user.username, "eco_shopper");
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_before_any_query() {
        let storage = DatabaseStorage::new(
            MockDatabase::new(DatabaseBackend::Sqlite).into_connection(),
        );

        let result = storage.update_budget(1, "-5.00").await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = storage.add_to_cart(1, 1, 0).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
    }
}
