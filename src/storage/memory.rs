//! In-memory storage adapter.
//!
//! Every table is a `BTreeMap` keyed by an auto-incrementing id, and all
//! tables sit behind a single async mutex. Each trait method takes the lock
//! once and performs all of its reads and writes before releasing it, which
//! makes every operation atomic with respect to concurrent requests.

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
        cart_item, category, eco_swap, garden_progress, notification, order as order_entity,
        product, recipe, user,
    },
    errors::{Error, Result},
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// One table: rows keyed by id plus the next id to hand out.
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> Table<T> {
    const fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn insert(&mut self, id: i64, row: T) -> T {
        self.rows.insert(id, row.clone());
        row
    }

    fn get(&self, id: i64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn filtered(&self, mut keep: impl FnMut(&T) -> bool) -> Vec<T> {
        self.rows.values().filter(|row| keep(row)).cloned().collect()
    }
}

#[derive(Debug, Default)]
struct Tables {
    users: Table<user::Model>,
    categories: Table<category::Model>,
    products: Table<product::Model>,
    cart_items: Table<cart_item::Model>,
    recipes: Table<recipe::Model>,
    eco_swaps: Table<eco_swap::Model>,
    notifications: Table<notification::Model>,
    garden_progress: Table<garden_progress::Model>,
    orders: Table<order_entity::Model>,
}

impl Tables {
    fn user_mut(&mut self, user_id: i64) -> Result<&mut user::Model> {
        self.users
            .rows
            .get_mut(&user_id)
            .ok_or_else(|| Error::not_found("user", user_id))
    }

    fn require_user(&self, user_id: i64) -> Result<()> {
        if self.users.rows.contains_key(&user_id) {
            Ok(())
        } else {
            Err(Error::not_found("user", user_id))
        }
    }

    fn require_product(&self, product_id: i64) -> Result<&product::Model> {
        self.products
            .rows
            .get(&product_id)
            .ok_or_else(|| Error::not_found("product", product_id))
    }

    fn cart_lines(&self, user_id: i64) -> Vec<CartLine> {
        self.cart_items
            .rows
            .values()
            .filter(|item| item.user_id == user_id)
            .filter_map(|item| {
                self.products.get(item.product_id).map(|product| CartLine {
                    item: item.clone(),
                    product,
                })
            })
            .collect()
    }

    fn apply_points(&mut self, user_id: i64, delta: i32) -> Result<user::Model> {
        let user = self.user_mut(user_id)?;
        GardenStanding::from(&*user).with_points(delta).apply_to(user);
        Ok(user.clone())
    }
}

/// Storage adapter that keeps everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tables: Mutex<Tables>,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn create_user(&self, new_user: NewUser) -> Result<user::Model> {
        let mut tables = self.tables.lock().await;
        let candidate = new_user.into_model(0)?;
        if tables
            .users
            .rows
            .values()
            .any(|u| u.username == candidate.username || u.email == candidate.email)
        {
            return Err(Error::validation(format!(
                "User '{}' already exists",
                candidate.username
            )));
        }
        let id = tables.users.allocate_id();
        Ok(tables.users.insert(id, user::Model { id, ..candidate }))
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<user::Model>> {
        Ok(self.tables.lock().await.users.get(user_id))
    }

    async fn update_budget(&self, user_id: i64, budget: &str) -> Result<user::Model> {
        let budget = ledger::validate_budget(budget)?;
        let mut tables = self.tables.lock().await;
        let user = tables.user_mut(user_id)?;
        user.budget = budget;
        Ok(user.clone())
    }

    #[instrument(skip(self))]
    async fn update_eco_points(&self, user_id: i64, delta: i32) -> Result<user::Model> {
        self.tables.lock().await.apply_points(user_id, delta)
    }

    #[instrument(skip(self))]
    async fn reward_eco_action(&self, user_id: i64) -> Result<EcoProgress> {
        let mut tables = self.tables.lock().await;
        let user = tables.user_mut(user_id)?;
        let progress = EcoProgress::from(&*user).after_eco_action();
        progress.apply_to(user);
        debug!(?progress, "eco action rewarded");
        Ok(progress)
    }

    async fn record_co2_saving(&self, user_id: i64, saving: &str) -> Result<user::Model> {
        let mut tables = self.tables.lock().await;
        let user = tables.user_mut(user_id)?;
        user.co2_saved = ledger::add_co2_saving(&user.co2_saved, saving)?;
        Ok(user.clone())
    }

    async fn create_category(&self, new_category: NewCategory) -> Result<category::Model> {
        let mut tables = self.tables.lock().await;
        let candidate = new_category.into_model(0)?;
        let id = tables.categories.allocate_id();
        Ok(tables
            .categories
            .insert(id, category::Model { id, ..candidate }))
    }

    async fn list_categories(&self) -> Result<Vec<category::Model>> {
        Ok(self.tables.lock().await.categories.filtered(|_| true))
    }

    async fn create_product(&self, new_product: NewProduct) -> Result<product::Model> {
        let mut tables = self.tables.lock().await;
        let candidate = new_product.into_model(0)?;
        if let Some(category_id) = candidate.category_id {
            if !tables.categories.rows.contains_key(&category_id) {
                return Err(Error::not_found("category", category_id));
            }
        }
        let id = tables.products.allocate_id();
        Ok(tables.products.insert(id, product::Model { id, ..candidate }))
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<product::Model>> {
        Ok(self
            .tables
            .lock()
            .await
            .products
            .filtered(|p| filter.matches(p)))
    }

    async fn get_product(&self, product_id: i64) -> Result<Option<product::Model>> {
        Ok(self.tables.lock().await.products.get(product_id))
    }

    async fn update_product_stock(
        &self,
        product_id: i64,
        stock: i32,
    ) -> Result<Option<product::Model>> {
        if stock < 0 {
            return Err(Error::validation("Stock cannot be negative"));
        }
        let mut tables = self.tables.lock().await;
        Ok(tables.products.rows.get_mut(&product_id).map(|product| {
            product.stock = stock;
            product.clone()
        }))
    }

    async fn list_cart(&self, user_id: i64) -> Result<Vec<CartLine>> {
        Ok(self.tables.lock().await.cart_lines(user_id))
    }

    #[instrument(skip(self))]
    async fn add_to_cart(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i32,
    ) -> Result<cart_item::Model> {
        let quantity = cart::validate_quantity(quantity)?;
        let mut tables = self.tables.lock().await;
        tables.require_user(user_id)?;
        let product = tables.require_product(product_id)?.clone();

        let existing = tables
            .cart_items
            .rows
            .values_mut()
            .find(|item| item.user_id == user_id && item.product_id == product_id);

        let item = if let Some(item) = existing {
            item.quantity = item.quantity.saturating_add(quantity);
            item.clone()
        } else {
            let id = tables.cart_items.allocate_id();
            tables.cart_items.insert(
                id,
                cart_item::Model {
                    id,
                    user_id,
                    product_id,
                    quantity,
                },
            )
        };

        if let Some(stored) = tables.products.rows.get_mut(&product_id) {
            stored.stock = cart::stock_after_add(stored.stock, quantity);
        }

        if ledger::earns_cart_bonus(product.is_organic, product.is_local) {
            tables.apply_points(user_id, ledger::ORGANIC_OR_LOCAL_BONUS)?;
        }

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
        let mut tables = self.tables.lock().await;
        Ok(tables
            .cart_items
            .rows
            .get_mut(&cart_item_id)
            .filter(|item| item.user_id == user_id)
            .map(|item| {
                item.quantity = quantity;
                item.clone()
            }))
    }

    async fn remove_from_cart(&self, user_id: i64, cart_item_id: i64) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        let owned = tables
            .cart_items
            .rows
            .get(&cart_item_id)
            .is_some_and(|item| item.user_id == user_id);
        if owned {
            tables.cart_items.rows.remove(&cart_item_id);
        }
        Ok(owned)
    }

    async fn clear_cart(&self, user_id: i64) -> Result<()> {
        self.tables
            .lock()
            .await
            .cart_items
            .rows
            .retain(|_, item| item.user_id != user_id);
        Ok(())
    }

    async fn create_recipe(&self, new_recipe: NewRecipe) -> Result<recipe::Model> {
        let mut tables = self.tables.lock().await;
        let candidate = new_recipe.into_model(0)?;
        let id = tables.recipes.allocate_id();
        Ok(tables.recipes.insert(id, recipe::Model { id, ..candidate }))
    }

    async fn list_recipes(&self) -> Result<Vec<recipe::Model>> {
        Ok(self.tables.lock().await.recipes.filtered(|_| true))
    }

    async fn get_recipe(&self, recipe_id: i64) -> Result<Option<recipe::Model>> {
        Ok(self.tables.lock().await.recipes.get(recipe_id))
    }

    async fn recipes_using_product(&self, product_id: i64) -> Result<Vec<recipe::Model>> {
        Ok(self
            .tables
            .lock()
            .await
            .recipes
            .filtered(|r| r.uses_product(product_id)))
    }

    async fn create_eco_swap(&self, new_swap: NewEcoSwap) -> Result<eco_swap::Model> {
        let mut tables = self.tables.lock().await;
        let candidate = new_swap.into_model(0)?;
        tables.require_product(candidate.original_product_id)?;
        tables.require_product(candidate.swap_product_id)?;
        let id = tables.eco_swaps.allocate_id();
        Ok(tables.eco_swaps.insert(id, eco_swap::Model { id, ..candidate }))
    }

    async fn eco_swaps(&self, product_id: i64) -> Result<Vec<EcoSwapSuggestion>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .eco_swaps
            .rows
            .values()
            .filter(|swap| swap.original_product_id == product_id)
            .filter_map(|swap| {
                tables
                    .products
                    .get(swap.swap_product_id)
                    .map(|swap_product| EcoSwapSuggestion {
                        swap: swap.clone(),
                        swap_product,
                    })
            })
            .collect())
    }

    async fn create_notification(
        &self,
        user_id: i64,
        new_notification: NewNotification,
    ) -> Result<notification::Model> {
        let new_notification = new_notification.validate()?;
        let mut tables = self.tables.lock().await;
        tables.require_user(user_id)?;
        let id = tables.notifications.allocate_id();
        Ok(tables.notifications.insert(
            id,
            notification::Model {
                id,
                user_id,
                kind: new_notification.kind.as_str().to_string(),
                title: new_notification.title,
                message: new_notification.message,
                is_read: false,
                created_at: Utc::now(),
            },
        ))
    }

    async fn list_notifications(&self, user_id: i64) -> Result<Vec<notification::Model>> {
        let mut notifications = self
            .tables
            .lock()
            .await
            .notifications
            .filtered(|n| n.user_id == user_id);
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(notifications)
    }

    async fn mark_notification_read(&self, user_id: i64, notification_id: i64) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        Ok(tables
            .notifications
            .rows
            .get_mut(&notification_id)
            .filter(|n| n.user_id == user_id)
            .map(|n| n.is_read = true)
            .is_some())
    }

    async fn unread_notification_count(&self, user_id: i64) -> Result<u64> {
        let tables = self.tables.lock().await;
        let unread = tables
            .notifications
            .rows
            .values()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count();
        Ok(u64::try_from(unread)?)
    }

    async fn add_garden_progress(
        &self,
        user_id: i64,
        plant_type: &str,
        eco_action: &str,
    ) -> Result<garden_progress::Model> {
        let (plant_type, eco_action) = account::validate_garden_entry(plant_type, eco_action)?;
        let mut tables = self.tables.lock().await;
        tables.require_user(user_id)?;
        let id = tables.garden_progress.allocate_id();
        Ok(tables.garden_progress.insert(
            id,
            garden_progress::Model {
                id,
                user_id,
                plant_type,
                eco_action,
                unlocked_at: Utc::now(),
            },
        ))
    }

    async fn garden_progress(&self, user_id: i64) -> Result<Vec<garden_progress::Model>> {
        Ok(self
            .tables
            .lock()
            .await
            .garden_progress
            .filtered(|g| g.user_id == user_id))
    }

    #[instrument(skip(self, new_order))]
    async fn create_order(&self, user_id: i64, new_order: NewOrder) -> Result<order_entity::Model> {
        let mut tables = self.tables.lock().await;
        tables.require_user(user_id)?;
        let prepared = order::prepare(new_order, &tables.cart_lines(user_id))?;

        let id = tables.orders.allocate_id();
        let created = tables.orders.insert(
            id,
            order_entity::Model {
                id,
                user_id,
                total: prepared.total,
                status: prepared.status.as_str().to_string(),
                order_date: prepared.order_date,
                items: prepared.items,
            },
        );
        tables
            .cart_items
            .rows
            .retain(|_, item| item.user_id != user_id);

        debug!(order_id = created.id, total = %created.total, "order placed, cart cleared");
        Ok(created)
    }

    async fn list_orders(&self, user_id: i64) -> Result<Vec<order_entity::Model>> {
        let mut orders = self
            .tables
            .lock()
            .await
            .orders
            .filtered(|o| o.user_id == user_id);
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date).then(b.id.cmp(&a.id)));
        Ok(orders)
    }
}
