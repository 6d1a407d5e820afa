//! Seeds an empty store from the catalog configuration.
//!
//! Seeding goes through the [`Storage`] trait, so both adapters are filled
//! the same way and every row passes the usual validation. A store that
//! already has categories is left untouched.

use super::Storage;
use crate::{
    config::catalog::{CatalogConfig, DemoUserConfig, RecipeConfig},
    core::{
        account::NewUser,
        catalog::{NewCategory, NewEcoSwap, NewRecipe},
        order::NewOrder,
    },
    entities::{order::OrderLineItem, recipe::Ingredient, user},
    errors::{Error, Result},
};
use chrono::{Duration, Utc};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// What a seeding run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Categories inserted
    pub categories: usize,
    /// Products inserted
    pub products: usize,
    /// Recipes inserted
    pub recipes: usize,
    /// Eco swaps inserted
    pub eco_swaps: usize,
    /// Orders inserted for the demo user
    pub orders: usize,
}

fn lookup(ids: &HashMap<String, i64>, kind: &str, name: &str) -> Result<i64> {
    ids.get(name).copied().ok_or_else(|| Error::Config {
        message: format!("Seed catalog references unknown {kind} '{name}'"),
    })
}

/// Inserts the catalog and demo data unless the store is already seeded.
///
/// Returns `None` when seeding was skipped.
///
/// # Errors
/// Returns [`Error::Config`] when an entry references a category or product
/// name that the catalog does not define, and any validation error raised by
/// the rows themselves.
#[instrument(skip_all, fields(backend = storage.backend_tag()))]
pub async fn seed_catalog(
    storage: &dyn Storage,
    catalog: &CatalogConfig,
) -> Result<Option<SeedSummary>> {
    if !storage.list_categories().await?.is_empty() {
        info!("Store already seeded, skipping");
        return Ok(None);
    }

    let mut summary = SeedSummary::default();

    let mut category_ids = HashMap::new();
    for category in &catalog.categories {
        let created = storage
            .create_category(NewCategory {
                name: category.name.clone(),
                icon: category.icon.clone(),
                color: category.color.clone(),
            })
            .await?;
        category_ids.insert(created.name.clone(), created.id);
        summary.categories += 1;
    }

    let mut product_ids = HashMap::new();
    for product in &catalog.products {
        let category_id = product
            .category
            .as_deref()
            .map(|name| lookup(&category_ids, "category", name))
            .transpose()?;
        let created = storage
            .create_product(product.clone().into_new_product(category_id))
            .await?;
        product_ids.insert(created.name.clone(), created.id);
        summary.products += 1;
    }

    for recipe in &catalog.recipes {
        storage
            .create_recipe(recipe_input(recipe, &product_ids)?)
            .await?;
        summary.recipes += 1;
    }

    for swap in &catalog.eco_swaps {
        storage
            .create_eco_swap(NewEcoSwap {
                original_product_id: lookup(&product_ids, "product", &swap.original)?,
                swap_product_id: lookup(&product_ids, "product", &swap.swap)?,
                co2_savings: swap.co2_savings.clone(),
                description: swap.description.clone(),
            })
            .await?;
        summary.eco_swaps += 1;
    }

    if let Some(demo) = &catalog.demo_user {
        let user = seed_demo_user(storage, demo).await?;

        for notification in &catalog.notifications {
            storage
                .create_notification(user.id, notification.clone().into())
                .await?;
        }

        for entry in &catalog.garden {
            storage
                .add_garden_progress(user.id, &entry.plant_type, &entry.eco_action)
                .await?;
        }

        for order in &catalog.orders {
            let mut items = Vec::with_capacity(order.items.len());
            for item in &order.items {
                let product_id = lookup(&product_ids, "product", &item.product)?;
                let product = storage
                    .get_product(product_id)
                    .await?
                    .ok_or_else(|| Error::not_found("product", product_id))?;
                items.push(OrderLineItem {
                    product_id,
                    product_name: product.name,
                    quantity: item.quantity,
                    price: product.price,
                    image_url: product.image_url,
                });
            }

            storage
                .create_order(
                    user.id,
                    NewOrder {
                        total: None,
                        status: order.status,
                        items,
                        placed_at: Some(Utc::now() - Duration::days(i64::from(order.days_ago))),
                    },
                )
                .await?;
            summary.orders += 1;
        }
    } else if !catalog.orders.is_empty()
        || !catalog.notifications.is_empty()
        || !catalog.garden.is_empty()
    {
        warn!("Seed catalog has per-user entries but no demo user; skipping them");
    }

    info!(?summary, "Seeded store from catalog");
    Ok(Some(summary))
}

fn recipe_input(recipe: &RecipeConfig, product_ids: &HashMap<String, i64>) -> Result<NewRecipe> {
    let ingredients = recipe
        .ingredients
        .iter()
        .map(|ingredient| {
            Ok(Ingredient {
                name: ingredient.name.clone(),
                quantity: ingredient.quantity.clone(),
                unit: ingredient.unit.clone(),
                product_id: ingredient
                    .product
                    .as_deref()
                    .map(|name| lookup(product_ids, "product", name))
                    .transpose()?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(NewRecipe {
        name: recipe.name.clone(),
        description: recipe.description.clone(),
        image_url: recipe.image_url.clone(),
        prep_time: recipe.prep_time,
        ingredients,
        instructions: recipe.instructions.clone(),
        eco_rating: recipe.eco_rating.unwrap_or(3),
    })
}

/// Creates the demo shopper and replays their ledger history.
async fn seed_demo_user(storage: &dyn Storage, demo: &DemoUserConfig) -> Result<user::Model> {
    let mut user = storage
        .create_user(NewUser {
            username: demo.username.clone(),
            email: demo.email.clone(),
            budget: demo.budget.clone(),
        })
        .await?;

    if demo.eco_points != 0 {
        user = storage.update_eco_points(user.id, demo.eco_points).await?;
    }
    if let Some(saved) = &demo.co2_saved {
        user = storage.record_co2_saving(user.id, saved).await?;
    }
    for _ in 0..demo.eco_actions {
        storage.reward_eco_action(user.id).await?;
    }

    info!(user_id = user.id, username = %user.username, "Demo user ready");
    Ok(user)
}
