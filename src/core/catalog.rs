//! Catalog business logic - product filters and validated inputs for new
//! categories, products, recipes and eco swaps.
//!
//! The types here are shared by every storage adapter, so validation and
//! filter semantics are identical no matter where the rows live.

use crate::{
    core::money,
    entities::{category, eco_swap, product, recipe},
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};

/// Which products a listing should return.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProductFilter {
    /// Every product
    #[default]
    All,
    /// Products in one category
    Category(i64),
    /// Case-insensitive substring match on name or description
    Search(String),
}

impl ProductFilter {
    /// Builds a filter from the optional `category`/`search` query parameters.
    ///
    /// A non-blank search wins over a category.
    #[must_use]
    pub fn from_query(category: Option<i64>, search: Option<&str>) -> Self {
        match (search.map(str::trim).filter(|s| !s.is_empty()), category) {
            (Some(text), _) => Self::Search(text.to_string()),
            (None, Some(id)) => Self::Category(id),
            (None, None) => Self::All,
        }
    }

    /// Whether `product` passes this filter.
    #[must_use]
    pub fn matches(&self, product: &product::Model) -> bool {
        match self {
            Self::All => true,
            Self::Category(id) => product.category_id == Some(*id),
            Self::Search(text) => {
                let needle = text.to_lowercase();
                product.name.to_lowercase().contains(&needle)
                    || product.description.to_lowercase().contains(&needle)
            }
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

fn require_rating(rating: i32) -> Result<i32> {
    if (1..=5).contains(&rating) {
        Ok(rating)
    } else {
        Err(Error::validation(format!(
            "Eco rating must be between 1 and 5, got {rating}"
        )))
    }
}

/// Input for a new category.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    /// Category name
    pub name: String,
    /// Icon shown next to the name
    pub icon: String,
    /// Accent color
    pub color: String,
}

impl NewCategory {
    /// Validates the input and builds the row with the given id.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the name is blank.
    pub fn into_model(self, id: i64) -> Result<category::Model> {
        Ok(category::Model {
            id,
            name: require_text("Category name", &self.name)?,
            icon: self.icon,
            color: self.color,
        })
    }
}

/// Input for a new product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    /// Product name
    pub name: String,
    /// Marketing description
    pub description: String,
    /// Current price
    pub price: String,
    /// Price before discount
    #[serde(default)]
    pub original_price: Option<String>,
    /// Product photo
    #[serde(default)]
    pub image_url: String,
    /// Owning category
    #[serde(default)]
    pub category_id: Option<i64>,
    /// kg of CO₂ per unit
    pub carbon_footprint: String,
    /// 1 to 5
    pub eco_rating: i32,
    /// Units on hand
    pub stock: i32,
    /// Certified organic
    #[serde(default)]
    pub is_organic: bool,
    /// Locally sourced
    #[serde(default)]
    pub is_local: bool,
    /// Fair-trade certified
    #[serde(default)]
    pub is_fair_trade: bool,
    /// Designed for reuse
    #[serde(default)]
    pub is_reusable: bool,
    /// Breaks down naturally
    #[serde(default)]
    pub is_biodegradable: bool,
    /// Discount percentage near expiry
    #[serde(default)]
    pub expiry_discount: Option<i32>,
    /// Days until expiry
    #[serde(default)]
    pub expiry_days: Option<i32>,
    /// Provenance details
    #[serde(default)]
    pub provenance: Option<product::Provenance>,
}

impl NewProduct {
    /// Validates the input and builds the row with the given id.
    ///
    /// Prices are normalized to two decimal places and a discounted price must
    /// not exceed the original price.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] for blank names, malformed or inverted
    /// prices, ratings outside 1–5, negative stock or an out-of-range discount.
    pub fn into_model(self, id: i64) -> Result<product::Model> {
        let name = require_text("Product name", &self.name)?;
        let price = money::normalize(&self.price)?;
        let original_price = self
            .original_price
            .as_deref()
            .map(money::normalize)
            .transpose()?;

        if let Some(original) = &original_price {
            if money::parse_cents(&price)? > money::parse_cents(original)? {
                return Err(Error::validation(format!(
                    "Price {price} exceeds original price {original}"
                )));
            }
        }

        if self.stock < 0 {
            return Err(Error::validation("Stock cannot be negative"));
        }

        if let Some(discount) = self.expiry_discount.filter(|d| !(0..=100).contains(d)) {
            return Err(Error::validation(format!(
                "Expiry discount must be a percentage, got {discount}"
            )));
        }

        Ok(product::Model {
            id,
            name,
            description: self.description,
            price,
            original_price,
            image_url: self.image_url,
            category_id: self.category_id,
            carbon_footprint: money::normalize(&self.carbon_footprint)?,
            eco_rating: require_rating(self.eco_rating)?,
            stock: self.stock,
            is_organic: self.is_organic,
            is_local: self.is_local,
            is_fair_trade: self.is_fair_trade,
            is_reusable: self.is_reusable,
            is_biodegradable: self.is_biodegradable,
            expiry_discount: self.expiry_discount,
            expiry_days: self.expiry_days,
            provenance: self.provenance,
        })
    }
}

/// Input for a new recipe.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    /// Recipe title
    pub name: String,
    /// Short description
    pub description: String,
    /// Photo of the dish
    #[serde(default)]
    pub image_url: String,
    /// Minutes of preparation
    pub prep_time: i32,
    /// Ingredient lines
    pub ingredients: Vec<recipe::Ingredient>,
    /// Steps in order
    pub instructions: Vec<String>,
    /// 1 to 5, defaults to 3
    #[serde(default = "default_eco_rating")]
    pub eco_rating: i32,
}

const fn default_eco_rating() -> i32 {
    3
}

impl NewRecipe {
    /// Validates the input and builds the row with the given id.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] for a blank name, a negative prep time,
    /// no instructions or a rating outside 1–5.
    pub fn into_model(self, id: i64) -> Result<recipe::Model> {
        if self.prep_time < 0 {
            return Err(Error::validation("Prep time cannot be negative"));
        }
        if self.instructions.is_empty() {
            return Err(Error::validation("A recipe needs at least one instruction"));
        }

        Ok(recipe::Model {
            id,
            name: require_text("Recipe name", &self.name)?,
            description: self.description,
            image_url: self.image_url,
            prep_time: self.prep_time,
            ingredients: recipe::Ingredients(self.ingredients),
            instructions: recipe::Instructions(self.instructions),
            eco_rating: require_rating(self.eco_rating)?,
        })
    }
}

/// Input for a new eco swap suggestion.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEcoSwap {
    /// Product being replaced
    pub original_product_id: i64,
    /// Suggested replacement
    pub swap_product_id: i64,
    /// kg of CO₂ saved
    pub co2_savings: String,
    /// Pitch shown to the shopper
    pub description: String,
}

impl NewEcoSwap {
    /// Validates the input and builds the row with the given id.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if a product would be swapped for itself or
    /// the saving is not a valid decimal.
    pub fn into_model(self, id: i64) -> Result<eco_swap::Model> {
        if self.original_product_id == self.swap_product_id {
            return Err(Error::validation("A product cannot be swapped for itself"));
        }

        Ok(eco_swap::Model {
            id,
            original_product_id: self.original_product_id,
            swap_product_id: self.swap_product_id,
            co2_savings: money::normalize(&self.co2_savings)?,
            description: self.description,
        })
    }
}

/// An eco swap joined with the product it suggests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EcoSwapSuggestion {
    /// The swap row
    #[serde(flatten)]
    pub swap: eco_swap::Model,
    /// The suggested product
    pub swap_product: product::Model,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::sample_new_product;

    #[test]
    fn test_search_takes_precedence_over_category() {
        assert_eq!(
            ProductFilter::from_query(Some(2), Some("tomato")),
            ProductFilter::Search("tomato".to_string())
        );
        assert_eq!(
            ProductFilter::from_query(Some(2), Some("   ")),
            ProductFilter::Category(2)
        );
        assert_eq!(ProductFilter::from_query(None, None), ProductFilter::All);
    }

    #[test]
    fn test_search_is_case_insensitive_on_name_and_description() {
        let tomatoes = sample_new_product("Organic Tomatoes").into_model(1).unwrap();
        let mut brush = sample_new_product("Bamboo Toothbrush").into_model(2).unwrap();
        brush.description = "Keeps TOMATO sauce off your teeth".to_string();

        let filter = ProductFilter::Search("TOMATO".to_string());
        assert!(filter.matches(&tomatoes));
        assert!(filter.matches(&brush));

        let filter = ProductFilter::Search("bamboo".to_string());
        assert!(!filter.matches(&tomatoes));
        assert!(filter.matches(&brush));
    }

    #[test]
    fn test_category_filter_is_exact() {
        let mut product = sample_new_product("Oat Milk").into_model(1).unwrap();
        product.category_id = Some(4);
        assert!(ProductFilter::Category(4).matches(&product));
        assert!(!ProductFilter::Category(40).matches(&product));
    }

    #[test]
    fn test_new_product_normalizes_prices() {
        let mut input = sample_new_product("Oat Milk");
        input.price = "3.5".to_string();
        input.original_price = Some("4".to_string());
        let product = input.into_model(7).unwrap();
        assert_eq!(product.id, 7);
        assert_eq!(product.price, "3.50");
        assert_eq!(product.original_price.as_deref(), Some("4.00"));
    }

    #[test]
    fn test_new_product_rejects_invalid_input() {
        let mut inverted = sample_new_product("Oat Milk");
        inverted.original_price = Some("1.00".to_string());
        assert!(matches!(inverted.into_model(1), Err(Error::Validation { .. })));

        let mut rating = sample_new_product("Oat Milk");
        rating.eco_rating = 6;
        assert!(matches!(rating.into_model(1), Err(Error::Validation { .. })));

        let mut stock = sample_new_product("Oat Milk");
        stock.stock = -1;
        assert!(matches!(stock.into_model(1), Err(Error::Validation { .. })));

        let blank = sample_new_product("   ");
        assert!(matches!(blank.into_model(1), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_eco_swap_to_itself_is_rejected() {
        let swap = NewEcoSwap {
            original_product_id: 3,
            swap_product_id: 3,
            co2_savings: "1.2".to_string(),
            description: "no-op".to_string(),
        };
        assert!(matches!(swap.into_model(1), Err(Error::Validation { .. })));
    }
}
