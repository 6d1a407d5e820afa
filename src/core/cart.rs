//! Cart business logic - quantity validation and stock bookkeeping.

use crate::{
    entities::{cart_item, product},
    errors::{Error, Result},
};
use serde::Serialize;

/// A cart row joined with its product, as returned by cart listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// The cart row
    #[serde(flatten)]
    pub item: cart_item::Model,
    /// The product in the row
    pub product: product::Model,
}

/// Rejects quantities below one.
///
/// # Errors
/// Returns [`Error::Validation`] when `quantity < 1`.
pub fn validate_quantity(quantity: i32) -> Result<i32> {
    if quantity < 1 {
        return Err(Error::validation(format!(
            "Quantity must be at least 1, got {quantity}"
        )));
    }
    Ok(quantity)
}

/// Stock left after `quantity` units were added to a cart.
///
/// Stock is only touched while some is left, and never goes below zero.
/// An out-of-stock product can still be carted.
#[must_use]
pub const fn stock_after_add(stock: i32, quantity: i32) -> i32 {
    if stock <= 0 {
        return stock;
    }
    let left = stock.saturating_sub(quantity);
    if left < 0 { 0 } else { left }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert_eq!(validate_quantity(1).ok(), Some(1));
        assert!(matches!(validate_quantity(0), Err(Error::Validation { .. })));
        assert!(matches!(validate_quantity(-3), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_stock_after_add_floors_at_zero() {
        assert_eq!(stock_after_add(5, 2), 3);
        assert_eq!(stock_after_add(1, 1), 0);
        assert_eq!(stock_after_add(1, 4), 0);
        assert_eq!(stock_after_add(0, 1), 0);
    }
}
