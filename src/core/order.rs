//! Order business logic - checkout validation and cart snapshots.
//!
//! An order stores a copy of what was bought. When the caller supplies line
//! items they are validated and stored as given. Otherwise the snapshot is
//! taken from the caller's cart at checkout time.

use crate::{
    core::{cart::CartLine, money},
    entities::order::{OrderItems, OrderLineItem},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, not yet fulfilled
    Pending,
    /// Fulfilled (the default for storefront checkouts)
    #[default]
    Completed,
    /// Cancelled by the shopper or the store
    Cancelled,
}

impl OrderStatus {
    /// Value stored in the `status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(Error::validation(format!("Unknown order status '{other}'"))),
        }
    }
}

/// Checkout request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Order total; computed from the items when absent
    #[serde(default)]
    pub total: Option<String>,
    /// Defaults to [`OrderStatus::Completed`]
    #[serde(default)]
    pub status: OrderStatus,
    /// Snapshot lines; taken from the cart when empty
    #[serde(default)]
    pub items: Vec<OrderLineItem>,
    /// Backdated placement time, only used when seeding history
    #[serde(skip)]
    pub placed_at: Option<DateTime<Utc>>,
}

/// A validated order ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedOrder {
    /// Normalized total
    pub total: String,
    /// Status
    pub status: OrderStatus,
    /// Normalized snapshot lines
    pub items: OrderItems,
    /// Placement time
    pub order_date: DateTime<Utc>,
}

/// Copies the current cart into order lines.
#[must_use]
pub fn snapshot_from_cart(lines: &[CartLine]) -> Vec<OrderLineItem> {
    lines
        .iter()
        .map(|line| OrderLineItem {
            product_id: line.product.id,
            product_name: line.product.name.clone(),
            quantity: line.item.quantity,
            price: line.product.price.clone(),
            image_url: line.product.image_url.clone(),
        })
        .collect()
}

/// Sum of `price * quantity` over the lines, as a two-place decimal.
///
/// # Errors
/// Returns [`Error::Validation`] if a price is malformed or the sum overflows.
pub fn total_of(items: &[OrderLineItem]) -> Result<String> {
    let mut cents: i64 = 0;
    for item in items {
        let line = money::parse_cents(&item.price)?
            .checked_mul(i64::from(item.quantity))
            .ok_or_else(|| Error::validation("order total overflow"))?;
        cents = cents
            .checked_add(line)
            .ok_or_else(|| Error::validation("order total overflow"))?;
    }
    Ok(money::format_cents(cents))
}

/// Validates a checkout request against the caller's cart.
///
/// # Errors
/// Returns [`Error::Validation`] when there is nothing to order, a line has a
/// quantity below one, or any amount is malformed.
pub fn prepare(order: NewOrder, cart: &[CartLine]) -> Result<PreparedOrder> {
    let items = if order.items.is_empty() {
        snapshot_from_cart(cart)
    } else {
        order.items
    };

    if items.is_empty() {
        return Err(Error::validation("Cannot place an order with no items"));
    }

    let items = items
        .into_iter()
        .map(|item| {
            if item.quantity < 1 {
                return Err(Error::validation(format!(
                    "Quantity for '{}' must be at least 1",
                    item.product_name
                )));
            }
            Ok(OrderLineItem {
                price: money::normalize(&item.price)?,
                ..item
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let total = match order.total {
        Some(total) => money::normalize(&total)?,
        None => total_of(&items)?,
    };

    Ok(PreparedOrder {
        total,
        status: order.status,
        items: OrderItems(items),
        order_date: order.placed_at.unwrap_or_else(Utc::now),
    })
}
