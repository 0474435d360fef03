//! Cart and checkout wire types.
//!
//! Line subtotals and the cart total are computed by the backend. The client
//! only displays them and never recomputes them.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{Money, ProductId};

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    pub name: String,
    pub qty: u32,
    pub price: Money,
    pub subtotal: Money,
}

/// The cart as returned by `GET /api/cart`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cart {
    /// Absent and `null` both deserialize to an empty list.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total: Money,
}

impl Cart {
    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<CartItem>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<CartItem>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `POST /api/cart/add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub qty: i32,
}

/// Body of a successful `POST /api/checkout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub total: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Error body the backend sends with non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Build an error body carrying `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
        }
    }
}
