//! Catalog products.

use serde::{Deserialize, Serialize};

use crate::types::{Money, ProductId};

/// A product as listed by `GET /api/products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    /// Relative or absolute image URL. Missing, null and empty all mean
    /// "use the placeholder".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Product {
    /// The image to display, falling back to `placeholder`.
    #[must_use]
    pub fn image_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        match self.image.as_deref() {
            Some(src) if !src.is_empty() => src,
            _ => placeholder,
        }
    }
}
