//! Market backend API.
//!
//! # Endpoints
//!
//! | Method | Path | Success body |
//! |---|---|---|
//! | GET | `api/products` | array of [`Product`] |
//! | GET | `api/cart` | [`Cart`] |
//! | POST | `api/cart/add` | ignored |
//! | POST | `api/checkout` | [`CheckoutReceipt`] |
//! | GET | `api/countries` | array of [`CountryEntry`] |
//!
//! Any non-2xx status is a failure. Only the add-to-cart path reads the
//! error body, looking for an `error` field.

mod http;
#[cfg(test)]
pub(crate) mod stub;

pub use http::HttpBackend;

use std::future::Future;

use market_core::{Cart, CheckoutReceipt, CountryEntry, ErrorBody, Product, ProductId};

use crate::error::ClientError;

pub(crate) const PRODUCTS_FAILED: &str = "Failed to load products";
pub(crate) const CART_FAILED: &str = "Failed to load cart";
pub(crate) const ADD_FAILED: &str = "Failed to add to cart";
pub(crate) const ADD_UNPARSEABLE: &str = "Unknown error";
pub(crate) const CHECKOUT_FAILED: &str = "Checkout failed";
pub(crate) const COUNTRIES_FAILED: &str = "Failed to load countries";

/// The calls the storefront and directory pages make against the backend.
pub trait StorefrontBackend: Send + Sync + 'static {
    /// `GET api/products`.
    fn fetch_products(&self) -> impl Future<Output = Result<Vec<Product>, ClientError>> + Send;

    /// `GET api/cart`.
    fn fetch_cart(&self) -> impl Future<Output = Result<Cart, ClientError>> + Send;

    /// `POST api/cart/add`.
    ///
    /// On a non-2xx status the error carries the server's `error` message
    /// when one is present.
    fn add_to_cart(
        &self,
        product_id: ProductId,
        qty: i32,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// `POST api/checkout`.
    fn checkout(&self) -> impl Future<Output = Result<CheckoutReceipt, ClientError>> + Send;

    /// `GET api/countries`.
    fn fetch_countries(
        &self,
    ) -> impl Future<Output = Result<Vec<CountryEntry>, ClientError>> + Send;
}

/// User-facing message for a failed add-to-cart response body.
///
/// A JSON body with a non-empty `error` yields that text; any other JSON
/// object yields the generic failure; a body that is not an error object at
/// all yields "Unknown error".
#[must_use]
pub fn add_failure_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: Some(message),
        }) if !message.is_empty() => message,
        Ok(_) => ADD_FAILED.to_string(),
        Err(_) => ADD_UNPARSEABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_failure_message_uses_server_error() {
        assert_eq!(add_failure_message(r#"{"error":"Out of stock"}"#), "Out of stock");
    }

    #[test]
    fn test_add_failure_message_without_error_field() {
        assert_eq!(add_failure_message(r#"{"ok":false}"#), "Failed to add to cart");
        assert_eq!(add_failure_message(r#"{"error":""}"#), "Failed to add to cart");
    }

    #[test]
    fn test_add_failure_message_unparseable_body() {
        assert_eq!(add_failure_message("<html>502</html>"), "Unknown error");
        assert_eq!(add_failure_message(""), "Unknown error");
    }
}
