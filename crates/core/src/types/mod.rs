//! Core types for Corner Market.
//!
//! This module provides type-safe wrappers for the backend's domain concepts.

pub mod cart;
pub mod country;
pub mod id;
pub mod money;
pub mod product;

pub use cart::{AddToCartRequest, Cart, CartItem, CheckoutReceipt, ErrorBody};
pub use country::CountryEntry;
pub use id::*;
pub use money::Money;
pub use product::Product;
