//! Corner Market storefront client.
//!
//! Renders the product catalog, the cart and the country directory into an
//! in-memory [`dom::Document`], driven by a [`backend::StorefrontBackend`].
//! The [`catalog::Catalog`] owns the storefront page, the
//! [`directory::Directory`] owns the country grid, and both report to the
//! user through the [`notifier::Notifier`] or static fallbacks.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod catalog;
pub mod config;
pub mod directory;
pub mod dom;
pub mod error;
pub mod notifier;
pub mod page;
mod request;

pub use backend::{HttpBackend, StorefrontBackend};
pub use catalog::Catalog;
pub use config::StorefrontConfig;
pub use directory::{Directory, NavigationLog, Navigator};
pub use dom::Document;
pub use error::{ClientError, DomError};
pub use notifier::{MessageKind, Notifier};
