//! Corner Market Core - Shared types library.
//!
//! This crate provides the types exchanged with the market backend and used
//! by every other component:
//! - `storefront` - Client rendering layer (catalog, cart, country directory)
//! - `cli` - Command-line driver for the rendering layer
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! rendering. Every type here mirrors the JSON wire format of the backend.
//!
//! # Modules
//!
//! - [`types`] - Type-safe ids, money, catalog, cart and country types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
