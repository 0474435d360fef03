//! Command implementations.
//!
//! Each command drives the storefront client against the configured
//! backend and returns the text to print.

pub mod check;
pub mod countries;
pub mod storefront;

use market_storefront::config::ConfigError;
use market_storefront::{ClientError, DomError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The page is missing an element the controller needs.
    #[error("Page error: {0}")]
    Dom(#[from] DomError),

    /// The backend could not be reached or answered with a failure.
    #[error("Backend error: {0}")]
    Client(#[from] ClientError),

    /// The page snapshot could not be rendered.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// The action completed but the page reported a failure.
    #[error("{0}")]
    Rejected(String),

    /// No rendered country card has the given id.
    #[error("Unknown country: {0}")]
    UnknownCountry(String),
}
