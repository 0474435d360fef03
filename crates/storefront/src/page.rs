//! Full-page snapshots.
//!
//! Renders the current state of a [`Document`] into a complete HTML page,
//! so the whole page can be captured and compared instead of individual
//! mutations.

use askama::Template;

use crate::dom::{Document, ids};

/// The storefront page.
#[derive(Template)]
#[template(path = "storefront.html")]
pub struct StorefrontPage {
    pub title: String,
    pub message: String,
    pub refresh_button: String,
    pub products: String,
    pub cart: String,
    pub checkout_button: String,
}

/// The country directory page.
#[derive(Template)]
#[template(path = "countries.html")]
pub struct CountriesPage {
    pub title: String,
    pub grid: String,
}

fn outer_html(document: &Document, id: &str) -> String {
    document
        .element(id)
        .map(|element| element.outer_html())
        .unwrap_or_default()
}

impl StorefrontPage {
    /// Capture the storefront elements of `document`.
    #[must_use]
    pub fn capture(document: &Document, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: outer_html(document, ids::MESSAGE),
            refresh_button: outer_html(document, ids::REFRESH_BUTTON),
            products: outer_html(document, ids::PRODUCTS),
            cart: outer_html(document, ids::CART),
            checkout_button: outer_html(document, ids::CHECKOUT_BUTTON),
        }
    }
}

impl CountriesPage {
    /// Capture the country grid of `document`.
    #[must_use]
    pub fn capture(document: &Document, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            grid: outer_html(document, ids::COUNTRIES_GRID),
        }
    }
}

/// Render the storefront page as HTML.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_storefront(document: &Document, title: &str) -> askama::Result<String> {
    StorefrontPage::capture(document, title).render()
}

/// Render the country directory page as HTML.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_countries(document: &Document, title: &str) -> askama::Result<String> {
    CountriesPage::capture(document, title).render()
}
