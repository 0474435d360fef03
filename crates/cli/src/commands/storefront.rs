//! Storefront commands: render the page, add to cart and check out.
//!
//! # Usage
//!
//! ```bash
//! # Print the storefront page after the initial load
//! market render
//!
//! # Add three of product 2 to the cart
//! market add 2 --qty 3
//!
//! # Check out the current cart
//! market checkout
//! ```

use market_core::ProductId;
use market_storefront::dom::ids;
use market_storefront::page::render_storefront;
use market_storefront::{
    Catalog, Document, HttpBackend, MessageKind, Notifier, StorefrontBackend, StorefrontConfig,
};

use super::CommandError;

const PAGE_TITLE: &str = "Corner Market";

fn attach(config: &StorefrontConfig) -> Result<Catalog<HttpBackend>, CommandError> {
    let document = Document::storefront();
    let notifier = Notifier::new(document.require(ids::MESSAGE)?, config.message_timeout);
    Ok(Catalog::new(
        HttpBackend::from_config(config),
        &document,
        notifier,
        config.placeholder_image.clone(),
    )?)
}

/// Text of every cart row, one per line.
fn cart_lines<B: StorefrontBackend>(catalog: &Catalog<B>) -> Result<Vec<String>, CommandError> {
    let cart = catalog.document().require(ids::CART)?;
    Ok(cart.children().iter().map(|node| node.text_content()).collect())
}

/// Outcome of an action: the notification followed by the cart.
fn outcome<B: StorefrontBackend>(catalog: &Catalog<B>) -> Result<String, CommandError> {
    let notifier = catalog.notifier();
    if notifier.kind() == Some(MessageKind::Error) {
        return Err(CommandError::Rejected(notifier.text()));
    }

    let mut lines = vec![notifier.text()];
    lines.extend(cart_lines(catalog)?);
    Ok(lines.join("\n"))
}

/// Load the storefront and render the whole page.
pub async fn render(config: &StorefrontConfig) -> Result<String, CommandError> {
    let catalog = attach(config)?;
    catalog.init().await;
    Ok(render_storefront(catalog.document(), PAGE_TITLE)?)
}

/// Load the storefront, add `qty` of a product and show the cart.
pub async fn add(
    config: &StorefrontConfig,
    product_id: ProductId,
    qty: i32,
) -> Result<String, CommandError> {
    let catalog = attach(config)?;
    catalog.init().await;

    let input = market_storefront::catalog::quantity_input_id(product_id);
    if catalog.document().set_value(&input, &qty.to_string()) {
        catalog.click_add(product_id).await;
    } else {
        tracing::warn!(%product_id, "Product is not listed, adding anyway");
        catalog.add_to_cart(product_id, qty).await;
    }
    outcome(&catalog)
}

/// Load the storefront and check out the cart.
pub async fn checkout(config: &StorefrontConfig) -> Result<String, CommandError> {
    let catalog = attach(config)?;
    catalog.init().await;
    catalog.checkout().await;
    outcome(&catalog)
}
