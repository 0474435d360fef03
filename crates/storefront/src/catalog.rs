//! Product catalog, cart and checkout.
//!
//! Each refresh fetches from the backend, clears its render target and
//! rebuilds it from scratch. Add controls are re-bound on every product
//! render. Every action handles its own failures: the user sees a
//! notification or a static fallback, and nothing is returned to the caller.

use std::collections::HashSet;
use std::num::IntErrorKind;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use market_core::{Cart, CartItem, Product, ProductId};
use tracing::{debug, info, instrument, warn};

use crate::backend::StorefrontBackend;
use crate::dom::{Document, Element, ElementNode, Node, RenderTarget, ids};
use crate::error::DomError;
use crate::notifier::{MessageKind, Notifier};
use crate::request::RequestTracker;

pub const EMPTY_CART_TEXT: &str = "Cart is empty.";
pub const PRODUCTS_FALLBACK_TEXT: &str = "Failed to load products.";
pub const CART_FALLBACK_TEXT: &str = "Failed to load cart.";
pub const ADDED_TEXT: &str = "Added to cart";

/// Id of the quantity input rendered next to a product's add button.
#[must_use]
pub fn quantity_input_id(product_id: ProductId) -> String {
    format!("qty-{product_id}")
}

/// The storefront page controller.
///
/// Cheap to clone; clones drive the same page.
pub struct Catalog<B> {
    inner: Arc<CatalogInner<B>>,
}

impl<B> Clone for Catalog<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct CatalogInner<B> {
    backend: B,
    document: Document,
    products: Arc<Element>,
    cart: Arc<Element>,
    checkout_button: Arc<Element>,
    notifier: Notifier,
    placeholder_image: String,
    product_requests: RequestTracker,
    cart_requests: RequestTracker,
    /// Products whose add control is currently rendered.
    bound: Mutex<HashSet<ProductId>>,
}

impl<B: StorefrontBackend> Catalog<B> {
    /// Attach to a storefront page.
    ///
    /// # Errors
    ///
    /// Returns `DomError::MissingElement` if the page lacks `#products`,
    /// `#cart` or `#checkoutBtn`.
    pub fn new(
        backend: B,
        document: &Document,
        notifier: Notifier,
        placeholder_image: impl Into<String>,
    ) -> Result<Self, DomError> {
        Ok(Self {
            inner: Arc::new(CatalogInner {
                backend,
                document: document.clone(),
                products: document.require(ids::PRODUCTS)?,
                cart: document.require(ids::CART)?,
                checkout_button: document.require(ids::CHECKOUT_BUTTON)?,
                notifier,
                placeholder_image: placeholder_image.into(),
                product_requests: RequestTracker::new(),
                cart_requests: RequestTracker::new(),
                bound: Mutex::new(HashSet::new()),
            }),
        })
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    fn bound(&self) -> MutexGuard<'_, HashSet<ProductId>> {
        self.inner.bound.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether an add control for `product_id` is currently rendered.
    #[must_use]
    pub fn is_bound(&self, product_id: ProductId) -> bool {
        self.bound().contains(&product_id)
    }

    /// Initial load: products, then cart.
    #[instrument(skip(self))]
    pub async fn init(&self) {
        info!("Initializing storefront");
        self.refresh().await;
    }

    /// Manual refresh: products, then cart, in sequence.
    #[instrument(skip(self))]
    pub async fn refresh(&self) {
        self.refresh_products().await;
        self.refresh_cart().await;
    }

    /// Fetch products and rebuild the product list.
    #[instrument(skip(self))]
    pub async fn refresh_products(&self) {
        let token = self.inner.product_requests.issue();
        let result = self.inner.backend.fetch_products().await;
        if !self.inner.product_requests.is_current(token) {
            debug!("Dropping stale products response");
            return;
        }

        match result {
            Ok(products) => self.render_products(&products),
            Err(e) => {
                warn!(error = %e, "Failed to refresh products");
                self.inner
                    .notifier
                    .show(format!("Could not load products: {e}"), MessageKind::Error);
                self.bound().clear();
                self.inner.products.set_content(muted(PRODUCTS_FALLBACK_TEXT));
            }
        }
    }

    fn render_products(&self, products: &[Product]) {
        let target = &self.inner.products;
        target.clear();

        let mut bound = self.bound();
        bound.clear();
        for product in products {
            if !bound.insert(product.id) {
                warn!(product_id = %product.id, "Skipping duplicate product id");
                continue;
            }
            target.append(product_card(product, &self.inner.placeholder_image));
        }
        debug!(count = bound.len(), "Rendered products");
    }

    /// Fetch the cart and rebuild the cart panel.
    #[instrument(skip(self))]
    pub async fn refresh_cart(&self) {
        let token = self.inner.cart_requests.issue();
        let result = self.inner.backend.fetch_cart().await;
        if !self.inner.cart_requests.is_current(token) {
            debug!("Dropping stale cart response");
            return;
        }

        let target = &self.inner.cart;
        let checkout = &self.inner.checkout_button;
        match result {
            Ok(cart) if cart.is_empty() => {
                target.set_text(EMPTY_CART_TEXT);
                checkout.set_disabled(true);
            }
            Ok(cart) => {
                render_cart(target.as_ref(), &cart);
                checkout.set_disabled(false);
            }
            Err(e) => {
                warn!(error = %e, "Failed to refresh cart");
                self.inner
                    .notifier
                    .show(format!("Could not load cart: {e}"), MessageKind::Error);
                target.set_content(muted(CART_FALLBACK_TEXT));
                checkout.set_disabled(true);
            }
        }
    }

    /// Add `qty` of a product to the cart.
    ///
    /// On success the cart is refreshed; on failure the server's message is
    /// shown and the cart is left alone.
    #[instrument(skip(self))]
    pub async fn add_to_cart(&self, product_id: ProductId, qty: i32) {
        match self.inner.backend.add_to_cart(product_id, qty).await {
            Ok(()) => {
                self.inner.notifier.show(ADDED_TEXT, MessageKind::Success);
                self.refresh_cart().await;
            }
            Err(e) => {
                warn!(error = %e, "Add to cart failed");
                self.inner.notifier.show(e.to_string(), MessageKind::Error);
            }
        }
    }

    /// Click on a product's "Add" button.
    ///
    /// Reads the adjacent quantity input; anything that does not parse to a
    /// non-zero integer counts as 1. Clicks on products that are not
    /// currently rendered are ignored.
    #[instrument(skip(self))]
    pub async fn click_add(&self, product_id: ProductId) {
        if !self.is_bound(product_id) {
            warn!("Ignoring click on unbound add control");
            return;
        }
        let raw = self
            .inner
            .document
            .value(&quantity_input_id(product_id));
        let qty = parse_quantity(raw.as_deref());
        self.add_to_cart(product_id, qty).await;
    }

    /// POST checkout and report the charged total.
    #[instrument(skip(self))]
    pub async fn checkout(&self) {
        match self.inner.backend.checkout().await {
            Ok(receipt) => {
                info!(total = %receipt.total, "Checked out");
                self.inner.notifier.show(
                    format!("Checked out. Total: {}", receipt.total),
                    MessageKind::Success,
                );
                self.refresh_cart().await;
            }
            Err(e) => {
                warn!(error = %e, "Checkout failed");
                self.inner.notifier.show(e.to_string(), MessageKind::Error);
            }
        }
    }

    /// Click on `#checkoutBtn`. Does nothing while the button is disabled.
    pub async fn click_checkout(&self) {
        if self.inner.checkout_button.is_disabled() {
            debug!("Checkout button is disabled");
            return;
        }
        self.checkout().await;
    }

    /// Click on `#refreshBtn`.
    pub async fn click_refresh(&self) {
        self.refresh().await;
    }
}

/// Parse a quantity the way a browser number field is read: leading
/// whitespace, optional sign, then digits up to the first non-digit.
/// Unparseable input and zero fall back to 1. Values outside the `i32` range
/// saturate to its bounds and are left for the backend to reject.
#[must_use]
pub fn parse_quantity(raw: Option<&str>) -> i32 {
    let Some(raw) = raw else {
        return 1;
    };
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => ("-", trimmed.get(1..).unwrap_or_default()),
        Some(b'+') => ("", trimmed.get(1..).unwrap_or_default()),
        _ => ("", trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    match format!("{sign}{}", digits.get(..end).unwrap_or_default()).parse::<i32>() {
        Ok(0) => 1,
        Ok(qty) => qty,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i32::MAX,
            IntErrorKind::NegOverflow => i32::MIN,
            _ => 1,
        },
    }
}

fn muted(text: &str) -> Node {
    ElementNode::new("div").class("muted").text(text).into()
}

fn product_card(product: &Product, placeholder: &str) -> Node {
    let id = product.id.to_string();
    ElementNode::new("div")
        .class("product")
        .child(
            ElementNode::new("div")
                .class("prod-left")
                .child(
                    ElementNode::new("img")
                        .class("prod-img")
                        .attr("src", product.image_or(placeholder))
                        .attr("alt", product.name.as_str()),
                )
                .child(ElementNode::new("div").class("prod-name").text(product.name.as_str()))
                .child(
                    ElementNode::new("div")
                        .class("prod-price")
                        .text(product.price.to_string()),
                ),
        )
        .child(
            ElementNode::new("div")
                .class("prod-right")
                .child(
                    ElementNode::new("input")
                        .class("qty")
                        .attr("type", "number")
                        .attr("min", "1")
                        .attr("value", "1")
                        .id(quantity_input_id(product.id)),
                )
                .child(
                    ElementNode::new("button")
                        .class("add")
                        .attr("data-id", id)
                        .text("Add"),
                ),
        )
        .into()
}

fn cart_row(item: &CartItem) -> Node {
    ElementNode::new("div")
        .class("cart-item")
        .child(ElementNode::new("div").class("ci-left").text(item.name.as_str()))
        .child(
            ElementNode::new("div")
                .class("ci-right")
                .text(format!("{} × {} = ", item.qty, item.price))
                .child(ElementNode::new("strong").text(item.subtotal.to_string())),
        )
        .into()
}

fn render_cart(target: &impl RenderTarget, cart: &Cart) {
    target.clear();
    for item in &cart.items {
        target.append(cart_row(item));
    }
    target.append(
        ElementNode::new("div")
            .class("cart-total")
            .text(format!("Total: {}", cart.total))
            .into(),
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::time::Duration;

    use market_core::{CheckoutReceipt, Money};
    use reqwest::StatusCode;

    use super::*;
    use crate::backend::stub::{Call, StubBackend};

    fn product(id: i32, name: &str, cents: i64, image: Option<&str>) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Money::from_cents(cents),
            image: image.map(str::to_string),
        }
    }

    fn widget_cart() -> Cart {
        Cart {
            items: vec![CartItem {
                product_id: Some(ProductId::new(1)),
                name: "Widget".to_string(),
                qty: 2,
                price: Money::from_cents(500),
                subtotal: Money::from_cents(1000),
            }],
            total: Money::from_cents(1000),
        }
    }

    fn catalog() -> Catalog<StubBackend> {
        let document = Document::storefront();
        let notifier = Notifier::new(
            document.require(ids::MESSAGE).unwrap(),
            Duration::from_millis(3500),
        );
        Catalog::new(
            StubBackend::default(),
            &document,
            notifier,
            "images/placeholder.svg",
        )
        .unwrap()
    }

    fn element(catalog: &Catalog<StubBackend>, id: &str) -> Arc<Element> {
        catalog.document().require(id).unwrap()
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(Some("3")), 3);
        assert_eq!(parse_quantity(Some(" 12abc")), 12);
        assert_eq!(parse_quantity(Some("abc")), 1);
        assert_eq!(parse_quantity(Some("")), 1);
        assert_eq!(parse_quantity(Some("0")), 1);
        assert_eq!(parse_quantity(Some("2.9")), 2);
        assert_eq!(parse_quantity(Some("-2")), -2);
        assert_eq!(parse_quantity(None), 1);
    }

    #[test]
    fn test_parse_quantity_saturates_out_of_range_values() {
        assert_eq!(parse_quantity(Some("99999999999")), i32::MAX);
        assert_eq!(parse_quantity(Some("-99999999999")), i32::MIN);
        assert_eq!(parse_quantity(Some("2147483647")), i32::MAX);
        assert_eq!(parse_quantity(Some("123456789012abc")), i32::MAX);
    }

    #[test]
    fn test_new_requires_markup() {
        let document = Document::directory();
        let notifier = Notifier::new(
            Arc::new(Element::new("message", "div")),
            Duration::from_millis(3500),
        );
        let result = Catalog::new(StubBackend::default(), &document, notifier, "p.svg");
        assert_eq!(
            result.err(),
            Some(DomError::MissingElement("products".to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_products_renders_one_card_per_product() {
        let catalog = catalog();
        catalog.backend().set_products(vec![
            product(1, "Apple", 50, Some("images/apple.svg")),
            product(2, "Bread", 120, None),
            product(3, "Milk", 99, Some("")),
        ]);

        catalog.refresh_products().await;

        let products = element(&catalog, ids::PRODUCTS);
        let cards = products.select(|n| n.has_class("product"));
        assert_eq!(cards.len(), 3);

        let prices: Vec<String> = products
            .select(|n| n.has_class("prod-price"))
            .iter()
            .map(|n| Node::from(n.clone()).text_content())
            .collect();
        assert_eq!(prices, vec!["$0.50", "$1.20", "$0.99"]);

        let images: Vec<String> = products
            .select(|n| n.tag() == "img")
            .iter()
            .filter_map(|n| n.attribute("src").map(str::to_string))
            .collect();
        assert_eq!(
            images,
            vec!["images/apple.svg", "images/placeholder.svg", "images/placeholder.svg"]
        );

        let buttons = products.select(|n| n.has_class("add"));
        let data_ids: Vec<&str> = buttons.iter().filter_map(|b| b.attribute("data-id")).collect();
        assert_eq!(data_ids, vec!["1", "2", "3"]);
        for id in 1..=3 {
            assert!(catalog.is_bound(ProductId::new(id)));
            assert_eq!(
                catalog.document().value(&format!("qty-{id}")).as_deref(),
                Some("1")
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_products_replaces_previous_render() {
        let catalog = catalog();
        catalog.backend().set_products(vec![
            product(1, "Apple", 50, None),
            product(2, "Bread", 120, None),
        ]);
        catalog.refresh_products().await;

        catalog.backend().set_products(vec![product(5, "Chocolate", 175, None)]);
        catalog.refresh_products().await;

        let products = element(&catalog, ids::PRODUCTS);
        assert_eq!(products.child_count(), 1);
        assert!(catalog.document().node("qty-1").is_none());
        assert!(!catalog.is_bound(ProductId::new(1)));
        assert!(catalog.is_bound(ProductId::new(5)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_products_skips_duplicate_ids() {
        let catalog = catalog();
        catalog.backend().set_products(vec![
            product(1, "Apple", 50, None),
            product(1, "Apple again", 60, None),
        ]);
        catalog.refresh_products().await;
        assert_eq!(element(&catalog, ids::PRODUCTS).child_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_product_names_are_escaped() {
        let catalog = catalog();
        catalog
            .backend()
            .set_products(vec![product(1, "<b>Fish & Chips</b>", 450, None)]);
        catalog.refresh_products().await;

        let html = element(&catalog, ids::PRODUCTS).inner_html();
        assert!(html.contains("&lt;b&gt;Fish &amp; Chips&lt;/b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_products_failure_shows_fallback_and_notifies() {
        let catalog = catalog();
        catalog.backend().set_products(vec![product(1, "Apple", 50, None)]);
        catalog.refresh_products().await;

        catalog
            .backend()
            .fail_products(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load products");
        catalog.refresh_products().await;

        let products = element(&catalog, ids::PRODUCTS);
        assert_eq!(
            products.inner_html(),
            "<div class=\"muted\">Failed to load products.</div>"
        );
        assert!(!catalog.is_bound(ProductId::new(1)));
        assert_eq!(
            catalog.notifier().text(),
            "Could not load products: Failed to load products"
        );
        assert_eq!(catalog.notifier().kind(), Some(MessageKind::Error));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_cart_disables_checkout() {
        let catalog = catalog();
        catalog.backend().set_cart(Cart::default());
        catalog.refresh_cart().await;

        assert_eq!(element(&catalog, ids::CART).text_content(), "Cart is empty.");
        assert!(element(&catalog, ids::CHECKOUT_BUTTON).is_disabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cart_lines_and_total() {
        let catalog = catalog();
        catalog.backend().set_cart(widget_cart());
        catalog.refresh_cart().await;

        let cart = element(&catalog, ids::CART);
        let text = cart.text_content();
        assert!(text.contains("2 × $5.00 = $10.00"), "{text}");
        assert!(text.contains("Total: $10.00"), "{text}");
        assert!(cart.inner_html().contains("<strong>$10.00</strong>"));
        assert!(!element(&catalog, ids::CHECKOUT_BUTTON).is_disabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cart_failure_disables_checkout() {
        let catalog = catalog();
        catalog.backend().set_cart(widget_cart());
        catalog.refresh_cart().await;

        catalog
            .backend()
            .fail_cart(StatusCode::BAD_GATEWAY, "Failed to load cart");
        catalog.refresh_cart().await;

        assert_eq!(
            element(&catalog, ids::CART).inner_html(),
            "<div class=\"muted\">Failed to load cart.</div>"
        );
        assert!(element(&catalog, ids::CHECKOUT_BUTTON).is_disabled());
        assert_eq!(
            catalog.notifier().text(),
            "Could not load cart: Failed to load cart"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_to_cart_failure_shows_server_message_without_refresh() {
        let catalog = catalog();
        catalog.backend().fail_add(StatusCode::CONFLICT, "Out of stock");

        catalog.add_to_cart(ProductId::new(7), 3).await;

        assert_eq!(catalog.notifier().text(), "Out of stock");
        assert_eq!(catalog.notifier().kind(), Some(MessageKind::Error));
        assert_eq!(catalog.backend().calls(), vec![Call::Add(ProductId::new(7), 3)]);
        assert_eq!(catalog.backend().count(&Call::Cart), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_to_cart_success_notifies_and_refreshes_cart() {
        let catalog = catalog();
        catalog.backend().set_cart(widget_cart());

        catalog.add_to_cart(ProductId::new(1), 2).await;

        assert_eq!(catalog.notifier().text(), "Added to cart");
        assert_eq!(catalog.notifier().kind(), Some(MessageKind::Success));
        assert_eq!(
            catalog.backend().calls(),
            vec![Call::Add(ProductId::new(1), 2), Call::Cart]
        );
        assert!(element(&catalog, ids::CART).text_content().contains("Total: $10.00"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_add_reads_quantity_input() {
        let catalog = catalog();
        catalog.backend().set_products(vec![
            product(1, "Apple", 50, None),
            product(2, "Bread", 120, None),
        ]);
        catalog.refresh_products().await;

        assert!(catalog.document().set_value("qty-2", "4"));
        catalog.click_add(ProductId::new(2)).await;

        assert!(catalog.document().set_value("qty-1", "lots"));
        catalog.click_add(ProductId::new(1)).await;

        let adds: Vec<Call> = catalog
            .backend()
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Add(..)))
            .collect();
        assert_eq!(
            adds,
            vec![Call::Add(ProductId::new(2), 4), Call::Add(ProductId::new(1), 1)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_add_ignores_unbound_product() {
        let catalog = catalog();
        catalog.click_add(ProductId::new(9)).await;
        assert!(catalog.backend().calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkout_success() {
        let catalog = catalog();
        catalog.backend().set_checkout(CheckoutReceipt {
            total: Money::from_cents(1234),
            message: Some("Purchase completed".to_string()),
        });

        catalog.checkout().await;

        assert_eq!(catalog.notifier().text(), "Checked out. Total: $12.34");
        assert_eq!(catalog.notifier().kind(), Some(MessageKind::Success));
        assert_eq!(catalog.backend().calls(), vec![Call::Checkout, Call::Cart]);
        assert_eq!(element(&catalog, ids::CART).text_content(), "Cart is empty.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkout_failure() {
        let catalog = catalog();
        catalog
            .backend()
            .fail_checkout(StatusCode::INTERNAL_SERVER_ERROR, "Checkout failed");

        catalog.checkout().await;

        assert_eq!(catalog.notifier().text(), "Checkout failed");
        assert_eq!(catalog.notifier().kind(), Some(MessageKind::Error));
        assert_eq!(catalog.backend().calls(), vec![Call::Checkout]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_checkout_respects_disabled_button() {
        let catalog = catalog();
        catalog.refresh_cart().await;
        assert!(element(&catalog, ids::CHECKOUT_BUTTON).is_disabled());

        catalog.click_checkout().await;
        assert_eq!(catalog.backend().count(&Call::Checkout), 0);

        catalog.backend().set_cart(widget_cart());
        catalog.refresh_cart().await;
        catalog.click_checkout().await;
        assert_eq!(catalog.backend().count(&Call::Checkout), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_init_loads_products_then_cart() {
        let catalog = catalog();
        catalog.init().await;
        assert_eq!(catalog.backend().calls(), vec![Call::Products, Call::Cart]);

        catalog.click_refresh().await;
        assert_eq!(
            catalog.backend().calls(),
            vec![Call::Products, Call::Cart, Call::Products, Call::Cart]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_products_response_is_dropped() {
        let catalog = catalog();
        catalog
            .backend()
            .queue_products(Duration::from_millis(500), vec![product(1, "Old", 100, None)]);
        catalog
            .backend()
            .queue_products(Duration::from_millis(10), vec![product(2, "New", 200, None)]);

        let slow = catalog.clone();
        let fast = catalog.clone();
        tokio::join!(slow.refresh_products(), async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            fast.refresh_products().await;
        });

        let products = element(&catalog, ids::PRODUCTS);
        assert_eq!(products.child_count(), 1);
        assert!(products.text_content().contains("New"));
        assert!(catalog.is_bound(ProductId::new(2)));
        assert!(!catalog.is_bound(ProductId::new(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_cart_response_is_dropped() {
        let catalog = catalog();
        catalog.backend().queue_cart(Duration::from_millis(500), widget_cart());
        catalog
            .backend()
            .queue_cart(Duration::from_millis(10), Cart::default());

        let slow = catalog.clone();
        let fast = catalog.clone();
        tokio::join!(slow.refresh_cart(), async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            fast.refresh_cart().await;
        });

        assert_eq!(element(&catalog, ids::CART).text_content(), "Cart is empty.");
        assert!(element(&catalog, ids::CHECKOUT_BUTTON).is_disabled());
    }
}
