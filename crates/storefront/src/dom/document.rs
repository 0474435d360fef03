//! The page: a fixed set of named elements.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::element::Element;
use super::node::ElementNode;
use crate::error::DomError;

/// Element ids the page markup must provide.
pub mod ids {
    pub const MESSAGE: &str = "message";
    pub const PRODUCTS: &str = "products";
    pub const CART: &str = "cart";
    pub const CHECKOUT_BUTTON: &str = "checkoutBtn";
    pub const REFRESH_BUTTON: &str = "refreshBtn";
    pub const COUNTRIES_GRID: &str = "countries-grid";
}

/// Shared handle to the page's elements.
///
/// Cheap to clone; all clones see the same elements.
#[derive(Debug, Clone)]
pub struct Document {
    elements: Arc<BTreeMap<String, Arc<Element>>>,
}

impl Document {
    /// Create a document from its top-level elements.
    #[must_use]
    pub fn new(elements: impl IntoIterator<Item = Element>) -> Self {
        let elements = elements
            .into_iter()
            .map(|element| (element.id().to_string(), Arc::new(element)))
            .collect();
        Self {
            elements: Arc::new(elements),
        }
    }

    /// Markup of the storefront page: message banner, product list, cart
    /// and the two buttons.
    #[must_use]
    pub fn storefront() -> Self {
        Self::new([
            Element::new(ids::MESSAGE, "div").with_classes(&["message", "hidden"]),
            Element::new(ids::REFRESH_BUTTON, "button").with_text("Refresh"),
            Element::new(ids::PRODUCTS, "div"),
            Element::new(ids::CART, "div"),
            Element::new(ids::CHECKOUT_BUTTON, "button").with_text("Checkout"),
        ])
    }

    /// Markup of the country directory page.
    #[must_use]
    pub fn directory() -> Self {
        Self::new([Element::new(ids::COUNTRIES_GRID, "div").with_classes(&["countries-grid"])])
    }

    /// Look up a top-level element.
    #[must_use]
    pub fn element(&self, id: &str) -> Option<Arc<Element>> {
        self.elements.get(id).cloned()
    }

    /// Look up a top-level element the caller cannot work without.
    ///
    /// # Errors
    ///
    /// Returns `DomError::MissingElement` if the page has no such element.
    pub fn require(&self, id: &str) -> Result<Arc<Element>, DomError> {
        self.element(id)
            .ok_or_else(|| DomError::MissingElement(id.to_string()))
    }

    /// Find a rendered node anywhere on the page by its `id` attribute.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<ElementNode> {
        self.elements
            .values()
            .find_map(|element| element.find_by_id(id))
    }

    /// Read an attribute of a rendered node.
    #[must_use]
    pub fn attribute(&self, node_id: &str, name: &str) -> Option<String> {
        self.node(node_id)
            .and_then(|node| node.attribute(name).map(str::to_string))
    }

    /// Set an attribute of a rendered node. Returns whether the node exists.
    pub fn set_attribute(&self, node_id: &str, name: &str, value: &str) -> bool {
        self.elements.values().any(|element| {
            element.update_by_id(node_id, |node| node.set_attribute(name, value))
        })
    }

    /// Current value of an input, as typed by the user.
    #[must_use]
    pub fn value(&self, input_id: &str) -> Option<String> {
        self.attribute(input_id, "value")
    }

    /// Simulate the user typing into an input. Returns whether it exists.
    pub fn set_value(&self, input_id: &str, value: &str) -> bool {
        self.set_attribute(input_id, "value", value)
    }
}
