//! Integration tests for the Corner Market storefront client.
//!
//! [`FakeMarket`] is an in-process backend serving the same HTTP API as the
//! real market server, seeded with the standard five products. Tests start
//! one per test on an ephemeral port and point an
//! [`HttpBackend`](market_storefront::HttpBackend) at it.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p market-integration-tests
//! ```

// Axum handlers are async without awaiting.
#![allow(clippy::unused_async)]

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use market_core::{
    AddToCartRequest, Cart, CartItem, CheckoutReceipt, CountryEntry, ErrorBody, Money, Product,
    ProductId,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Products every fake market starts with.
#[must_use]
pub fn seed_products() -> Vec<Product> {
    [
        (1, "Apple", 50, "apple"),
        (2, "Bread", 120, "bread"),
        (3, "Milk", 99, "milk"),
        (4, "Cheese", 250, "cheese"),
        (5, "Chocolate", 175, "chocolate"),
    ]
    .into_iter()
    .map(|(id, name, cents, image)| Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Money::from_cents(cents),
        image: Some(format!("images/{image}.svg")),
    })
    .collect()
}

/// Countries every fake market starts with.
#[must_use]
pub fn seed_countries() -> Vec<CountryEntry> {
    [("pt", "Portugal"), ("jp", "Japan"), ("br", "Brazil")]
        .into_iter()
        .map(|(id, name)| CountryEntry {
            id: id.to_string(),
            name: name.to_string(),
            flag: format!("flags/{id}.svg"),
            redirect_url: format!("https://{id}.market.test/"),
        })
        .collect()
}

#[derive(Debug)]
struct MarketState {
    products: Vec<Product>,
    countries: Vec<CountryEntry>,
    /// Cart lines in insertion order.
    cart: Vec<(ProductId, u32)>,
    out_of_stock: HashSet<ProductId>,
    products_down: bool,
    countries_down: bool,
    garbled_add_errors: bool,
}

impl Default for MarketState {
    fn default() -> Self {
        Self {
            products: seed_products(),
            countries: seed_countries(),
            cart: Vec::new(),
            out_of_stock: HashSet::new(),
            products_down: false,
            countries_down: false,
            garbled_add_errors: false,
        }
    }
}

impl MarketState {
    fn cart(&self) -> Cart {
        let items: Vec<CartItem> = self
            .cart
            .iter()
            .filter_map(|&(product_id, qty)| {
                let product = self.products.iter().find(|p| p.id == product_id)?;
                Some(CartItem {
                    product_id: Some(product_id),
                    name: product.name.clone(),
                    qty,
                    price: product.price,
                    subtotal: product.price * qty,
                })
            })
            .collect();
        let total = items.iter().map(|item| item.subtotal).sum();
        Cart { items, total }
    }
}

type SharedState = Arc<Mutex<MarketState>>;

/// A running fake backend. The server stops when this is dropped.
pub struct FakeMarket {
    addr: SocketAddr,
    state: SharedState,
    server: JoinHandle<()>,
}

impl FakeMarket {
    /// Start a fake market on an ephemeral local port.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state = SharedState::default();
        let app = Router::new()
            .route("/health", get(health))
            .route("/api/products", get(products))
            .route("/api/cart", get(cart))
            .route("/api/cart/add", post(add_to_cart))
            .route("/api/checkout", post(checkout))
            .route("/api/countries", get(countries))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok(Self {
            addr,
            state,
            server,
        })
    }

    /// Base URL to configure the client with.
    ///
    /// # Panics
    ///
    /// Never: the address is always a valid URL authority.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).expect("socket address is a valid URL")
    }

    fn state(&self) -> MutexGuard<'_, MarketState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current server-side cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.state().cart()
    }

    /// Put a product in the cart directly, bypassing the API.
    pub fn stock_cart(&self, product_id: ProductId, qty: u32) {
        self.state().cart.push((product_id, qty));
    }

    /// Replace the product list.
    pub fn set_products(&self, products: Vec<Product>) {
        self.state().products = products;
    }

    /// Replace the country list.
    pub fn set_countries(&self, countries: Vec<CountryEntry>) {
        self.state().countries = countries;
    }

    /// Reject adds of `product_id` with "Out of stock".
    pub fn mark_out_of_stock(&self, product_id: ProductId) {
        self.state().out_of_stock.insert(product_id);
    }

    /// Make `GET /api/products` answer 500.
    pub fn set_products_down(&self, down: bool) {
        self.state().products_down = down;
    }

    /// Make `GET /api/countries` answer 500.
    pub fn set_countries_down(&self, down: bool) {
        self.state().countries_down = down;
    }

    /// Answer rejected adds with a body that is not JSON.
    pub fn set_garbled_add_errors(&self, garbled: bool) {
        self.state().garbled_add_errors = garbled;
    }
}

impl Drop for FakeMarket {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn lock(state: &SharedState) -> MutexGuard<'_, MarketState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody::new(message))).into_response()
}

async fn health() -> &'static str {
    "ok"
}

async fn products(State(state): State<SharedState>) -> Response {
    let state = lock(&state);
    if state.products_down {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable");
    }
    Json(state.products.clone()).into_response()
}

async fn cart(State(state): State<SharedState>) -> Json<Cart> {
    Json(lock(&state).cart())
}

async fn add_to_cart(
    State(state): State<SharedState>,
    Json(request): Json<AddToCartRequest>,
) -> Response {
    let mut state = lock(&state);
    let rejection = if request.qty <= 0 {
        Some((StatusCode::BAD_REQUEST, "qty must be positive"))
    } else if !state.products.iter().any(|p| p.id == request.product_id) {
        Some((StatusCode::NOT_FOUND, "Product not found"))
    } else if state.out_of_stock.contains(&request.product_id) {
        Some((StatusCode::CONFLICT, "Out of stock"))
    } else {
        None
    };

    if let Some((status, message)) = rejection {
        if state.garbled_add_errors {
            return (status, "<html>upstream error</html>").into_response();
        }
        return error_response(status, message);
    }

    let qty = request.qty.unsigned_abs();
    match state
        .cart
        .iter_mut()
        .find(|(product_id, _)| *product_id == request.product_id)
    {
        Some((_, existing)) => *existing += qty,
        None => state.cart.push((request.product_id, qty)),
    }
    Json(serde_json::json!({ "ok": true })).into_response()
}

async fn checkout(State(state): State<SharedState>) -> Json<CheckoutReceipt> {
    let mut state = lock(&state);
    let total = state.cart().total;
    state.cart.clear();
    Json(CheckoutReceipt {
        total,
        message: Some("Purchase completed".to_string()),
    })
}

async fn countries(State(state): State<SharedState>) -> Response {
    let state = lock(&state);
    if state.countries_down {
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load countries: file not found",
        );
    }
    Json(state.countries.clone()).into_response()
}
