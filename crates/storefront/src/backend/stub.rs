//! Scripted in-memory backend for unit tests.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use market_core::{Cart, CheckoutReceipt, CountryEntry, Money, Product, ProductId};
use reqwest::StatusCode;

use super::StorefrontBackend;
use crate::error::ClientError;

type Reply<T> = Result<T, (StatusCode, String)>;

/// A call the stub received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Products,
    Cart,
    Add(ProductId, i32),
    Checkout,
    Countries,
}

struct Script<T> {
    queued: VecDeque<(Duration, Reply<T>)>,
    fallback: Reply<T>,
}

impl<T: Clone> Script<T> {
    fn new(fallback: T) -> Self {
        Self {
            queued: VecDeque::new(),
            fallback: Ok(fallback),
        }
    }

    fn next(&mut self) -> (Duration, Reply<T>) {
        self.queued
            .pop_front()
            .unwrap_or_else(|| (Duration::ZERO, self.fallback.clone()))
    }
}

struct StubState {
    products: Script<Vec<Product>>,
    cart: Script<Cart>,
    add: Script<()>,
    checkout: Script<CheckoutReceipt>,
    countries: Script<Vec<CountryEntry>>,
    calls: Vec<Call>,
}

pub(crate) struct StubBackend {
    state: Mutex<StubState>,
}

impl Default for StubBackend {
    fn default() -> Self {
        Self {
            state: Mutex::new(StubState {
                products: Script::new(Vec::new()),
                cart: Script::new(Cart::default()),
                add: Script::new(()),
                checkout: Script::new(CheckoutReceipt {
                    total: Money::ZERO,
                    message: None,
                }),
                countries: Script::new(Vec::new()),
                calls: Vec::new(),
            }),
        }
    }
}

async fn respond<T>((delay, reply): (Duration, Reply<T>)) -> Result<T, ClientError> {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    reply.map_err(|(status, message)| ClientError::status(status, message))
}

impl StubBackend {
    fn lock(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn set_products(&self, products: Vec<Product>) {
        self.lock().products.fallback = Ok(products);
    }

    pub(crate) fn fail_products(&self, status: StatusCode, message: &str) {
        self.lock().products.fallback = Err((status, message.to_string()));
    }

    /// Queue a one-off products reply delivered after `delay`.
    pub(crate) fn queue_products(&self, delay: Duration, products: Vec<Product>) {
        self.lock().products.queued.push_back((delay, Ok(products)));
    }

    pub(crate) fn set_cart(&self, cart: Cart) {
        self.lock().cart.fallback = Ok(cart);
    }

    pub(crate) fn fail_cart(&self, status: StatusCode, message: &str) {
        self.lock().cart.fallback = Err((status, message.to_string()));
    }

    /// Queue a one-off cart reply delivered after `delay`.
    pub(crate) fn queue_cart(&self, delay: Duration, cart: Cart) {
        self.lock().cart.queued.push_back((delay, Ok(cart)));
    }

    pub(crate) fn fail_add(&self, status: StatusCode, message: &str) {
        self.lock().add.fallback = Err((status, message.to_string()));
    }

    pub(crate) fn set_checkout(&self, receipt: CheckoutReceipt) {
        self.lock().checkout.fallback = Ok(receipt);
    }

    pub(crate) fn fail_checkout(&self, status: StatusCode, message: &str) {
        self.lock().checkout.fallback = Err((status, message.to_string()));
    }

    pub(crate) fn set_countries(&self, countries: Vec<CountryEntry>) {
        self.lock().countries.fallback = Ok(countries);
    }

    pub(crate) fn fail_countries(&self, status: StatusCode, message: &str) {
        self.lock().countries.fallback = Err((status, message.to_string()));
    }

    /// Queue a one-off countries reply delivered after `delay`.
    pub(crate) fn queue_countries(&self, delay: Duration, countries: Vec<CountryEntry>) {
        self.lock().countries.queued.push_back((delay, Ok(countries)));
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub(crate) fn count(&self, call: &Call) -> usize {
        self.lock().calls.iter().filter(|c| *c == call).count()
    }
}

impl StorefrontBackend for StubBackend {
    async fn fetch_products(&self) -> Result<Vec<Product>, ClientError> {
        let next = {
            let mut state = self.lock();
            state.calls.push(Call::Products);
            state.products.next()
        };
        respond(next).await
    }

    async fn fetch_cart(&self) -> Result<Cart, ClientError> {
        let next = {
            let mut state = self.lock();
            state.calls.push(Call::Cart);
            state.cart.next()
        };
        respond(next).await
    }

    async fn add_to_cart(&self, product_id: ProductId, qty: i32) -> Result<(), ClientError> {
        let next = {
            let mut state = self.lock();
            state.calls.push(Call::Add(product_id, qty));
            state.add.next()
        };
        respond(next).await
    }

    async fn checkout(&self) -> Result<CheckoutReceipt, ClientError> {
        let next = {
            let mut state = self.lock();
            state.calls.push(Call::Checkout);
            state.checkout.next()
        };
        respond(next).await
    }

    async fn fetch_countries(&self) -> Result<Vec<CountryEntry>, ClientError> {
        let next = {
            let mut state = self.lock();
            state.calls.push(Call::Countries);
            state.countries.next()
        };
        respond(next).await
    }
}
