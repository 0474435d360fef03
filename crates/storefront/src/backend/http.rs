//! `reqwest` implementation of [`StorefrontBackend`].

use std::sync::Arc;

use market_core::{AddToCartRequest, Cart, CheckoutReceipt, CountryEntry, Product, ProductId};
use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use super::{
    ADD_UNPARSEABLE, CART_FAILED, CHECKOUT_FAILED, COUNTRIES_FAILED, PRODUCTS_FAILED,
    StorefrontBackend, add_failure_message,
};
use crate::config::StorefrontConfig;
use crate::error::{ClientError, Result};

/// HTTP client for the market backend.
///
/// Cheaply cloneable; clones share one connection pool. No timeouts and no
/// retries are applied: every failure is final for the action that made the
/// call.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    inner: Arc<HttpBackendInner>,
}

#[derive(Debug)]
struct HttpBackendInner {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    /// Create a client for the backend rooted at `base_url`.
    ///
    /// Endpoint paths are joined relative to `base_url`, so it should end
    /// with `/` when it carries a path prefix.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            inner: Arc::new(HttpBackendInner {
                client: reqwest::Client::new(),
                base_url,
            }),
        }
    }

    /// Create a client from configuration.
    #[must_use]
    pub fn from_config(config: &StorefrontConfig) -> Self {
        Self::new(config.api_base_url.clone())
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// `GET health`. Returns the body on success.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or unhealthy.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<String> {
        let response = self.inner.client.get(self.endpoint("health")?).send().await?;
        let response = ensure_success(response, "Backend unhealthy")?;
        Ok(response.text().await?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        failure: &'static str,
    ) -> Result<T> {
        let response = self.inner.client.get(self.endpoint(path)?).send().await?;
        let response = ensure_success(response, failure)?;
        parse_body(response).await
    }
}

/// Map a non-2xx response to `ClientError::Status` with `failure` as message.
fn ensure_success(response: Response, failure: &'static str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    warn!(status = %status, url = %response.url(), "Backend returned non-success status");
    Err(ClientError::status(status, failure))
}

async fn parse_body<T: DeserializeOwned>(response: Response) -> Result<T> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        warn!(
            error = %e,
            body = %text.chars().take(200).collect::<String>(),
            "Failed to parse backend response"
        );
        ClientError::Parse(e)
    })
}

impl StorefrontBackend for HttpBackend {
    #[instrument(skip(self))]
    async fn fetch_products(&self) -> Result<Vec<Product>> {
        let products: Vec<Product> = self.get_json("api/products", PRODUCTS_FAILED).await?;
        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn fetch_cart(&self) -> Result<Cart> {
        let cart: Cart = self.get_json("api/cart", CART_FAILED).await?;
        debug!(lines = cart.items.len(), "Fetched cart");
        Ok(cart)
    }

    #[instrument(skip(self))]
    async fn add_to_cart(&self, product_id: ProductId, qty: i32) -> Result<()> {
        let response = self
            .inner
            .client
            .post(self.endpoint("api/cart/add")?)
            .json(&AddToCartRequest { product_id, qty })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = match response.text().await {
            Ok(body) => add_failure_message(&body),
            Err(e) => {
                debug!(error = %e, "Could not read add-to-cart error body");
                ADD_UNPARSEABLE.to_string()
            }
        };
        warn!(status = %status, message = %message, "Add to cart rejected");
        Err(ClientError::status(status, message))
    }

    #[instrument(skip(self))]
    async fn checkout(&self) -> Result<CheckoutReceipt> {
        let response = self
            .inner
            .client
            .post(self.endpoint("api/checkout")?)
            .send()
            .await?;
        let response = ensure_success(response, CHECKOUT_FAILED)?;
        parse_body(response).await
    }

    #[instrument(skip(self))]
    async fn fetch_countries(&self) -> Result<Vec<CountryEntry>> {
        let countries: Vec<CountryEntry> =
            self.get_json("api/countries", COUNTRIES_FAILED).await?;
        debug!(count = countries.len(), "Fetched countries");
        Ok(countries)
    }
}
