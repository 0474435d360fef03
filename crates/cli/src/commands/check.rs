//! Backend health check.

use market_storefront::{HttpBackend, StorefrontConfig};

use super::CommandError;

/// Call the backend health endpoint.
pub async fn run(config: &StorefrontConfig) -> Result<String, CommandError> {
    let backend = HttpBackend::from_config(config);
    tracing::info!(base_url = %backend.base_url(), "Checking backend health");
    let body = backend.health().await?;
    Ok(format!("{} is healthy: {}", backend.base_url(), body.trim()))
}
