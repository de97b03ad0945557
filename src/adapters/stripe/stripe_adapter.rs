//! Stripe billing provider adapter.
//!
//! Implements `BillingProvider` against the Stripe REST API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::from_payment_config(&app_config.payment);
//! let adapter = StripeBillingAdapter::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::config::PaymentConfig;
use crate::ports::{BillingError, BillingErrorCode, BillingProvider, ProviderSubscription};

use super::types::StripeSubscription;

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: "https://api.stripe.com".to_string(),
        }
    }

    /// Build from the application's payment settings.
    pub fn from_payment_config(config: &PaymentConfig) -> Self {
        Self {
            api_key: config.stripe_api_key.clone(),
            api_base_url: config.stripe_api_base_url.clone(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    fn subscription_url(&self, subscription_id: &str) -> String {
        format!(
            "{}/v1/subscriptions/{}",
            self.api_base_url.trim_end_matches('/'),
            subscription_id
        )
    }
}

/// Stripe subscription ids are `sub_` followed by ASCII alphanumerics.
/// Anything else never reaches the request path.
fn is_valid_subscription_id(id: &str) -> bool {
    id.strip_prefix("sub_")
        .map(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_alphanumeric()))
        .unwrap_or(false)
}

/// Stripe billing provider adapter.
pub struct StripeBillingAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripeBillingAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl BillingProvider for StripeBillingAdapter {
    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<ProviderSubscription>, BillingError> {
        if !is_valid_subscription_id(subscription_id) {
            return Err(BillingError::provider(format!(
                "Malformed Stripe subscription id: {:?}",
                subscription_id
            )));
        }
        let url = self.config.subscription_url(subscription_id);
        tracing::debug!(subscription_id, "Fetching subscription from Stripe");

        let response = self
            .http_client
            .get(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| BillingError::network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(BillingError::authentication(format!(
                "Stripe rejected the API key ({})",
                status
            )));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(BillingError::new(
                BillingErrorCode::RateLimitExceeded,
                "Stripe rate limit exceeded",
            ));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(BillingError::provider(format!(
                "Stripe API error ({}): {}",
                status, error_text
            )));
        }

        let stripe_sub: StripeSubscription = response
            .json()
            .await
            .map_err(|e| BillingError::provider(format!("Failed to parse Stripe response: {}", e)))?;

        Ok(Some(stripe_sub.into()))
    }
}
