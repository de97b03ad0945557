//! Payment provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// Stripe API access.
///
/// Only commands that contact Stripe call [`PaymentConfig::validate`], so
/// read-only commands run without a key.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Secret API key (`sk_test_...` or `sk_live_...`)
    #[serde(default = "empty_secret")]
    pub stripe_api_key: Secret<String>,

    #[serde(default = "default_stripe_api_base_url")]
    pub stripe_api_base_url: String,
}

impl PaymentConfig {
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_test_")
    }

    pub fn is_live_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_live_")
    }

    /// Validate the API key and base URL.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let key = self.stripe_api_key.expose_secret();
        if key.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__STRIPE_API_KEY"));
        }
        // Publishable keys (pk_) cannot read subscriptions
        if !key.starts_with("sk_") && !key.starts_with("rk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !self.stripe_api_base_url.starts_with("https://")
            && !self.stripe_api_base_url.starts_with("http://")
        {
            return Err(ValidationError::InvalidStripeBaseUrl);
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_api_key: empty_secret(),
            stripe_api_base_url: default_stripe_api_base_url(),
        }
    }
}

fn empty_secret() -> Secret<String> {
    Secret::new(String::new())
}

fn default_stripe_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key(key: &str) -> PaymentConfig {
        PaymentConfig {
            stripe_api_key: Secret::new(key.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn detects_test_and_live_mode() {
        assert!(with_key("sk_test_xxx").is_test_mode());
        assert!(!with_key("sk_test_xxx").is_live_mode());
        assert!(with_key("sk_live_xxx").is_live_mode());
    }

    #[test]
    fn missing_key_is_reported() {
        assert_eq!(
            PaymentConfig::default().validate(),
            Err(ValidationError::MissingRequired("PAYMENT__STRIPE_API_KEY"))
        );
    }

    #[test]
    fn publishable_key_is_rejected() {
        assert_eq!(
            with_key("pk_test_xxx").validate(),
            Err(ValidationError::InvalidStripeKey)
        );
    }

    #[test]
    fn restricted_key_is_accepted() {
        assert!(with_key("rk_live_abc").validate().is_ok());
    }

    #[test]
    fn base_url_must_be_http() {
        let config = PaymentConfig {
            stripe_api_base_url: "ftp://stripe".to_string(),
            ..with_key("sk_test_abc")
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidStripeBaseUrl));
    }

    #[test]
    fn key_is_redacted_in_debug_output() {
        let rendered = format!("{:?}", with_key("sk_test_supersecret"));
        assert!(!rendered.contains("supersecret"));
    }
}
