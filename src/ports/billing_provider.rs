//! Billing provider port.
//!
//! Read access to the provider's record of a subscription. The provider is
//! the source of truth for cancellation timing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::subscription::{ProviderSignals, SubscriptionError};

/// Port for querying the billing provider.
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Fetch a subscription by the provider's id.
    ///
    /// Returns `None` if the provider has no such subscription.
    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<ProviderSubscription>, BillingError>;
}

/// Provider's view of one subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSubscription {
    /// Provider subscription id (sub_...).
    pub id: String,

    /// Provider status text (active, past_due, canceled, ...).
    pub status: String,

    /// Cancellation deferred to period end.
    pub cancel_at_period_end: bool,

    /// End of the current billing period.
    pub current_period_end: Option<Timestamp>,

    /// When cancellation was requested.
    pub canceled_at: Option<Timestamp>,
}

impl ProviderSubscription {
    /// Returns true if the provider considers the subscription ended.
    pub fn is_canceled(&self) -> bool {
        matches!(self.status.as_str(), "canceled" | "incomplete_expired")
    }

    /// Signals consumed by the reconciliation rule.
    pub fn signals(&self) -> ProviderSignals {
        ProviderSignals {
            cancel_at_period_end: self.cancel_at_period_end,
            current_period_end: self.current_period_end,
            provider_canceled: self.is_canceled(),
        }
    }
}

/// Billing provider error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingError {
    /// Error code for categorization.
    pub code: BillingErrorCode,

    /// Human-readable message.
    pub message: String,
}

impl BillingError {
    /// Create a new billing error.
    pub fn new(code: BillingErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(BillingErrorCode::NetworkError, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(BillingErrorCode::AuthenticationError, message)
    }

    /// Create a provider API error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(BillingErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for BillingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for BillingError {}

impl From<BillingError> for SubscriptionError {
    fn from(err: BillingError) -> Self {
        SubscriptionError::provider(err.to_string())
    }
}

/// Billing error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Provider API error.
    ProviderError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn billing_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn BillingProvider) {}
    }

    #[test]
    fn converts_to_subscription_provider_error() {
        let err: SubscriptionError = BillingError::authentication("Invalid API key").into();
        assert!(matches!(err, SubscriptionError::Provider(ref m) if m.contains("Invalid API key")));
    }

    #[test]
    fn signals_carry_flag_and_period_end() {
        let end = Timestamp::from_unix_secs(1_760_000_000).unwrap();
        let sub = ProviderSubscription {
            id: "sub_1".to_string(),
            status: "active".to_string(),
            cancel_at_period_end: true,
            current_period_end: Some(end),
            canceled_at: None,
        };
        let signals = sub.signals();
        assert!(signals.cancel_at_period_end);
        assert_eq!(signals.current_period_end, Some(end));
        assert!(!signals.provider_canceled);
    }

    #[test]
    fn canceled_status_is_carried_into_signals() {
        let sub = ProviderSubscription {
            id: "sub_1".to_string(),
            status: "canceled".to_string(),
            cancel_at_period_end: true,
            current_period_end: Timestamp::from_unix_secs(1_760_000_000),
            canceled_at: None,
        };
        assert!(sub.is_canceled());
        assert!(sub.signals().provider_canceled);
        assert!(sub.signals().cancel_at_period_end);
    }
}
