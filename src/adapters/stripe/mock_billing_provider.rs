//! Mock billing provider for testing.
//!
//! Supports pre-configured subscriptions, error injection and call
//! tracking.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{BillingError, BillingProvider, ProviderSubscription};

/// Mock billing provider.
///
/// # Example
///
/// ```ignore
/// let mock = MockBillingProvider::new();
/// mock.set_subscription(ProviderSubscription { id: "sub_1".into(), ... });
/// mock.set_error(BillingError::network("connection reset"));
/// ```
#[derive(Clone, Default)]
pub struct MockBillingProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    subscriptions: HashMap<String, ProviderSubscription>,
    next_error: Option<BillingError>,
    calls: Vec<String>,
}

impl MockBillingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscription the provider will return.
    pub fn set_subscription(&self, subscription: ProviderSubscription) {
        let mut state = self.inner.lock().unwrap();
        state.subscriptions.insert(subscription.id.clone(), subscription);
    }

    /// Fail the next call with `error`.
    pub fn set_error(&self, error: BillingError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Subscription ids requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl BillingProvider for MockBillingProvider {
    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<ProviderSubscription>, BillingError> {
        let mut state = self.inner.lock().unwrap();
        state.calls.push(subscription_id.to_string());

        if let Some(err) = state.next_error.take() {
            return Err(err);
        }
        Ok(state.subscriptions.get(subscription_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_sub(id: &str) -> ProviderSubscription {
        ProviderSubscription {
            id: id.to_string(),
            status: "active".to_string(),
            cancel_at_period_end: true,
            current_period_end: None,
            canceled_at: None,
        }
    }

    #[tokio::test]
    async fn returns_configured_subscription() {
        let mock = MockBillingProvider::new();
        mock.set_subscription(provider_sub("sub_1"));

        let found = mock.get_subscription("sub_1").await.unwrap();
        assert_eq!(found, Some(provider_sub("sub_1")));
        assert!(mock.get_subscription("sub_2").await.unwrap().is_none());
        assert_eq!(mock.calls(), vec!["sub_1", "sub_2"]);
    }

    #[tokio::test]
    async fn injected_error_fires_once() {
        let mock = MockBillingProvider::new();
        mock.set_subscription(provider_sub("sub_1"));
        mock.set_error(BillingError::network("reset"));

        assert!(mock.get_subscription("sub_1").await.is_err());
        assert!(mock.get_subscription("sub_1").await.unwrap().is_some());
    }
}
