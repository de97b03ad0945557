//! Stripe API object shapes.
//!
//! Only the fields the reconciliation reads are modelled; everything else
//! in the response is ignored.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::ports::ProviderSubscription;

/// Stripe Subscription object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeSubscription {
    /// Unique subscription identifier (sub_...).
    pub id: String,

    /// Subscription status (active, past_due, canceled, trialing, ...).
    pub status: String,

    /// Whether the subscription cancels at period end.
    #[serde(default)]
    pub cancel_at_period_end: bool,

    /// Current period end (Unix timestamp).
    ///
    /// Newer API versions report this per item instead.
    #[serde(default)]
    pub current_period_end: Option<i64>,

    /// When cancellation was requested (Unix timestamp).
    #[serde(default)]
    pub canceled_at: Option<i64>,

    #[serde(default)]
    pub items: StripeSubscriptionItems,
}

/// Subscription items container.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StripeSubscriptionItems {
    #[serde(default)]
    pub data: Vec<StripeSubscriptionItem>,
}

/// Single subscription item.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeSubscriptionItem {
    pub id: String,

    #[serde(default)]
    pub current_period_end: Option<i64>,
}

impl StripeSubscription {
    /// Period end from the subscription, else the latest item period end.
    pub fn period_end(&self) -> Option<i64> {
        self.current_period_end.or_else(|| {
            self.items
                .data
                .iter()
                .filter_map(|item| item.current_period_end)
                .max()
        })
    }
}

impl From<StripeSubscription> for ProviderSubscription {
    fn from(sub: StripeSubscription) -> Self {
        let current_period_end = sub.period_end().and_then(Timestamp::from_unix_secs);
        ProviderSubscription {
            current_period_end,
            canceled_at: sub.canceled_at.and_then(Timestamp::from_unix_secs),
            cancel_at_period_end: sub.cancel_at_period_end,
            status: sub.status,
            id: sub.id,
        }
    }
}
