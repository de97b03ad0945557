//! Reconciliation of the local subscription status against the billing
//! provider's cancellation intent.
//!
//! The provider is the source of truth for cancellation timing. A
//! cancellation requested "at period end" must leave the record `Active`
//! until the period is over; a record found `Canceled` while the provider
//! still reports a running period with a deferred cancellation had the
//! cancellation applied too early. That is the only drift corrected here.
//! Once the period has ended, or the provider itself reports the
//! subscription canceled, `Canceled` is correct and nothing is written.
//! Other mismatches (for example `PastDue` that should be `Expired`) are
//! left alone.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

use super::{Subscription, SubscriptionState, SubscriptionStatus};

/// What the billing provider reports for one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSignals {
    /// Provider's "cancel at period end" flag.
    pub cancel_at_period_end: bool,

    /// Provider's current period end, when known.
    pub current_period_end: Option<Timestamp>,

    /// The provider reports the subscription as canceled. Stripe keeps
    /// `cancel_at_period_end` set after a deferred cancellation takes
    /// effect, so the flag alone does not mean the period is running.
    pub provider_canceled: bool,
}

impl ProviderSignals {
    /// Signals carrying only the cancellation flag.
    pub fn cancel_at_period_end(flag: bool) -> Self {
        Self {
            cancel_at_period_end: flag,
            current_period_end: None,
            provider_canceled: false,
        }
    }
}

/// Drift detected between the record and the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Drift {
    /// Record agrees with the provider, or shows a mismatch this rule
    /// does not handle.
    None,

    /// Deferred cancellation was applied while the period is still
    /// running.
    PrematureCancellation,

    /// Deferred cancellation has taken effect: the period is over (or
    /// unknown) or the provider reports the subscription canceled.
    /// `Canceled` is correct.
    CancellationInEffect,
}

/// Result of applying the rule to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationOutcome {
    /// State as stored.
    pub current: SubscriptionState,

    /// State the record should hold.
    pub corrected: SubscriptionState,

    /// Detected drift.
    pub drift: Drift,
}

impl ReconciliationOutcome {
    fn unchanged(current: SubscriptionState, drift: Drift) -> Self {
        Self {
            current,
            corrected: current,
            drift,
        }
    }

    /// Returns true if the record must be written.
    pub fn needs_write(&self) -> bool {
        self.current != self.corrected
    }
}

/// Decide the state a subscription should hold given the provider's
/// signals.
///
/// Pure: the record is not modified. The period end is the provider's
/// when reported, else the locally stored one. Without any period end the
/// record cannot be shown to be entitled and is left `Canceled`.
pub fn reconcile(
    subscription: &Subscription,
    signals: &ProviderSignals,
    now: Timestamp,
) -> ReconciliationOutcome {
    let current = subscription.state();

    if !(signals.cancel_at_period_end && current.status == SubscriptionStatus::Canceled) {
        return ReconciliationOutcome::unchanged(current, Drift::None);
    }

    let period_running = signals
        .current_period_end
        .or(subscription.stripe_current_period_end)
        .map(|end| now.is_before(&end))
        .unwrap_or(false);

    if signals.provider_canceled || !period_running {
        return ReconciliationOutcome::unchanged(current, Drift::CancellationInEffect);
    }

    ReconciliationOutcome {
        current,
        corrected: SubscriptionState {
            status: SubscriptionStatus::Active,
            cancel_at_period_end: true,
        },
        drift: Drift::PrematureCancellation,
    }
}
