//! ReconcileSubscriptionHandler - Command handler for repairing a
//! deferred cancellation that was recorded as immediate.

use std::sync::Arc;

use crate::domain::foundation::{SubscriptionId, Timestamp};
use crate::domain::subscription::{
    reconcile, Drift, ProviderSignals, ReconciliationOutcome, Subscription, SubscriptionError,
};
use crate::ports::{BillingProvider, SubscriptionRepository};

/// Command to reconcile one subscription against the billing provider.
#[derive(Debug, Clone)]
pub struct ReconcileSubscriptionCommand {
    /// Stripe subscription id (sub_...).
    pub stripe_subscription_id: String,

    /// Operator-supplied provider signals. When `None` the provider is
    /// queried.
    pub signals_override: Option<ProviderSignals>,

    /// Compute and report without writing.
    pub dry_run: bool,
}

/// Outcome of a reconcile command.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileSubscriptionResult {
    /// No local record carries this Stripe id.
    NotFound { stripe_subscription_id: String },

    /// Stripe does not know this subscription.
    NotFoundAtProvider { stripe_subscription_id: String },

    /// The record already agrees with the provider.
    NoChange { subscription: Subscription },

    /// The deferred cancellation has taken effect (period over, or the
    /// provider reports it canceled); `Canceled` is kept.
    CancellationInEffect { subscription: Subscription },

    /// The correction was written. `subscription` is the record after the
    /// write.
    Corrected {
        subscription: Subscription,
        outcome: ReconciliationOutcome,
    },

    /// Dry run: the correction that would be written.
    WouldCorrect {
        subscription: Subscription,
        outcome: ReconciliationOutcome,
    },

    /// The record changed between read and write; nothing was written.
    Conflict { subscription_id: SubscriptionId },
}

/// Handler for reconciling a subscription's cancellation state.
pub struct ReconcileSubscriptionHandler {
    repository: Arc<dyn SubscriptionRepository>,
    provider: Option<Arc<dyn BillingProvider>>,
}

impl ReconcileSubscriptionHandler {
    /// `provider` may be `None` when every command carries an override.
    pub fn new(
        repository: Arc<dyn SubscriptionRepository>,
        provider: Option<Arc<dyn BillingProvider>>,
    ) -> Self {
        Self {
            repository,
            provider,
        }
    }

    pub async fn handle(
        &self,
        cmd: ReconcileSubscriptionCommand,
    ) -> Result<ReconcileSubscriptionResult, SubscriptionError> {
        let stripe_subscription_id = cmd.stripe_subscription_id;

        // 1. Load the local record
        let Some(subscription) = self
            .repository
            .find_by_stripe_subscription_id(&stripe_subscription_id)
            .await?
        else {
            tracing::info!(%stripe_subscription_id, "No subscription with this Stripe id");
            return Ok(ReconcileSubscriptionResult::NotFound {
                stripe_subscription_id,
            });
        };

        // 2. Resolve the provider's view
        let signals = match cmd.signals_override {
            Some(signals) => signals,
            None => match self.fetch_signals(&stripe_subscription_id).await? {
                Some(signals) => signals,
                None => {
                    tracing::warn!(%stripe_subscription_id, "Subscription unknown to Stripe");
                    return Ok(ReconcileSubscriptionResult::NotFoundAtProvider {
                        stripe_subscription_id,
                    });
                }
            },
        };

        // 3. Apply the rule
        let outcome = reconcile(&subscription, &signals, Timestamp::now());
        if outcome.drift == Drift::CancellationInEffect {
            tracing::info!(
                subscription_id = %subscription.id,
                provider_canceled = signals.provider_canceled,
                "Deferred cancellation already in effect; keeping CANCELED"
            );
            return Ok(ReconcileSubscriptionResult::CancellationInEffect { subscription });
        }
        if !outcome.needs_write() {
            tracing::info!(
                subscription_id = %subscription.id,
                status = %subscription.status,
                "Subscription already consistent with provider"
            );
            return Ok(ReconcileSubscriptionResult::NoChange { subscription });
        }

        let mut corrected = subscription.clone();
        corrected.transition_state(outcome.corrected)?;

        if cmd.dry_run {
            return Ok(ReconcileSubscriptionResult::WouldCorrect {
                subscription: corrected,
                outcome,
            });
        }

        // 4. Guarded write
        let applied = self
            .repository
            .update_state_if_status(&subscription.id, outcome.current.status, outcome.corrected)
            .await?;

        if !applied {
            tracing::warn!(
                subscription_id = %subscription.id,
                "Subscription changed concurrently; correction not applied"
            );
            return Ok(ReconcileSubscriptionResult::Conflict {
                subscription_id: subscription.id,
            });
        }

        tracing::info!(
            subscription_id = %subscription.id,
            from = %outcome.current.status,
            to = %outcome.corrected.status,
            "Subscription reconciled"
        );

        Ok(ReconcileSubscriptionResult::Corrected {
            subscription: corrected,
            outcome,
        })
    }

    async fn fetch_signals(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<ProviderSignals>, SubscriptionError> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            SubscriptionError::validation(
                "cancel_at_period_end",
                "No billing provider configured; pass the provider flag explicitly",
            )
        })?;

        let remote = provider.get_subscription(stripe_subscription_id).await?;
        Ok(remote.map(|sub| sub.signals()))
    }
}
