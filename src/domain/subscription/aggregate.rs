//! Subscription record.
//!
//! A user may own several subscription records over time; at most one is
//! the current one for billing. Records are updated in place and never
//! deleted.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ErrorCode, StateMachine, SubscriptionId, Timestamp, UserId,
};

use super::{SubscriptionPlan, SubscriptionStatus};

/// A user's billing relationship under one plan.
///
/// # Invariants
///
/// - `subdomain_quota >= 0` and `subdomains_used >= 0`
/// - With `stripe_cancel_at_period_end` set and the period still running,
///   the status must be `Active`, not `Canceled`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Internal identifier.
    pub id: SubscriptionId,

    /// Owning user.
    pub user_id: UserId,

    /// Billed plan.
    pub plan: SubscriptionPlan,

    /// Current lifecycle status.
    pub status: SubscriptionStatus,

    /// Subdomains the plan entitles the user to.
    pub subdomain_quota: i32,

    /// Subdomains currently provisioned.
    pub subdomains_used: i32,

    /// Stripe subscription id (sub_...), absent for free records.
    pub stripe_subscription_id: Option<String>,

    /// End of the current Stripe billing period.
    pub stripe_current_period_end: Option<Timestamp>,

    /// Stripe's "cancel at period end" flag as last recorded locally.
    pub stripe_cancel_at_period_end: bool,

    /// When the record was created.
    pub created_at: Timestamp,

    /// When cancellation was requested, if ever.
    pub canceled_at: Option<Timestamp>,
}

/// The pair of fields the reconciliation rule reads and corrects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionState {
    pub status: SubscriptionStatus,
    pub cancel_at_period_end: bool,
}

impl Subscription {
    /// Create a new active subscription with the plan's default quota.
    pub fn create(user_id: UserId, plan: SubscriptionPlan, created_at: Timestamp) -> Self {
        Self {
            id: SubscriptionId::generate(),
            user_id,
            plan,
            status: SubscriptionStatus::Active,
            subdomain_quota: plan.default_quota(),
            subdomains_used: 0,
            stripe_subscription_id: None,
            stripe_current_period_end: None,
            stripe_cancel_at_period_end: false,
            created_at,
            canceled_at: None,
        }
    }

    /// Attach the Stripe subscription and its current period end.
    pub fn with_stripe(mut self, subscription_id: impl Into<String>, period_end: Timestamp) -> Self {
        self.stripe_subscription_id = Some(subscription_id.into());
        self.stripe_current_period_end = Some(period_end);
        self
    }

    /// Current status and cancel flag.
    pub fn state(&self) -> SubscriptionState {
        SubscriptionState {
            status: self.status,
            cancel_at_period_end: self.stripe_cancel_at_period_end,
        }
    }

    /// Move to a reconciled state.
    ///
    /// A status change must be a legal lifecycle transition; an unchanged
    /// status only updates the cancel flag.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` if the status change is not allowed.
    pub fn transition_state(&mut self, target: SubscriptionState) -> Result<(), DomainError> {
        if target.status != self.status {
            self.status = self.status.transition_to(target.status).map_err(|_| {
                DomainError::new(
                    ErrorCode::InvalidStateTransition,
                    format!(
                        "Cannot transition subscription from {:?} to {:?}",
                        self.status, target.status
                    ),
                )
            })?;
        }
        self.stripe_cancel_at_period_end = target.cancel_at_period_end;
        Ok(())
    }

    /// Subdomains still available under the quota.
    pub fn remaining_quota(&self) -> i32 {
        (self.subdomain_quota - self.subdomains_used).max(0)
    }

    /// Returns true once the Stripe period end has passed.
    ///
    /// Records without a period end never report an ended period.
    pub fn period_has_ended(&self, now: Timestamp) -> bool {
        self.stripe_current_period_end
            .map(|end| !now.is_before(&end))
            .unwrap_or(false)
    }

    /// Returns true if the subscription currently grants service.
    pub fn is_entitled(&self, now: Timestamp) -> bool {
        match self.status {
            SubscriptionStatus::Canceled => {
                self.stripe_current_period_end.is_some() && !self.period_has_ended(now)
            }
            status => status.is_unconditionally_entitled(),
        }
    }

    /// Returns true if the locally stored fields show the known drift:
    /// a deferred cancellation recorded as an immediate one.
    pub fn shows_premature_cancellation(&self, now: Timestamp) -> bool {
        self.status == SubscriptionStatus::Canceled
            && self.stripe_cancel_at_period_end
            && self.stripe_current_period_end.is_some()
            && !self.period_has_ended(now)
    }
}
