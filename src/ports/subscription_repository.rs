//! Subscription repository port.
//!
//! Defines the contract for reading and updating subscription records.
//!
//! # Design
//!
//! - **Multiple records per user**: listing returns history, newest first
//! - **Guarded updates**: state changes are conditional on the expected
//!   prior status, so a read-check-write cannot race with another writer
//! - **No deletes**: records are never removed

use crate::domain::foundation::{DomainError, SubscriptionId, Timestamp, UserId};
use crate::domain::subscription::{Subscription, SubscriptionState, SubscriptionStatus};
use async_trait::async_trait;

/// Repository port for subscription records.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Insert a new record.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if a record with the same id already exists
    /// - `DatabaseError` on persistence failure
    async fn save(&self, subscription: &Subscription) -> Result<(), DomainError>;

    /// Find a record by internal id.
    async fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, DomainError>;

    /// Find a record by its Stripe subscription id.
    async fn find_by_stripe_subscription_id(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<Subscription>, DomainError>;

    /// All records owned by a user, ordered by creation time descending.
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Subscription>, DomainError>;

    /// Number of records owned by a user.
    async fn count_by_user(&self, user_id: &UserId) -> Result<u64, DomainError>;

    /// Set status and cancel flag, only if the stored status still equals
    /// `expected_status`.
    ///
    /// Returns `false` when no record matched (missing, or changed by
    /// someone else since it was read).
    async fn update_state_if_status(
        &self,
        id: &SubscriptionId,
        expected_status: SubscriptionStatus,
        target: SubscriptionState,
    ) -> Result<bool, DomainError>;

    /// Records whose stored fields show a deferred cancellation recorded
    /// as immediate: `Canceled`, cancel flag set, period end after `now`.
    ///
    /// Ordered by period end ascending.
    async fn find_premature_cancellations(
        &self,
        now: Timestamp,
    ) -> Result<Vec<Subscription>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SubscriptionRepository) {}
    }
}
