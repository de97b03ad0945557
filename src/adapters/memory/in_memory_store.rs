//! In-memory subscription and user store.
//!
//! Implements `SubscriptionRepository` and `UserReader` over shared maps.
//! Guarded updates take the write lock for the whole check-and-set, which
//! gives the same atomicity as the conditional SQL update.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId, Timestamp, UserId};
use crate::domain::subscription::{Subscription, SubscriptionState, SubscriptionStatus};
use crate::domain::user::User;
use crate::ports::{SubscriptionRepository, UserCursor, UserPage, UserReader, UserSummary};

/// In-memory store for users and their subscriptions.
#[derive(Debug, Clone, Default)]
pub struct InMemorySubscriptionStore {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    subscriptions: Arc<RwLock<HashMap<SubscriptionId, Subscription>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemorySubscriptionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user.
    pub async fn insert_user(&self, user: User) {
        self.users.write().await.insert(user.id.clone(), user);
    }

    /// Snapshot of one record, bypassing the port.
    pub async fn get(&self, id: &SubscriptionId) -> Option<Subscription> {
        self.subscriptions.read().await.get(id).cloned()
    }

    /// Make every port call fail with `DatabaseError`, simulating a lost
    /// connection.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "In-memory store unavailable",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionStore {
    async fn save(&self, subscription: &Subscription) -> Result<(), DomainError> {
        self.check_available()?;
        let mut subscriptions = self.subscriptions.write().await;
        if subscriptions.contains_key(&subscription.id) {
            return Err(DomainError::validation(
                "id",
                format!("Subscription {} already exists", subscription.id),
            ));
        }
        subscriptions.insert(subscription.id.clone(), subscription.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, DomainError> {
        self.check_available()?;
        Ok(self.subscriptions.read().await.get(id).cloned())
    }

    async fn find_by_stripe_subscription_id(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<Subscription>, DomainError> {
        self.check_available()?;
        Ok(self
            .subscriptions
            .read()
            .await
            .values()
            .find(|s| s.stripe_subscription_id.as_deref() == Some(stripe_subscription_id))
            .cloned())
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Subscription>, DomainError> {
        self.check_available()?;
        let mut owned: Vec<Subscription> = self
            .subscriptions
            .read()
            .await
            .values()
            .filter(|s| &s.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_str().cmp(a.id.as_str()))
        });
        Ok(owned)
    }

    async fn count_by_user(&self, user_id: &UserId) -> Result<u64, DomainError> {
        self.check_available()?;
        Ok(self
            .subscriptions
            .read()
            .await
            .values()
            .filter(|s| &s.user_id == user_id)
            .count() as u64)
    }

    async fn update_state_if_status(
        &self,
        id: &SubscriptionId,
        expected_status: SubscriptionStatus,
        target: SubscriptionState,
    ) -> Result<bool, DomainError> {
        self.check_available()?;
        let mut subscriptions = self.subscriptions.write().await;
        match subscriptions.get_mut(id) {
            Some(subscription) if subscription.status == expected_status => {
                subscription.transition_state(target)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_premature_cancellations(
        &self,
        now: Timestamp,
    ) -> Result<Vec<Subscription>, DomainError> {
        self.check_available()?;
        let mut drifted: Vec<Subscription> = self
            .subscriptions
            .read()
            .await
            .values()
            .filter(|s| s.shows_premature_cancellation(now))
            .cloned()
            .collect();
        drifted.sort_by_key(|s| s.stripe_current_period_end);
        Ok(drifted)
    }
}

#[async_trait]
impl UserReader for InMemorySubscriptionStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.check_available()?;
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_page(
        &self,
        after: Option<&UserCursor>,
        limit: u32,
    ) -> Result<UserPage, DomainError> {
        self.check_available()?;
        let mut users: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| match after {
                Some(cursor) => (u.created_at, &u.id) > (cursor.created_at, &cursor.id),
                None => true,
            })
            .cloned()
            .collect();
        users.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        users.truncate(limit as usize);

        let mut rows = Vec::with_capacity(users.len());
        for user in &users {
            let count = self.count_by_user(&user.id).await?;
            rows.push(UserSummary::from_user(user, count));
        }
        Ok(UserPage::from_rows(rows, limit))
    }
}
