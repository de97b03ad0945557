//! ListUserSubscriptionsHandler - Query handler for one user's
//! subscription history.

use std::sync::Arc;

use crate::domain::subscription::{StatusCounts, Subscription, SubscriptionError};
use crate::domain::user::User;
use crate::ports::{SubscriptionRepository, UserReader};

/// Query for a user's subscriptions by email.
#[derive(Debug, Clone)]
pub struct ListUserSubscriptionsQuery {
    pub email: String,
}

/// A user's subscriptions, newest first, with a status tally.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSubscriptions {
    pub user: User,
    pub subscriptions: Vec<Subscription>,
    pub counts: StatusCounts,
}

/// Result of the query.
#[derive(Debug, Clone, PartialEq)]
pub enum ListUserSubscriptionsResult {
    /// No user with this email.
    UserNotFound { email: String },
    Found(UserSubscriptions),
}

/// Handler for listing a user's subscriptions.
pub struct ListUserSubscriptionsHandler {
    users: Arc<dyn UserReader>,
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl ListUserSubscriptionsHandler {
    pub fn new(users: Arc<dyn UserReader>, subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self {
            users,
            subscriptions,
        }
    }

    pub async fn handle(
        &self,
        query: ListUserSubscriptionsQuery,
    ) -> Result<ListUserSubscriptionsResult, SubscriptionError> {
        let email = query.email.trim();
        if email.is_empty() {
            return Err(SubscriptionError::validation("email", "Email must not be empty"));
        }

        let Some(user) = self.users.find_by_email(email).await? else {
            return Ok(ListUserSubscriptionsResult::UserNotFound {
                email: email.to_string(),
            });
        };

        let subscriptions = self.subscriptions.list_by_user(&user.id).await?;
        let counts = StatusCounts::tally(&subscriptions);

        tracing::debug!(
            user_id = %user.id,
            subscriptions = subscriptions.len(),
            "Loaded user subscriptions"
        );

        Ok(ListUserSubscriptionsResult::Found(UserSubscriptions {
            user,
            subscriptions,
            counts,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySubscriptionStore;
    use crate::domain::foundation::{Timestamp, UserId};
    use crate::domain::subscription::{SubscriptionPlan, SubscriptionStatus};

    fn user(id: &str, email: &str) -> User {
        User::new(UserId::new(id).unwrap(), email, Timestamp::now().minus_days(30))
    }

    fn subscription(user_id: &str, days_ago: i64, status: SubscriptionStatus) -> Subscription {
        let mut sub = Subscription::create(
            UserId::new(user_id).unwrap(),
            SubscriptionPlan::Package5,
            Timestamp::now().minus_days(days_ago),
        );
        sub.status = status;
        sub
    }

    fn handler(store: &InMemorySubscriptionStore) -> ListUserSubscriptionsHandler {
        ListUserSubscriptionsHandler::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn lists_newest_first_with_counts() {
        let store = InMemorySubscriptionStore::new();
        store.insert_user(user("u1", "ada@example.com")).await;
        let oldest = subscription("u1", 20, SubscriptionStatus::Expired);
        let middle = subscription("u1", 10, SubscriptionStatus::Canceled);
        let newest = subscription("u1", 1, SubscriptionStatus::Active);
        for sub in [&middle, &oldest, &newest] {
            store.save(sub).await.unwrap();
        }
        store.save(&subscription("u2", 5, SubscriptionStatus::Active)).await.unwrap();

        let result = handler(&store)
            .handle(ListUserSubscriptionsQuery {
                email: "ada@example.com".to_string(),
            })
            .await
            .unwrap();

        let ListUserSubscriptionsResult::Found(found) = result else {
            panic!("expected user to be found");
        };
        let ids: Vec<_> = found.subscriptions.iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, vec![newest.id, middle.id, oldest.id]);
        assert_eq!(found.counts.total(), 3);
        assert_eq!(found.counts.distinct(), 3);
        assert_eq!(found.counts.get(SubscriptionStatus::Active), 1);
    }

    #[tokio::test]
    async fn user_without_subscriptions_has_empty_counts() {
        let store = InMemorySubscriptionStore::new();
        store.insert_user(user("u1", "ada@example.com")).await;

        let result = handler(&store)
            .handle(ListUserSubscriptionsQuery {
                email: "ada@example.com".to_string(),
            })
            .await
            .unwrap();

        let ListUserSubscriptionsResult::Found(found) = result else {
            panic!("expected user to be found");
        };
        assert!(found.subscriptions.is_empty());
        assert!(found.counts.is_empty());
    }

    #[tokio::test]
    async fn unknown_email_is_not_found() {
        let store = InMemorySubscriptionStore::new();

        let result = handler(&store)
            .handle(ListUserSubscriptionsQuery {
                email: "nobody@example.com".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(
            result,
            ListUserSubscriptionsResult::UserNotFound {
                email: "nobody@example.com".to_string()
            }
        );
    }

    #[tokio::test]
    async fn blank_email_is_rejected() {
        let store = InMemorySubscriptionStore::new();
        let err = handler(&store)
            .handle(ListUserSubscriptionsQuery {
                email: "  ".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SubscriptionError::ValidationFailed { ref field, .. } if field == "email"));
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let store = InMemorySubscriptionStore::new();
        store.set_unavailable(true);
        let err = handler(&store)
            .handle(ListUserSubscriptionsQuery {
                email: "ada@example.com".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SubscriptionError::Infrastructure(_)));
    }
}
