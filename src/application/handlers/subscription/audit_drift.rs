//! AuditDriftHandler - Read-only scan for deferred cancellations that
//! were recorded as immediate.

use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::domain::subscription::{Subscription, SubscriptionError};
use crate::ports::SubscriptionRepository;

/// Query for the drift audit.
#[derive(Debug, Clone, Copy)]
pub struct AuditDriftQuery {
    /// Period ends after this instant count as still running.
    pub as_of: Timestamp,
}

/// Handler for the drift audit.
pub struct AuditDriftHandler {
    repository: Arc<dyn SubscriptionRepository>,
}

impl AuditDriftHandler {
    pub fn new(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repository }
    }

    /// Records that look prematurely canceled by their stored fields,
    /// soonest period end first.
    pub async fn handle(&self, query: AuditDriftQuery) -> Result<Vec<Subscription>, SubscriptionError> {
        let findings = self.repository.find_premature_cancellations(query.as_of).await?;
        if !findings.is_empty() {
            tracing::warn!(count = findings.len(), "Found prematurely canceled subscriptions");
        }
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySubscriptionStore;
    use crate::domain::foundation::UserId;
    use crate::domain::subscription::{SubscriptionPlan, SubscriptionStatus};

    fn record(stripe_id: &str, status: SubscriptionStatus, flag: bool, end_in_days: i64) -> Subscription {
        let now = Timestamp::now();
        let mut sub = Subscription::create(
            UserId::new("user-1").unwrap(),
            SubscriptionPlan::Package50,
            now.minus_days(40),
        )
        .with_stripe(stripe_id, now.add_days(end_in_days));
        sub.status = status;
        sub.stripe_cancel_at_period_end = flag;
        sub
    }

    #[tokio::test]
    async fn finds_only_drifted_records() {
        let store = InMemorySubscriptionStore::new();
        let later = record("sub_later", SubscriptionStatus::Canceled, true, 20);
        let sooner = record("sub_sooner", SubscriptionStatus::Canceled, true, 3);
        for sub in [
            &later,
            &sooner,
            &record("sub_ended", SubscriptionStatus::Canceled, true, -2),
            &record("sub_plain_cancel", SubscriptionStatus::Canceled, false, 10),
            &record("sub_active", SubscriptionStatus::Active, true, 10),
        ] {
            store.save(sub).await.unwrap();
        }

        let findings = AuditDriftHandler::new(Arc::new(store))
            .handle(AuditDriftQuery { as_of: Timestamp::now() })
            .await
            .unwrap();

        let ids: Vec<_> = findings
            .iter()
            .filter_map(|s| s.stripe_subscription_id.as_deref())
            .collect();
        assert_eq!(ids, vec!["sub_sooner", "sub_later"]);
    }

    #[tokio::test]
    async fn clean_store_has_no_findings() {
        let store = InMemorySubscriptionStore::new();
        store
            .save(&record("sub_1", SubscriptionStatus::Active, false, 10))
            .await
            .unwrap();

        let findings = AuditDriftHandler::new(Arc::new(store))
            .handle(AuditDriftQuery { as_of: Timestamp::now() })
            .await
            .unwrap();
        assert!(findings.is_empty());
    }
}
