//! ListUsersHandler - Paginated enumeration of users with subscription
//! counts.
//!
//! Pages are produced lazily as a stream so a caller can report each page
//! before the next one is fetched.

use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

use crate::config::validate_page_size;
use crate::domain::subscription::SubscriptionError;
use crate::ports::{UserCursor, UserReader, UserSummary};

/// Query for the user listing.
#[derive(Debug, Clone, Copy)]
pub struct ListUsersQuery {
    /// Users per page.
    pub page_size: u32,
}

enum PageState {
    Start,
    After(UserCursor),
    Done,
}

/// Handler for listing users.
pub struct ListUsersHandler {
    reader: Arc<dyn UserReader>,
}

impl ListUsersHandler {
    pub fn new(reader: Arc<dyn UserReader>) -> Self {
        Self { reader }
    }

    /// Stream of pages in `(created_at, id)` order. Empty pages are never
    /// yielded.
    pub fn pages(
        &self,
        query: ListUsersQuery,
    ) -> BoxStream<'static, Result<Vec<UserSummary>, SubscriptionError>> {
        if let Err(e) = validate_page_size(query.page_size) {
            let err = SubscriptionError::validation("page_size", e.to_string());
            return stream::once(async move { Err(err) }).boxed();
        }

        let reader = Arc::clone(&self.reader);
        let page_size = query.page_size;

        stream::try_unfold(PageState::Start, move |state| {
            let reader = Arc::clone(&reader);
            async move {
                let after = match state {
                    PageState::Start => None,
                    PageState::After(cursor) => Some(cursor),
                    PageState::Done => return Ok(None),
                };

                let page = reader.list_page(after.as_ref(), page_size).await?;
                tracing::debug!(users = page.users.len(), "Fetched user page");
                if page.users.is_empty() {
                    return Ok(None);
                }

                let next = match page.next_cursor {
                    Some(cursor) => PageState::After(cursor),
                    None => PageState::Done,
                };
                Ok::<_, SubscriptionError>(Some((page.users, next)))
            }
        })
        .boxed()
    }

    /// Collect every page into one list.
    pub async fn handle(&self, query: ListUsersQuery) -> Result<Vec<UserSummary>, SubscriptionError> {
        self.pages(query).try_concat().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySubscriptionStore;
    use crate::domain::foundation::{Timestamp, UserId};
    use crate::domain::subscription::{Subscription, SubscriptionPlan};
    use crate::domain::user::User;
    use crate::ports::SubscriptionRepository;

    async fn store_with_users(count: i64) -> InMemorySubscriptionStore {
        let store = InMemorySubscriptionStore::new();
        let base = Timestamp::from_unix_secs(1_700_000_000).unwrap();
        for i in 0..count {
            // Pairs share a creation time so the id breaks the tie
            let created = base.add_days(i / 2);
            let id = UserId::new(format!("user-{:02}", i)).unwrap();
            store
                .insert_user(User::new(id, format!("u{}@example.com", i), created))
                .await;
        }
        store
    }

    #[tokio::test]
    async fn visits_every_user_once_in_order() {
        let store = store_with_users(7).await;
        let handler = ListUsersHandler::new(Arc::new(store));

        let mut pages = handler.pages(ListUsersQuery { page_size: 3 });
        let mut sizes = Vec::new();
        let mut ids = Vec::new();
        while let Some(page) = pages.try_next().await.unwrap() {
            sizes.push(page.len());
            ids.extend(page.into_iter().map(|u| u.id.to_string()));
        }

        assert_eq!(sizes, vec![3, 3, 1]);
        let expected: Vec<_> = (0..7).map(|i| format!("user-{:02}", i)).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn exact_multiple_of_page_size_ends_cleanly() {
        let store = store_with_users(4).await;
        let handler = ListUsersHandler::new(Arc::new(store));

        let users = handler.handle(ListUsersQuery { page_size: 2 }).await.unwrap();
        assert_eq!(users.len(), 4);
    }

    #[tokio::test]
    async fn empty_store_yields_no_pages() {
        let handler = ListUsersHandler::new(Arc::new(InMemorySubscriptionStore::new()));
        let users = handler.handle(ListUsersQuery { page_size: 10 }).await.unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn reports_subscription_counts() {
        let store = store_with_users(2).await;
        let user_id = UserId::new("user-01").unwrap();
        for days in [1, 2] {
            let sub = Subscription::create(
                user_id.clone(),
                SubscriptionPlan::Free,
                Timestamp::now().minus_days(days),
            );
            store.save(&sub).await.unwrap();
        }

        let users = ListUsersHandler::new(Arc::new(store))
            .handle(ListUsersQuery { page_size: 100 })
            .await
            .unwrap();

        let counts: Vec<_> = users.iter().map(|u| u.subscription_count).collect();
        assert_eq!(counts, vec![0, 2]);
    }

    #[tokio::test]
    async fn zero_page_size_is_rejected() {
        let handler = ListUsersHandler::new(Arc::new(InMemorySubscriptionStore::new()));
        let err = handler.handle(ListUsersQuery { page_size: 0 }).await.unwrap_err();
        assert!(matches!(err, SubscriptionError::ValidationFailed { .. }));
    }

    #[tokio::test]
    async fn store_failure_ends_the_stream_with_an_error() {
        let store = store_with_users(3).await;
        store.set_unavailable(true);
        let handler = ListUsersHandler::new(Arc::new(store));
        let err = handler.handle(ListUsersQuery { page_size: 2 }).await.unwrap_err();
        assert!(matches!(err, SubscriptionError::Infrastructure(_)));
    }
}
