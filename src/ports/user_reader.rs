//! User reader port (read side).
//!
//! Lookup by email and paginated enumeration with per-user subscription
//! counts. Enumeration is keyset-paginated on `(created_at, id)` so a
//! report never holds more than one page of users.

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::user::User;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reader port for user queries.
#[async_trait]
pub trait UserReader: Send + Sync {
    /// Find a user by exact email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// One page of users after `after` (exclusive), ordered by
    /// `(created_at, id)` ascending, with subscription counts.
    async fn list_page(
        &self,
        after: Option<&UserCursor>,
        limit: u32,
    ) -> Result<UserPage, DomainError>;
}

/// Position of the last user seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCursor {
    pub created_at: Timestamp,
    pub id: UserId,
}

/// One user row in the listing report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub email: String,
    /// First and last name, blank parts omitted.
    pub display_name: String,
    pub subscription_count: u64,
    pub created_at: Timestamp,
}

impl UserSummary {
    /// Build a summary from a user and a count.
    pub fn from_user(user: &User, subscription_count: u64) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            display_name: user.display_name(),
            subscription_count,
            created_at: user.created_at,
        }
    }

    /// Cursor pointing at this user.
    pub fn cursor(&self) -> UserCursor {
        UserCursor {
            created_at: self.created_at,
            id: self.id.clone(),
        }
    }
}

/// A page of users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPage {
    pub users: Vec<UserSummary>,
    /// Cursor for the next page; `None` when this was the last one.
    pub next_cursor: Option<UserCursor>,
}

impl UserPage {
    /// Build a page from up to `limit` rows. A full page gets a cursor on
    /// its last row; a short page is the last one.
    pub fn from_rows(users: Vec<UserSummary>, limit: u32) -> Self {
        let next_cursor = if users.len() >= limit as usize {
            users.last().map(UserSummary::cursor)
        } else {
            None
        };
        Self { users, next_cursor }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, secs: i64) -> UserSummary {
        UserSummary {
            id: UserId::new(id).unwrap(),
            email: format!("{}@example.com", id),
            display_name: String::new(),
            subscription_count: 0,
            created_at: Timestamp::from_unix_secs(secs).unwrap(),
        }
    }

    #[test]
    fn user_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn UserReader) {}
    }

    #[test]
    fn full_page_points_at_last_row() {
        let page = UserPage::from_rows(vec![summary("a", 1), summary("b", 2)], 2);
        let cursor = page.next_cursor.unwrap();
        assert_eq!(cursor.id.as_str(), "b");
        assert_eq!(cursor.created_at.as_unix_secs(), 2);
    }

    #[test]
    fn short_page_is_last() {
        let page = UserPage::from_rows(vec![summary("a", 1)], 2);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn empty_page_is_last() {
        let page = UserPage::from_rows(vec![], 10);
        assert!(page.users.is_empty());
        assert!(page.next_cursor.is_none());
    }
}
