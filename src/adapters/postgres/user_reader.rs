//! PostgreSQL implementation of UserReader.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::user::User;
use crate::ports::{UserCursor, UserPage, UserReader, UserSummary};

/// PostgreSQL implementation of the UserReader port.
pub struct PostgresUserReader {
    pool: PgPool,
}

impl PostgresUserReader {
    /// Creates a new reader over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    email_verified: bool,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

/// User row joined with its subscription count.
#[derive(Debug, sqlx::FromRow)]
struct UserCountRow {
    #[sqlx(flatten)]
    user: UserRow,
    subscription_count: i64,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::new(row.id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Corrupt user row: {}", e))
            })?,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            email_verified: row.email_verified,
            created_at: Timestamp::from_datetime(row.created_at.and_utc()),
            updated_at: Timestamp::from_datetime(row.updated_at.and_utc()),
        })
    }
}

#[async_trait]
impl UserReader for PostgresUserReader {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, "firstName" AS first_name, "lastName" AS last_name,
                   "emailVerified" AS email_verified, "createdAt" AS created_at,
                   "updatedAt" AS updated_at
            FROM "User"
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to find user", e))?;

        row.map(User::try_from).transpose()
    }

    async fn list_page(
        &self,
        after: Option<&UserCursor>,
        limit: u32,
    ) -> Result<UserPage, DomainError> {
        let rows: Vec<UserCountRow> = sqlx::query_as(
            r#"
            SELECT u.id, u.email, u."firstName" AS first_name, u."lastName" AS last_name,
                   u."emailVerified" AS email_verified, u."createdAt" AS created_at,
                   u."updatedAt" AS updated_at,
                   COUNT(s.id) AS subscription_count
            FROM "User" u
            LEFT JOIN "Subscription" s ON s."userId" = u.id
            WHERE $1::timestamp IS NULL OR (u."createdAt", u.id) > ($1, $2)
            GROUP BY u.id
            ORDER BY u."createdAt" ASC, u.id ASC
            LIMIT $3
            "#,
        )
        .bind(after.map(|c| c.created_at.as_datetime().naive_utc()))
        .bind(after.map(|c| c.id.as_str().to_string()))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list users", e))?;

        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            let count = row.subscription_count.max(0) as u64;
            let user = User::try_from(row.user)?;
            users.push(UserSummary::from_user(&user, count));
        }
        Ok(UserPage::from_rows(users, limit))
    }
}
