//! PostgreSQL implementation of SubscriptionRepository.
//!
//! Timestamps are stored as `timestamp(3)` without time zone and hold
//! UTC, so rows carry `NaiveDateTime` and convert at the boundary.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::PgPool;

use crate::domain::foundation::{
    DomainError, ErrorCode, SubscriptionId, Timestamp, UserId,
};
use crate::domain::subscription::{
    Subscription, SubscriptionPlan, SubscriptionState, SubscriptionStatus,
};
use crate::ports::SubscriptionRepository;

/// PostgreSQL implementation of the SubscriptionRepository port.
pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    /// Creates a new repository over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, "userId" AS user_id, plan::text AS plan, status::text AS status,
           "subdomainQuota" AS subdomain_quota, "subdomainsUsed" AS subdomains_used,
           "stripeSubscriptionId" AS stripe_subscription_id,
           "stripeCurrentPeriodEnd" AS stripe_current_period_end,
           "stripeCancelAtPeriodEnd" AS stripe_cancel_at_period_end,
           "createdAt" AS created_at, "canceledAt" AS canceled_at
    FROM "Subscription"
"#;

/// Database row representation of a subscription.
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: String,
    user_id: String,
    plan: String,
    status: String,
    subdomain_quota: i32,
    subdomains_used: i32,
    stripe_subscription_id: Option<String>,
    stripe_current_period_end: Option<NaiveDateTime>,
    stripe_cancel_at_period_end: bool,
    created_at: NaiveDateTime,
    canceled_at: Option<NaiveDateTime>,
}

fn utc(dt: NaiveDateTime) -> Timestamp {
    Timestamp::from_datetime(dt.and_utc())
}

fn corrupt_row(err: impl std::fmt::Display) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Corrupt subscription row: {}", err))
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        Ok(Subscription {
            id: SubscriptionId::new(row.id).map_err(corrupt_row)?,
            user_id: UserId::new(row.user_id).map_err(corrupt_row)?,
            plan: row.plan.parse::<SubscriptionPlan>().map_err(corrupt_row)?,
            status: row.status.parse::<SubscriptionStatus>().map_err(corrupt_row)?,
            subdomain_quota: row.subdomain_quota,
            subdomains_used: row.subdomains_used,
            stripe_subscription_id: row.stripe_subscription_id,
            stripe_current_period_end: row.stripe_current_period_end.map(utc),
            stripe_cancel_at_period_end: row.stripe_cancel_at_period_end,
            created_at: utc(row.created_at),
            canceled_at: row.canceled_at.map(utc),
        })
    }
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn save(&self, subscription: &Subscription) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO "Subscription" (
                id, "userId", plan, status, "subdomainQuota", "subdomainsUsed",
                "stripeSubscriptionId", "stripeCurrentPeriodEnd", "stripeCancelAtPeriodEnd",
                "createdAt", "canceledAt"
            ) VALUES (
                $1, $2, $3::"SubscriptionPlan", $4::"SubscriptionStatus", $5, $6,
                $7, $8, $9, $10, $11
            )
            "#,
        )
        .bind(subscription.id.as_str())
        .bind(subscription.user_id.as_str())
        .bind(subscription.plan.as_str())
        .bind(subscription.status.as_str())
        .bind(subscription.subdomain_quota)
        .bind(subscription.subdomains_used)
        .bind(&subscription.stripe_subscription_id)
        .bind(subscription.stripe_current_period_end.map(|t| t.as_datetime().naive_utc()))
        .bind(subscription.stripe_cancel_at_period_end)
        .bind(subscription.created_at.as_datetime().naive_utc())
        .bind(subscription.canceled_at.map(|t| t.as_datetime().naive_utc()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return DomainError::validation(
                        "id",
                        format!("Subscription {} already exists", subscription.id),
                    );
                }
            }
            DomainError::database("Failed to save subscription", e)
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", SELECT_COLUMNS))
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to find subscription", e))?;

        row.map(Subscription::try_from).transpose()
    }

    async fn find_by_stripe_subscription_id(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            r#"{} WHERE "stripeSubscriptionId" = $1"#,
            SELECT_COLUMNS
        ))
        .bind(stripe_subscription_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to find subscription", e))?;

        row.map(Subscription::try_from).transpose()
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Subscription>, DomainError> {
        let rows: Vec<SubscriptionRow> = sqlx::query_as(&format!(
            r#"{} WHERE "userId" = $1 ORDER BY "createdAt" DESC, id DESC"#,
            SELECT_COLUMNS
        ))
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list subscriptions", e))?;

        rows.into_iter().map(Subscription::try_from).collect()
    }

    async fn count_by_user(&self, user_id: &UserId) -> Result<u64, DomainError> {
        let (count,): (i64,) =
            sqlx::query_as(r#"SELECT COUNT(*) FROM "Subscription" WHERE "userId" = $1"#)
                .bind(user_id.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to count subscriptions", e))?;

        Ok(count.max(0) as u64)
    }

    async fn update_state_if_status(
        &self,
        id: &SubscriptionId,
        expected_status: SubscriptionStatus,
        target: SubscriptionState,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE "Subscription" SET
                status = $3::"SubscriptionStatus",
                "stripeCancelAtPeriodEnd" = $4
            WHERE id = $1
              AND status = $2::"SubscriptionStatus"
            "#,
        )
        .bind(id.as_str())
        .bind(expected_status.as_str())
        .bind(target.status.as_str())
        .bind(target.cancel_at_period_end)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update subscription", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_premature_cancellations(
        &self,
        now: Timestamp,
    ) -> Result<Vec<Subscription>, DomainError> {
        let rows: Vec<SubscriptionRow> = sqlx::query_as(&format!(
            r#"{}
            WHERE status = 'CANCELED'
              AND "stripeCancelAtPeriodEnd" = true
              AND "stripeCurrentPeriodEnd" IS NOT NULL
              AND "stripeCurrentPeriodEnd" > $1
            ORDER BY "stripeCurrentPeriodEnd" ASC"#,
            SELECT_COLUMNS
        ))
        .bind(now.as_datetime().naive_utc())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to scan subscriptions", e))?;

        rows.into_iter().map(Subscription::try_from).collect()
    }
}
