//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod subscription;

pub use subscription::{
    AuditDriftHandler, AuditDriftQuery, ListUserSubscriptionsHandler, ListUserSubscriptionsQuery,
    ListUserSubscriptionsResult, ListUsersHandler, ListUsersQuery, ReconcileSubscriptionCommand,
    ReconcileSubscriptionHandler, ReconcileSubscriptionResult, UserSubscriptions,
};
