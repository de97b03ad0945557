//! Subscription handlers - Operator queries and the reconcile command.

mod audit_drift;
mod list_user_subscriptions;
mod list_users;
mod reconcile_subscription;

pub use audit_drift::{AuditDriftHandler, AuditDriftQuery};
pub use list_user_subscriptions::{
    ListUserSubscriptionsHandler, ListUserSubscriptionsQuery, ListUserSubscriptionsResult,
    UserSubscriptions,
};
pub use list_users::{ListUsersHandler, ListUsersQuery};
pub use reconcile_subscription::{
    ReconcileSubscriptionCommand, ReconcileSubscriptionHandler, ReconcileSubscriptionResult,
};
