//! Application layer - Commands, Queries, and Handlers.
//!
//! Handlers orchestrate domain rules over the store and billing ports.
//! Queries never write; the reconcile command writes at most one record.

pub mod handlers;

pub use handlers::{
    AuditDriftHandler, AuditDriftQuery, ListUserSubscriptionsHandler, ListUserSubscriptionsQuery,
    ListUserSubscriptionsResult, ListUsersHandler, ListUsersQuery, ReconcileSubscriptionCommand,
    ReconcileSubscriptionHandler, ReconcileSubscriptionResult, UserSubscriptions,
};
