//! Subscription domain module.
//!
//! Handles the subscription record, its lifecycle statuses and the
//! reconciliation of local status against the billing provider.
//!
//! # Module Structure
//!
//! - `aggregate` - Subscription record
//! - `status` - SubscriptionStatus state machine
//! - `plan` - SubscriptionPlan and quota defaults
//! - `reconciliation` - Pure reconciliation rule
//! - `status_counts` - Per-status aggregation for reports
//! - `errors` - Subscription-specific errors

mod aggregate;
mod errors;
mod plan;
mod reconciliation;
mod status;
mod status_counts;

pub use aggregate::{Subscription, SubscriptionState};
pub use errors::SubscriptionError;
pub use plan::SubscriptionPlan;
pub use reconciliation::{reconcile, Drift, ProviderSignals, ReconciliationOutcome};
pub use status::SubscriptionStatus;
pub use status_counts::StatusCounts;
