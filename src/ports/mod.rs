//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Store Ports
//!
//! - `SubscriptionRepository` - Subscription records, lookups and guarded updates
//! - `UserReader` - User lookup and paginated enumeration
//!
//! ## Billing Ports
//!
//! - `BillingProvider` - Provider's view of one subscription

mod billing_provider;
mod subscription_repository;
mod user_reader;

pub use billing_provider::{BillingError, BillingErrorCode, BillingProvider, ProviderSubscription};
pub use subscription_repository::SubscriptionRepository;
pub use user_reader::{UserCursor, UserPage, UserReader, UserSummary};
