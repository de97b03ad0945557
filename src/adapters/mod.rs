//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `cli` - Operator command line
//! - `memory` - In-memory store for tests and local runs
//! - `postgres` - PostgreSQL store (sqlx)
//! - `stripe` - Stripe billing provider (reqwest) and its mock

pub mod cli;
pub mod memory;
pub mod postgres;
pub mod stripe;

pub use memory::InMemorySubscriptionStore;
pub use postgres::{connect_pool, PostgresSubscriptionRepository, PostgresUserReader};
pub use stripe::{MockBillingProvider, StripeBillingAdapter, StripeConfig};
