//! PostgreSQL adapters - Database implementations for store ports.
//!
//! Tables follow the ORM schema: `"User"` and `"Subscription"` with
//! camelCase quoted columns and native enum types for plan and status.
//!
//! - `connect_pool` - Pool construction from `DatabaseConfig`
//! - `PostgresSubscriptionRepository` - Subscription records and guarded updates
//! - `PostgresUserReader` - User lookup and keyset-paginated listing

mod pool;
mod subscription_repository;
mod user_reader;

pub use pool::connect_pool;
pub use subscription_repository::PostgresSubscriptionRepository;
pub use user_reader::PostgresUserReader;
