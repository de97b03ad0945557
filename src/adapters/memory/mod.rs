//! In-memory adapters.
//!
//! - `InMemorySubscriptionStore` - Users and subscriptions held in process,
//!   for tests and local dry runs

mod in_memory_store;

pub use in_memory_store::InMemorySubscriptionStore;
