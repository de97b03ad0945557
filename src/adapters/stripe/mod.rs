//! Stripe billing provider adapter.
//!
//! Read-only access to Stripe subscriptions:
//! - `StripeBillingAdapter` - `GET /v1/subscriptions/{id}` over reqwest
//! - `MockBillingProvider` - In-process provider for tests
//!
//! The API key is held as `secrecy::SecretString` and only exposed when
//! building the request's basic auth header.

mod mock_billing_provider;
mod stripe_adapter;
mod types;

pub use mock_billing_provider::MockBillingProvider;
pub use stripe_adapter::{StripeBillingAdapter, StripeConfig};
pub use types::StripeSubscription;
