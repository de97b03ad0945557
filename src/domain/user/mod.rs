//! User domain module.
//!
//! Account holders who own subscriptions.

mod account;

pub use account::User;
