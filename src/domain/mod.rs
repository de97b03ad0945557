//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `subscription` - Subscription record, lifecycle and reconciliation
//! - `user` - Account holders

pub mod foundation;
pub mod subscription;
pub mod user;
