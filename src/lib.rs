//! Subdomain Marketplace - Subscription administration
//!
//! This crate inspects and repairs subscription records against Stripe.
//! Its main job is restoring deferred cancellations that were recorded
//! as immediate.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
