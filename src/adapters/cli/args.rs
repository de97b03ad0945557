//! Command line arguments.

use clap::{Parser, Subcommand};

/// Subscription administration for the subdomain marketplace.
#[derive(Debug, Parser)]
#[command(name = "subscription-admin", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List a user's subscriptions, newest first, with status counts
    Subscriptions {
        /// Account email (exact match)
        #[arg(long, env = "SUBSCRIPTION_ADMIN_EMAIL")]
        email: String,
    },

    /// List users with their subscription counts
    Users {
        /// Users fetched per page (defaults to the configured page size)
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Restore a deferred cancellation that was recorded as immediate
    Reconcile {
        /// Stripe subscription id (sub_...)
        #[arg(long, env = "SUBSCRIPTION_ADMIN_STRIPE_SUBSCRIPTION_ID")]
        stripe_subscription_id: String,

        /// Use this value for Stripe's cancel_at_period_end instead of
        /// fetching it
        #[arg(long, value_name = "BOOL")]
        cancel_at_period_end: Option<bool>,

        /// Report the correction without writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Scan for records that look prematurely canceled
    AuditDrift,
}

impl Command {
    /// Returns true if running this command requires Stripe access.
    pub fn needs_billing_provider(&self) -> bool {
        matches!(
            self,
            Command::Reconcile {
                cancel_at_period_end: None,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, clap::Error> {
        let mut argv = vec!["subscription-admin"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).map(|cli| cli.command)
    }

    #[test]
    fn parses_subscriptions() {
        assert_eq!(
            parse(&["subscriptions", "--email", "ada@example.com"]).unwrap(),
            Command::Subscriptions {
                email: "ada@example.com".to_string()
            }
        );
    }

    #[test]
    fn parses_users_with_optional_page_size() {
        assert_eq!(parse(&["users"]).unwrap(), Command::Users { page_size: None });
        assert_eq!(
            parse(&["users", "--page-size", "50"]).unwrap(),
            Command::Users { page_size: Some(50) }
        );
    }

    #[test]
    fn parses_reconcile_with_override() {
        let command = parse(&[
            "reconcile",
            "--stripe-subscription-id",
            "sub_123",
            "--cancel-at-period-end",
            "true",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(
            command,
            Command::Reconcile {
                stripe_subscription_id: "sub_123".to_string(),
                cancel_at_period_end: Some(true),
                dry_run: true,
            }
        );
        assert!(!command.needs_billing_provider());
    }

    #[test]
    fn reconcile_without_override_needs_stripe() {
        let command = parse(&["reconcile", "--stripe-subscription-id", "sub_123"]).unwrap();
        assert!(command.needs_billing_provider());
    }

    #[test]
    fn parses_audit_drift() {
        assert_eq!(parse(&["audit-drift"]).unwrap(), Command::AuditDrift);
    }

    #[test]
    fn rejects_non_boolean_flag() {
        assert!(parse(&[
            "reconcile",
            "--stripe-subscription-id",
            "sub_1",
            "--cancel-at-period-end",
            "maybe",
        ])
        .is_err());
    }
}
