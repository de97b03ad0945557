//! Human-readable report lines written to stdout.

use std::io::{self, Write};

use crate::application::{ReconcileSubscriptionResult, UserSubscriptions};
use crate::domain::subscription::Subscription;
use crate::ports::UserSummary;

fn optional<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// One line per subscription record.
pub fn subscription_line(sub: &Subscription) -> String {
    format!(
        "{id}  plan={plan}  status={status}  quota={used}/{quota}  stripe={stripe}  periodEnd={end}  cancelAtPeriodEnd={flag}  created={created}  canceledAt={canceled}",
        id = sub.id,
        plan = sub.plan,
        status = sub.status,
        used = sub.subdomains_used,
        quota = sub.subdomain_quota,
        stripe = optional(sub.stripe_subscription_id.as_deref()),
        end = optional(sub.stripe_current_period_end),
        flag = sub.stripe_cancel_at_period_end,
        created = sub.created_at,
        canceled = optional(sub.canceled_at),
    )
}

pub fn write_user_subscriptions(out: &mut impl Write, found: &UserSubscriptions) -> io::Result<()> {
    let name = found.user.display_name();
    if name.is_empty() {
        writeln!(out, "User {} <{}>", found.user.id, found.user.email)?;
    } else {
        writeln!(out, "User {} <{}> {}", found.user.id, found.user.email, name)?;
    }
    writeln!(out, "Subscriptions: {}", found.subscriptions.len())?;
    for sub in &found.subscriptions {
        writeln!(out, "  {}", subscription_line(sub))?;
    }
    writeln!(out, "Status counts: {}", found.counts)
}

pub fn write_user_not_found(out: &mut impl Write, email: &str) -> io::Result<()> {
    writeln!(out, "User not found: {}", email)
}

pub fn user_line(user: &UserSummary) -> String {
    let name = if user.display_name.is_empty() {
        "-"
    } else {
        user.display_name.as_str()
    };
    format!(
        "{}  {}  {}  subscriptions={}",
        user.id, user.email, name, user.subscription_count
    )
}

pub fn write_reconcile_result(
    out: &mut impl Write,
    result: &ReconcileSubscriptionResult,
) -> io::Result<()> {
    match result {
        ReconcileSubscriptionResult::NotFound {
            stripe_subscription_id,
        } => writeln!(out, "Subscription not found: {}", stripe_subscription_id),
        ReconcileSubscriptionResult::NotFoundAtProvider {
            stripe_subscription_id,
        } => writeln!(
            out,
            "Subscription not found at Stripe: {} (no change)",
            stripe_subscription_id
        ),
        ReconcileSubscriptionResult::NoChange { subscription } => writeln!(
            out,
            "No change: {} is {} (cancelAtPeriodEnd={})",
            subscription.id, subscription.status, subscription.stripe_cancel_at_period_end
        ),
        ReconcileSubscriptionResult::CancellationInEffect { subscription } => writeln!(
            out,
            "Cancellation already in effect: {} stays {} (no change)",
            subscription.id, subscription.status
        ),
        ReconcileSubscriptionResult::Corrected {
            subscription,
            outcome,
        } => {
            writeln!(
                out,
                "Corrected: {} {} -> {} (cancelAtPeriodEnd={})",
                subscription.id,
                outcome.current.status,
                outcome.corrected.status,
                outcome.corrected.cancel_at_period_end
            )?;
            writeln!(out, "  {}", subscription_line(subscription))
        }
        ReconcileSubscriptionResult::WouldCorrect {
            subscription,
            outcome,
        } => {
            writeln!(
                out,
                "Dry run: would correct {} {} -> {} (cancelAtPeriodEnd={})",
                subscription.id,
                outcome.current.status,
                outcome.corrected.status,
                outcome.corrected.cancel_at_period_end
            )
        }
        ReconcileSubscriptionResult::Conflict { subscription_id } => writeln!(
            out,
            "Subscription {} was already changed concurrently (no change)",
            subscription_id
        ),
    }
}

pub fn write_drift_findings(out: &mut impl Write, findings: &[Subscription]) -> io::Result<()> {
    if findings.is_empty() {
        return writeln!(out, "No prematurely canceled subscriptions found");
    }
    writeln!(out, "Prematurely canceled subscriptions: {}", findings.len())?;
    for sub in findings {
        writeln!(
            out,
            "  {}  user={}  stripe={}  periodEnd={}",
            sub.id,
            sub.user_id,
            optional(sub.stripe_subscription_id.as_deref()),
            optional(sub.stripe_current_period_end),
        )?;
    }
    Ok(())
}
