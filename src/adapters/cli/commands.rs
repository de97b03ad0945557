//! Command dispatch over the store and billing ports.

use std::io::Write;
use std::sync::Arc;

use futures::TryStreamExt;

use crate::application::{
    AuditDriftHandler, AuditDriftQuery, ListUserSubscriptionsHandler, ListUserSubscriptionsQuery,
    ListUserSubscriptionsResult, ListUsersHandler, ListUsersQuery, ReconcileSubscriptionCommand,
    ReconcileSubscriptionHandler,
};
use crate::domain::foundation::Timestamp;
use crate::domain::subscription::ProviderSignals;
use crate::ports::{BillingProvider, SubscriptionRepository, UserReader};

use super::args::Command;
use super::error::AdminError;
use super::report;

/// Ports the admin commands run against.
#[derive(Clone)]
pub struct AdminServices {
    pub users: Arc<dyn UserReader>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    /// Present only when the command needs Stripe.
    pub billing: Option<Arc<dyn BillingProvider>>,
    /// Page size for `users` when none is given.
    pub default_page_size: u32,
}

impl AdminServices {
    /// Run one command and flush `out`. The flush is attempted even when
    /// the command fails; the command's error takes precedence.
    pub async fn execute_and_flush(
        &self,
        command: Command,
        out: &mut impl Write,
    ) -> Result<(), AdminError> {
        let result = self.execute(command, out).await;
        let flushed = out.flush();
        result?;
        Ok(flushed?)
    }

    /// Run one command, writing its report to `out`.
    pub async fn execute(&self, command: Command, out: &mut impl Write) -> Result<(), AdminError> {
        match command {
            Command::Subscriptions { email } => {
                let handler = ListUserSubscriptionsHandler::new(
                    Arc::clone(&self.users),
                    Arc::clone(&self.subscriptions),
                );
                match handler.handle(ListUserSubscriptionsQuery { email }).await? {
                    ListUserSubscriptionsResult::UserNotFound { email } => {
                        report::write_user_not_found(out, &email)?
                    }
                    ListUserSubscriptionsResult::Found(found) => {
                        report::write_user_subscriptions(out, &found)?
                    }
                }
            }

            Command::Users { page_size } => {
                let handler = ListUsersHandler::new(Arc::clone(&self.users));
                let query = ListUsersQuery {
                    page_size: page_size.unwrap_or(self.default_page_size),
                };

                let mut pages = handler.pages(query);
                let mut total = 0usize;
                while let Some(page) = pages.try_next().await? {
                    for user in &page {
                        writeln!(out, "{}", report::user_line(user))?;
                    }
                    total += page.len();
                    out.flush()?;
                }
                writeln!(out, "Total users: {}", total)?;
            }

            Command::Reconcile {
                stripe_subscription_id,
                cancel_at_period_end,
                dry_run,
            } => {
                let handler = ReconcileSubscriptionHandler::new(
                    Arc::clone(&self.subscriptions),
                    self.billing.clone(),
                );
                let result = handler
                    .handle(ReconcileSubscriptionCommand {
                        stripe_subscription_id,
                        signals_override: cancel_at_period_end
                            .map(ProviderSignals::cancel_at_period_end),
                        dry_run,
                    })
                    .await?;
                report::write_reconcile_result(out, &result)?;
            }

            Command::AuditDrift => {
                let handler = AuditDriftHandler::new(Arc::clone(&self.subscriptions));
                let findings = handler
                    .handle(AuditDriftQuery {
                        as_of: Timestamp::now(),
                    })
                    .await?;
                report::write_drift_findings(out, &findings)?;
            }
        }
        Ok(())
    }
}
