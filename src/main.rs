//! `subscription-admin` - operator commands for subscription records.
//!
//! Reports go to stdout, diagnostics to stderr.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use subdomain_marketplace::adapters::cli::{AdminError, AdminServices, Cli, Command};
use subdomain_marketplace::adapters::{
    connect_pool, PostgresSubscriptionRepository, PostgresUserReader, StripeBillingAdapter,
    StripeConfig,
};
use subdomain_marketplace::config::{validate_page_size, AppConfig};
use subdomain_marketplace::ports::BillingProvider;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "subdomain_marketplace=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(code = %err.code(), "Command failed");
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<(), AdminError> {
    let config = AppConfig::load()?;
    config.validate()?;
    if let Command::Users {
        page_size: Some(size),
    } = command
    {
        validate_page_size(size)?;
    }

    let billing: Option<Arc<dyn BillingProvider>> = if command.needs_billing_provider() {
        config.payment.validate()?;
        if config.payment.is_test_mode() {
            tracing::info!("Using Stripe test mode");
        }
        Some(Arc::new(StripeBillingAdapter::new(
            StripeConfig::from_payment_config(&config.payment),
        )))
    } else {
        None
    };

    let pool = connect_pool(&config.database).await?;
    let services = AdminServices {
        users: Arc::new(PostgresUserReader::new(pool.clone())),
        subscriptions: Arc::new(PostgresSubscriptionRepository::new(pool.clone())),
        billing,
        default_page_size: config.admin.user_page_size,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = services.execute_and_flush(command, &mut out).await;
    pool.close().await;
    result
}
