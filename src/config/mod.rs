//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the
//! `SUBDOMAIN_MARKETPLACE` prefix and nested values are separated by a
//! double underscore.
//!
//! # Example
//!
//! ```no_run
//! use subdomain_marketplace::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Listing users {} at a time", config.admin.user_page_size);
//! ```

mod admin;
mod database;
mod error;
mod payment;

pub use admin::{validate_page_size, AdminConfig, MAX_USER_PAGE_SIZE};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;

use serde::Deserialize;

/// Environment variable prefix for all settings.
pub const ENV_PREFIX: &str = "SUBDOMAIN_MARKETPLACE";

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection
    pub database: DatabaseConfig,

    /// Stripe access, required only by commands that call Stripe
    #[serde(default)]
    pub payment: PaymentConfig,

    #[serde(default)]
    pub admin: AdminConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads variables such as
    /// `SUBDOMAIN_MARKETPLACE__DATABASE__URL` -> `database.url`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate the sections every command needs.
    ///
    /// Payment settings are validated separately by the commands that
    /// contact Stripe.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.admin.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 4] = [
        "SUBDOMAIN_MARKETPLACE__DATABASE__URL",
        "SUBDOMAIN_MARKETPLACE__DATABASE__MAX_CONNECTIONS",
        "SUBDOMAIN_MARKETPLACE__PAYMENT__STRIPE_API_KEY",
        "SUBDOMAIN_MARKETPLACE__ADMIN__USER_PAGE_SIZE",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn set_minimal_env() {
        env::set_var(
            "SUBDOMAIN_MARKETPLACE__DATABASE__URL",
            "postgresql://test@localhost/test",
        );
    }

    #[test]
    fn loads_minimal_environment_with_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(config.admin.user_page_size, 100);
        assert_eq!(config.payment.stripe_api_base_url, "https://api.stripe.com");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn payment_is_optional_until_needed() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
        assert!(config.payment.validate().is_err());
    }

    #[test]
    fn reads_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        set_minimal_env();
        env::set_var("SUBDOMAIN_MARKETPLACE__DATABASE__MAX_CONNECTIONS", "3");
        env::set_var("SUBDOMAIN_MARKETPLACE__PAYMENT__STRIPE_API_KEY", "sk_test_abc");
        env::set_var("SUBDOMAIN_MARKETPLACE__ADMIN__USER_PAGE_SIZE", "25");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.database.max_connections, 3);
        assert_eq!(config.admin.user_page_size, 25);
        assert_eq!(config.payment.stripe_api_key.expose_secret(), "sk_test_abc");
        assert!(config.payment.validate().is_ok());
    }

    #[test]
    fn missing_database_url_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn out_of_range_page_size_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        set_minimal_env();
        env::set_var("SUBDOMAIN_MARKETPLACE__ADMIN__USER_PAGE_SIZE", "0");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidPageSize { actual: 0, .. })
        ));
    }
}
