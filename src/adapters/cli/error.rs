//! Errors surfaced by the admin commands.

use thiserror::Error;

use crate::config::{ConfigError, ValidationError};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::subscription::SubscriptionError;

/// Any failure that ends a command with a non-zero exit.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ValidationError),

    #[error("{0}")]
    Subscription(#[from] SubscriptionError),

    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

impl AdminError {
    /// Stable error code for log fields.
    pub fn code(&self) -> ErrorCode {
        match self {
            AdminError::Config(_) | AdminError::InvalidConfig(_) => ErrorCode::ValidationFailed,
            AdminError::Subscription(err) => err.code(),
            AdminError::Output(_) => ErrorCode::InternalError,
        }
    }
}

impl From<DomainError> for AdminError {
    fn from(err: DomainError) -> Self {
        AdminError::Subscription(err.into())
    }
}
