//! Subscription plan definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Plan a subscription is billed under.
///
/// Text forms match the ORM enum (`FREE`, `PACKAGE_5`, `PACKAGE_50`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubscriptionPlan {
    /// No paid subdomains.
    #[serde(rename = "FREE")]
    Free,

    /// Five subdomains.
    #[serde(rename = "PACKAGE_5")]
    Package5,

    /// Fifty subdomains.
    #[serde(rename = "PACKAGE_50")]
    Package50,
}

impl SubscriptionPlan {
    /// Stored text form.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionPlan::Free => "FREE",
            SubscriptionPlan::Package5 => "PACKAGE_5",
            SubscriptionPlan::Package50 => "PACKAGE_50",
        }
    }

    /// Subdomain quota granted to new subscriptions on this plan.
    pub fn default_quota(&self) -> i32 {
        match self {
            SubscriptionPlan::Free => 0,
            SubscriptionPlan::Package5 => 5,
            SubscriptionPlan::Package50 => 50,
        }
    }

    /// Returns true if this plan is billed through the provider.
    pub fn is_paid(&self) -> bool {
        !matches!(self, SubscriptionPlan::Free)
    }
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubscriptionPlan {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FREE" => Ok(SubscriptionPlan::Free),
            "PACKAGE_5" => Ok(SubscriptionPlan::Package5),
            "PACKAGE_50" => Ok(SubscriptionPlan::Package50),
            other => Err(ValidationError::invalid_format(
                "plan",
                format!("unknown plan '{}'", other),
            )),
        }
    }
}
