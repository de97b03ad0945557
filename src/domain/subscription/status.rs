//! Subscription status state machine.
//!
//! Defines every status a subscription record can hold and the legal
//! transitions between them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// Status of a subscription in the billing lifecycle.
///
/// Text forms match the ORM enum (`ACTIVE`, `PAST_DUE`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    /// Paid up and in service.
    Active,

    /// Latest invoice failed; provider is retrying.
    PastDue,

    /// Cancellation has taken effect.
    Canceled,

    /// Subscription ended and is no longer billed.
    Expired,

    /// In a trial period.
    Trialing,
}

impl SubscriptionStatus {
    /// Every status, in declaration order.
    pub const ALL: [SubscriptionStatus; 5] = [
        SubscriptionStatus::Active,
        SubscriptionStatus::PastDue,
        SubscriptionStatus::Canceled,
        SubscriptionStatus::Expired,
        SubscriptionStatus::Trialing,
    ];

    /// Stored text form.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "ACTIVE",
            SubscriptionStatus::PastDue => "PAST_DUE",
            SubscriptionStatus::Canceled => "CANCELED",
            SubscriptionStatus::Expired => "EXPIRED",
            SubscriptionStatus::Trialing => "TRIALING",
        }
    }

    /// Returns true if this status grants service regardless of period end.
    ///
    /// `Canceled` is entitled only until period end, which the record
    /// decides; see `Subscription::is_entitled`.
    pub fn is_unconditionally_entitled(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::Active | SubscriptionStatus::PastDue | SubscriptionStatus::Trialing
        )
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubscriptionStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("status", format!("unknown status '{}'", s))
            })
    }
}

impl StateMachine for SubscriptionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionStatus::*;
        matches!(
            (self, target),
            // From TRIALING
            (Trialing, Active)
                | (Trialing, PastDue)
                | (Trialing, Canceled)
                | (Trialing, Expired)
            // From ACTIVE
                | (Active, PastDue)
                | (Active, Canceled)
                | (Active, Expired)
            // From PAST_DUE
                | (PastDue, Active)
                | (PastDue, Canceled)
                | (PastDue, Expired)
            // From CANCELED
                | (Canceled, Active) // Deferred cancellation restored
                | (Canceled, Expired)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SubscriptionStatus::*;
        match self {
            Trialing => vec![Active, PastDue, Canceled, Expired],
            Active => vec![PastDue, Canceled, Expired],
            PastDue => vec![Active, Canceled, Expired],
            Canceled => vec![Active, Expired],
            Expired => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canceled_can_return_to_active() {
        let result = SubscriptionStatus::Canceled.transition_to(SubscriptionStatus::Active);
        assert_eq!(result, Ok(SubscriptionStatus::Active));
    }

    #[test]
    fn canceled_can_expire() {
        assert!(SubscriptionStatus::Canceled.can_transition_to(&SubscriptionStatus::Expired));
    }

    #[test]
    fn active_can_fall_past_due_and_recover() {
        assert!(SubscriptionStatus::Active.can_transition_to(&SubscriptionStatus::PastDue));
        assert!(SubscriptionStatus::PastDue.can_transition_to(&SubscriptionStatus::Active));
    }

    #[test]
    fn expired_is_terminal() {
        assert!(SubscriptionStatus::Expired.is_terminal());
        assert!(SubscriptionStatus::Expired
            .transition_to(SubscriptionStatus::Active)
            .is_err());
    }

    #[test]
    fn nothing_returns_to_trialing() {
        for status in SubscriptionStatus::ALL {
            assert!(!status.can_transition_to(&SubscriptionStatus::Trialing));
        }
    }

    #[test]
    fn valid_transitions_are_consistent_with_can_transition_to() {
        for status in SubscriptionStatus::ALL {
            for target in SubscriptionStatus::ALL {
                assert_eq!(
                    status.can_transition_to(&target),
                    status.valid_transitions().contains(&target),
                    "{:?} -> {:?}",
                    status,
                    target
                );
            }
        }
    }

    #[test]
    fn unconditional_entitlement() {
        assert!(SubscriptionStatus::Active.is_unconditionally_entitled());
        assert!(SubscriptionStatus::PastDue.is_unconditionally_entitled());
        assert!(SubscriptionStatus::Trialing.is_unconditionally_entitled());
        assert!(!SubscriptionStatus::Canceled.is_unconditionally_entitled());
        assert!(!SubscriptionStatus::Expired.is_unconditionally_entitled());
    }

    #[test]
    fn text_form_round_trips() {
        for status in SubscriptionStatus::ALL {
            assert_eq!(status.as_str().parse::<SubscriptionStatus>(), Ok(status));
        }
        assert!("CANCELLED".parse::<SubscriptionStatus>().is_err());
    }

    #[test]
    fn serializes_screaming_snake_case() {
        let json = serde_json::to_string(&SubscriptionStatus::PastDue).unwrap();
        assert_eq!(json, "\"PAST_DUE\"");
    }
}
