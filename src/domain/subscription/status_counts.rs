//! Per-status aggregation over a set of subscription records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{Subscription, SubscriptionStatus};

/// Count of records per status. Only statuses that occur are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCounts(BTreeMap<SubscriptionStatus, u64>);

impl StatusCounts {
    /// Tally the statuses of the given records.
    pub fn tally<'a>(subscriptions: impl IntoIterator<Item = &'a Subscription>) -> Self {
        subscriptions.into_iter().map(|s| s.status).collect()
    }

    /// Count for one status (zero when absent).
    pub fn get(&self, status: SubscriptionStatus) -> u64 {
        self.0.get(&status).copied().unwrap_or(0)
    }

    /// Sum over all statuses.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Number of distinct statuses present.
    pub fn distinct(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(status, count)` in status order.
    pub fn iter(&self) -> impl Iterator<Item = (SubscriptionStatus, u64)> + '_ {
        self.0.iter().map(|(status, count)| (*status, *count))
    }
}

impl FromIterator<SubscriptionStatus> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = SubscriptionStatus>>(iter: I) -> Self {
        let mut counts = BTreeMap::new();
        for status in iter {
            *counts.entry(status).or_insert(0) += 1;
        }
        Self(counts)
    }
}

impl fmt::Display for StatusCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (status, count)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", status, count)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_gives_empty_counts() {
        let counts = StatusCounts::tally(std::iter::empty());
        assert!(counts.is_empty());
        assert_eq!(counts.total(), 0);
        assert_eq!(counts.to_string(), "{}");
    }

    #[test]
    fn counts_each_status() {
        let counts: StatusCounts = [
            SubscriptionStatus::Canceled,
            SubscriptionStatus::Active,
            SubscriptionStatus::Canceled,
        ]
        .into_iter()
        .collect();

        assert_eq!(counts.get(SubscriptionStatus::Canceled), 2);
        assert_eq!(counts.get(SubscriptionStatus::Active), 1);
        assert_eq!(counts.get(SubscriptionStatus::Expired), 0);
        assert_eq!(counts.distinct(), 2);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn displays_in_status_order() {
        let counts: StatusCounts = [SubscriptionStatus::Canceled, SubscriptionStatus::Active]
            .into_iter()
            .collect();
        assert_eq!(counts.to_string(), "{ACTIVE: 1, CANCELED: 1}");
    }

    #[test]
    fn serializes_as_status_map() {
        let counts: StatusCounts = [SubscriptionStatus::PastDue].into_iter().collect();
        assert_eq!(serde_json::to_string(&counts).unwrap(), r#"{"PAST_DUE":1}"#);
    }
}
