use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::decimal::Money;

/// unique identifier for a payment trace
pub type TraceId = Uuid;

/// outstanding balance at or below which an installment counts as settled
pub const SETTLEMENT_EPSILON: Money = Money::CENT;

/// installment status, ordered by lifecycle progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    /// nothing paid yet
    Pending,
    /// some paid, balance still open
    Partial,
    /// fully paid (terminal)
    Settled,
}

impl InstallmentStatus {
    /// derive status from balances
    pub fn from_balances(paid: Money, outstanding: Money) -> Self {
        if outstanding <= SETTLEMENT_EPSILON {
            InstallmentStatus::Settled
        } else if paid.is_positive() {
            InstallmentStatus::Partial
        } else {
            InstallmentStatus::Pending
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Partial => "partial",
            Self::Settled => "settled",
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Settled)
    }
}

impl fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_balances() {
        let amount = Money::from_major(100);

        assert_eq!(
            InstallmentStatus::from_balances(Money::ZERO, amount),
            InstallmentStatus::Pending
        );
        assert_eq!(
            InstallmentStatus::from_balances(Money::from_major(40), Money::from_major(60)),
            InstallmentStatus::Partial
        );
        assert_eq!(
            InstallmentStatus::from_balances(amount, Money::ZERO),
            InstallmentStatus::Settled
        );
    }

    #[test]
    fn test_status_within_epsilon_is_settled() {
        // one cent left
        assert_eq!(
            InstallmentStatus::from_balances(Money::from_cents(9999), Money::CENT),
            InstallmentStatus::Settled
        );
        // overpaid
        assert_eq!(
            InstallmentStatus::from_balances(Money::from_major(120), Money::from_major(-20)),
            InstallmentStatus::Settled
        );
        // two cents left
        assert_eq!(
            InstallmentStatus::from_balances(Money::from_cents(9998), Money::from_cents(2)),
            InstallmentStatus::Partial
        );
    }

    #[test]
    fn test_status_order_follows_lifecycle() {
        assert!(InstallmentStatus::Pending < InstallmentStatus::Partial);
        assert!(InstallmentStatus::Partial < InstallmentStatus::Settled);
        assert_eq!(serde_json::to_string(&InstallmentStatus::Partial).unwrap(), "\"partial\"");
    }
}
