use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single ledger entry.
///
/// `value` is always a positive magnitude; direction is encoded solely by
/// `is_expense`. The id is assigned by the record store on first persistence
/// and stays stable for the record's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque integer key assigned by the record store; `None` only before
    /// first persistence
    pub id: Option<i64>,
    /// Description of the transaction (max 100 characters)
    pub title: String,
    /// Positive amount; never stored negative
    pub value: Decimal,
    /// When the transaction happened (RFC 3339 / UTC)
    pub date: DateTime<Utc>,
    /// true = money out, false = money in
    pub is_expense: bool,
}

impl Transaction {
    /// Effect of this transaction on the balance: `-value` for an expense,
    /// `+value` for income.
    pub fn signed_contribution(&self) -> Decimal {
        if self.is_expense {
            -self.value
        } else {
            self.value
        }
    }
}

/// Request for creating a new transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Description of the transaction (max 100 characters)
    pub title: String,
    /// Positive amount
    pub value: Decimal,
    /// true = money out, false = money in
    pub is_expense: bool,
    /// Optional date override - uses the current time if not provided
    pub date: Option<DateTime<Utc>>,
}

/// Income, expenses and balance over one set of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

/// Classification of a balance for mood display.
///
/// Zero is deliberately its own category rather than being folded into
/// positive or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceMood {
    Positive,
    Zero,
    Negative,
}

/// Configuration for transaction input limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub max_title_length: usize,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_title_length: 100,
            min_amount: Decimal::new(1, 2),
            max_amount: Decimal::from(1_000_000),
        }
    }
}

/// Specific validation errors for transaction input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationError {
    EmptyTitle,
    TitleTooLong(usize),
    AmountNotPositive,
    AmountTooLarge(Decimal),
    MissingId,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyTitle => write!(f, "Title must not be empty"),
            ValidationError::TitleTooLong(len) => {
                write!(f, "Title is {} characters, maximum is 100", len)
            }
            ValidationError::AmountNotPositive => write!(f, "Amount must be greater than zero"),
            ValidationError::AmountTooLarge(max) => {
                write!(f, "Amount exceeds the maximum of {}", max)
            }
            ValidationError::MissingId => write!(f, "Transaction has no id"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// A recurring transaction template.
///
/// Dormant record kind: there is no scheduling engine, only correct
/// derivation of the read-only properties below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringTransaction {
    /// Description of the recurring charge (max 100 characters)
    pub title: String,
    /// Amount of a single installment
    pub value: Decimal,
    /// true = money out, false = money in
    pub is_expense: bool,
    /// Total number of installments
    pub total_installments: u32,
    /// 1-based index of the installment due next
    pub current_installment: u32,
    /// When the series started
    pub start_date: DateTime<Utc>,
    /// Day of month each installment is due (1-31)
    pub payment_day: u32,
    /// When the next installment is due
    pub next_occurrence_date: DateTime<Utc>,
    /// Whether the series is still running
    pub is_active: bool,
}

impl RecurringTransaction {
    /// A series is completed once the next installment index passes the total.
    pub fn is_completed(&self) -> bool {
        self.current_installment > self.total_installments
    }

    /// Sum of all installments over the whole series.
    pub fn total_amount(&self) -> Decimal {
        self.value * Decimal::from(self.total_installments)
    }

    /// Installments still unpaid, counting the current one.
    pub fn remaining_installments(&self) -> u32 {
        if self.is_completed() {
            0
        } else {
            self.total_installments - self.current_installment + 1
        }
    }

    /// Amount still unpaid over the rest of the series.
    pub fn remaining_amount(&self) -> Decimal {
        self.value * Decimal::from(self.remaining_installments())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sample_recurring(current: u32, total: u32) -> RecurringTransaction {
        RecurringTransaction {
            title: "Gym membership".to_string(),
            value: dec!(29.90),
            is_expense: true,
            total_installments: total,
            current_installment: current,
            start_date: Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap(),
            payment_day: 5,
            next_occurrence_date: Utc.with_ymd_and_hms(2024, 2, 5, 12, 0, 0).unwrap(),
            is_active: true,
        }
    }

    #[test]
    fn test_signed_contribution() {
        let mut tx = Transaction {
            id: Some(1),
            title: "Salary".to_string(),
            value: dec!(4500.00),
            date: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            is_expense: false,
        };
        assert_eq!(tx.signed_contribution(), dec!(4500.00));

        tx.is_expense = true;
        assert_eq!(tx.signed_contribution(), dec!(-4500.00));
        // The stored value itself stays positive
        assert_eq!(tx.value, dec!(4500.00));
    }

    #[test]
    fn test_ledger_config_defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.max_title_length, 100);
        assert_eq!(config.min_amount, dec!(0.01));
        assert_eq!(config.max_amount, dec!(1000000));
    }

    #[test]
    fn test_validation_error_display() {
        assert_eq!(
            ValidationError::EmptyTitle.to_string(),
            "Title must not be empty"
        );
        assert_eq!(
            ValidationError::TitleTooLong(140).to_string(),
            "Title is 140 characters, maximum is 100"
        );
        assert_eq!(
            ValidationError::AmountTooLarge(dec!(1000000)).to_string(),
            "Amount exceeds the maximum of 1000000"
        );
    }

    #[test]
    fn test_recurring_in_progress() {
        let recurring = sample_recurring(3, 12);
        assert!(!recurring.is_completed());
        assert_eq!(recurring.remaining_installments(), 10);
        assert_eq!(recurring.total_amount(), dec!(358.80));
        assert_eq!(recurring.remaining_amount(), dec!(299.00));
    }

    #[test]
    fn test_recurring_on_last_installment() {
        let recurring = sample_recurring(12, 12);
        assert!(!recurring.is_completed());
        assert_eq!(recurring.remaining_installments(), 1);
        assert_eq!(recurring.remaining_amount(), dec!(29.90));
    }

    #[test]
    fn test_recurring_completed() {
        let recurring = sample_recurring(13, 12);
        assert!(recurring.is_completed());
        assert_eq!(recurring.remaining_installments(), 0);
        assert_eq!(recurring.remaining_amount(), dec!(0));
        // Total amount is independent of progress
        assert_eq!(recurring.total_amount(), dec!(358.80));
    }

    #[test]
    fn test_transaction_serde_round_trip() {
        let tx = Transaction {
            id: Some(7),
            title: "Groceries".to_string(),
            value: dec!(125.50),
            date: Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 0).unwrap(),
            is_expense: true,
        };
        let json = serde_json::to_string(&tx).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tx);
    }
}
