//! Balance and summary calculations.
//!
//! Pure folds over transaction lists. Everything here runs on exact decimal
//! arithmetic; rounding is a presentation concern and never happens
//! mid-fold.

use rust_decimal::Decimal;
use shared::{BalanceMood, FinancialSummary, Transaction};

/// Sum of signed contributions over `transactions`.
///
/// Associative and commutative: the result does not depend on list order.
pub fn calculate_balance(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .map(Transaction::signed_contribution)
        .sum()
}

/// Total income (inflows only) over `transactions`.
pub fn total_income(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|tx| !tx.is_expense)
        .map(|tx| tx.value)
        .sum()
}

/// Total expenses (outflows only, as a positive magnitude) over `transactions`.
pub fn total_expenses(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|tx| tx.is_expense)
        .map(|tx| tx.value)
        .sum()
}

/// Income, expenses and balance in one pass per component.
///
/// Invariant: `balance == income - expenses`.
pub fn financial_summary(transactions: &[Transaction]) -> FinancialSummary {
    FinancialSummary {
        income: total_income(transactions),
        expenses: total_expenses(transactions),
        balance: calculate_balance(transactions),
    }
}

/// Classify a balance for mood display. Exactly zero is its own category.
pub fn balance_mood(balance: Decimal) -> BalanceMood {
    if balance.is_zero() {
        BalanceMood::Zero
    } else if balance > Decimal::ZERO {
        BalanceMood::Positive
    } else {
        BalanceMood::Negative
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn tx(title: &str, value: Decimal, is_expense: bool, day: u32) -> Transaction {
        Transaction {
            id: None,
            title: title.to_string(),
            value,
            date: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
            is_expense,
        }
    }

    #[test]
    fn test_balance_for_sample_ledger() {
        let transactions = vec![
            tx("Groceries", dec!(125.50), true, 15),
            tx("Salary", dec!(4500.00), false, 1),
        ];
        assert_eq!(calculate_balance(&transactions), dec!(4374.50));
    }

    #[test]
    fn test_summary_invariant_holds() {
        let transactions = vec![
            tx("Salary", dec!(4500.00), false, 1),
            tx("Groceries", dec!(125.50), true, 15),
            tx("Refund", dec!(19.90), false, 16),
            tx("Rent", dec!(900.00), true, 2),
        ];
        let summary = financial_summary(&transactions);
        assert_eq!(summary.income, dec!(4519.90));
        assert_eq!(summary.expenses, dec!(1025.50));
        assert_eq!(summary.balance, summary.income - summary.expenses);
    }

    #[test]
    fn test_summary_of_empty_list() {
        let summary = financial_summary(&[]);
        assert_eq!(summary.income, dec!(0));
        assert_eq!(summary.expenses, dec!(0));
        assert_eq!(summary.balance, dec!(0));
    }

    #[test]
    fn test_balance_is_order_independent() {
        let mut transactions = vec![
            tx("a", dec!(0.10), true, 1),
            tx("b", dec!(0.20), false, 2),
            tx("c", dec!(1234.56), true, 3),
            tx("d", dec!(0.01), false, 4),
        ];
        let forward = calculate_balance(&transactions);
        transactions.reverse();
        assert_eq!(calculate_balance(&transactions), forward);
    }

    #[test]
    fn test_no_float_drift_on_cents() {
        // 0.1 + 0.2 style sums stay exact under decimal arithmetic
        let transactions: Vec<Transaction> = (0..1000u32)
            .map(|i| tx("cent", dec!(0.10), false, 1 + (i % 28)))
            .collect();
        assert_eq!(calculate_balance(&transactions), dec!(100.00));
    }

    #[test]
    fn test_mood_categories() {
        assert_eq!(balance_mood(dec!(12.34)), BalanceMood::Positive);
        assert_eq!(balance_mood(dec!(0)), BalanceMood::Zero);
        assert_eq!(balance_mood(dec!(-0.01)), BalanceMood::Negative);
    }
}
