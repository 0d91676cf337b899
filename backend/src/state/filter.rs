//! Filter pipeline for the transaction history view.
//!
//! A pure function from the full transaction list plus the active criteria
//! to the filtered subset. The pipeline always recomputes from the full
//! base list - never incrementally from a previous result - so a relaxed
//! criterion can never leave stale exclusions behind.

use chrono::NaiveDate;
use shared::Transaction;

/// The filter criteria a user can have active at once.
///
/// Criteria compose by logical AND; an unset criterion passes everything
/// through.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    /// Case-insensitive substring match on the title
    pub search_query: Option<String>,
    /// Inclusive date-range membership, at day granularity
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    /// Exact direction match: `Some(true)` = expenses only
    pub type_filter: Option<bool>,
}

impl FilterCriteria {
    /// Whether any criterion is set. When none is, the display set is the
    /// full list and `filtered` carries no meaning.
    pub fn is_active(&self) -> bool {
        self.search_query.is_some() || self.date_range.is_some() || self.type_filter.is_some()
    }
}

/// Apply `criteria` to `all`, preserving its order.
pub fn apply(all: &[Transaction], criteria: &FilterCriteria) -> Vec<Transaction> {
    let query = criteria
        .search_query
        .as_ref()
        .map(|q| q.to_lowercase());

    all.iter()
        .filter(|tx| match &query {
            Some(q) => tx.title.to_lowercase().contains(q),
            None => true,
        })
        .filter(|tx| match criteria.date_range {
            Some((start, end)) => {
                let day = tx.date.date_naive();
                day >= start && day <= end
            }
            None => true,
        })
        .filter(|tx| match criteria.type_filter {
            Some(is_expense) => tx.is_expense == is_expense,
            None => true,
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn tx(title: &str, day: u32, is_expense: bool) -> Transaction {
        Transaction {
            id: None,
            title: title.to_string(),
            value: dec!(10.00),
            date: Utc.with_ymd_and_hms(2024, 3, day, 14, 30, 0).unwrap(),
            is_expense,
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx("Salário Janeiro", 1, false),
            tx("Groceries", 10, true),
            tx("Bus ticket", 15, true),
            tx("Refund groceries", 20, false),
        ]
    }

    #[test]
    fn test_no_criteria_passes_everything_through() {
        let all = sample();
        let filtered = apply(&all, &FilterCriteria::default());
        assert_eq!(filtered, all);
        assert!(!FilterCriteria::default().is_active());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let all = sample();
        let criteria = FilterCriteria {
            search_query: Some("salário".to_string()),
            ..Default::default()
        };
        let filtered = apply(&all, &criteria);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Salário Janeiro");
    }

    #[test]
    fn test_search_matches_substring_anywhere() {
        let all = sample();
        let criteria = FilterCriteria {
            search_query: Some("GROCERIES".to_string()),
            ..Default::default()
        };
        let filtered = apply(&all, &criteria);
        let titles: Vec<&str> = filtered.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Groceries", "Refund groceries"]);
    }

    #[test]
    fn test_date_range_includes_both_boundaries() {
        let all = sample();
        let criteria = FilterCriteria {
            date_range: Some((
                NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            )),
            ..Default::default()
        };
        let filtered = apply(&all, &criteria);
        // Transactions dated exactly on start and end are both included
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].title, "Groceries");
        assert_eq!(filtered[1].title, "Bus ticket");
    }

    #[test]
    fn test_type_filter_matches_direction_exactly() {
        let all = sample();
        let expenses = apply(
            &all,
            &FilterCriteria {
                type_filter: Some(true),
                ..Default::default()
            },
        );
        assert!(expenses.iter().all(|t| t.is_expense));
        assert_eq!(expenses.len(), 2);

        let income = apply(
            &all,
            &FilterCriteria {
                type_filter: Some(false),
                ..Default::default()
            },
        );
        assert!(income.iter().all(|t| !t.is_expense));
        assert_eq!(income.len(), 2);
    }

    #[test]
    fn test_criteria_compose_by_and() {
        let all = sample();
        let criteria = FilterCriteria {
            search_query: Some("groceries".to_string()),
            date_range: Some((
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            )),
            type_filter: Some(true),
        };
        let filtered = apply(&all, &criteria);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Groceries");
    }

    #[test]
    fn test_recomputation_is_deterministic_and_order_preserving() {
        let all = sample();
        let criteria = FilterCriteria {
            type_filter: Some(true),
            ..Default::default()
        };
        let first = apply(&all, &criteria);
        let second = apply(&all, &criteria);
        assert_eq!(first, second);

        // Relative order of `all` is preserved
        let positions: Vec<usize> = first
            .iter()
            .map(|t| all.iter().position(|a| a.title == t.title).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_base_list_is_never_mutated() {
        let all = sample();
        let copy = all.clone();
        let _ = apply(
            &all,
            &FilterCriteria {
                search_query: Some("bus".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(all, copy);
    }
}
