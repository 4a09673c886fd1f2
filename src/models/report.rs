use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Aggregate spending report from `GET /reports/summary`.
///
/// Field names vary between backend versions (`total` vs `total_spent` and
/// so on); both spellings are accepted, and the accessors default missing
/// values to zero.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SpendingSummary {
    #[serde(default, alias = "total_spent")]
    pub total: Option<f64>,
    #[serde(default, alias = "current_month_spent")]
    pub month_spent: Option<f64>,
    #[serde(default, alias = "total_transactions")]
    pub count: Option<u64>,
    #[serde(default, alias = "by_category")]
    pub per_category: BTreeMap<String, f64>,
}

impl SpendingSummary {
    /// Total spent across all time.
    pub fn total_spent(&self) -> f64 {
        self.total.unwrap_or(0.0)
    }

    /// Spent in the current calendar month.
    pub fn spent_this_month(&self) -> f64 {
        self.month_spent.unwrap_or(0.0)
    }

    /// Number of recorded transactions.
    pub fn transaction_count(&self) -> u64 {
        self.count.unwrap_or(0)
    }
}

/// One row of `GET /reports/budget-status`: a budget with its spending to
/// date.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BudgetStatusRow {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, alias = "category")]
    pub category_name: Option<String>,
    #[serde(default, alias = "amount")]
    pub budget_amount: Option<f64>,
    #[serde(default)]
    pub spent: Option<f64>,
}

impl BudgetStatusRow {
    /// Budget label; a row with no category covers all spending.
    pub fn category_display(&self) -> &str {
        self.category_name.as_deref().unwrap_or("All")
    }

    /// Amount left in the budget; negative when overspent.
    pub fn remaining(&self) -> f64 {
        self.budget_amount.unwrap_or(0.0) - self.spent.unwrap_or(0.0)
    }

    pub fn over_budget(&self) -> bool {
        self.remaining() < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_accepts_either_field_spelling() {
        let short: SpendingSummary = serde_json::from_str(
            r#"{"total":100.0,"month_spent":40.0,"count":3,"per_category":{"Food":60.0}}"#,
        )
        .unwrap();
        assert_eq!(short.total_spent(), 100.0);
        assert_eq!(short.spent_this_month(), 40.0);
        assert_eq!(short.transaction_count(), 3);

        let long: SpendingSummary = serde_json::from_str(
            r#"{"total_spent":100.0,"current_month_spent":40.0,"total_transactions":3,"by_category":{"Food":60.0}}"#,
        )
        .unwrap();
        assert_eq!(long.total_spent(), 100.0);
        assert_eq!(long.spent_this_month(), 40.0);
        assert_eq!(long.transaction_count(), 3);
        assert_eq!(long.per_category.get("Food"), Some(&60.0));
    }

    #[test]
    fn test_summary_defaults_missing_fields_to_zero() {
        let summary: SpendingSummary = serde_json::from_str("{}").unwrap();
        assert_eq!(summary.total_spent(), 0.0);
        assert_eq!(summary.spent_this_month(), 0.0);
        assert_eq!(summary.transaction_count(), 0);
        assert!(summary.per_category.is_empty());
    }

    #[test]
    fn test_budget_status_row_remaining() {
        let row: BudgetStatusRow = serde_json::from_str(
            r#"{"id":1,"category_name":"Food","budget_amount":500.0,"spent":350.0}"#,
        )
        .unwrap();
        assert_eq!(row.remaining(), 150.0);
        assert!(!row.over_budget());
        assert_eq!(row.category_display(), "Food");
    }

    #[test]
    fn test_budget_status_row_aliases_and_overspend() {
        let row: BudgetStatusRow =
            serde_json::from_str(r#"{"category":"Transport","amount":100.0,"spent":130.0}"#)
                .unwrap();
        assert_eq!(row.budget_amount, Some(100.0));
        assert_eq!(row.category_display(), "Transport");
        assert_eq!(row.remaining(), -30.0);
        assert!(row.over_budget());
    }

    #[test]
    fn test_budget_status_row_without_category_covers_all() {
        let row: BudgetStatusRow =
            serde_json::from_str(r#"{"amount":100.0,"spent":10.0}"#).unwrap();
        assert_eq!(row.category_display(), "All");
    }
}
