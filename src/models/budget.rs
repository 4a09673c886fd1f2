use serde::{Deserialize, Serialize};

use super::expense::CategoryRef;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub amount: f64,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub category_name: Option<String>,
}

impl Budget {
    /// Category label; a budget with no category applies to all spending.
    pub fn category_display(&self) -> &str {
        self.category_name
            .as_deref()
            .or_else(|| self.category.as_ref().and_then(CategoryRef::name))
            .unwrap_or("All")
    }
}

/// Body for creating or updating a budget. An unset category makes the
/// budget apply to all spending.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetPayload {
    pub category: Option<i64>,
    pub amount: f64,
    pub period: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
