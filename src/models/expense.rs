use serde::{Deserialize, Serialize};

use super::category::Category;

/// Reference to a category on a wire record: a bare id or an embedded
/// object, depending on the backend serializer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(i64),
    Embedded(Category),
}

impl CategoryRef {
    pub fn id(&self) -> i64 {
        match self {
            CategoryRef::Id(id) => *id,
            CategoryRef::Embedded(category) => category.id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            CategoryRef::Id(_) => None,
            CategoryRef::Embedded(category) => Some(&category.name),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub amount: f64,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub category_name: Option<String>,
}

impl Expense {
    /// Date portion of the timestamp, as shown in lists. Timestamps come
    /// back either as plain dates or full datetimes.
    pub fn date_display(&self) -> &str {
        match self.date {
            Some(ref date) => date.get(..10).unwrap_or(date),
            None => "",
        }
    }

    /// Category label, preferring the flat `category_name` field over an
    /// embedded category object.
    pub fn category_display(&self) -> Option<&str> {
        self.category_name
            .as_deref()
            .or_else(|| self.category.as_ref().and_then(CategoryRef::name))
    }
}

/// Body for creating or updating an expense. `category: None` serializes as
/// an explicit null, which is how the backend clears a category on update.
#[derive(Debug, Clone, Serialize)]
pub struct ExpensePayload {
    pub amount: f64,
    pub date: String,
    pub description: String,
    pub category: Option<i64>,
}

/// Query filters for the expense list.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilters {
    /// Free-text search over descriptions.
    pub search: Option<String>,
    /// Restrict to one category.
    pub category: Option<i64>,
    /// Inclusive start date, `YYYY-MM-DD`.
    pub start: Option<String>,
    /// Inclusive end date, `YYYY-MM-DD`.
    pub end: Option<String>,
    /// Page size cap, used by the recent-expenses widget.
    pub limit: Option<u32>,
}

impl ExpenseFilters {
    /// Filters for the most recent `limit` expenses.
    pub fn recent(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Only the set filters become query parameters.
    pub(crate) fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(ref search) = self.search {
            query.push(("search".to_string(), search.clone()));
        }
        if let Some(category) = self.category {
            query.push(("category".to_string(), category.to_string()));
        }
        if let Some(ref start) = self.start {
            query.push(("start".to_string(), start.clone()));
        }
        if let Some(ref end) = self.end {
            query.push(("end".to_string(), end.clone()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        query
    }
}
