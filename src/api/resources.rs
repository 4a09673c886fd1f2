//! Typed resource operations on the expense tracker API.
//!
//! One method per endpoint the UI screens consume, all flowing through the
//! 401 interceptor in `client`. List endpoints tolerate both response
//! shapes the backend is known to produce: a plain JSON array or a
//! paginated envelope with a `results` field.

use anyhow::Result;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::models::{
    Budget, BudgetPayload, BudgetStatusRow, Category, CategoryPayload, Expense, ExpenseFilters,
    ExpensePayload, SpendingSummary,
};

use super::client::{ApiClient, RequestSpec};

/// Parse a list endpoint body: a plain JSON array or a paginated envelope
/// carrying a `results` field. An unrecognized body on a successful
/// response degrades to an empty list rather than failing the screen that
/// asked for it.
fn parse_list<T: DeserializeOwned>(body: &str, path: &str) -> Vec<T> {
    if let Ok(items) = serde_json::from_str::<Vec<T>>(body) {
        return items;
    }

    #[derive(serde::Deserialize)]
    struct Paginated<T> {
        results: Vec<T>,
    }

    if let Ok(page) = serde_json::from_str::<Paginated<T>>(body) {
        return page.results;
    }

    warn!(path, "Unrecognized list response shape, treating as empty");
    Vec::new()
}

impl ApiClient {
    // ===== Categories =====

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let body = self
            .request_text(RequestSpec::new(Method::GET, "/categories/"))
            .await?;
        Ok(parse_list(&body, "/categories/"))
    }

    pub async fn create_category(&self, payload: &CategoryPayload) -> Result<Category> {
        self.request_json(RequestSpec::new(Method::POST, "/categories/").json(payload)?)
            .await
    }

    pub async fn update_category(&self, id: i64, payload: &CategoryPayload) -> Result<Category> {
        self.request_json(
            RequestSpec::new(Method::PUT, format!("/categories/{}/", id)).json(payload)?,
        )
        .await
    }

    pub async fn delete_category(&self, id: i64) -> Result<()> {
        self.request_unit(RequestSpec::new(Method::DELETE, format!("/categories/{}/", id)))
            .await
    }

    // ===== Expenses =====

    /// Fetch expenses matching the given filters. Unset filters are not
    /// sent, so `ExpenseFilters::default()` lists everything.
    pub async fn list_expenses(&self, filters: &ExpenseFilters) -> Result<Vec<Expense>> {
        let body = self
            .request_text(RequestSpec::new(Method::GET, "/expenses/").query(filters.to_query()))
            .await?;
        Ok(parse_list(&body, "/expenses/"))
    }

    pub async fn create_expense(&self, payload: &ExpensePayload) -> Result<Expense> {
        self.request_json(RequestSpec::new(Method::POST, "/expenses/").json(payload)?)
            .await
    }

    pub async fn update_expense(&self, id: i64, payload: &ExpensePayload) -> Result<Expense> {
        self.request_json(
            RequestSpec::new(Method::PUT, format!("/expenses/{}/", id)).json(payload)?,
        )
        .await
    }

    pub async fn delete_expense(&self, id: i64) -> Result<()> {
        self.request_unit(RequestSpec::new(Method::DELETE, format!("/expenses/{}/", id)))
            .await
    }

    // ===== Budgets =====

    pub async fn list_budgets(&self) -> Result<Vec<Budget>> {
        let body = self
            .request_text(RequestSpec::new(Method::GET, "/budgets/"))
            .await?;
        Ok(parse_list(&body, "/budgets/"))
    }

    pub async fn create_budget(&self, payload: &BudgetPayload) -> Result<Budget> {
        self.request_json(RequestSpec::new(Method::POST, "/budgets/").json(payload)?)
            .await
    }

    pub async fn update_budget(&self, id: i64, payload: &BudgetPayload) -> Result<Budget> {
        self.request_json(
            RequestSpec::new(Method::PUT, format!("/budgets/{}/", id)).json(payload)?,
        )
        .await
    }

    pub async fn delete_budget(&self, id: i64) -> Result<()> {
        self.request_unit(RequestSpec::new(Method::DELETE, format!("/budgets/{}/", id)))
            .await
    }

    // ===== Reports =====

    /// Fetch the aggregate spending summary.
    pub async fn spending_summary(&self) -> Result<SpendingSummary> {
        self.request_json(RequestSpec::new(Method::GET, "/reports/summary"))
            .await
    }

    /// Fetch per-budget spending status rows.
    pub async fn budget_status(&self) -> Result<Vec<BudgetStatusRow>> {
        let body = self
            .request_text(RequestSpec::new(Method::GET, "/reports/budget-status"))
            .await?;
        Ok(parse_list(&body, "/reports/budget-status"))
    }
}
