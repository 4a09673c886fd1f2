//! Data models for expense tracker entities.
//!
//! This module contains the wire records exchanged with the backend:
//!
//! - `Category`: spending categories with an optional display color
//! - `Expense`: individual expenses with filters for the list view
//! - `Budget`: spending limits per category and period
//! - Report types: `SpendingSummary`, `BudgetStatusRow`
//!
//! Backend serializers vary in a few places (bare category ids vs embedded
//! objects, alternate report field names); the tolerance for both shapes
//! lives here, on the models themselves.

pub mod budget;
pub mod category;
pub mod expense;
pub mod report;

pub use budget::{Budget, BudgetPayload};
pub use category::{Category, CategoryPayload};
pub use expense::{CategoryRef, Expense, ExpenseFilters, ExpensePayload};
pub use report::{BudgetStatusRow, SpendingSummary};
