//! REST API client module for the expense tracker backend.
//!
//! This module provides the `ApiClient` for authenticating against the
//! backend and for the category, expense, budget, and report operations
//! the UI screens consume.
//!
//! Resource calls carry JWT bearer authentication and transparently
//! recover from an expired access token by refreshing it once.

pub mod client;
pub mod error;
pub mod resources;

pub use client::ApiClient;
pub use error::{ApiError, RefreshError};
