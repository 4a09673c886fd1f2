//! Client library for the Expense Tracker REST backend.
//!
//! This crate provides everything a UI shell needs to run authenticated
//! expense-tracking screens against the backend:
//!
//! - [`auth::TokenStore`]: durable access/refresh token persistence
//! - [`auth::SessionManager`]: login/logout lifecycle, session claims, and
//!   navigation signals
//! - [`api::ApiClient`]: HTTP transport with transparent, single-flight
//!   token refresh on expired credentials
//! - [`routes::guard_route`]: access gating for protected routes
//! - [`models`]: category, expense, budget, and report records
//!
//! The rendering layer lives elsewhere; it consumes the session state
//! published here and the plain CRUD calls on [`api::ApiClient`].

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod routes;

pub use api::{ApiClient, ApiError};
pub use auth::{Navigation, SessionClaims, SessionManager, SessionState, TokenPair, TokenStore};
pub use config::Config;
pub use routes::{guard_route, RouteAccess};
