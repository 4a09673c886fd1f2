//! Authentication module for session and credential management.
//!
//! This module provides:
//! - `TokenStore`: durable persistence of the access/refresh token pair
//! - `SessionClaims`: user-facing metadata decoded from the access token
//! - `SessionManager`: login/logout lifecycle and published session state
//!
//! Tokens persist across restarts until a logout or an unrecoverable
//! refresh failure clears them.

pub mod claims;
pub mod session;
pub mod store;

pub use claims::SessionClaims;
pub use session::{
    Navigation, SessionManager, SessionState, DEFAULT_LANDING_ROUTE, LOGIN_ROUTE,
};
pub use store::{TokenPair, TokenStore};
