//! Session claims decoded from the access token.
//!
//! The access token is a JWT as far as its payload goes, but the claims are
//! purely cosmetic here: they supply a display name and an expiry timestamp
//! for the UI. A token whose payload cannot be decoded is still perfectly
//! valid for authorization; it just carries no displayable identity.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Claim keys checked for a display name, in precedence order.
const DISPLAY_NAME_KEYS: [&str; 3] = ["username", "user", "sub"];

/// User-facing metadata carried in the access token payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionClaims {
    pub display_name: Option<String>,
    /// Expiry as unix seconds, when the token carries an `exp` claim.
    pub expiry: Option<i64>,
}

impl SessionClaims {
    /// Expiry as an instant, when present and representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expiry.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Whether the token's own expiry claim has passed. A token without an
    /// expiry claim is never considered expired here.
    pub fn is_expired(&self) -> bool {
        match self.expires_at() {
            Some(at) => Utc::now() > at,
            None => false,
        }
    }
}

/// Decode the claims from a JWT-shaped access token.
///
/// Returns `None` for anything that does not decode: a token without a
/// payload segment, invalid base64, or a payload that is not JSON.
pub fn decode(token: &str) -> Option<SessionClaims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let value: Value = serde_json::from_slice(&bytes).ok()?;

    let display_name = DISPLAY_NAME_KEYS
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_string);
    let expiry = value.get("exp").and_then(Value::as_i64);

    Some(SessionClaims {
        display_name,
        expiry,
    })
}
