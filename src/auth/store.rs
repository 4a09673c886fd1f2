//! Durable persistence for the access/refresh credential pair.
//!
//! Tokens are opaque strings at this layer. They live under two dedicated
//! keys (one file per key) in a caller-supplied directory, so unrelated
//! application data can never collide with them.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

/// Key the access token is stored under
const ACCESS_TOKEN_KEY: &str = "access_token";

/// Key the refresh token is stored under
const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// The credential pair held for the current session.
///
/// An absent access token means the session is unauthenticated, regardless
/// of whether a refresh token is still present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenPair {
    pub access: Option<String>,
    pub refresh: Option<String>,
}

impl TokenPair {
    pub fn has_access(&self) -> bool {
        self.access.is_some()
    }
}

/// On-disk store for the credential pair.
///
/// Pure storage: no token validation, no decoding, no side effects beyond
/// the two files it owns.
pub struct TokenStore {
    dir: PathBuf,
}

impl TokenStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Write the provided fields only. A `None` field leaves the stored
    /// value untouched, so a refresh that rotates just the access token
    /// keeps the stored refresh token intact.
    pub fn save(&self, pair: &TokenPair) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create token directory {}", self.dir.display()))?;
        if let Some(ref access) = pair.access {
            self.write_key(ACCESS_TOKEN_KEY, access)?;
        }
        if let Some(ref refresh) = pair.refresh {
            self.write_key(REFRESH_TOKEN_KEY, refresh)?;
        }
        Ok(())
    }

    /// Read both keys. Never fails: an unreadable, absent, or empty key is
    /// an absent field.
    pub fn load(&self) -> TokenPair {
        TokenPair {
            access: self.read_key(ACCESS_TOKEN_KEY),
            refresh: self.read_key(REFRESH_TOKEN_KEY),
        }
    }

    /// Remove both keys. Idempotent; failures are logged rather than
    /// surfaced so logout can never fail.
    pub fn clear(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Err(e) = std::fs::remove_file(self.dir.join(key)) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(key, error = %e, "Failed to remove stored token");
                }
            }
        }
    }

    fn write_key(&self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.dir.join(key), value)
            .with_context(|| format!("Failed to write {} to token store", key))
    }

    fn read_key(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.dir.join(key))
            .ok()
            .filter(|contents| !contents.is_empty())
    }
}
