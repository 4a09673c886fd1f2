//! HTTP client for the Expense Tracker REST API.
//!
//! This module provides the `ApiClient` struct: the transport layer under
//! every backend call. It owns the token endpoints (login and refresh) and
//! the response interceptor that recovers from an expired access token by
//! refreshing it and replaying the failed request exactly once.
//!
//! Concurrent requests that hit a 401 at the same time share a single
//! in-flight refresh call rather than each issuing their own.

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::{header, Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::{TokenPair, TokenStore};

use super::error::{extract_detail, ApiError, RefreshError};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Login endpoint path, relative to the configured base URL.
const LOGIN_PATH: &str = "/auth/token/";

/// Token refresh endpoint path.
const REFRESH_PATH: &str = "/auth/token/refresh/";

/// Fallback message when login fails without a server-supplied detail.
const GENERIC_LOGIN_ERROR: &str = "Invalid credentials or server error.";

// ============================================================================
// Wire shapes
// ============================================================================

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

/// Response shape of both token endpoints. Backends disagree on field
/// naming (`access` vs `access_token`), so both spellings normalize here
/// and nowhere else.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default, alias = "access_token")]
    access: Option<String>,
    #[serde(default, alias = "refresh_token")]
    refresh: Option<String>,
}

impl TokenResponse {
    fn into_pair(self) -> TokenPair {
        TokenPair {
            access: self.access,
            refresh: self.refresh,
        }
    }
}

// ============================================================================
// Request plumbing
// ============================================================================

/// A resource request in replayable form. The interceptor may need to send
/// it twice (the original attempt plus one post-refresh replay), so the
/// body is held as a JSON value rather than a consumed builder.
#[derive(Debug, Clone)]
pub(crate) struct RequestSpec {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    headers: header::HeaderMap,
}

impl RequestSpec {
    pub(crate) fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: header::HeaderMap::new(),
        }
    }

    pub(crate) fn query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub(crate) fn json<B: Serialize>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body).context("Failed to serialize request body")?);
        Ok(self)
    }

    /// Set a header on the request. A caller-set `Authorization` header is
    /// transmitted as-is instead of the stored bearer token.
    #[allow(dead_code)]
    pub(crate) fn header(mut self, name: header::HeaderName, value: header::HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// The in-flight refresh, awaitable from many requests at once.
type SharedRefresh = Shared<BoxFuture<'static, Result<String, RefreshError>>>;

type RefreshSlot = Arc<Mutex<Option<SharedRefresh>>>;

/// Clears the in-flight refresh slot when dropped. It lives inside the
/// refresh future itself, so the slot is released on success, failure, and
/// panic alike.
struct SlotRelease(RefreshSlot);

impl Drop for SlotRelease {
    fn drop(&mut self) {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).take();
    }
}

// ============================================================================
// Client
// ============================================================================

/// API client for the expense tracker backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection
/// pooling, and clones share the token store and refresh state.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<TokenStore>,
    refresh_inflight: RefreshSlot,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, store: Arc<TokenStore>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            client,
            base_url,
            store,
            refresh_inflight: Arc::new(Mutex::new(None)),
        })
    }

    /// The token store backing this client's Authorization headers.
    pub fn token_store(&self) -> &Arc<TokenStore> {
        &self.store
    }

    /// Authenticate against the backend and return the normalized token
    /// pair. The caller decides whether to persist it.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<TokenPair> {
        let url = format!("{}{}", self.base_url, LOGIN_PATH);
        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Login request failed to reach the server");
                ApiError::Authentication(GENERIC_LOGIN_ERROR.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            let message = extract_detail(&body).unwrap_or_else(|| GENERIC_LOGIN_ERROR.to_string());
            return Err(ApiError::Authentication(message).into());
        }

        let tokens: TokenResponse = serde_json::from_str(&body)
            .map_err(|_| ApiError::InvalidResponse("Malformed login response".to_string()))?;
        let pair = tokens.into_pair();
        if !pair.has_access() {
            return Err(ApiError::InvalidResponse(
                "Login response did not include an access token".to_string(),
            )
            .into());
        }
        Ok(pair)
    }

    /// Send a resource request, transparently refreshing the access token
    /// on a 401 and replaying the request once. A second 401 after the
    /// replay ends the session.
    pub(crate) async fn execute(&self, spec: RequestSpec) -> Result<reqwest::Response> {
        let response = self
            .dispatch(&spec, None)
            .await
            .map_err(ApiError::Network)
            .with_context(|| format!("Failed to send {} request to {}", spec.method, spec.path))?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        // One refresh-and-replay per original request. Whether this call
        // started the refresh or joined one already in flight, an error at
        // this point is the refresh outcome, not the original 401.
        debug!(path = %spec.path, "Received 401, refreshing access token");
        let access = self.shared_refresh().await.map_err(ApiError::from)?;

        let replay = self
            .dispatch(&spec, Some(access.as_str()))
            .await
            .map_err(ApiError::Network)
            .with_context(|| format!("Failed to replay {} request to {}", spec.method, spec.path))?;
        if replay.status() == StatusCode::UNAUTHORIZED {
            warn!(path = %spec.path, "Still unauthorized after token refresh, ending session");
            self.store.clear();
            return Err(ApiError::Unauthorized.into());
        }
        Ok(replay)
    }

    /// Build and send a single attempt of `spec`. The stored access token
    /// is attached as a bearer header unless the caller set `Authorization`
    /// explicitly; a replay carries the refreshed token instead.
    async fn dispatch(
        &self,
        spec: &RequestSpec,
        bearer_override: Option<&str>,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let url = format!("{}{}", self.base_url, spec.path);
        let mut request = self.client.request(spec.method.clone(), &url);
        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }
        if let Some(ref body) = spec.body {
            request = request.json(body);
        }
        let explicit_auth = spec.headers.contains_key(header::AUTHORIZATION);
        request = request.headers(spec.headers.clone());

        if let Some(token) = bearer_override {
            request = request.bearer_auth(token);
        } else if !explicit_auth {
            if let Some(token) = self.store.load().access {
                request = request.bearer_auth(token);
            }
        }

        request.send().await
    }

    /// The in-flight refresh future, starting one if none is running. All
    /// concurrent 401 handlers await the same underlying network call.
    fn shared_refresh(&self) -> SharedRefresh {
        let mut slot = self.refresh_inflight.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(inflight) = slot.as_ref() {
            debug!("Joining in-flight token refresh");
            return inflight.clone();
        }

        let client = self.client.clone();
        let base_url = self.base_url.clone();
        let store = Arc::clone(&self.store);
        let release = SlotRelease(Arc::clone(&self.refresh_inflight));
        let refresh = async move {
            let _release = release;
            let result = run_refresh(&client, &base_url, &store).await;
            if result.is_err() {
                // Unrecoverable either way: force the anonymous state
                store.clear();
            }
            result
        }
        .boxed()
        .shared();
        *slot = Some(refresh.clone());
        refresh
    }

    /// Check if a response is successful, mapping failures onto the error
    /// taxonomy with the server-supplied detail when one is present.
    pub(crate) async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    pub(crate) async fn request_json<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T> {
        let path = spec.path.clone();
        let response = self.execute(spec).await?;
        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    pub(crate) async fn request_text(&self, spec: RequestSpec) -> Result<String> {
        let path = spec.path.clone();
        let response = self.execute(spec).await?;
        let response = Self::check_response(response).await?;
        response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", path))
    }

    pub(crate) async fn request_unit(&self, spec: RequestSpec) -> Result<()> {
        let response = self.execute(spec).await?;
        Self::check_response(response).await?;
        Ok(())
    }
}

/// Exchange the stored refresh token for a new access token, persisting the
/// result. The refresh endpoint is called directly so it can never recurse
/// into the 401 interceptor.
async fn run_refresh(
    client: &Client,
    base_url: &str,
    store: &TokenStore,
) -> Result<String, RefreshError> {
    let refresh_token = store.load().refresh.ok_or(RefreshError::MissingToken)?;

    debug!("Refreshing access token");
    let url = format!("{}{}", base_url, REFRESH_PATH);
    let response = client
        .post(&url)
        .json(&RefreshRequest {
            refresh: &refresh_token,
        })
        .send()
        .await
        .map_err(|e| RefreshError::Failed(format!("Refresh request failed: {}", e)))?;

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if !status.is_success() {
        warn!(%status, "Token refresh rejected");
        let detail = extract_detail(&body).unwrap_or_else(|| format!("status {}", status));
        return Err(RefreshError::Failed(detail));
    }

    let tokens: TokenResponse = serde_json::from_str(&body)
        .map_err(|_| RefreshError::Failed("Malformed refresh response".to_string()))?;
    let access = tokens
        .access
        .ok_or_else(|| RefreshError::Failed("Refresh did not return an access token".to_string()))?;

    // Persist the new access token. The refresh token rotates only when the
    // server sent a replacement; a partial save keeps the old one otherwise.
    store
        .save(&TokenPair {
            access: Some(access.clone()),
            refresh: tokens.refresh,
        })
        .map_err(|e| RefreshError::Failed(format!("Failed to persist refreshed tokens: {}", e)))?;

    debug!("Access token refreshed");
    Ok(access)
}
