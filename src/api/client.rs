//! The authenticated request pipeline for the ClassHub API.
//!
//! Every call that needs a credential flows through `ApiClient::request`,
//! so credential attachment, failure interpretation, and session teardown
//! are defined exactly once. The pipeline never fails: each call resolves
//! to an `ApiResponse` and callers branch on its `ok` flag and status.

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::auth::SessionStore;
use crate::config::Config;

use super::response::{ApiResponse, ResponseBody};
use super::transport::{HttpTransport, Transport};
use super::ApiError;

/// Host-supplied reaction to session invalidation, typically bound to a hard
/// navigation to the login path. Fired after the store has been cleared.
type SessionInvalidatedHook = Arc<dyn Fn() + Send + Sync>;

/// Request configuration accepted by the pipeline.
///
/// Headers may be left empty; the pipeline fills in the bearer header from
/// the session store and never touches any other caller-set header.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            ..Self::default()
        }
    }

    pub fn post_json<T: Serialize>(payload: &T) -> Result<Self> {
        Self::with_json_body(Method::POST, payload)
    }

    pub fn put_json<T: Serialize>(payload: &T) -> Result<Self> {
        Self::with_json_body(Method::PUT, payload)
    }

    fn with_json_body<T: Serialize>(method: Method, payload: &T) -> Result<Self> {
        let body = serde_json::to_string(payload).context("Failed to serialize request body")?;
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Ok(Self {
            method,
            headers,
            body: Some(body),
        })
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Registration payload for `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    /// "STUDENT" or "TEACHER"; the backend defaults anything else to STUDENT.
    pub role: String,
    pub bio: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// API client for the ClassHub backend.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: SessionStore,
    on_session_invalidated: Option<SessionInvalidatedHook>,
}

impl ApiClient {
    /// Create a client over the real HTTP transport.
    pub fn new(config: &Config, session: SessionStore) -> Result<Self> {
        let transport =
            HttpTransport::new(config.base_url.clone()).context("Failed to build HTTP client")?;
        Ok(Self::with_transport(Arc::new(transport), session))
    }

    /// Create a client over an injected transport (tests, alternative I/O).
    pub fn with_transport(transport: Arc<dyn Transport>, session: SessionStore) -> Self {
        Self {
            transport,
            session,
            on_session_invalidated: None,
        }
    }

    /// Bind the host's reaction to session invalidation (e.g. a hard
    /// navigation to the login page).
    pub fn on_session_invalidated(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_session_invalidated = Some(Arc::new(hook));
        self
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Issue an authenticated request and normalize its outcome.
    ///
    /// This call always resolves; transport failures, auth rejections, and
    /// malformed payloads are all converted into the returned value. Only
    /// the 401 path has a side effect beyond the return value: the session
    /// is cleared and the invalidation hook fires.
    pub async fn request(&self, target: &str, options: RequestOptions) -> ApiResponse {
        let mut options = options;

        // Credential read happens at send time; a logout racing with an
        // in-flight call is accepted and not synchronized.
        if let Some(token) = self.session.get() {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    options.headers.insert(header::AUTHORIZATION, value);
                }
                // Send without the header and let the backend answer 401.
                Err(e) => {
                    warn!(error = %e, "Stored credential is not a valid header value, skipping")
                }
            }
        }

        debug!(path = target, method = %options.method, "Dispatching request");

        let response = match self.transport.perform(target, &options).await {
            Ok(response) => response,
            Err(e) => {
                warn!(path = target, error = %e, "Transport failure");
                return ApiResponse::failure(0, ApiError::Network(e));
            }
        };

        if response.status == StatusCode::UNAUTHORIZED.as_u16() {
            self.invalidate_session();
            return ApiResponse::failure(response.status, ApiError::Unauthorized);
        }

        if response.status == StatusCode::INTERNAL_SERVER_ERROR.as_u16() {
            // The body is logged for diagnostics but never surfaced.
            error!(path = target, "Server error");
            debug!(path = target, body = %response.body, "Server error response body");
            return ApiResponse::failure(response.status, ApiError::Server);
        }

        if response.is_json() {
            // Raw-text emptiness check, not parsed-value falsiness: bodies
            // like `0` or `false` are valid JSON and parse below.
            if response.body.is_empty() {
                return ApiResponse::failure(response.status, ApiError::EmptyResponse);
            }
            return match serde_json::from_str::<Value>(&response.body) {
                Ok(value) => ApiResponse::success(
                    response.status,
                    response.status_text,
                    ResponseBody::Json(value),
                ),
                Err(e) => {
                    warn!(path = target, error = %e, "Invalid JSON response");
                    ApiResponse::failure(response.status, ApiError::InvalidResponse(e.to_string()))
                }
            };
        }

        if response.is_success() {
            // Covers endpoints returning plain text, such as the bare
            // credential string from the login endpoint.
            return ApiResponse::success(
                response.status,
                response.status_text,
                ResponseBody::Text(response.body),
            );
        }

        // Anything else passes through for the caller to inspect.
        ApiResponse {
            ok: false,
            status: response.status,
            status_text: response.status_text,
            body: ResponseBody::Text(response.body),
            error: None,
        }
    }

    fn invalidate_session(&self) {
        warn!("Received 401, clearing session");
        self.session.clear();
        if let Some(ref hook) = self.on_session_invalidated {
            hook();
        }
    }

    // ===== Auth flows =====

    /// Log in and store the returned credential on success.
    /// The backend replies with the bare token as plain text.
    pub async fn login(&self, email: &str, password: &str) -> Result<ApiResponse> {
        let options = RequestOptions::post_json(&LoginRequest { email, password })?;
        let response = self.request("/auth/login", options).await;

        if response.ok {
            if let ResponseBody::Text(ref token) = response.body {
                self.session.set(token)?;
                debug!("Login succeeded, credential stored");
            }
        }
        Ok(response)
    }

    /// Register a new account. Does not store anything; the caller logs in
    /// afterwards. The backend replies 201 with a plain-text message, or
    /// 400/409 with the reason.
    pub async fn register(&self, registration: &Registration) -> Result<ApiResponse> {
        let options = RequestOptions::post_json(registration)?;
        Ok(self.request("/auth/register", options).await)
    }

    /// Drop the current credential.
    pub fn logout(&self) {
        self.session.clear();
    }

    /// Unauthenticated liveness probe.
    pub async fn health(&self) -> ApiResponse {
        self.request("/auth/health", RequestOptions::get()).await
    }
}

// ============================================================================
// Tests
// ============================================================================
