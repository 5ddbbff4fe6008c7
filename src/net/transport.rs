//! HTTP transport seam between the API client and the network.
//!
//! SYSTEM CONTEXT
//! ==============
//! `ApiClient` speaks in `HttpRequest`/`HttpResponse` values and never sees
//! reqwest directly, so tests can swap in an in-memory transport.
//!
//! CREDENTIALS
//! ===========
//! The session credential is an opaque cookie. `ReqwestTransport` keeps it in
//! a cookie jar that reqwest consults on every request, and mirrors the jar to
//! an owner-only credential file so the session survives process restarts.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde_json::Value;

use super::error::ApiError;
use crate::config::PortalConfig;
use crate::util::private_file::{remove_if_present, write_private};

// =============================================================================
// REQUEST / RESPONSE
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Delete => Self::DELETE,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute path on the backend origin, e.g. `/api/auth/me`.
    pub path: String,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self { method: Method::Get, path: path.into(), body: None }
    }

    pub fn post(path: impl Into<String>, body: Option<Value>) -> Self {
        Self { method: Method::Post, path: path.into(), body }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self { method: Method::Put, path: path.into(), body: Some(body) }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self { method: Method::Delete, path: path.into(), body: None }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// Parsed JSON body; `Null` when empty or not JSON.
    pub body: Value,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single-attempt request executor.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request. Non-2xx statuses are returned as responses, not
    /// errors; only failures to get a response at all are `Err`.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

// =============================================================================
// REQWEST TRANSPORT
// =============================================================================

pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: reqwest::Url,
    jar: Arc<Jar>,
    credential_path: Option<PathBuf>,
}

impl ReqwestTransport {
    /// Build a transport from typed config, restoring persisted cookies.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails.
    pub fn new(config: &PortalConfig) -> Result<Self, ApiError> {
        Self::build(&config.api_url, config.timeout, Some(config.credential_path()))
    }

    /// Build a transport with an explicit credential file (or none for an
    /// in-memory jar).
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails.
    pub fn build(api_url: &str, timeout: Option<Duration>, credential_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let base_url =
            reqwest::Url::parse(api_url).map_err(|e| ApiError::Transport(format!("invalid base URL {api_url}: {e}")))?;
        let jar = Arc::new(Jar::default());
        if let Some(path) = &credential_path {
            restore_cookies(&jar, &base_url, path);
        }

        let mut builder = reqwest::Client::builder().cookie_provider(Arc::clone(&jar));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { http, base_url, jar, credential_path })
    }

    fn persist_cookies(&self) {
        let Some(path) = &self.credential_path else {
            return;
        };
        let header = self.jar.cookies(&self.base_url);
        if let Err(error) = write_cookie_file(path, header.as_ref()) {
            tracing::warn!(%error, path = %path.display(), "failed to persist session cookies");
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = self
            .base_url
            .join(&request.path)
            .map_err(|e| ApiError::Transport(format!("invalid path {}: {e}", request.path)))?;

        let mut builder = self.http.request(request.method.into(), url).header(CONTENT_TYPE, "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(method = ?request.method, path = %request.path, "sending request");
        let response = builder.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        self.persist_cookies();

        Ok(HttpResponse { status, body: parse_body(&bytes) })
    }
}

/// Decode a response body. Empty and non-JSON bodies become `Null`.
pub(crate) fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes).unwrap_or_else(|error| {
        tracing::debug!(%error, len = bytes.len(), "response body is not JSON");
        Value::Null
    })
}

fn restore_cookies(jar: &Jar, url: &reqwest::Url, path: &Path) {
    let Ok(raw) = std::fs::read_to_string(path) else {
        return;
    };
    for pair in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        jar.add_cookie_str(pair, url);
    }
}

/// Mirror the jar's `Cookie` header to `path`; no cookies removes the file.
fn write_cookie_file(path: &Path, header: Option<&HeaderValue>) -> std::io::Result<()> {
    let value = header.and_then(|h| h.to_str().ok()).unwrap_or_default();
    if value.is_empty() {
        return remove_if_present(path);
    }
    write_private(path, value.as_bytes())
}
