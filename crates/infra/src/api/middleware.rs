//! Request middleware chain
//!
//! Every API request passes through an ordered list of [`Middleware`] stages
//! before reaching the transport. Each stage may adjust the outgoing request,
//! observe the result, or both, and hands control on through [`Next::run`].
//! The innermost step sends the request and turns non-success responses into
//! [`ApiError::Server`].

use std::sync::Arc;

use accountstack_core::TokenStore;
use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Request, Response};
use tracing::{debug, error};

use super::errors::ApiError;
use crate::http::HttpClient;

/// A stage in the request pipeline.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, request: Request, next: Next<'_>) -> Result<Response, ApiError>;
}

/// The remainder of the chain after the current stage.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    http: &'a HttpClient,
    stages: &'a [Arc<dyn Middleware>],
}

impl<'a> Next<'a> {
    pub(crate) fn new(http: &'a HttpClient, stages: &'a [Arc<dyn Middleware>]) -> Self {
        Self { http, stages }
    }

    /// Pass the request to the next stage, or send it when none remain.
    pub async fn run(self, request: Request) -> Result<Response, ApiError> {
        match self.stages.split_first() {
            Some((stage, rest)) => stage.handle(request, Next::new(self.http, rest)).await,
            None => send(self.http, request).await,
        }
    }
}

async fn send(http: &HttpClient, request: Request) -> Result<Response, ApiError> {
    let response = http
        .execute(request)
        .await
        .map_err(|err| ApiError::from_transport(&err, http.timeout()))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Server { status: status.as_u16(), url, body })
}

/// Attaches `Authorization: Bearer <token>` when a token is stored.
///
/// The token is read on every request, so a token saved or cleared after the
/// client was built takes effect immediately. Stores may block (the OS
/// keychain does), so the lookup runs on the blocking pool.
pub struct AuthTokenMiddleware {
    store: Arc<dyn TokenStore>,
    key: String,
}

impl AuthTokenMiddleware {
    pub fn new(store: Arc<dyn TokenStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }
}

#[async_trait]
impl Middleware for AuthTokenMiddleware {
    async fn handle(&self, mut request: Request, next: Next<'_>) -> Result<Response, ApiError> {
        let store = Arc::clone(&self.store);
        let key = self.key.clone();
        let token = tokio::task::spawn_blocking(move || store.token(&key))
            .await
            .map_err(|err| ApiError::Request(format!("token lookup failed: {err}")))?;

        if let Some(token) = token.filter(|token| !token.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|err| ApiError::Request(format!("stored auth token is not a valid header: {err}")))?;
            value.set_sensitive(true);
            request.headers_mut().insert(AUTHORIZATION, value);
        } else {
            debug!(url = %request.url(), "No auth token stored, sending request without credentials");
        }

        next.run(request).await
    }
}

/// Logs every failure of the stages it wraps, then passes the error through
/// unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorLoggingMiddleware;

#[async_trait]
impl Middleware for ErrorLoggingMiddleware {
    async fn handle(&self, request: Request, next: Next<'_>) -> Result<Response, ApiError> {
        let result = next.run(request).await;
        if let Err(err) = &result {
            log_api_error(err);
        }
        result
    }
}

/// Log an API failure according to its category.
pub(crate) fn log_api_error(err: &ApiError) {
    match err {
        ApiError::Server { status, url, body } => {
            error!(status = *status, url = %url, body = %body, "API error response");
        }
        ApiError::InvalidEnvelope { url, message } => {
            error!(url = %url, error = %message, "API response body is not a valid envelope");
        }
        ApiError::Network(_) | ApiError::Timeout(_) => {
            error!(error = %err, "Network error: no response received");
        }
        ApiError::Request(_) | ApiError::Config(_) => {
            error!(error = %err, "Request setup error");
        }
    }
}
