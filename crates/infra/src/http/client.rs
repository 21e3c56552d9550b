use std::time::Duration;

use accountstack_domain::constants::{
    DEFAULT_API_MAX_ATTEMPTS, DEFAULT_API_TIMEOUT_SECS, DEFAULT_RETRY_BACKOFF_MS,
};
use accountstack_domain::AccountStackError;
use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Method, Request, RequestBuilder, Response};
use tracing::debug;

use crate::errors::InfraError;

/// HTTP client with a per-request timeout and optional retry.
///
/// Retries are off unless `max_attempts` is raised above 1. When enabled,
/// only transport failures and 5xx responses are retried, with exponential
/// backoff.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, AccountStackError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    pub const fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Execute an already built request, retrying when configured to.
    ///
    /// Non-2xx responses are returned as `Ok`; classifying them is left to the
    /// caller. A request whose body cannot be cloned is sent exactly once.
    pub async fn execute(&self, request: Request) -> Result<Response, reqwest::Error> {
        let attempts = self.max_attempts.max(1);
        let mut pending = request;
        let mut attempt = 1;

        loop {
            let retry = if attempt < attempts { pending.try_clone() } else { None };
            let method = pending.method().clone();
            let url = pending.url().clone();
            debug!(attempt, %method, %url, "sending HTTP request");

            match self.client.execute(pending).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %method, %url, %status, "received HTTP response");

                    match retry {
                        Some(next) if status.is_server_error() => {
                            self.sleep_with_backoff(attempt).await;
                            pending = next;
                        }
                        _ => return Ok(response),
                    }
                }
                Err(err) => {
                    debug!(attempt, %method, %url, error = %err, "HTTP request failed");

                    match retry {
                        Some(next) if should_retry_error(&err) => {
                            self.sleep_with_backoff(attempt).await;
                            pending = next;
                        }
                        _ => return Err(err),
                    }
                }
            }

            attempt += 1;
        }
    }

    /// Build and execute a request, mapping failures into domain errors.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, AccountStackError> {
        let request = builder.build().map_err(|err| AccountStackError::from(InfraError::from(err)))?;
        self.execute(request).await.map_err(|err| AccountStackError::from(InfraError::from(err)))
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8) as u32;
        let multiplier = 1u32 << shift;
        self.base_backoff.saturating_mul(multiplier)
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
    default_headers: Option<HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            max_attempts: DEFAULT_API_MAX_ATTEMPTS,
            base_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
            user_agent: None,
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient, AccountStackError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| AccountStackError::from(InfraError::from(err)))?;

        Ok(HttpClient {
            client,
            timeout: self.timeout,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
        })
    }
}

fn should_retry_error(err: &reqwest::Error) -> bool {
    if err.is_builder() {
        return false;
    }
    err.is_timeout() || err.is_connect() || err.is_request()
}
