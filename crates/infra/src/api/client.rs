//! API client built on a middleware chain
//!
//! Provides the HTTP plumbing shared by every typed operation: base URL
//! resolution, default headers, the middleware chain, and unwrapping of the
//! `{ "data": ... }` response envelope.

use std::sync::Arc;

use accountstack_core::TokenStore;
use accountstack_domain::constants::AUTH_TOKEN_KEY;
use accountstack_domain::{api_base_path, detect_base_path, ApiConfig, ApiResponse};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use super::auth::InMemoryTokenStore;
use super::errors::ApiError;
use super::middleware::{
    log_api_error, AuthTokenMiddleware, ErrorLoggingMiddleware, Middleware, Next,
};
use crate::http::HttpClient;

/// API client for the AccountStack REST API
pub struct ApiClient {
    http: HttpClient,
    base_url: String,
    stages: Vec<Arc<dyn Middleware>>,
}

impl ApiClient {
    /// Create a client with the default middleware chain.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the base URL cannot be resolved or the
    /// HTTP client cannot be built.
    pub fn new(config: &ApiConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        Self::builder().config(config.clone()).token_store(tokens).build()
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Resolved base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve the API base URL for a configuration.
    ///
    /// An explicit `base_url` wins; a relative one such as `/api` is joined
    /// to `origin`. Otherwise the API path for the deployment base path of
    /// `page_path` is joined to `origin`, e.g.
    /// `http://host/CB-AccountStack/account-stack-dev/api`.
    pub fn resolve_base_url(config: &ApiConfig) -> Result<String, ApiError> {
        let explicit = config.base_url.as_deref().map(str::trim).filter(|url| !url.is_empty());
        let api_path = match explicit {
            Some(base_url) => match Url::parse(base_url) {
                Ok(_) => return Ok(base_url.trim_end_matches('/').to_string()),
                Err(url::ParseError::RelativeUrlWithoutBase) => base_url.to_string(),
                Err(err) => {
                    return Err(ApiError::Config(format!("invalid base URL '{base_url}': {err}")))
                }
            },
            None => api_base_path(&detect_base_path(&config.page_path)),
        };

        let origin = Url::parse(&config.origin)
            .map_err(|err| ApiError::Config(format!("invalid origin '{}': {err}", config.origin)))?;
        let resolved = origin
            .join(&api_path)
            .map_err(|err| ApiError::Config(format!("cannot join '{api_path}' to origin: {err}")))?;

        Ok(resolved.as_str().trim_end_matches('/').to_string())
    }

    /// Execute a GET request and unwrap the envelope
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let builder = self.http.request(Method::GET, self.url(path));
        self.fetch(builder).await
    }

    /// Execute a GET request with query parameters and unwrap the envelope
    ///
    /// Only the fields present in `query` are sent.
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get_with_query<Q, T>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.http.request(Method::GET, self.url(path)).query(query);
        self.fetch(builder).await
    }

    /// Execute a POST request with a JSON body and unwrap the envelope
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.http.request(Method::POST, self.url(path)).json(body);
        self.fetch(builder).await
    }

    /// Execute a PUT request with a JSON body and unwrap the envelope
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.http.request(Method::PUT, self.url(path)).json(body);
        self.fetch(builder).await
    }

    /// Execute a request without a body whose response body is not needed
    #[instrument(skip(self), fields(method = %method, path = %path))]
    pub async fn send_empty(&self, method: Method, path: &str) -> Result<(), ApiError> {
        let builder = self.http.request(method, self.url(path));
        self.dispatch(builder).await?;
        Ok(())
    }

    /// Execute a DELETE request
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send_empty(Method::DELETE, path).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.dispatch(builder).await?;
        self.read_envelope(response).await
    }

    async fn dispatch(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let request = builder
            .build()
            .map_err(|err| reject(ApiError::Request(format!("failed to build request: {err}"))))?;
        debug!(method = %request.method(), url = %request.url(), "API request");

        Next::new(&self.http, &self.stages).run(request).await
    }

    async fn read_envelope<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let url = response.url().to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| reject(ApiError::from_transport(&err, self.http.timeout())))?;

        serde_json::from_slice::<ApiResponse<T>>(&bytes)
            .map(ApiResponse::into_data)
            .map_err(|err| reject(ApiError::InvalidEnvelope { url, message: err.to_string() }))
    }
}

/// Log a failure raised outside the middleware chain and hand it back.
pub(crate) fn reject(err: ApiError) -> ApiError {
    log_api_error(&err);
    err
}

/// Builder for [`ApiClient`]
pub struct ApiClientBuilder {
    config: ApiConfig,
    tokens: Option<Arc<dyn TokenStore>>,
    token_key: String,
    extra_stages: Vec<Arc<dyn Middleware>>,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            config: ApiConfig::default(),
            tokens: None,
            token_key: AUTH_TOKEN_KEY.to_string(),
            extra_stages: Vec::new(),
        }
    }
}

impl ApiClientBuilder {
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the base URL, skipping base path detection.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    /// Token store consulted for the bearer token. Defaults to an empty
    /// in-memory store.
    pub fn token_store(mut self, tokens: Arc<dyn TokenStore>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Append a stage after the default ones, closest to the transport.
    pub fn middleware(mut self, stage: Arc<dyn Middleware>) -> Self {
        self.extra_stages.push(stage);
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let base_url = ApiClient::resolve_base_url(&self.config)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut http = HttpClient::builder()
            .timeout(self.config.timeout())
            .max_attempts(self.config.max_attempts)
            .base_backoff(self.config.retry_backoff())
            .default_headers(headers);
        if let Some(agent) = &self.config.user_agent {
            http = http.user_agent(agent.clone());
        }
        let http = http
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HttpClient: {err}")))?;

        let tokens = self.tokens.unwrap_or_else(|| Arc::new(InMemoryTokenStore::new()));
        let mut stages: Vec<Arc<dyn Middleware>> = Vec::with_capacity(2 + self.extra_stages.len());
        stages.push(Arc::new(ErrorLoggingMiddleware));
        stages.push(Arc::new(AuthTokenMiddleware::new(tokens, self.token_key)));
        stages.extend(self.extra_stages);

        debug!(base_url = %base_url, stages = stages.len(), "API client configured");
        Ok(ApiClient { http, base_url, stages })
    }
}
