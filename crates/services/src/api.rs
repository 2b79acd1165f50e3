use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::TransportError;

/// Endpoint paths of the scoring backend.
pub mod paths {
    pub const TESTS: &str = "/api/tests";
    pub const ANALYTICS_SUMMARY: &str = "/api/analytics/summary";
    pub const ANALYTICS_FUNNEL: &str = "/api/analytics/funnel";
    pub const ANALYTICS_PROFILES: &str = "/api/analytics/profiles";
    pub const ANALYTICS_DROPOFF: &str = "/api/analytics/dropoff";

    pub const IQ_START: &str = "/api/iq/start";
    pub const IQ_ANSWER: &str = "/api/iq/answer";
    pub const IQ_FINISH: &str = "/api/iq/finish";

    pub const MIXED_START: &str = "/api/mixed/start";
    pub const MIXED_ANSWER: &str = "/api/mixed/answer";
    pub const MIXED_FINISH: &str = "/api/mixed/finish";

    pub const STROOP_START: &str = "/api/stroop/start";
    pub const STROOP_ANSWER: &str = "/api/stroop/answer";
    pub const STROOP_FINISH: &str = "/api/stroop/finish";

    #[must_use]
    pub fn iq_start(block_size: u8) -> String {
        format!("{IQ_START}?block_size={block_size}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A single JSON request against the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Sends requests and hands back the decoded JSON body.
#[async_trait]
pub trait JsonTransport: Send + Sync {
    /// Send `request` and return the response body.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` on network failure, non-success status, or a
    /// body that is not JSON.
    async fn send(&self, request: &ApiRequest) -> Result<Value, TransportError>;
}

/// `reqwest`-backed transport resolving paths against the configured base URL.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    config: ApiConfig,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns `TransportError::Http` if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl JsonTransport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<Value, TransportError> {
        let url = self
            .config
            .base_url
            .join(&request.path)
            .map_err(|source| TransportError::InvalidPath {
                path: request.path.clone(),
                source,
            })?;

        let builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder.send().await?;
        if !response.status().is_success() {
            return Err(TransportError::HttpStatus(response.status()));
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|err| TransportError::Malformed(err.to_string()))
    }
}

/// Failure-swallowing JSON client used by every page.
///
/// Any transport or decode failure is logged as `fetch_error` and turned into
/// `None`; callers treat `None` as "leave the screen as it is".
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn JsonTransport>,
}

impl ApiClient {
    #[must_use]
    pub fn new(transport: Arc<dyn JsonTransport>) -> Self {
        Self { transport }
    }

    /// Build a client over `reqwest` for the given config.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the HTTP client cannot be built.
    pub fn http(config: ApiConfig) -> Result<Self, TransportError> {
        let transport: Arc<dyn JsonTransport> = Arc::new(HttpTransport::new(config)?);
        Ok(Self::new(transport))
    }

    pub async fn fetch_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Option<T> {
        let value = match self.transport.send(&request).await {
            Ok(value) => value,
            Err(err) => {
                tracing::info!(url = %request.path, error = %err, "fetch_error");
                return None;
            }
        };
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                tracing::info!(url = %request.path, error = %err, "fetch_error");
                None
            }
        }
    }
}
