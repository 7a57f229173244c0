/// Answer service HTTP client implementation.
///
/// This module provides `AiServiceClient` for making synchronous requests to the
/// answer service, along with its error type and builder.
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{
    ConfigError, ServiceConfig, base_url_from_env, connect_timeout_from_env, ensure_nonzero,
    normalize_base_url, timeout_from_env,
};
use crate::models::{Answer, AnswerOutcome, FallbackAnswer, Query};

/// Errors that can occur when talking to the answer service.
#[derive(Debug, Error)]
pub enum AiServiceError {
    /// Network-related errors (connection refused, DNS resolution, body read, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Connect or request timeout
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// HTTP errors with status code (health probe only)
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// Response body was not valid JSON
    #[error("Invalid JSON in response: {0}")]
    Parse(#[source] serde_json::Error),

    /// Response body was JSON but not an object
    #[error("Unexpected response shape: expected a JSON object, got {kind}")]
    UnexpectedShape { kind: &'static str },

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration could not be resolved from the environment
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Builder for constructing `AiServiceClient` instances.
///
/// # Examples
///
/// ```
/// use storeqa::ai_service::AiServiceClientBuilder;
///
/// let client = AiServiceClientBuilder::new()
///     .base_url("http://localhost:8000")
///     .build()
///     .expect("Failed to create client");
/// ```
#[derive(Debug, Default)]
pub struct AiServiceClientBuilder {
    config: Option<ServiceConfig>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl AiServiceClientBuilder {
    /// Creates a new `AiServiceClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a fully resolved configuration instead of reading the environment.
    ///
    /// Individual setters still take precedence over the values in `config`.
    pub fn config(mut self, config: ServiceConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the base URL of the answer service (e.g., "http://127.0.0.1:8000").
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the overall request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Builds the `AiServiceClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// Each setting is resolved on its own: an explicit setter wins, then the
    /// value from `config()`, then its environment variable (`STOREQA_AI_URL`,
    /// `STOREQA_AI_TIMEOUT_SECS`, `STOREQA_AI_CONNECT_TIMEOUT_SECS`), then the
    /// default. A variable is only read when nothing above it supplied the value.
    ///
    /// # Errors
    ///
    /// Returns `AiServiceError::InvalidUrl` if the URL does not parse or is not
    /// http(s), and `AiServiceError::Config` if a timeout is zero or a consulted
    /// environment variable is malformed.
    pub fn build(self) -> Result<AiServiceClient, AiServiceError> {
        let Self {
            config,
            base_url,
            timeout,
            connect_timeout,
        } = self;

        let configured = config.as_ref();

        let base_url = match base_url.or_else(|| configured.map(|c| c.base_url.clone())) {
            Some(url) => normalize_base_url(&url),
            None => base_url_from_env(),
        };
        let timeout = match timeout.or(configured.map(|c| c.timeout)) {
            Some(timeout) => timeout,
            None => timeout_from_env()?,
        };
        let connect_timeout = match connect_timeout.or(configured.map(|c| c.connect_timeout)) {
            Some(timeout) => timeout,
            None => connect_timeout_from_env()?,
        };

        let timeout = ensure_nonzero("timeout", timeout)?;
        let connect_timeout = ensure_nonzero("connect timeout", connect_timeout)?;

        // Validate URL
        let parsed = reqwest::Url::parse(&base_url)
            .map_err(|e| AiServiceError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AiServiceError::InvalidUrl(format!(
                "{}: unsupported scheme '{}'",
                base_url,
                parsed.scheme()
            )));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(AiServiceError::Network)?;

        Ok(AiServiceClient {
            client,
            ask_url: format!("{}/ask", base_url),
            base_url,
            timeout,
            connect_timeout,
        })
    }
}

/// Synchronous HTTP client for the answer service.
///
/// Each call performs exactly one request. Nothing is cached or retried, and
/// the client holds only immutable settings, so it can be shared freely.
pub struct AiServiceClient {
    client: reqwest::blocking::Client,
    base_url: String,
    ask_url: String,
    timeout: Duration,
    connect_timeout: Duration,
}

/// Trait for anything that can answer a store question.
///
/// Implementations must always return an outcome; failures are reported
/// in-band as a [`FallbackAnswer`]. This also lets handlers be tested with
/// mock clients.
pub trait AnswerClient: Send + Sync {
    /// Asks `question` about `store_id`.
    ///
    /// Inputs are forwarded exactly as given; callers are responsible for
    /// rejecting blank values beforehand.
    fn ask(&self, store_id: &str, question: &str) -> AnswerOutcome;
}

impl AiServiceClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the full URL questions are posted to.
    pub fn ask_url(&self) -> &str {
        &self.ask_url
    }

    /// Returns the overall request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the connect timeout.
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Posts the question and returns the service's answer or the typed failure.
    ///
    /// The response status is not inspected: any response whose body is a
    /// JSON object is an answer, including 4xx/5xx responses.
    pub fn try_ask(&self, store_id: &str, question: &str) -> Result<Answer, AiServiceError> {
        let query = Query::new(store_id, question);
        debug!(url = %self.ask_url, store_id, "posting question to answer service");

        let response = self
            .client
            .post(&self.ask_url)
            .json(&query)
            .send()
            .map_err(transport_error)?;

        debug!(status = response.status().as_u16(), "answer service responded");

        let body = response.text().map_err(transport_error)?;
        parse_answer(&body)
    }

    /// Probes the service's `/health` endpoint.
    ///
    /// Unlike [`try_ask`](Self::try_ask), a non-success status is an error here.
    pub fn health(&self) -> Result<Value, AiServiceError> {
        let url = format!("{}/health", self.base_url);

        let response = self.client.get(&url).send().map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AiServiceError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(transport_error)?;
        serde_json::from_str(&body).map_err(AiServiceError::Parse)
    }
}

impl AnswerClient for AiServiceClient {
    fn ask(&self, store_id: &str, question: &str) -> AnswerOutcome {
        match self.try_ask(store_id, question) {
            Ok(answer) => AnswerOutcome::Answered(answer),
            Err(e) => {
                warn!(error = %e, store_id, "answer service exchange failed, using fallback");
                AnswerOutcome::Fallback(FallbackAnswer::from_error(&e))
            }
        }
    }
}

/// Parses a response body into an [`Answer`].
///
/// Only a JSON object qualifies; other valid JSON values are rejected.
pub fn parse_answer(body: &str) -> Result<Answer, AiServiceError> {
    match serde_json::from_str::<Value>(body).map_err(AiServiceError::Parse)? {
        Value::Object(fields) => Ok(Answer::new(fields)),
        other => Err(AiServiceError::UnexpectedShape {
            kind: json_kind(&other),
        }),
    }
}

fn transport_error(error: reqwest::Error) -> AiServiceError {
    if error.is_timeout() {
        AiServiceError::Timeout(error)
    } else {
        AiServiceError::Network(error)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
