//! Backend health probing with bounded retries.
//!
//! The first attempt gets a long timeout to absorb a cold start; later
//! attempts use a shorter one. Only transport failures (timeouts, network
//! errors) are retried. Any HTTP response ends the probe.

use std::fmt;
use std::io::Read;
use std::time::Duration;

use serde_json::Value;
use zeroize::Zeroizing;

use crate::core::link::sanitize_url_for_display;
use crate::error::CertLinkError;

/// Maximum health response body size in bytes (1 MB).
const HEALTH_MAX_RESPONSE_SIZE: u64 = 1_048_576;

/// How many times to try and how long to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Timeout for the first attempt.
    pub first_timeout: Duration,
    /// Timeout for every later attempt.
    pub retry_timeout: Duration,
    /// Pause between a failed attempt and the next one.
    pub retry_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            first_timeout: Duration::from_secs(30),
            retry_timeout: Duration::from_secs(15),
            retry_wait: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Timeout for the given 1-based attempt number.
    pub fn timeout_for(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            self.first_timeout
        } else {
            self.retry_timeout
        }
    }
}

/// A response from the health endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed JSON body, if the body was JSON.
    pub body: Option<Value>,
}

/// A failure to obtain any response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request did not complete within its timeout.
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    /// Connection, TLS, or body read failure.
    #[error("network error: {0}")]
    Network(String),
}

/// Performs a single GET against the health endpoint.
pub trait HealthTransport {
    /// Issue one request with the given timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if no HTTP response was obtained.
    fn get(
        &self,
        url: &str,
        bearer: Option<&str>,
        timeout: Duration,
    ) -> Result<ProbeResponse, TransportError>;
}

/// `reqwest` blocking transport.
///
/// Redirects are disabled and the body is read with a size limit.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpTransport;

impl HealthTransport for HttpTransport {
    fn get(
        &self,
        url: &str,
        bearer: Option<&str>,
        timeout: Duration,
    ) -> Result<ProbeResponse, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| TransportError::Network(sanitize_reqwest_error(&e)))?;

        let mut request = client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(timeout)
            } else {
                TransportError::Network(sanitize_reqwest_error(&e))
            }
        })?;

        let status = response.status().as_u16();
        let mut bytes = Vec::new();
        response
            .take(HEALTH_MAX_RESPONSE_SIZE + 1)
            .read_to_end(&mut bytes)
            .map_err(|_| TransportError::Network("failed to read response body".to_string()))?;

        let body = if bytes.len() as u64 > HEALTH_MAX_RESPONSE_SIZE {
            None
        } else {
            serde_json::from_slice(&bytes).ok()
        };

        Ok(ProbeResponse { status, body })
    }
}

/// Map a reqwest error to a short message without URLs or internals.
fn sanitize_reqwest_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        "connection failed".to_string()
    } else if err.is_builder() {
        "failed to build HTTP client".to_string()
    } else if err.is_body() || err.is_decode() {
        "failed to read response body".to_string()
    } else {
        "request failed".to_string()
    }
}

/// What the backend said.
#[derive(Debug, Clone, PartialEq)]
pub enum HealthStatus {
    /// The endpoint answered with a 2xx status.
    Healthy {
        /// HTTP status code.
        status: u16,
        /// Parsed JSON body, if any.
        body: Option<Value>,
    },
    /// The endpoint answered with a non-2xx status.
    Unhealthy {
        /// HTTP status code.
        status: u16,
        /// Parsed JSON body, if any.
        body: Option<Value>,
    },
}

impl HealthStatus {
    /// Whether the backend reported healthy.
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy { .. })
    }
}

/// The outcome of a completed probe.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    /// The sanitized endpoint URL.
    pub url: String,
    /// The backend's answer.
    pub status: HealthStatus,
    /// How many attempts it took to get an answer.
    pub attempts: u32,
}

/// A configured health probe against one endpoint.
pub struct HealthProbe<T = HttpTransport> {
    url: String,
    display_url: String,
    bearer: Option<Zeroizing<String>>,
    policy: RetryPolicy,
    transport: T,
}

impl HealthProbe<HttpTransport> {
    /// Probe `url` over HTTP with the default retry policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not a valid `http` or `https` URL.
    pub fn new(url: &str) -> Result<Self, CertLinkError> {
        Self::with_transport(url, HttpTransport)
    }
}

impl<T: HealthTransport> HealthProbe<T> {
    /// Probe `url` through a custom transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not a valid `http` or `https` URL.
    pub fn with_transport(url: &str, transport: T) -> Result<Self, CertLinkError> {
        let display_url = validate_url_scheme(url)?;
        Ok(Self {
            url: url.to_string(),
            display_url,
            bearer: None,
            policy: RetryPolicy::default(),
            transport,
        })
    }

    /// Send `Authorization: Bearer <token>` with each attempt.
    pub fn bearer(mut self, token: Zeroizing<String>) -> Self {
        self.bearer = Some(token);
        self
    }

    /// Replace the retry policy.
    pub fn policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run the probe, sleeping between retries.
    ///
    /// # Errors
    ///
    /// Returns [`CertLinkError::HealthCheckFailed`] if every attempt failed
    /// to obtain a response.
    pub fn check(&self) -> Result<HealthReport, CertLinkError> {
        self.check_with_sleep(std::thread::sleep)
    }

    /// Run the probe with a caller-supplied sleep function.
    ///
    /// # Errors
    ///
    /// See [`HealthProbe::check`].
    pub fn check_with_sleep(
        &self,
        mut sleep: impl FnMut(Duration),
    ) -> Result<HealthReport, CertLinkError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let timeout = self.policy.timeout_for(attempt);
            tracing::info!(
                url = %self.display_url,
                attempt,
                max_attempts,
                timeout_secs = timeout.as_secs(),
                "probing backend health"
            );

            match self
                .transport
                .get(&self.url, self.bearer.as_deref().map(String::as_str), timeout)
            {
                Ok(ProbeResponse { status, body }) => {
                    let status = if (200..300).contains(&status) {
                        tracing::info!(status, "backend is healthy");
                        HealthStatus::Healthy { status, body }
                    } else {
                        tracing::warn!(status, "backend returned an error status");
                        HealthStatus::Unhealthy { status, body }
                    };
                    return Ok(HealthReport {
                        url: self.display_url.clone(),
                        status,
                        attempts: attempt,
                    });
                }
                Err(err) if attempt < max_attempts => {
                    tracing::warn!(
                        error = %err,
                        wait_secs = self.policy.retry_wait.as_secs(),
                        "health probe attempt failed, retrying"
                    );
                    sleep(self.policy.retry_wait);
                    attempt += 1;
                }
                Err(err) => {
                    tracing::error!(error = %err, attempts = attempt, "health probe gave up");
                    return Err(CertLinkError::HealthCheckFailed {
                        url: self.display_url.clone(),
                        attempts: attempt,
                        reason: err.to_string(),
                    });
                }
            }
        }
    }
}

/// Custom `Debug` that redacts the bearer token.
impl<T: fmt::Debug> fmt::Debug for HealthProbe<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HealthProbe")
            .field("url", &self.display_url)
            .field("bearer", &self.bearer.as_ref().map(|_| "[REDACTED]"))
            .field("policy", &self.policy)
            .field("transport", &self.transport)
            .finish()
    }
}

/// Accept only `http` and `https` URLs, returning a display-safe form.
fn validate_url_scheme(url: &str) -> Result<String, CertLinkError> {
    let display_url = sanitize_url_for_display(url);
    match reqwest::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(display_url),
        Ok(parsed) => Err(CertLinkError::HealthCheckFailed {
            url: display_url,
            attempts: 0,
            reason: format!(
                "only http and https URLs are accepted (got scheme '{}')",
                parsed.scheme()
            ),
        }),
        Err(_) => Err(CertLinkError::HealthCheckFailed {
            url: display_url,
            attempts: 0,
            reason: "invalid URL for health endpoint".to_string(),
        }),
    }
}
