//! Transport seam between the session coordinator and the service.
//!
//! The coordinator talks to the entry points through `OtpTransport`; the
//! shipped implementation is HTTP via `reqwest`, and tests substitute a
//! scripted one.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Error type for transport failures.
///
/// Covers the round trip only; a well-formed failure response from the
/// service is an outcome, not a transport error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Outcome of a send-challenge request.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    /// Whether the service reported success.
    pub success: bool,
    /// The service's human-readable message.
    pub message: String,
    /// The opaque session identifier, read from the `Session-Id` header.
    pub session_id: Option<String>,
    /// Approximate expiry of the issued code.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Outcome of a verify-challenge request.
#[derive(Debug, Clone)]
pub struct VerifyOutcome {
    /// Whether the service reported success.
    pub success: bool,
    /// The service's human-readable message (includes remaining-attempt
    /// counts on a wrong code).
    pub message: String,
    /// Whether the code was verified.
    pub verified: bool,
    /// The bound email address, present only on success.
    pub email: Option<String>,
}

/// Trait for driving the two entry points.
#[async_trait]
pub trait OtpTransport: Send + Sync {
    /// Requests a new challenge for `email`.
    async fn send_challenge(&self, email: &str) -> Result<SendOutcome, TransportError>;

    /// Submits `code` against the challenge identified by `session_id`.
    async fn verify_challenge(
        &self,
        session_id: &str,
        code: &str,
    ) -> Result<VerifyOutcome, TransportError>;
}

// ==================== HTTP transport ====================

#[derive(Debug, Deserialize)]
struct WireEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<WireData>,
}

#[derive(Debug, Deserialize)]
struct WireData {
    #[serde(rename = "expiresAt")]
    expires_at: Option<String>,
    verified: Option<bool>,
    email: Option<String>,
}

/// HTTP transport over `reqwest`.
///
/// `base_url` points at the mounted service base path, e.g.
/// `http://localhost:8000/api/otp`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport with a default client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates a transport with a caller-provided client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<(reqwest::header::HeaderMap, WireEnvelope), TransportError> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;

        let headers = response.headers().clone();
        let envelope = response
            .json::<WireEnvelope>()
            .await
            .map_err(|err| TransportError::InvalidResponse(err.to_string()))?;
        Ok((headers, envelope))
    }
}

#[async_trait]
impl OtpTransport for HttpTransport {
    async fn send_challenge(&self, email: &str) -> Result<SendOutcome, TransportError> {
        let (headers, envelope) = self
            .post("/send", serde_json::json!({ "email": email }))
            .await?;

        let session_id = headers
            .get("session-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let expires_at = envelope
            .data
            .as_ref()
            .and_then(|d| d.expires_at.as_deref())
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(SendOutcome {
            success: envelope.success,
            message: envelope.message,
            session_id,
            expires_at,
        })
    }

    async fn verify_challenge(
        &self,
        session_id: &str,
        code: &str,
    ) -> Result<VerifyOutcome, TransportError> {
        let (_, envelope) = self
            .post(
                "/verify",
                serde_json::json!({ "sessionId": session_id, "otp": code }),
            )
            .await?;

        let data = envelope.data.as_ref();
        Ok(VerifyOutcome {
            success: envelope.success,
            message: envelope.message,
            verified: data.and_then(|d| d.verified).unwrap_or(false),
            email: data.and_then(|d| d.email.clone()),
        })
    }
}
