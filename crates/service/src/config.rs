//! Configuration for the OTP challenge service.

use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Data passed to the dispatch callback.
#[derive(Debug, Clone)]
pub struct OtpMessage {
    /// The email address to deliver the code to.
    pub email: String,
    /// The code itself.
    pub code: String,
    /// When the code expires.
    pub expires_at: DateTime<Utc>,
}

impl OtpMessage {
    /// Creates a new outbound message.
    pub fn new(
        email: impl Into<String>,
        code: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            email: email.into(),
            code: code.into(),
            expires_at,
        }
    }
}

/// Type alias for the dispatch callback.
pub type DispatchCallback = Arc<
    dyn Fn(OtpMessage) -> Pin<Box<dyn Future<Output = Result<(), String>> + Send>>
        + Send
        + Sync,
>;

/// Configuration for the OTP challenge service.
///
/// The TTL, code length, and attempt ceiling mirror the policy the store
/// was constructed with; the two are wired from the same values at
/// composition time.
#[derive(Clone)]
pub struct OtpConfig {
    /// Digit length of generated codes. Default: 6.
    pub code_length: u32,
    /// Challenge expiration time in seconds. Default: 600 (10 minutes).
    pub expires_in: u64,
    /// Maximum verification attempts. Default: 3.
    pub max_attempts: u32,
    /// Callback that delivers the code to the bound identity. When unset,
    /// delivery is simulated: a short fixed delay, then a log line.
    pub dispatch: Option<DispatchCallback>,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: 6,
            expires_in: 600,
            max_attempts: 3,
            dispatch: None,
        }
    }
}

impl OtpConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the code length.
    pub fn code_length(mut self, length: u32) -> Self {
        self.code_length = length;
        self
    }

    /// Sets the expiration time in seconds.
    pub fn expires_in(mut self, seconds: u64) -> Self {
        self.expires_in = seconds;
        self
    }

    /// Sets the maximum allowed attempts.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the dispatch callback.
    pub fn dispatch_with<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn(OtpMessage) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        self.dispatch = Some(Arc::new(move |msg| Box::pin(callback(msg))));
        self
    }

    /// Delivers `message` through the configured callback, or simulates
    /// delivery when none is set.
    pub async fn dispatch_message(&self, message: OtpMessage) -> Result<(), String> {
        match &self.dispatch {
            Some(callback) => callback(message).await,
            None => {
                // Simulated delivery: fixed delay, then a log line. The
                // code is never logged.
                tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                tracing::info!(email = %message.email, "simulated code delivery");
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for OtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpConfig")
            .field("code_length", &self.code_length)
            .field("expires_in", &self.expires_in)
            .field("max_attempts", &self.max_attempts)
            .field("dispatch", &self.dispatch.is_some())
            .finish()
    }
}
