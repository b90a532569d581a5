//! # Otpgate Client
//!
//! The client-side session coordinator: drives the two-phase
//! send-then-verify flow on behalf of a UI, tracking phase flags and the
//! last error in one place so the UI renders from a single state struct.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use otpgate_client::{HttpTransport, OtpSessionClient};
//!
//! let mut client = OtpSessionClient::new(HttpTransport::new("http://localhost:8000/api/otp"));
//! client.request_challenge("user@example.com").await;
//! client.update_input("123456");
//! if client.submit_code(None).await {
//!     // verified
//! }
//! ```

mod transport;

pub use transport::{HttpTransport, OtpTransport, SendOutcome, TransportError, VerifyOutcome};

use chrono::{DateTime, Utc};
use otpgate_core::validation::{validate_email, CODE_MAX_LEN, CODE_MIN_LEN};

/// Client-local state for one verification flow.
///
/// `sending` and `verifying` are never simultaneously true; `last_error`
/// is cleared whenever new input arrives or a new operation starts.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Session identifier returned by a successful send.
    pub session_id: Option<String>,
    /// The in-progress user-entered code, digits only.
    pub code_input: String,
    /// A challenge has been issued for this flow.
    pub sent: bool,
    /// The code was verified.
    pub verified: bool,
    /// A send request is in flight.
    pub sending: bool,
    /// A verify request is in flight.
    pub verifying: bool,
    /// Human-readable message for the most recent failure.
    pub last_error: Option<String>,
    /// Approximate expiry echoed by the send entry point.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Coordinates one OTP verification flow over an [`OtpTransport`].
///
/// No operation panics or propagates an error: every failure, local or
/// remote, becomes a `false` return plus a message in
/// [`SessionState::last_error`].
pub struct OtpSessionClient<T> {
    transport: T,
    code_length: usize,
    state: SessionState,
}

impl<T: OtpTransport> OtpSessionClient<T> {
    /// Creates a coordinator in the idle state.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            code_length: 6,
            state: SessionState::default(),
        }
    }

    /// Sets the expected code length used to cap input. Default: 6.
    pub fn with_code_length(mut self, length: usize) -> Self {
        self.code_length = length;
        self
    }

    /// The current flow state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The current session identifier, if a send succeeded.
    pub fn session_id(&self) -> Option<&str> {
        self.state.session_id.as_deref()
    }

    /// The most recent failure message, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error.as_deref()
    }

    /// True once a code was verified for this flow.
    pub fn is_verified(&self) -> bool {
        self.state.verified
    }

    /// Requests a challenge for `email`.
    ///
    /// Pre-validates the address locally and fails fast without a network
    /// call on malformed input. Invoking again after a success is a
    /// resend: the previous session identifier is discarded up front, so a
    /// failed resend leaves the flow unsent rather than bound to a stale
    /// session.
    pub async fn request_challenge(&mut self, email: &str) -> bool {
        self.state.last_error = None;

        if let Err(err) = validate_email(email) {
            self.state.last_error = Some(err.message);
            return false;
        }

        self.state.session_id = None;
        self.state.sent = false;
        self.state.verified = false;
        self.state.expires_at = None;

        self.state.sending = true;
        let result = self.transport.send_challenge(email.trim()).await;
        self.state.sending = false;

        match result {
            Ok(outcome) if outcome.success => {
                self.state.session_id = outcome.session_id;
                self.state.expires_at = outcome.expires_at;
                self.state.sent = true;
                true
            }
            Ok(outcome) => {
                self.state.last_error = Some(outcome.message);
                false
            }
            Err(err) => {
                self.state.last_error = Some(format!("Could not send the code: {err}"));
                false
            }
        }
    }

    /// Submits `code`, or the tracked input when `None`.
    ///
    /// Requires a session identifier; the three precondition failures are
    /// reported with distinct messages so the UI can say what actually
    /// happened. On a server-side failure the session identifier is kept,
    /// so the user can retry until the attempt ceiling.
    pub async fn submit_code(&mut self, code: Option<&str>) -> bool {
        self.state.last_error = None;

        if self.state.sending {
            self.state.last_error =
                Some("A code is still being sent. Wait a moment and try again.".to_string());
            return false;
        }
        if !self.state.sent {
            self.state.last_error =
                Some("No code has been sent yet. Request a code first.".to_string());
            return false;
        }
        let Some(session_id) = self.state.session_id.clone() else {
            self.state.last_error = Some(
                "The code was sent but no session was returned. Request a new code.".to_string(),
            );
            return false;
        };

        let code = code.unwrap_or(&self.state.code_input).trim().to_string();
        if code.len() < CODE_MIN_LEN
            || code.len() > CODE_MAX_LEN
            || !code.chars().all(|c| c.is_ascii_digit())
        {
            self.state.last_error = Some(format!(
                "Enter the {}-digit code from the message.",
                self.code_length
            ));
            return false;
        }

        self.state.verifying = true;
        let result = self.transport.verify_challenge(&session_id, &code).await;
        self.state.verifying = false;

        match result {
            Ok(outcome) if outcome.verified => {
                self.state.verified = true;
                true
            }
            Ok(outcome) => {
                self.state.last_error = Some(outcome.message);
                false
            }
            Err(err) => {
                self.state.last_error = Some(format!("Could not verify the code: {err}"));
                false
            }
        }
    }

    /// Records in-progress input: digits only, truncated to the expected
    /// code length. Clears the error, since the user is correcting their
    /// input.
    pub fn update_input(&mut self, value: &str) {
        self.state.code_input = value
            .chars()
            .filter(char::is_ascii_digit)
            .take(self.code_length)
            .collect();
        self.state.last_error = None;
    }

    /// Returns all state to idle defaults; used when abandoning a flow.
    pub fn reset(&mut self) {
        self.state = SessionState::default();
    }
}
