//! State-machine tests for the session coordinator, driven against a
//! scripted transport.

use async_trait::async_trait;
use otpgate_client::{OtpSessionClient, OtpTransport, SendOutcome, TransportError, VerifyOutcome};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Scripted transport: pops pre-loaded outcomes and counts calls.
#[derive(Default)]
struct ScriptedTransport {
    send_outcomes: Mutex<Vec<Result<SendOutcome, TransportError>>>,
    verify_outcomes: Mutex<Vec<Result<VerifyOutcome, TransportError>>>,
    send_calls: Arc<AtomicUsize>,
    verify_calls: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    fn with_send(self, outcome: Result<SendOutcome, TransportError>) -> Self {
        self.send_outcomes.lock().unwrap().insert(0, outcome);
        self
    }

    fn with_verify(self, outcome: Result<VerifyOutcome, TransportError>) -> Self {
        self.verify_outcomes.lock().unwrap().insert(0, outcome);
        self
    }
}

fn sent_ok(session_id: Option<&str>) -> Result<SendOutcome, TransportError> {
    Ok(SendOutcome {
        success: true,
        message: "Verification code sent".into(),
        session_id: session_id.map(str::to_string),
        expires_at: Some(chrono::Utc::now() + chrono::Duration::minutes(10)),
    })
}

fn verify_ok(email: &str) -> Result<VerifyOutcome, TransportError> {
    Ok(VerifyOutcome {
        success: true,
        message: "OTP verified successfully".into(),
        verified: true,
        email: Some(email.into()),
    })
}

fn verify_rejected(message: &str) -> Result<VerifyOutcome, TransportError> {
    Ok(VerifyOutcome {
        success: false,
        message: message.into(),
        verified: false,
        email: None,
    })
}

#[async_trait]
impl OtpTransport for ScriptedTransport {
    async fn send_challenge(&self, _email: &str) -> Result<SendOutcome, TransportError> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        self.send_outcomes
            .lock()
            .unwrap()
            .pop()
            .expect("unexpected send_challenge call")
    }

    async fn verify_challenge(
        &self,
        _session_id: &str,
        _code: &str,
    ) -> Result<VerifyOutcome, TransportError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.verify_outcomes
            .lock()
            .unwrap()
            .pop()
            .expect("unexpected verify_challenge call")
    }
}

#[tokio::test]
async fn test_invalid_email_fails_fast() {
    let transport = ScriptedTransport::default();
    let calls = transport.send_calls.clone();
    let mut client = OtpSessionClient::new(transport);

    assert!(!client.request_challenge("not-an-email").await);
    assert!(client.last_error().is_some());
    assert!(!client.state().sent);
    // No network call was made.
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_send_records_session() {
    let transport = ScriptedTransport::default().with_send(sent_ok(Some("sess-1")));
    let mut client = OtpSessionClient::new(transport);

    assert!(client.request_challenge("user@example.com").await);
    assert_eq!(client.session_id(), Some("sess-1"));
    assert!(client.state().sent);
    assert!(!client.state().sending);
    assert!(client.state().expires_at.is_some());
    assert!(client.last_error().is_none());
}

#[tokio::test]
async fn test_send_failure_records_error() {
    let transport = ScriptedTransport::default()
        .with_send(Err(TransportError::Network("connection refused".into())));
    let mut client = OtpSessionClient::new(transport);

    assert!(!client.request_challenge("user@example.com").await);
    assert!(!client.state().sent);
    assert!(client.session_id().is_none());
    assert!(client.last_error().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn test_submit_before_send_is_diagnosed() {
    let mut client = OtpSessionClient::new(ScriptedTransport::default());

    assert!(!client.submit_code(Some("123456")).await);
    assert_eq!(
        client.last_error(),
        Some("No code has been sent yet. Request a code first.")
    );
}

#[tokio::test]
async fn test_submit_without_returned_session_is_diagnosed() {
    // Send succeeds but the server never returned an identifier.
    let transport = ScriptedTransport::default().with_send(sent_ok(None));
    let mut client = OtpSessionClient::new(transport);

    assert!(client.request_challenge("user@example.com").await);
    assert!(!client.submit_code(Some("123456")).await);
    assert_eq!(
        client.last_error(),
        Some("The code was sent but no session was returned. Request a new code.")
    );
}

#[tokio::test]
async fn test_submit_malformed_code_fails_locally() {
    let transport = ScriptedTransport::default().with_send(sent_ok(Some("sess-1")));
    let calls = transport.verify_calls.clone();
    let mut client = OtpSessionClient::new(transport);
    client.request_challenge("user@example.com").await;

    for bad in ["", "123", "123456789", "12a456"] {
        assert!(!client.submit_code(Some(bad)).await);
        assert_eq!(
            client.last_error(),
            Some("Enter the 6-digit code from the message.")
        );
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_verify_failure_keeps_session_for_retry() {
    let transport = ScriptedTransport::default()
        .with_send(sent_ok(Some("sess-1")))
        .with_verify(verify_rejected("Invalid OTP. 2 attempts remaining."))
        .with_verify(verify_ok("user@example.com"));
    let mut client = OtpSessionClient::new(transport);
    client.request_challenge("user@example.com").await;

    assert!(!client.submit_code(Some("000000")).await);
    assert_eq!(
        client.last_error(),
        Some("Invalid OTP. 2 attempts remaining.")
    );
    // The session survives a rejection so the user can retry.
    assert_eq!(client.session_id(), Some("sess-1"));
    assert!(!client.is_verified());

    assert!(client.submit_code(Some("123456")).await);
    assert!(client.is_verified());
    assert!(client.last_error().is_none());
}

#[tokio::test]
async fn test_resend_discards_previous_session() {
    let transport = ScriptedTransport::default()
        .with_send(sent_ok(Some("sess-1")))
        .with_send(sent_ok(Some("sess-2")));
    let mut client = OtpSessionClient::new(transport);

    assert!(client.request_challenge("user@example.com").await);
    assert_eq!(client.session_id(), Some("sess-1"));

    assert!(client.request_challenge("user@example.com").await);
    assert_eq!(client.session_id(), Some("sess-2"));
    assert!(client.state().sent);
}

#[tokio::test]
async fn test_update_input_sanitizes_and_clears_error() {
    let mut client = OtpSessionClient::new(ScriptedTransport::default());

    // Seed an error through the never-sent precondition.
    client.submit_code(Some("123456")).await;
    assert!(client.last_error().is_some());

    client.update_input(" 12x34-5678 ");
    assert_eq!(client.state().code_input, "123456");
    assert!(client.last_error().is_none());
}

#[tokio::test]
async fn test_submit_uses_tracked_input() {
    let transport = ScriptedTransport::default()
        .with_send(sent_ok(Some("sess-1")))
        .with_verify(verify_ok("user@example.com"));
    let mut client = OtpSessionClient::new(transport);
    client.request_challenge("user@example.com").await;

    client.update_input("123456");
    assert!(client.submit_code(None).await);
    assert!(client.is_verified());
}

#[tokio::test]
async fn test_reset_returns_to_idle() {
    let transport = ScriptedTransport::default().with_send(sent_ok(Some("sess-1")));
    let mut client = OtpSessionClient::new(transport);
    client.request_challenge("user@example.com").await;
    client.update_input("123456");

    client.reset();
    let state = client.state();
    assert!(state.session_id.is_none());
    assert!(state.code_input.is_empty());
    assert!(!state.sent && !state.verified && !state.sending && !state.verifying);
    assert!(state.last_error.is_none());
}
