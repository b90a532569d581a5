//! Basic example demonstrating the full send -> verify flow in-process.
//!
//! Run with: cargo run --example basic_flow

use async_trait::async_trait;
use otpgate::prelude::*;
use otpgate_client::{SendOutcome, TransportError, VerifyOutcome};
use otpgate_core::router::{Method, Request, Router};
use std::sync::{Arc, Mutex};

/// Drives the service's route table directly; no HTTP layer involved.
struct LocalTransport {
    router: Router,
}

impl LocalTransport {
    async fn call(&self, path: &str, body: serde_json::Value) -> (u16, serde_json::Value, Option<String>) {
        let route = self.router.find(Method::POST, path).expect("route registered");
        let res = route
            .handler
            .handle(Request::new(Method::POST, path).with_body(body))
            .await;
        let session_id = res.headers.get("session-id").cloned();
        (res.status, res.body.unwrap_or_default(), session_id)
    }
}

#[async_trait]
impl OtpTransport for LocalTransport {
    async fn send_challenge(&self, email: &str) -> Result<SendOutcome, TransportError> {
        let (status, body, session_id) = self
            .call("/send", serde_json::json!({ "email": email }))
            .await;
        Ok(SendOutcome {
            success: status == 200,
            message: body["message"].as_str().unwrap_or_default().to_string(),
            session_id,
            expires_at: body["data"]["expiresAt"]
                .as_str()
                .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&chrono::Utc)),
        })
    }

    async fn verify_challenge(
        &self,
        session_id: &str,
        code: &str,
    ) -> Result<VerifyOutcome, TransportError> {
        let (status, body, _) = self
            .call(
                "/verify",
                serde_json::json!({ "sessionId": session_id, "otp": code }),
            )
            .await;
        Ok(VerifyOutcome {
            success: status == 200,
            message: body["message"].as_str().unwrap_or_default().to_string(),
            verified: body["data"]["verified"].as_bool().unwrap_or(false),
            email: body["data"]["email"].as_str().map(str::to_string),
        })
    }
}

#[tokio::main]
async fn main() {
    // Capture dispatched codes instead of sending real mail.
    let outbox: Arc<Mutex<Vec<OtpMessage>>> = Arc::new(Mutex::new(Vec::new()));
    let captured = outbox.clone();
    let config = OtpConfig::new().dispatch_with(move |msg: OtpMessage| {
        let captured = captured.clone();
        async move {
            captured.lock().unwrap().push(msg);
            Ok(())
        }
    });

    let store = Arc::new(MemoryChallengeStore::default());
    let service = OtpService::new(store, config);
    let mut client = OtpSessionClient::new(LocalTransport {
        router: service.router(),
    });

    // Phase one: request a challenge.
    assert!(client.request_challenge("alice@example.com").await);
    println!("Code sent, session: {}", client.session_id().unwrap());

    // A wrong guess consumes an attempt and reports what's left.
    client.submit_code(Some("000000")).await;
    println!("Wrong guess: {}", client.last_error().unwrap());

    // Phase two: submit the delivered code.
    let code = outbox.lock().unwrap().last().unwrap().code.clone();
    client.update_input(&code);
    assert!(client.submit_code(None).await);
    println!("Verified: {}", client.is_verified());

    // The challenge was consumed; the same code cannot be replayed.
    assert!(!client.submit_code(Some(&code)).await);
    println!("Replay rejected: {}", client.last_error().unwrap());
}
