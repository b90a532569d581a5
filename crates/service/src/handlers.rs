//! Request handlers for the OTP challenge entry points.

use async_trait::async_trait;
use otpgate_core::router::{Request, RequestHandler, Response};
use otpgate_core::validation::{validate_code, validate_email, validate_session_id, FieldError};
use otpgate_core::ChallengeStore;
use serde::Deserialize;
use std::sync::Arc;

use crate::config::{OtpConfig, OtpMessage};

/// Name of the response header carrying the opaque session identifier.
///
/// The identifier travels in this header, never in the response body;
/// clients must read it from there. See DESIGN.md.
pub const SESSION_ID_HEADER: &str = "Session-Id";

/// Shared state behind the entry points.
pub(crate) struct ServiceState {
    pub store: Arc<dyn ChallengeStore>,
    pub config: OtpConfig,
}

/// Builds the 400 response for field-level validation failures.
fn validation_failure(errors: Vec<FieldError>, include_verified: bool) -> Response {
    let mut body = serde_json::json!({
        "success": false,
        "message": "Validation failed",
        "errors": errors,
    });
    if include_verified {
        body["data"] = serde_json::json!({ "verified": false });
    }
    Response::bad_request().json(body)
}

/// Builds a 400 verification-failure response with the given message.
fn verify_failure(message: &str) -> Response {
    Response::bad_request().json(serde_json::json!({
        "success": false,
        "message": message,
        "data": { "verified": false },
    }))
}

/// Builds the generic 500 response.
fn internal_failure(message: &str, error: String) -> Response {
    Response::internal_error().json(serde_json::json!({
        "success": false,
        "message": message,
        "error": error,
    }))
}

/// Request body for issuing a new challenge.
#[derive(Debug, Deserialize)]
pub struct SendChallengeRequest {
    /// Email address to deliver the code to.
    #[serde(default)]
    pub email: String,
}

/// Handler for POST /send
pub struct SendChallengeHandler {
    pub(crate) state: Arc<ServiceState>,
}

#[async_trait]
impl RequestHandler for SendChallengeHandler {
    async fn handle(&self, req: Request) -> Response {
        let body: SendChallengeRequest = req.json().unwrap_or(SendChallengeRequest {
            email: String::new(),
        });

        if let Err(err) = validate_email(&body.email) {
            return validation_failure(vec![err], false);
        }
        let email = body.email.trim();

        let issued = match self.state.store.create(email).await {
            Ok(issued) => issued,
            Err(err) => {
                tracing::error!(error = %err, "failed to create challenge");
                return internal_failure("Failed to send verification code", err.to_string());
            }
        };

        let message = OtpMessage::new(email, &issued.code, issued.expires_at);
        if let Err(err) = self.state.config.dispatch_message(message).await {
            // The challenge is left in place and expires naturally; a
            // retry issues a fresh one. See DESIGN.md.
            tracing::warn!(email, error = %err, "code dispatch failed");
            return internal_failure("Failed to send verification code", err);
        }

        tracing::info!(email, "verification code issued");
        Response::ok()
            .json(serde_json::json!({
                "success": true,
                "message": "Verification code sent",
                "data": { "expiresAt": issued.expires_at.to_rfc3339() },
            }))
            .header(SESSION_ID_HEADER, issued.session_id)
    }
}

/// Request body for verifying a challenge.
#[derive(Debug, Deserialize)]
pub struct VerifyChallengeRequest {
    /// Session identifier returned by the send entry point.
    #[serde(rename = "sessionId", default)]
    pub session_id: String,
    /// The submitted code.
    #[serde(default)]
    pub otp: String,
}

/// Handler for POST /verify
pub struct VerifyChallengeHandler {
    pub(crate) state: Arc<ServiceState>,
}

#[async_trait]
impl RequestHandler for VerifyChallengeHandler {
    async fn handle(&self, req: Request) -> Response {
        let body: VerifyChallengeRequest = req.json().unwrap_or(VerifyChallengeRequest {
            session_id: String::new(),
            otp: String::new(),
        });

        // Shape checks run before the store is consulted, so a malformed
        // request never consumes an attempt.
        let mut errors = Vec::new();
        if let Err(err) = validate_session_id(&body.session_id) {
            errors.push(err);
        }
        if let Err(err) = validate_code(&body.otp) {
            errors.push(err);
        }
        if !errors.is_empty() {
            return validation_failure(errors, true);
        }

        let store = &self.state.store;
        let challenge = match store.get(&body.session_id).await {
            Ok(Some(challenge)) => challenge,
            Ok(None) => {
                // Absent, consumed, and expired are indistinguishable here.
                return verify_failure("Session expired or invalid. Please request a new OTP.");
            }
            Err(err) => {
                tracing::error!(error = %err, "challenge lookup failed");
                return internal_failure("Failed to verify code", err.to_string());
            }
        };

        // Every call that reaches this point consumes an attempt, and the
        // ceiling is checked before the code is compared.
        let attempts = match store.increment_attempts(&body.session_id).await {
            Ok(attempts) => attempts,
            Err(err) => {
                tracing::error!(error = %err, "attempt count failed");
                return internal_failure("Failed to verify code", err.to_string());
            }
        };
        if store
            .is_max_attempts_reached(&body.session_id)
            .await
            .unwrap_or(false)
        {
            return verify_failure("Too many failed attempts. Please request a new OTP.");
        }

        if challenge.code == body.otp {
            if let Err(err) = store.remove(&body.session_id).await {
                tracing::error!(error = %err, "challenge removal failed");
                return internal_failure("Failed to verify code", err.to_string());
            }
            tracing::info!(email = %challenge.identity, "code verified");
            return Response::ok().json(serde_json::json!({
                "success": true,
                "message": "OTP verified successfully",
                "data": {
                    "verified": true,
                    "sessionId": body.session_id,
                    "email": challenge.identity,
                },
            }));
        }

        let remaining = self.state.config.max_attempts.saturating_sub(attempts);
        if remaining == 0 {
            // The increment already deleted the record at the ceiling.
            verify_failure("Too many failed attempts. Please request a new OTP.")
        } else {
            verify_failure(&format!("Invalid OTP. {remaining} attempts remaining."))
        }
    }
}

/// Read-only probe handler; reports which endpoint is mounted and alive.
pub struct ProbeHandler {
    pub(crate) endpoint: &'static str,
}

#[async_trait]
impl RequestHandler for ProbeHandler {
    async fn handle(&self, _req: Request) -> Response {
        Response::ok().json(serde_json::json!({
            "service": "otpgate",
            "endpoint": self.endpoint,
            "status": "ok",
        }))
    }
}
