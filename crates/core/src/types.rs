//! Core data types for Otpgate.
//!
//! This module defines the canonical `Challenge` struct that forms the
//! authoritative record of an outstanding OTP verification session.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// An outstanding OTP challenge, owned exclusively by the challenge store.
///
/// One record exists per live verification session. The record is created
/// by the send operation, mutated only through the store's attempt counter,
/// and destroyed on successful verification, on reaching the attempt
/// ceiling, or on expiry.
///
/// # Example
///
/// ```rust
/// use otpgate_core::Challenge;
/// use chrono::Duration;
///
/// let challenge = Challenge::new("sess_1", "user@example.com", "123456", Duration::minutes(10));
/// assert!(!challenge.is_expired());
/// assert_eq!(challenge.attempts, 0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    /// Opaque unique identifier, used as the lookup key and as the bearer
    /// credential for the verify step.
    pub session_id: String,

    /// The email address the code was issued for. Never changes after
    /// creation; surfaced to callers only upon successful verification.
    pub identity: String,

    /// The secret code, fixed-format numeric. Immutable once created and
    /// compared verbatim against submitted guesses.
    pub code: String,

    /// Absolute expiry timestamp. Once `now > expires_at` the record is
    /// logically dead and must be treated as absent, whether or not a
    /// background sweep has run yet.
    pub expires_at: DateTime<Utc>,

    /// Number of verify calls that reached the comparison step.
    #[serde(default)]
    pub attempts: u32,

    /// Timestamp when the challenge was created.
    pub created_at: DateTime<Utc>,
}

impl Challenge {
    /// Creates a new challenge that expires `ttl` from now.
    pub fn new(
        session_id: impl Into<String>,
        identity: impl Into<String>,
        code: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            identity: identity.into(),
            code: code.into(),
            expires_at: now + ttl,
            attempts: 0,
            created_at: now,
        }
    }

    /// Checks if the challenge has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// The values handed back to the caller when a challenge is created.
///
/// The code leaves the store exactly once, here, on its way to the
/// dispatch collaborator.
#[derive(Debug, Clone)]
pub struct IssuedChallenge {
    /// The session identifier to return to the requesting client.
    pub session_id: String,
    /// The generated code to deliver to the bound identity.
    pub code: String,
    /// When the challenge expires.
    pub expires_at: DateTime<Utc>,
}
