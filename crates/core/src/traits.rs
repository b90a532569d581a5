//! Core traits for Otpgate.
//!
//! This module defines the `ChallengeStore` interface that storage
//! backends implement. The shipped backend is an in-memory map; the trait
//! is the seam where a shared external store (e.g. a keyed cache service)
//! would plug in for a multi-process deployment.

use async_trait::async_trait;

use crate::error::OtpResult;
use crate::types::{Challenge, IssuedChallenge};

/// The sole source of truth for outstanding OTP challenges.
///
/// Implementations enforce the TTL and attempt-ceiling policy. All
/// operations are total over their key space: "not found" and "expired"
/// are both reported as absence, never distinguished, and never as errors.
/// `OtpResult` exists for backend failures only.
#[async_trait]
pub trait ChallengeStore: Send + Sync {
    /// Creates a challenge for `identity` and returns the generated session
    /// identifier and code.
    ///
    /// The code is a fixed-length numeric secret; the session identifier is
    /// unguessable enough to act as a bearer credential for the verify step.
    async fn create(&self, identity: &str) -> OtpResult<IssuedChallenge>;

    /// Returns the challenge for `session_id` if it is present and not
    /// expired.
    ///
    /// A present-but-expired record is deleted as a side effect and
    /// reported as absent. This lazy expiry check runs on every read,
    /// independent of the periodic sweep.
    async fn get(&self, session_id: &str) -> OtpResult<Option<Challenge>>;

    /// Increments the attempt counter and returns the new count.
    ///
    /// When the new count reaches the ceiling the record is deleted, so
    /// immediately-following reads report absent. Returns 0 with no effect
    /// when no record exists.
    async fn increment_attempts(&self, session_id: &str) -> OtpResult<u32>;

    /// True iff a record still exists with `attempts` at or past the
    /// ceiling.
    ///
    /// Since `increment_attempts` already deletes at the ceiling, callers
    /// normally observe `false`; this guards store implementations that
    /// decouple the two steps.
    async fn is_max_attempts_reached(&self, session_id: &str) -> OtpResult<bool>;

    /// Unconditionally deletes the record. Used after successful
    /// verification so the challenge cannot be replayed.
    async fn remove(&self, session_id: &str) -> OtpResult<()>;

    /// Deletes every expired record and returns how many were removed.
    ///
    /// Purely a memory-reclamation measure: the lazy check in `get` already
    /// guarantees expired records read as absent.
    async fn sweep(&self) -> OtpResult<usize>;
}
