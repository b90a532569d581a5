//! Error types for Otpgate.
//!
//! This module defines the `OtpError` enum which represents all possible
//! errors that can occur within the OTP challenge system.

use thiserror::Error;

/// The main error type for Otpgate operations.
///
/// Expected conditions (an absent, expired, or exhausted challenge) are
/// represented as return values by the store, never as errors. `OtpError`
/// covers input validation and the genuinely exceptional cases: dispatch
/// failures, storage backend failures, and misconfiguration.
#[derive(Debug, Error)]
pub enum OtpError {
    // ==================== Validation Errors ====================
    /// A required field is missing.
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A field value is invalid.
    #[error("Invalid field value for '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// The email format is invalid.
    #[error("Invalid email format")]
    InvalidEmail,

    // ==================== Challenge Errors ====================
    /// The challenge was not found or has expired.
    ///
    /// Absence and expiry are never distinguished to callers.
    #[error("Challenge not found or expired")]
    ChallengeNotFound,

    // ==================== Dispatch Errors ====================
    /// Delivering the code to the bound identity failed.
    #[error("Failed to dispatch verification code: {message}")]
    DispatchFailed { message: String },

    // ==================== Storage Errors ====================
    /// A storage backend operation failed.
    #[error("Storage error: {message}")]
    StorageError { message: String },

    // ==================== Configuration Errors ====================
    /// The configuration is invalid.
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    // ==================== Internal Errors ====================
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    InternalError { message: String },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {message}")]
    SerializationError { message: String },
}

impl OtpError {
    /// Creates a new invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates a new dispatch error.
    pub fn dispatch(message: impl Into<String>) -> Self {
        Self::DispatchFailed {
            message: message.into(),
        }
    }

    /// Creates a new storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageError {
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Creates a new internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Returns true if this is a user-facing error (vs internal).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. }
                | Self::InvalidField { .. }
                | Self::InvalidEmail
                | Self::ChallengeNotFound
        )
    }

    /// Returns an HTTP status code appropriate for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingField { .. }
            | Self::InvalidField { .. }
            | Self::InvalidEmail
            | Self::ChallengeNotFound => 400,
            _ => 500,
        }
    }
}

/// A Result type alias using OtpError.
pub type OtpResult<T> = Result<T, OtpError>;

impl From<serde_json::Error> for OtpError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            message: err.to_string(),
        }
    }
}
