//! Shared field validation.
//!
//! Validation failures are reported with field-level detail and are always
//! caught before the store is consulted, so a malformed request never
//! consumes an attempt.

use serde::{Deserialize, Serialize};

/// Accepted submitted-code lengths. The range allows configurable code
/// lengths without loosening the shape check.
pub const CODE_MIN_LEN: usize = 4;
/// Upper bound of the accepted submitted-code length.
pub const CODE_MAX_LEN: usize = 8;

/// A field-level validation failure, serialized verbatim into the
/// `errors` array of a validation-failure response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// The offending field.
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl FieldError {
    /// Creates a new field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validates an email address against a standard shape rule: exactly one
/// `@`, a non-empty local part, a domain with an interior dot, and no
/// whitespace.
pub fn validate_email(email: &str) -> Result<(), FieldError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(FieldError::new("email", "Email is required"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(FieldError::new("email", "Invalid email address"));
    }
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(FieldError::new("email", "Invalid email address")),
    };
    if local.is_empty() || domain.len() < 3 {
        return Err(FieldError::new("email", "Invalid email address"));
    }
    // The domain needs an interior dot: "a.b", not ".b" or "a.".
    let last = domain.chars().count() - 1;
    let has_interior_dot = domain
        .chars()
        .enumerate()
        .any(|(i, c)| c == '.' && i > 0 && i < last);
    if !has_interior_dot {
        return Err(FieldError::new("email", "Invalid email address"));
    }
    Ok(())
}

/// Validates a session identifier: any non-empty string.
pub fn validate_session_id(session_id: &str) -> Result<(), FieldError> {
    if session_id.trim().is_empty() {
        return Err(FieldError::new("sessionId", "Session ID is required"));
    }
    Ok(())
}

/// Validates the shape of a submitted code: non-empty, length within the
/// accepted range.
pub fn validate_code(code: &str) -> Result<(), FieldError> {
    if code.is_empty() {
        return Err(FieldError::new("otp", "OTP is required"));
    }
    if code.len() < CODE_MIN_LEN || code.len() > CODE_MAX_LEN {
        return Err(FieldError::new(
            "otp",
            format!(
                "OTP must be between {CODE_MIN_LEN} and {CODE_MAX_LEN} characters"
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("a.b+c@sub.domain.org").is_ok());
        assert!(validate_email("  padded@example.com  ").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("two@@example.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@nodot").is_err());
        assert!(validate_email("user@.com").is_err());
        assert!(validate_email("user@example.").is_err());
        assert!(validate_email("user name@example.com").is_err());
    }

    #[test]
    fn test_invalid_email_reports_field() {
        let err = validate_email("nope").unwrap_err();
        assert_eq!(err.field, "email");
    }

    #[test]
    fn test_session_id_shape() {
        assert!(validate_session_id("18f3a2c-Xy9kQm4T").is_ok());
        assert!(validate_session_id("").is_err());
        assert!(validate_session_id("   ").is_err());
    }

    #[test]
    fn test_code_shape() {
        assert!(validate_code("1234").is_ok());
        assert!(validate_code("123456").is_ok());
        assert!(validate_code("12345678").is_ok());
        assert!(validate_code("").is_err());
        assert!(validate_code("123").is_err());
        assert!(validate_code("123456789").is_err());
    }
}
