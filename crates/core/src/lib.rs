//! # Otpgate Core
//!
//! This crate provides the foundational types and traits for the Otpgate
//! OTP challenge system. It defines the core data structure (`Challenge`),
//! error types, the `ChallengeStore` trait that storage backends implement,
//! and a framework-agnostic request/response abstraction for the entry
//! points.

pub mod error;
pub mod router;
pub mod traits;
pub mod types;
pub mod validation;

// Re-export commonly used items at the crate root
pub use error::{OtpError, OtpResult};
pub use traits::ChallengeStore;
pub use types::{Challenge, IssuedChallenge};
pub use validation::{
    validate_code, validate_email, validate_session_id, FieldError, CODE_MAX_LEN, CODE_MIN_LEN,
};

// Re-export router types
pub use router::{Method, Request, RequestHandler, Response, Route, Router};
