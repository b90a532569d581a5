//! # Otpgate OTP Utilities
//!
//! Generation utilities shared by the challenge store:
//! - numeric code generation (uniform over the full digit range)
//! - opaque session-identifier generation (time component + random suffix)

mod generator;

pub use generator::{OtpGenerator, DEFAULT_CODE_LENGTH};
