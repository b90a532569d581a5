//! OTP and session-identifier generation.

use chrono::Utc;
use rand::Rng;

/// Characters used for session-identifier suffixes. Ambiguous characters
/// (0, O, l, 1, I) are excluded so identifiers survive manual transcription.
const SESSION_CHARSET: &[u8] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz";

/// Default length of generated numeric codes.
pub const DEFAULT_CODE_LENGTH: u32 = 6;

/// Length of the random suffix in generated session identifiers.
const SESSION_SUFFIX_LENGTH: usize = 16;

/// Generator for OTP codes and session identifiers.
#[derive(Debug, Clone)]
pub struct OtpGenerator {
    code_length: u32,
}

impl OtpGenerator {
    /// Creates a generator producing codes of the given digit length (2-9).
    pub fn new(code_length: u32) -> Self {
        Self {
            code_length: code_length.clamp(2, 9),
        }
    }

    /// Generates a numeric code, drawn uniformly from the full range of
    /// its digit length. A 6-digit generator yields an integer in
    /// [100000, 999999], so codes never carry a leading zero.
    pub fn generate_code(&self) -> String {
        let low = 10u32.pow(self.code_length - 1);
        let high = 10u32.pow(self.code_length) - 1;
        rand::thread_rng().gen_range(low..=high).to_string()
    }

    /// Generates an opaque session identifier: a millisecond time component
    /// plus a random suffix. The suffix carries the unguessability (the
    /// identifier doubles as a bearer credential for the verify step); the
    /// time component keeps identifiers unique across restarts.
    pub fn generate_session_id(&self) -> String {
        let millis = Utc::now().timestamp_millis();
        format!("{:x}-{}", millis, Self::random_suffix(SESSION_SUFFIX_LENGTH))
    }

    fn random_suffix(length: usize) -> String {
        let mut rng = rand::thread_rng();
        (0..length)
            .map(|_| {
                let idx = rng.gen_range(0..SESSION_CHARSET.len());
                SESSION_CHARSET[idx] as char
            })
            .collect()
    }
}

impl Default for OtpGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_length_and_range() {
        let generator = OtpGenerator::default();
        for _ in 0..100 {
            let code = generator.generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            let value: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&value));
        }
    }

    #[test]
    fn test_configurable_code_length() {
        let generator = OtpGenerator::new(4);
        let code = generator.generate_code();
        assert_eq!(code.len(), 4);
    }

    #[test]
    fn test_session_id_shape() {
        let generator = OtpGenerator::default();
        let id = generator.generate_session_id();

        let (prefix, suffix) = id.split_once('-').unwrap();
        assert!(!prefix.is_empty());
        assert_eq!(suffix.len(), 16);
        // No ambiguous characters in the random suffix.
        assert!(!suffix.contains('0'));
        assert!(!suffix.contains('O'));
        assert!(!suffix.contains('l'));
        assert!(!suffix.contains('1'));
        assert!(!suffix.contains('I'));
    }

    #[test]
    fn test_uniqueness() {
        let generator = OtpGenerator::default();
        let ids: std::collections::HashSet<String> =
            (0..100).map(|_| generator.generate_session_id()).collect();
        assert_eq!(ids.len(), 100);

        let codes: std::collections::HashSet<String> =
            (0..100).map(|_| generator.generate_code()).collect();
        // Codes can collide; expect mostly unique draws.
        assert!(codes.len() > 90);
    }
}
