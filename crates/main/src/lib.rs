//! # Otpgate
//!
//! An email OTP challenge service: a server-side store of short-lived,
//! single-use codes with expiry and bounded attempts, send/verify entry
//! points, and a client-side coordinator that drives the two-phase flow.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use otpgate::prelude::*;
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryChallengeStore::default());
//! let service = OtpService::new(store.clone(), OtpConfig::default());
//! let sweeper = store.spawn_sweeper(std::time::Duration::from_secs(300));
//!
//! // Mount `service.router()` via otpgate_axum, or drive it in-process.
//! ```

// Re-export core types
pub use otpgate_core::*;

// Re-export the service, store, and client SDK
pub use otpgate_client::{HttpTransport, OtpSessionClient, OtpTransport, SessionState};
pub use otpgate_service::{OtpConfig, OtpMessage, OtpService};
pub use otpgate_store_memory::{MemoryChallengeStore, MemoryStoreConfig, SweeperHandle};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use otpgate_client::{HttpTransport, OtpSessionClient, OtpTransport};
    pub use otpgate_core::error::{OtpError, OtpResult};
    pub use otpgate_core::traits::ChallengeStore;
    pub use otpgate_core::types::{Challenge, IssuedChallenge};
    pub use otpgate_service::{OtpConfig, OtpMessage, OtpService};
    pub use otpgate_store_memory::{MemoryChallengeStore, MemoryStoreConfig};
}
