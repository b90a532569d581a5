//! # Otpgate Service
//!
//! The OTP challenge entry points: request a code for an email address,
//! then verify the submitted guess against the outstanding challenge.
//! Handlers are written against the core router abstraction; the axum
//! integration crate mounts them on a real HTTP server.

mod config;
mod handlers;

pub use config::{DispatchCallback, OtpConfig, OtpMessage};
pub use handlers::{
    SendChallengeHandler, SendChallengeRequest, VerifyChallengeHandler, VerifyChallengeRequest,
    SESSION_ID_HEADER,
};

use handlers::{ProbeHandler, ServiceState};
use otpgate_core::router::{Method, Route, Router};
use otpgate_core::ChallengeStore;
use std::sync::Arc;

/// The OTP challenge service.
///
/// Owns the service configuration and a handle to the challenge store;
/// produces the route table the integration layer mounts.
pub struct OtpService {
    state: Arc<ServiceState>,
}

impl OtpService {
    /// Creates a new service over the given store.
    ///
    /// The store is injected so its policy (TTL, ceiling, code length) can
    /// be wired from the same configuration values as `config`.
    pub fn new(store: Arc<dyn ChallengeStore>, config: OtpConfig) -> Self {
        Self {
            state: Arc::new(ServiceState { store, config }),
        }
    }

    /// Gets the service configuration.
    pub fn config(&self) -> &OtpConfig {
        &self.state.config
    }

    /// Registers the service routes.
    pub fn register_routes(&self, router: &mut Router) {
        // POST /send
        router.route(
            Route::new(
                Method::POST,
                "/send",
                SendChallengeHandler {
                    state: self.state.clone(),
                },
            )
            .summary("Send a verification code")
            .description(
                "Issues a new challenge for the given email address, dispatches the code, \
                 and returns the opaque session identifier in the Session-Id response header.",
            )
            .tag("otp"),
        );

        // POST /verify
        router.route(
            Route::new(
                Method::POST,
                "/verify",
                VerifyChallengeHandler {
                    state: self.state.clone(),
                },
            )
            .summary("Verify a submitted code")
            .description(
                "Checks the submitted code against the outstanding challenge for the given \
                 session identifier. Consumes one attempt per call; the challenge is deleted \
                 on success and at the attempt ceiling.",
            )
            .tag("otp"),
        );

        // GET probes
        router.route(
            Route::new(Method::GET, "/send", ProbeHandler { endpoint: "send" })
                .summary("Send endpoint probe")
                .tag("otp"),
        );
        router.route(
            Route::new(Method::GET, "/verify", ProbeHandler { endpoint: "verify" })
                .summary("Verify endpoint probe")
                .tag("otp"),
        );
    }

    /// Builds a router holding the service routes under the default base
    /// path.
    pub fn router(&self) -> Router {
        let mut router = Router::default();
        self.register_routes(&mut router);
        router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otpgate_core::router::Method;

    struct NullStore;

    #[async_trait::async_trait]
    impl ChallengeStore for NullStore {
        async fn create(
            &self,
            identity: &str,
        ) -> otpgate_core::OtpResult<otpgate_core::IssuedChallenge> {
            Ok(otpgate_core::IssuedChallenge {
                session_id: format!("s-{identity}"),
                code: "123456".into(),
                expires_at: chrono::Utc::now(),
            })
        }
        async fn get(&self, _: &str) -> otpgate_core::OtpResult<Option<otpgate_core::Challenge>> {
            Ok(None)
        }
        async fn increment_attempts(&self, _: &str) -> otpgate_core::OtpResult<u32> {
            Ok(0)
        }
        async fn is_max_attempts_reached(&self, _: &str) -> otpgate_core::OtpResult<bool> {
            Ok(false)
        }
        async fn remove(&self, _: &str) -> otpgate_core::OtpResult<()> {
            Ok(())
        }
        async fn sweep(&self) -> otpgate_core::OtpResult<usize> {
            Ok(0)
        }
    }

    #[test]
    fn test_route_registration() {
        let service = OtpService::new(Arc::new(NullStore), OtpConfig::default());
        let router = service.router();

        assert_eq!(router.len(), 4);
        assert_eq!(router.base_path, "/api/otp");
        assert!(router.find(Method::POST, "/send").is_some());
        assert!(router.find(Method::POST, "/verify").is_some());
        assert!(router.find(Method::GET, "/send").is_some());
        assert!(router.find(Method::GET, "/verify").is_some());
    }

    #[test]
    fn test_default_config() {
        let service = OtpService::new(Arc::new(NullStore), OtpConfig::default());
        assert_eq!(service.config().code_length, 6);
        assert_eq!(service.config().expires_in, 600);
        assert_eq!(service.config().max_attempts, 3);
    }
}
