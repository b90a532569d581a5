//! # Otpgate Server
//!
//! Standalone OTP challenge server: wires the in-memory store, the sweep
//! task, and the service routes into an axum application and serves it.

mod config;

pub use config::{load_config, parse_config, ConfigError, OtpSection, ServerConfig};

use chrono::Duration;
use otpgate_service::{OtpConfig, OtpService};
use otpgate_store_memory::{MemoryChallengeStore, MemoryStoreConfig};
use std::sync::Arc;

/// The OTP challenge server.
pub struct OtpServer {
    /// Server configuration.
    pub config: ServerConfig,
    /// OTP policy configuration.
    pub otp: OtpSection,
}

impl OtpServer {
    /// Creates a new server.
    pub fn new(config: ServerConfig, otp: OtpSection) -> Self {
        Self { config, otp }
    }

    /// Builds the application router and the store it serves from.
    ///
    /// Exposed separately from [`run`](Self::run) so tests can drive the
    /// wired application without binding a socket. The sweeper is not
    /// started here.
    pub fn build_app(&self) -> (axum::Router, MemoryChallengeStore) {
        let service_config = OtpConfig::new()
            .code_length(self.otp.code_length)
            .expires_in(self.otp.expires_in)
            .max_attempts(self.otp.max_attempts);

        // The store enforces the same policy the service reports on.
        let store = MemoryChallengeStore::new(MemoryStoreConfig {
            ttl: Duration::seconds(service_config.expires_in as i64),
            max_attempts: service_config.max_attempts,
            code_length: service_config.code_length,
        });

        let service = OtpService::new(Arc::new(store.clone()), service_config);
        (otpgate_axum::mount(&service), store)
    }

    /// Starts the sweeper and serves the application until the process
    /// exits.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let (app, store) = self.build_app();
        let _sweeper =
            store.spawn_sweeper(std::time::Duration::from_secs(self.otp.sweep_interval));

        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!(%addr, "Otpgate server listening");

        axum::serve(listener, app).await?;
        Ok(())
    }
}

impl Default for OtpServer {
    fn default() -> Self {
        Self::new(ServerConfig::default(), OtpSection::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_app_wires_policy() {
        let server = OtpServer::new(
            ServerConfig::default(),
            OtpSection {
                code_length: 4,
                ..OtpSection::default()
            },
        );
        let (_app, store) = server.build_app();

        // The store was built with the configured policy.
        use otpgate_core::ChallengeStore;
        let issued = store.create("user@example.com").await.unwrap();
        assert_eq!(issued.code.len(), 4);
    }
}
