//! # Otpgate Memory Store
//!
//! An in-memory challenge store. Data is lost when the process exits and
//! is not shared across processes; a multi-node deployment needs a
//! `ChallengeStore` backed by a shared external cache instead.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use otpgate_store_memory::MemoryChallengeStore;
//!
//! let store = MemoryChallengeStore::new(MemoryStoreConfig::default());
//! let sweeper = store.spawn_sweeper(std::time::Duration::from_secs(300));
//! ```

use async_trait::async_trait;
use chrono::{Duration, Utc};
use otpgate_core::error::OtpResult;
use otpgate_core::traits::ChallengeStore;
use otpgate_core::types::{Challenge, IssuedChallenge};
use otpgate_otp_utils::OtpGenerator;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keyed challenge storage.
type Store = Arc<RwLock<HashMap<String, Challenge>>>;

/// Policy configuration for the memory store.
#[derive(Debug, Clone)]
pub struct MemoryStoreConfig {
    /// How long a challenge stays valid. Default: 10 minutes.
    pub ttl: Duration,
    /// Attempt ceiling; the record is deleted when the counter reaches it.
    /// Default: 3.
    pub max_attempts: u32,
    /// Digit length of generated codes. Default: 6.
    pub code_length: u32,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::minutes(10),
            max_attempts: 3,
            code_length: 6,
        }
    }
}

/// In-memory challenge store.
///
/// The keyed map is the only shared mutable resource in the system; every
/// operation takes the lock, runs to completion without suspending, and
/// releases it, so no interleaved partial state is observable.
#[derive(Debug, Clone)]
pub struct MemoryChallengeStore {
    challenges: Store,
    config: MemoryStoreConfig,
    generator: OtpGenerator,
}

impl MemoryChallengeStore {
    /// Creates a new in-memory store with the given policy.
    pub fn new(config: MemoryStoreConfig) -> Self {
        let generator = OtpGenerator::new(config.code_length);
        Self {
            challenges: Arc::new(RwLock::new(HashMap::new())),
            config,
            generator,
        }
    }

    /// Clears all stored challenges.
    pub async fn clear(&self) {
        self.challenges.write().await.clear();
    }

    /// Returns the number of challenges currently stored, expired or not.
    pub async fn challenge_count(&self) -> usize {
        self.challenges.read().await.len()
    }

    /// Spawns the periodic sweep task and returns its handle.
    ///
    /// The task runs until the handle is stopped or dropped, so owners must
    /// keep it alive for the lifetime of the store. A failed sweep is
    /// logged and the loop continues.
    pub fn spawn_sweeper(&self, every: std::time::Duration) -> SweeperHandle {
        let store = self.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately; skip it so the task
            // waits a full period before its first sweep.
            interval.tick().await;
            loop {
                interval.tick().await;
                match store.sweep().await {
                    Ok(0) => {}
                    Ok(removed) => {
                        tracing::debug!(removed, "swept expired challenges");
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "challenge sweep failed");
                    }
                }
            }
        });
        SweeperHandle { handle }
    }
}

impl Default for MemoryChallengeStore {
    fn default() -> Self {
        Self::new(MemoryStoreConfig::default())
    }
}

#[async_trait]
impl ChallengeStore for MemoryChallengeStore {
    async fn create(&self, identity: &str) -> OtpResult<IssuedChallenge> {
        let code = self.generator.generate_code();
        let session_id = self.generator.generate_session_id();
        let challenge = Challenge::new(&session_id, identity, &code, self.config.ttl);
        let expires_at = challenge.expires_at;

        self.challenges
            .write()
            .await
            .insert(session_id.clone(), challenge);

        Ok(IssuedChallenge {
            session_id,
            code,
            expires_at,
        })
    }

    async fn get(&self, session_id: &str) -> OtpResult<Option<Challenge>> {
        // Write lock: an expired record is deleted on read.
        let mut challenges = self.challenges.write().await;
        match challenges.get(session_id) {
            Some(challenge) if challenge.is_expired() => {
                challenges.remove(session_id);
                Ok(None)
            }
            Some(challenge) => Ok(Some(challenge.clone())),
            None => Ok(None),
        }
    }

    async fn increment_attempts(&self, session_id: &str) -> OtpResult<u32> {
        let mut challenges = self.challenges.write().await;
        let Some(challenge) = challenges.get_mut(session_id) else {
            return Ok(0);
        };

        challenge.attempts += 1;
        let attempts = challenge.attempts;
        if attempts >= self.config.max_attempts {
            challenges.remove(session_id);
        }
        Ok(attempts)
    }

    async fn is_max_attempts_reached(&self, session_id: &str) -> OtpResult<bool> {
        let challenges = self.challenges.read().await;
        Ok(challenges
            .get(session_id)
            .map(|c| c.attempts >= self.config.max_attempts)
            .unwrap_or(false))
    }

    async fn remove(&self, session_id: &str) -> OtpResult<()> {
        self.challenges.write().await.remove(session_id);
        Ok(())
    }

    async fn sweep(&self) -> OtpResult<usize> {
        let mut challenges = self.challenges.write().await;
        let before = challenges.len();
        let now = Utc::now();
        challenges.retain(|_, c| now <= c.expires_at);
        Ok(before - challenges.len())
    }
}

/// Handle to a running sweep task.
///
/// Aborts the task when stopped or dropped, so the sweeper's lifetime is
/// deterministic in tests as well as in the server.
#[derive(Debug)]
pub struct SweeperHandle {
    handle: tokio::task::JoinHandle<()>,
}

impl SweeperHandle {
    /// Stops the sweep task.
    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
