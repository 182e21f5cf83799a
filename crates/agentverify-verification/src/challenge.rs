use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agentverify_core::{IdentifierSource, KeyedStore, MemoryStore, SystemIdentifierSource};
use agentverify_platform::PlatformClient;

use crate::error::VerificationError;

/// Namespace tag embedded in every challenge string.
const CHALLENGE_NAMESPACE: &str = "agent-verify";

/// Challenge time-to-live: 15 minutes.
const CHALLENGE_TTL_MILLIS: i64 = 15 * 60 * 1000;

/// Length of the random nonce embedded in a challenge.
const NONCE_LEN: usize = 8;

/// How many recent posts are checked during verification.
const POSTS_PAGE_SIZE: usize = 5;

/// A time-bound ownership challenge for one username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub username: String,
    /// Full challenge string the agent must post verbatim:
    /// `agent-verify:<username>:<nonce>:<timestamp>`.
    pub challenge: String,
    pub nonce: String,
    /// Issue instant, Unix milliseconds.
    pub timestamp: i64,
    /// Expiry instant, Unix milliseconds.
    #[serde(rename = "expiresAt")]
    pub expires_at: i64,
    /// Human-readable posting instructions.
    pub instructions: String,
}

impl Challenge {
    /// Whether the challenge is past its TTL at `now_millis`.
    pub fn is_expired(&self, now_millis: i64) -> bool {
        now_millis > self.expires_at
    }
}

/// Result of an ownership verification attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnershipReport {
    pub username: String,
    pub verified: bool,
    #[serde(rename = "checkedAt")]
    pub checked_at: DateTime<Utc>,
    #[serde(rename = "postsChecked")]
    pub posts_checked: usize,
    /// The challenge string that was checked for.
    pub challenge: String,
}

/// Issues and verifies ownership challenges.
///
/// At most one live challenge exists per username; generating a new one
/// overwrites the prior. Expiry is evaluated lazily at read time, so the
/// periodic sweep is space reclamation only.
pub struct ChallengeManager<S: KeyedStore<Challenge> = MemoryStore<Challenge>> {
    store: S,
    source: Arc<dyn IdentifierSource>,
    platform: Arc<dyn PlatformClient>,
}

impl ChallengeManager<MemoryStore<Challenge>> {
    /// Create a manager over an in-memory store and the system clock.
    pub fn new(platform: Arc<dyn PlatformClient>) -> Self {
        Self::with_parts(MemoryStore::new(), Arc::new(SystemIdentifierSource), platform)
    }
}

impl<S: KeyedStore<Challenge>> ChallengeManager<S> {
    /// Create a manager from explicit parts.
    pub fn with_parts(
        store: S,
        source: Arc<dyn IdentifierSource>,
        platform: Arc<dyn PlatformClient>,
    ) -> Self {
        Self {
            store,
            source,
            platform,
        }
    }

    /// Generate a challenge for `username`, overwriting any prior one.
    pub fn generate_challenge(&self, username: &str) -> Result<Challenge, VerificationError> {
        if username.is_empty() {
            return Err(VerificationError::MissingUsername);
        }

        let nonce = self.source.random_base36(NONCE_LEN);
        let timestamp = self.source.now_millis();
        let challenge_string = format!(
            "{}:{}:{}:{}",
            CHALLENGE_NAMESPACE, username, nonce, timestamp
        );

        let challenge = Challenge {
            username: username.to_string(),
            instructions: format!(
                "Post this exact string from your platform account: \"{}\"",
                challenge_string
            ),
            challenge: challenge_string,
            nonce,
            timestamp,
            expires_at: timestamp + CHALLENGE_TTL_MILLIS,
        };

        self.store.put(username.to_string(), challenge.clone());
        tracing::info!(username = username, "ownership challenge generated");
        Ok(challenge)
    }

    /// Verify account ownership for `username`.
    ///
    /// Requires a live challenge. The challenge is consumed only when
    /// verification succeeds; a failed match leaves it available for retry
    /// until it expires. Platform faults propagate as errors, never as
    /// `verified=false`.
    pub async fn verify_ownership(
        &self,
        username: &str,
    ) -> Result<OwnershipReport, VerificationError> {
        if username.is_empty() {
            return Err(VerificationError::MissingUsername);
        }

        let challenge = self
            .store
            .get(username)
            .ok_or_else(|| VerificationError::NoChallenge(username.to_string()))?;

        if challenge.is_expired(self.source.now_millis()) {
            self.store.remove(username);
            return Err(VerificationError::ChallengeExpired(username.to_string()));
        }

        let posts = self
            .platform
            .fetch_recent_posts(username, POSTS_PAGE_SIZE)
            .await?;

        let verified = posts
            .iter()
            .any(|post| post.content.contains(&challenge.challenge));

        if verified {
            self.store.remove(username);
        }

        tracing::info!(
            username = username,
            verified = verified,
            posts_checked = posts.len(),
            "ownership verification attempt"
        );

        Ok(OwnershipReport {
            username: username.to_string(),
            verified,
            checked_at: DateTime::<Utc>::from_timestamp_millis(self.source.now_millis())
                .unwrap_or_else(Utc::now),
            posts_checked: posts.len(),
            challenge: challenge.challenge,
        })
    }

    /// Remove expired challenges. Best-effort space reclamation; never
    /// required for correctness. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.source.now_millis();
        let before = self.store.len();
        self.store.retain(&mut |_, challenge| !challenge.is_expired(now));
        let removed = before - self.store.len();
        if removed > 0 {
            tracing::debug!(removed = removed, "purged expired challenges");
        }
        removed
    }

    /// Number of stored challenges, expired or not.
    pub fn count(&self) -> usize {
        self.store.len()
    }
}
