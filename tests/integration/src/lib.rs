//! Shared fixtures for the AgentVerify integration tests.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use agentverify_core::IdentifierSource;
use agentverify_platform::{PlatformClient, PlatformError, PlatformPost, PlatformProfile};
use chrono::{DateTime, Duration, Utc};

/// Clock/randomness source that can be advanced mid-test.
pub struct SteppingSource {
    millis: AtomicI64,
    pattern: String,
}

impl SteppingSource {
    pub fn at(millis: i64) -> Arc<Self> {
        Arc::new(Self {
            millis: AtomicI64::new(millis),
            pattern: "t".into(),
        })
    }

    pub fn advance(&self, delta: i64) {
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }
}

impl IdentifierSource for SteppingSource {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }

    fn random_base36(&self, len: usize) -> String {
        self.pattern.chars().cycle().take(len).collect()
    }
}

/// Scripted platform capability: one profile, a mutable post feed, and an
/// optional fault switch.
pub struct ScriptedPlatform {
    pub profile: PlatformProfile,
    posts: std::sync::RwLock<Vec<PlatformPost>>,
    fail_posts: std::sync::atomic::AtomicBool,
}

impl ScriptedPlatform {
    pub fn for_user(username: &str) -> Arc<Self> {
        Arc::new(Self {
            profile: profile_fixture(username, Utc::now() - Duration::days(100)),
            posts: std::sync::RwLock::new(Vec::new()),
            fail_posts: std::sync::atomic::AtomicBool::new(false),
        })
    }

    /// Publish a post to the scripted feed, newest first.
    pub fn publish(&self, content: &str) {
        self.posts.write().unwrap().insert(
            0,
            PlatformPost {
                content: content.to_string(),
            },
        );
    }

    /// Make subsequent post fetches fail as an external fault.
    pub fn break_posts_endpoint(&self) {
        self.fail_posts.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PlatformClient for ScriptedPlatform {
    async fn fetch_profile(&self, username: &str) -> Result<PlatformProfile, PlatformError> {
        if username == self.profile.username {
            Ok(self.profile.clone())
        } else {
            Err(PlatformError::ProfileNotFound(username.to_string()))
        }
    }

    async fn fetch_recent_posts(
        &self,
        _username: &str,
        limit: usize,
    ) -> Result<Vec<PlatformPost>, PlatformError> {
        if self.fail_posts.load(Ordering::SeqCst) {
            return Err(PlatformError::UnexpectedStatus {
                status: 503,
                context: "fetching posts".into(),
            });
        }
        Ok(self.posts.read().unwrap().iter().take(limit).cloned().collect())
    }
}

/// A plausible platform profile for tests.
pub fn profile_fixture(username: &str, created_at: DateTime<Utc>) -> PlatformProfile {
    PlatformProfile {
        username: username.to_string(),
        display_name: username.to_string(),
        bio: Some("autonomous agent".into()),
        avatar: None,
        created_at,
        followers: 40,
        following: 20,
        posts: 50,
        verified: false,
        platform: "moltbook".into(),
    }
}
