//! Platform-derived reputation: a pure scoring function over platform
//! metrics, independent of the oracle path.
//!
//! This path uses its own tier boundaries (bronze < 400, silver < 600,
//! gold < 800, platinum >= 800). They do NOT match the oracle-path bands
//! and the divergence is intentional; do not unify them.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agentverify_core::{IdentifierSource, SystemIdentifierSource};
use agentverify_platform::{PlatformClient, PlatformProfile};

use crate::error::ReputationError;
use crate::tier::MAX_SCORE;

/// Component caps for the derived score.
const AGE_CAP: u32 = 200;
const FOLLOWERS_CAP: u32 = 300;
const POSTS_CAP: u32 = 200;
const RATIO_CAP: u32 = 100;
const VERIFIED_BONUS: u32 = 200;

/// Tier for the platform-derived scoring path. There is no unrated band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DerivedTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl DerivedTier {
    /// Tier for a derived score: platinum >= 800, gold >= 600,
    /// silver >= 400, bronze otherwise.
    pub fn for_score(score: u32) -> Self {
        if score >= 800 {
            Self::Platinum
        } else if score >= 600 {
            Self::Gold
        } else if score >= 400 {
            Self::Silver
        } else {
            Self::Bronze
        }
    }
}

impl fmt::Display for DerivedTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bronze => write!(f, "bronze"),
            Self::Silver => write!(f, "silver"),
            Self::Gold => write!(f, "gold"),
            Self::Platinum => write!(f, "platinum"),
        }
    }
}

/// Raw metrics the derived score was computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedMetrics {
    #[serde(rename = "ageDays")]
    pub age_days: u64,
    pub followers: u64,
    pub following: u64,
    pub posts: u64,
    #[serde(rename = "platformVerified")]
    pub platform_verified: bool,
}

/// A reputation snapshot derived from platform activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedReputation {
    pub username: String,
    pub score: u32,
    #[serde(rename = "maxScore")]
    pub max_score: u32,
    pub tier: DerivedTier,
    pub metrics: DerivedMetrics,
    #[serde(rename = "calculatedAt")]
    pub calculated_at: DateTime<Utc>,
}

/// Score a platform profile at instant `now`.
///
/// Components: account age (2/day, capped), followers (0.5 each, capped),
/// posts (0.2 each, capped), a follower-ratio bonus when followers exceed
/// following and 10, and a flat bonus for platform verification. The total
/// is clamped to 1000.
pub fn score_profile(profile: &PlatformProfile, now: DateTime<Utc>) -> DerivedReputation {
    let age_days = ((now - profile.created_at).num_seconds().max(0) as f64) / 86_400.0;

    let mut score = AGE_CAP.min((age_days * 2.0).floor() as u32);
    score += FOLLOWERS_CAP.min((profile.followers as f64 * 0.5).floor() as u32);
    score += POSTS_CAP.min((profile.posts as f64 * 0.2).floor() as u32);

    if profile.followers > profile.following && profile.followers > 10 {
        let ratio = profile.followers as f64 / profile.following.max(1) as f64;
        score += RATIO_CAP.min((ratio * 20.0).floor() as u32);
    }

    if profile.verified {
        score += VERIFIED_BONUS;
    }

    let score = score.min(MAX_SCORE);

    DerivedReputation {
        username: profile.username.clone(),
        score,
        max_score: MAX_SCORE,
        tier: DerivedTier::for_score(score),
        metrics: DerivedMetrics {
            age_days: age_days.floor() as u64,
            followers: profile.followers,
            following: profile.following,
            posts: profile.posts,
            platform_verified: profile.verified,
        },
        calculated_at: now,
    }
}

/// Fetches a profile from the platform capability and scores it.
pub struct PlatformScorer {
    platform: Arc<dyn PlatformClient>,
    source: Arc<dyn IdentifierSource>,
}

impl PlatformScorer {
    /// Create a scorer over the platform capability and the system clock.
    pub fn new(platform: Arc<dyn PlatformClient>) -> Self {
        Self::with_source(platform, Arc::new(SystemIdentifierSource))
    }

    /// Create a scorer with an injected clock source.
    pub fn with_source(
        platform: Arc<dyn PlatformClient>,
        source: Arc<dyn IdentifierSource>,
    ) -> Self {
        Self { platform, source }
    }

    /// Fetch `username`'s profile and derive a reputation snapshot.
    ///
    /// Unknown profiles and platform faults propagate as errors; local
    /// state is never touched.
    pub async fn derive(&self, username: &str) -> Result<DerivedReputation, ReputationError> {
        let profile = self.platform.fetch_profile(username).await?;
        let now = DateTime::<Utc>::from_timestamp_millis(self.source.now_millis())
            .unwrap_or_else(Utc::now);
        let snapshot = score_profile(&profile, now);
        tracing::debug!(
            username = username,
            score = snapshot.score,
            tier = %snapshot.tier,
            "derived platform reputation"
        );
        Ok(snapshot)
    }
}
