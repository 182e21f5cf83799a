//! Wire schema for the external platform API, with defaulting rules
//! applied once here rather than scattered through call sites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized platform profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformProfile {
    pub username: String,
    /// Display name; falls back to the username when the platform omits it.
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    /// Account creation instant.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub followers: u64,
    pub following: u64,
    pub posts: u64,
    pub verified: bool,
    /// Platform label this profile was fetched from.
    pub platform: String,
}

/// Profile shape as returned by `GET /agents/{username}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireProfile {
    pub username: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "followersCount", default)]
    pub followers_count: u64,
    #[serde(rename = "followingCount", default)]
    pub following_count: u64,
    #[serde(rename = "postsCount", default)]
    pub posts_count: u64,
    #[serde(default)]
    pub verified: bool,
}

impl WireProfile {
    /// Apply defaulting rules and tag with the platform label.
    pub(crate) fn normalize(self, platform: &str) -> PlatformProfile {
        PlatformProfile {
            display_name: self.display_name.unwrap_or_else(|| self.username.clone()),
            username: self.username,
            bio: self.bio,
            avatar: self.avatar,
            created_at: self.created_at,
            followers: self.followers_count,
            following: self.following_count,
            posts: self.posts_count,
            verified: self.verified,
            platform: platform.to_string(),
        }
    }
}

/// A post from the platform's recent-posts feed. Only the content matters
/// for ownership verification; everything else is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformPost {
    #[serde(default)]
    pub content: String,
}

/// The posts endpoint returns either `{"posts": [...]}` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PostsBody {
    Wrapped { posts: Vec<PlatformPost> },
    Bare(Vec<PlatformPost>),
}

impl PostsBody {
    pub(crate) fn into_posts(self) -> Vec<PlatformPost> {
        match self {
            Self::Wrapped { posts } => posts,
            Self::Bare(posts) => posts,
        }
    }
}
