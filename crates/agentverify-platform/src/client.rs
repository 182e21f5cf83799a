use std::time::Duration;

use async_trait::async_trait;

use crate::error::PlatformError;
use crate::schema::{PlatformPost, PlatformProfile, PostsBody, WireProfile};

/// Opaque platform capability: fetch a profile, fetch recent posts.
///
/// Injected wherever platform data is needed so tests can substitute a
/// scripted fake.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Fetch an agent's profile by username.
    async fn fetch_profile(&self, username: &str) -> Result<PlatformProfile, PlatformError>;

    /// Fetch an agent's most recent posts, newest first, at most `limit`.
    async fn fetch_recent_posts(
        &self,
        username: &str,
        limit: usize,
    ) -> Result<Vec<PlatformPost>, PlatformError>;
}

/// HTTP implementation of the platform capability.
pub struct HttpPlatformClient {
    http: reqwest::Client,
    base_url: String,
    platform: String,
    bearer_token: Option<String>,
}

impl HttpPlatformClient {
    /// Create a client against `base_url` (no trailing slash) with a
    /// bounded request timeout and an optional bearer credential.
    pub fn new(
        base_url: impl Into<String>,
        platform: impl Into<String>,
        bearer_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, PlatformError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            platform: platform.into(),
            bearer_token,
        })
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.http.get(url);
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl PlatformClient for HttpPlatformClient {
    async fn fetch_profile(&self, username: &str) -> Result<PlatformProfile, PlatformError> {
        let url = format!("{}/agents/{}", self.base_url, username);
        let response = self.get(&url).send().await?;

        if response.status().as_u16() == 404 {
            return Err(PlatformError::ProfileNotFound(username.to_string()));
        }
        if !response.status().is_success() {
            return Err(PlatformError::UnexpectedStatus {
                status: response.status().as_u16(),
                context: format!("fetching profile for {}", username),
            });
        }

        let wire: WireProfile = response.json().await?;
        tracing::debug!(username = username, "fetched platform profile");
        Ok(wire.normalize(&self.platform))
    }

    async fn fetch_recent_posts(
        &self,
        username: &str,
        limit: usize,
    ) -> Result<Vec<PlatformPost>, PlatformError> {
        let url = format!("{}/agents/{}/posts?limit={}", self.base_url, username, limit);
        let response = self.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(PlatformError::UnexpectedStatus {
                status: response.status().as_u16(),
                context: format!("fetching posts for {}", username),
            });
        }

        let body: PostsBody = response.json().await?;
        let posts = body.into_posts();
        tracing::debug!(username = username, count = posts.len(), "fetched recent posts");
        Ok(posts)
    }
}
