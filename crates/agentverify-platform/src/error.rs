/// Errors from the external platform capability.
///
/// Kept distinct from local-store errors so callers can choose retry or
/// user-facing messaging for external faults.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("agent not found on platform: {0}")]
    ProfileNotFound(String),

    #[error("platform request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("platform returned status {status} while {context}")]
    UnexpectedStatus { status: u16, context: String },
}

impl PlatformError {
    /// Whether this is a missing-profile condition rather than a service
    /// fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ProfileNotFound(_))
    }
}
