use agentverify_platform::PlatformError;

/// Reputation engine errors.
#[derive(Debug, thiserror::Error)]
pub enum ReputationError {
    #[error("score must be between 0 and 1000, got {0}")]
    ScoreOutOfRange(i64),

    #[error(transparent)]
    Platform(#[from] PlatformError),
}
