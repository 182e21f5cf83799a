use agentverify_platform::PlatformError;

/// Ownership-verification errors.
///
/// Expired challenges are a distinct kind from missing ones, and external
/// platform faults are never collapsed into a failed verification.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("username is required")]
    MissingUsername,

    #[error("no challenge found for {0}; generate one first")]
    NoChallenge(String),

    #[error("challenge for {0} expired; generate a new one")]
    ChallengeExpired(String),

    #[error(transparent)]
    Platform(#[from] PlatformError),
}
