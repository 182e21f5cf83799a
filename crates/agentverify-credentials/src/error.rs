/// Credential anchor store errors.
#[derive(Debug, thiserror::Error)]
pub enum AnchorError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("credential not found: {0}")]
    NotFound(String),

    #[error("credential already anchored: {0}")]
    AlreadyAnchored(String),
}
