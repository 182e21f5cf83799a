/// DID registry errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("DID not found: {0}")]
    NotFound(String),

    #[error("duplicate DID: {0}")]
    DuplicateDid(String),
}
