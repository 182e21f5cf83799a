//! AgentVerify Credential Anchors
//!
//! Records credential hashes as anchored against a DID digest, with a
//! one-way revocation switch and read-time expiration. Revocation always
//! takes precedence over expiration when reporting state.

pub mod anchor;
pub mod error;
pub mod store;

pub use anchor::{AnchorState, AnchorSummary, CredentialAnchor, VerificationReport, VerifyOutcome};
pub use error::AnchorError;
pub use store::AnchorStore;
