//! AgentVerify Ownership Verification
//!
//! Proves control of an external platform account via challenge-response:
//! the service issues a time-bound nonce string, the agent posts it from
//! the account, and verification checks the account's recent posts for the
//! exact string.

pub mod challenge;
pub mod error;

pub use challenge::{Challenge, ChallengeManager, OwnershipReport};
pub use error::VerificationError;
