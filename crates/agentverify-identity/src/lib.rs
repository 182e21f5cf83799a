//! AgentVerify Identity Layer
//!
//! Decentralized identity primitives for autonomous agents:
//! - Identifier codec (DID construction + one-way digest)
//! - DID Documents (W3C-compatible)
//! - DID registry with lifecycle management

pub mod codec;
pub mod document;
pub mod error;
pub mod registry;

pub use codec::{did_hash, mint_did, slugify};
pub use document::{AgentMetadata, DidDocument, ServiceEndpoint, VerificationMethod};
pub use error::RegistryError;
pub use registry::{DidListEntry, DidListPage, DidRecord, DidRegistry, DidStatus};
