//! AgentVerify Core — shared building blocks for the trust-state engine:
//! the keyed store abstraction, the identifier-source capability, and
//! pagination types.

pub mod entropy;
pub mod store;
pub mod types;

pub use entropy::{to_base36, FixedIdentifierSource, IdentifierSource, SystemIdentifierSource};
pub use store::{KeyedStore, MemoryStore};
pub use types::Pagination;
