//! AgentVerify Reputation Engine
//!
//! Two independent scoring paths:
//! - the oracle path: stored records with a five-band tier over [0, 1000];
//! - the platform-derived path: a pure scoring function over platform
//!   metrics with its own, deliberately different, tier boundaries.

pub mod derived;
pub mod engine;
pub mod error;
pub mod tier;

pub use derived::{score_profile, DerivedMetrics, DerivedReputation, DerivedTier, PlatformScorer};
pub use engine::{
    InteractionCounts, ReputationEngine, ReputationMetrics, ReputationRecord, ReputationUpdate,
};
pub use error::ReputationError;
pub use tier::{Tier, MAX_SCORE};
