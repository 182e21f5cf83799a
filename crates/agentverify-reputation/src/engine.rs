use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agentverify_core::{IdentifierSource, KeyedStore, MemoryStore, SystemIdentifierSource};

use crate::error::ReputationError;
use crate::tier::{Tier, MAX_SCORE};

/// Named reputation sub-scores supplied by the oracle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationMetrics {
    #[serde(default)]
    pub reliability: u32,
    #[serde(rename = "taskCompletion", default)]
    pub task_completion: u32,
    #[serde(default)]
    pub security: u32,
    #[serde(default)]
    pub timeliness: u32,
    #[serde(rename = "peerEndorsements", default)]
    pub peer_endorsements: u32,
}

/// Interaction counters attached to a reputation record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionCounts {
    pub total: u64,
    pub successful: u64,
    pub disputed: u64,
    pub failed: u64,
}

/// A stored reputation record for one DID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReputationRecord {
    pub did: String,
    pub score: u32,
    #[serde(rename = "maxScore")]
    pub max_score: u32,
    pub tier: Tier,
    pub metrics: ReputationMetrics,
    pub interactions: InteractionCounts,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ReputationRecord {
    /// Zero-valued default returned for DIDs with no stored reputation.
    pub fn unrated(did: &str) -> Self {
        Self {
            did: did.to_string(),
            score: 0,
            max_score: MAX_SCORE,
            tier: Tier::Unrated,
            metrics: ReputationMetrics::default(),
            interactions: InteractionCounts::default(),
            updated_at: None,
        }
    }
}

/// Oracle-supplied reputation update. The tier is never supplied: it is
/// recomputed from the score, and `disputed` always resets to zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReputationUpdate {
    pub score: i64,
    #[serde(default)]
    pub reliability: u32,
    #[serde(rename = "taskCompletion", default)]
    pub task_completion: u32,
    #[serde(default)]
    pub security: u32,
    #[serde(default)]
    pub timeliness: u32,
    #[serde(rename = "peerEndorsements", default)]
    pub peer_endorsements: u32,
    #[serde(rename = "totalInteractions", default)]
    pub total_interactions: u64,
    #[serde(rename = "successfulInteractions", default)]
    pub successful_interactions: u64,
}

/// Owns did → reputation records for the oracle scoring path.
pub struct ReputationEngine<S: KeyedStore<ReputationRecord> = MemoryStore<ReputationRecord>> {
    store: S,
    source: Arc<dyn IdentifierSource>,
}

impl ReputationEngine<MemoryStore<ReputationRecord>> {
    /// Create an engine over an in-memory store and the system clock.
    pub fn new() -> Self {
        Self::with_parts(MemoryStore::new(), Arc::new(SystemIdentifierSource))
    }
}

impl Default for ReputationEngine<MemoryStore<ReputationRecord>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: KeyedStore<ReputationRecord>> ReputationEngine<S> {
    /// Create an engine from explicit parts.
    pub fn with_parts(store: S, source: Arc<dyn IdentifierSource>) -> Self {
        Self { store, source }
    }

    /// Get the reputation record for `did`.
    ///
    /// An absent key reads as the zero-valued default, never an error.
    pub fn get(&self, did: &str) -> ReputationRecord {
        self.store
            .get(did)
            .unwrap_or_else(|| ReputationRecord::unrated(did))
    }

    /// Overwrite the reputation record for `did` from an oracle update.
    ///
    /// The record is replaced wholesale; there is no partial merge.
    /// `failed` is derived from the interaction totals and `disputed`
    /// resets to zero.
    pub fn update(
        &self,
        did: &str,
        update: ReputationUpdate,
    ) -> Result<ReputationRecord, ReputationError> {
        if update.score < 0 || update.score > i64::from(MAX_SCORE) {
            return Err(ReputationError::ScoreOutOfRange(update.score));
        }
        let score = update.score as u32;
        let tier = Tier::for_score(score);

        let record = ReputationRecord {
            did: did.to_string(),
            score,
            max_score: MAX_SCORE,
            tier,
            metrics: ReputationMetrics {
                reliability: update.reliability,
                task_completion: update.task_completion,
                security: update.security,
                timeliness: update.timeliness,
                peer_endorsements: update.peer_endorsements,
            },
            interactions: InteractionCounts {
                total: update.total_interactions,
                successful: update.successful_interactions,
                disputed: 0,
                failed: update
                    .total_interactions
                    .saturating_sub(update.successful_interactions),
            },
            updated_at: DateTime::<Utc>::from_timestamp_millis(self.source.now_millis()),
        };

        self.store.put(did.to_string(), record.clone());
        tracing::info!(did = did, score = score, tier = %tier, "reputation updated");
        Ok(record)
    }

    /// Top records by score descending, optionally filtered to one tier,
    /// truncated to `limit`. Ties order deterministically by DID.
    pub fn leaderboard(&self, limit: usize, tier: Option<Tier>) -> Vec<ReputationRecord> {
        let mut records: Vec<ReputationRecord> = self
            .store
            .values()
            .into_iter()
            .filter(|record| tier.map_or(true, |t| record.tier == t))
            .collect();
        records.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.did.cmp(&b.did)));
        records.truncate(limit);
        records
    }

    /// Number of stored reputation records.
    pub fn count(&self) -> usize {
        self.store.len()
    }
}
