use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agentverify_core::{
    IdentifierSource, KeyedStore, MemoryStore, Pagination, SystemIdentifierSource,
};

use crate::codec::{did_hash, mint_did};
use crate::document::DidDocument;
use crate::error::RegistryError;

/// A registered DID and its associated state.
///
/// Records are never physically deleted; deactivation flips `active`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DidRecord {
    /// The full DID string.
    pub did: String,
    /// Hex BLAKE3 digest of `did`. Immutable once created.
    #[serde(rename = "didHash")]
    pub did_hash: String,
    /// The identity document.
    pub document: DidDocument,
    /// Opaque staked amount.
    pub stake: String,
    /// Whether the DID is active.
    pub active: bool,
    /// When the record was created.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Insertion sequence, used for stable listing order.
    #[serde(skip)]
    pub(crate) seq: u64,
}

/// Status projection of a DID record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DidStatus {
    pub did: String,
    #[serde(rename = "didHash")]
    pub did_hash: String,
    pub active: bool,
    pub stake: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// One entry of a paginated DID listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DidListEntry {
    pub did: String,
    pub name: String,
    pub platform: String,
    pub active: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A page of DID listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DidListPage {
    pub dids: Vec<DidListEntry>,
    pub pagination: Pagination,
}

/// Owns DID records and their lifecycle: register, resolve, status,
/// deactivate, list.
pub struct DidRegistry<S: KeyedStore<DidRecord> = MemoryStore<DidRecord>> {
    store: S,
    source: Arc<dyn IdentifierSource>,
    next_seq: AtomicU64,
}

impl DidRegistry<MemoryStore<DidRecord>> {
    /// Create a registry backed by an in-memory store and the system clock.
    pub fn new() -> Self {
        Self::with_parts(MemoryStore::new(), Arc::new(SystemIdentifierSource))
    }

    /// Create a registry with an injected identifier source.
    pub fn with_source(source: Arc<dyn IdentifierSource>) -> Self {
        Self::with_parts(MemoryStore::new(), source)
    }
}

impl Default for DidRegistry<MemoryStore<DidRecord>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: KeyedStore<DidRecord>> DidRegistry<S> {
    /// Create a registry from an explicit store and identifier source.
    pub fn with_parts(store: S, source: Arc<dyn IdentifierSource>) -> Self {
        Self {
            store,
            source,
            next_seq: AtomicU64::new(0),
        }
    }

    /// Register a new agent DID.
    ///
    /// Mints the DID from the platform, a slug of the agent name, a base36
    /// millisecond timestamp, and a random suffix; computes the digest; and
    /// builds the identity document with `public_key` as the sole
    /// verification method.
    pub fn register(
        &self,
        platform: &str,
        agent_name: &str,
        public_key: &str,
        stake: Option<String>,
    ) -> Result<DidRecord, RegistryError> {
        if platform.is_empty() {
            return Err(RegistryError::MissingField("platform"));
        }
        if agent_name.is_empty() {
            return Err(RegistryError::MissingField("agentName"));
        }
        if public_key.is_empty() {
            return Err(RegistryError::MissingField("publicKey"));
        }

        let did = mint_did(platform, agent_name, self.source.as_ref());
        let hash = did_hash(&did);
        let created_at = DateTime::<Utc>::from_timestamp_millis(self.source.now_millis())
            .unwrap_or_else(Utc::now);
        let document = DidDocument::new(&did, agent_name, platform, public_key, created_at);

        let record = DidRecord {
            did: did.clone(),
            did_hash: hash,
            document,
            stake: stake.unwrap_or_else(|| "0".to_string()),
            active: true,
            created_at,
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
        };

        self.store
            .put_if_absent(did.clone(), record.clone())
            .map_err(|_| RegistryError::DuplicateDid(did.clone()))?;

        tracing::info!(did = %did, platform = platform, "DID registered");
        Ok(record)
    }

    /// Resolve a DID to its identity document.
    ///
    /// Only the local store is consulted; there is no on-chain fallback.
    pub fn resolve(&self, did: &str) -> Result<DidDocument, RegistryError> {
        self.store
            .get(did)
            .map(|record| record.document)
            .ok_or_else(|| RegistryError::NotFound(did.to_string()))
    }

    /// Get the status projection for a DID.
    pub fn status(&self, did: &str) -> Result<DidStatus, RegistryError> {
        self.store
            .get(did)
            .map(|record| DidStatus {
                did: record.did,
                did_hash: record.did_hash,
                active: record.active,
                stake: record.stake,
                created_at: record.created_at,
            })
            .ok_or_else(|| RegistryError::NotFound(did.to_string()))
    }

    /// Deactivate a DID: flips `active` to false on both the record and its
    /// embedded document. No authorization check is performed.
    pub fn deactivate(&self, did: &str) -> Result<(), RegistryError> {
        self.store
            .mutate(did, &mut |record| {
                record.active = false;
                record.document.active = false;
            })
            .ok_or_else(|| RegistryError::NotFound(did.to_string()))?;

        tracing::info!(did = did, "DID deactivated");
        Ok(())
    }

    /// List registered DIDs in insertion order, paginated.
    pub fn list(&self, page: usize, limit: usize) -> DidListPage {
        let mut records = self.store.values();
        records.sort_by_key(|record| record.seq);

        let pagination = Pagination::new(page, limit, records.len());
        let dids = records
            .into_iter()
            .skip(pagination.offset())
            .take(pagination.limit)
            .map(|record| DidListEntry {
                did: record.did,
                name: record.document.agent_metadata.name.clone(),
                platform: record.document.agent_metadata.platform.clone(),
                active: record.active,
                created_at: record.created_at,
            })
            .collect();

        DidListPage { dids, pagination }
    }

    /// Number of registered DIDs.
    pub fn count(&self) -> usize {
        self.store.len()
    }
}
