use std::sync::Arc;

use chrono::{DateTime, Utc};

use agentverify_core::{IdentifierSource, KeyedStore, MemoryStore, SystemIdentifierSource};

use crate::anchor::{AnchorSummary, CredentialAnchor, VerifyOutcome};
use crate::error::AnchorError;

/// Fallback reason recorded when a revocation supplies none.
const DEFAULT_REVOCATION_REASON: &str = "No reason provided";

/// Owns credential anchors keyed by credential hash.
///
/// Expiry is evaluated lazily against the clock at read time; no sweep is
/// required for correctness.
pub struct AnchorStore<S: KeyedStore<CredentialAnchor> = MemoryStore<CredentialAnchor>> {
    store: S,
    source: Arc<dyn IdentifierSource>,
}

impl AnchorStore<MemoryStore<CredentialAnchor>> {
    /// Create a store backed by memory and the system clock.
    pub fn new() -> Self {
        Self::with_parts(MemoryStore::new(), Arc::new(SystemIdentifierSource))
    }

    /// Create a store with an injected clock source.
    pub fn with_source(source: Arc<dyn IdentifierSource>) -> Self {
        Self::with_parts(MemoryStore::new(), source)
    }
}

impl Default for AnchorStore<MemoryStore<CredentialAnchor>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: KeyedStore<CredentialAnchor>> AnchorStore<S> {
    /// Create a store from an explicit backing store and clock source.
    pub fn with_parts(store: S, source: Arc<dyn IdentifierSource>) -> Self {
        Self { store, source }
    }

    fn now(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(self.source.now_millis()).unwrap_or_else(Utc::now)
    }

    /// Anchor a credential hash against a DID digest.
    ///
    /// A hash is anchored at most once; a second attempt is a conflict,
    /// never an update.
    pub fn anchor(
        &self,
        credential_hash: &str,
        did_hash: &str,
        credential_type: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<CredentialAnchor, AnchorError> {
        if credential_hash.is_empty() {
            return Err(AnchorError::MissingField("credentialHash"));
        }
        if did_hash.is_empty() {
            return Err(AnchorError::MissingField("didHash"));
        }
        if credential_type.is_empty() {
            return Err(AnchorError::MissingField("credentialType"));
        }

        let anchor = CredentialAnchor {
            credential_hash: credential_hash.to_string(),
            did_hash: did_hash.to_string(),
            credential_type: credential_type.to_string(),
            issued_at: self.now(),
            expires_at,
            revoked: false,
            revoked_at: None,
            revocation_reason: None,
        };

        self.store
            .put_if_absent(credential_hash.to_string(), anchor.clone())
            .map_err(|_| AnchorError::AlreadyAnchored(credential_hash.to_string()))?;

        tracing::info!(
            credential_hash = credential_hash,
            did_hash = did_hash,
            credential_type = credential_type,
            "credential anchored"
        );
        Ok(anchor)
    }

    /// Verify a credential hash.
    ///
    /// Revocation is checked before expiration: a revoked-and-expired
    /// credential reports revoked. Not-found is a structured outcome,
    /// not an error.
    pub fn verify(&self, credential_hash: &str) -> VerifyOutcome {
        let Some(anchor) = self.store.get(credential_hash) else {
            return VerifyOutcome::NotFound;
        };

        if anchor.revoked {
            return VerifyOutcome::Revoked {
                anchored_at: anchor.issued_at,
            };
        }

        let now = self.now();
        if let Some(expires) = anchor.expires_at {
            if now > expires {
                return VerifyOutcome::Expired {
                    anchored_at: anchor.issued_at,
                    expired_at: expires,
                };
            }
        }

        VerifyOutcome::Valid {
            anchored_at: anchor.issued_at,
            expires_at: anchor.expires_at,
            did_hash: anchor.did_hash,
            credential_type: anchor.credential_type,
        }
    }

    /// Revoke a credential. One-way and idempotent: a second call succeeds
    /// and overwrites the recorded reason.
    pub fn revoke(
        &self,
        credential_hash: &str,
        reason: Option<String>,
    ) -> Result<CredentialAnchor, AnchorError> {
        let now = self.now();
        let revoked = self
            .store
            .mutate(credential_hash, &mut |anchor| {
                anchor.revoked = true;
                anchor.revoked_at = Some(now);
                anchor.revocation_reason = Some(
                    reason
                        .clone()
                        .unwrap_or_else(|| DEFAULT_REVOCATION_REASON.to_string()),
                );
            })
            .ok_or_else(|| AnchorError::NotFound(credential_hash.to_string()))?;

        tracing::info!(credential_hash = credential_hash, "credential revoked");
        Ok(revoked)
    }

    /// List all anchors recorded against a DID digest, with lifecycle
    /// state computed at read time.
    pub fn list_by_did(&self, did_hash: &str) -> Vec<AnchorSummary> {
        let now = self.now();
        let mut anchors: Vec<CredentialAnchor> = self
            .store
            .values()
            .into_iter()
            .filter(|anchor| anchor.did_hash == did_hash)
            .collect();
        anchors.sort_by(|a, b| {
            a.issued_at
                .cmp(&b.issued_at)
                .then_with(|| a.credential_hash.cmp(&b.credential_hash))
        });

        anchors
            .into_iter()
            .map(|anchor| AnchorSummary {
                status: anchor.state(now),
                credential_hash: anchor.credential_hash,
                credential_type: anchor.credential_type,
                issued_at: anchor.issued_at,
                expires_at: anchor.expires_at,
                revoked: anchor.revoked,
            })
            .collect()
    }

    /// Number of anchored credentials.
    pub fn count(&self) -> usize {
        self.store.len()
    }
}
