//! Integration test: DID registration through credential anchoring,
//! verification, and revocation across crates.

use std::sync::Arc;

use chrono::{Duration, Utc};

use agentverify_core::FixedIdentifierSource;
use agentverify_credentials::{AnchorError, AnchorState, AnchorStore, VerifyOutcome};
use agentverify_identity::{did_hash, DidRegistry, RegistryError};

#[test]
fn test_register_anchor_verify_revoke_lifecycle() {
    let registry = DidRegistry::new();
    let anchors = AnchorStore::new();

    // Register the agent and anchor a credential against its digest.
    let record = registry
        .register("moltbook", "Clawdius", "z6MkClawdius", Some("250".into()))
        .expect("registration should succeed");
    assert_eq!(record.did_hash, did_hash(&record.did));

    let anchor = anchors
        .anchor("0xkyc-hash", &record.did_hash, "KycBasic", None)
        .expect("anchoring should succeed");
    assert_eq!(anchor.did_hash, record.did_hash);

    // The credential verifies while active.
    let outcome = anchors.verify("0xkyc-hash");
    assert!(outcome.is_valid());
    match outcome {
        VerifyOutcome::Valid { did_hash, .. } => assert_eq!(did_hash, record.did_hash),
        other => panic!("expected valid outcome, got {:?}", other),
    }

    // Revoke, then verify reports revoked.
    anchors
        .revoke("0xkyc-hash", Some("key compromised".into()))
        .expect("revocation should succeed");
    let report = anchors.verify("0xkyc-hash").to_report();
    assert!(!report.valid);
    assert_eq!(report.reason, "Credential revoked");

    // The listing reflects the revoked state at read time.
    let listed = anchors.list_by_did(&record.did_hash);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, AnchorState::Revoked);
}

#[test]
fn test_duplicate_anchor_conflict_preserves_first_anchor() {
    let anchors = AnchorStore::new();
    let first = anchors
        .anchor("0xcred", "0xdid-a", "KycBasic", None)
        .unwrap();

    let second = anchors.anchor("0xcred", "0xdid-b", "Residency", None);
    assert!(matches!(second, Err(AnchorError::AlreadyAnchored(_))));

    match anchors.verify("0xcred") {
        VerifyOutcome::Valid {
            anchored_at,
            did_hash,
            credential_type,
            ..
        } => {
            assert_eq!(anchored_at, first.issued_at);
            assert_eq!(did_hash, "0xdid-a");
            assert_eq!(credential_type, "KycBasic");
        }
        other => panic!("expected valid outcome, got {:?}", other),
    }
}

#[test]
fn test_revoked_beats_expired_everywhere() {
    let anchors = AnchorStore::new();
    anchors
        .anchor(
            "0xcred",
            "0xdid",
            "KycBasic",
            Some(Utc::now() - Duration::hours(2)),
        )
        .unwrap();
    anchors.revoke("0xcred", None).unwrap();

    // verify() reports revoked, never expired.
    assert_eq!(anchors.verify("0xcred").to_report().reason, "Credential revoked");

    // list_by_did uses the same precedence.
    let listed = anchors.list_by_did("0xdid");
    assert_eq!(listed[0].status, AnchorState::Revoked);
}

#[test]
fn test_deactivated_did_still_resolves_and_keeps_anchors() {
    let registry = DidRegistry::new();
    let anchors = AnchorStore::new();

    let record = registry
        .register("moltbook", "alice", "pk", None)
        .unwrap();
    anchors
        .anchor("0xcred", &record.did_hash, "KycBasic", None)
        .unwrap();

    registry.deactivate(&record.did).unwrap();

    // Deactivation is not deletion: the document resolves with
    // active=false and anchors remain verifiable.
    let doc = registry.resolve(&record.did).unwrap();
    assert!(!doc.active);
    assert!(anchors.verify("0xcred").is_valid());
}

#[test]
fn test_anchor_accepts_unknown_did_hash() {
    // The didHash foreign reference is deliberately not checked against
    // the registry.
    let anchors = AnchorStore::new();
    let anchor = anchors.anchor("0xcred", "0xnever-registered", "KycBasic", None);
    assert!(anchor.is_ok());
}

#[test]
fn test_same_agent_registered_twice_gets_distinct_identities() {
    let registry = DidRegistry::new();
    let a = registry.register("moltbook", "alice", "pk", None).unwrap();
    let b = registry.register("moltbook", "alice", "pk", None).unwrap();

    assert_ne!(a.did, b.did);
    assert_ne!(a.did_hash, b.did_hash);

    // Both resolve independently.
    assert_eq!(registry.resolve(&a.did).unwrap().id, a.did);
    assert_eq!(registry.resolve(&b.did).unwrap().id, b.did);
}

#[test]
fn test_unknown_did_operations_fail_not_found() {
    let registry = DidRegistry::new();
    let missing = "did:agent:moltbook:ghost-zz-00000000";
    assert!(matches!(
        registry.resolve(missing),
        Err(RegistryError::NotFound(_))
    ));
    assert!(matches!(
        registry.status(missing),
        Err(RegistryError::NotFound(_))
    ));
    assert!(matches!(
        registry.deactivate(missing),
        Err(RegistryError::NotFound(_))
    ));
}

#[test]
fn test_deterministic_registration_with_fixed_source() {
    let source = Arc::new(FixedIdentifierSource::new(1_700_000_000_000, "agent123"));
    let registry = DidRegistry::with_source(source);

    let record = registry
        .register("moltbook", "Test Agent", "pk", None)
        .unwrap();
    assert!(record.did.starts_with("did:agent:moltbook:test-agent-"));
    assert!(record.did.ends_with("-agent123"));
    // Same DID string always digests identically.
    assert_eq!(record.did_hash, did_hash(&record.did));
}
