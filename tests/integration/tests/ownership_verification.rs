//! Integration test: full challenge-response ownership verification
//! against a scripted platform feed.

use std::sync::Arc;

use agentverify_core::MemoryStore;
use agentverify_integration_tests::{ScriptedPlatform, SteppingSource};
use agentverify_verification::{ChallengeManager, VerificationError};

fn manager(
    clock: Arc<SteppingSource>,
    platform: Arc<ScriptedPlatform>,
) -> ChallengeManager {
    ChallengeManager::with_parts(MemoryStore::new(), clock, platform)
}

#[tokio::test]
async fn test_full_ownership_verification_flow() {
    let clock = SteppingSource::at(1_000_000);
    let platform = ScriptedPlatform::for_user("clawdius");
    let mgr = manager(Arc::clone(&clock), Arc::clone(&platform));

    // 1. Service issues a challenge.
    let challenge = mgr.generate_challenge("clawdius").unwrap();
    assert!(challenge.challenge.starts_with("agent-verify:clawdius:"));

    // 2. Verification before the agent posts anything fails but keeps the
    //    challenge for retry.
    let attempt = mgr.verify_ownership("clawdius").await.unwrap();
    assert!(!attempt.verified);
    assert_eq!(mgr.count(), 1);

    // 3. The agent posts the challenge string from the account.
    platform.publish(&format!("proving ownership: {}", challenge.challenge));

    // 4. Verification now succeeds and consumes the challenge.
    let report = mgr.verify_ownership("clawdius").await.unwrap();
    assert!(report.verified);
    assert_eq!(report.challenge, challenge.challenge);
    assert!(report.posts_checked >= 1);
    assert_eq!(mgr.count(), 0);

    // 5. With the challenge consumed, another attempt needs a fresh one.
    let replay = mgr.verify_ownership("clawdius").await;
    assert!(matches!(replay, Err(VerificationError::NoChallenge(_))));
}

#[tokio::test]
async fn test_expired_challenge_then_no_challenge() {
    let clock = SteppingSource::at(1_000_000);
    let platform = ScriptedPlatform::for_user("alice");
    let mgr = manager(Arc::clone(&clock), Arc::clone(&platform));

    let challenge = mgr.generate_challenge("alice").unwrap();
    platform.publish(&challenge.challenge);

    // 16 minutes pass; the 15-minute TTL has elapsed.
    clock.advance(16 * 60 * 1000);

    let expired = mgr.verify_ownership("alice").await;
    assert!(matches!(expired, Err(VerificationError::ChallengeExpired(_))));

    // The expired challenge was discarded, so the next attempt reports
    // no challenge rather than expired.
    let gone = mgr.verify_ownership("alice").await;
    assert!(matches!(gone, Err(VerificationError::NoChallenge(_))));
}

#[tokio::test]
async fn test_regenerating_invalidates_older_challenge() {
    let clock = SteppingSource::at(1_000_000);
    let platform = ScriptedPlatform::for_user("alice");
    let mgr = manager(Arc::clone(&clock), Arc::clone(&platform));

    let first = mgr.generate_challenge("alice").unwrap();
    platform.publish(&first.challenge);

    // A newer challenge replaces the first; the posted string no longer
    // matches.
    clock.advance(1_000);
    let second = mgr.generate_challenge("alice").unwrap();
    assert_ne!(first.challenge, second.challenge);

    let report = mgr.verify_ownership("alice").await.unwrap();
    assert!(!report.verified);
}

#[tokio::test]
async fn test_platform_outage_surfaces_as_external_fault() {
    let clock = SteppingSource::at(1_000_000);
    let platform = ScriptedPlatform::for_user("alice");
    let mgr = manager(Arc::clone(&clock), Arc::clone(&platform));

    let challenge = mgr.generate_challenge("alice").unwrap();
    platform.publish(&challenge.challenge);
    platform.break_posts_endpoint();

    // The outage is an error, never verified=false, and the stored
    // challenge survives for a retry after recovery.
    let result = mgr.verify_ownership("alice").await;
    assert!(matches!(result, Err(VerificationError::Platform(_))));
    assert_eq!(mgr.count(), 1);
}

#[tokio::test]
async fn test_sweep_reclaims_expired_challenges_only() {
    let clock = SteppingSource::at(1_000_000);
    let platform = ScriptedPlatform::for_user("alice");
    let mgr = manager(Arc::clone(&clock), platform);

    mgr.generate_challenge("stale").unwrap();
    clock.advance(20 * 60 * 1000);
    mgr.generate_challenge("alice").unwrap();

    assert_eq!(mgr.purge_expired(), 1);
    assert_eq!(mgr.count(), 1);

    // The surviving challenge still verifies normally.
    let result = mgr.verify_ownership("alice").await.unwrap();
    assert!(!result.verified);
}
