//! Integration test: oracle reputation updates, leaderboard ranking, and
//! the divergence between the oracle and platform-derived tier tables.

use chrono::{Duration, Utc};

use agentverify_integration_tests::{profile_fixture, ScriptedPlatform};
use agentverify_reputation::{
    score_profile, DerivedTier, PlatformScorer, ReputationEngine, ReputationError,
    ReputationUpdate, Tier,
};

fn oracle_update(score: i64) -> ReputationUpdate {
    ReputationUpdate {
        score,
        ..Default::default()
    }
}

#[test]
fn test_oracle_update_and_readback() {
    let engine = ReputationEngine::new();
    let did = "did:agent:moltbook:alice-zz-abcd1234";

    engine
        .update(
            did,
            ReputationUpdate {
                score: 1000,
                reliability: 95,
                total_interactions: 10,
                successful_interactions: 7,
                ..Default::default()
            },
        )
        .unwrap();

    let record = engine.get(did);
    assert_eq!(record.score, 1000);
    assert_eq!(record.tier, Tier::Platinum);
    assert_eq!(record.interactions.failed, 3);
    assert_eq!(record.interactions.disputed, 0);
    assert_eq!(record.metrics.reliability, 95);
}

#[test]
fn test_unknown_did_reads_as_unrated_default() {
    let engine = ReputationEngine::new();
    let record = engine.get("did:agent:moltbook:nobody");
    assert_eq!(record.score, 0);
    assert_eq!(record.tier, Tier::Unrated);
    assert!(record.updated_at.is_none());
}

#[test]
fn test_out_of_range_scores_rejected() {
    let engine = ReputationEngine::new();
    assert!(matches!(
        engine.update("did", oracle_update(-5)),
        Err(ReputationError::ScoreOutOfRange(-5))
    ));
    assert!(matches!(
        engine.update("did", oracle_update(2000)),
        Err(ReputationError::ScoreOutOfRange(2000))
    ));
}

#[test]
fn test_leaderboard_gold_filter_limit_two() {
    let engine = ReputationEngine::new();
    engine.update("did:g1", oracle_update(710)).unwrap();
    engine.update("did:g2", oracle_update(880)).unwrap();
    engine.update("did:g3", oracle_update(800)).unwrap();
    engine.update("did:s1", oracle_update(500)).unwrap();
    engine.update("did:p1", oracle_update(990)).unwrap();

    let top = engine.leaderboard(2, Some(Tier::Gold));
    assert_eq!(top.len(), 2);
    assert!(top.iter().all(|r| r.tier == Tier::Gold));
    assert_eq!(top[0].score, 880);
    assert_eq!(top[1].score, 800);
}

#[test]
fn test_tier_band_edges_partition_the_range() {
    assert_eq!(Tier::for_score(199), Tier::Unrated);
    assert_eq!(Tier::for_score(200), Tier::Bronze);
    assert_eq!(Tier::for_score(699), Tier::Silver);
    assert_eq!(Tier::for_score(700), Tier::Gold);
    assert_eq!(Tier::for_score(1000), Tier::Platinum);
}

#[test]
fn test_oracle_and_derived_tables_diverge() {
    // The platform-derived path classifies the same numeric score into a
    // different tier than the oracle path. The divergence is load-bearing.
    for (score, oracle, derived) in [
        (450, Tier::Silver, DerivedTier::Silver),
        (650, Tier::Silver, DerivedTier::Gold),
        (850, Tier::Gold, DerivedTier::Platinum),
        (250, Tier::Bronze, DerivedTier::Bronze),
        (100, Tier::Unrated, DerivedTier::Bronze),
    ] {
        assert_eq!(Tier::for_score(score), oracle, "oracle tier at {}", score);
        assert_eq!(
            DerivedTier::for_score(score),
            derived,
            "derived tier at {}",
            score
        );
    }
}

#[test]
fn test_derived_score_formula_components() {
    let now = Utc::now();
    let mut profile = profile_fixture("alice", now - Duration::days(30));
    profile.followers = 100;
    profile.following = 10;
    profile.posts = 200;
    profile.verified = true;

    let snapshot = score_profile(&profile, now);
    // age 30d -> 60, followers -> 50, posts -> 40, ratio 10 -> capped 100,
    // verified -> 200. Total 450.
    assert_eq!(snapshot.score, 450);
    assert_eq!(snapshot.tier, DerivedTier::Silver);
    assert_eq!(snapshot.metrics.age_days, 30);
}

#[tokio::test]
async fn test_scorer_fetches_and_scores() {
    let platform = ScriptedPlatform::for_user("clawdius");
    let scorer = PlatformScorer::new(platform);

    let snapshot = scorer.derive("clawdius").await.unwrap();
    assert_eq!(snapshot.username, "clawdius");
    assert!(snapshot.score <= 1000);
    assert_eq!(snapshot.metrics.followers, 40);
}

#[tokio::test]
async fn test_scorer_unknown_user_is_platform_error() {
    let platform = ScriptedPlatform::for_user("clawdius");
    let scorer = PlatformScorer::new(platform);

    let result = scorer.derive("stranger").await;
    assert!(matches!(result, Err(ReputationError::Platform(_))));
}

#[tokio::test]
async fn test_derived_path_never_touches_oracle_store() {
    let engine = ReputationEngine::new();
    let platform = ScriptedPlatform::for_user("clawdius");
    let scorer = PlatformScorer::new(platform);

    scorer.derive("clawdius").await.unwrap();

    // Deriving a snapshot stores nothing; the oracle path still reads the
    // zero default.
    assert_eq!(engine.count(), 0);
    assert_eq!(engine.get("clawdius").tier, Tier::Unrated);
}
