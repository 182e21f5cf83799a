//! Shared service state, accessible from HTTP handlers.

use std::sync::Arc;
use std::time::Instant;

use agentverify_credentials::AnchorStore;
use agentverify_identity::DidRegistry;
use agentverify_platform::PlatformClient;
use agentverify_reputation::{PlatformScorer, ReputationEngine};
use agentverify_verification::ChallengeManager;

/// All four keyed stores plus the platform capability.
///
/// Everything here is process-local and volatile: a restart loses all
/// DIDs, anchors, challenges, and reputation.
pub struct AppState {
    pub registry: DidRegistry,
    pub anchors: AnchorStore,
    pub challenges: ChallengeManager,
    pub reputation: ReputationEngine,
    pub scorer: PlatformScorer,
    pub platform: Arc<dyn PlatformClient>,
    pub start_time: Instant,
}

impl AppState {
    /// Assemble the engine over a platform capability.
    pub fn new(platform: Arc<dyn PlatformClient>) -> Self {
        Self {
            registry: DidRegistry::new(),
            anchors: AnchorStore::new(),
            challenges: ChallengeManager::new(Arc::clone(&platform)),
            reputation: ReputationEngine::new(),
            scorer: PlatformScorer::new(Arc::clone(&platform)),
            platform,
            start_time: Instant::now(),
        }
    }
}
