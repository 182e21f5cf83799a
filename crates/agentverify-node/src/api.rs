//! HTTP API server for the AgentVerify service.
//!
//! Thin transport over the trust-state engine: handlers translate between
//! the wire contract and the component APIs, and map the error taxonomy to
//! status codes (validation 400, not-found 404, conflict 409, expired 400,
//! external fault 502, internal 500).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use agentverify_credentials::{AnchorError, AnchorSummary, VerificationReport};
use agentverify_identity::{DidDocument, DidListPage, DidStatus, RegistryError};
use agentverify_platform::{PlatformError, PlatformProfile};
use agentverify_reputation::{
    DerivedReputation, ReputationError, ReputationRecord, ReputationUpdate, Tier, MAX_SCORE,
};
use agentverify_verification::{Challenge, OwnershipReport, VerificationError};

use crate::state::AppState;

// --- Request types ---

#[derive(Deserialize)]
pub struct RegisterDidRequest {
    #[serde(default)]
    pub platform: String,
    #[serde(rename = "agentName", default)]
    pub agent_name: String,
    #[serde(rename = "publicKey", default)]
    pub public_key: String,
    #[serde(default)]
    pub stake: Option<String>,
}

#[derive(Deserialize)]
pub struct ListDidsParams {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct AnchorCredentialRequest {
    #[serde(rename = "credentialHash", default)]
    pub credential_hash: String,
    #[serde(rename = "didHash", default)]
    pub did_hash: String,
    #[serde(rename = "credentialType", default)]
    pub credential_type: String,
    #[serde(rename = "expiresAt", default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct VerifyCredentialRequest {
    #[serde(rename = "credentialHash", default)]
    pub credential_hash: String,
}

#[derive(Deserialize)]
pub struct RevokeCredentialRequest {
    #[serde(rename = "credentialHash", default)]
    pub credential_hash: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct UsernameRequest {
    #[serde(default)]
    pub username: String,
}

#[derive(Deserialize)]
pub struct LeaderboardParams {
    pub limit: Option<usize>,
    pub tier: Option<String>,
}

// --- Response types ---

#[derive(Debug, Serialize)]
pub struct RegisterDidResponse {
    pub did: String,
    #[serde(rename = "didHash")]
    pub did_hash: String,
    pub document: DidDocument,
    pub message: String,
}

#[derive(Serialize)]
pub struct DeactivateDidResponse {
    pub did: String,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AnchorCredentialResponse {
    #[serde(rename = "credentialHash")]
    pub credential_hash: String,
    pub status: String,
    #[serde(rename = "issuedAt")]
    pub issued_at: DateTime<Utc>,
    pub message: String,
}

#[derive(Serialize)]
pub struct RevokeCredentialResponse {
    #[serde(rename = "credentialHash")]
    pub credential_hash: String,
    pub status: String,
    #[serde(rename = "revokedAt")]
    pub revoked_at: Option<DateTime<Utc>>,
    pub reason: Option<String>,
}

#[derive(Serialize)]
pub struct AgentCredentialsResponse {
    #[serde(rename = "didHash")]
    pub did_hash: String,
    pub credentials: Vec<AnchorSummary>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ReputationUpdateResponse {
    pub did: String,
    pub score: u32,
    pub tier: Tier,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
    pub message: String,
}

#[derive(Serialize)]
pub struct LeaderboardFilters {
    pub tier: Option<String>,
}

#[derive(Serialize)]
pub struct LeaderboardResponse {
    pub agents: Vec<ReputationRecord>,
    pub count: usize,
    pub filters: LeaderboardFilters,
}

#[derive(Serialize)]
pub struct TierRange {
    pub min: u32,
    pub max: u32,
}

#[derive(Serialize)]
pub struct TiersResponse {
    pub tiers: BTreeMap<&'static str, TierRange>,
    #[serde(rename = "maxScore")]
    pub max_score: u32,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

// --- Error mapping ---

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn registry_error(err: RegistryError) -> ApiError {
    match err {
        RegistryError::MissingField(_) => error_response(StatusCode::BAD_REQUEST, err.to_string()),
        RegistryError::NotFound(_) => error_response(StatusCode::NOT_FOUND, "DID not found"),
        RegistryError::DuplicateDid(_) => {
            tracing::error!(error = %err, "unexpected registry fault");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

fn anchor_error(err: AnchorError) -> ApiError {
    match err {
        AnchorError::MissingField(_) => error_response(StatusCode::BAD_REQUEST, err.to_string()),
        AnchorError::NotFound(_) => error_response(StatusCode::NOT_FOUND, "Credential not found"),
        AnchorError::AlreadyAnchored(_) => {
            error_response(StatusCode::CONFLICT, "Credential already anchored")
        }
    }
}

fn platform_error(err: PlatformError) -> ApiError {
    if err.is_not_found() {
        error_response(StatusCode::NOT_FOUND, err.to_string())
    } else {
        error_response(StatusCode::BAD_GATEWAY, err.to_string())
    }
}

fn verification_error(err: VerificationError) -> ApiError {
    match err {
        VerificationError::MissingUsername => {
            error_response(StatusCode::BAD_REQUEST, "Username required")
        }
        VerificationError::NoChallenge(_) => {
            error_response(StatusCode::NOT_FOUND, "No challenge found. Generate one first.")
        }
        VerificationError::ChallengeExpired(_) => {
            error_response(StatusCode::BAD_REQUEST, "Challenge expired. Generate a new one.")
        }
        VerificationError::Platform(inner) => platform_error(inner),
    }
}

fn reputation_error(err: ReputationError) -> ApiError {
    match err {
        ReputationError::ScoreOutOfRange(_) => {
            error_response(StatusCode::BAD_REQUEST, "Score must be between 0 and 1000")
        }
        ReputationError::Platform(inner) => platform_error(inner),
    }
}

// --- DID handlers ---

async fn handle_register_did(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterDidRequest>,
) -> Result<(StatusCode, Json<RegisterDidResponse>), ApiError> {
    let record = state
        .registry
        .register(&req.platform, &req.agent_name, &req.public_key, req.stake)
        .map_err(registry_error)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterDidResponse {
            did: record.did,
            did_hash: record.did_hash,
            document: record.document,
            message: "DID registered successfully".into(),
        }),
    ))
}

async fn handle_resolve_did(
    State(state): State<Arc<AppState>>,
    Path(did): Path<String>,
) -> Result<Json<DidDocument>, ApiError> {
    state.registry.resolve(&did).map(Json).map_err(registry_error)
}

async fn handle_did_status(
    State(state): State<Arc<AppState>>,
    Path(did): Path<String>,
) -> Result<Json<DidStatus>, ApiError> {
    state.registry.status(&did).map(Json).map_err(registry_error)
}

async fn handle_deactivate_did(
    State(state): State<Arc<AppState>>,
    Path(did): Path<String>,
) -> Result<Json<DeactivateDidResponse>, ApiError> {
    state.registry.deactivate(&did).map_err(registry_error)?;
    Ok(Json(DeactivateDidResponse {
        did,
        status: "deactivated".into(),
        message: "DID deactivated successfully".into(),
    }))
}

async fn handle_list_dids(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListDidsParams>,
) -> Json<DidListPage> {
    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or(20);
    Json(state.registry.list(page, limit))
}

// --- Credential handlers ---

async fn handle_anchor_credential(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnchorCredentialRequest>,
) -> Result<(StatusCode, Json<AnchorCredentialResponse>), ApiError> {
    let anchor = state
        .anchors
        .anchor(
            &req.credential_hash,
            &req.did_hash,
            &req.credential_type,
            req.expires_at,
        )
        .map_err(anchor_error)?;

    Ok((
        StatusCode::CREATED,
        Json(AnchorCredentialResponse {
            credential_hash: anchor.credential_hash,
            status: "anchored".into(),
            issued_at: anchor.issued_at,
            message: "Credential anchored successfully".into(),
        }),
    ))
}

async fn handle_verify_credential(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyCredentialRequest>,
) -> Result<(StatusCode, Json<VerificationReport>), ApiError> {
    if req.credential_hash.is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "credentialHash required"));
    }

    let outcome = state.anchors.verify(&req.credential_hash);
    let status = if outcome.is_found() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    Ok((status, Json(outcome.to_report())))
}

async fn handle_revoke_credential(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RevokeCredentialRequest>,
) -> Result<Json<RevokeCredentialResponse>, ApiError> {
    if req.credential_hash.is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "credentialHash required"));
    }

    let revoked = state
        .anchors
        .revoke(&req.credential_hash, req.reason)
        .map_err(anchor_error)?;

    Ok(Json(RevokeCredentialResponse {
        credential_hash: revoked.credential_hash,
        status: "revoked".into(),
        revoked_at: revoked.revoked_at,
        reason: revoked.revocation_reason,
    }))
}

async fn handle_agent_credentials(
    State(state): State<Arc<AppState>>,
    Path(did_hash): Path<String>,
) -> Json<AgentCredentialsResponse> {
    let credentials = state.anchors.list_by_did(&did_hash);
    let count = credentials.len();
    Json(AgentCredentialsResponse {
        did_hash,
        credentials,
        count,
    })
}

// --- Platform handlers ---

async fn handle_platform_agent(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<PlatformProfile>, ApiError> {
    state
        .platform
        .fetch_profile(&username)
        .await
        .map(Json)
        .map_err(platform_error)
}

async fn handle_generate_challenge(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UsernameRequest>,
) -> Result<Json<Challenge>, ApiError> {
    state
        .challenges
        .generate_challenge(&req.username)
        .map(Json)
        .map_err(verification_error)
}

async fn handle_verify_ownership(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UsernameRequest>,
) -> Result<Json<OwnershipReport>, ApiError> {
    state
        .challenges
        .verify_ownership(&req.username)
        .await
        .map(Json)
        .map_err(verification_error)
}

async fn handle_derived_reputation(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<DerivedReputation>, ApiError> {
    state
        .scorer
        .derive(&username)
        .await
        .map(Json)
        .map_err(reputation_error)
}

// --- Reputation handlers ---

async fn handle_get_reputation(
    State(state): State<Arc<AppState>>,
    Path(did): Path<String>,
) -> Json<ReputationRecord> {
    Json(state.reputation.get(&did))
}

async fn handle_update_reputation(
    State(state): State<Arc<AppState>>,
    Path(did): Path<String>,
    Json(update): Json<ReputationUpdate>,
) -> Result<Json<ReputationUpdateResponse>, ApiError> {
    let record = state
        .reputation
        .update(&did, update)
        .map_err(reputation_error)?;

    Ok(Json(ReputationUpdateResponse {
        did: record.did,
        score: record.score,
        tier: record.tier,
        updated_at: record.updated_at,
        message: "Reputation updated successfully".into(),
    }))
}

async fn handle_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardParams>,
) -> Json<LeaderboardResponse> {
    let limit = params.limit.unwrap_or(10);
    let filters = LeaderboardFilters {
        tier: params.tier.clone(),
    };

    // An unknown tier name matches nothing, exactly like a tier with no
    // records.
    let agents = match params.tier.as_deref().map(Tier::parse) {
        None => state.reputation.leaderboard(limit, None),
        Some(Some(tier)) => state.reputation.leaderboard(limit, Some(tier)),
        Some(None) => Vec::new(),
    };

    let count = agents.len();
    Json(LeaderboardResponse {
        agents,
        count,
        filters,
    })
}

async fn handle_tiers() -> Json<TiersResponse> {
    let tiers = Tier::ALL
        .iter()
        .map(|tier| {
            let (min, max) = tier.range();
            (tier.as_str(), TierRange { min, max })
        })
        .collect();
    Json(TiersResponse {
        tiers,
        max_score: MAX_SCORE,
    })
}

// --- Service handlers ---

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

async fn handle_root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "AgentVerify API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "operational",
        "endpoints": {
            "did": "/v1/did",
            "credentials": "/v1/credentials",
            "platform": "/v1/platform",
            "reputation": "/v1/reputation",
            "health": "/health"
        }
    }))
}

// --- Server ---

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/v1/did/register", post(handle_register_did))
        .route("/v1/did", get(handle_list_dids))
        .route("/v1/did/{did}", get(handle_resolve_did))
        .route("/v1/did/{did}/status", get(handle_did_status))
        .route("/v1/did/{did}/deactivate", post(handle_deactivate_did))
        .route("/v1/credentials/anchor", post(handle_anchor_credential))
        .route("/v1/credentials/verify", post(handle_verify_credential))
        .route("/v1/credentials/revoke", post(handle_revoke_credential))
        .route("/v1/credentials/agent/{did_hash}", get(handle_agent_credentials))
        .route("/v1/platform/agent/{username}", get(handle_platform_agent))
        .route("/v1/platform/challenge", post(handle_generate_challenge))
        .route("/v1/platform/verify", post(handle_verify_ownership))
        .route(
            "/v1/platform/reputation/{username}",
            get(handle_derived_reputation),
        )
        .route("/v1/reputation/leaderboard", get(handle_leaderboard))
        .route("/v1/reputation/tiers", get(handle_tiers))
        .route(
            "/v1/reputation/{did}",
            get(handle_get_reputation).post(handle_update_reputation),
        )
        .with_state(state)
}

pub async fn start_api_server(listen_addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(%listen_addr, "HTTP API server started");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("received shutdown signal");
        })
        .await?;
    Ok(())
}
