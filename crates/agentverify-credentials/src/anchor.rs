use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An anchored credential hash and its lifecycle state.
///
/// `did_hash` is a foreign reference; existence in the DID registry is
/// intentionally not enforced. Anchors are never deleted, and `revoked`
/// never resets to false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialAnchor {
    /// Unique hash of the anchored credential.
    #[serde(rename = "credentialHash")]
    pub credential_hash: String,
    /// Digest of the DID this credential is anchored against.
    #[serde(rename = "didHash")]
    pub did_hash: String,
    /// Credential type label.
    #[serde(rename = "credentialType")]
    pub credential_type: String,
    /// When the anchor was recorded.
    #[serde(rename = "issuedAt")]
    pub issued_at: DateTime<Utc>,
    /// Optional expiration instant.
    #[serde(rename = "expiresAt")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether the credential has been revoked.
    pub revoked: bool,
    /// When the credential was revoked.
    #[serde(rename = "revokedAt")]
    pub revoked_at: Option<DateTime<Utc>>,
    /// Reason supplied at revocation time.
    #[serde(rename = "revocationReason")]
    pub revocation_reason: Option<String>,
}

impl CredentialAnchor {
    /// Whether the anchor is past its expiration at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires| now > expires)
    }

    /// Lifecycle state at `now`. Revocation takes precedence over
    /// expiration.
    pub fn state(&self, now: DateTime<Utc>) -> AnchorState {
        if self.revoked {
            AnchorState::Revoked
        } else if self.is_expired(now) {
            AnchorState::Expired
        } else {
            AnchorState::Active
        }
    }
}

/// Read-time lifecycle state of an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorState {
    Active,
    Expired,
    Revoked,
}

impl fmt::Display for AnchorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Expired => write!(f, "expired"),
            Self::Revoked => write!(f, "revoked"),
        }
    }
}

/// Outcome of verifying a credential hash.
///
/// Not-found is part of the outcome, not an error: callers decide how to
/// surface it.
#[derive(Debug, Clone, PartialEq)]
pub enum VerifyOutcome {
    /// No anchor exists for the hash.
    NotFound,
    /// The anchor is revoked (reported even when also expired).
    Revoked { anchored_at: DateTime<Utc> },
    /// The anchor is past its expiration.
    Expired {
        anchored_at: DateTime<Utc>,
        expired_at: DateTime<Utc>,
    },
    /// The anchor is valid.
    Valid {
        anchored_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
        did_hash: String,
        credential_type: String,
    },
}

impl VerifyOutcome {
    /// Whether the credential verified as valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Whether any anchor exists for the hash.
    pub fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }

    /// Flatten into the wire report shape.
    pub fn to_report(&self) -> VerificationReport {
        match self {
            Self::NotFound => VerificationReport {
                valid: false,
                reason: "Credential not found".into(),
                ..VerificationReport::default()
            },
            Self::Revoked { anchored_at } => VerificationReport {
                valid: false,
                reason: "Credential revoked".into(),
                anchored_at: Some(*anchored_at),
                ..VerificationReport::default()
            },
            Self::Expired {
                anchored_at,
                expired_at,
            } => VerificationReport {
                valid: false,
                reason: "Credential expired".into(),
                anchored_at: Some(*anchored_at),
                expired_at: Some(*expired_at),
                ..VerificationReport::default()
            },
            Self::Valid {
                anchored_at,
                expires_at,
                did_hash,
                credential_type,
            } => VerificationReport {
                valid: true,
                reason: "Valid".into(),
                anchored_at: Some(*anchored_at),
                expires_at: *expires_at,
                did_hash: Some(did_hash.clone()),
                credential_type: Some(credential_type.clone()),
                ..VerificationReport::default()
            },
        }
    }
}

/// Wire-shaped verification report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationReport {
    pub valid: bool,
    pub reason: String,
    #[serde(rename = "anchoredAt", skip_serializing_if = "Option::is_none")]
    pub anchored_at: Option<DateTime<Utc>>,
    #[serde(rename = "expiredAt", skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<DateTime<Utc>>,
    #[serde(rename = "expiresAt", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(rename = "didHash", skip_serializing_if = "Option::is_none")]
    pub did_hash: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub credential_type: Option<String>,
}

/// One entry of a per-DID anchor listing, with state computed at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorSummary {
    #[serde(rename = "credentialHash")]
    pub credential_hash: String,
    #[serde(rename = "type")]
    pub credential_type: String,
    #[serde(rename = "issuedAt")]
    pub issued_at: DateTime<Utc>,
    #[serde(rename = "expiresAt")]
    pub expires_at: Option<DateTime<Utc>>,
    pub revoked: bool,
    pub status: AnchorState,
}
