use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JSON-LD context entries carried by every identity document.
const DID_CONTEXT: &str = "https://www.w3.org/ns/did/v1";
const AGENTVERIFY_CONTEXT: &str = "https://agentverify.io/v1";

/// Endpoint advertised in every document's service section.
const SERVICE_ENDPOINT: &str = "https://api.agentverify.io/v1";

/// A verification method within an identity document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationMethod {
    /// Verification method identifier (e.g., "did:agent:...#keys-1").
    pub id: String,
    /// Type of the verification method.
    #[serde(rename = "type")]
    pub method_type: String,
    /// The DID that controls this verification method.
    pub controller: String,
    /// Multibase-encoded public key material.
    #[serde(rename = "publicKeyMultibase")]
    pub public_key_multibase: String,
}

/// A service endpoint in an identity document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    /// Service identifier fragment.
    pub id: String,
    /// Service type.
    #[serde(rename = "type")]
    pub service_type: String,
    /// Service endpoint URL.
    #[serde(rename = "serviceEndpoint")]
    pub service_endpoint: String,
}

/// Agent-specific metadata embedded in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMetadata {
    /// Agent display name as registered.
    pub name: String,
    /// Platform the agent lives on.
    pub platform: String,
    /// When the document was created.
    pub created: DateTime<Utc>,
}

/// W3C-style identity document for a registered agent DID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DidDocument {
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    /// The DID subject.
    pub id: String,
    /// When the document was created.
    pub created: DateTime<Utc>,
    /// Controller reference derived from the registered public key.
    pub controller: String,
    /// Verification methods (public keys) associated with this DID.
    #[serde(rename = "verificationMethod")]
    pub verification_method: Vec<VerificationMethod>,
    /// Verification method references usable for authentication.
    pub authentication: Vec<String>,
    /// Verification method references usable for assertions.
    #[serde(rename = "assertionMethod")]
    pub assertion_method: Vec<String>,
    /// Service endpoints.
    pub service: Vec<ServiceEndpoint>,
    /// Agent metadata.
    #[serde(rename = "agentMetadata")]
    pub agent_metadata: AgentMetadata,
    /// Whether the DID is active. Flipped to false on deactivation.
    pub active: bool,
}

impl DidDocument {
    /// Build the document for a freshly minted DID, embedding `public_key`
    /// as the sole verification method.
    pub fn new(
        did: &str,
        agent_name: &str,
        platform: &str,
        public_key: &str,
        created: DateTime<Utc>,
    ) -> Self {
        let vm = VerificationMethod {
            id: format!("{}#keys-1", did),
            method_type: "Ed25519VerificationKey2020".to_string(),
            controller: did.to_string(),
            public_key_multibase: public_key.to_string(),
        };
        let service = ServiceEndpoint {
            id: "#avs".to_string(),
            service_type: "AgentVerificationService".to_string(),
            service_endpoint: SERVICE_ENDPOINT.to_string(),
        };
        Self {
            context: vec![DID_CONTEXT.to_string(), AGENTVERIFY_CONTEXT.to_string()],
            id: did.to_string(),
            created,
            controller: format!("did:key:{}", public_key),
            verification_method: vec![vm],
            authentication: vec!["#keys-1".to_string()],
            assertion_method: vec!["#keys-1".to_string()],
            service: vec![service],
            agent_metadata: AgentMetadata {
                name: agent_name.to_string(),
                platform: platform.to_string(),
                created,
            },
            active: true,
        }
    }
}
