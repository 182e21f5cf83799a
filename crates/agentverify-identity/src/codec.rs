//! Identifier codec: deterministic DID string construction and the one-way
//! digest over it.
//!
//! DID format: `did:agent:<platform>:<slug>-<timestamp36>-<random8>`

use agentverify_core::{to_base36, IdentifierSource};

/// Length of the random suffix appended to every minted DID.
const RANDOM_SUFFIX_LEN: usize = 8;

/// Lower-case `name` and replace every character outside `[a-z0-9]`
/// with `-`.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Mint a new DID for an agent on a platform.
///
/// The timestamp (base36 milliseconds) and random suffix come from the
/// injected `source`, so two mints for the same name yield distinct DIDs.
pub fn mint_did(platform: &str, agent_name: &str, source: &dyn IdentifierSource) -> String {
    let slug = slugify(agent_name);
    let timestamp = to_base36(source.now_millis().max(0) as u64);
    let random = source.random_base36(RANDOM_SUFFIX_LEN);
    format!("did:agent:{}:{}-{}-{}", platform, slug, timestamp, random)
}

/// Hex encoding of the 32-byte BLAKE3 digest of the DID string.
///
/// A pure function of the DID: the same input always yields the same hash.
pub fn did_hash(did: &str) -> String {
    hex::encode(blake3::hash(did.as_bytes()).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentverify_core::FixedIdentifierSource;

    #[test]
    fn test_slugify_lowercases() {
        assert_eq!(slugify("AliceBot"), "alicebot");
    }

    #[test]
    fn test_slugify_replaces_non_alphanumerics() {
        assert_eq!(slugify("Agent Smith_9!"), "agent-smith-9-");
        assert_eq!(slugify("héllo"), "h-llo");
    }

    #[test]
    fn test_slugify_digits_kept() {
        assert_eq!(slugify("bot42"), "bot42");
    }

    #[test]
    fn test_mint_did_format() {
        let source = FixedIdentifierSource::new(1295, "abcd1234");
        let did = mint_did("moltbook", "Alice Bot", &source);
        assert_eq!(did, "did:agent:moltbook:alice-bot-zz-abcd1234");
    }

    #[test]
    fn test_mint_did_deterministic_with_fixed_source() {
        let source = FixedIdentifierSource::new(1_000, "xyz");
        let a = mint_did("moltbook", "alice", &source);
        let b = mint_did("moltbook", "alice", &source);
        assert_eq!(a, b);
    }

    #[test]
    fn test_did_hash_is_pure() {
        let h1 = did_hash("did:agent:moltbook:alice-zz-abcd1234");
        let h2 = did_hash("did:agent:moltbook:alice-zz-abcd1234");
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_did_hash_length_and_hex() {
        let h = did_hash("did:agent:moltbook:alice-zz-abcd1234");
        assert_eq!(h.len(), 64);
        assert!(h.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn test_did_hash_distinct_inputs() {
        let h1 = did_hash("did:agent:moltbook:alice-a-11111111");
        let h2 = did_hash("did:agent:moltbook:alice-a-11111112");
        assert_ne!(h1, h2);
    }
}
