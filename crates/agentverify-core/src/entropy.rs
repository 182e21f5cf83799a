use chrono::Utc;
use rand::Rng;

/// Lowercase base36 alphabet used for timestamps, suffixes, and nonces.
const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Encode a non-negative integer as lowercase base36.
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".into();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_ALPHABET[(value % 36) as usize] as char);
        value /= 36;
    }
    digits.iter().rev().collect()
}

/// Source of the clock and randomness used to mint identifiers.
///
/// Registries and the challenge protocol take this as an injected
/// capability so tests can supply deterministic values.
pub trait IdentifierSource: Send + Sync {
    /// Current Unix time in milliseconds.
    fn now_millis(&self) -> i64;

    /// Random lowercase base36 string of the given length.
    fn random_base36(&self, len: usize) -> String;
}

/// Production source: system clock + thread-local RNG.
pub struct SystemIdentifierSource;

impl IdentifierSource for SystemIdentifierSource {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn random_base36(&self, len: usize) -> String {
        let mut rng = rand::thread_rng();
        (0..len)
            .map(|_| BASE36_ALPHABET[rng.gen_range(0..36)] as char)
            .collect()
    }
}

/// Deterministic source for tests: a fixed clock and a repeating pattern.
pub struct FixedIdentifierSource {
    millis: i64,
    pattern: String,
}

impl FixedIdentifierSource {
    /// Create a source that always reports `millis` and draws random
    /// strings by cycling `pattern`.
    pub fn new(millis: i64, pattern: impl Into<String>) -> Self {
        Self {
            millis,
            pattern: pattern.into(),
        }
    }
}

impl IdentifierSource for FixedIdentifierSource {
    fn now_millis(&self) -> i64 {
        self.millis
    }

    fn random_base36(&self, len: usize) -> String {
        self.pattern.chars().cycle().take(len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base36_zero() {
        assert_eq!(to_base36(0), "0");
    }

    #[test]
    fn test_base36_known_values() {
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1295), "zz");
        assert_eq!(to_base36(46_655), "zzz");
        assert_eq!(to_base36(36 * 36), "100");
    }

    #[test]
    fn test_base36_alphabet_only() {
        let encoded = to_base36(u64::MAX);
        assert!(encoded
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
    }

    #[test]
    fn test_system_source_random_length_and_alphabet() {
        let source = SystemIdentifierSource;
        let s = source.random_base36(8);
        assert_eq!(s.len(), 8);
        assert!(s.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
    }

    #[test]
    fn test_system_source_clock_advances() {
        let source = SystemIdentifierSource;
        let now = source.now_millis();
        // Well after 2020-01-01.
        assert!(now > 1_577_836_800_000);
    }

    #[test]
    fn test_fixed_source_is_deterministic() {
        let source = FixedIdentifierSource::new(42, "abc");
        assert_eq!(source.now_millis(), 42);
        assert_eq!(source.random_base36(8), "abcabcab");
        assert_eq!(source.random_base36(8), "abcabcab");
    }
}
