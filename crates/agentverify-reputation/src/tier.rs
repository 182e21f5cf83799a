use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum reputation score on the oracle path.
pub const MAX_SCORE: u32 = 1000;

/// Oracle-path reputation tier.
///
/// The five bands are contiguous and inclusive, partitioning [0, 1000]
/// with no gaps or overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Unrated,
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Tier {
    /// All tiers, lowest band first.
    pub const ALL: [Tier; 5] = [
        Tier::Unrated,
        Tier::Bronze,
        Tier::Silver,
        Tier::Gold,
        Tier::Platinum,
    ];

    /// The unique tier whose band contains `score`.
    pub fn for_score(score: u32) -> Self {
        match score {
            0..=199 => Self::Unrated,
            200..=399 => Self::Bronze,
            400..=699 => Self::Silver,
            700..=899 => Self::Gold,
            _ => Self::Platinum,
        }
    }

    /// Inclusive [min, max] band for this tier.
    pub fn range(&self) -> (u32, u32) {
        match self {
            Self::Unrated => (0, 199),
            Self::Bronze => (200, 399),
            Self::Silver => (400, 699),
            Self::Gold => (700, 899),
            Self::Platinum => (900, MAX_SCORE),
        }
    }

    /// Lowercase tier name as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unrated => "unrated",
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Platinum => "platinum",
        }
    }

    /// Parse a lowercase tier name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "unrated" => Some(Self::Unrated),
            "bronze" => Some(Self::Bronze),
            "silver" => Some(Self::Silver),
            "gold" => Some(Self::Gold),
            "platinum" => Some(Self::Platinum),
            _ => None,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
