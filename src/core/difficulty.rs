//! Difficulty measured in leading zero hex characters

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of leading `'0'` hex characters a valid block hash must carry.
///
/// Difficulty 0 is met by every hash. A SHA-256 hex digest is 64 characters
/// long, so values above 64 can never be satisfied; configuration validation
/// rejects them before they reach a worker.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Difficulty(pub u32);

impl Difficulty {
    /// Create a new Difficulty
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the inner value
    pub const fn value(self) -> u32 {
        self.0
    }

    /// The `"00…0"` prefix a satisfying hash starts with
    pub fn prefix(self) -> String {
        "0".repeat(self.0 as usize)
    }

    /// Whether the given hex digest carries enough leading zeros
    pub fn is_met_by(self, hash_hex: &str) -> bool {
        let leading = hash_hex
            .bytes()
            .take_while(|b| *b == b'0')
            .count();
        leading >= self.0 as usize
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Difficulty {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix() {
        assert_eq!(Difficulty::new(0).prefix(), "");
        assert_eq!(Difficulty::new(3).prefix(), "000");
    }

    #[test]
    fn test_is_met_by() {
        assert!(Difficulty::new(0).is_met_by("ffff"));
        assert!(Difficulty::new(2).is_met_by("00ab"));
        assert!(Difficulty::new(2).is_met_by("000a"));
        assert!(!Difficulty::new(2).is_met_by("0a00"));
        assert!(!Difficulty::new(5).is_met_by("0000"));
    }

    #[test]
    fn test_is_met_by_empty_hash() {
        assert!(Difficulty::new(0).is_met_by(""));
        assert!(!Difficulty::new(1).is_met_by(""));
    }

    #[test]
    fn test_ordering() {
        assert!(Difficulty::new(1) < Difficulty::new(4));
    }

    #[test]
    fn test_display() {
        assert_eq!(Difficulty::new(6).to_string(), "6");
    }
}
