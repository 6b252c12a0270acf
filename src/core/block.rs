//! Block record mined by the engine

use crate::core::hash::sha256_hex;
use crate::core::{Difficulty, Nonce};
use crate::error::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A single block submitted for proof-of-work mining.
///
/// Everything except `nonce` and `hash` is fixed at creation and must stay
/// untouched while a mining task is in flight on the block. The engine never
/// mutates a caller's copy: the worker boundary serializes the whole record
/// in and the completed block comes back as a value, with `nonce` and `hash`
/// committed exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Position marker, caller-assigned
    pub index: u64,
    /// Reference to the prior block
    pub previous_hash: String,
    /// Arbitrary opaque data entries
    #[serde(default)]
    pub payload: Vec<Value>,
    /// Creation time in epoch milliseconds; tampering with it invalidates
    /// downstream chain validation, which is outside this engine's scope
    pub timestamp: i64,
    /// Required count of leading `'0'` hex characters in the hash
    pub difficulty: Difficulty,
    /// Search variable, 0 until mined
    #[serde(default)]
    pub nonce: Nonce,
    /// Hex digest, empty until mined
    #[serde(default)]
    pub hash: String,
}

impl Block {
    /// Create a fresh, unmined block stamped with the current time.
    pub fn new(
        index: u64,
        previous_hash: impl Into<String>,
        payload: Vec<Value>,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            index,
            previous_hash: previous_hash.into(),
            payload,
            timestamp: Utc::now().timestamp_millis(),
            difficulty,
            nonce: Nonce::default(),
            hash: String::new(),
        }
    }

    /// Replace the creation timestamp. Mostly useful for reconstructing
    /// blocks with known content in tests and tooling.
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Stable byte encoding of the hashable fields with the current nonce.
    ///
    /// Payload entries are rendered as JSON; a payload that cannot be
    /// serialized fails the task with an encoding error rather than being
    /// retried.
    pub fn preimage(&self) -> Result<Vec<u8>> {
        let payload = serde_json::to_string(&self.payload)?;
        Ok(format!(
            "{}{}{}{}{}{}",
            self.index, self.previous_hash, payload, self.timestamp, self.difficulty, self.nonce
        )
        .into_bytes())
    }

    /// Whether mining has committed a hash into this block.
    pub fn is_mined(&self) -> bool {
        !self.hash.is_empty()
    }

    /// Check the mined-block invariant: the recorded hash matches the
    /// preimage digest and carries the required difficulty prefix.
    pub fn verify(&self) -> Result<bool> {
        if !self.is_mined() {
            return Ok(false);
        }
        let digest = sha256_hex(&self.preimage()?);
        Ok(digest == self.hash && self.difficulty.is_met_by(&self.hash))
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block #{} (difficulty={}, nonce={})",
            self.index, self.difficulty, self.nonce
        )
    }
}
