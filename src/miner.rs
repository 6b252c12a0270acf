//! Sequential nonce search over a single block
//!
//! The computational kernel of the engine: a tight encode/hash/check loop
//! with no suspension points. Isolation and aggregation live in the worker
//! and coordinator layers; the miner itself is pure compute and can be used
//! directly when no concurrency is wanted.

use crate::core::hash::sha256_hex;
use crate::core::Block;
use crate::error::{Error, Result};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Miner configuration
#[derive(Debug, Clone)]
pub struct MinerConfig {
    /// Iterations between cancellation checks inside the search loop.
    /// The loop is not preemptible mid-iteration, so this bounds how long
    /// a cancelled worker keeps hashing. Must be at least 1.
    pub cancel_check_interval: u64,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            cancel_check_interval: 1024,
        }
    }
}

/// Sequential proof-of-work miner
#[derive(Debug, Clone, Default)]
pub struct Miner {
    config: MinerConfig,
}

impl Miner {
    /// Create a new miner
    pub fn new(config: MinerConfig) -> Self {
        Self { config }
    }

    /// Mine the block to completion without external cancellation.
    pub fn mine(&self, block: Block) -> Result<Block> {
        self.mine_with_token(block, &CancellationToken::new())
    }

    /// Search nonces until the hash carries the required difficulty prefix.
    ///
    /// The search starts at the block's current nonce (0 for fresh blocks)
    /// and increments a wrapping `u64` with no upper bound on attempts;
    /// difficulty 0 succeeds immediately. On success the winning `nonce`
    /// and `hash` are committed exactly once and the block is returned.
    ///
    /// The token is polled every `cancel_check_interval` iterations; when
    /// cancelled the search stops with [`Error::Cancelled`] and the block
    /// is dropped unmodified.
    pub fn mine_with_token(&self, mut block: Block, cancel: &CancellationToken) -> Result<Block> {
        let interval = self.config.cancel_check_interval.max(1);
        let mut attempts: u64 = 0;
        loop {
            if attempts % interval == 0 && cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            let digest = sha256_hex(&block.preimage()?);
            if block.difficulty.is_met_by(&digest) {
                debug!(
                    index = block.index,
                    nonce = %block.nonce,
                    attempts = attempts + 1,
                    "nonce found"
                );
                block.hash = digest;
                return Ok(block);
            }
            block.nonce.increment();
            attempts = attempts.wrapping_add(1);
        }
    }
}
