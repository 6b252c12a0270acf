//! # Blockmine
//!
//! A parallel proof-of-work block mining engine: given a block's contents
//! and a target difficulty, find a nonce whose SHA-256 hash carries the
//! required number of leading zero hex characters, using one or many
//! isolated workers with composable aggregate-result semantics.
//!
//! ## Architecture
//!
//! The engine is built in layers, leaves first:
//!
//! - [`core`] — the block record, nonce, difficulty, and the hashing leaf
//! - [`miner`] — the sequential nonce-search kernel with a periodic
//!   cancellation check
//! - [`worker`] — one isolated OS thread per task, serialize-in/value-out
//!   boundary, exactly one reported outcome
//! - [`coordinator`] — combinators over worker handles: join-all,
//!   select-first, first-success, join-settled, and a completion-ordered
//!   stream; deadlines are ordinary competing tasks
//!
//! Blocks cross the worker boundary by serialization and come back by
//! value, so a caller's copy is never mutated by an in-flight task.

#![warn(
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications,
    clippy::all
)]
#![forbid(unsafe_code)]

pub mod config;
pub mod coordinator;
pub mod core;
pub mod error;
pub mod miner;
pub mod utils;
pub mod worker;

pub use crate::error::{Error, Result};
pub use config::Config;
pub use coordinator::{Coordinator, TaskOutcome};
pub use core::{Block, Difficulty, Nonce};
pub use miner::{Miner, MinerConfig};
pub use worker::MiningTask;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        config::{Config, Mode},
        coordinator::{Coordinator, TaskOutcome},
        core::{Block, Difficulty, Nonce},
        error::{Error, Result},
        miner::{Miner, MinerConfig},
        worker::MiningTask,
    };
}
