//! Aggregate-result coordination over worker units
//!
//! The [`Coordinator`] fans blocks out to isolated workers and exposes the
//! standard concurrent-combinator semantics over the resulting handles:
//! join-all (input order, fail-fast), select-first (first to settle, success
//! or error), first-success (aggregate error only when everything fails),
//! join-settled (every outcome as data), and a completion-ordered stream.
//!
//! The coordinator itself never computes; it only suspends while waiting on
//! worker completion signals. The module-level combinators are generic over
//! any task resolving to a block, so callers can mix mining tasks with
//! competing tasks of their own — [`reject_after`] gives deadline semantics
//! without native timeout support.

use crate::core::Block;
use crate::error::{Error, Result};
use crate::miner::Miner;
use crate::worker::{self, MiningTask};
use futures::future;
use futures::stream::{FuturesUnordered, Stream, StreamExt};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Outcome record produced by the settle-all primitives.
///
/// Every input task gets exactly one record, success or failure; nothing is
/// propagated as an error.
#[derive(Debug)]
pub enum TaskOutcome {
    /// The task produced a mined block
    Mined(Block),
    /// The task failed; the reason travels as data
    Failed(Error),
}

impl TaskOutcome {
    /// Whether this record carries a mined block
    pub fn is_mined(&self) -> bool {
        matches!(self, Self::Mined(_))
    }

    /// The mined block, if any
    pub fn block(&self) -> Option<&Block> {
        match self {
            Self::Mined(block) => Some(block),
            Self::Failed(_) => None,
        }
    }

    /// The failure reason, if any
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Mined(_) => None,
            Self::Failed(err) => Some(err),
        }
    }
}

/// Orchestrates one or many worker units per the requested combination
/// policy.
///
/// Blocks are always submitted one worker per block; the caller keeps
/// ownership of its copies and receives completed blocks as values.
#[derive(Debug, Clone, Default)]
pub struct Coordinator {
    miner: Miner,
}

impl Coordinator {
    /// Create a coordinator that runs workers with the given miner
    pub fn new(miner: Miner) -> Self {
        Self { miner }
    }

    /// Submit one block to a fresh worker unit.
    pub fn submit(&self, block: &Block) -> MiningTask {
        debug!(index = block.index, difficulty = %block.difficulty, "submitting block");
        worker::spawn(&self.miner, block)
    }

    /// Mine a single block to completion.
    ///
    /// Fails if the sole worker errors or exits abnormally.
    pub async fn mine(&self, block: &Block) -> Result<Block> {
        self.submit(block).await
    }

    /// Mine every block; the result preserves input order regardless of
    /// completion order, and the first failure short-circuits.
    pub async fn mine_all(&self, blocks: &[Block]) -> Result<Vec<Block>> {
        join_all(blocks.iter().map(|block| self.submit(block))).await
    }

    /// Resolve with the first worker to settle, success or error.
    pub async fn race(&self, blocks: &[Block]) -> Result<Block> {
        select_first(blocks.iter().map(|block| self.submit(block))).await
    }

    /// Resolve with the first successful block; individual failures are
    /// suppressed and only surface as an aggregate when every worker fails.
    pub async fn mine_any(&self, blocks: &[Block]) -> Result<Block> {
        first_success(blocks.iter().map(|block| self.submit(block))).await
    }

    /// Settle every block and deliver one tagged outcome record per input,
    /// in input order. Never fails.
    pub async fn settle_all(&self, blocks: &[Block]) -> Vec<TaskOutcome> {
        join_settled(blocks.iter().map(|block| self.submit(block))).await
    }

    /// Mined blocks in completion order, not submission order.
    ///
    /// The stream is finite, yields one element per input, and is not
    /// restartable; an individual failure surfaces as the `Err` element at
    /// that position.
    pub fn stream_as_completed<'a>(&'a self, blocks: &'a [Block]) -> impl Stream<Item = Result<Block>> + use<'a> {
        completion_stream(blocks.iter().map(|block| self.submit(block)))
    }
}

/// Join all tasks, preserving input order in the output; the first failure
/// short-circuits the whole join.
pub async fn join_all<I>(tasks: I) -> Result<Vec<Block>>
where
    I: IntoIterator,
    I::Item: Future<Output = Result<Block>>,
{
    future::try_join_all(tasks).await
}

/// Resolve with whichever task settles first, success or error.
///
/// An empty input fails immediately rather than pending forever.
pub async fn select_first<I>(tasks: I) -> Result<Block>
where
    I: IntoIterator,
    I::Item: Future<Output = Result<Block>>,
{
    let mut pending: FuturesUnordered<_> = tasks.into_iter().collect();
    match pending.next().await {
        Some(outcome) => outcome,
        None => Err(Error::other("nothing to race: no tasks submitted")),
    }
}

/// Resolve with the first task to succeed; if every task fails, fail with
/// an aggregate carrying all of the individual failures.
pub async fn first_success<I>(tasks: I) -> Result<Block>
where
    I: IntoIterator,
    I::Item: Future<Output = Result<Block>>,
{
    let mut pending: FuturesUnordered<_> = tasks.into_iter().collect();
    let mut failures = Vec::new();
    while let Some(outcome) = pending.next().await {
        match outcome {
            Ok(block) => return Ok(block),
            Err(err) => failures.push(err),
        }
    }
    Err(Error::AllFailed(failures))
}

/// Settle every task and deliver each outcome as data, in input order.
pub async fn join_settled<I>(tasks: I) -> Vec<TaskOutcome>
where
    I: IntoIterator,
    I::Item: Future<Output = Result<Block>>,
{
    future::join_all(tasks)
        .await
        .into_iter()
        .map(|outcome| match outcome {
            Ok(block) => TaskOutcome::Mined(block),
            Err(err) => TaskOutcome::Failed(err),
        })
        .collect()
}

/// Lazy, finite stream of task outcomes in completion order.
pub fn completion_stream<I>(tasks: I) -> impl Stream<Item = Result<Block>>
where
    I: IntoIterator,
    I::Item: Future<Output = Result<Block>>,
{
    tasks.into_iter().collect::<FuturesUnordered<_>>()
}

/// A competing task that fails with [`Error::Timeout`] after `delay`.
///
/// Racing one of these against a mining task implements deadline semantics;
/// the coordinator has no native timeout support and does not need one.
pub async fn reject_after(delay: Duration) -> Result<Block> {
    tokio::time::sleep(delay).await;
    Err(Error::timeout(format!(
        "operation timed out after {}",
        humantime::format_duration(delay)
    )))
}
