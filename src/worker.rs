//! Worker units: one isolated OS thread per mining task
//!
//! Each submission spawns a dedicated thread that owns its copy of the block
//! for the duration of the search. The boundary serializes the whole block
//! in and the thread reports exactly one outcome back over a oneshot
//! channel: the mined block, a propagated error, or nothing at all, which
//! the handle surfaces as an abnormal exit. A crash inside one worker
//! cannot corrupt the coordinator or sibling workers.

use crate::core::Block;
use crate::error::{Error, Result};
use crate::miner::Miner;
use pin_project::{pin_project, pinned_drop};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::thread;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Handle to one in-flight mining attempt.
///
/// Resolves exactly once: `Ok` with the mined block, `Err` with the fault
/// the worker reported, or [`Error::AbnormalExit`] when the worker thread
/// terminated without reporting anything.
///
/// Cancellation is two-level. [`MiningTask::cancel`] asks the worker to stop
/// at its next periodic check; the task then resolves with
/// [`Error::Cancelled`]. Dropping the handle stops waiting and also cancels
/// the token, so an abandoned worker winds down instead of hashing until it
/// finds its own nonce. Neither interrupts an iteration already in flight.
#[pin_project(PinnedDrop)]
#[derive(Debug)]
pub struct MiningTask {
    #[pin]
    rx: oneshot::Receiver<Result<Block>>,
    cancel: CancellationToken,
    index: u64,
}

impl MiningTask {
    /// Ask the worker to stop at its next cancellation check.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Index of the block this task is mining.
    pub fn block_index(&self) -> u64 {
        self.index
    }
}

impl Future for MiningTask {
    type Output = Result<Block>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        match this.rx.poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_)) => Poll::Ready(Err(Error::abnormal_exit(format!(
                "worker for block #{} terminated without reporting a result",
                this.index
            )))),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[pinned_drop]
impl PinnedDrop for MiningTask {
    fn drop(self: Pin<&mut Self>) {
        self.cancel.cancel();
    }
}

/// Spawn an isolated worker that mines `block` to completion.
///
/// The block is fully serialized across the boundary, so the worker never
/// shares memory with the caller; the caller's copy stays untouched and the
/// completed block comes back as a value through the returned handle.
pub fn spawn(miner: &Miner, block: &Block) -> MiningTask {
    let (tx, rx) = oneshot::channel();
    let cancel = CancellationToken::new();
    let index = block.index;

    match serde_json::to_vec(block) {
        Ok(task_bytes) => {
            let miner = miner.clone();
            let token = cancel.clone();
            let spawned = thread::Builder::new()
                .name(format!("miner-{index}"))
                .spawn(move || {
                    let outcome = run_worker(&miner, &task_bytes, &token);
                    if tx.send(outcome).is_err() {
                        debug!(index, "result discarded; coordinator stopped waiting");
                    }
                });
            if let Err(err) = spawned {
                // The closure was dropped with the sender, so the handle
                // resolves as an abnormal exit.
                warn!(index, "failed to spawn worker thread: {err}");
            }
        }
        Err(err) => {
            // Fatal to this task before any thread exists
            let _ = tx.send(Err(Error::Encoding(err)));
        }
    }

    MiningTask { rx, cancel, index }
}

fn run_worker(miner: &Miner, task_bytes: &[u8], cancel: &CancellationToken) -> Result<Block> {
    let block: Block = serde_json::from_slice(task_bytes)?;
    debug!(index = block.index, difficulty = %block.difficulty, "worker started");
    miner.mine_with_token(block, cancel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Difficulty, Nonce};
    use assert_matches::assert_matches;
    use std::time::Duration;

    fn test_block(index: u64, difficulty: u32) -> Block {
        Block::new(index, "prev", vec![], Difficulty::new(difficulty))
            .with_timestamp(1_700_000_000_000)
    }

    #[tokio::test]
    async fn test_spawn_resolves_with_mined_block() {
        let task = spawn(&Miner::default(), &test_block(1, 2));
        assert_eq!(task.block_index(), 1);

        let mined = tokio::time::timeout(Duration::from_secs(30), task)
            .await
            .expect("mining timed out")
            .unwrap();
        assert!(mined.verify().unwrap());
        assert!(mined.hash.starts_with("00"));
    }

    #[tokio::test]
    async fn test_caller_copy_is_never_touched() {
        let block = test_block(1, 2);
        let task = spawn(&Miner::default(), &block);

        // The worker owns a serialized copy; the submitted block is inert
        assert_eq!(block.nonce, Nonce::default());
        assert!(block.hash.is_empty());

        let mined = task.await.unwrap();
        assert!(mined.is_mined());
        assert_eq!(block.nonce, Nonce::default());
        assert!(block.hash.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_resolves_with_cancelled() {
        // Unreachable difficulty; only cancellation can settle this task
        let task = spawn(&Miner::default(), &test_block(1, 32));
        task.cancel();

        let outcome = tokio::time::timeout(Duration::from_secs(10), task)
            .await
            .expect("cancellation was not observed");
        assert_matches!(outcome, Err(Error::Cancelled));
    }

    #[tokio::test]
    async fn test_closed_channel_surfaces_as_abnormal_exit() {
        let (tx, rx) = oneshot::channel::<Result<Block>>();
        let task = MiningTask {
            rx,
            cancel: CancellationToken::new(),
            index: 7,
        };
        drop(tx);

        let outcome = task.await;
        assert_matches!(outcome, Err(Error::AbnormalExit(msg)) => {
            assert!(msg.contains("block #7"));
        });
    }

    #[tokio::test]
    async fn test_drop_cancels_the_worker() {
        let token = {
            let task = spawn(&Miner::default(), &test_block(1, 32));
            task.cancel.clone()
        };
        assert!(token.is_cancelled());
    }
}
