//! End-to-end tests for the complete mining flow
//!
//! Difficulty-based ordering between concurrent workers is probabilistic,
//! so these tests only make ordering assertions where the difficulty gap
//! makes the outcome effectively certain, and assert the mined-block
//! invariant everywhere else.

use assert_matches::assert_matches;
use blockmine::{
    coordinator::{self, Coordinator},
    core::{Block, Difficulty, Nonce},
    error::Error,
};
use futures::{FutureExt, StreamExt};
use rand::Rng;
use std::time::Duration;

fn random_id() -> String {
    hex::encode(rand::rng().random::<[u8; 16]>())
}

fn test_block(index: u64, difficulty: u32) -> Block {
    Block::new(index, random_id(), vec![], Difficulty::new(difficulty))
}

#[tokio::test]
async fn test_mines_with_low_difficulty() {
    let coordinator = Coordinator::default();
    let mined = coordinator.mine(&test_block(1, 2)).await.unwrap();

    assert!(mined.hash.starts_with("00"));
    assert!(mined.verify().unwrap());
}

#[tokio::test]
async fn test_submission_leaves_the_callers_block_untouched() {
    let coordinator = Coordinator::default();
    let block = test_block(1, 3);
    let task = coordinator.submit(&block);

    // The worker owns a serialized copy; nothing is shared while it runs
    assert_eq!(block.nonce, Nonce::new(0));
    assert!(block.hash.is_empty());

    let mined = task.await.unwrap();
    assert!(mined.is_mined());
    assert_eq!(block.nonce, Nonce::new(0));
    assert!(block.hash.is_empty());
}

#[tokio::test]
async fn test_mine_all_preserves_input_order() {
    let coordinator = Coordinator::default();
    let blocks = vec![test_block(1, 1), test_block(2, 4)];

    let mined = tokio::time::timeout(Duration::from_secs(60), coordinator.mine_all(&blocks))
        .await
        .expect("mining timed out")
        .unwrap();

    let indexes: Vec<u64> = mined.iter().map(|b| b.index).collect();
    assert_eq!(indexes, vec![1, 2]);
    for block in &mined {
        assert!(block.verify().unwrap());
    }
}

#[tokio::test]
async fn test_race_prefers_the_trivial_difficulty() {
    let coordinator = Coordinator::default();
    // Difficulty 0 settles on the first attempt; difficulty 6 takes
    // millions of attempts on average, so the winner is not in doubt
    let blocks = vec![test_block(1, 0), test_block(2, 6)];

    let winner = coordinator.race(&blocks).await.unwrap();
    assert_eq!(winner.index, 1);
    assert!(winner.verify().unwrap());
}

#[tokio::test]
async fn test_deadline_beats_an_unreachable_difficulty() {
    let coordinator = Coordinator::default();
    let block = test_block(1, 12);

    let outcome = coordinator::select_first(vec![
        coordinator.submit(&block).boxed(),
        coordinator::reject_after(Duration::from_millis(300)).boxed(),
    ])
    .await;

    assert_matches!(outcome, Err(Error::Timeout(msg)) => {
        assert!(msg.contains("timed out after 300ms"), "unexpected message: {msg}");
    });
}

#[tokio::test]
async fn test_any_does_not_reject_when_one_competitor_fails() {
    let coordinator = Coordinator::default();
    let block = test_block(1, 2);

    // The deadline fires long before difficulty 2 could plausibly be a
    // problem; first-success must keep waiting for the mined block
    let winner = coordinator::first_success(vec![
        coordinator.submit(&block).boxed(),
        coordinator::reject_after(Duration::from_millis(1)).boxed(),
    ])
    .await
    .unwrap();

    assert_eq!(winner.index, 1);
    assert!(winner.verify().unwrap());
}

#[tokio::test]
async fn test_settle_all_returns_one_record_per_input() {
    let coordinator = Coordinator::default();
    let block = test_block(1, 2);

    let outcomes = coordinator::join_settled(vec![
        coordinator.submit(&block).boxed(),
        coordinator::reject_after(Duration::from_millis(10)).boxed(),
    ])
    .await;

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].is_mined());
    assert_eq!(outcomes[0].block().unwrap().index, 1);
    assert_matches!(outcomes[1].error(), Some(Error::Timeout(msg)) => {
        assert!(msg.contains("timed out after 10ms"));
    });
}

#[tokio::test]
async fn test_join_all_fails_when_a_deadline_task_is_included() {
    let coordinator = Coordinator::default();
    let block = test_block(1, 1);

    let outcome = coordinator::join_all(vec![
        coordinator.submit(&block).boxed(),
        coordinator::reject_after(Duration::from_millis(50)).boxed(),
    ])
    .await;

    assert_matches!(outcome, Err(Error::Timeout(_)));
}

#[tokio::test]
async fn test_stream_yields_every_block_in_completion_order() {
    let coordinator = Coordinator::default();
    let blocks = vec![test_block(1, 2), test_block(2, 2), test_block(3, 2)];

    let mined: Vec<Block> = coordinator
        .stream_as_completed(&blocks)
        .map(|outcome| outcome.unwrap())
        .collect()
        .await;

    assert_eq!(mined.len(), 3);
    for block in &mined {
        assert!(block.hash.starts_with("00"));
        assert!(block.verify().unwrap());
    }

    let mut indexes: Vec<u64> = mined.iter().map(|b| b.index).collect();
    indexes.sort_unstable();
    assert_eq!(indexes, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_cancellation_stops_an_unbounded_search() {
    let coordinator = Coordinator::default();
    let task = coordinator.submit(&test_block(1, 12));
    task.cancel();

    let outcome = tokio::time::timeout(Duration::from_secs(10), task)
        .await
        .expect("cancellation was not observed in time");
    assert_matches!(outcome, Err(Error::Cancelled));
}
