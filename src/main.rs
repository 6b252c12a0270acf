//! Blockmine CLI
//!
//! Generates demo blocks and mines them under the selected combination
//! policy. A `--timeout` becomes an ordinary competing task raced alongside
//! the workers, which is how the engine models deadlines.

use anyhow::Context;
use blockmine::config::{Args, Config, Mode};
use blockmine::coordinator::{self, Coordinator, TaskOutcome};
use blockmine::core::{Block, Difficulty};
use blockmine::miner::{Miner, MinerConfig};
use blockmine::utils;
use clap::Parser;
use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt};
use rand::Rng;
use serde_json::json;
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::from_args(args).context("loading configuration")?;
    utils::init_logging(&config.logging.level, &config.logging.format);

    info!(
        version = blockmine::VERSION,
        mode = %config.mining.mode,
        count = config.mining.count,
        difficulty = config.mining.difficulty,
        "starting blockmine"
    );

    let miner = Miner::new(MinerConfig {
        cancel_check_interval: config.worker.cancel_check_interval,
    });
    let coordinator = Coordinator::new(miner);
    let blocks = demo_blocks(&config);
    let deadline = config.mining.timeout_duration()?;

    let started = Instant::now();
    match config.mining.mode {
        Mode::Single => {
            let mined = match deadline {
                Some(_) => {
                    coordinator::select_first(submit_all(&coordinator, &blocks[..1], deadline))
                        .await?
                }
                None => coordinator.mine(&blocks[0]).await?,
            };
            report(&mined);
            summarize(&[mined], started);
        }
        Mode::All => {
            if deadline.is_some() {
                warn!("--timeout is ignored in all mode; join-all must settle every task");
            }
            let mined = coordinator.mine_all(&blocks).await?;
            for block in &mined {
                report(block);
            }
            summarize(&mined, started);
        }
        Mode::Race => {
            let winner =
                coordinator::select_first(submit_all(&coordinator, &blocks, deadline)).await?;
            report(&winner);
            summarize(&[winner], started);
        }
        Mode::Any => {
            let winner =
                coordinator::first_success(submit_all(&coordinator, &blocks, deadline)).await?;
            report(&winner);
            summarize(&[winner], started);
        }
        Mode::Settle => {
            let outcomes =
                coordinator::join_settled(submit_all(&coordinator, &blocks, deadline)).await;
            let mut mined = Vec::new();
            for outcome in outcomes {
                match outcome {
                    TaskOutcome::Mined(block) => {
                        report(&block);
                        mined.push(block);
                    }
                    TaskOutcome::Failed(err) => warn!(error = %err, "task failed"),
                }
            }
            summarize(&mined, started);
        }
        Mode::Stream => {
            let mut stream =
                coordinator::completion_stream(submit_all(&coordinator, &blocks, deadline));
            let mut mined = Vec::new();
            while let Some(outcome) = stream.next().await {
                match outcome {
                    Ok(block) => {
                        report(&block);
                        mined.push(block);
                    }
                    Err(err) => warn!(error = %err, "task failed"),
                }
            }
            summarize(&mined, started);
        }
    }

    Ok(())
}

/// Submit every block to its own worker, plus the optional deadline task.
fn submit_all(
    coordinator: &Coordinator,
    blocks: &[Block],
    deadline: Option<Duration>,
) -> Vec<BoxFuture<'static, blockmine::Result<Block>>> {
    let mut tasks: Vec<BoxFuture<'static, blockmine::Result<Block>>> = blocks
        .iter()
        .map(|block| coordinator.submit(block).boxed())
        .collect();
    if let Some(delay) = deadline {
        tasks.push(coordinator::reject_after(delay).boxed());
    }
    tasks
}

fn demo_blocks(config: &Config) -> Vec<Block> {
    let payload: Vec<serde_json::Value> =
        config.mining.payload.iter().map(|entry| json!(entry)).collect();
    (1..=config.mining.count)
        .map(|index| {
            Block::new(
                index,
                random_id(),
                payload.clone(),
                Difficulty::new(config.mining.difficulty),
            )
        })
        .collect()
}

fn random_id() -> String {
    hex::encode(rand::rng().random::<[u8; 16]>())
}

fn report(block: &Block) {
    info!(index = block.index, nonce = %block.nonce, hash = %block.hash, "mined");
}

fn summarize(blocks: &[Block], started: Instant) {
    let attempts: u64 = blocks
        .iter()
        .map(|block| block.nonce.value().saturating_add(1))
        .sum();
    let elapsed = started.elapsed();
    let rate = (attempts as f64 / elapsed.as_secs_f64().max(f64::EPSILON)) as u64;
    info!(
        blocks = blocks.len(),
        attempts,
        elapsed = %humantime::format_duration(Duration::from_millis(elapsed.as_millis() as u64)),
        rate = %utils::format_hashrate(rate),
        "mining complete"
    );
}
