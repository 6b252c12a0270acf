//! Configuration management for the mining engine

use crate::core::constants::HASH_HEX_LEN;
use crate::error::{Error, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(
    name = "blockmine",
    about = "Parallel proof-of-work block mining engine",
    version,
    author
)]
pub struct Args {
    /// Configuration file path (JSON)
    #[clap(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of demo blocks to mine
    #[clap(short = 'n', long, env = "BLOCKMINE_COUNT")]
    pub count: Option<u64>,

    /// Difficulty in leading zero hex characters
    #[clap(short, long, env = "BLOCKMINE_DIFFICULTY")]
    pub difficulty: Option<u32>,

    /// Combination mode applied to the submitted blocks
    #[clap(short, long, env = "BLOCKMINE_MODE")]
    pub mode: Option<String>,

    /// Deadline raced against mining as a competing task (e.g. "2s")
    #[clap(short, long)]
    pub timeout: Option<String>,

    /// Payload entries placed in every demo block
    #[clap(short, long)]
    pub payload: Vec<String>,

    /// Iterations between cancellation checks in the search loop
    #[clap(long)]
    pub cancel_check_interval: Option<u64>,

    /// Log level
    #[clap(short, long)]
    pub log_level: Option<String>,

    /// Log format (plain or json)
    #[clap(long)]
    pub log_format: Option<String>,
}

/// Combination policy applied to the submitted blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Mine one block to completion
    Single,
    /// Mine every block, input order, fail-fast
    All,
    /// First task to settle, success or error
    Race,
    /// First successful block; aggregate error only if all fail
    Any,
    /// One tagged outcome record per input, never fails
    Settle,
    /// Mined blocks in completion order
    Stream,
}

impl Mode {
    /// Get all available modes
    pub fn all_modes() -> &'static [Mode] {
        &[
            Mode::Single,
            Mode::All,
            Mode::Race,
            Mode::Any,
            Mode::Settle,
            Mode::Stream,
        ]
    }

    /// Get the name of the mode
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Single => "single",
            Mode::All => "all",
            Mode::Race => "race",
            Mode::Any => "any",
            Mode::Settle => "settle",
            Mode::Stream => "stream",
        }
    }

    /// Parse a mode from a string
    pub fn parse_mode(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "single" => Some(Mode::Single),
            "all" => Some(Mode::All),
            "race" => Some(Mode::Race),
            "any" => Some(Mode::Any),
            "settle" => Some(Mode::Settle),
            "stream" => Some(Mode::Stream),
            _ => None,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Mining configuration
    #[serde(default)]
    pub mining: MiningConfig,

    /// Worker configuration
    #[serde(default)]
    pub worker: WorkerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Mining configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiningConfig {
    /// Number of demo blocks to mine
    #[serde(default = "default_count")]
    pub count: u64,

    /// Difficulty in leading zero hex characters
    #[serde(default = "default_difficulty")]
    pub difficulty: u32,

    /// Combination mode
    #[serde(default = "default_mode")]
    pub mode: Mode,

    /// Optional deadline raced against mining, humantime format
    #[serde(default)]
    pub timeout: Option<String>,

    /// Payload entries placed in every demo block
    #[serde(default)]
    pub payload: Vec<String>,
}

impl MiningConfig {
    /// Parse the configured deadline, if any.
    pub fn timeout_duration(&self) -> Result<Option<Duration>> {
        self.timeout
            .as_deref()
            .map(|raw| {
                humantime::parse_duration(raw)
                    .map_err(|e| Error::config(format!("invalid timeout '{raw}': {e}")))
            })
            .transpose()
    }
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            difficulty: default_difficulty(),
            mode: default_mode(),
            timeout: None,
            payload: Vec::new(),
        }
    }
}

/// Worker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Iterations between cancellation checks in the search loop
    #[serde(default = "default_cancel_check_interval")]
    pub cancel_check_interval: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            cancel_check_interval: default_cancel_check_interval(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (plain or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_count() -> u64 {
    1
}

fn default_difficulty() -> u32 {
    2
}

fn default_mode() -> Mode {
    Mode::Single
}

fn default_cancel_check_interval() -> u64 {
    1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "plain".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mining: MiningConfig::default(),
            worker: WorkerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Build the effective configuration: file settings first, then CLI and
    /// environment overrides on top.
    pub fn from_args(args: Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(count) = args.count {
            config.mining.count = count;
        }
        if let Some(difficulty) = args.difficulty {
            config.mining.difficulty = difficulty;
        }
        if let Some(mode) = &args.mode {
            config.mining.mode = Mode::parse_mode(mode)
                .ok_or_else(|| Error::config(format!("unknown mode: {mode}")))?;
        }
        if args.timeout.is_some() {
            config.mining.timeout = args.timeout;
        }
        if !args.payload.is_empty() {
            config.mining.payload = args.payload;
        }
        if let Some(interval) = args.cancel_check_interval {
            config.worker.cancel_check_interval = interval;
        }
        if let Some(level) = args.log_level {
            config.logging.level = level;
        }
        if let Some(format) = args.log_format {
            config.logging.format = format;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.mining.count == 0 {
            return Err(Error::config("count must be at least 1"));
        }
        if self.mining.difficulty as usize > HASH_HEX_LEN {
            return Err(Error::config(format!(
                "difficulty {} exceeds the {} hex characters of a SHA-256 digest",
                self.mining.difficulty, HASH_HEX_LEN
            )));
        }
        if self.worker.cancel_check_interval == 0 {
            return Err(Error::config("cancel_check_interval must be at least 1"));
        }
        if !matches!(self.logging.format.as_str(), "plain" | "json") {
            return Err(Error::config(format!(
                "unknown log format: {}",
                self.logging.format
            )));
        }
        self.mining.timeout_duration()?;
        Ok(())
    }
}
