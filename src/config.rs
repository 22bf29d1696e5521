//! Runtime configuration for the hash cracker.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::candidate::SearchSpace;
use crate::digest::DigestAlgorithm;
use crate::worker::{CrackOptions, PartitionStrategy};

/// Unsalted Hash Cracker
///
/// Recovers lowercase passwords by trying every candidate between the
/// minimum and maximum length until all target hashes are matched.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Path to a file containing the target hashes (one per line)
    #[arg(short, long)]
    pub file: PathBuf,

    /// Minimum password length
    #[arg(long = "min")]
    pub min_length: usize,

    /// Maximum password length
    #[arg(long = "max")]
    pub max_length: usize,

    /// Digest algorithm: sha1, sha256, sha512 or keccak256
    #[arg(short, long, default_value = "sha1")]
    pub algorithm: DigestAlgorithm,

    /// Number of worker threads (default: number of CPU cores)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Partition strategy: balanced or by-length
    #[arg(short, long, default_value = "balanced")]
    pub strategy: PartitionStrategy,

    /// Stop searching after this many seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Progress report interval in seconds
    #[arg(short = 'r', long, default_value = "5")]
    pub report_interval: u64,

    /// Log worker activity (RUST_LOG takes precedence)
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,
}

impl Config {
    /// Returns the number of workers, defaulting to CPU count
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    /// Returns the validated length bounds
    pub fn search_space(&self) -> Result<SearchSpace, ConfigError> {
        SearchSpace::new(self.min_length, self.max_length)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.search_space()?;

        if self.workers == Some(0) {
            return Err(ConfigError::InvalidWorkers(
                "At least one worker is required".into(),
            ));
        }

        if self.report_interval == 0 {
            return Err(ConfigError::InvalidInterval(
                "Report interval must be at least one second".into(),
            ));
        }

        if self.timeout == Some(0) {
            return Err(ConfigError::InvalidInterval(
                "Timeout must be at least one second".into(),
            ));
        }

        Ok(())
    }

    /// Returns the search options described by this configuration
    pub fn crack_options(&self) -> CrackOptions {
        CrackOptions {
            workers: self.worker_count(),
            strategy: self.strategy,
            deadline: self.timeout.map(Duration::from_secs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid length bounds: {0}")]
    InvalidLength(String),

    #[error("Invalid worker count: {0}")]
    InvalidWorkers(String),

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),
}
