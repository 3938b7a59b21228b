use std::path::PathBuf;

use clap::{ArgAction, Parser};
use matsum::MergeStrategy;
use matsum_rng::Generator;

use crate::config::Mode;

/// matsum command-line interface
///
/// Anything not given here, in the environment, or in `--config` is prompted
/// for on stdin.
#[derive(Parser, Debug)]
#[command(
    name = "matsum",
    version,
    about = "Sum an NxN integer matrix by splitting its rows across worker threads"
)]
pub struct Cli {
    /// Matrix size N
    #[arg(short = 'n', long, env = "MATSUM_SIZE")]
    pub size: Option<usize>,

    /// Number of worker threads (1 to N)
    #[arg(short = 'w', long, env = "MATSUM_WORKERS")]
    pub workers: Option<usize>,

    /// How to populate the matrix
    #[arg(long, value_enum, env = "MATSUM_MODE", conflicts_with = "input")]
    pub mode: Option<Mode>,

    /// Read the matrix from a file of whitespace-separated rows
    #[arg(long, env = "MATSUM_INPUT")]
    pub input: Option<PathBuf>,

    /// Seed for random generation (defaults to the wall clock)
    #[arg(long, env = "MATSUM_SEED")]
    pub seed: Option<u64>,

    /// Random generator: lcg or chacha
    #[arg(long, env = "MATSUM_GENERATOR")]
    pub generator: Option<Generator>,

    /// How workers merge into the total: mutex or atomic
    #[arg(long, env = "MATSUM_MERGE")]
    pub merge: Option<MergeStrategy>,

    /// YAML config file
    #[arg(long, env = "MATSUM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Do not print a generated matrix
    #[arg(long)]
    pub no_print_matrix: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Check the total against a sequential sum
    #[arg(long)]
    pub verify: bool,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
