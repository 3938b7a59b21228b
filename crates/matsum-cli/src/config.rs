use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::ValueEnum;
use matsum::MergeStrategy;
use matsum_rng::Generator;
use serde::Deserialize;

use crate::args::Cli;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Enter every element on stdin
    Manual,
    /// Generate elements in [0, 99]
    Random,
}

/// Contents of a `--config` YAML file. Every key is optional.
///
/// ```yaml
/// size: 100
/// workers: 8
/// mode: random
/// seed: 42
/// generator: lcg
/// merge: atomic
/// print_matrix: false
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub size: Option<usize>,
    pub workers: Option<usize>,
    pub mode: Option<Mode>,
    pub input: Option<PathBuf>,
    pub seed: Option<u64>,
    pub generator: Option<Generator>,
    pub merge: Option<MergeStrategy>,
    pub print_matrix: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
        serde_yaml::from_slice(&bytes).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// Effective run settings. `None` means "ask on stdin".
#[derive(Debug, Clone)]
pub struct Settings {
    pub size: Option<usize>,
    pub workers: Option<usize>,
    pub mode: Option<Mode>,
    pub input: Option<PathBuf>,
    pub seed: u64,
    pub generator: Generator,
    pub merge: MergeStrategy,
    pub print_matrix: bool,
    pub json: bool,
    pub verify: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            size: None,
            workers: None,
            mode: None,
            input: None,
            seed: 0,
            generator: Generator::default(),
            merge: MergeStrategy::default(),
            print_matrix: true,
            json: false,
            verify: false,
        }
    }
}

impl Settings {
    /// Flags and environment first, then the config file.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::merge(cli, file))
    }

    pub fn merge(cli: &Cli, file: FileConfig) -> Self {
        let seed = cli.seed.or(file.seed).unwrap_or_else(clock_seed);
        // An input file and a population mode are exclusive; the command line
        // decides first, and within the file `input` beats `mode`.
        let (mode, input) = match (cli.mode, &cli.input) {
            (_, Some(path)) => (None, Some(path.clone())),
            (Some(mode), None) => (Some(mode), None),
            (None, None) => match file.input {
                Some(path) => (None, Some(path)),
                None => (file.mode, None),
            },
        };

        Self {
            size: cli.size.or(file.size),
            workers: cli.workers.or(file.workers),
            mode,
            input,
            seed,
            generator: cli.generator.or(file.generator).unwrap_or_default(),
            merge: cli.merge.or(file.merge).unwrap_or_default(),
            print_matrix: !cli.no_print_matrix && file.print_matrix.unwrap_or(true),
            json: cli.json,
            verify: cli.verify,
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
