//! Shared grand-total cells.
//!
//! Each implementation is the single synchronized value workers merge into.
//! Merges happen once per worker, after its local sum is complete.

use core::fmt;
use core::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ReduceError;
use crate::matrix::Wide;

pub trait Accumulator: Sync {
    /// Add one worker's local sum into the total.
    fn merge(&self, local: Wide) -> Result<(), ReduceError>;

    /// Read the total. Only meaningful after every worker has been joined.
    fn total(&self) -> Result<Wide, ReduceError>;
}

/// Total guarded by a mutex held for one addition.
#[derive(Debug, Default)]
pub struct MutexTotal(Mutex<Wide>);

impl Accumulator for MutexTotal {
    fn merge(&self, local: Wide) -> Result<(), ReduceError> {
        let mut total = self.0.lock().map_err(|_| ReduceError::Synchronization)?;
        *total += local;
        Ok(())
    }

    fn total(&self) -> Result<Wide, ReduceError> {
        self.0
            .lock()
            .map(|total| *total)
            .map_err(|_| ReduceError::Synchronization)
    }
}

/// Lock-free total using a single `fetch_add` per merge.
#[derive(Debug, Default)]
pub struct AtomicTotal(AtomicI64);

impl Accumulator for AtomicTotal {
    fn merge(&self, local: Wide) -> Result<(), ReduceError> {
        self.0.fetch_add(local, Ordering::AcqRel);
        Ok(())
    }

    fn total(&self) -> Result<Wide, ReduceError> {
        Ok(self.0.load(Ordering::Acquire))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    #[default]
    Mutex,
    Atomic,
}

impl MergeStrategy {
    pub const ALL: [MergeStrategy; 2] = [MergeStrategy::Mutex, MergeStrategy::Atomic];

    pub fn as_str(&self) -> &'static str {
        match self {
            MergeStrategy::Mutex => "mutex",
            MergeStrategy::Atomic => "atomic",
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown merge strategy {0:?} (expected \"mutex\" or \"atomic\")")]
pub struct UnknownStrategy(pub String);

impl FromStr for MergeStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mutex" => Ok(MergeStrategy::Mutex),
            "atomic" => Ok(MergeStrategy::Atomic),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}
