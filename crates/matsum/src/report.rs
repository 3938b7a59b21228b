use core::fmt;

use serde::Serialize;

use crate::accumulator::MergeStrategy;
use crate::matrix::Wide;
use crate::partition::RowRange;
use crate::reduce::Reduction;

/// Which rows a worker was given.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub worker: usize,
    pub range: RowRange,
}

impl Assignment {
    pub fn from_ranges(ranges: &[RowRange]) -> Vec<Assignment> {
        ranges
            .iter()
            .enumerate()
            .map(|(worker, &range)| Assignment { worker, range })
            .collect()
    }

    pub fn rows(&self) -> usize {
        self.range.len()
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Row bounds are printed inclusive.
        write!(
            f,
            "Worker {} will process rows {} to {} (Total rows: {})",
            self.worker,
            self.range.start,
            self.range.end - 1,
            self.rows()
        )
    }
}

pub struct AssignmentReport<'a>(pub &'a [Assignment]);

impl fmt::Display for AssignmentReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Worker assignments:")?;
        for assignment in self.0 {
            writeln!(f, "{assignment}")?;
        }
        Ok(())
    }
}

/// Machine-readable result of one run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub size: usize,
    pub workers: usize,
    pub merge: MergeStrategy,
    pub assignments: Vec<Assignment>,
    pub total: Wide,
    pub elapsed_micros: u64,
}

impl Summary {
    pub fn new(size: usize, merge: MergeStrategy, reduction: &Reduction) -> Self {
        Self {
            size,
            workers: reduction.workers.len(),
            merge,
            assignments: reduction.workers.clone(),
            total: reduction.total,
            elapsed_micros: reduction.elapsed.as_micros() as u64,
        }
    }
}
