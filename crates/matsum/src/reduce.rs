//! Concurrent reduction over a row plan.
//!
//! One scoped thread is spawned per [`RowRange`]. Each worker sums its rows
//! into a private local, merges it into the shared [`Accumulator`] once, and
//! exits. The total is read only after every worker has been joined.

use core::fmt;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use derive_builder::Builder;

use crate::accumulator::{Accumulator, AtomicTotal, MergeStrategy, MutexTotal};
use crate::error::ReduceError;
use crate::matrix::{Matrix, Wide};
use crate::partition::RowRange;
use crate::report::Assignment;

/// Called by a worker, with its index, right before it merges.
pub type MergeHook = Arc<dyn Fn(usize) + Send + Sync>;

#[derive(Clone, Builder)]
#[builder(default)]
pub struct ReduceOptions {
    pub merge: MergeStrategy,
    /// Refuse to start more than this many workers.
    #[builder(setter(strip_option))]
    pub max_threads: Option<usize>,
    /// Worker threads are named `{thread_name}-{index}`.
    #[builder(setter(into))]
    pub thread_name: String,
    #[builder(setter(strip_option))]
    pub before_merge: Option<MergeHook>,
}

impl Default for ReduceOptions {
    fn default() -> Self {
        Self {
            merge: MergeStrategy::Mutex,
            max_threads: None,
            thread_name: "matsum-worker".to_string(),
            before_merge: None,
        }
    }
}

impl fmt::Debug for ReduceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReduceOptions")
            .field("merge", &self.merge)
            .field("max_threads", &self.max_threads)
            .field("thread_name", &self.thread_name)
            .field("before_merge", &self.before_merge.is_some())
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reduction {
    pub total: Wide,
    /// From the first spawn to the last join.
    pub elapsed: Duration,
    pub workers: Vec<Assignment>,
}

/// Sum `matrix` over `ranges` with default options (mutex merge, no cap).
pub fn reduce(matrix: &Matrix, ranges: &[RowRange]) -> Result<Reduction, ReduceError> {
    reduce_with(matrix, ranges, &ReduceOptions::default())
}

pub fn reduce_with(
    matrix: &Matrix,
    ranges: &[RowRange],
    options: &ReduceOptions,
) -> Result<Reduction, ReduceError> {
    check_plan(matrix.size(), ranges)?;

    match options.merge {
        MergeStrategy::Mutex => run(matrix, ranges, options, MutexTotal::default()),
        MergeStrategy::Atomic => run(matrix, ranges, options, AtomicTotal::default()),
    }
}

/// Ranges must be non-empty, in order, and tile `[0, size)` exactly.
fn check_plan(size: usize, ranges: &[RowRange]) -> Result<(), ReduceError> {
    let mismatch = |reason: String| ReduceError::PlanMismatch { size, reason };

    if ranges.is_empty() {
        return Err(mismatch("no row ranges".into()));
    }

    let mut expected_start = 0;
    for (worker, range) in ranges.iter().enumerate() {
        if range.start != expected_start {
            return Err(mismatch(format!(
                "range {worker} starts at row {}, expected {expected_start}",
                range.start
            )));
        }
        if range.is_empty() {
            return Err(mismatch(format!("range {worker} is empty")));
        }
        expected_start = range.end;
    }

    if expected_start != size {
        return Err(mismatch(format!("ranges end at row {expected_start}")));
    }
    Ok(())
}

fn run<A: Accumulator>(
    matrix: &Matrix,
    ranges: &[RowRange],
    options: &ReduceOptions,
    total: A,
) -> Result<Reduction, ReduceError> {
    let requested = ranges.len();
    let span = tracing::debug_span!(
        "reduce",
        size = matrix.size(),
        workers = requested,
        merge = %options.merge
    );
    let _enter = span.enter();

    let started = Instant::now();
    thread::scope(|scope| -> Result<(), ReduceError> {
        let mut handles = Vec::with_capacity(requested);
        let mut refused = None;

        for (worker, &range) in ranges.iter().enumerate() {
            if options.max_threads.is_some_and(|cap| worker >= cap) {
                tracing::warn!(spawned = worker, requested, "worker cap reached");
                refused = Some(ReduceError::Scheduling {
                    spawned: worker,
                    requested,
                    source: None,
                });
                break;
            }

            let total = &total;
            let hook = options.before_merge.as_deref();
            let parent = span.clone();
            let spawned = thread::Builder::new()
                .name(format!("{}-{worker}", options.thread_name))
                .spawn_scoped(scope, move || {
                    let _enter = tracing::trace_span!(
                        parent: &parent,
                        "worker",
                        worker,
                        start = range.start,
                        end = range.end
                    )
                    .entered();
                    work(matrix, worker, range, total, hook)
                });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    tracing::error!(spawned = worker, requested, %source, "failed to spawn worker");
                    refused = Some(ReduceError::Scheduling {
                        spawned: worker,
                        requested,
                        source: Some(source),
                    });
                    break;
                }
            }
        }

        // Join barrier: every started worker is joined, even after a refused
        // spawn, so no panic escapes the scope.
        let mut failure = None;
        for (worker, handle) in handles.into_iter().enumerate() {
            let outcome = handle
                .join()
                .map_err(|_| ReduceError::WorkerPanicked { worker })
                .and_then(|merged| merged);
            if let Err(e) = outcome {
                failure.get_or_insert(e);
            }
        }
        refused.or(failure).map_or(Ok(()), Err)
    })?;
    let elapsed = started.elapsed();

    let total = total.total()?;
    tracing::debug!(total, elapsed_us = elapsed.as_micros() as u64, "reduction complete");

    Ok(Reduction {
        total,
        elapsed,
        workers: Assignment::from_ranges(ranges),
    })
}

fn work<A: Accumulator>(
    matrix: &Matrix,
    worker: usize,
    range: RowRange,
    total: &A,
    before_merge: Option<&(dyn Fn(usize) + Send + Sync)>,
) -> Result<(), ReduceError> {
    let local = matrix.rows_sum(range);
    tracing::trace!(local, "local sum");

    if let Some(hook) = before_merge {
        hook(worker);
    }
    total.merge(local)?;
    tracing::debug!(worker, rows = range.len(), "merged");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::partition;
    use crate::Cell;

    fn counting(size: usize) -> Matrix {
        Matrix::from_fn(size, |i, j| (i * size + j + 1) as Cell).unwrap()
    }

    #[test]
    fn test_four_by_four_three_workers() {
        let m = counting(4);
        let ranges = partition(4, 3).unwrap();
        let r = reduce(&m, &ranges).unwrap();
        assert_eq!(r.total, 136);
        assert_eq!(r.workers.len(), 3);
        assert_eq!(r.workers[0].range, RowRange::new(0, 2));
    }

    #[test]
    fn test_all_ones_two_workers() {
        let m = Matrix::from_fn(5, |_, _| 1).unwrap();
        let ranges = partition(5, 2).unwrap();
        assert_eq!(ranges, [RowRange::new(0, 3), RowRange::new(3, 5)]);
        assert_eq!(reduce(&m, &ranges).unwrap().total, 25);
    }

    #[test]
    fn test_both_strategies_agree() {
        let m = Matrix::from_fn(9, |i, j| (i as Cell - 4) * (j as Cell + 1)).unwrap();
        for merge in MergeStrategy::ALL {
            let options = ReduceOptionsBuilder::default().merge(merge).build().unwrap();
            for workers in 1..=9 {
                let ranges = partition(9, workers).unwrap();
                let r = reduce_with(&m, &ranges, &options).unwrap();
                assert_eq!(r.total, m.sequential_sum(), "{merge} with {workers} workers");
            }
        }
    }

    #[test]
    fn test_worker_cap_is_scheduling_error() {
        let m = counting(4);
        let ranges = partition(4, 3).unwrap();
        let options = ReduceOptionsBuilder::default().max_threads(2).build().unwrap();

        match reduce_with(&m, &ranges, &options) {
            Err(ReduceError::Scheduling {
                spawned,
                requested,
                source,
            }) => {
                assert_eq!((spawned, requested), (2, 3));
                assert!(source.is_none());
            }
            other => panic!("expected scheduling error, got {other:?}"),
        }
    }

    #[test]
    fn test_scheduling_error_wins_over_started_worker_panic() {
        let m = counting(4);
        let ranges = partition(4, 2).unwrap();
        let hook: MergeHook = Arc::new(|worker| {
            if worker == 0 {
                panic!("injected");
            }
        });
        let options = ReduceOptionsBuilder::default()
            .max_threads(1)
            .before_merge(hook)
            .build()
            .unwrap();

        assert!(matches!(
            reduce_with(&m, &ranges, &options),
            Err(ReduceError::Scheduling {
                spawned: 1,
                requested: 2,
                source: None
            })
        ));
    }

    #[test]
    fn test_rejects_mismatched_plan() {
        let m = counting(4);
        let cases: [&[RowRange]; 4] = [
            &[],
            &[RowRange::new(0, 2), RowRange::new(3, 4)],
            &[RowRange::new(0, 2), RowRange::new(2, 2), RowRange::new(2, 4)],
            &[RowRange::new(0, 3)],
        ];
        for ranges in cases {
            assert!(
                matches!(reduce(&m, ranges), Err(ReduceError::PlanMismatch { size: 4, .. })),
                "{ranges:?}"
            );
        }
    }

    #[test]
    fn test_panicking_hook_surfaces_as_worker_panic() {
        let m = counting(4);
        let ranges = partition(4, 2).unwrap();
        let hook: MergeHook = Arc::new(|worker| {
            if worker == 1 {
                panic!("injected");
            }
        });
        let options = ReduceOptionsBuilder::default().before_merge(hook).build().unwrap();

        assert!(matches!(
            reduce_with(&m, &ranges, &options),
            Err(ReduceError::WorkerPanicked { worker: 1 })
        ));
    }
}
