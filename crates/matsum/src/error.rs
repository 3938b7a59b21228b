use thiserror::Error;

/// Rejected `(size, workers)` pair. Nothing is partitioned when this is returned.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PartitionError {
    #[error("matrix size must be at least 1")]
    ZeroSize,
    #[error("worker count must be at least 1")]
    ZeroWorkers,
    #[error("worker count {workers} exceeds matrix size {size}")]
    TooManyWorkers { workers: usize, size: usize },
}

#[derive(Debug, Error)]
pub enum ReduceError {
    /// A worker thread could not be started. Already-started workers are
    /// joined before this is returned and their partial total is dropped.
    #[error("could not start all workers: spawned {spawned} of {requested}")]
    Scheduling {
        spawned: usize,
        requested: usize,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("shared total lock is poisoned")]
    Synchronization,

    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },

    #[error("row plan does not fit a {size}x{size} matrix: {reason}")]
    PlanMismatch { size: usize, reason: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("matrix has no rows")]
    Empty,

    #[error("row {row} has {found} columns, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("a {size}x{size} matrix does not fit in memory")]
    TooLarge { size: usize },

    #[error("line {line}: {token:?} is not an integer")]
    Parse { line: usize, token: String },
}
