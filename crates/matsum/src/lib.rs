//! Parallel summation of a square integer matrix.
//!
//! Rows are split into contiguous blocks by [`partition`], and each block is
//! summed on its own thread by [`reduce`]. Workers only read the matrix; the
//! one shared mutable value is the running total behind an [`Accumulator`].

pub mod accumulator;
pub mod error;
pub mod matrix;
pub mod partition;
pub mod reduce;
pub mod report;

pub use accumulator::{Accumulator, AtomicTotal, MergeStrategy, MutexTotal, UnknownStrategy};
pub use error::{MatrixError, PartitionError, ReduceError};
pub use matrix::{Cell, Matrix, Wide};
pub use partition::{partition, validate, RowRange};
pub use reduce::{
    reduce, reduce_with, MergeHook, ReduceOptions, ReduceOptionsBuilder, ReduceOptionsBuilderError,
    Reduction,
};
pub use report::{Assignment, AssignmentReport, Summary};
