use core::ops::Range;

use serde::Serialize;

use crate::error::PartitionError;

/// Half-open block of rows `[start, end)` owned by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    #[inline]
    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

pub fn validate(size: usize, workers: usize) -> Result<(), PartitionError> {
    if size == 0 {
        return Err(PartitionError::ZeroSize);
    }
    if workers == 0 {
        return Err(PartitionError::ZeroWorkers);
    }
    if workers > size {
        return Err(PartitionError::TooManyWorkers { workers, size });
    }
    Ok(())
}

/// Split `size` rows into `workers` contiguous blocks.
///
/// Every block gets `size / workers` rows; the first `size % workers` blocks
/// get one extra. Blocks are returned in row order and tile `[0, size)`.
pub fn partition(size: usize, workers: usize) -> Result<Vec<RowRange>, PartitionError> {
    validate(size, workers)?;

    let rows_per_worker = size / workers;
    let extra_rows = size % workers;

    let mut ranges = Vec::with_capacity(workers);
    let mut current = 0;
    for i in 0..workers {
        let end = current + rows_per_worker + usize::from(i < extra_rows);
        ranges.push(RowRange::new(current, end));
        current = end;
    }
    debug_assert_eq!(current, size);

    Ok(ranges)
}
