//! Square integer matrix stored in row-major order.

use core::fmt;

use crate::error::MatrixError;
use crate::partition::RowRange;

/// Element type.
pub type Cell = i32;

/// Accumulator type for partial and grand totals.
pub type Wide = i64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix {
    size: usize,
    cells: Vec<Cell>,
}

impl Matrix {
    /// Number of cells in a `size`x`size` matrix, if it fits in memory at all.
    pub fn check_size(size: usize) -> Result<usize, MatrixError> {
        size
            .checked_mul(size)
            .filter(|&cells| cells <= isize::MAX as usize / core::mem::size_of::<Cell>())
            .ok_or(MatrixError::TooLarge { size })
    }

    fn storage(size: usize) -> Result<Vec<Cell>, MatrixError> {
        let len = Self::check_size(size)?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| MatrixError::TooLarge { size })?;
        Ok(cells)
    }

    pub fn zeros(size: usize) -> Result<Self, MatrixError> {
        Self::from_fn(size, |_, _| 0)
    }

    /// Build from `f(row, col)` for every cell.
    pub fn from_fn(
        size: usize,
        mut f: impl FnMut(usize, usize) -> Cell,
    ) -> Result<Self, MatrixError> {
        let mut cells = Self::storage(size)?;
        for i in 0..size {
            for j in 0..size {
                cells.push(f(i, j));
            }
        }
        Ok(Self { size, cells })
    }

    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, MatrixError> {
        let size = rows.len();
        if size == 0 {
            return Err(MatrixError::Empty);
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(MatrixError::NotSquare {
                    row,
                    expected: size,
                    found: values.len(),
                });
            }
            cells.extend(values);
        }
        Ok(Self { size, cells })
    }

    /// Parse whitespace-separated integers, one row per non-empty line.
    pub fn parse(text: &str) -> Result<Self, MatrixError> {
        let mut rows = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let row = line
                .split_whitespace()
                .map(|token| {
                    token.parse::<Cell>().map_err(|_| MatrixError::Parse {
                        line: idx + 1,
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[Cell] {
        &self.cells[i * self.size..(i + 1) * self.size]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks(0) panics; an empty matrix has no rows anyway
        self.cells.chunks(self.size.max(1))
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Cell {
        self.cells[i * self.size + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: Cell) {
        self.cells[i * self.size + j] = value;
    }

    /// Reference total: plain double loop on the calling thread.
    pub fn sequential_sum(&self) -> Wide {
        let mut sum: Wide = 0;
        for i in 0..self.size {
            for j in 0..self.size {
                sum += Wide::from(self.get(i, j));
            }
        }
        sum
    }

    /// Sum of every cell in rows `[range.start, range.end)`.
    pub fn rows_sum(&self, range: RowRange) -> Wide {
        let mut local: Wide = 0;
        for i in range.rows() {
            for &value in self.row(i) {
                local += Wide::from(value);
            }
        }
        local
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let mut first = true;
            for value in row {
                if !first {
                    f.write_str(" ")?;
                }
                write!(f, "{value}")?;
                first = false;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
