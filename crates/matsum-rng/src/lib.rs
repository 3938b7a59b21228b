//! Random cell sources for matrix population.
//!
//! Every source yields values in `[0, CELL_MODULUS)`.

use core::fmt;
use core::str::FromStr;

use matsum::{Cell, Matrix, MatrixError};
use serde::Deserialize;

pub mod chacha;
pub mod lcg;

pub use chacha::ChaCha;
pub use lcg::Lcg;

/// Generated cells are reduced modulo this value.
pub const CELL_MODULUS: u32 = 100;

pub trait CellSource {
    fn next_cell(&mut self) -> Cell;
}

impl<S: CellSource + ?Sized> CellSource for Box<S> {
    fn next_cell(&mut self) -> Cell {
        (**self).next_cell()
    }
}

/// Overwrite every cell of `matrix` in row-major order.
pub fn fill<S: CellSource + ?Sized>(matrix: &mut Matrix, source: &mut S) {
    let size = matrix.size();
    for i in 0..size {
        for j in 0..size {
            matrix.set(i, j, source.next_cell());
        }
    }
}

/// A new `size`x`size` matrix drawn from `source`.
pub fn generate<S: CellSource + ?Sized>(
    size: usize,
    source: &mut S,
) -> Result<Matrix, MatrixError> {
    Matrix::from_fn(size, |_, _| source.next_cell())
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generator {
    Lcg,
    #[default]
    ChaCha,
}

impl Generator {
    pub fn source(self, seed: u64) -> Box<dyn CellSource + Send> {
        match self {
            // Fold the high half in so 64-bit seeds stay distinct.
            Generator::Lcg => Box::new(Lcg::new((seed ^ (seed >> 32)) as u32)),
            Generator::ChaCha => Box::new(ChaCha::new(seed)),
        }
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Generator::Lcg => "lcg",
            Generator::ChaCha => "chacha",
        })
    }
}

impl FromStr for Generator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lcg" => Ok(Generator::Lcg),
            "chacha" => Ok(Generator::ChaCha),
            _ => Err(format!("unknown generator {s:?} (expected \"lcg\" or \"chacha\")")),
        }
    }
}
