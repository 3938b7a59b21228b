use matsum::Cell;

use crate::{CellSource, CELL_MODULUS};

/// `s = s * 1103515245 + 12345`, emitting bits 16.. of the state.
#[derive(Clone, Debug)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    #[inline]
    fn step(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1103515245).wrapping_add(12345);
        self.state >> 16
    }
}

impl CellSource for Lcg {
    #[inline]
    fn next_cell(&mut self) -> Cell {
        (self.step() % CELL_MODULUS) as Cell
    }
}
