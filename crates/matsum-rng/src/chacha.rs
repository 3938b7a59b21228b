use matsum::Cell;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{CellSource, CELL_MODULUS};

pub struct ChaCha {
    rng: ChaCha8Rng,
}

impl ChaCha {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl CellSource for ChaCha {
    #[inline]
    fn next_cell(&mut self) -> Cell {
        // Modulo bias over 2^32 is negligible for a modulus of 100.
        (self.rng.next_u32() % CELL_MODULUS) as Cell
    }
}
