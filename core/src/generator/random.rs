use rand::prelude::*;

use super::*;

/// Uniform placement by rejection sampling: draw a random cell, keep it unless it is the start
/// cell or already holds a mine.
#[derive(Clone, Debug)]
pub struct RandomMinePlacer {
    rng: SmallRng,
}

impl RandomMinePlacer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl MinePlacer for RandomMinePlacer {
    fn place_mines(&mut self, board: &mut Board, skip: Coord2) {
        let difficulty = board.difficulty();
        let (rows, cols) = difficulty.size;

        // the start cell is the only one reserved, so this is the most that can fit
        let capacity = if board.contains(skip) {
            difficulty.total_cells() - 1
        } else {
            difficulty.total_cells()
        };
        let requested = difficulty.mines;
        let mines = requested.min(capacity);
        if mines < requested {
            log::warn!(
                "Minefield already full, requested {} but only fits {}",
                requested,
                capacity
            );
        }

        let mut placed = 0;
        while placed < mines {
            let coords = (self.rng.random_range(0..rows), self.rng.random_range(0..cols));
            if coords == skip || board[coords].is_mine {
                continue;
            }
            board[coords].is_mine = true;
            placed += 1;
        }
        log::debug!("Placed {} mines, start cell {:?} kept clear", placed, skip);

        board.compute_adjacency();
    }
}
