use core::ops::{Index, IndexMut};
use ndarray::Array2;

use crate::*;

/// Grid of cells for a single game, addressed by `(row, col)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    difficulty: Difficulty,
    cells: Array2<Cell>,
}

impl Board {
    /// Allocates a cleared board, mines are placed later by a [`MinePlacer`].
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            cells: Array2::default(difficulty.size.to_nd_index()),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn size(&self) -> Coord2 {
        self.difficulty.size
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size())
    }

    pub fn get(&self, coords: Coord2) -> Option<&Cell> {
        self.cells.get(coords.to_nd_index())
    }

    pub fn get_mut(&mut self, coords: Coord2) -> Option<&mut Cell> {
        self.cells.get_mut(coords.to_nd_index())
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    /// Every coordinate of the board in row-major order.
    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (rows, cols) = self.size();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }

    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    pub fn mine_count(&self) -> CellCount {
        self.count_cells(|cell| cell.is_mine)
    }

    pub fn unrevealed_count(&self) -> CellCount {
        self.count_cells(|cell| !cell.revealed)
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        let count = self
            .iter_neighbors(coords)
            .filter(|&pos| self[pos].is_mine)
            .count();
        // at most 8 neighbors
        count as u8
    }

    /// Stores the adjacent mine count on every non-mine cell.
    ///
    /// Called once per game right after mine placement.
    pub fn compute_adjacency(&mut self) {
        for coords in self.iter_coords() {
            if !self[coords].is_mine {
                self[coords].adjacent_mines = self.adjacent_mine_count(coords);
            }
        }
    }

    fn count_cells(&self, predicate: impl Fn(&Cell) -> bool) -> CellCount {
        let count = self.cells.iter().filter(|cell| predicate(cell)).count();
        // bounded by the board size, which fits a CellCount
        count as CellCount
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Board {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}
