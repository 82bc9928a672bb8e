use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Seeds mines onto a freshly created board, keeping `skip` clear.
///
/// Implementations must also call [`Board::compute_adjacency`] once the mines are in place.
pub trait MinePlacer {
    fn place_mines(&mut self, board: &mut Board, skip: Coord2);
}

impl<P: MinePlacer + ?Sized> MinePlacer for &mut P {
    fn place_mines(&mut self, board: &mut Board, skip: Coord2) {
        (**self).place_mines(board, skip)
    }
}
