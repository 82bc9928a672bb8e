use super::*;

/// Places mines at a predetermined list of coordinates.
///
/// Useful to replay a known layout. Coordinates outside the board or equal to the start cell are
/// dropped so the first activation stays safe.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FixedMinePlacer {
    mines: Vec<Coord2>,
}

impl FixedMinePlacer {
    pub fn new(mines: impl Into<Vec<Coord2>>) -> Self {
        Self {
            mines: mines.into(),
        }
    }
}

impl MinePlacer for FixedMinePlacer {
    fn place_mines(&mut self, board: &mut Board, skip: Coord2) {
        for &coords in &self.mines {
            if coords == skip {
                log::warn!("Fixed mine at start cell {:?} dropped", coords);
                continue;
            }
            match board.get_mut(coords) {
                Some(cell) => cell.is_mine = true,
                None => log::warn!("Fixed mine at {:?} is outside the board", coords),
            }
        }

        board.compute_adjacency();
    }
}
