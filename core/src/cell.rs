use serde::{Deserialize, Serialize};

/// Full state of a single board cell, including what the player cannot see.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub is_mine: bool,
    pub revealed: bool,
    pub flagged: bool,
    /// Only meaningful for non-mine cells, set once mines have been placed.
    pub adjacent_mines: u8,
}

impl Cell {
    pub const fn view(self) -> CellView {
        match self {
            Cell {
                revealed: true,
                is_mine: true,
                ..
            } => CellView::Mine,
            Cell {
                revealed: true,
                adjacent_mines,
                ..
            } => CellView::Revealed(adjacent_mines),
            Cell { flagged: true, .. } => CellView::Flagged,
            _ => CellView::Hidden,
        }
    }
}

/// Player-visible projection of a cell handed to the presentation layer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    #[default]
    Hidden,
    Flagged,
    Revealed(u8),
    Mine,
    /// The mine that ended the game.
    Exploded,
}
