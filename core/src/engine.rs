use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    /// Safe cells were opened, holds how many.
    Revealed(CellCount),
    HitMine,
}

impl Board {
    /// Reveals a cell, flood-filling outwards from cells with no adjacent mines.
    ///
    /// Out of bounds, already revealed and flagged cells are left alone. Hitting a mine reveals
    /// only that cell.
    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        let Some(cell) = self.get_mut(coords) else {
            return RevealOutcome::NoChange;
        };
        if cell.revealed || cell.flagged {
            return RevealOutcome::NoChange;
        }

        cell.revealed = true;
        if cell.is_mine {
            log::debug!("Revealed mine at {:?}", coords);
            return RevealOutcome::HitMine;
        }

        let mut revealed: CellCount = 1;
        let mut pending = Vec::new();
        if cell.adjacent_mines == 0 {
            pending.push(coords);
        }

        // each cell is marked revealed before it is pushed, so it is expanded at most once
        while let Some(center) = pending.pop() {
            for pos in self.iter_neighbors(center) {
                let neighbor = &mut self[pos];
                if neighbor.revealed || neighbor.flagged {
                    continue;
                }
                neighbor.revealed = true;
                revealed += 1;
                log::trace!(
                    "Flood revealed {:?}, adjacent mines: {}",
                    pos,
                    neighbor.adjacent_mines
                );

                if neighbor.adjacent_mines == 0 && !neighbor.is_mine {
                    pending.push(pos);
                }
            }
        }

        log::debug!("Revealed {} cells from {:?}", revealed, coords);
        RevealOutcome::Revealed(revealed)
    }

    /// Flips the flag on an unrevealed cell.
    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        let Some(cell) = self.get_mut(coords) else {
            return MarkOutcome::NoChange;
        };
        if cell.revealed {
            return MarkOutcome::NoChange;
        }

        cell.flagged = !cell.flagged;
        if cell.flagged {
            MarkOutcome::Flagged
        } else {
            MarkOutcome::Unflagged
        }
    }

    /// The game is won once the only unrevealed cells left are the mines. Flags are not checked.
    pub fn check_win(&self) -> bool {
        self.unrevealed_count() == self.difficulty().mines
    }

    pub fn reveal_all_mines(&mut self) {
        for coords in self.iter_coords() {
            if self[coords].is_mine {
                self[coords].revealed = true;
            }
        }
    }
}
