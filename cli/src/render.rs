use std::fmt;

use buscaminas_core::{CellView, RankingEntry, SessionStatus, Snapshot, format_time};

fn cell_glyph(cell: CellView) -> char {
    use CellView::*;
    match cell {
        Hidden => '#',
        Flagged => 'F',
        Revealed(0) => '.',
        Revealed(count) => char::from(b'0' + count),
        Mine => '*',
        Exploded => 'X',
    }
}

/// Header line plus the grid with row and column indices.
pub struct BoardView<'a>(pub &'a Snapshot);

impl fmt::Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.0;
        let status = match snapshot.status {
            SessionStatus::Waiting => "waiting".to_owned(),
            SessionStatus::Playing if snapshot.paused => "paused".to_owned(),
            SessionStatus::Playing => format!("good luck, {}", snapshot.player_name),
            SessionStatus::Won => format!("you won, {}!", snapshot.player_name),
            SessionStatus::Lost => "you lost!".to_owned(),
        };
        writeln!(
            f,
            "[{}]  mines {:>3}  time {}  {}{}",
            snapshot.label,
            snapshot.mines_left,
            format_time(snapshot.elapsed_secs),
            status,
            if snapshot.muted { "  (muted)" } else { "" },
        )?;

        let (_, cols) = snapshot.cells.dim();
        f.write_str("    ")?;
        for col in 0..cols {
            write!(f, "{:>3}", col)?;
        }
        writeln!(f)?;

        for (row, cells) in snapshot.cells.rows().into_iter().enumerate() {
            write!(f, "{:>3} ", row)?;
            for &cell in cells {
                write!(f, "{:>3}", cell_glyph(cell))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

pub struct RankingView<'a> {
    pub label: &'a str,
    pub entries: &'a [RankingEntry],
}

impl fmt::Display for RankingView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ranking {}:", self.label)?;
        if self.entries.is_empty() {
            writeln!(f, "  no players in the ranking yet")?;
        }
        for (i, entry) in self.entries.iter().enumerate() {
            writeln!(
                f,
                "  {:>2}. {}: {}",
                i + 1,
                entry.name,
                format_time(entry.time_secs)
            )?;
        }
        Ok(())
    }
}
