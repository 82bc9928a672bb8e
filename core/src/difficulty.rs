use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Board dimensions and mine count of one of the fixed presets.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Difficulty {
    pub size: Coord2,
    pub mines: CellCount,
    pub label: &'static str,
}

impl Difficulty {
    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn cols(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifficultyPreset {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl DifficultyPreset {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn difficulty(self) -> Difficulty {
        use DifficultyPreset::*;
        match self {
            Easy => Difficulty {
                size: (9, 9),
                mines: 10,
                label: "Fácil",
            },
            Medium => Difficulty {
                size: (16, 16),
                mines: 40,
                label: "Medio",
            },
            Hard => Difficulty {
                size: (16, 30),
                mines: 99,
                label: "Difícil",
            },
        }
    }

    pub const fn label(self) -> &'static str {
        self.difficulty().label
    }

    const fn keyword(self) -> &'static str {
        use DifficultyPreset::*;
        match self {
            Easy => "easy",
            Medium => "medium",
            Hard => "hard",
        }
    }
}

impl From<DifficultyPreset> for Difficulty {
    fn from(preset: DifficultyPreset) -> Self {
        preset.difficulty()
    }
}

impl fmt::Display for DifficultyPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for DifficultyPreset {
    type Err = GameError;

    /// Accepts either the keyword (`easy`) or the display label (`Fácil`), ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|preset| s == preset.keyword() || s == preset.label().to_lowercase())
            .ok_or(GameError::UnknownDifficulty)
    }
}
