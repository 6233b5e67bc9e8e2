use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

pub mod client;
pub mod server;

/// What a caller should draw for one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum Tile {
    #[serde(rename = "hidden")]
    Hidden,
    #[serde(rename = "flagged")]
    Flagged,
    #[serde(rename = "revealed")]
    Revealed { adjacent: u8 },
    /// A mine surfaced for display after the game was lost.
    #[serde(rename = "mine")]
    Mine,
    /// The mine whose reveal lost the game.
    #[serde(rename = "detonated")]
    Detonated,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A cell as seen from outside the engine.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellView {
    pub pos: Pos,
    pub tile: Tile,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub rows: usize,
    pub cols: usize,
    pub mines: usize,
}

impl BoardConfig {
    pub const BEGINNER: Self = Self::new(9, 9, 10);
    pub const INTERMEDIATE: Self = Self::new(16, 16, 40);
    pub const ADVANCED: Self = Self::new(16, 30, 99);

    pub const fn new(rows: usize, cols: usize, mines: usize) -> Self {
        Self { rows, cols, mines }
    }

    /// Checks `rows >= 1`, `cols >= 1` and `1 <= mines < rows * cols`, returning the cell count.
    pub fn validate(&self) -> Result<usize> {
        let invalid = |reason| EngineError::InvalidConfiguration {
            rows: self.rows,
            cols: self.cols,
            mines: self.mines,
            reason,
        };

        if self.rows == 0 || self.cols == 0 {
            return Err(invalid("board needs at least one row and one column"));
        }
        let total = self
            .rows
            .checked_mul(self.cols)
            .filter(|&total| u32::try_from(total).is_ok())
            .ok_or_else(|| invalid("board has too many cells"))?;
        if self.mines == 0 {
            return Err(invalid("at least one mine is required"));
        }
        if self.mines >= total {
            return Err(invalid("mine count must be below the number of cells"));
        }

        Ok(total)
    }

    pub fn total_cells(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::BEGINNER
    }
}

/// A named entry of the difficulty table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub config: BoardConfig,
}

pub const PRESETS: [Preset; 3] = [
    Preset {
        name: "beginner",
        config: BoardConfig::BEGINNER,
    },
    Preset {
        name: "intermediate",
        config: BoardConfig::INTERMEDIATE,
    },
    Preset {
        name: "advanced",
        config: BoardConfig::ADVANCED,
    },
];

impl Preset {
    pub fn find(name: &str) -> Result<&'static Preset> {
        PRESETS
            .iter()
            .find(|preset| preset.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| EngineError::UnknownPreset(name.to_string()))
    }

    /// The preset after this one, wrapping back to the first.
    pub fn next(&self) -> &'static Preset {
        let index = PRESETS
            .iter()
            .position(|preset| preset.name == self.name)
            .map_or(0, |index| (index + 1) % PRESETS.len());
        &PRESETS[index]
    }
}
