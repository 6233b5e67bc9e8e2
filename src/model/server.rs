use serde::{Deserialize, Serialize};

use super::{CellView, GameStatus, Tile};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "init")]
    Init {
        rows: usize,
        cols: usize,
        mines: usize,
        /// Preset name, `None` for a custom board.
        difficulty: Option<String>,
        field: Vec<Vec<Tile>>,
    },
    #[serde(rename = "update")]
    Update {
        updates: Vec<CellView>,
        status: GameStatus,
        mines_remaining: isize,
    },
    #[serde(rename = "error")]
    Error { message: String },
}
