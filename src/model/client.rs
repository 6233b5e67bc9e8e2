use serde::{Deserialize, Serialize};

use super::{BoardConfig, Pos};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "action")]
pub enum ClientMessage {
    #[serde(rename = "reveal")]
    Reveal { pos: Pos },
    #[serde(rename = "flag")]
    Flag { pos: Pos },
    /// Starts over, with new dimensions when `params` is given.
    #[serde(rename = "restart")]
    Restart {
        #[serde(default)]
        params: Option<BoardConfig>,
    },
    #[serde(rename = "difficulty")]
    Difficulty { name: String },
    #[serde(rename = "next_difficulty")]
    NextDifficulty,
}
