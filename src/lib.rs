//! Board engine for single-player minesweeper.
//!
//! A [`Board`] owns the grid, mine layout and reveal/flag state. Callers issue
//! [`Board::reveal`] and [`Board::toggle_flag`] and draw the returned
//! [`CellView`]s. [`Session`] wraps a board with difficulty selection and a
//! JSON message protocol.

pub mod config;
pub mod data;
pub mod error;
pub mod logic;
pub mod model;
pub mod session;

pub use data::{Cell, RevealState};
pub use error::{EngineError, Result};
pub use logic::{Board, RevealOutcome, ToggleOutcome};
pub use model::{BoardConfig, CellView, GameStatus, PRESETS, Pos, Preset, Tile};
pub use session::Session;
