use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid configuration {rows}x{cols} with {mines} mines: {reason}")]
    InvalidConfiguration {
        rows: usize,
        cols: usize,
        mines: usize,
        reason: &'static str,
    },
    #[error("position ({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },
    #[error("unknown difficulty preset: {0}")]
    UnknownPreset(String),
}

pub type Result<T> = core::result::Result<T, EngineError>;
