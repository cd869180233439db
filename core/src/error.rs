use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid board dimensions")]
    InvalidDimensions,
    #[error("Coordinates out of bounds")]
    OutOfBounds,
    #[error("Invalid save: {0}")]
    InvalidSave(SaveFault),
    #[error("Game already ended, it can not be saved")]
    AlreadyEnded,
}

/// Which check rejected a save text.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SaveFault {
    #[error("missing or malformed header")]
    InvalidHeader,
    #[error("expected {expected} lines, found {found}")]
    LineCount { expected: usize, found: usize },
    #[error("malformed cell on line {line}")]
    MalformedCell { line: usize },
    #[error("cell number out of range on line {line}")]
    NumberOutOfRange { line: usize },
    #[error("revealed mine on line {line}")]
    RevealedMine { line: usize },
    #[error("declared {declared} mines, found {found}")]
    MineCountMismatch { declared: usize, found: usize },
    #[error("neighbor count mismatch at row {row}, col {col}")]
    NeighborCountMismatch { row: usize, col: usize },
}

impl From<SaveFault> for GameError {
    fn from(fault: SaveFault) -> Self {
        Self::InvalidSave(fault)
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
