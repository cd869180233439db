#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use save::*;
pub use session::*;
pub use snapshot::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod save;
mod session;
mod snapshot;
mod types;

/// Board dimensions and mine count for a new game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        Self { rows, cols, mines }
    }

    pub fn new(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(rows, cols, mines);
        config.validate()?;
        Ok(config)
    }

    pub const fn beginner() -> Self {
        Self::new_unchecked(9, 9, 10)
    }

    pub const fn intermediate() -> Self {
        Self::new_unchecked(16, 16, 40)
    }

    pub const fn expert() -> Self {
        Self::new_unchecked(16, 30, 99)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 || self.mines > self.total_cells() {
            return Err(GameError::InvalidDimensions);
        }
        Ok(())
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        cell_count(self.rows, self.cols)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::beginner()
    }
}

/// Result of revealing a single cell on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed(u8),
    HitMine,
}

/// Result of revealing the unflagged neighbors of a satisfied number.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChordOutcome {
    NoChange,
    Revealed(CellCount),
    HitMine(Coord2),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
    FlagLimitReached,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange | Self::FlagLimitReached => false,
            Self::Changed => true,
        }
    }
}

/// Result of a player reveal on a [`GameSession`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    NoChange,
    /// First click must land on the safe-start cell.
    NotAllowedYet,
    Revealed,
    HitMine,
    Won,
}

impl TurnOutcome {
    pub const fn has_update(self) -> bool {
        use TurnOutcome::*;
        match self {
            NoChange => false,
            NotAllowedYet => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}
