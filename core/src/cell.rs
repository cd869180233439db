use serde::{Deserialize, Serialize};

/// One grid position: its number plus the player-visible revealed/flagged state.
///
/// A cell is never revealed and flagged at the same time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    number: i8,
    revealed: bool,
    flagged: bool,
}

impl Cell {
    pub const MINE: i8 = -1;
    pub const MAX_NUMBER: i8 = 8;

    pub const fn mine() -> Self {
        Self {
            number: Self::MINE,
            revealed: false,
            flagged: false,
        }
    }

    pub const fn safe(adjacent_mines: u8) -> Self {
        Self {
            number: adjacent_mines as i8,
            revealed: false,
            flagged: false,
        }
    }

    /// Returns `None` when `number` is outside `[-1, 8]`.
    pub const fn with_number(number: i8) -> Option<Self> {
        if number < Self::MINE || number > Self::MAX_NUMBER {
            return None;
        }
        Some(Self {
            number,
            revealed: false,
            flagged: false,
        })
    }

    pub const fn number(self) -> i8 {
        self.number
    }

    pub const fn is_mine(self) -> bool {
        self.number == Self::MINE
    }

    /// Mine-neighbor count, `None` for a mine.
    pub const fn adjacent_mines(self) -> Option<u8> {
        if self.is_mine() {
            None
        } else {
            Some(self.number as u8)
        }
    }

    pub const fn is_revealed(self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(self) -> bool {
        self.flagged
    }

    pub const fn is_hidden(self) -> bool {
        !self.revealed && !self.flagged
    }

    /// Returns whether the cell changed. Flagged cells stay hidden.
    pub(crate) fn reveal(&mut self) -> bool {
        if self.revealed || self.flagged {
            return false;
        }
        self.revealed = true;
        true
    }

    /// Returns whether the cell changed. Revealed cells can not be flagged.
    pub(crate) fn set_flagged(&mut self, flagged: bool) -> bool {
        if self.revealed || self.flagged == flagged {
            return false;
        }
        self.flagged = flagged;
        true
    }

    /// Removes any flag and reveals; only used for end-of-game exposure.
    pub(crate) fn force_reveal(&mut self) {
        self.flagged = false;
        self.revealed = true;
    }
}
