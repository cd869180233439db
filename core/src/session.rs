use alloc::string::String;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Waiting for the first click.
    Ready,
    Active,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Ready
    }
}

/// Coarse game status for a presentation layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

impl From<SessionState> for GameStatus {
    fn from(state: SessionState) -> Self {
        match state {
            SessionState::Ready | SessionState::Active => Self::InProgress,
            SessionState::Won => Self::Won,
            SessionState::Lost => Self::Lost,
        }
    }
}

/// One game from first click to win or loss, owning its board and the flag bookkeeping.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSession {
    board: Board,
    flags_placed: CellCount,
    state: SessionState,
    triggered_mine: Option<Coord2>,
}

impl GameSession {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        let mut rng = SmallRng::seed_from_u64(seed);
        Ok(Self::from_board(Board::generate(config, &mut rng)?))
    }

    /// Starts a fresh session on `board`. Flags already on the board are counted.
    pub fn from_board(board: Board) -> Self {
        Self {
            flags_placed: board.flagged_count(),
            board,
            state: SessionState::default(),
            triggered_mine: None,
        }
    }

    pub fn new_game(&mut self, config: GameConfig, seed: u64) -> Result<()> {
        let mut rng = SmallRng::seed_from_u64(seed);
        self.new_game_with_rng(config, &mut rng)
    }

    /// Replaces the board with a freshly generated one. On error the current game is kept as is.
    pub fn new_game_with_rng<R: Rng + ?Sized>(
        &mut self,
        config: GameConfig,
        rng: &mut R,
    ) -> Result<()> {
        let board = Board::generate(config, rng)?;
        log::debug!(
            "New {}x{} game with {} mines",
            config.rows,
            config.cols,
            config.mines
        );
        *self = Self::from_board(board);
        Ok(())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.into()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_finished()
    }

    pub fn is_won(&self) -> bool {
        matches!(self.state, SessionState::Won)
    }

    /// Whether the next reveal is the first of the game. While pending, only the safe-start cell is accepted.
    pub fn first_click_pending(&self) -> bool {
        self.state.is_ready()
    }

    pub fn safe_start(&self) -> Option<Coord2> {
        if self.state.is_ready() {
            self.board.safe_start()
        } else {
            None
        }
    }

    pub fn flags_placed(&self) -> CellCount {
        self.flags_placed
    }

    pub fn mines_left(&self) -> isize {
        (self.board.mine_count() as isize) - (self.flags_placed as isize)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::from_session(self)
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<TurnOutcome> {
        let coords = self.board.validate_coords(coords)?;

        if self.state.is_finished() {
            return Ok(TurnOutcome::NoChange);
        }

        if let Some(safe_start) = self.safe_start() {
            if coords != safe_start {
                return Ok(TurnOutcome::NotAllowedYet);
            }
        }
        self.state = SessionState::Active;

        let changed = match self.board.reveal_cell(coords)? {
            RevealOutcome::HitMine => {
                self.lose(coords);
                return Ok(TurnOutcome::HitMine);
            }
            RevealOutcome::Revealed(0) => {
                self.board.flood_fill();
                true
            }
            RevealOutcome::Revealed(_) => true,
            RevealOutcome::NoChange
                if self.board[coords].is_revealed() && self.board[coords].number() == 0 =>
            {
                // a flag next to this zero may have been removed since it was opened
                self.board.flood_fill() > 0
            }
            RevealOutcome::NoChange if self.board[coords].is_revealed() => {
                match self.board.auto_reveal_satisfied_neighbors(coords)? {
                    ChordOutcome::HitMine(mine) => {
                        self.lose(mine);
                        return Ok(TurnOutcome::HitMine);
                    }
                    ChordOutcome::Revealed(_) => {
                        self.board.flood_fill();
                        true
                    }
                    ChordOutcome::NoChange => false,
                }
            }
            RevealOutcome::NoChange => false,
        };

        if self.board.is_won() {
            log::debug!("Game won");
            self.state = SessionState::Won;
            return Ok(TurnOutcome::Won);
        }

        Ok(if changed {
            TurnOutcome::Revealed
        } else {
            TurnOutcome::NoChange
        })
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.board.validate_coords(coords)?;

        if self.state.is_finished() {
            return Ok(MarkOutcome::NoChange);
        }

        let cell = self.board[coords];
        if cell.is_revealed() {
            return Ok(MarkOutcome::NoChange);
        }

        if cell.is_flagged() {
            let outcome = self.board.set_flagged(coords, false)?;
            self.flags_placed -= 1;
            return Ok(outcome);
        }

        if self.flags_placed >= self.board.mine_count() {
            return Ok(MarkOutcome::FlagLimitReached);
        }
        let outcome = self.board.set_flagged(coords, true)?;
        self.flags_placed += 1;
        Ok(outcome)
    }

    /// Save text for the current board. A finished game can not be saved.
    pub fn save(&self) -> Result<String> {
        if self.state.is_finished() {
            return Err(GameError::AlreadyEnded);
        }
        Ok(encode_save(&self.board))
    }

    /// Replaces the game with a decoded save. On error the current game is kept as is.
    ///
    /// A loaded game has no first-click restriction, and the flag count is taken from the board.
    pub fn load(&mut self, text: &str) -> Result<()> {
        let board = decode_save(text)?;
        *self = Self {
            state: SessionState::Active,
            ..Self::from_board(board)
        };
        Ok(())
    }

    fn lose(&mut self, mine: Coord2) {
        log::debug!("Mine hit at {:?}, game lost", mine);
        self.state = SessionState::Lost;
        self.triggered_mine = Some(mine);
        self.board.reveal_all(true);
        // exposure drops flags from safe cells
        self.flags_placed = self.board.flagged_count();
    }
}
