use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a presentation layer should draw for one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed(u8),
    /// Mine shown after a loss.
    Mine,
    /// The mine that ended the game.
    Exploded,
    /// Revealed after a loss, but had been flagged.
    MisFlagged(u8),
}

impl CellView {
    // whether the cell is visually closed
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }

    pub const fn number(self) -> Option<u8> {
        match self {
            Self::Revealed(n) | Self::MisFlagged(n) => Some(n),
            _ => None,
        }
    }
}

impl Default for CellView {
    fn default() -> Self {
        Self::Hidden
    }
}

/// Read-only picture of a session, safe to hand to a renderer or ship as JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub size: Coord2,
    pub mines: CellCount,
    pub flags_placed: CellCount,
    pub status: GameStatus,
    pub safe_start: Option<Coord2>,
    pub cells: Array2<CellView>,
}

impl BoardSnapshot {
    pub fn from_session(session: &GameSession) -> Self {
        let board = session.board();
        let triggered = session.triggered_mine();
        let cells = Array2::from_shape_fn(board.size().to_index(), |(row, col)| {
            let coords = (row as Coord, col as Coord);
            view_of(board, coords, triggered)
        });

        Self {
            size: board.size(),
            mines: board.mine_count(),
            flags_placed: session.flags_placed(),
            status: session.status(),
            safe_start: session.safe_start(),
            cells,
        }
    }

    pub fn cell(&self, coords: Coord2) -> CellView {
        self.cells[coords.to_index()]
    }
}

fn view_of(board: &Board, coords: Coord2, triggered: Option<Coord2>) -> CellView {
    let cell = board[coords];
    match cell.adjacent_mines() {
        None if triggered == Some(coords) => CellView::Exploded,
        None if cell.is_flagged() => CellView::Flagged,
        None if board.mines_exposed() => CellView::Mine,
        None => CellView::Hidden,
        Some(n) if board.is_mis_flagged(coords) => CellView::MisFlagged(n),
        Some(n) if cell.is_revealed() => CellView::Revealed(n),
        Some(_) if cell.is_flagged() => CellView::Flagged,
        Some(_) => CellView::Hidden,
    }
}
