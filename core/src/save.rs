//! Plain-text save format.
//!
//! ```text
//! <rows>
//! <cols>
//! <mines>
//! <cell>   one line per cell, row-major
//! ```
//!
//! A cell line is its number (`-1` for a mine) followed by `f` when flagged or `r` when revealed.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use ndarray::Array2;

use crate::*;

const HEADER_LINES: usize = 3;

pub fn encode_save(board: &Board) -> String {
    let mut out = format!("{}\n{}\n{}\n", board.rows(), board.cols(), board.mine_count());
    for (_, cell) in board.cells() {
        let suffix = if cell.is_flagged() {
            "f"
        } else if cell.is_revealed() {
            "r"
        } else {
            ""
        };
        out.push_str(&format!("{}{}\n", cell.number(), suffix));
    }
    out
}

/// Parses and fully re-validates a save. Nothing about the result is trusted until every number has been
/// re-derived from the mine positions.
pub fn decode_save(text: &str) -> Result<Board> {
    decode_inner(text).map_err(|fault| {
        log::debug!("Rejected save: {}", fault);
        GameError::InvalidSave(fault)
    })
}

fn decode_inner(text: &str) -> core::result::Result<Board, SaveFault> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < HEADER_LINES {
        return Err(SaveFault::InvalidHeader);
    }

    let rows: Coord = parse_header(lines[0])?;
    let cols: Coord = parse_header(lines[1])?;
    let mines: CellCount = parse_header(lines[2])?;
    let total_cells = cell_count(rows, cols);
    if rows == 0 || cols == 0 || mines == 0 || mines >= total_cells {
        return Err(SaveFault::InvalidHeader);
    }

    let expected = HEADER_LINES + usize::from(total_cells);
    if lines.len() != expected {
        return Err(SaveFault::LineCount {
            expected,
            found: lines.len(),
        });
    }

    let mut cells = Vec::with_capacity(usize::from(total_cells));
    for (index, line) in lines[HEADER_LINES..].iter().enumerate() {
        cells.push(parse_cell(line, index + HEADER_LINES + 1)?);
    }

    let found = cells.iter().filter(|cell| cell.is_mine()).count();
    if found != usize::from(mines) {
        return Err(SaveFault::MineCountMismatch {
            declared: usize::from(mines),
            found,
        });
    }

    let grid = Array2::from_shape_vec((usize::from(rows), usize::from(cols)), cells)
        .map_err(|_| SaveFault::LineCount {
            expected,
            found: lines.len(),
        })?;
    let board = Board::from_grid(grid);

    if let Some((row, col)) = board.first_inconsistent_cell() {
        return Err(SaveFault::NeighborCountMismatch {
            row: row.into(),
            col: col.into(),
        });
    }

    Ok(board)
}

fn parse_header<T: core::str::FromStr>(line: &str) -> core::result::Result<T, SaveFault> {
    line.parse().map_err(|_| SaveFault::InvalidHeader)
}

/// `line_number` is 1-based, for error reporting.
fn parse_cell(line: &str, line_number: usize) -> core::result::Result<Cell, SaveFault> {
    let malformed = SaveFault::MalformedCell { line: line_number };

    let digits_start = usize::from(line.starts_with('-'));
    let digits_end = line[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(line.len(), |offset| digits_start + offset);
    if digits_end == digits_start {
        return Err(malformed);
    }

    let (flagged, revealed) = match &line[digits_end..] {
        "" => (false, false),
        "f" => (true, false),
        "r" => (false, true),
        _ => return Err(malformed),
    };

    let number: i8 = line[..digits_end]
        .parse()
        .map_err(|_| SaveFault::NumberOutOfRange { line: line_number })?;
    let mut cell =
        Cell::with_number(number).ok_or(SaveFault::NumberOutOfRange { line: line_number })?;

    if revealed {
        if cell.is_mine() {
            return Err(SaveFault::RevealedMine { line: line_number });
        }
        cell.reveal();
    }
    if flagged {
        cell.set_flagged(true);
    }

    Ok(cell)
}
