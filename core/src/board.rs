use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use rand::Rng;

use crate::*;

/// The minefield: a fixed `rows × cols` grid of cells, row-major.
///
/// Exactly `mine_count()` cells are mines and every other cell carries the number of mines among its
/// neighbors. Both [`Board::generate`] and save decoding guarantee this.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    config: GameConfig,
    grid: Array2<Cell>,
    safe_start: Option<Coord2>,
    mines_exposed: bool,
    mis_flags: Vec<Coord2>,
}

impl Board {
    /// Places `config.mines` mines by rejection sampling, drawing a column then a row from `rng` until enough
    /// distinct cells are picked.
    pub fn generate<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;

        let mut mine_mask: Array2<bool> = Array2::default(config.size().to_index());
        let mut mines_placed: CellCount = 0;
        while mines_placed < config.mines {
            let col = rng.random_range(0..config.cols);
            let row = rng.random_range(0..config.rows);
            let slot = &mut mine_mask[(row, col).to_index()];
            if !*slot {
                *slot = true;
                mines_placed += 1;
            }
        }

        let board = Self::from_mine_mask(&mine_mask);
        if board.safe_start.is_none() {
            log::warn!(
                "No zero cell on a {}x{} board with {} mines, first click is unrestricted",
                config.rows,
                config.cols,
                config.mines
            );
        }
        Ok(board)
    }

    /// Builds a board with mines at exactly the given positions; duplicates count once.
    pub fn from_mine_coords(rows: Coord, cols: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidDimensions);
        }

        let mut mine_mask: Array2<bool> = Array2::default((rows, cols).to_index());
        for &coords in mine_coords {
            if coords.0 >= rows || coords.1 >= cols {
                return Err(GameError::OutOfBounds);
            }
            mine_mask[coords.to_index()] = true;
        }

        Ok(Self::from_mine_mask(&mine_mask))
    }

    fn from_mine_mask(mine_mask: &Array2<bool>) -> Self {
        let grid = Array2::from_shape_fn(mine_mask.dim(), |(row, col)| {
            if mine_mask[(row, col)] {
                Cell::mine()
            } else {
                let adjacent = mine_mask
                    .neighbors((row as Coord, col as Coord))
                    .filter(|&pos| mine_mask[pos.to_index()])
                    .count();
                Cell::safe(adjacent as u8)
            }
        });

        let mut board = Self::from_grid(grid);
        // first zero in row-major order
        board.safe_start = board
            .grid
            .indexed_iter()
            .find(|(_, cell)| cell.number() == 0)
            .map(|((row, col), _)| (row as Coord, col as Coord));
        board
    }

    /// Wraps an already populated grid. Numbers are taken as given, callers check them with
    /// [`Board::first_inconsistent_cell`].
    pub(crate) fn from_grid(grid: Array2<Cell>) -> Self {
        let (rows, cols) = grid.dim();
        let mines = grid.iter().filter(|cell| cell.is_mine()).count();
        Self {
            config: GameConfig::new_unchecked(rows as Coord, cols as Coord, mines as CellCount),
            grid,
            safe_start: None,
            mines_exposed: false,
            mis_flags: Vec::new(),
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub fn rows(&self) -> Coord {
        self.config.rows
    }

    pub fn cols(&self) -> Coord {
        self.config.cols
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    /// The zero cell a fresh game must be opened on, if the board has one.
    pub fn safe_start(&self) -> Option<Coord2> {
        self.safe_start
    }

    pub fn mines_exposed(&self) -> bool {
        self.mines_exposed
    }

    pub fn is_mis_flagged(&self, coords: Coord2) -> bool {
        self.mis_flags.contains(&coords)
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(self[coords])
    }

    pub fn cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.grid
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }

    pub fn flagged_count(&self) -> CellCount {
        self.grid.iter().filter(|cell| cell.is_flagged()).count() as CellCount
    }

    pub fn revealed_count(&self) -> CellCount {
        self.grid.iter().filter(|cell| cell.is_revealed()).count() as CellCount
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.size();
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    /// Reveals one cell. A mine is reported but left untouched; the caller decides how to show the loss.
    pub fn reveal_cell(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        let cell = &mut self.grid[coords.to_index()];

        Ok(match cell.adjacent_mines() {
            _ if !cell.is_hidden() => RevealOutcome::NoChange,
            None => RevealOutcome::HitMine,
            Some(adjacent) => {
                cell.reveal();
                RevealOutcome::Revealed(adjacent)
            }
        })
    }

    /// Reveals every hidden cell touching a revealed zero, in full passes until a pass opens nothing.
    /// Returns the number of cells revealed.
    pub fn flood_fill(&mut self) -> CellCount {
        let (rows, cols) = self.size();
        let mut total: CellCount = 0;

        loop {
            let mut revealed: CellCount = 0;
            for row in 0..rows {
                for col in 0..cols {
                    let coords = (row, col);
                    let cell = self[coords];
                    if !cell.is_hidden() || cell.is_mine() {
                        continue;
                    }

                    let touches_open_zero = self.grid.neighbors(coords).any(|pos| {
                        let neighbor = self[pos];
                        neighbor.is_revealed() && neighbor.number() == 0
                    });
                    if touches_open_zero && self.grid[coords.to_index()].reveal() {
                        revealed += 1;
                    }
                }
            }

            if revealed == 0 {
                break;
            }
            total += revealed;
        }

        total
    }

    /// Once a revealed number has at least as many flagged neighbors as its count, reveals the rest of its
    /// neighbors. Stops at the first mine found and reports its position.
    pub fn auto_reveal_satisfied_neighbors(&mut self, coords: Coord2) -> Result<ChordOutcome> {
        let coords = self.validate_coords(coords)?;
        let cell = self[coords];

        let number = match cell.adjacent_mines() {
            Some(number) if cell.is_revealed() && number > 0 => number,
            _ => return Ok(ChordOutcome::NoChange),
        };
        if self.count_flagged_neighbors(coords) < number {
            return Ok(ChordOutcome::NoChange);
        }

        let mut revealed: CellCount = 0;
        for pos in self.grid.neighbors(coords) {
            let neighbor = &mut self.grid[pos.to_index()];
            if !neighbor.is_hidden() {
                continue;
            }
            if neighbor.is_mine() {
                return Ok(ChordOutcome::HitMine(pos));
            }
            neighbor.reveal();
            revealed += 1;
        }

        Ok(if revealed == 0 {
            ChordOutcome::NoChange
        } else {
            ChordOutcome::Revealed(revealed)
        })
    }

    /// True once every non-mine cell is revealed. Flags play no part.
    pub fn is_won(&self) -> bool {
        self.grid
            .iter()
            .all(|cell| cell.is_mine() || cell.is_revealed())
    }

    /// End-of-game exposure: mines become visible and every other cell is revealed, dropping any flag on it.
    /// With `mark_mis_flags`, those wrongly flagged cells are remembered for [`Board::is_mis_flagged`].
    pub fn reveal_all(&mut self, mark_mis_flags: bool) {
        self.mines_exposed = true;

        for ((row, col), cell) in self.grid.indexed_iter_mut() {
            if cell.is_mine() || cell.is_revealed() {
                continue;
            }
            if cell.is_flagged() && mark_mis_flags {
                self.mis_flags.push((row as Coord, col as Coord));
            }
            cell.force_reveal();
        }
    }

    pub fn set_flagged(&mut self, coords: Coord2, flagged: bool) -> Result<MarkOutcome> {
        let coords = self.validate_coords(coords)?;
        Ok(if self.grid[coords.to_index()].set_flagged(flagged) {
            MarkOutcome::Changed
        } else {
            MarkOutcome::NoChange
        })
    }

    /// Recomputes every number from the mine positions and returns the first cell that disagrees.
    pub fn first_inconsistent_cell(&self) -> Option<Coord2> {
        self.cells()
            .find(|&(coords, cell)| match cell.adjacent_mines() {
                Some(number) => number != self.count_adjacent_mines(coords),
                None => false,
            })
            .map(|(coords, _)| coords)
    }

    fn count_adjacent_mines(&self, coords: Coord2) -> u8 {
        self.grid
            .neighbors(coords)
            .filter(|&pos| self[pos].is_mine())
            .count() as u8
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.grid
            .neighbors(coords)
            .filter(|&pos| self[pos].is_flagged())
            .count() as u8
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.grid[coords.to_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::SmallRng};

    fn layout(rows: Coord, cols: Coord, mines: &[Coord2]) -> Board {
        Board::from_mine_coords(rows, cols, mines).unwrap()
    }

    fn seeded(seed: u64) -> SmallRng {
        SmallRng::seed_from_u64(seed)
    }

    #[test]
    fn generated_boards_hold_count_invariant() {
        for seed in 0..32 {
            let config = GameConfig::new(9, 12, 20).unwrap();
            let board = Board::generate(config, &mut seeded(seed)).unwrap();

            let mines = board.cells().filter(|(_, cell)| cell.is_mine()).count();
            assert_eq!(mines, 20);
            assert_eq!(board.mine_count(), 20);
            assert_eq!(board.first_inconsistent_cell(), None);
        }
    }

    #[test]
    fn same_seed_same_board() {
        let config = GameConfig::intermediate();
        let a = Board::generate(config, &mut seeded(7)).unwrap();
        let b = Board::generate(config, &mut seeded(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn generate_rejects_invalid_dimensions() {
        let config = GameConfig::new_unchecked(3, 3, 10);
        assert_eq!(
            Board::generate(config, &mut seeded(0)),
            Err(GameError::InvalidDimensions)
        );

        let config = GameConfig::new_unchecked(0, 3, 0);
        assert_eq!(
            Board::generate(config, &mut seeded(0)),
            Err(GameError::InvalidDimensions)
        );
    }

    #[test]
    fn generate_fills_board_when_every_cell_is_a_mine() {
        let config = GameConfig::new(3, 4, 12).unwrap();
        let board = Board::generate(config, &mut seeded(3)).unwrap();

        assert!(board.cells().all(|(_, cell)| cell.is_mine()));
        assert_eq!(board.safe_start(), None);
    }

    #[test]
    fn safe_start_is_first_zero_in_row_major_order() {
        let board = layout(3, 3, &[(0, 0)]);
        assert_eq!(board.safe_start(), Some((0, 2)));

        let board = layout(2, 2, &[(0, 0)]);
        assert_eq!(board.safe_start(), None);
    }

    #[test]
    fn from_mine_coords_rejects_out_of_bounds() {
        assert_eq!(
            Board::from_mine_coords(2, 2, &[(2, 0)]),
            Err(GameError::OutOfBounds)
        );
        assert_eq!(
            Board::from_mine_coords(0, 2, &[]),
            Err(GameError::InvalidDimensions)
        );
    }

    #[test]
    fn reveal_next_to_single_mine_shows_one() {
        let mut board = layout(2, 2, &[(0, 0)]);

        assert_eq!(board.reveal_cell((1, 1)), Ok(RevealOutcome::Revealed(1)));
        assert!(board[(1, 1)].is_revealed());
        assert!(!board.is_won());
    }

    #[test]
    fn reveal_mine_leaves_cell_hidden() {
        let mut board = layout(2, 2, &[(0, 0)]);

        assert_eq!(board.reveal_cell((0, 0)), Ok(RevealOutcome::HitMine));
        assert!(!board[(0, 0)].is_revealed());
    }

    #[test]
    fn reveal_flagged_cell_is_noop() {
        let mut board = layout(2, 2, &[(0, 0)]);
        board.set_flagged((1, 1), true).unwrap();

        assert_eq!(board.reveal_cell((1, 1)), Ok(RevealOutcome::NoChange));
        assert!(board[(1, 1)].is_flagged());
        assert!(!board[(1, 1)].is_revealed());
    }

    #[test]
    fn reveal_out_of_bounds_fails() {
        let mut board = layout(2, 2, &[]);
        assert_eq!(board.reveal_cell((0, 2)), Err(GameError::OutOfBounds));
    }

    #[test]
    fn single_cell_without_mines_is_won_after_reveal() {
        let mut board = layout(1, 1, &[]);

        assert_eq!(board.reveal_cell((0, 0)), Ok(RevealOutcome::Revealed(0)));
        assert!(board.is_won());
    }

    #[test]
    fn flood_fill_opens_zero_region_and_its_border() {
        let mut board = layout(3, 4, &[(2, 3)]);

        board.reveal_cell((0, 0)).unwrap();
        let revealed = board.flood_fill();

        assert_eq!(revealed, 10);
        assert_eq!(board[(1, 2)].number(), 1);
        assert!(board[(1, 2)].is_revealed());
        assert!(!board[(2, 3)].is_revealed());
        assert!(board.is_won());
    }

    #[test]
    fn flood_fill_skips_flagged_cells() {
        let mut board = layout(1, 5, &[(0, 4)]);
        board.set_flagged((0, 2), true).unwrap();

        board.reveal_cell((0, 0)).unwrap();
        board.flood_fill();

        assert!(board[(0, 1)].is_revealed());
        assert!(board[(0, 2)].is_flagged());
        assert!(!board[(0, 3)].is_revealed());
    }

    #[test]
    fn flood_fill_never_reveals_a_mine() {
        // deliberately inconsistent: a revealed zero sits next to a mine
        let mut grid = Array2::from_elem((1, 3), Cell::safe(0));
        grid[(0, 2)] = Cell::mine();
        let mut board = Board::from_grid(grid);

        board.reveal_cell((0, 1)).unwrap();
        board.flood_fill();

        assert!(board[(0, 0)].is_revealed());
        assert!(!board[(0, 2)].is_revealed());
    }

    #[test]
    fn satisfied_neighbors_are_revealed() {
        let mut board = layout(3, 3, &[(0, 1), (2, 1)]);
        board.reveal_cell((1, 1)).unwrap();
        board.set_flagged((0, 1), true).unwrap();
        board.set_flagged((2, 1), true).unwrap();

        let outcome = board.auto_reveal_satisfied_neighbors((1, 1)).unwrap();

        assert_eq!(outcome, ChordOutcome::Revealed(6));
        assert_eq!(board[(1, 0)].number(), 2);
        assert!(board[(1, 0)].is_revealed());
        assert!(board.is_won());
    }

    #[test]
    fn unsatisfied_number_reveals_nothing() {
        let mut board = layout(3, 3, &[(0, 1), (2, 1)]);
        board.reveal_cell((1, 1)).unwrap();
        board.set_flagged((0, 1), true).unwrap();

        let outcome = board.auto_reveal_satisfied_neighbors((1, 1)).unwrap();

        assert_eq!(outcome, ChordOutcome::NoChange);
        assert_eq!(board.revealed_count(), 1);
    }

    #[test]
    fn wrong_flag_makes_satisfied_reveal_hit_mine() {
        let mut board = layout(3, 3, &[(0, 1)]);
        board.reveal_cell((1, 1)).unwrap();
        board.set_flagged((2, 2), true).unwrap();

        let outcome = board.auto_reveal_satisfied_neighbors((1, 1)).unwrap();

        // (0, 0) comes before the mine in neighbor order and is opened first
        assert_eq!(outcome, ChordOutcome::HitMine((0, 1)));
        assert!(board[(0, 0)].is_revealed());
        assert!(!board[(0, 1)].is_revealed());
        assert!(!board[(1, 0)].is_revealed());
    }

    #[test]
    fn hidden_or_zero_cell_has_no_satisfied_reveal() {
        let mut board = layout(3, 3, &[(0, 0)]);
        assert_eq!(
            board.auto_reveal_satisfied_neighbors((1, 1)),
            Ok(ChordOutcome::NoChange)
        );

        board.reveal_cell((2, 2)).unwrap();
        assert_eq!(
            board.auto_reveal_satisfied_neighbors((2, 2)),
            Ok(ChordOutcome::NoChange)
        );
    }

    #[test]
    fn reveal_all_exposes_mines_and_marks_mis_flags() {
        let mut board = layout(2, 3, &[(0, 0), (1, 2)]);
        board.set_flagged((0, 0), true).unwrap();
        board.set_flagged((0, 2), true).unwrap();

        board.reveal_all(true);

        assert!(board.mines_exposed());
        assert!(board[(0, 0)].is_flagged());
        assert!(!board[(1, 2)].is_revealed());
        for coords in [(0, 1), (0, 2), (1, 0), (1, 1)] {
            assert!(board[coords].is_revealed());
            assert!(!board[coords].is_flagged());
        }
        assert!(board.is_mis_flagged((0, 2)));
        assert!(!board.is_mis_flagged((0, 0)));
    }

    #[test]
    fn reveal_all_without_marking_records_nothing() {
        let mut board = layout(2, 2, &[(0, 0)]);
        board.set_flagged((1, 1), true).unwrap();

        board.reveal_all(false);

        assert!(board[(1, 1)].is_revealed());
        assert!(!board.is_mis_flagged((1, 1)));
    }

    #[test]
    fn set_flagged_on_revealed_cell_is_noop() {
        let mut board = layout(2, 2, &[(0, 0)]);
        board.reveal_cell((1, 1)).unwrap();

        assert_eq!(board.set_flagged((1, 1), true), Ok(MarkOutcome::NoChange));
        assert_eq!(board.flagged_count(), 0);
    }
}
