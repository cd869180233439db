use ndarray::Array2;

/// Row or column index, also used for board height and width.
pub type Coord = u8;

/// Mines, flags and cells on a board all fit this.
pub type CellCount = u16;

/// A cell position as `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Conversion from a board position to an `ndarray` index.
pub trait GridIndex {
    fn to_index(self) -> [usize; 2];
}

impl GridIndex for Coord2 {
    fn to_index(self) -> [usize; 2] {
        [self.0.into(), self.1.into()]
    }
}

/// Number of cells on a `rows × cols` board.
pub const fn cell_count(rows: Coord, cols: Coord) -> CellCount {
    (rows as CellCount).saturating_mul(cols as CellCount)
}

pub trait Neighbors {
    fn neighbors(&self, center: Coord2) -> NeighborIter;
}

impl<T> Neighbors for Array2<T> {
    fn neighbors(&self, center: Coord2) -> NeighborIter {
        let (rows, cols) = self.dim();
        // grids are only ever built from `Coord`-sized dimensions
        NeighborIter::new(center, (rows as Coord, cols as Coord))
    }
}

/// Walks the 3×3 window around `center`, clipped to the board, in row-major order and skipping the centre.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    first_col: Coord,
    last_col: Coord,
    last_row: Coord,
    next: Option<Coord2>,
}

impl NeighborIter {
    pub fn new(center: Coord2, (rows, cols): Coord2) -> Self {
        let (row, col) = center;
        let next = (rows > 0 && cols > 0)
            .then(|| (row.saturating_sub(1), col.saturating_sub(1)));
        Self {
            center,
            first_col: col.saturating_sub(1),
            last_col: col.saturating_add(1).min(cols.saturating_sub(1)),
            last_row: row.saturating_add(1).min(rows.saturating_sub(1)),
            next,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (row, col) = self.next?;
            self.next = if col < self.last_col {
                Some((row, col + 1))
            } else if row < self.last_row {
                Some((row + 1, self.first_col))
            } else {
                None
            };

            if (row, col) != self.center {
                return Some((row, col));
            }
        }
    }
}
