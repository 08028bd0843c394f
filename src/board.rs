/*!
This module holds the playing grid and its placement-validity queries.
*/

use crate::piece::PieceKind;
use crate::{Coord, Offset};

/// A single grid cell; `Some(kind)` once a piece of that kind has locked there.
pub type Cell = Option<PieceKind>;

/// The two-dimensional playing grid.
///
/// Rows are indexed top-down: rows `0..hidden_rows()` form the hidden spawn
/// buffer above the visible playfield. The board is a value type: components
/// that "modify" it either receive scoped mutable access for one call or
/// return a fresh copy; none keeps a long-lived alias.
#[derive(Eq, PartialEq, Clone, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    width: usize,
    height: usize,
    visible_height: usize,
    grid: Vec<Vec<Cell>>,
}

impl Board {
    /// The standard game field width.
    pub const STANDARD_WIDTH: usize = 10;
    /// The standard total height, hidden buffer included.
    pub const STANDARD_HEIGHT: usize = 22;
    /// The standard height of the visible playing grid.
    pub const STANDARD_VISIBLE_HEIGHT: usize = 20;

    /// Creates an empty board with the standard guideline dimensions (10×22, 20 visible).
    pub fn standard() -> Self {
        Self::new(
            Self::STANDARD_WIDTH,
            Self::STANDARD_HEIGHT,
            Self::STANDARD_VISIBLE_HEIGHT,
        )
    }

    /// Creates an empty board with custom dimensions.
    ///
    /// # Panics
    /// Panics if `visible_height >= height` or either dimension is zero,
    /// which would leave no spawn buffer respectively no playfield.
    pub fn new(width: usize, height: usize, visible_height: usize) -> Self {
        assert!(width > 0 && visible_height > 0);
        assert!(visible_height < height);
        Self {
            width,
            height,
            visible_height,
            grid: vec![vec![None; width]; height],
        }
    }

    /// The number of columns.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// The total number of rows, hidden buffer included.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// The number of visible rows.
    pub const fn visible_height(&self) -> usize {
        self.visible_height
    }

    /// The number of hidden buffer rows at the top of the grid.
    pub const fn hidden_rows(&self) -> usize {
        self.height - self.visible_height
    }

    /// Read accessor for a cell; out-of-grid coordinates read as empty.
    pub fn cell(&self, (x, y): Coord) -> Cell {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        self.grid[y][x]
    }

    /// Read accessor for a whole row of cells.
    pub fn row(&self, y: usize) -> &[Cell] {
        &self.grid[y]
    }

    /// Read accessor for the rows of the grid, topmost (hidden) first.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.grid
    }

    /// Read accessor for only the visible slice of the grid.
    pub fn visible_rows(&self) -> &[Vec<Cell>] {
        &self.grid[self.hidden_rows()..]
    }

    /// Checks whether a shape placed at `position` is a legal placement.
    ///
    /// A placement fails if any occupied cell leaves `[0, width)` horizontally,
    /// reaches row `height` or below, or overlaps a filled cell. There is no
    /// upper bound: rows above the grid (y < 0) are always legal, so freshly
    /// rotated pieces may poke above the buffer.
    pub fn position_is_valid(&self, (x, y): Coord, minos: [Offset; 4]) -> bool {
        minos.iter().all(|&(dx, dy)| {
            let (cx, cy) = (x + dx, y + dy);
            if cx < 0 || cx >= self.width as i32 || cy >= self.height as i32 {
                return false;
            }
            cy < 0 || self.grid[cy as usize][cx as usize].is_none()
        })
    }

    /// True iff every cell of the given row is filled.
    pub fn row_is_full(&self, y: usize) -> bool {
        self.grid[y].iter().all(|cell| cell.is_some())
    }

    /// True iff any cell within the hidden buffer rows is filled.
    ///
    /// This is the game-over predicate, checked by the orchestrator right
    /// after a spawn attempt.
    pub fn is_topped_out(&self) -> bool {
        self.grid[..self.hidden_rows()]
            .iter()
            .any(|row| row.iter().any(|cell| cell.is_some()))
    }

    /// Writes a locked cell into the grid; coordinates outside the grid are dropped.
    pub fn fill(&mut self, (x, y): Coord, kind: PieceKind) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return false;
        }
        self.grid[y][x] = Some(kind);
        true
    }

    /// Removes one row, shifting everything above it down and inserting a
    /// fresh empty row at the top.
    pub(crate) fn remove_row(&mut self, y: usize) {
        self.grid.remove(y);
        self.grid.insert(0, vec![None; self.width]);
    }
}
