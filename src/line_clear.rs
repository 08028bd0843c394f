/*!
This module handles full-row detection and row compaction on the [`Board`].
*/

use std::time::Duration;

use crate::board::Board;
use crate::Coord;

/// How long the game takes to clear lines, for renderer fade/flash effects.
pub const LINE_CLEAR_DURATION: Duration = Duration::from_millis(300);

/// The result of scanning a board for completed rows.
#[derive(Eq, PartialEq, Clone, Hash, Debug)]
pub struct LineClearCheck {
    /// Indices of completed rows, ascending; only the visible region is eligible.
    pub cleared_rows: Vec<usize>,
    /// Every cell coordinate belonging to a completed row.
    pub cells_to_clear: Vec<Coord>,
    /// How long the clear animation should run before compaction.
    pub animation_duration: Duration,
}

impl LineClearCheck {
    /// Whether the scan found at least one completed row.
    pub fn has_clears(&self) -> bool {
        !self.cleared_rows.is_empty()
    }
}

/// The result of compacting cleared rows out of a board.
#[derive(Eq, PartialEq, Clone, Hash, Debug)]
pub struct LineClearOutcome {
    /// The compacted board; always a fresh copy, even for an empty row set.
    pub board: Board,
    /// How many rows were actually removed.
    pub lines_cleared: u32,
    /// The sorted indices of the removed rows.
    pub cleared_rows: Vec<usize>,
}

/// Scans the visible region of the board for completed rows.
///
/// Hidden buffer rows are never eligible for clearing, even if momentarily full.
pub fn check_line_clears(board: &Board) -> LineClearCheck {
    let mut cleared_rows = Vec::new();
    let mut cells_to_clear = Vec::new();

    for y in board.hidden_rows()..board.height() {
        if board.row_is_full(y) {
            cleared_rows.push(y);
            cells_to_clear.extend((0..board.width()).map(|x| (x as i32, y as i32)));
        }
    }

    LineClearCheck {
        cleared_rows,
        cells_to_clear,
        animation_duration: LINE_CLEAR_DURATION,
    }
}

/// Removes the named rows and shifts everything above them down.
///
/// Rows are processed in ascending order so earlier removals cannot displace
/// the indices of later ones. Each removal inserts a fresh empty row at the
/// top of the grid. An empty row set is a no-op that still returns a copy.
pub fn apply_line_clears(board: &Board, rows: &[usize]) -> LineClearOutcome {
    let mut new_board = board.clone();

    let mut sorted_rows = rows.to_vec();
    sorted_rows.sort_unstable();
    sorted_rows.dedup();

    for &y in &sorted_rows {
        new_board.remove_row(y);
    }

    LineClearOutcome {
        board: new_board,
        lines_cleared: sorted_rows.len() as u32,
        cleared_rows: sorted_rows,
    }
}
