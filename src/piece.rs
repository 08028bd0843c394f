/*!
This module holds the static tetromino catalog and the active [`Piece`] in play.
*/

use crate::board::Board;
use crate::{Coord, Offset};

/// An sRGB color associated with a piece kind, for renderers.
pub type Rgb = (u8, u8, u8);

/// Represents one of the seven tetromino kinds.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PieceKind {
    /// 'I'-Tetromino. Four squares in a straight line.
    I = 0,
    /// 'O'-Tetromino. Four squares as one big square.
    O,
    /// 'T'-Tetromino. Four squares in a 'T'-junction.
    T,
    /// 'S'-Tetromino. Four squares snaking in an 'S'.
    S,
    /// 'Z'-Tetromino. Four squares snaking in a 'Z'.
    Z,
    /// 'J'-Tetromino. Four squares in a 'J'-shape.
    J,
    /// 'L'-Tetromino. Four squares in an 'L'-shape.
    L,
}

/// Represents the rotation state an active piece can be in.
///
/// States follow the guideline convention: spawn, clockwise, 180°, counter-clockwise.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    /// Spawn state.
    R0 = 0,
    /// One clockwise turn from spawn.
    R1,
    /// Two turns from spawn.
    R2,
    /// One counter-clockwise turn from spawn.
    R3,
}

impl PieceKind {
    /// All `PieceKind` enum variants in order.
    ///
    /// Note that `PieceKind::VARIANTS[k as usize] == k` always holds.
    pub const VARIANTS: [Self; 7] = {
        use PieceKind::*;
        [I, O, T, S, Z, J, L]
    };

    /// Returns the occupied-cell offsets of a kind's occupancy matrix at a given rotation.
    ///
    /// Offsets are relative to the piece position (the matrix' top-left origin),
    /// x growing rightward and y growing downward.
    #[rustfmt::skip]
    pub const fn minos(self, rotation: Rotation) -> [Offset; 4] {
        use Rotation::*;
        match self {
            PieceKind::I => match rotation {
                R0 => [(0, 1), (1, 1), (2, 1), (3, 1)], // ▄▄▄▄
                R1 => [(2, 0), (2, 1), (2, 2), (2, 3)], // ⡇
                R2 => [(0, 2), (1, 2), (2, 2), (3, 2)],
                R3 => [(1, 0), (1, 1), (1, 2), (1, 3)],
            },
            PieceKind::O => [(0, 0), (1, 0), (0, 1), (1, 1)], // ██
            PieceKind::T => match rotation {
                R0 => [(1, 0), (0, 1), (1, 1), (2, 1)], // ▄█▄
                R1 => [(1, 0), (1, 1), (2, 1), (1, 2)],
                R2 => [(0, 1), (1, 1), (2, 1), (1, 2)],
                R3 => [(1, 0), (0, 1), (1, 1), (1, 2)],
            },
            PieceKind::S => match rotation {
                R0 => [(1, 0), (2, 0), (0, 1), (1, 1)], // ▄█▀
                R1 => [(1, 0), (1, 1), (2, 1), (2, 2)],
                R2 => [(1, 1), (2, 1), (0, 2), (1, 2)],
                R3 => [(0, 0), (0, 1), (1, 1), (1, 2)],
            },
            PieceKind::Z => match rotation {
                R0 => [(0, 0), (1, 0), (1, 1), (2, 1)], // ▀█▄
                R1 => [(2, 0), (1, 1), (2, 1), (1, 2)],
                R2 => [(0, 1), (1, 1), (1, 2), (2, 2)],
                R3 => [(1, 0), (0, 1), (1, 1), (0, 2)],
            },
            PieceKind::J => match rotation {
                R0 => [(0, 0), (0, 1), (1, 1), (2, 1)], // █▄▄
                R1 => [(1, 0), (2, 0), (1, 1), (1, 2)],
                R2 => [(0, 1), (1, 1), (2, 1), (2, 2)],
                R3 => [(1, 0), (1, 1), (0, 2), (1, 2)],
            },
            PieceKind::L => match rotation {
                R0 => [(2, 0), (0, 1), (1, 1), (2, 1)], // ▄▄█
                R1 => [(1, 0), (1, 1), (1, 2), (2, 2)],
                R2 => [(0, 1), (1, 1), (2, 1), (0, 2)],
                R3 => [(0, 0), (1, 0), (1, 1), (1, 2)],
            },
        }
    }

    /// Returns the convened-on guideline color of the given kind.
    pub const fn color(self) -> Rgb {
        match self {
            PieceKind::I => (0x00, 0xF0, 0xF0), // Cyan.
            PieceKind::O => (0xF0, 0xF0, 0x00), // Yellow.
            PieceKind::T => (0xA0, 0x00, 0xF0), // Purple.
            PieceKind::S => (0x00, 0xF0, 0x00), // Green.
            PieceKind::Z => (0xF0, 0x00, 0x00), // Red.
            PieceKind::J => (0x00, 0x00, 0xF0), // Blue.
            PieceKind::L => (0xF0, 0xA0, 0x00), // Orange.
        }
    }

    /// Returns the board position at which a fresh piece of this kind spawns.
    ///
    /// Row 0 is the topmost (hidden) row; the occupancy matrices keep every
    /// spawn entirely within the hidden buffer rows.
    pub const fn spawn_position(self) -> Coord {
        match self {
            PieceKind::O => (4, 0),
            _ => (3, 0),
        }
    }
}

impl Rotation {
    /// All `Rotation` enum variants in order.
    ///
    /// Note that `Rotation::VARIANTS[r as usize] == r` always holds.
    pub const VARIANTS: [Self; 4] = {
        use Rotation::*;
        [R0, R1, R2, R3]
    };

    /// The rotation state reached by one clockwise turn.
    pub const fn rotated_cw(self) -> Self {
        Rotation::VARIANTS[(self as usize + 1) % 4]
    }

    /// The rotation state reached by one counter-clockwise turn.
    pub const fn rotated_ccw(self) -> Self {
        Rotation::VARIANTS[(self as usize + 3) % 4]
    }
}

/// An active tetromino in play.
///
/// The shape is always derived from `kind` × `rotation` via [`PieceKind::minos`],
/// never stored. Position is the top-left origin of the occupancy matrix in
/// board coordinates; y grows downward and may be negative (above the grid).
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece {
    /// Type of tetromino the active piece is.
    pub kind: PieceKind,
    /// The current rotation state.
    pub rotation: Rotation,
    /// The position of the piece on the playing grid.
    pub position: Coord,
}

impl Piece {
    /// Creates a fresh piece of the given kind at its spawn position.
    pub const fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::R0,
            position: kind.spawn_position(),
        }
    }

    /// Returns the four absolute board coordinates the piece occupies.
    pub fn cells(&self) -> [Coord; 4] {
        let (x, y) = self.position;
        self.kind
            .minos(self.rotation)
            .map(|(dx, dy)| (x + dx, y + dy))
    }

    /// Checks whether the piece fits at its current location onto the board.
    pub fn fits(&self, board: &Board) -> bool {
        board.position_is_valid(self.position, self.kind.minos(self.rotation))
    }

    /// Checks whether the piece fits at a given offset from its current location.
    pub fn fits_at(&self, board: &Board, (dx, dy): Offset) -> bool {
        let (x, y) = self.position;
        board.position_is_valid((x + dx, y + dy), self.kind.minos(self.rotation))
    }

    /// Tries to shift the piece one column to the left.
    ///
    /// Returns whether the move succeeded; the piece is unchanged otherwise.
    pub fn try_move_left(&mut self, board: &Board) -> bool {
        self.try_shift(board, (-1, 0))
    }

    /// Tries to shift the piece one column to the right.
    pub fn try_move_right(&mut self, board: &Board) -> bool {
        self.try_shift(board, (1, 0))
    }

    /// Tries to move the piece one row down.
    pub fn try_move_down(&mut self, board: &Board) -> bool {
        self.try_shift(board, (0, 1))
    }

    /// The number of rows the piece could still fall before resting.
    pub fn drop_distance(&self, board: &Board) -> u32 {
        let mut distance = 0;
        while self.fits_at(board, (0, distance as i32 + 1)) {
            distance += 1;
        }
        distance
    }

    /// Moves the piece to its lowest valid position, returning the distance travelled.
    pub fn hard_drop(&mut self, board: &Board) -> u32 {
        let distance = self.drop_distance(board);
        self.position.1 += distance as i32;
        distance
    }

    /// The position the piece would come to rest at, for ghost-piece previews.
    pub fn dropped(&self, board: &Board) -> Piece {
        let mut ghost = *self;
        ghost.hard_drop(board);
        ghost
    }

    fn try_shift(&mut self, board: &Board, offset: Offset) -> bool {
        if self.fits_at(board, offset) {
            self.position.0 += offset.0;
            self.position.1 += offset.1;
            true
        } else {
            false
        }
    }
}
