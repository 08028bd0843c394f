/*!
This module handles Super-Rotation-System rotation of [`Piece`]s, wall kicks included.
*/

use crate::board::Board;
use crate::piece::{Piece, PieceKind, Rotation};
use crate::Offset;

/// Which wall-kick table family a piece kind looks up.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KickClass {
    /// The five pieces sharing the common SRS table (T, S, Z, J, L).
    Standard,
    /// The I-piece, which kicks on its own table due to its 4×4 matrix.
    IKind,
    /// The O-piece, which never kicks (rotation is the identity).
    OKind,
}

impl PieceKind {
    /// The wall-kick table family this kind belongs to.
    pub const fn kick_class(self) -> KickClass {
        match self {
            PieceKind::I => KickClass::IKind,
            PieceKind::O => KickClass::OKind,
            _ => KickClass::Standard,
        }
    }
}

/// Tries to rotate a piece one quarter turn clockwise, committing the first
/// valid kick offset.
///
/// Returns whether the rotation succeeded; the piece is unchanged otherwise.
pub fn rotate_cw(piece: &mut Piece, board: &Board) -> bool {
    rotate(piece, board, true)
}

/// Tries to rotate a piece one quarter turn counter-clockwise.
pub fn rotate_ccw(piece: &mut Piece, board: &Board) -> bool {
    rotate(piece, board, false)
}

fn rotate(piece: &mut Piece, board: &Board, clockwise: bool) -> bool {
    // O is rotationally symmetric; report success without touching anything.
    if piece.kind == PieceKind::O {
        return true;
    }

    let from = piece.rotation;
    let to = if clockwise {
        from.rotated_cw()
    } else {
        from.rotated_ccw()
    };
    let minos = piece.kind.minos(to);
    let kicks = kick_table(piece.kind.kick_class(), from, to);

    if kicks.is_empty() {
        // A kind without kick data only rotates in place.
        if board.position_is_valid(piece.position, minos) {
            piece.rotation = to;
            return true;
        }
        return false;
    }

    for &(dx, dy) in kicks {
        // Kick tables are written y-up, the board is y-down.
        let candidate = (piece.position.0 + dx, piece.position.1 - dy);
        if board.position_is_valid(candidate, minos) {
            piece.position = candidate;
            piece.rotation = to;
            return true;
        }
    }

    false
}

/// The ordered wall-kick offsets for a rotation transition.
///
/// Offsets are tried strictly in order; later entries are fallbacks only.
/// Table coordinates have y growing upward, per the SRS convention.
#[rustfmt::skip]
pub const fn kick_table(class: KickClass, from: Rotation, to: Rotation) -> &'static [Offset] {
    use Rotation::*;
    match class {
        KickClass::OKind => &[],
        KickClass::Standard => match (from, to) {
            (R0, R1) => &[( 0, 0), (-1, 0), (-1, 1), ( 0,-2), (-1,-2)],
            (R1, R2) => &[( 0, 0), ( 1, 0), ( 1,-1), ( 0, 2), ( 1, 2)],
            (R2, R3) => &[( 0, 0), ( 1, 0), ( 1, 1), ( 0,-2), ( 1,-2)],
            (R3, R0) => &[( 0, 0), (-1, 0), (-1,-1), ( 0, 2), (-1, 2)],
            (R1, R0) => &[( 0, 0), ( 1, 0), ( 1,-1), ( 0, 2), ( 1, 2)],
            (R2, R1) => &[( 0, 0), (-1, 0), (-1, 1), ( 0,-2), (-1,-2)],
            (R3, R2) => &[( 0, 0), (-1, 0), (-1,-1), ( 0, 2), (-1, 2)],
            (R0, R3) => &[( 0, 0), ( 1, 0), ( 1, 1), ( 0,-2), ( 1,-2)],
            // Non-adjacent transitions never occur in quarter-turn rotation.
            _ => &[],
        },
        KickClass::IKind => match (from, to) {
            (R0, R1) => &[( 0, 0), (-2, 0), ( 1, 0), (-2,-1), ( 1, 2)],
            (R1, R2) => &[( 0, 0), (-1, 0), ( 2, 0), (-1, 2), ( 2,-1)],
            (R2, R3) => &[( 0, 0), ( 2, 0), (-1, 0), ( 2, 1), (-1,-2)],
            (R3, R0) => &[( 0, 0), ( 1, 0), (-2, 0), ( 1,-2), (-2, 1)],
            (R1, R0) => &[( 0, 0), ( 2, 0), (-1, 0), ( 2, 1), (-1,-2)],
            (R2, R1) => &[( 0, 0), ( 1, 0), (-2, 0), ( 1,-2), (-2, 1)],
            (R3, R2) => &[( 0, 0), (-2, 0), ( 1, 0), (-2,-1), ( 1, 2)],
            (R0, R3) => &[( 0, 0), (-1, 0), ( 2, 0), (-1, 2), ( 2,-1)],
            _ => &[],
        },
    }
}
