/*!
This module handles per-piece fall timing and the lock-delay state machine.
*/

use std::{error::Error, fmt, time::Duration};

use crate::board::Board;
use crate::piece::Piece;
use crate::Coord;

/// Base fall interval at level 1.
pub const FALL_INTERVAL_BASE: Duration = Duration::from_millis(1000);
/// How much faster each level falls than the previous one.
pub const FALL_INTERVAL_STEP: Duration = Duration::from_millis(100);
/// The fall interval floor that high levels cannot go below.
pub const FALL_INTERVAL_MIN: Duration = Duration::from_millis(100);
/// How long a grounded piece may rest before it is committed to the board.
pub const LOCK_DELAY: Duration = Duration::from_millis(500);
/// How many times lock delay may be re-armed by player actions per piece.
pub const LOCK_RESET_CAP: u32 = 15;
/// How many times faster than gravity a held soft drop falls.
pub const SOFT_DROP_DIVISOR: u32 = 10;
/// The soft-drop interval floor.
pub const SOFT_DROP_INTERVAL_MIN: Duration = Duration::from_millis(10);

/// An error thrown when a gravity level fails validation.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
pub enum GravityError {
    /// Error variant caused by an attempt to set a level below 1.
    LevelTooLow,
}

impl fmt::Display for GravityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GravityError::LevelTooLow => write!(f, "gravity level must be at least 1"),
        }
    }
}

impl Error for GravityError {}

/// The result of one [`Gravity::update`] call.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Default, Debug)]
pub struct FallOutcome {
    /// How many rows the piece descended during this update.
    pub rows_fallen: u32,
    /// Whether the piece got committed to the board during this update.
    pub locked: bool,
    /// The board coordinates newly filled by locking, if a lock occurred.
    pub locked_cells: Vec<Coord>,
}

/// The gravity and lock-delay state machine for the current active piece.
///
/// `Gravity` owns timing state only; the piece and board are borrowed per
/// call, so no long-lived alias of either exists. All state is reset via
/// [`Gravity::set_piece`] whenever the orchestrator assigns a new piece.
#[derive(Eq, PartialEq, Clone, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gravity {
    level: u32,
    fall_interval: Duration,
    /// Time carried toward the next one-cell fall.
    accumulator: Duration,
    /// Time the piece has spent grounded since the last reset.
    lock_timer: Duration,
    lock_resets: u32,
    grounded: bool,
    locked: bool,
}

/// Calculates the duration a piece takes to fall one row at the given level.
pub fn fall_interval(level: u32) -> Duration {
    let reduction = FALL_INTERVAL_STEP.saturating_mul(level.saturating_sub(1));
    FALL_INTERVAL_MIN.max(FALL_INTERVAL_BASE.saturating_sub(reduction))
}

/// Calculates the accelerated interval used while soft drop is held.
pub fn soft_drop_interval(fall_interval: Duration) -> Duration {
    SOFT_DROP_INTERVAL_MIN.max(fall_interval / SOFT_DROP_DIVISOR)
}

impl Gravity {
    /// Creates a gravity state machine for the given level.
    ///
    /// # Errors
    /// Fails with [`GravityError::LevelTooLow`] for levels below 1.
    pub fn new(level: u32) -> Result<Self, GravityError> {
        if level < 1 {
            return Err(GravityError::LevelTooLow);
        }
        Ok(Self {
            level,
            fall_interval: fall_interval(level),
            accumulator: Duration::ZERO,
            lock_timer: Duration::ZERO,
            lock_resets: 0,
            grounded: false,
            locked: false,
        })
    }

    /// Re-derives the fall interval for a new level.
    ///
    /// # Errors
    /// Fails with [`GravityError::LevelTooLow`] for levels below 1, leaving
    /// the existing state untouched.
    pub fn set_level(&mut self, level: u32) -> Result<(), GravityError> {
        if level < 1 {
            return Err(GravityError::LevelTooLow);
        }
        self.level = level;
        self.fall_interval = fall_interval(level);
        Ok(())
    }

    /// Assigns a freshly spawned piece: all timers reset, grounded recomputed.
    pub fn set_piece(&mut self, piece: &Piece, board: &Board) {
        self.accumulator = Duration::ZERO;
        self.lock_timer = Duration::ZERO;
        self.lock_resets = 0;
        self.locked = false;
        self.grounded = !piece.fits_at(board, (0, 1));
    }

    /// Re-grounds the same piece against a replaced board (post line-clear).
    ///
    /// Timers deliberately survive: this is the same piece continuing its fall.
    pub fn set_board(&mut self, piece: &Piece, board: &Board) {
        self.grounded = !piece.fits_at(board, (0, 1));
    }

    /// Advances fall and lock timing by `delta`.
    ///
    /// While the accumulator covers whole fall intervals the piece descends one
    /// row at a time; a blocked descent zeroes the accumulator (no partial
    /// credit carries over). Lock timing advances whenever the piece ends the
    /// update grounded, even across updates that triggered no fall attempt.
    pub fn update(&mut self, piece: &mut Piece, board: &mut Board, delta: Duration) -> FallOutcome {
        if self.locked {
            return FallOutcome {
                locked: true,
                ..FallOutcome::default()
            };
        }

        self.accumulator += delta;
        let mut rows_fallen = 0;

        while self.accumulator >= self.fall_interval && !self.locked {
            self.accumulator -= self.fall_interval;

            if piece.try_move_down(board) {
                rows_fallen += 1;
                self.lock_timer = Duration::ZERO;
                self.lock_resets = 0;
                continue;
            }

            self.accumulator = Duration::ZERO;
            break;
        }

        self.grounded = !piece.fits_at(board, (0, 1));

        if !self.grounded {
            self.lock_timer = Duration::ZERO;
            self.lock_resets = 0;
        } else {
            self.lock_timer += delta;

            if self.lock_timer >= LOCK_DELAY {
                let locked_cells = self.lock(piece, board);
                return FallOutcome {
                    rows_fallen,
                    locked: true,
                    locked_cells,
                };
            }
        }

        FallOutcome {
            rows_fallen,
            locked: false,
            locked_cells: Vec::new(),
        }
    }

    /// Bookkeeping hook called after any successful player-initiated move or rotation.
    ///
    /// Re-arms the lock delay while the reset cap has not been reached. Once
    /// it has, the running timer is preserved rather than restarted, bounding
    /// infinite spins and slides.
    pub fn notify_action(&mut self, piece: &Piece, board: &Board) {
        if self.locked {
            return;
        }

        let was_grounded = self.grounded;
        self.grounded = !piece.fits_at(board, (0, 1));

        if was_grounded && self.grounded && self.lock_resets < LOCK_RESET_CAP {
            self.lock_timer = Duration::ZERO;
            self.lock_resets += 1;
        }
    }

    /// Locks the piece immediately regardless of timer state; used by hard drop.
    ///
    /// Returns the newly filled coordinates, or nothing if already locked.
    pub fn force_lock(&mut self, piece: &Piece, board: &mut Board) -> Vec<Coord> {
        if self.locked {
            return Vec::new();
        }
        self.lock(piece, board)
    }

    /// Whether the current piece has been committed to the board.
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether the piece cannot descend one more cell.
    pub const fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// The time the piece has spent grounded since the last lock-delay reset.
    pub const fn lock_timer(&self) -> Duration {
        self.lock_timer
    }

    /// How many lock-delay resets the current piece has used up.
    pub const fn lock_resets(&self) -> u32 {
        self.lock_resets
    }

    /// The current per-row fall interval.
    pub const fn current_fall_interval(&self) -> Duration {
        self.fall_interval
    }

    fn lock(&mut self, piece: &Piece, board: &mut Board) -> Vec<Coord> {
        self.locked = true;
        let mut locked_cells = Vec::with_capacity(4);
        for cell in piece.cells() {
            if board.fill(cell, piece.kind) {
                locked_cells.push(cell);
            }
        }
        tracing::trace!(kind = ?piece.kind, position = ?piece.position, "piece locked");
        locked_cells
    }
}
