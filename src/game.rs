/*!
This module holds the top-level [`Game`] state machine which sequences board,
gravity, line clears, scoring and piece generation into a playable round.
*/

use std::time::Duration;

use crate::board::Board;
use crate::gravity::Gravity;
use crate::line_clear::{apply_line_clears, check_line_clears};
use crate::piece::{Piece, PieceKind, Rgb, Rotation};
use crate::rotation_system;
use crate::scoring::{ScoreError, ScoreKeeper, ScoreState, StorageAdapter};
use crate::seven_bag::SevenBag;
use crate::{Coord, GameBuilder};

/// How many upcoming pieces are visible in the next-queue by default.
pub const DEFAULT_PREVIEW_COUNT: usize = 5;

/// The top-level status a [`Game`] can be in.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// Initialized and ready, waiting for the begin command.
    Menu,
    /// A piece is in play and simulation time advances.
    Playing,
    /// Tick-driven timing is suspended; only resume/restart are accepted.
    Paused,
    /// Completed rows are animating out before compaction.
    LineClearing,
    /// The round is irreversibly over; only restart is accepted.
    GameOver,
}

/// A line-clear animation in progress.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingClear {
    /// The completed row indices awaiting removal, ascending.
    pub rows: Vec<usize>,
    /// Animation time left before the rows are compacted away.
    pub remaining: Duration,
}

/// A read-only view of the active piece, shape and ghost position included.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivePieceView {
    /// Type of tetromino the active piece is.
    pub kind: PieceKind,
    /// The current rotation state.
    pub rotation: Rotation,
    /// The position of the piece on the playing grid.
    pub position: Coord,
    /// The four absolute board coordinates the piece occupies.
    pub cells: [Coord; 4],
    /// The piece's display color.
    pub color: Rgb,
    /// Where the piece would come to rest, for ghost-piece rendering.
    pub ghost_position: Coord,
}

/// An immutable state snapshot for external consumers (renderer, HUD).
///
/// Rebuilt on demand after every mutation; holding on to an old snapshot
/// never aliases live engine state.
#[derive(Eq, PartialEq, Clone, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSnapshot {
    /// The game's current top-level status.
    pub status: Status,
    /// A copy of the full playing grid, hidden buffer rows included.
    pub board: Board,
    /// The piece in play, if any.
    pub active_piece: Option<ActivePieceView>,
    /// The stashed piece kind, if any.
    pub hold_piece: Option<PieceKind>,
    /// Whether the hold command is currently available.
    pub can_hold: bool,
    /// The upcoming piece kinds, nearest first.
    pub next_queue: Vec<PieceKind>,
    /// Score, level, lines, combo, back-to-back and high score.
    pub score: ScoreState,
    /// The line-clear animation in progress, if any.
    pub pending_clear: Option<PendingClear>,
    /// The level the round started at.
    pub starting_level: u32,
}

/// Main game struct representing a round of play.
///
/// `Game` owns the canonical board, active piece, hold/queue and score state
/// exclusively; subsystems borrow them for the duration of one operation
/// only. All player commands are silent no-ops outside the status they apply
/// to, and gameplay termination (an obstructed spawn) is a designed
/// transition to [`Status::GameOver`], never an error.
#[derive(Debug)]
pub struct Game {
    status: Status,
    board: Board,
    active_piece: Option<Piece>,
    gravity: Gravity,
    hold_piece: Option<PieceKind>,
    can_hold: bool,
    bag: SevenBag,
    next_queue: Vec<PieceKind>,
    score: ScoreKeeper,
    pending_clear: Option<PendingClear>,
    preview_count: usize,
    starting_level: u32,
    seed: u64,
}

impl Game {
    /// Creates a blank new template representing a yet-to-be-started [`Game`]
    /// ready for configuration.
    pub fn builder() -> GameBuilder {
        GameBuilder::default()
    }

    pub(crate) fn initialize(
        starting_level: u32,
        seed: u64,
        preview_count: usize,
        storage: Option<Box<dyn StorageAdapter>>,
    ) -> Result<Self, ScoreError> {
        let score = ScoreKeeper::new(starting_level, storage)?;
        // Keeper levels start at 1, so this cannot fail after the line above.
        let gravity = Gravity::new(score.state().level).map_err(|_| ScoreError::StartingLevelTooLow)?;

        let mut game = Self {
            status: Status::Menu,
            board: Board::standard(),
            active_piece: None,
            gravity,
            hold_piece: None,
            can_hold: true,
            bag: SevenBag::new(seed),
            next_queue: Vec::new(),
            score,
            pending_clear: None,
            preview_count,
            starting_level,
            seed,
        };

        if !game.spawn_from_bag() {
            game.status = Status::GameOver;
        }
        Ok(game)
    }

    /// Read accessor for the game's current top-level status.
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Read accessor for the playing grid.
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Read accessor for the piece in play, if any.
    pub const fn active_piece(&self) -> Option<&Piece> {
        self.active_piece.as_ref()
    }

    /// Read accessor for the stashed piece kind, if any.
    pub const fn hold_piece(&self) -> Option<PieceKind> {
        self.hold_piece
    }

    /// Whether the hold command is currently available.
    pub const fn can_hold(&self) -> bool {
        self.can_hold
    }

    /// Read accessor for the upcoming piece kinds, nearest first.
    pub fn next_queue(&self) -> &[PieceKind] {
        &self.next_queue
    }

    /// Read accessor for the current scoring state.
    pub fn score(&self) -> ScoreState {
        self.score.state()
    }

    /// Read accessor for the line-clear animation in progress, if any.
    pub const fn pending_clear(&self) -> Option<&PendingClear> {
        self.pending_clear.as_ref()
    }

    /// The seed this round's piece sequence was generated from.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Builds the externally observable state snapshot.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            status: self.status,
            board: self.board.clone(),
            active_piece: self.active_piece.as_ref().map(|piece| ActivePieceView {
                kind: piece.kind,
                rotation: piece.rotation,
                position: piece.position,
                cells: piece.cells(),
                color: piece.kind.color(),
                ghost_position: piece.dropped(&self.board).position,
            }),
            hold_piece: self.hold_piece,
            can_hold: self.can_hold,
            next_queue: self.next_queue.clone(),
            score: self.score.state(),
            pending_clear: self.pending_clear.clone(),
            starting_level: self.starting_level,
        }
    }

    /// Starts the round: `Menu → Playing`, requiring the initial spawn to have
    /// succeeded. Ignored in any other status.
    pub fn begin(&mut self) {
        if self.status == Status::Menu && self.active_piece.is_some() {
            self.status = Status::Playing;
        }
    }

    /// Suspends tick-driven timing: `Playing → Paused`. Ignored otherwise.
    pub fn pause(&mut self) {
        if self.status == Status::Playing {
            self.status = Status::Paused;
        }
    }

    /// Resumes a paused round: `Paused → Playing`. Ignored otherwise.
    pub fn resume(&mut self) {
        if self.status == Status::Paused {
            self.status = Status::Playing;
        }
    }

    /// Fully re-initializes the round (fresh board, score, randomizer and
    /// first piece) preserving the configured starting level and storage
    /// adapter, then goes straight to `Playing`.
    pub fn restart(&mut self) {
        let storage = self.score.take_storage();
        if let Ok(mut fresh) =
            Self::initialize(self.starting_level, rand::random(), self.preview_count, storage)
        {
            if fresh.status == Status::Menu {
                fresh.status = Status::Playing;
            }
            *self = fresh;
        }
    }

    /// Advances simulation time by `delta`.
    ///
    /// `Playing` delegates to gravity and runs the post-lock pipeline on a
    /// lock; `LineClearing` counts the animation down and compacts the board
    /// once it elapses. Every other status ignores ticks.
    pub fn tick(&mut self, delta: Duration) {
        match self.status {
            Status::Playing => self.tick_playing(delta),
            Status::LineClearing => self.tick_line_clearing(delta),
            Status::Menu | Status::Paused | Status::GameOver => {}
        }
    }

    /// Tries to shift the active piece one column to the left.
    pub fn move_left(&mut self) -> bool {
        self.with_active_piece(|piece, board| piece.try_move_left(board))
    }

    /// Tries to shift the active piece one column to the right.
    pub fn move_right(&mut self) -> bool {
        self.with_active_piece(|piece, board| piece.try_move_right(board))
    }

    /// Tries to rotate the active piece clockwise, wall kicks included.
    pub fn rotate_cw(&mut self) -> bool {
        self.with_active_piece(rotation_system::rotate_cw)
    }

    /// Tries to rotate the active piece counter-clockwise, wall kicks included.
    pub fn rotate_ccw(&mut self) -> bool {
        self.with_active_piece(rotation_system::rotate_ccw)
    }

    /// Drops the active piece one row, awarding soft-drop points on success.
    ///
    /// Soft drop is an explicit accelerated one-cell move rather than a
    /// gravity-interval override, which keeps per-cell scoring attributable.
    pub fn soft_drop(&mut self) -> bool {
        if self.status != Status::Playing {
            return false;
        }
        let Some(piece) = self.active_piece.as_mut() else {
            return false;
        };
        if piece.try_move_down(&self.board) {
            self.score.add_drop_score(1, false);
            self.gravity.notify_action(piece, &self.board);
            true
        } else {
            false
        }
    }

    /// Drops the active piece to its resting position, awards hard-drop
    /// points, locks it immediately and runs the post-lock pipeline.
    pub fn hard_drop(&mut self) -> bool {
        if self.status != Status::Playing {
            return false;
        }
        let Some(piece) = self.active_piece.as_mut() else {
            return false;
        };
        let distance = piece.hard_drop(&self.board);
        if distance > 0 {
            self.score.add_drop_score(distance, true);
        }
        self.gravity.force_lock(piece, &mut self.board);
        self.handle_lock();
        true
    }

    /// Swaps the active piece with the held kind, or stashes it and spawns
    /// from the queue if nothing was held yet.
    ///
    /// Disabled until the next successful lock, preventing hold-cycling
    /// within one piece's lifetime.
    pub fn hold(&mut self) -> bool {
        if self.status != Status::Playing || !self.can_hold {
            return false;
        }
        let Some(piece) = self.active_piece else {
            return false;
        };

        let spawned = match self.hold_piece.replace(piece.kind) {
            Some(held) => self.spawn_piece(held),
            None => self.spawn_from_bag(),
        };

        if !spawned {
            self.game_over();
            return false;
        }
        self.can_hold = false;
        true
    }

    fn tick_playing(&mut self, delta: Duration) {
        let Some(piece) = self.active_piece.as_mut() else {
            return;
        };
        let outcome = self.gravity.update(piece, &mut self.board, delta);
        if outcome.locked {
            self.handle_lock();
        }
    }

    fn tick_line_clearing(&mut self, delta: Duration) {
        let Some(pending) = self.pending_clear.as_mut() else {
            return;
        };
        if pending.remaining > delta {
            pending.remaining -= delta;
            return;
        }
        let Some(pending) = self.pending_clear.take() else {
            return;
        };

        let outcome = apply_line_clears(&self.board, &pending.rows);
        self.board = outcome.board;
        // A single lock completes at most four rows, so this cannot fail validation.
        let _ = self.score.add_line_clear(outcome.lines_cleared);

        if !self.spawn_from_bag() {
            self.game_over();
            return;
        }
        self.status = Status::Playing;
        self.can_hold = true;
    }

    /// The shared pipeline after any lock, natural or forced.
    fn handle_lock(&mut self) {
        self.active_piece = None;

        let check = check_line_clears(&self.board);
        if check.has_clears() {
            tracing::debug!(rows = ?check.cleared_rows, "rows completed, clearing");
            self.can_hold = false;
            self.pending_clear = Some(PendingClear {
                rows: check.cleared_rows,
                remaining: check.animation_duration,
            });
            self.status = Status::LineClearing;
            return;
        }

        self.score.register_no_line_clear();
        if !self.spawn_from_bag() {
            self.game_over();
            return;
        }
        self.can_hold = true;
    }

    fn spawn_from_bag(&mut self) -> bool {
        let kind = self.bag.next_piece();
        self.spawn_piece(kind)
    }

    /// Tries to bring a fresh piece of `kind` into play.
    ///
    /// Fails when the spawn position is obstructed or the board is topped
    /// out; the caller turns that into the game-over transition.
    fn spawn_piece(&mut self, kind: PieceKind) -> bool {
        let piece = Piece::spawn(kind);
        self.next_queue = self.bag.peek(self.preview_count);

        if !piece.fits(&self.board) || self.board.is_topped_out() {
            return false;
        }

        // Keeper levels start at 1 and only grow, so this cannot fail.
        let _ = self.gravity.set_level(self.score.state().level);
        self.gravity.set_piece(&piece, &self.board);
        self.active_piece = Some(piece);
        true
    }

    fn game_over(&mut self) {
        tracing::debug!(score = self.score.state().score, "game over");
        self.status = Status::GameOver;
        self.active_piece = None;
        self.pending_clear = None;
    }

    fn with_active_piece(&mut self, action: impl FnOnce(&mut Piece, &Board) -> bool) -> bool {
        if self.status != Status::Playing {
            return false;
        }
        let Some(piece) = self.active_piece.as_mut() else {
            return false;
        };
        if action(piece, &self.board) {
            self.gravity.notify_action(piece, &self.board);
            true
        } else {
            false
        }
    }
}
