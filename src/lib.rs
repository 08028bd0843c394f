/*!
# Blockfall Engine

`blockfall_engine` is a guideline-style falling-block puzzle engine: a
deterministic, tick-driven simulation core with no rendering or input layer of
its own.

It provides the standard 10x22 playing grid (top two rows hidden), the seven
tetromino kinds with wall-kick rotation, a bag randomizer, gravity with lock
delay, line clearing with a compaction animation window, and guideline scoring
with combo and back-to-back chains. A host drives the [`Game`] with discrete
commands plus [`Game::tick`] calls carrying elapsed time, and renders from
[`Game::snapshot`].

# Examples

```
use std::time::Duration;

use blockfall_engine::{GameBuilder, Status};

// Configure and initialize a round; the same seed replays the same pieces.
let mut game = GameBuilder::new().seed(42).build().expect("valid config");
game.begin();

// The host forwards player commands...
game.move_left();
game.rotate_cw();

// ...and advances simulation time; pieces fall, ground, and lock.
game.tick(Duration::from_millis(16));

// Render from an immutable snapshot of the whole game state.
let snapshot = game.snapshot();
assert_eq!(snapshot.status, Status::Playing);
```
*/

#![warn(missing_docs)]

pub mod auto_repeat;
pub mod board;
mod game;
mod game_builder;
pub mod gravity;
pub mod line_clear;
pub mod piece;
pub mod rotation_system;
pub mod scoring;
pub mod seven_bag;

pub use auto_repeat::AutoRepeat;
pub use board::Board;
pub use game::{ActivePieceView, Game, GameSnapshot, PendingClear, Status, DEFAULT_PREVIEW_COUNT};
pub use game_builder::GameBuilder;
pub use gravity::{FallOutcome, Gravity, GravityError};
pub use line_clear::{LineClearCheck, LineClearOutcome};
pub use piece::{Piece, PieceKind, Rgb, Rotation};
pub use scoring::{MemoryStore, ScoreError, ScoreKeeper, ScoreState, StorageAdapter};
pub use seven_bag::SevenBag;

/// Coordinates used to address cells of a [`Board`], `(x, y)` with `y`
/// growing downward; `y` may be negative while a piece is above the grid.
pub type Coord = (i32, i32);
/// Coordinate offsets that can be added to [`Coord`]inates.
pub type Offset = (i32, i32);
/// The internal RNG a game's piece sequence is drawn from.
pub type GameRng = rand_chacha::ChaCha12Rng;
