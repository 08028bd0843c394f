/*!
This module handles line-clear scoring, combo and back-to-back chains, level
derivation, and high-score persistence through an injected storage adapter.
*/

use std::{cell::RefCell, collections::HashMap, error::Error, fmt, rc::Rc};

/// Base points for a single line clear, multiplied by level.
pub const SINGLE_POINTS: u32 = 100;
/// Base points for a double line clear, multiplied by level.
pub const DOUBLE_POINTS: u32 = 300;
/// Base points for a triple line clear, multiplied by level.
pub const TRIPLE_POINTS: u32 = 500;
/// Base points for a four-line ("tetris") clear, multiplied by level.
pub const TETRIS_POINTS: u32 = 800;
/// Bonus factor applied to consecutive tetris clears, floored after multiplication.
pub const BACK_TO_BACK_MULTIPLIER: f64 = 1.5;
/// Base points per combo step, multiplied by combo count and level.
pub const COMBO_BASE_POINTS: u32 = 50;
/// Points per cell travelled by soft drop.
pub const SOFT_DROP_POINTS: u32 = 1;
/// Points per cell travelled by hard drop.
pub const HARD_DROP_POINTS: u32 = 2;
/// Lines needed to advance each level.
pub const LINES_PER_LEVEL: u32 = 10;
/// The storage key under which the high score is persisted.
pub const HIGH_SCORE_KEY: &str = "blockfall_high_score";

/// An error thrown when a scoring argument fails validation.
///
/// These are programming errors, fatal to the call but never to existing
/// state; no partial mutation survives a failed validation.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
pub enum ScoreError {
    /// Error variant caused by constructing a score keeper with a starting level below 1.
    StartingLevelTooLow,
    /// Error variant caused by reporting a simultaneous clear of more rows than a piece can complete.
    InvalidLineCount(u32),
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::StartingLevelTooLow => write!(f, "starting level must be at least 1"),
            ScoreError::InvalidLineCount(n) => {
                write!(f, "a piece can clear at most 4 lines, got {n}")
            }
        }
    }
}

impl Error for ScoreError {}

/// The key-value contract high-score persistence goes through.
///
/// The engine only ever stores a single decimal integer string under
/// [`HIGH_SCORE_KEY`]; missing or malformed values are treated as zero.
/// Reads and writes are synchronous and happen solely on score updates.
pub trait StorageAdapter {
    /// Retrieves the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str);
}

/// An in-memory [`StorageAdapter`] whose clones share one underlying map.
///
/// Cloning hands out another handle to the same storage, so a later score
/// keeper constructed against a clone sees earlier persisted values.
#[derive(Clone, Default, Debug)]
pub struct MemoryStore(Rc<RefCell<HashMap<String, String>>>);

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageAdapter for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.0.borrow_mut().insert(key.to_owned(), value.to_owned());
    }
}

/// A read-only view of the scoring state.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreState {
    /// The cumulative score of the current round.
    pub score: u32,
    /// The current level, derived from total lines and the starting level.
    pub level: u32,
    /// The total number of lines cleared this round.
    pub total_lines: u32,
    /// The combo counter: −1 while no chain is active, 0 on the first clear
    /// of a chain, n on the nth consecutive clearing lock.
    pub combo: i32,
    /// Whether the last clear was a four-line clear.
    pub back_to_back: bool,
    /// The best score seen so far, possibly loaded from storage.
    pub high_score: u32,
}

/// Base points for clearing `lines` rows at once at the given level.
///
/// A tetris additionally gets the floored back-to-back bonus when eligible.
pub fn line_clear_points(lines: u32, level: u32, back_to_back: bool) -> u32 {
    let base = match lines {
        1 => SINGLE_POINTS,
        2 => DOUBLE_POINTS,
        3 => TRIPLE_POINTS,
        4 if back_to_back => (f64::from(TETRIS_POINTS) * BACK_TO_BACK_MULTIPLIER) as u32,
        4 => TETRIS_POINTS,
        _ => return 0,
    };
    base * level
}

/// Bonus points for the `combo`-th consecutive clearing lock at the given level.
pub fn combo_points(combo: u32, level: u32) -> u32 {
    COMBO_BASE_POINTS * combo * level
}

/// Points for dropping a piece `cells` rows by soft or hard drop.
pub fn drop_points(cells: u32, hard: bool) -> u32 {
    cells * if hard { HARD_DROP_POINTS } else { SOFT_DROP_POINTS }
}

/// Derives the level from total lines cleared and a starting level.
pub fn level_for(total_lines: u32, starting_level: u32) -> u32 {
    starting_level + total_lines / LINES_PER_LEVEL
}

/// Tracks score, combo/back-to-back chains and level for one round of play.
pub struct ScoreKeeper {
    starting_level: u32,
    storage: Option<Box<dyn StorageAdapter>>,
    score: u32,
    level: u32,
    total_lines: u32,
    combo: i32,
    back_to_back: bool,
    high_score: u32,
}

impl ScoreKeeper {
    /// Creates a score keeper, loading the persisted high score if a storage
    /// adapter is supplied.
    ///
    /// # Errors
    /// Fails with [`ScoreError::StartingLevelTooLow`] for starting levels below 1.
    pub fn new(
        starting_level: u32,
        storage: Option<Box<dyn StorageAdapter>>,
    ) -> Result<Self, ScoreError> {
        if starting_level < 1 {
            return Err(ScoreError::StartingLevelTooLow);
        }
        let mut keeper = Self {
            starting_level,
            storage,
            score: 0,
            level: starting_level,
            total_lines: 0,
            combo: -1,
            back_to_back: false,
            high_score: 0,
        };
        keeper.high_score = keeper.load_high_score();
        Ok(keeper)
    }

    /// Read accessor for the current scoring state.
    pub fn state(&self) -> ScoreState {
        ScoreState {
            score: self.score,
            level: self.level,
            total_lines: self.total_lines,
            combo: self.combo,
            back_to_back: self.back_to_back,
            high_score: self.high_score,
        }
    }

    /// Registers a lock that cleared `lines` rows, returning the points awarded.
    ///
    /// Equivalent to [`ScoreKeeper::add_line_clear_with`] without an explicit
    /// back-to-back eligibility override.
    pub fn add_line_clear(&mut self, lines: u32) -> Result<u32, ScoreError> {
        self.add_line_clear_with(lines, false)
    }

    /// Registers a lock that cleared `lines` rows, returning the points awarded.
    ///
    /// `lines == 0` resets the combo and back-to-back chains and awards nothing.
    /// Otherwise the level is recomputed from the new line total before any
    /// multiplication; a tetris gets the back-to-back bonus when the previous
    /// clear was a tetris or the caller marks eligibility.
    ///
    /// # Errors
    /// Fails with [`ScoreError::InvalidLineCount`] for counts above 4,
    /// leaving all state unchanged.
    pub fn add_line_clear_with(
        &mut self,
        lines: u32,
        back_to_back_eligible: bool,
    ) -> Result<u32, ScoreError> {
        if lines > 4 {
            return Err(ScoreError::InvalidLineCount(lines));
        }

        if lines == 0 {
            self.combo = -1;
            self.back_to_back = false;
            return Ok(0);
        }

        self.total_lines += lines;
        self.level = level_for(self.total_lines, self.starting_level);

        self.combo = if self.combo >= 0 { self.combo + 1 } else { 0 };

        let is_tetris = lines == 4;
        let back_to_back = is_tetris && (self.back_to_back || back_to_back_eligible);

        let line_score = line_clear_points(lines, self.level, back_to_back);
        let combo_score = if self.combo > 0 {
            combo_points(self.combo as u32, self.level)
        } else {
            0
        };

        self.score += line_score + combo_score;
        self.back_to_back = is_tetris;
        self.update_high_score();

        tracing::debug!(
            lines,
            points = line_score + combo_score,
            combo = self.combo,
            back_to_back,
            level = self.level,
            "line clear scored"
        );

        Ok(line_score + combo_score)
    }

    /// Awards points for dropping a piece `cells` rows, independent of combo state.
    pub fn add_drop_score(&mut self, cells: u32, hard: bool) -> u32 {
        if cells == 0 {
            return 0;
        }
        let points = drop_points(cells, hard);
        self.score += points;
        self.update_high_score();
        points
    }

    /// Registers a lock that cleared no rows; breaks combo and back-to-back
    /// chains exactly like a zero-line clear.
    pub fn register_no_line_clear(&mut self) {
        self.combo = -1;
        self.back_to_back = false;
    }

    /// How many more lines must clear before the next level-up.
    pub fn lines_until_level_up(&self) -> u32 {
        LINES_PER_LEVEL - self.total_lines % LINES_PER_LEVEL
    }

    /// Hands the storage adapter back, for re-use by a fresh keeper on restart.
    pub fn take_storage(&mut self) -> Option<Box<dyn StorageAdapter>> {
        self.storage.take()
    }

    fn load_high_score(&self) -> u32 {
        let Some(storage) = &self.storage else {
            return 0;
        };
        storage
            .get(HIGH_SCORE_KEY)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }

    fn update_high_score(&mut self) {
        if self.score <= self.high_score {
            return;
        }
        self.high_score = self.score;
        if let Some(storage) = &mut self.storage {
            storage.set(HIGH_SCORE_KEY, &self.high_score.to_string());
        }
        tracing::debug!(high_score = self.high_score, "high score raised");
    }
}

impl fmt::Debug for ScoreKeeper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoreKeeper")
            .field("starting_level", &self.starting_level)
            .field("storage", &self.storage.as_ref().map(|_| "dyn StorageAdapter"))
            .field("state", &self.state())
            .finish()
    }
}
