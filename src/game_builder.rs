/*!
This module provides [`GameBuilder`], a builder to configure and initialize a
[`Game`](crate::Game).
*/

use crate::game::{Game, DEFAULT_PREVIEW_COUNT};
use crate::scoring::{ScoreError, StorageAdapter};

/// Compact representation of all the configuration of a
/// yet-to-be-started game.
///
/// ```
/// use blockfall_engine::GameBuilder;
///
/// let game = GameBuilder::new()
///     .starting_level(5)
///     .seed(42)
///     .build()
///     .expect("level 5 is valid");
/// assert_eq!(game.score().level, 5);
/// ```
pub struct GameBuilder {
    starting_level: u32,
    seed: Option<u64>,
    preview_count: usize,
    storage: Option<Box<dyn StorageAdapter>>,
}

impl std::fmt::Debug for GameBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameBuilder")
            .field("starting_level", &self.starting_level)
            .field("seed", &self.seed)
            .field("preview_count", &self.preview_count)
            .field("storage", &self.storage.as_ref().map(|_| "dyn StorageAdapter"))
            .finish()
    }
}

impl GameBuilder {
    /// Creates a builder with the default configuration: level 1, an entropy
    /// seed, a five-piece preview and no high-score storage.
    pub fn new() -> Self {
        Self {
            starting_level: 1,
            seed: None,
            preview_count: DEFAULT_PREVIEW_COUNT,
            storage: None,
        }
    }

    /// The level the round starts at; must be at least 1.
    pub fn starting_level(mut self, starting_level: u32) -> Self {
        self.starting_level = starting_level;
        self
    }

    /// Fixes the randomizer seed; rounds built from the same seed produce the
    /// same piece sequence. Unset, a fresh entropy seed is drawn per build.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// How many upcoming pieces the next-queue exposes.
    pub fn preview_count(mut self, preview_count: usize) -> Self {
        self.preview_count = preview_count;
        self
    }

    /// Supplies a storage adapter for high-score persistence.
    pub fn storage(mut self, storage: Box<dyn StorageAdapter>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Initializes a [`Game`] in the `Menu` status with its first piece spawned.
    ///
    /// An obstructed first spawn is a `GameOver` game, not an error.
    ///
    /// # Errors
    /// Fails with [`ScoreError::StartingLevelTooLow`] for starting levels below 1.
    pub fn build(self) -> Result<Game, ScoreError> {
        let seed = self.seed.unwrap_or_else(rand::random);
        Game::initialize(self.starting_level, seed, self.preview_count, self.storage)
    }
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self::new()
    }
}
