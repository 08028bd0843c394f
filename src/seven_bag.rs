/*!
This module handles random generation of [`PieceKind`]s via the standard 7-bag.
*/

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand_chacha::rand_core::SeedableRng;

use crate::piece::PieceKind;
use crate::GameRng;

/// Standard 'bag' piece generator.
///
/// Each bag is an in-place Fisher–Yates permutation of the seven kinds, so any
/// window of seven consecutive draws from one bag contains every kind exactly
/// once. At least two bags are materialized at all times, so lookahead peeks
/// spanning a bag boundary never have to generate mid-peek.
///
/// The generator is seeded; constructing two instances from the same seed
/// yields identical sequences, which is how deterministic tests are written.
#[derive(Eq, PartialEq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SevenBag {
    rng: GameRng,
    bags: VecDeque<[PieceKind; 7]>,
    cursor: usize,
}

impl SevenBag {
    /// The number of pieces per bag.
    pub const BAG_SIZE: usize = 7;

    /// Creates a generator from a PRNG seed, with two bags pre-generated.
    pub fn new(seed: u64) -> Self {
        let mut bag = Self {
            rng: GameRng::seed_from_u64(seed),
            bags: VecDeque::new(),
            cursor: 0,
        };
        bag.ensure_bags(2);
        bag
    }

    /// Consumes and returns the next piece kind in sequence.
    pub fn next_piece(&mut self) -> PieceKind {
        // INVARIANT: two bags exist and the cursor points into the head bag.
        let kind = self.bags[0][self.cursor];
        self.cursor += 1;
        if self.cursor >= Self::BAG_SIZE {
            self.bags.pop_front();
            self.cursor = 0;
            self.ensure_bags(2);
        }
        kind
    }

    /// Returns the next `count` piece kinds without consuming them.
    ///
    /// Peeking may materialize further bags ahead of time but never disturbs
    /// what [`SevenBag::next_piece`] subsequently returns.
    pub fn peek(&mut self, count: usize) -> Vec<PieceKind> {
        let required_bags = 2.max((self.cursor + count).div_ceil(Self::BAG_SIZE));
        self.ensure_bags(required_bags);

        let mut kinds = Vec::with_capacity(count);
        let (mut bag_idx, mut offset) = (0, self.cursor);
        for _ in 0..count {
            kinds.push(self.bags[bag_idx][offset]);
            offset += 1;
            if offset >= Self::BAG_SIZE {
                bag_idx += 1;
                offset = 0;
            }
        }
        kinds
    }

    /// Discards all pending bags and regenerates two fresh ones.
    pub fn reset(&mut self) {
        self.bags.clear();
        self.cursor = 0;
        self.ensure_bags(2);
    }

    /// How many pieces of the head bag have been handed out already.
    pub fn bag_progress(&self) -> usize {
        self.cursor
    }

    fn ensure_bags(&mut self, min_count: usize) {
        while self.bags.len() < min_count {
            let mut bag = PieceKind::VARIANTS;
            bag.shuffle(&mut self.rng);
            self.bags.push_back(bag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_bags_stay_materialized() {
        let mut bag = SevenBag::new(7);
        for _ in 0..100 {
            assert!(bag.bags.len() >= 2);
            bag.next_piece();
        }
    }

    #[test]
    fn each_bag_is_a_permutation() {
        let mut bag = SevenBag::new(123);
        for _ in 0..20 {
            let mut drawn: Vec<_> = (0..7).map(|_| bag.next_piece()).collect();
            drawn.sort();
            drawn.dedup();
            assert_eq!(drawn.len(), 7);
        }
    }
}
