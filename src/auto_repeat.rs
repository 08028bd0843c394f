/*!
This module handles press-and-hold auto-repeat (DAS/ARR) for movement intents.
*/

use std::time::Duration;

/// Initial delay before a held intent starts auto-repeating.
pub const DAS_DEFAULT: Duration = Duration::from_millis(170);
/// Interval between auto-repeats once they have started.
pub const ARR_DEFAULT: Duration = Duration::from_millis(70);

#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
enum Phase {
    Idle,
    Armed { elapsed: Duration },
    Repeating { since_last: Duration },
}

/// An explicit repeat-controller for one held intent (e.g. move-left).
///
/// Hosts own one controller per repeatable intent and drive it from the same
/// tick source as the simulation, so repeat timing is deterministic and
/// testable without wall-clock waits. The held intent fires once on press,
/// again after the initial delay plus one repeat interval, then at the
/// repeat rate.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AutoRepeat {
    das: Duration,
    arr: Duration,
    phase: Phase,
}

impl AutoRepeat {
    /// Creates a controller with custom delay and repeat rate.
    ///
    /// The repeat rate is clamped to at least one millisecond so a tick can
    /// never owe an unbounded number of repeats.
    pub fn new(das: Duration, arr: Duration) -> Self {
        Self {
            das,
            arr: arr.max(Duration::from_millis(1)),
            phase: Phase::Idle,
        }
    }

    /// Registers the intent being pressed down.
    ///
    /// Re-arms from scratch if already held. Returns `true`: the intent
    /// always fires once immediately on press.
    pub fn press(&mut self) -> bool {
        self.phase = Phase::Armed {
            elapsed: Duration::ZERO,
        };
        true
    }

    /// Registers the intent being released; immediate and idempotent.
    pub fn release(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Whether the intent is currently held.
    pub const fn is_held(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// Advances repeat timing by `delta`, returning how many times the held
    /// intent fires during this tick.
    pub fn tick(&mut self, delta: Duration) -> u32 {
        match self.phase {
            Phase::Idle => 0,
            Phase::Armed { elapsed } => {
                let elapsed = elapsed + delta;
                if elapsed < self.das {
                    self.phase = Phase::Armed { elapsed };
                    return 0;
                }
                self.drain_repeats(elapsed - self.das)
            }
            Phase::Repeating { since_last } => self.drain_repeats(since_last + delta),
        }
    }

    fn drain_repeats(&mut self, mut since_last: Duration) -> u32 {
        let mut fires = 0;
        while since_last >= self.arr {
            since_last -= self.arr;
            fires += 1;
        }
        self.phase = Phase::Repeating { since_last };
        fires
    }
}

impl Default for AutoRepeat {
    fn default() -> Self {
        Self::new(DAS_DEFAULT, ARR_DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_fires_once_then_waits_out_the_initial_delay() {
        let mut repeat = AutoRepeat::default();
        assert!(repeat.press());
        assert_eq!(repeat.tick(Duration::from_millis(100)), 0);
        assert_eq!(repeat.tick(Duration::from_millis(69)), 0);
        // 170ms DAS + 70ms ARR crossed at 240ms held.
        assert_eq!(repeat.tick(Duration::from_millis(71)), 1);
    }

    #[test]
    fn release_is_idempotent() {
        let mut repeat = AutoRepeat::default();
        repeat.press();
        repeat.release();
        repeat.release();
        assert!(!repeat.is_held());
        assert_eq!(repeat.tick(Duration::from_secs(10)), 0);
    }
}
