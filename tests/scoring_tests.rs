use blockfall_engine::scoring::HIGH_SCORE_KEY;
use blockfall_engine::{MemoryStore, ScoreError, ScoreKeeper, StorageAdapter};

#[test]
fn back_to_back_tetrises_chain_with_combo() {
    let mut keeper = ScoreKeeper::new(1, None).unwrap();

    assert_eq!(keeper.add_line_clear(4).unwrap(), 800);
    let state = keeper.state();
    assert_eq!(state.combo, 0);
    assert!(state.back_to_back);

    // Second consecutive tetris: floored 1.5x bonus plus the first combo step.
    assert_eq!(keeper.add_line_clear(4).unwrap(), 1200 + 50);
    let state = keeper.state();
    assert_eq!(state.score, 2050);
    assert_eq!(state.combo, 1);
    assert!(state.back_to_back);
    assert_eq!(state.total_lines, 8);
}

#[test]
fn a_non_tetris_clear_keeps_the_combo_but_breaks_back_to_back() {
    let mut keeper = ScoreKeeper::new(1, None).unwrap();
    keeper.add_line_clear(4).unwrap();
    assert_eq!(keeper.add_line_clear(1).unwrap(), 100 + 50);
    let state = keeper.state();
    assert_eq!(state.combo, 1);
    assert!(!state.back_to_back);

    // The following tetris is not back-to-back anymore.
    assert_eq!(keeper.add_line_clear(4).unwrap(), 800 + 100);
}

#[test]
fn a_lock_without_clears_resets_both_chains() {
    let mut keeper = ScoreKeeper::new(1, None).unwrap();
    keeper.add_line_clear(4).unwrap();
    keeper.register_no_line_clear();
    let state = keeper.state();
    assert_eq!(state.combo, -1);
    assert!(!state.back_to_back);
    assert_eq!(keeper.add_line_clear(1).unwrap(), 100);
    assert_eq!(keeper.state().combo, 0);
}

#[test]
fn level_ups_apply_before_the_multiplication() {
    let mut keeper = ScoreKeeper::new(1, None).unwrap();
    for _ in 0..2 {
        keeper.add_line_clear(4).unwrap();
        keeper.register_no_line_clear();
    }
    assert_eq!(keeper.state().total_lines, 8);

    // This double crosses 10 total lines, so it scores at level 2 already.
    assert_eq!(keeper.add_line_clear(2).unwrap(), 300 * 2);
    assert_eq!(keeper.state().level, 2);
}

#[test]
fn invalid_line_counts_leave_state_untouched() {
    let mut keeper = ScoreKeeper::new(1, None).unwrap();
    keeper.add_line_clear(4).unwrap();
    let before = keeper.state();

    assert_eq!(keeper.add_line_clear(5), Err(ScoreError::InvalidLineCount(5)));
    assert_eq!(keeper.state(), before);
}

#[test]
fn starting_level_zero_is_rejected() {
    assert!(matches!(
        ScoreKeeper::new(0, None),
        Err(ScoreError::StartingLevelTooLow)
    ));
}

#[test]
fn high_scores_round_trip_through_shared_storage() {
    let store = MemoryStore::new();

    let mut keeper = ScoreKeeper::new(1, Some(Box::new(store.clone()))).unwrap();
    assert_eq!(keeper.state().high_score, 0);
    keeper.add_line_clear(4).unwrap();
    assert_eq!(keeper.state().high_score, 800);
    assert_eq!(store.get(HIGH_SCORE_KEY).as_deref(), Some("800"));

    // A later keeper against the same storage starts from the persisted best.
    let successor = ScoreKeeper::new(1, Some(Box::new(store.clone()))).unwrap();
    assert_eq!(successor.state().high_score, 800);
    assert_eq!(successor.state().score, 0);
}

#[test]
fn malformed_persisted_values_read_as_zero() {
    let mut store = MemoryStore::new();
    store.set(HIGH_SCORE_KEY, "not a number");
    let keeper = ScoreKeeper::new(1, Some(Box::new(store))).unwrap();
    assert_eq!(keeper.state().high_score, 0);
}
