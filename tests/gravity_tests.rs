use std::time::Duration;

use blockfall_engine::gravity::LOCK_DELAY;
use blockfall_engine::{Board, Gravity, Piece, PieceKind, Rotation};

const MS: fn(u64) -> Duration = Duration::from_millis;

fn resting_piece(board: &Board) -> Piece {
    // T lying on the floor: lowest minos on row 21.
    let piece = Piece {
        kind: PieceKind::T,
        rotation: Rotation::R0,
        position: (3, 20),
    };
    assert!(piece.fits(board));
    piece
}

#[test]
fn whole_intervals_descend_and_the_remainder_carries() {
    let mut board = Board::standard();
    let mut piece = Piece::spawn(PieceKind::T);
    let mut gravity = Gravity::new(10).unwrap();
    assert_eq!(gravity.current_fall_interval(), MS(100));
    gravity.set_piece(&piece, &board);

    let outcome = gravity.update(&mut piece, &mut board, MS(250));
    assert_eq!(outcome.rows_fallen, 2);
    assert!(!outcome.locked);

    // The 50ms remainder plus 50ms covers one more interval.
    let outcome = gravity.update(&mut piece, &mut board, MS(50));
    assert_eq!(outcome.rows_fallen, 1);
}

#[test]
fn a_blocked_descent_forfeits_accumulated_time() {
    let mut board = Board::standard();
    // One row above the floor, so the second interval's descent is blocked.
    let mut piece = Piece {
        kind: PieceKind::T,
        rotation: Rotation::R0,
        position: (3, 19),
    };
    let mut gravity = Gravity::new(10).unwrap();
    gravity.set_piece(&piece, &board);

    let outcome = gravity.update(&mut piece, &mut board, MS(250));
    assert_eq!(outcome.rows_fallen, 1);
    assert!(gravity.is_grounded());

    // Lift the floor away: if any of the forfeited 150ms had carried, this
    // sub-interval update would fall a row.
    let mut open_board = Board::new(10, 30, 28);
    gravity.set_board(&piece, &open_board);
    let outcome = gravity.update(&mut piece, &mut open_board, MS(99));
    assert_eq!(outcome.rows_fallen, 0);
}

#[test]
fn lock_delay_counts_down_across_updates() {
    let mut board = Board::standard();
    let mut piece = resting_piece(&board);
    let mut gravity = Gravity::new(1).unwrap();
    gravity.set_piece(&piece, &board);
    assert!(gravity.is_grounded());

    assert!(!gravity.update(&mut piece, &mut board, MS(200)).locked);
    assert!(!gravity.update(&mut piece, &mut board, MS(200)).locked);
    assert_eq!(gravity.lock_timer(), MS(400));

    let outcome = gravity.update(&mut piece, &mut board, MS(200));
    assert!(outcome.locked);
    assert_eq!(outcome.locked_cells.len(), 4);
    assert!(gravity.is_locked());
    assert_eq!(board.cell((4, 21)), Some(PieceKind::T));
}

#[test]
fn player_actions_rearm_lock_delay_up_to_the_cap() {
    let mut board = Board::standard();
    let mut piece = resting_piece(&board);
    let mut gravity = Gravity::new(1).unwrap();
    gravity.set_piece(&piece, &board);

    for _ in 0..15 {
        assert!(!gravity.update(&mut piece, &mut board, MS(300)).locked);
        gravity.notify_action(&piece, &board);
        assert_eq!(gravity.lock_timer(), Duration::ZERO);
    }
    assert_eq!(gravity.lock_resets(), 15);

    // Past the cap the running timer survives further actions.
    gravity.update(&mut piece, &mut board, MS(300));
    gravity.notify_action(&piece, &board);
    assert_eq!(gravity.lock_timer(), MS(300));

    assert!(gravity.update(&mut piece, &mut board, MS(200)).locked);
}

#[test]
fn force_lock_commits_immediately() {
    let mut board = Board::standard();
    let piece = resting_piece(&board);
    let mut gravity = Gravity::new(1).unwrap();
    gravity.set_piece(&piece, &board);

    let cells = gravity.force_lock(&piece, &mut board);
    assert_eq!(cells.len(), 4);
    assert!(gravity.is_locked());
    // A second force lock is a no-op.
    assert!(gravity.force_lock(&piece, &mut board).is_empty());
}

#[test]
fn a_replaced_board_keeps_the_running_lock_timer() {
    let mut board = Board::standard();
    let mut piece = resting_piece(&board);
    let mut gravity = Gravity::new(1).unwrap();
    gravity.set_piece(&piece, &board);

    gravity.update(&mut piece, &mut board, MS(300));
    assert_eq!(gravity.lock_timer(), MS(300));

    let mut replacement = board.clone();
    gravity.set_board(&piece, &replacement);
    assert_eq!(gravity.lock_timer(), MS(300));
    assert!(gravity.update(&mut piece, &mut replacement, MS(250)).locked);
}

#[test]
fn a_fresh_piece_resets_all_timing() {
    let mut board = Board::standard();
    let mut piece = resting_piece(&board);
    let mut gravity = Gravity::new(1).unwrap();
    gravity.set_piece(&piece, &board);
    gravity.update(&mut piece, &mut board, MS(499));
    assert!(gravity.lock_timer() > Duration::ZERO);

    let next = Piece::spawn(PieceKind::L);
    gravity.set_piece(&next, &board);
    assert_eq!(gravity.lock_timer(), Duration::ZERO);
    assert_eq!(gravity.lock_resets(), 0);
    assert!(!gravity.is_grounded());
    assert!(!gravity.is_locked());
}

#[test]
fn lock_delay_constant_matches_the_guideline_half_second() {
    assert_eq!(LOCK_DELAY, MS(500));
}
