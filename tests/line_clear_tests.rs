use blockfall_engine::line_clear::{apply_line_clears, check_line_clears, LINE_CLEAR_DURATION};
use blockfall_engine::{Board, PieceKind};

fn fill_row(board: &mut Board, y: i32) {
    for x in 0..board.width() as i32 {
        board.fill((x, y), PieceKind::T);
    }
}

#[test]
fn stacked_clears_drop_surviving_cells_by_the_removed_count() {
    let mut board = Board::standard();
    fill_row(&mut board, 19);
    fill_row(&mut board, 20);
    fill_row(&mut board, 21);
    board.fill((5, 18), PieceKind::I);

    let check = check_line_clears(&board);
    assert_eq!(check.cleared_rows, vec![19, 20, 21]);
    assert_eq!(check.animation_duration, LINE_CLEAR_DURATION);

    let outcome = apply_line_clears(&board, &check.cleared_rows);
    assert_eq!(outcome.lines_cleared, 3);
    // The lone survivor falls three rows, onto the new floor.
    assert_eq!(outcome.board.cell((5, 21)), Some(PieceKind::I));
    assert_eq!(outcome.board.cell((5, 18)), None);
    for y in 0..21 {
        assert!(!outcome.board.row_is_full(y));
    }
}

#[test]
fn hidden_buffer_rows_are_never_reported() {
    let mut board = Board::standard();
    fill_row(&mut board, 0);
    fill_row(&mut board, 1);
    assert!(!check_line_clears(&board).has_clears());
}

#[test]
fn an_empty_row_set_still_returns_a_fresh_copy() {
    let mut board = Board::standard();
    board.fill((3, 10), PieceKind::Z);

    let outcome = apply_line_clears(&board, &[]);
    assert_eq!(outcome.lines_cleared, 0);
    assert_eq!(outcome.board, board);
}

#[test]
fn duplicate_and_unsorted_row_indices_are_normalized() {
    let mut board = Board::standard();
    fill_row(&mut board, 20);
    fill_row(&mut board, 21);

    let outcome = apply_line_clears(&board, &[21, 20, 21]);
    assert_eq!(outcome.lines_cleared, 2);
    assert_eq!(outcome.cleared_rows, vec![20, 21]);
    assert_eq!(outcome.board, Board::standard());
}
