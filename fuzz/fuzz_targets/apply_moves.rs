#![no_main]
use dropfour::game::{Board, COLUMNS, ROWS};
use itertools::Itertools;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

// Every byte is a column: columns must always stay contiguous stacks and
// rejected moves must leave the board untouched.
fuzz_target!(|data: &[u8]| {
    let mut board = Board::empty();
    for &byte in data {
        let column = usize::from(byte) % (COLUMNS + 1);
        let player = board.side_to_move();
        let before = board;
        match board.apply_move(column, player) {
            Ok(row) => {
                assert_eq!(board.at(row, column), Some(player));
                assert!(row == ROWS - 1 || before.at(row + 1, column).is_some());
            },
            Err(_) => assert_eq!(board, before),
        }
        for column in 0..COLUMNS {
            let stack = (0..ROWS).map(|row| board.at(row, column).is_some());
            assert!(stack.tuple_windows().all(|(above, below)| !above || below));
        }
        assert_eq!(board.valid_moves().len(), (0..COLUMNS).filter(|&c| board.is_valid_move(c)).count());
    }
});
