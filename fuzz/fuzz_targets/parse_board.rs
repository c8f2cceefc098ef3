#![no_main]
use dropfour::game::Board;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(board) = Board::try_from(input) else {
        return;
    };
    let serialized = board.to_string();
    assert_eq!(Board::try_from(serialized.as_str()).unwrap(), board);
    assert_eq!(Board::try_from(board.to_snapshot()).unwrap(), board);
});
