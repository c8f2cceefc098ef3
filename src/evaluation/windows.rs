//! Counts the four-cell windows each player can still complete.
//!
//! A window is open for a player as long as the opponent has no token in it,
//! regardless of how many of the player's own tokens are already there. The
//! difference between the two counts is the leaf heuristic of the searches.

use crate::evaluation::Value;
use crate::game::core::WINDOWS;
use crate::game::{Board, Player};

/// Number of windows without any of the opponent's tokens.
#[must_use]
pub fn open_windows(board: &Board, player: Player) -> Value {
    let open = WINDOWS
        .iter()
        .filter(|window| board.free_of(window, !player))
        .count();
    Value::try_from(open).unwrap_or(Value::MAX)
}
