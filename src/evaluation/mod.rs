//! This module implements "static" evaluation, i.e. predicting the value of
//! a position without [`crate::search`].
//!
//! Values are always expressed from player one's point of view: player one
//! maximizes, player two minimizes. Realized wins are [`WIN`] and [`LOSS`],
//! a full board without alignments is [`DRAW`] and everything in between
//! comes from the heuristic.

use crate::game::{Board, Player};

pub(crate) mod windows;

pub use windows::open_windows;

/// Search value. Bounded by `[LOSS, WIN]`.
pub type Value = i32;

/// Player one has won.
pub const WIN: Value = 300;
/// Player two has won.
pub const LOSS: Value = -WIN;
/// Drawn terminal position.
pub const DRAW: Value = 0;

/// Terminal value of a realized win for `player`.
#[must_use]
pub const fn win_for(player: Player) -> Value {
    match player {
        Player::One => WIN,
        Player::Two => LOSS,
    }
}

/// Returns `true` if `player` prefers higher values.
#[must_use]
pub const fn is_maximizer(player: Player) -> bool {
    matches!(player, Player::One)
}

/// Scores the position: [`WIN`] or [`LOSS`] if somebody already has four in a
/// row, otherwise the difference of windows still open to each player.
#[must_use]
pub fn evaluate(board: &Board) -> Value {
    if board.is_winning(Player::One) {
        return WIN;
    }
    if board.is_winning(Player::Two) {
        return LOSS;
    }
    open_windows(board, Player::One) - open_windows(board, Player::Two)
}
