//! Plain depth-limited [Minimax] without any pruning.
//!
//! This is the reference the pruned searches are checked against: it visits
//! every position within the depth limit and applies exactly the same leaf
//! values, move order and tie-breaking as [`crate::search::alpha_beta`].
//!
//! [Minimax]: https://en.wikipedia.org/wiki/Minimax

use std::time::Instant;

use crate::evaluation::{evaluate, is_maximizer, win_for, Value, DRAW};
use crate::game::{Board, Player};
use crate::search::alphabeta::improves;
use crate::search::{Depth, SearchResult, INFINITY};

fn value(board: &Board, to_move: Player, depth: Depth, limit: Depth, nodes: &mut u64) -> Value {
    *nodes += 1;
    if let Some(winner) = board.winner() {
        return win_for(winner);
    }
    let moves = board.valid_moves();
    if moves.is_empty() {
        return DRAW;
    }
    if depth >= limit {
        return evaluate(board);
    }
    let mut best = if is_maximizer(to_move) {
        -INFINITY
    } else {
        INFINITY
    };
    for column in moves {
        let value = value(
            &board.after_move(column, to_move),
            !to_move,
            depth + 1,
            limit,
            nodes,
        );
        if improves(to_move, value, best) {
            best = value;
        }
    }
    best
}

/// Searches every continuation `depth_limit` plies ahead.
///
/// # Panics
///
/// Panics if the board is full.
#[must_use]
pub fn minimax(board: &Board, player: Player, depth_limit: Depth) -> SearchResult {
    let moves = board.valid_moves();
    assert!(!moves.is_empty(), "no valid moves on a full board");

    let start = Instant::now();
    let mut nodes = 0;
    let mut best_move = moves[0];
    let mut best = if is_maximizer(player) {
        -INFINITY
    } else {
        INFINITY
    };
    for column in moves {
        let value = value(
            &board.after_move(column, player),
            !player,
            1,
            depth_limit,
            &mut nodes,
        );
        if improves(player, value, best) {
            best = value;
            best_move = column;
        }
    }
    SearchResult {
        best_move,
        value: best,
        nodes,
        elapsed: start.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::WIN;

    #[test]
    fn counts_every_node() {
        // Two plies from the empty board: 7 children, 49 grandchildren.
        assert_eq!(minimax(&Board::empty(), Player::One, 2).nodes, 7 + 49);
    }

    #[test]
    fn first_move_wins_ties() {
        // Depth 1 from the empty board: both edge columns are worth the same
        // and the center is worth most.
        let result = minimax(&Board::empty(), Player::One, 1);
        assert_eq!(result.best_move, 3);
        assert_eq!(result.value, 7);
    }

    #[test]
    fn finds_win() {
        let board = Board::try_from("0000000/0000000/0000000/0000000/2220000/1110000").unwrap();
        let result = minimax(&board, Player::One, 3);
        assert_eq!(result.best_move, 3);
        assert_eq!(result.value, WIN);
    }
}
