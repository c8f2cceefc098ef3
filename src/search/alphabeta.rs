//! Depth-limited [Minimax] with [Alpha-Beta pruning].
//!
//! The roles are fixed: player one maximizes and player two minimizes no
//! matter which of them runs the search. Moves are tried in ascending column
//! order, and at the root the first move that strictly improves the running
//! best value is kept, so pruning never changes the chosen move compared to
//! [`crate::search::minimax`].
//!
//! [Minimax]: https://en.wikipedia.org/wiki/Minimax
//! [Alpha-Beta pruning]: https://en.wikipedia.org/wiki/Alpha%E2%80%93beta_pruning

use std::time::Instant;

use crate::evaluation::{evaluate, is_maximizer, win_for, Value, DRAW};
use crate::game::{Board, Column, Player};
use crate::search::{Depth, SearchResult, INFINITY};

/// Running bounds threaded through the recursion: the maximizer is already
/// guaranteed `alpha` and the minimizer is already guaranteed `beta`.
#[derive(Clone, Copy, Debug)]
struct Window {
    alpha: Value,
    beta: Value,
}

impl Window {
    const FULL: Self = Self {
        alpha: -INFINITY,
        beta: INFINITY,
    };

    fn tighten(&mut self, player: Player, value: Value) {
        if is_maximizer(player) {
            self.alpha = self.alpha.max(value);
        } else {
            self.beta = self.beta.min(value);
        }
    }
}

struct AlphaBeta {
    depth_limit: Depth,
    nodes: u64,
}

impl AlphaBeta {
    fn value(&mut self, board: &Board, to_move: Player, depth: Depth, window: Window) -> Value {
        self.nodes += 1;
        if let Some(winner) = board.winner() {
            return win_for(winner);
        }
        let moves = board.valid_moves();
        if moves.is_empty() {
            return DRAW;
        }
        if depth >= self.depth_limit {
            return evaluate(board);
        }

        let maximize = is_maximizer(to_move);
        let mut window = window;
        let mut best = if maximize { -INFINITY } else { INFINITY };
        for column in moves {
            let value = self.value(
                &board.after_move(column, to_move),
                !to_move,
                depth + 1,
                window,
            );
            if improves(to_move, value, best) {
                best = value;
                window.tighten(to_move, value);
            }
            // The other side already has a better option elsewhere.
            if (maximize && best > window.beta) || (!maximize && best < window.alpha) {
                break;
            }
        }
        best
    }
}

/// Returns `true` if `value` is strictly better than `best` for `player`.
pub(crate) fn improves(player: Player, value: Value, best: Value) -> bool {
    if is_maximizer(player) {
        value > best
    } else {
        value < best
    }
}

/// Searches `depth_limit` plies ahead and returns the best move for `player`
/// together with its value.
///
/// # Panics
///
/// The board must have at least one valid move: callers are expected to check
/// for the end of the game before asking for a move.
#[must_use]
pub fn alpha_beta(board: &Board, player: Player, depth_limit: Depth) -> SearchResult {
    let moves = board.valid_moves();
    assert!(!moves.is_empty(), "no valid moves on a full board");

    let start = Instant::now();
    let mut search = AlphaBeta {
        depth_limit,
        nodes: 0,
    };
    let mut window = Window::FULL;
    let mut best_move = moves[0];
    let mut best = if is_maximizer(player) {
        -INFINITY
    } else {
        INFINITY
    };
    for column in moves {
        let value = search.value(&board.after_move(column, player), !player, 1, window);
        if improves(player, value, best) {
            best = value;
            best_move = column;
            window.tighten(player, value);
        }
    }

    let result = SearchResult {
        best_move,
        value: best,
        nodes: search.nodes,
        elapsed: start.elapsed(),
    };
    log::debug!(
        "alpha-beta player {player} depth {depth_limit}: {result} in {:?}",
        result.elapsed
    );
    result
}

/// Shorthand for [`alpha_beta`] when only the move matters.
#[must_use]
pub fn alpha_beta_move(board: &Board, player: Player, depth_limit: Depth) -> Column {
    alpha_beta(board, player, depth_limit).best_move
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::evaluation::{LOSS, WIN};
    use crate::search::minimax;

    const MIDGAME: [&str; 4] = [
        "0000000/0000000/0000000/0012000/0021100/0121200",
        "0000000/0000000/0002000/0001000/0012200/1221100",
        "0000000/0000000/0000000/0000000/0001000/0002100",
        "0000000/0100000/0200000/0110200/2221100/1212120",
    ];

    #[test]
    fn immediate_win_for_player_one() {
        let board = Board::try_from("0000000/0000000/0000000/1000000/1200000/1220000").unwrap();
        for depth in 1..=4 {
            let result = alpha_beta(&board, Player::One, depth);
            assert_eq!(result.best_move, 0);
            assert_eq!(result.value, WIN);
        }
    }

    #[test]
    fn immediate_win_for_player_two() {
        let board = Board::try_from("0000000/0000000/0000000/0000000/1100000/1222001").unwrap();
        for depth in 1..=4 {
            let result = alpha_beta(&board, Player::Two, depth);
            assert_eq!(result.best_move, 4, "depth {depth}");
            assert_eq!(result.value, LOSS);
        }
    }

    #[test]
    fn blocks_immediate_threat() {
        // Player two threatens to complete the bottom row in column 4.
        let board = Board::try_from("0000000/0000000/0000000/0000000/1100000/1222001").unwrap();
        let mut reply = board;
        assert!(reply.apply_move(0, Player::Two).is_ok());
        assert_eq!(alpha_beta_move(&reply, Player::One, 2), 4);
    }

    #[test]
    fn pruning_does_not_change_the_decision() {
        for input in MIDGAME {
            let board = Board::try_from(input).unwrap();
            for player in [Player::One, Player::Two] {
                for depth in 1..=4 {
                    let pruned = alpha_beta(&board, player, depth);
                    let full = minimax(&board, player, depth);
                    assert_eq!(
                        (pruned.best_move, pruned.value),
                        (full.best_move, full.value),
                        "{input} player {player} depth {depth}"
                    );
                    assert!(pruned.nodes <= full.nodes);
                }
            }
        }
    }

    #[test]
    fn pruning_visits_fewer_nodes() {
        let board = Board::try_from(MIDGAME[2]).unwrap();
        assert!(alpha_beta(&board, Player::One, 4).nodes < minimax(&board, Player::One, 4).nodes);
    }

    #[test]
    fn reports_elapsed_time() {
        let board = Board::try_from(MIDGAME[0]).unwrap();
        let start = Instant::now();
        let result = alpha_beta(&board, Player::One, 3);
        assert!(result.elapsed <= start.elapsed());
    }

    #[test]
    fn only_valid_moves() {
        let board = Board::try_from("1000000/2000000/1000000/2000000/1000000/2000000").unwrap();
        assert_ne!(alpha_beta_move(&board, Player::One, 3), 0);
    }

    #[test]
    #[should_panic(expected = "no valid moves")]
    fn full_board() {
        let board = Board::try_from("1212121/1212121/2121212/2121212/1212121/1212121").unwrap();
        let _ = alpha_beta(&board, Player::One, 1);
    }
}
