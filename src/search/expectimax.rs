//! Depth-limited [Expectimax] against an opponent that picks any valid column
//! with equal probability.
//!
//! The searching agent plays the same fixed-role minimax as
//! [`crate::search::alpha_beta`] on its own turns. On the opponent's turns the
//! value is the average over all replies. A chance node stops early once even
//! the agent's best case for the unexplored replies can not beat what the
//! agent already has elsewhere: the remaining replies are then filled in with
//! the agent's worst case (the opponent's win) before averaging. The result is
//! not the exact expectation of such a node, but it is always on the same side
//! of the agent's running best, so the decision is unaffected.
//!
//! [Expectimax]: https://en.wikipedia.org/wiki/Expectiminimax

use std::time::Instant;

use crate::evaluation::{evaluate, is_maximizer, win_for, DRAW};
use crate::game::{Board, Column, Player};
use crate::search::{Depth, SearchResult, INFINITY};

/// Expected values are fractional because of the averaging.
pub type ExpectedValue = f64;

struct Expectimax {
    agent: Player,
    depth_limit: Depth,
    nodes: u64,
}

impl Expectimax {
    /// `cutoff` is the agent's running best in the parent node, if any.
    fn value(
        &mut self,
        board: &Board,
        to_move: Player,
        depth: Depth,
        cutoff: Option<ExpectedValue>,
    ) -> ExpectedValue {
        self.nodes += 1;
        if board.is_winning(to_move) {
            return win_for(to_move).into();
        }
        if board.is_winning(!to_move) {
            return win_for(!to_move).into();
        }
        let moves = board.valid_moves();
        if moves.is_empty() {
            return DRAW.into();
        }
        if depth >= self.depth_limit {
            return evaluate(board).into();
        }

        if to_move == self.agent {
            let mut best = worst_start(to_move);
            for column in moves {
                let value = self.value(
                    &board.after_move(column, to_move),
                    !to_move,
                    depth + 1,
                    finite(best),
                );
                if improves(to_move, value, best) {
                    best = value;
                }
            }
            return best;
        }

        let count = moves.len() as ExpectedValue;
        let best_case: ExpectedValue = win_for(self.agent).into();
        let worst_case: ExpectedValue = win_for(to_move).into();
        let mut sum = 0.0;
        for (explored, &column) in moves.iter().enumerate() {
            sum += self.value(&board.after_move(column, to_move), !to_move, depth + 1, None);
            let remaining = (moves.len() - explored - 1) as ExpectedValue;
            if let Some(cutoff) = cutoff {
                let optimistic = remaining.mul_add(best_case, sum) / count;
                if remaining > 0.0 && !improves(self.agent, optimistic, cutoff) {
                    return remaining.mul_add(worst_case, sum) / count;
                }
            }
        }
        sum / count
    }
}

fn worst_start(player: Player) -> ExpectedValue {
    if is_maximizer(player) {
        ExpectedValue::from(-INFINITY)
    } else {
        ExpectedValue::from(INFINITY)
    }
}

fn finite(value: ExpectedValue) -> Option<ExpectedValue> {
    (value.abs() < ExpectedValue::from(INFINITY)).then_some(value)
}

fn improves(player: Player, value: ExpectedValue, best: ExpectedValue) -> bool {
    if is_maximizer(player) {
        value > best
    } else {
        value < best
    }
}

/// Searches `depth_limit` plies ahead assuming the opponent of `player` moves
/// uniformly at random.
///
/// # Panics
///
/// Panics if the board is full.
#[must_use]
pub fn expectimax(
    board: &Board,
    player: Player,
    depth_limit: Depth,
) -> SearchResult<ExpectedValue> {
    let moves = board.valid_moves();
    assert!(!moves.is_empty(), "no valid moves on a full board");

    let start = Instant::now();
    let mut search = Expectimax {
        agent: player,
        depth_limit,
        nodes: 0,
    };
    let mut best_move = moves[0];
    let mut best = worst_start(player);
    for column in moves {
        let value = search.value(
            &board.after_move(column, player),
            !player,
            1,
            finite(best),
        );
        if improves(player, value, best) {
            best = value;
            best_move = column;
        }
    }

    let result = SearchResult {
        best_move,
        value: best,
        nodes: search.nodes,
        elapsed: start.elapsed(),
    };
    log::debug!(
        "expectimax player {player} depth {depth_limit}: {result} in {:?}",
        result.elapsed
    );
    result
}

/// Shorthand for [`expectimax`] when only the move matters.
#[must_use]
pub fn expectimax_move(board: &Board, player: Player, depth_limit: Depth) -> Column {
    expectimax(board, player, depth_limit).best_move
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{LOSS, WIN};
    use crate::search::minimax;

    /// Exact expectimax without any cutoffs.
    fn exact(board: &Board, agent: Player, to_move: Player, depth: Depth, limit: Depth) -> f64 {
        if let Some(winner) = board.winner() {
            return win_for(winner).into();
        }
        let moves = board.valid_moves();
        if moves.is_empty() {
            return 0.0;
        }
        if depth >= limit {
            return evaluate(board).into();
        }
        let values = moves.iter().map(|&column| {
            exact(
                &board.after_move(column, to_move),
                agent,
                !to_move,
                depth + 1,
                limit,
            )
        });
        if to_move != agent {
            return values.sum::<f64>() / moves.len() as f64;
        }
        values.fold(worst_start(agent), |best, value| {
            if improves(agent, value, best) {
                value
            } else {
                best
            }
        })
    }

    #[test]
    fn immediate_win() {
        let board = Board::try_from("0000000/0000000/0000000/1000000/1200000/1220000").unwrap();
        for depth in 1..=3 {
            let result = expectimax(&board, Player::One, depth);
            assert_eq!(result.best_move, 0);
            assert!((result.value - f64::from(WIN)).abs() < f64::EPSILON);
        }
        let board = Board::try_from("0000000/0000000/0000000/0000000/1100000/1222001").unwrap();
        let result = expectimax(&board, Player::Two, 2);
        assert_eq!(result.best_move, 4);
        assert!((result.value - f64::from(LOSS)).abs() < f64::EPSILON);
    }

    #[test]
    fn averages_random_replies() {
        // Player one can not win in one move: at depth 2 the value of each
        // move is the mean of the evaluations after each random reply.
        let board = Board::empty();
        let result = expectimax(&board, Player::One, 2);
        let expected = exact(&board, Player::One, Player::One, 0, 2);
        assert!((result.value - expected).abs() < 1e-9);
    }

    #[test]
    fn cutoffs_keep_the_decision() {
        for input in [
            "0000000/0000000/0000000/0012000/0021100/0121200",
            "0000000/0000000/0002000/0001000/0012200/1221100",
            "0000000/0100000/0200000/0110200/2221100/1212120",
        ] {
            let board = Board::try_from(input).unwrap();
            for player in [Player::One, Player::Two] {
                for depth in 1..=4 {
                    let root = board.valid_moves().into_iter().map(|column| {
                        exact(&board.after_move(column, player), player, !player, 1, depth)
                    });
                    let mut best_move = None;
                    let mut best = worst_start(player);
                    for (column, value) in board.valid_moves().into_iter().zip(root) {
                        if improves(player, value, best) {
                            best = value;
                            best_move = Some(column);
                        }
                    }
                    let result = expectimax(&board, player, depth);
                    assert_eq!(Some(result.best_move), best_move, "{input} {player} {depth}");
                    assert!((result.value - best).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn chance_node_fills_cut_replies_with_opponent_wins() {
        // Player one took the center, player two replies at random.
        let board = Board::try_from("0000000/0000000/0000000/0000000/0000000/0001000").unwrap();
        let mut search = Expectimax {
            agent: Player::One,
            depth_limit: 2,
            nodes: 0,
        };
        let average = exact(&board, Player::One, Player::Two, 1, 2);

        assert!((search.value(&board, Player::Two, 1, None) - average).abs() < 1e-9);
        assert_eq!(search.nodes, 1 + 7);

        // Every reply beats this cutoff, so nothing is cut.
        search.nodes = 0;
        assert!((search.value(&board, Player::Two, 1, Some(-299.0)) - average).abs() < 1e-9);
        assert_eq!(search.nodes, 1 + 7);

        // Nothing can beat this one: the node stops after the first reply and
        // counts the other six as wins for player two.
        search.nodes = 0;
        let first_reply = f64::from(evaluate(&board.after_move(0, Player::Two)));
        let expected = 6.0_f64.mul_add(f64::from(win_for(Player::Two)), first_reply) / 7.0;
        let value = search.value(&board, Player::Two, 1, Some(299.0));
        assert!((value - expected).abs() < 1e-9, "{value} != {expected}");
        assert_eq!(search.nodes, 1 + 1);
    }

    #[test]
    fn cutoffs_visit_fewer_nodes() {
        // Column 0 wins at once, so every later move is cut off after its first
        // random reply.
        let board = Board::try_from("0000000/0000000/0000000/1000000/1200000/1220000").unwrap();
        let start = Instant::now();
        let result = expectimax(&board, Player::One, 2);
        assert!(result.elapsed <= start.elapsed());
        assert_eq!(result.best_move, 0);
        assert_eq!(result.nodes, 1 + 6 * 2);
        assert_eq!(minimax(&board, Player::One, 2).nodes, 1 + 6 * 8);
        for depth in 3..=4 {
            assert!(
                expectimax(&board, Player::One, depth).nodes
                    < minimax(&board, Player::One, depth).nodes
            );
        }
    }

    #[test]
    fn answers_threat_with_valid_move() {
        // Player two threatens column 4.
        let board = Board::try_from("0000000/0000000/0000000/0000000/1100000/1222001").unwrap();
        let mut after = board;
        assert!(after.apply_move(0, Player::Two).is_ok());
        let column = expectimax_move(&after, Player::One, 3);
        assert!(after.is_valid_move(column));
    }
}
