//! Implements [Monte Carlo Tree Search] (MCTS) with UCB1 selection and
//! uniformly random rollouts.
//!
//! Every iteration runs the classic cycle over the [`Tree`]:
//!
//! 1. Selection and expansion: walk down from the root by the upper
//!    confidence bound until a node with an unexpanded move is found, then
//!    create that child.
//! 2. Simulation: play random moves from the new node until the game ends.
//! 3. Backpropagation: update visits and rewards on the path back to the root,
//!    flipping the sign at every ply.
//!
//! After the iteration budget is spent, the most visited root child is
//! played. The tree is built from scratch for every move.
//!
//! [Monte Carlo Tree Search]: https://en.wikipedia.org/wiki/Monte_Carlo_tree_search

use std::time::Instant;

use rand::Rng;

use crate::game::{Board, Column, Player};

pub mod tree;

pub use tree::{Node, NodeId, Reward, Tree};

/// Parameters for MCTS search algorithm.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mcts {
    /// Number of select/simulate/backpropagate cycles per move.
    iterations: u32,
    /// Exploration constant `c` of the upper confidence bound.
    exploration: f64,
}

impl Mcts {
    /// `sqrt(2)`, the textbook UCB1 exploration constant for rewards in
    /// `[-1, 1]`.
    pub const DEFAULT_EXPLORATION: f64 = std::f64::consts::SQRT_2;

    /// Creates the search with the default exploration constant.
    #[must_use]
    pub const fn new(iterations: u32) -> Self {
        Self {
            iterations,
            exploration: Self::DEFAULT_EXPLORATION,
        }
    }

    /// Overrides the exploration constant.
    #[must_use]
    pub const fn with_exploration(self, exploration: f64) -> Self {
        Self {
            exploration,
            ..self
        }
    }

    /// Number of iterations per move.
    #[must_use]
    pub const fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Runs the full iteration budget and returns the resulting tree.
    pub fn build_tree<R: Rng + ?Sized>(&self, board: &Board, player: Player, rng: &mut R) -> Tree {
        let mut tree = Tree::new(*board, player);
        for _ in 0..self.iterations {
            let node = tree.select(self.exploration);
            let reward = tree.simulate(node, rng);
            tree.backpropagate(node, reward);
        }
        tree
    }

    /// Picks the move for `player` on `board`: the most visited root child.
    ///
    /// # Panics
    ///
    /// Panics if the board is full.
    pub fn search<R: Rng + ?Sized>(&self, board: &Board, player: Player, rng: &mut R) -> Column {
        let moves = board.valid_moves();
        assert!(!moves.is_empty(), "no valid moves on a full board");

        let start = Instant::now();
        let tree = self.build_tree(board, player, rng);
        if log::log_enabled!(log::Level::Trace) {
            let root = tree.root();
            for &(column, child) in root.children() {
                if let Some(child) = child {
                    let child = tree.get(child);
                    log::trace!(
                        "mcts child {column}: visits {} reward {} ucb {:.3}",
                        child.visits(),
                        child.reward(),
                        child.upper_bound(root.visits(), self.exploration)
                    );
                } else {
                    log::trace!("mcts child {column}: not expanded");
                }
            }
        }
        let best_move = tree.most_visited().unwrap_or(moves[0]);
        log::debug!(
            "mcts player {player} iterations {}: bestmove {best_move} nodes {} in {:?}",
            self.iterations(),
            tree.len(),
            start.elapsed()
        );
        best_move
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::game::COLUMNS;

    #[test]
    fn visits_sum_to_iterations() {
        let mut rng = StdRng::seed_from_u64(3);
        for iterations in [1, 7, 50, 500] {
            let tree = Mcts::new(iterations).build_tree(&Board::empty(), Player::One, &mut rng);
            let total: u32 = tree
                .root()
                .children()
                .iter()
                .filter_map(|&(_, child)| child)
                .map(|child| tree.get(child).visits())
                .sum();
            assert_eq!(total, iterations);
            assert_eq!(tree.root().visits(), iterations);
        }
    }

    #[test]
    fn every_child_is_visited_before_revisits() {
        let mut rng = StdRng::seed_from_u64(11);
        let tree = Mcts::new(COLUMNS as u32).build_tree(&Board::empty(), Player::One, &mut rng);
        for &(_, child) in tree.root().children() {
            assert_eq!(child.map(|child| tree.get(child).visits()), Some(1));
        }
    }

    #[test]
    fn exploration_constant_drives_selection() {
        let greedy = Mcts::new(COLUMNS as u32 + 1).with_exploration(0.0);
        assert_eq!(greedy.iterations(), COLUMNS as u32 + 1);

        // First full expansion by hand, with the same random stream.
        let mut tree = Tree::new(Board::empty(), Player::One);
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..COLUMNS {
            let id = tree.select(0.0);
            let reward = tree.simulate(id, &mut rng);
            tree.backpropagate(id, reward);
        }
        // Every child has one visit: without exploration the highest reward
        // wins, first one on ties.
        let mut greediest: Option<(NodeId, Reward)> = None;
        for &(_, child) in tree.root().children() {
            let child = child.unwrap();
            let reward = tree.get(child).reward();
            if greediest.map_or(true, |(_, best)| reward > best) {
                greediest = Some((child, reward));
            }
        }
        let (greediest, _) = greediest.unwrap();
        let next = tree.select(0.0);
        assert_eq!(tree.get(next).parent(), Some(greediest));

        let built = greedy.build_tree(&Board::empty(), Player::One, &mut StdRng::seed_from_u64(21));
        assert_eq!(built.get(greediest).visits(), 2);
        assert_eq!(built.root().visits(), COLUMNS as u32 + 1);
    }

    #[test]
    fn takes_immediate_win() {
        let board = Board::try_from("0000000/0000000/0000000/1000000/1200000/1220000").unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(Mcts::new(2000).search(&board, Player::One, &mut rng), 0);
    }

    #[test]
    fn blocks_immediate_loss() {
        let board = Board::try_from("0000000/0000000/0000000/2000000/1100000/1222001").unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(Mcts::new(3000).search(&board, Player::One, &mut rng), 4);
    }

    #[test]
    fn deterministic_with_seed() {
        let board = Board::try_from("0000000/0000000/0000000/0012000/0021100/0121200").unwrap();
        let search = Mcts::new(300);
        let first = search.search(&board, Player::Two, &mut StdRng::seed_from_u64(17));
        let second = search.search(&board, Player::Two, &mut StdRng::seed_from_u64(17));
        assert_eq!(first, second);
    }
}
