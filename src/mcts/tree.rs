//! Arena-allocated search tree. Nodes live in a single `Vec` and refer to
//! their parent and children by [`NodeId`], so there are no ownership cycles
//! and the whole tree is dropped at once after the move is chosen.

use arrayvec::ArrayVec;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::game::{Board, Column, Player, COLUMNS};

/// Index of a node in the [`Tree`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Simulation outcome from the perspective of the player who moved into the
/// node: `1` for a win, `-1` for a loss and `0` for a draw.
pub type Reward = i64;

/// Statistics for a single position.
///
/// The reward is accumulated from the **parent's** point of view: the parent
/// uses it to pick among its children, so a win for the player to move in
/// this node counts as `-1`.
#[derive(Clone, Debug)]
pub struct Node {
    board: Board,
    player: Player,
    parent: Option<NodeId>,
    /// One slot per valid move, in ascending column order. Slots are filled
    /// lazily during expansion.
    children: ArrayVec<(Column, Option<NodeId>), COLUMNS>,
    visits: u32,
    reward: Reward,
    terminal: bool,
}

impl Node {
    fn new(board: Board, player: Player, parent: Option<NodeId>) -> Self {
        let moves = board.valid_moves();
        let terminal = moves.is_empty() || board.is_winning(player) || board.is_winning(!player);
        Self {
            board,
            player,
            parent,
            children: moves.iter().map(|&column| (column, None)).collect(),
            visits: 0,
            reward: 0,
            terminal,
        }
    }

    /// Position this node represents.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Player to move in this position.
    #[must_use]
    pub const fn player(&self) -> Player {
        self.player
    }

    /// Parent node, `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Number of simulations that went through this node.
    #[must_use]
    pub const fn visits(&self) -> u32 {
        self.visits
    }

    /// Cumulative reward from the parent's perspective.
    #[must_use]
    pub const fn reward(&self) -> Reward {
        self.reward
    }

    /// Returns `true` if the game is over in this position.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Child slots: `(column, child)` with `None` for moves not expanded yet.
    #[must_use]
    pub fn children(&self) -> &[(Column, Option<NodeId>)] {
        &self.children
    }

    /// Upper confidence bound: `w/n + c * sqrt(ln(N) / n)` where `N` is the
    /// parent's visit count. Unvisited nodes are infinitely attractive.
    #[must_use]
    pub fn upper_bound(&self, parent_visits: u32, exploration: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let visits = f64::from(self.visits);
        #[allow(clippy::cast_precision_loss)]
        let exploitation = self.reward as f64 / visits;
        exploration.mul_add(
            (f64::from(parent_visits).ln() / visits).sqrt(),
            exploitation,
        )
    }

    /// Result of a finished game in this node, from the parent's perspective.
    fn outcome(&self) -> Reward {
        if self.board.is_winning(!self.player) {
            1
        } else if self.board.is_winning(self.player) {
            -1
        } else {
            0
        }
    }
}

/// Monte Carlo search tree rooted at the position the agent has to move in.
#[derive(Clone, Debug)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Index of the root node.
    pub const ROOT: NodeId = NodeId(0);

    /// Creates a tree with only the root: `player` is to move on `board`.
    #[must_use]
    pub fn new(board: Board, player: Player) -> Self {
        Self {
            nodes: vec![Node::new(board, player, None)],
        }
    }

    /// Returns the node stored at `id`.
    ///
    /// # Panics
    ///
    /// Panics if the node does not belong to this tree.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        self.get(Self::ROOT)
    }

    /// Number of nodes materialized so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root is created together with the tree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Selection and expansion: walks down from the root and returns either a
    /// terminal node or a freshly created child.
    ///
    /// At every node the first move without a child gets one, so all
    /// children are visited once before any of them is visited twice. Once
    /// all children exist, the walk continues into the child with the highest
    /// [`Node::upper_bound`], keeping the first one on ties.
    pub fn select(&mut self, exploration: f64) -> NodeId {
        let mut current = Self::ROOT;
        loop {
            let node = &self.nodes[current.0];
            if node.terminal {
                return current;
            }
            if let Some(slot) = node.children.iter().position(|(_, child)| child.is_none()) {
                let column = node.children[slot].0;
                let child = Node::new(
                    node.board.after_move(column, node.player),
                    !node.player,
                    Some(current),
                );
                let id = NodeId(self.nodes.len());
                self.nodes.push(child);
                self.nodes[current.0].children[slot].1 = Some(id);
                return id;
            }
            let mut best: Option<(NodeId, f64)> = None;
            for child in node.children.iter().filter_map(|&(_, child)| child) {
                let bound = self.get(child).upper_bound(node.visits, exploration);
                if best.map_or(true, |(_, best_bound)| bound > best_bound) {
                    best = Some((child, bound));
                }
            }
            match best {
                Some((child, _)) => current = child,
                None => return current,
            }
        }
    }

    /// Plays the game out from `id` with uniformly random moves for both
    /// sides and returns the result from the perspective of the node's
    /// parent. Terminal nodes are scored directly.
    pub fn simulate<R: Rng + ?Sized>(&self, id: NodeId, rng: &mut R) -> Reward {
        let node = self.get(id);
        if node.terminal {
            return node.outcome();
        }
        let mut board = node.board;
        let mut player = node.player;
        loop {
            let Some(&column) = board.valid_moves().choose(rng) else {
                return 0;
            };
            let placed = board.apply_move_permissive(column, player);
            debug_assert!(placed, "rollout tried an illegal move {column} on\n{board:?}");
            if board.is_winning(player) {
                return if player == node.player { -1 } else { 1 };
            }
            player = !player;
        }
    }

    /// Adds a visit and the reward to `id` and all its ancestors, flipping the
    /// sign of the reward at every ply.
    pub fn backpropagate(&mut self, id: NodeId, reward: Reward) {
        let mut current = Some(id);
        let mut reward = reward;
        while let Some(id) = current {
            let node = &mut self.nodes[id.0];
            node.visits += 1;
            node.reward += reward;
            reward = -reward;
            current = node.parent;
        }
    }

    /// The root's most visited child move, keeping the first one on ties.
    /// `None` if no child has been visited yet.
    #[must_use]
    pub fn most_visited(&self) -> Option<Column> {
        let mut best: Option<(Column, u32)> = None;
        for &(column, child) in &self.root().children {
            let Some(child) = child else { continue };
            let visits = self.get(child).visits;
            if visits > best.map_or(0, |(_, best_visits)| best_visits) {
                best = Some((column, visits));
            }
        }
        best.map(|(column, _)| column)
    }
}
