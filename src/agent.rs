//! Agents hide the search algorithms behind a single capability: given the
//! board, choose a column.
//!
//! Every agent is created for a fixed [`Player`] from an [`AgentConfig`]. The
//! randomized agents own their random source, seeded by the caller, so games
//! can be replayed exactly.

use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{bail, ensure, Context};
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::game::{Board, Column, Player};
use crate::mcts::Mcts;
use crate::search::{alpha_beta_move, expectimax_move, Depth, MAX_DEPTH};

/// Search depth used when the budget is missing or not positive.
pub const DEFAULT_DEPTH: Depth = 3;
/// MCTS iterations used when the budget is missing or not positive.
pub const DEFAULT_ITERATIONS: u32 = 1000;

/// Chooses moves for one side of the game.
pub trait Agent {
    /// Returns a valid column for the player this agent was created for.
    ///
    /// # Errors
    ///
    /// Fails if the board has no valid moves or if an external move source
    /// can not provide one.
    fn choose_move(&mut self, board: &Board) -> anyhow::Result<Column>;
}

/// Supported agent algorithms.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentKind {
    AlphaBeta,
    Expectimax,
    Mcts,
    Random,
    Human,
}

impl FromStr for AgentKind {
    type Err = anyhow::Error;

    fn from_str(kind: &str) -> anyhow::Result<Self> {
        match kind.trim() {
            "alpha-beta" | "alphabeta" | "ab" => Ok(Self::AlphaBeta),
            "expectimax" | "expmax" => Ok(Self::Expectimax),
            "mcts" => Ok(Self::Mcts),
            "random" => Ok(Self::Random),
            "human" => Ok(Self::Human),
            _ => bail!(
                "unknown agent '{kind}', expected one of: alpha-beta, expectimax, mcts, random, \
                 human"
            ),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AlphaBeta => "alpha-beta",
            Self::Expectimax => "expectimax",
            Self::Mcts => "mcts",
            Self::Random => "random",
            Self::Human => "human",
        })
    }
}

/// Agent construction parameters.
///
/// `budget` is the depth limit for [`AgentKind::AlphaBeta`] and
/// [`AgentKind::Expectimax`], the iteration count for [`AgentKind::Mcts`] and
/// is ignored otherwise. Missing and non-positive budgets fall back to
/// [`DEFAULT_DEPTH`] and [`DEFAULT_ITERATIONS`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgentConfig {
    /// Algorithm to play with.
    pub kind: AgentKind,
    /// Raw budget as received from the caller.
    pub budget: Option<i64>,
}

impl AgentConfig {
    /// Creates the configuration.
    #[must_use]
    pub const fn new(kind: AgentKind, budget: Option<i64>) -> Self {
        Self { kind, budget }
    }

    fn positive_budget(&self) -> Option<i64> {
        self.budget.filter(|&budget| budget > 0)
    }

    /// Depth limit for the tree searches, capped at [`MAX_DEPTH`].
    #[must_use]
    pub fn depth(&self) -> Depth {
        self.positive_budget().map_or(DEFAULT_DEPTH, |budget| {
            Depth::try_from(budget.min(i64::from(MAX_DEPTH))).unwrap_or(MAX_DEPTH)
        })
    }

    /// Iteration budget for MCTS.
    #[must_use]
    pub fn iterations(&self) -> u32 {
        self.positive_budget()
            .map_or(DEFAULT_ITERATIONS, |budget| {
                u32::try_from(budget).unwrap_or(u32::MAX)
            })
    }

    /// Creates a self-contained agent for `player`. Randomized agents are
    /// seeded with `seed`.
    ///
    /// # Errors
    ///
    /// Human agents need a move source: use [`AgentConfig::build_human`].
    pub fn build(&self, player: Player, seed: u64) -> anyhow::Result<Box<dyn Agent>> {
        let rng = StdRng::seed_from_u64(seed);
        let agent: Box<dyn Agent> = match self.kind {
            AgentKind::AlphaBeta => Box::new(AlphaBetaAgent::new(player, self.depth())),
            AgentKind::Expectimax => Box::new(ExpectimaxAgent::new(player, self.depth())),
            AgentKind::Mcts => Box::new(MctsAgent::new(player, Mcts::new(self.iterations()), rng)),
            AgentKind::Random => Box::new(RandomAgent::new(rng)),
            AgentKind::Human => bail!("human agent requires a move source"),
        };
        Ok(agent)
    }

    /// Creates an agent that asks `source` for its moves.
    pub fn build_human<S: MoveSource + 'static>(player: Player, source: S) -> Box<dyn Agent> {
        Box::new(HumanAgent::new(player, source))
    }
}

impl fmt::Display for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AgentKind::AlphaBeta | AgentKind::Expectimax => {
                write!(f, "{} (depth {})", self.kind, self.depth())
            },
            AgentKind::Mcts => write!(f, "{} ({} iterations)", self.kind, self.iterations()),
            AgentKind::Random | AgentKind::Human => write!(f, "{}", self.kind),
        }
    }
}

fn ensure_playable(board: &Board) -> anyhow::Result<()> {
    ensure!(!board.is_full(), "no valid moves: the board is full");
    Ok(())
}

/// Plays [`crate::search::alpha_beta`] with a fixed depth limit.
#[derive(Debug)]
pub struct AlphaBetaAgent {
    player: Player,
    depth: Depth,
}

impl AlphaBetaAgent {
    /// Creates the agent.
    #[must_use]
    pub const fn new(player: Player, depth: Depth) -> Self {
        Self { player, depth }
    }
}

impl Agent for AlphaBetaAgent {
    fn choose_move(&mut self, board: &Board) -> anyhow::Result<Column> {
        ensure_playable(board)?;
        Ok(alpha_beta_move(board, self.player, self.depth))
    }
}

/// Plays [`crate::search::expectimax`] with a fixed depth limit.
#[derive(Debug)]
pub struct ExpectimaxAgent {
    player: Player,
    depth: Depth,
}

impl ExpectimaxAgent {
    /// Creates the agent.
    #[must_use]
    pub const fn new(player: Player, depth: Depth) -> Self {
        Self { player, depth }
    }
}

impl Agent for ExpectimaxAgent {
    fn choose_move(&mut self, board: &Board) -> anyhow::Result<Column> {
        ensure_playable(board)?;
        Ok(expectimax_move(board, self.player, self.depth))
    }
}

/// Plays [`crate::mcts`] with a fixed iteration budget. A new tree is built
/// for every move.
#[derive(Debug)]
pub struct MctsAgent<R: Rng> {
    player: Player,
    mcts: Mcts,
    rng: R,
}

impl<R: Rng> MctsAgent<R> {
    /// Creates the agent.
    pub const fn new(player: Player, mcts: Mcts, rng: R) -> Self {
        Self { player, mcts, rng }
    }
}

impl<R: Rng> Agent for MctsAgent<R> {
    fn choose_move(&mut self, board: &Board) -> anyhow::Result<Column> {
        ensure_playable(board)?;
        Ok(self.mcts.search(board, self.player, &mut self.rng))
    }
}

/// Picks any valid column with equal probability.
#[derive(Debug)]
pub struct RandomAgent<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomAgent<R> {
    /// Creates the agent.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Agent for RandomAgent<R> {
    fn choose_move(&mut self, board: &Board) -> anyhow::Result<Column> {
        board
            .valid_moves()
            .choose(&mut self.rng)
            .copied()
            .context("no valid moves: the board is full")
    }
}

/// External provider of moves, e.g. a person at the keyboard.
pub trait MoveSource {
    /// Returns the column `player` wants to play. It does not have to be
    /// valid: [`HumanAgent`] keeps asking until it is.
    ///
    /// # Errors
    ///
    /// Fails if the source is exhausted or broken.
    fn next_move(&mut self, board: &Board, player: Player) -> anyhow::Result<Column>;

    /// Called when the previously returned column can not be played.
    ///
    /// # Errors
    ///
    /// Fails if the source can not be notified.
    fn reject(&mut self, _column: Column, _valid: &[Column]) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Relays moves from a [`MoveSource`], asking again until the column is
/// valid.
#[derive(Debug)]
pub struct HumanAgent<S: MoveSource> {
    player: Player,
    source: S,
}

impl<S: MoveSource> HumanAgent<S> {
    /// Creates the agent.
    pub const fn new(player: Player, source: S) -> Self {
        Self { player, source }
    }
}

impl<S: MoveSource> Agent for HumanAgent<S> {
    fn choose_move(&mut self, board: &Board) -> anyhow::Result<Column> {
        ensure_playable(board)?;
        loop {
            let column = self.source.next_move(board, self.player)?;
            if board.is_valid_move(column) {
                return Ok(column);
            }
            self.source.reject(column, &board.valid_moves())?;
        }
    }
}

/// Reads column numbers line by line, prompting on `output`.
#[derive(Debug)]
pub struct LineMoveSource<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineMoveSource<R, W> {
    /// Creates the source.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> MoveSource for LineMoveSource<R, W> {
    fn next_move(&mut self, _board: &Board, player: Player) -> anyhow::Result<Column> {
        loop {
            write!(self.output, "Enter your move, player {player}: ")?;
            self.output.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                bail!("input closed while waiting for a move");
            }
            match line.trim().parse::<Column>() {
                Ok(column) => return Ok(column),
                Err(_) => writeln!(self.output, "Expected a column number, got '{}'", line.trim())?,
            }
        }
    }

    fn reject(&mut self, column: Column, valid: &[Column]) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "Column {column} can not be played, choose from: {}",
            valid.iter().join(" ")
        )?;
        Ok(())
    }
}
