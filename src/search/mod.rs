//! [Search] is a "dynamic" position evaluation: it looks ahead into possible
//! continuations and combines their static evaluation into a final value.
//!
//! All searches here run with a fixed depth budget and share the same leaf
//! semantics: a realized win is worth [`crate::evaluation::WIN`] or
//! [`crate::evaluation::LOSS`], a full board is a draw, and positions at the
//! depth limit are scored by [`crate::evaluation::evaluate`]. Player one is
//! always the maximizer and player two the minimizer, regardless of who runs
//! the search.
//!
//! [Search]: https://www.chessprogramming.org/Search

use std::fmt;
use std::time::Duration;

use crate::game::{Column, COLUMNS, ROWS};

pub mod alphabeta;
pub mod expectimax;
pub mod minimax;

pub use alphabeta::{alpha_beta, alpha_beta_move};
pub use expectimax::{expectimax, expectimax_move};
pub use minimax::minimax;

/// Search depth in plies.
pub type Depth = u8;

/// No game lasts longer than this, so deeper searches are pointless.
#[allow(clippy::cast_possible_truncation)]
pub const MAX_DEPTH: Depth = (ROWS * COLUMNS) as Depth;

/// Bound that is never reached by any value.
pub(crate) const INFINITY: i32 = 1_000;

/// The outcome of a search from the root position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchResult<V = crate::evaluation::Value> {
    /// Column the searching player should drop the token into.
    pub best_move: Column,
    /// Value of the position after [`SearchResult::best_move`].
    pub value: V,
    /// Number of positions visited below the root.
    pub nodes: u64,
    /// Wall-clock time the search took.
    pub elapsed: Duration,
}

impl<V: fmt::Display> fmt::Display for SearchResult<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bestmove {} value {} nodes {}",
            self.best_move, self.value, self.nodes
        )
    }
}
