//! Game primitives commonly used within [`crate::game`].

use std::fmt;
use std::ops::Not;

use anyhow::bail;

/// Number of rows on the board. Row 0 is the top one.
pub const ROWS: usize = 6;
/// Number of columns on the board.
pub const COLUMNS: usize = 7;
/// Number of aligned tokens needed to win.
pub const CONNECT: usize = 4;

/// Moves are identified by the index of the column the token is dropped into,
/// `0..COLUMNS`, left to right.
pub type Column = usize;

/// The game is played between two symmetric players. [`Player::One`] moves
/// first from the empty board.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Numeric encoding used in board snapshots: `1` or `2`.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl Not for Player {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

impl TryFrom<u8> for Player {
    type Error = anyhow::Error;

    fn try_from(id: u8) -> anyhow::Result<Self> {
        match id {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            _ => bail!("player should be 1 or 2, got {id}"),
        }
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(id: &str) -> anyhow::Result<Self> {
        match id.trim() {
            "1" => Ok(Self::One),
            "2" => Ok(Self::Two),
            other => bail!("player should be '1' or '2', got '{other}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A `(row, column)` cell coordinate.
pub type Cell = (usize, usize);

/// Four aligned cells: the unit of both win detection and static evaluation.
pub type Window = [Cell; CONNECT];

/// Number of distinct four-in-a-row windows on the board:
///
/// - 7 columns × 3 start rows = 21 vertical,
/// - 6 rows × 4 start columns = 24 horizontal,
/// - 3 × 4 × 2 = 24 diagonal.
pub const WINDOW_COUNT: usize = 69;

/// Every four-cell window, vertical ones first, then horizontal, then
/// descending (top-left to bottom-right) and ascending diagonals.
///
/// ```
/// use dropfour::game::core::{WINDOWS, WINDOW_COUNT};
///
/// assert_eq!(WINDOWS.len(), WINDOW_COUNT);
/// assert_eq!(WINDOWS[0], [(0, 0), (1, 0), (2, 0), (3, 0)]);
/// ```
pub const WINDOWS: [Window; WINDOW_COUNT] = generate_windows();

const fn generate_windows() -> [Window; WINDOW_COUNT] {
    let mut windows = [[(0, 0); CONNECT]; WINDOW_COUNT];
    let mut next = 0;

    // Vertical.
    let mut column = 0;
    while column < COLUMNS {
        let mut row = 0;
        while row + CONNECT <= ROWS {
            let mut i = 0;
            while i < CONNECT {
                windows[next][i] = (row + i, column);
                i += 1;
            }
            next += 1;
            row += 1;
        }
        column += 1;
    }

    // Horizontal.
    let mut row = 0;
    while row < ROWS {
        let mut column = 0;
        while column + CONNECT <= COLUMNS {
            let mut i = 0;
            while i < CONNECT {
                windows[next][i] = (row, column + i);
                i += 1;
            }
            next += 1;
            column += 1;
        }
        row += 1;
    }

    // Diagonals: each 4x4 sub-grid holds one window in each direction.
    let mut row = 0;
    while row + CONNECT <= ROWS {
        let mut column = 0;
        while column + CONNECT <= COLUMNS {
            let mut i = 0;
            while i < CONNECT {
                windows[next][i] = (row + i, column + i);
                windows[next + 1][i] = (ROWS - 1 - row - i, column + i);
                i += 1;
            }
            next += 2;
            column += 1;
        }
        row += 1;
    }

    assert!(next == WINDOW_COUNT);
    windows
}
