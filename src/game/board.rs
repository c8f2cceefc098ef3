//! Provides the [`Board`]: a fixed grid of cells that tokens are dropped into,
//! move application, valid move enumeration and win detection.
//!
//! The board is small (42 bytes) and [`Copy`]: searches treat the board they
//! receive as an immutable snapshot and explore continuations on private
//! copies created by [`Board::after_move`].

use std::fmt;

use anyhow::{bail, Context};
use arrayvec::ArrayVec;
use itertools::Itertools;

use crate::game::core::{Column, Player, Window, COLUMNS, ROWS, WINDOWS};

/// Columns available for the next move, in ascending order.
pub type Moves = ArrayVec<Column, COLUMNS>;

/// Reported when a move can not be applied to the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IllegalMove {
    /// The column index is outside of the board.
    #[error("column {0} is out of range, expected 0..{COLUMNS}")]
    OutOfRange(Column),
    /// The column has no empty cells left.
    #[error("column {0} is full")]
    ColumnFull(Column),
}

/// Fixed `ROWS` x `COLUMNS` grid. Row 0 is the top of the board, so a column
/// fills from the last row upwards.
///
/// As long as the tokens are only placed with [`Board::apply_move`] (or its
/// variants), each column is a contiguous stack growing from the bottom row.
/// Parsing a snapshot validates the same property.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [[Option<Player>; COLUMNS]; ROWS],
}

impl Board {
    /// Creates a board without any tokens.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            cells: [[None; COLUMNS]; ROWS],
        }
    }

    /// Returns the owner of the token at given cell, if any.
    ///
    /// # Panics
    ///
    /// Panics if the cell is outside of the board.
    #[must_use]
    pub const fn at(&self, row: usize, column: Column) -> Option<Player> {
        self.cells[row][column]
    }

    /// Drops the token into the lowest empty cell of `column` and returns the
    /// row it landed in.
    ///
    /// # Errors
    ///
    /// Returns [`IllegalMove`] if the column does not exist or is already full.
    /// The board is not modified in that case.
    pub fn apply_move(&mut self, column: Column, player: Player) -> Result<usize, IllegalMove> {
        if column >= COLUMNS {
            return Err(IllegalMove::OutOfRange(column));
        }
        let row = (0..ROWS)
            .rev()
            .find(|&row| self.cells[row][column].is_none())
            .ok_or(IllegalMove::ColumnFull(column))?;
        self.cells[row][column] = Some(player);
        Ok(row)
    }

    /// Drops the token like [`Board::apply_move`] but silently does nothing
    /// when the move is illegal. Returns whether the token was placed.
    ///
    /// Callers are expected to pick the column from [`Board::valid_moves`].
    pub fn apply_move_permissive(&mut self, column: Column, player: Player) -> bool {
        self.apply_move(column, player).is_ok()
    }

    /// Returns a copy of the board with the move applied. Used by the searches
    /// to try a move without touching the snapshot they were given.
    #[must_use]
    pub fn after_move(&self, column: Column, player: Player) -> Self {
        let mut next = *self;
        let placed = next.apply_move_permissive(column, player);
        debug_assert!(placed, "search tried an illegal move {column} on\n{self:?}");
        next
    }

    /// Columns that can still accept a token, in ascending order. An empty
    /// list means the board is full.
    #[must_use]
    pub fn valid_moves(&self) -> Moves {
        (0..COLUMNS)
            .filter(|&column| self.cells[0][column].is_none())
            .collect()
    }

    /// Returns `true` if the column exists and its top cell is empty.
    #[must_use]
    pub fn is_valid_move(&self, column: Column) -> bool {
        column < COLUMNS && self.cells[0][column].is_none()
    }

    /// Returns `true` if `player` owns all four cells of any window.
    #[must_use]
    pub fn is_winning(&self, player: Player) -> bool {
        WINDOWS
            .iter()
            .any(|window| self.owns_window(window, player))
    }

    /// Returns the player with a completed alignment, if any. Player one is
    /// reported first in the (unreachable in real games) case both have one.
    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        [Player::One, Player::Two]
            .into_iter()
            .find(|&player| self.is_winning(player))
    }

    /// Returns `true` if no token can be dropped anymore.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells[0].iter().all(Option::is_some)
    }

    /// Returns `true` if the game is over: somebody won or the board is full.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.is_full() || self.winner().is_some()
    }

    /// Number of tokens `player` has on the board.
    #[must_use]
    pub fn count(&self, player: Player) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell == Some(player))
            .count()
    }

    /// Infers whose turn it is assuming player one made the first move.
    #[must_use]
    pub fn side_to_move(&self) -> Player {
        if self.count(Player::One) == self.count(Player::Two) {
            Player::One
        } else {
            Player::Two
        }
    }

    /// Returns the snapshot in the row-major `{0, 1, 2}` encoding.
    #[must_use]
    pub fn to_snapshot(&self) -> [[u8; COLUMNS]; ROWS] {
        let mut snapshot = [[0; COLUMNS]; ROWS];
        for (row, cells) in self.cells.iter().enumerate() {
            for (column, cell) in cells.iter().enumerate() {
                snapshot[row][column] = cell.map_or(0, Player::id);
            }
        }
        snapshot
    }

    pub(crate) fn owns_window(&self, window: &Window, player: Player) -> bool {
        window
            .iter()
            .all(|&(row, column)| self.cells[row][column] == Some(player))
    }

    /// Returns `true` if none of the window cells belongs to `player`.
    pub(crate) fn free_of(&self, window: &Window, player: Player) -> bool {
        window
            .iter()
            .all(|&(row, column)| self.cells[row][column] != Some(player))
    }

    fn validate_gravity(&self) -> anyhow::Result<()> {
        for column in 0..COLUMNS {
            let mut seen_token = false;
            for row in 0..ROWS {
                match self.cells[row][column] {
                    Some(_) => seen_token = true,
                    None if seen_token => {
                        bail!("column {column} has an empty cell at row {row} below a token")
                    },
                    None => {},
                }
            }
        }
        Ok(())
    }
}

impl TryFrom<[[u8; COLUMNS]; ROWS]> for Board {
    type Error = anyhow::Error;

    /// Parses a row-major snapshot with row 0 at the top: `0` is an empty
    /// cell, `1` and `2` are the players' tokens.
    fn try_from(snapshot: [[u8; COLUMNS]; ROWS]) -> anyhow::Result<Self> {
        let mut board = Self::empty();
        for (row, values) in snapshot.iter().enumerate() {
            for (column, &value) in values.iter().enumerate() {
                board.cells[row][column] = match value {
                    0 => None,
                    id => Some(
                        Player::try_from(id)
                            .with_context(|| format!("invalid cell ({row}, {column})"))?,
                    ),
                };
            }
        }
        board.validate_gravity()?;
        Ok(board)
    }
}

impl TryFrom<&str> for Board {
    type Error = anyhow::Error;

    /// Parses the compact form produced by [`Board`]'s [`fmt::Display`]: rows
    /// of digits from top to bottom separated by `/`.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        let rows: Vec<&str> = input.split('/').collect();
        if rows.len() != ROWS {
            bail!("expected {ROWS} rows separated by '/', got {}: {input}", rows.len());
        }
        let mut snapshot = [[0_u8; COLUMNS]; ROWS];
        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != COLUMNS {
                bail!("row {row} should have exactly {COLUMNS} cells, got '{line}'");
            }
            for (column, symbol) in line.chars().enumerate() {
                snapshot[row][column] = match symbol {
                    '0' | '.' => 0,
                    '1' => 1,
                    '2' => 2,
                    _ => bail!("unexpected symbol '{symbol}' in row {row}"),
                };
            }
        }
        Self::try_from(snapshot)
    }
}

impl fmt::Display for Board {
    /// Serializes the board into the compact single-line form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.to_snapshot();
        let rows = snapshot.iter().map(|row| row.iter().join(""));
        write!(f, "{}", rows.format("/"))
    }
}

impl fmt::Debug for Board {
    /// Prints the board as a grid with column indices at the bottom.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line = row
                .iter()
                .map(|cell| cell.map_or('.', |player| char::from(b'0' + player.id())))
                .join(" ");
            writeln!(f, "{line}")?;
        }
        write!(f, "{}", (0..COLUMNS).join(" "))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_board() {
        let board = Board::empty();
        assert_eq!(board.valid_moves().as_slice(), &[0, 1, 2, 3, 4, 5, 6]);
        assert!(!board.is_full());
        assert!(!board.is_terminal());
        assert_eq!(board.winner(), None);
        assert_eq!(board.side_to_move(), Player::One);
    }

    #[test]
    fn gravity() {
        let mut board = Board::empty();
        assert_eq!(board.apply_move(3, Player::One), Ok(5));
        assert_eq!(board.apply_move(3, Player::Two), Ok(4));
        assert_eq!(board.at(5, 3), Some(Player::One));
        assert_eq!(board.at(4, 3), Some(Player::Two));
        assert_eq!(board.at(3, 3), None);
        assert_eq!(board.side_to_move(), Player::One);
    }

    #[test]
    fn full_column_is_reported() {
        let mut board = Board::empty();
        for i in 0..ROWS {
            let player = if i % 2 == 0 { Player::One } else { Player::Two };
            assert!(board.apply_move(0, player).is_ok());
        }
        let before = board;
        assert_eq!(
            board.apply_move(0, Player::One),
            Err(IllegalMove::ColumnFull(0))
        );
        assert_eq!(board, before);
        assert!(!board.apply_move_permissive(0, Player::One));
        assert_eq!(board, before);
        assert_eq!(board.valid_moves().as_slice(), &[1, 2, 3, 4, 5, 6]);
        assert!(!board.is_valid_move(0));
    }

    #[test]
    fn out_of_range() {
        let mut board = Board::empty();
        assert_eq!(
            board.apply_move(COLUMNS, Player::One),
            Err(IllegalMove::OutOfRange(COLUMNS))
        );
        assert_eq!(
            IllegalMove::OutOfRange(9).to_string(),
            "column 9 is out of range, expected 0..7"
        );
    }

    #[test]
    fn text_roundtrip() {
        let input = "0000000/0000000/0000000/0000000/0002000/0011200";
        let board = Board::try_from(input).unwrap();
        assert_eq!(board.to_string(), input);
        assert_eq!(board.at(5, 2), Some(Player::One));
        assert_eq!(board.at(4, 3), Some(Player::Two));
        assert_eq!(board.side_to_move(), Player::Two);
        assert_eq!(
            format!("{board:?}"),
            ". . . . . . .\n\
             . . . . . . .\n\
             . . . . . . .\n\
             . . . . . . .\n\
             . . . 2 . . .\n\
             . . 1 1 2 . .\n\
             0 1 2 3 4 5 6"
        );
    }

    #[test]
    fn parsing_errors() {
        assert!(Board::try_from("0000000/0000000").is_err());
        assert!(Board::try_from("0000000/0000000/0000000/0000000/0000000/00000000").is_err());
        assert!(Board::try_from("0000000/0000000/0000000/0000000/0000000/000x000").is_err());
        // Floating token.
        assert!(Board::try_from("0000000/0000000/0000000/0001000/0000000/0000000").is_err());
        let mut snapshot = [[0_u8; COLUMNS]; ROWS];
        snapshot[5][0] = 3;
        assert!(Board::try_from(snapshot).is_err());
    }
}
