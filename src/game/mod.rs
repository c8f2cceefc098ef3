//! Implementation of the gravity-drop connection game, its rules and
//! specifics.

pub mod board;
pub mod core;

pub use self::board::{Board, IllegalMove, Moves};
pub use self::core::{Column, Player, COLUMNS, ROWS};
