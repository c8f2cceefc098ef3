//! Parsing of the line-based commands understood by [`crate::Engine`].

use anyhow::{bail, Context};

use crate::agent::AgentKind;
use crate::game::{Board, Column};

#[derive(Debug, PartialEq)]
pub(super) enum Command {
    Id,
    IsReady,
    Agent {
        kind: AgentKind,
        budget: Option<i64>,
    },
    Seed(u64),
    /// `board` is `None` for the empty starting board.
    SetPosition {
        board: Option<Board>,
        moves: Vec<Column>,
    },
    Play(Vec<Column>),
    Moves,
    Display,
    Go,
    Quit,
    Unknown(String),
}

fn parse_columns(parts: &[&str]) -> anyhow::Result<Vec<Column>> {
    parts
        .iter()
        .map(|part| {
            part.parse::<Column>()
                .with_context(|| format!("expected a column number, got '{part}'"))
        })
        .collect()
}

fn parse_position(parts: &[&str]) -> anyhow::Result<Command> {
    let (board, rest) = match parts {
        ["startpos", rest @ ..] => (None, rest),
        [board, rest @ ..] => (Some(Board::try_from(*board)?), rest),
        [] => bail!("expected `position startpos|<board> [moves <c>...]`"),
    };
    let moves = match rest {
        [] => Vec::new(),
        ["moves", columns @ ..] => parse_columns(columns)?,
        [other, ..] => bail!("expected `moves`, got '{other}'"),
    };
    Ok(Command::SetPosition { board, moves })
}

fn parse_agent(parts: &[&str]) -> anyhow::Result<Command> {
    let (kind, budget) = match parts {
        [kind] => (kind, None),
        [kind, budget] => (
            kind,
            Some(
                budget
                    .parse::<i64>()
                    .with_context(|| format!("expected a numeric budget, got '{budget}'"))?,
            ),
        ),
        _ => bail!("expected `agent <kind> [budget]`"),
    };
    Ok(Command::Agent {
        kind: kind.parse()?,
        budget,
    })
}

impl Command {
    /// Parses a single input line. Unrecognized commands are returned as
    /// [`Command::Unknown`], recognized commands with malformed arguments
    /// are errors.
    pub(super) fn parse(input: &str) -> anyhow::Result<Self> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let Some((&command, arguments)) = parts.split_first() else {
            return Ok(Self::Unknown(String::new()));
        };
        Ok(match command {
            "id" => Self::Id,
            "isready" => Self::IsReady,
            "agent" => parse_agent(arguments)?,
            "seed" => match arguments {
                [seed] => Self::Seed(
                    seed.parse()
                        .with_context(|| format!("expected a numeric seed, got '{seed}'"))?,
                ),
                _ => bail!("expected `seed <n>`"),
            },
            "position" => parse_position(arguments)?,
            "play" => Self::Play(parse_columns(arguments)?),
            "moves" => Self::Moves,
            "d" => Self::Display,
            "go" => Self::Go,
            "quit" => Self::Quit,
            _ => Self::Unknown(input.trim().to_string()),
        })
    }
}
