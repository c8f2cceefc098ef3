//! The engine connects the board, the agents and the outside world. It speaks
//! a small line-based protocol modelled after the [Universal Chess Interface]:
//! the client sets up a position, picks an agent and asks for a move with
//! `go`.
//!
//! [`Engine::run`] is the "main loop" of the engine which reads commands from
//! the input stream and writes responses to the output stream.
//!
//! [Universal Chess Interface]: https://www.chessprogramming.org/UCI
use std::io::{BufRead, Write};

use itertools::Itertools;

use crate::agent::{AgentConfig, AgentKind};
use crate::engine::protocol::Command;
use crate::game::{Board, Column};

mod protocol;

/// Line protocol front-end that owns the current position and the agent
/// settings and handles I/O.
pub struct Engine<'a, R: BufRead, W: Write> {
    board: Board,
    config: AgentConfig,
    seed: u64,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Engine<'a, R, W> {
    /// Creates an engine with an empty board, the default alpha-beta agent
    /// and seed `0`.
    #[must_use]
    pub fn new(input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            board: Board::empty(),
            config: AgentConfig::new(AgentKind::AlphaBeta, None),
            seed: 0,
            input,
            output,
        }
    }

    /// Reads and executes commands until `quit` or the end of the input.
    ///
    /// Malformed commands, illegal moves and unsupported commands are
    /// reported with an `info string` line and the loop goes on.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading the input or writing the output
    /// fails.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            log::trace!("received: {}", line.trim_end());
            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    writeln!(self.output, "info string {e:#}")?;
                    continue;
                },
            };
            match command {
                Command::Id => self.handle_id()?,
                Command::IsReady => writeln!(self.output, "readyok")?,
                Command::Agent { kind, budget } => self.handle_agent(kind, budget)?,
                Command::Seed(seed) => self.seed = seed,
                Command::SetPosition { board, moves } => {
                    self.board = board.unwrap_or_else(Board::empty);
                    self.play(&moves)?;
                },
                Command::Play(moves) => self.play(&moves)?,
                Command::Moves => {
                    writeln!(self.output, "{}", self.board.valid_moves().iter().join(" "))?;
                },
                Command::Display => writeln!(self.output, "{:?}", self.board)?,
                Command::Go => self.handle_go()?,
                Command::Quit => break,
                Command::Unknown(command) if command.is_empty() => {},
                Command::Unknown(command) => {
                    writeln!(self.output, "info string unsupported command: {command}")?;
                },
            }
            self.output.flush()?;
        }
        Ok(())
    }

    /// Identifies the engine.
    fn handle_id(&mut self) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "id name {} {}",
            env!("CARGO_PKG_NAME"),
            crate::engine_version()
        )?;
        writeln!(self.output, "id author {}", env!("CARGO_PKG_AUTHORS"))?;
        writeln!(self.output, "idok")?;
        Ok(())
    }

    fn handle_agent(&mut self, kind: AgentKind, budget: Option<i64>) -> anyhow::Result<()> {
        if kind == AgentKind::Human {
            writeln!(
                self.output,
                "info string human agent is not available over the protocol"
            )?;
            return Ok(());
        }
        self.config = AgentConfig::new(kind, budget);
        writeln!(self.output, "info string agent {}", self.config)?;
        Ok(())
    }

    /// Drops tokens for alternating players starting with the side to move.
    /// Stops at the first move that can not be played.
    fn play(&mut self, moves: &[Column]) -> anyhow::Result<()> {
        for &column in moves {
            if self.board.is_terminal() {
                writeln!(
                    self.output,
                    "info string game over, ignoring move {column}"
                )?;
                break;
            }
            let player = self.board.side_to_move();
            if let Err(e) = self.board.apply_move(column, player) {
                writeln!(self.output, "info string illegal move: {e}")?;
                break;
            }
        }
        Ok(())
    }

    /// Asks the configured agent for a move for the side to move. The move is
    /// not played.
    fn handle_go(&mut self) -> anyhow::Result<()> {
        if let Some(winner) = self.board.winner() {
            writeln!(self.output, "info string game over: player {winner} wins")?;
            return Ok(());
        }
        if self.board.is_full() {
            writeln!(self.output, "info string game over: draw")?;
            return Ok(());
        }
        let player = self.board.side_to_move();
        let chosen = self
            .config
            .build(player, self.seed)
            .and_then(|mut agent| agent.choose_move(&self.board));
        match chosen {
            Ok(column) => {
                log::info!("{} for player {player} chose column {column}", self.config);
                writeln!(self.output, "bestmove {column}")?;
            },
            Err(e) => writeln!(self.output, "info string {e:#}")?,
        }
        Ok(())
    }
}
