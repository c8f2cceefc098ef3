use clap::Parser;
use dropfour::agent::{Agent, AgentConfig, AgentKind};
use dropfour::game::{Board, Player};
use flexi_logger::Logger;
use itertools::Itertools;
use rayon::prelude::*;

/// Plays a series of games between two agents and reports the results.
///
/// The first agent always plays as player one. Every game gets its own board
/// and its own seeds derived from `--seed`, so a run is reproducible.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Agent playing as player one: alpha-beta, expectimax, mcts or random.
    #[arg(long)]
    first: AgentKind,
    /// Agent playing as player two.
    #[arg(long)]
    second: AgentKind,
    /// Depth limit or iteration count for the first agent.
    #[arg(long)]
    first_budget: Option<i64>,
    /// Depth limit or iteration count for the second agent.
    #[arg(long)]
    second_budget: Option<i64>,
    #[arg(long, default_value_t = 100)]
    games: u64,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn play_game(first: &AgentConfig, second: &AgentConfig, seed: u64) -> anyhow::Result<Option<Player>> {
    let mut agents: [Box<dyn Agent>; 2] = [
        first.build(Player::One, seed)?,
        second.build(Player::Two, seed.wrapping_add(1))?,
    ];
    let mut board = Board::empty();
    while !board.is_terminal() {
        let player = board.side_to_move();
        let column = agents[usize::from(player == Player::Two)].choose_move(&board)?;
        let _ = board.apply_move(column, player)?;
    }
    log::debug!("game with seed {seed} finished:\n{board:?}");
    Ok(board.winner())
}

fn main() -> anyhow::Result<()> {
    let _logger = Logger::try_with_env_or_str("warn")?.start()?;
    let args = Args::parse();
    anyhow::ensure!(
        args.first != AgentKind::Human && args.second != AgentKind::Human,
        "human agents can not play in the arena"
    );

    let first = AgentConfig::new(args.first, args.first_budget);
    let second = AgentConfig::new(args.second, args.second_budget);
    println!("{first} vs {second}, {} games", args.games);

    let results = (0..args.games)
        .into_par_iter()
        .map(|game| play_game(&first, &second, args.seed.wrapping_add(2 * game)))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let counts = results.into_iter().counts();
    let total = |outcome: Option<Player>| counts.get(&outcome).copied().unwrap_or(0);

    println!("{first} wins: {}", total(Some(Player::One)));
    println!("{second} wins: {}", total(Some(Player::Two)));
    println!("draws: {}", total(None));
    Ok(())
}
