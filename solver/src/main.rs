use std::fmt::Display;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use itertools::Itertools;
use puzzlegraph::{Hanoi, Iwahswap, Puzzle, SessionBuilder, Task};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Which {
    Hanoi,
    Iwahswap,
}

/// Explore a puzzle's state graph headlessly and print its shortest solution.
#[derive(Debug, Parser)]
#[command(name = "solver")]
struct Args {
    #[arg(value_enum, default_value = "hanoi")]
    puzzle: Which,
    /// Number of disks for the Tower of Hanoi.
    #[arg(long, default_value_t = 3)]
    disks: u8,
    /// States expanded per exploration tick.
    #[arg(long, default_value_t = 100)]
    batch: usize,
    /// Give up after this many ticks.
    #[arg(long, default_value_t = 100_000)]
    ticks: usize,
}

fn run<P: Puzzle + Display>(initial: P, args: &Args) -> ExitCode {
    let mut session = match SessionBuilder::new(initial).explore_batch(Duration::from_millis(100), args.batch).build() {
        Ok(session) => session,
        Err(reasons) => {
            error!(?reasons, "invalid settings");
            return ExitCode::from(2);
        }
    };

    session.start(Duration::ZERO);
    let stopped_at = session.run_until_settled(Duration::ZERO, args.ticks);
    if session.scheduler().is_running(Task::Explore) {
        warn!(elapsed = ?stopped_at, "exploration did not finish within the tick limit");
    }

    let explorer = session.explorer();
    let stats = explorer.stats();
    println!("{} states, {} moves between them", stats.discovered, stats.edges);

    let (Some(start), Some(goal)) = (explorer.start(), explorer.goal()) else {
        println!("no solution reachable");
        return ExitCode::FAILURE;
    };

    let path = match explorer.shortest_path(start, goal) {
        Ok(path) => path,
        Err(err) => {
            error!(%err, "cannot reconstruct solution");
            return ExitCode::FAILURE;
        }
    };

    info!(goal_states = explorer.goal_states(), "solved");
    println!("start is {} moves from the goal", path.len() - 1);

    let moves = path.iter().tuple_windows()
        .filter_map(|(a, b)| explorer.neighbors(*a).find(|(other, _)| other == b).and_then(|(_, mv)| mv))
        .join(", ");
    println!("{moves}");
    println!("{}", explorer[goal].state());

    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env("PUZZLEGRAPH_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();
    match args.puzzle {
        Which::Hanoi => run(Hanoi::new(args.disks), &args),
        Which::Iwahswap => run(Iwahswap::default(), &args),
    }
}
