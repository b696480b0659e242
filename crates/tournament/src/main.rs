//! Tournament CLI
//!
//! Run a Swiss tournament stored in a JSON state file.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use random_pairer::RandomPairer;
use swiss_core::{Competitor, ResultCode, Round, Tournament};
use tournament::{
    add_competitor, get_current_round, get_standings, initialize_tournament, load_config,
    JsonFileStore, PairingEngine, RoundManager, TournamentStore,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "swiss", about = "Swiss-system tournament director")]
struct Cli {
    /// Tournament state file
    #[arg(long, env = "SWISS_STATE", default_value = "tournament.json", global = true)]
    state: PathBuf,

    /// Pairing/scoring configuration (TOML), used by `init`
    #[arg(long, env = "SWISS_CONFIG", default_value = "swiss.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a new tournament
    Init {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Competitor name (repeatable)
        #[arg(long = "competitor", short = 'c')]
        competitors: Vec<String>,
        /// File with one competitor name per line
        #[arg(long)]
        competitors_file: Option<PathBuf>,
        /// Overwrite an existing state file
        #[arg(long)]
        force: bool,
    },
    /// Add a competitor before round 1
    Add {
        name: String,
        #[arg(long)]
        club: Option<String>,
    },
    /// Pair and open the next round
    Next {
        /// Seed for the first-round shuffle
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Record a result: A_WIN, B_WIN, DRAW or BYE_A
    Record {
        table: u32,
        result: String,
        /// Defaults to the current round
        #[arg(long)]
        round: Option<u32>,
    },
    /// Clear one table's result
    Clear {
        table: u32,
        #[arg(long)]
        round: Option<u32>,
    },
    /// Clear every result in a round
    ClearRound { round: Option<u32> },
    /// Cancel the current round (no results recorded yet)
    Cancel,
    /// Go back to the previous round
    Back,
    /// Show standings
    Standings,
    /// Show a round's pairings (defaults to the current round)
    Round { number: Option<u32> },
    /// Show the audit log
    Log,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = JsonFileStore::new(&cli.state);

    match cli.command {
        Command::Init {
            title,
            description,
            competitors,
            competitors_file,
            force,
        } => {
            if store.exists() && !force {
                bail!(
                    "{} already exists (use --force to replace it)",
                    store.path().display()
                );
            }
            let mut names = competitors;
            if let Some(path) = competitors_file {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                names.extend(
                    contents
                        .lines()
                        .map(str::trim)
                        .filter(|l| !l.is_empty())
                        .map(String::from),
                );
            }
            let config = load_config(&cli.config)?;
            let roster = names.into_iter().map(Competitor::with_generated_id).collect();
            let t = initialize_tournament(&title, &description, roster, config)?;
            store.save(&t)?;
            println!("Initialized \"{}\" with {} competitors", t.title, t.total_competitors);
        }
        Command::Add { name, club } => {
            let mut t = store.load()?;
            let id = add_competitor(&mut t, &name, club)?;
            store.save(&t)?;
            println!("Added {} ({})", name.trim(), id);
        }
        Command::Next { seed } => {
            let mut t = store.load()?;
            let pairer = seed.map(RandomPairer::seeded).unwrap_or_default();
            let mut manager = RoundManager::new(PairingEngine::with_pairer(pairer));
            let round = manager.advance_to_next_round(&mut t)?;
            store.save(&t)?;
            if let Some(r) = t.round(round) {
                print_round(&t, r);
            }
        }
        Command::Record {
            table,
            result,
            round,
        } => {
            let mut t = store.load()?;
            let code: ResultCode = result.parse()?;
            let round = round.unwrap_or(t.current_round);
            RoundManager::default().record_match_result(&mut t, round, table, code)?;
            store.save(&t)?;
            println!("Round {round}, table {table}: {code}");
        }
        Command::Clear { table, round } => {
            let mut t = store.load()?;
            let round = round.unwrap_or(t.current_round);
            RoundManager::default().clear_match_result(&mut t, round, table)?;
            store.save(&t)?;
            println!("Cleared round {round}, table {table}");
        }
        Command::ClearRound { round } => {
            let mut t = store.load()?;
            let round = round.unwrap_or(t.current_round);
            RoundManager::default().clear_all_results_in_round(&mut t, round)?;
            store.save(&t)?;
            println!("Cleared all results in round {round}");
        }
        Command::Cancel => {
            let mut t = store.load()?;
            let cancelled = t.current_round;
            RoundManager::default().cancel_current_round(&mut t)?;
            store.save(&t)?;
            println!("Cancelled round {cancelled}; current round is {}", t.current_round);
        }
        Command::Back => {
            let mut t = store.load()?;
            RoundManager::default().go_back_to_previous_round(&mut t)?;
            store.save(&t)?;
            println!("Current round is now {}", t.current_round);
        }
        Command::Standings => {
            let t = store.load()?;
            print_standings(&t);
        }
        Command::Round { number } => {
            let t = store.load()?;
            let round = match number {
                Some(n) => t.round(n),
                None => get_current_round(&t),
            };
            match round {
                Some(r) => print_round(&t, r),
                None => println!("No round to show (current round: {})", t.current_round),
            }
        }
        Command::Log => {
            let t = store.load()?;
            for event in &t.events {
                let table = event.table.map(|n| format!(" table {n}")).unwrap_or_default();
                println!(
                    "{}  {:<24} round {}{}  {}",
                    event.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    serde_json::to_string(&event.kind)?.trim_matches('"'),
                    event.round,
                    table,
                    event.details
                );
            }
        }
    }

    Ok(())
}

fn print_round(t: &Tournament, round: &Round) {
    println!("\n=== {}: Round {} ===", t.title, round.number);
    println!("{:>5}  {:<24} {:<24} {:>8}", "Table", "White", "Black", "Result");
    println!("{}", "-".repeat(64));
    for m in &round.matches {
        let black = m.black.as_deref().map(|id| t.display_name(id)).unwrap_or("BYE");
        let result = m.result.map(|r| r.to_string()).unwrap_or_default();
        println!(
            "{:>5}  {:<24} {:<24} {:>8}",
            m.table,
            t.display_name(&m.white),
            black,
            result
        );
    }
    if round.is_complete {
        println!("(complete)");
    }
    println!();
}

fn print_standings(t: &Tournament) {
    println!("\n=== {}: Standings after round {} ===", t.title, t.current_round);
    println!("{:>4}  {:<30} {:>6} {:>9}  {}", "#", "Name", "Score", "Buchholz", "Colors");
    println!("{}", "-".repeat(64));
    for (i, c) in get_standings(t).iter().enumerate() {
        println!(
            "{:>4}  {:<30} {:>6.1} {:>9.1}  {}",
            i + 1,
            c.name,
            c.score,
            c.buchholz,
            c.color_history
        );
    }
    println!();
}
