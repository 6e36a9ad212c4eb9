//! Path Resolver
//!
//! Loads a scenario file, resolves the mover's scripted path with seeded
//! dice and prints the movement reports.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use iron_stride::dice::SeededDice;
use iron_stride::scenario::Scenario;

/// Resolve one scripted movement path and print what happened
#[derive(Parser, Debug)]
#[command(name = "resolve_path")]
#[command(about = "Resolve a scenario's movement path and print the reports")]
struct Args {
    /// Scenario file (JSON)
    #[arg(long)]
    scenario: PathBuf,

    /// Dice seed; overrides the scenario's own seed
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    format: String,

    /// Debug logging for every step and check
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { "iron_stride=debug" } else { "iron_stride=info" };
    let directive = match level.parse() {
        Ok(directive) => directive,
        Err(e) => {
            eprintln!("Error: bad log directive: {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(directive))
        .init();

    let scenario = match Scenario::load(&args.scenario) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("Error: failed to load {}: {}", args.scenario.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let seed = args.seed.or(scenario.seed).unwrap_or_else(rand::random);
    tracing::info!(seed, scenario = %args.scenario.display(), "resolving scenario");
    let mut dice = SeededDice::from_seed(seed);

    let run = match scenario.run(&mut dice) {
        Ok(run) => run,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.format == "json" {
        match serde_json::to_string_pretty(&run) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: failed to serialize result: {}", e);
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    println!("=== {} (seed {}) ===", scenario.mover, seed);
    for report in &run.reports {
        println!("  [{:?}] {}", report.kind, report.description);
    }
    println!();
    println!("Decision:  {:?}", run.outcome.decision);
    if let Some(cause) = run.outcome.turn_over {
        println!("Turn over: {:?}", cause);
    }
    if let Some(cause) = run.outcome.interrupt {
        println!("Interrupt: {:?}", cause);
    }
    for attack in &run.outcome.attacks {
        println!("Attack:    {:?} from {} at {}", attack.kind, attack.from, attack.to);
    }
    for update in &run.outcome.updates {
        println!(
            "Unit {}: at {} facing {:?}, elevation {}{}{}",
            update.unit,
            update.position,
            update.facing,
            update.elevation,
            if update.prone { ", prone" } else { "" },
            if update.destroyed { ", destroyed" } else { "" },
        );
    }
    ExitCode::SUCCESS
}
