//! Tournament director CLI
//!
//! Generate a round's pairings or a standings table from a snapshot file.

mod config;
mod report;
mod snapshot;

use std::env;
use std::path::Path;
use std::process;

use swiss_core::{compute_standings, generate_pairings};

use config::TournamentConfig;
use snapshot::Snapshot;

fn print_usage() {
    println!("Tournament Director");
    println!();
    println!("Usage:");
    println!("  director pair <snapshot.json> --round N [--config tournament.toml] [--start-board N]");
    println!("  director standings <snapshot.json> [--config tournament.toml]");
    println!();
    println!("The snapshot is a JSON file with players, results and prior pairings.");
    println!("The config selects pairing system, round count, tiebreak order and");
    println!("bye policy; without one, Swiss defaults apply.");
    println!();
    println!("Examples:");
    println!("  director pair club.json --round 3");
    println!("  director standings club.json --config tournament.toml");
}

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "pair" => run_pair(&args[2..]),
        "standings" => run_standings(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            process::exit(2);
        }
    }
}

fn run_pair(args: &[String]) {
    let Some(snapshot_path) = args.first() else {
        eprintln!("Error: pair requires a snapshot file");
        print_usage();
        process::exit(2);
    };

    let mut round: Option<u32> = None;
    let mut start_board: u32 = 1;
    let mut config_path: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--round" => {
                round = next_value(args, &mut i).and_then(|v| v.parse().ok());
            }
            "--start-board" => {
                start_board = next_value(args, &mut i)
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(1);
            }
            "--config" => {
                config_path = next_value(args, &mut i);
            }
            other => {
                eprintln!("Unknown option: {}", other);
                process::exit(2);
            }
        }
        i += 1;
    }

    let Some(round) = round else {
        eprintln!("Error: pair requires --round N");
        process::exit(2);
    };

    let snapshot = load_snapshot(snapshot_path);
    let config = load_config(config_path);
    let options = config.pairing_options(start_board);

    match generate_pairings(
        &snapshot.players,
        &snapshot.results,
        &snapshot.pairings,
        round,
        &options,
    ) {
        Ok(result) => {
            print!("{}", report::pairing_sheet(&result, &snapshot.players));
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run_standings(args: &[String]) {
    let Some(snapshot_path) = args.first() else {
        eprintln!("Error: standings requires a snapshot file");
        print_usage();
        process::exit(2);
    };

    let mut config_path: Option<&str> = None;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                config_path = next_value(args, &mut i);
            }
            other => {
                eprintln!("Unknown option: {}", other);
                process::exit(2);
            }
        }
        i += 1;
    }

    let snapshot = load_snapshot(snapshot_path);
    let config = load_config(config_path);

    match compute_standings(
        &snapshot.players,
        &snapshot.results,
        &config.tiebreaks,
        config.tiebreak_options(),
    ) {
        Ok(rows) => {
            print!("{}", report::standings_table(&rows, &config.tiebreaks));
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn next_value<'a>(args: &'a [String], i: &mut usize) -> Option<&'a str> {
    *i += 1;
    args.get(*i).map(String::as_str)
}

fn load_snapshot(path: &str) -> Snapshot {
    match Snapshot::load(Path::new(path)) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn load_config(path: Option<&str>) -> TournamentConfig {
    match path {
        None => TournamentConfig::default(),
        Some(path) => match TournamentConfig::load(Path::new(path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
    }
}
