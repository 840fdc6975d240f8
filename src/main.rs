//! CHAINRS - headless versus runner
//!
//! Plays one computer-vs-computer match with the saved settings and prints
//! the result.

use chainrs::event::PlayerId;
use chainrs::settings::Settings;
use chainrs::versus::{Match, MatchOutcome};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: chainrs [--seed N] [--ticks N] [--json] [--write-settings]";

/// Command line options
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    seed: Option<u64>,
    ticks: Option<u64>,
    json: bool,
    write_settings: bool,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => parsed.seed = Some(number(&arg, args.next())?),
            "--ticks" => parsed.ticks = Some(number(&arg, args.next())?),
            "--json" => parsed.json = true,
            "--write-settings" => parsed.write_settings = true,
            "-h" | "--help" => parsed.help = true,
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(parsed)
}

fn number(flag: &str, value: Option<String>) -> Result<u64, String> {
    let value = value.ok_or_else(|| format!("{} needs a value", flag))?;
    value
        .parse()
        .map_err(|e| format!("bad value for {}: {} ({})", flag, value, e))
}

/// Get the chainrs temp directory, creating it if needed
fn chainrs_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("chainrs");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

#[derive(Serialize)]
struct Summary<'a> {
    seed: u64,
    #[serde(flatten)]
    outcome: &'a MatchOutcome,
}

fn player_name(id: PlayerId) -> &'static str {
    match id {
        PlayerId::One => "Player One",
        PlayerId::Two => "Player Two",
    }
}

fn print_report(versus: &Match, settings: &Settings, seed: u64, outcome: &MatchOutcome) {
    println!("Seed: {} | Ticks: {}", seed, outcome.ticks);
    for id in PlayerId::all() {
        let board = versus.player(id);
        let score = &board.score;
        println!();
        println!(
            "{} ({}){}",
            player_name(id),
            settings.versus.difficulty(id).name(),
            if board.is_game_over() { " - topped out" } else { "" }
        );
        println!(
            "Score: {} | Chains: {} | Best: {} | Garbage sent/received: {}/{}",
            score.points, score.chains, score.best_chain, score.garbage_sent, score.garbage_received
        );
        println!("{}", board.grid());
    }
    println!();
    match outcome.winner {
        Some(id) => println!("Winner: {}", player_name(id)),
        None => println!("Draw"),
    }
}

fn main() -> io::Result<()> {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}\n{}", e, USAGE);
            std::process::exit(2);
        }
    };
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    // Generate session ID for this instance
    let session_id: u32 = rand::random();

    // Setup tracing to log file
    let log_dir = chainrs_temp_dir();
    let log_file = format!("{:08x}.log", session_id);
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chainrs=debug")),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "CHAINRS starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let mut settings = Settings::load();
    if let Some(ticks) = args.ticks {
        settings.versus.max_ticks = ticks;
    }
    if let Some(seed) = args.seed {
        settings.versus.seed = Some(seed);
    }
    if args.write_settings {
        if let Err(e) = settings.save() {
            eprintln!("Warning: Could not save settings: {}", e);
        }
    }

    let seed = settings.versus.seed.unwrap_or_else(rand::random);
    let mut versus = Match::new(settings.engine.clone(), &settings.versus, seed);
    let outcome = versus.run();

    if args.json {
        let summary = Summary {
            seed,
            outcome: &outcome,
        };
        let json = serde_json::to_string_pretty(&summary).map_err(io::Error::other)?;
        println!("{}", json);
    } else {
        print_report(&versus, &settings, seed, &outcome);
    }

    Ok(())
}
