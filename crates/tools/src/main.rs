use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{LevelFilter, info};
use rooms::store::write_room_set;
use rooms::{WorldConfig, generate_rooms};

mod seed;

use seed::SeedChoice;

#[derive(Parser)]
#[command(author, version, about = "Generate a new room set in the working directory", long_about = None)]
struct Args {
    /// Seed for reproducible generation; a fresh one is drawn when omitted
    #[arg(short, long)]
    seed: Option<u64>,
    /// TOML world configuration; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory the room-set directory is created in
    #[arg(short, long, default_value = ".")]
    out: PathBuf,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_failure(&err),
    }
}

fn run(args: &Args) -> Result<()> {
    let config = WorldConfig::load_or_default(args.config.as_deref())
        .context("Failed to load world configuration")?;

    let seed = SeedChoice::resolve(args.seed);
    info!("generating {} rooms with seed {}", config.room_count, seed.value());

    let generated = generate_rooms(&config, seed.value()).context("Failed to generate rooms")?;
    let dir = write_room_set(&args.out, &config.dir_prefix, &generated.rooms)
        .context("Failed to write room set")?;

    info!("wrote {} room records to {}", generated.rooms.len(), dir.display());
    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();
}

fn report_failure(err: &anyhow::Error) -> ExitCode {
    let invariant = err.downcast_ref::<rooms::Error>().is_some_and(rooms::Error::is_invariant);
    if invariant {
        eprintln!("internal error: {err:#}");
        ExitCode::from(2)
    } else {
        eprintln!("error: {err:#}");
        ExitCode::FAILURE
    }
}
