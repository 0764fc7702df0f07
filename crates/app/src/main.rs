use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{LevelFilter, info};
use rooms::store::{load_latest, load_room_set};
use rooms::{TimeSideChannel, WorldConfig};

use adventure::run_session;

#[derive(Parser)]
#[command(author, version, about = "Find your way through the newest generated room set", long_about = None)]
struct Args {
    /// TOML world configuration; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Play this room-set directory instead of the newest one
    #[arg(short, long)]
    dir: Option<PathBuf>,
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

    let (dir, rooms) = match &args.dir {
        Some(dir) => {
            let rooms = load_room_set(dir)
                .with_context(|| format!("Failed to load room set {}", dir.display()))?;
            (dir.clone(), rooms)
        }
        None => load_latest(Path::new("."), &config.dir_prefix)
            .context("Failed to load the newest room set")?,
    };
    info!("playing {} rooms from {}", rooms.len(), dir.display());

    let mut time = TimeSideChannel::start(&config.time_file);
    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    let outcome = run_session(&rooms, &mut input, &mut output, &mut time);
    time.shutdown();

    let summary = outcome.context("Session ended without reaching the end room")?;
    info!("finished in {} steps", summary.steps);
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
