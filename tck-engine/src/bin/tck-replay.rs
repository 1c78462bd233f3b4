//! Replay a recorded protocol event file through the conformance engine.
//!
//! ```text
//! tck-replay <events.jsonl> [config.json] [--epoch-ms <ms>]
//! ```
//!
//! Scenarios are started and ended in-band by `SPARKPLUG_TCK/TEST_CONTROL`
//! publishes in the event file. Every result report is printed to stdout;
//! a scenario still running at the end of the file is ended and reported
//! too. With `--epoch-ms` the engine clock follows the recorded offsets
//! from that epoch instead of wall-clock time.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tck_core::ResultRecord;
use tck_engine::clock::ManualClock;
use tck_engine::config::EngineConfig;
use tck_engine::orchestrator::Engine;
use tck_engine::replay::{load_events, Replay};
use tokio::sync::mpsc;
use tracing::error;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: tck-replay <events.jsonl> [config.json] [--epoch-ms <ms>]";

struct Args {
    events: PathBuf,
    config: Option<PathBuf>,
    epoch_ms: Option<u64>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut epoch_ms = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--epoch-ms" => {
                let value = args.next().ok_or("--epoch-ms needs a value")?;
                epoch_ms = Some(
                    value
                        .parse::<u64>()
                        .map_err(|e| format!("--epoch-ms {value}: {e}"))?,
                );
            }
            "-h" | "--help" => return Err(USAGE.into()),
            _ => positional.push(PathBuf::from(arg)),
        }
    }
    let mut positional = positional.into_iter();
    let events = positional.next().ok_or(USAGE)?;
    let config = positional.next();
    if positional.next().is_some() {
        return Err(USAGE.into());
    }
    Ok(Args {
        events,
        config,
        epoch_ms,
    })
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };
    let events = load_events(&args.events)?;

    let (results_tx, mut results_rx) = mpsc::unbounded_channel::<ResultRecord>();
    let mut engine = Engine::new(config).with_results(Arc::new(results_tx));
    let mut replay = Replay::new(events);
    if let Some(epoch_ms) = args.epoch_ms {
        let clock = Arc::new(ManualClock::new(epoch_ms));
        engine = engine.with_clock(clock.clone());
        replay = replay.with_clock(clock, epoch_ms);
    }

    let (handle, join) = engine.spawn();
    replay.run(&handle).await?;
    drop(handle);
    join.await?;

    let mut reported = 0;
    while let Ok(record) = results_rx.try_recv() {
        println!("== {} ==\n{}\n", record.scenario, record.to_report());
        reported += 1;
    }
    if reported == 0 {
        println!("no scenario ran");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "replay failed");
            ExitCode::FAILURE
        }
    }
}
