// Passenger Flow Simulator - CLI front end
//
// A thin external collaborator around the core engine: loads a scenario,
// runs it to completion, exports the aggregate time series as CSV and
// prints a per-flight summary. All simulation logic lives in the core
// crate; this binary only consumes its read-only views.
//
// ```console
// $ passenger-flow --scenario scenario.json --out series.csv
// $ passenger-flow --print-config > scenario.json
// ```

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveTime;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use passenger_flow_core_rs::{
    CheckpointConfig, CounterConfig, EngineConfig, Flight, HoldRoomConfig, MarkerShape,
    SimulationEngine,
};

#[derive(Parser, Debug)]
#[command(
    name = "passenger-flow",
    about = "Airport departure-process capacity simulator"
)]
struct Args {
    /// Scenario configuration file (JSON). Runs a built-in demo scenario
    /// when omitted.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Write the aggregate series CSV to this file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Print the demo scenario configuration as JSON and exit.
    #[arg(long)]
    print_config: bool,

    /// Verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&demo_config())?);
        return Ok(());
    }

    let config = match &args.scenario {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading scenario {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing scenario {}", path.display()))?
        }
        None => demo_config(),
    };

    let mut engine = SimulationEngine::new(config).context("building engine")?;
    info!(
        flights = engine.flights().len(),
        intervals = engine.total_intervals(),
        "running scenario"
    );
    engine.run_to_completion();

    match &args.out {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            write_series_csv(&engine, file)?;
            info!(path = %path.display(), "series written");
        }
        None => write_series_csv(&engine, io::stdout().lock())?,
    }

    print_summary(&engine)?;
    Ok(())
}

/// Export the per-interval aggregate series.
fn write_series_csv<W: Write>(engine: &SimulationEngine, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "interval",
        "arrivals",
        "ticket_queued",
        "checkpoint_queued",
        "hold_room_total",
        "held_up",
    ])?;

    for interval in 0..=engine.max_computed_interval() {
        writer.write_record([
            interval.to_string(),
            engine.total_arrivals_at_interval(interval).to_string(),
            engine.ticket_queued_at(interval).to_string(),
            engine.checkpoint_queued_at(interval).to_string(),
            engine.hold_room_total_at(interval).to_string(),
            engine.held_up_at(interval).to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Per-flight outcome table on stderr, so stdout stays clean CSV.
fn print_summary(engine: &SimulationEngine) -> Result<()> {
    let mut err = io::stderr().lock();
    writeln!(err, "flight   expected  arrived  boarded  missed  hold_room")?;
    for s in engine.flight_summaries() {
        writeln!(
            err,
            "{:<8} {:>8}  {:>7}  {:>7}  {:>6}  {:>9}",
            s.flight_number, s.expected_passengers, s.arrivals, s.boarded, s.missed, s.hold_room
        )?;
    }
    Ok(())
}

/// The built-in demo: three flights over a morning bank, two counters, two
/// checkpoints, two hold rooms with different walks.
fn demo_config() -> EngineConfig {
    let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
    EngineConfig {
        percent_in_person: 0.35,
        counters: vec![
            CounterConfig::new(1).with_rate(0.8),
            CounterConfig::new(2).with_rate(0.8),
        ],
        checkpoints: vec![
            CheckpointConfig::new(1).with_rate_per_hour(120.0),
            CheckpointConfig::new(2).with_rate_per_hour(90.0),
        ],
        hold_rooms: Some(vec![
            HoldRoomConfig::new(1).with_walk_time(1, 15),
            HoldRoomConfig::new(2).with_walk_time(2, 30),
        ]),
        arrival_span_minutes: 120,
        transit_delay_minutes: 2,
        flights: vec![
            Flight::new("AA101", t(9, 0), 150, 0.85, MarkerShape::Circle),
            Flight::new("BA202", t(9, 40), 120, 0.95, MarkerShape::Triangle),
            Flight::new("CX303", t(10, 15), 180, 0.7, MarkerShape::Star),
        ],
        rng_seed: 20_24,
        ..EngineConfig::default()
    }
}
