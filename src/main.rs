//! Headless runner: simulates a fixed span of time and logs population counts.
//!
//! Usage: `predprey [params.json] [events.jsonl]`

use std::fs::File;
use std::io::{BufWriter, Write};

use predprey::simulation::ecosystem::Ecosystem;
use predprey::simulation::params::Params;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Simulated minutes run by the headless binary.
const RUN_MINUTES: u64 = 10;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let params = match args.next() {
        Some(path) => {
            info!(path = %path, "loading params");
            Params::load_from_file(&path)?
        }
        None => Params::default(),
    };

    // Optional second argument: file receiving lineage events as JSON lines.
    let mut event_sink = match args.next() {
        Some(path) => Some(BufWriter::new(File::create(path)?)),
        None => None,
    };

    let ticks_per_second = u64::from(params.ticks_per_second);
    let report_every = ticks_per_second * 10;
    let total_ticks = ticks_per_second * 60 * RUN_MINUTES;

    let mut ecosystem = Ecosystem::new(params)?;
    info!(
        prey = ecosystem.prey_count(),
        predators = ecosystem.predator_count(),
        "starting simulation"
    );

    for _ in 0..total_ticks {
        let report = ecosystem.step();
        let events = ecosystem.drain_events();
        if let Some(sink) = event_sink.as_mut() {
            for event in events {
                writeln!(sink, "{}", event.to_json_line()?)?;
            }
        }

        if (report.tick + 1) % report_every == 0 {
            let pool = ecosystem.pool_stats();
            info!(
                seconds = (report.tick + 1) / ticks_per_second,
                prey = report.prey,
                predators = report.predators,
                reuse_rate = pool.reuse_rate,
                allocations = pool.allocations_made,
                "population"
            );
        }

        if report.prey == 0 && report.predators == 0 {
            info!(tick = report.tick, "all agents died");
            break;
        }
    }

    if let Some(mut sink) = event_sink {
        sink.flush()?;
    }
    Ok(())
}
