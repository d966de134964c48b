// src/main.rs
//
// Offline replay tool for the neighbor activity tracker:
//
// - reads recorded scrapes, one JSON array of neighbor observations per line
// - runs each non-blank line as one scrape cycle through the collector
// - prints the per-cycle active count and, at the end, the metrics text.
//
// Usage: iri-exporter-replay [FILE]   (reads stdin when FILE is omitted)

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::sync::Arc;

use iri_exporter::{ExporterConfig, MetricsRegistry, NeighborCollector, PeerObservation};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "iri_exporter=info".to_string()),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let cfg = ExporterConfig::default();

    let metrics = Arc::new(
        MetricsRegistry::new(&cfg.metrics)
            .map_err(|e| format!("failed to initialise metrics registry: {e}"))?,
    );
    let collector = NeighborCollector::new(cfg.activity, metrics.clone());

    let input: Box<dyn BufRead> = match std::env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path).map_err(|e| format!("failed to open {path}: {e}"))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin())),
    };

    tracing::info!(
        slot_capacity = cfg.activity.slot_capacity,
        history_depth = cfg.activity.history_depth,
        "replaying recorded scrapes"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let cycles = replay(input, &mut out, &collector)?;

    write!(out, "{}", metrics.gather_text())
        .map_err(|e| format!("failed to write metrics: {e}"))?;
    tracing::info!(cycles, "replay finished");
    Ok(())
}

/// Runs every non-blank line of `input` as one scrape cycle and writes a
/// summary line per cycle to `out`. Returns the number of cycles run.
///
/// Cycles are numbered consecutively; line numbers only appear in errors.
fn replay(
    input: impl BufRead,
    out: &mut impl Write,
    collector: &NeighborCollector,
) -> Result<usize, String> {
    let mut cycles = 0;

    for (lineno, line) in input.lines().enumerate() {
        let line = line.map_err(|e| format!("failed to read input: {e}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let observations: Vec<PeerObservation> = serde_json::from_str(&line)
            .map_err(|e| format!("line {}: invalid neighbor list: {e}", lineno + 1))?;

        let report = collector.collect(&observations);
        cycles += 1;
        writeln!(
            out,
            "cycle {cycles}: {} of {} neighbors active",
            report.active_count,
            observations.len()
        )
        .map_err(|e| format!("failed to write output: {e}"))?;
    }

    Ok(cycles)
}
