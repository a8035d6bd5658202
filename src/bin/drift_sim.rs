//! Synthetic Drift Simulation
//!
//! Generates baseline/current column pairs for a set of drift scenarios
//! and runs them through the real detection engine, printing each
//! resulting report as JSON. Useful for eyeballing detector behavior and
//! for load-testing the batch runner.
//!
//! # Usage
//! ```bash
//! ./drift-sim --rows 5000 --seed 7 --scenario all | jq .severity
//! ```

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use rand::prelude::*;
use rand_distr::{Distribution, Normal};

use driftlens::{Anchor, BatchItem, CellValue, DriftEngine, DriftConfig};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "drift-sim")]
#[command(about = "Synthetic drift scenarios through the driftlens engine")]
#[command(version = "1.0")]
struct Args {
    /// Rows per synthetic column
    #[arg(short, long, default_value = "5000", value_parser = clap::value_parser!(u32).range(100..=1_000_000))]
    rows: u32,

    /// Random seed for reproducibility
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Scenario: clean, shifted, rescaled, reformatted, duplicated, or all
    #[arg(long, default_value = "all")]
    scenario: String,

    /// Pretty-print report JSON
    #[arg(short, long)]
    pretty: bool,
}

// ============================================================================
// Scenarios
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Scenario {
    /// Same distribution, format, and uniqueness on both sides.
    Clean,
    /// Mean of the numeric distribution moves by several sigma.
    Shifted,
    /// Values rescaled ×1000 (unit change).
    Rescaled,
    /// Identifiers re-serialized in a new format.
    Reformatted,
    /// A unique key column collapses into duplicates.
    Duplicated,
}

impl Scenario {
    fn name(self) -> &'static str {
        match self {
            Scenario::Clean => "clean",
            Scenario::Shifted => "shifted",
            Scenario::Rescaled => "rescaled",
            Scenario::Reformatted => "reformatted",
            Scenario::Duplicated => "duplicated",
        }
    }

    fn all() -> &'static [Scenario] {
        &[
            Scenario::Clean,
            Scenario::Shifted,
            Scenario::Rescaled,
            Scenario::Reformatted,
            Scenario::Duplicated,
        ]
    }
}

fn normal_column(rng: &mut StdRng, rows: u32, mean: f64, std: f64, scale: f64) -> Vec<CellValue> {
    let dist = Normal::new(mean, std).expect("valid normal");
    (0..rows)
        .map(|_| CellValue::Float((dist.sample(rng) * scale * 100.0).round() / 100.0))
        .collect()
}

fn id_column(rows: u32, dashed: bool) -> Vec<CellValue> {
    (0..rows)
        .map(|i| {
            if dashed {
                CellValue::from(format!("ORD-{:07}", i))
            } else {
                CellValue::from(format!("ORD{:07}X", i))
            }
        })
        .collect()
}

/// Build the (baseline, current) column pair for a scenario.
fn build_pair(scenario: Scenario, rows: u32, rng: &mut StdRng) -> (Vec<CellValue>, Vec<CellValue>) {
    match scenario {
        Scenario::Clean => (
            normal_column(rng, rows, 250.0, 40.0, 1.0),
            normal_column(rng, rows, 250.0, 40.0, 1.0),
        ),
        Scenario::Shifted => (
            normal_column(rng, rows, 250.0, 40.0, 1.0),
            normal_column(rng, rows, 520.0, 40.0, 1.0),
        ),
        Scenario::Rescaled => (
            normal_column(rng, rows, 250.0, 40.0, 1.0),
            normal_column(rng, rows, 250.0, 40.0, 1000.0),
        ),
        Scenario::Reformatted => (id_column(rows, true), id_column(rows, false)),
        Scenario::Duplicated => {
            let baseline = id_column(rows, true);
            let current: Vec<CellValue> = (0..rows)
                .map(|i| CellValue::from(format!("ORD-{:07}", i % (rows / 20).max(1))))
                .collect();
            (baseline, current)
        }
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let scenarios: Vec<Scenario> = if args.scenario == "all" {
        Scenario::all().to_vec()
    } else {
        let wanted = Scenario::all()
            .iter()
            .copied()
            .find(|s| s.name() == args.scenario)
            .ok_or_else(|| anyhow::anyhow!("unknown scenario: {}", args.scenario))?;
        vec![wanted]
    };

    let mut config = DriftConfig::default();
    config.sampling.seed = args.seed;
    let engine = DriftEngine::new(config);
    let mut rng = StdRng::seed_from_u64(args.seed);

    let mut items = Vec::with_capacity(scenarios.len());
    for scenario in &scenarios {
        let (baseline_values, current_values) = build_pair(*scenario, args.rows, &mut rng);
        let baseline_fp = driftlens::fingerprint(&baseline_values, None);
        let anchor = Anchor::new(
            format!("sim-{}", scenario.name()),
            "simulation",
            scenario.name(),
            baseline_fp,
            Utc::now(),
        )
        .with_confidence(0.9);
        let fingerprint = driftlens::fingerprint(&current_values, None);
        items.push(BatchItem {
            anchor,
            values: current_values,
            fingerprint,
        });
    }

    let outcome = engine.evaluate_batch(items).await;
    for report in outcome.reports {
        let report = report?;
        let json = if args.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        println!("{json}");
    }
    eprintln!(
        "evaluated {} scenario(s) in {:.1} ms ({:.1}/s)",
        outcome.metrics.items, outcome.metrics.total_ms, outcome.metrics.throughput_per_sec
    );
    Ok(())
}
