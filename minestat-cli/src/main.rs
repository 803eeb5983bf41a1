// Minestat CLI - Batch anomaly detection and reporting
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Minestat CLI
//!
//! Batch runner for the minestat pipeline: load or generate production
//! readings, classify them under a detection policy, print summaries and
//! optionally export enriched records.
//!
//! ## Usage
//!
//! ```bash
//! # Classify a CSV dataset with the ensemble detector
//! minestat-cli --csv production.csv --method all --out-csv enriched.csv
//!
//! # Generate 90 days of synthetic data and inspect the summaries
//! minestat-cli --generate --days 90 --seed 42
//! ```

mod input;

use clap::Parser;
use minestat::{
    classify, ingest, summary, DetectionMethod, DetectionPolicy, EntitySummary, Reading,
};
use minestat_testdata::{generate, GeneratorConfig};
use thiserror::Error;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// Minestat batch pipeline
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV file with readings (mine,date,production[,anomaly_type,anomaly_severity])
    #[arg(short, long, conflicts_with = "generate")]
    csv: Option<String>,

    /// Generate a synthetic dataset instead of reading a file
    #[arg(short, long)]
    generate: bool,

    /// Days per mine when generating
    #[arg(long, default_value = "488")]
    days: usize,

    /// Random seed when generating
    #[arg(long)]
    seed: Option<u64>,

    /// Detection method (zscore, iqr, movingavg, all)
    #[arg(short, long, default_value = "zscore")]
    method: String,

    /// Z-score threshold
    #[arg(long, default_value = "2.5")]
    z_threshold: f64,

    /// Trailing window size in days
    #[arg(short, long, default_value = "7")]
    window: usize,

    /// IQR fence multiplier
    #[arg(long, default_value = "1.5")]
    iqr_multiplier: f64,

    /// Write enriched records to this CSV file
    #[arg(long)]
    out_csv: Option<String>,

    /// Write enriched records to this JSON file
    #[arg(long)]
    out_json: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("unknown method '{0}' (expected zscore, iqr, movingavg or all)")]
    UnknownMethod(String),

    #[error("no input: pass --csv <file> or --generate")]
    NoInput,

    #[error(transparent)]
    Input(#[from] input::InputError),

    #[error(transparent)]
    Pipeline(#[from] minestat::MinestatError),
}

fn parse_method(raw: &str) -> Result<DetectionMethod, CliError> {
    match raw.to_lowercase().as_str() {
        "zscore" => Ok(DetectionMethod::ZScore),
        "iqr" => Ok(DetectionMethod::Iqr),
        "movingavg" => Ok(DetectionMethod::MovingAvg),
        "all" => Ok(DetectionMethod::All),
        other => Err(CliError::UnknownMethod(other.to_string())),
    }
}

fn load_readings(args: &Args) -> Result<Vec<Reading>, CliError> {
    if let Some(path) = &args.csv {
        info!("loading readings from {}", path);
        return Ok(input::load_csv(path)?);
    }
    if args.generate {
        let mut config = GeneratorConfig::new().with_num_days(args.days);
        if let Some(seed) = args.seed {
            config = config.with_seed(seed);
        }
        info!("generating {} days per mine", args.days);
        return Ok(generate(&config));
    }
    Err(CliError::NoInput)
}

fn format_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}", v),
        None => "n/a".to_string(),
    }
}

fn print_summary(s: &EntitySummary) {
    println!(
        "{:<12} count {:>5}  mean {:>8.1}  median {:>8.1}  std {:>7.1}  anomalies {:>4} ({:.1}%)  trend {:>6}%  stability {:>6}",
        s.mine,
        s.count,
        s.mean,
        s.median,
        s.std_dev,
        s.anomalies,
        s.anomaly_rate,
        format_opt(s.trend),
        format_opt(s.stability),
    );
}

fn run(args: &Args) -> Result<(), CliError> {
    let policy = DetectionPolicy::default()
        .with_method(parse_method(&args.method)?)
        .with_z_threshold(args.z_threshold)
        .with_window_size(args.window)
        .with_iqr_multiplier(args.iqr_multiplier);

    let readings = load_readings(args)?;
    let series = ingest(&readings)?;
    info!("ingested {} readings across {} mines", readings.len(), series.len());

    let records = classify(&series, &policy)?;

    println!("Per-mine summary:");
    for s in summary::per_mine(&records) {
        print_summary(&s);
    }

    if let Some(overall) = summary::overall(&records) {
        println!(
            "\nOverall: {} mines, {} records, total production {:.0}, {} anomalies ({:.1}%)",
            overall.mines,
            overall.records,
            overall.total_production,
            overall.anomalies,
            overall.anomaly_rate,
        );
    }

    if let Some(path) = &args.out_csv {
        minestat::export::to_csv_file(path, &records)?;
        info!("wrote {}", path);
    }
    if let Some(path) = &args.out_json {
        minestat::export::to_json_file(path, &records)?;
        info!("wrote {}", path);
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        EnvFilter::from_default_env().add_directive(level.into())
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Minestat CLI v{}", env!("CARGO_PKG_VERSION"));

    if let Err(err) = run(&args) {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}
