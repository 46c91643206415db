use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tickbar_bars::{CsvBarSink, IntervalAggregator};
use tickbar_cleaning::CleaningPipeline;
use tickbar_core::{parse_date_arg, Config, Timestamp};
use tickbar_ingestion::DataLoader;

#[derive(Parser)]
#[command(name = "tickbar")]
#[command(about = "Clean tick data and aggregate it into OHLCV bars", long_about = None)]
struct Cli {
    /// Bar interval, e.g. 30s, 5m, 1h30m, 1d
    interval: String,

    /// Output CSV path
    output_file: PathBuf,

    /// Start date (inclusive), YYYYMMDD_HH:MM:SS.MS
    #[arg(short, long, value_parser = parse_date)]
    start_date: Option<Timestamp>,

    /// End date (inclusive), YYYYMMDD_HH:MM:SS.MS
    #[arg(short, long, value_parser = parse_date)]
    end_date: Option<Timestamp>,

    /// Directory of tick CSV files
    #[arg(long, env = "TICKBAR_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// JSON config file (flags override its values)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Loader threads (0 = one per core)
    #[arg(short, long)]
    workers: Option<usize>,
}

fn parse_date(s: &str) -> std::result::Result<Timestamp, String> {
    parse_date_arg(s).map_err(|e| e.to_string())
}

impl Cli {
    /// Merge the config file (or defaults) with command-line overrides.
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => Config::default(),
        };

        config.aggregation.interval = self.interval.clone();
        if self.start_date.is_some() {
            config.aggregation.start_date = self.start_date;
        }
        if self.end_date.is_some() {
            config.aggregation.end_date = self.end_date;
        }
        if let Some(dir) = &self.data_dir {
            config.loader.data_dir = dir.clone();
        }
        if let Some(workers) = self.workers {
            config.loader.workers = workers;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Load, clean and aggregate; returns the number of bars written.
fn run(config: &Config, output_file: &Path) -> Result<usize> {
    let start = config.aggregation.start();
    let end = config.aggregation.end();

    let timer = Instant::now();
    let loader = DataLoader::from_config(&config.loader).with_context(|| {
        format!(
            "Failed to scan data directory: {}",
            config.loader.data_dir.display()
        )
    })?;
    let mut ticks = loader.load(start, end).context("Failed to load tick data")?;
    tracing::info!(
        elapsed_ms = timer.elapsed().as_millis() as u64,
        ticks = ticks.len(),
        "load finished"
    );

    if ticks.is_empty() {
        anyhow::bail!("No tick data found in the requested range");
    }

    let timer = Instant::now();
    let pipeline = CleaningPipeline::new(&config.cleaning)?;
    let report = pipeline.clean(&mut ticks).context("Failed to clean tick data")?;
    tracing::info!(
        elapsed_ms = timer.elapsed().as_millis() as u64,
        ?report,
        "clean finished"
    );

    let timer = Instant::now();
    let aggregator = IntervalAggregator::from_config(&config.aggregation)?;
    let mut sink = CsvBarSink::create(output_file)
        .with_context(|| format!("Failed to create output: {}", output_file.display()))?
        .with_timestamp_format(config.loader.timestamp_format.as_str());
    aggregator.aggregate(&ticks, &mut sink)?;
    sink.flush()?;
    tracing::info!(
        elapsed_ms = timer.elapsed().as_millis() as u64,
        bars = sink.rows(),
        output = %output_file.display(),
        "aggregation finished"
    );

    Ok(sink.rows())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    run(&config, &cli.output_file)?;

    Ok(())
}
