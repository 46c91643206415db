//! Tick CSV loading.
//!
//! Each tick file has a header row followed by `timestamp,price,quantity`
//! rows. An empty price cell is a missing price and loads as `0.0`; the
//! cleaning pipeline repairs it later.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tickbar_core::{parse_timestamp_with, Error, LoaderConfig, Result, Tick, Timestamp};
use tracing::{debug, info};

use crate::metadata::TickFileMetadata;

/// Load one tick file.
pub fn load_file(path: impl AsRef<Path>, timestamp_format: &str) -> Result<Vec<Tick>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut ticks = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        // Header is line 1.
        let line = row + 2;
        let field = |i: usize, name: &str| {
            record.get(i).ok_or_else(|| {
                Error::parse(format!("{}:{}: missing {} column", path.display(), line, name))
            })
        };

        let timestamp = parse_timestamp_with(field(0, "timestamp")?, timestamp_format)
            .map_err(|e| Error::parse(format!("{}:{}: {}", path.display(), line, e)))?;

        let raw_price = field(1, "price")?;
        let price = if raw_price.is_empty() {
            0.0
        } else {
            raw_price.parse::<f64>().map_err(|_| {
                Error::parse(format!("{}:{}: invalid price '{}'", path.display(), line, raw_price))
            })?
        };

        let raw_quantity = field(2, "quantity")?;
        let quantity = raw_quantity.parse().map_err(|_| {
            Error::parse(format!(
                "{}:{}: invalid quantity '{}'",
                path.display(),
                line,
                raw_quantity
            ))
        })?;

        ticks.push(Tick::new(timestamp, price, quantity));
    }

    debug!(path = %path.display(), ticks = ticks.len(), "loaded tick file");
    Ok(ticks)
}

/// Loader for a directory of tick files.
#[derive(Debug, Clone)]
pub struct DataLoader {
    /// Files found in the directory, sorted by file name.
    files: Vec<TickFileMetadata>,
    /// Worker threads (0 = rayon default, one per core).
    workers: usize,
    timestamp_format: String,
}

impl DataLoader {
    /// Scan `dir` with default loader settings.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let config = LoaderConfig {
            data_dir: dir.as_ref().to_path_buf(),
            ..LoaderConfig::default()
        };
        Self::from_config(&config)
    }

    /// Scan the configured data directory.
    pub fn from_config(config: &LoaderConfig) -> Result<Self> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(&config.data_dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        paths.retain(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "csv"));
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let files = paths
            .iter()
            .map(TickFileMetadata::from_path)
            .collect::<Result<Vec<_>>>()?;

        info!(
            dir = %config.data_dir.display(),
            files = files.len(),
            "scanned tick directory"
        );

        Ok(Self {
            files,
            workers: config.workers,
            timestamp_format: config.timestamp_format.clone(),
        })
    }

    /// Override the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Files whose day falls within the range, in file name order.
    pub fn files_in_range(&self, start: Timestamp, end: Timestamp) -> Vec<&TickFileMetadata> {
        self.files.iter().filter(|f| f.in_range(start, end)).collect()
    }

    /// Load every file in the range and concatenate the ticks in file order.
    ///
    /// Files are read on a rayon pool of `workers` threads; the indexed
    /// collect keeps file order regardless of scheduling. The result is only
    /// sorted if the files' contents are.
    pub fn load(&self, start: Timestamp, end: Timestamp) -> Result<Vec<Tick>> {
        let files = self.files_in_range(start, end);
        if files.is_empty() {
            info!("no tick files in range");
            return Ok(Vec::new());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| Error::Other(format!("failed to build loader pool: {}", e)))?;
        let format = self.timestamp_format.as_str();

        let per_file: Vec<Vec<Tick>> = pool.install(|| {
            files
                .par_iter()
                .map(|file| load_file(&file.path, format))
                .collect::<Result<Vec<_>>>()
        })?;
        let ticks: Vec<Tick> = per_file.into_iter().flatten().collect();

        info!(
            files = files.len(),
            workers = pool.current_num_threads(),
            ticks = ticks.len(),
            "loaded tick files"
        );
        Ok(ticks)
    }
}
