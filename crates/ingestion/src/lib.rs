//! Tick data ingestion for the tickbar system.
//!
//! This crate handles:
//! - Tick file name metadata (ticker, day, series)
//! - CSV tick file parsing (missing prices load as zero)
//! - Date-range file selection and parallel loading

pub mod metadata;
pub mod loader;

pub use metadata::TickFileMetadata;
pub use loader::{load_file, DataLoader};
