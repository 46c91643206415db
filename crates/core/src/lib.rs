//! Core types and configuration for the tickbar system.
//!
//! This crate provides shared types used across all other crates:
//! - Tick records and OHLCV bars
//! - Configuration structures
//! - Interval and date argument parsing
//! - Common error types

pub mod config;
pub mod error;
pub mod interval;
pub mod types;

pub use config::{AggregationConfig, CleaningConfig, Config, LoaderConfig};
pub use error::{Error, Result};
pub use interval::{parse_date_arg, parse_interval};
pub use types::*;
