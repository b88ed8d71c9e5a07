//! Market Atlas
//!
//! Aggregate, time-series and spatial analytics over the transaction log
//! of a game-server marketplace.
//!
//! This crate provides the engine behind the `market-atlas` CLI tool:
//! per-user and per-item rollups, a monthly time series, bounding-box
//! region summaries, spatial hot zones and a combined player ranking.
//!
//! ## Getting Started
//!
//! ```bash
//! market-atlas analyze --input transactions.csv --regions regions.toml --summary
//! ```
//!
//! As a library:
//!
//! ```ignore
//! use market_atlas::aggregator::{analyze, AnalysisConfig};
//! use market_atlas::parser::load_transactions;
//!
//! let table = load_transactions("transactions.csv")?;
//! let report = analyze(&table, &AnalysisConfig::default(), "transactions.csv")?;
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
