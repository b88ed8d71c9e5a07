//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while loading the transaction table
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read transactions: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV decoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Row {row}: unparseable timestamp '{value}'")]
    InvalidTimestamp { row: u64, value: String },

    #[error("Row {row}, column '{column}': invalid value '{value}' ({reason})")]
    InvalidValue {
        row: u64,
        column: String,
        value: String,
        reason: &'static str,
    },
}

/// Errors that can occur while loading or validating analysis configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Region TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Region '{region}' has min {axis}={min} greater than max {axis}={max}")]
    InvertedBounds {
        region: String,
        axis: char,
        min: f64,
        max: f64,
    },

    #[error("Region '{0}' has a non-finite coordinate")]
    NonFiniteBounds(String),

    #[error("Duplicate region name: {0}")]
    DuplicateRegion(String),

    #[error("Region name cannot be empty")]
    EmptyRegionName,

    #[error("Cell size must be a positive finite number, got {0}")]
    InvalidCellSize(f64),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
