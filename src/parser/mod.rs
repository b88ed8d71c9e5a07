//! Transaction parsing and schema definitions.
//!
//! This module handles:
//! - Loading the CSV transaction table
//! - Validating every cell before aggregation
//! - Defining the report schema

pub mod schema;
pub mod transactions;

// Re-export main types
pub use schema::{
    EdgePolicy, HotZone, HotZoneReport, ItemCount, MonthBucket, Point3, RankingEntry,
    RegionSummary, Report, RollupRow, SpatialBounds, Totals, Transaction,
};
pub use transactions::{load_transactions, parse_timestamp, parse_transactions};
