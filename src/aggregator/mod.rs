//! Aggregation of the transaction table into derived tables.
//!
//! This module transforms the loaded table into:
//! - Per-user and per-item rollups
//! - A calendar-month time series
//! - Per-region summaries for configured bounding boxes
//! - Spatial hot zones on a uniform grid
//! - A combined buyer/seller player ranking
//!
//! Every transformation is a pure function of the same immutable slice.

pub mod hotzone;
pub mod ranking;
pub mod region;
pub mod report;
pub mod rollup;
pub mod timeseries;

// Re-export main types and functions
pub use hotzone::{find_hot_zones, occupied_cells, spatial_bounds, CellCounts, HotZoneConfig};
pub use ranking::rank_players;
pub use region::{load_regions, most_common_items, parse_regions, summarize_regions, Region, RegionSet};
pub use report::{analyze, AnalysisConfig};
pub use rollup::{overview, rollup, GroupColumn};
pub use timeseries::{month_start, monthly_series};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::parser::{parse_timestamp, Transaction};

    /// Build a transaction from a date and the fields tests care about
    pub fn tx(
        date: &str,
        username: Option<&str>,
        seller: Option<&str>,
        item: &str,
        quantity: u64,
        price: f64,
        [x, y, z]: [f64; 3],
    ) -> Transaction {
        Transaction {
            timestamp: parse_timestamp(date).expect("valid test date"),
            username: username.map(str::to_string),
            seller: seller.map(str::to_string),
            action: Some("buy".to_string()),
            item_name: Some(item.to_string()),
            quantity,
            price,
            x,
            y,
            z,
        }
    }
}
