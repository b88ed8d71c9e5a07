//! Transaction record and report schema definitions.
//!
//! This module defines the in-memory transaction row and the structure of the
//! JSON report we write to disk. The report schema is versioned to allow
//! future evolution.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A coordinate in world space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Coordinates in axis order (x, y, z)
    pub fn axes(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// One marketplace event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub timestamp: NaiveDateTime,

    /// Acting party (buyer)
    pub username: Option<String>,

    /// Counterparty, absent for some event kinds
    pub seller: Option<String>,

    pub action: Option<String>,

    pub item_name: Option<String>,

    /// Items moved, zero when the cell was empty
    pub quantity: u64,

    /// Currency moved, zero when the cell was empty
    pub price: f64,

    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Transaction {
    /// Position at which the event occurred
    pub fn position(&self) -> Point3 {
        Point3::new(self.x, self.y, self.z)
    }
}

/// Count, quantity sum and price sum over a set of transactions
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub transactions: u64,
    pub quantity: u64,
    pub price: f64,
}

impl Totals {
    /// Fold one transaction into the running totals
    pub fn record(&mut self, tx: &Transaction) {
        self.transactions += 1;
        // The loader rejects tables whose quantity total exceeds u64
        self.quantity = self.quantity.saturating_add(tx.quantity);
        self.price += tx.price;
    }

    /// Totals over an arbitrary sequence of transactions
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut totals = Self::default();
        for tx in rows {
            totals.record(tx);
        }
        totals
    }
}

/// One group of a rollup table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupRow {
    /// Group key; `None` collects rows where the key cell was empty
    pub key: Option<String>,
    pub totals: Totals,
}

/// Aggregates for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthBucket {
    /// First day of the month
    pub month: NaiveDate,
    pub totals: Totals,
}

/// Item name paired with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCount {
    pub item_name: String,
    pub count: u64,
}

/// Activity inside one configured region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSummary {
    pub name: String,
    pub totals: Totals,

    /// Most frequently traded items inside the region
    pub top_items: Vec<ItemCount>,

    /// Share of all transactions, 0.0 when the table is empty
    pub pct_of_all_transactions: f64,

    /// Share of all revenue, 0.0 when total revenue is zero
    pub pct_of_all_revenue: f64,
}

/// How points past the last grid edge are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Points at or beyond the final edge are not binned
    #[default]
    Drop,

    /// The final edge opens one more bin reaching the observed maximum
    Clamp,
}

/// Observed coordinate range of the table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialBounds {
    pub min: Point3,
    pub max: Point3,
}

/// One occupied grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotZone {
    /// Bin index along x, y and z
    pub index: [u32; 3],

    /// Inclusive lower corner
    pub min_corner: Point3,

    /// Exclusive upper corner
    pub max_corner: Point3,

    pub count: u64,
}

/// Result of the spatial hot-zone search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotZoneReport {
    pub cell_size: f64,
    pub edge_policy: EdgePolicy,

    /// `None` for an empty table
    pub bounds: Option<SpatialBounds>,

    /// Number of distinct occupied cells
    pub occupied_cells: usize,

    /// Transactions assigned to some cell
    pub binned: u64,

    /// Transactions outside the binned range
    pub dropped: u64,

    /// Busiest cells, descending by count
    pub cells: Vec<HotZone>,
}

/// Combined activity score for one participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,

    /// `buyer_score + seller_score`
    pub score: f64,

    /// Price sum plus transaction count as buyer
    pub buyer_score: f64,

    /// Price sum plus transaction count as seller
    pub seller_score: f64,
}

/// Top-level report structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Schema version for compatibility checking
    pub version: String,

    /// Input file the report was computed from
    pub source: String,

    /// Timestamp when report was generated
    pub generated_at: String,

    /// Whole-table totals
    pub overview: Totals,

    /// First rows of the table
    pub preview: Vec<Transaction>,

    pub user_stats: Vec<RollupRow>,
    pub item_stats: Vec<RollupRow>,
    pub time_series: Vec<MonthBucket>,
    pub regions: Vec<RegionSummary>,
    pub hot_zones: HotZoneReport,
    pub ranking: Vec<RankingEntry>,
}
