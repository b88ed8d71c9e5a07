//! Configuration and constants for the CLI.

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Edge length of a hot-zone grid cell, in world-space units
pub const DEFAULT_CELL_SIZE: f64 = 50.0;

/// Number of hot-zone cells kept in the report
pub const DEFAULT_TOP_ZONES: usize = 10;

/// Number of most popular items listed per region
pub const DEFAULT_TOP_ITEMS: usize = 5;

/// Rows copied into the report's data preview
pub const PREVIEW_ROWS: usize = 5;

/// Upper bound for any user-supplied top-N value
pub const MAX_TOP_N: usize = 1000;

// Columns the transaction table must carry (extra columns are ignored)
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "timestamp",
    "username",
    "seller",
    "action",
    "item_name",
    "quantity",
    "price",
    "x",
    "y",
    "z",
];

// Accepted timestamp layouts, tried in order after RFC 3339
pub const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
