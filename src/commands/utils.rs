use anyhow::{Context, Result};
use std::path::PathBuf;
use crate::output::read_report;
use crate::utils::config::{REQUIRED_COLUMNS, SCHEMA_VERSION};

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)
        .with_context(|| format!("Failed to read report {}", file_path.display()))?;

    if report.version != SCHEMA_VERSION {
        anyhow::bail!(
            "Unsupported report version {} (expected {})",
            report.version,
            SCHEMA_VERSION
        );
    }

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Source: {}", report.source);
    println!("  Transactions: {}", report.overview.transactions);
    println!("  Months: {}", report.time_series.len());
    println!("  Regions: {}", report.regions.len());
    println!("  Hot Zones: {}", report.hot_zones.cells.len());
    println!("  Ranked Players: {}", report.ranking.len());

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Market Atlas Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!("Input Columns: {}", REQUIRED_COLUMNS.join(", "));
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string            - Schema version (e.g., '1.0.0')");
        println!("  source: string             - Input file");
        println!("  generated_at: string       - ISO 8601 timestamp");
        println!("  overview: totals           - transactions, quantity, price");
        println!("  preview: array             - First rows of the table");
        println!("  user_stats: array          - Totals per username (key null = empty)");
        println!("  item_stats: array          - Totals per item_name");
        println!("  time_series: array         - Totals per calendar month");
        println!("  regions: array             - Per-region totals and shares");
        println!("    top_items: array         - Most popular items in region");
        println!("    pct_of_all_transactions  - Share of all transactions");
        println!("    pct_of_all_revenue       - Share of all revenue");
        println!("  hot_zones: object          - Busiest grid cells");
        println!("    cells: array             - index, min_corner, max_corner, count");
        println!("  ranking: array             - name, score, buyer_score, seller_score");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Market Atlas v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Aggregate, time-series and spatial analytics for marketplace transaction logs.");
}
