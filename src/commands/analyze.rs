//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Loads region configuration
//! 2. Loads the transaction table
//! 3. Runs every aggregation over the table
//! 4. Writes the JSON report
//! 5. Optionally prints a text summary

use crate::aggregator::{analyze, load_regions, AnalysisConfig, HotZoneConfig, RegionSet};
use crate::output::{render_summary, write_report};
use crate::parser::load_transactions;
use crate::parser::schema::EdgePolicy;
use crate::utils::config::{
    DEFAULT_CELL_SIZE, DEFAULT_TOP_ITEMS, DEFAULT_TOP_ZONES, MAX_TOP_N,
};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Transaction CSV to analyze
    pub input: PathBuf,

    /// TOML region list (built-in defaults when absent)
    pub regions: Option<PathBuf>,

    /// Output path for the JSON report
    pub output_json: PathBuf,

    /// Hot-zone cell edge length
    pub cell_size: f64,

    /// Number of hot zones to report
    pub top_zones: usize,

    /// Number of popular items per region
    pub top_items: usize,

    pub edge_policy: EdgePolicy,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Row limit for summary tables
    pub summary_rows: usize,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("transactions.csv"),
            regions: None,
            output_json: PathBuf::from("report.json"),
            cell_size: DEFAULT_CELL_SIZE,
            top_zones: DEFAULT_TOP_ZONES,
            top_items: DEFAULT_TOP_ITEMS,
            edge_policy: EdgePolicy::Drop,
            print_summary: false,
            summary_rows: 10,
        }
    }
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Region configuration errors (unreadable, invalid TOML, inverted boxes)
/// * Malformed transaction table
/// * File write errors
///
/// Any failure aborts the run before a report is written.
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Starting analysis of: {}", args.input.display());

    // Step 1: Regions
    info!("Step 1/4: Loading region configuration...");
    let regions = match &args.regions {
        Some(path) => load_regions(path)
            .with_context(|| format!("Failed to load regions from {}", path.display()))?,
        None => {
            debug!("No region file given, using built-in regions");
            RegionSet::default()
        }
    };

    let hot_zones = HotZoneConfig {
        cell_size: args.cell_size,
        top_n: args.top_zones,
        edge_policy: args.edge_policy,
    };
    hot_zones.validate().context("Invalid hot-zone configuration")?;

    let config = AnalysisConfig {
        regions,
        hot_zones,
        top_items: args.top_items,
    };

    // Step 2: Load
    info!("Step 2/4: Loading transactions...");
    let table = load_transactions(&args.input)
        .with_context(|| format!("Failed to load transactions from {}", args.input.display()))?;

    // Step 3: Aggregate
    info!("Step 3/4: Aggregating {} transactions...", table.len());
    let report = analyze(&table, &config, &args.input.display().to_string())
        .context("Invalid analysis configuration")?;

    debug!("Top 3 hot zones:");
    for (i, zone) in report.hot_zones.cells.iter().take(3).enumerate() {
        debug!("  {}. cell {:?}: {} transactions", i + 1, zone.index, zone.count);
    }

    // Step 4: Write
    info!("Step 4/4: Writing report...");
    write_report(&report, &args.output_json).context("Failed to write report JSON")?;

    info!("✓ Report written to: {}", args.output_json.display());

    if args.print_summary {
        println!("\n{}", render_summary(&report, args.summary_rows));
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if args.output_json.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    if !args.cell_size.is_finite() || args.cell_size <= 0.0 {
        anyhow::bail!("cell_size must be a positive number");
    }

    if args.top_zones == 0 {
        anyhow::bail!("top_zones must be greater than 0");
    }

    if args.top_zones > MAX_TOP_N || args.top_items > MAX_TOP_N {
        anyhow::bail!("top-N values are too large (max {})", MAX_TOP_N);
    }

    if args.top_items == 0 {
        anyhow::bail!("top_items must be greater than 0");
    }

    Ok(())
}
