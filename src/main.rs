//! Market Atlas CLI
//!
//! Analyzes a marketplace transaction log and writes a JSON report with
//! rollups, monthly trends, region shares, hot zones and player rankings.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use market_atlas::commands::{
    display_schema, display_version, execute_analyze, validate_args, validate_report_file,
    AnalyzeArgs,
};
use market_atlas::parser::schema::EdgePolicy;
use market_atlas::utils::config::{DEFAULT_CELL_SIZE, DEFAULT_TOP_ITEMS, DEFAULT_TOP_ZONES};

/// Market Atlas - analytics for marketplace transaction logs
#[derive(Parser, Debug)]
#[command(name = "market-atlas")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a transaction CSV
    Analyze {
        /// Transaction CSV file
        #[arg(short, long, env = "MARKET_ATLAS_INPUT")]
        input: PathBuf,

        /// TOML file listing named regions
        #[arg(short, long, env = "MARKET_ATLAS_REGIONS")]
        regions: Option<PathBuf>,

        /// Output path for JSON report
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Edge length of hot-zone cells in world units
        #[arg(long, default_value_t = DEFAULT_CELL_SIZE)]
        cell_size: f64,

        /// Number of hot zones to report
        #[arg(long, default_value_t = DEFAULT_TOP_ZONES)]
        top_zones: usize,

        /// Number of popular items listed per region
        #[arg(long, default_value_t = DEFAULT_TOP_ITEMS)]
        top_items: usize,

        /// Bin points past the last grid edge into a final cell instead of dropping them
        #[arg(long)]
        clamp_edges: bool,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Rows per summary table
        #[arg(long, default_value = "10")]
        rows: usize,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Analyze {
            input,
            regions,
            output,
            cell_size,
            top_zones,
            top_items,
            clamp_edges,
            summary,
            rows,
        } => {
            let args = AnalyzeArgs {
                input,
                regions,
                output_json: output,
                cell_size,
                top_zones,
                top_items,
                edge_policy: if clamp_edges {
                    EdgePolicy::Clamp
                } else {
                    EdgePolicy::Drop
                },
                print_summary: summary,
                summary_rows: rows,
            };

            validate_args(&args)?;
            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
