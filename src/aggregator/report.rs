//! Run every transformation over one table and assemble the report.

use super::hotzone::{find_hot_zones, HotZoneConfig};
use super::ranking::rank_players;
use super::region::{summarize_regions, RegionSet};
use super::rollup::{overview, rollup, GroupColumn};
use super::timeseries::monthly_series;
use crate::parser::schema::{Report, Transaction};
use crate::utils::config::{DEFAULT_TOP_ITEMS, PREVIEW_ROWS, SCHEMA_VERSION};
use crate::utils::error::ConfigError;
use chrono::Utc;
use log::info;

/// Static configuration shared by one analysis run
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    pub regions: RegionSet,
    pub hot_zones: HotZoneConfig,

    /// Items listed per region, `DEFAULT_TOP_ITEMS` when zero
    pub top_items: usize,
}

/// Compute every derived table from the transaction table
///
/// **Public** - main entry point for the engine
///
/// # Arguments
/// * `table` - Immutable transaction table
/// * `config` - Regions and hot-zone parameters
/// * `source` - Label of the input, recorded in the report
///
/// # Errors
/// * `ConfigError::InvalidCellSize` - Hot-zone cell size is not a positive finite number
pub fn analyze(
    table: &[Transaction],
    config: &AnalysisConfig,
    source: &str,
) -> Result<Report, ConfigError> {
    config.hot_zones.validate()?;

    let top_items = if config.top_items == 0 {
        DEFAULT_TOP_ITEMS
    } else {
        config.top_items
    };

    let overview = overview(table);
    info!(
        "Overview: {} transactions, {} items, {:.2} spent",
        overview.transactions, overview.quantity, overview.price
    );

    Ok(Report {
        version: SCHEMA_VERSION.to_string(),
        source: source.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        overview,
        preview: table.iter().take(PREVIEW_ROWS).cloned().collect(),
        user_stats: rollup(table, GroupColumn::Username),
        item_stats: rollup(table, GroupColumn::ItemName),
        time_series: monthly_series(table),
        regions: summarize_regions(table, &config.regions, top_items),
        hot_zones: find_hot_zones(table, &config.hot_zones)?,
        ranking: rank_players(table),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::test_support::tx;

    #[test]
    fn test_analyze_rejects_invalid_cell_size() {
        let table = vec![tx("2023-01-05", Some("alice"), None, "apple", 1, 1.0, [0.0; 3])];
        let config = AnalysisConfig {
            hot_zones: HotZoneConfig {
                cell_size: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(matches!(
            analyze(&table, &config, "bad.csv"),
            Err(ConfigError::InvalidCellSize(_))
        ));
    }
}
