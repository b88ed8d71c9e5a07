//! Spatial hot-zone detection on a uniform 3D grid.
//!
//! The grid starts at the observed minimum of each axis and steps by a fixed
//! cell size. Edges are placed strictly below the observed maximum, so with
//! `EdgePolicy::Drop` points at or past the last edge fall outside every
//! cell. `EdgePolicy::Clamp` opens one more cell at the last edge instead.
//! Only occupied cells are ever materialised.

use crate::parser::schema::{EdgePolicy, HotZone, HotZoneReport, Point3, SpatialBounds, Transaction};
use crate::utils::config::{DEFAULT_CELL_SIZE, DEFAULT_TOP_ZONES};
use crate::utils::error::ConfigError;
use log::{debug, warn};
use std::collections::BTreeMap;

/// Hot-zone search parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HotZoneConfig {
    /// Edge length of a cubic cell
    pub cell_size: f64,

    /// Number of cells to report
    pub top_n: usize,

    pub edge_policy: EdgePolicy,
}

impl Default for HotZoneConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            top_n: DEFAULT_TOP_ZONES,
            edge_policy: EdgePolicy::Drop,
        }
    }
}

impl HotZoneConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_cell_size(self.cell_size)
    }
}

fn check_cell_size(cell_size: f64) -> Result<(), ConfigError> {
    if !cell_size.is_finite() || cell_size <= 0.0 {
        return Err(ConfigError::InvalidCellSize(cell_size));
    }
    Ok(())
}

/// Bin layout along one axis
#[derive(Debug, Clone, Copy)]
struct AxisBins {
    origin: f64,
    cell_size: f64,

    /// Number of usable bins along this axis
    bins: u32,
}

impl AxisBins {
    fn new(min: f64, max: f64, cell_size: f64, policy: EdgePolicy) -> Self {
        // Edges are min, min + s, ... strictly below max
        let edges = if max > min {
            ((max - min) / cell_size).ceil() as u32
        } else {
            0
        };

        let bins = match policy {
            EdgePolicy::Drop => edges.saturating_sub(1),
            EdgePolicy::Clamp => edges.max(1),
        };

        Self {
            origin: min,
            cell_size,
            bins,
        }
    }

    fn bin(&self, coord: f64, policy: EdgePolicy) -> Option<u32> {
        if self.bins == 0 {
            return None;
        }

        let raw = ((coord - self.origin) / self.cell_size).floor();
        if raw < 0.0 {
            return None;
        }

        let last = self.bins - 1;
        match policy {
            EdgePolicy::Drop if raw > last as f64 => None,
            EdgePolicy::Drop => Some(raw as u32),
            EdgePolicy::Clamp => Some((raw as u32).min(last)),
        }
    }

    fn lower_edge(&self, index: u32) -> f64 {
        self.origin + index as f64 * self.cell_size
    }
}

/// Grid covering the observed extent of a table
#[derive(Debug, Clone, Copy)]
struct Grid {
    axes: [AxisBins; 3],
    policy: EdgePolicy,
}

impl Grid {
    fn new(bounds: &SpatialBounds, cell_size: f64, policy: EdgePolicy) -> Self {
        let mins = bounds.min.axes();
        let maxs = bounds.max.axes();
        let axis = |i: usize| AxisBins::new(mins[i], maxs[i], cell_size, policy);

        Self {
            axes: [axis(0), axis(1), axis(2)],
            policy,
        }
    }

    fn cell_of(&self, point: &Point3) -> Option<[u32; 3]> {
        let coords = point.axes();
        Some([
            self.axes[0].bin(coords[0], self.policy)?,
            self.axes[1].bin(coords[1], self.policy)?,
            self.axes[2].bin(coords[2], self.policy)?,
        ])
    }

    fn corners(&self, index: [u32; 3]) -> (Point3, Point3) {
        let lower = |i: usize| self.axes[i].lower_edge(index[i]);
        let upper = |i: usize| self.axes[i].lower_edge(index[i] + 1);

        (
            Point3::new(lower(0), lower(1), lower(2)),
            Point3::new(upper(0), upper(1), upper(2)),
        )
    }
}

/// Sparse cell counts for a whole table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellCounts {
    /// Count per occupied cell, keyed by (x, y, z) bin index
    pub cells: BTreeMap<[u32; 3], u64>,

    /// Rows outside every cell
    pub dropped: u64,
}

impl CellCounts {
    pub fn binned(&self) -> u64 {
        self.cells.values().sum()
    }
}

/// Observed coordinate range, `None` for an empty table
pub fn spatial_bounds(table: &[Transaction]) -> Option<SpatialBounds> {
    let first = table.first()?.position();

    let bounds = table.iter().skip(1).fold(
        SpatialBounds {
            min: first,
            max: first,
        },
        |acc, tx| SpatialBounds {
            min: Point3::new(acc.min.x.min(tx.x), acc.min.y.min(tx.y), acc.min.z.min(tx.z)),
            max: Point3::new(acc.max.x.max(tx.x), acc.max.y.max(tx.y), acc.max.z.max(tx.z)),
        },
    );

    Some(bounds)
}

/// Count transactions in every occupied cell
///
/// **Public** - exposes the full sparse grid, not just the top cells
///
/// # Errors
/// * `ConfigError::InvalidCellSize` - Cell size is zero, negative or not finite
pub fn occupied_cells(
    table: &[Transaction],
    cell_size: f64,
    policy: EdgePolicy,
) -> Result<CellCounts, ConfigError> {
    check_cell_size(cell_size)?;

    let Some(bounds) = spatial_bounds(table) else {
        return Ok(CellCounts::default());
    };

    let grid = Grid::new(&bounds, cell_size, policy);
    let mut counts = CellCounts::default();

    for tx in table {
        match grid.cell_of(&tx.position()) {
            Some(index) => *counts.cells.entry(index).or_insert(0) += 1,
            None => counts.dropped += 1,
        }
    }

    Ok(counts)
}

/// Find the busiest grid cells
///
/// **Public** - main entry point for hot-zone analysis
///
/// # Arguments
/// * `table` - Transaction table
/// * `config` - Cell size, number of cells and edge policy
///
/// # Returns
/// Report with the top cells sorted by count (descending), ties by bin index
///
/// # Errors
/// * `ConfigError::InvalidCellSize` - Cell size is zero, negative or not finite
pub fn find_hot_zones(
    table: &[Transaction],
    config: &HotZoneConfig,
) -> Result<HotZoneReport, ConfigError> {
    let counts = occupied_cells(table, config.cell_size, config.edge_policy)?;
    let bounds = spatial_bounds(table);

    if counts.dropped > 0 {
        warn!(
            "{} transactions fall outside the {:?} grid and are not binned",
            counts.dropped, config.edge_policy
        );
    }

    let grid = bounds.map(|b| Grid::new(&b, config.cell_size, config.edge_policy));

    let mut ranked: Vec<([u32; 3], u64)> = counts.cells.iter().map(|(k, v)| (*k, *v)).collect();
    // BTreeMap order is by index; stable sort keeps it for equal counts
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let cells = match grid {
        Some(grid) => ranked
            .into_iter()
            .take(config.top_n)
            .map(|(index, count)| {
                let (min_corner, max_corner) = grid.corners(index);
                HotZone {
                    index,
                    min_corner,
                    max_corner,
                    count,
                }
            })
            .collect(),
        None => Vec::new(),
    };

    debug!(
        "Hot zones: {} occupied cells, {} binned, {} dropped",
        counts.cells.len(),
        counts.binned(),
        counts.dropped
    );

    Ok(HotZoneReport {
        cell_size: config.cell_size,
        edge_policy: config.edge_policy,
        bounds,
        occupied_cells: counts.cells.len(),
        binned: counts.binned(),
        dropped: counts.dropped,
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::test_support::tx;

    fn at(x: f64, y: f64, z: f64) -> Transaction {
        tx("2023-01-01", Some("a"), None, "stone", 1, 1.0, [x, y, z])
    }

    #[test]
    fn test_axis_edges_stop_below_max() {
        // Edges at 0, 50 (100 is not below max); one bin [0, 50)
        let axis = AxisBins::new(0.0, 100.0, 50.0, EdgePolicy::Drop);

        assert_eq!(axis.bins, 1);
        assert_eq!(axis.bin(0.0, EdgePolicy::Drop), Some(0));
        assert_eq!(axis.bin(49.9, EdgePolicy::Drop), Some(0));
        assert_eq!(axis.bin(50.0, EdgePolicy::Drop), None);
        assert_eq!(axis.bin(100.0, EdgePolicy::Drop), None);
    }

    #[test]
    fn test_clamp_opens_last_bin() {
        let axis = AxisBins::new(0.0, 100.0, 50.0, EdgePolicy::Clamp);

        assert_eq!(axis.bins, 2);
        assert_eq!(axis.bin(50.0, EdgePolicy::Clamp), Some(1));
        assert_eq!(axis.bin(100.0, EdgePolicy::Clamp), Some(1));
    }

    #[test]
    fn test_flat_axis() {
        assert_eq!(AxisBins::new(5.0, 5.0, 50.0, EdgePolicy::Drop).bins, 0);
        assert_eq!(AxisBins::new(5.0, 5.0, 50.0, EdgePolicy::Clamp).bins, 1);
    }

    #[test]
    fn test_drop_policy_loses_max_points() {
        let table = vec![
            at(0.0, 0.0, 0.0),
            at(10.0, 10.0, 10.0),
            at(60.0, 60.0, 60.0),
            at(150.0, 150.0, 150.0),
        ];

        let report = find_hot_zones(&table, &HotZoneConfig::default()).unwrap();

        // Edges 0, 50, 100: bins [0,50) and [50,100)
        assert_eq!(report.dropped, 1);
        assert_eq!(report.binned, 3);
        assert_eq!(report.cells[0].index, [0, 0, 0]);
        assert_eq!(report.cells[0].count, 2);
        assert_eq!(report.cells[1].index, [1, 1, 1]);
        assert_eq!(report.cells[1].min_corner, Point3::new(50.0, 50.0, 50.0));
        assert_eq!(report.cells[1].max_corner, Point3::new(100.0, 100.0, 100.0));
    }

    #[test]
    fn test_clamp_policy_bins_everything() {
        let table = vec![at(0.0, 0.0, 0.0), at(150.0, 150.0, 150.0), at(150.0, 0.0, 0.0)];
        let config = HotZoneConfig {
            edge_policy: EdgePolicy::Clamp,
            ..Default::default()
        };

        let counts = occupied_cells(&table, config.cell_size, config.edge_policy).unwrap();

        assert_eq!(counts.dropped, 0);
        assert_eq!(counts.binned(), 3);
        assert_eq!(counts.cells.get(&[2, 2, 2]), Some(&1));
        assert_eq!(counts.cells.get(&[2, 0, 0]), Some(&1));
    }

    #[test]
    fn test_top_n_and_tie_order() {
        let mut table = Vec::new();
        for i in 0..12 {
            table.push(at(i as f64 * 50.0, 0.0, 0.0));
        }
        // Extend every axis so the last x bin is not dropped
        table.push(at(1000.0, 1000.0, 1000.0));
        table.push(at(100.0, 0.0, 0.0));

        let report = find_hot_zones(&table, &HotZoneConfig::default()).unwrap();

        assert_eq!(report.cells.len(), 10);
        assert_eq!(report.cells[0].index, [2, 0, 0]);
        assert_eq!(report.cells[0].count, 2);
        // Equal counts come out in index order
        assert_eq!(report.cells[1].index, [0, 0, 0]);
        assert_eq!(report.cells[2].index, [1, 0, 0]);
    }

    #[test]
    fn test_empty_table() {
        let report = find_hot_zones(&[], &HotZoneConfig::default()).unwrap();

        assert!(report.bounds.is_none());
        assert!(report.cells.is_empty());
        assert_eq!(report.binned + report.dropped, 0);
    }

    #[test]
    fn test_invalid_cell_size() {
        for size in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let config = HotZoneConfig {
                cell_size: size,
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_find_hot_zones_rejects_zero_cell_size() {
        let table = vec![at(0.0, 0.0, 0.0), at(10.0, 10.0, 10.0)];
        let config = HotZoneConfig {
            cell_size: 0.0,
            ..Default::default()
        };

        let err = find_hot_zones(&table, &config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCellSize(size) if size == 0.0));
        assert!(occupied_cells(&table, f64::NAN, EdgePolicy::Clamp).is_err());
    }
}
