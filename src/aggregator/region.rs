//! Named bounding-box regions and per-region summaries.
//!
//! Regions are loaded from TOML and validated once at startup:
//!
//! ```toml
//! [[regions]]
//! name = "Government Mall"
//! min_point = { x = 324, y = -62, z = 762 }
//! max_point = { x = 403, y = 319, z = 926 }
//! ```

use crate::parser::schema::{ItemCount, Point3, RegionSummary, Totals, Transaction};
use crate::utils::error::ConfigError;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Axis-aligned bounding box with a display name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub min_point: Point3,
    pub max_point: Point3,
}

impl Region {
    pub fn new(name: impl Into<String>, min_point: Point3, max_point: Point3) -> Self {
        Self {
            name: name.into(),
            min_point,
            max_point,
        }
    }

    /// Inclusive containment test on all three axes
    pub fn contains(&self, point: &Point3) -> bool {
        (self.min_point.x..=self.max_point.x).contains(&point.x)
            && (self.min_point.y..=self.max_point.y).contains(&point.y)
            && (self.min_point.z..=self.max_point.z).contains(&point.z)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyRegionName);
        }

        let mins = self.min_point.axes();
        let maxs = self.max_point.axes();

        if mins.iter().chain(maxs.iter()).any(|c| !c.is_finite()) {
            return Err(ConfigError::NonFiniteBounds(self.name.clone()));
        }

        for ((axis, min), max) in ['x', 'y', 'z'].into_iter().zip(mins).zip(maxs) {
            if min > max {
                return Err(ConfigError::InvertedBounds {
                    region: self.name.clone(),
                    axis,
                    min,
                    max,
                });
            }
        }

        Ok(())
    }
}

/// Validated, ordered list of regions
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSet {
    regions: Vec<Region>,
}

impl RegionSet {
    /// Validate and wrap a list of regions
    ///
    /// # Errors
    /// * `ConfigError::InvertedBounds` - `min_point` exceeds `max_point` on some axis
    /// * `ConfigError::DuplicateRegion` - Two regions share a name
    /// * `ConfigError::EmptyRegionName` / `ConfigError::NonFiniteBounds`
    pub fn new(regions: Vec<Region>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();

        for region in &regions {
            region.validate()?;
            if !seen.insert(region.name.as_str()) {
                return Err(ConfigError::DuplicateRegion(region.name.clone()));
            }
        }

        Ok(Self { regions })
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl Default for RegionSet {
    /// The government mall, the one region known before any configuration
    fn default() -> Self {
        Self {
            regions: vec![Region::new(
                "Government Mall",
                Point3::new(324.0, -62.0, 762.0),
                Point3::new(403.0, 319.0, 926.0),
            )],
        }
    }
}

/// On-disk layout of a region file
#[derive(Debug, Deserialize)]
struct RegionFile {
    #[serde(default)]
    regions: Vec<Region>,
}

/// Parse and validate regions from TOML text
pub fn parse_regions(contents: &str) -> Result<RegionSet, ConfigError> {
    let file: RegionFile = toml::from_str(contents)?;
    RegionSet::new(file.regions)
}

/// Load regions from a TOML file
///
/// # Arguments
/// * `path` - Path to the TOML region list
///
/// # Errors
/// * `ConfigError::Io` - If file cannot be read
/// * `ConfigError::TomlParse` - If TOML is invalid
/// * Any validation error from `RegionSet::new`
///
/// # Example
/// ```ignore
/// let regions = load_regions("regions.toml")?;
/// ```
pub fn load_regions(path: impl AsRef<Path>) -> Result<RegionSet, ConfigError> {
    let path = path.as_ref();
    debug!("Reading regions from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    let regions = parse_regions(&contents)?;

    info!("Loaded {} regions from {}", regions.len(), path.display());
    Ok(regions)
}

/// `100 * part / whole`, or 0.0 when the whole is zero
pub(crate) fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        (part / whole) * 100.0
    } else {
        0.0
    }
}

/// Summarise activity inside each region
///
/// **Public** - main entry point for region analysis
///
/// # Arguments
/// * `table` - Transaction table
/// * `regions` - Validated region list
/// * `top_items` - Number of most popular items to list per region
///
/// # Returns
/// One summary per region, in configuration order. Regions may overlap;
/// each is evaluated on its own.
pub fn summarize_regions(
    table: &[Transaction],
    regions: &RegionSet,
    top_items: usize,
) -> Vec<RegionSummary> {
    let whole = Totals::from_rows(table);

    if whole.transactions == 0 || whole.price == 0.0 {
        warn!(
            "Whole-table totals are zero ({} rows, {} revenue); region percentages reported as 0",
            whole.transactions, whole.price
        );
    }

    regions
        .regions()
        .iter()
        .map(|region| summarize_region(table, region, &whole, top_items))
        .collect()
}

/// Summarise one region against the whole-table totals
///
/// **Private** - internal helper for summarize_regions
fn summarize_region(
    table: &[Transaction],
    region: &Region,
    whole: &Totals,
    top_items: usize,
) -> RegionSummary {
    let matched: Vec<&Transaction> = table
        .iter()
        .filter(|tx| region.contains(&tx.position()))
        .collect();

    let totals = Totals::from_rows(matched.iter().copied());

    debug!("Region '{}' matched {} transactions", region.name, totals.transactions);

    RegionSummary {
        name: region.name.clone(),
        totals,
        top_items: most_common_items(&matched, top_items),
        pct_of_all_transactions: percentage(
            totals.transactions as f64,
            whole.transactions as f64,
        ),
        pct_of_all_revenue: percentage(totals.price, whole.price),
    }
}

/// Most frequent item names, ties in first-seen order
///
/// **Public** - also useful for whole-table item popularity
pub fn most_common_items(rows: &[&Transaction], top_n: usize) -> Vec<ItemCount> {
    let mut order: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<ItemCount> = Vec::new();

    for item in rows.iter().filter_map(|tx| tx.item_name.as_deref()) {
        match order.get(item) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                order.insert(item, counts.len());
                counts.push(ItemCount {
                    item_name: item.to_string(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(top_n);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::test_support::tx;

    fn unit_box() -> Region {
        Region::new("box", Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 10.0))
    }

    #[test]
    fn test_contains_is_inclusive() {
        let region = unit_box();

        assert!(region.contains(&Point3::new(0.0, 0.0, 0.0)));
        assert!(region.contains(&Point3::new(10.0, 10.0, 10.0)));
        assert!(region.contains(&Point3::new(5.0, 10.0, 0.0)));
    }

    #[test]
    fn test_contains_rejects_one_axis_outside() {
        let region = unit_box();

        assert!(!region.contains(&Point3::new(11.0, 5.0, 5.0)));
        assert!(!region.contains(&Point3::new(5.0, -1.0, 5.0)));
        assert!(!region.contains(&Point3::new(5.0, 5.0, 11.0)));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let region = Region::new("bad", Point3::new(0.0, 5.0, 0.0), Point3::new(1.0, 4.0, 1.0));
        let err = RegionSet::new(vec![region]).unwrap_err();

        assert!(matches!(err, ConfigError::InvertedBounds { axis: 'y', .. }));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = RegionSet::new(vec![unit_box(), unit_box()]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateRegion(_)));
    }

    #[test]
    fn test_degenerate_box_is_valid() {
        let point = Region::new("p", Point3::default(), Point3::default());
        assert!(RegionSet::new(vec![point]).is_ok());
    }

    #[test]
    fn test_parse_regions_toml() {
        let toml = r#"
            [[regions]]
            name = "Spawn"
            min_point = { x = -10, y = 0, z = -10 }
            max_point = { x = 10, y = 128, z = 10.5 }

            [[regions]]
            name = "Docks"
            min_point = { x = 500, y = 60, z = 500 }
            max_point = { x = 600, y = 70, z = 650 }
        "#;

        let regions = parse_regions(toml).unwrap();

        assert_eq!(regions.len(), 2);
        assert_eq!(regions.regions()[0].name, "Spawn");
        assert_eq!(regions.regions()[0].max_point.z, 10.5);
    }

    #[test]
    fn test_default_region_set() {
        let regions = RegionSet::default();
        assert_eq!(regions.regions()[0].name, "Government Mall");
        assert!(RegionSet::new(regions.regions().to_vec()).is_ok());
    }

    #[test]
    fn test_top_items_tie_break_first_seen() {
        let table = vec![
            tx("2023-01-01", Some("a"), None, "pear", 1, 1.0, [0.0; 3]),
            tx("2023-01-01", Some("a"), None, "apple", 1, 1.0, [0.0; 3]),
            tx("2023-01-01", Some("a"), None, "apple", 1, 1.0, [0.0; 3]),
            tx("2023-01-01", Some("a"), None, "fig", 1, 1.0, [0.0; 3]),
            tx("2023-01-01", Some("a"), None, "pear", 1, 1.0, [0.0; 3]),
            tx("2023-01-01", Some("a"), None, "kiwi", 1, 1.0, [0.0; 3]),
        ];
        let rows: Vec<&Transaction> = table.iter().collect();

        let top = most_common_items(&rows, 3);

        let names: Vec<&str> = top.iter().map(|i| i.item_name.as_str()).collect();
        assert_eq!(names, vec!["pear", "apple", "fig"]);
        assert_eq!(top[0].count, 2);
    }

    #[test]
    fn test_zero_totals_report_zero_percent() {
        let summaries = summarize_regions(&[], &RegionSet::new(vec![unit_box()]).unwrap(), 5);

        assert_eq!(summaries[0].totals, Totals::default());
        assert_eq!(summaries[0].pct_of_all_transactions, 0.0);
        assert_eq!(summaries[0].pct_of_all_revenue, 0.0);
    }

    #[test]
    fn test_free_transactions_yield_zero_revenue_share() {
        let table = vec![tx("2023-01-01", Some("a"), None, "gift", 1, 0.0, [1.0; 3])];
        let summaries = summarize_regions(&table, &RegionSet::new(vec![unit_box()]).unwrap(), 5);

        assert_eq!(summaries[0].pct_of_all_transactions, 100.0);
        assert_eq!(summaries[0].pct_of_all_revenue, 0.0);
    }
}
