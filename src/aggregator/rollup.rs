//! Per-entity rollups and whole-table totals.

use crate::parser::schema::{RollupRow, Totals, Transaction};
use log::debug;
use std::collections::BTreeMap;
use std::fmt;

/// Column a rollup groups by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupColumn {
    Username,
    ItemName,
    Seller,
}

impl GroupColumn {
    /// Key of a transaction under this column, `None` when the cell was empty
    pub fn key<'a>(&self, tx: &'a Transaction) -> Option<&'a str> {
        match self {
            GroupColumn::Username => tx.username.as_deref(),
            GroupColumn::ItemName => tx.item_name.as_deref(),
            GroupColumn::Seller => tx.seller.as_deref(),
        }
    }

    pub fn column_name(&self) -> &'static str {
        match self {
            GroupColumn::Username => "username",
            GroupColumn::ItemName => "item_name",
            GroupColumn::Seller => "seller",
        }
    }
}

impl fmt::Display for GroupColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Group transactions by a column and total each group
///
/// **Public** - main entry point for rollups
///
/// # Arguments
/// * `table` - Transaction table
/// * `column` - Grouping column
///
/// # Returns
/// One row per distinct key, sorted by key. Rows with an empty key are kept
/// together under `key: None` (sorted first), so group totals always add up
/// to the whole-table totals.
pub fn rollup(table: &[Transaction], column: GroupColumn) -> Vec<RollupRow> {
    let mut groups: BTreeMap<Option<&str>, Totals> = BTreeMap::new();

    for tx in table {
        groups.entry(column.key(tx)).or_default().record(tx);
    }

    debug!("Rollup by {}: {} groups from {} rows", column, groups.len(), table.len());

    groups
        .into_iter()
        .map(|(key, totals)| RollupRow {
            key: key.map(str::to_string),
            totals,
        })
        .collect()
}

/// Whole-table count, quantity sum and price sum
///
/// **Public** - also the denominator for region percentages
pub fn overview(table: &[Transaction]) -> Totals {
    Totals::from_rows(table)
}
