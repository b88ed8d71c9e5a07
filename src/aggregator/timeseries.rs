//! Calendar-month time series.
//!
//! Months without any activity are not synthesised; gaps in the data stay
//! gaps in the series.

use crate::parser::schema::{MonthBucket, Totals, Transaction};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use log::debug;
use std::collections::BTreeMap;

/// First day of the calendar month containing `timestamp`
pub fn month_start(timestamp: &NaiveDateTime) -> NaiveDate {
    // Day 1 exists in every month
    timestamp.date().with_day(1).unwrap_or_else(|| timestamp.date())
}

/// Bucket transactions by calendar month
///
/// **Public** - main entry point for time-series analysis
///
/// # Returns
/// One bucket per month present in the table, in chronological order
pub fn monthly_series(table: &[Transaction]) -> Vec<MonthBucket> {
    let mut months: BTreeMap<NaiveDate, Totals> = BTreeMap::new();

    for tx in table {
        months.entry(month_start(&tx.timestamp)).or_default().record(tx);
    }

    debug!("Time series spans {} months", months.len());

    months
        .into_iter()
        .map(|(month, totals)| MonthBucket { month, totals })
        .collect()
}
