//! Combined player ranking.
//!
//! A role score is the price sum plus the transaction count for that role.
//! Currency and counts are deliberately added into one scalar. A player's
//! score is the sum of their buyer and seller role scores; a missing role
//! contributes 0. Rows with an empty `username` or `seller` add no
//! participant for that role.

use super::rollup::{rollup, GroupColumn};
use crate::parser::schema::{RankingEntry, Totals, Transaction};
use log::debug;
use std::collections::HashMap;

fn role_score(totals: &Totals) -> f64 {
    totals.price + totals.transactions as f64
}

/// Score per named participant for one role
fn role_scores(table: &[Transaction], column: GroupColumn) -> HashMap<String, f64> {
    rollup(table, column)
        .into_iter()
        .filter_map(|row| row.key.map(|key| (key, role_score(&row.totals))))
        .collect()
}

/// Rank every buyer and seller by combined activity
///
/// **Public** - main entry point for player ranking
///
/// # Returns
/// One entry per distinct participant, sorted by score (descending),
/// ties broken by name (ascending)
pub fn rank_players(table: &[Transaction]) -> Vec<RankingEntry> {
    let buyers = role_scores(table, GroupColumn::Username);
    let sellers = role_scores(table, GroupColumn::Seller);

    let mut entries: HashMap<&str, RankingEntry> = HashMap::new();

    for (name, score) in &buyers {
        entries
            .entry(name.as_str())
            .or_insert_with(|| empty_entry(name))
            .buyer_score = *score;
    }
    for (name, score) in &sellers {
        entries
            .entry(name.as_str())
            .or_insert_with(|| empty_entry(name))
            .seller_score = *score;
    }

    let mut ranking: Vec<RankingEntry> = entries
        .into_values()
        .map(|mut entry| {
            entry.score = entry.buyer_score + entry.seller_score;
            entry
        })
        .collect();

    ranking.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.name.cmp(&b.name)));

    debug!(
        "Ranked {} players ({} buyers, {} sellers)",
        ranking.len(),
        buyers.len(),
        sellers.len()
    );

    ranking
}

fn empty_entry(name: &str) -> RankingEntry {
    RankingEntry {
        name: name.to_string(),
        score: 0.0,
        buyer_score: 0.0,
        seller_score: 0.0,
    }
}
