//! Plain-text report rendering for the terminal.

use crate::parser::schema::{Report, RollupRow, Totals};

const RULE_WIDTH: usize = 78;

/// Render a report as fixed-width text tables
///
/// **Public** - used by `analyze --summary`
///
/// # Arguments
/// * `report` - Report to render
/// * `max_rows` - Row limit for the user, item and ranking tables
pub fn render_summary(report: &Report, max_rows: usize) -> String {
    let mut lines = Vec::new();

    lines.push("=".repeat(RULE_WIDTH));
    lines.push(format!("MARKETPLACE SUMMARY  ({})", report.source));
    lines.push("=".repeat(RULE_WIDTH));

    lines.push(String::new());
    lines.push("  OVERVIEW".to_string());
    lines.push(format!("    Total Transactions: {}", report.overview.transactions));
    lines.push(format!("    Total Items Bought: {}", report.overview.quantity));
    lines.push(format!("    Total Amount Spent: {:.2}", report.overview.price));

    push_rollup(&mut lines, "USER STATISTICS", "User", &report.user_stats, max_rows);
    push_rollup(&mut lines, "ITEM STATISTICS", "Item", &report.item_stats, max_rows);

    lines.push(String::new());
    lines.push("  MONTHLY ACTIVITY".to_string());
    push_totals_header(&mut lines, "Month");
    for bucket in &report.time_series {
        push_totals_row(&mut lines, &bucket.month.format("%Y-%m").to_string(), &bucket.totals);
    }

    lines.push(String::new());
    lines.push("  REGIONS".to_string());
    for region in &report.regions {
        lines.push(format!("    {}", region.name));
        lines.push(format!("      Transactions:  {}", region.totals.transactions));
        lines.push(format!("      Items bought:  {}", region.totals.quantity));
        lines.push(format!("      Amount spent:  {:.2}", region.totals.price));
        let items: Vec<String> = region
            .top_items
            .iter()
            .map(|i| format!("{} ({})", i.item_name, i.count))
            .collect();
        lines.push(format!("      Popular items: {}", items.join(", ")));
        lines.push(format!(
            "      Share:         {:.2}% of transactions, {:.2}% of revenue",
            region.pct_of_all_transactions, region.pct_of_all_revenue
        ));
    }

    let zones = &report.hot_zones;
    lines.push(String::new());
    lines.push(format!(
        "  HOT ZONES  (cell {} units, {} occupied, {} not binned)",
        zones.cell_size, zones.occupied_cells, zones.dropped
    ));
    for zone in &zones.cells {
        lines.push(format!(
            "    [{:>8.1}, {:>8.1}) x [{:>8.1}, {:>8.1}) x [{:>8.1}, {:>8.1})  {:>6}",
            zone.min_corner.x,
            zone.max_corner.x,
            zone.min_corner.y,
            zone.max_corner.y,
            zone.min_corner.z,
            zone.max_corner.z,
            zone.count
        ));
    }

    lines.push(String::new());
    lines.push("  PLAYER RANKING".to_string());
    for (rank, entry) in report.ranking.iter().take(max_rows).enumerate() {
        lines.push(format!(
            "    {:>3}. {:<32} {:>14.2}",
            rank + 1,
            truncate(&entry.name, 32),
            entry.score
        ));
    }

    lines.push("=".repeat(RULE_WIDTH));
    lines.join("\n")
}

fn push_rollup(lines: &mut Vec<String>, title: &str, label: &str, rows: &[RollupRow], max_rows: usize) {
    lines.push(String::new());
    lines.push(format!("  {}", title));
    push_totals_header(lines, label);

    // Busiest groups first for display
    let mut sorted: Vec<&RollupRow> = rows.iter().collect();
    sorted.sort_by(|a, b| b.totals.transactions.cmp(&a.totals.transactions));

    for row in sorted.into_iter().take(max_rows) {
        push_totals_row(lines, row.key.as_deref().unwrap_or("(none)"), &row.totals);
    }
}

fn push_totals_header(lines: &mut Vec<String>, label: &str) {
    lines.push(format!(
        "    {:<32} {:>12} {:>12} {:>14}",
        label, "Transactions", "Quantity", "Amount"
    ));
}

fn push_totals_row(lines: &mut Vec<String>, key: &str, totals: &Totals) {
    lines.push(format!(
        "    {:<32} {:>12} {:>12} {:>14.2}",
        truncate(key, 32),
        totals.transactions,
        totals.quantity,
        totals.price
    ));
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let head: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
