//! Display and formatting utilities for Lunomax.
//!
//! This module provides functions for formatting output and displaying
//! analysis results to the user in a readable tabular format.

use crate::models::{
    AnalysisResults, ComparisonRow, GatheringRecord, ProductSummary, StrategyRecord,
};

/// Formats a material or unit amount, dropping a trailing fractional zero.
///
/// # Example
///
/// ```
/// use lunomax::display::format_amount;
///
/// assert_eq!(format_amount(120.0), "120");
/// assert_eq!(format_amount(7.5), "7.5");
/// ```
pub fn format_amount(amount: f64) -> String {
    if (amount - amount.round()).abs() < 1e-9 {
        format!("{}", amount.round() as i64)
    } else {
        format!("{:.1}", amount)
    }
}

/// Formats a Luno amount with thousands separators.
///
/// # Example
///
/// ```
/// use lunomax::display::format_luno;
///
/// assert_eq!(format_luno(1600.0), "1,600");
/// assert_eq!(format_luno(-2500.0), "-2,500");
/// ```
pub fn format_luno(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Displays the gathering-only analysis as a ranked table.
pub fn display_gathering(records: &[GatheringRecord]) {
    println!();
    println!("[ONLY GATHERING]");
    println!("----------------------------------------------------------------");

    if records.is_empty() {
        println!("  No gatherable items with known prices.");
        return;
    }

    println!(
        "{:<24} {:>10} {:>12} {:>12} {:>14}",
        "Item", "Units/Day", "Profit/Unit", "Luno/Focus", "Daily Profit"
    );
    println!("----------------------------------------------------------------");
    for record in records {
        println!(
            "{:<24} {:>10} {:>12.1} {:>12.2} {:>14}",
            record.item,
            record.units_per_day,
            record.profit_per_unit,
            record.luno_per_focus,
            format_luno(record.daily_profit)
        );
    }
}

/// Displays the best strategy per product, including the materials split
/// and the robustness classification.
pub fn display_strategies(records: &[StrategyRecord]) {
    println!();
    println!("[OPTIMAL STRATEGIES]");
    println!("----------------------------------------------------------------");

    if records.is_empty() {
        println!("  No profitable craftable products found.");
        return;
    }

    for record in records {
        println!("  {}", record.method);
        println!(
            "    Daily Profit: {} Luno    Luno/Focus: {:.1}    Crafts: {}",
            format_luno(record.daily_profit),
            record.luno_per_focus,
            record.crafted_units
        );
        println!("    Focus Allocation:  {}", record.focus_allocation);
        println!("    Materials Needed:  {}", record.total_materials);
        println!("    You Will Gather:   {}", record.you_gather);
        println!("    You Need To Buy:   {}", record.you_buy);
        println!("    Other Materials:   {}", record.other_materials);
        if let Some((sensitivity, robustness)) = &record.sensitivity {
            println!(
                "    Sensitivity: {:.1}%    Robustness: {}",
                sensitivity, robustness
            );
        }
        println!();
    }
}

/// Displays the comprehensive comparison table, limited to the top `limit`
/// strategies by daily profit.
pub fn display_comprehensive(rows: &[ComparisonRow], limit: usize) {
    println!();
    println!("[COMPREHENSIVE COMPARISON] (top {} by Daily Profit)", limit);
    println!("----------------------------------------------------------------");

    if rows.is_empty() {
        println!("  No strategies to compare.");
        return;
    }

    println!(
        "{:<36} {:<18} {:>14} {:>12}",
        "Method", "Type", "Daily Profit", "Luno/Focus"
    );
    println!("----------------------------------------------------------------");
    for row in rows.iter().take(limit) {
        println!(
            "{:<36} {:<18} {:>14} {:>12.2}",
            row.method,
            row.strategy_type,
            format_luno(row.daily_profit),
            row.luno_per_focus
        );
    }

    if rows.len() > limit {
        println!();
        println!("  Total strategies analyzed: {}", rows.len());
    }
}

/// Displays a full analysis run: gathering, optimal strategies, and the
/// comprehensive comparison.
pub fn display_full_analysis(results: &AnalysisResults) {
    println!();
    println!("+================================================================+");
    println!("|                  LUNO PROFIT ANALYSIS RESULTS                  |");
    println!("+================================================================+");

    display_gathering(&results.gathering);
    display_strategies(&results.strategies);
    display_comprehensive(&results.comprehensive, 10);
}

/// Displays the summary for one analyzed product.
pub fn display_product_summary(summary: &ProductSummary) {
    println!();
    println!("Analyzing: {}", summary.product);
    println!("================================================================");
    println!(
        "  Daily Profit (Buy All): {} Luno",
        format_luno(summary.buy_all_profit)
    );
    println!("  Crafts per day:         {}", summary.buy_all_units);
    println!("  Materials needed:       {}", summary.buy_all_materials);
    println!();
    println!("  Best Strategy:          {}", summary.strategy);
    println!(
        "  Best Daily Profit:      {} Luno ({:.1} Luno/Focus)",
        format_luno(summary.daily_profit),
        summary.efficiency
    );
}

/// Displays the list of craftable products available for analysis.
pub fn display_available_products(products: &[&str]) {
    println!();
    println!("[AVAILABLE PRODUCTS]");
    println!("------------------------------");
    for (i, product) in products.iter().enumerate() {
        println!("{}. {}", i + 1, product);
    }
    println!();
    println!("Total: {} craftable products", products.len());
}
