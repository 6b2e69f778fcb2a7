//! Data models and structures for Lunomax.
//!
//! This module contains all the core data structures used throughout the
//! application, including the economic data store, session mechanics,
//! allocation results, and strategy records.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Session mechanics for a gatherable or craftable item.
///
/// One session consumes exactly `focus_cost` focus points and produces
/// exactly `yield_amount` units. Focus that does not divide evenly into
/// sessions is wasted.
///
/// # Example
///
/// ```
/// use lunomax::models::Mechanics;
///
/// let ore = Mechanics { focus_cost: 10, yield_amount: 5 };
/// assert_eq!(ore.yield_amount, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mechanics {
    /// Focus points consumed per session
    pub focus_cost: u32,
    /// Units produced per session
    #[serde(rename = "yield")]
    pub yield_amount: u32,
}

/// A recipe: ingredient name mapped to quantity needed per craft yield.
pub type Recipe = IndexMap<String, f64>;

/// The economic data store: the four mappings every analysis reads from.
///
/// Loaded once per run and never mutated during an analysis. Mapping
/// iteration order is the insertion order of the source files, which is
/// what the strategy tables use to break exact profit ties.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EconomyData {
    /// Item name to unit market price in Luno. Missing entries mean the
    /// item is unpriceable.
    pub prices: IndexMap<String, f64>,
    /// Gatherable item name to its session mechanics
    pub gatherable: IndexMap<String, Mechanics>,
    /// Craftable product name to its session mechanics
    pub craftable: IndexMap<String, Mechanics>,
    /// Product name to its recipe
    pub recipes: IndexMap<String, Recipe>,
}

/// A single purchased ingredient line in an allocation breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Purchase {
    /// Ingredient name
    pub item: String,
    /// Units to buy from the market
    pub amount: f64,
}

/// Breakdown detail for one evaluated allocation, tagged by strategy method.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum AllocationDetail {
    /// The allocation could not be evaluated: missing mechanics or prices,
    /// an empty recipe, or an impossible focus split.
    Infeasible,
    /// All focus goes to crafting; every ingredient is purchased.
    BuyAll {
        /// Units crafted over the full daily budget
        crafted_units: u64,
        /// Total Luno spent on ingredients
        material_cost: f64,
        /// Per-ingredient purchase list
        purchases: Vec<Purchase>,
        /// Focus allocated to crafting
        craft_focus_used: u32,
        /// Focus allocated to gathering (always zero here)
        gather_focus_used: u32,
    },
    /// Focus split between gathering one ingredient and crafting.
    Mixed {
        /// Focus allocated to gathering, snapped to whole sessions
        gather_focus: u32,
        /// Remaining focus allocated to crafting
        craft_focus: u32,
        /// Units of the gather item produced
        gathered_units: u64,
        /// Units crafted
        crafted_units: u64,
        /// Total Luno spent on purchased ingredients
        material_cost: f64,
        /// Per-ingredient purchase list (shortfalls only)
        purchases: Vec<Purchase>,
    },
    /// The requested split underperforms the buy-all baseline, so the
    /// baseline profit is reported instead.
    BuyAllBetter {
        /// Profit the requested split would have earned
        original_profit: f64,
        /// How much the baseline improves on it
        improvement: f64,
    },
}

/// Result of evaluating one production strategy.
///
/// Immutable once created; one instance per evaluated strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    /// Daily profit in Luno. `f64::NEG_INFINITY` marks an unprofitable
    /// sentinel that must never be selected.
    pub profit: f64,
    /// Structured breakdown of the allocation
    pub detail: AllocationDetail,
}

impl Allocation {
    /// The unprofitable sentinel: negative-infinity profit, no breakdown.
    pub fn infeasible() -> Self {
        Allocation {
            profit: f64::NEG_INFINITY,
            detail: AllocationDetail::Infeasible,
        }
    }
}

/// One row of the gathering-only analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatheringRecord {
    /// The gatherable item
    pub item: String,
    /// Units produced per day with the full focus budget
    pub units_per_day: u64,
    /// Market price per unit
    pub revenue_per_unit: f64,
    /// Profit per unit (gathering has no material inputs, so this equals
    /// the market price)
    pub profit_per_unit: f64,
    /// Profit per focus point spent
    pub luno_per_focus: f64,
    /// Total daily profit
    pub daily_profit: f64,
}

/// Which production strategy a record represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyKind {
    /// Craft with entirely purchased ingredients
    BuyAll,
    /// Gather one ingredient, buy the shortfall, craft with the rest
    Mixed {
        /// The self-gathered ingredient
        gather_item: String,
    },
}

impl StrategyKind {
    /// Table label matching the report output.
    pub fn type_label(&self) -> &'static str {
        match self {
            StrategyKind::BuyAll => "Optimal Strategy",
            StrategyKind::Mixed { .. } => "Optimal Cross",
        }
    }
}

/// Robustness band for a selected strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Robustness {
    /// Sensitivity below 5%, or a buy-all strategy with no allocation
    /// variable to perturb
    High,
    /// Sensitivity below 15%
    Medium,
    /// Sensitivity of 15% or more
    Low,
    /// Not classifiable (non-positive profit)
    NotApplicable,
}

impl std::fmt::Display for Robustness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Robustness::High => "High",
            Robustness::Medium => "Medium",
            Robustness::Low => "Low",
            Robustness::NotApplicable => "N/A",
        };
        write!(f, "{}", label)
    }
}

/// The winning strategy for one craftable product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyRecord {
    /// The craftable product
    pub product: String,
    /// Human-readable method label, e.g. "Gather iron_ore + Craft iron_ingot"
    pub method: String,
    /// Which strategy won
    pub kind: StrategyKind,
    /// Units crafted per day
    pub crafted_units: u64,
    /// Daily profit in Luno
    pub daily_profit: f64,
    /// Profit per focus point of the full daily budget
    pub luno_per_focus: f64,
    /// Focus split string, e.g. "140G/260C"
    pub focus_allocation: String,
    /// Total material requirements, e.g. "78 iron_ore, 26 coal"
    pub total_materials: String,
    /// Self-gathered quantity of the selected ingredient, or "None"
    pub you_gather: String,
    /// Purchased quantities, or "None"
    pub you_buy: String,
    /// Requirements for ingredients other than the gathered one, or "None"
    pub other_materials: String,
    /// Sensitivity percentage and robustness band, filled in by the
    /// strategy selector
    pub sensitivity: Option<(f64, Robustness)>,
}

/// One row of the comprehensive comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    /// Method label
    pub method: String,
    /// Strategy type label ("Only Gathering", "Optimal Strategy", ...)
    pub strategy_type: String,
    /// Daily profit in Luno
    pub daily_profit: f64,
    /// Profit per focus point of the daily budget
    pub luno_per_focus: f64,
}

/// Results of a full analysis run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisResults {
    /// Gathering-only records, ranked by Luno per focus
    pub gathering: Vec<GatheringRecord>,
    /// Best strategy per product, ranked by daily profit
    pub strategies: Vec<StrategyRecord>,
    /// Combined comparison across both sets, ranked by daily profit
    pub comprehensive: Vec<ComparisonRow>,
}

/// Summary of a single-product analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    /// The analyzed product
    pub product: String,
    /// Buy-all baseline profit
    pub buy_all_profit: f64,
    /// Units crafted per day under buy-all
    pub buy_all_units: u64,
    /// Material purchase summary under buy-all
    pub buy_all_materials: String,
    /// Best profit found across the baseline and quick mixed probes
    pub daily_profit: f64,
    /// Profit per focus point of the daily budget
    pub efficiency: f64,
    /// Label of the best strategy found
    pub strategy: String,
}
