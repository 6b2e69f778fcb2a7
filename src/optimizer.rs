//! Focus-allocation profit optimization for Lunomax.
//!
//! This module contains the core analysis logic: the single-strategy
//! profit evaluators, the bounded one-dimensional focus-split search with
//! its grid-scan fallback, and the strategy selector that ranks the best
//! production strategy per craftable product.

use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::data::{load_economy, DataError};
use crate::display::format_amount;
use crate::models::{
    Allocation, AllocationDetail, AnalysisResults, ComparisonRow, EconomyData, GatheringRecord,
    ProductSummary, Purchase, Robustness, StrategyKind, StrategyRecord,
};

/// Default daily focus budget for one analysis run.
pub const DEFAULT_DAILY_FOCUS: u32 = 400;

/// Step width of the fallback grid scan, in focus points.
const GRID_STEP: u32 = 5;

/// Iteration cap for the bounded search.
const MAX_SEARCH_ITERATIONS: u32 = 200;

/// Failure modes of the bounded one-dimensional search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The search interval is empty (upper bound below lower bound).
    #[error("search interval is empty")]
    EmptyInterval,
    /// The interval did not shrink below tolerance within the iteration cap.
    #[error("search did not converge within {0} iterations")]
    NoConvergence(u32),
    /// The objective is non-finite at the candidate minimum.
    #[error("objective is non-finite at the candidate minimum")]
    NonFinite,
}

/// Minimizes a scalar function over `[lo, hi]` by golden-section search.
///
/// Derivative-free and bounded; stops once the bracketing interval is
/// narrower than `tol`. The returned point is a continuous-relaxation
/// seed only: callers evaluating a step function must re-snap and
/// re-evaluate it discretely.
///
/// # Example
///
/// ```
/// use lunomax::optimizer::golden_section_search;
///
/// let x = golden_section_search(|x| (x - 3.0).powi(2), 0.0, 10.0, 1e-6).unwrap();
/// assert!((x - 3.0).abs() < 1e-3);
/// ```
pub fn golden_section_search(
    f: impl Fn(f64) -> f64,
    lo: f64,
    hi: f64,
    tol: f64,
) -> Result<f64, SearchError> {
    if hi < lo {
        return Err(SearchError::EmptyInterval);
    }

    // 1/phi, the golden-section reduction ratio
    const INVPHI: f64 = 0.618_033_988_749_894_8;

    let (mut a, mut b) = (lo, hi);
    let mut c = b - INVPHI * (b - a);
    let mut d = a + INVPHI * (b - a);
    let mut fc = f(c);
    let mut fd = f(d);

    let mut iterations = 0u32;
    while (b - a) > tol {
        iterations += 1;
        if iterations > MAX_SEARCH_ITERATIONS {
            return Err(SearchError::NoConvergence(MAX_SEARCH_ITERATIONS));
        }
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - INVPHI * (b - a);
            fc = f(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + INVPHI * (b - a);
            fd = f(d);
        }
    }

    let mid = (a + b) / 2.0;
    if !f(mid).is_finite() {
        return Err(SearchError::NonFinite);
    }
    Ok(mid)
}

/// Profit calculator over one economic data store and one focus budget.
///
/// The data store is read-only for the calculator's lifetime; the budget
/// may be changed between analyses via [`ProfitCalculator::set_daily_focus`]
/// but never during one.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use lunomax::optimizer::ProfitCalculator;
///
/// let calculator = ProfitCalculator::from_config(Path::new("config")).unwrap();
/// let strategies = calculator.find_best_strategies();
/// for record in &strategies {
///     println!("{}: {:.0} Luno/day", record.method, record.daily_profit);
/// }
/// ```
pub struct ProfitCalculator {
    data: EconomyData,
    daily_focus: u32,
}

impl ProfitCalculator {
    /// Creates a calculator over in-memory data with the default budget.
    pub fn new(data: EconomyData) -> Self {
        ProfitCalculator {
            data,
            daily_focus: DEFAULT_DAILY_FOCUS,
        }
    }

    /// Loads the config directory and creates a calculator with the
    /// default budget.
    pub fn from_config(config_dir: &Path) -> Result<Self, DataError> {
        Ok(Self::new(load_economy(config_dir)?))
    }

    /// The current daily focus budget.
    pub fn daily_focus(&self) -> u32 {
        self.daily_focus
    }

    /// The underlying economic data store.
    pub fn data(&self) -> &EconomyData {
        &self.data
    }

    /// Sets the daily focus budget for subsequent analyses.
    ///
    /// Rejects a zero budget.
    pub fn set_daily_focus(&mut self, focus: u32) -> Result<(), DataError> {
        if focus == 0 {
            return Err(DataError::InvalidFocus(focus));
        }
        self.daily_focus = focus;
        Ok(())
    }

    /// Products that appear in both the recipe table and the craftable
    /// mechanics, in recipe-table order.
    pub fn available_products(&self) -> Vec<&str> {
        self.data
            .recipes
            .keys()
            .filter(|p| self.data.craftable.contains_key(p.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Exact material requirements for crafting `quantity` units of a product.
    pub fn material_requirements(&self, product: &str, quantity: u64) -> Vec<(String, f64)> {
        match self.data.recipes.get(product) {
            Some(recipe) => recipe
                .iter()
                .map(|(ingredient, &amount)| (ingredient.clone(), amount * quantity as f64))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Evaluates crafting a product with every ingredient purchased.
    ///
    /// The always-available baseline: all focus goes to crafting and all
    /// materials come from the market. Returns the unprofitable sentinel
    /// when the product lacks craft mechanics, a market price, or a
    /// recipe, when its craft focus cost is zero, or when any ingredient
    /// is unpriced.
    pub fn evaluate_buy_all(&self, product: &str) -> Allocation {
        let Some(craft) = self.data.craftable.get(product) else {
            return Allocation::infeasible();
        };
        let Some(&product_price) = self.data.prices.get(product) else {
            return Allocation::infeasible();
        };
        let Some(recipe) = self.data.recipes.get(product) else {
            return Allocation::infeasible();
        };
        if craft.focus_cost == 0 {
            return Allocation::infeasible();
        }

        let crafted_units =
            (self.daily_focus / craft.focus_cost) as u64 * craft.yield_amount as u64;

        let mut material_cost = 0.0;
        let mut purchases = Vec::with_capacity(recipe.len());
        for (ingredient, &quantity) in recipe {
            let Some(&price) = self.data.prices.get(ingredient) else {
                return Allocation::infeasible();
            };
            let needed = quantity * crafted_units as f64;
            material_cost += needed * price;
            purchases.push(Purchase {
                item: ingredient.clone(),
                amount: needed,
            });
        }

        let revenue = crafted_units as f64 * product_price;
        Allocation {
            profit: revenue - material_cost,
            detail: AllocationDetail::BuyAll {
                crafted_units,
                material_cost,
                purchases,
                craft_focus_used: self.daily_focus,
                gather_focus_used: 0,
            },
        }
    }

    /// Evaluates spending the whole budget gathering, one record per
    /// eligible item.
    ///
    /// Items without a market price are skipped with a warning; items
    /// with a zero focus cost are excluded. Records are ranked descending
    /// by Luno per focus point.
    pub fn evaluate_gathering_only(&self) -> Vec<GatheringRecord> {
        let mut records = Vec::new();

        for (item, mechanics) in &self.data.gatherable {
            let Some(&price) = self.data.prices.get(item) else {
                warn!(item = %item, "no market price, skipping gathering analysis");
                continue;
            };
            if mechanics.focus_cost == 0 {
                continue;
            }

            let sessions = self.daily_focus / mechanics.focus_cost;
            let units_per_day = sessions as u64 * mechanics.yield_amount as u64;
            let luno_per_focus =
                price * mechanics.yield_amount as f64 / mechanics.focus_cost as f64;

            records.push(GatheringRecord {
                item: item.clone(),
                units_per_day,
                revenue_per_unit: price,
                profit_per_unit: price,
                luno_per_focus,
                daily_profit: units_per_day as f64 * price,
            });
        }

        records.sort_by(|a, b| {
            b.luno_per_focus
                .partial_cmp(&a.luno_per_focus)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        records
    }

    /// Evaluates a specific focus split between gathering one ingredient
    /// and crafting.
    ///
    /// The gather focus is snapped down to a whole multiple of the gather
    /// session cost and the craft side receives the remainder, so the two
    /// always sum to the daily budget. The shortfall between the crafted
    /// units' requirement and the gathered units is purchased.
    ///
    /// If the buy-all baseline strictly beats the requested split, the
    /// baseline profit is returned instead, tagged
    /// [`AllocationDetail::BuyAllBetter`] with the improvement delta.
    pub fn evaluate_mixed(&self, gather_focus: u32, product: &str, gather_item: &str) -> Allocation {
        if gather_focus > self.daily_focus {
            return Allocation::infeasible();
        }
        let Some(gather) = self.data.gatherable.get(gather_item) else {
            return Allocation::infeasible();
        };
        let Some(craft) = self.data.craftable.get(product) else {
            return Allocation::infeasible();
        };
        let Some(&product_price) = self.data.prices.get(product) else {
            return Allocation::infeasible();
        };
        let Some(recipe) = self.data.recipes.get(product) else {
            return Allocation::infeasible();
        };
        if recipe.is_empty() || gather.focus_cost == 0 || craft.focus_cost == 0 {
            return Allocation::infeasible();
        }

        // Snap to whole gather sessions; the craft side takes whatever is
        // left so the split always sums to the budget.
        let gather_focus = (gather_focus / gather.focus_cost) * gather.focus_cost;
        let craft_focus = self.daily_focus - gather_focus;

        let gathered_units =
            (gather_focus / gather.focus_cost) as u64 * gather.yield_amount as u64;
        let crafted_units = (craft_focus / craft.focus_cost) as u64 * craft.yield_amount as u64;

        let mut material_cost = 0.0;
        let mut purchases = Vec::new();
        for (ingredient, &quantity) in recipe {
            let Some(&price) = self.data.prices.get(ingredient) else {
                return Allocation::infeasible();
            };

            let needed = quantity * crafted_units as f64;
            let bought = if ingredient == gather_item {
                (needed - gathered_units as f64).max(0.0)
            } else {
                needed
            };

            material_cost += bought * price;
            if bought > 0.0 {
                purchases.push(Purchase {
                    item: ingredient.clone(),
                    amount: bought,
                });
            }
        }

        let profit = crafted_units as f64 * product_price - material_cost;

        // Dominance rule: never report a split that loses to the baseline.
        let baseline = self.evaluate_buy_all(product);
        if baseline.profit > profit {
            return Allocation {
                profit: baseline.profit,
                detail: AllocationDetail::BuyAllBetter {
                    original_profit: profit,
                    improvement: baseline.profit - profit,
                },
            };
        }

        Allocation {
            profit,
            detail: AllocationDetail::Mixed {
                gather_focus,
                craft_focus,
                gathered_units,
                crafted_units,
                material_cost,
                purchases,
            },
        }
    }

    /// Searches the focus-split interval for the most profitable
    /// allocation of one (product, gather item) pair.
    ///
    /// Runs the bounded search over
    /// `[gather.focus_cost, budget - craft.focus_cost]`, snaps the
    /// continuous seed down to a whole gather session, and re-evaluates
    /// it discretely. On any search failure the interval is grid-scanned
    /// instead. Returns `None` when the pair is infeasible.
    fn optimize_gather_split(&self, product: &str, gather_item: &str) -> Option<Allocation> {
        let gather = self.data.gatherable.get(gather_item)?;
        let craft = self.data.craftable.get(product)?;
        if gather.focus_cost == 0 || craft.focus_cost == 0 {
            return None;
        }
        if craft.focus_cost > self.daily_focus {
            return None;
        }

        let lo = gather.focus_cost;
        let hi = self.daily_focus - craft.focus_cost;
        if hi < lo {
            return None;
        }

        let objective =
            |gather_focus: f64| -self.evaluate_mixed(gather_focus as u32, product, gather_item).profit;

        match golden_section_search(objective, lo as f64, hi as f64, 1.0) {
            Ok(seed) => {
                let snapped = (seed as u32 / gather.focus_cost) * gather.focus_cost;
                Some(self.evaluate_mixed(snapped, product, gather_item))
            }
            Err(err) => {
                debug!(
                    product = %product,
                    gather_item = %gather_item,
                    error = %err,
                    "bounded search failed, falling back to grid scan"
                );
                self.grid_scan(product, gather_item, lo, hi)
            }
        }
    }

    /// Deterministic fallback: evaluates every `GRID_STEP`-th split in the
    /// interval and keeps the best finite one.
    fn grid_scan(&self, product: &str, gather_item: &str, lo: u32, hi: u32) -> Option<Allocation> {
        let mut best: Option<Allocation> = None;
        let mut gather_focus = lo;
        while gather_focus <= hi {
            let candidate = self.evaluate_mixed(gather_focus, product, gather_item);
            if candidate.profit.is_finite()
                && best.as_ref().map_or(true, |b| candidate.profit > b.profit)
            {
                best = Some(candidate);
            }
            gather_focus += GRID_STEP;
        }
        best
    }

    /// Finds the single best production strategy per craftable product.
    ///
    /// Products whose buy-all baseline is not profitable are skipped. For
    /// every gatherable ingredient in a product's recipe, the focus-split
    /// search runs and replaces the running best only on strict
    /// improvement, so no reported strategy ever underperforms its
    /// baseline. Records are sorted descending by daily profit; exact
    /// ties keep recipe-table order.
    pub fn find_best_strategies(&self) -> Vec<StrategyRecord> {
        let mut records = Vec::new();

        for (product, ingredients) in &self.data.recipes {
            if !self.data.craftable.contains_key(product) {
                continue;
            }

            let baseline = self.evaluate_buy_all(product);
            if baseline.profit <= 0.0 {
                continue;
            }

            let mut best_profit = baseline.profit;
            let mut best_detail = baseline.detail;
            let mut best_gather: Option<String> = None;

            for (gather_item, gather_mechanics) in &self.data.gatherable {
                if !ingredients.contains_key(gather_item) {
                    continue;
                }
                if gather_mechanics.focus_cost == 0 {
                    continue;
                }
                if !self.data.prices.contains_key(gather_item) {
                    continue;
                }

                let Some(candidate) = self.optimize_gather_split(product, gather_item) else {
                    continue;
                };
                if candidate.profit > best_profit {
                    best_profit = candidate.profit;
                    best_detail = candidate.detail;
                    best_gather = Some(gather_item.clone());
                }
            }

            records.push(self.build_strategy_record(product, best_profit, &best_detail, best_gather));
        }

        records.sort_by(|a, b| {
            b.daily_profit
                .partial_cmp(&a.daily_profit)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for record in &mut records {
            record.sensitivity = Some(self.classify_sensitivity(record));
        }

        records
    }

    fn build_strategy_record(
        &self,
        product: &str,
        profit: f64,
        detail: &AllocationDetail,
        gather_item: Option<String>,
    ) -> StrategyRecord {
        let (crafted_units, gathered_units, focus_allocation) = match detail {
            AllocationDetail::Mixed {
                crafted_units,
                gathered_units,
                gather_focus,
                craft_focus,
                ..
            } => (
                *crafted_units,
                *gathered_units,
                format!("{}G/{}C", gather_focus, craft_focus),
            ),
            AllocationDetail::BuyAll { crafted_units, .. } => {
                (*crafted_units, 0, format!("0G/{}C", self.daily_focus))
            }
            _ => (0, 0, format!("0G/{}C", self.daily_focus)),
        };

        let requirements = self.material_requirements(product, crafted_units);
        let total_materials = if requirements.is_empty() {
            "None".to_string()
        } else {
            requirements
                .iter()
                .map(|(material, quantity)| format!("{} {}", format_amount(*quantity), material))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let (method, kind, you_gather, you_buy, other_materials) = match gather_item {
            Some(gather_item) => {
                let total_needed = requirements
                    .iter()
                    .find(|(material, _)| *material == gather_item)
                    .map(|(_, quantity)| *quantity)
                    .unwrap_or(0.0);
                let buy_amount = (total_needed - gathered_units as f64).max(0.0);

                let others: Vec<String> = requirements
                    .iter()
                    .filter(|(material, _)| *material != gather_item)
                    .map(|(material, quantity)| {
                        format!("{} {}", format_amount(*quantity), material)
                    })
                    .collect();

                (
                    format!("Gather {} + Craft {}", gather_item, product),
                    StrategyKind::Mixed {
                        gather_item: gather_item.clone(),
                    },
                    format!("{} {}", gathered_units, gather_item),
                    if buy_amount > 0.0 {
                        format!("{} {}", format_amount(buy_amount), gather_item)
                    } else {
                        "None".to_string()
                    },
                    if others.is_empty() {
                        "None".to_string()
                    } else {
                        others.join(", ")
                    },
                )
            }
            None => (
                format!("Craft {}", product),
                StrategyKind::BuyAll,
                "None".to_string(),
                total_materials.clone(),
                "None".to_string(),
            ),
        };

        StrategyRecord {
            product: product.to_string(),
            method,
            kind,
            crafted_units,
            daily_profit: profit,
            luno_per_focus: profit / self.daily_focus as f64,
            focus_allocation,
            total_materials,
            you_gather,
            you_buy,
            other_materials,
            sensitivity: None,
        }
    }

    /// Classifies how fragile a selected strategy is.
    ///
    /// Buy-all strategies have no allocation variable to perturb and
    /// classify as high robustness. For mixed strategies the sensitivity
    /// is the strategy's edge over the buy-all baseline as a percentage
    /// of its own profit: under 5% is High, under 15% Medium, otherwise
    /// Low.
    pub fn classify_sensitivity(&self, record: &StrategyRecord) -> (f64, Robustness) {
        if record.daily_profit <= 0.0 {
            return (0.0, Robustness::NotApplicable);
        }

        match &record.kind {
            StrategyKind::BuyAll => (1.0, Robustness::High),
            StrategyKind::Mixed { .. } => {
                let baseline = self.evaluate_buy_all(&record.product);
                let sensitivity =
                    (record.daily_profit - baseline.profit).abs() / record.daily_profit * 100.0;
                let robustness = if sensitivity < 5.0 {
                    Robustness::High
                } else if sensitivity < 15.0 {
                    Robustness::Medium
                } else {
                    Robustness::Low
                };
                (sensitivity, robustness)
            }
        }
    }

    /// Runs the full analysis: gathering records, best strategies, and the
    /// comprehensive comparison across both, each ranked by its metric.
    pub fn run_analysis(&self) -> AnalysisResults {
        let gathering = self.evaluate_gathering_only();
        let strategies = self.find_best_strategies();

        let mut comprehensive: Vec<ComparisonRow> = Vec::new();
        for record in &gathering {
            comprehensive.push(ComparisonRow {
                method: format!("Gather {}", record.item),
                strategy_type: "Only Gathering".to_string(),
                daily_profit: record.daily_profit,
                luno_per_focus: record.luno_per_focus,
            });
        }
        for record in &strategies {
            comprehensive.push(ComparisonRow {
                method: record.method.clone(),
                strategy_type: record.kind.type_label().to_string(),
                daily_profit: record.daily_profit,
                luno_per_focus: record.luno_per_focus,
            });
        }

        // Drop exact duplicates before ranking.
        let mut seen = HashSet::new();
        comprehensive.retain(|row| {
            seen.insert((
                row.method.clone(),
                row.daily_profit.to_bits(),
                row.luno_per_focus.to_bits(),
            ))
        });
        comprehensive.sort_by(|a, b| {
            b.daily_profit
                .partial_cmp(&a.daily_profit)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        AnalysisResults {
            gathering,
            strategies,
            comprehensive,
        }
    }

    /// Analyzes one product: the buy-all baseline plus a quick
    /// one-session mixed probe per candidate gather ingredient.
    ///
    /// Returns `None` when the product is unknown or its baseline is not
    /// profitable.
    pub fn analyze_single_product(&self, product: &str) -> Option<ProductSummary> {
        let recipe = self.data.recipes.get(product)?;
        if !self.data.craftable.contains_key(product) {
            return None;
        }

        let baseline = self.evaluate_buy_all(product);
        if baseline.profit <= 0.0 {
            return None;
        }

        let (buy_all_units, buy_all_materials) = match &baseline.detail {
            AllocationDetail::BuyAll {
                crafted_units,
                purchases,
                ..
            } => (
                *crafted_units,
                purchases
                    .iter()
                    .map(|p| format!("Buy {} {}", format_amount(p.amount), p.item))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => (0, String::new()),
        };

        let mut best_profit = baseline.profit;
        let mut strategy = "Buy All Materials".to_string();

        for (gather_item, gather_mechanics) in &self.data.gatherable {
            if !recipe.contains_key(gather_item) {
                continue;
            }
            let probe = self.evaluate_mixed(gather_mechanics.focus_cost, product, gather_item);
            if probe.profit > best_profit {
                best_profit = probe.profit;
                strategy = format!("Gather {} + Craft", gather_item);
            }
        }

        Some(ProductSummary {
            product: product.to_string(),
            buy_all_profit: baseline.profit,
            buy_all_units,
            buy_all_materials,
            daily_profit: best_profit,
            efficiency: best_profit / self.daily_focus as f64,
            strategy,
        })
    }
}
