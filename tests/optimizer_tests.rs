//! Tests for the profit evaluators, the focus-split search, and the
//! strategy selector.

use indexmap::IndexMap;
use lunomax::data::load_economy;
use lunomax::models::{
    AllocationDetail, EconomyData, Mechanics, Robustness, StrategyKind, StrategyRecord,
};
use lunomax::optimizer::{golden_section_search, ProfitCalculator, SearchError};
use std::path::Path;

fn mech(focus_cost: u32, yield_amount: u32) -> Mechanics {
    Mechanics {
        focus_cost,
        yield_amount,
    }
}

/// One gatherable (iron_ore: 10 focus, yield 5, price 20) feeding one
/// craftable (iron_ingot: 20 focus, yield 2, price 100, recipe 3 ore).
fn ore_ingot_economy() -> EconomyData {
    EconomyData {
        prices: IndexMap::from([("iron_ore".to_string(), 20.0), ("iron_ingot".to_string(), 100.0)]),
        gatherable: IndexMap::from([("iron_ore".to_string(), mech(10, 5))]),
        craftable: IndexMap::from([("iron_ingot".to_string(), mech(20, 2))]),
        recipes: IndexMap::from([(
            "iron_ingot".to_string(),
            IndexMap::from([("iron_ore".to_string(), 3.0)]),
        )]),
    }
}

#[test]
fn test_buy_all_matches_hand_computation() {
    let calculator = ProfitCalculator::new(ore_ingot_economy());

    // 400 // 20 = 20 sessions * 2 yield = 40 ingots; 120 ore at 20 = 2400
    // cost; 40 * 100 = 4000 revenue.
    let result = calculator.evaluate_buy_all("iron_ingot");
    assert_eq!(result.profit, 1600.0);

    match result.detail {
        AllocationDetail::BuyAll {
            crafted_units,
            material_cost,
            craft_focus_used,
            gather_focus_used,
            ref purchases,
        } => {
            assert_eq!(crafted_units, 40);
            assert_eq!(material_cost, 2400.0);
            assert_eq!(craft_focus_used, 400);
            assert_eq!(gather_focus_used, 0);
            assert_eq!(purchases.len(), 1);
            assert_eq!(purchases[0].item, "iron_ore");
            assert_eq!(purchases[0].amount, 120.0);
        }
        other => panic!("expected buy-all detail, got {:?}", other),
    }
}

#[test]
fn test_mixed_split_at_200_dominates_buy_all() {
    let calculator = ProfitCalculator::new(ore_ingot_economy());

    // 200 gather focus = 20 sessions * 5 = 100 ore; 200 craft focus = 10
    // sessions * 2 = 20 ingots needing only 60 ore, so nothing is bought.
    let result = calculator.evaluate_mixed(200, "iron_ingot", "iron_ore");
    assert_eq!(result.profit, 2000.0);

    match result.detail {
        AllocationDetail::Mixed {
            gather_focus,
            craft_focus,
            gathered_units,
            crafted_units,
            material_cost,
            ref purchases,
        } => {
            assert_eq!(gather_focus, 200);
            assert_eq!(craft_focus, 200);
            assert_eq!(gathered_units, 100);
            assert_eq!(crafted_units, 20);
            assert_eq!(material_cost, 0.0);
            assert!(purchases.is_empty());
        }
        other => panic!("expected mixed detail, got {:?}", other),
    }
}

#[test]
fn test_mixed_split_buys_the_shortfall() {
    // Costlier gathering (20 focus per 5 ore) so the split leaves a gap
    // between what the crafts need and what the sessions produce.
    let mut data = ore_ingot_economy();
    data.gatherable.insert("iron_ore".to_string(), mech(20, 5));
    let calculator = ProfitCalculator::new(data);

    // 200 gather focus = 10 sessions * 5 = 50 ore; 20 ingots need 60,
    // so 10 are bought at 20 Luno each.
    let result = calculator.evaluate_mixed(200, "iron_ingot", "iron_ore");
    assert_eq!(result.profit, 1800.0);

    match result.detail {
        AllocationDetail::Mixed {
            gathered_units,
            crafted_units,
            material_cost,
            ref purchases,
            ..
        } => {
            assert_eq!(gathered_units, 50);
            assert_eq!(crafted_units, 20);
            assert_eq!(material_cost, 200.0);
            assert_eq!(purchases.len(), 1);
            assert_eq!(purchases[0].item, "iron_ore");
            assert_eq!(purchases[0].amount, 10.0);
        }
        other => panic!("expected mixed detail, got {:?}", other),
    }
}

#[test]
fn test_selector_picks_mixed_when_it_dominates() {
    let calculator = ProfitCalculator::new(ore_ingot_economy());

    let strategies = calculator.find_best_strategies();
    assert_eq!(strategies.len(), 1);

    let record = &strategies[0];
    assert_eq!(
        record.kind,
        StrategyKind::Mixed {
            gather_item: "iron_ore".to_string()
        }
    );
    // Must strictly beat the 1600 baseline; the split at 200G/200C already
    // earns 2000, and the best discrete split (140G/260C) earns 2440.
    assert!(record.daily_profit >= 1800.0);
    assert!(record.daily_profit <= 2440.0);
    assert_eq!(record.luno_per_focus, record.daily_profit / 400.0);
    assert!(record.focus_allocation.contains('G'));
    assert!(record.focus_allocation.contains('C'));
}

#[test]
fn test_mixed_returns_buy_all_when_split_is_inferior() {
    let calculator = ProfitCalculator::new(ore_ingot_economy());

    // 300 gather focus leaves 100 craft focus: 10 ingots, 150 ore gathered,
    // nothing bought, profit 1000 — worse than the 1600 baseline.
    let result = calculator.evaluate_mixed(300, "iron_ingot", "iron_ore");
    assert_eq!(result.profit, 1600.0);

    match result.detail {
        AllocationDetail::BuyAllBetter {
            original_profit,
            improvement,
        } => {
            assert_eq!(original_profit, 1000.0);
            assert_eq!(improvement, 600.0);
        }
        other => panic!("expected buy-all-better detail, got {:?}", other),
    }
}

#[test]
fn test_unpriced_ingredient_yields_sentinel() {
    let mut data = ore_ingot_economy();
    data.prices.shift_remove("iron_ore");
    let calculator = ProfitCalculator::new(data);

    let buy_all = calculator.evaluate_buy_all("iron_ingot");
    assert_eq!(buy_all.profit, f64::NEG_INFINITY);
    assert_eq!(buy_all.detail, AllocationDetail::Infeasible);

    let mixed = calculator.evaluate_mixed(200, "iron_ingot", "iron_ore");
    assert_eq!(mixed.profit, f64::NEG_INFINITY);
    assert_eq!(mixed.detail, AllocationDetail::Infeasible);
}

#[test]
fn test_zero_focus_cost_excludes_activity() {
    let mut data = ore_ingot_economy();
    data.craftable.insert("iron_ingot".to_string(), mech(0, 2));
    let calculator = ProfitCalculator::new(data);

    assert_eq!(
        calculator.evaluate_buy_all("iron_ingot").profit,
        f64::NEG_INFINITY
    );
    assert_eq!(
        calculator
            .evaluate_mixed(200, "iron_ingot", "iron_ore")
            .profit,
        f64::NEG_INFINITY
    );
    assert!(calculator.find_best_strategies().is_empty());

    let mut data = ore_ingot_economy();
    data.gatherable.insert("iron_ore".to_string(), mech(0, 5));
    let calculator = ProfitCalculator::new(data);

    assert!(calculator.evaluate_gathering_only().is_empty());
    assert_eq!(
        calculator
            .evaluate_mixed(200, "iron_ingot", "iron_ore")
            .profit,
        f64::NEG_INFINITY
    );
}

#[test]
fn test_unprofitable_baseline_excluded_from_output() {
    let mut data = ore_ingot_economy();
    // Revenue 40 * 60 = 2400 exactly covers the 2400 material cost.
    data.prices.insert("iron_ingot".to_string(), 60.0);
    let calculator = ProfitCalculator::new(data);

    assert_eq!(calculator.evaluate_buy_all("iron_ingot").profit, 0.0);
    assert!(calculator.find_best_strategies().is_empty());
}

#[test]
fn test_evaluate_mixed_is_idempotent() {
    let calculator = ProfitCalculator::new(ore_ingot_economy());

    let first = calculator.evaluate_mixed(137, "iron_ingot", "iron_ore");
    let second = calculator.evaluate_mixed(137, "iron_ingot", "iron_ore");
    assert_eq!(first, second);
}

#[test]
fn test_snapping_invariant() {
    let calculator = ProfitCalculator::new(ore_ingot_economy());

    for requested in [0u32, 7, 37, 137, 200, 333, 400] {
        let result = calculator.evaluate_mixed(requested, "iron_ingot", "iron_ore");
        if let AllocationDetail::Mixed {
            gather_focus,
            craft_focus,
            gathered_units,
            crafted_units,
            ..
        } = result.detail
        {
            assert_eq!(gather_focus % 10, 0, "gather focus snaps to sessions");
            assert_eq!(gather_focus + craft_focus, 400, "split sums to budget");
            assert_eq!(gathered_units, (gather_focus / 10) as u64 * 5);
            assert_eq!(crafted_units, (craft_focus / 20) as u64 * 2);
        }
    }
}

#[test]
fn test_dominance_invariant_over_sample_config() {
    let config_dir = Path::new("config");
    if !config_dir.exists() {
        return;
    }

    let data = load_economy(config_dir).expect("failed to load config");
    let calculator = ProfitCalculator::new(data);

    for record in calculator.find_best_strategies() {
        let baseline = calculator.evaluate_buy_all(&record.product);
        assert!(
            record.daily_profit >= baseline.profit,
            "{} underperforms its buy-all baseline",
            record.product
        );
    }
}

#[test]
fn test_strategies_sorted_descending_with_stable_ties() {
    // Two identical products; exact profit ties must keep recipe order.
    let mut data = ore_ingot_economy();
    data.prices.insert("steel_ingot".to_string(), 100.0);
    data.craftable.insert("steel_ingot".to_string(), mech(20, 2));
    data.recipes.insert(
        "steel_ingot".to_string(),
        IndexMap::from([("iron_ore".to_string(), 3.0)]),
    );
    let calculator = ProfitCalculator::new(data);

    let strategies = calculator.find_best_strategies();
    assert_eq!(strategies.len(), 2);
    assert_eq!(strategies[0].daily_profit, strategies[1].daily_profit);
    assert_eq!(strategies[0].product, "iron_ingot");
    assert_eq!(strategies[1].product, "steel_ingot");
}

#[test]
fn test_gathering_only_ranked_by_efficiency() {
    let mut data = ore_ingot_economy();
    data.prices.insert("rough_timber".to_string(), 8.0);
    data.gatherable
        .insert("rough_timber".to_string(), mech(8, 4));
    // Unpriced gatherable is skipped, not an error.
    data.gatherable
        .insert("mystery_spore".to_string(), mech(12, 2));
    let calculator = ProfitCalculator::new(data);

    let records = calculator.evaluate_gathering_only();
    assert_eq!(records.len(), 2);

    // iron_ore: 40 sessions * 5 = 200 units, 10 Luno/focus.
    assert_eq!(records[0].item, "iron_ore");
    assert_eq!(records[0].units_per_day, 200);
    assert_eq!(records[0].luno_per_focus, 10.0);
    assert_eq!(records[0].daily_profit, 4000.0);

    // rough_timber: 50 sessions * 4 = 200 units, 4 Luno/focus.
    assert_eq!(records[1].item, "rough_timber");
    assert_eq!(records[1].luno_per_focus, 4.0);
    assert!(records[0].luno_per_focus >= records[1].luno_per_focus);
}

fn mixed_record(product: &str, daily_profit: f64) -> StrategyRecord {
    StrategyRecord {
        product: product.to_string(),
        method: format!("Gather iron_ore + Craft {}", product),
        kind: StrategyKind::Mixed {
            gather_item: "iron_ore".to_string(),
        },
        crafted_units: 0,
        daily_profit,
        luno_per_focus: daily_profit / 400.0,
        focus_allocation: "200G/200C".to_string(),
        total_materials: String::new(),
        you_gather: String::new(),
        you_buy: String::new(),
        other_materials: String::new(),
        sensitivity: None,
    }
}

#[test]
fn test_sensitivity_classification_bands() {
    let calculator = ProfitCalculator::new(ore_ingot_economy());

    // Baseline profit for iron_ingot is 1600.
    let (pct, robustness) = calculator.classify_sensitivity(&mixed_record("iron_ingot", 1600.0));
    assert_eq!(pct, 0.0);
    assert_eq!(robustness, Robustness::High);

    let (pct, robustness) = calculator.classify_sensitivity(&mixed_record("iron_ingot", 1620.0));
    assert!(pct < 5.0);
    assert_eq!(robustness, Robustness::High);

    let (pct, robustness) = calculator.classify_sensitivity(&mixed_record("iron_ingot", 1700.0));
    assert!((5.0..15.0).contains(&pct));
    assert_eq!(robustness, Robustness::Medium);

    let (pct, robustness) = calculator.classify_sensitivity(&mixed_record("iron_ingot", 2000.0));
    assert!(pct >= 15.0);
    assert_eq!(robustness, Robustness::Low);

    let (_, robustness) = calculator.classify_sensitivity(&mixed_record("iron_ingot", -10.0));
    assert_eq!(robustness, Robustness::NotApplicable);
}

#[test]
fn test_buy_all_record_classifies_high() {
    let calculator = ProfitCalculator::new(ore_ingot_economy());

    let mut record = mixed_record("iron_ingot", 1600.0);
    record.kind = StrategyKind::BuyAll;
    record.method = "Craft iron_ingot".to_string();

    let (pct, robustness) = calculator.classify_sensitivity(&record);
    assert_eq!(pct, 1.0);
    assert_eq!(robustness, Robustness::High);
}

#[test]
fn test_selector_attaches_sensitivity() {
    let calculator = ProfitCalculator::new(ore_ingot_economy());

    for record in calculator.find_best_strategies() {
        let (pct, robustness) = record.sensitivity.expect("sensitivity should be attached");
        assert!(pct >= 0.0);
        assert_ne!(robustness, Robustness::NotApplicable);
    }
}

#[test]
fn test_set_daily_focus_rejects_zero_and_rebudgets() {
    let mut calculator = ProfitCalculator::new(ore_ingot_economy());
    assert!(calculator.set_daily_focus(0).is_err());
    assert_eq!(calculator.daily_focus(), 400);

    // 100 // 20 = 5 sessions * 2 = 10 ingots; 30 ore at 20 = 600 cost.
    calculator.set_daily_focus(100).unwrap();
    let result = calculator.evaluate_buy_all("iron_ingot");
    assert_eq!(result.profit, 400.0);
}

#[test]
fn test_tight_budget_skips_infeasible_pairs() {
    // Budget 25 leaves no room for a gather session next to a craft
    // session, so the mixed interval is empty and buy-all wins.
    let mut calculator = ProfitCalculator::new(ore_ingot_economy());
    calculator.set_daily_focus(25).unwrap();

    let strategies = calculator.find_best_strategies();
    assert_eq!(strategies.len(), 1);
    assert_eq!(strategies[0].kind, StrategyKind::BuyAll);
    // 1 session * 2 = 2 ingots, 6 ore at 20 = 120 cost, 200 revenue.
    assert_eq!(strategies[0].daily_profit, 80.0);
}

#[test]
fn test_available_products_filters_craftable() {
    let mut data = ore_ingot_economy();
    data.recipes.insert(
        "unknown_widget".to_string(),
        IndexMap::from([("iron_ore".to_string(), 1.0)]),
    );
    let calculator = ProfitCalculator::new(data);

    assert_eq!(calculator.available_products(), vec!["iron_ingot"]);
}

#[test]
fn test_analyze_single_product() {
    let calculator = ProfitCalculator::new(ore_ingot_economy());

    let summary = calculator
        .analyze_single_product("iron_ingot")
        .expect("iron_ingot is profitable");
    assert_eq!(summary.buy_all_profit, 1600.0);
    assert_eq!(summary.buy_all_units, 40);
    // A single gather session already beats the baseline: 5 ore gathered,
    // 38 ingots crafted, 109 ore bought, profit 1620.
    assert_eq!(summary.daily_profit, 1620.0);
    assert_eq!(summary.strategy, "Gather iron_ore + Craft");

    assert!(calculator.analyze_single_product("no_such_item").is_none());
}

#[test]
fn test_run_analysis_merges_and_ranks_comprehensive() {
    let calculator = ProfitCalculator::new(ore_ingot_economy());

    let results = calculator.run_analysis();
    assert_eq!(results.gathering.len(), 1);
    assert_eq!(results.strategies.len(), 1);
    assert_eq!(results.comprehensive.len(), 2);

    // Gathering iron_ore all day earns 4000, more than any craft split.
    assert_eq!(results.comprehensive[0].method, "Gather iron_ore");
    assert_eq!(results.comprehensive[0].daily_profit, 4000.0);
    assert!(results.comprehensive[0].daily_profit >= results.comprehensive[1].daily_profit);
}

#[test]
fn test_sample_config_analysis() {
    let config_dir = Path::new("config");
    if !config_dir.exists() {
        return;
    }

    let data = load_economy(config_dir).expect("failed to load config");
    let calculator = ProfitCalculator::new(data);
    let results = calculator.run_analysis();

    // arcane_focus depends on the unpriced mystery_spore and must be
    // excluded without aborting the run.
    assert!(results
        .strategies
        .iter()
        .all(|r| r.product != "arcane_focus"));
    assert!(!results.strategies.is_empty());

    for pair in results.strategies.windows(2) {
        assert!(pair[0].daily_profit >= pair[1].daily_profit);
    }
}

#[test]
fn test_golden_section_search_minimizes_quadratic() {
    let x = golden_section_search(|x| (x - 140.0).powi(2), 10.0, 380.0, 1.0).unwrap();
    assert!((x - 140.0).abs() <= 1.0);
}

#[test]
fn test_golden_section_search_rejects_empty_interval() {
    let result = golden_section_search(|x| x, 10.0, 5.0, 1.0);
    assert_eq!(result, Err(SearchError::EmptyInterval));
}

#[test]
fn test_golden_section_search_rejects_non_finite_objective() {
    let result = golden_section_search(|_| f64::INFINITY, 0.0, 100.0, 1.0);
    assert_eq!(result, Err(SearchError::NonFinite));
}

#[test]
fn test_golden_section_search_reports_non_convergence() {
    // The interval shrinks by 1/phi per iteration, so a span this wide
    // cannot reach a tolerance of 1.0 within the iteration cap.
    let result = golden_section_search(|_| 0.0, 0.0, 1e60, 1.0);
    assert!(matches!(result, Err(SearchError::NoConvergence(_))));
}
