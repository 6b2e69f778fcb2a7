//! Tests for config loading functionality.

use lunomax::data::{load_economy, load_mechanics, load_prices, DataError};
use std::fs;
use std::path::Path;

#[test]
fn test_load_economy_from_sample_config() {
    let config_dir = Path::new("config");
    if !config_dir.exists() {
        return;
    }

    let data = load_economy(config_dir).expect("failed to load config");

    assert_eq!(data.prices.len(), 8);
    assert_eq!(data.gatherable.len(), 4);
    assert_eq!(data.craftable.len(), 4);
    assert_eq!(data.recipes.len(), 4);

    let ore = data.gatherable.get("iron_ore").expect("iron_ore missing");
    assert_eq!(ore.focus_cost, 10);
    assert_eq!(ore.yield_amount, 5);

    // File order is preserved; the strategy tables rely on it for ties.
    let first_recipe = data.recipes.keys().next().expect("recipes empty");
    assert_eq!(first_recipe, "iron_ingot");
}

#[test]
fn test_load_prices_file() {
    let path = Path::new("config/market_prices.json");
    if !path.exists() {
        return;
    }

    let prices = load_prices(path).expect("failed to load prices");
    assert_eq!(prices.get("iron_ingot"), Some(&100.0));
    assert!(prices.get("mystery_spore").is_none());
}

#[test]
fn test_missing_config_is_fatal() {
    let result = load_economy(Path::new("no_such_directory"));
    assert!(matches!(result, Err(DataError::Io { .. })));
}

#[test]
fn test_malformed_config_is_fatal() {
    let dir = std::env::temp_dir().join("lunomax_malformed_config_test");
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    let path = dir.join("gatherable.json");
    fs::write(&path, "{\"iron_ore\": {\"focus_cost\": \"ten\"}}").expect("failed to write");

    let result = load_mechanics(&path);
    assert!(matches!(result, Err(DataError::Parse { .. })));

    let _ = fs::remove_dir_all(&dir);
}
