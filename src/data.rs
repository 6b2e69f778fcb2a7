//! Data loading functionality for Lunomax.
//!
//! This module handles loading the four economic mappings from JSON files
//! located in the config directory. Each mapping has its own file and a
//! dedicated loading function; a missing or malformed file is fatal.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

use crate::models::{EconomyData, Mechanics, Recipe};

/// Errors raised while loading configuration or reconfiguring a run.
#[derive(Debug, Error)]
pub enum DataError {
    /// A required config file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the file that failed
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// A config file was not valid JSON for its expected shape.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Path of the file that failed
        path: String,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },
    /// The daily focus budget must be a positive integer.
    #[error("daily focus must be positive, got {0}")]
    InvalidFocus(u32),
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| DataError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Loads market prices from a JSON file.
///
/// # JSON Format
///
/// An object mapping item names to unit prices in Luno:
/// `{"iron_ore": 20, "iron_ingot": 100}`
pub fn load_prices(path: &Path) -> Result<IndexMap<String, f64>, DataError> {
    load_json(path)
}

/// Loads gatherable or craftable session mechanics from a JSON file.
///
/// # JSON Format
///
/// An object mapping item names to mechanics records:
/// `{"iron_ore": {"focus_cost": 10, "yield": 5}}`
pub fn load_mechanics(path: &Path) -> Result<IndexMap<String, Mechanics>, DataError> {
    load_json(path)
}

/// Loads the recipe table from a JSON file.
///
/// # JSON Format
///
/// An object mapping product names to ingredient quantity maps:
/// `{"iron_ingot": {"iron_ore": 3}}`
pub fn load_recipes(path: &Path) -> Result<IndexMap<String, Recipe>, DataError> {
    load_json(path)
}

/// Loads the full economic data store from a config directory.
///
/// Expects four files: `market_prices.json`, `gatherable.json`,
/// `craftable.json`, and `recipes.json`. Any missing or malformed file
/// aborts the load.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use lunomax::data::load_economy;
///
/// let data = load_economy(Path::new("config")).unwrap();
/// println!("Loaded {} recipes", data.recipes.len());
/// ```
pub fn load_economy(config_dir: &Path) -> Result<EconomyData, DataError> {
    let prices = load_prices(&config_dir.join("market_prices.json"))?;
    let gatherable = load_mechanics(&config_dir.join("gatherable.json"))?;
    let craftable = load_mechanics(&config_dir.join("craftable.json"))?;
    let recipes = load_recipes(&config_dir.join("recipes.json"))?;

    Ok(EconomyData {
        prices,
        gatherable,
        craftable,
        recipes,
    })
}
