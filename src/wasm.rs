//! WebAssembly bindings for Lunomax.
//!
//! This module provides JavaScript-accessible functions for the profit
//! calculator. Inputs and outputs cross the boundary as JSON strings so
//! web front ends can feed the same four mappings the CLI loads from disk.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::models::{
    AnalysisResults, EconomyData, GatheringRecord, Mechanics, ProductSummary, Recipe,
    StrategyRecord,
};
use crate::optimizer::{ProfitCalculator, DEFAULT_DAILY_FOCUS};

use indexmap::IndexMap;

/// JavaScript-friendly analysis input: the four mappings plus the focus
/// budget.
#[derive(Debug, Clone, Deserialize)]
pub struct JsAnalysisInput {
    /// Daily focus budget; defaults to the standard 400
    #[serde(default = "default_focus")]
    pub daily_focus: u32,
    /// Item name to market price
    pub prices: IndexMap<String, f64>,
    /// Gatherable item name to session mechanics
    pub gatherable: IndexMap<String, Mechanics>,
    /// Craftable product name to session mechanics
    pub craftable: IndexMap<String, Mechanics>,
    /// Product name to recipe
    pub recipes: IndexMap<String, Recipe>,
}

fn default_focus() -> u32 {
    DEFAULT_DAILY_FOCUS
}

/// Result envelope returned to JavaScript.
#[derive(Debug, Clone, Serialize)]
pub struct JsAnalysisResult<T> {
    /// Whether the analysis ran
    pub success: bool,
    /// Error message when `success` is false
    pub error: Option<String>,
    /// Analysis payload when `success` is true
    pub results: Option<T>,
}

impl<T: Serialize> JsAnalysisResult<T> {
    fn ok(results: T) -> String {
        Self::render(JsAnalysisResult {
            success: true,
            error: None,
            results: Some(results),
        })
    }

    fn err(message: String) -> String {
        web_sys::console::warn_1(&JsValue::from_str(&message));
        Self::render(JsAnalysisResult {
            success: false,
            error: Some(message),
            results: None,
        })
    }

    fn render(envelope: JsAnalysisResult<T>) -> String {
        serde_json::to_string(&envelope).unwrap_or_else(|e| {
            serde_json::json!({ "success": false, "error": e.to_string() }).to_string()
        })
    }
}

fn build_calculator(input_json: &str) -> Result<ProfitCalculator, String> {
    let input: JsAnalysisInput =
        serde_json::from_str(input_json).map_err(|e| format!("invalid input: {}", e))?;

    let mut calculator = ProfitCalculator::new(EconomyData {
        prices: input.prices,
        gatherable: input.gatherable,
        craftable: input.craftable,
        recipes: input.recipes,
    });
    calculator
        .set_daily_focus(input.daily_focus)
        .map_err(|e| e.to_string())?;
    Ok(calculator)
}

/// Runs the full analysis over JSON input and returns a JSON envelope of
/// [`AnalysisResults`].
#[wasm_bindgen]
pub fn analyze(input_json: &str) -> String {
    match build_calculator(input_json) {
        Ok(calculator) => JsAnalysisResult::ok(calculator.run_analysis()),
        Err(e) => JsAnalysisResult::<AnalysisResults>::err(e),
    }
}

/// Runs only the gathering analysis over JSON input.
#[wasm_bindgen]
pub fn gathering_only(input_json: &str) -> String {
    match build_calculator(input_json) {
        Ok(calculator) => JsAnalysisResult::ok(calculator.evaluate_gathering_only()),
        Err(e) => JsAnalysisResult::<Vec<GatheringRecord>>::err(e),
    }
}

/// Runs only the strategy selection over JSON input.
#[wasm_bindgen]
pub fn best_strategies(input_json: &str) -> String {
    match build_calculator(input_json) {
        Ok(calculator) => JsAnalysisResult::ok(calculator.find_best_strategies()),
        Err(e) => JsAnalysisResult::<Vec<StrategyRecord>>::err(e),
    }
}

/// Analyzes a single product over JSON input.
#[wasm_bindgen]
pub fn analyze_product(input_json: &str, product: &str) -> String {
    match build_calculator(input_json) {
        Ok(calculator) => match calculator.analyze_single_product(product) {
            Some(summary) => JsAnalysisResult::ok(summary),
            None => JsAnalysisResult::<ProductSummary>::err(format!(
                "product '{}' is unknown or not profitable",
                product
            )),
        },
        Err(e) => JsAnalysisResult::<ProductSummary>::err(e),
    }
}
