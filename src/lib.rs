//! # Lunomax
//!
//! A command-line tool and library for finding the most profitable use of
//! the daily focus budget in Blue Protocol's gathering/crafting economy.
//!
//! This crate decides, per craftable product, whether the day's focus is
//! better spent gathering raw materials directly, crafting with entirely
//! purchased ingredients, or splitting focus between gathering one
//! ingredient and crafting, based on:
//!
//! - Market prices in Luno
//! - Gathering and crafting session mechanics (focus cost and yield)
//! - Recipe requirements
//! - The daily focus budget
//!
//! ## Modules
//!
//! - [`models`] - Core data structures for the economic store, allocations,
//!   and strategy records
//! - [`data`] - JSON config loading functionality
//! - [`optimizer`] - Profit evaluators, the focus-split search, and the
//!   strategy selector
//! - [`display`] - Output formatting and display utilities
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::Path;
//! use lunomax::{display::display_full_analysis, optimizer::ProfitCalculator};
//!
//! // Load the four economic mappings from the config directory
//! let mut calculator = ProfitCalculator::from_config(Path::new("config")).unwrap();
//!
//! // Re-budget the run, then analyze
//! calculator.set_daily_focus(400).unwrap();
//! let results = calculator.run_analysis();
//!
//! display_full_analysis(&results);
//! ```
//!
//! ## Strategy selection
//!
//! For every craftable product the selector starts from the buy-all
//! baseline and runs a bounded one-dimensional search over the focus split
//! for each gatherable ingredient in the recipe, keeping the single best
//! strategy. A mixed strategy is only ever reported when it strictly beats
//! the baseline.

pub mod data;
pub mod display;
pub mod models;
pub mod optimizer;
pub mod wasm;
