//! Lunomax - Command Line Interface
//!
//! This is the main entry point for the Luno profit analysis tool.
//! Run with `--help` to see all available options.

use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use lunomax::{
    display::{
        display_available_products, display_full_analysis, display_gathering,
        display_product_summary, display_strategies,
    },
    optimizer::{ProfitCalculator, DEFAULT_DAILY_FOCUS},
};

/// Command-line arguments for Lunomax.
#[derive(Parser, Debug)]
#[command(name = "lunomax")]
#[command(author, version, about = "Find the most profitable use of the daily focus budget", long_about = None)]
struct Args {
    /// Directory containing the four economy JSON files
    #[arg(short, long, default_value = "config")]
    config: String,

    /// Daily focus budget to allocate
    #[arg(short, long, default_value_t = DEFAULT_DAILY_FOCUS)]
    focus: u32,

    /// Only run the gathering analysis
    #[arg(long, default_value = "false")]
    gathering_only: bool,

    /// Only run the optimal-strategies analysis
    #[arg(long, default_value = "false")]
    strategies_only: bool,

    /// List all craftable products and exit
    #[arg(long, default_value = "false")]
    list_products: bool,

    /// Analyze a single product by name
    #[arg(short, long)]
    product: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    let config_dir = Path::new(&args.config);
    if !config_dir.exists() {
        eprintln!(
            "Error: config directory '{}' not found. Please run from the project root.",
            args.config
        );
        std::process::exit(1);
    }

    let mut calculator = ProfitCalculator::from_config(config_dir)?;
    calculator.set_daily_focus(args.focus)?;

    println!("Lunomax - Luno Profit Calculator");
    println!("================================================================");
    println!();
    println!("Configuration:");
    println!("  Config Dir:   {}", args.config);
    println!("  Daily Focus:  {}", calculator.daily_focus());
    println!(
        "  Data:         {} prices, {} gatherables, {} craftables, {} recipes",
        calculator.data().prices.len(),
        calculator.data().gatherable.len(),
        calculator.data().craftable.len(),
        calculator.data().recipes.len()
    );

    if args.list_products {
        display_available_products(&calculator.available_products());
        return Ok(());
    }

    if let Some(product) = &args.product {
        match calculator.analyze_single_product(product) {
            Some(summary) => display_product_summary(&summary),
            None => {
                println!();
                println!(
                    "[WARNING] '{}' is unknown or not profitable with the current data.",
                    product
                );
            }
        }
        return Ok(());
    }

    if args.gathering_only {
        display_gathering(&calculator.evaluate_gathering_only());
        return Ok(());
    }

    if args.strategies_only {
        display_strategies(&calculator.find_best_strategies());
        return Ok(());
    }

    let results = calculator.run_analysis();
    if results.gathering.is_empty() && results.strategies.is_empty() {
        println!();
        println!("[WARNING] No profitable strategies found with the current data.");
        return Ok(());
    }

    display_full_analysis(&results);

    Ok(())
}
