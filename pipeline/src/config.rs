//! Run configuration and command line arguments
use std::path::PathBuf;

use clap::Parser;

/// Settings of one training run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// CSV file with the sales history
    pub data: PathBuf,
    /// Destination of the serialized model, overwritten if present
    pub output: PathBuf,
    /// Seed of the train/test shuffle and of the forest
    pub seed: u64,
    pub n_trees: usize,
    /// Share of records held out for evaluation
    pub test_ratio: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            data: PathBuf::from("data/sales.csv"),
            output: PathBuf::from("models/inventory_model.pkl"),
            seed: 42,
            n_trees: 200,
            test_ratio: 0.2,
        }
    }
}

/// Train a random forest that predicts daily sales from calendar, price and promotion data
#[derive(Parser, Debug)]
#[command(name = "shelfcast", author, version, about)]
pub struct Args {
    /// CSV file with a header row and the columns date, price, promotion and sales
    #[arg(long, default_value = "data/sales.csv")]
    pub data: PathBuf,

    /// Where to write the trained model
    #[arg(long, default_value = "models/inventory_model.pkl")]
    pub output: PathBuf,

    /// Seed for the train/test split and the forest
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of trees in the forest
    #[arg(long, default_value_t = 200)]
    pub n_trees: usize,

    /// Share of records held out for evaluation
    #[arg(long, default_value_t = 0.2, value_parser = parse_ratio)]
    pub test_ratio: f64,
}

fn parse_ratio(s: &str) -> Result<f64, String> {
    let ratio: f64 = s.parse().map_err(|_| format!("`{}` is not a number", s))?;
    if (0.0..=1.0).contains(&ratio) {
        Ok(ratio)
    } else {
        Err(format!("{} is not in range [0, 1]", ratio))
    }
}

impl From<Args> for PipelineConfig {
    fn from(args: Args) -> Self {
        PipelineConfig {
            data: args.data,
            output: args.output,
            seed: args.seed,
            n_trees: args.n_trees,
            test_ratio: args.test_ratio,
        }
    }
}
