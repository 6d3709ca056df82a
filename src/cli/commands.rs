//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bargain")]
#[command(about = "Bargain - buyer/seller price negotiation simulator", long_about = None)]
pub struct Cli {
    /// JSON file with negotiation settings
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of dialogue
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Negotiate a single product
    Run {
        /// Product name
        #[arg(short, long, default_value = "Product")]
        name: String,

        /// Market price
        #[arg(short, long)]
        base: f64,

        /// Seller's minimum price
        #[arg(short, long)]
        min: f64,

        /// Buyer's budget
        #[arg(short = 'B', long)]
        budget: f64,

        #[command(flatten)]
        overrides: Overrides,

        /// Hide the dialogue and only print the result
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run the sample catalog at every difficulty
    Bench {
        #[command(flatten)]
        overrides: Overrides,
    },

    /// Show the buyer and seller personas
    Personas,
}

/// Flags that take precedence over the config file
#[derive(clap::Args, Debug, Default)]
pub struct Overrides {
    /// Rounds allowed before timing out
    #[arg(long)]
    pub max_rounds: Option<u32>,

    /// Absolute convergence tolerance
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Seed for the seller's counteroffer multiplier
    #[arg(long, conflicts_with = "closing_pressure")]
    pub seed: Option<u64>,

    /// Seller concedes faster in late rounds
    #[arg(long)]
    pub closing_pressure: bool,
}
