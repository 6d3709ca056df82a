//! CLI module for bargain

pub mod app;
pub mod commands;

pub use app::{BargainApp, Transcript};
pub use commands::{Cli, Commands, Overrides};
