//! Command-line interface definitions.

pub mod check;
pub mod multiplier;
pub mod output;
pub mod run;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Repricer - demand-driven marketplace price reconciliation.
#[derive(Parser, Debug)]
#[command(name = "repricer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one reconciliation cycle for a marketplace
    Run(RunArgs),

    /// Show the multiplier decision for an order count without changing anything
    Multiplier(MultiplierArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `repricer check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file
    Config(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = "repricer.toml")]
    pub config: PathBuf,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "repricer.toml")]
    pub config: PathBuf,

    /// Marketplace to reconcile (ozon, wildberries)
    #[arg(short, long)]
    pub marketplace: String,

    /// Orders placed so far today; enables the multiplier decision
    #[arg(long)]
    pub orders: Option<u32>,

    /// Compute corrections without pushing or persisting
    #[arg(long)]
    pub dry_run: bool,

    /// Evaluate as of this instant (RFC 3339) instead of now
    #[arg(long)]
    pub now: Option<DateTime<Utc>>,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,
}

/// Arguments for the `multiplier` subcommand.
#[derive(Parser, Debug)]
pub struct MultiplierArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "repricer.toml")]
    pub config: PathBuf,

    /// Marketplace whose pricing config is used
    #[arg(short, long)]
    pub marketplace: String,

    /// Orders placed so far today
    #[arg(long)]
    pub orders: u32,

    /// Evaluate as of this instant (RFC 3339) instead of now
    #[arg(long)]
    pub now: Option<DateTime<Utc>>,
}
