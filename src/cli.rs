use std::path::PathBuf;

use asterfee::{BaselineMode, Timeframe, TradingMode};
use clap::{Parser, Subcommand};

use crate::input::{parse_amount, parse_volume};

/// aster-calc: fee savings estimator for Aster against competing venues.
#[derive(Parser, Debug)]
#[command(name = "aster-calc", version)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// JSON fee schedule to use instead of the builtin one (or ASTER_FEE_SCHEDULE)
    #[arg(long, global = true)]
    pub schedule: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compare platform fees with every competitor at a monthly volume
    Savings(SavingsArgs),

    /// Translate a dollar amount into everyday purchases
    Equivalents(EquivalentsArgs),

    /// Show the tier each venue resolves to at a monthly volume
    Tiers(TiersArgs),

    /// Read volume/mode updates from stdin and re-render on every change
    Watch(WatchArgs),

    /// Print the active fee schedule as JSON
    Schedule,
}

#[derive(Parser, Debug)]
pub struct SavingsArgs {
    /// Monthly trading volume in USD (accepts 50000, 250k, 5m, 1.5b)
    #[arg(value_parser = parse_volume)]
    pub volume: f64,

    /// Trading mode (simple, pro)
    #[arg(long, default_value = "simple")]
    pub mode: TradingMode,

    /// Savings horizon (monthly, yearly, lifetime)
    #[arg(long, default_value = "yearly")]
    pub timeframe: Timeframe,

    /// Headline baseline (closest, average, highest)
    #[arg(long, default_value = "closest")]
    pub baseline: BaselineMode,

    /// Maximum number of purchase equivalents to show
    #[arg(long, default_value_t = 3)]
    pub equivalents: usize,

    /// Use the volume as given instead of rounding it by magnitude
    #[arg(long)]
    pub exact: bool,

    #[command(flatten)]
    pub format: FormatArgs,
}

#[derive(Parser, Debug)]
pub struct EquivalentsArgs {
    /// Amount in USD (negative amounts buy nothing)
    #[arg(value_parser = parse_amount, allow_negative_numbers = true)]
    pub amount: f64,

    /// Maximum number of items
    #[arg(long, default_value_t = 3)]
    pub max: usize,

    #[command(flatten)]
    pub format: FormatArgs,
}

#[derive(Parser, Debug)]
pub struct TiersArgs {
    /// Monthly trading volume in USD
    #[arg(value_parser = parse_volume)]
    pub volume: f64,

    #[command(flatten)]
    pub format: FormatArgs,
}

#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Starting monthly volume
    #[arg(long, default_value = "50000", value_parser = parse_volume)]
    pub volume: f64,

    /// Starting trading mode
    #[arg(long, default_value = "simple")]
    pub mode: TradingMode,

    #[arg(long, default_value = "yearly")]
    pub timeframe: Timeframe,

    #[arg(long, default_value = "closest")]
    pub baseline: BaselineMode,

    #[arg(long, default_value_t = 3)]
    pub equivalents: usize,

    /// Use volumes as typed instead of rounding them by magnitude
    #[arg(long)]
    pub exact: bool,

    #[command(flatten)]
    pub format: FormatArgs,
}

#[derive(clap::Args, Debug)]
pub struct FormatArgs {
    /// Output as JSON (one document per line)
    #[arg(long)]
    pub json: bool,

    /// Output as TSV with raw numbers
    #[arg(long, conflicts_with = "json")]
    pub tsv: bool,
}
