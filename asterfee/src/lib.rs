pub mod baseline;
pub mod calculator;
pub mod config;
pub mod equivalents;
pub mod error;
pub mod fee_model;
pub mod tiers;
pub mod types;

// ---- Top-level re-exports for ergonomic usage ----

// Calculator
pub use calculator::{
    CompetitorCost, CompetitorProfile, PlatformFeeDetail, PlatformFees, ResolvedTier,
    SavingsCalculator, SavingsReport,
};

// Configuration
pub use config::{CompetitorConfig, FeeModelConfig, FeeSchedule, PlatformSchedule, SimpleModeFees};
pub use error::{FeeError, Result};

// Cost rules + tier resolution
pub use fee_model::{FeeCost, FeeModel, FeeModelKind};
pub use tiers::{OptionalTierTable, TierTable, VolumeTier};

// Derived figures
pub use baseline::{best_savings, select_baseline_savings};
pub use equivalents::compute_equivalents;

// Core types
pub use types::{
    BaselineMode, Equivalent, EquivalentGoodItem, FeeTier, MakerRebateTier, SavingsResult,
    Timeframe, TradingMode, VolumeBasis,
};
