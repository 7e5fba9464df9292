//! Static fee schedule: platform fees, competitor profiles, display catalog.
//!
//! [`FeeSchedule::builtin`] carries the compiled-in tables. The same shape
//! (camelCase JSON) can be loaded from a file to model alternate fee
//! assumptions; validation happens in [`SavingsCalculator::new`].
//!
//! [`SavingsCalculator::new`]: crate::SavingsCalculator::new

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{EquivalentGoodItem, FeeTier, MakerRebateTier, VolumeBasis};

/// Bridge transactions assumed per month for every competitor.
pub const DEFAULT_BRIDGE_TRANSACTIONS_PER_MONTH: f64 = 4.0;

/// Everything the calculator needs, as plain data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeSchedule {
    pub platform: PlatformSchedule,
    /// Competitors in display order.
    pub competitors: Vec<CompetitorConfig>,
    #[serde(default = "default_bridge_transactions")]
    pub bridge_transactions_per_month: f64,
    #[serde(default)]
    pub equivalents: Vec<EquivalentGoodItem>,
}

fn default_bridge_transactions() -> f64 {
    DEFAULT_BRIDGE_TRANSACTIONS_PER_MONTH
}

/// Fees charged by the platform being modelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSchedule {
    pub name: String,
    pub simple: SimpleModeFees,
    /// Pro-mode VIP schedule. Must start at a zero threshold.
    pub vip_tiers: Vec<FeeTier>,
    /// Market-maker program. May be empty-below-threshold (no base rung).
    pub market_maker_tiers: Vec<MakerRebateTier>,
    #[serde(default = "fourteen_day")]
    pub volume_basis: VolumeBasis,
}

fn fourteen_day() -> VolumeBasis {
    VolumeBasis::FourteenDay
}

/// Simple-mode pricing: flat per-side rates plus a fixed execution fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleModeFees {
    pub opening_fee_rate: f64,
    pub closing_fee_rate: f64,
    pub execution_fee_usd: f64,
}

/// A competitor venue as configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Cost of a single bridge transaction onto the venue, in USD.
    pub bridge_cost_usd: f64,
    /// Headline maker fee for display; not used in cost math.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flat_maker_fee: Option<f64>,
    /// Headline taker fee for display; not used in cost math.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flat_taker_fee: Option<f64>,
    pub fee_model: FeeModelConfig,
}

/// Cost rule for a competitor, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FeeModelConfig {
    /// Single blended rate on the whole volume.
    #[serde(rename_all = "camelCase")]
    Flat { fee_rate: f64 },

    /// Volume-tiered maker/taker schedule with a 50/50 mix.
    #[serde(rename_all = "camelCase")]
    Tiered {
        tiers: Vec<FeeTier>,
        #[serde(default)]
        volume_basis: VolumeBasis,
    },

    /// Blend of balance-improving and balance-worsening position fees.
    #[serde(rename_all = "camelCase")]
    GmxSplit {
        improving_rate: f64,
        worsening_rate: f64,
        /// Share of volume that improves pool balance (0..=1).
        improving_share: f64,
    },

    /// 14-day tiered schedule with a flat maker rebate above a volume threshold.
    #[serde(rename_all = "camelCase")]
    HyperliquidTiered {
        tiers: Vec<FeeTier>,
        maker_rebate_rate: f64,
        /// 14-day volume at which the rebate starts to apply.
        rebate_threshold_usd: f64,
    },
}

impl FeeSchedule {
    /// Decode a schedule from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode the schedule as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Compiled-in Aster schedule and competitor set.
    pub fn builtin() -> Self {
        Self {
            platform: PlatformSchedule {
                name: "Aster".to_string(),
                simple: SimpleModeFees {
                    opening_fee_rate: 0.0001,
                    closing_fee_rate: 0.0001,
                    execution_fee_usd: 0.5,
                },
                vip_tiers: vec![
                    FeeTier::new("VIP 1", 0.0, 0.0001, 0.00035),
                    FeeTier::new("VIP 2", 2_000_000.0, 0.00008, 0.00034),
                    FeeTier::new("VIP 3", 10_000_000.0, 0.00006, 0.00032),
                    FeeTier::new("VIP 4", 50_000_000.0, 0.00004, 0.0003),
                    FeeTier::new("VIP 5", 200_000_000.0, 0.00002, 0.00028),
                    FeeTier::new("VIP 6", 500_000_000.0, 0.0, 0.00025),
                ],
                market_maker_tiers: vec![
                    MakerRebateTier::new("MM 1", 25_000_000.0, 0.0003, 0.00002),
                    MakerRebateTier::new("MM 2", 100_000_000.0, 0.00028, 0.00004),
                    MakerRebateTier::new("MM 3", 250_000_000.0, 0.00025, 0.00005),
                ],
                volume_basis: VolumeBasis::FourteenDay,
            },
            competitors: builtin_competitors(),
            bridge_transactions_per_month: DEFAULT_BRIDGE_TRANSACTIONS_PER_MONTH,
            equivalents: builtin_equivalents(),
        }
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_competitors() -> Vec<CompetitorConfig> {
    vec![
        CompetitorConfig {
            name: "GMX".to_string(),
            description: "Decentralized perpetual exchange on Arbitrum/Avalanche".to_string(),
            bridge_cost_usd: 5.0,
            flat_maker_fee: Some(0.0005),
            flat_taker_fee: Some(0.0007),
            fee_model: FeeModelConfig::GmxSplit {
                improving_rate: 0.0008,
                worsening_rate: 0.0012,
                improving_share: 0.7,
            },
        },
        CompetitorConfig {
            name: "dYdX".to_string(),
            description: "Decentralized derivatives exchange".to_string(),
            bridge_cost_usd: 3.0,
            flat_maker_fee: Some(0.0001),
            flat_taker_fee: Some(0.0005),
            fee_model: FeeModelConfig::Tiered {
                tiers: vec![
                    FeeTier::new("Tier 1", 0.0, 0.0001, 0.0005),
                    FeeTier::new("Tier 2", 1_000_000.0, 0.0001, 0.0004),
                    FeeTier::new("Tier 3", 5_000_000.0, 0.00005, 0.00035),
                    FeeTier::new("Tier 4", 25_000_000.0, 0.0, 0.0003),
                    FeeTier::new("Tier 5", 125_000_000.0, 0.0, 0.00025),
                ],
                volume_basis: VolumeBasis::ThirtyDay,
            },
        },
        CompetitorConfig {
            name: "Hyperliquid".to_string(),
            description: "Layer 1 perpetual exchange".to_string(),
            bridge_cost_usd: 2.0,
            flat_maker_fee: Some(0.00015),
            flat_taker_fee: Some(0.00045),
            fee_model: FeeModelConfig::HyperliquidTiered {
                tiers: vec![
                    FeeTier::new("Tier 0", 0.0, 0.00015, 0.00045),
                    FeeTier::new("Tier 1", 5_000_000.0, 0.00012, 0.0004),
                    FeeTier::new("Tier 2", 25_000_000.0, 0.00008, 0.00035),
                    FeeTier::new("Tier 3", 100_000_000.0, 0.00004, 0.0003),
                    FeeTier::new("Tier 4", 500_000_000.0, 0.0, 0.00028),
                    FeeTier::new("Tier 5", 2_000_000_000.0, 0.0, 0.00026),
                    FeeTier::new("Tier 6", 7_000_000_000.0, 0.0, 0.00024),
                ],
                maker_rebate_rate: 0.00002,
                rebate_threshold_usd: 50_000_000.0,
            },
        },
        CompetitorConfig {
            name: "Binance".to_string(),
            description: "World's largest centralized exchange".to_string(),
            bridge_cost_usd: 8.0,
            flat_maker_fee: Some(0.0002),
            flat_taker_fee: Some(0.0005),
            fee_model: FeeModelConfig::Tiered {
                tiers: vec![
                    FeeTier::new("VIP 0", 0.0, 0.0002, 0.0005),
                    FeeTier::new("VIP 1", 15_000_000.0, 0.00016, 0.0004),
                    FeeTier::new("VIP 2", 50_000_000.0, 0.00014, 0.00035),
                    FeeTier::new("VIP 3", 100_000_000.0, 0.00012, 0.00032),
                    FeeTier::new("VIP 4", 600_000_000.0, 0.0001, 0.0003),
                    FeeTier::new("VIP 5", 1_000_000_000.0, 0.00008, 0.00027),
                    FeeTier::new("VIP 6", 2_500_000_000.0, 0.00006, 0.00025),
                ],
                volume_basis: VolumeBasis::ThirtyDay,
            },
        },
        CompetitorConfig {
            name: "Bybit".to_string(),
            description: "Major centralized exchange".to_string(),
            bridge_cost_usd: 6.0,
            flat_maker_fee: Some(0.0002),
            flat_taker_fee: Some(0.00055),
            fee_model: FeeModelConfig::Tiered {
                tiers: vec![
                    FeeTier::new("VIP 0", 0.0, 0.0002, 0.00055),
                    FeeTier::new("VIP 1", 10_000_000.0, 0.00018, 0.0004),
                    FeeTier::new("VIP 2", 25_000_000.0, 0.00016, 0.000375),
                    FeeTier::new("VIP 3", 50_000_000.0, 0.00014, 0.00035),
                    FeeTier::new("VIP 4", 100_000_000.0, 0.00012, 0.00032),
                    FeeTier::new("VIP 5", 250_000_000.0, 0.0001, 0.00032),
                ],
                volume_basis: VolumeBasis::ThirtyDay,
            },
        },
        CompetitorConfig {
            name: "Coinbase".to_string(),
            description: "US-based centralized exchange".to_string(),
            bridge_cost_usd: 7.0,
            flat_maker_fee: Some(0.0002),
            flat_taker_fee: Some(0.0004),
            fee_model: FeeModelConfig::Flat { fee_rate: 0.0003 },
        },
        CompetitorConfig {
            name: "ApeX".to_string(),
            description: "Bybit-backed decentralized exchange".to_string(),
            bridge_cost_usd: 4.0,
            flat_maker_fee: Some(0.0002),
            flat_taker_fee: Some(0.0005),
            fee_model: FeeModelConfig::Flat { fee_rate: 0.0004 },
        },
    ]
}

fn builtin_equivalents() -> Vec<EquivalentGoodItem> {
    vec![
        EquivalentGoodItem::new("coffee", "Cups of coffee", 5.0),
        EquivalentGoodItem::new("streaming", "Months of Netflix", 15.49),
        EquivalentGoodItem::new("dinner", "Dinners for two", 120.0),
        EquivalentGoodItem::new("sneakers", "Pairs of sneakers", 150.0),
        EquivalentGoodItem::new("airpods", "AirPods Pro", 249.0),
        EquivalentGoodItem::new("console", "PlayStation 5 consoles", 499.0),
        EquivalentGoodItem::new("iphone", "iPhone Pro", 999.0),
        EquivalentGoodItem::new("macbook", "MacBook Pro", 2_499.0),
        EquivalentGoodItem::new("vacation", "Week-long vacations", 4_000.0),
        EquivalentGoodItem::new("watch", "Rolex Submariner", 10_100.0),
        EquivalentGoodItem::new("tesla", "Tesla Model 3", 42_490.0),
        EquivalentGoodItem::new("lambo", "Lamborghini Huracán", 248_295.0),
    ]
}
