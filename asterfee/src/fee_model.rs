//! Per-venue cost rules.
//!
//! Each competitor is priced by exactly one [`FeeModel`] variant. The
//! variant-level functions are public so each rule can be checked on its own.

use serde::{Deserialize, Serialize};

use crate::config::FeeModelConfig;
use crate::error::{FeeError, Result};
use crate::tiers::TierTable;
use crate::types::{FeeTier, VolumeBasis};

/// Share of volume assumed to execute as maker (the rest as taker).
pub const MAKER_SHARE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeeModelKind {
    Flat,
    Tiered,
    GmxSplit,
    HyperliquidTiered,
}

impl std::fmt::Display for FeeModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeeModelKind::Flat => write!(f, "flat"),
            FeeModelKind::Tiered => write!(f, "tiered"),
            FeeModelKind::GmxSplit => write!(f, "gmxSplit"),
            FeeModelKind::HyperliquidTiered => write!(f, "hyperliquidTiered"),
        }
    }
}

/// Validated cost rule.
#[derive(Debug, Clone)]
pub enum FeeModel {
    Flat {
        fee_rate: f64,
    },
    Tiered {
        table: TierTable<FeeTier>,
        basis: VolumeBasis,
    },
    GmxSplit {
        improving_rate: f64,
        worsening_rate: f64,
        improving_share: f64,
    },
    HyperliquidTiered {
        table: TierTable<FeeTier>,
        maker_rebate_rate: f64,
        rebate_threshold_usd: f64,
    },
}

/// Monthly fee cost on one venue, before bridge costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeCost {
    pub fee_usd: f64,
    /// Resolved tier name for tiered models.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    /// Maker rebate already subtracted from `fee_usd`.
    #[serde(default)]
    pub rebate_usd: f64,
}

impl FeeModel {
    /// Validate a configured model for `venue`.
    pub fn from_config(venue: &str, config: &FeeModelConfig) -> Result<Self> {
        match config {
            FeeModelConfig::Flat { fee_rate } => {
                check_rate(venue, "feeRate", *fee_rate)?;
                Ok(FeeModel::Flat {
                    fee_rate: *fee_rate,
                })
            }
            FeeModelConfig::Tiered {
                tiers,
                volume_basis,
            } => Ok(FeeModel::Tiered {
                table: TierTable::new(venue, tiers.clone())?,
                basis: *volume_basis,
            }),
            FeeModelConfig::GmxSplit {
                improving_rate,
                worsening_rate,
                improving_share,
            } => {
                check_rate(venue, "improvingRate", *improving_rate)?;
                check_rate(venue, "worseningRate", *worsening_rate)?;
                if !(0.0..=1.0).contains(improving_share) {
                    return Err(FeeError::InvalidRate {
                        venue: venue.to_string(),
                        field: "improvingShare",
                        value: *improving_share,
                    });
                }
                Ok(FeeModel::GmxSplit {
                    improving_rate: *improving_rate,
                    worsening_rate: *worsening_rate,
                    improving_share: *improving_share,
                })
            }
            FeeModelConfig::HyperliquidTiered {
                tiers,
                maker_rebate_rate,
                rebate_threshold_usd,
            } => {
                check_rate(venue, "makerRebateRate", *maker_rebate_rate)?;
                check_rate(venue, "rebateThresholdUsd", *rebate_threshold_usd)?;
                Ok(FeeModel::HyperliquidTiered {
                    table: TierTable::new(venue, tiers.clone())?,
                    maker_rebate_rate: *maker_rebate_rate,
                    rebate_threshold_usd: *rebate_threshold_usd,
                })
            }
        }
    }

    pub fn kind(&self) -> FeeModelKind {
        match self {
            FeeModel::Flat { .. } => FeeModelKind::Flat,
            FeeModel::Tiered { .. } => FeeModelKind::Tiered,
            FeeModel::GmxSplit { .. } => FeeModelKind::GmxSplit,
            FeeModel::HyperliquidTiered { .. } => FeeModelKind::HyperliquidTiered,
        }
    }

    /// Tier that applies at this volume, for tiered models.
    pub fn resolve_tier(&self, monthly_volume_usd: f64) -> Option<&FeeTier> {
        match self {
            FeeModel::Tiered { table, basis } => Some(table.resolve(monthly_volume_usd, *basis)),
            FeeModel::HyperliquidTiered { table, .. } => {
                Some(table.resolve(monthly_volume_usd, VolumeBasis::FourteenDay))
            }
            FeeModel::Flat { .. } | FeeModel::GmxSplit { .. } => None,
        }
    }

    /// Fee cost for a month of trading at `monthly_volume_usd`.
    pub fn cost(&self, monthly_volume_usd: f64) -> FeeCost {
        match self {
            FeeModel::Flat { fee_rate } => FeeCost {
                fee_usd: flat_cost(monthly_volume_usd, *fee_rate),
                tier: None,
                rebate_usd: 0.0,
            },
            FeeModel::Tiered { table, basis } => {
                let tier = table.resolve(monthly_volume_usd, *basis);
                FeeCost {
                    fee_usd: tiered_cost(monthly_volume_usd, tier),
                    tier: Some(tier.name.clone()),
                    rebate_usd: 0.0,
                }
            }
            FeeModel::GmxSplit {
                improving_rate,
                worsening_rate,
                improving_share,
            } => FeeCost {
                fee_usd: gmx_split_cost(
                    monthly_volume_usd,
                    *improving_rate,
                    *worsening_rate,
                    *improving_share,
                ),
                tier: None,
                rebate_usd: 0.0,
            },
            FeeModel::HyperliquidTiered {
                table,
                maker_rebate_rate,
                rebate_threshold_usd,
            } => {
                let tier = table.resolve(monthly_volume_usd, VolumeBasis::FourteenDay);
                let rebate = hyperliquid_maker_rebate(
                    monthly_volume_usd,
                    *maker_rebate_rate,
                    *rebate_threshold_usd,
                );
                FeeCost {
                    fee_usd: tiered_cost(monthly_volume_usd, tier) - rebate,
                    tier: Some(tier.name.clone()),
                    rebate_usd: rebate,
                }
            }
        }
    }
}

/// `V × rate`.
pub fn flat_cost(monthly_volume_usd: f64, fee_rate: f64) -> f64 {
    monthly_volume_usd * fee_rate
}

/// Effective rate when `MAKER_SHARE` of volume executes as maker.
pub fn blended_rate(maker_fee_rate: f64, taker_fee_rate: f64) -> f64 {
    MAKER_SHARE * maker_fee_rate + (1.0 - MAKER_SHARE) * taker_fee_rate
}

/// `V × 0.5 × (maker + taker)`.
pub fn tiered_cost(monthly_volume_usd: f64, tier: &FeeTier) -> f64 {
    monthly_volume_usd * tier.blended_rate()
}

/// Weighted blend of balance-improving and balance-worsening trades.
pub fn gmx_split_cost(
    monthly_volume_usd: f64,
    improving_rate: f64,
    worsening_rate: f64,
    improving_share: f64,
) -> f64 {
    let improving = monthly_volume_usd * improving_rate;
    let worsening = monthly_volume_usd * worsening_rate;
    improving_share * improving + (1.0 - improving_share) * worsening
}

/// Rebate on the maker half of volume, once 14-day volume reaches the threshold.
pub fn hyperliquid_maker_rebate(
    monthly_volume_usd: f64,
    maker_rebate_rate: f64,
    rebate_threshold_usd: f64,
) -> f64 {
    let fourteen_day = VolumeBasis::FourteenDay.effective_volume(monthly_volume_usd);
    if fourteen_day >= rebate_threshold_usd {
        MAKER_SHARE * monthly_volume_usd * maker_rebate_rate
    } else {
        0.0
    }
}

fn check_rate(venue: &str, field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FeeError::InvalidRate {
            venue: venue.to_string(),
            field,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn hyperliquid() -> FeeModel {
        FeeModel::from_config(
            "Hyperliquid",
            &FeeModelConfig::HyperliquidTiered {
                tiers: vec![
                    FeeTier::new("Tier 0", 0.0, 0.00015, 0.00045),
                    FeeTier::new("Tier 1", 5_000_000.0, 0.00012, 0.0004),
                    FeeTier::new("Tier 2", 25_000_000.0, 0.00008, 0.00035),
                ],
                maker_rebate_rate: 0.00002,
                rebate_threshold_usd: 50_000_000.0,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_flat_cost() {
        let model = FeeModel::from_config("Coinbase", &FeeModelConfig::Flat { fee_rate: 0.0003 })
            .unwrap();
        let cost = model.cost(1_000_000.0);
        assert!(approx(cost.fee_usd, 300.0));
        assert!(cost.tier.is_none());
        assert_eq!(model.kind(), FeeModelKind::Flat);
    }

    #[test]
    fn test_tiered_cost_uses_half_and_half() {
        let tier = FeeTier::new("VIP 1", 15_000_000.0, 0.00016, 0.0004);
        // 20M × 0.5 × (0.00016 + 0.0004) = 5_600
        assert!(approx(tiered_cost(20_000_000.0, &tier), 5_600.0));
    }

    #[test]
    fn test_gmx_split_weights() {
        // improving = 800, worsening = 1200 → 0.7×800 + 0.3×1200 = 920
        assert!(approx(gmx_split_cost(1_000_000.0, 0.0008, 0.0012, 0.7), 920.0));
    }

    #[test]
    fn test_gmx_share_out_of_range_rejected() {
        let err = FeeModel::from_config(
            "GMX",
            &FeeModelConfig::GmxSplit {
                improving_rate: 0.0008,
                worsening_rate: 0.0012,
                improving_share: 1.5,
            },
        )
        .unwrap_err();
        assert!(matches!(err, FeeError::InvalidRate { field: "improvingShare", .. }));
    }

    #[test]
    fn test_hyperliquid_no_rebate_below_threshold() {
        // 100M monthly → 46.67M over 14 days: below the 50M rebate threshold.
        let cost = hyperliquid().cost(100_000_000.0);
        assert_eq!(cost.rebate_usd, 0.0);
        assert_eq!(cost.tier.as_deref(), Some("Tier 2"));
        // 0.5×100M×0.00035 + 0.5×100M×0.00008 = 17_500 + 4_000
        assert!(approx(cost.fee_usd, 21_500.0));
    }

    #[test]
    fn test_hyperliquid_rebate_boundary_on_builtin_schedule() {
        let schedule = crate::config::FeeSchedule::builtin();
        let config = schedule
            .competitors
            .iter()
            .find(|c| c.name == "Hyperliquid")
            .unwrap();
        let model = FeeModel::from_config(&config.name, &config.fee_model).unwrap();
        let threshold = match config.fee_model {
            FeeModelConfig::HyperliquidTiered {
                rebate_threshold_usd,
                ..
            } => rebate_threshold_usd,
            _ => panic!("unexpected fee model"),
        };
        assert_eq!(threshold, 50_000_000.0);

        let fourteen_day = |monthly: f64| VolumeBasis::FourteenDay.effective_volume(monthly);

        // Exactly 50M over 14 days: the threshold is inclusive.
        let mut monthly = 50_000_000.0 * 30.0 / 14.0;
        assert_eq!(fourteen_day(monthly), threshold);

        // Step down one f64 at a time; every input still at the threshold earns the rebate.
        while fourteen_day(monthly) >= threshold {
            let cost = model.cost(monthly);
            assert!(approx(cost.rebate_usd, 0.5 * monthly * 0.00002), "{monthly}");
            monthly = f64::from_bits(monthly.to_bits() - 1);
        }

        // First input below the threshold: no rebate.
        assert!(fourteen_day(monthly) < threshold);
        assert_eq!(model.cost(monthly).rebate_usd, 0.0);
    }

    #[test]
    fn test_hyperliquid_rebate_applied_above_threshold() {
        let monthly = 150_000_000.0; // 70M over 14 days
        let cost = hyperliquid().cost(monthly);
        let rebate = 0.5 * monthly * 0.00002;
        assert!(approx(cost.rebate_usd, rebate));
        let gross = 0.5 * monthly * 0.00035 + 0.5 * monthly * 0.00008;
        assert!(approx(cost.fee_usd, gross - rebate));
    }

    #[test]
    fn test_tiered_model_honours_basis() {
        let tiers = vec![
            FeeTier::new("Base", 0.0, 0.0002, 0.0004),
            FeeTier::new("Upper", 10_000_000.0, 0.0001, 0.0003),
        ];
        let thirty = FeeModel::from_config(
            "Venue",
            &FeeModelConfig::Tiered {
                tiers: tiers.clone(),
                volume_basis: VolumeBasis::ThirtyDay,
            },
        )
        .unwrap();
        let fourteen = FeeModel::from_config(
            "Venue",
            &FeeModelConfig::Tiered {
                tiers,
                volume_basis: VolumeBasis::FourteenDay,
            },
        )
        .unwrap();
        assert_eq!(thirty.resolve_tier(15_000_000.0).unwrap().name, "Upper");
        assert_eq!(fourteen.resolve_tier(15_000_000.0).unwrap().name, "Base");
    }

    #[test]
    fn test_negative_flat_rate_rejected() {
        assert!(FeeModel::from_config("Bad", &FeeModelConfig::Flat { fee_rate: -0.1 }).is_err());
        assert!(
            FeeModel::from_config("Bad", &FeeModelConfig::Flat { fee_rate: f64::NAN }).is_err()
        );
    }
}
