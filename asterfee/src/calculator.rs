//! Savings calculator.
//!
//! Built once from a [`FeeSchedule`]; construction validates every table so
//! the per-call paths are infallible. All methods take `&self` and are pure.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::config::{FeeSchedule, SimpleModeFees};
use crate::equivalents::compute_equivalents;
use crate::error::{FeeError, Result};
use crate::fee_model::{blended_rate, FeeCost, FeeModel, FeeModelKind};
use crate::tiers::{OptionalTierTable, TierTable};
use crate::types::{
    Equivalent, EquivalentGoodItem, FeeTier, MakerRebateTier, SavingsResult, TradingMode,
    VolumeBasis,
};

/// A validated competitor venue.
#[derive(Debug, Clone)]
pub struct CompetitorProfile {
    pub name: String,
    pub description: String,
    pub bridge_cost_usd: f64,
    pub flat_maker_fee: Option<f64>,
    pub flat_taker_fee: Option<f64>,
    pub fee_model: FeeModel,
}

/// Platform fees for one month under the selected mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformFees {
    pub mode: TradingMode,
    pub total_fees_usd: f64,
    pub detail: PlatformFeeDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlatformFeeDetail {
    #[serde(rename_all = "camelCase")]
    Simple {
        opening_fee_usd: f64,
        closing_fee_usd: f64,
        execution_fee_usd: f64,
    },
    #[serde(rename_all = "camelCase")]
    Pro {
        vip_tier: String,
        market_maker_tier: Option<String>,
        /// Maker rate after any market-maker rebate.
        maker_fee_rate: f64,
        taker_fee_rate: f64,
    },
}

/// Competitor cost for one month, including bridge transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorCost {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Headline maker fee the venue advertises; not used in the cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flat_maker_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flat_taker_fee: Option<f64>,
    pub fee_model: FeeModelKind,
    pub fee: FeeCost,
    pub bridge_cost_usd: f64,
    pub total_cost_usd: f64,
}

/// Full output for a `(volume, mode)` input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsReport {
    pub monthly_volume_usd: f64,
    pub platform: PlatformFees,
    /// Same order as `results`.
    pub competitors: Vec<CompetitorCost>,
    pub results: Vec<SavingsResult>,
}

/// Tier a venue lands on at a given volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTier {
    pub venue: String,
    pub basis: VolumeBasis,
    pub effective_volume_usd: f64,
    /// `None` only for the market-maker program below its lowest threshold.
    pub tier: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SavingsCalculator {
    schedule: FeeSchedule,
    simple: SimpleModeFees,
    platform_basis: VolumeBasis,
    vip: TierTable<FeeTier>,
    market_maker: OptionalTierTable<MakerRebateTier>,
    competitors: Vec<CompetitorProfile>,
    /// Lower-cased name -> index into `competitors`.
    by_name: HashMap<String, usize>,
    bridge_transactions_per_month: f64,
}

impl SavingsCalculator {
    /// Validate a schedule and build the calculator.
    ///
    /// # Errors
    ///
    /// Any malformed table, negative or non-finite rate, duplicate competitor,
    /// or empty competitor list is a configuration error.
    pub fn new(schedule: FeeSchedule) -> Result<Self> {
        let platform = &schedule.platform;
        let venue = platform.name.as_str();

        let simple = platform.simple.clone();
        check_non_negative(venue, "openingFeeRate", simple.opening_fee_rate)?;
        check_non_negative(venue, "closingFeeRate", simple.closing_fee_rate)?;
        check_non_negative(venue, "executionFeeUsd", simple.execution_fee_usd)?;

        let vip = TierTable::new(format!("{venue} VIP"), platform.vip_tiers.clone())?;
        let market_maker =
            OptionalTierTable::new(format!("{venue} MM"), platform.market_maker_tiers.clone())?;

        check_non_negative(
            "schedule",
            "bridgeTransactionsPerMonth",
            schedule.bridge_transactions_per_month,
        )?;

        if schedule.competitors.is_empty() {
            return Err(FeeError::NoCompetitors);
        }

        let mut competitors = Vec::with_capacity(schedule.competitors.len());
        let mut by_name = HashMap::new();
        for config in &schedule.competitors {
            check_non_negative(&config.name, "bridgeCostUsd", config.bridge_cost_usd)?;
            let fee_model = FeeModel::from_config(&config.name, &config.fee_model)?;

            if by_name
                .insert(config.name.to_lowercase(), competitors.len())
                .is_some()
            {
                return Err(FeeError::DuplicateCompetitor(config.name.clone()));
            }

            debug!(competitor = %config.name, model = %fee_model.kind(), "competitor loaded");
            competitors.push(CompetitorProfile {
                name: config.name.clone(),
                description: config.description.clone(),
                bridge_cost_usd: config.bridge_cost_usd,
                flat_maker_fee: config.flat_maker_fee,
                flat_taker_fee: config.flat_taker_fee,
                fee_model,
            });
        }

        for item in &schedule.equivalents {
            if !(item.unit_price_usd.is_finite() && item.unit_price_usd > 0.0) {
                return Err(FeeError::InvalidRate {
                    venue: item.id.clone(),
                    field: "unitPriceUsd",
                    value: item.unit_price_usd,
                });
            }
        }

        let platform_basis = platform.volume_basis;
        let bridge_transactions_per_month = schedule.bridge_transactions_per_month;

        info!(
            platform = %platform.name,
            vip_tiers = vip.tiers().len(),
            mm_tiers = market_maker.tiers().len(),
            competitors = competitors.len(),
            "fee schedule validated"
        );

        Ok(Self {
            simple,
            platform_basis,
            vip,
            market_maker,
            competitors,
            by_name,
            bridge_transactions_per_month,
            schedule,
        })
    }

    /// Calculator over the compiled-in schedule.
    pub fn builtin() -> Result<Self> {
        Self::new(FeeSchedule::builtin())
    }

    pub fn schedule(&self) -> &FeeSchedule {
        &self.schedule
    }

    pub fn platform_name(&self) -> &str {
        &self.schedule.platform.name
    }

    /// Competitors in display order.
    pub fn competitors(&self) -> &[CompetitorProfile] {
        &self.competitors
    }

    /// Look up a competitor by name (case-insensitive).
    pub fn competitor(&self, name: &str) -> Option<&CompetitorProfile> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&i| &self.competitors[i])
    }

    pub fn catalog(&self) -> &[EquivalentGoodItem] {
        &self.schedule.equivalents
    }

    /// Platform fees for a month of trading under `mode`.
    pub fn platform_fees(&self, monthly_volume_usd: f64, mode: TradingMode) -> PlatformFees {
        match mode {
            TradingMode::Simple => {
                let opening = monthly_volume_usd * self.simple.opening_fee_rate;
                let closing = monthly_volume_usd * self.simple.closing_fee_rate;
                let execution = self.simple.execution_fee_usd;
                PlatformFees {
                    mode,
                    total_fees_usd: opening + closing + execution,
                    detail: PlatformFeeDetail::Simple {
                        opening_fee_usd: opening,
                        closing_fee_usd: closing,
                        execution_fee_usd: execution,
                    },
                }
            }
            TradingMode::Pro => {
                let vip = self.vip.resolve(monthly_volume_usd, self.platform_basis);
                let mm = self
                    .market_maker
                    .resolve(monthly_volume_usd, self.platform_basis);

                let (maker, taker) = match mm {
                    Some(mm) => (
                        mm.effective_maker_fee(vip.maker_fee_rate),
                        mm.taker_fee_rate,
                    ),
                    None => (vip.maker_fee_rate, vip.taker_fee_rate),
                };

                PlatformFees {
                    mode,
                    total_fees_usd: monthly_volume_usd * blended_rate(maker, taker),
                    detail: PlatformFeeDetail::Pro {
                        vip_tier: vip.name.clone(),
                        market_maker_tier: mm.map(|t| t.name.clone()),
                        maker_fee_rate: maker,
                        taker_fee_rate: taker,
                    },
                }
            }
        }
    }

    /// Competitor fee cost plus monthly bridge cost.
    pub fn competitor_cost(
        &self,
        competitor: &CompetitorProfile,
        monthly_volume_usd: f64,
    ) -> CompetitorCost {
        let fee = competitor.fee_model.cost(monthly_volume_usd);
        let bridge = competitor.bridge_cost_usd * self.bridge_transactions_per_month;
        CompetitorCost {
            name: competitor.name.clone(),
            description: competitor.description.clone(),
            flat_maker_fee: competitor.flat_maker_fee,
            flat_taker_fee: competitor.flat_taker_fee,
            fee_model: competitor.fee_model.kind(),
            total_cost_usd: fee.fee_usd + bridge,
            fee,
            bridge_cost_usd: bridge,
        }
    }

    /// Savings against every competitor, in display order.
    ///
    /// Input is assumed sanitized: finite and non-negative.
    pub fn compute_savings(&self, monthly_volume_usd: f64, mode: TradingMode) -> SavingsReport {
        let platform = self.platform_fees(monthly_volume_usd, mode);

        let competitors: Vec<CompetitorCost> = self
            .competitors
            .iter()
            .map(|c| self.competitor_cost(c, monthly_volume_usd))
            .collect();

        let results = competitors
            .iter()
            .map(|c| SavingsResult::new(&c.name, c.total_cost_usd, platform.total_fees_usd))
            .collect();

        trace!(
            volume = monthly_volume_usd,
            %mode,
            platform_fees = platform.total_fees_usd,
            "savings computed"
        );

        SavingsReport {
            monthly_volume_usd,
            platform,
            competitors,
            results,
        }
    }

    /// Which tier every tiered venue resolves to at this volume.
    pub fn resolved_tiers(&self, monthly_volume_usd: f64) -> Vec<ResolvedTier> {
        let basis = self.platform_basis;
        let effective = basis.effective_volume(monthly_volume_usd);

        let mut out = vec![
            ResolvedTier {
                venue: self.vip.venue().to_string(),
                basis,
                effective_volume_usd: effective,
                tier: Some(self.vip.resolve(monthly_volume_usd, basis).name.clone()),
            },
            ResolvedTier {
                venue: self.market_maker.venue().to_string(),
                basis,
                effective_volume_usd: effective,
                tier: self
                    .market_maker
                    .resolve(monthly_volume_usd, basis)
                    .map(|t| t.name.clone()),
            },
        ];

        for competitor in &self.competitors {
            let basis = match &competitor.fee_model {
                FeeModel::Tiered { basis, .. } => *basis,
                FeeModel::HyperliquidTiered { .. } => VolumeBasis::FourteenDay,
                FeeModel::Flat { .. } | FeeModel::GmxSplit { .. } => continue,
            };
            out.push(ResolvedTier {
                venue: competitor.name.clone(),
                basis,
                effective_volume_usd: basis.effective_volume(monthly_volume_usd),
                tier: competitor
                    .fee_model
                    .resolve_tier(monthly_volume_usd)
                    .map(|t| t.name.clone()),
            });
        }

        out
    }

    /// Translate a savings amount using the schedule's catalog.
    pub fn compute_equivalents(&self, amount_usd: f64, max_items: usize) -> Vec<Equivalent> {
        compute_equivalents(amount_usd, &self.schedule.equivalents, max_items)
    }
}

fn check_non_negative(venue: &str, field: &'static str, value: f64) -> Result<()> {
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
    use crate::config::{CompetitorConfig, FeeModelConfig};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn calc() -> SavingsCalculator {
        SavingsCalculator::builtin().unwrap()
    }

    #[test]
    fn test_builtin_schedule_validates() {
        let calc = calc();
        assert_eq!(calc.platform_name(), "Aster");
        assert_eq!(calc.competitors().len(), 7);
    }

    #[test]
    fn test_simple_mode_fees() {
        let fees = calc().platform_fees(1_000_000.0, TradingMode::Simple);
        // 1M × 0.0001 + 1M × 0.0001 + 0.5
        assert!(approx(fees.total_fees_usd, 200.5));
        match fees.detail {
            PlatformFeeDetail::Simple {
                opening_fee_usd,
                execution_fee_usd,
                ..
            } => {
                assert!(approx(opening_fee_usd, 100.0));
                assert_eq!(execution_fee_usd, 0.5);
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn test_pro_mode_without_market_maker() {
        let fees = calc().platform_fees(1_000_000.0, TradingMode::Pro);
        match &fees.detail {
            PlatformFeeDetail::Pro {
                vip_tier,
                market_maker_tier,
                maker_fee_rate,
                taker_fee_rate,
            } => {
                assert_eq!(vip_tier, "VIP 1");
                assert!(market_maker_tier.is_none());
                assert_eq!(*maker_fee_rate, 0.0001);
                assert_eq!(*taker_fee_rate, 0.00035);
            }
            other => panic!("unexpected detail: {other:?}"),
        }
        assert!(approx(fees.total_fees_usd, 1_000_000.0 * 0.5 * (0.0001 + 0.00035)));
    }

    #[test]
    fn test_pro_mode_market_maker_overrides() {
        // 150M monthly → 70M over 14 days: VIP 4 and MM 1.
        let fees = calc().platform_fees(150_000_000.0, TradingMode::Pro);
        match &fees.detail {
            PlatformFeeDetail::Pro {
                vip_tier,
                market_maker_tier,
                maker_fee_rate,
                taker_fee_rate,
            } => {
                assert_eq!(vip_tier, "VIP 4");
                assert_eq!(market_maker_tier.as_deref(), Some("MM 1"));
                assert!(approx(*maker_fee_rate, 0.00004 - 0.00002));
                assert_eq!(*taker_fee_rate, 0.0003);
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn test_pro_mode_maker_floor() {
        // 1.5B monthly → 700M over 14 days: VIP 6 (maker 0) and MM 3.
        let fees = calc().platform_fees(1_500_000_000.0, TradingMode::Pro);
        match fees.detail {
            PlatformFeeDetail::Pro { maker_fee_rate, .. } => assert_eq!(maker_fee_rate, 0.0),
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn test_bridge_cost_multiplied() {
        let calc = calc();
        let gmx = calc.competitor("gmx").unwrap();
        let cost = calc.competitor_cost(gmx, 0.0);
        assert_eq!(cost.bridge_cost_usd, 20.0);
        assert_eq!(cost.total_cost_usd, 20.0);
        assert_eq!(cost.fee_model, FeeModelKind::GmxSplit);
    }

    #[test]
    fn test_competitor_cost_carries_display_details() {
        let calc = calc();
        let gmx = calc.competitor("GMX").unwrap();
        let cost = calc.competitor_cost(gmx, 1_000_000.0);
        assert_eq!(cost.description, gmx.description);
        assert!(!cost.description.is_empty());
        assert_eq!(cost.flat_maker_fee, Some(0.0005));
        assert_eq!(cost.flat_taker_fee, Some(0.0007));

        let value = serde_json::to_value(&cost).unwrap();
        assert_eq!(value["flatMakerFee"], 0.0005);
        assert_eq!(value["description"], gmx.description.as_str());
    }

    #[test]
    fn test_display_fees_omitted_when_unset() {
        let mut schedule = FeeSchedule::builtin();
        schedule.competitors.push(CompetitorConfig {
            name: "Bare".into(),
            description: String::new(),
            bridge_cost_usd: 1.0,
            flat_maker_fee: None,
            flat_taker_fee: None,
            fee_model: FeeModelConfig::Flat { fee_rate: 0.0003 },
        });
        let calc = SavingsCalculator::new(schedule).unwrap();
        let bare = calc.competitor("Bare").unwrap();
        let value = serde_json::to_value(calc.competitor_cost(bare, 0.0)).unwrap();
        assert!(value.get("flatMakerFee").is_none());
        assert!(value.get("flatTakerFee").is_none());
    }

    #[test]
    fn test_competitor_lookup_case_insensitive() {
        let calc = calc();
        assert_eq!(calc.competitor("HYPERLIQUID").unwrap().name, "Hyperliquid");
        assert!(calc.competitor("FTX").is_none());
    }

    #[test]
    fn test_duplicate_competitor_rejected() {
        let mut schedule = FeeSchedule::builtin();
        let dup = schedule.competitors[0].clone();
        schedule.competitors.push(dup);
        assert!(matches!(
            SavingsCalculator::new(schedule),
            Err(FeeError::DuplicateCompetitor(name)) if name == "GMX"
        ));
    }

    #[test]
    fn test_no_competitors_rejected() {
        let mut schedule = FeeSchedule::builtin();
        schedule.competitors.clear();
        assert!(matches!(
            SavingsCalculator::new(schedule),
            Err(FeeError::NoCompetitors)
        ));
    }

    #[test]
    fn test_bad_competitor_table_rejected_at_construction() {
        let mut schedule = FeeSchedule::builtin();
        schedule.competitors.push(CompetitorConfig {
            name: "Broken".into(),
            description: String::new(),
            bridge_cost_usd: 1.0,
            flat_maker_fee: None,
            flat_taker_fee: None,
            fee_model: FeeModelConfig::Tiered {
                tiers: Vec::new(),
                volume_basis: VolumeBasis::ThirtyDay,
            },
        });
        let err = SavingsCalculator::new(schedule).err().unwrap();
        assert!(err.is_configuration());
        assert!(matches!(err, FeeError::EmptyTierTable { venue } if venue == "Broken"));
    }

    #[test]
    fn test_zero_priced_catalog_item_rejected() {
        let mut schedule = FeeSchedule::builtin();
        schedule.equivalents[0].unit_price_usd = 0.0;
        assert!(SavingsCalculator::new(schedule).is_err());
    }

    #[test]
    fn test_resolved_tiers_lists_tiered_venues() {
        let tiers = calc().resolved_tiers(100_000_000.0);
        let venues: Vec<_> = tiers.iter().map(|t| t.venue.as_str()).collect();
        assert_eq!(
            venues,
            ["Aster VIP", "Aster MM", "dYdX", "Hyperliquid", "Binance", "Bybit"]
        );
        let binance = tiers.iter().find(|t| t.venue == "Binance").unwrap();
        assert_eq!(binance.tier.as_deref(), Some("VIP 3"));
        assert_eq!(binance.basis, VolumeBasis::ThirtyDay);
    }
}
