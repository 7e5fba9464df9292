use serde::{Deserialize, Serialize};

use crate::fee_model::blended_rate;
use crate::tiers::VolumeTier;

/// One rung of a volume-based maker/taker fee schedule.
///
/// Rates are fractions of notional (`0.0002` = 0.02%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeTier {
    pub name: String,
    pub volume_threshold_usd: f64,
    pub maker_fee_rate: f64,
    pub taker_fee_rate: f64,
}

impl FeeTier {
    pub fn new(name: &str, volume_threshold_usd: f64, maker_fee_rate: f64, taker_fee_rate: f64) -> Self {
        Self {
            name: name.to_string(),
            volume_threshold_usd,
            maker_fee_rate,
            taker_fee_rate,
        }
    }

    /// Rate paid on total volume under the assumed maker/taker mix.
    pub fn blended_rate(&self) -> f64 {
        blended_rate(self.maker_fee_rate, self.taker_fee_rate)
    }
}

impl VolumeTier for FeeTier {
    fn name(&self) -> &str {
        &self.name
    }

    fn threshold(&self) -> f64 {
        self.volume_threshold_usd
    }

    fn rates(&self) -> [(&'static str, f64); 2] {
        [
            ("makerFeeRate", self.maker_fee_rate),
            ("takerFeeRate", self.taker_fee_rate),
        ]
    }
}

/// Platform market-maker rung: overrides the taker rate and rebates makers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakerRebateTier {
    pub name: String,
    pub volume_threshold_usd: f64,
    pub taker_fee_rate: f64,
    pub maker_rebate_rate: f64,
}

impl MakerRebateTier {
    pub fn new(
        name: &str,
        volume_threshold_usd: f64,
        taker_fee_rate: f64,
        maker_rebate_rate: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            volume_threshold_usd,
            taker_fee_rate,
            maker_rebate_rate,
        }
    }

    /// Maker fee after the rebate, floored at zero.
    pub fn effective_maker_fee(&self, base_maker_fee: f64) -> f64 {
        (base_maker_fee - self.maker_rebate_rate).max(0.0)
    }
}

impl VolumeTier for MakerRebateTier {
    fn name(&self) -> &str {
        &self.name
    }

    fn threshold(&self) -> f64 {
        self.volume_threshold_usd
    }

    fn rates(&self) -> [(&'static str, f64); 2] {
        [
            ("takerFeeRate", self.taker_fee_rate),
            ("makerRebateRate", self.maker_rebate_rate),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blended_rate() {
        let tier = FeeTier::new("VIP 0", 0.0, 0.0002, 0.0005);
        assert!((tier.blended_rate() - 0.00035).abs() < 1e-15);
    }

    #[test]
    fn test_blended_rate_matches_tiered_cost() {
        let tier = FeeTier::new("VIP 2", 15_000_000.0, 0.00016, 0.0004);
        let volume = 20_000_000.0;
        assert_eq!(
            crate::fee_model::tiered_cost(volume, &tier),
            volume * tier.blended_rate()
        );
    }

    #[test]
    fn test_effective_maker_fee_reduced() {
        let mm = MakerRebateTier::new("MM 1", 25_000_000.0, 0.0003, 0.00002);
        assert!((mm.effective_maker_fee(0.00008) - 0.00006).abs() < 1e-15);
    }

    #[test]
    fn test_effective_maker_fee_never_negative() {
        let mm = MakerRebateTier::new("MM 3", 250_000_000.0, 0.00025, 0.00015);
        assert_eq!(mm.effective_maker_fee(0.00004), 0.0);
        assert_eq!(mm.effective_maker_fee(0.0), 0.0);
    }

    #[test]
    fn test_fee_tier_camel_case_json() {
        let json = r#"{
            "name": "VIP 3",
            "volumeThresholdUsd": 100000000,
            "makerFeeRate": 0.00012,
            "takerFeeRate": 0.00032
        }"#;
        let tier: FeeTier = serde_json::from_str(json).unwrap();
        assert_eq!(tier.name, "VIP 3");
        assert_eq!(tier.volume_threshold_usd, 100_000_000.0);
        assert_eq!(tier.maker_fee_rate, 0.00012);
    }
}
