use serde::{Deserialize, Serialize};

use super::enums::Timeframe;

/// Months in the fixed lifetime (five-year) horizon.
pub const LIFETIME_MONTHS: f64 = 60.0;

/// Savings against a single competitor for one `(volume, mode)` input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsResult {
    pub competitor_name: String,
    /// Competitor fee cost plus bridge cost for the month.
    pub competitor_cost_usd: f64,
    /// Negative when the platform is the more expensive venue.
    pub monthly_savings_usd: f64,
    pub yearly_savings_usd: f64,
    pub lifetime_savings_usd: f64,
    pub savings_percentage: f64,
}

impl SavingsResult {
    /// Derive every savings field from the monthly competitor and platform costs.
    pub fn new(competitor_name: &str, competitor_cost_usd: f64, platform_cost_usd: f64) -> Self {
        let monthly = competitor_cost_usd - platform_cost_usd;
        let percentage = if competitor_cost_usd == 0.0 {
            0.0
        } else {
            monthly / competitor_cost_usd * 100.0
        };

        Self {
            competitor_name: competitor_name.to_string(),
            competitor_cost_usd,
            monthly_savings_usd: monthly,
            yearly_savings_usd: monthly * Timeframe::Yearly.months(),
            lifetime_savings_usd: monthly * Timeframe::Lifetime.months(),
            savings_percentage: percentage,
        }
    }

    /// Savings over the given timeframe.
    pub fn savings_for(&self, timeframe: Timeframe) -> f64 {
        match timeframe {
            Timeframe::Monthly => self.monthly_savings_usd,
            Timeframe::Yearly => self.yearly_savings_usd,
            Timeframe::Lifetime => self.lifetime_savings_usd,
        }
    }
}
