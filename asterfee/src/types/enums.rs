use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::savings::LIFETIME_MONTHS;
use crate::error::FeeError;

/// Platform trading mode. Selected by the user, never derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    /// Flat opening/closing fees plus a fixed execution fee.
    Simple,
    /// Tiered maker/taker schedule with market-maker overrides.
    Pro,
}

impl std::fmt::Display for TradingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradingMode::Simple => write!(f, "simple"),
            TradingMode::Pro => write!(f, "pro"),
        }
    }
}

impl FromStr for TradingMode {
    type Err = FeeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(TradingMode::Simple),
            "pro" => Ok(TradingMode::Pro),
            _ => Err(FeeError::UnknownTradingMode(s.to_string())),
        }
    }
}

/// Horizon a savings figure is reported over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Monthly,
    Yearly,
    /// Fixed five-year horizon.
    Lifetime,
}

impl Timeframe {
    /// Number of months covered by the timeframe.
    pub fn months(self) -> f64 {
        match self {
            Timeframe::Monthly => 1.0,
            Timeframe::Yearly => 12.0,
            Timeframe::Lifetime => LIFETIME_MONTHS,
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timeframe::Monthly => write!(f, "monthly"),
            Timeframe::Yearly => write!(f, "yearly"),
            Timeframe::Lifetime => write!(f, "lifetime"),
        }
    }
}

impl FromStr for Timeframe {
    type Err = FeeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" => Ok(Timeframe::Monthly),
            "yearly" | "year" => Ok(Timeframe::Yearly),
            "lifetime" | "5y" => Ok(Timeframe::Lifetime),
            _ => Err(FeeError::UnknownTimeframe(s.to_string())),
        }
    }
}

/// How a single headline savings figure is picked from per-competitor results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaselineMode {
    /// Smallest positive saving.
    Closest,
    /// Mean of positive savings.
    Average,
    /// Largest saving regardless of sign.
    Highest,
}

impl std::fmt::Display for BaselineMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BaselineMode::Closest => write!(f, "closest"),
            BaselineMode::Average => write!(f, "average"),
            BaselineMode::Highest => write!(f, "highest"),
        }
    }
}

impl FromStr for BaselineMode {
    type Err = FeeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "closest" => Ok(BaselineMode::Closest),
            "average" => Ok(BaselineMode::Average),
            "highest" => Ok(BaselineMode::Highest),
            _ => Err(FeeError::UnknownBaselineMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trading_mode_parse() {
        assert_eq!("simple".parse::<TradingMode>().unwrap(), TradingMode::Simple);
        assert_eq!(" PRO ".parse::<TradingMode>().unwrap(), TradingMode::Pro);
        // The hybrid mode from an older revision is gone.
        assert!(matches!(
            "hybrid".parse::<TradingMode>(),
            Err(FeeError::UnknownTradingMode(_))
        ));
    }

    #[test]
    fn test_trading_mode_serde_lowercase() {
        let json = serde_json::to_string(&TradingMode::Pro).unwrap();
        assert_eq!(json, "\"pro\"");
        let mode: TradingMode = serde_json::from_str("\"simple\"").unwrap();
        assert_eq!(mode, TradingMode::Simple);
    }

    #[test]
    fn test_timeframe_months() {
        assert_eq!(Timeframe::Monthly.months(), 1.0);
        assert_eq!(Timeframe::Yearly.months(), 12.0);
        assert_eq!(Timeframe::Lifetime.months(), 60.0);
    }

    #[test]
    fn test_display_matches_parse() {
        for tf in [Timeframe::Monthly, Timeframe::Yearly, Timeframe::Lifetime] {
            assert_eq!(tf.to_string().parse::<Timeframe>().unwrap(), tf);
        }
        for mode in [
            BaselineMode::Closest,
            BaselineMode::Average,
            BaselineMode::Highest,
        ] {
            assert_eq!(mode.to_string().parse::<BaselineMode>().unwrap(), mode);
        }
    }
}
