use serde::{Deserialize, Serialize};

/// Days in the month the volume input is expressed over.
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Rolling window a venue evaluates tier eligibility over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VolumeBasis {
    /// 14-day window, modelled as `monthly × 14/30`.
    FourteenDay,
    /// 30-day window, approximated as the monthly volume.
    #[default]
    ThirtyDay,
}

impl VolumeBasis {
    /// Volume the venue sees for a given monthly volume.
    pub fn effective_volume(self, monthly_volume_usd: f64) -> f64 {
        match self {
            VolumeBasis::FourteenDay => monthly_volume_usd * 14.0 / DAYS_PER_MONTH,
            VolumeBasis::ThirtyDay => monthly_volume_usd,
        }
    }
}

impl std::fmt::Display for VolumeBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VolumeBasis::FourteenDay => write!(f, "14d"),
            VolumeBasis::ThirtyDay => write!(f, "30d"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourteen_day_ratio() {
        let v = VolumeBasis::FourteenDay.effective_volume(5_000_000.0);
        assert!((v - 2_333_333.333_333).abs() < 1e-3);
    }

    #[test]
    fn test_thirty_day_is_identity() {
        assert_eq!(
            VolumeBasis::ThirtyDay.effective_volume(100_000_000.0),
            100_000_000.0
        );
    }

    #[test]
    fn test_default_is_thirty_day() {
        assert_eq!(VolumeBasis::default(), VolumeBasis::ThirtyDay);
    }
}
