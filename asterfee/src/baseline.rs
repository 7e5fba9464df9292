//! Headline savings figures picked from per-competitor results.

use crate::types::{BaselineMode, SavingsResult, Timeframe};

/// Pick a single savings figure for `timeframe`.
///
/// * `Closest` - smallest positive saving (most conservative comparison).
/// * `Average` - mean of positive savings; zero and negative results are left out.
/// * `Highest` - largest saving, whatever its sign.
///
/// Returns `0.0` for an empty result set, and for `Closest`/`Average` when no
/// saving is positive.
pub fn select_baseline_savings(
    results: &[SavingsResult],
    timeframe: Timeframe,
    mode: BaselineMode,
) -> f64 {
    let values = results.iter().map(|r| r.savings_for(timeframe));

    match mode {
        BaselineMode::Closest => values
            .filter(|v| *v > 0.0)
            .fold(None, |min: Option<f64>, v| Some(min.map_or(v, |m| m.min(v))))
            .unwrap_or(0.0),
        BaselineMode::Average => {
            let (sum, count) = values
                .filter(|v| *v > 0.0)
                .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
            if count == 0 {
                0.0
            } else {
                sum / count as f64
            }
        }
        BaselineMode::Highest => values.fold(None, |max: Option<f64>, v| {
            Some(max.map_or(v, |m| m.max(v)))
        })
        .unwrap_or(0.0),
    }
}

/// Result with the largest saving over `timeframe`. First wins on ties.
pub fn best_savings(results: &[SavingsResult], timeframe: Timeframe) -> Option<&SavingsResult> {
    results.iter().fold(None, |best, r| match best {
        Some(b) if b.savings_for(timeframe) >= r.savings_for(timeframe) => Some(b),
        _ => Some(r),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Results whose monthly savings equal `monthly` exactly.
    fn results(monthly: &[f64]) -> Vec<SavingsResult> {
        monthly
            .iter()
            .enumerate()
            .map(|(i, m)| SavingsResult::new(&format!("C{i}"), 1_000.0, 1_000.0 - m))
            .collect()
    }

    #[test]
    fn test_modes_on_mixed_results() {
        let r = results(&[-10.0, 5.0, 20.0]);
        assert_eq!(select_baseline_savings(&r, Timeframe::Monthly, BaselineMode::Closest), 5.0);
        assert_eq!(select_baseline_savings(&r, Timeframe::Monthly, BaselineMode::Average), 12.5);
        assert_eq!(select_baseline_savings(&r, Timeframe::Monthly, BaselineMode::Highest), 20.0);
    }

    #[test]
    fn test_timeframe_scales() {
        let r = results(&[-10.0, 5.0, 20.0]);
        assert_eq!(select_baseline_savings(&r, Timeframe::Yearly, BaselineMode::Closest), 60.0);
        assert_eq!(
            select_baseline_savings(&r, Timeframe::Lifetime, BaselineMode::Highest),
            1_200.0
        );
    }

    #[test]
    fn test_empty_is_zero() {
        for mode in [BaselineMode::Closest, BaselineMode::Average, BaselineMode::Highest] {
            assert_eq!(select_baseline_savings(&[], Timeframe::Monthly, mode), 0.0);
        }
    }

    #[test]
    fn test_no_positive_values() {
        let r = results(&[-10.0, 0.0, -3.0]);
        assert_eq!(select_baseline_savings(&r, Timeframe::Monthly, BaselineMode::Closest), 0.0);
        assert_eq!(select_baseline_savings(&r, Timeframe::Monthly, BaselineMode::Average), 0.0);
        // Highest still reports the best (here zero) value.
        assert_eq!(select_baseline_savings(&r, Timeframe::Monthly, BaselineMode::Highest), 0.0);

        let r = results(&[-10.0, -3.0]);
        assert_eq!(select_baseline_savings(&r, Timeframe::Monthly, BaselineMode::Highest), -3.0);
    }

    #[test]
    fn test_best_savings() {
        let r = results(&[5.0, 20.0, 20.0, -1.0]);
        let best = best_savings(&r, Timeframe::Yearly).unwrap();
        assert_eq!(best.competitor_name, "C1");
        assert!(best_savings(&[], Timeframe::Yearly).is_none());
    }
}
