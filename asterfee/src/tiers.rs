//! Volume tier resolution.
//!
//! A venue's schedule is an ascending list of rungs. Resolution scans from the
//! highest threshold downward and picks the first rung whose threshold is at or
//! below the effective volume, so an exact threshold match selects that rung.
//!
//! Tables are validated once, when they are built. [`TierTable`] additionally
//! requires a zero-threshold base rung and therefore always resolves;
//! [`OptionalTierTable`] (market-maker programs) may legitimately resolve to
//! nothing.

use crate::error::{FeeError, Result};
use crate::types::VolumeBasis;

/// A rung in a volume-based schedule.
pub trait VolumeTier {
    fn name(&self) -> &str;

    /// Inclusive lower bound of effective volume for this rung, in USD.
    fn threshold(&self) -> f64;

    /// Named rates carried by the rung, checked during validation.
    fn rates(&self) -> [(&'static str, f64); 2];
}

/// Schedule with a zero-threshold base rung. Resolution never fails.
#[derive(Debug, Clone)]
pub struct TierTable<T> {
    venue: String,
    tiers: Vec<T>,
}

impl<T: VolumeTier> TierTable<T> {
    /// Validate and wrap a tier list.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the list is empty, thresholds are not
    /// strictly increasing, a rate or threshold is negative or non-finite, or
    /// the first rung does not start at zero.
    pub fn new(venue: impl Into<String>, tiers: Vec<T>) -> Result<Self> {
        let venue = venue.into();
        validate(&venue, &tiers)?;

        let lowest = tiers[0].threshold();
        if lowest != 0.0 {
            return Err(FeeError::MissingBaseTier { venue, lowest });
        }

        Ok(Self { venue, tiers })
    }

    pub fn venue(&self) -> &str {
        &self.venue
    }

    pub fn tiers(&self) -> &[T] {
        &self.tiers
    }

    /// Resolve the rung for a monthly volume under the given basis.
    pub fn resolve(&self, monthly_volume_usd: f64, basis: VolumeBasis) -> &T {
        &self.tiers[self.resolve_index(monthly_volume_usd, basis)]
    }

    /// Index of the rung for a monthly volume under the given basis.
    pub fn resolve_index(&self, monthly_volume_usd: f64, basis: VolumeBasis) -> usize {
        self.resolve_effective_index(basis.effective_volume(monthly_volume_usd))
    }

    /// Resolve against a volume already expressed in the venue's window.
    pub fn resolve_effective(&self, effective_volume_usd: f64) -> &T {
        &self.tiers[self.resolve_effective_index(effective_volume_usd)]
    }

    pub fn resolve_effective_index(&self, effective_volume_usd: f64) -> usize {
        // Volume violating the non-negative precondition lands on the base rung.
        highest_at_or_below(&self.tiers, effective_volume_usd).unwrap_or(0)
    }
}

/// Schedule without a base rung: volume below the lowest threshold has no tier.
#[derive(Debug, Clone)]
pub struct OptionalTierTable<T> {
    venue: String,
    tiers: Vec<T>,
}

impl<T: VolumeTier> OptionalTierTable<T> {
    /// Validate and wrap a tier list.
    ///
    /// # Errors
    ///
    /// Same checks as [`TierTable::new`] except the base-rung requirement.
    pub fn new(venue: impl Into<String>, tiers: Vec<T>) -> Result<Self> {
        let venue = venue.into();
        validate(&venue, &tiers)?;
        Ok(Self { venue, tiers })
    }

    pub fn venue(&self) -> &str {
        &self.venue
    }

    pub fn tiers(&self) -> &[T] {
        &self.tiers
    }

    pub fn resolve(&self, monthly_volume_usd: f64, basis: VolumeBasis) -> Option<&T> {
        self.resolve_index(monthly_volume_usd, basis)
            .map(|i| &self.tiers[i])
    }

    pub fn resolve_index(&self, monthly_volume_usd: f64, basis: VolumeBasis) -> Option<usize> {
        self.resolve_effective_index(basis.effective_volume(monthly_volume_usd))
    }

    pub fn resolve_effective(&self, effective_volume_usd: f64) -> Option<&T> {
        self.resolve_effective_index(effective_volume_usd)
            .map(|i| &self.tiers[i])
    }

    pub fn resolve_effective_index(&self, effective_volume_usd: f64) -> Option<usize> {
        highest_at_or_below(&self.tiers, effective_volume_usd)
    }
}

/// Highest index whose threshold is `<= effective_volume_usd`.
fn highest_at_or_below<T: VolumeTier>(tiers: &[T], effective_volume_usd: f64) -> Option<usize> {
    tiers
        .iter()
        .rposition(|t| t.threshold() <= effective_volume_usd)
}

fn validate<T: VolumeTier>(venue: &str, tiers: &[T]) -> Result<()> {
    if tiers.is_empty() {
        return Err(FeeError::EmptyTierTable {
            venue: venue.to_string(),
        });
    }

    let mut previous: Option<f64> = None;
    for (index, tier) in tiers.iter().enumerate() {
        let threshold = tier.threshold();
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(FeeError::InvalidThreshold {
                venue: venue.to_string(),
                tier: tier.name().to_string(),
                value: threshold,
            });
        }

        for (field, value) in tier.rates() {
            if !value.is_finite() || value < 0.0 {
                return Err(FeeError::InvalidRate {
                    venue: format!("{venue} {}", tier.name()),
                    field,
                    value,
                });
            }
        }

        if let Some(previous) = previous {
            if threshold <= previous {
                return Err(FeeError::NonMonotonicThresholds {
                    venue: venue.to_string(),
                    index,
                    previous,
                    current: threshold,
                });
            }
        }
        previous = Some(threshold);
    }

    Ok(())
}
