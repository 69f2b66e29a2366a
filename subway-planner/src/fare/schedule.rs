//! Distance-based fare schedule.

use serde::{Deserialize, Serialize};

use super::error::InvalidFarePolicy;

/// One band of the distance schedule.
///
/// Distance between the previous band's limit and `up_to` is charged one
/// unit per started `step_km`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareTier {
    /// Upper bound of the band in km, inclusive. `None` means unbounded.
    pub up_to: Option<u32>,
    /// Length of one charged step in km. Must be positive.
    pub step_km: u32,
}

/// Base fare as a step function of distance.
///
/// With the default values:
///
/// - up to 10 km: 1250
/// - 10 to 50 km: +100 per started 5 km
/// - over 50 km: +100 per started 8 km
///
/// # Examples
///
/// ```
/// use subway_planner::fare::DistanceFareSchedule;
///
/// let schedule = DistanceFareSchedule::default();
/// assert_eq!(schedule.fare_for(10), 1250);
/// assert_eq!(schedule.fare_for(11), 1350);
/// assert_eq!(schedule.fare_for(58), 2150);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceFareSchedule {
    /// Fare for any trip up to `base_distance_km`.
    pub base_fare: u32,
    pub base_distance_km: u32,
    /// Charge per started step in any tier.
    pub step_fare: u32,
    /// Bands above the base distance, in increasing order of `up_to`.
    pub tiers: Vec<FareTier>,
}

impl DistanceFareSchedule {
    /// Fare for a trip of `distance_km`, before surcharges and discounts.
    ///
    /// # Panics
    ///
    /// If a tier reached by `distance_km` has a zero `step_km`. Schedules
    /// that pass [`validate`](Self::validate) never panic.
    pub fn fare_for(&self, distance_km: u64) -> u64 {
        let step_fare = u64::from(self.step_fare);
        let mut fare = u64::from(self.base_fare);
        let mut lower = u64::from(self.base_distance_km);

        for tier in &self.tiers {
            if distance_km <= lower {
                break;
            }
            let upper = tier
                .up_to
                .map_or(distance_km, |limit| u64::from(limit).min(distance_km));
            let steps = upper.saturating_sub(lower).div_ceil(u64::from(tier.step_km));
            fare = fare.saturating_add(steps.saturating_mul(step_fare));

            match tier.up_to {
                Some(limit) => lower = u64::from(limit),
                None => break,
            }
        }

        fare
    }

    /// Check that every tier has a positive step and that tier limits
    /// strictly increase above the base distance, with at most a final
    /// unbounded tier.
    pub fn validate(&self) -> Result<(), InvalidFarePolicy> {
        let mut lower = self.base_distance_km;
        let mut unbounded = false;

        for tier in &self.tiers {
            if unbounded {
                return Err(InvalidFarePolicy::new("tier follows an unbounded tier"));
            }
            if tier.step_km == 0 {
                return Err(InvalidFarePolicy::new("tier step_km must be positive"));
            }
            match tier.up_to {
                Some(limit) if limit <= lower => {
                    return Err(InvalidFarePolicy::new(
                        "tier limits must increase above the base distance",
                    ));
                }
                Some(limit) => lower = limit,
                None => unbounded = true,
            }
        }

        Ok(())
    }
}

impl Default for DistanceFareSchedule {
    fn default() -> Self {
        Self {
            base_fare: 1250,
            base_distance_km: 10,
            step_fare: 100,
            tiers: vec![
                FareTier {
                    up_to: Some(50),
                    step_km: 5,
                },
                FareTier {
                    up_to: None,
                    step_km: 8,
                },
            ],
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Closed-form rule the default schedule must reproduce.
    fn closed_form(distance: u64) -> u64 {
        if distance <= 10 {
            1250
        } else if distance <= 50 {
            1250 + (distance - 10).div_ceil(5) * 100
        } else {
            1250 + 800 + (distance - 50).div_ceil(8) * 100
        }
    }

    proptest! {
        /// The tiered computation agrees with the closed-form rule
        #[test]
        fn matches_closed_form(distance in 1u64..1_000) {
            let schedule = DistanceFareSchedule::default();
            prop_assert_eq!(schedule.fare_for(distance), closed_form(distance));
        }

        /// Fare never decreases as distance grows
        #[test]
        fn non_decreasing(distance in 1u64..1_000, extra in 0u64..100) {
            let schedule = DistanceFareSchedule::default();
            prop_assert!(schedule.fare_for(distance) <= schedule.fare_for(distance + extra));
        }
    }
}
