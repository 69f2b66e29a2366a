//! Fare policy configuration.

use serde::{Deserialize, Serialize};

use super::discount::AgeDiscountPolicy;
use super::error::{FarePolicyError, InvalidFarePolicy};
use super::schedule::DistanceFareSchedule;

/// Everything needed to price a path.
///
/// Any field left out of a JSON document falls back to its default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarePolicy {
    pub schedule: DistanceFareSchedule,
    pub discounts: AgeDiscountPolicy,
}

impl FarePolicy {
    /// Create a policy from its parts.
    pub fn new(schedule: DistanceFareSchedule, discounts: AgeDiscountPolicy) -> Self {
        Self {
            schedule,
            discounts,
        }
    }

    /// Parse and validate a policy from JSON.
    pub fn from_json(json: &str) -> Result<Self, FarePolicyError> {
        let policy: Self = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Check both the schedule and the discount brackets.
    pub fn validate(&self) -> Result<(), InvalidFarePolicy> {
        self.schedule.validate()?;
        self.discounts.validate()
    }

    /// Fare before any discount.
    ///
    /// `surcharge` is the largest extra fee among the lines used; surcharges
    /// are never summed across lines.
    pub fn base_fare(&self, distance_km: u64, surcharge: u32) -> u64 {
        self.schedule
            .fare_for(distance_km)
            .saturating_add(u64::from(surcharge))
    }

    /// Final fare for a rider of the given age.
    pub fn fare(&self, distance_km: u64, surcharge: u32, age: Option<u32>) -> u64 {
        self.discounts.apply(self.base_fare(distance_km, surcharge), age)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// For a fixed surcharge and no discount the fare is a
        /// non-decreasing step function of distance
        #[test]
        fn monotone_in_distance(distance in 1u64..500, extra in 1u64..50, surcharge in 0u32..2_000) {
            let policy = FarePolicy::default();
            prop_assert!(
                policy.fare(distance, surcharge, None) <= policy.fare(distance + extra, surcharge, None)
            );
        }
    }
}
