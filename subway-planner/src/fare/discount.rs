//! Age-based discounts.

use serde::{Deserialize, Serialize};

use super::error::InvalidFarePolicy;

/// How a bracket changes the fare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscountRule {
    /// Rides free.
    Exempt,
    /// Pays `pay_percent`% of the fare after subtracting `deduction`,
    /// truncated to a whole unit. `pay_percent` is at most 100.
    Reduced { deduction: u32, pay_percent: u32 },
}

impl DiscountRule {
    fn apply(self, fare: u64) -> u64 {
        match self {
            DiscountRule::Exempt => 0,
            DiscountRule::Reduced {
                deduction,
                pay_percent,
            } => {
                let payable = u128::from(fare.saturating_sub(u64::from(deduction)));
                let reduced = payable * u128::from(pay_percent) / 100;
                u64::try_from(reduced).unwrap_or(u64::MAX)
            }
        }
    }
}

/// Riders aged `min_age..max_age` get `rule`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBracket {
    pub min_age: u32,
    /// Exclusive upper bound.
    pub max_age: u32,
    pub rule: DiscountRule,
}

impl AgeBracket {
    fn contains(&self, age: u32) -> bool {
        (self.min_age..self.max_age).contains(&age)
    }
}

/// Age brackets and their discounts.
///
/// The first bracket containing the rider's age applies; riders of unknown
/// age or outside every bracket pay the full fare.
///
/// # Examples
///
/// ```
/// use subway_planner::fare::AgeDiscountPolicy;
///
/// let policy = AgeDiscountPolicy::default();
/// assert_eq!(policy.apply(1450, None), 1450);
/// assert_eq!(policy.apply(1450, Some(12)), 550);
/// assert_eq!(policy.apply(1450, Some(13)), 880);
/// assert_eq!(policy.apply(1450, Some(30)), 1450);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgeDiscountPolicy {
    brackets: Vec<AgeBracket>,
}

impl AgeDiscountPolicy {
    /// Create a policy from explicit brackets.
    pub fn new(brackets: Vec<AgeBracket>) -> Self {
        Self { brackets }
    }

    /// A policy that never discounts.
    pub fn none() -> Self {
        Self::new(Vec::new())
    }

    pub fn brackets(&self) -> &[AgeBracket] {
        &self.brackets
    }

    /// Check that every bracket covers at least one age and no rule
    /// charges more than the full fare.
    pub fn validate(&self) -> Result<(), InvalidFarePolicy> {
        for bracket in &self.brackets {
            if bracket.min_age >= bracket.max_age {
                return Err(InvalidFarePolicy::new("age bracket is empty"));
            }
            if matches!(bracket.rule, DiscountRule::Reduced { pay_percent, .. } if pay_percent > 100) {
                return Err(InvalidFarePolicy::new("pay_percent exceeds 100"));
            }
        }
        Ok(())
    }

    /// Final fare for a rider of the given age.
    pub fn apply(&self, fare: u64, age: Option<u32>) -> u64 {
        let Some(age) = age else {
            return fare;
        };

        self.brackets
            .iter()
            .find(|b| b.contains(age))
            .map_or(fare, |b| b.rule.apply(fare))
    }
}

impl Default for AgeDiscountPolicy {
    fn default() -> Self {
        Self::new(vec![
            AgeBracket {
                min_age: 0,
                max_age: 6,
                rule: DiscountRule::Exempt,
            },
            AgeBracket {
                min_age: 6,
                max_age: 13,
                rule: DiscountRule::Reduced {
                    deduction: 350,
                    pay_percent: 50,
                },
            },
            AgeBracket {
                min_age: 13,
                max_age: 19,
                rule: DiscountRule::Reduced {
                    deduction: 350,
                    pay_percent: 80,
                },
            },
        ])
    }
}
