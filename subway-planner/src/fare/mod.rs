//! Fare computation.
//!
//! A fare is the distance-based base fare, plus the largest surcharge among
//! the lines used, adjusted by the rider's age bracket.

mod config;
mod discount;
mod error;
mod schedule;

pub use config::FarePolicy;
pub use discount::{AgeBracket, AgeDiscountPolicy, DiscountRule};
pub use error::{FarePolicyError, InvalidFarePolicy};
pub use schedule::{DistanceFareSchedule, FareTier};
