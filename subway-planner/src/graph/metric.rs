//! Edge weight selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::Section;

/// Error returned when parsing an unknown metric name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown path metric: {0:?} (expected DISTANCE or DURATION)")]
pub struct InvalidMetric(String);

/// Which section attribute a search minimizes.
///
/// # Examples
///
/// ```
/// use subway_planner::graph::WeightMetric;
///
/// let metric: WeightMetric = "duration".parse().unwrap();
/// assert_eq!(metric, WeightMetric::Duration);
/// assert!("fastest".parse::<WeightMetric>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WeightMetric {
    Distance,
    Duration,
}

impl WeightMetric {
    /// The weight selector for this metric.
    ///
    /// Resolved once per graph build so the builder never branches on the
    /// metric per section.
    pub fn selector(self) -> fn(&Section) -> u32 {
        match self {
            WeightMetric::Distance => Section::distance,
            WeightMetric::Duration => Section::duration,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeightMetric::Distance => "DISTANCE",
            WeightMetric::Duration => "DURATION",
        }
    }
}

impl fmt::Display for WeightMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightMetric {
    type Err = InvalidMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("DISTANCE") {
            Ok(WeightMetric::Distance)
        } else if s.eq_ignore_ascii_case("DURATION") {
            Ok(WeightMetric::Duration)
        } else {
            Err(InvalidMetric(s.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StationId;

    #[test]
    fn selector_picks_field() {
        let section = Section::new(StationId::new(1), StationId::new(2), 10, 3).unwrap();
        assert_eq!(WeightMetric::Distance.selector()(&section), 10);
        assert_eq!(WeightMetric::Duration.selector()(&section), 3);
    }

    #[test]
    fn parse_case_insensitive() {
        assert_eq!("DISTANCE".parse(), Ok(WeightMetric::Distance));
        assert_eq!("Distance".parse(), Ok(WeightMetric::Distance));
        assert_eq!("duration".parse(), Ok(WeightMetric::Duration));
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "TIME".parse::<WeightMetric>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown path metric: \"TIME\" (expected DISTANCE or DURATION)"
        );
    }

    #[test]
    fn display_roundtrip() {
        for metric in [WeightMetric::Distance, WeightMetric::Duration] {
            assert_eq!(metric.to_string().parse(), Ok(metric));
        }
    }

    #[test]
    fn serde_uses_uppercase() {
        assert_eq!(
            serde_json::to_string(&WeightMetric::Duration).unwrap(),
            "\"DURATION\""
        );
        let metric: WeightMetric = serde_json::from_str("\"DISTANCE\"").unwrap();
        assert_eq!(metric, WeightMetric::Distance);
    }
}
