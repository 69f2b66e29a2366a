//! Line and section types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::StationId;

/// Error returned when constructing an invalid section.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid section: {reason}")]
pub struct InvalidSection {
    reason: &'static str,
}

/// Opaque identifier of a line.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(u64);

impl LineId {
    /// Wrap a raw line id.
    pub const fn new(id: u64) -> Self {
        LineId(id)
    }

    /// Returns the raw id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stretch of track between two adjacent stations on one line.
///
/// Distance and duration are strictly positive; this type guarantees it by
/// construction.
///
/// # Examples
///
/// ```
/// use subway_planner::domain::{Section, StationId};
///
/// let a = StationId::new(1);
/// let b = StationId::new(2);
/// let section = Section::new(a, b, 10, 5).unwrap();
/// assert_eq!(section.distance(), 10);
///
/// // Zero distance is rejected
/// assert!(Section::new(a, b, 0, 5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    up_station: StationId,
    down_station: StationId,
    distance: u32,
    duration: u32,
}

impl Section {
    /// Create a section, validating its invariants.
    pub fn new(
        up_station: StationId,
        down_station: StationId,
        distance: u32,
        duration: u32,
    ) -> Result<Self, InvalidSection> {
        if up_station == down_station {
            return Err(InvalidSection {
                reason: "up and down stations must differ",
            });
        }
        if distance == 0 {
            return Err(InvalidSection {
                reason: "distance must be positive",
            });
        }
        if duration == 0 {
            return Err(InvalidSection {
                reason: "duration must be positive",
            });
        }

        Ok(Self {
            up_station,
            down_station,
            distance,
            duration,
        })
    }

    pub fn up_station(&self) -> StationId {
        self.up_station
    }

    pub fn down_station(&self) -> StationId {
        self.down_station
    }

    pub fn distance(&self) -> u32 {
        self.distance
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }
}

/// A transit line: display attributes, a surcharge and its sections.
///
/// Section order is irrelevant to routing; the graph treats them as a set
/// of undirected edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    pub color: String,
    /// Surcharge added to any fare that uses this line.
    pub extra_fee: u32,
    pub sections: Vec<Section>,
}

impl Line {
    /// Create a line with no sections.
    pub fn new(
        id: LineId,
        name: impl Into<String>,
        color: impl Into<String>,
        extra_fee: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            extra_fee,
            sections: Vec::new(),
        }
    }

    /// Builder-style helper to append a section.
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }
}
