//! Domain types for the subway planner.
//!
//! Stations, lines and sections as supplied by the topology store. Sections
//! enforce their invariants at construction time, so the graph builder can
//! trust any section it receives.

mod line;
mod station;

pub use line::{InvalidSection, Line, LineId, Section};
pub use station::{Station, StationId};
