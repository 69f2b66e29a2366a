//! Immutable per-query view of the network.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::{Line, LineId, Station, StationId};

static NEXT_TOPOLOGY: AtomicU64 = AtomicU64::new(1);

/// Identity of one topology, unique within the process.
///
/// Versions only count edits, so two topologies can be at the same version;
/// (`TopologyId`, version) names one state of one network.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopologyId(u64);

impl TopologyId {
    /// Allocate an id no other topology in this process has.
    pub fn fresh() -> Self {
        TopologyId(NEXT_TOPOLOGY.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TopologyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TopologyId({})", self.0)
    }
}

impl fmt::Display for TopologyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The stations and lines visible at query time.
///
/// A snapshot never changes once built; topology edits produce a new
/// snapshot with a higher version.
#[derive(Debug, Clone)]
pub struct TopologySnapshot {
    topology: TopologyId,
    version: u64,
    stations: BTreeMap<StationId, Station>,
    lines: Vec<Line>,
}

impl TopologySnapshot {
    /// Create a standalone snapshot with an identity of its own.
    ///
    /// Lines keep the order given; the graph builder visits them in that
    /// order, which fixes tie-breaking between equal-weight routes.
    pub fn new(
        version: u64,
        stations: impl IntoIterator<Item = Station>,
        lines: Vec<Line>,
    ) -> Self {
        Self::of_topology(TopologyId::fresh(), version, stations, lines)
    }

    /// Create a snapshot of `topology` at `version`.
    ///
    /// Providers that hand out successive states of one network pass the
    /// same id every time.
    pub fn of_topology(
        topology: TopologyId,
        version: u64,
        stations: impl IntoIterator<Item = Station>,
        lines: Vec<Line>,
    ) -> Self {
        let stations = stations.into_iter().map(|s| (s.id, s)).collect();
        Self {
            topology,
            version,
            stations,
            lines,
        }
    }

    /// The topology this snapshot belongs to.
    pub fn topology(&self) -> TopologyId {
        self.topology
    }

    /// Topology version this snapshot was taken at.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(&id)
    }

    pub fn contains_station(&self, id: StationId) -> bool {
        self.stations.contains_key(&id)
    }

    /// All stations, ordered by id.
    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// Total number of sections across all lines.
    pub fn section_count(&self) -> usize {
        self.lines.iter().map(|l| l.sections.len()).sum()
    }
}

impl Default for TopologySnapshot {
    fn default() -> Self {
        Self::new(0, [], Vec::new())
    }
}

/// Source of topology snapshots.
///
/// This abstraction lets the path service run against the in-memory store,
/// a database-backed store, or a fixed snapshot in tests.
pub trait TopologyProvider {
    /// Current view of the network.
    fn snapshot(&self) -> Arc<TopologySnapshot>;
}

impl<P: TopologyProvider + ?Sized> TopologyProvider for &P {
    fn snapshot(&self) -> Arc<TopologySnapshot> {
        (**self).snapshot()
    }
}

impl<P: TopologyProvider + ?Sized> TopologyProvider for Arc<P> {
    fn snapshot(&self) -> Arc<TopologySnapshot> {
        (**self).snapshot()
    }
}

/// A provider that always returns the same snapshot.
#[derive(Debug, Clone)]
pub struct FixedTopology(Arc<TopologySnapshot>);

impl FixedTopology {
    pub fn new(snapshot: TopologySnapshot) -> Self {
        FixedTopology(Arc::new(snapshot))
    }
}

impl TopologyProvider for FixedTopology {
    fn snapshot(&self) -> Arc<TopologySnapshot> {
        Arc::clone(&self.0)
    }
}
