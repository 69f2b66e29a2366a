//! Weighted multigraph built from a topology snapshot.
//!
//! Vertices and edges live in flat vectors and refer to each other by
//! index. A station id maps to its vertex index through `index`; each
//! vertex keeps the indices of its incident edges. Lines crossing at shared
//! stations therefore form cycles in the data without any ownership cycle.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{LineId, Station, StationId};
use crate::planner::PathError;
use crate::topology::TopologySnapshot;

use super::metric::WeightMetric;

/// Index of a vertex in a [`SubwayGraph`].
pub type VertexIndex = usize;

/// Index of an edge in a [`SubwayGraph`].
pub type EdgeIndex = usize;

/// One undirected edge, built from one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub ends: [VertexIndex; 2],
    /// Value minimized by searches over this graph.
    pub weight: u32,
    pub distance: u32,
    pub duration: u32,
    pub line: LineId,
}

impl Edge {
    /// The endpoint opposite `from`.
    pub fn other(&self, from: VertexIndex) -> VertexIndex {
        if self.ends[0] == from {
            self.ends[1]
        } else {
            self.ends[0]
        }
    }
}

/// Undirected multigraph of the stations reachable by at least one section.
///
/// Parallel sections between the same pair of stations are kept as
/// separate edges: they may belong to different lines and carry different
/// weights.
#[derive(Debug, Clone)]
pub struct SubwayGraph {
    metric: WeightMetric,
    version: u64,
    vertices: Vec<Station>,
    index: HashMap<StationId, VertexIndex>,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<EdgeIndex>>,
    extra_fees: HashMap<LineId, u32>,
}

impl SubwayGraph {
    /// Build the graph for `metric` from a snapshot.
    ///
    /// Lines and their sections are visited in snapshot order, so the same
    /// snapshot always yields the same vertex and edge numbering.
    pub fn build(snapshot: &TopologySnapshot, metric: WeightMetric) -> Result<Self, PathError> {
        if snapshot.section_count() == 0 {
            return Err(PathError::EmptyTopology);
        }

        let weight_of = metric.selector();
        let mut graph = SubwayGraph {
            metric,
            version: snapshot.version(),
            vertices: Vec::new(),
            index: HashMap::new(),
            edges: Vec::with_capacity(snapshot.section_count()),
            adjacency: Vec::new(),
            extra_fees: HashMap::with_capacity(snapshot.lines().len()),
        };

        for line in snapshot.lines() {
            graph.extra_fees.insert(line.id, line.extra_fee);

            for section in &line.sections {
                let up = graph.intern(snapshot, section.up_station())?;
                let down = graph.intern(snapshot, section.down_station())?;

                let edge_idx = graph.edges.len();
                graph.edges.push(Edge {
                    ends: [up, down],
                    weight: weight_of(section),
                    distance: section.distance(),
                    duration: section.duration(),
                    line: line.id,
                });
                graph.adjacency[up].push(edge_idx);
                graph.adjacency[down].push(edge_idx);
            }
        }

        debug!(
            version = graph.version,
            %metric,
            vertices = graph.vertices.len(),
            edges = graph.edges.len(),
            "built subway graph"
        );

        Ok(graph)
    }

    /// Vertex for `id`, adding it on first sight.
    fn intern(
        &mut self,
        snapshot: &TopologySnapshot,
        id: StationId,
    ) -> Result<VertexIndex, PathError> {
        if let Some(&v) = self.index.get(&id) {
            return Ok(v);
        }

        let station = snapshot.station(id).ok_or(PathError::StationNotFound(id))?;
        let v = self.vertices.len();
        self.vertices.push(station.clone());
        self.adjacency.push(Vec::new());
        self.index.insert(id, v);
        Ok(v)
    }

    pub fn metric(&self) -> WeightMetric {
        self.metric
    }

    /// Topology version the graph was built from.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Vertex index of a station, if the station is on any section.
    pub fn vertex(&self, id: StationId) -> Option<VertexIndex> {
        self.index.get(&id).copied()
    }

    pub fn station(&self, v: VertexIndex) -> &Station {
        &self.vertices[v]
    }

    pub fn edge(&self, e: EdgeIndex) -> &Edge {
        &self.edges[e]
    }

    /// Edges touching `v`, in insertion order.
    pub fn incident(&self, v: VertexIndex) -> &[EdgeIndex] {
        &self.adjacency[v]
    }

    /// Surcharge of a line; lines unknown to this graph have none.
    pub fn extra_fee(&self, line: LineId) -> u32 {
        self.extra_fees.get(&line).copied().unwrap_or(0)
    }
}
