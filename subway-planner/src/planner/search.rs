//! Shortest path search.
//!
//! Dijkstra over a [`SubwayGraph`] with a binary heap frontier. Section
//! weights are strictly positive, so a settled vertex is never improved and
//! the predecessor chain always describes a simple path.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

use tracing::{debug, trace};

use crate::domain::{LineId, Station, StationId};
use crate::graph::{EdgeIndex, SubwayGraph, VertexIndex};

use super::error::PathError;

/// A route found by [`shortest_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    /// Stations from source to target, without repeats.
    pub stations: Vec<Station>,

    /// Distinct lines whose sections the route uses.
    pub lines: BTreeSet<LineId>,

    /// Sum of section distances along the route.
    pub distance: u64,

    /// Sum of section durations along the route.
    pub duration: u64,
}

impl Path {
    /// Station ids in travel order.
    pub fn station_ids(&self) -> Vec<StationId> {
        self.stations.iter().map(|s| s.id).collect()
    }
}

/// Find the minimum-weight path from `source` to `target`.
///
/// Ties between equal-weight routes are broken by vertex index and edge
/// insertion order, so a given graph always yields the same path.
///
/// The returned distance and duration are always the real totals of the
/// edges taken, whichever metric the graph was weighted by.
pub fn shortest_path(
    graph: &SubwayGraph,
    source: StationId,
    target: StationId,
) -> Result<Path, PathError> {
    if source == target {
        return Err(PathError::SameStation(source));
    }

    let from = graph
        .vertex(source)
        .ok_or(PathError::StationNotFound(source))?;
    let to = graph
        .vertex(target)
        .ok_or(PathError::StationNotFound(target))?;

    let via = search(graph, from, to).ok_or(PathError::NoPathExists {
        from: source,
        to: target,
    })?;

    let path = reconstruct(graph, &via, from, to).ok_or(PathError::NoPathExists {
        from: source,
        to: target,
    })?;

    debug!(
        %source,
        %target,
        metric = %graph.metric(),
        stops = path.stations.len(),
        distance = path.distance,
        duration = path.duration,
        "found path"
    );

    Ok(path)
}

/// Run Dijkstra from `from` until `to` is settled.
///
/// Returns the edge each vertex was reached by, or `None` if `to` is
/// unreachable.
fn search(
    graph: &SubwayGraph,
    from: VertexIndex,
    to: VertexIndex,
) -> Option<Vec<Option<EdgeIndex>>> {
    let n = graph.vertex_count();
    let mut best = vec![u64::MAX; n];
    let mut via: Vec<Option<EdgeIndex>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut frontier = BinaryHeap::new();

    best[from] = 0;
    frontier.push(Reverse((0u64, from)));

    while let Some(Reverse((cost, v))) = frontier.pop() {
        if settled[v] {
            continue;
        }
        settled[v] = true;
        trace!(station = %graph.station(v).id, cost, "settled");

        if v == to {
            return Some(via);
        }

        for &e in graph.incident(v) {
            let edge = graph.edge(e);
            let w = edge.other(v);
            if settled[w] {
                continue;
            }

            let next = cost + u64::from(edge.weight);
            // Strict improvement only, so the first edge found keeps ties.
            if next < best[w] {
                best[w] = next;
                via[w] = Some(e);
                frontier.push(Reverse((next, w)));
            }
        }
    }

    None
}

/// Walk predecessor edges back from `to` and total up the route.
fn reconstruct(
    graph: &SubwayGraph,
    via: &[Option<EdgeIndex>],
    from: VertexIndex,
    to: VertexIndex,
) -> Option<Path> {
    let mut vertices = vec![to];
    let mut lines = BTreeSet::new();
    let mut distance = 0u64;
    let mut duration = 0u64;

    let mut v = to;
    while v != from {
        let edge = graph.edge(via[v]?);
        distance += u64::from(edge.distance);
        duration += u64::from(edge.duration);
        lines.insert(edge.line);

        v = edge.other(v);
        vertices.push(v);
    }
    vertices.reverse();

    Some(Path {
        stations: vertices
            .into_iter()
            .map(|v| graph.station(v).clone())
            .collect(),
        lines,
        distance,
        duration,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Line, Section};
    use crate::graph::WeightMetric;
    use crate::topology::TopologySnapshot;
    use proptest::prelude::*;

    const STATIONS: u64 = 6;

    /// Random sections over a small station set, one line per section.
    fn arb_snapshot() -> impl Strategy<Value = TopologySnapshot> {
        prop::collection::vec(
            (0..STATIONS, 1..STATIONS, 1u32..20, 1u32..20),
            1..12,
        )
        .prop_map(|raw| {
            let stations = (0..STATIONS).map(|n| Station::new(StationId::new(n), format!("S{n}")));
            let lines = raw
                .into_iter()
                .enumerate()
                .map(|(i, (a, offset, distance, duration))| {
                    let b = (a + offset) % STATIONS;
                    let section =
                        Section::new(StationId::new(a), StationId::new(b), distance, duration)
                            .unwrap();
                    Line::new(LineId::new(i as u64), format!("L{i}"), "grey", 0)
                        .with_section(section)
                })
                .collect();
            TopologySnapshot::new(1, stations, lines)
        })
    }

    /// Minimum total of `metric` over every simple path, by exhaustive DFS.
    fn brute_force_best(
        snapshot: &TopologySnapshot,
        metric: WeightMetric,
        from: StationId,
        to: StationId,
    ) -> Option<u64> {
        fn dfs(
            snapshot: &TopologySnapshot,
            weight_of: fn(&Section) -> u32,
            at: StationId,
            to: StationId,
            visited: &mut Vec<StationId>,
            total: u64,
            best: &mut Option<u64>,
        ) {
            if at == to {
                *best = Some(best.map_or(total, |b| b.min(total)));
                return;
            }
            for line in snapshot.lines() {
                for section in &line.sections {
                    let next = if section.up_station() == at {
                        section.down_station()
                    } else if section.down_station() == at {
                        section.up_station()
                    } else {
                        continue;
                    };
                    if visited.contains(&next) {
                        continue;
                    }
                    visited.push(next);
                    let total = total + u64::from(weight_of(section));
                    dfs(snapshot, weight_of, next, to, visited, total, best);
                    visited.pop();
                }
            }
        }

        let mut best = None;
        dfs(snapshot, metric.selector(), from, to, &mut vec![from], 0, &mut best);
        best
    }

    /// Sum of the cheapest section joining each consecutive pair.
    fn consecutive_sum(
        snapshot: &TopologySnapshot,
        path: &Path,
        weight_of: fn(&Section) -> u32,
        metric_of: fn(&Section) -> u32,
    ) -> u64 {
        path.stations
            .windows(2)
            .map(|pair| {
                let (a, b) = (pair[0].id, pair[1].id);
                snapshot
                    .lines()
                    .iter()
                    .flat_map(|l| l.sections.iter())
                    .filter(|s| {
                        (s.up_station() == a && s.down_station() == b)
                            || (s.up_station() == b && s.down_station() == a)
                    })
                    .min_by_key(|s| weight_of(s))
                    .map(|s| u64::from(metric_of(s)))
                    .unwrap()
            })
            .sum()
    }

    proptest! {
        /// The search matches the best simple path found exhaustively
        #[test]
        fn optimal_under_metric(
            snapshot in arb_snapshot(),
            from in 0..STATIONS,
            to in 0..STATIONS,
            by_duration in any::<bool>(),
        ) {
            prop_assume!(from != to);
            let metric = if by_duration { WeightMetric::Duration } else { WeightMetric::Distance };
            let graph = SubwayGraph::build(&snapshot, metric).unwrap();
            let (from, to) = (StationId::new(from), StationId::new(to));

            let expected = brute_force_best(&snapshot, metric, from, to);
            match shortest_path(&graph, from, to) {
                Ok(path) => {
                    let total = match metric {
                        WeightMetric::Distance => path.distance,
                        WeightMetric::Duration => path.duration,
                    };
                    prop_assert_eq!(Some(total), expected);
                }
                Err(PathError::NoPathExists { .. }) => prop_assert_eq!(expected, None),
                Err(PathError::StationNotFound(_)) => {
                    // Station is on no section; nothing can reach it.
                    prop_assert_eq!(expected, None);
                }
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
        }

        /// Paths never revisit a station and their distance is the sum of
        /// the edges between consecutive stations
        #[test]
        fn simple_and_consistent(
            snapshot in arb_snapshot(),
            from in 0..STATIONS,
            to in 0..STATIONS,
        ) {
            prop_assume!(from != to);
            let graph = SubwayGraph::build(&snapshot, WeightMetric::Distance).unwrap();
            if let Ok(path) = shortest_path(&graph, StationId::new(from), StationId::new(to)) {
                let unique: BTreeSet<StationId> = path.station_ids().into_iter().collect();
                prop_assert_eq!(unique.len(), path.stations.len());
                prop_assert_eq!(path.stations.first().map(|s| s.id), Some(StationId::new(from)));
                prop_assert_eq!(path.stations.last().map(|s| s.id), Some(StationId::new(to)));

                let summed = consecutive_sum(&snapshot, &path, Section::distance, Section::distance);
                prop_assert_eq!(summed, path.distance);
            }
        }
    }
}
