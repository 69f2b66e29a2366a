//! Path query entry point.
//!
//! Ties the pieces together for one query: snapshot → graph → shortest
//! path → fare → discount.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::cache::GraphCache;
use crate::domain::{Station, StationId};
use crate::fare::FarePolicy;
use crate::graph::{SubwayGraph, WeightMetric};
use crate::rider::{MemberId, RiderAgeResolver};
use crate::topology::{TopologyProvider, TopologySnapshot};

use super::error::PathError;
use super::search::shortest_path;

/// A single path query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathQuery {
    pub source: StationId,
    pub target: StationId,
    pub metric: WeightMetric,
    /// Rider age, if the rider is known.
    pub rider_age: Option<u32>,
}

impl PathQuery {
    /// Create a query for an anonymous rider.
    pub fn new(source: StationId, target: StationId, metric: WeightMetric) -> Self {
        Self {
            source,
            target,
            metric,
            rider_age: None,
        }
    }

    /// Set the rider's age.
    pub fn with_rider_age(mut self, age: Option<u32>) -> Self {
        self.rider_age = age;
        self
    }
}

/// Answer to a path query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathResult {
    /// Stations from source to target.
    pub stations: Vec<Station>,

    /// Total distance of the route in km.
    pub distance: u64,

    /// Total travel time of the route in minutes.
    pub duration: u64,

    /// Fare after surcharge and discount.
    pub fare: u64,
}

/// Finds and prices routes over a topology.
pub struct PathService<P: TopologyProvider> {
    provider: P,
    fares: FarePolicy,
    cache: Option<GraphCache>,
}

impl<P: TopologyProvider> PathService<P> {
    /// Create a service that builds a fresh graph for every query.
    pub fn new(provider: P, fares: FarePolicy) -> Self {
        Self {
            provider,
            fares,
            cache: None,
        }
    }

    /// Reuse built graphs across queries.
    ///
    /// The cache should also be subscribed to the topology store so edits
    /// evict old graphs promptly.
    pub fn with_cache(mut self, cache: GraphCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn fares(&self) -> &FarePolicy {
        &self.fares
    }

    /// Find the best route from `source` to `target` under `metric` and
    /// price it for a rider of the given age.
    pub fn find_path(
        &self,
        source: StationId,
        target: StationId,
        metric: WeightMetric,
        rider_age: Option<u32>,
    ) -> Result<PathResult, PathError> {
        self.query(&PathQuery::new(source, target, metric).with_rider_age(rider_age))
    }

    /// As [`find_path`](Self::find_path), resolving the age of `member`.
    pub fn find_path_for_member<R: RiderAgeResolver + ?Sized>(
        &self,
        source: StationId,
        target: StationId,
        metric: WeightMetric,
        member: Option<&MemberId>,
        resolver: &R,
    ) -> Result<PathResult, PathError> {
        let age = resolver.resolve_age(member);
        self.find_path(source, target, metric, age)
    }

    /// Run a query.
    pub fn query(&self, query: &PathQuery) -> Result<PathResult, PathError> {
        let snapshot = self.provider.snapshot();
        let graph = self.graph(&snapshot, query.metric)?;
        let path = shortest_path(&graph, query.source, query.target)?;

        let surcharge = path
            .lines
            .iter()
            .map(|&line| graph.extra_fee(line))
            .max()
            .unwrap_or(0);
        let fare = self.fares.fare(path.distance, surcharge, query.rider_age);

        debug!(
            source = %query.source,
            target = %query.target,
            surcharge,
            rider_age = ?query.rider_age,
            fare,
            "priced path"
        );

        Ok(PathResult {
            stations: path.stations,
            distance: path.distance,
            duration: path.duration,
            fare,
        })
    }

    fn graph(
        &self,
        snapshot: &TopologySnapshot,
        metric: WeightMetric,
    ) -> Result<Arc<SubwayGraph>, PathError> {
        match &self.cache {
            Some(cache) => cache.get_or_build(snapshot, metric),
            None => Ok(Arc::new(SubwayGraph::build(snapshot, metric)?)),
        }
    }
}
