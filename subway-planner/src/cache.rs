//! Caching layer for built graphs.
//!
//! Building a graph walks every section of the network, which is wasted
//! work when the topology has not changed since the last query. Graphs are
//! cached by (topology id, version, metric): a topology edit bumps the
//! version, so a query against the new topology can never hit a graph built
//! from the old one, and two networks at the same version never share an
//! entry. Edits also evict everything through [`TopologyListener`].

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache as MokaCache;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::graph::{SubwayGraph, WeightMetric};
use crate::planner::PathError;
use crate::topology::{TopologyId, TopologyListener, TopologySnapshot};

/// Cache key: (topology, version, metric).
type GraphKey = (TopologyId, u64, WeightMetric);

/// Configuration for the graph cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// TTL for cached graphs.
    pub ttl: Duration,

    /// Maximum number of cached graphs.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 16,
        }
    }
}

/// Versioned cache of built graphs.
#[derive(Clone)]
pub struct GraphCache {
    graphs: MokaCache<GraphKey, Arc<SubwayGraph>>,
}

impl GraphCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let graphs = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { graphs }
    }

    /// Get the graph for this snapshot and metric, building it on a miss.
    ///
    /// Build failures are not cached.
    pub fn get_or_build(
        &self,
        snapshot: &TopologySnapshot,
        metric: WeightMetric,
    ) -> Result<Arc<SubwayGraph>, PathError> {
        let key = (snapshot.topology(), snapshot.version(), metric);

        if let Some(graph) = self.graphs.get(&key) {
            trace!(topology = %key.0, version = key.1, %metric, "graph cache hit");
            return Ok(graph);
        }

        debug!(topology = %key.0, version = key.1, %metric, "graph cache miss");
        let graph = Arc::new(SubwayGraph::build(snapshot, metric)?);
        self.graphs.insert(key, Arc::clone(&graph));

        Ok(graph)
    }

    /// Get cache statistics (for monitoring).
    ///
    /// The count is approximate until pending maintenance has run.
    pub fn entry_count(&self) -> u64 {
        self.graphs.entry_count()
    }

    /// Invalidate all cached graphs.
    pub fn invalidate_all(&self) {
        self.graphs.invalidate_all();
    }
}

impl TopologyListener for GraphCache {
    fn topology_changed(&self, version: u64) {
        debug!(version, "invalidating cached graphs");
        self.invalidate_all();
    }
}
