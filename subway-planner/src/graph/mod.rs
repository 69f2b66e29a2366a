//! Traversal graph for path search.
//!
//! A [`SubwayGraph`] is built once per (topology version, metric) and is
//! immutable afterwards, so it can be shared between concurrent queries.

mod builder;
mod metric;

pub use builder::{Edge, EdgeIndex, SubwayGraph, VertexIndex};
pub use metric::{InvalidMetric, WeightMetric};
