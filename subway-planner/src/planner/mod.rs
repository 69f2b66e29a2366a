//! Route finding and pricing.
//!
//! [`PathService`] answers "what is the best route between these two
//! stations under this metric, and what does it cost?". The search itself
//! is Dijkstra over a [`SubwayGraph`](crate::graph::SubwayGraph).

mod error;
mod search;
mod service;


pub use error::PathError;
pub use search::{Path, shortest_path};
pub use service::{PathQuery, PathResult, PathService};
