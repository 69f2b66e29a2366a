//! Network topology supplied to the path engine.
//!
//! The engine only reads topology through [`TopologyProvider`]. The
//! in-memory store and the JSON loader are reference implementations of
//! the persistence layer that owns stations, lines and sections.

mod error;
mod file;
mod memory;
mod snapshot;

pub use error::TopologyError;
pub use file::{LineDto, SectionDto, TopologyDocument, load_topology};
pub use memory::{InMemoryTopology, TopologyListener};
pub use snapshot::{FixedTopology, TopologyId, TopologyProvider, TopologySnapshot};
