//! Path query error types.

use crate::domain::StationId;

/// Why a path query failed.
///
/// Every error is terminal for its query: the computation is pure, so
/// retrying with the same input reproduces the same error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// A referenced station is not part of the routable network
    #[error("station {0} not found")]
    StationNotFound(StationId),

    /// Source and target are the same station
    #[error("source and target are the same station ({0})")]
    SameStation(StationId),

    /// No route connects the two stations
    #[error("no route from station {from} to station {to}")]
    NoPathExists { from: StationId, to: StationId },

    /// The topology has no sections to route over
    #[error("topology has no sections")]
    EmptyTopology,
}

impl PathError {
    /// True for errors caused by the caller's input rather than the state
    /// of the network data.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, PathError::EmptyTopology)
    }
}
