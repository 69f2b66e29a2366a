//! Topology store error types.

use std::path::PathBuf;

use crate::domain::{InvalidSection, LineId, StationId};

/// Errors from editing or loading a topology.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    /// Reading the topology file failed
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The topology document is not valid JSON for the expected shape
    #[error("malformed topology document: {0}")]
    Json(#[from] serde_json::Error),

    /// A section failed validation
    #[error("line {line}: {source}")]
    InvalidSection {
        line: LineId,
        #[source]
        source: InvalidSection,
    },

    /// A section refers to a station the topology does not contain
    #[error("line {line} references unknown station {station}")]
    UnknownStation { line: LineId, station: StationId },

    /// An edit refers to a line the topology does not contain
    #[error("unknown line {0}")]
    UnknownLine(LineId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TopologyError::UnknownStation {
            line: LineId::new(2),
            station: StationId::new(7),
        };
        assert_eq!(err.to_string(), "line 2 references unknown station 7");

        let err = TopologyError::UnknownLine(LineId::new(5));
        assert_eq!(err.to_string(), "unknown line 5");

        let err = TopologyError::Io {
            path: PathBuf::from("/tmp/topology.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().starts_with("failed to read /tmp/topology.json"));
    }
}
