//! JSON topology documents.
//!
//! The document lists stations and lines with their sections. Loading
//! validates every section and checks that its endpoints are listed
//! stations before anything reaches the store.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{Line, LineId, Section, Station, StationId};

use super::error::TopologyError;
use super::memory::InMemoryTopology;

/// A section as written in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionDto {
    pub up_station: StationId,
    pub down_station: StationId,
    pub distance: u32,
    pub duration: u32,
}

/// A line as written in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineDto {
    pub id: LineId,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub extra_fee: u32,
    #[serde(default)]
    pub sections: Vec<SectionDto>,
}

/// Whole-network document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopologyDocument {
    pub stations: Vec<Station>,
    pub lines: Vec<LineDto>,
}

impl TopologyDocument {
    /// Parse a document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, TopologyError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a document from disk.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, TopologyError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TopologyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Validate the document and load it into a fresh store.
    pub fn into_store(self) -> Result<InMemoryTopology, TopologyError> {
        let store = InMemoryTopology::new();
        let station_count = self.stations.len();
        let line_count = self.lines.len();

        for station in self.stations {
            store.upsert_station(station);
        }

        for dto in self.lines {
            let mut line = Line::new(dto.id, dto.name, dto.color, dto.extra_fee);
            for s in dto.sections {
                let section = Section::new(s.up_station, s.down_station, s.distance, s.duration)
                    .map_err(|source| TopologyError::InvalidSection {
                        line: dto.id,
                        source,
                    })?;
                line.sections.push(section);
            }
            store.upsert_line(line)?;
        }

        info!(
            stations = station_count,
            lines = line_count,
            "loaded topology"
        );
        Ok(store)
    }
}

/// Read a topology file into a new in-memory store.
pub fn load_topology(path: impl AsRef<Path>) -> Result<InMemoryTopology, TopologyError> {
    TopologyDocument::read(path)?.into_store()
}
