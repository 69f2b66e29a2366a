//! In-memory topology store.
//!
//! Every edit bumps the version counter and notifies registered listeners,
//! so caches keyed on the version (see [`crate::cache::GraphCache`]) never
//! serve a graph built from an older topology.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::domain::{Line, LineId, Section, Station, StationId};

use super::error::TopologyError;
use super::snapshot::{TopologyId, TopologyProvider, TopologySnapshot};

/// Notified after each topology edit.
pub trait TopologyListener: Send + Sync {
    /// Called with the version the topology now has.
    fn topology_changed(&self, version: u64);
}

#[derive(Default)]
struct State {
    version: u64,
    stations: BTreeMap<StationId, Station>,
    lines: BTreeMap<LineId, Line>,
    /// Snapshot of the current version, built lazily.
    snapshot: Option<Arc<TopologySnapshot>>,
}

/// Thread-safe, versioned topology store.
pub struct InMemoryTopology {
    id: TopologyId,
    state: RwLock<State>,
    listeners: RwLock<Vec<Arc<dyn TopologyListener>>>,
}

impl Default for InMemoryTopology {
    fn default() -> Self {
        Self {
            id: TopologyId::fresh(),
            state: RwLock::default(),
            listeners: RwLock::default(),
        }
    }
}

impl fmt::Debug for InMemoryTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read_state();
        f.debug_struct("InMemoryTopology")
            .field("id", &self.id)
            .field("version", &state.version)
            .field("stations", &state.stations.len())
            .field("lines", &state.lines.len())
            .finish_non_exhaustive()
    }
}

impl InMemoryTopology {
    /// Create an empty store at version 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity shared by every snapshot of this store.
    pub fn id(&self) -> TopologyId {
        self.id
    }

    /// Register a listener for topology edits.
    pub fn subscribe(&self, listener: Arc<dyn TopologyListener>) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    /// Current version.
    pub fn version(&self) -> u64 {
        self.read_state().version
    }

    /// Insert or replace a station.
    pub fn upsert_station(&self, station: Station) {
        let mut state = self.write_state();
        state.stations.insert(station.id, station);
        self.commit(state);
    }

    /// Insert or replace a line.
    ///
    /// All section endpoints must already exist as stations.
    pub fn upsert_line(&self, line: Line) -> Result<(), TopologyError> {
        self.try_edit(|state| {
            for section in &line.sections {
                check_endpoints(&state.stations, line.id, section)?;
            }
            state.lines.insert(line.id, line);
            Ok(())
        })
    }

    /// Append a section to an existing line.
    pub fn add_section(&self, line_id: LineId, section: Section) -> Result<(), TopologyError> {
        self.try_edit(|state| {
            check_endpoints(&state.stations, line_id, &section)?;
            let line = state
                .lines
                .get_mut(&line_id)
                .ok_or(TopologyError::UnknownLine(line_id))?;
            line.sections.push(section);
            Ok(())
        })
    }

    /// Remove a line and all its sections.
    pub fn remove_line(&self, line_id: LineId) -> Result<Line, TopologyError> {
        self.try_edit(|state| {
            state
                .lines
                .remove(&line_id)
                .ok_or(TopologyError::UnknownLine(line_id))
        })
    }

    /// Apply an edit; on success commit it.
    ///
    /// A failed edit leaves both the state and the version untouched.
    fn try_edit<T>(
        &self,
        f: impl FnOnce(&mut State) -> Result<T, TopologyError>,
    ) -> Result<T, TopologyError> {
        let mut state = self.write_state();
        let result = f(&mut *state)?;
        self.commit(state);
        Ok(result)
    }

    /// Bump the version, release the lock and notify listeners.
    fn commit(&self, mut state: RwLockWriteGuard<'_, State>) {
        state.version += 1;
        state.snapshot = None;
        let version = state.version;
        drop(state);

        debug!(version, "topology changed");

        // Listeners may subscribe or edit, so they run with no lock held.
        let listeners = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in &listeners {
            listener.topology_changed(version);
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn check_endpoints(
    stations: &BTreeMap<StationId, Station>,
    line: LineId,
    section: &Section,
) -> Result<(), TopologyError> {
    for station in [section.up_station(), section.down_station()] {
        if !stations.contains_key(&station) {
            return Err(TopologyError::UnknownStation { line, station });
        }
    }
    Ok(())
}

impl TopologyProvider for InMemoryTopology {
    fn snapshot(&self) -> Arc<TopologySnapshot> {
        if let Some(snapshot) = &self.read_state().snapshot {
            return Arc::clone(snapshot);
        }

        let mut state = self.write_state();
        // Another thread may have built it between the two locks.
        if let Some(snapshot) = &state.snapshot {
            return Arc::clone(snapshot);
        }

        let snapshot = Arc::new(TopologySnapshot::of_topology(
            self.id,
            state.version,
            state.stations.values().cloned(),
            state.lines.values().cloned().collect(),
        ));
        state.snapshot = Some(Arc::clone(&snapshot));
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, Weak};

    fn id(n: u64) -> StationId {
        StationId::new(n)
    }

    fn store_with_two_stations() -> InMemoryTopology {
        let store = InMemoryTopology::new();
        store.upsert_station(Station::new(id(1), "A"));
        store.upsert_station(Station::new(id(2), "B"));
        store
    }

    /// Records every version it is told about.
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<u64>>,
    }

    impl TopologyListener for Recorder {
        fn topology_changed(&self, version: u64) {
            self.seen.lock().unwrap().push(version);
        }
    }

    #[test]
    fn edits_bump_version() {
        let store = store_with_two_stations();
        assert_eq!(store.version(), 2);

        let line = Line::new(LineId::new(1), "L1", "green", 0)
            .with_section(Section::new(id(1), id(2), 5, 5).unwrap());
        store.upsert_line(line).unwrap();
        assert_eq!(store.version(), 3);
    }

    #[test]
    fn failed_edit_keeps_version() {
        let store = store_with_two_stations();
        let err = store
            .add_section(LineId::new(9), Section::new(id(1), id(2), 1, 1).unwrap())
            .unwrap_err();
        assert!(matches!(err, TopologyError::UnknownLine(_)));
        assert_eq!(store.version(), 2);
    }

    #[test]
    fn rejects_section_with_unknown_station() {
        let store = store_with_two_stations();
        let line = Line::new(LineId::new(1), "L1", "green", 0)
            .with_section(Section::new(id(1), id(3), 5, 5).unwrap());
        let err = store.upsert_line(line).unwrap_err();
        assert!(matches!(
            err,
            TopologyError::UnknownStation { station, .. } if station == id(3)
        ));
    }

    #[test]
    fn snapshot_is_reused_until_edit() {
        let store = store_with_two_stations();
        let first = store.snapshot();
        let second = store.snapshot();
        assert!(Arc::ptr_eq(&first, &second));

        store
            .upsert_line(Line::new(LineId::new(1), "L1", "green", 0))
            .unwrap();
        let third = store.snapshot();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.version(), 3);
        assert_eq!(third.lines().len(), 1);
    }

    #[test]
    fn listeners_see_each_version() {
        let store = InMemoryTopology::new();
        let recorder = Arc::new(Recorder::default());
        store.subscribe(recorder.clone());

        store.upsert_station(Station::new(id(1), "A"));
        store.upsert_station(Station::new(id(2), "B"));
        store
            .upsert_line(Line::new(LineId::new(1), "L1", "green", 0))
            .unwrap();
        store
            .add_section(LineId::new(1), Section::new(id(1), id(2), 1, 1).unwrap())
            .unwrap();
        store.remove_line(LineId::new(1)).unwrap();

        assert_eq!(*recorder.seen.lock().unwrap(), vec![1, 2, 3, 4, 5]);
    }

    /// Subscribes `late` to the store on every change it sees.
    struct SubscribesOnChange {
        store: Weak<InMemoryTopology>,
        late: Arc<Recorder>,
    }

    impl TopologyListener for SubscribesOnChange {
        fn topology_changed(&self, _version: u64) {
            if let Some(store) = self.store.upgrade() {
                store.subscribe(self.late.clone());
            }
        }
    }

    #[test]
    fn listener_can_subscribe_during_notification() {
        let store = Arc::new(InMemoryTopology::new());
        let late = Arc::new(Recorder::default());
        store.subscribe(Arc::new(SubscribesOnChange {
            store: Arc::downgrade(&store),
            late: Arc::clone(&late),
        }));

        store.upsert_station(Station::new(id(1), "A"));
        store.upsert_station(Station::new(id(2), "B"));

        // Subscribed during the first notification, so it sees the second.
        assert_eq!(*late.seen.lock().unwrap(), vec![2]);
    }

    #[test]
    fn snapshots_carry_store_identity() {
        let store = store_with_two_stations();
        let other = store_with_two_stations();
        assert_eq!(store.snapshot().topology(), store.id());
        assert_eq!(store.version(), other.version());
        assert_ne!(store.snapshot().topology(), other.snapshot().topology());
    }

    #[test]
    fn debug_shows_counts() {
        let store = store_with_two_stations();
        assert_eq!(
            format!("{store:?}"),
            format!(
                "InMemoryTopology {{ id: {:?}, version: 2, stations: 2, lines: 0, .. }}",
                store.id()
            )
        );
    }
}
