//! In-memory transit graph.
//!
//! Built once by [`GraphBuilder`](super::GraphBuilder) and immutable
//! afterwards (apart from coordinate back-fill before it is shared), so
//! every read is safe to run concurrently.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::domain::{Coordinates, GroupKey, Station, StationId, StrictKey};

use super::fares::FareTable;

/// How an edge came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Adjacent stations on a line.
    Track,
    /// Free transfer between line-qualified names of one physical stop.
    Interchange,
}

/// A directed, weighted edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Edge {
    pub to: StationId,
    /// Travel time in minutes. Never negative; zero only for interchanges.
    pub minutes: f64,
    pub kind: EdgeKind,
}

/// A best-effort coordinate update for one station name.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateRecord {
    pub name: String,
    pub coordinates: Coordinates,
}

/// Outcome of applying coordinate records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoordinateReport {
    pub updated: usize,
    pub unmatched: usize,
}

/// The station universe plus directed adjacency.
#[derive(Debug, Clone, Default)]
pub struct TransitGraph {
    /// Indexed by `StationId::index()`.
    stations: Vec<Station>,
    strict_keys: Vec<StrictKey>,
    group_keys: Vec<GroupKey>,
    by_strict_key: HashMap<StrictKey, StationId>,
    /// Out-edges per station, in insertion order.
    adjacency: Vec<Vec<Edge>>,
    /// Position of each directed pair within `adjacency[from]`.
    edge_slots: HashMap<(StationId, StationId), usize>,
    interchanges: HashSet<(StationId, StationId)>,
    /// Direct end-to-end durations from the duration matrix.
    timetable: HashMap<(StationId, StationId), f64>,
    fares: FareTable,
}

impl TransitGraph {
    /// Create a graph over `names`, assigning ids 1.. in the given order.
    ///
    /// Callers are responsible for ordering and deduplication.
    pub(crate) fn with_stations(names: Vec<String>) -> Self {
        let mut graph = TransitGraph::default();
        for (index, name) in names.into_iter().enumerate() {
            let id = StationId::from_index(index);
            let strict = StrictKey::new(&name);
            graph.by_strict_key.insert(strict.clone(), id);
            graph.strict_keys.push(strict);
            graph.group_keys.push(GroupKey::new(&name));
            graph.stations.push(Station::new(id, name));
            graph.adjacency.push(Vec::new());
        }
        graph
    }

    /// Insert a directed edge, replacing the weight of an existing pair in place.
    ///
    /// Returns false (and does nothing) if either endpoint is unknown or the
    /// weight is negative or not finite.
    pub(crate) fn insert_edge(
        &mut self,
        from: StationId,
        to: StationId,
        minutes: f64,
        kind: EdgeKind,
    ) -> bool {
        if !self.contains(from) || !self.contains(to) || !minutes.is_finite() || minutes < 0.0 {
            return false;
        }

        let edge = Edge { to, minutes, kind };
        let out = &mut self.adjacency[from.index()];
        match self.edge_slots.get(&(from, to)) {
            Some(&slot) => out[slot] = edge,
            None => {
                self.edge_slots.insert((from, to), out.len());
                out.push(edge);
            }
        }

        match kind {
            EdgeKind::Interchange => {
                self.interchanges.insert((from, to));
            }
            EdgeKind::Track => {
                self.interchanges.remove(&(from, to));
            }
        }
        true
    }

    pub(crate) fn insert_timetable(&mut self, from: StationId, to: StationId, minutes: f64) {
        self.timetable.insert((from, to), minutes);
    }

    pub(crate) fn fares_mut(&mut self) -> &mut FareTable {
        &mut self.fares
    }

    /// All stations in id order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(id.index())
    }

    pub fn contains(&self, id: StationId) -> bool {
        id.index() < self.stations.len()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Display name of a station.
    pub fn name(&self, id: StationId) -> Option<&str> {
        self.station(id).map(|s| s.name.as_str())
    }

    /// Resolve a raw label to a station by strict key.
    pub fn resolve(&self, raw_name: &str) -> Option<StationId> {
        self.by_strict_key.get(&StrictKey::new(raw_name)).copied()
    }

    pub(crate) fn resolve_key(&self, key: &StrictKey) -> Option<StationId> {
        self.by_strict_key.get(key).copied()
    }

    pub fn strict_key(&self, id: StationId) -> Option<&StrictKey> {
        self.strict_keys.get(id.index())
    }

    pub fn group_key(&self, id: StationId) -> Option<&GroupKey> {
        self.group_keys.get(id.index())
    }

    /// Stations whose strict key contains the normalized query, in id order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Station> {
        let needle = StrictKey::new(query);
        if needle.is_empty() {
            return Vec::new();
        }
        self.strict_keys
            .iter()
            .zip(&self.stations)
            .filter(|(key, _)| key.as_str().contains(needle.as_str()))
            .map(|(_, station)| station)
            .take(limit)
            .collect()
    }

    /// Out-edges of a station in insertion order; empty for unknown ids.
    pub fn neighbors(&self, id: StationId) -> &[Edge] {
        self.adjacency
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Weight of the directed edge `from -> to`, if present.
    pub fn edge_weight(&self, from: StationId, to: StationId) -> Option<f64> {
        let slot = *self.edge_slots.get(&(from, to))?;
        self.adjacency
            .get(from.index())
            .and_then(|out| out.get(slot))
            .map(|e| e.minutes)
    }

    pub fn is_interchange(&self, from: StationId, to: StationId) -> bool {
        self.interchanges.contains(&(from, to))
    }

    /// Total number of directed edges, interchanges included.
    pub fn edge_count(&self) -> usize {
        self.edge_slots.len()
    }

    /// Number of directed interchange edges.
    pub fn interchange_count(&self) -> usize {
        self.interchanges.len()
    }

    /// Every directed edge as `(from, to, minutes)`, sorted by endpoints.
    pub fn edges(&self) -> Vec<(StationId, StationId, f64)> {
        let mut all: Vec<_> = self
            .adjacency
            .iter()
            .enumerate()
            .flat_map(|(index, out)| {
                let from = StationId::from_index(index);
                out.iter().map(move |e| (from, e.to, e.minutes))
            })
            .collect();
        all.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        all
    }

    /// Direct timetable duration for an origin/destination pair.
    pub fn timetable_minutes(&self, from: StationId, to: StationId) -> Option<f64> {
        self.timetable.get(&(from, to)).copied()
    }

    pub fn timetable_len(&self) -> usize {
        self.timetable.len()
    }

    pub fn fare(&self, origin: StationId, destination: StationId) -> Option<f64> {
        self.fares.get(origin, destination)
    }

    pub fn fares(&self) -> &FareTable {
        &self.fares
    }

    /// Back-fill station coordinates, matching names by strict key.
    ///
    /// Later records for the same station overwrite earlier ones; unmatched
    /// names are counted and otherwise ignored.
    pub fn apply_coordinates(&mut self, records: &[CoordinateRecord]) -> CoordinateReport {
        let mut report = CoordinateReport::default();
        for record in records {
            match self.resolve(&record.name) {
                Some(id) => {
                    self.stations[id.index()].coordinates = Some(record.coordinates);
                    report.updated += 1;
                }
                None => report.unmatched += 1,
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(names: &[&str]) -> TransitGraph {
        TransitGraph::with_stations(names.iter().map(|s| s.to_string()).collect())
    }

    fn id(raw: u32) -> StationId {
        StationId::new(raw)
    }

    #[test]
    fn ids_follow_given_order() {
        let g = graph(&["A", "B", "C"]);
        assert_eq!(g.station_count(), 3);
        assert_eq!(g.name(id(1)), Some("A"));
        assert_eq!(g.name(id(3)), Some("C"));
        assert_eq!(g.name(id(4)), None);
        assert!(!g.contains(StationId::new(0)));
    }

    #[test]
    fn resolve_uses_strict_key() {
        let g = graph(&["Masjid Jamek (KJL)", "King's Cross"]);
        assert_eq!(g.resolve("  masjid  JAMEK (kjl)"), Some(id(1)));
        assert_eq!(g.resolve("King\u{2019}s cross"), Some(id(2)));
        assert_eq!(g.resolve("Masjid Jamek"), None);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut g = graph(&["A", "B", "C"]);
        assert!(g.insert_edge(id(1), id(2), 3.0, EdgeKind::Track));
        assert!(g.insert_edge(id(1), id(3), 4.0, EdgeKind::Track));
        assert!(g.insert_edge(id(1), id(2), 5.0, EdgeKind::Track));

        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.edge_weight(id(1), id(2)), Some(5.0));
        let order: Vec<_> = g.neighbors(id(1)).iter().map(|e| e.to).collect();
        assert_eq!(order, vec![id(2), id(3)]);
    }

    #[test]
    fn insert_rejects_unknown_or_negative() {
        let mut g = graph(&["A", "B"]);
        assert!(!g.insert_edge(id(1), id(9), 1.0, EdgeKind::Track));
        assert!(!g.insert_edge(id(1), id(2), -1.0, EdgeKind::Track));
        assert!(!g.insert_edge(id(1), id(2), f64::NAN, EdgeKind::Track));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn interchange_flag_follows_latest_insert() {
        let mut g = graph(&["X (L1)", "X (L2)"]);
        g.insert_edge(id(1), id(2), 0.0, EdgeKind::Interchange);
        assert!(g.is_interchange(id(1), id(2)));
        assert_eq!(g.interchange_count(), 1);

        g.insert_edge(id(1), id(2), 2.0, EdgeKind::Track);
        assert!(!g.is_interchange(id(1), id(2)));
        assert_eq!(g.interchange_count(), 0);
    }

    #[test]
    fn neighbors_of_unknown_is_empty() {
        let g = graph(&["A"]);
        assert!(g.neighbors(id(7)).is_empty());
    }

    #[test]
    fn search_is_normalized_substring() {
        let g = graph(&["Bukit Bintang", "Bukit Jalil", "KLCC"]);
        let hits: Vec<_> = g.search("BUKIT", 10).iter().map(|s| s.id).collect();
        assert_eq!(hits, vec![id(1), id(2)]);
        assert_eq!(g.search("bukit", 1).len(), 1);
        assert!(g.search("  ", 10).is_empty());
    }

    #[test]
    fn coordinates_last_write_wins() {
        let mut g = graph(&["KLCC", "Ampang Park"]);
        let at = |lat, lng| Coordinates {
            latitude: lat,
            longitude: lng,
        };
        let report = g.apply_coordinates(&[
            CoordinateRecord {
                name: "klcc".into(),
                coordinates: at(1.0, 1.0),
            },
            CoordinateRecord {
                name: "KLCC ".into(),
                coordinates: at(3.1, 101.7),
            },
            CoordinateRecord {
                name: "Nowhere".into(),
                coordinates: at(0.0, 0.0),
            },
        ]);

        assert_eq!(
            report,
            CoordinateReport {
                updated: 2,
                unmatched: 1
            }
        );
        assert_eq!(g.station(id(1)).unwrap().coordinates, Some(at(3.1, 101.7)));
        assert_eq!(g.station(id(2)).unwrap().coordinates, None);
    }
}
