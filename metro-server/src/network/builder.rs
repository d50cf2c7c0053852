//! Graph construction from tabular sources.
//!
//! Sources disagree on spelling, so every name is reduced to its
//! [`StrictKey`] before it is matched against anything. Unmatched names are
//! dropped and counted; nothing here fails.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info};

use crate::domain::{GroupKey, StationId, StrictKey};

use super::config::BuildConfig;
use super::graph::{EdgeKind, TransitGraph};
use super::matrix::{Cell, Matrix};

/// Raw inputs for a graph build.
#[derive(Debug, Clone, Default)]
pub struct NetworkSources {
    /// Station records (raw names).
    pub stations: Vec<String>,
    /// Lines of stations in travel order.
    pub lines: Vec<Vec<String>>,
    /// Pairwise durations in minutes.
    pub durations: Matrix,
    /// Pairwise fares.
    pub fares: Matrix,
}

impl NetworkSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stations<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.stations.extend(names.into_iter().map(Into::into));
        self
    }

    /// Append one line (a visiting sequence).
    pub fn with_line<S: Into<String>>(mut self, stops: impl IntoIterator<Item = S>) -> Self {
        self.lines.push(stops.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_durations(mut self, durations: Matrix) -> Self {
        self.durations = durations;
        self
    }

    pub fn with_fares(mut self, fares: Matrix) -> Self {
        self.fares = fares;
        self
    }
}

/// Counts describing what a build produced and what it skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub stations: usize,
    pub track_edges: usize,
    pub interchange_edges: usize,
    pub timetable_entries: usize,
    pub fares: usize,
    /// Adjacent pairs dropped because an endpoint matched no station.
    pub dropped_pairs: usize,
    /// Matrix cells with text but no usable number.
    pub skipped_cells: usize,
}

/// Builds a [`TransitGraph`] from [`NetworkSources`].
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    config: BuildConfig,
}

impl GraphBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Build the graph, discarding the report.
    pub fn build(&self, sources: &NetworkSources) -> TransitGraph {
        self.build_with_report(sources).0
    }

    /// Build the graph and report what was imported.
    pub fn build_with_report(&self, sources: &NetworkSources) -> (TransitGraph, BuildReport) {
        let mut report = BuildReport::default();

        let mut graph = TransitGraph::with_stations(self.station_universe(sources));
        report.stations = graph.station_count();

        let durations = duration_lookup(&sources.durations, &mut report);
        self.add_track_edges(&mut graph, sources, &durations, &mut report);
        add_interchange_edges(&mut graph, &mut report);
        add_timetable(&mut graph, &durations, &mut report);
        add_fares(&mut graph, &sources.fares, &mut report);

        info!(
            stations = report.stations,
            track_edges = report.track_edges,
            interchange_edges = report.interchange_edges,
            timetable_entries = report.timetable_entries,
            fares = report.fares,
            dropped_pairs = report.dropped_pairs,
            skipped_cells = report.skipped_cells,
            "Built transit graph"
        );

        (graph, report)
    }

    /// Deduplicated station names ordered by strict key.
    ///
    /// The first spelling seen (station records, then fare labels, duration
    /// labels, and line entries) becomes the display name.
    fn station_universe(&self, sources: &NetworkSources) -> Vec<String> {
        let authoritative = self.config.station_list_authoritative && !sources.stations.is_empty();

        let mut candidates: Vec<&str> = sources.stations.iter().map(String::as_str).collect();
        if !authoritative {
            candidates.extend(sources.fares.labels());
            candidates.extend(sources.durations.labels());
            candidates.extend(sources.lines.iter().flatten().map(String::as_str));
        }

        let mut by_key: BTreeMap<StrictKey, String> = BTreeMap::new();
        for raw in candidates {
            let key = StrictKey::new(raw);
            if key.is_empty() {
                continue;
            }
            by_key.entry(key).or_insert_with(|| raw.trim().to_string());
        }

        by_key.into_values().collect()
    }

    fn add_track_edges(
        &self,
        graph: &mut TransitGraph,
        sources: &NetworkSources,
        durations: &HashMap<(StrictKey, StrictKey), f64>,
        report: &mut BuildReport,
    ) {
        let default_minutes = self.config.effective_default_minutes();

        for line in &sources.lines {
            let keys: Vec<StrictKey> = line
                .iter()
                .map(|raw| StrictKey::new(raw))
                .filter(|key| !key.is_empty())
                .collect();

            for pair in keys.windows(2) {
                let (a_key, b_key) = (&pair[0], &pair[1]);
                let (Some(a), Some(b)) = (graph.resolve_key(a_key), graph.resolve_key(b_key)) else {
                    debug!(from = %a_key, to = %b_key, "Dropping pair with unknown station");
                    report.dropped_pairs += 1;
                    continue;
                };
                if a == b {
                    continue;
                }

                for (from, to, from_key, to_key) in [(a, b, a_key, b_key), (b, a, b_key, a_key)] {
                    let minutes = durations
                        .get(&(from_key.clone(), to_key.clone()))
                        .copied()
                        .filter(|m| *m > 0.0)
                        .unwrap_or(default_minutes);
                    graph.insert_edge(from, to, minutes, EdgeKind::Track);
                }
            }
        }
    }
}

/// Duration matrix keyed by endpoint strict keys. Later cells win.
fn duration_lookup(
    durations: &Matrix,
    report: &mut BuildReport,
) -> HashMap<(StrictKey, StrictKey), f64> {
    let mut lookup = HashMap::new();
    for entry in durations.entries() {
        match entry.cell {
            Cell::Value(minutes) => {
                lookup.insert((StrictKey::new(entry.row), StrictKey::new(entry.column)), minutes);
            }
            Cell::Invalid => report.skipped_cells += 1,
            Cell::Missing => {}
        }
    }
    lookup
}

/// Zero-weight edges between every ordered pair sharing a group key.
fn add_interchange_edges(graph: &mut TransitGraph, report: &mut BuildReport) {
    let mut groups: BTreeMap<GroupKey, Vec<StationId>> = BTreeMap::new();
    for station in graph.stations() {
        if let Some(group) = graph.group_key(station.id)
            && !group.as_str().is_empty()
        {
            groups.entry(group.clone()).or_default().push(station.id);
        }
    }

    for members in groups.values().filter(|m| m.len() > 1) {
        for &a in members {
            for &b in members {
                if a != b {
                    graph.insert_edge(a, b, 0.0, EdgeKind::Interchange);
                }
            }
        }
    }

    report.interchange_edges = graph.interchange_count();
    report.track_edges = graph.edge_count() - report.interchange_edges;
}

fn add_timetable(
    graph: &mut TransitGraph,
    durations: &HashMap<(StrictKey, StrictKey), f64>,
    report: &mut BuildReport,
) {
    for ((from_key, to_key), &minutes) in durations {
        if minutes <= 0.0 {
            continue;
        }
        if let (Some(from), Some(to)) = (graph.resolve_key(from_key), graph.resolve_key(to_key)) {
            graph.insert_timetable(from, to, minutes);
        }
    }
    report.timetable_entries = graph.timetable_len();
}

fn add_fares(graph: &mut TransitGraph, fares: &Matrix, report: &mut BuildReport) {
    for entry in fares.entries() {
        let price = match entry.cell {
            Cell::Value(price) if price >= 0.0 => price,
            Cell::Value(_) | Cell::Invalid => {
                report.skipped_cells += 1;
                continue;
            }
            Cell::Missing => continue,
        };
        if let (Some(origin), Some(destination)) =
            (graph.resolve(entry.row), graph.resolve(entry.column))
        {
            graph.fares_mut().insert(origin, destination, price);
        }
    }
    report.fares = graph.fares().len();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn matrix(header: &[&str], rows: &[&[&str]]) -> Matrix {
        Matrix::from_records(strings(header), rows.iter().map(|r| strings(r)).collect())
    }

    fn id(graph: &TransitGraph, name: &str) -> StationId {
        graph.resolve(name).unwrap()
    }

    fn two_lines() -> NetworkSources {
        NetworkSources::new()
            .with_line(["A", "B", "C"])
            .with_line(["C", "D"])
    }

    #[test]
    fn universe_is_sorted_and_deduplicated() {
        let sources = NetworkSources::new()
            .with_stations(["Gombak", "ampang park"])
            .with_line(["Ampang  Park", "KLCC", "gombak"]);
        let graph = GraphBuilder::default().build(&sources);

        let names: Vec<_> = graph.stations().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["ampang park", "Gombak", "KLCC"]);
        assert_eq!(graph.station(StationId::new(1)).unwrap().name, "ampang park");
    }

    #[test]
    fn lines_become_bidirectional_edges_with_default_weight() {
        let graph = GraphBuilder::default().build(&two_lines());

        let (a, b, c, d) = (id(&graph, "A"), id(&graph, "B"), id(&graph, "C"), id(&graph, "D"));
        assert_eq!(graph.edge_weight(a, b), Some(1.0));
        assert_eq!(graph.edge_weight(b, a), Some(1.0));
        assert_eq!(graph.edge_weight(c, d), Some(1.0));
        assert_eq!(graph.edge_weight(a, c), None);
        assert_eq!(graph.edge_count(), 6);
    }

    #[test]
    fn durations_matched_by_strict_key() {
        let sources = NetworkSources::new()
            .with_line(["KLCC", "Kampung Baru"])
            .with_durations(matrix(
                &["", "klcc", "KAMPUNG  BARU"],
                &[&["KLCC", "", "2.5"], &["kampung baru", "0", ""]],
            ));
        let graph = GraphBuilder::default().build(&sources);

        let klcc = id(&graph, "KLCC");
        let kb = id(&graph, "Kampung Baru");
        assert_eq!(graph.edge_weight(klcc, kb), Some(2.5));
        // Zero is not a usable duration.
        assert_eq!(graph.edge_weight(kb, klcc), Some(1.0));
    }

    #[test]
    fn configured_default_weight() {
        let builder = GraphBuilder::new(BuildConfig::new(3.0, false));
        let graph = builder.build(&two_lines());
        assert_eq!(graph.edge_weight(id(&graph, "A"), id(&graph, "B")), Some(3.0));
    }

    #[test]
    fn interchanges_connect_group_members() {
        let sources = NetworkSources::new()
            .with_line(["A", "X (Line1)"])
            .with_line(["X (Line2)", "B"])
            .with_line(["C", "X"]);
        let (graph, report) = GraphBuilder::default().build_with_report(&sources);

        let x1 = id(&graph, "X (Line1)");
        let x2 = id(&graph, "X (Line2)");
        let x = id(&graph, "X");
        for (p, q) in [(x1, x2), (x2, x1), (x1, x), (x, x1), (x2, x), (x, x2)] {
            assert_eq!(graph.edge_weight(p, q), Some(0.0));
            assert!(graph.is_interchange(p, q));
        }
        assert_eq!(report.interchange_edges, 6);
        assert_eq!(report.track_edges, 6);
    }

    #[test]
    fn identical_names_are_not_interchanges() {
        let sources = NetworkSources::new().with_line(["A", "a", "B"]);
        let graph = GraphBuilder::default().build(&sources);

        assert_eq!(graph.station_count(), 2);
        assert_eq!(graph.interchange_count(), 0);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn authoritative_station_list_drops_unknown_names() {
        let sources = NetworkSources::new()
            .with_stations(["A", "B"])
            .with_line(["A", "B", "Ghost", "A"]);
        let builder = GraphBuilder::new(BuildConfig::new(1.0, true));
        let (graph, report) = builder.build_with_report(&sources);

        assert_eq!(graph.station_count(), 2);
        assert!(graph.resolve("Ghost").is_none());
        assert_eq!(report.dropped_pairs, 2);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn fares_never_create_edges() {
        let sources = NetworkSources::new().with_fares(matrix(
            &["", "A", "B"],
            &[&["A", "", "RM 1.20"], &["B", "1.2", "x"]],
        ));
        let (graph, report) = GraphBuilder::default().build_with_report(&sources);

        let (a, b) = (id(&graph, "A"), id(&graph, "B"));
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.fare(a, b), Some(1.2));
        assert_eq!(graph.fare(b, a), Some(1.2));
        assert_eq!(graph.fare(a, a), None);
        assert_eq!(report.fares, 2);
        assert_eq!(report.skipped_cells, 1);
    }

    #[test]
    fn timetable_keeps_positive_durations() {
        let sources = NetworkSources::new().with_durations(matrix(
            &["", "A", "B", "C"],
            &[&["A", "0", "4", "11"], &["B", "4", "0", "bad"]],
        ));
        let (graph, report) = GraphBuilder::default().build_with_report(&sources);

        let (a, c) = (id(&graph, "A"), id(&graph, "C"));
        assert_eq!(graph.timetable_minutes(a, c), Some(11.0));
        assert_eq!(graph.timetable_minutes(a, a), None);
        assert_eq!(report.timetable_entries, 3);
        assert_eq!(report.skipped_cells, 1);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let sources = two_lines()
            .with_line(["B", "X (L1)"])
            .with_line(["X (L2)", "D"])
            .with_durations(matrix(&["", "A", "B"], &[&["A", "", "2"]]));
        let builder = GraphBuilder::default();

        let first = builder.build(&sources);
        let second = builder.build(&sources);

        assert_eq!(first.stations(), second.stations());
        assert_eq!(first.edges(), second.edges());
    }

    #[test]
    fn repeated_pairs_replace_rather_than_accumulate() {
        let sources = NetworkSources::new()
            .with_line(["A", "B"])
            .with_line(["B", "A"])
            .with_line(["A", "B"]);
        let graph = GraphBuilder::default().build(&sources);

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.neighbors(id(&graph, "A")).len(), 1);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn station_name() -> impl Strategy<Value = String> {
        prop_oneof![
            "[A-E]",
            "[A-E] \\(L[12]\\)",
        ]
    }

    fn lines() -> impl Strategy<Value = Vec<Vec<String>>> {
        proptest::collection::vec(proptest::collection::vec(station_name(), 0..6), 0..5)
    }

    proptest! {
        /// Every edge weight is non-negative, and zero only on interchanges.
        #[test]
        fn weights_non_negative(ls in lines()) {
            let mut sources = NetworkSources::new();
            sources.lines = ls;
            let graph = GraphBuilder::default().build(&sources);

            for (from, to, minutes) in graph.edges() {
                prop_assert!(minutes >= 0.0);
                if minutes == 0.0 {
                    prop_assert!(graph.is_interchange(from, to));
                }
            }
        }

        /// The interchange edge set is symmetric.
        #[test]
        fn interchanges_symmetric(ls in lines()) {
            let mut sources = NetworkSources::new();
            sources.lines = ls;
            let graph = GraphBuilder::default().build(&sources);

            for (from, to, _) in graph.edges() {
                if graph.is_interchange(from, to) {
                    prop_assert!(graph.is_interchange(to, from));
                }
            }
        }

        /// Building twice yields the same ids, edges and weights.
        #[test]
        fn deterministic(ls in lines()) {
            let mut sources = NetworkSources::new();
            sources.lines = ls;
            let builder = GraphBuilder::default();
            let first = builder.build(&sources);
            let second = builder.build(&sources);
            prop_assert_eq!(first.stations(), second.stations());
            prop_assert_eq!(first.edges(), second.edges());
        }
    }
}
