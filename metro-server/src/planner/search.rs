//! Shortest-path search over the transit graph.
//!
//! Answers "how do I get from A to B" either with the fewest stops or in
//! the least time, and turns the raw vertex path into a [`PathResult`].

use tracing::debug;

use crate::domain::{PathResult, SearchMode, StationId};
use crate::network::TransitGraph;

use super::bfs::fewest_edges;
use super::config::{PlannerConfig, TotalTimePolicy};
use super::dijkstra::least_time;

/// Route search over a borrowed graph.
pub struct PathFinder<'a> {
    graph: &'a TransitGraph,
    config: &'a PlannerConfig,
}

impl<'a> PathFinder<'a> {
    pub fn new(graph: &'a TransitGraph, config: &'a PlannerConfig) -> Self {
        Self { graph, config }
    }

    /// Find the shortest route in the given mode.
    ///
    /// Returns `None` for unknown stations and for unreachable destinations;
    /// never panics on a disconnected graph.
    pub fn shortest(
        &self,
        origin: StationId,
        destination: StationId,
        mode: SearchMode,
    ) -> Option<PathResult> {
        let graph = self.graph;
        if !graph.contains(origin) || !graph.contains(destination) {
            debug!(%origin, %destination, "Unknown station in route request");
            return None;
        }

        let timetable_time = graph.timetable_minutes(origin, destination);

        if origin == destination {
            return Some(self.result(vec![origin], Some(0.0), timetable_time));
        }

        let result = match mode {
            SearchMode::Stops => {
                let path = fewest_edges(graph, origin, destination)?;
                self.result(path, None, timetable_time)
            }
            SearchMode::Time => {
                let (path, summed) = least_time(graph, origin, destination)?;
                let total = match self.config.total_time {
                    TotalTimePolicy::PathSum => summed,
                    TotalTimePolicy::PreferTimetable => timetable_time.unwrap_or(summed),
                };
                self.result(path, Some(total), timetable_time)
            }
        };

        debug!(
            %origin,
            %destination,
            mode = %mode,
            stops = result.total_stops,
            "Route found"
        );
        Some(result)
    }

    fn result(
        &self,
        path: Vec<StationId>,
        total_time: Option<f64>,
        timetable_time: Option<f64>,
    ) -> PathResult {
        let station_names = path
            .iter()
            .map(|id| self.graph.name(*id).unwrap_or_default().to_string())
            .collect();
        PathResult {
            total_stops: collapsed_stop_count(self.graph, &path),
            station_ids: path,
            station_names,
            total_time,
            timetable_time,
        }
    }
}

/// Find the shortest route with the default configuration.
pub fn shortest(
    graph: &TransitGraph,
    origin: StationId,
    destination: StationId,
    mode: SearchMode,
) -> Option<PathResult> {
    PathFinder::new(graph, &PlannerConfig::default()).shortest(origin, destination, mode)
}

/// Number of physical stops travelled along `path`.
///
/// Consecutive vertices sharing a group key are one physical stop, so they
/// collapse before counting. A single collapsed stop counts as zero.
pub fn collapsed_stop_count(graph: &TransitGraph, path: &[StationId]) -> usize {
    let mut groups = path.iter().map(|id| graph.group_key(*id));
    let Some(mut current) = groups.next() else {
        return 0;
    };

    let mut distinct = 1;
    for group in groups {
        if group != current {
            distinct += 1;
            current = group;
        }
    }
    distinct - 1
}

/// Edge weights along a path, in minutes.
///
/// Falls back to the reverse direction when only that edge is stored; a
/// pair with neither direction yields `None`.
pub fn segment_minutes(graph: &TransitGraph, path: &[StationId]) -> Vec<Option<f64>> {
    path.windows(2)
        .map(|pair| {
            graph
                .edge_weight(pair[0], pair[1])
                .or_else(|| graph.edge_weight(pair[1], pair[0]))
        })
        .collect()
}
