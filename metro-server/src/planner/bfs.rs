//! Fewest-edges search.
//!
//! Plain breadth-first search over the directed adjacency. Interchange
//! edges count as one hop like any other; collapsing them into a single
//! stop happens afterwards when the stop count is derived.

use std::collections::VecDeque;

use tracing::trace;

use crate::domain::StationId;
use crate::network::TransitGraph;

/// Find the first-discovered path with the fewest edges.
///
/// Neighbours are expanded in edge insertion order, so the result is
/// deterministic for a given graph. Returns `None` if either station is
/// unknown or the destination is unreachable.
pub fn fewest_edges(
    graph: &TransitGraph,
    origin: StationId,
    destination: StationId,
) -> Option<Vec<StationId>> {
    if !graph.contains(origin) || !graph.contains(destination) {
        return None;
    }

    let mut previous: Vec<Option<StationId>> = vec![None; graph.station_count()];
    let mut seen = vec![false; graph.station_count()];
    let mut queue = VecDeque::from([origin]);
    seen[origin.index()] = true;

    while let Some(station) = queue.pop_front() {
        if station == destination {
            break;
        }
        for edge in graph.neighbors(station) {
            let next = edge.to.index();
            if !seen[next] {
                seen[next] = true;
                previous[next] = Some(station);
                queue.push_back(edge.to);
            }
        }
    }

    if !seen[destination.index()] {
        trace!(%origin, %destination, "BFS found no route");
        return None;
    }

    let mut path = vec![destination];
    let mut cursor = destination;
    while let Some(prev) = previous[cursor.index()] {
        path.push(prev);
        cursor = prev;
    }
    path.reverse();
    Some(path)
}
