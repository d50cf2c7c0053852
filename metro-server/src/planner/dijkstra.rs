//! Least-time search.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use tracing::trace;

use crate::domain::StationId;
use crate::network::TransitGraph;

/// Heap entry ordered by cost, then station id for deterministic ties.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Frontier {
    minutes: f64,
    station: StationId,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.minutes
            .total_cmp(&other.minutes)
            .then_with(|| self.station.cmp(&other.station))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find the path with the least total edge weight.
///
/// Returns the path and its cost in minutes, or `None` if either station
/// is unknown or the destination is unreachable. Edge weights are never
/// negative (the builder guarantees it), so the first time the destination
/// is popped its cost is final.
pub fn least_time(
    graph: &TransitGraph,
    origin: StationId,
    destination: StationId,
) -> Option<(Vec<StationId>, f64)> {
    if !graph.contains(origin) || !graph.contains(destination) {
        return None;
    }

    let n = graph.station_count();
    let mut best = vec![f64::INFINITY; n];
    let mut previous: Vec<Option<StationId>> = vec![None; n];
    best[origin.index()] = 0.0;

    // Reverse turns the max-heap into a min-heap.
    let mut heap = BinaryHeap::from([Reverse(Frontier {
        minutes: 0.0,
        station: origin,
    })]);

    while let Some(Reverse(Frontier { minutes, station })) = heap.pop() {
        if station == destination {
            break;
        }
        // Stale entry.
        if minutes > best[station.index()] {
            continue;
        }
        for edge in graph.neighbors(station) {
            let candidate = minutes + edge.minutes;
            let next = edge.to.index();
            if candidate < best[next] {
                best[next] = candidate;
                previous[next] = Some(station);
                heap.push(Reverse(Frontier {
                    minutes: candidate,
                    station: edge.to,
                }));
            }
        }
    }

    let total = best[destination.index()];
    if !total.is_finite() {
        trace!(%origin, %destination, "Dijkstra found no route");
        return None;
    }

    let mut path = vec![destination];
    let mut cursor = destination;
    while let Some(prev) = previous[cursor.index()] {
        path.push(prev);
        cursor = prev;
    }
    path.reverse();
    Some((path, total))
}
