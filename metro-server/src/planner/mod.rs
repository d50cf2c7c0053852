//! Shortest-path search.
//!
//! Two modes share one graph: breadth-first search for the fewest stops
//! and Dijkstra for the least travel time. Interchange edges are hops like
//! any other during search; the reported stop count collapses consecutive
//! interchange variants of one physical stop.

mod bfs;
mod config;
mod dijkstra;
mod search;


pub use bfs::fewest_edges;
pub use config::{PlannerConfig, TotalTimePolicy};
pub use dijkstra::least_time;
pub use search::{PathFinder, collapsed_stop_count, segment_minutes, shortest};
