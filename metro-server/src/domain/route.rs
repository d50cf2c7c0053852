//! Route search modes and results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::StationId;

/// Error returned when a search mode string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("mode must be 'stops' or 'time', got '{0}'")]
pub struct InvalidSearchMode(pub String);

/// What a shortest-path search minimises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Fewest edges (breadth-first).
    Stops,
    /// Least cumulative travel time (Dijkstra).
    Time,
}

impl SearchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchMode::Stops => "stops",
            SearchMode::Time => "time",
        }
    }
}

impl FromStr for SearchMode {
    type Err = InvalidSearchMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stops" => Ok(SearchMode::Stops),
            "time" => Ok(SearchMode::Time),
            _ => Err(InvalidSearchMode(s.to_string())),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A computed route between two stations.
///
/// Ephemeral: built per request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    /// Stations from origin to destination inclusive.
    pub station_ids: Vec<StationId>,

    /// Display names parallel to `station_ids`.
    pub station_names: Vec<String>,

    /// Physical stops travelled, with consecutive interchange variants
    /// collapsed into one.
    pub total_stops: usize,

    /// Travel time in minutes (time mode, or zero for a self path).
    pub total_time: Option<f64>,

    /// Direct origin→destination timetable entry, when the duration matrix has one.
    pub timetable_time: Option<f64>,
}

impl PathResult {
    /// Number of edges in the raw path.
    pub fn edge_count(&self) -> usize {
        self.station_ids.len().saturating_sub(1)
    }

    pub fn origin(&self) -> Option<StationId> {
        self.station_ids.first().copied()
    }

    pub fn destination(&self) -> Option<StationId> {
        self.station_ids.last().copied()
    }
}
