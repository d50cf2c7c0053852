//! Request and result types for the service facade.

use serde::Serialize;

use crate::cache::CacheConfig;
use crate::domain::{SearchMode, StationId};
use crate::network::{BuildConfig, EdgeKind};
use crate::planner::PlannerConfig;
use crate::simulator::SimulationConfig;

/// Configuration for every component the service owns.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub build: BuildConfig,
    pub planner: PlannerConfig,
    pub cache: CacheConfig,
    pub simulation: SimulationConfig,
}

/// Parameters for starting a simulated train.
#[derive(Debug, Clone, PartialEq)]
pub struct StartSimulation {
    /// Generated from the current time when absent.
    pub train_id: Option<String>,
    pub origin: StationId,
    pub destination: StationId,
    pub mode: SearchMode,
    /// 1.0 is real time; larger is faster.
    pub speed_factor: f64,
    pub looping: bool,
    /// Seconds between progress events.
    pub tick_interval: f64,
}

impl StartSimulation {
    pub fn new(origin: StationId, destination: StationId) -> Self {
        Self {
            train_id: None,
            origin,
            destination,
            mode: SearchMode::Time,
            speed_factor: 1.0,
            looping: true,
            tick_interval: 1.0,
        }
    }
}

/// A started simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationStarted {
    pub train_id: String,
    pub path: Vec<String>,
    pub per_edge_seconds: Vec<f64>,
    /// Whether a train with the same id was replaced.
    pub replaced: bool,
}

/// Travel time of one segment of a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentTime {
    pub from: String,
    pub to: String,
    /// `None` when neither direction has an edge.
    pub travel_time_min: Option<f64>,
}

/// A route broken into its segments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSegments {
    pub path: Vec<String>,
    pub segments: Vec<SegmentTime>,
}

/// An out-edge of a station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor {
    pub station_id: StationId,
    pub neighbor: String,
    pub travel_time_min: f64,
    pub kind: EdgeKind,
}
