//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{PathResult, SearchMode, Station, StationId};
use crate::network::BuildReport;
use crate::service::{Neighbor, SimulationStarted, StartSimulation};

use super::error::AppError;

/// Default and maximum number of station search results.
pub const DEFAULT_SEARCH_LIMIT: usize = 20;
pub const MAX_SEARCH_LIMIT: usize = 100;

/// Parse an optional mode parameter.
pub fn parse_mode(raw: Option<&str>, default: SearchMode) -> Result<SearchMode, AppError> {
    match raw.map(str::trim).filter(|m| !m.is_empty()) {
        Some(m) => Ok(m.parse()?),
        None => Ok(default),
    }
}

/// `from` / `to` query parameters, as ids or names depending on the route.
#[derive(Debug, Default, Deserialize)]
pub struct PairQuery {
    pub from: Option<String>,
    pub to: Option<String>,

    /// `stops` or `time`
    pub mode: Option<String>,
}

impl PairQuery {
    /// Both names, trimmed and non-empty.
    pub fn names(&self) -> Result<(&str, &str), AppError> {
        let from = self.from.as_deref().map(str::trim).unwrap_or_default();
        let to = self.to.as_deref().map(str::trim).unwrap_or_default();
        if from.is_empty() || to.is_empty() {
            return Err(AppError::bad_request(
                "missing query: from & to (station names)",
            ));
        }
        Ok((from, to))
    }

    /// Both station ids.
    pub fn ids(&self) -> Result<(StationId, StationId), AppError> {
        let parse = |raw: Option<&str>| raw.and_then(|s| s.parse::<StationId>().ok());
        match (parse(self.from.as_deref()), parse(self.to.as_deref())) {
            (Some(from), Some(to)) => Ok((from, to)),
            _ => Err(AppError::bad_request("missing query: from & to (int)")),
        }
    }

    pub fn mode(&self, default: SearchMode) -> Result<SearchMode, AppError> {
        parse_mode(self.mode.as_deref(), default)
    }
}

/// Station search query.
#[derive(Debug, Deserialize)]
pub struct SearchStationQuery {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

/// Neighbour inspection query.
#[derive(Debug, Deserialize)]
pub struct NeighborsQuery {
    pub name: Option<String>,
}

/// Body of `POST /simulate_train`.
#[derive(Debug, Default, Deserialize)]
pub struct SimulateTrainRequest {
    pub train_id: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub mode: Option<String>,

    /// Speed multiplier; 1 is real time
    pub speed: Option<f64>,

    /// Run back and forth until stopped
    #[serde(rename = "loop")]
    pub looping: Option<bool>,

    /// Seconds between progress broadcasts
    pub ping_interval: Option<f64>,
}

impl SimulateTrainRequest {
    /// Build the service request once station names are resolved.
    pub fn to_start(
        &self,
        origin: StationId,
        destination: StationId,
    ) -> Result<StartSimulation, AppError> {
        Ok(StartSimulation {
            train_id: self.train_id.clone(),
            origin,
            destination,
            mode: parse_mode(self.mode.as_deref(), SearchMode::Time)?,
            speed_factor: self.speed.unwrap_or(1.0),
            looping: self.looping.unwrap_or(true),
            tick_interval: self.ping_interval.unwrap_or(1.0),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub count: usize,
    pub data: Vec<Station>,
}

#[derive(Debug, Serialize)]
pub struct SearchStationResponse {
    pub results: Vec<Station>,
}

#[derive(Debug, Serialize)]
pub struct FareResponse {
    pub from_id: StationId,
    pub to_id: StationId,
    pub from: String,
    pub to: String,
    pub price: f64,
}

/// A found route.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub from_id: StationId,
    pub to_id: StationId,
    pub from: String,
    pub to: String,
    pub mode: SearchMode,
    pub path_ids: Vec<StationId>,
    pub path_names: Vec<String>,
    pub total_stops: usize,
    pub total_time: Option<f64>,
    pub timetable_time: Option<f64>,
}

impl RouteResponse {
    pub fn from_result(result: &PathResult, mode: SearchMode) -> Self {
        let first = |v: &[String]| v.first().cloned().unwrap_or_default();
        let last = |v: &[String]| v.last().cloned().unwrap_or_default();
        Self {
            from_id: result.origin().unwrap_or(StationId::new(0)),
            to_id: result.destination().unwrap_or(StationId::new(0)),
            from: first(&result.station_names),
            to: last(&result.station_names),
            mode,
            path_ids: result.station_ids.clone(),
            path_names: result.station_names.clone(),
            total_stops: result.total_stops,
            total_time: result.total_time,
            timetable_time: result.timetable_time,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NeighborsResponse {
    pub station: String,
    pub neighbors: Vec<Neighbor>,
}

#[derive(Debug, Serialize)]
pub struct SimulateTrainResponse {
    pub ok: bool,
    pub train_id: String,
    pub path: Vec<String>,
    pub per_edge_seconds: Vec<f64>,
}

impl From<SimulationStarted> for SimulateTrainResponse {
    fn from(started: SimulationStarted) -> Self {
        Self {
            ok: true,
            train_id: started.train_id,
            path: started.path,
            per_edge_seconds: started.per_edge_seconds,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrainsResponse {
    pub trains: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StopTrainResponse {
    pub ok: bool,
    pub train_id: String,
}

/// Summary of a rebuilt network.
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub ok: bool,
    pub stations: usize,
    pub track_edges: usize,
    pub interchange_edges: usize,
    pub timetable_entries: usize,
    pub fares: usize,
}

impl From<BuildReport> for ReloadResponse {
    fn from(report: BuildReport) -> Self {
        Self {
            ok: true,
            stations: report.stations,
            track_edges: report.track_edges,
            interchange_edges: report.interchange_edges,
            timetable_entries: report.timetable_entries,
            fares: report.fares,
        }
    }
}

/// Error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
