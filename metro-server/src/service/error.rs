//! Service error types.

use crate::simulator::SimulationError;

/// Failures surfaced to the request layer.
///
/// Unknown stations and unreachable destinations are kept apart so callers
/// can tell "no such station" from "no way there".
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    /// A name or id matched no station
    #[error("station not found: {0}")]
    UnknownStation(String),

    /// Both stations exist but no path connects them
    #[error("route not found from {origin} to {destination}")]
    RouteNotFound { origin: String, destination: String },

    /// No fare entry for the pair
    #[error("fare not found from {origin} to {destination}")]
    FareNotFound { origin: String, destination: String },

    /// Simulation parameters rejected before starting
    #[error("invalid simulation: {0}")]
    InvalidSimulation(#[from] SimulationError),
}
