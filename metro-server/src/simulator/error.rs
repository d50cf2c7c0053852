//! Simulation parameter errors.

/// A simulation request rejected before any background work starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("path must contain at least two stations, got {len}")]
    PathTooShort { len: usize },

    #[error("expected {expected} segment durations, got {actual}")]
    DurationCount { expected: usize, actual: usize },

    #[error("segment {index} has invalid duration {value}")]
    InvalidDuration { index: usize, value: f64 },

    #[error("tick interval must be positive, got {0}")]
    InvalidTick(f64),

    #[error("speed factor must be positive, got {0}")]
    InvalidSpeed(f64),
}

impl SimulationError {
    /// Stable machine-readable code.
    pub fn reason(&self) -> &'static str {
        match self {
            SimulationError::PathTooShort { .. } => "path_too_short",
            SimulationError::DurationCount { .. } => "duration_count_mismatch",
            SimulationError::InvalidDuration { .. } => "invalid_duration",
            SimulationError::InvalidTick(_) => "invalid_tick",
            SimulationError::InvalidSpeed(_) => "invalid_speed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_codes() {
        assert_eq!(SimulationError::PathTooShort { len: 1 }.reason(), "path_too_short");
        assert_eq!(
            SimulationError::DurationCount {
                expected: 2,
                actual: 1
            }
            .reason(),
            "duration_count_mismatch"
        );
        assert_eq!(SimulationError::InvalidSpeed(0.0).reason(), "invalid_speed");
    }

    #[test]
    fn display() {
        let err = SimulationError::DurationCount {
            expected: 2,
            actual: 3,
        };
        assert_eq!(err.to_string(), "expected 2 segment durations, got 3");
    }
}
