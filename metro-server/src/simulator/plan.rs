//! Validated simulation input.

use std::time::Duration;

use super::config::SimulationConfig;
use super::error::SimulationError;

/// One leg of a simulated run.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub origin: String,
    pub destination: String,
    pub duration: Duration,
}

/// A path with one duration per consecutive station pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationPlan {
    path: Vec<String>,
    durations: Vec<Duration>,
    looping: bool,
    tick: Duration,
}

impl SimulationPlan {
    /// Validate and build a plan. Durations and tick are in seconds.
    pub fn new(
        path: Vec<String>,
        durations: Vec<f64>,
        looping: bool,
        tick_secs: f64,
    ) -> Result<Self, SimulationError> {
        if path.len() < 2 {
            return Err(SimulationError::PathTooShort { len: path.len() });
        }
        if durations.len() != path.len() - 1 {
            return Err(SimulationError::DurationCount {
                expected: path.len() - 1,
                actual: durations.len(),
            });
        }
        let durations = durations
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                positive_duration(value)
                    .ok_or(SimulationError::InvalidDuration { index, value })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let tick =
            positive_duration(tick_secs).ok_or(SimulationError::InvalidTick(tick_secs))?;

        Ok(Self {
            path,
            durations,
            looping,
            tick,
        })
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn durations(&self) -> &[Duration] {
        &self.durations
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Segments in travel order, reversed when `backwards` is set.
    pub fn segments(&self, backwards: bool) -> Vec<Segment> {
        let legs = self
            .path
            .windows(2)
            .zip(&self.durations)
            .map(|(pair, &duration)| (pair[0].as_str(), pair[1].as_str(), duration));
        let segment = |(origin, destination, duration): (&str, &str, Duration)| Segment {
            origin: origin.to_string(),
            destination: destination.to_string(),
            duration,
        };

        if backwards {
            legs.rev()
                .map(|(a, b, d)| segment((b, a, d)))
                .collect()
        } else {
            legs.map(segment).collect()
        }
    }
}

/// Seconds as a `Duration`, if strictly positive and representable.
fn positive_duration(secs: f64) -> Option<Duration> {
    if secs > 0.0 {
        Duration::try_from_secs_f64(secs).ok()
    } else {
        None
    }
}

/// Reject speed factors that are not strictly positive.
pub fn check_speed(speed: f64) -> Result<f64, SimulationError> {
    if speed.is_finite() && speed > 0.0 {
        Ok(speed)
    } else {
        Err(SimulationError::InvalidSpeed(speed))
    }
}

/// Convert per-edge minutes into simulated seconds.
///
/// Each known positive weight becomes `minutes * 60 / speed`, floored at
/// the configured minimum. Missing or zero weights (interchanges) take the
/// configured default.
pub fn segment_seconds(
    minutes: &[Option<f64>],
    speed: f64,
    config: &SimulationConfig,
) -> Result<Vec<f64>, SimulationError> {
    let divisor = check_speed(speed)?.max(config.min_speed_factor);

    Ok(minutes
        .iter()
        .map(|m| match m {
            Some(m) if m.is_finite() && *m > 0.0 => {
                (m * 60.0 / divisor).max(config.min_segment_secs)
            }
            _ => config.default_segment_secs,
        })
        .collect())
}
