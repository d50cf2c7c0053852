//! Simulation configuration.

use std::time::Duration;

use crate::broadcast::DEFAULT_SUBSCRIBER_BUFFER;

/// Configuration parameters for simulated trains.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Shortest allowed tick. Requested ticks below this are raised to it.
    pub min_tick: Duration,

    /// Shortest segment duration derived from a path, in seconds.
    pub min_segment_secs: f64,

    /// Segment duration used when an edge has no positive weight, in seconds.
    pub default_segment_secs: f64,

    /// Speed factors below this are treated as this when scaling durations.
    pub min_speed_factor: f64,

    /// A looping train runs back the way it came rather than restarting
    /// from the origin.
    pub reverse_on_loop: bool,

    /// Buffer size of channel subscribers.
    pub subscriber_buffer: usize,
}

impl SimulationConfig {
    /// Clamp a requested tick to the configured minimum.
    pub fn effective_tick(&self, requested: Duration) -> Duration {
        requested.max(self.min_tick)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            min_tick: Duration::from_millis(200),
            min_segment_secs: 1.0,
            default_segment_secs: 8.0,
            min_speed_factor: 0.1,
            reverse_on_loop: true,
            subscriber_buffer: DEFAULT_SUBSCRIBER_BUFFER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.min_tick, Duration::from_millis(200));
        assert_eq!(config.min_segment_secs, 1.0);
        assert_eq!(config.default_segment_secs, 8.0);
        assert!(config.reverse_on_loop);
        assert_eq!(config.subscriber_buffer, 64);
    }

    #[test]
    fn tick_raised_to_minimum() {
        let config = SimulationConfig::default();
        assert_eq!(
            config.effective_tick(Duration::from_millis(50)),
            Duration::from_millis(200)
        );
        assert_eq!(
            config.effective_tick(Duration::from_secs(2)),
            Duration::from_secs(2)
        );
    }
}
