//! Graph build configuration.

/// Fallback weight for edges with no usable duration, in minutes.
///
/// A placeholder meaning "unknown but traversable", not a measured
/// travel time.
pub const DEFAULT_EDGE_MINUTES: f64 = 1.0;

/// Configuration parameters for building the transit graph.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Weight given to an adjacency edge whose duration cell is missing,
    /// invalid or not strictly positive.
    pub default_edge_minutes: f64,

    /// When set and the station record list is non-empty, only those
    /// records form the station universe. Names appearing only in route,
    /// duration or fare sources are then dropped instead of becoming
    /// stations.
    pub station_list_authoritative: bool,
}

impl BuildConfig {
    pub fn new(default_edge_minutes: f64, station_list_authoritative: bool) -> Self {
        Self {
            default_edge_minutes,
            station_list_authoritative,
        }
    }

    /// The default weight, guaranteed strictly positive and finite.
    pub fn effective_default_minutes(&self) -> f64 {
        if self.default_edge_minutes.is_finite() && self.default_edge_minutes > 0.0 {
            self.default_edge_minutes
        } else {
            DEFAULT_EDGE_MINUTES
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            default_edge_minutes: DEFAULT_EDGE_MINUTES,
            station_list_authoritative: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = BuildConfig::default();
        assert_eq!(config.default_edge_minutes, 1.0);
        assert!(!config.station_list_authoritative);
    }

    #[test]
    fn non_positive_default_falls_back() {
        assert_eq!(BuildConfig::new(0.0, false).effective_default_minutes(), 1.0);
        assert_eq!(BuildConfig::new(-2.0, false).effective_default_minutes(), 1.0);
        assert_eq!(BuildConfig::new(f64::NAN, false).effective_default_minutes(), 1.0);
        assert_eq!(BuildConfig::new(2.5, true).effective_default_minutes(), 2.5);
    }
}
