//! Path finder configuration.

/// How the reported total time of a time-mode route is chosen.
///
/// The duration matrix can hold a direct end-to-end entry for a pair whose
/// best path runs through intermediate stations. That entry is always
/// reported separately as `timetable_time`; this policy only decides what
/// `total_time` says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TotalTimePolicy {
    /// `total_time` is the sum of the edge weights along the returned path.
    #[default]
    PathSum,
    /// `total_time` is the direct timetable entry when one exists,
    /// otherwise the path sum.
    PreferTimetable,
}

/// Configuration parameters for route search.
#[derive(Debug, Clone, Default)]
pub struct PlannerConfig {
    pub total_time: TotalTimePolicy,
}

impl PlannerConfig {
    pub fn new(total_time: TotalTimePolicy) -> Self {
        Self { total_time }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_path_sum() {
        let config = PlannerConfig::default();
        assert_eq!(config.total_time, TotalTimePolicy::PathSum);
    }

    #[test]
    fn custom_config() {
        let config = PlannerConfig::new(TotalTimePolicy::PreferTimetable);
        assert_eq!(config.total_time, TotalTimePolicy::PreferTimetable);
    }
}
