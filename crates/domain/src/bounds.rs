//! Objective and time bounds of runs and instances.

use crate::identifiers::ConfigurationId;
use serde::{Deserialize, Serialize};

/// Extremes of a single non-empty run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunBounds {
    /// Configuration that produced the run
    pub configuration: ConfigurationId,
    /// Largest objective value reported
    pub upper: f64,
    /// Smallest objective value reported
    pub lower: f64,
    /// Best objective value for the instance direction
    pub best: f64,
    /// Worst objective value for the instance direction
    pub worst: f64,
    /// Time of the first solution
    pub first_time: f64,
    /// Time of the last solution
    pub last_time: f64,
}

/// Global bounds of one instance across every contributing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceBounds {
    /// Maximum of every run's upper bound
    pub upper: f64,
    /// Minimum of every run's lower bound
    pub lower: f64,
    /// Best of every run's best value
    pub best: f64,
    /// Worst of every run's worst value
    pub worst: f64,
    /// Earliest first-solution time
    pub time_min: f64,
    /// Latest last-solution time, raised to the run time limit when known
    pub time_max: f64,
}

impl InstanceBounds {
    /// Height of the bounding box
    pub fn objective_range(&self) -> f64 {
        self.upper - self.lower
    }

    /// Width of the bounding box
    pub fn time_window(&self) -> f64 {
        self.time_max - self.time_min
    }

    /// Bounding box area, `None` when the box is degenerate
    pub fn area(&self) -> Option<f64> {
        let range = self.objective_range();
        let window = self.time_window();
        (range > 0.0 && window > 0.0).then(|| range * window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(upper: f64, lower: f64, time_min: f64, time_max: f64) -> InstanceBounds {
        InstanceBounds {
            upper,
            lower,
            best: lower,
            worst: upper,
            time_min,
            time_max,
        }
    }

    #[test]
    fn test_area() {
        assert_eq!(bounds(10.0, 4.0, 1.0, 3.0).area(), Some(12.0));
    }

    #[test]
    fn test_degenerate_area() {
        assert_eq!(bounds(4.0, 4.0, 1.0, 3.0).area(), None);
        assert_eq!(bounds(10.0, 4.0, 2.0, 2.0).area(), None);
    }
}
