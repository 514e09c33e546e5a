use serde::{Deserialize, Serialize};

use crate::Observation;

pub const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Upper bounds (exclusive, knots) of every speed bin but the last.
pub const SPEED_THRESHOLDS: [f64; 6] = [2.0, 5.0, 7.0, 10.0, 15.0, 20.0];

pub const SPEED_BIN_LABELS: [&str; 7] = ["< 2", "2-5", "5-7", "7-10", "10-15", "15-20", "> 20"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindRoseBin {
    pub label: String,
    /// One count per compass point, in [`COMPASS_POINTS`] order.
    pub counts: [u32; 16],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindRose {
    pub directions: Vec<String>,
    pub bins: Vec<WindRoseBin>,
    pub total: u32,
}

impl Default for WindRose {
    fn default() -> Self {
        WindRose {
            directions: COMPASS_POINTS.iter().map(|d| d.to_string()).collect(),
            bins: SPEED_BIN_LABELS
                .iter()
                .map(|label| WindRoseBin {
                    label: label.to_string(),
                    counts: [0; 16],
                })
                .collect(),
            total: 0,
        }
    }
}

impl WindRose {
    pub fn cell(&self, speed_bin: usize, direction: usize) -> u32 {
        self.bins[speed_bin].counts[direction]
    }
}

/// Nearest of the 16 compass points; 360 wraps to north.
pub fn direction_index(degrees: f64) -> usize {
    (degrees / 22.5).round().rem_euclid(16.0) as usize
}

pub fn compass_label(degrees: f64) -> &'static str {
    COMPASS_POINTS[direction_index(degrees)]
}

pub fn speed_bin(knots: f64) -> usize {
    SPEED_THRESHOLDS
        .iter()
        .position(|threshold| knots < *threshold)
        .unwrap_or(SPEED_THRESHOLDS.len())
}

/// 7 x 16 speed/direction frequency grid. Calm reports and reports missing
/// either wind field are left out.
pub fn to_wind_rose(observations: &[Observation]) -> WindRose {
    let mut rose = WindRose::default();
    for obs in observations {
        if obs.is_calm() {
            continue;
        }
        let (Some(direction), Some(speed)) = (obs.wind_direction, obs.wind_speed_kt) else {
            continue;
        };
        rose.bins[speed_bin(speed)].counts[direction_index(direction)] += 1;
        rose.total += 1;
    }
    rose
}
