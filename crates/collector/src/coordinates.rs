use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::Observation;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Stations whose upstream metadata is missing or wrong. These positions win
/// over whatever the archive reports.
pub const KNOWN_STATION_COORDINATES: [(&str, Coordinates); 10] = [
    ("OERS", Coordinates { lat: 25.6283, lon: 37.0889 }),
    ("OEMN", Coordinates { lat: 21.4133, lon: 39.8933 }),
    ("OEAR", Coordinates { lat: 21.3547, lon: 39.9839 }),
    ("OEAB", Coordinates { lat: 18.2404, lon: 42.6566 }),
    ("OEAH", Coordinates { lat: 25.2853, lon: 49.4852 }),
    ("OEBA", Coordinates { lat: 20.2961, lon: 41.6343 }),
    ("OEGS", Coordinates { lat: 26.3028, lon: 43.7744 }),
    ("OEPA", Coordinates { lat: 28.3352, lon: 46.1250 }),
    ("OESK", Coordinates { lat: 29.7851, lon: 40.1000 }),
    ("OEWJ", Coordinates { lat: 26.1986, lon: 36.4764 }),
];

#[derive(Debug, Clone)]
pub struct CoordinatePatcher {
    table: HashMap<String, Coordinates>,
}

impl Default for CoordinatePatcher {
    fn default() -> Self {
        CoordinatePatcher::new(
            KNOWN_STATION_COORDINATES
                .iter()
                .map(|(station, coords)| (station.to_string(), *coords))
                .collect(),
        )
    }
}

impl CoordinatePatcher {
    pub fn new(table: HashMap<String, Coordinates>) -> Self {
        Self { table }
    }

    /// Add or replace entries, e.g. from the `[coordinates]` config table.
    pub fn with_overrides(mut self, overrides: HashMap<String, Coordinates>) -> Self {
        self.table.extend(overrides);
        self
    }

    pub fn lookup(&self, station: &str) -> Option<Coordinates> {
        self.table.get(station).copied()
    }

    /// Overwrite the observation's position when its station is listed.
    /// Returns whether anything was patched.
    pub fn patch(&self, observation: &mut Observation) -> bool {
        match self.lookup(&observation.station) {
            Some(coords) => {
                observation.latitude = Some(coords.lat);
                observation.longitude = Some(coords.lon);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::observation;

    fn located(station: &str, lat: Option<f64>, lon: Option<f64>) -> Observation {
        Observation {
            latitude: lat,
            longitude: lon,
            ..observation(station, "DU")
        }
    }

    #[test]
    fn fills_missing_coordinates() {
        let patcher = CoordinatePatcher::default();
        let mut obs = located("OEMN", None, None);
        assert!(patcher.patch(&mut obs));
        assert_eq!(obs.latitude, Some(21.4133));
        assert_eq!(obs.longitude, Some(39.8933));
    }

    #[test]
    fn table_overrides_upstream_values() {
        let patcher = CoordinatePatcher::default();
        let mut obs = located("OERS", Some(1.0), Some(2.0));
        patcher.patch(&mut obs);
        assert_eq!(obs.latitude, Some(25.6283));
        assert_eq!(obs.longitude, Some(37.0889));
    }

    #[test]
    fn unlisted_station_is_untouched() {
        let patcher = CoordinatePatcher::default();
        let mut obs = located("OKBK", Some(29.22), None);
        assert!(!patcher.patch(&mut obs));
        assert_eq!(obs.latitude, Some(29.22));
        assert_eq!(obs.longitude, None);
    }

    #[test]
    fn overrides_extend_the_builtin_table() {
        let extra = HashMap::from([(
            String::from("OKBK"),
            Coordinates {
                lat: 29.2266,
                lon: 47.9689,
            },
        )]);
        let patcher = CoordinatePatcher::default().with_overrides(extra);
        assert_eq!(patcher.len(), KNOWN_STATION_COORDINATES.len() + 1);
        assert_eq!(patcher.lookup("OKBK").map(|c| c.lat), Some(29.2266));
    }
}
