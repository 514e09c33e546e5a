use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{dust_codes, Observation, SkyLayer};

/// Heatmap weight used when visibility says nothing stronger.
pub const BASE_INTENSITY: f64 = 0.6;

/// One heatmap / marker point. Field names follow the upstream columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub station: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub valid: OffsetDateTime,
    pub wxcodes: Option<String>,
    pub tmpf: Option<f64>,
    pub dwpf: Option<f64>,
    pub sknt: Option<f64>,
    pub drct: Option<f64>,
    pub vsby: Option<f64>,
    pub alti: Option<f64>,
    pub sky: Vec<SkyLayer>,
    pub metar: Option<String>,
    pub intensity: f64,
}

impl From<&Observation> for MapPoint {
    fn from(obs: &Observation) -> Self {
        MapPoint {
            station: obs.station.clone(),
            lat: obs.latitude,
            lon: obs.longitude,
            valid: obs.valid,
            wxcodes: obs.wx_codes.clone(),
            tmpf: obs.temperature_f,
            dwpf: obs.dew_point_f,
            sknt: obs.wind_speed_kt,
            drct: obs.wind_direction,
            vsby: obs.visibility_mi,
            alti: obs.altimeter,
            sky: obs.sky.clone(),
            metar: obs.metar.clone(),
            intensity: intensity(obs.wx_codes.as_deref(), obs.visibility_mi),
        }
    }
}

/// Heatmap weight in `[0, 1]`: lower visibility weighs more, and a duststorm or
/// sandstorm always weighs 1.0. Missing visibility leaves the base weight.
pub fn intensity(wx_codes: Option<&str>, visibility_mi: Option<f64>) -> f64 {
    let mut weight = BASE_INTENSITY;
    if let Some(visibility) = visibility_mi {
        if visibility < 1.0 {
            weight = 1.0;
        } else if visibility < 3.0 {
            weight = 0.8;
        } else if visibility < 5.0 {
            weight = 0.6;
        }
    }

    if wx_codes.is_some_and(|wx| dust_codes(wx).any(|code| code.is_severe())) {
        weight = 1.0;
    }
    weight
}

pub fn to_map_points(observations: &[Observation]) -> Vec<MapPoint> {
    observations.iter().map(MapPoint::from).collect()
}
