use time::{macros::datetime, OffsetDateTime};

use crate::Observation;

pub fn observation(station: &str, wx_codes: &str) -> Observation {
    Observation {
        station: station.to_string(),
        valid: datetime!(2025-03-14 09:00 UTC),
        latitude: None,
        longitude: None,
        temperature_f: None,
        dew_point_f: None,
        relative_humidity: None,
        wind_direction: None,
        wind_speed_kt: None,
        wind_gust_kt: None,
        visibility_mi: None,
        altimeter: None,
        sea_level_pressure: None,
        sky: vec![],
        wx_codes: Some(wx_codes.to_string()).filter(|wx| !wx.is_empty()),
        metar: None,
    }
}

pub fn windy(station: &str, wx_codes: &str, direction: f64, speed: f64) -> Observation {
    Observation {
        wind_direction: Some(direction),
        wind_speed_kt: Some(speed),
        ..observation(station, wx_codes)
    }
}

pub fn at(station: &str, wx_codes: &str, valid: OffsetDateTime) -> Observation {
    Observation {
        valid,
        ..observation(station, wx_codes)
    }
}
