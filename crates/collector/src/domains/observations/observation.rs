use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime};

use crate::{is_dust, ParseError};

/// Raw row of the mesonet `asos.py` comma-separated output. Every field is kept as
/// text so that the missing-value sentinels can be told apart from real values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MesonetRow {
    pub station: Option<String>,
    pub valid: Option<String>,
    pub lon: Option<String>,
    pub lat: Option<String>,
    pub tmpf: Option<String>,
    pub dwpf: Option<String>,
    pub relh: Option<String>,
    pub drct: Option<String>,
    pub sknt: Option<String>,
    pub gust: Option<String>,
    pub alti: Option<String>,
    pub mslp: Option<String>,
    pub vsby: Option<String>,
    pub skyc1: Option<String>,
    pub skyc2: Option<String>,
    pub skyc3: Option<String>,
    pub skyc4: Option<String>,
    pub skyl1: Option<String>,
    pub skyl2: Option<String>,
    pub skyl3: Option<String>,
    pub skyl4: Option<String>,
    pub wxcodes: Option<String>,
    pub metar: Option<String>,
}

/// One cloud layer: coverage code (FEW, SCT, BKN, OVC, ...) and base height in feet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkyLayer {
    pub cover: String,
    pub base_ft: Option<f64>,
}

/// A single METAR surface report. Serialized with the upstream column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub station: String,
    #[serde(with = "time::serde::rfc3339")]
    pub valid: OffsetDateTime,
    #[serde(rename = "lat")]
    pub latitude: Option<f64>,
    #[serde(rename = "lon")]
    pub longitude: Option<f64>,
    #[serde(rename = "tmpf")]
    pub temperature_f: Option<f64>,
    #[serde(rename = "dwpf")]
    pub dew_point_f: Option<f64>,
    #[serde(rename = "relh")]
    pub relative_humidity: Option<f64>,
    #[serde(rename = "drct")]
    pub wind_direction: Option<f64>,
    #[serde(rename = "sknt")]
    pub wind_speed_kt: Option<f64>,
    #[serde(rename = "gust")]
    pub wind_gust_kt: Option<f64>,
    #[serde(rename = "vsby")]
    pub visibility_mi: Option<f64>,
    #[serde(rename = "alti")]
    pub altimeter: Option<f64>,
    #[serde(rename = "mslp")]
    pub sea_level_pressure: Option<f64>,
    pub sky: Vec<SkyLayer>,
    #[serde(rename = "wxcodes")]
    pub wx_codes: Option<String>,
    pub metar: Option<String>,
}

impl Observation {
    /// True when the phenomenon string carries at least one tracked dust/sand code.
    pub fn is_dust(&self) -> bool {
        is_dust(self.wx_codes.as_deref())
    }

    /// Calm: zero speed and zero direction reported together.
    pub fn is_calm(&self) -> bool {
        self.wind_speed_kt == Some(0.0) && self.wind_direction == Some(0.0)
    }
}

impl TryFrom<MesonetRow> for Observation {
    type Error = ParseError;
    fn try_from(val: MesonetRow) -> Result<Self, Self::Error> {
        let station = present(val.station).ok_or(ParseError::MissingValue("station"))?;
        let valid = present(val.valid).ok_or(ParseError::MissingValue("valid"))?;

        let sky = [
            (val.skyc1, val.skyl1),
            (val.skyc2, val.skyl2),
            (val.skyc3, val.skyl3),
            (val.skyc4, val.skyl4),
        ]
        .into_iter()
        .filter_map(|(cover, base)| {
            present(cover).map(|cover| SkyLayer {
                cover,
                base_ft: number(base),
            })
        })
        .collect();

        Ok(Observation {
            station,
            valid: parse_valid(&valid)?,
            latitude: number(val.lat),
            longitude: number(val.lon),
            temperature_f: number(val.tmpf),
            dew_point_f: number(val.dwpf),
            relative_humidity: number(val.relh),
            wind_direction: number(val.drct),
            wind_speed_kt: number(val.sknt),
            wind_gust_kt: number(val.gust),
            visibility_mi: number(val.vsby),
            altimeter: number(val.alti),
            sea_level_pressure: number(val.mslp),
            sky,
            wx_codes: present(val.wxcodes),
            metar: present(val.metar),
        })
    }
}

/// Strip the upstream missing-value sentinels (`null`, `M`, empty).
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != "null" && v != "M")
}

// unparseable numbers (including trace "T") read as missing
fn number(value: Option<String>) -> Option<f64> {
    present(value)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Parse the `valid` column, `YYYY-MM-DD HH:MM` in UTC, falling back to RFC 3339.
pub fn parse_valid(value: &str) -> Result<OffsetDateTime, ParseError> {
    let mesonet_format = format_description!("[year]-[month]-[day] [hour]:[minute]");
    match time::PrimitiveDateTime::parse(value, mesonet_format) {
        Ok(parsed) => Ok(parsed.assume_utc()),
        Err(_) => {
            OffsetDateTime::parse(value, &Rfc3339).map_err(|source| ParseError::Timestamp {
                value: value.to_string(),
                source,
            })
        }
    }
}
