use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use time::{Date, OffsetDateTime};

use crate::{
    compass, fahrenheit_to_celsius, knots_to_kmh, miles_to_meters, primary_phenomenon, Country,
    DustCode, Observation,
};

/// One row of the per-country table: a count for every code, plus their sum.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRow {
    pub country: Country,
    #[serde(flatten)]
    pub counts: BTreeMap<DustCode, usize>,
    pub total: usize,
}

impl CountryRow {
    fn empty(country: Country) -> Self {
        CountryRow {
            country,
            counts: DustCode::ALL.into_iter().map(|code| (code, 0)).collect(),
            total: 0,
        }
    }

    fn record(&mut self, code: DustCode) {
        *self.counts.entry(code).or_default() += 1;
        self.total += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationDetail {
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
    pub temp_c: Option<i64>,
    pub dew_c: Option<i64>,
    pub wind_kt: f64,
    pub wind_kmh: i64,
    pub wind_dir: Option<f64>,
    pub wind_dir_compass: String,
    pub vis_miles: Option<f64>,
    pub vis_meters: Option<i64>,
    pub wxcodes: String,
    pub metar: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub phenomenon: Option<DustCode>,
}

impl From<&Observation> for ObservationDetail {
    fn from(obs: &Observation) -> Self {
        let wind_kt = obs.wind_speed_kt.unwrap_or(0.0);
        ObservationDetail {
            time: obs.valid,
            temp_c: obs.temperature_f.map(fahrenheit_to_celsius),
            dew_c: obs.dew_point_f.map(fahrenheit_to_celsius),
            wind_kt,
            wind_kmh: knots_to_kmh(wind_kt),
            wind_dir: obs.wind_direction,
            wind_dir_compass: compass(obs.wind_direction),
            vis_miles: obs.visibility_mi,
            vis_meters: obs.visibility_mi.map(miles_to_meters),
            wxcodes: obs.wx_codes.clone().unwrap_or_default(),
            metar: obs.metar.clone().unwrap_or_default(),
            lat: obs.latitude,
            lon: obs.longitude,
            phenomenon: primary_phenomenon(obs.wx_codes.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationReport {
    pub station: String,
    pub country: Option<Country>,
    /// Ascending by time.
    pub observations: Vec<ObservationDetail>,
    /// Distinct phenomenon strings reported during the day.
    pub wxcodes: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTotals {
    pub primary_country: Country,
    pub primary: usize,
    pub region: usize,
    pub by_phenomenon: BTreeMap<DustCode, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub date: String,
    pub summary_table: Vec<CountryRow>,
    pub totals: ReportTotals,
    pub stations_by_country: BTreeMap<Country, Vec<StationReport>>,
    pub unassigned_stations: Vec<StationReport>,
    pub phenomena_labels: BTreeMap<DustCode, &'static str>,
}

impl DailyReport {
    pub fn row(&self, country: Country) -> Option<&CountryRow> {
        self.summary_table.iter().find(|row| row.country == country)
    }
}

/// Builds the one-day regional report, singling out one country in the totals.
#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder {
    primary: Country,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        ReportBuilder {
            primary: Country::SaudiArabia,
        }
    }
}

impl ReportBuilder {
    pub fn new(primary: Country) -> Self {
        Self { primary }
    }

    pub fn primary(&self) -> Country {
        self.primary
    }

    pub fn build(&self, date: Date, observations: &[Observation]) -> DailyReport {
        let mut rows: Vec<CountryRow> = Country::ALL.into_iter().map(CountryRow::empty).collect();
        let mut stations: BTreeMap<String, StationReport> = BTreeMap::new();

        for obs in observations {
            let country = Country::from_station(&obs.station);
            if let (Some(country), Some(code)) =
                (country, primary_phenomenon(obs.wx_codes.as_deref()))
            {
                // rows are indexed in the same order as Country::ALL
                rows[country as usize].record(code);
            }

            let station = stations
                .entry(obs.station.clone())
                .or_insert_with(|| StationReport {
                    station: obs.station.clone(),
                    country,
                    observations: vec![],
                    wxcodes: BTreeSet::new(),
                });
            station.observations.push(ObservationDetail::from(obs));
            if let Some(wx) = &obs.wx_codes {
                station.wxcodes.insert(wx.clone());
            }
        }

        let mut stations_by_country: BTreeMap<Country, Vec<StationReport>> = BTreeMap::new();
        let mut unassigned_stations = vec![];
        for mut station in stations.into_values() {
            station.observations.sort_by_key(|detail| detail.time);
            match station.country {
                Some(country) => stations_by_country.entry(country).or_default().push(station),
                None => unassigned_stations.push(station),
            }
        }

        DailyReport {
            date: date.to_string(),
            totals: self.totals(&rows),
            summary_table: rows,
            stations_by_country,
            unassigned_stations,
            phenomena_labels: DustCode::ALL
                .into_iter()
                .map(|code| (code, code.label()))
                .collect(),
        }
    }

    fn totals(&self, rows: &[CountryRow]) -> ReportTotals {
        let mut by_phenomenon: BTreeMap<DustCode, usize> =
            DustCode::ALL.into_iter().map(|code| (code, 0)).collect();
        for row in rows {
            for (code, count) in &row.counts {
                *by_phenomenon.entry(*code).or_default() += count;
            }
        }

        let (primary, region) = rows.iter().fold((0, 0), |(primary, region), row| {
            if row.country == self.primary {
                (primary + row.total, region)
            } else {
                (primary, region + row.total)
            }
        });

        ReportTotals {
            primary_country: self.primary,
            primary,
            region,
            by_phenomenon,
        }
    }
}
