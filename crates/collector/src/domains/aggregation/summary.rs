use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

use crate::{dust_codes, DustCode, Observation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationSummary {
    pub name: String,
    pub count: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub last_event: OffsetDateTime,
    pub max_wind: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_events: usize,
    /// Per code token, so one report carrying two codes counts twice.
    pub by_type: BTreeMap<DustCode, usize>,
    pub by_station: BTreeMap<String, StationSummary>,
    pub latest_event: Option<Observation>,
}

/// Single pass over the set keeping only running counts and extrema.
pub fn to_summary(observations: &[Observation]) -> Summary {
    let mut summary = Summary {
        total_events: observations.len(),
        ..Default::default()
    };

    for obs in observations {
        if let Some(wx) = obs.wx_codes.as_deref() {
            for code in dust_codes(wx) {
                *summary.by_type.entry(code).or_default() += 1;
            }
        }

        let station = summary
            .by_station
            .entry(obs.station.clone())
            .or_insert_with(|| StationSummary {
                name: obs.station.clone(),
                count: 0,
                last_event: obs.valid,
                max_wind: 0.0,
            });
        station.count += 1;
        station.last_event = station.last_event.max(obs.valid);
        if let Some(wind) = obs.wind_speed_kt {
            station.max_wind = station.max_wind.max(wind);
        }

        let newer = summary
            .latest_event
            .as_ref()
            .is_none_or(|latest| obs.valid > latest.valid);
        if newer {
            summary.latest_event = Some(obs.clone());
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{at, observation};
    use time::macros::datetime;

    #[test]
    fn empty_set_is_an_empty_summary() {
        let summary = to_summary(&[]);
        assert_eq!(summary.total_events, 0);
        assert!(summary.by_type.is_empty());
        assert!(summary.latest_event.is_none());
    }

    #[test]
    fn counts_code_tokens_not_observations() {
        let set = vec![
            observation("OERK", "BLSA DU"),
            observation("OERK", "+DU"),
            observation("OKBK", "-SA HZ"),
        ];
        let summary = to_summary(&set);
        assert_eq!(summary.total_events, 3);
        assert_eq!(summary.by_type.get(&DustCode::Dust), Some(&2));
        assert_eq!(summary.by_type.get(&DustCode::BlowingSand), Some(&1));
        assert_eq!(summary.by_type.get(&DustCode::Sand), Some(&1));
        assert_eq!(summary.by_type.values().sum::<usize>(), 4);
    }

    #[test]
    fn tracks_station_extrema() {
        let mut early = at("OERK", "DU", datetime!(2025-03-14 06:00 UTC));
        early.wind_speed_kt = Some(25.0);
        let mut late = at("OERK", "DU", datetime!(2025-03-14 12:00 UTC));
        late.wind_speed_kt = Some(10.0);
        let calm_unknown = at("OERK", "DU", datetime!(2025-03-14 09:00 UTC));

        let summary = to_summary(&[late, early, calm_unknown]);
        let station = &summary.by_station["OERK"];
        assert_eq!(station.name, "OERK");
        assert_eq!(station.count, 3);
        assert_eq!(station.max_wind, 25.0);
        assert_eq!(station.last_event, datetime!(2025-03-14 12:00 UTC));
    }

    #[test]
    fn latest_event_keeps_first_seen_on_ties() {
        let first = at("OERK", "DU", datetime!(2025-03-14 12:00 UTC));
        let tie = at("OKBK", "SA", datetime!(2025-03-14 12:00 UTC));
        let older = at("OEJN", "PO", datetime!(2025-03-14 11:00 UTC));

        let summary = to_summary(&[older, first, tie]);
        assert_eq!(summary.latest_event.map(|obs| obs.station), Some(String::from("OERK")));
    }

    #[test]
    fn serializes_code_keys_and_camel_case() {
        let summary = to_summary(&[observation("OERK", "+BLDU")]);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totalEvents"], 1);
        assert_eq!(json["byType"]["BLDU"], 1);
        assert_eq!(json["byStation"]["OERK"]["maxWind"], 0.0);
        assert_eq!(json["latestEvent"]["wxcodes"], "+BLDU");
    }
}
