use crate::Observation;

/// Tabular view of the classified set. The set is already the table, so this
/// is a pass-through that leaves station selection to [`filter_by_station`].
pub fn to_table(observations: &[Observation]) -> Vec<Observation> {
    observations.to_vec()
}

/// Keep only rows reported by `station` (exact, case-insensitive identifier match).
pub fn filter_by_station(observations: &[Observation], station: &str) -> Vec<Observation> {
    let station = station.trim();
    observations
        .iter()
        .filter(|obs| obs.station.eq_ignore_ascii_case(station))
        .cloned()
        .collect()
}
