use crate::compass_label;

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> i64 {
    ((fahrenheit - 32.0) * 5.0 / 9.0).round() as i64
}

pub fn knots_to_kmh(knots: f64) -> i64 {
    (knots * 1.852).round() as i64
}

/// Statute miles to meters, to the nearest hundred.
pub fn miles_to_meters(miles: f64) -> i64 {
    ((miles * 1609.344 / 100.0).round() * 100.0) as i64
}

/// 16-point compass label, or `N/A` when no direction was reported.
pub fn compass(degrees: Option<f64>) -> String {
    degrees
        .map(compass_label)
        .unwrap_or("N/A")
        .to_string()
}
