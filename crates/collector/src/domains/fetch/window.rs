use dust_monitor_core::DEFAULT_LOOKBACK_HOURS;
use std::fmt;
use time::{
    macros::{format_description, time},
    Date, Duration, OffsetDateTime, PrimitiveDateTime,
};

use crate::Error;

/// Longest lookback a query may ask for (ten years).
pub const MAX_LOOKBACK_HOURS: u32 = 24 * 3660;

/// The period a query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    /// The last `n` hours, ending now.
    LastHours(u32),
    /// Whole UTC days, `start` at midnight through the last millisecond of `end`.
    Range { start: Date, end: Date },
}

/// Cache key: the window collapsed to a canonical string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A concrete, closed UTC instant range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl TimeWindow {
    pub fn range(start: Date, end: Date) -> Result<Self, Error> {
        if start > end {
            return Err(Error::InvalidInput(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }
        Ok(TimeWindow::Range { start, end })
    }

    /// A single calendar day.
    pub fn day(date: Date) -> Self {
        TimeWindow::Range {
            start: date,
            end: date,
        }
    }

    /// Build a window from loosely typed request parameters. An explicit range is
    /// used only when both dates are given; a missing or zero hour count means 24.
    pub fn from_query(
        hours: Option<u32>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Self, Error> {
        match (start, end) {
            (Some(start), Some(end)) => TimeWindow::range(parse_date(start)?, parse_date(end)?),
            _ => match hours.filter(|hours| *hours > 0) {
                Some(hours) if hours > MAX_LOOKBACK_HOURS => Err(Error::InvalidInput(format!(
                    "hours must be at most {}, got {}",
                    MAX_LOOKBACK_HOURS, hours
                ))),
                Some(hours) => Ok(TimeWindow::LastHours(hours)),
                None => Ok(TimeWindow::LastHours(DEFAULT_LOOKBACK_HOURS)),
            },
        }
    }

    pub fn key(&self) -> QueryKey {
        match self {
            TimeWindow::LastHours(hours) => QueryKey(format!("{}h", hours)),
            TimeWindow::Range { start, end } => QueryKey(format!("{}_{}", start, end)),
        }
    }

    pub fn span(&self, now: OffsetDateTime) -> Span {
        match self {
            TimeWindow::LastHours(hours) => Span {
                start: now
                    .checked_sub(Duration::hours(i64::from(*hours)))
                    .unwrap_or_else(|| PrimitiveDateTime::MIN.assume_utc()),
                end: now,
            },
            TimeWindow::Range { start, end } => Span {
                start: start.midnight().assume_utc(),
                end: end_of_day(*end),
            },
        }
    }
}

impl Span {
    /// Cut the span into consecutive sub-spans of about `span_days` days each.
    /// Every piece but the last closes at the end of a UTC day; the next one
    /// opens a millisecond later.
    pub fn split(&self, span_days: u32) -> Vec<Span> {
        let step = Duration::days(i64::from(span_days.max(1)));
        let mut spans = Vec::new();
        let mut current = self.start;

        while current < self.end {
            let end = match current.checked_add(step) {
                Some(candidate) if candidate <= self.end => {
                    end_of_day(candidate.date()).min(self.end)
                }
                _ => self.end,
            };
            spans.push(Span {
                start: current,
                end,
            });
            match end.checked_add(Duration::milliseconds(1)) {
                Some(next) => current = next,
                None => break,
            }
        }
        spans
    }
}

pub fn end_of_day(date: Date) -> OffsetDateTime {
    PrimitiveDateTime::new(date, time!(23:59:59.999)).assume_utc()
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<Date, Error> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::InvalidInput(String::from(
            "date parameter required (YYYY-MM-DD)",
        )));
    }
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|e| Error::InvalidInput(format!("invalid date {:?}: {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn range_ends_at_last_millisecond_of_end_day() {
        let window = TimeWindow::range(date!(2025 - 03 - 01), date!(2025 - 03 - 02)).unwrap();
        let span = window.span(datetime!(2030-01-01 00:00 UTC));
        assert_eq!(span.start, datetime!(2025-03-01 00:00 UTC));
        assert_eq!(span.end, datetime!(2025-03-02 23:59:59.999 UTC));
    }

    #[test]
    fn lookback_ends_now() {
        let now = datetime!(2025-03-14 12:30 UTC);
        let span = TimeWindow::LastHours(36).span(now);
        assert_eq!(span.start, datetime!(2025-03-13 00:30 UTC));
        assert_eq!(span.end, now);
    }

    #[test]
    fn inverted_range_is_invalid() {
        assert!(matches!(
            TimeWindow::range(date!(2025 - 03 - 02), date!(2025 - 03 - 01)),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn same_effective_window_shares_a_key() {
        let a = TimeWindow::from_query(Some(48), Some("2025-03-01"), Some("2025-03-05")).unwrap();
        let b = TimeWindow::from_query(None, Some("2025-03-01"), Some("2025-03-05")).unwrap();
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key().as_str(), "2025-03-01_2025-03-05");

        let c = TimeWindow::from_query(None, None, None).unwrap();
        let d = TimeWindow::from_query(Some(0), Some("2025-03-01"), None).unwrap();
        assert_eq!(c, TimeWindow::LastHours(24));
        assert_eq!(c.key(), d.key());
        assert_eq!(c.key().to_string(), "24h");
    }

    #[test]
    fn rejects_missing_or_malformed_dates() {
        assert!(parse_date("").is_err());
        assert!(parse_date("2025-13-01").is_err());
        assert!(parse_date("03/01/2025").is_err());
        assert_eq!(parse_date(" 2025-03-01 ").unwrap(), date!(2025 - 03 - 01));
    }

    #[test]
    fn short_span_is_a_single_piece() {
        let span = TimeWindow::LastHours(24).span(datetime!(2025-03-14 12:00 UTC));
        assert_eq!(span.split(10), vec![span]);
    }

    #[test]
    fn long_range_splits_into_contiguous_pieces() {
        let span = TimeWindow::range(date!(2025 - 01 - 01), date!(2025 - 01 - 25))
            .unwrap()
            .span(OffsetDateTime::UNIX_EPOCH);
        let pieces = span.split(10);

        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[0].start, datetime!(2025-01-01 00:00 UTC));
        assert_eq!(pieces[0].end, datetime!(2025-01-11 23:59:59.999 UTC));
        assert_eq!(pieces[1].start, datetime!(2025-01-12 00:00 UTC));
        assert_eq!(pieces[1].end, datetime!(2025-01-22 23:59:59.999 UTC));
        assert_eq!(pieces[2].start, datetime!(2025-01-23 00:00 UTC));
        assert_eq!(pieces[2].end, span.end);
    }

    #[test]
    fn oversized_lookback_is_invalid() {
        assert!(matches!(
            TimeWindow::from_query(Some(200_000_000), None, None),
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(
            TimeWindow::from_query(Some(MAX_LOOKBACK_HOURS), None, None).unwrap(),
            TimeWindow::LastHours(MAX_LOOKBACK_HOURS)
        );
    }

    #[test]
    fn lookback_past_the_calendar_clamps() {
        let now = datetime!(2025-03-14 12:00 UTC);
        let span = TimeWindow::LastHours(u32::MAX).span(now);
        assert_eq!(span.start, PrimitiveDateTime::MIN.assume_utc());
        assert_eq!(span.end, now);
    }

    #[test]
    fn range_at_end_of_calendar_splits() {
        let span = TimeWindow::from_query(None, Some("9999-12-25"), Some("9999-12-31"))
            .unwrap()
            .span(datetime!(2026-10-19 12:00 UTC));
        let pieces = span.split(10);

        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].start, datetime!(9999-12-25 00:00 UTC));
        assert_eq!(pieces[0].end, datetime!(9999-12-31 23:59:59.999 UTC));
    }

    #[test]
    fn empty_span_has_no_pieces() {
        let now = datetime!(2025-03-14 12:00 UTC);
        assert!(Span { start: now, end: now }.split(10).is_empty());
    }
}
