use chrono::Duration;

use super::model::DateSpan;
use super::transform::DerivedRecord;

// ---------------------------------------------------------------------------
// WindowPosition – normalized slider offsets into the full date span
// ---------------------------------------------------------------------------

/// Upper end of the normalized position scale.
pub const MAX_POSITION: u32 = 100;

/// Pair of normalized offsets in `[0, 100]` with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPosition {
    pub start: u32,
    pub end: u32,
}

impl WindowPosition {
    /// The whole date span.
    pub const FULL: WindowPosition = WindowPosition {
        start: 0,
        end: MAX_POSITION,
    };

    /// Clamp both offsets to the scale and order them.
    pub fn new(start: u32, end: u32) -> Self {
        let start = start.min(MAX_POSITION);
        let end = end.min(MAX_POSITION);
        WindowPosition {
            start: start.min(end),
            end: start.max(end),
        }
    }
}

impl Default for WindowPosition {
    fn default() -> Self {
        WindowPosition::FULL
    }
}

// ---------------------------------------------------------------------------
// resolve / clip – normalized window → absolute dates → filtered records
// ---------------------------------------------------------------------------

/// Map a normalized position to absolute dates inside `span`.
///
/// Each endpoint resolves independently as
/// `span.start + total_days * p / 100` in whole calendar days, so the
/// mapping is monotonic in `p` and free of timezone arithmetic.
pub fn resolve(position: WindowPosition, span: DateSpan) -> DateSpan {
    let total = span.num_days();
    let date_at = |p: u32| span.start + Duration::days(total * i64::from(p) / i64::from(MAX_POSITION));
    DateSpan {
        start: date_at(position.start),
        end: date_at(position.end),
    }
}

/// Keep records with `range.start <= date <= range.end` (inclusive).
/// An empty result is a valid window, not an error.
pub fn clip(mut records: Vec<DerivedRecord>, range: DateSpan) -> Vec<DerivedRecord> {
    records.retain(|r| range.contains(r.date));
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn year_span() -> DateSpan {
        DateSpan {
            start: date(2024, 1, 1),
            end: date(2024, 12, 31),
        }
    }

    #[test]
    fn new_clamps_and_orders() {
        assert_eq!(
            WindowPosition::new(120, 40),
            WindowPosition { start: 40, end: 100 }
        );
        assert_eq!(
            WindowPosition::new(70, 30),
            WindowPosition { start: 30, end: 70 }
        );
    }

    #[test]
    fn full_window_resolves_to_the_whole_span() {
        let resolved = resolve(WindowPosition::FULL, year_span());
        assert_eq!(resolved, year_span());
    }

    #[test]
    fn resolve_uses_whole_day_arithmetic() {
        let span = DateSpan {
            start: date(2024, 1, 1),
            end: date(2024, 1, 11),
        };
        // 10-day span: position 50 lands exactly 5 days in.
        let resolved = resolve(WindowPosition::new(50, 100), span);
        assert_eq!(resolved.start, date(2024, 1, 6));
        assert_eq!(resolved.end, date(2024, 1, 11));
    }

    #[test]
    fn resolve_is_monotonic_in_position() {
        let span = year_span();
        let mut previous = resolve(WindowPosition::new(0, 0), span).start;
        for p in 1..=MAX_POSITION {
            let current = resolve(WindowPosition::new(p, p), span).start;
            assert!(current >= previous, "position {p} moved backwards");
            previous = current;
        }
    }

    #[test]
    fn single_day_span_resolves_to_itself() {
        let span = DateSpan {
            start: date(2024, 3, 1),
            end: date(2024, 3, 1),
        };
        let resolved = resolve(WindowPosition::new(25, 75), span);
        assert_eq!(resolved, span);
    }

    #[test]
    fn clip_keeps_both_boundary_dates() {
        let records: Vec<DerivedRecord> = (1..=10)
            .map(|d| DerivedRecord {
                date: date(2024, 1, d),
                values: BTreeMap::new(),
            })
            .collect();
        let range = DateSpan {
            start: date(2024, 1, 3),
            end: date(2024, 1, 7),
        };

        let clipped = clip(records, range);
        assert_eq!(clipped.len(), 5);
        assert_eq!(clipped.first().unwrap().date, date(2024, 1, 3));
        assert_eq!(clipped.last().unwrap().date, date(2024, 1, 7));
    }

    #[test]
    fn clip_to_an_out_of_range_window_is_empty_not_an_error() {
        let records = vec![DerivedRecord {
            date: date(2024, 1, 1),
            values: BTreeMap::new(),
        }];
        let range = DateSpan {
            start: date(2025, 1, 1),
            end: date(2025, 2, 1),
        };
        assert!(clip(records, range).is_empty());
    }
}
