use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Result, bail};
use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Record – one day of observations
// ---------------------------------------------------------------------------

/// A single day's observations: region name → count.
///
/// A region absent from `values` has no data for that day, which is
/// distinct from an explicit zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    pub values: BTreeMap<String, f64>,
}

impl Record {
    pub fn new(date: NaiveDate, values: BTreeMap<String, f64>) -> Self {
        Record { date, values }
    }

    /// Value for a region, `None` when the region reported nothing that day.
    pub fn value(&self, region: &str) -> Option<f64> {
        self.values.get(region).copied()
    }
}

// ---------------------------------------------------------------------------
// DateSpan – inclusive calendar range
// ---------------------------------------------------------------------------

/// Inclusive date range, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days from start to end (0 for a single-day span).
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

// ---------------------------------------------------------------------------
// CaseSeries – the canonical series for one measure
// ---------------------------------------------------------------------------

/// Date-ordered daily series for a single measure (e.g. confirmed cases).
///
/// Invariant: record dates are strictly increasing. The series is built
/// once per load and never mutated afterward; a reload replaces it
/// wholesale.
#[derive(Debug, Clone, Default)]
pub struct CaseSeries {
    records: Vec<Record>,
    regions: Vec<String>,
}

impl CaseSeries {
    /// Sort records by date and index the region names that appear.
    /// Duplicate dates are a load defect and rejected here.
    pub fn from_records(mut records: Vec<Record>) -> Result<Self> {
        records.sort_by_key(|r| r.date);
        for pair in records.windows(2) {
            if pair[0].date == pair[1].date {
                bail!("duplicate date {} in series", pair[0].date);
            }
        }

        let region_set: BTreeSet<&str> = records
            .iter()
            .flat_map(|r| r.values.keys().map(String::as_str))
            .collect();
        let regions = region_set.into_iter().map(String::from).collect();

        Ok(CaseSeries { records, regions })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// All region names observed anywhere in the series, sorted.
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First-to-last date range, `None` for an empty series.
    pub fn span(&self) -> Option<DateSpan> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => Some(DateSpan {
                start: first.date,
                end: last.date,
            }),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// OutbreakDataset – all measures of one loaded file
// ---------------------------------------------------------------------------

/// The complete loaded dataset: one [`CaseSeries`] per measure
/// (confirmed cases, suspected cases, deaths, ... as found in the file).
#[derive(Debug, Clone, Default)]
pub struct OutbreakDataset {
    series: BTreeMap<String, CaseSeries>,
    measures: Vec<String>,
}

impl OutbreakDataset {
    /// Build from (measure name, series) pairs, preserving measure order.
    pub fn from_measures(pairs: Vec<(String, CaseSeries)>) -> Self {
        let mut measures = Vec::with_capacity(pairs.len());
        let mut series = BTreeMap::new();
        for (name, s) in pairs {
            if !series.contains_key(&name) {
                measures.push(name.clone());
            }
            series.insert(name, s);
        }
        OutbreakDataset { series, measures }
    }

    /// Measure names in file order.
    pub fn measures(&self) -> &[String] {
        &self.measures
    }

    pub fn series(&self, measure: &str) -> Option<&CaseSeries> {
        self.series.get(measure)
    }

    /// The measure selected by default after a load.
    pub fn default_measure(&self) -> Option<&str> {
        self.measures.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn record(d: u32, pairs: &[(&str, f64)]) -> Record {
        let values = pairs
            .iter()
            .map(|(r, v)| (r.to_string(), *v))
            .collect();
        Record::new(day(d), values)
    }

    #[test]
    fn from_records_sorts_by_date() {
        let series = CaseSeries::from_records(vec![
            record(3, &[("World", 3.0)]),
            record(1, &[("World", 1.0)]),
            record(2, &[("World", 2.0)]),
        ])
        .unwrap();

        let dates: Vec<NaiveDate> = series.records().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(1), day(2), day(3)]);
        assert_eq!(
            series.span().unwrap(),
            DateSpan { start: day(1), end: day(3) }
        );
    }

    #[test]
    fn from_records_rejects_duplicate_dates() {
        let result = CaseSeries::from_records(vec![
            record(1, &[("World", 1.0)]),
            record(1, &[("World", 2.0)]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn regions_are_the_union_across_records() {
        let series = CaseSeries::from_records(vec![
            record(1, &[("Europe", 1.0)]),
            record(2, &[("Africa", 2.0), ("Europe", 3.0)]),
        ])
        .unwrap();
        assert_eq!(series.regions(), ["Africa", "Europe"]);
    }

    #[test]
    fn empty_series_has_no_span() {
        let series = CaseSeries::from_records(Vec::new()).unwrap();
        assert!(series.is_empty());
        assert!(series.span().is_none());
    }
}
