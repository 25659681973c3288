use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::ExplorerError;

use super::model::CaseSeries;

// ---------------------------------------------------------------------------
// FrequencyMode – how raw daily counts are aggregated
// ---------------------------------------------------------------------------

/// Nominal sample count of the centered rolling mean. The window shrinks
/// near the series edges instead of padding with zeros.
pub const ROLLING_WINDOW: usize = 7;
const HALF_WINDOW: usize = ROLLING_WINDOW / 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrequencyMode {
    Daily,
    Cumulative,
    #[default]
    RollingAverage,
}

impl FrequencyMode {
    /// Radio-button order in the UI.
    pub const ALL: [FrequencyMode; 3] = [
        FrequencyMode::RollingAverage,
        FrequencyMode::Cumulative,
        FrequencyMode::Daily,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FrequencyMode::Daily => "Daily",
            FrequencyMode::Cumulative => "Cumulative",
            FrequencyMode::RollingAverage => "7-day average",
        }
    }
}

impl FromStr for FrequencyMode {
    type Err = ExplorerError;

    /// Parse the CLI / config spelling of a mode. Unknown spellings are a
    /// configuration error surfaced to the caller.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(FrequencyMode::Daily),
            "cumulative" => Ok(FrequencyMode::Cumulative),
            "7day" | "7-day" | "rolling" => Ok(FrequencyMode::RollingAverage),
            other => Err(ExplorerError::Configuration(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// DerivedRecord – one aggregated day handed to the rendering surfaces
// ---------------------------------------------------------------------------

/// One day of the derived view: region → aggregated value.
///
/// A region key may be absent when the aggregation produced nothing for
/// that day (a rolling window with no samples); the chart draws a gap
/// there, not a zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRecord {
    pub date: NaiveDate,
    pub values: BTreeMap<String, f64>,
}

// ---------------------------------------------------------------------------
// transform – canonical series → derived series
// ---------------------------------------------------------------------------

/// Recompute the series under `mode`, restricted to `regions`.
///
/// Output dates are identical to the input dates. Values are not rounded
/// here; display rounding is a rendering concern.
///
/// Per-mode handling of a missing raw value:
/// * Daily – charted as an explicit 0.
/// * Cumulative – contributes 0 to the running sum.
/// * RollingAverage – excluded from both the sum and the divisor.
pub fn transform(
    series: &CaseSeries,
    regions: &[String],
    mode: FrequencyMode,
) -> Vec<DerivedRecord> {
    let records = series.records();
    let mut out: Vec<DerivedRecord> = records
        .iter()
        .map(|r| DerivedRecord {
            date: r.date,
            values: BTreeMap::new(),
        })
        .collect();

    for region in regions {
        match mode {
            FrequencyMode::Daily => {
                for (i, rec) in records.iter().enumerate() {
                    let v = rec.value(region).unwrap_or(0.0);
                    out[i].values.insert(region.clone(), v);
                }
            }
            FrequencyMode::Cumulative => {
                let mut total = 0.0;
                for (i, rec) in records.iter().enumerate() {
                    total += rec.value(region).unwrap_or(0.0);
                    out[i].values.insert(region.clone(), total);
                }
            }
            FrequencyMode::RollingAverage => {
                for i in 0..records.len() {
                    let lo = i.saturating_sub(HALF_WINDOW);
                    let hi = (i + HALF_WINDOW).min(records.len() - 1);

                    let mut sum = 0.0;
                    let mut count = 0usize;
                    for rec in &records[lo..=hi] {
                        if let Some(v) = rec.value(region) {
                            sum += v;
                            count += 1;
                        }
                    }
                    if count > 0 {
                        out[i].values.insert(region.clone(), sum / count as f64);
                    }
                }
            }
        }
    }

    out
}
