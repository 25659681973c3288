use eframe::egui::Color32;

use crate::error::ExplorerError;

// ---------------------------------------------------------------------------
// Severity buckets – magnitude → discrete choropleth class
// ---------------------------------------------------------------------------

/// One severity class of the choropleth scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    /// Exclusive upper bound; `None` for the open-ended top bucket.
    pub upper: Option<f64>,
    pub label: &'static str,
    pub color: Color32,
}

/// Ordered scale shared by the map fill and the scale legend.
///
/// The first bucket is reserved for exact zero / nothing reported and is
/// matched before the range scan, so 0 never lands in a range bucket.
pub const BUCKETS: [Bucket; 12] = [
    Bucket { upper: Some(0.0), label: "0", color: Color32::from_rgb(224, 224, 224) },
    Bucket { upper: Some(1.0), label: "<1", color: Color32::from_rgb(255, 255, 204) },
    Bucket { upper: Some(2.0), label: "<2", color: Color32::from_rgb(255, 237, 160) },
    Bucket { upper: Some(5.0), label: "<5", color: Color32::from_rgb(254, 217, 118) },
    Bucket { upper: Some(10.0), label: "<10", color: Color32::from_rgb(254, 178, 76) },
    Bucket { upper: Some(20.0), label: "<20", color: Color32::from_rgb(253, 141, 60) },
    Bucket { upper: Some(50.0), label: "<50", color: Color32::from_rgb(252, 78, 42) },
    Bucket { upper: Some(100.0), label: "<100", color: Color32::from_rgb(227, 26, 28) },
    Bucket { upper: Some(200.0), label: "<200", color: Color32::from_rgb(189, 0, 38) },
    Bucket { upper: Some(500.0), label: "<500", color: Color32::from_rgb(128, 0, 38) },
    Bucket { upper: Some(1000.0), label: "<1,000", color: Color32::from_rgb(90, 0, 50) },
    Bucket { upper: None, label: "1,000+", color: Color32::from_rgb(54, 0, 36) },
];

/// Classify a magnitude into its severity bucket.
///
/// Exactly 0 maps to the zero/no-data bucket; any other value lands in
/// the first bucket whose upper bound exceeds it. Counts are never
/// negative, so a negative (or non-finite) input is an upstream data
/// defect surfaced as [`ExplorerError::InvalidValue`]; callers must not
/// swallow it.
pub fn bucket(value: f64) -> Result<&'static Bucket, ExplorerError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ExplorerError::InvalidValue(value));
    }
    if value == 0.0 {
        return Ok(&BUCKETS[0]);
    }
    for b in &BUCKETS[1..] {
        match b.upper {
            Some(upper) if value < upper => return Ok(b),
            None => return Ok(b),
            _ => {}
        }
    }
    // The last bucket is unbounded, so the loop always returns.
    Ok(&BUCKETS[BUCKETS.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_takes_the_distinguished_first_bucket() {
        assert_eq!(bucket(0.0).unwrap().label, "0");
    }

    #[test]
    fn negative_values_are_rejected() {
        assert_eq!(bucket(-1.0), Err(ExplorerError::InvalidValue(-1.0)));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert!(bucket(f64::NAN).is_err());
        assert!(bucket(f64::INFINITY).is_err());
    }

    #[test]
    fn bounds_are_inclusive_below_exclusive_above() {
        // A value sitting on a breakpoint belongs to the next bucket up.
        assert_eq!(bucket(5.0).unwrap().label, "<10");
        assert_eq!(bucket(1.0).unwrap().label, "<2");
        assert_eq!(bucket(4.999).unwrap().label, "<5");
    }

    #[test]
    fn fractional_values_land_below_one() {
        assert_eq!(bucket(0.3).unwrap().label, "<1");
    }

    #[test]
    fn the_top_bucket_is_unbounded() {
        assert_eq!(bucket(1000.0).unwrap().label, "1,000+");
        assert_eq!(bucket(2.5e6).unwrap().label, "1,000+");
    }

    #[test]
    fn buckets_partition_in_ascending_order() {
        let mut previous = 0.0;
        for b in &BUCKETS[1..] {
            if let Some(upper) = b.upper {
                assert!(upper > previous);
                previous = upper;
            }
        }
        assert!(BUCKETS.last().unwrap().upper.is_none());
    }
}
