use eframe::egui::Color32;

use crate::color;

use super::model::CaseSeries;
use super::transform::{self, DerivedRecord, FrequencyMode};
use super::window::{self, WindowPosition};

// ---------------------------------------------------------------------------
// RegionSelection – which regions are charted, in pick order
// ---------------------------------------------------------------------------

/// Region every cleared selection falls back to.
pub const DEFAULT_REGION: &str = "World";

/// Ordered set of selected regions. Insertion order is preserved; the
/// position of a region decides its line colour.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSelection {
    regions: Vec<String>,
}

impl Default for RegionSelection {
    fn default() -> Self {
        RegionSelection {
            regions: vec![DEFAULT_REGION.to_string()],
        }
    }
}

impl RegionSelection {
    /// Default pick for a freshly loaded series: "World" when the data has
    /// it, otherwise the first region on offer.
    pub fn default_for(available: &[String]) -> Self {
        if available.iter().any(|r| r == DEFAULT_REGION) || available.is_empty() {
            return RegionSelection::default();
        }
        RegionSelection {
            regions: vec![available[0].clone()],
        }
    }

    pub fn contains(&self, region: &str) -> bool {
        self.regions.iter().any(|r| r == region)
    }

    /// Add at the end, or remove when already selected. Toggling off the
    /// last region leaves the selection empty, a valid (inert) state.
    pub fn toggle(&mut self, region: &str) {
        match self.regions.iter().position(|r| r == region) {
            Some(i) => {
                self.regions.remove(i);
            }
            None => self.regions.push(region.to_string()),
        }
    }

    /// Reset to the single default region, never to nothing.
    pub fn clear(&mut self) {
        self.regions = vec![DEFAULT_REGION.to_string()];
    }

    pub fn as_slice(&self) -> &[String] {
        &self.regions
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Colour of a selected region, by its position in the pick order.
    pub fn color_of(&self, region: &str) -> Option<Color32> {
        self.regions
            .iter()
            .position(|r| r == region)
            .map(color::region_color)
    }
}

// ---------------------------------------------------------------------------
// compute – the full pipeline handed to the rendering surfaces
// ---------------------------------------------------------------------------

/// Derive the exact record list the surfaces draw:
/// transform under `mode`, then clip to the resolved window.
///
/// Nothing is cached; recomputation per interaction is cheap relative to
/// series size.
pub fn compute(
    series: &CaseSeries,
    selection: &RegionSelection,
    mode: FrequencyMode,
    position: WindowPosition,
) -> Vec<DerivedRecord> {
    if selection.is_empty() {
        return Vec::new();
    }
    let Some(span) = series.span() else {
        return Vec::new();
    };
    let derived = transform::transform(series, selection.as_slice(), mode);
    window::clip(derived, window::resolve(position, span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn ten_day_world_series() -> CaseSeries {
        let records = (1..=10)
            .map(|d| {
                let mut values = BTreeMap::new();
                values.insert("World".to_string(), d as f64);
                Record::new(NaiveDate::from_ymd_opt(2024, 1, d).unwrap(), values)
            })
            .collect();
        CaseSeries::from_records(records).unwrap()
    }

    fn world_selection() -> RegionSelection {
        RegionSelection::default()
    }

    #[test]
    fn cumulative_over_the_full_window_matches_the_running_sum() {
        let series = ten_day_world_series();
        let derived = compute(
            &series,
            &world_selection(),
            FrequencyMode::Cumulative,
            WindowPosition::FULL,
        );

        let values: Vec<f64> = derived
            .iter()
            .map(|r| *r.values.get("World").unwrap())
            .collect();
        assert_eq!(
            values,
            vec![1.0, 3.0, 6.0, 10.0, 15.0, 21.0, 28.0, 36.0, 45.0, 55.0]
        );
    }

    #[test]
    fn a_narrow_window_clips_the_derived_records() {
        let series = ten_day_world_series();
        // 9-day span: positions 0 and 50 resolve to Jan 1 and Jan 5.
        let derived = compute(
            &series,
            &world_selection(),
            FrequencyMode::Daily,
            WindowPosition::new(0, 50),
        );
        assert_eq!(derived.len(), 5);
        assert_eq!(
            derived.last().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
    }

    #[test]
    fn empty_selection_yields_empty_output() {
        let series = ten_day_world_series();
        let mut selection = RegionSelection::default();
        selection.toggle("World");
        assert!(selection.is_empty());

        let derived = compute(
            &series,
            &selection,
            FrequencyMode::Daily,
            WindowPosition::FULL,
        );
        assert!(derived.is_empty());
    }

    #[test]
    fn empty_series_yields_empty_output() {
        let series = CaseSeries::from_records(Vec::new()).unwrap();
        let derived = compute(
            &series,
            &world_selection(),
            FrequencyMode::Daily,
            WindowPosition::FULL,
        );
        assert!(derived.is_empty());
    }

    #[test]
    fn toggle_preserves_insertion_order() {
        let mut selection = RegionSelection::default();
        selection.toggle("Africa");
        selection.toggle("Europe");
        assert_eq!(selection.as_slice(), ["World", "Africa", "Europe"]);

        // Removing and re-adding moves a region to the end.
        selection.toggle("Africa");
        selection.toggle("Africa");
        assert_eq!(selection.as_slice(), ["World", "Europe", "Africa"]);
    }

    #[test]
    fn clear_resets_to_the_default_region() {
        let mut selection = RegionSelection::default();
        selection.toggle("Africa");
        selection.clear();
        assert_eq!(selection.as_slice(), [DEFAULT_REGION]);
    }

    #[test]
    fn default_for_prefers_world_then_first_available() {
        let with_world = vec!["Africa".to_string(), "World".to_string()];
        assert_eq!(
            RegionSelection::default_for(&with_world).as_slice(),
            ["World"]
        );

        let without_world = vec!["Africa".to_string(), "Europe".to_string()];
        assert_eq!(
            RegionSelection::default_for(&without_world).as_slice(),
            ["Africa"]
        );
    }
}
