use std::time::Instant;

use crate::data::model::{CaseSeries, OutbreakDataset};
use crate::data::transform::{DerivedRecord, FrequencyMode};
use crate::data::view::{self, RegionSelection};
use crate::data::window::WindowPosition;
use crate::playback::PlaybackController;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Central panel views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewTab {
    #[default]
    Chart,
    Map,
    Table,
}

impl ViewTab {
    pub const ALL: [ViewTab; 3] = [ViewTab::Chart, ViewTab::Map, ViewTab::Table];

    pub fn label(&self) -> &'static str {
        match self {
            ViewTab::Chart => "Chart",
            ViewTab::Map => "Map",
            ViewTab::Table => "Table",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until the user opens a file).
    pub dataset: Option<OutbreakDataset>,

    /// Name of the measure currently shown (e.g. confirmed cases).
    pub measure: Option<String>,

    /// Regions charted, in pick order.
    pub selection: RegionSelection,

    /// Aggregation applied to the raw daily counts.
    pub mode: FrequencyMode,

    /// Normalized time window into the series span.
    pub window: WindowPosition,

    /// Time-lapse playback of the window's end offset.
    pub playback: PlaybackController,

    /// Filter text for the region checkbox list.
    pub region_search: String,

    /// Active central view.
    pub view_tab: ViewTab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            measure: None,
            selection: RegionSelection::default(),
            mode: FrequencyMode::default(),
            window: WindowPosition::FULL,
            playback: PlaybackController::new(),
            region_search: String::new(),
            view_tab: ViewTab::default(),
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset; resets measure, selection and window.
    pub fn set_dataset(&mut self, dataset: OutbreakDataset) {
        self.playback.stop();
        self.measure = dataset.default_measure().map(String::from);

        let available = self
            .measure
            .as_deref()
            .and_then(|m| dataset.series(m))
            .map(|s| s.regions().to_vec())
            .unwrap_or_default();
        self.selection = RegionSelection::default_for(&available);

        self.window = WindowPosition::FULL;
        self.region_search.clear();
        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
    }

    /// The series behind the selected measure.
    pub fn active_series(&self) -> Option<&CaseSeries> {
        let measure = self.measure.as_deref()?;
        self.dataset.as_ref()?.series(measure)
    }

    /// Derived records for the rendering surfaces. Recomputed on every
    /// call; nothing is cached across interactions.
    pub fn derived(&self) -> Vec<DerivedRecord> {
        match self.active_series() {
            Some(series) => view::compute(series, &self.selection, self.mode, self.window),
            None => Vec::new(),
        }
    }

    pub fn set_measure(&mut self, name: &str) {
        self.measure = Some(name.to_string());
    }

    pub fn toggle_region(&mut self, region: &str) {
        self.selection.toggle(region);
    }

    /// Reset the selection to the single default region.
    pub fn clear_regions(&mut self) {
        self.selection.clear();
    }

    /// Begin a time-lapse from the current window.
    pub fn start_playback(&mut self, now: Instant) {
        self.playback.start(self.window, now);
    }

    pub fn stop_playback(&mut self) {
        self.playback.stop();
    }

    /// Apply every playback tick due at `now` to the window.
    pub fn pump_playback(&mut self, now: Instant) {
        let mut window = self.window;
        self.playback.poll(now, |position| window = position);
        self.window = window;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;
    use crate::playback::TICK_PERIOD;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn loaded_state() -> AppState {
        let records = (1..=10)
            .map(|d| {
                let mut values = BTreeMap::new();
                values.insert("World".to_string(), d as f64);
                Record::new(NaiveDate::from_ymd_opt(2024, 1, d).unwrap(), values)
            })
            .collect();
        let series = CaseSeries::from_records(records).unwrap();
        let dataset =
            OutbreakDataset::from_measures(vec![("confirmed_cases".to_string(), series)]);

        let mut state = AppState::default();
        state.set_dataset(dataset);
        state
    }

    #[test]
    fn set_dataset_picks_measure_selection_and_full_window() {
        let state = loaded_state();
        assert_eq!(state.measure.as_deref(), Some("confirmed_cases"));
        assert_eq!(state.selection.as_slice(), ["World"]);
        assert_eq!(state.window, WindowPosition::FULL);
        assert!(state.active_series().is_some());
    }

    #[test]
    fn pump_playback_moves_the_window_end() {
        let mut state = loaded_state();
        state.window = WindowPosition::new(0, 40);

        let t0 = Instant::now();
        state.start_playback(t0);
        state.pump_playback(t0 + TICK_PERIOD * 3);

        assert_eq!(state.window, WindowPosition::new(0, 43));
        assert!(state.playback.is_running());
    }

    #[test]
    fn derived_is_empty_without_a_dataset() {
        let state = AppState::default();
        assert!(state.derived().is_empty());
    }
}
