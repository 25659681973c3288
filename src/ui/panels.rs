use std::time::Instant;

use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};
use serde::Serialize;

use crate::data::transform::FrequencyMode;
use crate::data::window::{self, MAX_POSITION};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – explorer controls
// ---------------------------------------------------------------------------

/// Render the control panel: measure, frequency, regions, time window.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Explore");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // Clone what we need so we can mutate state inside the loops.
    let measures: Vec<String> = state
        .dataset
        .as_ref()
        .map(|ds| ds.measures().to_vec())
        .unwrap_or_default();
    let regions: Vec<String> = state
        .active_series()
        .map(|s| s.regions().to_vec())
        .unwrap_or_default();
    let span = state.active_series().and_then(|s| s.span());

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Measure ----
            ui.strong("Measure");
            for measure in &measures {
                let selected = state.measure.as_deref() == Some(measure.as_str());
                if ui.radio(selected, measure_label(measure)).clicked() && !selected {
                    state.set_measure(measure);
                }
            }
            ui.separator();

            // ---- Frequency ----
            ui.strong("Frequency");
            for mode in FrequencyMode::ALL {
                ui.radio_value(&mut state.mode, mode, mode.label());
            }
            ui.separator();

            // ---- Regions ----
            ui.strong("Regions");
            ui.add(
                egui::TextEdit::singleline(&mut state.region_search)
                    .hint_text("Type to find a country or region…"),
            );
            if ui.small_button("Clear selection").clicked() {
                state.clear_regions();
            }

            let needle = state.region_search.to_lowercase();
            ScrollArea::vertical()
                .id_salt("region_list")
                .max_height(200.0)
                .show(ui, |ui: &mut Ui| {
                    for region in &regions {
                        if !needle.is_empty() && !region.to_lowercase().contains(&needle) {
                            continue;
                        }

                        let mut text = RichText::new(region);
                        if let Some(c) = state.selection.color_of(region) {
                            text = text.color(c);
                        }

                        let mut checked = state.selection.contains(region);
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_region(region);
                        }
                    }
                });
            ui.separator();

            // ---- Time window ----
            ui.strong("Time window");
            let mut position = state.window;
            let start_changed = ui
                .add(Slider::new(&mut position.start, 0..=MAX_POSITION).text("start"))
                .changed();
            let end_changed = ui
                .add(Slider::new(&mut position.end, 0..=MAX_POSITION).text("end"))
                .changed();
            if start_changed || end_changed {
                // Dragging a boundary cancels a running time-lapse and
                // drags the other boundary along rather than crossing it.
                state.stop_playback();
                if start_changed && position.start > position.end {
                    position.end = position.start;
                }
                if end_changed && position.end < position.start {
                    position.start = position.end;
                }
                state.window = position;
            }

            if let Some(span) = span {
                let resolved = window::resolve(state.window, span);
                ui.label(format!(
                    "{} – {}",
                    resolved.start.format("%b %d, %Y"),
                    resolved.end.format("%b %d, %Y")
                ));
            }
            ui.add_space(4.0);

            if state.playback.is_running() {
                if ui.button("⏹ Stop").clicked() {
                    state.stop_playback();
                }
            } else if ui.button("▶ Play time-lapse").clicked() {
                state.start_playback(Instant::now());
            }
        });
}

/// "confirmed_cases" → "Confirmed cases".
fn measure_label(raw: &str) -> String {
    let mut label = raw.replace('_', " ");
    if let Some(first) = label.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    label
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export derived…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(series) = state.active_series() {
            ui.label(format!(
                "{} days, {} regions, {} selected",
                series.len(),
                series.regions().len(),
                state.selection.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open outbreak data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded measures {:?} from {}",
                    dataset.measures(),
                    path.display()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}

/// One exported observation of the derived view.
#[derive(Serialize)]
struct ExportRow {
    date: String,
    region: String,
    value: f64,
}

/// Write the currently derived records to a JSON file of
/// (date, region, value) rows.
fn export_dialog(state: &mut AppState) {
    let derived = state.derived();
    if derived.is_empty() {
        state.status_message = Some("Nothing to export".to_string());
        return;
    }

    let rows: Vec<ExportRow> = derived
        .iter()
        .flat_map(|record| {
            record.values.iter().map(move |(region, value)| ExportRow {
                date: record.date.to_string(),
                region: region.clone(),
                value: *value,
            })
        })
        .collect();

    let Some(path) = rfd::FileDialog::new()
        .set_title("Export derived series")
        .set_file_name("derived.json")
        .add_filter("JSON", &["json"])
        .save_file()
    else {
        return;
    };

    let result = serde_json::to_string_pretty(&rows)
        .map_err(anyhow::Error::from)
        .and_then(|text| std::fs::write(&path, text).map_err(anyhow::Error::from));
    match result {
        Ok(()) => log::info!("Exported {} rows to {}", rows.len(), path.display()),
        Err(e) => {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
