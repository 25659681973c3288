use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Table view (central panel)
// ---------------------------------------------------------------------------

/// Render the derived records as date rows × selected-region columns.
pub fn data_table(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to explore it  (File → Open…)");
        });
        return;
    }

    let derived = state.derived();
    let regions = state.selection.as_slice().to_vec();
    if derived.is_empty() || regions.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No data in the selected window.");
        });
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(90.0))
        .columns(Column::remainder(), regions.len())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Date");
            });
            for region in &regions {
                header.col(|ui| {
                    ui.strong(region);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, derived.len(), |mut row| {
                let record = &derived[row.index()];
                row.col(|ui| {
                    ui.label(record.date.format("%Y-%m-%d").to_string());
                });
                for region in &regions {
                    row.col(|ui| {
                        match record.values.get(region) {
                            Some(value) => ui.label(format_value(*value)),
                            None => ui.label("–"),
                        };
                    });
                }
            });
        });
}

/// Display rounding lives here, not in the transform.
fn format_value(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
