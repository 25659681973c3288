use eframe::egui::{vec2, Align2, FontId, Sense, Ui};

use crate::bucket::{self, Bucket, BUCKETS};
use crate::color;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Choropleth view (central panel)
// ---------------------------------------------------------------------------

/// Choropleth stand-in: one tile per selected region, filled with the
/// severity class of the region's most recent value inside the window.
/// No geographic shapes are drawn; the magnitude classing is the point,
/// and the scale legend below uses the exact same buckets as the fill.
pub fn choropleth(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to explore it  (File → Open…)");
        });
        return;
    }
    if state.selection.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("Select at least one region.");
        });
        return;
    }

    let derived = state.derived();
    let regions = state.selection.as_slice().to_vec();

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for region in &regions {
            // Most recent in-window value; a region with none shows the
            // zero/no-data class.
            let latest = derived
                .iter()
                .rev()
                .find_map(|r| r.values.get(region).copied());
            let class = match latest {
                None => Ok(&BUCKETS[0]),
                Some(value) => bucket::bucket(value),
            };

            match class {
                Ok(b) => region_tile(ui, region, latest, b),
                Err(e) => {
                    // A negative count is an upstream data defect; surface
                    // it, never paint over it.
                    log::error!("{region}: {e}");
                    state.status_message = Some(format!("Error: {e}"));
                }
            }
        }
    });

    ui.add_space(12.0);
    scale_legend(ui);
}

fn region_tile(ui: &mut Ui, region: &str, value: Option<f64>, class: &Bucket) {
    let (rect, _) = ui.allocate_exact_size(vec2(140.0, 72.0), Sense::hover());
    let text_color = color::contrast_text(class.color);

    ui.painter().rect_filled(rect, 6.0, class.color);
    ui.painter().text(
        rect.center() - vec2(0.0, 12.0),
        Align2::CENTER_CENTER,
        region,
        FontId::proportional(14.0),
        text_color,
    );
    let shown = match value {
        Some(v) => format!("{v:.1}"),
        None => "no data".to_string(),
    };
    ui.painter().text(
        rect.center() + vec2(0.0, 10.0),
        Align2::CENTER_CENTER,
        shown,
        FontId::proportional(12.0),
        text_color,
    );
}

/// The bucket scale, rendered in ascending order.
fn scale_legend(ui: &mut Ui) {
    ui.strong("Severity scale");
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for b in &BUCKETS {
            let (rect, _) = ui.allocate_exact_size(vec2(48.0, 20.0), Sense::hover());
            ui.painter().rect_filled(rect, 2.0, b.color);
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                b.label,
                FontId::proportional(10.0),
                color::contrast_text(b.color),
            );
        }
    });
}
