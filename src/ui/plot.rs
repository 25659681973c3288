use chrono::{Datelike, NaiveDate};
use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::color;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Time-series chart (central panel)
// ---------------------------------------------------------------------------

/// x-axis encoding: whole days since the common era, so axis marks can be
/// mapped back to calendar dates.
fn date_to_x(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

fn x_to_date(x: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

/// Render the derived records as one line per selected region.
pub fn timeseries_chart(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to explore it  (File → Open…)");
        });
        return;
    }

    let derived = state.derived();
    if derived.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No data in the selected window.");
        });
        return;
    }

    Plot::new("timeseries_chart")
        .legend(Legend::default())
        .x_axis_formatter(|mark, _range| {
            x_to_date(mark.value)
                .map(|d| d.format("%b %d").to_string())
                .unwrap_or_default()
        })
        .label_formatter(|name, point| {
            let date = x_to_date(point.x)
                .map(|d| d.format("%b %d, %Y").to_string())
                .unwrap_or_default();
            if name.is_empty() {
                date
            } else {
                format!("{name}\n{date}: {:.1}", point.y)
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (i, region) in state.selection.as_slice().iter().enumerate() {
                let line_color = color::region_color(i);

                // Split at missing samples so the line breaks instead of
                // bridging (or zeroing) the gap.
                let mut segments: Vec<Vec<[f64; 2]>> = Vec::new();
                let mut current: Vec<[f64; 2]> = Vec::new();
                for record in &derived {
                    match record.values.get(region) {
                        Some(value) => current.push([date_to_x(record.date), *value]),
                        None => {
                            if !current.is_empty() {
                                segments.push(std::mem::take(&mut current));
                            }
                        }
                    }
                }
                if !current.is_empty() {
                    segments.push(current);
                }

                for (n, segment) in segments.into_iter().enumerate() {
                    let mut line = Line::new(PlotPoints::from(segment))
                        .color(line_color)
                        .width(2.0);
                    // Only the first segment carries the legend entry.
                    if n == 0 {
                        line = line.name(region);
                    }
                    plot_ui.line(line);
                }
            }
        });
}
