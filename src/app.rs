use std::time::Instant;

use eframe::egui;

use crate::playback;
use crate::state::{AppState, ViewTab};
use crate::ui::{map, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ExplorerApp {
    pub state: AppState,
}

impl ExplorerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Advance a running time-lapse before drawing, and keep frames
        // coming while it runs.
        self.state.pump_playback(Instant::now());
        if self.state.playback.is_running() {
            ctx.request_repaint_after(playback::TICK_PERIOD);
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: explorer controls ----
        egui::SidePanel::left("controls_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart / map / table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                for tab in ViewTab::ALL {
                    ui.selectable_value(&mut self.state.view_tab, tab, tab.label());
                }
            });
            ui.separator();

            match self.state.view_tab {
                ViewTab::Chart => plot::timeseries_chart(ui, &self.state),
                ViewTab::Map => map::choropleth(ui, &mut self.state),
                ViewTab::Table => table::data_table(ui, &self.state),
            }
        });
    }
}
