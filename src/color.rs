use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Region line colours
// ---------------------------------------------------------------------------

/// Hue step between consecutive selected regions, in degrees.
const HUE_STEP: usize = 60;

/// Line colour for the i-th selected region (insertion order).
///
/// Positional assignment at fixed saturation/lightness; hues repeat every
/// `360 / HUE_STEP` selections, so a seventh region shares the first
/// region's colour. Accepted as an aesthetic limit, not a defect.
pub fn region_color(index: usize) -> Color32 {
    let hue = ((index * HUE_STEP) % 360) as f32;
    let hsl = Hsl::new(hue, 0.75, 0.55);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Legend entries for the chart: each region with its assigned colour.
pub fn legend_entries(regions: &[String]) -> Vec<(String, Color32)> {
    regions
        .iter()
        .enumerate()
        .map(|(i, r)| (r.clone(), region_color(i)))
        .collect()
}

/// Black or white, whichever stays readable on `fill`.
pub fn contrast_text(fill: Color32) -> Color32 {
    let luma = 0.299 * fill.r() as f32 + 0.587 * fill.g() as f32 + 0.114 * fill.b() as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}
