//! Helpers to convert domain data into egui-facing view structs.

use egui::ColorImage;

use crate::egui_app::state::PreviewImage;

/// Widest the preview is drawn, in points; larger images are scaled down.
pub const PREVIEW_MAX_WIDTH: f32 = 380.0;

/// Decode staged file bytes into preview pixels.
pub fn decode_preview(bytes: &[u8]) -> Result<PreviewImage, String> {
    let decoded = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let rgba = decoded.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let image = ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
    Ok(PreviewImage { image })
}

/// Fit source dimensions under `max_width`, preserving aspect ratio.
pub fn preview_display_size(dimensions: [usize; 2], max_width: f32) -> egui::Vec2 {
    let width = dimensions[0] as f32;
    let height = dimensions[1] as f32;
    if width <= max_width || width <= 0.0 {
        return egui::vec2(width, height);
    }
    let scale = max_width / width;
    egui::vec2(max_width, height * scale)
}

/// Human-readable source dimensions, e.g. `812 × 612`.
pub fn dimensions_label(dimensions: [usize; 2]) -> String {
    format!("{} × {}", dimensions[0], dimensions[1])
}
