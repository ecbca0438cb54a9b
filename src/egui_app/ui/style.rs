//! Palette and status colors for the UI.

use egui::Color32;

use crate::egui_app::state::StatusTone;

/// Window background.
pub const BG_PRIMARY: Color32 = Color32::from_rgb(10, 18, 38);
/// Card/panel background.
pub const PANEL_FILL: Color32 = Color32::from_rgb(17, 27, 52);
/// Top navigation fill.
pub const NAV_FILL: Color32 = Color32::from_rgb(8, 14, 30);
/// Logo / highlight accent.
pub const ACCENT: Color32 = Color32::from_rgb(0x22, 0xD3, 0xEE);
/// Primary body text.
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(0xE5, 0xE7, 0xEB);
/// Secondary body text.
pub const TEXT_MUTED: Color32 = Color32::from_rgb(0x94, 0xA3, 0xB8);
/// Warning text.
pub const WARNING: Color32 = Color32::from_rgb(0xEF, 0x44, 0x44);
/// Result block background.
pub const REPORT_FILL: Color32 = Color32::from_rgb(13, 22, 44);

/// Footer badge color for a status tone.
pub fn status_badge_color(tone: StatusTone) -> Color32 {
    match tone {
        StatusTone::Idle => Color32::from_rgb(100, 116, 139),
        StatusTone::Info => Color32::from_rgb(34, 197, 94),
        StatusTone::Busy => Color32::from_rgb(250, 204, 21),
        StatusTone::Error => WARNING,
    }
}
