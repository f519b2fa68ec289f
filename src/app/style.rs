use crate::layout::Metrics;
use eframe::egui::Color32;

pub const CONTENT_PADDING: f32 = 8.0;
pub const FOOTER_HEIGHT: f32 = 10.0;
pub const ICON_SIDE: f32 = 20.0;
pub const PANEL_ROUNDING: f32 = 10.0;
pub const DEFAULT_PANEL_WIDTH: f32 = 300.0;
pub const DEFAULT_PANEL_HEIGHT: f32 = 620.0;
pub const MIN_PANEL_WIDTH: f32 = 220.0;
pub const MIN_PANEL_HEIGHT: f32 = 320.0;

#[derive(Clone, Copy)]
pub struct PanelTheme {
    pub panel_bg: Color32,
    pub panel_border: Color32,
    pub header_bg: Color32,
    pub header_selected: Color32,
    pub title_color: Color32,
    pub button_bg: Color32,
    pub button_hover: Color32,
    pub button_running: Color32,
    pub button_border: Color32,
    pub button_text: Color32,
    pub stats_text: Color32,
    pub separator_bg: Color32,
    pub separator_text: Color32,
    pub drop_hint: Color32,
    pub toast_bg: Color32,
    pub toast_text: Color32,
}

impl Default for PanelTheme {
    fn default() -> Self {
        Self {
            panel_bg: Color32::from_rgba_premultiplied(14, 20, 31, 200),
            panel_border: Color32::from_rgba_premultiplied(161, 179, 201, 36),
            header_bg: Color32::from_rgba_premultiplied(21, 32, 48, 200),
            header_selected: Color32::from_rgba_premultiplied(36, 62, 84, 216),
            title_color: Color32::from_rgb(242, 248, 255),
            button_bg: Color32::from_rgba_premultiplied(24, 36, 50, 154),
            button_hover: Color32::from_rgba_premultiplied(35, 53, 74, 184),
            button_running: Color32::from_rgba_premultiplied(32, 74, 64, 190),
            button_border: Color32::from_rgba_premultiplied(147, 169, 194, 78),
            button_text: Color32::from_rgb(232, 240, 250),
            stats_text: Color32::from_rgba_premultiplied(186, 204, 222, 200),
            separator_bg: Color32::from_rgba_premultiplied(30, 44, 60, 130),
            separator_text: Color32::from_rgba_premultiplied(196, 212, 228, 190),
            drop_hint: Color32::from_rgba_premultiplied(93, 214, 189, 186),
            toast_bg: Color32::from_rgba_premultiplied(8, 12, 18, 236),
            toast_text: Color32::from_rgb(245, 250, 255),
        }
    }
}

/// Geometry handed to the layout engines; one place to retune the panel.
pub fn metrics() -> Metrics {
    Metrics::default()
}
