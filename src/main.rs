#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

mod animator;
mod app;
mod button;
mod config;
mod container;
mod dragdrop;
mod events;
mod icons;
mod layout;
mod monitor;
mod panel;
mod system;

use crate::app::{
    DeckApp, APP_DISPLAY_NAME, DEFAULT_PANEL_HEIGHT, DEFAULT_PANEL_WIDTH, MIN_PANEL_HEIGHT,
    MIN_PANEL_WIDTH,
};
use crate::config::PanelConfig;
use eframe::egui;

fn main() -> eframe::Result<()> {
    env_logger::init();
    let startup_size = load_startup_window_size();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(startup_size)
            .with_resizable(true)
            .with_decorations(false)
            .with_transparent(true)
            .with_always_on_top()
            .with_taskbar(false)
            .with_visible(true),
        ..Default::default()
    };

    eframe::run_native(
        APP_DISPLAY_NAME,
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            install_cjk_font_fallback(&cc.egui_ctx);
            Ok(Box::new(DeckApp::new(cc)))
        }),
    )
}

fn load_startup_window_size() -> [f32; 2] {
    let config = PanelConfig::load();
    if let Some((w, h)) = config.last_size {
        [
            sanitize_dimension(w, DEFAULT_PANEL_WIDTH, MIN_PANEL_WIDTH),
            sanitize_dimension(h, DEFAULT_PANEL_HEIGHT, MIN_PANEL_HEIGHT),
        ]
    } else {
        [DEFAULT_PANEL_WIDTH, DEFAULT_PANEL_HEIGHT]
    }
}

fn sanitize_dimension(value: f32, fallback: f32, min: f32) -> f32 {
    if !value.is_finite() {
        return fallback;
    }
    value.clamp(min, 4096.0)
}

/// Launcher names come from arbitrary file stems, so pull in a system CJK
/// font when one is available.
fn install_cjk_font_fallback(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    let font_candidates = [
        ("yahei", r"C:\Windows\Fonts\msyh.ttc"),
        ("simhei", r"C:\Windows\Fonts\simhei.ttf"),
        (
            "noto_cjk",
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        ),
    ];

    for (name, path) in font_candidates {
        if let Ok(data) = std::fs::read(path) {
            fonts
                .font_data
                .insert(name.to_owned(), egui::FontData::from_owned(data).into());

            if let Some(family) = fonts.families.get_mut(&egui::FontFamily::Proportional) {
                family.insert(0, name.to_owned());
            }
            if let Some(family) = fonts.families.get_mut(&egui::FontFamily::Monospace) {
                family.push(name.to_owned());
            }
            break;
        }
    }

    ctx.set_fonts(fonts);
}
