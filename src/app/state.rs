use eframe::egui;
use std::time::Instant;

/// A press that may become a reorder drag if held long enough without the
/// pointer wandering.
#[derive(Debug, Clone, Copy)]
pub struct PressCandidate {
    pub container: usize,
    pub button: usize,
    pub started: Instant,
    pub origin: egui::Pos2,
}

/// Window move in progress, anchored at the press position so the window
/// tracks the pointer without accumulating drift.
#[derive(Debug, Clone, Copy)]
pub struct WindowDragState {
    pub start_window_pos: egui::Pos2,
    pub start_global_mouse: egui::Pos2,
}
