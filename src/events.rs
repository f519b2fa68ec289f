use eframe::egui;

#[derive(Debug)]
pub enum UserEvent {
    Show,
    Hide,
    Quit,
    IconReady(IconResult),
}

pub struct IconRequest {
    pub target: String,
    pub size: u32,
}

#[derive(Debug)]
pub struct IconResult {
    pub target: String,
    pub image: Option<egui::ColorImage>,
}

/// Launch intents raised by the panel; the shell executes them via `system`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchIntent {
    Start { container: usize, button: usize },
    StartElevated { container: usize, button: usize },
    OpenLocation { container: usize, button: usize },
    StartGroup { container: usize, separator: usize },
}
