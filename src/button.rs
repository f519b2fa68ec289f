use eframe::egui;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Persisted launcher record. An empty `target` marks a separator row that
/// divides a container into groups and is never launchable itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LaunchItem {
    pub name: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub args: Option<String>,
    #[serde(default)]
    pub click_count: u32,
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub separator: bool,
}

impl LaunchItem {
    pub fn from_target<S: Into<String>>(name: S, target: S) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            args: None,
            click_count: 0,
            id: 0,
            height: 0.0,
            separator: false,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "Unknown".to_string());
        Self::from_target(name, path.to_string_lossy().to_string())
    }

    pub fn separator() -> Self {
        Self {
            name: String::new(),
            target: String::new(),
            args: None,
            click_count: 0,
            id: 0,
            height: 0.0,
            separator: true,
        }
    }

    pub fn is_separator(&self) -> bool {
        self.separator || self.target.is_empty()
    }
}

/// Live run-state pushed by the process monitor. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunStats {
    pub running: bool,
    pub cpu_percent: f32,
    pub ram_mb: f32,
    pub window_count: u32,
    pub start_epoch: u64,
}

/// View entity bound 1:1 to a [`LaunchItem`] at creation time.
///
/// `rect` is the animated on-screen rectangle in container-local coordinates;
/// `target` is where the layout engine wants it. The animator eases the former
/// toward the latter unless the button is captured by the pointer.
pub struct Button {
    pub item: LaunchItem,
    pub rect: egui::Rect,
    pub target: egui::Rect,
    pub captured: bool,
    pub stats: RunStats,
    pub icon: Option<egui::TextureHandle>,
    pub icon_requested: bool,
}

impl Button {
    pub fn new(item: LaunchItem) -> Self {
        Self {
            item,
            rect: egui::Rect::ZERO,
            target: egui::Rect::ZERO,
            captured: false,
            stats: RunStats::default(),
            icon: None,
            icon_requested: false,
        }
    }

    pub fn is_separator(&self) -> bool {
        self.item.is_separator()
    }

    pub fn height_or(&self, default: f32) -> f32 {
        if self.item.height > 0.0 {
            self.item.height
        } else {
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn empty_target_is_a_separator() {
        let explicit = LaunchItem::separator();
        assert!(explicit.is_separator());

        let implicit = LaunchItem::from_target("stray", "");
        assert!(implicit.is_separator());

        let regular = LaunchItem::from_target("app", r"C:\Apps\app.exe");
        assert!(!regular.is_separator());
    }

    #[test]
    fn from_path_uses_file_stem_for_name() {
        let item = LaunchItem::from_path(&PathBuf::from(r"C:\Apps\editor.exe"));
        assert_eq!(item.name, "editor");
        assert!(!item.is_separator());
    }

    #[test]
    fn zero_height_falls_back_to_theme_default() {
        let mut item = LaunchItem::from_target("app", "app.exe");
        item.height = 0.0;
        let button = Button::new(item.clone());
        assert_eq!(button.height_or(36.0), 36.0);

        item.height = 52.0;
        let tall = Button::new(item);
        assert_eq!(tall.height_or(36.0), 52.0);
    }
}
