mod runtime;
mod state;
mod style;
mod ui;

use crate::animator::{Animator, HeightAnimator};
use crate::config::PanelConfig;
use crate::container::{Container, ContainerKind};
use crate::events::{IconRequest, LaunchIntent, UserEvent};
use crate::layout::{GridEngine, LayoutEngine, ListEngine, Metrics};
use crate::monitor::StatsSnapshot;
use crate::panel::Panel;
use crate::system::{self, ShellShortcutResolver};
use eframe::egui;
use log::info;
use state::{PressCandidate, WindowDragState};
use std::sync::mpsc::{Receiver, Sender};
use std::time::Instant;
use tray_icon::{menu::MenuItem, TrayIcon};

pub use runtime::APP_DISPLAY_NAME;
pub use style::{DEFAULT_PANEL_HEIGHT, DEFAULT_PANEL_WIDTH, MIN_PANEL_HEIGHT, MIN_PANEL_WIDTH};

pub struct DeckApp {
    tray_icon: TrayIcon,
    rx: Receiver<UserEvent>,
    icon_req_tx: Sender<IconRequest>,
    watch_tx: crossbeam_channel::Sender<Vec<String>>,
    stats_rx: crossbeam_channel::Receiver<StatsSnapshot>,
    toggle_item: MenuItem,
    is_visible: bool,

    panel: Panel,
    config: PanelConfig,
    metrics: Metrics,
    animator: Animator,
    height_anim: HeightAnimator,
    resolver: ShellShortcutResolver,

    press: Option<PressCandidate>,
    drag_source: Option<usize>,
    window_drag: Option<WindowDragState>,
    resize_pending: Option<(egui::Vec2, Instant)>,
    warning: Option<(String, Instant)>,
}

impl DeckApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = PanelConfig::load();

        if let Some((x, y)) = config.last_pos {
            cc.egui_ctx
                .send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(x, y)));
        }
        if let Some((w, h)) = config.last_size {
            let restored = sanitize_window_size(egui::vec2(w, h));
            cc.egui_ctx
                .send_viewport_cmd(egui::ViewportCommand::InnerSize(restored));
        }

        let runtime = runtime::build_runtime(&cc.egui_ctx);
        let metrics = style::metrics();
        let panel = build_panel(&config, &metrics);

        let app = Self {
            tray_icon: runtime.tray_icon,
            rx: runtime.rx,
            icon_req_tx: runtime.icon_req_tx,
            watch_tx: runtime.watch_tx,
            stats_rx: runtime.stats_rx,
            toggle_item: runtime.toggle_item,
            is_visible: true,
            panel,
            config,
            metrics,
            animator: Animator::default(),
            height_anim: HeightAnimator::default(),
            resolver: ShellShortcutResolver,
            press: None,
            drag_source: None,
            window_drag: None,
            resize_pending: None,
            warning: None,
        };
        app.refresh_watch_list();
        app
    }

    fn start_hide_transition(&mut self) {
        if self.is_visible {
            self.is_visible = false;
            self.toggle_item.set_text("Show");
            let _ = self
                .tray_icon
                .set_tooltip(Some(format!("{APP_DISPLAY_NAME} (hidden)")));
        }
    }

    fn start_show_transition(&mut self, ctx: &egui::Context) {
        if !self.is_visible {
            self.is_visible = true;
            self.toggle_item.set_text("Hide");
            let _ = self.tray_icon.set_tooltip(Some(APP_DISPLAY_NAME));
        }
        ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
        ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(false));
        ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
    }

    /// Drains container notifications into the config and persists. Also
    /// refreshes the monitor's watch list, since item changes can add or
    /// remove watched targets.
    fn apply_notifications(&mut self) {
        let notes = self.panel.drain_notifications();
        if notes.is_empty() {
            return;
        }
        let mut changed = false;
        for (index, items) in notes {
            let container = &self.panel.containers[index];
            if container.kind != ContainerKind::Normal {
                continue;
            }
            let items = items.unwrap_or_else(|| container.items());
            self.config.set_group_items(&container.name, items);
            changed = true;
        }
        if changed {
            self.config.save();
            self.refresh_watch_list();
        }
    }

    fn persist_selection(&mut self) {
        let name = self.panel.containers[self.panel.selected()].name.clone();
        if self.config.selected_group.as_deref() != Some(&name) {
            self.config.selected_group = Some(name);
            self.config.save();
        }
    }

    fn refresh_watch_list(&self) {
        let targets: Vec<String> = self
            .panel
            .containers
            .iter()
            .flat_map(|c| c.buttons.iter())
            .filter(|b| !b.is_separator())
            .map(|b| b.item.target.clone())
            .collect();
        let _ = self.watch_tx.send(targets);
    }

    fn show_warning<S: Into<String>>(&mut self, message: S) {
        self.warning = Some((message.into(), Instant::now()));
    }

    fn save_window_geometry(&mut self, pos: egui::Pos2, size: egui::Vec2) {
        let size = sanitize_window_size(size);
        self.config.last_pos = Some((pos.x, pos.y));
        self.config.last_size = Some((size.x, size.y));
        self.config.save();
    }

    fn set_grid_mode(&mut self, enabled: bool) {
        if self.config.grid_mode == enabled {
            return;
        }
        self.press = None;
        self.drag_source = None;
        self.config.grid_mode = enabled;
        for container in &mut self.panel.containers {
            container.engine = make_engine(enabled);
            container.reorder_buttons(&self.metrics);
        }
        self.config.save();
    }

    fn add_group(&mut self, name: String) {
        if name.trim().is_empty()
            || self.panel.containers.iter().any(|c| c.name == name)
        {
            self.show_warning("Group name taken");
            return;
        }
        let mut container = Container::new(
            name.clone(),
            ContainerKind::Normal,
            make_engine(self.config.grid_mode),
        );
        container.height = self.metrics.header_height;
        let index = self.panel.add_container(container);
        self.config.set_group_items(&name, Vec::new());
        self.config.save();
        self.panel.select(index);
    }

    fn remove_group(&mut self, index: usize) {
        let name = self.panel.containers[index].name.clone();
        if !self.panel.remove_container(index) {
            self.show_warning("The last group cannot be removed");
            return;
        }
        self.config.remove_group(&name);
        self.config.save();
        self.refresh_watch_list();
    }

    fn execute_intent(&mut self, intent: LaunchIntent) {
        match intent {
            LaunchIntent::Start { container, button } => {
                let Some(item) = self.item_at(container, button) else {
                    return;
                };
                if !system::launch(&item.target, item.args.as_deref()) {
                    self.show_warning(format!("Failed to start {}", item.name));
                }
            }
            LaunchIntent::StartElevated { container, button } => {
                let Some(item) = self.item_at(container, button) else {
                    return;
                };
                if !system::launch_elevated(&item.target, item.args.as_deref()) {
                    self.show_warning(format!("Failed to start {}", item.name));
                }
            }
            LaunchIntent::OpenLocation { container, button } => {
                let Some(item) = self.item_at(container, button) else {
                    return;
                };
                if !system::open_location(&item.target) {
                    self.show_warning("Location not found");
                }
            }
            LaunchIntent::StartGroup {
                container,
                separator,
            } => {
                let Some(c) = self.panel.containers.get(container) else {
                    return;
                };
                let items: Vec<_> = c
                    .group_members(separator)
                    .into_iter()
                    .filter_map(|i| c.buttons.get(i))
                    .map(|b| b.item.clone())
                    .collect();
                info!("launching group of {} items", items.len());
                for item in items {
                    if !system::launch(&item.target, item.args.as_deref()) {
                        self.show_warning(format!("Failed to start {}", item.name));
                    }
                }
            }
        }
    }

    fn item_at(&self, container: usize, button: usize) -> Option<crate::button::LaunchItem> {
        self.panel
            .containers
            .get(container)
            .and_then(|c| c.buttons.get(button))
            .map(|b| b.item.clone())
    }

}

fn make_engine(grid: bool) -> Box<dyn LayoutEngine> {
    if grid {
        Box::new(GridEngine)
    } else {
        Box::new(ListEngine)
    }
}

fn build_panel(config: &PanelConfig, m: &Metrics) -> Panel {
    let mut containers = config.groups.iter().map(|group| {
        let mut container = Container::new(
            group.name.clone(),
            ContainerKind::Normal,
            make_engine(config.grid_mode),
        );
        container.height = m.header_height;
        container.add_buttons(group.items.clone(), m);
        container
    });

    // The config loader guarantees at least one group.
    let first = containers.next().expect("config has no groups");
    let mut panel = Panel::new(first);
    for container in containers {
        panel.add_container(container);
    }

    if let Some(name) = &config.selected_group {
        if let Some(index) = panel.containers.iter().position(|c| &c.name == name) {
            panel.select(index);
        }
    }
    panel
}

pub(super) fn sanitize_window_size(size: egui::Vec2) -> egui::Vec2 {
    let width = if size.x.is_finite() {
        size.x
    } else {
        DEFAULT_PANEL_WIDTH
    };
    let height = if size.y.is_finite() {
        size.y
    } else {
        DEFAULT_PANEL_HEIGHT
    };
    egui::vec2(width.max(MIN_PANEL_WIDTH), height.max(MIN_PANEL_HEIGHT))
}

pub(super) fn clamp_window_origin(
    pos: egui::Pos2,
    size: egui::Vec2,
    monitor: egui::Vec2,
) -> egui::Pos2 {
    egui::pos2(
        pos.x.clamp(0.0, (monitor.x - size.x).max(0.0)),
        pos.y.clamp(0.0, (monitor.y - size.y).max(0.0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::LaunchItem;

    #[test]
    fn build_panel_restores_groups_and_selection() {
        let m = Metrics::default();
        let mut config = PanelConfig::default();
        config.set_group_items(
            "Apps",
            vec![LaunchItem::from_target("a", r"C:\Apps\a.exe")],
        );
        config.set_group_items("Games", vec![]);
        config.selected_group = Some("Games".to_string());

        let panel = build_panel(&config, &m);
        assert_eq!(panel.containers.len(), 2);
        assert_eq!(panel.containers[0].buttons.len(), 1);
        assert!(panel.is_selected(1));
    }

    #[test]
    fn unknown_selected_group_falls_back_to_the_first() {
        let m = Metrics::default();
        let mut config = PanelConfig::default();
        config.selected_group = Some("gone".to_string());
        let panel = build_panel(&config, &m);
        assert!(panel.is_selected(0));
    }

    #[test]
    fn window_size_is_sanitized() {
        let size = sanitize_window_size(egui::vec2(f32::NAN, 100.0));
        assert_eq!(size.x, DEFAULT_PANEL_WIDTH);
        assert_eq!(size.y, MIN_PANEL_HEIGHT);
    }

    #[test]
    fn window_origin_clamps_to_the_monitor() {
        let monitor = egui::vec2(1920.0, 1080.0);
        let size = egui::vec2(300.0, 600.0);
        let clamped = clamp_window_origin(egui::pos2(-40.0, 2000.0), size, monitor);
        assert_eq!(clamped, egui::pos2(0.0, 480.0));
    }
}
