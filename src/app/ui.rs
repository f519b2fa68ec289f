use super::state::{PressCandidate, WindowDragState};
use super::style::{PanelTheme, CONTENT_PADDING, FOOTER_HEIGHT, ICON_SIDE, PANEL_ROUNDING};
use super::{clamp_window_origin, sanitize_window_size, DeckApp};
use crate::dragdrop::{self, DropPayload};
use crate::events::{IconRequest, LaunchIntent, UserEvent};
use eframe::egui;
use log::info;
use std::time::{Duration, Instant};

const REORDER_HOLD_MS: u64 = 260;
const REORDER_MOVE_TOLERANCE: f32 = 18.0;
const SNAP_THRESHOLD: f32 = 48.0;
const RESIZE_SETTLE_MS: u64 = 400;

/// Deferred mutations collected while the container tree is borrowed for
/// drawing, applied once the widget pass is done.
enum UiAction {
    Intent(LaunchIntent),
    RemoveButton { container: usize, button: usize },
    AddSeparator { container: usize },
    AddGroup,
    RemoveGroup(usize),
    SetGridMode(bool),
    Quit,
}

impl eframe::App for DeckApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0, 0.0, 0.0, 0.0]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_runtime_events(ctx);
        self.drain_stats(ctx);

        if !self.is_visible {
            return;
        }

        self.draw_panel(ctx);
        self.handle_dropped_files(ctx);
        self.apply_notifications();
        self.persist_selection();
    }
}

impl DeckApp {
    fn handle_runtime_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.rx.try_recv() {
            match event {
                UserEvent::Show => self.start_show_transition(ctx),
                UserEvent::Hide => self.start_hide_transition(),
                UserEvent::Quit => {
                    info!("exiting");
                    std::process::exit(0);
                }
                UserEvent::IconReady(result) => {
                    let Some(image) = result.image else {
                        continue;
                    };
                    let texture = ctx.load_texture(
                        format!("tile:{}", result.target),
                        image,
                        egui::TextureOptions::LINEAR,
                    );
                    for container in &mut self.panel.containers {
                        for button in &mut container.buttons {
                            if button.item.target == result.target && button.icon.is_none() {
                                button.icon = Some(texture.clone());
                            }
                        }
                    }
                }
            }
        }
    }

    fn drain_stats(&mut self, ctx: &egui::Context) {
        let mut latest = None;
        while let Ok(snapshot) = self.stats_rx.try_recv() {
            latest = Some(snapshot);
        }
        if let Some(snapshot) = latest {
            if self.panel.apply_stats(&snapshot.stats) {
                ctx.request_repaint();
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }
        let Some(payload) = dragdrop::classify(&dropped) else {
            return;
        };
        let target = ctx
            .input(|i| i.pointer.hover_pos())
            .and_then(|p| self.panel.container_at(p))
            .unwrap_or(self.panel.selected());

        if !dragdrop::apply(&mut self.panel, target, payload, &self.resolver, &self.metrics) {
            self.show_warning("Drop not recognized");
        }
    }

    fn draw_panel(&mut self, ctx: &egui::Context) {
        let theme = PanelTheme::default();
        let panel_frame = egui::Frame::none()
            .fill(egui::Color32::TRANSPARENT)
            .stroke(egui::Stroke::NONE);
        let files_hovered = ctx.input(|i| !i.raw.hovered_files.is_empty());
        if files_hovered {
            ctx.request_repaint();
        }

        egui::CentralPanel::default()
            .frame(panel_frame)
            .show(ctx, |ui| {
                let panel_rect = ui.max_rect();
                let window_rect = ctx
                    .input(|i| i.viewport().outer_rect)
                    .unwrap_or(egui::Rect::ZERO);

                ui.painter()
                    .rect_filled(panel_rect, PANEL_ROUNDING, theme.panel_bg);
                ui.painter().rect_stroke(
                    panel_rect,
                    PANEL_ROUNDING,
                    egui::Stroke::new(1.0, theme.panel_border),
                );

                let content_origin =
                    panel_rect.min + egui::vec2(CONTENT_PADDING, CONTENT_PADDING);
                let content_width = panel_rect.width() - CONTENT_PADDING * 2.0;
                let available = panel_rect.height() - CONTENT_PADDING * 2.0;

                let heights_moving = self.height_anim.tick(
                    &mut self.panel,
                    available,
                    FOOTER_HEIGHT,
                    &self.metrics,
                );
                self.panel
                    .arrange(content_origin, content_width, &self.metrics);
                let buttons_moving =
                    self.animator.tick(&mut self.panel.containers, &self.metrics);
                if heights_moving || buttons_moving {
                    ctx.request_repaint_after(Duration::from_millis(16));
                }

                self.panel.dragging = self.drag_source.is_some() || files_hovered;
                let pointer = ctx.input(|i| i.pointer.hover_pos());
                self.panel.update_drag_hover(pointer, Instant::now());

                let mut actions = Vec::new();
                for i in 0..self.panel.containers.len() {
                    self.draw_container(ui, ctx, i, &theme, files_hovered, &mut actions);
                }

                self.update_press(ctx);
                self.update_drag(ctx);
                self.update_window_drag(ctx, ui, window_rect, panel_rect.size());
                self.track_resize(ctx, window_rect.min, panel_rect.size());
                self.draw_warning_overlay(ui, &theme);

                for action in actions {
                    self.apply_action(action);
                }
            });
    }

    fn draw_container(
        &mut self,
        ui: &mut egui::Ui,
        ctx: &egui::Context,
        index: usize,
        theme: &PanelTheme,
        files_hovered: bool,
        actions: &mut Vec<UiAction>,
    ) {
        let bounds = self.panel.containers[index].bounds;
        let selected = self.panel.is_selected(index);
        let header_rect = egui::Rect::from_min_size(
            bounds.min,
            egui::vec2(bounds.width(), self.metrics.header_height),
        );

        let header_id = ui.make_persistent_id(("group_header", index));
        let header_resp = ui.interact(header_rect, header_id, egui::Sense::click_and_drag());
        if header_resp.clicked() {
            self.panel.select(index);
        }
        if header_resp.drag_started_by(egui::PointerButton::Primary) {
            self.begin_window_drag(ctx);
        }

        let header_fill = if selected {
            theme.header_selected
        } else if header_resp.hovered() {
            theme.button_hover
        } else {
            theme.header_bg
        };
        ui.painter().rect_filled(header_rect, 6.0, header_fill);
        ui.painter().text(
            egui::pos2(header_rect.min.x + 10.0, header_rect.center().y),
            egui::Align2::LEFT_CENTER,
            &self.panel.containers[index].name,
            egui::FontId::proportional(14.0),
            theme.title_color,
        );
        let count = self.panel.containers[index]
            .buttons
            .iter()
            .filter(|b| !b.is_separator())
            .count();
        ui.painter().text(
            egui::pos2(header_rect.max.x - 10.0, header_rect.center().y),
            egui::Align2::RIGHT_CENTER,
            count.to_string(),
            egui::FontId::proportional(12.0),
            theme.stats_text,
        );

        let grid_mode = self.config.grid_mode;
        header_resp.context_menu(|ui| {
            if ui.button("Add group").clicked() {
                actions.push(UiAction::AddGroup);
                ui.close_menu();
            }
            if ui.button("Remove group").clicked() {
                actions.push(UiAction::RemoveGroup(index));
                ui.close_menu();
            }
            if ui.button("Add separator").clicked() {
                actions.push(UiAction::AddSeparator { container: index });
                ui.close_menu();
            }
            let mut grid = grid_mode;
            if ui.checkbox(&mut grid, "Grid layout").changed() {
                actions.push(UiAction::SetGridMode(grid));
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Quit").clicked() {
                actions.push(UiAction::Quit);
                ui.close_menu();
            }
        });

        // Collapsed containers show only their header.
        if bounds.height() <= self.metrics.header_height + 1.0 {
            return;
        }

        let content_rect = egui::Rect::from_min_max(
            egui::pos2(bounds.min.x, bounds.min.y + self.metrics.header_height),
            bounds.max,
        );

        if let Some(pos) = ctx.input(|i| i.pointer.hover_pos()) {
            if content_rect.contains(pos) {
                let scroll = ctx.input(|i| i.smooth_scroll_delta.y);
                if scroll != 0.0 {
                    self.panel.containers[index].scroll_by(scroll, &self.metrics);
                }
            }
        }

        if self.panel.containers[index].buttons.is_empty() {
            self.draw_empty_hint(ui, content_rect, theme, files_hovered);
            return;
        }

        let button_count = self.panel.containers[index].buttons.len();
        for j in 0..button_count {
            self.draw_button(ui, ctx, index, j, content_rect, theme, actions);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_button(
        &mut self,
        ui: &mut egui::Ui,
        ctx: &egui::Context,
        container: usize,
        index: usize,
        content_rect: egui::Rect,
        theme: &PanelTheme,
        actions: &mut Vec<UiAction>,
    ) {
        let bounds = self.panel.containers[container].bounds;
        let local = self.panel.containers[container].buttons[index].rect;
        let screen = local.translate(bounds.min.to_vec2());
        if !screen.intersects(content_rect) {
            return;
        }

        let painter = ui.painter().with_clip_rect(content_rect);

        if self.panel.containers[container].buttons[index].is_separator() {
            painter.rect_filled(screen, 4.0, theme.separator_bg);
            let members = self.panel.containers[container].group_members(index).len();
            painter.text(
                egui::pos2(screen.min.x + 8.0, screen.center().y),
                egui::Align2::LEFT_CENTER,
                format!("group of {members}"),
                egui::FontId::proportional(11.0),
                theme.separator_text,
            );
            painter.text(
                egui::pos2(screen.max.x - 8.0, screen.center().y),
                egui::Align2::RIGHT_CENTER,
                "launch all",
                egui::FontId::proportional(11.0),
                theme.separator_text,
            );

            let id = ui.make_persistent_id(("separator", container, index));
            let resp = ui.interact(screen, id, egui::Sense::click_and_drag());
            self.consider_press(ctx, &resp, container, index);
            if self.drag_source.is_none() && resp.clicked() {
                actions.push(UiAction::Intent(LaunchIntent::StartGroup {
                    container,
                    separator: index,
                }));
            }
            resp.context_menu(|ui| {
                if ui.button("Launch group").clicked() {
                    actions.push(UiAction::Intent(LaunchIntent::StartGroup {
                        container,
                        separator: index,
                    }));
                    ui.close_menu();
                }
                if ui.button("Remove").clicked() {
                    actions.push(UiAction::RemoveButton {
                        container,
                        button: index,
                    });
                    ui.close_menu();
                }
            });
            return;
        }

        let id = ui.make_persistent_id(("launch_button", container, index));
        let resp = ui.interact(screen, id, egui::Sense::click_and_drag());
        self.consider_press(ctx, &resp, container, index);

        let captured = self.panel.containers[container].buttons[index].captured;
        let running = self.panel.containers[container].buttons[index].stats.running;
        let fill = if captured {
            theme.header_selected
        } else if running {
            theme.button_running
        } else if resp.hovered() {
            theme.button_hover
        } else {
            theme.button_bg
        };
        painter.rect_filled(screen, 6.0, fill);
        if resp.hovered() || captured {
            painter.rect_stroke(screen, 6.0, egui::Stroke::new(1.0, theme.button_border));
        }

        self.request_icon_if_missing(container, index);
        let icon_rect = egui::Rect::from_center_size(
            egui::pos2(screen.min.x + 8.0 + ICON_SIDE * 0.5, screen.center().y),
            egui::vec2(ICON_SIDE, ICON_SIDE),
        );
        let button = &self.panel.containers[container].buttons[index];
        if let Some(tex) = &button.icon {
            painter.image(
                tex.id(),
                icon_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        } else {
            painter.rect_filled(icon_rect, 5.0, theme.separator_bg);
        }
        let initial = button.item.name.chars().next().unwrap_or('?');
        painter.text(
            icon_rect.center(),
            egui::Align2::CENTER_CENTER,
            initial.to_uppercase().to_string(),
            egui::FontId::proportional(11.0),
            theme.title_color,
        );

        let text_x = icon_rect.max.x + 8.0;
        let text_clip = painter.with_clip_rect(egui::Rect::from_min_max(
            egui::pos2(text_x, screen.min.y),
            egui::pos2(screen.max.x - 6.0, screen.max.y),
        ));
        if running {
            let stats = button.stats;
            text_clip.text(
                egui::pos2(text_x, screen.center().y - 7.0),
                egui::Align2::LEFT_CENTER,
                &button.item.name,
                egui::FontId::proportional(13.0),
                theme.button_text,
            );
            text_clip.text(
                egui::pos2(text_x, screen.center().y + 8.0),
                egui::Align2::LEFT_CENTER,
                format!(
                    "{:.0}%  {:.0} MB  x{}",
                    stats.cpu_percent, stats.ram_mb, stats.window_count
                ),
                egui::FontId::proportional(10.0),
                theme.stats_text,
            );
        } else {
            text_clip.text(
                egui::pos2(text_x, screen.center().y),
                egui::Align2::LEFT_CENTER,
                &button.item.name,
                egui::FontId::proportional(13.0),
                theme.button_text,
            );
        }

        let resp = resp.on_hover_text(&button.item.target);
        if self.drag_source.is_none() && resp.clicked() {
            actions.push(UiAction::Intent(LaunchIntent::Start {
                container,
                button: index,
            }));
        }
        resp.context_menu(|ui| {
            if ui.button("Run").clicked() {
                actions.push(UiAction::Intent(LaunchIntent::Start {
                    container,
                    button: index,
                }));
                ui.close_menu();
            }
            if ui.button("Run as administrator").clicked() {
                actions.push(UiAction::Intent(LaunchIntent::StartElevated {
                    container,
                    button: index,
                }));
                ui.close_menu();
            }
            if ui.button("Open file location").clicked() {
                actions.push(UiAction::Intent(LaunchIntent::OpenLocation {
                    container,
                    button: index,
                }));
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Remove").clicked() {
                actions.push(UiAction::RemoveButton {
                    container,
                    button: index,
                });
                ui.close_menu();
            }
        });
    }

    fn request_icon_if_missing(&mut self, container: usize, index: usize) {
        let icon_size = self.config.icon_size;
        let button = &mut self.panel.containers[container].buttons[index];
        if button.icon.is_none() && !button.icon_requested {
            button.icon_requested = true;
            let _ = self.icon_req_tx.send(IconRequest {
                target: button.item.target.clone(),
                size: icon_size,
            });
        }
    }

    fn consider_press(
        &mut self,
        ctx: &egui::Context,
        resp: &egui::Response,
        container: usize,
        button: usize,
    ) {
        if resp.is_pointer_button_down_on() && self.press.is_none() && self.drag_source.is_none() {
            if let Some(p) = ctx.input(|i| i.pointer.hover_pos()) {
                self.press = Some(PressCandidate {
                    container,
                    button,
                    started: Instant::now(),
                    origin: p,
                });
            }
        }
    }

    /// Promotes a held press into a reorder drag once the hold period elapses
    /// without the pointer wandering off.
    fn update_press(&mut self, ctx: &egui::Context) {
        let Some(press) = self.press else {
            return;
        };
        // Keep repainting while pressing so the hold timing is reliable even
        // when the pointer is still.
        ctx.request_repaint_after(Duration::from_millis(16));
        let down = ctx.input(|i| i.pointer.primary_down());
        let pos = ctx.input(|i| i.pointer.hover_pos());
        if !down {
            self.press = None;
            return;
        }
        let Some(pos) = pos else {
            return;
        };
        if pos.distance(press.origin) > REORDER_MOVE_TOLERANCE {
            self.press = None;
        } else if press.started.elapsed() >= Duration::from_millis(REORDER_HOLD_MS) {
            let bounds = self.panel.containers[press.container].bounds;
            let local = pos - bounds.min.to_vec2();
            self.panel.containers[press.container].drag_begin(press.button, local);
            self.drag_source = Some(press.container);
            self.press = None;
            ctx.request_repaint();
        }
    }

    /// Live reorder in the source container; a release over another container
    /// becomes a cross-container transfer instead.
    fn update_drag(&mut self, ctx: &egui::Context) {
        let Some(source) = self.drag_source else {
            return;
        };
        ctx.request_repaint_after(Duration::from_millis(16));
        let pointer = ctx.input(|i| i.pointer.hover_pos());
        let released = ctx.input(|i| i.pointer.primary_released());

        if let Some(pos) = pointer {
            let bounds = self.panel.containers[source].bounds;
            let local = pos - bounds.min.to_vec2();
            self.panel.containers[source].drag_move(local, &self.metrics);
        }

        if !released {
            return;
        }
        self.drag_source = None;
        self.panel.dragging = false;

        let drop_target = pointer.and_then(|p| self.panel.container_at(p));
        match drop_target {
            Some(target) if target != source => {
                if let Some(index) = self.panel.containers[source].dragged_index() {
                    let payload = DropPayload::ButtonRef { source, index };
                    dragdrop::apply(
                        &mut self.panel,
                        target,
                        payload,
                        &self.resolver,
                        &self.metrics,
                    );
                    self.panel.select(target);
                } else {
                    self.panel.containers[source].drag_end(&self.metrics);
                }
            }
            _ => self.panel.containers[source].drag_end(&self.metrics),
        }
    }

    fn begin_window_drag(&mut self, ctx: &egui::Context) {
        let window_rect = ctx
            .input(|i| i.viewport().outer_rect)
            .unwrap_or(egui::Rect::ZERO);
        if let Some(hover_pos) = ctx.input(|i| i.pointer.hover_pos()) {
            self.window_drag = Some(WindowDragState {
                start_window_pos: window_rect.min,
                start_global_mouse: window_rect.min + hover_pos.to_vec2(),
            });
        }
    }

    /// Moves the window with the pointer, painting snap guides near monitor
    /// edges and snapping on release.
    fn update_window_drag(
        &mut self,
        ctx: &egui::Context,
        ui: &egui::Ui,
        window_rect: egui::Rect,
        panel_size: egui::Vec2,
    ) {
        let Some(state) = self.window_drag else {
            return;
        };

        if ctx.input(|i| i.pointer.button_released(egui::PointerButton::Primary)) {
            self.window_drag = None;
            let window_size = sanitize_window_size(panel_size);
            let mut new_pos = window_rect.min;

            if let Some(monitor_size) = ctx.input(|i| i.viewport().monitor_size) {
                if new_pos.x.abs() < SNAP_THRESHOLD {
                    new_pos.x = 0.0;
                } else if (new_pos.x + window_size.x - monitor_size.x).abs() < SNAP_THRESHOLD {
                    new_pos.x = monitor_size.x - window_size.x;
                }
                if new_pos.y.abs() < SNAP_THRESHOLD {
                    new_pos.y = 0.0;
                } else if (new_pos.y + window_size.y - monitor_size.y).abs() < SNAP_THRESHOLD {
                    new_pos.y = monitor_size.y - window_size.y;
                }
                new_pos = clamp_window_origin(new_pos, window_size, monitor_size);
            }

            ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(new_pos));
            self.save_window_geometry(new_pos, window_size);
            return;
        }

        let Some(hover_pos) = ctx.input(|i| i.pointer.hover_pos()) else {
            return;
        };
        let current_global_mouse = window_rect.min + hover_pos.to_vec2();
        let delta = current_global_mouse - state.start_global_mouse;
        let mut new_origin = state.start_window_pos + delta;

        if let Some(monitor_size) = ctx.input(|i| i.viewport().monitor_size) {
            let window_size = sanitize_window_size(panel_size);
            new_origin = clamp_window_origin(new_origin, window_size, monitor_size);
            let stroke = egui::Stroke::new(
                2.0,
                egui::Color32::from_rgba_premultiplied(75, 197, 165, 160),
            );

            if new_origin.x.abs() < SNAP_THRESHOLD {
                ui.painter()
                    .vline(0.0, egui::Rangef::new(0.0, window_size.y), stroke);
            }
            if (new_origin.x + window_size.x - monitor_size.x).abs() < SNAP_THRESHOLD {
                ui.painter().vline(
                    window_size.x - 2.0,
                    egui::Rangef::new(0.0, window_size.y),
                    stroke,
                );
            }
            if new_origin.y.abs() < SNAP_THRESHOLD {
                ui.painter()
                    .hline(egui::Rangef::new(0.0, window_size.x), 0.0, stroke);
            }
            if (new_origin.y + window_size.y - monitor_size.y).abs() < SNAP_THRESHOLD {
                ui.painter().hline(
                    egui::Rangef::new(0.0, window_size.x),
                    window_size.y - 2.0,
                    stroke,
                );
            }
        }

        ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(new_origin));
        ctx.request_repaint();
    }

    /// Persists window geometry after a live resize settles. Drag-to-move has
    /// its own save on release; this covers the resizable border.
    fn track_resize(&mut self, ctx: &egui::Context, pos: egui::Pos2, size: egui::Vec2) {
        if self.window_drag.is_some() {
            self.resize_pending = None;
            return;
        }
        let saved = self.config.last_size.map(|(w, h)| egui::vec2(w, h));
        if resize_settled(&mut self.resize_pending, saved, size, Instant::now()) {
            self.save_window_geometry(pos, size);
        }
        if self.resize_pending.is_some() {
            ctx.request_repaint_after(Duration::from_millis(RESIZE_SETTLE_MS));
        }
    }

    fn draw_empty_hint(
        &self,
        ui: &egui::Ui,
        content_rect: egui::Rect,
        theme: &PanelTheme,
        files_hovered: bool,
    ) {
        let hint_rect = content_rect.shrink(CONTENT_PADDING);
        if hint_rect.height() < 40.0 {
            return;
        }
        ui.painter()
            .rect_stroke(hint_rect, 10.0, egui::Stroke::new(1.0, theme.drop_hint));
        ui.painter().text(
            hint_rect.center(),
            egui::Align2::CENTER_CENTER,
            "Drop apps here",
            egui::FontId::proportional(14.0),
            theme.title_color,
        );
        if files_hovered {
            ui.painter().rect_filled(
                hint_rect,
                10.0,
                egui::Color32::from_rgba_premultiplied(75, 197, 165, 26),
            );
        }
    }

    fn draw_warning_overlay(&mut self, ui: &egui::Ui, theme: &PanelTheme) {
        if let Some((msg, start_time)) = &self.warning {
            if start_time.elapsed() < Duration::from_secs(2) {
                let painter = ui.ctx().layer_painter(egui::LayerId::new(
                    egui::Order::Foreground,
                    egui::Id::new("warning"),
                ));
                let rect = ui.clip_rect();
                let galley = painter.layout(
                    msg.clone(),
                    egui::FontId::proportional(15.0),
                    theme.toast_text,
                    f32::INFINITY,
                );
                let centered = galley.rect.translate(rect.center() - galley.rect.center());
                painter.rect_filled(centered.expand(10.0), 10.0, theme.toast_bg);
                painter.rect_stroke(
                    centered.expand(10.0),
                    10.0,
                    egui::Stroke::new(1.0, theme.button_border),
                );
                painter.galley(centered.min, galley, theme.toast_text);
                ui.ctx().request_repaint();
            } else {
                self.warning = None;
            }
        }
    }

    fn apply_action(&mut self, action: UiAction) {
        match action {
            UiAction::Intent(intent) => self.execute_intent(intent),
            UiAction::RemoveButton { container, button } => {
                if let Some(c) = self.panel.containers.get_mut(container) {
                    c.remove_button(button, &self.metrics);
                }
            }
            UiAction::AddSeparator { container } => {
                if let Some(c) = self.panel.containers.get_mut(container) {
                    c.add_buttons(vec![crate::button::LaunchItem::separator()], &self.metrics);
                    c.commit_order();
                }
            }
            UiAction::AddGroup => {
                let name = next_group_name(&self.panel);
                self.add_group(name);
            }
            UiAction::RemoveGroup(index) => self.remove_group(index),
            UiAction::SetGridMode(enabled) => self.set_grid_mode(enabled),
            UiAction::Quit => {
                info!("exiting via context menu");
                std::process::exit(0);
            }
        }
    }
}

/// True once the window size has stayed put for the settle period while
/// differing from the saved size. The timer restarts on every size change, so
/// nothing is written mid-resize.
fn resize_settled(
    pending: &mut Option<(egui::Vec2, Instant)>,
    saved: Option<egui::Vec2>,
    size: egui::Vec2,
    now: Instant,
) -> bool {
    if saved.is_some_and(|s| (s - size).abs().max_elem() < 1.0) {
        *pending = None;
        return false;
    }
    match *pending {
        Some((held, since)) if (held - size).abs().max_elem() < 1.0 => {
            if now.duration_since(since) >= Duration::from_millis(RESIZE_SETTLE_MS) {
                *pending = None;
                true
            } else {
                false
            }
        }
        _ => {
            *pending = Some((size, now));
            false
        }
    }
}

fn next_group_name(panel: &crate::panel::Panel) -> String {
    let mut n = panel.containers.len() + 1;
    loop {
        let candidate = format!("Group {n}");
        if !panel.containers.iter().any(|c| c.name == candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Container, ContainerKind};
    use crate::layout::ListEngine;
    use crate::panel::Panel;

    #[test]
    fn generated_group_names_avoid_collisions() {
        let mut panel = Panel::new(Container::new(
            "Apps",
            ContainerKind::Normal,
            Box::new(ListEngine),
        ));
        panel.add_container(Container::new(
            "Group 3",
            ContainerKind::Normal,
            Box::new(ListEngine),
        ));
        assert_eq!(next_group_name(&panel), "Group 4");
    }

    #[test]
    fn resize_persists_only_after_the_settle_period() {
        let start = Instant::now();
        let mut pending = None;
        let saved = Some(egui::vec2(300.0, 620.0));

        // Still moving: every new size restarts the timer.
        assert!(!resize_settled(&mut pending, saved, egui::vec2(340.0, 620.0), start));
        assert!(!resize_settled(
            &mut pending,
            saved,
            egui::vec2(360.0, 620.0),
            start + Duration::from_millis(300)
        ));
        assert!(!resize_settled(
            &mut pending,
            saved,
            egui::vec2(360.0, 620.0),
            start + Duration::from_millis(500)
        ));

        assert!(resize_settled(
            &mut pending,
            saved,
            egui::vec2(360.0, 620.0),
            start + Duration::from_millis(800)
        ));
        assert!(pending.is_none());
    }

    #[test]
    fn unchanged_window_size_never_rewrites_the_config() {
        let start = Instant::now();
        let saved = Some(egui::vec2(300.0, 620.0));
        let mut pending = Some((egui::vec2(300.0, 620.0), start));

        assert!(!resize_settled(
            &mut pending,
            saved,
            egui::vec2(300.0, 620.0),
            start + Duration::from_secs(5)
        ));
        assert!(pending.is_none());
    }
}
