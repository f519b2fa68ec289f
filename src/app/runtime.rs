use crate::events::{IconRequest, IconResult, UserEvent};
use crate::icons::{generate_tray_icon, synthesize_tile};
use crate::monitor::{self, StatsSnapshot};
use crossbeam_channel::TryRecvError;
use eframe::egui;
use log::error;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tray_icon::{
    menu::{Menu, MenuEvent, MenuItem},
    MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent,
};

pub const APP_DISPLAY_NAME: &str = "QuickDeck";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuntimeAction {
    Show,
    Hide,
    Toggle,
    Quit,
}

pub struct RuntimeHandles {
    pub tray_icon: TrayIcon,
    pub rx: Receiver<UserEvent>,
    pub icon_req_tx: Sender<IconRequest>,
    pub toggle_item: MenuItem,
    pub watch_tx: crossbeam_channel::Sender<Vec<String>>,
    pub stats_rx: crossbeam_channel::Receiver<StatsSnapshot>,
}

pub fn build_runtime(ctx: &egui::Context) -> RuntimeHandles {
    let (icon_req_tx, icon_req_rx) = mpsc::channel::<IconRequest>();
    let (ui_tx, ui_rx) = mpsc::channel::<UserEvent>();
    let (watch_tx, watch_rx) = crossbeam_channel::unbounded::<Vec<String>>();
    let (stats_tx, stats_rx) = crossbeam_channel::unbounded::<StatsSnapshot>();

    spawn_icon_worker(icon_req_rx, ui_tx.clone(), ctx.clone());
    monitor::spawn_stats_worker(watch_rx, stats_tx, ctx.clone());

    let tray_menu = Menu::new();
    let toggle_item = MenuItem::new("Hide", true, None);
    let quit_item = MenuItem::new("Quit", true, None);
    tray_menu
        .append_items(&[&toggle_item, &quit_item])
        .expect("failed to append tray menu");

    let tray_icon = TrayIconBuilder::new()
        .with_menu(Box::new(tray_menu))
        .with_tooltip(APP_DISPLAY_NAME)
        .with_icon(generate_tray_icon(APP_DISPLAY_NAME))
        .build()
        .expect("failed to create tray icon");

    let toggle_id = toggle_item.id().clone();
    let quit_id = quit_item.id().clone();

    spawn_runtime_event_loop(ui_tx, ctx.clone(), toggle_id, quit_id);

    RuntimeHandles {
        tray_icon,
        rx: ui_rx,
        icon_req_tx,
        toggle_item,
        watch_tx,
        stats_rx,
    }
}

/// Tile synthesis is cheap but still runs off the UI thread so texture
/// uploads happen at a steady cadence regardless of how many buttons a drop
/// brings in at once.
fn spawn_icon_worker(
    icon_req_rx: Receiver<IconRequest>,
    tx: Sender<UserEvent>,
    ctx: egui::Context,
) {
    thread::spawn(move || {
        while let Ok(req) = icon_req_rx.recv() {
            let side = req.size.clamp(16, 256) as usize;
            let image = Some(synthesize_tile(&req.target, side));
            let _ = tx.send(UserEvent::IconReady(IconResult {
                target: req.target,
                image,
            }));
            ctx.request_repaint();
        }
    });
}

fn spawn_runtime_event_loop(
    ui_tx: Sender<UserEvent>,
    ctx: egui::Context,
    toggle_menu_id: tray_icon::menu::MenuId,
    quit_menu_id: tray_icon::menu::MenuId,
) {
    thread::spawn(move || {
        let mut is_visible = true;
        loop {
            match MenuEvent::receiver().try_recv() {
                Ok(event) => {
                    if event.id == toggle_menu_id {
                        apply_runtime_action(RuntimeAction::Toggle, &ui_tx, &ctx, &mut is_visible);
                    } else if event.id == quit_menu_id {
                        apply_runtime_action(RuntimeAction::Quit, &ui_tx, &ctx, &mut is_visible);
                    }
                }
                Err(err) => {
                    if !matches!(err, TryRecvError::Empty) {
                        error!("menu receiver error: {}", err);
                    }
                }
            }

            match TrayIconEvent::receiver().try_recv() {
                Ok(event) => {
                    if let TrayIconEvent::Click {
                        button: MouseButton::Left,
                        button_state: MouseButtonState::Up,
                        ..
                    } = event
                    {
                        apply_runtime_action(RuntimeAction::Toggle, &ui_tx, &ctx, &mut is_visible);
                    }
                }
                Err(err) => {
                    if !matches!(err, TryRecvError::Empty) {
                        error!("tray receiver error: {}", err);
                    }
                }
            }

            thread::sleep(Duration::from_millis(10));
        }
    });
}

fn apply_runtime_action(
    action: RuntimeAction,
    ui_tx: &Sender<UserEvent>,
    ctx: &egui::Context,
    is_visible: &mut bool,
) {
    match action {
        RuntimeAction::Show => {
            *is_visible = true;
            ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
            ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(false));
            ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
            let _ = ui_tx.send(UserEvent::Show);
            ctx.request_repaint();
        }
        RuntimeAction::Hide => {
            if *is_visible {
                *is_visible = false;
                ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(true));
                let _ = ui_tx.send(UserEvent::Hide);
                ctx.request_repaint();
            }
        }
        RuntimeAction::Toggle => {
            if *is_visible {
                apply_runtime_action(RuntimeAction::Hide, ui_tx, ctx, is_visible);
            } else {
                apply_runtime_action(RuntimeAction::Show, ui_tx, ctx, is_visible);
            }
        }
        RuntimeAction::Quit => {
            let _ = ui_tx.send(UserEvent::Quit);
            std::process::exit(0);
        }
    }
}
