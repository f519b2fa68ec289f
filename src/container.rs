use crate::button::{Button, LaunchItem};
use crate::layout::{LayoutEngine, Metrics};
use eframe::egui;
use std::time::{Duration, Instant};

pub const DWELL_EXPAND_MS: u64 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Normal,
    /// Built-in containers are never written back to the config.
    System,
}

/// Outbound notifications drained by the shell after layout code returns.
/// `ItemsChanged(None)` asks the persistence side to re-pull current state.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerEvent {
    ItemsChanged(Option<Vec<LaunchItem>>),
    SelectRequested,
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    index: usize,
    grab: egui::Vec2,
}

/// A named, collapsible group of launcher buttons.
///
/// Button display order IS the model; there is no separate index map. All
/// coordinates on buttons are container-local (origin at `bounds.min`).
pub struct Container {
    pub name: String,
    pub kind: ContainerKind,
    pub buttons: Vec<Button>,
    /// Scroll offset, always ≤ 0 and clamped so content cannot scroll past
    /// either edge.
    pub scroll: f32,
    pub engine: Box<dyn LayoutEngine>,
    /// Current animated height; the height animator steps this toward the
    /// collapsed header height or the shared expanded target.
    pub height: f32,
    /// Screen-space rectangle assigned by the root's arrange pass.
    pub bounds: egui::Rect,
    drag: Option<DragState>,
    dwell: Option<Instant>,
    events: Vec<ContainerEvent>,
}

impl Container {
    pub fn new<S: Into<String>>(name: S, kind: ContainerKind, engine: Box<dyn LayoutEngine>) -> Self {
        Self {
            name: name.into(),
            kind,
            buttons: Vec::new(),
            scroll: 0.0,
            engine,
            height: 0.0,
            bounds: egui::Rect::ZERO,
            drag: None,
            dwell: None,
            events: Vec::new(),
        }
    }

    pub fn content_width(&self) -> f32 {
        self.bounds.width()
    }

    /// Builds one button per incoming item after group-sorting, appends them
    /// and lays everything out. No-op on empty input; does not commit.
    pub fn add_buttons(&mut self, mut items: Vec<LaunchItem>, m: &Metrics) {
        if items.is_empty() {
            return;
        }
        sort_by_groups(&mut items);
        for item in items {
            self.buttons.push(Button::new(item));
        }
        self.reorder_buttons(m);
    }

    /// Detaches and drops the button, re-lays-out the remainder and fires the
    /// collection-changed notification.
    pub fn remove_button(&mut self, index: usize, m: &Metrics) {
        if self.detach_button(index).is_none() {
            return;
        }
        self.reorder_buttons(m);
        let items = self.items();
        self.events.push(ContainerEvent::ItemsChanged(Some(items)));
    }

    /// Removes a button without notifying; used by cross-container moves
    /// where the root notifies both sides.
    pub fn detach_button(&mut self, index: usize) -> Option<Button> {
        if index >= self.buttons.len() {
            return None;
        }
        if let Some(drag) = self.drag {
            if drag.index == index {
                self.drag = None;
            } else if drag.index > index {
                self.drag = Some(DragState {
                    index: drag.index - 1,
                    grab: drag.grab,
                });
            }
        }
        let mut button = self.buttons.remove(index);
        button.captured = false;
        Some(button)
    }

    /// Appends a button transferred from another container.
    pub fn attach_button(&mut self, button: Button, m: &Metrics) {
        self.buttons.push(button);
        self.reorder_buttons(m);
    }

    /// Recomputes every non-captured button's target from the layout engine.
    /// Buttons placed for the first time snap directly to their slot; the
    /// animator eases everything else.
    pub fn reorder_buttons(&mut self, m: &Metrics) {
        let width = self.content_width();
        let targets: Vec<egui::Rect> = (0..self.buttons.len())
            .map(|i| self.engine.slot(i, self.scroll, width, &self.buttons, m))
            .collect();
        for (button, target) in self.buttons.iter_mut().zip(targets) {
            if button.captured {
                continue;
            }
            button.target = target;
            if button.rect == egui::Rect::ZERO {
                button.rect = target;
            }
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn dragged_index(&self) -> Option<usize> {
        self.drag.map(|d| d.index)
    }

    /// Captures the button under the pointer. Capture is a mutual-exclusion
    /// signal: the animator skips captured buttons entirely.
    pub fn drag_begin(&mut self, index: usize, pointer: egui::Pos2) {
        if index >= self.buttons.len() || self.drag.is_some() {
            return;
        }
        let grab = pointer - self.buttons[index].rect.min;
        self.buttons[index].captured = true;
        self.drag = Some(DragState { index, grab });
    }

    /// Live reorder: the captured button follows the pointer directly; when
    /// the hit-tested candidate slot differs from its position in the order,
    /// it is spliced there immediately so the other buttons slide over.
    pub fn drag_move(&mut self, pointer: egui::Pos2, m: &Metrics) {
        let Some(drag) = self.drag else {
            return;
        };
        let size = self.buttons[drag.index].rect.size();
        self.buttons[drag.index].rect = egui::Rect::from_min_size(pointer - drag.grab, size);

        let width = self.content_width();
        let candidate = self
            .engine
            .index_at(pointer, self.scroll, width, &self.buttons, m)
            .min(self.buttons.len().saturating_sub(1));
        if candidate != drag.index {
            let button = self.buttons.remove(drag.index);
            self.buttons.insert(candidate, button);
            self.drag = Some(DragState {
                index: candidate,
                grab: drag.grab,
            });
            self.reorder_buttons(m);
        }
    }

    /// Releases capture and commits the final order back to the model.
    pub fn drag_end(&mut self, m: &Metrics) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        if let Some(button) = self.buttons.get_mut(drag.index) {
            button.captured = false;
        }
        self.reorder_buttons(m);
        self.commit_order();
    }

    /// Rebuilds the item list from current button order: sequential ids and a
    /// strictly descending synthetic click count, so the group sort on next
    /// load reproduces exactly this order. Fires one collection-changed
    /// notification.
    pub fn commit_order(&mut self) {
        let count = self.buttons.len();
        for (i, button) in self.buttons.iter_mut().enumerate() {
            button.item.id = i as u32;
            button.item.click_count = (count - i) as u32;
        }
        let items = self.items();
        self.events.push(ContainerEvent::ItemsChanged(Some(items)));
    }

    pub fn items(&self) -> Vec<LaunchItem> {
        self.buttons.iter().map(|b| b.item.clone()).collect()
    }

    pub fn notify_items_changed(&mut self) {
        let items = self.items();
        self.events.push(ContainerEvent::ItemsChanged(Some(items)));
    }

    /// Indices of the run of buttons belonging to the group opened by the
    /// separator at `index` (everything after it up to the next separator).
    pub fn group_members(&self, index: usize) -> Vec<usize> {
        let mut members = Vec::new();
        for i in index + 1..self.buttons.len() {
            if self.buttons[i].is_separator() {
                break;
            }
            members.push(i);
        }
        members
    }

    pub fn scroll_by(&mut self, delta: f32, m: &Metrics) {
        self.scroll += delta;
        self.clamp_scroll(m);
    }

    pub fn clamp_scroll(&mut self, m: &Metrics) {
        let width = self.content_width();
        let content = self.engine.content_height(&self.buttons, width, m);
        let min = -(content - self.height).max(0.0);
        self.scroll = self.scroll.clamp(min, 0.0);
    }

    /// Drag-hover dwell: entering a drop-capable hover starts the timer,
    /// leaving cancels it, and on elapse the container asks to be selected so
    /// the user can drop into a collapsed group.
    pub fn dwell_enter(&mut self, now: Instant) {
        if self.dwell.is_none() {
            self.dwell = Some(now);
        }
    }

    pub fn dwell_leave(&mut self) {
        self.dwell = None;
    }

    pub fn dwell_tick(&mut self, now: Instant) {
        if let Some(started) = self.dwell {
            if now.duration_since(started) >= Duration::from_millis(DWELL_EXPAND_MS) {
                self.dwell = None;
                self.events.push(ContainerEvent::SelectRequested);
            }
        }
    }

    pub fn take_events(&mut self) -> Vec<ContainerEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Partitions the sequence into runs delimited by separators and sorts each
/// run by descending click count (stable, so equal counts keep their original
/// relative order). Separators are fixed anchors. Runs once at initial
/// population; manual drag order is never re-sorted.
pub fn sort_by_groups(items: &mut [LaunchItem]) {
    let mut start = 0;
    for i in 0..items.len() {
        if items[i].is_separator() {
            items[start..i].sort_by(|a, b| b.click_count.cmp(&a.click_count));
            start = i + 1;
        }
    }
    let len = items.len();
    items[start..len].sort_by(|a, b| b.click_count.cmp(&a.click_count));
}
