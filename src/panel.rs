use crate::button::{LaunchItem, RunStats};
use crate::container::{Container, ContainerEvent};
use crate::layout::Metrics;
use eframe::egui;
use std::collections::HashMap;
use std::time::Instant;

/// Root aggregate: owns the full container collection (which doubles as the
/// animation registry — containers join on creation and leave on disposal)
/// and the single selected/expanded container.
pub struct Panel {
    pub containers: Vec<Container>,
    selected: usize,
    /// Set while any drag is in progress; gates hover-to-expand.
    pub dragging: bool,
}

impl Panel {
    pub fn new(first: Container) -> Self {
        Self {
            containers: vec![first],
            selected: 0,
            dragging: false,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected == index
    }

    /// Single point of truth for the expanded container; height animation
    /// retargets from here on the next tick.
    pub fn select(&mut self, index: usize) {
        if index < self.containers.len() {
            self.selected = index;
        }
    }

    pub fn add_container(&mut self, container: Container) -> usize {
        self.containers.push(container);
        self.containers.len() - 1
    }

    /// Refused when it would delete the last remaining container. The next
    /// selection is assigned before returning, so no animation tick ever
    /// observes a dangling selected index.
    pub fn remove_container(&mut self, index: usize) -> bool {
        if self.containers.len() <= 1 || index >= self.containers.len() {
            return false;
        }
        self.containers.remove(index);
        if self.selected == index {
            self.selected = index.min(self.containers.len() - 1);
        } else if self.selected > index {
            self.selected -= 1;
        }
        true
    }

    /// Stacks containers top-to-bottom by cumulative current height.
    pub fn arrange(&mut self, origin: egui::Pos2, width: f32, m: &Metrics) {
        let mut y = origin.y;
        for container in &mut self.containers {
            container.bounds =
                egui::Rect::from_min_size(egui::pos2(origin.x, y), egui::vec2(width, container.height));
            container.clamp_scroll(m);
            y += container.height;
        }
    }

    pub fn total_height(&self) -> f32 {
        self.containers.iter().map(|c| c.height).sum()
    }

    pub fn container_at(&self, pos: egui::Pos2) -> Option<usize> {
        self.containers.iter().position(|c| c.bounds.contains(pos))
    }

    /// Cross-container transfer: detach from the source, append at the
    /// target's end, notify both sides. Same-container moves are ignored
    /// (those ride the live reorder path instead).
    pub fn move_button(
        &mut self,
        source: usize,
        button: usize,
        target: usize,
        m: &Metrics,
    ) -> bool {
        if source == target || source >= self.containers.len() || target >= self.containers.len() {
            return false;
        }
        let offset = self.containers[source].bounds.min - self.containers[target].bounds.min;
        let Some(mut detached) = self.containers[source].detach_button(button) else {
            return false;
        };
        detached.rect = detached.rect.translate(offset);
        self.containers[source].notify_items_changed();

        let target_container = &mut self.containers[target];
        target_container.attach_button(detached, m);
        target_container.commit_order();
        true
    }

    /// Fans a run-state snapshot out to every matching button; returns
    /// whether anything changed so the caller repaints at most once.
    pub fn apply_stats(&mut self, stats: &HashMap<String, RunStats>) -> bool {
        let mut changed = false;
        for container in &mut self.containers {
            for button in &mut container.buttons {
                if button.is_separator() {
                    continue;
                }
                let next = stats.get(&button.item.target).copied().unwrap_or_default();
                if button.stats != next {
                    button.stats = next;
                    changed = true;
                }
            }
        }
        changed
    }

    /// While a drag is in progress, hovering a non-selected container runs
    /// its dwell-to-expand timer; leaving cancels it.
    pub fn update_drag_hover(&mut self, pointer: Option<egui::Pos2>, now: Instant) {
        let selected = self.selected;
        for (i, container) in self.containers.iter_mut().enumerate() {
            let hovered = self.dragging
                && i != selected
                && pointer.is_some_and(|p| container.bounds.contains(p));
            if hovered {
                container.dwell_enter(now);
                container.dwell_tick(now);
            } else {
                container.dwell_leave();
            }
        }
    }

    /// Drains container events: selection requests are resolved here (the
    /// root is the single owner of selection), items-changed notifications
    /// are handed to the persistence side.
    pub fn drain_notifications(&mut self) -> Vec<(usize, Option<Vec<LaunchItem>>)> {
        let mut out = Vec::new();
        let mut select = None;
        for (i, container) in self.containers.iter_mut().enumerate() {
            for event in container.take_events() {
                match event {
                    ContainerEvent::ItemsChanged(items) => out.push((i, items)),
                    ContainerEvent::SelectRequested => select = Some(i),
                }
            }
        }
        if let Some(index) = select {
            self.select(index);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ContainerKind;
    use crate::layout::ListEngine;
    use std::time::Duration;

    fn container(name: &str) -> Container {
        let mut c = Container::new(name, ContainerKind::Normal, Box::new(ListEngine));
        c.bounds = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(200.0, 100.0));
        c.height = 100.0;
        c
    }

    fn item(name: &str) -> LaunchItem {
        LaunchItem::from_target(name.to_string(), format!(r"C:\Apps\{name}.exe"))
    }

    #[test]
    fn exactly_one_container_is_selected() {
        let mut panel = Panel::new(container("a"));
        panel.add_container(container("b"));
        panel.add_container(container("c"));

        panel.select(2);
        let selected: Vec<bool> = (0..3).map(|i| panel.is_selected(i)).collect();
        assert_eq!(selected.iter().filter(|s| **s).count(), 1);
        assert!(panel.is_selected(2));

        // Out-of-range selection is ignored.
        panel.select(9);
        assert!(panel.is_selected(2));
    }

    #[test]
    fn deleting_the_last_container_is_refused() {
        let mut panel = Panel::new(container("only"));
        assert!(!panel.remove_container(0));
        assert_eq!(panel.containers.len(), 1);
        assert!(panel.drain_notifications().is_empty());
    }

    #[test]
    fn deletion_reassigns_selection_before_returning() {
        let mut panel = Panel::new(container("a"));
        panel.add_container(container("b"));
        panel.add_container(container("c"));
        panel.select(2);

        assert!(panel.remove_container(2));
        assert!(panel.selected() < panel.containers.len());
        assert!(panel.is_selected(1));

        panel.select(1);
        assert!(panel.remove_container(0));
        assert!(panel.is_selected(0));
    }

    #[test]
    fn arrange_stacks_by_cumulative_height() {
        let m = Metrics::default();
        let mut panel = Panel::new(container("a"));
        panel.add_container(container("b"));
        panel.containers[0].height = 300.0;
        panel.containers[1].height = 26.0;

        panel.arrange(egui::pos2(10.0, 20.0), 200.0, &m);
        assert_eq!(panel.containers[0].bounds.min.y, 20.0);
        assert_eq!(panel.containers[1].bounds.min.y, 320.0);
        assert_eq!(panel.total_height(), 326.0);
    }

    #[test]
    fn move_button_transfers_and_notifies_both_sides() {
        let m = Metrics::default();
        let mut panel = Panel::new(container("a"));
        panel.add_container(container("b"));
        panel.containers[0].add_buttons(vec![item("x"), item("y")], &m);
        panel.drain_notifications();

        assert!(panel.move_button(0, 0, 1, &m));
        assert_eq!(panel.containers[0].buttons.len(), 1);
        assert_eq!(panel.containers[1].buttons.len(), 1);
        assert_eq!(panel.containers[1].buttons[0].item.name, "x");

        let notes = panel.drain_notifications();
        let sources: Vec<usize> = notes.iter().map(|(i, _)| *i).collect();
        assert_eq!(sources, vec![0, 1]);
    }

    #[test]
    fn same_container_move_is_ignored() {
        let m = Metrics::default();
        let mut panel = Panel::new(container("a"));
        panel.containers[0].add_buttons(vec![item("x")], &m);
        assert!(!panel.move_button(0, 0, 0, &m));
        assert!(panel.drain_notifications().is_empty());
    }

    #[test]
    fn apply_stats_reports_a_single_change_flag() {
        let m = Metrics::default();
        let mut panel = Panel::new(container("a"));
        panel.containers[0].add_buttons(vec![item("x"), item("y")], &m);

        let mut stats = HashMap::new();
        stats.insert(
            r"C:\Apps\x.exe".to_string(),
            RunStats {
                running: true,
                cpu_percent: 2.5,
                ram_mb: 120.0,
                window_count: 1,
                start_epoch: 1000,
            },
        );
        assert!(panel.apply_stats(&stats));
        assert!(panel.containers[0].buttons[0].stats.running);
        assert!(!panel.containers[0].buttons[1].stats.running);

        // Unchanged snapshot: no repaint needed.
        assert!(!panel.apply_stats(&stats));

        // Process exit clears the run-state.
        assert!(panel.apply_stats(&HashMap::new()));
        assert!(!panel.containers[0].buttons[0].stats.running);
    }

    #[test]
    fn drag_hover_over_collapsed_container_selects_it_after_dwell() {
        let m = Metrics::default();
        let mut panel = Panel::new(container("a"));
        panel.add_container(container("b"));
        panel.arrange(egui::Pos2::ZERO, 200.0, &m);
        panel.dragging = true;

        let over_b = panel.containers[1].bounds.center();
        let start = Instant::now();
        panel.update_drag_hover(Some(over_b), start);
        panel.update_drag_hover(Some(over_b), start + Duration::from_millis(450));
        panel.drain_notifications();
        assert!(panel.is_selected(1));
    }

    #[test]
    fn drag_hover_elsewhere_cancels_the_dwell() {
        let m = Metrics::default();
        let mut panel = Panel::new(container("a"));
        panel.add_container(container("b"));
        panel.arrange(egui::Pos2::ZERO, 200.0, &m);
        panel.dragging = true;

        let over_b = panel.containers[1].bounds.center();
        let start = Instant::now();
        panel.update_drag_hover(Some(over_b), start);
        panel.update_drag_hover(None, start + Duration::from_millis(200));
        panel.update_drag_hover(Some(over_b), start + Duration::from_millis(450));
        panel.drain_notifications();
        assert!(panel.is_selected(0));
    }
}
