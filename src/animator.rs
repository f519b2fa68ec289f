use crate::container::Container;
use crate::layout::Metrics;
use crate::panel::Panel;
use eframe::egui;

/// Frame-driven easing of button rectangles toward their layout targets.
///
/// Every tick pulls fresh targets from each container's layout engine and
/// eases left, top and width independently with exponential smoothing,
/// snapping once the remaining delta drops under the pixel threshold so the
/// motion cannot creep asymptotically. Captured buttons are skipped; the
/// pointer owns them exclusively.
pub struct Animator {
    pub smoothing: f32,
    pub snap: f32,
}

impl Default for Animator {
    fn default() -> Self {
        Self {
            smoothing: 0.35,
            snap: 0.5,
        }
    }
}

impl Animator {
    /// Ticks every container; returns whether anything moved so the caller
    /// can skip the repaint when the panel is at rest.
    pub fn tick(&self, containers: &mut [Container], m: &Metrics) -> bool {
        let mut moved = false;
        for container in containers.iter_mut() {
            moved |= self.tick_container(container, m);
        }
        moved
    }

    fn tick_container(&self, container: &mut Container, m: &Metrics) -> bool {
        container.reorder_buttons(m);
        let mut moved = false;
        for button in &mut container.buttons {
            if button.captured {
                continue;
            }
            let (left, l) = self.step(button.rect.min.x, button.target.min.x);
            let (top, t) = self.step(button.rect.min.y, button.target.min.y);
            let (width, w) = self.step(button.rect.width(), button.target.width());
            let height = button.target.height();
            let changed = l || t || w || button.rect.height() != height;
            button.rect = egui::Rect::from_min_size(
                egui::pos2(left, top),
                egui::vec2(width, height),
            );
            moved |= changed;
        }
        moved
    }

    fn step(&self, current: f32, target: f32) -> (f32, bool) {
        let delta = target - current;
        if delta == 0.0 {
            (current, false)
        } else if delta.abs() < self.snap {
            (target, true)
        } else {
            (current + delta * self.smoothing, true)
        }
    }
}

/// Eases container heights between the collapsed header and the shared
/// expanded target, a fixed pixel step per tick clamped at the target.
pub struct HeightAnimator {
    pub step: f32,
}

impl Default for HeightAnimator {
    fn default() -> Self {
        Self { step: 14.0 }
    }
}

impl HeightAnimator {
    /// Expanded height budget: everything left after the non-selected
    /// containers' collapsed headers and the footer.
    pub fn expanded_height(
        &self,
        available: f32,
        collapsed_count: usize,
        footer: f32,
        m: &Metrics,
    ) -> f32 {
        (available - collapsed_count as f32 * m.header_height - footer).max(m.header_height)
    }

    /// Steps every container toward its target height. Returns false once no
    /// height differs from its target, which halts the animation.
    pub fn tick(&self, panel: &mut Panel, available: f32, footer: f32, m: &Metrics) -> bool {
        let collapsed_count = panel.containers.len().saturating_sub(1);
        let expanded = self.expanded_height(available, collapsed_count, footer, m);
        let selected = panel.selected();
        let mut animating = false;

        for (i, container) in panel.containers.iter_mut().enumerate() {
            let target = if i == selected {
                expanded
            } else {
                m.header_height
            };
            let delta = target - container.height;
            if delta == 0.0 {
                continue;
            }
            if delta.abs() <= self.step {
                container.height = target;
            } else {
                container.height += self.step.copysign(delta);
            }
            animating = true;
        }
        animating
    }
}
