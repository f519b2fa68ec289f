use crate::button::Button;
use eframe::egui;

/// Session-immutable style metrics consumed by the layout engines and the
/// animators. Supplied by the style provider, never mutated by the core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub header_height: f32,
    pub button_height: f32,
    pub button_width: f32,
    pub v_gap: f32,
    pub h_gap: f32,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            header_height: 26.0,
            button_height: 36.0,
            button_width: 140.0,
            v_gap: 1.0,
            h_gap: 4.0,
        }
    }
}

/// Pure geometry strategy: converts (order, index) into screen rectangles.
///
/// All three operations are pure functions of the same inputs and must agree
/// with each other: summing `slot` heights and gaps along the placement
/// traversal yields `content_height`, and `index_at` inverts `slot`.
/// Out-of-range indices clamp instead of panicking; these paths run on every
/// animation tick and must never interrupt the render loop.
pub trait LayoutEngine {
    fn slot(
        &self,
        index: usize,
        scroll: f32,
        width: f32,
        buttons: &[Button],
        m: &Metrics,
    ) -> egui::Rect;

    /// Total scrollable content extent: header offset plus one trailing gap
    /// per item. Header height only when there are no buttons.
    fn content_height(&self, buttons: &[Button], width: f32, m: &Metrics) -> f32;

    /// Slot under `point` (container-local; engines apply `scroll` to slot
    /// positions). Boundary ties resolve to the earlier index.
    fn index_at(
        &self,
        point: egui::Pos2,
        scroll: f32,
        width: f32,
        buttons: &[Button],
        m: &Metrics,
    ) -> usize;
}

/// Single column, each button spans the full container width.
pub struct ListEngine;

impl LayoutEngine for ListEngine {
    fn slot(
        &self,
        index: usize,
        scroll: f32,
        width: f32,
        buttons: &[Button],
        m: &Metrics,
    ) -> egui::Rect {
        let mut y = m.header_height + scroll;
        for (i, button) in buttons.iter().enumerate() {
            let h = button.height_or(m.button_height);
            if i == index {
                return egui::Rect::from_min_size(egui::pos2(0.0, y), egui::vec2(width, h));
            }
            y += h + m.v_gap;
        }
        egui::Rect::from_min_size(egui::pos2(0.0, y), egui::vec2(width, m.button_height))
    }

    fn content_height(&self, buttons: &[Button], _width: f32, m: &Metrics) -> f32 {
        let mut total = m.header_height;
        for button in buttons {
            total += button.height_or(m.button_height) + m.v_gap;
        }
        total
    }

    fn index_at(
        &self,
        point: egui::Pos2,
        scroll: f32,
        _width: f32,
        buttons: &[Button],
        m: &Metrics,
    ) -> usize {
        if buttons.len() <= 1 {
            return 0;
        }
        let mut y = m.header_height + scroll;
        for (i, button) in buttons.iter().enumerate() {
            let h = button.height_or(m.button_height);
            if point.y <= y + h * 0.5 {
                return i;
            }
            y += h + m.v_gap;
        }
        buttons.len() - 1
    }
}

/// Multi-column grid. A separator force-closes the current row (even when
/// partially filled), takes a full-width row by itself, and the next button
/// starts a fresh row at column 0. Grid cells use the theme button height;
/// only separators honor their own fixed height.
pub struct GridEngine;

impl GridEngine {
    pub fn columns(width: f32, m: &Metrics) -> usize {
        ((width / (m.button_width + m.h_gap)).floor() as usize).max(1)
    }

    fn cell_width(width: f32, columns: usize, m: &Metrics) -> f32 {
        ((width - m.h_gap * (columns as f32 + 1.0)) / columns as f32).max(1.0)
    }
}

impl LayoutEngine for GridEngine {
    fn slot(
        &self,
        index: usize,
        scroll: f32,
        width: f32,
        buttons: &[Button],
        m: &Metrics,
    ) -> egui::Rect {
        let columns = Self::columns(width, m);
        let cell_w = Self::cell_width(width, columns, m);
        let mut col = 0usize;
        let mut y = m.header_height + scroll;

        for (i, button) in buttons.iter().enumerate() {
            if button.is_separator() {
                if col > 0 {
                    y += m.button_height + m.v_gap;
                    col = 0;
                }
                let h = button.height_or(m.button_height);
                if i == index {
                    return egui::Rect::from_min_size(
                        egui::pos2(m.h_gap, y),
                        egui::vec2(width - m.h_gap * 2.0, h),
                    );
                }
                y += h + m.v_gap;
            } else {
                let x = m.h_gap + col as f32 * (cell_w + m.h_gap);
                if i == index {
                    return egui::Rect::from_min_size(
                        egui::pos2(x, y),
                        egui::vec2(cell_w, m.button_height),
                    );
                }
                col += 1;
                if col == columns {
                    col = 0;
                    y += m.button_height + m.v_gap;
                }
            }
        }

        egui::Rect::from_min_size(egui::pos2(m.h_gap, y), egui::vec2(cell_w, m.button_height))
    }

    fn content_height(&self, buttons: &[Button], width: f32, m: &Metrics) -> f32 {
        let columns = Self::columns(width, m);
        let mut col = 0usize;
        let mut total = m.header_height;

        for button in buttons {
            if button.is_separator() {
                if col > 0 {
                    total += m.button_height + m.v_gap;
                    col = 0;
                }
                total += button.height_or(m.button_height) + m.v_gap;
            } else {
                col += 1;
                if col == columns {
                    col = 0;
                    total += m.button_height + m.v_gap;
                }
            }
        }
        if col > 0 {
            total += m.button_height + m.v_gap;
        }
        total
    }

    fn index_at(
        &self,
        point: egui::Pos2,
        scroll: f32,
        width: f32,
        buttons: &[Button],
        m: &Metrics,
    ) -> usize {
        if buttons.len() <= 1 {
            return 0;
        }
        let columns = Self::columns(width, m);
        let cell_w = Self::cell_width(width, columns, m);
        let mut col = 0usize;
        let mut y = m.header_height + scroll;

        for (i, button) in buttons.iter().enumerate() {
            if button.is_separator() {
                if col > 0 {
                    y += m.button_height + m.v_gap;
                    col = 0;
                }
                let h = button.height_or(m.button_height);
                if point.y <= y + h {
                    return i;
                }
                y += h + m.v_gap;
            } else {
                let x = m.h_gap + col as f32 * (cell_w + m.h_gap);
                if point.y <= y + m.button_height && point.x <= x + cell_w {
                    return i;
                }
                col += 1;
                if col == columns {
                    col = 0;
                    y += m.button_height + m.v_gap;
                }
            }
        }
        buttons.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::LaunchItem;

    fn button(name: &str) -> Button {
        Button::new(LaunchItem::from_target(
            name.to_string(),
            format!(r"C:\Apps\{name}.exe"),
        ))
    }

    fn separator() -> Button {
        Button::new(LaunchItem::separator())
    }

    fn metrics() -> Metrics {
        Metrics {
            header_height: 26.0,
            button_height: 36.0,
            button_width: 140.0,
            v_gap: 1.0,
            h_gap: 4.0,
        }
    }

    #[test]
    fn list_slot_matches_documented_scenario() {
        let buttons = vec![button("A"), button("B"), button("C")];
        let m = metrics();
        let engine = ListEngine;

        let slot = engine.slot(1, 0.0, 200.0, &buttons, &m);
        assert_eq!(slot.min.y, 63.0);
        assert_eq!(slot.width(), 200.0);
        assert_eq!(engine.content_height(&buttons, 200.0, &m), 137.0);
    }

    #[test]
    fn list_heights_and_gaps_sum_to_content_height() {
        let mut buttons = vec![button("A"), button("B"), separator(), button("C")];
        buttons[1].item.height = 52.0;
        let m = metrics();
        let engine = ListEngine;

        let mut total = m.header_height;
        for i in 0..buttons.len() {
            total += engine.slot(i, 0.0, 300.0, &buttons, &m).height() + m.v_gap;
        }
        assert_eq!(total, engine.content_height(&buttons, 300.0, &m));
    }

    #[test]
    fn list_hit_test_inverts_slot() {
        let mut buttons = vec![button("A"), button("B"), button("C"), button("D")];
        buttons[2].item.height = 60.0;
        let m = metrics();
        let engine = ListEngine;

        for i in 0..buttons.len() {
            let slot = engine.slot(i, 0.0, 200.0, &buttons, &m);
            assert_eq!(engine.index_at(slot.min, 0.0, 200.0, &buttons, &m), i);
        }
    }

    #[test]
    fn list_hit_test_degenerates_to_slot_zero() {
        let m = metrics();
        let engine = ListEngine;
        let one = vec![button("A")];
        assert_eq!(
            engine.index_at(egui::pos2(10.0, 500.0), 0.0, 200.0, &one, &m),
            0
        );
        assert_eq!(engine.index_at(egui::pos2(0.0, 0.0), 0.0, 200.0, &[], &m), 0);
    }

    #[test]
    fn list_hit_test_clamps_below_last_midpoint() {
        let buttons = vec![button("A"), button("B")];
        let m = metrics();
        let engine = ListEngine;
        assert_eq!(
            engine.index_at(egui::pos2(10.0, 9999.0), 0.0, 200.0, &buttons, &m),
            1
        );
    }

    #[test]
    fn empty_container_content_is_header_only() {
        let m = metrics();
        assert_eq!(ListEngine.content_height(&[], 200.0, &m), m.header_height);
        assert_eq!(GridEngine.content_height(&[], 200.0, &m), m.header_height);
    }

    #[test]
    fn grid_column_count_never_drops_below_one() {
        let m = metrics();
        assert_eq!(GridEngine::columns(10.0, &m), 1);
        assert_eq!(GridEngine::columns(300.0, &m), 2);
        assert_eq!(GridEngine::columns(450.0, &m), 3);
    }

    #[test]
    fn grid_separator_closes_a_partial_row() {
        // Three columns, one button in row 0, then a separator.
        let buttons = vec![button("A"), separator(), button("B")];
        let m = metrics();
        let engine = GridEngine;
        let width = 450.0;
        assert_eq!(GridEngine::columns(width, &m), 3);

        let row_h = m.button_height + m.v_gap;
        let sep = engine.slot(1, 0.0, width, &buttons, &m);
        assert_eq!(sep.min.y, m.header_height + row_h);
        assert_eq!(sep.width(), width - m.h_gap * 2.0);

        // The next regular button starts a fresh row at column 0.
        let next = engine.slot(2, 0.0, width, &buttons, &m);
        assert_eq!(next.min.y, m.header_height + row_h * 2.0);
        assert_eq!(next.min.x, m.h_gap);
    }

    #[test]
    fn grid_row_advances_at_column_count() {
        let buttons = vec![button("A"), button("B"), button("C")];
        let m = metrics();
        let engine = GridEngine;
        let width = 300.0; // two columns

        let a = engine.slot(0, 0.0, width, &buttons, &m);
        let b = engine.slot(1, 0.0, width, &buttons, &m);
        let c = engine.slot(2, 0.0, width, &buttons, &m);
        assert_eq!(a.min.y, b.min.y);
        assert!(b.min.x > a.min.x);
        assert_eq!(c.min.y, a.min.y + m.button_height + m.v_gap);
        assert_eq!(c.min.x, a.min.x);
    }

    #[test]
    fn grid_hit_test_matches_placement() {
        let buttons = vec![
            button("A"),
            button("B"),
            separator(),
            button("C"),
            button("D"),
        ];
        let m = metrics();
        let engine = GridEngine;
        let width = 300.0;

        for i in 0..buttons.len() {
            let slot = engine.slot(i, 0.0, width, &buttons, &m);
            assert_eq!(
                engine.index_at(slot.center(), 0.0, width, &buttons, &m),
                i,
                "cell {i} should hit-test to itself"
            );
        }
    }

    #[test]
    fn scroll_shifts_slots_vertically() {
        let buttons = vec![button("A"), button("B")];
        let m = metrics();
        let engine = ListEngine;

        let resting = engine.slot(1, 0.0, 200.0, &buttons, &m);
        let scrolled = engine.slot(1, -20.0, 200.0, &buttons, &m);
        assert_eq!(scrolled.min.y, resting.min.y - 20.0);
        assert_eq!(scrolled.min.x, resting.min.x);
    }
}
