use eframe::egui::{self, Pos2, Rect};

use crate::layout::Viewport;

use super::super::render_utils::{circle_visible, screen_to_world};
use super::view::CanvasRenderer;

impl CanvasRenderer<'_> {
    pub(super) fn handle_zoom(&mut self, rect: Rect, viewport: Viewport, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = self.ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = self
            .ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, viewport, *self.pan, *self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        *self.zoom = (*self.zoom * zoom_factor).clamp(0.2, 5.0);
        *self.pan = pointer - rect.center() - ((world_before - viewport.center()) * *self.zoom);
    }

    pub(super) fn handle_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            *self.pan += response.drag_delta();
        }
    }

    pub(super) fn visible_indices(
        rect: Rect,
        screen_positions: &[Pos2],
        screen_radii: &[f32],
    ) -> Vec<usize> {
        (0..screen_positions.len())
            .filter(|&index| circle_visible(rect, screen_positions[index], screen_radii[index]))
            .collect()
    }

    pub(super) fn hovered_index(
        &self,
        visible_indices: &[usize],
        screen_positions: &[Pos2],
        screen_radii: &[f32],
    ) -> Option<(usize, f32)> {
        let pointer_pos = self.ui.input(|input| input.pointer.hover_pos());
        pointer_pos.and_then(|pointer| {
            visible_indices
                .iter()
                .filter_map(|index| {
                    let distance = screen_positions[*index].distance(pointer);
                    if distance <= screen_radii[*index] {
                        Some((*index, distance))
                    } else {
                        None
                    }
                })
                .min_by(|a, b| a.1.total_cmp(&b.1))
        })
    }
}
