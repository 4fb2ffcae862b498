use std::collections::HashSet;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Stroke, Ui, Vec2, vec2};

use crate::layout::Viewport;
use crate::render::{Click, RenderFrame, Renderer};
use crate::topology::NodeKind;
use crate::util::{format_count, short_label};

use super::super::ViewModel;
use super::super::render_utils::{
    blend_color, direction_color, draw_arrow, draw_background, node_color, with_opacity,
    world_to_screen,
};

const AGENT_RADIUS: f32 = 14.0;
const EXTERNAL_RADIUS: f32 = 11.0;

/// egui implementation of the engine's [`Renderer`]: draws one frame into the
/// remaining space of `ui` and turns primary clicks into [`Click`]s.
pub(in crate::app) struct CanvasRenderer<'a> {
    pub(super) ui: &'a mut Ui,
    pub(super) pan: &'a mut Vec2,
    pub(super) zoom: &'a mut f32,
    search_matches: &'a HashSet<usize>,
    measured: Option<Viewport>,
}

impl Renderer for CanvasRenderer<'_> {
    fn render(&mut self, frame: &RenderFrame<'_>) -> Option<Click> {
        let available = self.ui.available_size();
        let (rect, response) = self.ui.allocate_exact_size(available, Sense::click_and_drag());
        self.measured = Some(Viewport::measured(rect.width(), rect.height()));
        let painter = self.ui.painter_at(rect);

        draw_background(&painter, rect, *self.pan, *self.zoom);
        self.handle_zoom(rect, frame.viewport, &response);
        self.handle_pan(&response);

        if frame.nodes.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No agents or endpoints in this snapshot.",
                FontId::proportional(14.0),
                Color32::from_gray(180),
            );
            return None;
        }

        let pan = *self.pan;
        let zoom = *self.zoom;
        let zoom_sqrt = zoom.sqrt();
        let screen_positions = frame
            .nodes
            .iter()
            .map(|node| world_to_screen(rect, frame.viewport, pan, zoom, node.placed.position()))
            .collect::<Vec<Pos2>>();
        let screen_radii = frame
            .nodes
            .iter()
            .map(|node| {
                let base = match node.placed.node.kind {
                    NodeKind::Agent => AGENT_RADIUS,
                    NodeKind::External => EXTERNAL_RADIUS,
                };
                (base * zoom.powf(0.40)).clamp(4.0, 36.0)
            })
            .collect::<Vec<f32>>();

        let visible = Self::visible_indices(rect, &screen_positions, &screen_radii);
        let hovered = self.hovered_index(&visible, &screen_positions, &screen_radii);
        if hovered.is_some() {
            self.ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        for edge in &frame.edges {
            let color = direction_color(edge.direction);
            let color = if edge.style.emphasis {
                blend_color(color, Color32::WHITE, 0.25)
            } else {
                color
            };
            let width = (edge.style.width * 0.6 * zoom_sqrt).clamp(0.6, 6.0);
            draw_arrow(
                &painter,
                world_to_screen(rect, frame.viewport, pan, zoom, edge.start),
                world_to_screen(rect, frame.viewport, pan, zoom, edge.end),
                screen_radii[edge.from],
                screen_radii[edge.to],
                Stroke::new(width, with_opacity(color, edge.style.opacity)),
            );
        }

        let selection_active = frame.selected.is_some();
        for index in visible.iter().copied() {
            let node = &frame.nodes[index];
            let record = node.placed.node;
            let position = screen_positions[index];
            let radius = screen_radii[index];
            let is_hovered = hovered.is_some_and(|(hovered, _)| hovered == index);
            let is_search_match = !selection_active && self.search_matches.contains(&index);

            let base_color = node_color(record.kind, record.state.as_deref());
            let color = if is_hovered {
                blend_color(base_color, Color32::WHITE, 0.3)
            } else {
                base_color
            };
            painter.circle_filled(position, radius, with_opacity(color, node.opacity));

            if node.selected {
                painter.circle_stroke(
                    position,
                    radius + 4.0,
                    Stroke::new(2.2, Color32::from_rgb(245, 206, 93)),
                );
            } else if is_search_match {
                painter.circle_stroke(
                    position,
                    radius + 3.0,
                    Stroke::new(1.6, Color32::from_rgb(103, 196, 255)),
                );
            }
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(
                    1.0,
                    with_opacity(Color32::from_rgba_unmultiplied(15, 15, 15, 190), node.opacity),
                ),
            );

            if zoom > 0.45 || node.selected || node.related || is_hovered {
                painter.text(
                    position + vec2(0.0, radius + 4.0),
                    Align2::CENTER_TOP,
                    short_label(&record.name, 24),
                    FontId::proportional(12.0),
                    with_opacity(Color32::from_gray(230), node.opacity),
                );
            }
        }

        if let Some((hovered_index, _)) = hovered {
            let record = frame.nodes[hovered_index].placed.node;
            let traffic = frame
                .edges
                .iter()
                .filter(|edge| edge.from == hovered_index || edge.to == hovered_index)
                .map(|edge| edge.message_count)
                .fold(0u64, u64::saturating_add);
            let panel_text = format!(
                "{}  |  {}  |  {} messages",
                record.name,
                record.kind.label(),
                format_count(traffic)
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                panel_text,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if response.clicked_by(egui::PointerButton::Primary) {
            return Some(match hovered {
                Some((index, _)) => Click::Node(frame.nodes[index].placed.node.id.clone()),
                None => Click::Background,
            });
        }

        None
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let search_matches = self.search_matches();
        let mut renderer = CanvasRenderer {
            ui: &mut *ui,
            pan: &mut self.pan,
            zoom: &mut self.zoom,
            search_matches: &search_matches,
            measured: None,
        };
        self.view.paint(&mut renderer);
        let Some(measured) = renderer.measured else {
            return;
        };

        // The first layout ran before the canvas had a size.
        let first_measurement = self.canvas_viewport.is_none();
        self.canvas_viewport = Some(measured);
        if first_measurement && measured != self.view.layout().viewport() {
            self.relayout();
            ui.ctx().request_repaint();
        }
    }
}
