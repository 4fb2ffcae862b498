use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use crate::layout::Viewport;
use crate::topology::{EdgeDirection, NodeKind};

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    Color32::from_rgba_unmultiplied(r, g, b, (a as f32 * opacity.clamp(0.0, 1.0)) as u8)
}

pub(super) fn node_color(kind: NodeKind, state: Option<&str>) -> Color32 {
    if kind == NodeKind::External {
        return Color32::from_rgb(139, 148, 158);
    }

    match state.map(str::to_ascii_lowercase).as_deref() {
        Some("active" | "running" | "online") => Color32::from_rgb(86, 196, 120),
        Some("idle" | "paused" | "waiting") => Color32::from_rgb(232, 180, 76),
        Some("error" | "failed" | "offline") => Color32::from_rgb(229, 96, 88),
        _ => Color32::from_rgb(92, 156, 236),
    }
}

pub(super) fn direction_color(direction: EdgeDirection) -> Color32 {
    match direction {
        EdgeDirection::Internal => Color32::from_rgb(96, 165, 250),
        EdgeDirection::ExternalOutbound => Color32::from_rgb(251, 146, 60),
        EdgeDirection::ExternalInbound => Color32::from_rgb(167, 139, 250),
    }
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (48.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;

    let mut x = origin.x.rem_euclid(step);
    while x < rect.right() {
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        x += step;
    }

    let mut y = origin.y.rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        y += step;
    }
}

/// Line from `start` to `end` with a small head at `end`, both pulled back by
/// the node radii so the head sits on the target's rim.
pub(super) fn draw_arrow(
    painter: &Painter,
    start: Pos2,
    end: Pos2,
    start_radius: f32,
    end_radius: f32,
    stroke: Stroke,
) {
    let delta = end - start;
    let length = delta.length();
    if length <= start_radius + end_radius + 1.0 {
        return;
    }

    let direction = delta / length;
    let from = start + direction * start_radius;
    let tip = end - direction * end_radius;
    painter.line_segment([from, tip], stroke);

    let head = (4.0 + stroke.width * 1.5).min(length * 0.3);
    let normal = Vec2::new(-direction.y, direction.x);
    let base = tip - direction * head;
    painter.line_segment([tip, base + normal * head * 0.55], stroke);
    painter.line_segment([tip, base - normal * head * 0.55], stroke);
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

/// Layout coordinates are viewport pixels; the viewport center maps to the
/// canvas center, then pan and zoom apply.
pub(super) fn world_to_screen(
    rect: Rect,
    viewport: Viewport,
    pan: Vec2,
    zoom: f32,
    world: Vec2,
) -> Pos2 {
    rect.center() + pan + (world - viewport.center()) * zoom
}

pub(super) fn screen_to_world(
    rect: Rect,
    viewport: Viewport,
    pan: Vec2,
    zoom: f32,
    screen: Pos2,
) -> Vec2 {
    viewport.center() + (screen - rect.center() - pan) / zoom
}
