//! Widget painting: translucent rounded background, traffic bars and labels

use egui::{Align2, Color32, CornerRadius, Mesh, Painter, Pos2, Rect, Shape, Stroke, StrokeKind, pos2, vec2};

use super::constants::*;
use super::fonts::label_font_id;
use crate::constants::font::MIN_SIZE;
use crate::state::Frame;

/// One traffic bar: the outlined track and the filled part inside it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub track: Rect,
    pub fill: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Fills left to right, gradient dark to light
    Horizontal,
    /// Fills bottom to top, gradient light (top) to dark (bottom)
    Vertical,
}

/// Horizontal download/upload bars for the full layout
pub fn full_bars(rect: Rect, download: f32, upload: f32) -> [Bar; 2] {
    let width = rect.width() - 2.0 * FULL_BAR_INSET;
    let bar = |top: f32, ratio: f32| {
        let min = pos2(rect.left() + FULL_BAR_INSET, rect.top() + top);
        Bar {
            track: Rect::from_min_size(min, vec2(width, FULL_BAR_HEIGHT)),
            fill: Rect::from_min_size(min, vec2(width * ratio.clamp(0.0, 1.0), FULL_BAR_HEIGHT)),
        }
    };
    [bar(DOWNLOAD_BAR_TOP, download), bar(UPLOAD_BAR_TOP, upload)]
}

/// Vertical download/upload bars, centered, for the compact layout
pub fn compact_bars(rect: Rect, download: f32, upload: f32) -> [Bar; 2] {
    let max_height = rect.height() - COMPACT_BAR_PADDING;
    let total_width = 2.0 * COMPACT_BAR_WIDTH + COMPACT_BAR_SPACING;
    let start_x = rect.left() + ((rect.width() - total_width) / 2.0).floor();
    let base_y = rect.bottom() - COMPACT_BAR_BASE_OFFSET;

    let bar = |left: f32, ratio: f32| {
        let height = max_height * ratio.clamp(0.0, 1.0);
        Bar {
            track: Rect::from_min_size(pos2(left, base_y - max_height), vec2(COMPACT_BAR_WIDTH, max_height)),
            fill: Rect::from_min_size(pos2(left, base_y - height), vec2(COMPACT_BAR_WIDTH, height)),
        }
    };
    [
        bar(start_x, download),
        bar(start_x + COMPACT_BAR_WIDTH + COMPACT_BAR_SPACING, upload),
    ]
}

/// Label size shrinking as the window morphs toward compact
pub fn label_font_size(font_size: f32, mode_progress: f32) -> f32 {
    (font_size * (1.0 - mode_progress * LABEL_SHRINK)).floor().max(MIN_SIZE)
}

/// Paint one complete frame of the widget into `rect`
pub fn paint_widget(painter: &Painter, rect: Rect, frame: &Frame) {
    let tint = |color: Color32| color.gamma_multiply(frame.opacity);

    painter.rect(
        rect.shrink(OUTLINE_WIDTH / 2.0),
        CornerRadius::same(BACKGROUND_RADIUS),
        tint(BACKGROUND),
        Stroke::new(OUTLINE_WIDTH, tint(OUTLINE)),
        StrokeKind::Inside,
    );

    if frame.uses_compact_layout() {
        let [download, upload] = compact_bars(rect, frame.download_anim, frame.upload_anim);
        paint_bar(painter, download, COMPACT_BAR_RADIUS, DOWNLOAD_DARK, DOWNLOAD_LIGHT, Direction::Vertical, &tint);
        paint_bar(painter, upload, COMPACT_BAR_RADIUS, UPLOAD_DARK, UPLOAD_LIGHT, Direction::Vertical, &tint);
        return;
    }

    let [download, upload] = full_bars(rect, frame.download_anim, frame.upload_anim);
    paint_bar(painter, download, FULL_BAR_RADIUS, DOWNLOAD_DARK, DOWNLOAD_LIGHT, Direction::Horizontal, &tint);
    paint_bar(painter, upload, FULL_BAR_RADIUS, UPLOAD_DARK, UPLOAD_LIGHT, Direction::Horizontal, &tint);

    let label_alpha = 1.0 - frame.mode_progress;
    let size = label_font_size(frame.font_size, frame.mode_progress);
    let baseline = rect.top() + LABEL_BASELINE;
    paint_label(
        painter,
        pos2(rect.left() + FULL_BAR_INSET, baseline),
        &frame.download_label(),
        size,
        tint(DOWNLOAD_TEXT.gamma_multiply(label_alpha)),
    );
    paint_label(
        painter,
        pos2(rect.left() + FULL_BAR_INSET + (rect.width() / 2.0).floor(), baseline),
        &frame.upload_label(),
        size,
        tint(UPLOAD_TEXT.gamma_multiply(label_alpha)),
    );
}

/// Draw one speed label with its bottom-left corner at `anchor`
pub fn paint_label(painter: &Painter, anchor: Pos2, text: &str, size: f32, color: Color32) -> Rect {
    painter.text(anchor, Align2::LEFT_BOTTOM, text, label_font_id(size), color)
}

fn paint_bar(
    painter: &Painter,
    bar: Bar,
    radius: u8,
    dark: Color32,
    light: Color32,
    direction: Direction,
    tint: &dyn Fn(Color32) -> Color32,
) {
    painter.rect_stroke(
        bar.track,
        CornerRadius::same(radius),
        Stroke::new(OUTLINE_WIDTH, tint(OUTLINE)),
        StrokeKind::Inside,
    );

    let (start, end) = match direction {
        Direction::Horizontal => (dark, light),
        Direction::Vertical => (light, dark),
    };
    gradient_rect(painter, bar.fill, radius as f32, tint(start), tint(end), direction);
}

/// Rounded rectangle with a linear gradient along `direction`. The
/// rounded ends take the endpoint colors and a mesh spans the middle.
fn gradient_rect(painter: &Painter, rect: Rect, radius: f32, start: Color32, end: Color32, direction: Direction) {
    let (length, thickness) = match direction {
        Direction::Horizontal => (rect.width(), rect.height()),
        Direction::Vertical => (rect.height(), rect.width()),
    };
    if length < 0.5 {
        return;
    }

    let radius = radius.min(thickness / 2.0).min(length / 2.0);
    let corner = CornerRadius::same(radius.round() as u8);
    if length <= 2.0 * radius {
        painter.rect_filled(rect, corner, start);
        return;
    }

    let (start_cap, end_cap, middle) = match direction {
        Direction::Horizontal => (
            Rect::from_min_max(rect.min, pos2(rect.left() + 2.0 * radius, rect.bottom())),
            Rect::from_min_max(pos2(rect.right() - 2.0 * radius, rect.top()), rect.max),
            Rect::from_min_max(pos2(rect.left() + radius, rect.top()), pos2(rect.right() - radius, rect.bottom())),
        ),
        Direction::Vertical => (
            Rect::from_min_max(rect.min, pos2(rect.right(), rect.top() + 2.0 * radius)),
            Rect::from_min_max(pos2(rect.left(), rect.bottom() - 2.0 * radius), rect.max),
            Rect::from_min_max(pos2(rect.left(), rect.top() + radius), pos2(rect.right(), rect.bottom() - radius)),
        ),
    };
    painter.rect_filled(start_cap, corner, start);
    painter.rect_filled(end_cap, corner, end);

    let (top_left, top_right, bottom_left, bottom_right) = match direction {
        Direction::Horizontal => (start, end, start, end),
        Direction::Vertical => (start, start, end, end),
    };
    let mut mesh = Mesh::default();
    mesh.colored_vertex(middle.left_top(), top_left);
    mesh.colored_vertex(middle.right_top(), top_right);
    mesh.colored_vertex(middle.left_bottom(), bottom_left);
    mesh.colored_vertex(middle.right_bottom(), bottom_right);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(2, 1, 3);
    painter.add(Shape::mesh(mesh));
}
