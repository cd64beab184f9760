//! Resize math: turning a handle drag into new element geometry.
//!
//! Every pointer move during a resize recomputes from the geometry captured
//! at drag start, never from the previous frame, so the minimum-size clamp
//! cannot accumulate drift. The flow is two steps: [`resized_bounds`] (or
//! [`resized_bounds_aspect`] for images) maps the drag delta to a new
//! bounding box, then [`apply_resize`] maps the original shape into it.

#[cfg(test)]
#[path = "resize_test.rs"]
mod resize_test;

use crate::consts::MIN_ELEMENT_SIZE;
use crate::element::Shape;
use crate::geometry::Bounds;
use crate::hit::Handle;

/// New bounding box after dragging `handle` by a world-space delta from the
/// start box. Corner handles move both dimensions, edge handles only the
/// perpendicular one. Each dimension is floored at the minimum element size
/// with the dragged side stopping and the opposite side staying anchored.
#[must_use]
pub fn resized_bounds(start: &Bounds, handle: Handle, dx: f64, dy: f64) -> Bounds {
    let mut x = start.x;
    let mut y = start.y;
    let mut width = start.width;
    let mut height = start.height;

    if handle.moves_left() {
        x += dx;
        width -= dx;
    } else if handle.moves_right() {
        width += dx;
    }
    if handle.moves_top() {
        y += dy;
        height -= dy;
    } else if handle.moves_bottom() {
        height += dy;
    }

    if width < MIN_ELEMENT_SIZE {
        if handle.moves_left() {
            x = start.right() - MIN_ELEMENT_SIZE;
        }
        width = MIN_ELEMENT_SIZE;
    }
    if height < MIN_ELEMENT_SIZE {
        if handle.moves_top() {
            y = start.bottom() - MIN_ELEMENT_SIZE;
        }
        height = MIN_ELEMENT_SIZE;
    }

    Bounds::new(x, y, width, height)
}

/// Aspect-locked variant used for image corner handles: the axis with the
/// larger drag magnitude drives, the other dimension follows the original
/// aspect ratio, and the corner opposite the handle stays anchored.
#[must_use]
pub fn resized_bounds_aspect(start: &Bounds, handle: Handle, dx: f64, dy: f64) -> Bounds {
    if !handle.is_corner() || start.width <= 0.0 || start.height <= 0.0 {
        return resized_bounds(start, handle, dx, dy);
    }
    let aspect = start.width / start.height;
    let proposed_w = if handle.moves_left() { start.width - dx } else { start.width + dx };
    let proposed_h = if handle.moves_top() { start.height - dy } else { start.height + dy };

    let (mut width, mut height) = if dx.abs() >= dy.abs() {
        let w = proposed_w.max(MIN_ELEMENT_SIZE);
        (w, w / aspect)
    } else {
        let h = proposed_h.max(MIN_ELEMENT_SIZE);
        (h * aspect, h)
    };
    // Both dimensions respect the floor without breaking the ratio.
    let scale = (MIN_ELEMENT_SIZE / width).max(MIN_ELEMENT_SIZE / height).max(1.0);
    width *= scale;
    height *= scale;

    let x = if handle.moves_left() { start.right() - width } else { start.x };
    let y = if handle.moves_top() { start.bottom() - height } else { start.y };
    Bounds::new(x, y, width, height)
}

fn ratio(value: f64, origin: f64, extent: f64) -> f64 {
    if extent == 0.0 { 0.0 } else { (value - origin) / extent }
}

/// Map the shape captured at drag start into the new bounding box.
#[must_use]
pub fn apply_resize(start_shape: &Shape, start: &Bounds, new: &Bounds) -> Shape {
    match start_shape {
        Shape::Rectangle { .. } => {
            Shape::Rectangle { x: new.x, y: new.y, width: new.width, height: new.height }
        }
        Shape::Ellipse { .. } => {
            Shape::Ellipse { x: new.x, y: new.y, width: new.width, height: new.height }
        }
        Shape::Diamond { .. } => {
            Shape::Diamond { x: new.x, y: new.y, width: new.width, height: new.height }
        }
        Shape::Image { source, .. } => Shape::Image {
            x: new.x,
            y: new.y,
            width: new.width,
            height: new.height,
            source: source.clone(),
        },
        Shape::Circle { .. } => {
            let radius = new.width.max(new.height) / 2.0;
            let c = new.center();
            Shape::Circle { cx: c.x, cy: c.y, radius }
        }
        Shape::Line { x1, y1, x2, y2 } | Shape::Arrow { x1, y1, x2, y2 } => {
            let map_x = |v: f64| new.x + ratio(v, start.x, start.width) * new.width;
            let map_y = |v: f64| new.y + ratio(v, start.y, start.height) * new.height;
            let (nx1, ny1, nx2, ny2) = (map_x(*x1), map_y(*y1), map_x(*x2), map_y(*y2));
            if matches!(start_shape, Shape::Arrow { .. }) {
                Shape::Arrow { x1: nx1, y1: ny1, x2: nx2, y2: ny2 }
            } else {
                Shape::Line { x1: nx1, y1: ny1, x2: nx2, y2: ny2 }
            }
        }
        Shape::Path { points } => Shape::Path {
            points: points
                .iter()
                .map(|p| crate::camera::Point {
                    x: new.x + ratio(p.x, start.x, start.width) * new.width,
                    y: new.y + ratio(p.y, start.y, start.height) * new.height,
                })
                .collect(),
        },
        Shape::Text {
            text, font_size, font_family, bold, italic, underline, strikethrough, ..
        } => {
            let factor = if start.height == 0.0 { 1.0 } else { new.height / start.height };
            Shape::Text {
                x: new.x,
                y: new.bottom(),
                text: text.clone(),
                font_size: font_size * factor,
                font_family: font_family.clone(),
                bold: *bold,
                italic: *italic,
                underline: *underline,
                strikethrough: *strikethrough,
            }
        }
    }
}
