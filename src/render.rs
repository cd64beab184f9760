//! Rendering: draws the full canvas scene to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives read-only views of the engine state and produces pixels — it
//! does not mutate any application state. Shape outlines go through the
//! seeded stylizer in [`crate::rough`], so the same element draws the same
//! strokes every frame.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::collections::HashMap;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::camera::Point;
use crate::consts::{GRID_SPACING, HANDLE_SIZE, SELECTION_PADDING};
use crate::element::{Element, ElementId, Shape};
use crate::engine::EngineCore;
use crate::geometry::{Bounds, bounds};
use crate::hit::Handle;
use crate::input::InputState;
use crate::rough::{Rough, Stroke, options_for};

/// Selection dash segment length in screen pixels.
const SELECTION_DASH_PX: f64 = 4.0;
const SELECTION_COLOR: &str = "#1E90FF";
const GRID_COLOR: &str = "#E9E9E9";
const BACKGROUND_COLOR: &str = "#FCFCF9";

/// Draw the full scene: grid, elements, in-flight draft, and selection UI.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    core: &EngineCore,
    images: &HashMap<ElementId, HtmlImageElement>,
) -> Result<(), JsValue> {
    let camera = core.camera;
    let vw = core.viewport_width;
    let vh = core.viewport_height;

    // Layer 1: clear and set up transforms.
    ctx.set_transform(core.dpr, 0.0, 0.0, core.dpr, 0.0, 0.0)?;
    ctx.set_fill_style_str(BACKGROUND_COLOR);
    ctx.fill_rect(0.0, 0.0, vw, vh);
    ctx.translate(camera.pan_x, camera.pan_y)?;
    ctx.scale(camera.zoom, camera.zoom)?;

    // Layer 2: grid over the visible world rect.
    let top_left = camera.screen_to_world(Point { x: 0.0, y: 0.0 });
    let bottom_right = camera.screen_to_world(Point { x: vw, y: vh });
    draw_grid(ctx, top_left, bottom_right, camera.zoom);

    // Layer 3: elements in z-order (bottom first).
    for element in core.doc.elements() {
        draw_element(ctx, element, images.get(&element.id))?;
    }
    if let InputState::Drawing { draft } = &core.input {
        draw_element(ctx, draft, None)?;
    }

    // Layer 4: selection UI.
    let show_handles = core.doc.selection_len() == 1;
    for element in core.doc.selected() {
        if let Some(b) = bounds(&element.shape, &core.text) {
            let padded = b.expanded(SELECTION_PADDING / camera.zoom);
            draw_selection_box(ctx, &padded, camera.zoom, show_handles)?;
        }
    }
    if let InputState::MarqueeSelecting { start_world, current_world } = core.input {
        let marquee = Bounds::from_corners(start_world, current_world);
        draw_marquee(ctx, &marquee, camera.zoom)?;
    }

    Ok(())
}

// =============================================================
// Grid
// =============================================================

fn draw_grid(ctx: &CanvasRenderingContext2d, top_left: Point, bottom_right: Point, zoom: f64) {
    ctx.set_stroke_style_str(GRID_COLOR);
    ctx.set_line_width(1.0 / zoom);
    ctx.begin_path();
    let mut x = (top_left.x / GRID_SPACING).floor() * GRID_SPACING;
    while x <= bottom_right.x {
        ctx.move_to(x, top_left.y);
        ctx.line_to(x, bottom_right.y);
        x += GRID_SPACING;
    }
    let mut y = (top_left.y / GRID_SPACING).floor() * GRID_SPACING;
    while y <= bottom_right.y {
        ctx.move_to(top_left.x, y);
        ctx.line_to(bottom_right.x, y);
        y += GRID_SPACING;
    }
    ctx.stroke();
}

// =============================================================
// Element dispatch
// =============================================================

fn draw_element(
    ctx: &CanvasRenderingContext2d,
    element: &Element,
    image: Option<&HtmlImageElement>,
) -> Result<(), JsValue> {
    let style = &element.style;
    ctx.save();
    ctx.set_global_alpha(style.opacity);
    ctx.set_stroke_style_str(&style.stroke);
    ctx.set_line_width(style.stroke_width);
    set_dash(ctx, &style.stroke_style.dash_pattern(style.stroke_width))?;

    let mut rough = Rough::new(style.seed);
    let opts = options_for(style.roughness);

    match &element.shape {
        Shape::Path { points } => stroke_polyline(ctx, points),
        Shape::Rectangle { x, y, width, height } => {
            let b = Bounds::new(*x, *y, *width, *height).normalized();
            if style.has_fill() {
                ctx.set_fill_style_str(&style.fill);
                ctx.fill_rect(b.x, b.y, b.width, b.height);
            }
            let origin = Point { x: b.x, y: b.y };
            stroke_all(ctx, &rough.rectangle(origin, b.width, b.height, &opts));
        }
        Shape::Diamond { x, y, width, height } => {
            let b = Bounds::new(*x, *y, *width, *height).normalized();
            if style.has_fill() {
                fill_diamond(ctx, &b, &style.fill);
            }
            let origin = Point { x: b.x, y: b.y };
            stroke_all(ctx, &rough.diamond(origin, b.width, b.height, &opts));
        }
        Shape::Ellipse { x, y, width, height } => {
            let b = Bounds::new(*x, *y, *width, *height).normalized();
            if style.has_fill() {
                fill_ellipse(ctx, b.center(), b.width / 2.0, b.height / 2.0, &style.fill)?;
            }
            stroke_all(ctx, &rough.ellipse(b.center(), b.width, b.height, &opts));
        }
        Shape::Circle { cx, cy, radius } => {
            let center = Point { x: *cx, y: *cy };
            if style.has_fill() {
                fill_ellipse(ctx, center, *radius, *radius, &style.fill)?;
            }
            stroke_all(ctx, &rough.ellipse(center, radius * 2.0, radius * 2.0, &opts));
        }
        Shape::Line { x1, y1, x2, y2 } => {
            let a = Point { x: *x1, y: *y1 };
            let b = Point { x: *x2, y: *y2 };
            stroke_polyline(ctx, &rough.line(a, b, &opts));
            if opts.roughness > 0.0 {
                stroke_polyline(ctx, &rough.line(a, b, &opts));
            }
        }
        Shape::Arrow { x1, y1, x2, y2 } => {
            let a = Point { x: *x1, y: *y1 };
            let b = Point { x: *x2, y: *y2 };
            stroke_all(ctx, &rough.arrow(a, b, &opts));
        }
        Shape::Text { .. } => draw_text(ctx, element)?,
        Shape::Image { x, y, width, height, .. } => {
            draw_image(ctx, image, *x, *y, *width, *height)?;
        }
    }

    ctx.restore();
    Ok(())
}

// =============================================================
// Shape helpers
// =============================================================

fn stroke_polyline(ctx: &CanvasRenderingContext2d, points: &[Point]) {
    if points.len() < 2 {
        return;
    }
    ctx.begin_path();
    ctx.move_to(points[0].x, points[0].y);
    for p in &points[1..] {
        ctx.line_to(p.x, p.y);
    }
    ctx.stroke();
}

fn stroke_all(ctx: &CanvasRenderingContext2d, strokes: &[Stroke]) {
    for stroke in strokes {
        stroke_polyline(ctx, stroke);
    }
}

fn fill_diamond(ctx: &CanvasRenderingContext2d, b: &Bounds, fill: &str) {
    ctx.set_fill_style_str(fill);
    ctx.begin_path();
    ctx.move_to(b.x + b.width / 2.0, b.y);
    ctx.line_to(b.right(), b.y + b.height / 2.0);
    ctx.line_to(b.x + b.width / 2.0, b.bottom());
    ctx.line_to(b.x, b.y + b.height / 2.0);
    ctx.close_path();
    ctx.fill();
}

fn fill_ellipse(
    ctx: &CanvasRenderingContext2d,
    center: Point,
    rx: f64,
    ry: f64,
    fill: &str,
) -> Result<(), JsValue> {
    if rx <= 0.0 || ry <= 0.0 {
        return Ok(());
    }
    ctx.set_fill_style_str(fill);
    ctx.begin_path();
    ctx.ellipse(center.x, center.y, rx, ry, 0.0, 0.0, 2.0 * std::f64::consts::PI)?;
    ctx.fill();
    Ok(())
}

fn draw_image(
    ctx: &CanvasRenderingContext2d,
    image: Option<&HtmlImageElement>,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Result<(), JsValue> {
    match image {
        // Skip until the bitmap is decoded; the next frame picks it up.
        Some(img) if img.complete() => {
            ctx.draw_image_with_html_image_element_and_dw_and_dh(img, x, y, width, height)
        }
        _ => {
            ctx.set_fill_style_str("#EEEEEE");
            ctx.fill_rect(x, y, width, height);
            Ok(())
        }
    }
}

// =============================================================
// Text
// =============================================================

/// CSS font shorthand for a text element. Shared with measurement so drawn
/// and measured extents agree.
#[must_use]
pub fn font_string(font_size: f64, font_family: &str, bold: bool, italic: bool) -> String {
    let mut out = String::new();
    if italic {
        out.push_str("italic ");
    }
    if bold {
        out.push_str("bold ");
    }
    out.push_str(&format!("{font_size}px {font_family}"));
    out
}

fn draw_text(ctx: &CanvasRenderingContext2d, element: &Element) -> Result<(), JsValue> {
    let Shape::Text {
        x, y, text, font_size, font_family, bold, italic, underline, strikethrough,
    } = &element.shape
    else {
        return Ok(());
    };
    ctx.set_fill_style_str(&element.style.stroke);
    ctx.set_text_align("left");
    ctx.set_text_baseline("alphabetic");
    ctx.set_font(&font_string(*font_size, font_family, *bold, *italic));
    ctx.fill_text(text, *x, *y)?;

    if *underline || *strikethrough {
        let width = match ctx.measure_text(text) {
            Ok(metrics) => metrics.width(),
            Err(_) => return Ok(()),
        };
        ctx.set_line_width((font_size / 16.0).max(1.0));
        set_dash(ctx, &[])?;
        if *underline {
            let line_y = y + font_size * 0.1;
            ctx.begin_path();
            ctx.move_to(*x, line_y);
            ctx.line_to(x + width, line_y);
            ctx.stroke();
        }
        if *strikethrough {
            let line_y = y - font_size * 0.3;
            ctx.begin_path();
            ctx.move_to(*x, line_y);
            ctx.line_to(x + width, line_y);
            ctx.stroke();
        }
    }
    Ok(())
}

// =============================================================
// Selection UI
// =============================================================

fn draw_selection_box(
    ctx: &CanvasRenderingContext2d,
    padded: &Bounds,
    zoom: f64,
    show_handles: bool,
) -> Result<(), JsValue> {
    ctx.save();
    let dash_world = SELECTION_DASH_PX / zoom;
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.0 / zoom);
    set_dash(ctx, &[dash_world, dash_world])?;
    ctx.stroke_rect(padded.x, padded.y, padded.width, padded.height);
    set_dash(ctx, &[])?;

    if show_handles {
        let size = HANDLE_SIZE / zoom;
        ctx.set_fill_style_str("#fff");
        for handle in Handle::ALL {
            let c = handle.position(padded);
            ctx.fill_rect(c.x - size / 2.0, c.y - size / 2.0, size, size);
            ctx.stroke_rect(c.x - size / 2.0, c.y - size / 2.0, size, size);
        }
    }
    ctx.restore();
    Ok(())
}

fn draw_marquee(ctx: &CanvasRenderingContext2d, marquee: &Bounds, zoom: f64) -> Result<(), JsValue> {
    ctx.save();
    let dash_world = SELECTION_DASH_PX / zoom;
    set_dash(ctx, &[dash_world, dash_world])?;
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_fill_style_str("rgba(30, 144, 255, 0.12)");
    ctx.set_line_width(1.0 / zoom);
    ctx.fill_rect(marquee.x, marquee.y, marquee.width, marquee.height);
    ctx.stroke_rect(marquee.x, marquee.y, marquee.width, marquee.height);
    set_dash(ctx, &[])?;
    ctx.restore();
    Ok(())
}

// =============================================================
// Helpers
// =============================================================

fn set_dash(ctx: &CanvasRenderingContext2d, pattern: &[f64]) -> Result<(), JsValue> {
    let array = js_sys::Array::new();
    for segment in pattern {
        array.push(&JsValue::from_f64(*segment));
    }
    ctx.set_line_dash(&array)
}
