//! Element model: the closed set of drawable variants and their shared style.
//!
//! Every element on the canvas is an [`Element`]: a stable id, a [`Shape`]
//! carrying variant-specific geometry in world coordinates, and a [`Style`]
//! carrying the shared stroke/fill attributes. `Shape` is a closed sum type
//! that is matched exhaustively in the geometry, resize, and render modules,
//! so adding a variant is a compile-time-checked change everywhere.
//!
//! Elements serialize to the persisted-document format: the shape variant is
//! flattened with an internal `"type"` tag and style fields sit alongside it.
//! The decoded bitmap for an `Image` element is never part of this model; it
//! lives in the engine's image cache and is rebuilt from `source` on load.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;

/// Unique identifier for a canvas element.
pub type ElementId = Uuid;

/// Sentinel fill value meaning "no fill".
pub const TRANSPARENT: &str = "transparent";

/// Line style for element outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl StrokeStyle {
    /// Dash pattern (on/off lengths in world units) for this style, scaled
    /// by the stroke width. Solid lines have an empty pattern.
    #[must_use]
    pub fn dash_pattern(self, stroke_width: f64) -> Vec<f64> {
        let w = stroke_width.max(1.0);
        match self {
            Self::Solid => Vec::new(),
            Self::Dashed => vec![w * 4.0, w * 2.0],
            Self::Dotted => vec![w, w * 2.0],
        }
    }
}

/// Shared visual attributes carried by every element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Stroke color as a CSS color string.
    pub stroke: String,
    /// Stroke width in world units.
    pub stroke_width: f64,
    /// Fill color as a CSS color string; [`TRANSPARENT`] means no fill.
    pub fill: String,
    /// Opacity in `[0, 1]`, applied to the whole element while drawing it.
    pub opacity: f64,
    /// Hand-drawn jitter magnitude in `[0, 3]`.
    pub roughness: f64,
    /// Outline line style.
    pub stroke_style: StrokeStyle,
    /// Stable random seed so stylization is reproducible across redraws.
    pub seed: u64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke: "#1F1A17".to_owned(),
            stroke_width: 2.0,
            fill: TRANSPARENT.to_owned(),
            opacity: 1.0,
            roughness: 1.0,
            stroke_style: StrokeStyle::Solid,
            seed: 0,
        }
    }
}

impl Style {
    /// Whether the element has a visible fill.
    #[must_use]
    pub fn has_fill(&self) -> bool {
        !self.fill.is_empty() && self.fill != TRANSPARENT
    }
}

/// Variant-specific geometry, all in world coordinates.
///
/// Width/height of the rectangle family may be negative while a drag is in
/// progress; they are normalized on commit and whenever bounds are computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    /// Freehand polyline; needs at least two points to render.
    Path { points: Vec<Point> },
    /// Axis-aligned rectangle.
    Rectangle { x: f64, y: f64, width: f64, height: f64 },
    /// Circle described by center and radius.
    Circle { cx: f64, cy: f64, radius: f64 },
    /// Ellipse inscribed within the bounding box.
    Ellipse { x: f64, y: f64, width: f64, height: f64 },
    /// Diamond (rhombus) with vertices at bounding-box edge midpoints.
    Diamond { x: f64, y: f64, width: f64, height: f64 },
    /// Straight line segment.
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// Line segment with a two-stroke arrowhead at the end point.
    Arrow { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// Text anchored at baseline-left.
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f64,
        font_family: String,
        #[serde(default)]
        bold: bool,
        #[serde(default)]
        italic: bool,
        #[serde(default)]
        underline: bool,
        #[serde(default)]
        strikethrough: bool,
    },
    /// Bitmap referenced by a persisted data URL; the decoded handle is
    /// reconstructed on load and never serialized.
    Image { x: f64, y: f64, width: f64, height: f64, source: String },
}

impl Shape {
    /// Translate every positional field by a world-space delta.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Self::Path { points } => {
                for p in points {
                    p.x += dx;
                    p.y += dy;
                }
            }
            Self::Rectangle { x, y, .. }
            | Self::Ellipse { x, y, .. }
            | Self::Diamond { x, y, .. }
            | Self::Image { x, y, .. }
            | Self::Text { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
            Self::Circle { cx, cy, .. } => {
                *cx += dx;
                *cy += dy;
            }
            Self::Line { x1, y1, x2, y2 } | Self::Arrow { x1, y1, x2, y2 } => {
                *x1 += dx;
                *y1 += dy;
                *x2 += dx;
                *y2 += dy;
            }
        }
    }

    /// Normalize signed width/height so extents are non-negative, moving the
    /// origin as needed. Only the rectangle family carries signed extents.
    pub fn normalize(&mut self) {
        if let Self::Rectangle { x, y, width, height }
        | Self::Ellipse { x, y, width, height }
        | Self::Diamond { x, y, width, height }
        | Self::Image { x, y, width, height, .. } = self
        {
            if *width < 0.0 {
                *x += *width;
                *width = -*width;
            }
            if *height < 0.0 {
                *y += *height;
                *height = -*height;
            }
        }
    }
}

/// A single canvas element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique, stable identifier.
    pub id: ElementId,
    #[serde(flatten)]
    pub shape: Shape,
    #[serde(flatten)]
    pub style: Style,
}

impl Element {
    /// Create an element with a fresh id.
    #[must_use]
    pub fn new(shape: Shape, style: Style) -> Self {
        Self { id: Uuid::new_v4(), shape, style }
    }

    /// Clone this element with a fresh id, offset by a world-space delta.
    /// Used by duplicate and paste.
    #[must_use]
    pub fn cloned_offset(&self, dx: f64, dy: f64) -> Self {
        let mut shape = self.shape.clone();
        shape.translate(dx, dy);
        Self { id: Uuid::new_v4(), shape, style: self.style.clone() }
    }
}
