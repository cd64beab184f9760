//! World-space bounding boxes and text measurement.
//!
//! Every element reduces to an axis-aligned [`Bounds`] for hit-testing,
//! marquee selection, and resize. Text extents depend on font rendering, so
//! measurement goes through the [`TextMeasure`] trait: native tests use the
//! built-in [`HeuristicMetrics`], while the wasm engine plugs in a provider
//! backed by the 2d context's `measure_text`. Results are memoized in a
//! [`MeasureCache`] keyed by text, size, and family.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::element::Shape;

/// Axis-aligned rectangle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// A copy with non-negative extents, moving the origin as needed.
    #[must_use]
    pub fn normalized(self) -> Self {
        let (x, width) =
            if self.width < 0.0 { (self.x + self.width, -self.width) } else { (self.x, self.width) };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Self { x, y, width, height }
    }

    /// Two corner points as a normalized box.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self { x: a.x, y: a.y, width: b.x - a.x, height: b.y - a.y }.normalized()
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point { x: self.x + self.width / 2.0, y: self.y + self.height / 2.0 }
    }

    /// Whether a point lies inside (edges inclusive).
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Whether another box lies fully inside (edges inclusive).
    #[must_use]
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// A copy grown outward by `pad` on every side.
    #[must_use]
    pub fn expanded(&self, pad: f64) -> Self {
        Self {
            x: self.x - pad,
            y: self.y - pad,
            width: self.width + pad * 2.0,
            height: self.height + pad * 2.0,
        }
    }
}

/// Width and height of a text run, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtent {
    pub width: f64,
    pub height: f64,
}

/// Measures rendered text extents for a given font.
pub trait TextMeasure {
    fn measure(&self, text: &str, font_size: f64, font_family: &str, bold: bool, italic: bool)
    -> TextExtent;
}

/// Character-count heuristic used off-wasm: roughly 0.6em per character and
/// 1.2em line height, which tracks common sans fonts closely enough for
/// bounds and resize math.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicMetrics;

impl TextMeasure for HeuristicMetrics {
    fn measure(
        &self,
        text: &str,
        font_size: f64,
        _font_family: &str,
        bold: bool,
        _italic: bool,
    ) -> TextExtent {
        let per_char = if bold { 0.65 } else { 0.6 };
        let chars = text.chars().count() as f64;
        TextExtent { width: chars * per_char * font_size, height: font_size * 1.2 }
    }
}

/// Memoizing wrapper around a [`TextMeasure`] provider.
pub struct MeasureCache {
    provider: Box<dyn TextMeasure>,
    cache: RefCell<HashMap<(String, u64, String, bool, bool), TextExtent>>,
}

impl Default for MeasureCache {
    fn default() -> Self {
        Self::new(Box::new(HeuristicMetrics))
    }
}

impl MeasureCache {
    #[must_use]
    pub fn new(provider: Box<dyn TextMeasure>) -> Self {
        Self { provider, cache: RefCell::new(HashMap::new()) }
    }

    /// Swap the measurement provider, dropping memoized entries.
    pub fn set_provider(&mut self, provider: Box<dyn TextMeasure>) {
        self.provider = provider;
        self.cache.borrow_mut().clear();
    }

    pub fn measure(
        &self,
        text: &str,
        font_size: f64,
        font_family: &str,
        bold: bool,
        italic: bool,
    ) -> TextExtent {
        let key = (text.to_owned(), font_size.to_bits(), font_family.to_owned(), bold, italic);
        if let Some(hit) = self.cache.borrow().get(&key) {
            return *hit;
        }
        let extent = self.provider.measure(text, font_size, font_family, bold, italic);
        self.cache.borrow_mut().insert(key, extent);
        extent
    }
}

impl std::fmt::Debug for MeasureCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeasureCache").finish_non_exhaustive()
    }
}

/// World-space bounding box of a shape, or `None` when the shape has no
/// extent at all (a path with no points).
#[must_use]
pub fn bounds(shape: &Shape, text: &MeasureCache) -> Option<Bounds> {
    match shape {
        Shape::Path { points } => {
            let first = points.first()?;
            let mut min_x = first.x;
            let mut min_y = first.y;
            let mut max_x = first.x;
            let mut max_y = first.y;
            for p in &points[1..] {
                min_x = min_x.min(p.x);
                min_y = min_y.min(p.y);
                max_x = max_x.max(p.x);
                max_y = max_y.max(p.y);
            }
            Some(Bounds::new(min_x, min_y, max_x - min_x, max_y - min_y))
        }
        Shape::Rectangle { x, y, width, height }
        | Shape::Ellipse { x, y, width, height }
        | Shape::Diamond { x, y, width, height }
        | Shape::Image { x, y, width, height, .. } => {
            Some(Bounds::new(*x, *y, *width, *height).normalized())
        }
        Shape::Circle { cx, cy, radius } => {
            Some(Bounds::new(cx - radius, cy - radius, radius * 2.0, radius * 2.0))
        }
        Shape::Line { x1, y1, x2, y2 } | Shape::Arrow { x1, y1, x2, y2 } => {
            let min_x = x1.min(*x2);
            let min_y = y1.min(*y2);
            Some(Bounds::new(min_x, min_y, x1.max(*x2) - min_x, y1.max(*y2) - min_y))
        }
        Shape::Text { x, y, text: content, font_size, font_family, bold, italic, .. } => {
            let extent = text.measure(content, *font_size, font_family, *bold, *italic);
            // Anchor is baseline-left; the box extends upward from it.
            Some(Bounds::new(*x, y - extent.height, extent.width, extent.height))
        }
    }
}
