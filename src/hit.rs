//! Hit-testing: elements under the pointer and resize handles.
//!
//! Element hit-testing is bounding-box containment. That deliberately traps
//! clicks inside the visual bounds of hollow or curved shapes, which keeps
//! thin strokes easy to grab; outline-distance testing is not worth the cost
//! at this interaction scale.
//!
//! Handles are the eight squares on the padded selection box. Their order is
//! fixed so the render pass and the hit pass always agree.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::element::Element;
use crate::geometry::{Bounds, MeasureCache, bounds};

/// One of the eight resize handles, named by compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handle {
    Nw,
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
}

impl Handle {
    /// All handles in render/hit order.
    pub const ALL: [Handle; 8] =
        [Self::Nw, Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W];

    /// Whether this handle sits on a corner (affects both dimensions).
    #[must_use]
    pub fn is_corner(self) -> bool {
        matches!(self, Self::Nw | Self::Ne | Self::Se | Self::Sw)
    }

    /// Whether this handle moves the left edge.
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::Nw | Self::W | Self::Sw)
    }

    /// Whether this handle moves the right edge.
    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::Ne | Self::E | Self::Se)
    }

    /// Whether this handle moves the top edge.
    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::Nw | Self::N | Self::Ne)
    }

    /// Whether this handle moves the bottom edge.
    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::Sw | Self::S | Self::Se)
    }

    /// CSS cursor name while hovering or dragging this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Nw | Self::Se => "nwse-resize",
            Self::Ne | Self::Sw => "nesw-resize",
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
        }
    }

    /// Center of this handle on the given selection box.
    #[must_use]
    pub fn position(self, b: &Bounds) -> Point {
        let cx = b.x + b.width / 2.0;
        let cy = b.y + b.height / 2.0;
        match self {
            Self::Nw => Point { x: b.x, y: b.y },
            Self::N => Point { x: cx, y: b.y },
            Self::Ne => Point { x: b.right(), y: b.y },
            Self::E => Point { x: b.right(), y: cy },
            Self::Se => Point { x: b.right(), y: b.bottom() },
            Self::S => Point { x: cx, y: b.bottom() },
            Self::Sw => Point { x: b.x, y: b.bottom() },
            Self::W => Point { x: b.x, y: cy },
        }
    }
}

/// Whether a world-space point falls inside an element's bounding box.
#[must_use]
pub fn contains_point(element: &Element, p: Point, text: &MeasureCache) -> bool {
    bounds(&element.shape, text).is_some_and(|b| b.contains(p))
}

/// Topmost element whose bounding box contains the point. Elements later in
/// the slice render on top, so the scan runs back to front.
#[must_use]
pub fn topmost_at<'a>(
    elements: &'a [Element],
    p: Point,
    text: &MeasureCache,
) -> Option<&'a Element> {
    elements.iter().rev().find(|e| contains_point(e, p, text))
}

/// Handle under a world-space point on the given selection box, if any.
/// `hit_size` is the full edge length of each handle's hit square.
#[must_use]
pub fn handle_at_point(selection_box: &Bounds, p: Point, hit_size: f64) -> Option<Handle> {
    let half = hit_size / 2.0;
    Handle::ALL.into_iter().find(|h| {
        let c = h.position(selection_box);
        (p.x - c.x).abs() <= half && (p.y - c.y).abs() <= half
    })
}
