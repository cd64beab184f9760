#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{ZOOM_MAX, ZOOM_MIN, ZOOM_STEP_IN, ZOOM_STEP_OUT};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Camera state for pan/zoom on the infinite canvas.
///
/// `pan_x` / `pan_y` are in CSS pixels. `zoom` is a scale factor
/// (1.0 = no zoom), clamped to `[ZOOM_MIN, ZOOM_MAX]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Pan by a raw screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Zoom one step in (`zoom_in = true`) or out, keeping the world point
    /// under `cursor` (a screen-space point) fixed on screen.
    ///
    /// The step factors are exactly 1.1 and 0.9 so that repeated gestures are
    /// reproducible bit-for-bit.
    pub fn zoom_about(&mut self, cursor: Point, zoom_in: bool) {
        let step = if zoom_in { ZOOM_STEP_IN } else { ZOOM_STEP_OUT };
        let old_zoom = self.zoom;
        let new_zoom = (old_zoom * step).clamp(ZOOM_MIN, ZOOM_MAX);

        // Solve pan' = cursor - (cursor - pan) * zoom'/zoom, so the world
        // point under the cursor projects to the same screen position.
        let ratio = new_zoom / old_zoom;
        self.pan_x = cursor.x - (cursor.x - self.pan_x) * ratio;
        self.pan_y = cursor.y - (cursor.y - self.pan_y) * ratio;
        self.zoom = new_zoom;
    }
}
