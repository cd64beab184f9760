//! Shared numeric constants for the sketchboard engine.

// ── Camera ──────────────────────────────────────────────────────

/// Lower bound for the camera zoom factor.
pub const ZOOM_MIN: f64 = 0.1;

/// Upper bound for the camera zoom factor.
pub const ZOOM_MAX: f64 = 10.0;

/// Multiplier applied per zoom-in wheel tick.
pub const ZOOM_STEP_IN: f64 = 1.1;

/// Multiplier applied per zoom-out wheel tick.
pub const ZOOM_STEP_OUT: f64 = 0.9;

// ── Geometry ────────────────────────────────────────────────────

/// Minimum element width/height in world units; resizes clamp here.
pub const MIN_ELEMENT_SIZE: f64 = 10.0;

/// Side length of a drawn resize handle, in screen pixels.
pub const HANDLE_SIZE: f64 = 8.0;

/// Side length of a resize handle's hit box, in screen pixels.
pub const HANDLE_HIT_SIZE: f64 = 12.0;

/// Padding between an element's bounds and its selection rectangle, in
/// screen pixels.
pub const SELECTION_PADDING: f64 = 5.0;

// ── Editing ─────────────────────────────────────────────────────

/// Offset applied to duplicated/pasted elements, in world units.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Maximum number of undo snapshots retained.
pub const HISTORY_CAP: usize = 50;

// ── Rendering ───────────────────────────────────────────────────

/// Spacing of background grid lines, in world units.
pub const GRID_SPACING: f64 = 40.0;
