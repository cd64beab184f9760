//! Input vocabulary: tools, pointer buttons, modifiers, and the interaction
//! state machine the engine steps through between pointer-down and -up.
//!
//! The engine is a pure state machine over these types. Hosts translate raw
//! DOM events into the structs here; nothing in this module touches the DOM.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::element::Element;
use crate::geometry::Bounds;
use crate::hit::Handle;

/// The active tool. Selecting is the default mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Select,
    Hand,
    Pen,
    Rectangle,
    Circle,
    Ellipse,
    Diamond,
    Line,
    Arrow,
    Text,
    Eraser,
}

impl Tool {
    /// Tools that create an element by dragging out its extent.
    #[must_use]
    pub fn is_drawing(self) -> bool {
        matches!(
            self,
            Self::Pen
                | Self::Rectangle
                | Self::Circle
                | Self::Ellipse
                | Self::Diamond
                | Self::Line
                | Self::Arrow
        )
    }
}

/// Pointer button, collapsed to the three the engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

/// Keyboard modifier state accompanying a pointer or key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Scroll deltas in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelDelta {
    pub dx: f64,
    pub dy: f64,
}

/// What the engine is doing between pointer-down and pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    #[default]
    Idle,
    /// Dragging out a new element; the draft is not in the store yet.
    Drawing { draft: Element },
    /// Dragging the viewport. Tracked in screen space so pan speed does not
    /// depend on zoom.
    Panning { last_screen: Point },
    /// Dragging the selection. Tracked in world space, applied incrementally.
    /// `moved` distinguishes a real drag from a plain click so selection
    /// clicks do not pollute the undo history.
    MovingSelection { last_world: Point, moved: bool },
    /// Dragging one resize handle of a single-element selection. The start
    /// snapshot lets every move be computed from the original geometry, so
    /// the minimum-size clamp never accumulates drift.
    ResizingSelection {
        handle: Handle,
        id: crate::element::ElementId,
        start_bounds: Bounds,
        start_shape: Box<crate::element::Shape>,
        start_world: Point,
    },
    /// Dragging a marquee selection box.
    MarqueeSelecting { start_world: Point, current_world: Point },
    /// A text caret is open at this world position; the host owns the
    /// input field and commits or cancels through the engine.
    TextEditing { anchor: Point },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
