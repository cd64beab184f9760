//! The engine: interaction logic, and the browser-facing wrapper.
//!
//! [`EngineCore`] holds everything that does not depend on the DOM: the
//! document, camera, history, clipboard, active tool, and the input state
//! machine. Its handlers take translated events and return [`Action`]s for
//! the host to process, which keeps the whole interaction model natively
//! testable.
//!
//! [`Engine`] wraps the core for the browser: it owns the canvas element,
//! persists through `localStorage`, keeps decoded image handles, and turns
//! actions into renders, cursor changes, and storage flushes.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::camera::{Camera, Point};
use crate::consts::{HANDLE_HIT_SIZE, SELECTION_PADDING};
use crate::doc::ElementStore;
use crate::element::{Element, ElementId, Shape, StrokeStyle, Style};
use crate::geometry::{MeasureCache, TextExtent, TextMeasure, bounds};
use crate::hit;
use crate::history::History;
use crate::input::{Button, InputState, Modifiers, Tool, WheelDelta};
use crate::persist::{self, KEY_CAMERA, KEY_CLIPBOARD, KEY_ELEMENTS, KEY_HISTORY, LocalStorage};
use crate::render;
use crate::resize;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone)]
pub enum Action {
    /// The document changed: persist it and refresh any element listing.
    ElementsChanged,
    /// The clipboard changed: persist it.
    ClipboardChanged,
    /// The camera changed: persist it.
    CameraChanged,
    /// Redraw the canvas.
    RenderNeeded,
    /// Change the pointer cursor.
    SetCursor(String),
    /// Open a text editor overlay at this screen position.
    TextEditRequested { screen: Point },
}

/// The style new elements are created with, owned by the toolbar.
#[derive(Debug, Clone)]
pub struct StyleState {
    pub stroke: String,
    pub fill: String,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    pub opacity: f64,
    pub roughness: f64,
    pub font_size: f64,
    pub font_family: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
}

impl Default for StyleState {
    fn default() -> Self {
        let base = Style::default();
        Self {
            stroke: base.stroke,
            fill: base.fill,
            stroke_width: base.stroke_width,
            stroke_style: base.stroke_style,
            opacity: base.opacity,
            roughness: base.roughness,
            font_size: 24.0,
            font_family: "sans-serif".to_owned(),
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
        }
    }
}

impl StyleState {
    /// Materialize an element style, drawing a fresh stylization seed.
    fn materialize(&self) -> Style {
        Style {
            stroke: self.stroke.clone(),
            stroke_width: self.stroke_width,
            fill: self.fill.clone(),
            opacity: self.opacity,
            roughness: self.roughness,
            stroke_style: self.stroke_style,
            seed: rand::random(),
        }
    }
}

/// Core engine state — all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser
/// dependencies.
pub struct EngineCore {
    pub doc: ElementStore,
    pub camera: Camera,
    pub history: History,
    pub input: InputState,
    pub tool: Tool,
    pub style: StyleState,
    pub clipboard: Vec<Element>,
    pub text: MeasureCache,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
    cursor: String,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            doc: ElementStore::new(),
            camera: Camera::default(),
            history: History::new(),
            input: InputState::default(),
            tool: Tool::default(),
            style: StyleState::default(),
            clipboard: Vec::new(),
            text: MeasureCache::default(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
            cursor: "default".to_owned(),
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    /// Hydrate from persisted state, seeding history from the document when
    /// no history survived.
    pub fn load(
        &mut self,
        elements: Option<Vec<Element>>,
        camera: Option<Camera>,
        history: Option<History>,
        clipboard: Option<Vec<Element>>,
    ) {
        if let Some(elements) = elements {
            self.doc.restore(elements);
        }
        if let Some(camera) = camera {
            self.camera = camera;
        }
        self.history =
            history.unwrap_or_else(|| History::with_baseline(self.doc.snapshot()));
        if let Some(clipboard) = clipboard {
            self.clipboard = clipboard;
        }
    }

    /// Update viewport dimensions and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = dpr;
    }

    /// Set the active tool, discarding any in-flight draft.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.tool = tool;
        let mut actions = Vec::new();
        if matches!(self.input, InputState::Drawing { .. }) {
            self.input = InputState::Idle;
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    // --- Queries ---

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Pointer events ---

    pub fn on_pointer_down(
        &mut self,
        screen: Point,
        button: Button,
        modifiers: Modifiers,
    ) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen);
        let mut actions = Vec::new();

        // A press anywhere abandons an open text caret; the host tears down
        // its editor on the same event.
        if matches!(self.input, InputState::TextEditing { .. }) {
            self.input = InputState::Idle;
        }

        let pans = button == Button::Middle
            || self.tool == Tool::Hand
            || (button == Button::Primary && modifiers.command());
        if pans {
            self.input = InputState::Panning { last_screen: screen };
            self.push_cursor("grabbing", &mut actions);
            return actions;
        }
        if button != Button::Primary {
            return actions;
        }

        // Handle hits and element hits take priority over the active tool:
        // with any tool but the eraser, pressing on an existing element
        // selects and moves it rather than starting a new draft. Only a
        // miss falls through to the per-tool behavior.
        if self.tool != Tool::Eraser {
            if let Some(handle) = self.handle_under(world) {
                // Single selection guaranteed by handle_under.
                if let Some(e) = self.doc.single_selected() {
                    if let Some(b) = bounds(&e.shape, &self.text) {
                        let name = handle.cursor();
                        self.input = InputState::ResizingSelection {
                            handle,
                            id: e.id,
                            start_bounds: b,
                            start_shape: Box::new(e.shape.clone()),
                            start_world: world,
                        };
                        self.push_cursor(name, &mut actions);
                        return actions;
                    }
                }
            }
            if let Some(hit) = self.doc.topmost_at(world, &self.text) {
                let id = hit.id;
                if modifiers.shift {
                    self.doc.toggle_selected(id);
                } else if !self.doc.is_selected(id) {
                    self.doc.select_only(id);
                }
                // A shift-click that deselected leaves nothing to drag.
                if self.doc.is_selected(id) {
                    self.input = InputState::MovingSelection { last_world: world, moved: false };
                    self.push_cursor("move", &mut actions);
                }
                actions.push(Action::RenderNeeded);
                return actions;
            }
        }

        match self.tool {
            Tool::Select => {
                if !modifiers.shift {
                    self.doc.clear_selection();
                }
                self.input =
                    InputState::MarqueeSelecting { start_world: world, current_world: world };
                actions.push(Action::RenderNeeded);
            }
            Tool::Hand => {}
            Tool::Text => {
                self.input = InputState::TextEditing { anchor: world };
                actions.push(Action::TextEditRequested { screen });
            }
            Tool::Eraser => {
                if let Some(hit) = self.doc.topmost_at(world, &self.text) {
                    let id = hit.id;
                    self.doc.remove(id);
                    self.commit_history();
                    actions.push(Action::ElementsChanged);
                    actions.push(Action::RenderNeeded);
                }
            }
            _ => {
                let draft = Element::new(self.draft_shape(world), self.style.materialize());
                self.input = InputState::Drawing { draft };
                actions.push(Action::RenderNeeded);
            }
        }
        actions
    }

    pub fn on_pointer_move(&mut self, screen: Point, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen);
        let mut actions = Vec::new();
        match &mut self.input {
            InputState::Idle | InputState::TextEditing { .. } => {
                let name = self.hover_cursor(world);
                self.push_cursor(name, &mut actions);
            }
            InputState::Panning { last_screen } => {
                let dx = screen.x - last_screen.x;
                let dy = screen.y - last_screen.y;
                *last_screen = screen;
                self.camera.pan_by(dx, dy);
                actions.push(Action::RenderNeeded);
            }
            InputState::MovingSelection { last_world, moved } => {
                let dx = world.x - last_world.x;
                let dy = world.y - last_world.y;
                *last_world = world;
                if dx != 0.0 || dy != 0.0 {
                    *moved = true;
                    self.doc.translate_selected(dx, dy);
                    actions.push(Action::RenderNeeded);
                }
            }
            InputState::ResizingSelection { handle, id, start_bounds, start_shape, start_world } => {
                let handle = *handle;
                let id = *id;
                let start_bounds = *start_bounds;
                let start_world = *start_world;
                let start_shape = (**start_shape).clone();
                let dx = world.x - start_world.x;
                let dy = world.y - start_world.y;
                let new_bounds = if matches!(start_shape, Shape::Image { .. }) {
                    resize::resized_bounds_aspect(&start_bounds, handle, dx, dy)
                } else {
                    resize::resized_bounds(&start_bounds, handle, dx, dy)
                };
                let new_shape = resize::apply_resize(&start_shape, &start_bounds, &new_bounds);
                self.doc.update(id, |e| e.shape = new_shape);
                actions.push(Action::RenderNeeded);
            }
            InputState::MarqueeSelecting { current_world, .. } => {
                *current_world = world;
                actions.push(Action::RenderNeeded);
            }
            InputState::Drawing { draft } => {
                extend_draft(&mut draft.shape, world);
                actions.push(Action::RenderNeeded);
            }
        }
        actions
    }

    pub fn on_pointer_up(
        &mut self,
        screen: Point,
        _button: Button,
        modifiers: Modifiers,
    ) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen);
        let mut actions = Vec::new();
        match std::mem::take(&mut self.input) {
            InputState::Idle => {}
            InputState::TextEditing { anchor } => {
                // Text editing survives pointer-up; the press that opened it
                // is still in flight.
                self.input = InputState::TextEditing { anchor };
            }
            InputState::Panning { .. } => {
                let name = self.hover_cursor(world);
                self.push_cursor(name, &mut actions);
                actions.push(Action::CameraChanged);
            }
            InputState::MovingSelection { moved, .. } => {
                if moved {
                    self.commit_history();
                    actions.push(Action::ElementsChanged);
                }
            }
            InputState::ResizingSelection { .. } => {
                self.commit_history();
                actions.push(Action::ElementsChanged);
                actions.push(Action::RenderNeeded);
            }
            InputState::MarqueeSelecting { start_world, .. } => {
                let marquee = crate::geometry::Bounds::from_corners(start_world, world);
                self.doc.select_contained(&marquee, &self.text, modifiers.shift);
                actions.push(Action::RenderNeeded);
            }
            InputState::Drawing { mut draft } => {
                draft.shape.normalize();
                if draft_is_committable(&draft.shape) {
                    let id = self.doc.add(draft);
                    self.doc.select_only(id);
                    self.commit_history();
                    actions.push(Action::ElementsChanged);
                }
                actions.push(Action::RenderNeeded);
            }
        }
        actions
    }

    pub fn on_wheel(
        &mut self,
        screen: Point,
        delta: WheelDelta,
        _modifiers: Modifiers,
    ) -> Vec<Action> {
        if delta.dy == 0.0 {
            return Vec::new();
        }
        self.camera.zoom_about(screen, delta.dy < 0.0);
        vec![Action::CameraChanged, Action::RenderNeeded]
    }

    // --- Keyboard ---

    pub fn on_key_down(&mut self, key: &str, modifiers: Modifiers) -> Vec<Action> {
        // While a text caret is open the host's editor owns the keyboard.
        if matches!(self.input, InputState::TextEditing { .. }) {
            return Vec::new();
        }
        let lower = key.to_ascii_lowercase();
        if modifiers.command() {
            return match lower.as_str() {
                "z" if modifiers.shift => self.redo(),
                "z" => self.undo(),
                "y" => self.redo(),
                "c" => self.copy_selection(),
                "v" => self.paste_clipboard(),
                "d" => self.duplicate_selection(),
                _ => Vec::new(),
            };
        }
        match key {
            "Delete" | "Backspace" => {
                if self.doc.remove_selected() > 0 {
                    self.commit_history();
                    vec![Action::ElementsChanged, Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            "Escape" => self.cancel_gesture(),
            _ => Vec::new(),
        }
    }

    /// Cancel whatever is in flight: discard a draft or marquee, revert an
    /// uncommitted move or resize, or clear the selection when nothing is
    /// in progress. The camera keeps any pan already applied.
    fn cancel_gesture(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Drawing { .. } | InputState::MarqueeSelecting { .. } => {
                vec![Action::RenderNeeded]
            }
            InputState::MovingSelection { moved, .. } => {
                if moved {
                    // Nothing else mutates the document mid-move, so the
                    // last committed snapshot is the pre-drag state.
                    self.doc.restore(self.history.current().to_vec());
                }
                vec![Action::RenderNeeded]
            }
            InputState::ResizingSelection { id, start_shape, .. } => {
                self.doc.update(id, |e| e.shape = *start_shape);
                vec![Action::RenderNeeded]
            }
            InputState::Panning { .. } => Vec::new(),
            InputState::Idle | InputState::TextEditing { .. } => {
                if self.doc.selection_len() > 0 {
                    self.doc.clear_selection();
                    vec![Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
        }
    }

    // --- Edit commands ---

    pub fn undo(&mut self) -> Vec<Action> {
        match self.history.undo() {
            Some(snapshot) => {
                self.doc.restore(snapshot);
                vec![Action::ElementsChanged, Action::RenderNeeded]
            }
            None => Vec::new(),
        }
    }

    pub fn redo(&mut self) -> Vec<Action> {
        match self.history.redo() {
            Some(snapshot) => {
                self.doc.restore(snapshot);
                vec![Action::ElementsChanged, Action::RenderNeeded]
            }
            None => Vec::new(),
        }
    }

    /// Copy the selection to the internal clipboard.
    pub fn copy_selection(&mut self) -> Vec<Action> {
        let copied: Vec<Element> = self.doc.selected().cloned().collect();
        if copied.is_empty() {
            return Vec::new();
        }
        self.clipboard = copied;
        vec![Action::ClipboardChanged]
    }

    /// Paste the clipboard as fresh elements on top.
    pub fn paste_clipboard(&mut self) -> Vec<Action> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        let source = self.clipboard.clone();
        self.doc.paste(&source);
        self.commit_history();
        vec![Action::ElementsChanged, Action::RenderNeeded]
    }

    /// Duplicate the selection in place with a diagonal offset.
    pub fn duplicate_selection(&mut self) -> Vec<Action> {
        if self.doc.duplicate_selected().is_empty() {
            return Vec::new();
        }
        self.commit_history();
        vec![Action::ElementsChanged, Action::RenderNeeded]
    }

    // --- Text ---

    /// Commit text from the host editor as a new element at the caret
    /// anchor. Whitespace-only input cancels instead.
    pub fn commit_text(&mut self, content: &str) -> Vec<Action> {
        let InputState::TextEditing { anchor } = self.input else {
            return Vec::new();
        };
        self.input = InputState::Idle;
        if content.trim().is_empty() {
            return vec![Action::RenderNeeded];
        }
        let shape = Shape::Text {
            x: anchor.x,
            y: anchor.y,
            text: content.to_owned(),
            font_size: self.style.font_size,
            font_family: self.style.font_family.clone(),
            bold: self.style.bold,
            italic: self.style.italic,
            underline: self.style.underline,
            strikethrough: self.style.strikethrough,
        };
        let id = self.doc.add(Element::new(shape, self.style.materialize()));
        self.doc.select_only(id);
        self.commit_history();
        vec![Action::ElementsChanged, Action::RenderNeeded]
    }

    /// Abandon an open text caret without creating anything.
    pub fn cancel_text(&mut self) -> Vec<Action> {
        if matches!(self.input, InputState::TextEditing { .. }) {
            self.input = InputState::Idle;
        }
        Vec::new()
    }

    // --- Images ---

    /// Insert an image centered in the viewport, scaled down (never up) to
    /// fit within 80% of it.
    pub fn insert_image(&mut self, source: String, natural_w: f64, natural_h: f64) -> Vec<Action> {
        if natural_w <= 0.0 || natural_h <= 0.0 {
            return Vec::new();
        }
        let mut scale = 1.0_f64;
        if self.viewport_width > 0.0 && self.viewport_height > 0.0 {
            let max_w = self.viewport_width * 0.8 / self.camera.zoom;
            let max_h = self.viewport_height * 0.8 / self.camera.zoom;
            scale = (max_w / natural_w).min(max_h / natural_h).min(1.0);
        }
        let width = natural_w * scale;
        let height = natural_h * scale;
        let center = self.camera.screen_to_world(Point {
            x: self.viewport_width / 2.0,
            y: self.viewport_height / 2.0,
        });
        let shape = Shape::Image {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
            source,
        };
        let id = self.doc.add(Element::new(shape, self.style.materialize()));
        self.doc.select_only(id);
        self.commit_history();
        vec![Action::ElementsChanged, Action::RenderNeeded]
    }

    // --- Style ---

    /// Each setter updates the toolbar default and restyles the current
    /// selection; with nothing selected only the default changes.

    pub fn set_stroke_color(&mut self, color: &str) -> Vec<Action> {
        self.style.stroke = color.to_owned();
        self.restyle_selected(|s| s.stroke = color.to_owned())
    }

    pub fn set_fill_color(&mut self, color: &str) -> Vec<Action> {
        self.style.fill = color.to_owned();
        self.restyle_selected(|s| s.fill = color.to_owned())
    }

    pub fn set_stroke_width(&mut self, width: f64) -> Vec<Action> {
        self.style.stroke_width = width;
        self.restyle_selected(|s| s.stroke_width = width)
    }

    pub fn set_stroke_style(&mut self, stroke_style: StrokeStyle) -> Vec<Action> {
        self.style.stroke_style = stroke_style;
        self.restyle_selected(|s| s.stroke_style = stroke_style)
    }

    pub fn set_opacity(&mut self, opacity: f64) -> Vec<Action> {
        let opacity = opacity.clamp(0.0, 1.0);
        self.style.opacity = opacity;
        self.restyle_selected(|s| s.opacity = opacity)
    }

    pub fn set_roughness(&mut self, roughness: f64) -> Vec<Action> {
        let roughness = roughness.clamp(0.0, 3.0);
        self.style.roughness = roughness;
        self.restyle_selected(|s| s.roughness = roughness)
    }

    pub fn set_font_size(&mut self, size: f64) -> Vec<Action> {
        let size = size.max(1.0);
        self.style.font_size = size;
        self.restyle_selected_text(move |shape| {
            if let Shape::Text { font_size, .. } = shape {
                *font_size = size;
            }
        })
    }

    pub fn set_font_family(&mut self, family: &str) -> Vec<Action> {
        self.style.font_family = family.to_owned();
        self.restyle_selected_text(|shape| {
            if let Shape::Text { font_family, .. } = shape {
                *font_family = family.to_owned();
            }
        })
    }

    pub fn set_bold(&mut self, on: bool) -> Vec<Action> {
        self.style.bold = on;
        self.restyle_selected_text(move |shape| {
            if let Shape::Text { bold, .. } = shape {
                *bold = on;
            }
        })
    }

    pub fn set_italic(&mut self, on: bool) -> Vec<Action> {
        self.style.italic = on;
        self.restyle_selected_text(move |shape| {
            if let Shape::Text { italic, .. } = shape {
                *italic = on;
            }
        })
    }

    pub fn set_underline(&mut self, on: bool) -> Vec<Action> {
        self.style.underline = on;
        self.restyle_selected_text(move |shape| {
            if let Shape::Text { underline, .. } = shape {
                *underline = on;
            }
        })
    }

    pub fn set_strikethrough(&mut self, on: bool) -> Vec<Action> {
        self.style.strikethrough = on;
        self.restyle_selected_text(move |shape| {
            if let Shape::Text { strikethrough, .. } = shape {
                *strikethrough = on;
            }
        })
    }

    fn restyle_selected(&mut self, f: impl Fn(&mut Style)) -> Vec<Action> {
        let ids: Vec<ElementId> = self.doc.selected().map(|e| e.id).collect();
        if ids.is_empty() {
            return Vec::new();
        }
        for id in ids {
            self.doc.update(id, |e| f(&mut e.style));
        }
        self.commit_history();
        vec![Action::ElementsChanged, Action::RenderNeeded]
    }

    /// Like [`Self::restyle_selected`] but for attributes that live on the
    /// text variant itself. Only text elements count toward the selection
    /// check, so toggling bold with shapes selected changes the default only.
    fn restyle_selected_text(&mut self, f: impl Fn(&mut Shape)) -> Vec<Action> {
        let ids: Vec<ElementId> = self
            .doc
            .selected()
            .filter(|e| matches!(e.shape, Shape::Text { .. }))
            .map(|e| e.id)
            .collect();
        if ids.is_empty() {
            return Vec::new();
        }
        for id in ids {
            self.doc.update(id, |e| f(&mut e.shape));
        }
        self.commit_history();
        vec![Action::ElementsChanged, Action::RenderNeeded]
    }

    // --- Internals ---

    fn commit_history(&mut self) {
        self.history.record(self.doc.snapshot());
    }

    fn draft_shape(&self, world: Point) -> Shape {
        match self.tool {
            Tool::Pen => Shape::Path { points: vec![world] },
            Tool::Circle => Shape::Circle { cx: world.x, cy: world.y, radius: 0.0 },
            Tool::Ellipse => Shape::Ellipse { x: world.x, y: world.y, width: 0.0, height: 0.0 },
            Tool::Diamond => Shape::Diamond { x: world.x, y: world.y, width: 0.0, height: 0.0 },
            Tool::Line => Shape::Line { x1: world.x, y1: world.y, x2: world.x, y2: world.y },
            Tool::Arrow => Shape::Arrow { x1: world.x, y1: world.y, x2: world.x, y2: world.y },
            _ => Shape::Rectangle { x: world.x, y: world.y, width: 0.0, height: 0.0 },
        }
    }

    /// Resize handle under a world point, only meaningful for a
    /// single-element selection. Handle geometry is screen-constant, so the
    /// paddings shrink in world units as zoom grows.
    fn handle_under(&self, world: Point) -> Option<crate::hit::Handle> {
        let e = self.doc.single_selected()?;
        let b = bounds(&e.shape, &self.text)?;
        let padded = b.expanded(SELECTION_PADDING / self.camera.zoom);
        hit::handle_at_point(&padded, world, HANDLE_HIT_SIZE / self.camera.zoom)
    }

    fn hover_cursor(&self, world: Point) -> &'static str {
        match self.tool {
            Tool::Hand => "grab",
            Tool::Text => "text",
            Tool::Select => {
                if let Some(handle) = self.handle_under(world) {
                    handle.cursor()
                } else if self.doc.topmost_at(world, &self.text).is_some() {
                    "move"
                } else {
                    "default"
                }
            }
            _ => "crosshair",
        }
    }

    fn push_cursor(&mut self, name: &str, out: &mut Vec<Action>) {
        if self.cursor != name {
            self.cursor = name.to_owned();
            out.push(Action::SetCursor(name.to_owned()));
        }
    }
}

/// Grow an in-flight draft to the current pointer position.
fn extend_draft(shape: &mut Shape, world: Point) {
    match shape {
        Shape::Path { points } => points.push(world),
        Shape::Rectangle { x, y, width, height }
        | Shape::Ellipse { x, y, width, height }
        | Shape::Diamond { x, y, width, height } => {
            *width = world.x - *x;
            *height = world.y - *y;
        }
        Shape::Circle { cx, cy, radius } => {
            *radius = ((world.x - *cx).powi(2) + (world.y - *cy).powi(2)).sqrt();
        }
        Shape::Line { x2, y2, .. } | Shape::Arrow { x2, y2, .. } => {
            *x2 = world.x;
            *y2 = world.y;
        }
        // Text and images are never drafted by dragging.
        Shape::Text { .. } | Shape::Image { .. } => {}
    }
}

/// A draft earns a place in the document only once it has real extent.
fn draft_is_committable(shape: &Shape) -> bool {
    match shape {
        Shape::Path { points } => points.len() >= 2,
        Shape::Rectangle { width, height, .. }
        | Shape::Ellipse { width, height, .. }
        | Shape::Diamond { width, height, .. } => *width != 0.0 && *height != 0.0,
        Shape::Circle { radius, .. } => *radius > 0.0,
        Shape::Line { x1, y1, x2, y2 } | Shape::Arrow { x1, y1, x2, y2 } => {
            x1 != x2 || y1 != y2
        }
        Shape::Text { text, .. } => !text.trim().is_empty(),
        Shape::Image { width, height, .. } => *width > 0.0 && *height > 0.0,
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas
/// element, storage, and decoded image handles.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
    storage: Option<LocalStorage>,
    images: HashMap<ElementId, HtmlImageElement>,
}

impl Engine {
    /// Create a new engine bound to the given canvas element, hydrated from
    /// any persisted state.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        let mut core = EngineCore::new();
        let storage = LocalStorage::open();
        if let Some(store) = &storage {
            core.load(
                persist::load(store, KEY_ELEMENTS),
                persist::load(store, KEY_CAMERA),
                persist::load(store, KEY_HISTORY),
                persist::load(store, KEY_CLIPBOARD),
            );
        } else {
            core.load(None, None, None, None);
        }
        if let Some(ctx) = context_2d(&canvas) {
            core.text.set_provider(Box::new(CanvasMeasure { ctx }));
        }
        let mut engine = Self { canvas, core, storage, images: HashMap::new() };
        engine.sync_image_cache();
        engine
    }

    // --- Delegated input events ---

    pub fn on_pointer_down(
        &mut self,
        screen: Point,
        button: Button,
        modifiers: Modifiers,
    ) -> Vec<Action> {
        let actions = self.core.on_pointer_down(screen, button, modifiers);
        self.process(actions)
    }

    pub fn on_pointer_move(&mut self, screen: Point, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_pointer_move(screen, modifiers);
        self.process(actions)
    }

    pub fn on_pointer_up(
        &mut self,
        screen: Point,
        button: Button,
        modifiers: Modifiers,
    ) -> Vec<Action> {
        let actions = self.core.on_pointer_up(screen, button, modifiers);
        self.process(actions)
    }

    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_wheel(screen, delta, modifiers);
        self.process(actions)
    }

    pub fn on_key_down(&mut self, key: &str, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_key_down(key, modifiers);
        self.process(actions)
    }

    // --- Delegated commands ---

    pub fn set_tool(&mut self, tool: Tool) {
        let actions = self.core.set_tool(tool);
        self.process(actions);
    }

    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        self.render();
    }

    pub fn undo(&mut self) {
        let actions = self.core.undo();
        self.process(actions);
    }

    pub fn redo(&mut self) {
        let actions = self.core.redo();
        self.process(actions);
    }

    pub fn commit_text(&mut self, content: &str) {
        let actions = self.core.commit_text(content);
        self.process(actions);
    }

    pub fn cancel_text(&mut self) {
        let actions = self.core.cancel_text();
        self.process(actions);
    }

    pub fn insert_image(&mut self, source: String, natural_w: f64, natural_h: f64) {
        let actions = self.core.insert_image(source, natural_w, natural_h);
        self.process(actions);
    }

    pub fn set_stroke_color(&mut self, color: &str) {
        let actions = self.core.set_stroke_color(color);
        self.process(actions);
    }

    pub fn set_fill_color(&mut self, color: &str) {
        let actions = self.core.set_fill_color(color);
        self.process(actions);
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        let actions = self.core.set_stroke_width(width);
        self.process(actions);
    }

    pub fn set_stroke_style(&mut self, stroke_style: StrokeStyle) {
        let actions = self.core.set_stroke_style(stroke_style);
        self.process(actions);
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        let actions = self.core.set_opacity(opacity);
        self.process(actions);
    }

    pub fn set_roughness(&mut self, roughness: f64) {
        let actions = self.core.set_roughness(roughness);
        self.process(actions);
    }

    pub fn set_font_size(&mut self, size: f64) {
        let actions = self.core.set_font_size(size);
        self.process(actions);
    }

    pub fn set_font_family(&mut self, family: &str) {
        let actions = self.core.set_font_family(family);
        self.process(actions);
    }

    pub fn set_bold(&mut self, on: bool) {
        let actions = self.core.set_bold(on);
        self.process(actions);
    }

    pub fn set_italic(&mut self, on: bool) {
        let actions = self.core.set_italic(on);
        self.process(actions);
    }

    pub fn set_underline(&mut self, on: bool) {
        let actions = self.core.set_underline(on);
        self.process(actions);
    }

    pub fn set_strikethrough(&mut self, on: bool) {
        let actions = self.core.set_strikethrough(on);
        self.process(actions);
    }

    /// The canvas contents as a PNG data URL.
    pub fn export_png(&self) -> Result<String, JsValue> {
        self.canvas.to_data_url()
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    pub fn render(&self) {
        let Some(ctx) = context_2d(&self.canvas) else {
            return;
        };
        if let Err(err) = render::draw(&ctx, &self.core, &self.images) {
            log::warn!("render failed: {err:?}");
        }
    }

    // --- Internals ---

    /// Run internal actions, handing back only those the host must react to
    /// (currently just text-edit requests).
    fn process(&mut self, actions: Vec<Action>) -> Vec<Action> {
        let mut remaining = Vec::new();
        let mut needs_render = false;
        for action in actions {
            match action {
                Action::ElementsChanged => {
                    self.sync_image_cache();
                    self.flush_document();
                }
                Action::ClipboardChanged => self.flush_clipboard(),
                Action::CameraChanged => self.flush_camera(),
                Action::RenderNeeded => needs_render = true,
                Action::SetCursor(name) => self.set_cursor(&name),
                Action::TextEditRequested { .. } => remaining.push(action),
            }
        }
        if needs_render {
            self.render();
        }
        remaining
    }

    fn flush_document(&mut self) {
        let elements = self.core.doc.snapshot();
        let Some(store) = &mut self.storage else { return };
        if let Err(err) = persist::save(store, KEY_ELEMENTS, &elements) {
            log::warn!("failed to persist elements: {err}");
        }
        if let Err(err) = persist::save_history(store, &self.core.history, &elements) {
            log::warn!("failed to persist history: {err}");
        }
    }

    fn flush_camera(&mut self) {
        let camera = self.core.camera;
        let Some(store) = &mut self.storage else { return };
        if let Err(err) = persist::save(store, KEY_CAMERA, &camera) {
            log::warn!("failed to persist camera: {err}");
        }
    }

    fn flush_clipboard(&mut self) {
        let clipboard = self.core.clipboard.clone();
        let Some(store) = &mut self.storage else { return };
        if let Err(err) = persist::save(store, KEY_CLIPBOARD, &clipboard) {
            log::warn!("failed to persist clipboard: {err}");
        }
    }

    fn set_cursor(&self, name: &str) {
        if let Err(err) = self.canvas.style().set_property("cursor", name) {
            log::warn!("failed to set cursor: {err:?}");
        }
    }

    /// Keep one decoded image handle per image element, creating handles for
    /// new sources and dropping handles whose element is gone.
    fn sync_image_cache(&mut self) {
        let mut live: std::collections::HashSet<ElementId> = std::collections::HashSet::new();
        for e in self.core.doc.elements() {
            if let Shape::Image { source, .. } = &e.shape {
                live.insert(e.id);
                if !self.images.contains_key(&e.id) {
                    match HtmlImageElement::new() {
                        Ok(img) => {
                            img.set_src(source);
                            self.images.insert(e.id, img);
                        }
                        Err(err) => log::warn!("failed to create image handle: {err:?}"),
                    }
                }
            }
        }
        self.images.retain(|id, _| live.contains(id));
    }
}

/// Text measurement backed by the 2d context. Falls back to the character
/// heuristic when the context refuses to measure.
struct CanvasMeasure {
    ctx: CanvasRenderingContext2d,
}

impl TextMeasure for CanvasMeasure {
    fn measure(
        &self,
        text: &str,
        font_size: f64,
        font_family: &str,
        bold: bool,
        italic: bool,
    ) -> TextExtent {
        self.ctx.set_font(&render::font_string(font_size, font_family, bold, italic));
        let width = self
            .ctx
            .measure_text(text)
            .map(|m| m.width())
            .unwrap_or_else(|_| text.chars().count() as f64 * 0.6 * font_size);
        TextExtent { width, height: font_size * 1.2 }
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    let object = canvas.get_context("2d").unwrap_or_default()?;
    match object.dyn_into::<CanvasRenderingContext2d>() {
        Ok(ctx) => Some(ctx),
        Err(_) => None,
    }
}
