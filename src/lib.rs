//! Canvas engine for the sketchboard vector-drawing app.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! full lifecycle of the drawing surface: translating raw pointer/keyboard
//! events into document mutations, maintaining camera state for pan/zoom,
//! hit-testing elements, rendering the scene with hand-drawn stylization, and
//! persisting the document to local storage. The host JavaScript layer is
//! responsible only for wiring DOM events to the engine and for UI chrome
//! (toolbar, color pickers, the inline text input).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`element`] | Element variants and per-element style attributes |
//! | [`doc`] | In-memory element store and selection set |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`geometry`] | Bounding boxes and memoized text measurement |
//! | [`hit`] | Hit-testing and resize-handle geometry |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`resize`] | Per-variant resize policy |
//! | [`history`] | Linear snapshot undo/redo |
//! | [`rough`] | Seeded hand-drawn stroke generator |
//! | [`render`] | Scene rendering to a 2D context |
//! | [`persist`] | Key-value persistence with quota fallback |
//! | [`consts`] | Shared numeric constants (zoom limits, minimum sizes, etc.) |

pub mod camera;
pub mod consts;
pub mod doc;
pub mod element;
pub mod engine;
pub mod geometry;
pub mod history;
pub mod hit;
pub mod input;
pub mod persist;
pub mod render;
pub mod resize;
pub mod rough;

/// Install the panic hook and console logger. Called once by the host before
/// constructing an [`engine::Engine`].
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn boot() {
    console_error_panic_hook::set_once();
    // A second call would fail with SetLoggerError; that is harmless.
    console_log::init_with_level(log::Level::Info).unwrap_or_default();
}
