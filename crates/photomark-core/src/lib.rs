//! Photomark Core Library
//!
//! Platform-agnostic data structures and interaction logic for the Photomark
//! photo annotator: the stroke model, path decimation, the pan/zoom camera,
//! the pointer-driven editor state machine and the committed stroke list.

pub mod camera;
pub mod document;
pub mod editor;
pub mod input;
pub mod strokes;

pub use camera::{Camera, MAX_ZOOM, MIN_ZOOM, Projection};
pub use document::StrokeList;
pub use editor::{Editor, EditorOutput, Tool};
pub use input::{PointerButton, PointerEvent};
pub use strokes::{PathPoint, Stroke, StrokeId, StrokeStyle, StrokeTrait};
