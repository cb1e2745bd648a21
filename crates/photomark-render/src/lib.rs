//! Photomark Render Library
//!
//! CPU rendering for the Photomark photo annotator: the
//! transform-parameterized stroke renderer, base image ownership with a
//! stale-load guard, and the full-resolution PNG export compositor. The live
//! preview and the export run through the same rendering code so what the
//! user saw is what gets burned in.

mod bitmap;
mod export;
mod renderer;
mod text;

pub use bitmap::{BaseImage, ImageError, ImageLoader, LoadTicket};
pub use export::{ExportError, ExportParams};
pub use renderer::StrokeRenderer;
