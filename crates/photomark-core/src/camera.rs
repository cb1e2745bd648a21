//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum allowed zoom level.
pub const MIN_ZOOM: f64 = 0.5;

/// Maximum allowed zoom level.
pub const MAX_ZOOM: f64 = 4.0;

/// Factor applied by one zoom button step.
const ZOOM_STEP: f64 = 1.25;

/// Camera manages the view transform for the editing surface.
///
/// It handles panning (translation) and zooming (scaling) operations,
/// converting between screen coordinates and logical image coordinates.
/// The mapping is `screen = image * zoom + offset`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in screen pixels.
    pub offset: Vec2,
    /// Current zoom level (1.0 = the 1:1 editing view).
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    /// Create a new camera at the identity view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts image coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to image coordinates.
    pub fn screen_to_image(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert an image point to screen coordinates.
    pub fn image_to_screen(&self, image_point: Point) -> Point {
        self.transform() * image_point
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom the camera, keeping the given screen point fixed.
    ///
    /// The resulting zoom is clamped to `[MIN_ZOOM, MAX_ZOOM]` and the
    /// offset is corrected so the anchor stays put on screen.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        // Convert screen point to image space before zoom
        let image_point = self.screen_to_image(screen_point);

        // Apply new zoom
        self.zoom = new_zoom;

        // Adjust offset so image_point stays at screen_point
        let new_screen = self.image_to_screen(image_point);
        let correction = Vec2::new(
            screen_point.x - new_screen.x,
            screen_point.y - new_screen.y,
        );
        self.offset += correction;
    }

    /// One zoom-in button step anchored at the given screen point.
    pub fn zoom_in(&mut self, anchor: Point) {
        self.zoom_at(anchor, ZOOM_STEP);
    }

    /// One zoom-out button step anchored at the given screen point.
    pub fn zoom_out(&mut self, anchor: Point) {
        self.zoom_at(anchor, 1.0 / ZOOM_STEP);
    }

    /// The scale/offset pair handed to the renderer.
    pub fn projection(&self) -> Projection {
        Projection {
            scale: self.zoom,
            offset: self.offset,
        }
    }
}

/// A scale-then-translate mapping from logical image coordinates to a target
/// surface's pixel coordinates.
///
/// The live preview renders with the camera's projection; export renders
/// with a scale-up projection derived from the full image resolution. Both
/// go through the same rendering code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub scale: f64,
    pub offset: Vec2,
}

impl Projection {
    pub const IDENTITY: Projection = Projection {
        scale: 1.0,
        offset: Vec2::ZERO,
    };

    pub fn new(scale: f64, offset: Vec2) -> Self {
        Self { scale, offset }
    }

    /// Map an image point onto the target surface.
    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            point.x * self.scale + self.offset.x,
            point.y * self.scale + self.offset.y,
        )
    }

    /// Map a length (line width, font size) onto the target surface.
    pub fn apply_len(&self, len: f64) -> f64 {
        len * self.scale
    }

    /// The same mapping as an affine, for transforming whole paths.
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }
}
