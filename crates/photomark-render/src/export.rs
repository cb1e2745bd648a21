//! Full-resolution export compositing.

use crate::bitmap::{BaseImage, ImageError};
use crate::renderer::StrokeRenderer;
use kurbo::Vec2;
use photomark_core::camera::Projection;
use photomark_core::strokes::Stroke;
use thiserror::Error;
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

/// Parameters for one export.
#[derive(Debug, Clone)]
pub struct ExportParams {
    /// Native width of the source photo, in pixels.
    pub full_width: u32,
    /// Native height of the source photo, in pixels.
    pub full_height: u32,
    /// Logical width of the editing surface.
    pub edit_width: f64,
    /// Logical height of the editing surface.
    pub edit_height: f64,
    /// Placement offset of the edit surface within the image, in edit-space
    /// pixels. Zero unless the photo was letterboxed while editing; the
    /// editing camera's pan never belongs here.
    pub offset: Vec2,
}

impl ExportParams {
    pub fn new(full_width: u32, full_height: u32, edit_width: f64, edit_height: f64) -> Self {
        Self {
            full_width,
            full_height,
            edit_width,
            edit_height,
            offset: Vec2::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }
}

/// Export errors. Fatal to the export call; the surrounding UI decides how
/// to tell the user.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("invalid edit surface size {width}x{height}")]
    EditSize { width: f64, height: f64 },
    #[error("could not create {width}x{height} export surface")]
    Surface { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

impl StrokeRenderer {
    /// Re-render the annotated photo at its native resolution.
    ///
    /// Strokes were authored in logical (edit-surface) coordinates; the
    /// export maps them up by `full_width / edit_width` and runs the exact
    /// same rendering code as the live preview, so the export matches what
    /// the user saw. Returns the composited image as PNG bytes.
    pub fn export_annotated(
        &self,
        base_bytes: &[u8],
        strokes: &[Stroke],
        params: &ExportParams,
    ) -> Result<Vec<u8>, ExportError> {
        if params.edit_width <= 0.0 || params.edit_height <= 0.0 {
            return Err(ExportError::EditSize {
                width: params.edit_width,
                height: params.edit_height,
            });
        }

        // The handle releases its pixels on every exit path below.
        let mut base = BaseImage::decode(base_bytes)?;

        let mut surface =
            Pixmap::new(params.full_width, params.full_height).ok_or(ExportError::Surface {
                width: params.full_width,
                height: params.full_height,
            })?;

        // Fill the surface with the photo exactly: the surface pixel grid
        // equals physical image pixels, resampling only if the decoded
        // dimensions disagree with the requested export size.
        if let Some(source) = base.pixmap() {
            let sx = params.full_width as f64 / base.width().max(1) as f64;
            let sy = params.full_height as f64 / base.height().max(1) as f64;
            let paint = PixmapPaint {
                quality: FilterQuality::Bilinear,
                ..PixmapPaint::default()
            };
            surface.draw_pixmap(
                0,
                0,
                source.as_ref(),
                &paint,
                Transform::from_scale(sx as f32, sy as f32),
                None,
            );
        }

        let scale = params.full_width as f64 / params.edit_width;
        let projection = Projection::new(scale, params.offset * scale);
        self.render_strokes(&mut surface, strokes, &projection);

        base.release();
        surface.encode_png().map_err(|e| ExportError::Encode(e.to_string()))
    }
}
