//! Transform-parameterized stroke renderer over a CPU raster surface.

use crate::bitmap::BaseImage;
use crate::text::TextRasterizer;
use kurbo::{BezPath, PathEl, Point, Size};
use photomark_core::camera::Projection;
use photomark_core::strokes::{SerializableColor, Stroke, StrokeStyle, StrokeTrait, Text};
use tiny_skia::{
    Color, FillRule, FilterQuality, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint,
    Transform,
};

/// Padding around text labels, in logical units.
const TEXT_BG_PADDING: f64 = 4.0;

/// Backing color behind text labels, for legibility over photos.
fn text_bg_color() -> Color {
    Color::from_rgba8(20, 20, 20, 160)
}

/// Renders stroke lists onto pixmaps.
///
/// The same renderer instance serves both the live preview (identity or
/// camera projection) and the export compositor (scale-up projection); only
/// the projection differs between the two call sites.
pub struct StrokeRenderer {
    text: TextRasterizer,
}

impl Default for StrokeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl StrokeRenderer {
    /// Create a renderer. Loads the system font list once for text labels.
    pub fn new() -> Self {
        Self {
            text: TextRasterizer::new(),
        }
    }

    /// Draw strokes in list order (later strokes draw on top).
    ///
    /// Every logical coordinate is mapped through `projection`; line widths
    /// and font sizes are multiplied by its scale, so marks keep their
    /// proportions at any zoom or export resolution.
    pub fn render_strokes(&self, pixmap: &mut Pixmap, strokes: &[Stroke], projection: &Projection) {
        for stroke in strokes {
            self.render_stroke(pixmap, stroke, projection);
        }
    }

    /// Draw one stroke.
    pub fn render_stroke(&self, pixmap: &mut Pixmap, stroke: &Stroke, projection: &Projection) {
        if !is_visible(stroke, projection, pixmap.width(), pixmap.height()) {
            return;
        }

        match stroke {
            Stroke::Freehand(_) | Stroke::Line(_) | Stroke::Circle(_) => {
                self.draw_stroked_path(pixmap, stroke.to_path(), stroke.style(), projection);
            }
            Stroke::Arrow(arrow) => {
                self.draw_stroked_path(pixmap, arrow.to_path(), arrow.style(), projection);
                self.draw_filled_path(pixmap, arrow.head_path(), arrow.style().color, projection);
            }
            Stroke::Text(text) => self.draw_text(pixmap, text, projection),
        }
    }

    /// Compose a live-preview frame: base photo, committed strokes, then the
    /// in-progress stroke.
    ///
    /// `logical_size` is the size of the photo in logical units (its 1:1
    /// editing size). When no base image is available the frame stays blank.
    pub fn render_preview(
        &self,
        pixmap: &mut Pixmap,
        base: Option<&BaseImage>,
        logical_size: Size,
        strokes: &[Stroke],
        preview: Option<&Stroke>,
        projection: &Projection,
    ) {
        pixmap.fill(Color::WHITE);

        let Some(base) = base else {
            return;
        };
        self.draw_base_image(pixmap, base, logical_size, projection);

        self.render_strokes(pixmap, strokes, projection);
        if let Some(preview) = preview {
            self.render_stroke(pixmap, preview, projection);
        }
    }

    /// Draw the base photo scaled from its native resolution to its logical
    /// size, then through the projection.
    fn draw_base_image(
        &self,
        pixmap: &mut Pixmap,
        base: &BaseImage,
        logical_size: Size,
        projection: &Projection,
    ) {
        let Some(source) = base.pixmap() else {
            log::warn!("base image was already released, skipping draw");
            return;
        };
        if base.width() == 0 || base.height() == 0 {
            return;
        }

        let sx = logical_size.width / base.width() as f64 * projection.scale;
        let sy = logical_size.height / base.height() as f64 * projection.scale;
        let transform = Transform::from_row(
            sx as f32,
            0.0,
            0.0,
            sy as f32,
            projection.offset.x as f32,
            projection.offset.y as f32,
        );
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
    }

    fn draw_stroked_path(
        &self,
        pixmap: &mut Pixmap,
        mut path: BezPath,
        style: &StrokeStyle,
        projection: &Projection,
    ) {
        path.apply_affine(projection.to_affine());
        let Some(skia_path) = to_skia_path(&path) else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(to_skia_color(style.color));
        paint.anti_alias = true;

        let stroke = tiny_skia::Stroke {
            width: projection.apply_len(style.width) as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..tiny_skia::Stroke::default()
        };
        pixmap.stroke_path(&skia_path, &paint, &stroke, Transform::identity(), None);
    }

    fn draw_filled_path(
        &self,
        pixmap: &mut Pixmap,
        mut path: BezPath,
        color: SerializableColor,
        projection: &Projection,
    ) {
        path.apply_affine(projection.to_affine());
        let Some(skia_path) = to_skia_path(&path) else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(to_skia_color(color));
        paint.anti_alias = true;
        pixmap.fill_path(
            &skia_path,
            &paint,
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    fn draw_text(&self, pixmap: &mut Pixmap, text: &Text, projection: &Projection) {
        let origin = projection.apply(text.position);
        let layout = text.layout_size();
        let pad = projection.apply_len(TEXT_BG_PADDING);

        // Backing rectangle first, so the label stays legible over the photo.
        let width = projection.apply_len(layout.width) + 2.0 * pad;
        let height = projection.apply_len(layout.height) + 2.0 * pad;
        if let Some(rect) = tiny_skia::Rect::from_xywh(
            (origin.x - pad) as f32,
            (origin.y - pad) as f32,
            width as f32,
            height as f32,
        ) {
            let mut paint = Paint::default();
            paint.set_color(text_bg_color());
            paint.anti_alias = true;
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }

        self.text.draw(pixmap, text, origin, projection.scale);
    }
}

/// Skip strokes whose projected bounds fall entirely outside the surface.
fn is_visible(stroke: &Stroke, projection: &Projection, width: u32, height: u32) -> bool {
    let bounds = stroke.bounds();
    let margin = stroke.style().width + 2.0 * TEXT_BG_PADDING;
    let min = projection.apply(Point::new(bounds.x0 - margin, bounds.y0 - margin));
    let max = projection.apply(Point::new(bounds.x1 + margin, bounds.y1 + margin));
    max.x >= 0.0 && max.y >= 0.0 && min.x <= width as f64 && min.y <= height as f64
}

/// Convert a kurbo path into a tiny-skia path.
fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for element in path.elements() {
        match element {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => {
                builder.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32);
            }
            PathEl::CurveTo(p1, p2, p3) => {
                builder.cubic_to(
                    p1.x as f32,
                    p1.y as f32,
                    p2.x as f32,
                    p2.y as f32,
                    p3.x as f32,
                    p3.y as f32,
                );
            }
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}

fn to_skia_color(color: SerializableColor) -> Color {
    Color::from_rgba8(color.r, color.g, color.b, color.a)
}
