//! Text label stroke.

use super::{StrokeId, StrokeStyle, StrokeTrait};
use chrono::{DateTime, Utc};
use kurbo::{BezPath, Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A text label anchored at its top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: StrokeId,
    /// Position (top-left corner of the text bounding box).
    pub position: Point,
    /// The text content.
    pub content: String,
    /// Font size in logical units (pre-scale).
    pub font_size: f64,
    /// Style properties.
    pub style: StrokeStyle,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Text {
    /// Default font size.
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;

    /// Average character width as a fraction of the font size.
    /// An empirically determined approximation for a sans-serif face.
    const CHAR_WIDTH_FACTOR: f64 = 0.55;

    /// Line height as a fraction of the font size.
    const LINE_HEIGHT_FACTOR: f64 = 1.2;

    /// Create a new text label.
    pub fn new(position: Point, content: String, style: StrokeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content,
            font_size: Self::DEFAULT_FONT_SIZE,
            style,
            created_at: Utc::now(),
        }
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Line height in logical units.
    pub fn line_height(&self) -> f64 {
        self.font_size * Self::LINE_HEIGHT_FACTOR
    }

    /// Approximate layout size of the label in logical units.
    ///
    /// Width is estimated from the widest line's character count; the exact
    /// value depends on the font, so this is only used for the backing
    /// rectangle and bounds, not for glyph placement.
    pub fn layout_size(&self) -> Size {
        let max_line_len = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);

        let line_count = self.content.lines().count().max(1);

        Size::new(
            max_line_len as f64 * self.font_size * Self::CHAR_WIDTH_FACTOR,
            line_count as f64 * self.line_height(),
        )
    }
}

impl StrokeTrait for Text {
    fn id(&self) -> StrokeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let size = self.layout_size();
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + size.width.max(self.font_size),
            self.position.y + size.height,
        )
    }

    fn to_path(&self) -> BezPath {
        // Text has no vector outline here; the bounding box stands in.
        let bounds = self.bounds();
        let mut path = BezPath::new();
        path.move_to(Point::new(bounds.x0, bounds.y0));
        path.line_to(Point::new(bounds.x1, bounds.y0));
        path.line_to(Point::new(bounds.x1, bounds.y1));
        path.line_to(Point::new(bounds.x0, bounds.y1));
        path.close_path();
        path
    }

    fn style(&self) -> &StrokeStyle {
        &self.style
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
