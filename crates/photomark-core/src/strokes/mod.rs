//! Stroke definitions for the photo annotator.

mod arrow;
mod circle;
mod freehand;
mod line;
mod text;

pub use arrow::Arrow;
pub use circle::Circle;
pub use freehand::{DECIMATION_TOLERANCE, Freehand, decimate};
pub use line::Line;
pub use text::Text;

use chrono::{DateTime, Utc};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn red() -> Self {
        Self::new(220, 38, 38, 255)
    }
}

/// Style properties shared by every stroke kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Stroke color.
    pub color: SerializableColor,
    /// Line width in logical units (pre-scale).
    pub width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: SerializableColor::red(),
            width: 3.0,
        }
    }
}

/// Unique identifier for strokes.
pub type StrokeId = Uuid;

/// A sample along a drawn path, in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    /// Position in logical space.
    pub pos: Point,
    /// Stylus pressure at this sample, when the input device reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
}

impl PathPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            pos: Point::new(x, y),
            pressure: None,
        }
    }

    pub fn with_pressure(x: f64, y: f64, pressure: f64) -> Self {
        Self {
            pos: Point::new(x, y),
            pressure: Some(pressure),
        }
    }
}

impl From<Point> for PathPoint {
    fn from(pos: Point) -> Self {
        Self {
            pos,
            pressure: None,
        }
    }
}

/// Common trait for all stroke kinds.
pub trait StrokeTrait {
    /// Get the unique identifier.
    fn id(&self) -> StrokeId;

    /// Get the bounding box in logical coordinates.
    fn bounds(&self) -> Rect;

    /// Get the path representation for rendering, in logical coordinates.
    fn to_path(&self) -> BezPath;

    /// Get the style.
    fn style(&self) -> &StrokeStyle;

    /// Get the creation time.
    fn created_at(&self) -> DateTime<Utc>;
}

/// Enum wrapper for all stroke kinds (for serialization and rendering).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Stroke {
    Freehand(Freehand),
    Arrow(Arrow),
    Line(Line),
    Circle(Circle),
    Text(Text),
}

impl Stroke {
    pub fn id(&self) -> StrokeId {
        match self {
            Stroke::Freehand(s) => s.id(),
            Stroke::Arrow(s) => s.id(),
            Stroke::Line(s) => s.id(),
            Stroke::Circle(s) => s.id(),
            Stroke::Text(s) => s.id(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Stroke::Freehand(s) => s.bounds(),
            Stroke::Arrow(s) => s.bounds(),
            Stroke::Line(s) => s.bounds(),
            Stroke::Circle(s) => s.bounds(),
            Stroke::Text(s) => s.bounds(),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Stroke::Freehand(s) => s.to_path(),
            Stroke::Arrow(s) => s.to_path(),
            Stroke::Line(s) => s.to_path(),
            Stroke::Circle(s) => s.to_path(),
            Stroke::Text(s) => s.to_path(),
        }
    }

    pub fn style(&self) -> &StrokeStyle {
        match self {
            Stroke::Freehand(s) => s.style(),
            Stroke::Arrow(s) => s.style(),
            Stroke::Line(s) => s.style(),
            Stroke::Circle(s) => s.style(),
            Stroke::Text(s) => s.style(),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Stroke::Freehand(s) => s.created_at(),
            Stroke::Arrow(s) => s.created_at(),
            Stroke::Line(s) => s.created_at(),
            Stroke::Circle(s) => s.created_at(),
            Stroke::Text(s) => s.created_at(),
        }
    }
}

/// Merge two persisted stroke lists into one.
///
/// The union is keyed by stroke id (the first occurrence wins, so `ours`
/// takes precedence over `theirs`) and ordered by creation time. Ties keep
/// their relative input order.
pub fn merge(ours: &[Stroke], theirs: &[Stroke]) -> Vec<Stroke> {
    let mut seen = HashSet::new();
    let mut merged: Vec<Stroke> = ours
        .iter()
        .chain(theirs)
        .filter(|stroke| seen.insert(stroke.id()))
        .cloned()
        .collect();
    merged.sort_by_key(|stroke| stroke.created_at());
    merged
}

/// Bounding box of a slice of path points.
pub(crate) fn points_bounds(points: &[PathPoint]) -> Rect {
    if points.is_empty() {
        return Rect::ZERO;
    }

    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;

    for point in points {
        min_x = min_x.min(point.pos.x);
        min_y = min_y.min(point.pos.y);
        max_x = max_x.max(point.pos.x);
        max_y = max_y.max(point.pos.y);
    }

    Rect::new(min_x, min_y, max_x, max_y)
}
