//! Freehand stroke and path decimation.

use super::{PathPoint, StrokeId, StrokeStyle, StrokeTrait, points_bounds};
use chrono::{DateTime, Utc};
use kurbo::{BezPath, Point, Rect};
use uuid::Uuid;
use serde::{Deserialize, Serialize};

/// Default decimation tolerance in logical units.
pub const DECIMATION_TOLERANCE: f64 = 2.0;

/// A freehand stroke (series of sampled points).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Freehand {
    pub(crate) id: StrokeId,
    /// Full captured path.
    pub points: Vec<PathPoint>,
    /// Reduced path used for storage and replay.
    pub decimated: Vec<PathPoint>,
    /// Style properties.
    pub style: StrokeStyle,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Freehand {
    /// Create from captured points. The decimated path is produced by
    /// [`Freehand::finalize`].
    pub fn from_points(points: Vec<PathPoint>, style: StrokeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            decimated: Vec::new(),
            style,
            created_at: Utc::now(),
        }
    }

    /// Add a point to the path.
    pub fn add_point(&mut self, point: PathPoint) {
        self.points.push(point);
    }

    /// Get the number of captured points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Compute the decimated path from the captured one.
    pub fn finalize(&mut self) {
        self.decimated = decimate(&self.points, DECIMATION_TOLERANCE);
    }

    /// Points used for rendering: the decimated path when present, the raw
    /// capture otherwise.
    pub fn render_points(&self) -> &[PathPoint] {
        if self.decimated.is_empty() {
            &self.points
        } else {
            &self.decimated
        }
    }
}

/// Reduce a point path to a sparser approximation within `tolerance`.
///
/// Single-pass greedy simplification: an interior point is retained only if
/// its perpendicular distance to the chord from the previously retained
/// point to the next raw point exceeds the tolerance. The first and last
/// points are always retained, and paths of two or fewer points pass through
/// unchanged. Persisted strokes were produced by this exact variant, so it
/// must not be swapped for the recursive simplification.
pub fn decimate(points: &[PathPoint], tolerance: f64) -> Vec<PathPoint> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let mut kept = vec![points[0]];
    for i in 1..points.len() - 1 {
        let anchor = kept[kept.len() - 1].pos;
        let next = points[i + 1].pos;
        if perpendicular_distance(points[i].pos, anchor, next) > tolerance {
            kept.push(points[i]);
        }
    }
    kept.push(points[points.len() - 1]);
    kept
}

/// Calculate perpendicular distance from point to line.
fn perpendicular_distance(point: Point, line_start: Point, line_end: Point) -> f64 {
    let dx = line_end.x - line_start.x;
    let dy = line_end.y - line_start.y;

    let line_len_sq = dx * dx + dy * dy;
    if line_len_sq < f64::EPSILON {
        // Line is a point
        let px = point.x - line_start.x;
        let py = point.y - line_start.y;
        return (px * px + py * py).sqrt();
    }

    // Area of triangle * 2 / base = height
    let area2 = ((point.x - line_start.x) * dy - (point.y - line_start.y) * dx).abs();
    area2 / line_len_sq.sqrt()
}

impl StrokeTrait for Freehand {
    fn id(&self) -> StrokeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        points_bounds(self.render_points())
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();

        let points = self.render_points();
        if points.is_empty() {
            return path;
        }

        path.move_to(points[0].pos);
        for point in points.iter().skip(1) {
            path.line_to(point.pos);
        }

        path
    }

    fn style(&self) -> &StrokeStyle {
        &self.style
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
