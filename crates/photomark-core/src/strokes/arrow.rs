//! Arrow stroke.

use super::{StrokeId, StrokeStyle, StrokeTrait};
use chrono::{DateTime, Utc};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default arrowhead edge length in logical units.
pub const DEFAULT_HEAD_SIZE: f64 = 15.0;

/// Angle between the shaft and each arrowhead edge (30 degrees).
const HEAD_ANGLE: f64 = std::f64::consts::FRAC_PI_6;

/// An arrow stroke (straight shaft with a filled triangular head).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arrow {
    pub(crate) id: StrokeId,
    /// Start point.
    pub start: Point,
    /// End point (where the arrowhead points).
    pub end: Point,
    /// Edge length of the arrowhead, in logical units (pre-scale).
    pub head_size: f64,
    /// Style properties.
    pub style: StrokeStyle,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Arrow {
    /// Create a new arrow.
    pub fn new(start: Point, end: Point, style: StrokeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            head_size: DEFAULT_HEAD_SIZE,
            style,
            created_at: Utc::now(),
        }
    }

    /// Get the direction vector (normalized).
    pub fn direction(&self) -> Vec2 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len < f64::EPSILON {
            Vec2::new(1.0, 0.0)
        } else {
            Vec2::new(dx / len, dy / len)
        }
    }

    /// Get the length of the arrow shaft.
    pub fn length(&self) -> f64 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// The two base corners of the arrowhead triangle.
    ///
    /// Each head edge leaves the tip at `HEAD_ANGLE` from the shaft
    /// direction, which is computed from `atan2` of the shaft delta.
    pub fn head_corners(&self) -> [Point; 2] {
        let angle = (self.end.y - self.start.y).atan2(self.end.x - self.start.x);
        let left = angle - HEAD_ANGLE;
        let right = angle + HEAD_ANGLE;
        [
            Point::new(
                self.end.x - self.head_size * left.cos(),
                self.end.y - self.head_size * left.sin(),
            ),
            Point::new(
                self.end.x - self.head_size * right.cos(),
                self.end.y - self.head_size * right.sin(),
            ),
        ]
    }

    /// Closed triangle path for the filled arrowhead.
    pub fn head_path(&self) -> BezPath {
        let [left, right] = self.head_corners();
        let mut path = BezPath::new();
        path.move_to(self.end);
        path.line_to(left);
        path.line_to(right);
        path.close_path();
        path
    }
}

impl StrokeTrait for Arrow {
    fn id(&self) -> StrokeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let [left, right] = self.head_corners();
        let xs = [self.start.x, self.end.x, left.x, right.x];
        let ys = [self.start.y, self.end.y, left.y, right.y];

        let min_x = xs.iter().copied().fold(f64::MAX, f64::min);
        let min_y = ys.iter().copied().fold(f64::MAX, f64::min);
        let max_x = xs.iter().copied().fold(f64::MIN, f64::max);
        let max_y = ys.iter().copied().fold(f64::MIN, f64::max);

        Rect::new(min_x, min_y, max_x, max_y)
    }

    fn to_path(&self) -> BezPath {
        // Shaft only; the head is filled separately via head_path.
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.line_to(self.end);
        path
    }

    fn style(&self) -> &StrokeStyle {
        &self.style
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
