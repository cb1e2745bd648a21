//! Line stroke.

use super::{StrokeId, StrokeStyle, StrokeTrait};
use chrono::{DateTime, Utc};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A plain straight segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub(crate) id: StrokeId,
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Style properties.
    pub style: StrokeStyle,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Line {
    /// Create a new line.
    pub fn new(start: Point, end: Point, style: StrokeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            style,
            created_at: Utc::now(),
        }
    }

    /// Get the length of the segment.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

impl StrokeTrait for Line {
    fn id(&self) -> StrokeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
        )
    }

    fn to_path(&self) -> BezPath {
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
