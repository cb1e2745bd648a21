//! Circle stroke.

use super::{StrokeId, StrokeStyle, StrokeTrait};
use chrono::{DateTime, Utc};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A circle dragged from its center outward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circle {
    pub(crate) id: StrokeId,
    /// Center of the circle (the drag start).
    pub center: Point,
    /// A point on the rim (the drag end).
    pub edge: Point,
    /// Style properties.
    pub style: StrokeStyle,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Circle {
    /// Create a new circle.
    pub fn new(center: Point, edge: Point, style: StrokeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            edge,
            style,
            created_at: Utc::now(),
        }
    }

    /// Radius: Euclidean distance from center to the rim point.
    pub fn radius(&self) -> f64 {
        self.center.distance(self.edge)
    }
}

impl StrokeTrait for Circle {
    fn id(&self) -> StrokeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let r = self.radius();
        Rect::new(
            self.center.x - r,
            self.center.y - r,
            self.center.x + r,
            self.center.y + r,
        )
    }

    fn to_path(&self) -> BezPath {
        kurbo::Circle::new(self.center, self.radius()).to_path(0.1)
    }

    fn style(&self) -> &StrokeStyle {
        &self.style
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
