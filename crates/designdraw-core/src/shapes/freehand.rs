//! Freehand pen stroke.

use super::{ShapeId, ShapeStyle, ShapeTrait, map_point};
use crate::geometry::{FREEHAND_HIT_PADDING, LINE_HIT_TOLERANCE, distance_to_polyline, rect_from_points};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand path recorded from pointer movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Freehand {
    #[serde(default = "Uuid::new_v4", deserialize_with = "super::deserialize_id")]
    pub(crate) id: ShapeId,
    /// Recorded points, in drawing order.
    #[serde(alias = "path")]
    pub points: Vec<Point>,
    /// Pen thickness.
    #[serde(default = "default_thickness", alias = "size", deserialize_with = "super::deserialize_number")]
    pub thickness: f64,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

fn default_thickness() -> f64 {
    2.0
}

impl Freehand {
    /// Create an empty path.
    pub fn new(thickness: f64) -> Self {
        Self::from_points(Vec::new(), thickness)
    }

    /// Create a path from recorded points.
    pub fn from_points(points: Vec<Point>, thickness: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            thickness,
            style: ShapeStyle::default(),
        }
    }

    /// Append a point to the path.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }
}

impl ShapeTrait for Freehand {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        // Zero points collapse to a zero-size box at the origin.
        let pad = self.thickness.max(0.0) / 2.0;
        rect_from_points(self.points.iter().copied())
            .map(|r| r.inflate(pad, pad))
            .unwrap_or(Rect::ZERO)
    }

    fn hit_test(&self, point: Point) -> bool {
        distance_to_polyline(point, &self.points) <= self.hit_tolerance()
    }

    fn hit_tolerance(&self) -> f64 {
        (self.thickness.max(0.0) / 2.0 + FREEHAND_HIT_PADDING).max(LINE_HIT_TOLERANCE)
    }

    fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }

    fn resize_to(&mut self, new_bounds: Rect, original_bounds: Rect) {
        for p in &mut self.points {
            *p = map_point(*p, original_bounds, new_bounds);
        }
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut iter = self.points.iter();
        if let Some(&first) = iter.next() {
            path.move_to(first);
            if self.points.len() == 1 {
                // Single point: a zero-length segment so round caps leave a dot.
                path.line_to(first);
            }
            for &p in iter {
                path.line_to(p);
            }
        }
        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
