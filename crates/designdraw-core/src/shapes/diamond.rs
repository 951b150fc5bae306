//! Diamond (rhombus) shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::geometry::point_in_diamond;
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A diamond whose vertices touch the midpoints of its bounding box edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diamond {
    #[serde(default = "Uuid::new_v4", deserialize_with = "super::deserialize_id")]
    pub(crate) id: ShapeId,
    #[serde(flatten)]
    pub position: Point,
    pub width: f64,
    pub height: f64,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Diamond {
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self::from_rect(Rect::from_origin_size(position, (width, height)))
    }

    pub fn from_rect(rect: Rect) -> Self {
        let rect = rect.abs();
        Self {
            id: Uuid::new_v4(),
            position: rect.origin(),
            width: rect.width(),
            height: rect.height(),
            style: ShapeStyle::default(),
        }
    }

    /// Vertices in order top, right, bottom, left.
    pub fn vertices(&self) -> [Point; 4] {
        let b = self.bounds();
        let c = b.center();
        [
            Point::new(c.x, b.y0),
            Point::new(b.x1, c.y),
            Point::new(c.x, b.y1),
            Point::new(b.x0, c.y),
        ]
    }
}

impl ShapeTrait for Diamond {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, (self.width, self.height))
    }

    fn hit_test(&self, point: Point) -> bool {
        point_in_diamond(point, self.bounds())
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn resize_to(&mut self, new_bounds: Rect, _original_bounds: Rect) {
        let r = new_bounds.abs();
        self.position = r.origin();
        self.width = r.width();
        self.height = r.height();
    }

    fn to_path(&self) -> BezPath {
        let [top, right, bottom, left] = self.vertices();
        let mut path = BezPath::new();
        path.move_to(top);
        path.line_to(right);
        path.line_to(bottom);
        path.line_to(left);
        path.close_path();
        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertices() {
        let diamond = Diamond::new(Point::new(0.0, 0.0), 100.0, 60.0);
        let [top, right, bottom, left] = diamond.vertices();
        assert_eq!(top, Point::new(50.0, 0.0));
        assert_eq!(right, Point::new(100.0, 30.0));
        assert_eq!(bottom, Point::new(50.0, 60.0));
        assert_eq!(left, Point::new(0.0, 30.0));
    }

    #[test]
    fn test_hit_test_excludes_box_corners() {
        let diamond = Diamond::new(Point::new(0.0, 0.0), 100.0, 100.0);
        assert!(diamond.hit_test(Point::new(50.0, 50.0)));
        assert!(diamond.hit_test(Point::new(75.0, 50.0)));
        assert!(!diamond.hit_test(Point::new(90.0, 90.0)));
    }

    #[test]
    fn test_path_is_closed_quad() {
        let diamond = Diamond::new(Point::new(0.0, 0.0), 10.0, 10.0);
        assert_eq!(diamond.to_path().elements().len(), 5);
    }
}
