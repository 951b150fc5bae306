//! Rectangle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    #[serde(default = "Uuid::new_v4", deserialize_with = "super::deserialize_id")]
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    #[serde(flatten)]
    pub position: Point,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
    /// Style properties.
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self::from_rect(Rect::from_origin_size(position, (width, height)))
    }

    /// Create a rectangle covering `rect`, normalizing negative sizes.
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

    /// Create a rectangle from two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Self::from_rect(Rect::from_points(p1, p2))
    }

    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::from_origin_size(self.position, (self.width, self.height))
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point) -> bool {
        let r = self.as_rect();
        point.x >= r.x0 && point.x <= r.x1 && point.y >= r.y0 && point.y <= r.y1
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
        self.as_rect().to_path(0.1)
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
    fn test_rectangle_creation() {
        let rect = Rectangle::new(Point::new(10.0, 20.0), 100.0, 50.0);
        assert!((rect.position.x - 10.0).abs() < f64::EPSILON);
        assert!((rect.position.y - 20.0).abs() < f64::EPSILON);
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rectangle_from_corners() {
        let rect = Rectangle::from_corners(Point::new(100.0, 100.0), Point::new(50.0, 50.0));
        assert!((rect.position.x - 50.0).abs() < f64::EPSILON);
        assert!((rect.position.y - 50.0).abs() < f64::EPSILON);
        assert!((rect.width - 50.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_is_inclusive() {
        let rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        assert!(rect.hit_test(Point::new(50.0, 50.0)));
        assert!(rect.hit_test(Point::new(100.0, 100.0)));
        assert!(!rect.hit_test(Point::new(100.5, 50.0)));
    }

    #[test]
    fn test_translate_and_resize() {
        let mut rect = Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0);
        rect.translate(Vec2::new(5.0, -5.0));
        assert_eq!(rect.bounds(), Rect::new(5.0, -5.0, 15.0, 5.0));

        let original = rect.bounds();
        rect.resize_to(Rect::new(5.0, -5.0, 40.0, 30.0), original);
        assert_eq!(rect.bounds(), Rect::new(5.0, -5.0, 40.0, 30.0));
    }

    #[test]
    fn test_serialized_fields() {
        let rect = Rectangle::new(Point::new(1.0, 2.0), 3.0, 4.0);
        let value = serde_json::to_value(&rect).unwrap();
        assert_eq!(value["x"], 1.0);
        assert_eq!(value["y"], 2.0);
        assert_eq!(value["width"], 3.0);
        assert_eq!(value["strokeColor"], "#000000");
        assert!(value["fillColor"].is_null());
    }
}
