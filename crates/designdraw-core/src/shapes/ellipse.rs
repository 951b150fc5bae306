//! Ellipse shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::geometry::point_in_ellipse;
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ellipse inscribed in an axis-aligned box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ellipse {
    #[serde(default = "Uuid::new_v4", deserialize_with = "super::deserialize_id")]
    pub(crate) id: ShapeId,
    /// Top-left corner of the bounding box.
    #[serde(flatten)]
    pub position: Point,
    pub width: f64,
    pub height: f64,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Ellipse {
    /// Create a new ellipse from its bounding box origin and size.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self::from_rect(Rect::from_origin_size(position, (width, height)))
    }

    /// Create an ellipse inscribed in `rect`, normalizing negative sizes.
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

    /// Center point.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Horizontal and vertical radii.
    pub fn radii(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl ShapeTrait for Ellipse {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, (self.width, self.height))
    }

    fn hit_test(&self, point: Point) -> bool {
        point_in_ellipse(point, self.bounds())
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
        kurbo::Ellipse::new(self.center(), self.radii(), 0.0).to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
