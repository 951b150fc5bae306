//! Arrow shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, map_point};
use crate::geometry::{LINE_HIT_TOLERANCE, distance_to_segment};
use kurbo::{BezPath, ParamCurve, ParamCurveExtrema, ParamCurveNearest, Point, QuadBez, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use uuid::Uuid;

/// An arrow from `start` to `end`, optionally headed at both ends and
/// optionally bent into a quadratic curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ArrowRecord")]
pub struct Arrow {
    #[serde(default = "Uuid::new_v4", deserialize_with = "super::deserialize_id")]
    pub(crate) id: ShapeId,
    /// Start point.
    pub start: Point,
    /// End point (always carries a head).
    pub end: Point,
    /// Draw a head at the start as well.
    #[serde(default)]
    pub bidirectional: bool,
    /// Bend the shaft into a quadratic curve.
    #[serde(default)]
    pub curved: bool,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

/// Arrow as stored: endpoints either as points or as flat
/// `startX`/`startY`/`endX`/`endY` fields.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArrowRecord {
    #[serde(default = "Uuid::new_v4", deserialize_with = "super::deserialize_id")]
    id: ShapeId,
    start: Option<Point>,
    end: Option<Point>,
    start_x: Option<f64>,
    start_y: Option<f64>,
    end_x: Option<f64>,
    end_y: Option<f64>,
    #[serde(default)]
    bidirectional: bool,
    #[serde(default)]
    curved: bool,
    #[serde(flatten)]
    style: ShapeStyle,
}

fn endpoint(point: Option<Point>, x: Option<f64>, y: Option<f64>, name: &str) -> Result<Point, String> {
    point
        .or_else(|| Some(Point::new(x?, y?)))
        .ok_or_else(|| format!("arrow has no {name} point"))
}

impl TryFrom<ArrowRecord> for Arrow {
    type Error = String;

    fn try_from(record: ArrowRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id,
            start: endpoint(record.start, record.start_x, record.start_y, "start")?,
            end: endpoint(record.end, record.end_x, record.end_y, "end")?,
            bidirectional: record.bidirectional,
            curved: record.curved,
            style: record.style,
        })
    }
}

impl Arrow {
    /// Length of each head stroke.
    pub const HEAD_LENGTH: f64 = 15.0;
    /// Angle between the shaft and each head stroke.
    pub const HEAD_ANGLE: f64 = PI / 6.0;
    /// Perpendicular offset of the curve control point, relative to length.
    pub const CURVE_BEND: f64 = 0.2;

    /// Create a straight, single-headed arrow.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            bidirectional: false,
            curved: false,
            style: ShapeStyle::default(),
        }
    }

    /// Control point of the curved variant.
    pub fn control_point(&self) -> Point {
        let d = self.end - self.start;
        self.start.midpoint(self.end) + Vec2::new(d.y * Self::CURVE_BEND, -d.x * Self::CURVE_BEND)
    }

    /// The shaft as a quadratic curve (degree-raised line when straight).
    pub fn curve(&self) -> QuadBez {
        let ctrl = if self.curved {
            self.control_point()
        } else {
            self.start.midpoint(self.end)
        };
        QuadBez::new(self.start, ctrl, self.end)
    }

    /// Length of the straight segment between the endpoints.
    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }

    /// The two outer points of a head whose tip is `tip`, pointing away from `from`.
    pub fn head_points(tip: Point, from: Point) -> [Point; 2] {
        let angle = (tip - from).atan2();
        [angle - Self::HEAD_ANGLE, angle + Self::HEAD_ANGLE]
            .map(|a| tip - Vec2::from_angle(a) * Self::HEAD_LENGTH)
    }

    /// Head geometry as `(tip, [outer, outer])` pairs, end head first.
    pub fn heads(&self) -> Vec<(Point, [Point; 2])> {
        let (end_from, start_from) = if self.curved {
            let curve = self.curve();
            (curve.eval(0.9), curve.eval(0.1))
        } else {
            (self.start, self.end)
        };
        let mut heads = vec![(self.end, Self::head_points(self.end, end_from))];
        if self.bidirectional {
            heads.push((self.start, Self::head_points(self.start, start_from)));
        }
        heads
    }
}

impl ShapeTrait for Arrow {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        if self.curved {
            self.curve().bounding_box()
        } else {
            Rect::from_points(self.start, self.end)
        }
    }

    fn hit_test(&self, point: Point) -> bool {
        let distance = if self.curved {
            self.curve().nearest(point, 1e-6).distance_sq.sqrt()
        } else {
            distance_to_segment(point, self.start, self.end)
        };
        distance <= LINE_HIT_TOLERANCE
    }

    fn hit_tolerance(&self) -> f64 {
        LINE_HIT_TOLERANCE
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }

    fn resize_to(&mut self, new_bounds: Rect, original_bounds: Rect) {
        self.start = map_point(self.start, original_bounds, new_bounds);
        self.end = map_point(self.end, original_bounds, new_bounds);
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        if self.start == self.end {
            return path;
        }

        path.move_to(self.start);
        if self.curved {
            path.quad_to(self.control_point(), self.end);
        } else {
            path.line_to(self.end);
        }

        for (tip, [left, right]) in self.heads() {
            path.move_to(tip);
            path.line_to(left);
            path.move_to(tip);
            path.line_to(right);
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
