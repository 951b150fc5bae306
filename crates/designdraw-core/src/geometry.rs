//! Geometric predicates shared by hit-testing, selection and placement.

use kurbo::{Point, Rect, Vec2};

/// Pick distance for line-like objects (arrows).
pub const LINE_HIT_TOLERANCE: f64 = 5.0;

/// Extra pick distance added to half the stroke width of freehand paths.
pub const FREEHAND_HIT_PADDING: f64 = 3.0;

/// Distance from a point to the segment `a`–`b`.
///
/// The projection parameter is clamped to `[0, 1]`, so points beyond either
/// end measure to the nearest endpoint.
pub fn distance_to_segment(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Minimum distance from a point to a polyline.
///
/// A single point measures to that point; an empty slice is infinitely far.
pub fn distance_to_polyline(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => (point - *only).hypot(),
        _ => points
            .windows(2)
            .map(|w| distance_to_segment(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Axis-aligned overlap test. Rectangles that only touch do not overlap.
pub fn bounds_overlap(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
}

/// Whether `point` lies inside the ellipse inscribed in `bounds`.
pub fn point_in_ellipse(point: Point, bounds: Rect) -> bool {
    let Some(n) = normalized_offset(point, bounds) else {
        return false;
    };
    n.x * n.x + n.y * n.y <= 1.0
}

/// Whether `point` lies inside the diamond inscribed in `bounds`.
pub fn point_in_diamond(point: Point, bounds: Rect) -> bool {
    let Some(n) = normalized_offset(point, bounds) else {
        return false;
    };
    n.x.abs() + n.y.abs() <= 1.0
}

/// Offset from the center of `bounds` divided by the half extents.
/// `None` when either axis is degenerate.
fn normalized_offset(point: Point, bounds: Rect) -> Option<Vec2> {
    let half_w = bounds.width().abs() / 2.0;
    let half_h = bounds.height().abs() / 2.0;
    if half_w < f64::EPSILON || half_h < f64::EPSILON {
        return None;
    }
    let center = bounds.center();
    Some(Vec2::new(
        (point.x - center.x) / half_w,
        (point.y - center.y) / half_h,
    ))
}

/// Union of a sequence of rectangles, `None` if the sequence is empty.
pub fn union_bounds(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    rects.into_iter().reduce(|acc, r| acc.union(r))
}

/// Tight bounding box of a set of points, `None` if there are none.
pub fn rect_from_points(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
    let mut iter = points.into_iter();
    let first = iter.next()?;
    Some(iter.fold(Rect::from_points(first, first), |acc, p| acc.union_pt(p)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_segment_perpendicular() {
        let d = distance_to_segment(
            Point::new(5.0, 3.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        );
        assert!((d - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distance_to_segment_clamps_to_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        let before = distance_to_segment(Point::new(-3.0, 4.0), a, b);
        let after = distance_to_segment(Point::new(13.0, 4.0), a, b);
        assert!((before - 5.0).abs() < 1e-9);
        assert!((after - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_to_degenerate_segment() {
        let p = Point::new(3.0, 4.0);
        let d = distance_to_segment(p, Point::ZERO, Point::ZERO);
        assert!((d - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_to_polyline() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ];
        let d = distance_to_polyline(Point::new(12.0, 5.0), &pts);
        assert!((d - 2.0).abs() < 1e-9);
        assert!(distance_to_polyline(Point::ZERO, &[]).is_infinite());
        let single = distance_to_polyline(Point::new(0.0, 2.0), &[Point::ZERO]);
        assert!((single - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_overlap_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 20.0, 10.0);
        let overlapping = Rect::new(9.0, 9.0, 20.0, 20.0);
        let apart = Rect::new(30.0, 30.0, 40.0, 40.0);
        assert!(!bounds_overlap(a, touching));
        assert!(bounds_overlap(a, overlapping));
        assert!(!bounds_overlap(a, apart));
    }

    #[test]
    fn test_bounds_overlap_symmetric() {
        let rects = [
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(5.0, 5.0, 15.0, 15.0),
            Rect::new(10.0, 0.0, 20.0, 10.0),
            Rect::new(-5.0, -5.0, 0.0, 0.0),
            Rect::new(2.0, 2.0, 3.0, 3.0),
            Rect::new(4.0, 4.0, 4.0, 4.0),
        ];
        for a in rects {
            for b in rects {
                assert_eq!(bounds_overlap(a, b), bounds_overlap(b, a));
            }
        }
    }

    #[test]
    fn test_point_in_ellipse() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(point_in_ellipse(Point::new(50.0, 25.0), bounds));
        assert!(point_in_ellipse(Point::new(100.0, 25.0), bounds));
        assert!(!point_in_ellipse(Point::new(95.0, 5.0), bounds));
        assert!(!point_in_ellipse(Point::ZERO, Rect::new(0.0, 0.0, 0.0, 10.0)));
    }

    #[test]
    fn test_point_in_diamond() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(point_in_diamond(Point::new(50.0, 50.0), bounds));
        assert!(point_in_diamond(Point::new(50.0, 0.0), bounds));
        assert!(!point_in_diamond(Point::new(10.0, 10.0), bounds));
    }

    #[test]
    fn test_union_and_point_bounds() {
        assert!(union_bounds(std::iter::empty()).is_none());
        let u = union_bounds([Rect::new(0.0, 0.0, 1.0, 1.0), Rect::new(5.0, -2.0, 6.0, 0.0)]);
        assert_eq!(u, Some(Rect::new(0.0, -2.0, 6.0, 1.0)));
        let r = rect_from_points([Point::new(3.0, 1.0), Point::new(-1.0, 4.0)]);
        assert_eq!(r, Some(Rect::new(-1.0, 1.0, 3.0, 4.0)));
    }
}
