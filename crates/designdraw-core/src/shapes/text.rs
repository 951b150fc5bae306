//! Text shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, scale_factors};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn is_false(value: &bool) -> bool {
    !*value
}

fn default_font_size() -> f64 {
    Text::DEFAULT_FONT_SIZE
}

fn default_font_family() -> String {
    Text::DEFAULT_FONT_FAMILY.to_string()
}

/// Multi-line text anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    #[serde(default = "Uuid::new_v4", deserialize_with = "super::deserialize_id")]
    pub(crate) id: ShapeId,
    /// Top-left anchor.
    #[serde(flatten)]
    pub position: Point,
    /// Newline-separated content.
    #[serde(rename = "text", default)]
    pub content: String,
    #[serde(default = "default_font_size", deserialize_with = "super::deserialize_number")]
    pub font_size: f64,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Set while the text is being typed and has never been committed.
    #[serde(default, rename = "isTemporary", skip_serializing_if = "is_false")]
    pub temporary: bool,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;
    pub const DEFAULT_FONT_FAMILY: &'static str = "sans-serif";
    /// Smallest font size a resize can produce.
    pub const MIN_FONT_SIZE: f64 = 8.0;
    /// Approximate glyph advance as a fraction of the font size.
    pub const CHAR_WIDTH_FACTOR: f64 = 0.6;
    /// Line height as a fraction of the font size.
    pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

    /// Create a new text shape with the default font.
    pub fn new(position: Point, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content,
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: default_font_family(),
            temporary: false,
            style: ShapeStyle::default(),
        }
    }

    /// Builder-style font override.
    pub fn with_font(mut self, font_size: f64, font_family: impl Into<String>) -> Self {
        self.font_size = font_size;
        self.font_family = font_family.into();
        self
    }

    /// Lines of content. Empty content still has one (empty) line.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }

    /// Distance between baselines.
    pub fn line_height(&self) -> f64 {
        self.font_size * Self::LINE_HEIGHT_FACTOR
    }

    /// Approximate laid-out size of the content.
    ///
    /// Width is the longest line's character count times the glyph advance,
    /// at least one character cell wide so empty text stays clickable.
    pub fn measure(&self) -> Vec2 {
        let longest = self.lines().map(|l| l.chars().count()).max().unwrap_or(0).max(1);
        let line_count = self.lines().count();
        Vec2::new(
            longest as f64 * self.font_size * Self::CHAR_WIDTH_FACTOR,
            line_count as f64 * self.line_height(),
        )
    }

    /// Whether the content is blank.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let size = self.measure();
        Rect::from_origin_size(self.position, (size.x, size.y))
    }

    fn hit_test(&self, point: Point) -> bool {
        let r = self.bounds();
        point.x >= r.x0 && point.x <= r.x1 && point.y >= r.y0 && point.y <= r.y1
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn resize_to(&mut self, new_bounds: Rect, original_bounds: Rect) {
        let scale = scale_factors(original_bounds, new_bounds);
        let avg = (scale.x.abs() + scale.y.abs()) / 2.0;
        self.position = new_bounds.abs().origin();
        self.font_size = (self.font_size * avg).round().max(Self::MIN_FONT_SIZE);
    }

    fn to_path(&self) -> BezPath {
        BezPath::new()
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
    fn test_measure_multiline() {
        let text = Text::new(Point::new(0.0, 0.0), "ab\nabcd".to_string()).with_font(10.0, "serif");
        let size = text.measure();
        assert!((size.x - 24.0).abs() < 1e-9);
        assert!((size.y - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_text_keeps_one_cell() {
        let text = Text::new(Point::new(10.0, 10.0), String::new()).with_font(10.0, "serif");
        let b = text.bounds();
        assert!((b.width() - 6.0).abs() < 1e-9);
        assert!((b.height() - 12.0).abs() < 1e-9);
        assert!(text.hit_test(Point::new(12.0, 12.0)));
    }

    #[test]
    fn test_resize_scales_font_by_average() {
        let mut text = Text::new(Point::new(0.0, 0.0), "hello".to_string());
        let original = text.bounds();
        let new = Rect::new(
            5.0,
            5.0,
            5.0 + original.width() * 2.0,
            5.0 + original.height(),
        );
        text.resize_to(new, original);
        assert_eq!(text.position, Point::new(5.0, 5.0));
        assert!((text.font_size - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_floors_font_size() {
        let mut text = Text::new(Point::new(0.0, 0.0), "hello".to_string());
        let original = text.bounds();
        text.resize_to(Rect::new(0.0, 0.0, 1.0, 1.0), original);
        assert!((text.font_size - Text::MIN_FONT_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_temporary_flag_only_serialized_when_set() {
        let mut text = Text::new(Point::ZERO, "x".to_string());
        let value = serde_json::to_value(&text).unwrap();
        assert!(value.get("isTemporary").is_none());
        assert_eq!(value["text"], "x");
        text.temporary = true;
        let value = serde_json::to_value(&text).unwrap();
        assert_eq!(value["isTemporary"], true);
    }
}
