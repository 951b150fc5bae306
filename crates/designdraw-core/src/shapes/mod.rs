//! Drawable objects placed on the canvas.

mod arrow;
mod diamond;
mod ellipse;
mod freehand;
mod rectangle;
mod text;

pub use arrow::Arrow;
pub use diamond::Diamond;
pub use ellipse::Ellipse;
pub use freehand::Freehand;
pub use rectangle::Rectangle;
pub use text::Text;

use kurbo::{BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// RGBA8 color stored as a `#rrggbb` / `#rrggbbaa` string in documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Hex notation, with an alpha pair only when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Error returned when a color string is not `#rgb`, `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color: {0:?}")]
pub struct ColorParseError(String);

impl FromStr for SerializableColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.is_ascii() {
            return Err(err());
        }
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(err)
        };
        match hex.len() {
            3 => Ok(Self::new(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
                255,
            )),
            6 => Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Ok(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(err()),
        }
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for SerializableColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SerializableColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Fill colors accept `null` and `"transparent"` as "no fill".
fn deserialize_fill<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<SerializableColor>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().eq_ignore_ascii_case("transparent") || s.trim().is_empty() => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Ids that are not UUIDs, such as the numeric ids of older files, are
/// replaced with a fresh one.
pub(crate) fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ShapeId, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Uuid(Uuid),
        Other(serde::de::IgnoredAny),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Uuid(id) => id,
        RawId::Other(_) => Uuid::new_v4(),
    })
}

/// A number that older files may have written as a string.
pub(crate) fn deserialize_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawNumber {
        Number(f64),
        Text(String),
    }

    match RawNumber::deserialize(deserializer)? {
        RawNumber::Number(n) => Ok(n),
        RawNumber::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("expected a number, got {s:?}"))),
    }
}

/// Style properties shared by every drawable object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    /// Stroke color (also the glyph color of text).
    #[serde(default = "SerializableColor::black", alias = "color")]
    pub stroke_color: SerializableColor,
    /// Fill color (None = no fill).
    #[serde(default, deserialize_with = "deserialize_fill")]
    pub fill_color: Option<SerializableColor>,
    /// Stroke width.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

fn default_stroke_width() -> f64 {
    2.0
}

impl ShapeStyle {
    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(Into::into)
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            fill_color: None,
            stroke_width: default_stroke_width(),
        }
    }
}

/// Per-axis scale factors mapping `original` onto `new`.
///
/// A degenerate source axis keeps scale 1 so content is translated, not
/// collapsed or blown up.
pub(crate) fn scale_factors(original: Rect, new: Rect) -> Vec2 {
    let sx = if original.width().abs() < f64::EPSILON {
        1.0
    } else {
        new.width() / original.width()
    };
    let sy = if original.height().abs() < f64::EPSILON {
        1.0
    } else {
        new.height() / original.height()
    };
    Vec2::new(sx, sy)
}

/// Remap a point from `original` into `new`, relative to their origins.
pub(crate) fn map_point(point: Point, original: Rect, new: Rect) -> Point {
    let scale = scale_factors(original, new);
    Point::new(
        new.x0 + (point.x - original.x0) * scale.x,
        new.y0 + (point.y - original.y0) * scale.y,
    )
}

/// Common contract for all drawable objects.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Axis-aligned bounding box in canvas coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point (in canvas coordinates) hits this object.
    fn hit_test(&self, point: Point) -> bool;

    /// How far outside `bounds()` a hit may land.
    fn hit_tolerance(&self) -> f64 {
        0.0
    }

    /// Move the object by `delta`.
    fn translate(&mut self, delta: Vec2);

    /// Fit the object into `new_bounds`, given the bounds it had when the
    /// resize started.
    fn resize_to(&mut self, new_bounds: Rect, original_bounds: Rect);

    /// Outline for rendering. Text returns an empty path.
    fn to_path(&self) -> BezPath;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;
}

/// Closed set of drawable objects, tagged by `type` in documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", from = "ShapeRecord")]
pub enum Shape {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Diamond(Diamond),
    Arrow(Arrow),
    #[serde(rename = "pen")]
    Freehand(Freehand),
    Text(Text),
}

/// Every tag a document may use, including legacy spellings.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ShapeRecord {
    Rectangle(Rectangle),
    #[serde(alias = "circle")]
    Ellipse(Ellipse),
    Diamond(Diamond),
    Arrow(Arrow),
    #[serde(rename = "bi-arrow", alias = "biarrow")]
    BiArrow(Arrow),
    #[serde(rename = "pen", alias = "freehand")]
    Freehand(Freehand),
    Text(Text),
}

impl From<ShapeRecord> for Shape {
    fn from(record: ShapeRecord) -> Self {
        match record {
            ShapeRecord::Rectangle(r) => Shape::Rectangle(r),
            ShapeRecord::Ellipse(e) => Shape::Ellipse(e),
            ShapeRecord::Diamond(d) => Shape::Diamond(d),
            ShapeRecord::Arrow(a) => Shape::Arrow(a),
            ShapeRecord::BiArrow(mut a) => {
                a.bidirectional = true;
                Shape::Arrow(a)
            }
            ShapeRecord::Freehand(f) => Shape::Freehand(f),
            ShapeRecord::Text(t) => Shape::Text(t),
        }
    }
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Shape::Rectangle($s) => $body,
            Shape::Ellipse($s) => $body,
            Shape::Diamond($s) => $body,
            Shape::Arrow($s) => $body,
            Shape::Freehand($s) => $body,
            Shape::Text($s) => $body,
        }
    };
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        dispatch!(self, s => s.id())
    }

    pub fn bounds(&self) -> Rect {
        dispatch!(self, s => s.bounds())
    }

    pub fn hit_test(&self, point: Point) -> bool {
        dispatch!(self, s => s.hit_test(point))
    }

    pub fn hit_tolerance(&self) -> f64 {
        dispatch!(self, s => s.hit_tolerance())
    }

    pub fn translate(&mut self, delta: Vec2) {
        dispatch!(self, s => s.translate(delta))
    }

    pub fn resize_to(&mut self, new_bounds: Rect, original_bounds: Rect) {
        dispatch!(self, s => s.resize_to(new_bounds, original_bounds))
    }

    pub fn to_path(&self) -> BezPath {
        dispatch!(self, s => s.to_path())
    }

    pub fn style(&self) -> &ShapeStyle {
        dispatch!(self, s => s.style())
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        dispatch!(self, s => s.style_mut())
    }

    /// Center of the bounding box.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// The `type` tag used in documents.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Rectangle(_) => "rectangle",
            Shape::Ellipse(_) => "ellipse",
            Shape::Diamond(_) => "diamond",
            Shape::Arrow(_) => "arrow",
            Shape::Freehand(_) => "pen",
            Shape::Text(_) => "text",
        }
    }

    /// Rectangles, ellipses and diamonds: the objects arrows snap to and
    /// double-click labels attach to.
    pub fn is_box_shape(&self) -> bool {
        matches!(
            self,
            Shape::Rectangle(_) | Shape::Ellipse(_) | Shape::Diamond(_)
        )
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Regenerate the shape's ID with a new unique identifier.
    /// Used when pasting so copies never collide with their source.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        dispatch!(self, s => s.id = new_id)
    }
}
