//! Tool selection and the per-session drawing style.

use crate::shapes::{Diamond, Ellipse, Rectangle, SerializableColor, Shape, ShapeStyle, Text};
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Hand,
    Pen,
    Text,
    Rectangle,
    Ellipse,
    Diamond,
    Arrow,
    BiArrow,
    Eraser,
}

impl ToolKind {
    /// Tool bound to a bare-letter shortcut.
    pub fn from_shortcut(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            's' => Some(Self::Select),
            'h' => Some(Self::Hand),
            'p' => Some(Self::Pen),
            't' => Some(Self::Text),
            'r' => Some(Self::Rectangle),
            'c' => Some(Self::Ellipse),
            'd' => Some(Self::Diamond),
            'a' => Some(Self::Arrow),
            'b' => Some(Self::BiArrow),
            'e' => Some(Self::Eraser),
            _ => None,
        }
    }

    /// Tools that draw a box shape by dragging out a rectangle.
    pub fn is_shape_tool(self) -> bool {
        matches!(self, Self::Rectangle | Self::Ellipse | Self::Diamond)
    }

    /// Tools that place an arrow with two clicks.
    pub fn is_arrow_tool(self) -> bool {
        matches!(self, Self::Arrow | Self::BiArrow)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Hand => "hand",
            Self::Pen => "pen",
            Self::Text => "text",
            Self::Rectangle => "rectangle",
            Self::Ellipse => "ellipse",
            Self::Diamond => "diamond",
            Self::Arrow => "arrow",
            Self::BiArrow => "biarrow",
            Self::Eraser => "eraser",
        }
    }
}

/// Current tool plus the style applied to newly created objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    pub tool: ToolKind,
    pub stroke_color: SerializableColor,
    pub fill_color: Option<SerializableColor>,
    pub stroke_width: f64,
    /// Thickness of freehand strokes.
    pub pen_size: f64,
    pub font_size: f64,
    pub font_family: String,
    /// Draw new arrows bent.
    pub curved_arrows: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            tool: ToolKind::default(),
            stroke_color: SerializableColor::black(),
            fill_color: None,
            stroke_width: 2.0,
            pen_size: 2.0,
            font_size: Text::DEFAULT_FONT_SIZE,
            font_family: Text::DEFAULT_FONT_FAMILY.to_string(),
            curved_arrows: false,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Style for a new object.
    pub fn shape_style(&self) -> ShapeStyle {
        ShapeStyle {
            stroke_color: self.stroke_color,
            fill_color: self.fill_color,
            stroke_width: self.stroke_width,
        }
    }

    /// Build the box shape drawn by `kind` over `rect`.
    ///
    /// Returns None for tools that do not draw box shapes.
    pub fn create_box_shape(&self, kind: ToolKind, rect: Rect) -> Option<Shape> {
        let rect = rect.abs();
        let style = self.shape_style();
        let shape = match kind {
            ToolKind::Rectangle => {
                let mut r = Rectangle::from_rect(rect);
                r.style = style;
                Shape::Rectangle(r)
            }
            ToolKind::Ellipse => {
                let mut e = Ellipse::from_rect(rect);
                e.style = style;
                Shape::Ellipse(e)
            }
            ToolKind::Diamond => {
                let mut d = Diamond::from_rect(rect);
                d.style = style;
                Shape::Diamond(d)
            }
            _ => return None,
        };
        Some(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn test_shortcuts() {
        assert_eq!(ToolKind::from_shortcut('r'), Some(ToolKind::Rectangle));
        assert_eq!(ToolKind::from_shortcut('C'), Some(ToolKind::Ellipse));
        assert_eq!(ToolKind::from_shortcut('b'), Some(ToolKind::BiArrow));
        assert_eq!(ToolKind::from_shortcut('x'), None);
    }

    #[test]
    fn test_tool_categories() {
        assert!(ToolKind::Diamond.is_shape_tool());
        assert!(!ToolKind::Arrow.is_shape_tool());
        assert!(ToolKind::BiArrow.is_arrow_tool());
        assert_eq!(ToolKind::BiArrow.name(), "biarrow");
    }

    #[test]
    fn test_create_box_shape_uses_session_style() {
        let session = Session {
            stroke_width: 4.0,
            fill_color: Some(SerializableColor::white()),
            ..Session::default()
        };
        let shape = session
            .create_box_shape(ToolKind::Ellipse, Rect::new(50.0, 40.0, 10.0, 20.0))
            .unwrap();
        assert!(matches!(shape, Shape::Ellipse(_)));
        assert_eq!(shape.bounds(), Rect::new(10.0, 20.0, 50.0, 40.0));
        assert!((shape.style().stroke_width - 4.0).abs() < f64::EPSILON);
        assert_eq!(shape.style().fill_color, Some(SerializableColor::white()));

        assert!(session.create_box_shape(ToolKind::Pen, Rect::from_origin_size(Point::ZERO, (1.0, 1.0))).is_none());
    }
}
