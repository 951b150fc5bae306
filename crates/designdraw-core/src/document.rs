//! Flat JSON document format.

use crate::canvas::Scene;
use crate::shapes::Shape;
use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use thiserror::Error;

/// Format version written to new documents. Any version is accepted on load.
pub const DOCUMENT_VERSION: &str = "1.0";

fn default_version() -> String {
    DOCUMENT_VERSION.to_string()
}

/// Document load/save errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Malformed document: {0}")]
    Parse(serde_json::Error),
    #[error("Invalid document structure: {0}")]
    InvalidStructure(serde_json::Error),
    #[error("Failed to serialize document: {0}")]
    Serialize(serde_json::Error),
}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

impl DocumentError {
    fn from_read(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => Self::InvalidStructure(err),
            Category::Syntax | Category::Eof | Category::Io => Self::Parse(err),
        }
    }
}

/// A saved drawing: the scene's objects plus a little metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default = "default_version")]
    pub version: String,
    /// Creation timestamp as written by whoever created the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default)]
    pub objects: Vec<Shape>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            version: default_version(),
            created: None,
            objects: Vec::new(),
        }
    }
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot a scene.
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            objects: scene.objects().to_vec(),
            ..Self::default()
        }
    }

    pub fn with_created(mut self, created: Option<String>) -> Self {
        self.created = created;
        self
    }

    /// Convert into a scene, dropping the metadata.
    pub fn into_scene(self) -> Scene {
        Scene::from(self.objects)
    }

    /// Parse a document.
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        let document: Self = serde_json::from_str(json).map_err(DocumentError::from_read)?;
        log::debug!(
            "parsed document v{} with {} objects",
            document.version,
            document.objects.len()
        );
        Ok(document)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> DocumentResult<String> {
        serde_json::to_string_pretty(self).map_err(DocumentError::Serialize)
    }

    /// Serialize as compact JSON.
    pub fn to_json_compact(&self) -> DocumentResult<String> {
        serde_json::to_string(self).map_err(DocumentError::Serialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{
        Arrow, Diamond, Ellipse, Freehand, Rectangle, SerializableColor, ShapeTrait, Text,
    };
    use kurbo::{Point, Rect};

    #[test]
    fn test_minimal_document() {
        let doc = Document::from_json(
            r#"{"objects":[{"type":"rectangle","x":0,"y":0,"width":40,"height":20}]}"#,
        )
        .unwrap();
        assert_eq!(doc.version, "1.0");
        assert_eq!(doc.objects.len(), 1);
        let shape = &doc.objects[0];
        assert_eq!(shape.bounds(), Rect::new(0.0, 0.0, 40.0, 20.0));
        assert_eq!(shape.style().stroke_color, SerializableColor::black());
        assert!(shape.style().fill_color.is_none());
        assert!((shape.style().stroke_width - 2.0).abs() < f64::EPSILON);

        // Serialize and re-parse keeps the generated id
        let again = Document::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(again, doc);
    }

    #[test]
    fn test_missing_objects_is_empty() {
        let doc = Document::from_json(r#"{"version":"0.9"}"#).unwrap();
        assert!(doc.objects.is_empty());
        assert_eq!(doc.version, "0.9");
    }

    #[test]
    fn test_errors_are_classified() {
        assert!(matches!(
            Document::from_json("{\"objects\": ["),
            Err(DocumentError::Parse(_))
        ));
        assert!(matches!(
            Document::from_json(r#"{"objects": [{"type": "hexagon"}]}"#),
            Err(DocumentError::InvalidStructure(_))
        ));
        assert!(matches!(
            Document::from_json(r#"{"objects": 3}"#),
            Err(DocumentError::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_legacy_tags_and_fields() {
        let doc = Document::from_json(
            r##"{"objects":[
                {"type":"circle","x":1,"y":2,"width":3,"height":4,"color":"#ff0000","fillColor":"transparent"},
                {"type":"freehand","points":[{"x":0,"y":0},{"x":5,"y":5}],"size":6}
            ]}"##,
        )
        .unwrap();
        match &doc.objects[0] {
            Shape::Ellipse(e) => {
                assert_eq!(e.style.stroke_color, SerializableColor::new(255, 0, 0, 255));
                assert!(e.style.fill_color.is_none());
            }
            other => panic!("expected ellipse, got {other:?}"),
        }
        match &doc.objects[1] {
            Shape::Freehand(f) => assert!((f.thickness - 6.0).abs() < f64::EPSILON),
            other => panic!("expected pen, got {other:?}"),
        }
    }

    #[test]
    fn test_web_app_records() {
        let doc = Document::from_json(
            r##"{"objects":[
                {"type":"rectangle","x":10,"y":10,"width":40,"height":30,"strokeColor":"#000000","fillColor":"#ffffff","id":1700000000000},
                {"type":"pen","path":[{"x":0,"y":0},{"x":50,"y":50}],"color":"#ff0000","size":4},
                {"type":"bi-arrow","startX":5,"startY":6,"endX":70,"endY":80,"strokeColor":"#0000ff","curved":true,"id":1700000000001},
                {"type":"arrow","startX":1,"startY":2,"endX":3,"endY":4,"strokeColor":"#000000","curved":false,"id":1700000000002},
                {"type":"text","text":"hello\nworld","x":100,"y":120,"fontSize":"24","fontFamily":"Arial","color":"#333333","id":1700000000003}
            ]}"##,
        )
        .unwrap();
        assert_eq!(doc.objects.len(), 5);
        assert_eq!(doc.objects[0].bounds(), Rect::new(10.0, 10.0, 50.0, 40.0));

        match &doc.objects[1] {
            Shape::Freehand(f) => {
                assert_eq!(f.points, vec![Point::new(0.0, 0.0), Point::new(50.0, 50.0)]);
                assert!((f.thickness - 4.0).abs() < f64::EPSILON);
                assert_eq!(f.style.stroke_color, SerializableColor::new(255, 0, 0, 255));
            }
            other => panic!("expected pen, got {other:?}"),
        }
        match &doc.objects[2] {
            Shape::Arrow(a) => {
                assert_eq!((a.start, a.end), (Point::new(5.0, 6.0), Point::new(70.0, 80.0)));
                assert!(a.bidirectional && a.curved);
                assert_eq!(a.style.stroke_color, SerializableColor::new(0, 0, 255, 255));
            }
            other => panic!("expected arrow, got {other:?}"),
        }
        match &doc.objects[3] {
            Shape::Arrow(a) => assert!(!a.bidirectional && !a.curved),
            other => panic!("expected arrow, got {other:?}"),
        }
        match &doc.objects[4] {
            Shape::Text(t) => {
                assert_eq!(t.content, "hello\nworld");
                assert!((t.font_size - 24.0).abs() < f64::EPSILON);
                assert_eq!(t.font_family, "Arial");
            }
            other => panic!("expected text, got {other:?}"),
        }

        // Numeric ids are replaced with distinct fresh ones
        assert_ne!(doc.objects[0].id(), doc.objects[2].id());
        // And the result saves in the current format
        let again = Document::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(again, doc);
    }

    #[test]
    fn test_incomplete_records_are_rejected() {
        for json in [
            r#"{"objects":[{"type":"pen","size":4}]}"#,
            r#"{"objects":[{"type":"arrow","startX":1,"startY":2,"endX":3}]}"#,
            r#"{"objects":[{"type":"text","text":"a","x":0,"y":0,"fontSize":"big"}]}"#,
        ] {
            assert!(
                matches!(Document::from_json(json), Err(DocumentError::InvalidStructure(_))),
                "{json} should not load"
            );
        }
    }

    #[test]
    fn test_round_trip_every_variant() {
        let mut rect = Rectangle::new(Point::new(1.5, 2.5), 30.0, 40.0);
        rect.style.fill_color = Some(SerializableColor::new(10, 20, 30, 128));
        let mut arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(50.0, 10.0));
        arrow.bidirectional = true;
        arrow.curved = true;
        let mut text = Text::new(Point::new(7.0, 8.0), "two\nlines".to_string())
            .with_font(32.0, "serif");
        text.temporary = true;

        let doc = Document {
            version: DOCUMENT_VERSION.to_string(),
            created: Some("2024-01-01T00:00:00.000Z".to_string()),
            objects: vec![
                Shape::Rectangle(rect),
                Shape::Ellipse(Ellipse::new(Point::new(3.0, 4.0), 5.0, 6.0)),
                Shape::Diamond(Diamond::new(Point::new(-3.0, -4.0), 5.0, 6.0)),
                Shape::Arrow(arrow),
                Shape::Freehand(Freehand::from_points(
                    vec![Point::new(0.0, 0.0), Point::new(1.0, 2.0), Point::new(3.0, 1.0)],
                    4.0,
                )),
                Shape::Text(text),
            ],
        };

        let json = doc.to_json().unwrap();
        assert!(json.contains("\"type\": \"pen\""));
        assert!(json.contains("\"strokeColor\""));
        assert!(json.contains("\"isTemporary\": true"));
        assert_eq!(Document::from_json(&json).unwrap(), doc);
        assert_eq!(Document::from_json(&doc.to_json_compact().unwrap()).unwrap(), doc);
    }

    #[test]
    fn test_scene_conversion() {
        let scene = Scene::from(vec![Shape::Rectangle(Rectangle::new(Point::ZERO, 1.0, 1.0))]);
        let doc = Document::from_scene(&scene);
        assert_eq!(doc.version, DOCUMENT_VERSION);
        assert_eq!(doc.into_scene(), scene);
    }
}
