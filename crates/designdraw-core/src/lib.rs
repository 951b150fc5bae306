//! DesignDraw Core Library
//!
//! Scene object model and interaction engine for the DesignDraw canvas:
//! drawable objects, hit-testing and resize geometry, undo/redo, canvas
//! growth, clipboard placement and the JSON document format.

pub mod canvas;
pub mod clipboard;
pub mod config;
pub mod document;
pub mod extent;
pub mod geometry;
pub mod history;
pub mod input;
pub mod interaction;
pub mod selection;
pub mod shapes;
pub mod storage;
pub mod text_edit;
pub mod tools;

pub use canvas::{Canvas, Scene, SceneEvent};
pub use config::{ConfigError, EngineConfig};
pub use document::{Document, DocumentError, DocumentResult};
pub use extent::{CanvasExtent, ExtentPolicy};
pub use input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use interaction::{HostCommand, InteractionController, InteractionState, Preview};
pub use selection::{Handle, HandleKind, Selection};
pub use shapes::{SerializableColor, Shape, ShapeId, ShapeStyle, ShapeTrait};
pub use tools::{Session, ToolKind};
