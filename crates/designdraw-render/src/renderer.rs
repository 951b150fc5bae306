//! Renderer trait abstraction.

use designdraw_core::canvas::Scene;
use designdraw_core::interaction::Preview;
use designdraw_core::selection::Selection;
use kurbo::{Rect, Size, Vec2};
use peniko::Color;
use thiserror::Error;

/// Padding around the content of an exported image.
pub const EXPORT_PADDING: f64 = 20.0;

/// Largest image side the renderer will allocate.
pub const MAX_IMAGE_SIDE: u32 = 16_384;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid image size: {0}")]
    InvalidSize(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[cfg(feature = "raster-renderer")]
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render.
pub struct RenderContext<'a> {
    /// The objects to draw, bottom to top.
    pub scene: &'a Scene,
    /// Selection to outline, if any.
    pub selection: Option<&'a Selection>,
    /// In-progress gesture feedback drawn above the scene.
    pub preview: Option<&'a Preview>,
    /// Output size in pixels.
    pub size: Size,
    /// Background color.
    pub background_color: Color,
    /// Canvas-to-image translation.
    pub offset: Vec2,
    /// Draw selection outlines and handles.
    pub draw_selection: bool,
    /// Selection highlight color.
    pub selection_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(scene: &'a Scene, size: Size) -> Self {
        Self {
            scene,
            selection: None,
            preview: None,
            size,
            background_color: Color::WHITE,
            offset: Vec2::ZERO,
            draw_selection: false,
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
        }
    }

    /// Context sized to the scene's bounds plus [`EXPORT_PADDING`] on every side.
    ///
    /// Text bounds are the engine's estimate. A renderer drawing with real
    /// font metrics should measure its content and use [`Self::for_content`].
    pub fn for_export(scene: &'a Scene) -> Self {
        Self::for_content(scene, scene.bounds())
    }

    /// Context sized to `content` plus [`EXPORT_PADDING`] on every side.
    ///
    /// No content yields a blank image of twice the padding.
    pub fn for_content(scene: &'a Scene, content: Option<Rect>) -> Self {
        let padded = content
            .unwrap_or(Rect::ZERO)
            .inflate(EXPORT_PADDING, EXPORT_PADDING);
        let size = Size::new(padded.width().ceil(), padded.height().ceil());
        Self::new(scene, size).with_offset(Vec2::new(-padded.x0, -padded.y0))
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the canvas-to-image translation.
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Outline the given selection.
    pub fn with_selection(mut self, selection: &'a Selection) -> Self {
        self.selection = Some(selection);
        self.draw_selection = true;
        self
    }

    /// Toggle selection outlines without dropping the selection.
    pub fn with_draw_selection(mut self, draw: bool) -> Self {
        self.draw_selection = draw;
        self
    }

    /// Set the selection highlight color.
    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }

    /// Draw gesture feedback on top of the scene.
    pub fn with_preview(mut self, preview: Option<&'a Preview>) -> Self {
        self.preview = preview;
        self
    }

    /// Output size in whole pixels.
    pub fn pixel_size(&self) -> RenderResult<(u32, u32)> {
        let Size { width, height } = self.size;
        let valid = |side: f64| side.is_finite() && side >= 1.0 && side <= f64::from(MAX_IMAGE_SIDE);
        if !valid(width) || !valid(height) {
            return Err(RendererError::InvalidSize(format!("{width}x{height}")));
        }
        Ok((width.round() as u32, height.round() as u32))
    }
}

/// An RGBA8 image with premultiplied alpha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// Row-major premultiplied RGBA8.
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// Straight-alpha color of a pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let px = self.pixels.get(i..i + 4)?;
        Some(demultiply([px[0], px[1], px[2], px[3]]))
    }

    /// Pixels converted to straight alpha.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels
            .chunks_exact(4)
            .flat_map(|px| demultiply([px[0], px[1], px[2], px[3]]))
            .collect()
    }
}

fn demultiply([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    if a == 0 || a == 255 {
        return [r, g, b, a];
    }
    let un = |c: u8| ((u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8;
    [un(r), un(g), un(b), a]
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Draw one frame described by `ctx`.
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<RasterImage>;
}
