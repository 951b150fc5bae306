//! DesignDraw Render Library
//!
//! Renderer abstraction and implementations for DesignDraw.
//! The default implementation rasterizes on the CPU with tiny-skia.

mod renderer;

#[cfg(feature = "raster-renderer")]
mod raster;

pub use renderer::{
    EXPORT_PADDING, MAX_IMAGE_SIDE, RasterImage, RenderContext, RenderResult, Renderer, RendererError,
};

#[cfg(feature = "raster-renderer")]
pub use raster::{RasterRenderer, export_png};

#[cfg(feature = "raster-renderer")]
pub use ab_glyph::{FontArc, InvalidFont};
