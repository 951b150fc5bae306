//! CPU renderer built on tiny-skia, with text through ab_glyph.

use crate::renderer::{RasterImage, RenderContext, RenderResult, Renderer, RendererError};
use ab_glyph::{Font as _, FontArc, PxScale, ScaleFont as _};
use designdraw_core::canvas::Scene;
use designdraw_core::geometry::union_bounds;
use designdraw_core::interaction::Preview;
use designdraw_core::selection::handles_for;
use designdraw_core::shapes::{SerializableColor, Shape, ShapeTrait, Text};
use kurbo::{BezPath, PathEl, Rect, Vec2};
use peniko::Color;
use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke, StrokeDash, Transform,
};

/// Side of the square drawn for each selection handle.
const HANDLE_DRAW_SIZE: f32 = 8.0;

fn paint_for(color: SerializableColor) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn to_skia_color(color: Color) -> tiny_skia::Color {
    let rgba = color.to_rgba8();
    tiny_skia::Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a)
}

/// Convert a kurbo path. Returns None for paths without any segment.
fn to_skia_path(path: &BezPath) -> Option<Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => pb.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

fn rect_path(rect: Rect) -> Option<Path> {
    let rect = tiny_skia::Rect::from_ltrb(
        rect.x0 as f32,
        rect.y0 as f32,
        rect.x1 as f32,
        rect.y1 as f32,
    )?;
    Some(PathBuilder::from_rect(rect))
}

/// Rasterizes scenes into RGBA pixmaps.
#[derive(Debug, Clone, Default)]
pub struct RasterRenderer {
    font: Option<FontArc>,
}

impl RasterRenderer {
    /// Create a renderer that skips text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer that draws text with `font`.
    pub fn with_font(font: FontArc) -> Self {
        Self { font: Some(font) }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Area the scene covers when drawn, with text measured by the loaded
    /// font instead of the engine's estimate.
    pub fn content_bounds(&self, scene: &Scene) -> Option<Rect> {
        union_bounds(scene.iter().map(|shape| match (shape, &self.font) {
            (Shape::Text(text), Some(font)) => shape.bounds().union(measure_text(font, text)),
            _ => shape.bounds(),
        }))
    }

    fn draw_scene(&self, pixmap: &mut Pixmap, scene: &Scene, transform: Transform, offset: Vec2) {
        for shape in scene.iter() {
            self.draw_shape(pixmap, shape, transform, offset);
        }
    }

    fn draw_shape(&self, pixmap: &mut Pixmap, shape: &Shape, transform: Transform, offset: Vec2) {
        match shape {
            Shape::Text(text) => self.draw_text(pixmap, text, offset),
            Shape::Freehand(freehand) => {
                let Some(path) = to_skia_path(&shape.to_path()) else {
                    return;
                };
                let stroke = Stroke {
                    width: freehand.thickness as f32,
                    line_cap: LineCap::Round,
                    line_join: LineJoin::Round,
                    ..Default::default()
                };
                let paint = paint_for(freehand.style.stroke_color);
                pixmap.stroke_path(&path, &paint, &stroke, transform, None);
            }
            _ => {
                let Some(path) = to_skia_path(&shape.to_path()) else {
                    return;
                };
                let style = shape.style();
                if shape.is_box_shape() {
                    if let Some(fill) = style.fill_color {
                        pixmap.fill_path(&path, &paint_for(fill), FillRule::Winding, transform, None);
                    }
                }
                let stroke = Stroke {
                    width: style.stroke_width as f32,
                    line_cap: LineCap::Round,
                    line_join: LineJoin::Round,
                    ..Default::default()
                };
                pixmap.stroke_path(&path, &paint_for(style.stroke_color), &stroke, transform, None);
            }
        }
    }

    /// Rasterize each line of `text` glyph by glyph, blending coverage into the pixmap.
    fn draw_text(&self, pixmap: &mut Pixmap, text: &Text, offset: Vec2) {
        let Some(font) = &self.font else {
            log::debug!("no font loaded, skipping text {}", text.id());
            return;
        };
        let size = text.font_size as f32;
        let scaled = font.as_scaled(PxScale::from(size));
        let color = text.style.stroke_color;
        let origin = text.position + offset;
        let line_height = text.line_height() as f32;

        for (line_index, line) in text.lines().enumerate() {
            let baseline = origin.y as f32 + line_index as f32 * line_height + scaled.ascent();
            let mut x = origin.x as f32;
            let mut prev = None;
            for ch in line.chars() {
                let gid = font.glyph_id(ch);
                if let Some(p) = prev {
                    x += scaled.kern(p, gid);
                }
                let glyph = gid.with_scale_and_position(size, ab_glyph::point(x, baseline));
                x += scaled.h_advance(gid);
                prev = Some(gid);

                let Some(outlined) = font.outline_glyph(glyph) else {
                    continue;
                };
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let px = bounds.min.x as i32 + gx as i32;
                    let py = bounds.min.y as i32 + gy as i32;
                    blend_pixel(pixmap, px, py, color, coverage);
                });
            }
        }
    }

    fn draw_preview(&self, pixmap: &mut Pixmap, preview: &Preview, ctx: &RenderContext, transform: Transform) {
        match preview {
            Preview::Shape(shape) => self.draw_shape(pixmap, shape, transform, ctx.offset),
            Preview::SelectionBand(rect) => {
                let Some(path) = rect_path(*rect) else {
                    return;
                };
                let rgba = ctx.selection_color.to_rgba8();
                let band = SerializableColor::new(rgba.r, rgba.g, rgba.b, 40);
                pixmap.fill_path(&path, &paint_for(band), FillRule::Winding, transform, None);
                let stroke = Stroke {
                    width: 1.0,
                    dash: StrokeDash::new(vec![4.0, 4.0], 0.0),
                    ..Default::default()
                };
                let outline = SerializableColor::from(ctx.selection_color);
                pixmap.stroke_path(&path, &paint_for(outline), &stroke, transform, None);
            }
        }
    }

    fn draw_selection(&self, pixmap: &mut Pixmap, ctx: &RenderContext, transform: Transform) {
        let Some(selection) = ctx.selection else {
            return;
        };
        let color = SerializableColor::from(ctx.selection_color);
        let paint = paint_for(color);
        let outline = Stroke {
            width: 1.5,
            ..Default::default()
        };

        for id in selection.ids() {
            let Some(shape) = ctx.scene.get(*id) else {
                continue;
            };
            let bounds = shape.bounds();
            if let Some(path) = rect_path(bounds) {
                pixmap.stroke_path(&path, &paint, &outline, transform, None);
            }
            // Handles only make sense for a single object
            if selection.len() != 1 {
                continue;
            }
            let half = f64::from(HANDLE_DRAW_SIZE) / 2.0;
            for handle in handles_for(bounds) {
                let Some(path) = rect_path(Rect::from_center_size(handle.position, (2.0 * half, 2.0 * half))) else {
                    continue;
                };
                pixmap.fill_path(&path, &paint_for(SerializableColor::white()), FillRule::Winding, transform, None);
                pixmap.stroke_path(&path, &paint, &outline, transform, None);
            }
        }
    }
}

/// Laid-out extent of `text`: advances and kerning across each line, from
/// the top of the first line to the lowest descender.
fn measure_text(font: &FontArc, text: &Text) -> Rect {
    let scaled = font.as_scaled(PxScale::from(text.font_size as f32));
    let mut width = 0.0f32;
    let mut lines = 0usize;
    for line in text.lines() {
        lines += 1;
        let mut x = 0.0;
        let mut prev = None;
        for ch in line.chars() {
            let gid = font.glyph_id(ch);
            if let Some(p) = prev {
                x += scaled.kern(p, gid);
            }
            x += scaled.h_advance(gid);
            prev = Some(gid);
        }
        width = width.max(x);
    }
    let line_height = text.line_height();
    let last_baseline = lines.saturating_sub(1) as f64 * line_height + f64::from(scaled.ascent());
    let height = (lines as f64 * line_height).max(last_baseline - f64::from(scaled.descent()));
    Rect::from_origin_size(text.position, (f64::from(width), height))
}

/// Source-over blend of `color` at `coverage` into one pixel.
fn blend_pixel(pixmap: &mut Pixmap, x: i32, y: i32, color: SerializableColor, coverage: f32) {
    let (width, height) = (pixmap.width() as i32, pixmap.height() as i32);
    if x < 0 || y < 0 || x >= width || y >= height {
        return;
    }
    let alpha = coverage.clamp(0.0, 1.0) * f32::from(color.a) / 255.0;
    if alpha <= 0.0 {
        return;
    }
    let i = ((y * width + x) * 4) as usize;
    let data = pixmap.data_mut();
    let src = [color.r, color.g, color.b].map(|c| f32::from(c) * alpha);
    for (channel, value) in src.into_iter().enumerate() {
        let dst = f32::from(data[i + channel]);
        data[i + channel] = (value + dst * (1.0 - alpha)).round().min(255.0) as u8;
    }
    let dst_a = f32::from(data[i + 3]);
    data[i + 3] = (alpha * 255.0 + dst_a * (1.0 - alpha)).round().min(255.0) as u8;
}

impl Renderer for RasterRenderer {
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<RasterImage> {
        let (width, height) = ctx.pixel_size()?;
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            RendererError::RenderFailed(format!("could not allocate {width}x{height} pixmap"))
        })?;
        pixmap.fill(to_skia_color(ctx.background_color));

        let transform = Transform::from_translate(ctx.offset.x as f32, ctx.offset.y as f32);
        self.draw_scene(&mut pixmap, ctx.scene, transform, ctx.offset);
        if let Some(preview) = ctx.preview {
            self.draw_preview(&mut pixmap, preview, ctx, transform);
        }
        if ctx.draw_selection {
            self.draw_selection(&mut pixmap, ctx, transform);
        }

        Ok(RasterImage {
            width,
            height,
            pixels: pixmap.take(),
        })
    }
}

impl RasterImage {
    /// Encode as an 8-bit RGBA PNG.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        let mut png_data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_data, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.to_rgba())?;
        }
        Ok(png_data)
    }
}

/// Render `scene` with a white background, cropped to its content, as PNG bytes.
pub fn export_png(scene: &Scene, font: Option<FontArc>) -> RenderResult<Vec<u8>> {
    let mut renderer = match font {
        Some(font) => RasterRenderer::with_font(font),
        None => RasterRenderer::new(),
    };
    let ctx = RenderContext::for_content(scene, renderer.content_bounds(scene))
        .with_background(Color::WHITE);
    let image = renderer.render(&ctx)?;
    log::info!(
        "exporting {} objects as {}x{} PNG",
        scene.len(),
        image.width,
        image.height
    );
    image.encode_png()
}
