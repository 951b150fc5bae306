//! Detached copies of objects and open-space search for pasting them.

use crate::canvas::Scene;
use crate::geometry::union_bounds;
use crate::shapes::Shape;
use kurbo::{Point, Rect, Vec2};

/// Objects captured by the last copy or cut.
///
/// Holds value copies with their original ids; ids are regenerated when
/// the contents are instantiated for pasting.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    items: Vec<Shape>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents.
    pub fn copy(&mut self, objects: Vec<Shape>) {
        self.items = objects;
    }

    pub fn items(&self) -> &[Shape] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Union bounds of the contents.
    pub fn bounds(&self) -> Option<Rect> {
        union_bounds(self.items.iter().map(Shape::bounds))
    }

    /// Fresh copies moved by `offset`, each with a new id.
    pub fn instantiate(&self, offset: Vec2) -> Vec<Shape> {
        self.items
            .iter()
            .cloned()
            .map(|mut shape| {
                shape.regenerate_id();
                shape.translate(offset);
                shape
            })
            .collect()
    }
}

/// Placement search parameters.
pub struct Placement;

impl Placement {
    /// Target positions for the clipboard's top-left corner, tried in order.
    pub const CANDIDATES: [(f64, f64); 15] = [
        (80.0, 80.0),
        (150.0, 80.0),
        (220.0, 80.0),
        (80.0, 150.0),
        (150.0, 150.0),
        (220.0, 150.0),
        (80.0, 220.0),
        (150.0, 220.0),
        (220.0, 220.0),
        (300.0, 100.0),
        (100.0, 300.0),
        (350.0, 150.0),
        (150.0, 350.0),
        (400.0, 200.0),
        (200.0, 400.0),
    ];
    /// Clearance added to the clipboard size when checking a candidate.
    pub const PADDING: f64 = 40.0;
    /// Step of the diagonal fallback sweep.
    pub const DIAGONAL_STEP: f64 = 60.0;
    /// Number of diagonal positions tried.
    pub const DIAGONAL_ATTEMPTS: u32 = 9;
    /// Offset used when nothing is free.
    pub const DEFAULT_OFFSET: Vec2 = Vec2::new(100.0, 100.0);
}

/// Offset that moves content with `clip_bounds` into open space in `scene`.
///
/// Fixed candidates are tried first, then a widening diagonal sweep; if
/// every area is occupied the fixed default offset is used regardless.
pub fn find_paste_offset(clip_bounds: Rect, scene: &Scene) -> Vec2 {
    let size = clip_bounds.size();
    let area_at = |pos: Point| {
        Rect::from_origin_size(pos, (size.width + Placement::PADDING, size.height + Placement::PADDING))
    };

    let fixed = Placement::CANDIDATES.iter().map(|&(x, y)| Point::new(x, y));
    let diagonal = (1..=Placement::DIAGONAL_ATTEMPTS).map(|k| {
        let d = Placement::DIAGONAL_STEP * f64::from(k);
        Point::new(d, d)
    });

    match fixed.chain(diagonal).find(|&pos| scene.is_area_free(area_at(pos))) {
        Some(pos) => {
            log::debug!("paste placed at ({}, {})", pos.x, pos.y);
            pos - clip_bounds.origin()
        }
        None => {
            log::debug!("no free paste area, using default offset");
            Placement::DEFAULT_OFFSET
        }
    }
}
