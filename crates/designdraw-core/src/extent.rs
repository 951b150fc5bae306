//! Logical drawing-surface size and the policy that grows it.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Logical width/height of the drawing surface, anchored at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasExtent {
    pub width: f64,
    pub height: f64,
}

impl CanvasExtent {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Growth rules for [`CanvasExtent`].
///
/// The extent only grows, in whole grid steps, and only shrinks on an
/// explicit reset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtentPolicy {
    /// Smallest extent, also the extent of a new document.
    pub min: Size,
    /// Free space kept between content and the edge.
    pub margin: f64,
    /// Growth granularity.
    pub grid: f64,
}

impl Default for ExtentPolicy {
    fn default() -> Self {
        Self {
            min: Size::new(1200.0, 800.0),
            margin: 200.0,
            grid: 500.0,
        }
    }
}

impl ExtentPolicy {
    /// Extent of a fresh document.
    pub fn initial(&self) -> CanvasExtent {
        CanvasExtent::new(self.min.width, self.min.height)
    }

    /// Shrink `extent` back to the minimum.
    pub fn reset(&self, extent: &mut CanvasExtent) {
        *extent = self.initial();
    }

    fn round_up(&self, value: f64) -> f64 {
        if self.grid <= 0.0 {
            return value;
        }
        (value / self.grid).ceil() * self.grid
    }

    /// Grow `extent` so `content` plus the margin fits. Returns true if it grew.
    pub fn fit_content(&self, extent: &mut CanvasExtent, content: Rect) -> bool {
        let need_w = self.min.width.max(content.x1 + self.margin);
        let need_h = self.min.height.max(content.y1 + self.margin);
        self.grow_to(extent, need_w, need_h)
    }

    /// Grow `extent` when `pointer` is within the margin of the right or
    /// bottom edge. Returns true if it grew.
    pub fn track_pointer(&self, extent: &mut CanvasExtent, pointer: Point) -> bool {
        let need_w = if pointer.x > extent.width - self.margin {
            pointer.x + self.margin
        } else {
            extent.width
        };
        let need_h = if pointer.y > extent.height - self.margin {
            pointer.y + self.margin
        } else {
            extent.height
        };
        self.grow_to(extent, need_w, need_h)
    }

    fn grow_to(&self, extent: &mut CanvasExtent, need_w: f64, need_h: f64) -> bool {
        let width = if need_w > extent.width {
            self.round_up(need_w)
        } else {
            extent.width
        };
        let height = if need_h > extent.height {
            self.round_up(need_h)
        } else {
            extent.height
        };
        if width > extent.width || height > extent.height {
            log::debug!(
                "canvas extent {}x{} -> {}x{}",
                extent.width,
                extent.height,
                width,
                height
            );
            extent.width = width;
            extent.height = height;
            true
        } else {
            false
        }
    }
}
