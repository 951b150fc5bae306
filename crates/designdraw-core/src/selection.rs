//! Selection set, resize handles and resize math.

use crate::canvas::Scene;
use crate::shapes::ShapeId;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Side length of the square hit target around each handle.
pub const HANDLE_SIZE: f64 = 8.0;
/// Distance between the bounding box and the handle centers.
pub const HANDLE_OFFSET: f64 = 5.0;
/// Smallest width/height a resize can produce.
pub const MIN_RESIZE_SIZE: f64 = 10.0;

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Type of resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Corner handle, resizes both axes.
    Corner(Corner),
    /// Edge midpoint handle, resizes one axis.
    Edge(Edge),
}

impl HandleKind {
    /// All handles in hit-test priority order: corners, then edges.
    pub const ALL: [HandleKind; 8] = [
        HandleKind::Corner(Corner::TopLeft),
        HandleKind::Corner(Corner::TopRight),
        HandleKind::Corner(Corner::BottomLeft),
        HandleKind::Corner(Corner::BottomRight),
        HandleKind::Edge(Edge::Top),
        HandleKind::Edge(Edge::Bottom),
        HandleKind::Edge(Edge::Left),
        HandleKind::Edge(Edge::Right),
    ];

    /// Compass name ("nw", "e", ...).
    pub fn compass(self) -> &'static str {
        match self {
            HandleKind::Corner(Corner::TopLeft) => "nw",
            HandleKind::Corner(Corner::TopRight) => "ne",
            HandleKind::Corner(Corner::BottomLeft) => "sw",
            HandleKind::Corner(Corner::BottomRight) => "se",
            HandleKind::Edge(Edge::Top) => "n",
            HandleKind::Edge(Edge::Right) => "e",
            HandleKind::Edge(Edge::Bottom) => "s",
            HandleKind::Edge(Edge::Left) => "w",
        }
    }

    fn moves_left(self) -> bool {
        matches!(
            self,
            HandleKind::Corner(Corner::TopLeft | Corner::BottomLeft) | HandleKind::Edge(Edge::Left)
        )
    }

    fn moves_right(self) -> bool {
        matches!(
            self,
            HandleKind::Corner(Corner::TopRight | Corner::BottomRight)
                | HandleKind::Edge(Edge::Right)
        )
    }

    fn moves_top(self) -> bool {
        matches!(
            self,
            HandleKind::Corner(Corner::TopLeft | Corner::TopRight) | HandleKind::Edge(Edge::Top)
        )
    }

    fn moves_bottom(self) -> bool {
        matches!(
            self,
            HandleKind::Corner(Corner::BottomLeft | Corner::BottomRight)
                | HandleKind::Edge(Edge::Bottom)
        )
    }

    /// Center of this handle for an object with the given bounds.
    pub fn position(self, bounds: Rect) -> Point {
        let c = bounds.center();
        let (l, r) = (bounds.x0 - HANDLE_OFFSET, bounds.x1 + HANDLE_OFFSET);
        let (t, b) = (bounds.y0 - HANDLE_OFFSET, bounds.y1 + HANDLE_OFFSET);
        match self {
            HandleKind::Corner(Corner::TopLeft) => Point::new(l, t),
            HandleKind::Corner(Corner::TopRight) => Point::new(r, t),
            HandleKind::Corner(Corner::BottomLeft) => Point::new(l, b),
            HandleKind::Corner(Corner::BottomRight) => Point::new(r, b),
            HandleKind::Edge(Edge::Top) => Point::new(c.x, t),
            HandleKind::Edge(Edge::Bottom) => Point::new(c.x, b),
            HandleKind::Edge(Edge::Left) => Point::new(l, c.y),
            HandleKind::Edge(Edge::Right) => Point::new(r, c.y),
        }
    }
}

/// A resize handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Center position in canvas coordinates.
    pub position: Point,
    /// Handle type.
    pub kind: HandleKind,
}

impl Handle {
    /// Create a new handle.
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Square hit target centered on the handle.
    pub fn hit_rect(&self) -> Rect {
        Rect::from_center_size(self.position, (HANDLE_SIZE, HANDLE_SIZE))
    }

    /// Check if a point hits this handle (edges inclusive).
    pub fn hit_test(&self, point: Point) -> bool {
        let r = self.hit_rect();
        point.x >= r.x0 && point.x <= r.x1 && point.y >= r.y0 && point.y <= r.y1
    }
}

/// The eight resize handles around `bounds`, in hit-test priority order.
pub fn handles_for(bounds: Rect) -> [Handle; 8] {
    HandleKind::ALL.map(|kind| Handle::new(kind.position(bounds), kind))
}

/// The first handle around `bounds` that `point` hits.
pub fn handle_at(bounds: Rect, point: Point) -> Option<HandleKind> {
    handles_for(bounds)
        .into_iter()
        .find(|h| h.hit_test(point))
        .map(|h| h.kind)
}

/// Bounds produced by dragging `handle` of `original` by `delta`.
///
/// Sides the handle does not own stay fixed. When a side would bring the
/// size below `min_size`, it stops `min_size` away from the opposite side.
pub fn resize_bounds(original: Rect, handle: HandleKind, delta: Vec2, min_size: f64) -> Rect {
    let Rect { mut x0, mut y0, mut x1, mut y1 } = original.abs();

    if handle.moves_left() {
        x0 = (x0 + delta.x).min(x1 - min_size);
    }
    if handle.moves_right() {
        x1 = (x1 + delta.x).max(x0 + min_size);
    }
    if handle.moves_top() {
        y0 = (y0 + delta.y).min(y1 - min_size);
    }
    if handle.moves_bottom() {
        y1 = (y1 + delta.y).max(y0 + min_size);
    }

    Rect::new(x0, y0, x1, y1)
}

/// Ordered set of selected shape ids.
///
/// Holds ids only; the canvas prunes it whenever objects disappear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ShapeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with a single id.
    pub fn select(&mut self, id: ShapeId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Replace the selection with the given ids.
    pub fn set(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        self.ids.clear();
        for id in ids {
            self.add(id);
        }
    }

    /// Add to selection.
    pub fn add(&mut self, id: ShapeId) {
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
    }

    /// Add the id if absent, remove it if present.
    pub fn toggle(&mut self, id: ShapeId) {
        if self.contains(id) {
            self.remove(id);
        } else {
            self.ids.push(id);
        }
    }

    pub fn remove(&mut self, id: ShapeId) {
        self.ids.retain(|&s| s != id);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[ShapeId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The id when exactly one object is selected.
    pub fn single(&self) -> Option<ShapeId> {
        match self.ids.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }

    /// Drop ids that no longer exist in `scene`. Returns true if any were dropped.
    pub fn retain_existing(&mut self, scene: &Scene) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&id| scene.contains(id));
        self.ids.len() != before
    }
}
