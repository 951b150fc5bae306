//! Scene storage and the canvas state built around it.

use crate::clipboard::Clipboard;
use crate::config::EngineConfig;
use crate::extent::{CanvasExtent, ExtentPolicy};
use crate::geometry::{bounds_overlap, union_bounds};
use crate::history::History;
use crate::selection::Selection;
use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Rect, Vec2};

/// Ordered drawable objects, back to front.
///
/// The last object paints on top and is hit-tested first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    objects: Vec<Shape>,
}

impl From<Vec<Shape>> for Scene {
    fn from(objects: Vec<Shape>) -> Self {
        Self { objects }
    }
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Objects in paint order.
    pub fn objects(&self) -> &[Shape] {
        &self.objects
    }

    /// Iterate in paint order (back to front).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Shape> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Add an object on top.
    pub fn push(&mut self, shape: Shape) {
        self.objects.push(shape);
    }

    /// Remove an object by id.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.index_of(id)?;
        Some(self.objects.remove(index))
    }

    /// Remove every object.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.objects.iter().position(|s| s.id() == id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.index_of(id).is_some()
    }

    /// Get a shape by ID.
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.objects.iter().find(|s| s.id() == id)
    }

    /// Get a mutable reference to a shape by ID.
    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.objects.iter_mut().find(|s| s.id() == id)
    }

    /// Topmost object under `point`.
    pub fn shape_at(&self, point: Point) -> Option<&Shape> {
        self.objects.iter().rev().find(|s| s.hit_test(point))
    }

    /// All objects under `point`, front to back.
    pub fn shapes_at_point(&self, point: Point) -> Vec<ShapeId> {
        self.objects
            .iter()
            .rev()
            .filter(|s| s.hit_test(point))
            .map(Shape::id)
            .collect()
    }

    /// Objects whose bounds strictly overlap `rect`, in paint order.
    pub fn shapes_in_rect(&self, rect: Rect) -> Vec<ShapeId> {
        let rect = rect.abs();
        self.objects
            .iter()
            .filter(|s| bounds_overlap(s.bounds(), rect))
            .map(Shape::id)
            .collect()
    }

    /// Whether `area` overlaps no object.
    pub fn is_area_free(&self, area: Rect) -> bool {
        !self.objects.iter().any(|s| bounds_overlap(s.bounds(), area))
    }

    /// Union of all object bounds.
    pub fn bounds(&self) -> Option<Rect> {
        union_bounds(self.objects.iter().map(Shape::bounds))
    }

    /// Union of the bounds of the given objects.
    pub fn bounds_of(&self, ids: &[ShapeId]) -> Option<Rect> {
        union_bounds(
            self.objects
                .iter()
                .filter(|s| ids.contains(&s.id()))
                .map(Shape::bounds),
        )
    }

    /// Clones of the given objects, in paint order.
    pub fn cloned(&self, ids: &[ShapeId]) -> Vec<Shape> {
        self.objects
            .iter()
            .filter(|s| ids.contains(&s.id()))
            .cloned()
            .collect()
    }

    /// Consume the scene, yielding its objects.
    pub fn into_objects(self) -> Vec<Shape> {
        self.objects
    }
}

/// Change notification emitted after the canvas mutates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneEvent {
    /// Objects were added, removed or modified.
    ObjectsChanged,
    /// The selection set changed.
    SelectionChanged,
    /// The logical drawing surface grew or was reset.
    ExtentChanged(CanvasExtent),
    /// The whole scene was replaced (new or loaded document, undo, redo).
    DocumentReplaced,
    /// Pan offset or in-progress preview changed; content is untouched.
    ViewChanged,
}

/// Scene plus the state that lives alongside it: selection, history,
/// clipboard and extent.
#[derive(Debug, Clone)]
pub struct Canvas {
    scene: Scene,
    selection: Selection,
    history: History,
    clipboard: Clipboard,
    extent: CanvasExtent,
    policy: ExtentPolicy,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl Canvas {
    /// Create an empty canvas.
    pub fn new(config: &EngineConfig) -> Self {
        let policy = config.extent_policy();
        Self {
            scene: Scene::new(),
            selection: Selection::new(),
            history: History::new(config.history_limit),
            clipboard: Clipboard::new(),
            extent: policy.initial(),
            policy,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn extent(&self) -> CanvasExtent {
        self.extent
    }

    pub(crate) fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub(crate) fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Record the current scene as one undoable step.
    pub(crate) fn checkpoint(&mut self) {
        self.history.push(self.scene.clone());
    }

    /// Record a scene captured earlier as one undoable step.
    pub(crate) fn checkpoint_with(&mut self, snapshot: Scene) {
        self.history.push(snapshot);
    }

    /// Restore the previous snapshot. Returns false if there was none.
    pub(crate) fn undo(&mut self) -> bool {
        let current = self.scene.clone();
        match self.history.undo(current) {
            Some(previous) => {
                self.scene = previous;
                self.selection.clear();
                true
            }
            None => false,
        }
    }

    /// Re-apply an undone snapshot. Returns false if there was none.
    pub(crate) fn redo(&mut self) -> bool {
        let current = self.scene.clone();
        match self.history.redo(current) {
            Some(next) => {
                self.scene = next;
                self.selection.clear();
                true
            }
            None => false,
        }
    }

    /// Replace the whole scene, dropping selection ids that no longer exist.
    pub(crate) fn replace_scene(&mut self, scene: Scene) {
        self.scene = scene;
        self.selection.retain_existing(&self.scene);
    }

    /// Empty everything for a fresh document. The clipboard survives.
    pub(crate) fn reset(&mut self) {
        self.scene.clear();
        self.selection.clear();
        self.history.clear();
        self.policy.reset(&mut self.extent);
    }

    /// Remove the selected objects. Returns how many were removed.
    pub(crate) fn remove_selected(&mut self) -> usize {
        let ids: Vec<ShapeId> = self.selection.ids().to_vec();
        let removed = ids
            .into_iter()
            .filter(|&id| self.scene.remove(id).is_some())
            .count();
        self.selection.clear();
        removed
    }

    /// Move every selected object by `delta`.
    pub(crate) fn translate_selected(&mut self, delta: Vec2) {
        let ids = self.selection.ids().to_vec();
        for id in ids {
            if let Some(shape) = self.scene.get_mut(id) {
                shape.translate(delta);
            }
        }
    }

    /// Copy the selected objects to the clipboard. Returns how many were copied.
    pub(crate) fn copy_selection(&mut self) -> usize {
        let objects = self.scene.cloned(self.selection.ids());
        let count = objects.len();
        if count > 0 {
            self.clipboard.copy(objects);
        }
        count
    }

    /// Paste the clipboard into open space and select the copies.
    /// Returns the new ids, empty when the clipboard was empty.
    pub(crate) fn paste(&mut self) -> Vec<ShapeId> {
        let Some(clip_bounds) = self.clipboard.bounds() else {
            return Vec::new();
        };
        let offset = crate::clipboard::find_paste_offset(clip_bounds, &self.scene);
        self.checkpoint();
        let pasted = self.clipboard.instantiate(offset);
        let ids: Vec<ShapeId> = pasted.iter().map(Shape::id).collect();
        for shape in pasted {
            self.scene.push(shape);
        }
        self.selection.set(ids.iter().copied());
        ids
    }

    /// Grow the extent to cover all content. Returns true if it grew.
    pub(crate) fn fit_extent(&mut self) -> bool {
        match self.scene.bounds() {
            Some(bounds) => self.policy.fit_content(&mut self.extent, bounds),
            None => false,
        }
    }

    /// Grow the extent ahead of a pointer near its edge. Returns true if it grew.
    pub(crate) fn track_pointer(&mut self, point: Point) -> bool {
        self.policy.track_pointer(&mut self.extent, point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rectangle, ShapeTrait};

    fn rect_at(x: f64, y: f64, size: f64) -> Shape {
        Shape::Rectangle(Rectangle::new(Point::new(x, y), size, size))
    }

    #[test]
    fn test_scene_push_and_remove() {
        let mut scene = Scene::new();
        let rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        let id = rect.id();

        scene.push(Shape::Rectangle(rect));
        assert_eq!(scene.len(), 1);
        assert!(scene.get(id).is_some());

        assert!(scene.remove(id).is_some());
        assert!(scene.is_empty());
        assert!(scene.remove(id).is_none());
    }

    #[test]
    fn test_shapes_at_point_front_first() {
        let mut scene = Scene::new();
        let back = rect_at(0.0, 0.0, 100.0);
        let front = rect_at(50.0, 50.0, 100.0);
        let (back_id, front_id) = (back.id(), front.id());
        scene.push(back);
        scene.push(front);

        let hits = scene.shapes_at_point(Point::new(75.0, 75.0));
        assert_eq!(hits, vec![front_id, back_id]);
        assert_eq!(scene.shape_at(Point::new(75.0, 75.0)).map(Shape::id), Some(front_id));
        assert_eq!(scene.shape_at(Point::new(25.0, 25.0)).map(Shape::id), Some(back_id));
        assert!(scene.shape_at(Point::new(500.0, 500.0)).is_none());
    }

    #[test]
    fn test_shapes_in_rect_strict() {
        let mut scene = Scene::new();
        let a = rect_at(0.0, 0.0, 10.0);
        let b = rect_at(20.0, 0.0, 10.0);
        let a_id = a.id();
        scene.push(a);
        scene.push(b);

        // Band touching `b` only at its left edge selects nothing from it
        assert_eq!(scene.shapes_in_rect(Rect::new(5.0, 5.0, 20.0, 6.0)), vec![a_id]);
        // Reversed band corners are normalized
        assert_eq!(scene.shapes_in_rect(Rect::new(20.0, 6.0, 5.0, 5.0)), vec![a_id]);
    }

    #[test]
    fn test_canvas_undo_clears_selection() {
        let mut canvas = Canvas::default();
        let rect = rect_at(0.0, 0.0, 10.0);
        let id = rect.id();
        canvas.checkpoint();
        canvas.scene_mut().push(rect);
        canvas.selection_mut().select(id);

        assert!(canvas.undo());
        assert!(canvas.scene().is_empty());
        assert!(canvas.selection().is_empty());

        assert!(canvas.redo());
        assert!(canvas.scene().contains(id));
        assert!(canvas.selection().is_empty());
    }

    #[test]
    fn test_undo_redo_empty_is_noop() {
        let mut canvas = Canvas::default();
        assert!(!canvas.undo());
        assert!(!canvas.redo());
        assert!(canvas.scene().is_empty());
    }

    #[test]
    fn test_remove_selected_prunes_selection() {
        let mut canvas = Canvas::default();
        let rect = rect_at(0.0, 0.0, 10.0);
        let id = rect.id();
        canvas.scene_mut().push(rect);
        canvas.selection_mut().select(id);

        assert_eq!(canvas.remove_selected(), 1);
        assert!(canvas.scene().is_empty());
        assert!(canvas.selection().is_empty());
    }

    #[test]
    fn test_paste_twice_yields_distinct_bounds() {
        let mut canvas = Canvas::default();
        let rect = rect_at(0.0, 0.0, 50.0);
        let id = rect.id();
        canvas.scene_mut().push(rect);
        canvas.selection_mut().select(id);
        assert_eq!(canvas.copy_selection(), 1);

        let first = canvas.paste();
        let second = canvas.paste();
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(canvas.selection().ids(), second.as_slice());

        let bounds: Vec<Rect> = canvas.scene().iter().map(Shape::bounds).collect();
        assert_eq!(bounds.len(), 3);
        for i in 0..bounds.len() {
            for j in (i + 1)..bounds.len() {
                assert_ne!(bounds[i], bounds[j]);
                assert!(!bounds_overlap(bounds[i], bounds[j]));
            }
        }
        let ids: Vec<ShapeId> = canvas.scene().iter().map(Shape::id).collect();
        assert!(ids[0] != ids[1] && ids[1] != ids[2] && ids[0] != ids[2]);
    }

    #[test]
    fn test_paste_empty_clipboard_is_noop() {
        let mut canvas = Canvas::default();
        assert!(canvas.paste().is_empty());
        assert!(!canvas.history().can_undo());
    }

    #[test]
    fn test_reset_restores_initial_extent() {
        let mut canvas = Canvas::default();
        let initial = canvas.extent();
        canvas.scene_mut().push(rect_at(5000.0, 5000.0, 10.0));
        assert!(canvas.fit_extent());
        assert!(canvas.extent().width > initial.width);
        canvas.reset();
        assert_eq!(canvas.extent(), initial);
        assert!(canvas.scene().is_empty());
    }
}
