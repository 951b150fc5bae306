//! Linear undo/redo over whole-scene snapshots.

use crate::canvas::Scene;
use std::collections::VecDeque;

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Undo and redo stacks of scene snapshots.
///
/// Pushing a new snapshot clears the redo stack; there is no branching.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<Scene>,
    redo_stack: Vec<Scene>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_UNDO_HISTORY)
    }
}

impl History {
    /// Create empty history keeping at most `limit` undo entries (at least one).
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record the scene as it was before an action.
    pub fn push(&mut self, snapshot: Scene) {
        self.undo_stack.push_back(snapshot);
        self.redo_stack.clear();

        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
    }

    /// Step back. `current` goes onto the redo stack and the previous
    /// snapshot is returned; `None` (and no change) if nothing to undo.
    pub fn undo(&mut self, current: Scene) -> Option<Scene> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        log::debug!("undo: {} left, {} redoable", self.undo_stack.len(), self.redo_stack.len());
        Some(previous)
    }

    /// Step forward, mirroring [`History::undo`].
    pub fn redo(&mut self, current: Scene) -> Option<Scene> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(current);
        log::debug!("redo: {} undoable, {} left", self.undo_stack.len(), self.redo_stack.len());
        Some(next)
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Forget all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rectangle, Shape};
    use kurbo::Point;

    fn scene_with(n: usize) -> Scene {
        Scene::from(
            (0..n)
                .map(|i| Shape::Rectangle(Rectangle::new(Point::new(i as f64, 0.0), 10.0, 10.0)))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_undo_then_redo_round_trip() {
        let mut history = History::default();
        let before = scene_with(1);
        let after = scene_with(2);
        history.push(before.clone());

        let restored = history.undo(after.clone()).unwrap();
        assert_eq!(restored, before);
        assert!(history.can_redo());

        let redone = history.redo(restored).unwrap();
        assert_eq!(redone, after);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_push_clears_redo() {
        let mut history = History::default();
        history.push(scene_with(0));
        history.undo(scene_with(1)).unwrap();
        assert!(history.can_redo());

        history.push(scene_with(0));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut history = History::default();
        assert!(history.undo(Scene::new()).is_none());
        assert!(history.redo(Scene::new()).is_none());
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut history = History::default();
        for i in 0..51 {
            history.push(scene_with(i));
        }
        assert_eq!(history.undo_len(), 50);

        let mut current = scene_with(51);
        let mut oldest = None;
        while let Some(previous) = history.undo(current.clone()) {
            current = previous.clone();
            oldest = Some(previous);
        }
        // The very first snapshot (empty scene) was evicted
        assert_eq!(oldest.map(|s| s.len()), Some(1));
    }

    #[test]
    fn test_zero_limit_keeps_one() {
        let mut history = History::new(0);
        history.push(scene_with(1));
        history.push(scene_with(2));
        assert_eq!(history.undo_len(), 1);
        assert_eq!(history.limit(), 1);
    }
}
