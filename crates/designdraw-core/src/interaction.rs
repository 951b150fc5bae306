//! Pointer/keyboard state machine driving every scene mutation.

use crate::canvas::{Canvas, Scene, SceneEvent};
use crate::config::EngineConfig;
use crate::document::{Document, DocumentResult};
use crate::extent::CanvasExtent;
use crate::input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::selection::{HandleKind, Selection, handle_at, resize_bounds};
use crate::shapes::{Arrow, Freehand, Shape, ShapeId, ShapeTrait, Text};
use crate::text_edit::{TextEditOutcome, TextEditSession};
use crate::tools::{Session, ToolKind};
use kurbo::{Point, Rect, Vec2};

/// Requests the engine cannot satisfy itself; the host shows pickers and
/// writes files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    NewDocument,
    OpenDocument,
    SaveDocument,
    ExportImage,
}

/// What the pointer is currently doing.
#[derive(Debug, Clone)]
pub enum InteractionState {
    Idle,
    /// Dragging out a rectangle, ellipse or diamond.
    Drawing { anchor: Point, current: Point },
    /// Moving the selection. The snapshot is taken on the first move.
    Dragging { last: Point, snapshot_taken: bool },
    /// Dragging a resize handle of the single selected object.
    Resizing {
        /// The object as it was when the resize started.
        original: Shape,
        original_bounds: Rect,
        handle: HandleKind,
        start: Point,
    },
    PenStroking { path: Freehand },
    SelectingRect { start: Point, current: Point },
    /// `last` is in screen space.
    Panning { last: Point },
    EditingText(TextEditSession),
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Drawing { .. } => "drawing",
            Self::Dragging { .. } => "dragging",
            Self::Resizing { .. } => "resizing",
            Self::PenStroking { .. } => "pen-stroking",
            Self::SelectingRect { .. } => "selecting-rect",
            Self::Panning { .. } => "panning",
            Self::EditingText(_) => "editing-text",
        }
    }
}

/// In-progress feedback the presentation layer draws over the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    /// A shape, arrow or stroke that is not in the scene yet.
    Shape(Shape),
    /// Rubber-band selection rectangle.
    SelectionBand(Rect),
}

type Observer = Box<dyn FnMut(&SceneEvent)>;

/// Owns the canvas and turns input events into scene changes.
///
/// Hosts read the scene through [`InteractionController::scene`] and learn
/// about changes through [`InteractionController::on_scene_changed`].
pub struct InteractionController {
    canvas: Canvas,
    session: Session,
    state: InteractionState,
    pending_arrow: Option<Point>,
    pan_offset: Vec2,
    /// Last pointer position in canvas coordinates.
    pointer: Point,
    created: Option<String>,
    config: EngineConfig,
    observers: Vec<Observer>,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InteractionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionController")
            .field("state", &self.state.name())
            .field("tool", &self.session.tool)
            .field("objects", &self.canvas.scene().len())
            .field("selected", &self.canvas.selection().len())
            .field("pan_offset", &self.pan_offset)
            .finish_non_exhaustive()
    }
}

impl InteractionController {
    /// Create a controller with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            canvas: Canvas::new(&config),
            session: Session::default(),
            state: InteractionState::Idle,
            pending_arrow: None,
            pan_offset: Vec2::ZERO,
            pointer: Point::ZERO,
            created: None,
            config,
            observers: Vec::new(),
        }
    }

    // --- Presentation-facing accessors ---

    pub fn scene(&self) -> &Scene {
        self.canvas.scene()
    }

    pub fn selection(&self) -> &Selection {
        self.canvas.selection()
    }

    pub fn extent(&self) -> CanvasExtent {
        self.canvas.extent()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Style settings. Use [`InteractionController::set_tool`] to change tools.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn can_undo(&self) -> bool {
        self.canvas.history().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.canvas.history().can_redo()
    }

    pub fn pan_offset(&self) -> Vec2 {
        self.pan_offset
    }

    /// Start point of an arrow waiting for its second click.
    pub fn pending_arrow(&self) -> Option<Point> {
        self.pending_arrow
    }

    /// The in-progress shape, arrow or selection band, if any.
    pub fn preview(&self) -> Option<Preview> {
        match &self.state {
            InteractionState::Drawing { anchor, current } => self
                .session
                .create_box_shape(self.session.tool, Rect::from_points(*anchor, *current))
                .map(Preview::Shape),
            InteractionState::PenStroking { path } => {
                Some(Preview::Shape(Shape::Freehand(path.clone())))
            }
            InteractionState::SelectingRect { start, current } => {
                Some(Preview::SelectionBand(Rect::from_points(*start, *current)))
            }
            InteractionState::Idle => self
                .pending_arrow
                .map(|start| Preview::Shape(Shape::Arrow(self.build_arrow(start, self.pointer)))),
            _ => None,
        }
    }

    /// Register a callback run after every change.
    pub fn on_scene_changed(&mut self, callback: impl FnMut(&SceneEvent) + 'static) {
        self.observers.push(Box::new(callback));
    }

    fn emit(&mut self, event: SceneEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    fn to_canvas(&self, screen: Point) -> Point {
        screen - self.pan_offset
    }

    /// Grow the extent to the content and announce an object change.
    fn commit_changes(&mut self) {
        if self.canvas.fit_extent() {
            let extent = self.canvas.extent();
            self.emit(SceneEvent::ExtentChanged(extent));
        }
        self.emit(SceneEvent::ObjectsChanged);
    }

    fn add_object(&mut self, shape: Shape) {
        log::debug!("adding {} {}", shape.kind_name(), shape.id());
        self.canvas.checkpoint();
        self.canvas.scene_mut().push(shape);
        self.commit_changes();
    }

    fn build_arrow(&self, start: Point, end: Point) -> Arrow {
        let mut arrow = Arrow::new(start, end);
        arrow.bidirectional = self.session.tool == ToolKind::BiArrow;
        arrow.curved = self.session.curved_arrows;
        arrow.style = self.session.shape_style();
        arrow
    }

    fn new_text(&self, position: Point) -> Text {
        let mut text = Text::new(position, String::new())
            .with_font(self.session.font_size, self.session.font_family.clone());
        text.style = self.session.shape_style();
        text.style.fill_color = None;
        text.temporary = true;
        text
    }

    // --- Pointer input ---

    /// Handle a button press at a screen position.
    pub fn pointer_down(&mut self, event: PointerEvent) {
        let point = self.to_canvas(event.position);
        self.pointer = point;

        if let InteractionState::EditingText(edit) = &self.state {
            let on_edited = self
                .canvas
                .scene()
                .shape_at(point)
                .is_some_and(|s| s.id() == edit.shape_id);
            if on_edited && event.button == MouseButton::Left {
                return;
            }
            self.commit_text();
        }
        if !self.state.is_idle() {
            self.abort_state();
        }

        match event.button {
            MouseButton::Right => {
                self.discard_pending_arrow();
                return;
            }
            MouseButton::Middle => {
                self.state = InteractionState::Panning {
                    last: event.position,
                };
                return;
            }
            MouseButton::Left => {}
        }

        let tool = self.session.tool;
        let on_empty = self.canvas.scene().shape_at(point).is_none();
        if tool == ToolKind::Hand || (event.modifiers.ctrl && on_empty) {
            self.state = InteractionState::Panning {
                last: event.position,
            };
            return;
        }

        match tool {
            ToolKind::Select => self.select_pointer_down(point, event.modifiers),
            ToolKind::Pen => {
                let mut path = Freehand::new(self.session.pen_size);
                path.style = self.session.shape_style();
                path.style.fill_color = None;
                path.add_point(point);
                self.state = InteractionState::PenStroking { path };
            }
            ToolKind::Eraser => self.erase_at(point),
            ToolKind::Text => self.text_pointer_down(point),
            ToolKind::Arrow | ToolKind::BiArrow => self.arrow_click(point, event.modifiers.shift),
            ToolKind::Rectangle | ToolKind::Ellipse | ToolKind::Diamond => {
                self.state = InteractionState::Drawing {
                    anchor: point,
                    current: point,
                };
            }
            ToolKind::Hand => {}
        }
    }

    fn select_pointer_down(&mut self, point: Point, modifiers: Modifiers) {
        let resize = self.canvas.selection().single().and_then(|id| {
            let shape = self.canvas.scene().get(id)?;
            let bounds = shape.bounds();
            handle_at(bounds, point).map(|handle| (shape.clone(), bounds, handle))
        });
        if let Some((original, original_bounds, handle)) = resize {
            self.canvas.checkpoint();
            self.state = InteractionState::Resizing {
                original,
                original_bounds,
                handle,
                start: point,
            };
            return;
        }

        match self.canvas.scene().shape_at(point).map(Shape::id) {
            Some(id) if modifiers.shift => {
                self.canvas.selection_mut().toggle(id);
                self.emit(SceneEvent::SelectionChanged);
            }
            Some(id) => {
                if !self.canvas.selection().contains(id) {
                    self.canvas.selection_mut().select(id);
                    self.emit(SceneEvent::SelectionChanged);
                }
                self.state = InteractionState::Dragging {
                    last: point,
                    snapshot_taken: false,
                };
            }
            None => {
                if !modifiers.shift && !self.canvas.selection().is_empty() {
                    self.canvas.selection_mut().clear();
                    self.emit(SceneEvent::SelectionChanged);
                }
                self.state = InteractionState::SelectingRect {
                    start: point,
                    current: point,
                };
            }
        }
    }

    fn erase_at(&mut self, point: Point) {
        let Some(id) = self.canvas.scene().shape_at(point).map(Shape::id) else {
            return;
        };
        self.canvas.checkpoint();
        self.canvas.scene_mut().remove(id);
        if self.canvas.selection().contains(id) {
            self.canvas.selection_mut().remove(id);
            self.emit(SceneEvent::SelectionChanged);
        }
        self.commit_changes();
    }

    fn arrow_click(&mut self, point: Point, snap: bool) {
        let target = if snap {
            self.canvas
                .scene()
                .shape_at(point)
                .filter(|s| s.is_box_shape())
                .map(Shape::center)
        } else {
            None
        };
        let point = target.unwrap_or(point);

        match self.pending_arrow.take() {
            None => {
                self.pending_arrow = Some(point);
                self.emit(SceneEvent::ViewChanged);
            }
            Some(start) => {
                let arrow = self.build_arrow(start, point);
                self.add_object(Shape::Arrow(arrow));
                self.set_tool(ToolKind::Select);
            }
        }
    }

    fn text_pointer_down(&mut self, point: Point) {
        let existing = self
            .canvas
            .scene()
            .shape_at(point)
            .and_then(Shape::as_text)
            .map(|t| (t.id(), t.content.clone()));

        match existing {
            Some((id, content)) => {
                let before = self.canvas.scene().clone();
                self.state =
                    InteractionState::EditingText(TextEditSession::new(id, content, false, before));
            }
            None => self.begin_new_text(point),
        }
        self.emit(SceneEvent::ViewChanged);
    }

    /// Place an empty temporary text at `position` and start editing it.
    fn begin_new_text(&mut self, position: Point) {
        let before = self.canvas.scene().clone();
        let text = self.new_text(position);
        let id = text.id();
        self.canvas.scene_mut().push(Shape::Text(text));
        self.state = InteractionState::EditingText(TextEditSession::new(
            id,
            String::new(),
            true,
            before,
        ));
        self.emit(SceneEvent::ObjectsChanged);
    }

    /// Handle pointer movement to a screen position.
    pub fn pointer_move(&mut self, event: PointerEvent) {
        let point = self.to_canvas(event.position);
        self.pointer = point;
        let min_resize = self.config.min_resize_size;

        let (event_out, track) = match &mut self.state {
            InteractionState::Idle => (self.pending_arrow.map(|_| SceneEvent::ViewChanged), false),
            InteractionState::Drawing { current, .. } => {
                *current = point;
                (Some(SceneEvent::ViewChanged), true)
            }
            InteractionState::Dragging {
                last,
                snapshot_taken,
            } => {
                let delta = point - *last;
                if delta == Vec2::ZERO {
                    (None, false)
                } else {
                    if !*snapshot_taken {
                        self.canvas.checkpoint();
                        *snapshot_taken = true;
                    }
                    self.canvas.translate_selected(delta);
                    *last = point;
                    (Some(SceneEvent::ObjectsChanged), true)
                }
            }
            InteractionState::Resizing {
                original,
                original_bounds,
                handle,
                start,
            } => {
                let new_bounds = resize_bounds(*original_bounds, *handle, point - *start, min_resize);
                let mut resized = original.clone();
                resized.resize_to(new_bounds, *original_bounds);
                if let Some(slot) = self.canvas.scene_mut().get_mut(resized.id()) {
                    *slot = resized;
                }
                (Some(SceneEvent::ObjectsChanged), true)
            }
            InteractionState::PenStroking { path } => {
                path.add_point(point);
                (Some(SceneEvent::ViewChanged), true)
            }
            InteractionState::SelectingRect { current, .. } => {
                *current = point;
                (Some(SceneEvent::ViewChanged), false)
            }
            InteractionState::Panning { last } => {
                self.pan_offset += event.position - *last;
                *last = event.position;
                (Some(SceneEvent::ViewChanged), false)
            }
            InteractionState::EditingText(_) => (None, false),
        };

        if track && self.canvas.track_pointer(point) {
            let extent = self.canvas.extent();
            self.emit(SceneEvent::ExtentChanged(extent));
        }
        if let Some(e) = event_out {
            self.emit(e);
        }
    }

    /// Handle a button release at a screen position.
    pub fn pointer_up(&mut self, event: PointerEvent) {
        let point = self.to_canvas(event.position);
        self.pointer = point;

        match std::mem::replace(&mut self.state, InteractionState::Idle) {
            InteractionState::Idle => {}
            InteractionState::EditingText(edit) => {
                self.state = InteractionState::EditingText(edit);
            }
            InteractionState::Drawing { anchor, .. } => self.finish_drawing(anchor, point),
            InteractionState::Dragging { snapshot_taken, .. } => {
                if snapshot_taken {
                    self.commit_changes();
                }
            }
            InteractionState::Resizing { .. } => self.commit_changes(),
            InteractionState::PenStroking { path } => {
                if path.points.len() >= 2 {
                    self.add_object(Shape::Freehand(path));
                    self.set_tool(ToolKind::Select);
                } else {
                    log::debug!("discarding pen stroke with {} point(s)", path.points.len());
                    self.emit(SceneEvent::ViewChanged);
                }
            }
            InteractionState::SelectingRect { start, .. } => {
                let ids = self.canvas.scene().shapes_in_rect(Rect::from_points(start, point));
                for id in ids {
                    self.canvas.selection_mut().add(id);
                }
                self.emit(SceneEvent::SelectionChanged);
                self.emit(SceneEvent::ViewChanged);
            }
            InteractionState::Panning { .. } => {}
        }
    }

    fn finish_drawing(&mut self, anchor: Point, end: Point) {
        let rect = Rect::from_points(anchor, end);
        let min = self.config.min_shape_size;
        if rect.width() < min || rect.height() < min {
            log::debug!(
                "discarding {}x{} {} below minimum size",
                rect.width(),
                rect.height(),
                self.session.tool.name()
            );
            self.emit(SceneEvent::ViewChanged);
            return;
        }
        if let Some(shape) = self.session.create_box_shape(self.session.tool, rect) {
            self.add_object(shape);
            self.set_tool(ToolKind::Select);
        }
    }

    /// Attach a label to the box shape under a screen position.
    ///
    /// Creates an empty temporary text centered vertically in the shape and
    /// starts editing it. Hosts call this when they detect a double-click.
    pub fn double_click(&mut self, position: Point) {
        if matches!(self.state, InteractionState::EditingText(_)) {
            return;
        }
        let point = self.to_canvas(position);
        let Some(center) = self
            .canvas
            .scene()
            .shape_at(point)
            .filter(|s| s.is_box_shape())
            .map(Shape::center)
        else {
            return;
        };
        if !self.state.is_idle() {
            self.abort_state();
        }
        let anchor = Point::new(center.x, center.y - self.session.font_size / 2.0);
        self.begin_new_text(anchor);
    }

    // --- Keyboard input ---

    /// Handle a key press. Returns a command when the key asks the host to
    /// do something.
    pub fn key_down(&mut self, event: KeyEvent) -> Option<HostCommand> {
        if let InteractionState::EditingText(edit) = &mut self.state {
            let outcome = edit.handle_key(&event);
            match outcome {
                TextEditOutcome::Continue => {
                    let (id, content) = (edit.shape_id, edit.content.clone());
                    let changed = match self
                        .canvas
                        .scene_mut()
                        .get_mut(id)
                        .and_then(Shape::as_text_mut)
                    {
                        Some(text) if text.content != content => {
                            text.content = content;
                            true
                        }
                        _ => false,
                    };
                    self.emit(if changed {
                        SceneEvent::ObjectsChanged
                    } else {
                        SceneEvent::ViewChanged
                    });
                }
                TextEditOutcome::Commit => self.commit_text(),
                TextEditOutcome::Cancel => self.cancel(),
            }
            return None;
        }

        let modifiers = event.modifiers;
        match event.key {
            Key::Escape => self.cancel(),
            Key::Delete | Key::Backspace => {
                self.delete_selected();
            }
            Key::Character(_) if modifiers.command() => {
                match event.character()? {
                    'z' if modifiers.shift => {
                        self.redo();
                    }
                    'z' => {
                        self.undo();
                    }
                    'y' => {
                        self.redo();
                    }
                    'c' => {
                        self.copy();
                    }
                    'x' => {
                        self.cut();
                    }
                    'v' => {
                        self.paste();
                    }
                    'a' => self.select_all(),
                    'n' => return Some(HostCommand::NewDocument),
                    'o' => return Some(HostCommand::OpenDocument),
                    's' => return Some(HostCommand::SaveDocument),
                    'e' => return Some(HostCommand::ExportImage),
                    _ => {}
                }
            }
            Key::Character(c) => {
                if let Some(tool) = ToolKind::from_shortcut(c) {
                    self.set_tool(tool);
                }
            }
            _ => {}
        }
        None
    }

    // --- Text editing ---

    fn commit_text(&mut self) {
        let InteractionState::EditingText(edit) =
            std::mem::replace(&mut self.state, InteractionState::Idle)
        else {
            return;
        };

        if edit.temporary && edit.content.trim().is_empty() {
            self.canvas.scene_mut().remove(edit.shape_id);
            if self.canvas.selection().contains(edit.shape_id) {
                self.canvas.selection_mut().remove(edit.shape_id);
                self.emit(SceneEvent::SelectionChanged);
            }
            self.emit(SceneEvent::ObjectsChanged);
        } else {
            if edit.is_modified() || edit.temporary {
                self.canvas.checkpoint_with(edit.before);
            }
            if let Some(text) = self
                .canvas
                .scene_mut()
                .get_mut(edit.shape_id)
                .and_then(Shape::as_text_mut)
            {
                text.content = edit.content;
                text.temporary = false;
            }
            self.commit_changes();
        }
        self.set_tool(ToolKind::Select);
    }

    fn cancel_text(&mut self, edit: TextEditSession) {
        if edit.temporary {
            self.canvas.scene_mut().remove(edit.shape_id);
            self.canvas.selection_mut().remove(edit.shape_id);
        } else if let Some(text) = self
            .canvas
            .scene_mut()
            .get_mut(edit.shape_id)
            .and_then(Shape::as_text_mut)
        {
            text.content = edit.original;
        }
        self.emit(SceneEvent::ObjectsChanged);
    }

    // --- Cancellation ---

    /// Drop whatever pointer interaction is in progress. Edits already
    /// applied by a drag or resize stay, since their snapshot is recorded.
    fn abort_state(&mut self) {
        match std::mem::replace(&mut self.state, InteractionState::Idle) {
            InteractionState::Idle | InteractionState::Panning { .. } => {}
            InteractionState::EditingText(edit) => self.cancel_text(edit),
            InteractionState::Dragging { snapshot_taken, .. } => {
                if snapshot_taken {
                    self.commit_changes();
                }
            }
            InteractionState::Resizing { .. } => self.commit_changes(),
            InteractionState::Drawing { .. }
            | InteractionState::PenStroking { .. }
            | InteractionState::SelectingRect { .. } => self.emit(SceneEvent::ViewChanged),
        }
    }

    fn discard_pending_arrow(&mut self) {
        if self.pending_arrow.take().is_some() {
            self.emit(SceneEvent::ViewChanged);
        }
    }

    /// Escape: discard the in-progress action, text edit or pending arrow.
    /// With nothing in progress, clear the selection instead.
    pub fn cancel(&mut self) {
        if !self.state.is_idle() {
            self.abort_state();
        } else if self.pending_arrow.is_some() {
            self.discard_pending_arrow();
        } else if !self.canvas.selection().is_empty() {
            self.canvas.selection_mut().clear();
            self.emit(SceneEvent::SelectionChanged);
        }
    }

    // --- Commands ---

    /// Switch tools, clearing the selection and any pending arrow.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if matches!(self.state, InteractionState::EditingText(_)) {
            self.commit_text();
        } else if !self.state.is_idle() {
            self.abort_state();
        }
        self.session.tool = tool;
        self.discard_pending_arrow();
        if !self.canvas.selection().is_empty() {
            self.canvas.selection_mut().clear();
            self.emit(SceneEvent::SelectionChanged);
        }
    }

    pub fn select_all(&mut self) {
        let ids: Vec<ShapeId> = self.canvas.scene().iter().map(Shape::id).collect();
        self.canvas.selection_mut().set(ids);
        self.emit(SceneEvent::SelectionChanged);
    }

    /// Delete the selection. Returns how many objects were removed.
    pub fn delete_selected(&mut self) -> usize {
        if self.canvas.selection().is_empty() {
            return 0;
        }
        self.canvas.checkpoint();
        let removed = self.canvas.remove_selected();
        self.emit(SceneEvent::SelectionChanged);
        self.commit_changes();
        removed
    }

    /// Remove every object, as one undoable step.
    pub fn clear(&mut self) {
        self.settle_for_history();
        self.discard_pending_arrow();
        if self.canvas.scene().is_empty() {
            return;
        }
        self.canvas.checkpoint();
        self.canvas.scene_mut().clear();
        self.canvas.selection_mut().clear();
        self.emit(SceneEvent::SelectionChanged);
        self.emit(SceneEvent::ObjectsChanged);
    }

    /// Copy the selection. Returns how many objects were copied.
    pub fn copy(&mut self) -> usize {
        let count = self.canvas.copy_selection();
        log::debug!("copied {count} object(s)");
        count
    }

    /// Copy then delete the selection.
    pub fn cut(&mut self) -> usize {
        if self.copy() == 0 {
            return 0;
        }
        self.delete_selected()
    }

    /// Paste the clipboard into open space. Returns the ids of the copies,
    /// which become the selection.
    pub fn paste(&mut self) -> Vec<ShapeId> {
        if matches!(self.state, InteractionState::EditingText(_)) {
            self.commit_text();
        }
        let ids = self.canvas.paste();
        if !ids.is_empty() {
            self.emit(SceneEvent::SelectionChanged);
            self.commit_changes();
        }
        ids
    }

    fn settle_for_history(&mut self) {
        if matches!(self.state, InteractionState::EditingText(_)) {
            self.commit_text();
        } else if !self.state.is_idle() {
            self.abort_state();
        }
    }

    /// Step back one action. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.settle_for_history();
        if !self.canvas.undo() {
            return false;
        }
        self.after_history_step();
        true
    }

    /// Re-apply an undone action. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.settle_for_history();
        if !self.canvas.redo() {
            return false;
        }
        self.after_history_step();
        true
    }

    fn after_history_step(&mut self) {
        if self.canvas.fit_extent() {
            let extent = self.canvas.extent();
            self.emit(SceneEvent::ExtentChanged(extent));
        }
        self.emit(SceneEvent::SelectionChanged);
        self.emit(SceneEvent::DocumentReplaced);
    }

    // --- Documents ---

    fn reset(&mut self) {
        self.state = InteractionState::Idle;
        self.pending_arrow = None;
        self.canvas.reset();
    }

    fn announce_replaced(&mut self) {
        let extent = self.canvas.extent();
        self.emit(SceneEvent::ExtentChanged(extent));
        self.emit(SceneEvent::SelectionChanged);
        self.emit(SceneEvent::DocumentReplaced);
    }

    /// Start over with an empty document.
    pub fn new_document(&mut self) {
        self.reset();
        self.created = None;
        log::info!("new document");
        self.announce_replaced();
    }

    /// Replace the scene with a parsed document. On error nothing changes.
    pub fn load_document(&mut self, raw: &str) -> DocumentResult<()> {
        let document = Document::from_json(raw)?;
        self.reset();
        self.created = document.created.clone();
        log::info!("loaded document with {} objects", document.objects.len());
        self.canvas.replace_scene(document.into_scene());
        self.canvas.fit_extent();
        self.announce_replaced();
        Ok(())
    }

    /// Serialize the current scene.
    pub fn serialize_document(&self) -> DocumentResult<String> {
        let json = self.document().to_json()?;
        log::debug!("serialized {} bytes", json.len());
        Ok(json)
    }

    /// Snapshot of the current scene as a document.
    pub fn document(&self) -> Document {
        Document::from_scene(self.canvas.scene()).with_created(self.created.clone())
    }

    /// Like [`InteractionController::document`], but `None` while an action
    /// is in progress.
    pub fn stable_document(&self) -> Option<Document> {
        if self.state.is_idle() && self.pending_arrow.is_none() {
            Some(self.document())
        } else {
            None
        }
    }
}
