//! Freehand drawing session: pointer gestures to committed strokes.

use super::recorder::PathRecorder;
use super::surface::{DrawingSurface, LiveStroke};
use super::tool::{BrushSettings, DrawingTool, SessionConfig};
use super::{DrawingData, DrawingPath};
use crate::annotation::{Annotation, AnnotationManager, SymbolType};
use crate::camera::Camera;
use crate::error::{EngineError, EngineResult};
use crate::history::HistoryStack;
use crate::input::{InputTranslator, Modifiers, PointerInput};
use kurbo::{Affine, Point, Size, Vec2};

/// Session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Drawing,
}

/// Callback invoked with the committed snapshot after every change.
type ChangeListener = Box<dyn FnMut(&DrawingData)>;

/// Gesture opened by `pointer_down` and closed by `pointer_up`.
#[derive(Debug, Clone)]
enum Gesture {
    /// Shift-drag pan; holds the last local pointer position.
    Pan(Point),
    /// Arrow drag; holds the color captured at press.
    Arrow(String),
}

/// A drawing session bound to one surface.
///
/// Owns the surface, the history and the open stroke. Every committed stroke
/// or annotation pushes exactly one snapshot; undo and redo replace the
/// rendered content wholesale.
pub struct CanvasDrawingSession<S: DrawingSurface> {
    surface: S,
    history: HistoryStack<DrawingData>,
    recorder: Option<PathRecorder>,
    annotations: AnnotationManager,
    camera: Camera,
    input: InputTranslator,
    gesture: Option<Gesture>,
    listeners: Vec<ChangeListener>,
}

impl<S: DrawingSurface> CanvasDrawingSession<S> {
    /// Mount a session on `surface`, optionally seeded from stored data.
    ///
    /// Fails when no surface is supplied or the surface has no area.
    pub fn mount(
        surface: Option<S>,
        seed: Option<&DrawingData>,
        config: &SessionConfig,
    ) -> EngineResult<Self> {
        let surface = surface.ok_or(EngineError::MissingSurface)?;
        let size = surface.size();
        if !has_area(size) {
            return Err(EngineError::InvalidSurfaceSize {
                width: size.width,
                height: size.height,
            });
        }

        let initial = seed.cloned().unwrap_or_default();
        log::debug!(
            "Mounting drawing session: {} paths, {} annotations",
            initial.paths.len(),
            initial.annotations.len()
        );
        let mut session = Self {
            surface,
            history: HistoryStack::with_initial(initial).with_limit(config.history_limit),
            recorder: None,
            annotations: AnnotationManager::new(),
            camera: Camera::new(),
            input: InputTranslator::new(Point::ZERO, size),
            gesture: None,
            listeners: Vec::new(),
        };
        session.redraw();
        Ok(session)
    }

    /// Register a listener for committed changes.
    pub fn on_change(&mut self, listener: impl FnMut(&DrawingData) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        if self.recorder.is_some() {
            SessionState::Drawing
        } else {
            SessionState::Idle
        }
    }

    // --- Strokes ---

    /// Open a stroke at `point` (surface coordinates).
    ///
    /// Tool, color, opacity and brush size are taken from `settings` now and
    /// stay fixed until the stroke ends. Ignored unless idle.
    pub fn begin_stroke(&mut self, point: Point, settings: &BrushSettings) -> bool {
        if self.recorder.is_some() {
            log::trace!("begin_stroke ignored: stroke already open");
            return false;
        }
        if !settings.tool.is_stroke_tool() {
            log::trace!("begin_stroke ignored: {:?} does not draw strokes", settings.tool);
            return false;
        }
        let recorder = PathRecorder::start(point, settings.stroke_style());
        log::debug!("Stroke started ({:?}) at {:?}", recorder.style().op, point);
        self.recorder = Some(recorder);
        self.paint_live();
        true
    }

    /// Extend the open stroke and repaint immediately. Ignored unless drawing.
    pub fn continue_stroke(&mut self, point: Point) -> bool {
        let Some(recorder) = self.recorder.as_mut() else {
            log::trace!("continue_stroke ignored: no open stroke");
            return false;
        };
        recorder.push(point);
        self.paint_live();
        true
    }

    /// Commit the open stroke as one undoable step. Ignored unless drawing.
    pub fn end_stroke(&mut self) -> bool {
        let Some(recorder) = self.recorder.take() else {
            log::trace!("end_stroke ignored: no open stroke");
            return false;
        };
        let path = recorder.finish();
        log::debug!("Stroke committed: {}", path.path_data());
        let mut next = self.history.current().clone();
        next.paths.push(path);
        self.commit(next);
        true
    }

    /// Discard the open stroke and restore the committed picture.
    pub fn cancel_stroke(&mut self) -> bool {
        if self.recorder.take().is_none() {
            return false;
        }
        log::debug!("Stroke cancelled");
        self.redraw();
        true
    }

    // --- Annotations ---

    /// Place an arrow colored with the active quality.
    pub fn place_arrow(&mut self, start: Point, end: Point, settings: &BrushSettings) {
        self.push_annotation(Annotation::arrow(start, end, settings.quality_hex()));
    }

    /// Place a text note. Blank content is ignored.
    pub fn place_text(&mut self, point: Point, content: &str) -> bool {
        match self.annotations.text_at(point, content) {
            Some(text) => {
                self.push_annotation(text);
                true
            }
            None => {
                log::trace!("Blank text note ignored");
                false
            }
        }
    }

    /// Place a symbol glyph colored with the active quality.
    pub fn place_symbol(&mut self, point: Point, symbol: SymbolType, settings: &BrushSettings) {
        self.push_annotation(Annotation::symbol(point, symbol, settings.quality_hex()));
    }

    /// Place the session's active symbol.
    pub fn place_active_symbol(&mut self, point: Point, settings: &BrushSettings) {
        let symbol = self.annotations.active_symbol();
        self.place_symbol(point, symbol, settings);
    }

    /// Symbol used by `place_active_symbol`.
    pub fn active_symbol(&self) -> SymbolType {
        self.annotations.active_symbol()
    }

    /// Change the symbol for future placements.
    pub fn set_active_symbol(&mut self, symbol: SymbolType) {
        self.annotations.set_active_symbol(symbol);
    }

    fn push_annotation(&mut self, annotation: Annotation) {
        log::debug!("Annotation placed: {:?}", annotation.kind);
        let mut next = self.history.current().clone();
        next.annotations.push(annotation);
        self.commit(next);
    }

    // --- History ---

    /// Step back one snapshot. An open stroke is discarded first.
    pub fn undo(&mut self) -> bool {
        self.discard_open_stroke();
        if !self.history.can_undo() {
            return false;
        }
        self.history.undo();
        self.redraw();
        self.emit();
        true
    }

    /// Step forward one snapshot. An open stroke is discarded first.
    pub fn redo(&mut self) -> bool {
        self.discard_open_stroke();
        if !self.history.can_redo() {
            return false;
        }
        self.history.redo();
        self.redraw();
        self.emit();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Remove all paths and annotations as one undoable step.
    pub fn clear_all(&mut self) {
        self.discard_open_stroke();
        self.annotations.cancel_pending();
        log::debug!("Drawing cleared");
        self.commit(DrawingData::default());
    }

    /// Replace history with a single snapshot (e.g. when loading stored data).
    ///
    /// Listeners are not notified.
    pub fn reset_history(&mut self, data: DrawingData) {
        self.discard_open_stroke();
        let limit = self.history.limit();
        self.history = HistoryStack::with_initial(data).with_limit(limit);
        self.redraw();
    }

    // --- Pointer routing ---

    /// Route a press by the active tool.
    ///
    /// Shift starts a pan regardless of tool. Presses are ignored while a
    /// stroke, pan or arrow drag is open. Returns whether the press was
    /// consumed.
    pub fn pointer_down(
        &mut self,
        input: &PointerInput,
        modifiers: Modifiers,
        settings: &BrushSettings,
    ) -> bool {
        if self.recorder.is_some() || self.gesture.is_some() || self.annotations.arrow_in_progress() {
            log::trace!("Press ignored: gesture already in progress");
            return false;
        }
        let Some(screen) = input.primary() else {
            return false;
        };
        let Some(local) = self.input.to_local(screen) else {
            return false;
        };
        if modifiers.shift {
            self.gesture = Some(Gesture::Pan(local));
            return true;
        }
        let point = self.camera.to_surface(local);
        match settings.tool {
            DrawingTool::Draw | DrawingTool::Erase => self.begin_stroke(point, settings),
            DrawingTool::Arrow => {
                self.annotations.begin_arrow(point);
                self.gesture = Some(Gesture::Arrow(settings.quality_hex()));
                true
            }
            DrawingTool::Text => {
                self.annotations.begin_text(point);
                true
            }
            DrawingTool::Symbol => {
                self.place_symbol(point, settings.symbol, settings);
                true
            }
        }
    }

    /// Route a move: extends the open stroke or pans.
    pub fn pointer_move(&mut self, input: &PointerInput) -> bool {
        let Some(screen) = input.primary() else {
            return false;
        };
        if let Some(Gesture::Pan(last)) = &self.gesture {
            let last = *last;
            let local = screen - self.input.origin().to_vec2();
            self.gesture = Some(Gesture::Pan(local));
            return self.pan_by(local - last);
        }
        if self.recorder.is_none() {
            return false;
        }
        match self.input.to_surface(input, &self.camera) {
            Some(point) => self.continue_stroke(point),
            None => false,
        }
    }

    /// Route a release: commits the open stroke or places a dragged arrow.
    ///
    /// A release outside the surface still ends the stroke; it only adds no
    /// point.
    pub fn pointer_up(&mut self, input: &PointerInput) -> bool {
        match self.gesture.take() {
            Some(Gesture::Pan(_)) => true,
            Some(Gesture::Arrow(color)) => {
                let end = self.input.to_surface(input, &self.camera);
                let arrow = end.and_then(|end| self.annotations.finish_arrow(end, &color));
                match arrow {
                    Some(arrow) => {
                        self.push_annotation(arrow);
                        true
                    }
                    None => {
                        self.annotations.cancel_pending();
                        false
                    }
                }
            }
            None => self.end_stroke(),
        }
    }

    /// Complete a pending text placement started by a text-tool press.
    pub fn submit_text(&mut self, content: &str) -> bool {
        match self.annotations.finish_text(content) {
            Some(text) => {
                self.push_annotation(text);
                true
            }
            None => false,
        }
    }

    /// Anchor of a text placement awaiting its content.
    pub fn pending_text(&self) -> Option<Point> {
        self.annotations.pending_text()
    }

    // --- View ---

    /// Zoom the view by an additive step. Re-frames only.
    pub fn zoom_by(&mut self, delta: f64) -> bool {
        let changed = self.camera.zoom_by(delta);
        if changed {
            log::debug!("Canvas zoom {}%", self.camera.zoom_percent());
            self.redraw();
        }
        changed
    }

    /// Pan the view by a delta in canvas pixels. Re-frames only.
    pub fn pan_by(&mut self, delta: Vec2) -> bool {
        if delta == Vec2::ZERO {
            return false;
        }
        self.camera.pan(delta);
        self.redraw();
        true
    }

    /// Restore 100% zoom and no pan.
    pub fn reset_view(&mut self) {
        self.camera.reset();
        self.redraw();
    }

    /// Update the surface's screen origin after host layout changes.
    pub fn set_surface_origin(&mut self, origin: Point) {
        self.input.set_origin(origin);
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    // --- Accessors ---

    /// The committed snapshot (what is rendered when idle).
    pub fn snapshot(&self) -> &DrawingData {
        self.history.current()
    }

    pub fn paths(&self) -> &[DrawingPath] {
        &self.history.current().paths
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.history.current().annotations
    }

    pub fn history(&self) -> &HistoryStack<DrawingData> {
        &self.history
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Unmount, returning the committed snapshot. An open stroke is dropped.
    pub fn teardown(mut self) -> DrawingData {
        self.discard_open_stroke();
        log::debug!("Drawing session torn down");
        self.history.current().clone()
    }

    // --- Internals ---

    fn view(&self) -> Affine {
        self.camera.view()
    }

    fn commit(&mut self, next: DrawingData) {
        self.history.push(next);
        self.redraw();
        self.emit();
    }

    fn redraw(&mut self) {
        let view = self.view();
        self.surface.redraw(self.history.current(), view);
    }

    fn paint_live(&mut self) {
        let view = self.view();
        if let Some(recorder) = &self.recorder {
            self.surface.paint_live_stroke(
                LiveStroke {
                    points: recorder.points(),
                    style: recorder.style(),
                },
                view,
            );
        }
    }

    fn discard_open_stroke(&mut self) {
        if self.recorder.take().is_some() {
            log::debug!("Open stroke discarded");
            self.redraw();
        }
    }

    fn emit(&mut self) {
        let snapshot = self.history.current();
        for listener in &mut self.listeners {
            listener(snapshot);
        }
    }
}

fn has_area(size: Size) -> bool {
    size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
}
