//! Drawing session: gesture handling, history wiring and timers.

use crate::config::AppConfig;
use crate::error::SessionResult;
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use inkcanvas_core::{
    CanvasObject, Clock, Color, Debouncer, FillStatus, GestureState, History, HistoryEntry,
    KeyEvent, ObjectId, PointerEvent, Scene, SystemClock, ToolKind, ToolSettings, ToolStyle,
    build_shape, build_text, flood_fill_bounded,
};
use inkcanvas_render::{SceneRenderer, Surface, TextRasterizer};
use kurbo::Point;
use std::collections::VecDeque;

/// Supplies text for the text tool.
pub trait TextPrompt: Send {
    /// Ask for the text to place at `position`. None means cancelled.
    fn prompt(&mut self, position: Point) -> Option<String>;
}

/// Prompt that always cancels.
#[derive(Debug, Default)]
pub struct NoPrompt;

impl TextPrompt for NoPrompt {
    fn prompt(&mut self, _position: Point) -> Option<String> {
        None
    }
}

/// Prompt that answers from a queue, cancelling once it runs dry.
#[derive(Debug, Default)]
pub struct FixedPrompt {
    answers: VecDeque<String>,
}

impl FixedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push(&mut self, answer: impl Into<String>) {
        self.answers.push_back(answer.into());
    }
}

impl TextPrompt for FixedPrompt {
    fn prompt(&mut self, _position: Point) -> Option<String> {
        self.answers.pop_front()
    }
}

/// Something the user should be told about.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// A fill stopped at its iteration bound; the partial result was kept.
    FillTruncated { iterations: usize },
    /// Pixels could not be read or written.
    SurfaceReadFailed(String),
    /// A history entry could not be restored; the canvas is unchanged.
    RestoreFailed(String),
    /// The current state could not be captured.
    SnapshotFailed(String),
}

/// Which debounced timer to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    Snapshot,
    Resize,
}

/// One drawing canvas and everything needed to edit it.
///
/// All state is owned here and mutated from a single thread. Pointer and
/// keyboard handlers run to completion; the only deferred work is the
/// debounced history snapshot and resize, fired by [`Session::tick`].
pub struct Session {
    config: AppConfig,
    settings: ToolSettings,
    scene: Scene,
    /// Persistent pixels from freehand strokes and fills.
    raster: Surface,
    /// Raster layer composited with the objects.
    display: Surface,
    /// Shape previews.
    overlay: Surface,
    renderer: SceneRenderer,
    gesture: GestureState,
    selection: Option<ObjectId>,
    history: History,
    resize: Debouncer<(u32, u32)>,
    notices: Vec<Notice>,
    prompt: Box<dyn TextPrompt>,
    clock: Box<dyn Clock>,
}

impl Session {
    /// Create a blank session. The empty canvas is committed as the first
    /// history entry, so undo always leads back to it.
    pub fn new(config: AppConfig) -> SessionResult<Self> {
        config.validate()?;
        let settings = config.tool_settings()?;
        let text = match &config.font_path {
            Some(path) => TextRasterizer::load(path)?,
            None => TextRasterizer::new(),
        };
        let (width, height) = (config.width, config.height);
        let mut session = Self {
            settings,
            scene: Scene::new(),
            raster: Surface::new(width, height)?,
            display: Surface::new(width, height)?,
            overlay: Surface::new(width, height)?,
            renderer: SceneRenderer::new(text),
            gesture: GestureState::Idle,
            selection: None,
            history: History::new(config.max_history, config.history_debounce()),
            resize: Debouncer::new(config.resize_debounce()),
            notices: Vec::new(),
            prompt: Box::new(NoPrompt),
            clock: Box::new(SystemClock),
            config,
        };
        session.commit_snapshot();
        session.render();
        log::info!("Session started at {width}x{height}");
        Ok(session)
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replace the text prompt.
    pub fn with_prompt(mut self, prompt: impl TextPrompt + 'static) -> Self {
        self.prompt = Box::new(prompt);
        self
    }

    // --- Tool settings ---

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    /// Switch tools. Any tool other than select drops the selection.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.settings.tool = tool;
        if tool != ToolKind::Select && self.selection.take().is_some() {
            self.render();
        }
        log::debug!("Tool: {}", tool.name());
    }

    /// Set the drawing color from a hex string.
    pub fn set_color(&mut self, color: &str) -> SessionResult<()> {
        self.settings.color = Color::parse(color)?;
        Ok(())
    }

    pub fn set_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.settings.width = width;
        } else {
            log::warn!("Ignoring stroke width {width}");
        }
    }

    pub fn set_font_size(&mut self, size: f64) {
        if size.is_finite() && size > 0.0 {
            self.settings.font_size = size;
        } else {
            log::warn!("Ignoring font size {size}");
        }
    }

    // --- Pointer input ---

    /// Dispatch a raw pointer event. Down and move events without usable
    /// coordinates are dropped; an up event without them ends the gesture
    /// at its anchor.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> SessionResult<()> {
        match event {
            PointerEvent::Down { .. } => match event.position() {
                Ok(point) => self.pointer_down(point),
                Err(err) => {
                    log::debug!("Ignoring pointer down: {err}");
                    Ok(())
                }
            },
            PointerEvent::Move { .. } => {
                match event.position() {
                    Ok(point) => self.pointer_move(point),
                    Err(err) => log::debug!("Ignoring pointer move: {err}"),
                }
                Ok(())
            }
            PointerEvent::Up { .. } => {
                self.pointer_up(event.position().ok());
                Ok(())
            }
        }
    }

    pub fn pointer_down(&mut self, point: Point) -> SessionResult<()> {
        if !self.gesture.is_idle() {
            log::debug!("Ignoring pointer down during {} gesture", self.gesture.name());
            return Ok(());
        }
        let tool = self.settings.tool;
        match tool {
            ToolKind::Select => self.begin_select(point),
            ToolKind::Pen | ToolKind::Highlighter | ToolKind::Eraser => {
                self.selection = None;
                self.gesture = GestureState::FreehandDrawing {
                    tool,
                    anchor: point,
                    last: point,
                };
                self.render();
            }
            ToolKind::Line | ToolKind::Rectangle | ToolKind::Circle => {
                self.selection = None;
                self.gesture = GestureState::ShapePreviewing {
                    tool,
                    anchor: point,
                    current: point,
                };
                self.render();
            }
            ToolKind::Text => self.place_text(point),
            ToolKind::Fill => self.fill_at(point)?,
        }
        Ok(())
    }

    pub fn pointer_move(&mut self, point: Point) {
        match &mut self.gesture {
            GestureState::Idle => {}
            GestureState::FreehandDrawing { tool, last, .. } => {
                let style = ToolStyle::for_tool(*tool);
                self.raster
                    .stroke_segment(*last, point, self.settings.color, self.settings.width, style);
                *last = point;
                self.render();
            }
            GestureState::ShapePreviewing {
                tool,
                anchor,
                current,
            } => {
                *current = point;
                self.renderer.render_preview(
                    &mut self.overlay,
                    *tool,
                    *anchor,
                    point,
                    self.settings.color,
                    self.settings.width,
                );
            }
            GestureState::Dragging { id, offset, .. } => {
                if let Some(object) = self.scene.get_mut(*id) {
                    object.move_origin_to(point - *offset);
                }
                self.render();
            }
        }
    }

    /// End the current gesture. Without a position the gesture ends where
    /// it started.
    pub fn pointer_up(&mut self, position: Option<Point>) {
        let gesture = std::mem::take(&mut self.gesture);
        let Some(end) = position.or_else(|| gesture.anchor()) else {
            return;
        };
        match gesture {
            GestureState::Idle => {}
            GestureState::FreehandDrawing { tool, anchor, last } => {
                // A click without movement still leaves a dot.
                if end != last || last == anchor {
                    let style = ToolStyle::for_tool(tool);
                    self.raster
                        .stroke_segment(last, end, self.settings.color, self.settings.width, style);
                }
                self.schedule_snapshot();
                self.render();
            }
            GestureState::ShapePreviewing { tool, anchor, .. } => {
                self.renderer.clear_overlay(&mut self.overlay);
                match build_shape(tool, anchor, end, &self.settings) {
                    Some(object) => {
                        log::debug!("Added {}", object.kind_name());
                        self.scene.add(object);
                        self.schedule_snapshot();
                    }
                    None => log::debug!("Discarded degenerate {} gesture", tool.name()),
                }
                self.render();
            }
            GestureState::Dragging { id, offset, .. } => {
                if let (Some(end), Some(object)) = (position, self.scene.get_mut(id)) {
                    object.move_origin_to(end - offset);
                }
                self.schedule_snapshot();
                self.render();
            }
        }
    }

    fn begin_select(&mut self, point: Point) {
        let hit = self
            .scene
            .pick_topmost(point)
            .map(|object| (object.id(), point - object.origin()));
        match hit {
            Some((id, offset)) => {
                self.selection = Some(id);
                self.gesture = GestureState::Dragging {
                    id,
                    offset,
                    anchor: point,
                    background: self.raster.to_raster(),
                };
            }
            None => self.selection = None,
        }
        self.render();
    }

    fn place_text(&mut self, point: Point) {
        let Some(input) = self.prompt.prompt(point) else {
            return;
        };
        if let Some(object) = build_text(point, &input, &self.settings) {
            self.scene.add(object);
            self.schedule_snapshot();
            self.render();
        }
    }

    // --- Commands ---

    /// Flood fill the flattened canvas from `point` with the current color.
    ///
    /// Objects are painted into the raster layer first so the fill sees
    /// their pixels. They also stay in the scene and keep painting on top.
    /// A skipped fill leaves the raster layer as it was.
    pub fn fill_at(&mut self, point: Point) -> SessionResult<()> {
        let mut pixels = self.renderer.flatten(&self.raster, &self.scene).to_raster();
        let max_iterations = self
            .config
            .max_fill_iterations
            .unwrap_or(pixels.width() as usize * pixels.height() as usize);
        // The seed is the pixel containing the point.
        let outcome = flood_fill_bounded(
            &mut pixels,
            point.x.floor() as i64,
            point.y.floor() as i64,
            self.settings.color,
            self.config.fill_tolerance,
            max_iterations,
        );
        if let FillStatus::Skipped(reason) = outcome.status {
            log::debug!("Fill skipped: {reason:?}");
            return Ok(());
        }
        if let Err(err) = self.raster.load_raster(&pixels) {
            log::error!("Fill write-back failed: {err}");
            self.notices.push(Notice::SurfaceReadFailed(err.to_string()));
            return Err(err.into());
        }
        if let Some(err) = outcome.truncation() {
            self.notices.push(Notice::FillTruncated {
                iterations: outcome.pops,
            });
            log::warn!("{err}");
        }
        self.schedule_snapshot();
        self.render();
        Ok(())
    }

    /// Remove the selected object. Returns whether anything was removed.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selection.take() else {
            return false;
        };
        let removed = self.scene.remove(id).is_some();
        if removed {
            self.schedule_snapshot();
        }
        self.render();
        removed
    }

    /// Remove every object and pixel.
    pub fn clear_canvas(&mut self) {
        self.scene.clear();
        self.raster.clear();
        self.selection = None;
        self.gesture = GestureState::Idle;
        self.renderer.clear_overlay(&mut self.overlay);
        self.schedule_snapshot();
        self.render();
        log::info!("Canvas cleared");
    }

    /// Run the action bound to a key press. Returns whether the key was used.
    pub fn handle_key(&mut self, event: &KeyEvent) -> SessionResult<bool> {
        let Some(action) = ShortcutRegistry::resolve(event, self.settings.tool) else {
            return Ok(false);
        };
        match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::DeleteSelection => Ok(self.delete_selected()),
            ShortcutAction::SelectTool(tool) => {
                self.set_tool(tool);
                Ok(true)
            }
        }
    }

    // --- History ---

    /// Step back one entry. A pending snapshot is committed first so the
    /// latest change is not lost. Returns whether anything changed.
    pub fn undo(&mut self) -> SessionResult<bool> {
        self.flush_snapshot();
        let Some(entry) = self.history.undo().cloned() else {
            return Ok(false);
        };
        if let Err(err) = self.restore(entry) {
            self.history.redo();
            return Err(err);
        }
        log::debug!("Undo to entry {}", self.history.index());
        Ok(true)
    }

    /// Step forward one entry. Returns whether anything changed.
    pub fn redo(&mut self) -> SessionResult<bool> {
        self.flush_snapshot();
        let Some(entry) = self.history.redo().cloned() else {
            return Ok(false);
        };
        if let Err(err) = self.restore(entry) {
            self.history.undo();
            return Err(err);
        }
        log::debug!("Redo to entry {}", self.history.index());
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo() || self.history.is_pending()
    }

    pub fn can_redo(&self) -> bool {
        !self.history.is_pending() && self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    fn schedule_snapshot(&mut self) {
        self.history.schedule(self.clock.now());
    }

    fn flush_snapshot(&mut self) {
        if self.history.take_pending() {
            self.commit_snapshot();
        }
    }

    fn commit_snapshot(&mut self) {
        if let Err(err) = self.scene.validate() {
            log::error!("Snapshot skipped: {err}");
            self.notices.push(Notice::SnapshotFailed(err.to_string()));
            return;
        }
        self.history
            .commit(HistoryEntry::capture(&self.scene, &self.raster.to_raster()));
    }

    /// Replace scene and pixels with a history entry. Nothing is touched
    /// unless the whole entry can be applied.
    fn restore(&mut self, entry: HistoryEntry) -> SessionResult<()> {
        let result = self.build_restored_raster(&entry);
        let raster = match result {
            Ok(raster) => raster,
            Err(err) => {
                log::error!("Restore failed: {err}");
                self.notices.push(Notice::RestoreFailed(err.to_string()));
                return Err(err);
            }
        };
        self.scene = entry.objects;
        self.raster = raster;
        self.selection = None;
        self.gesture = GestureState::Idle;
        self.renderer.clear_overlay(&mut self.overlay);
        self.render();
        Ok(())
    }

    fn build_restored_raster(&self, entry: &HistoryEntry) -> SessionResult<Surface> {
        entry.objects.validate()?;
        let (width, height) = (self.raster.width(), self.raster.height());
        match &entry.pixels {
            Some(pixels) if pixels.width() == width && pixels.height() == height => {
                Ok(Surface::from_raster(pixels)?)
            }
            // Captured before a resize.
            Some(pixels) => Ok(Surface::from_raster(&pixels.resized(width, height))?),
            None => Ok(Surface::new(width, height)?),
        }
    }

    // --- Timers ---

    /// Ask for new surface dimensions. Requests coalesce until the resize
    /// debounce passes.
    pub fn request_resize(&mut self, width: u32, height: u32) {
        self.resize.schedule(self.clock.now(), (width, height));
    }

    /// Fire every timer whose deadline has passed, earliest first.
    pub fn tick(&mut self) -> SessionResult<()> {
        let now = self.clock.now();
        for timer in self.timer_order() {
            match timer {
                // Held while a gesture is in flight so undo never lands
                // on a half-drawn stroke.
                Timer::Snapshot if !self.gesture.is_idle() => {}
                Timer::Snapshot => {
                    if self.history.due(now) {
                        self.commit_snapshot();
                    }
                }
                Timer::Resize => {
                    if let Some((width, height)) = self.resize.poll(now) {
                        self.apply_resize(width, height)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Fire every pending timer now, earliest first.
    pub fn flush(&mut self) -> SessionResult<()> {
        for timer in self.timer_order() {
            match timer {
                Timer::Snapshot => self.flush_snapshot(),
                Timer::Resize => {
                    if let Some((width, height)) = self.resize.take() {
                        self.apply_resize(width, height)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Whether a debounced snapshot or resize is waiting.
    pub fn has_pending_work(&self) -> bool {
        self.history.is_pending() || self.resize.is_pending()
    }

    fn timer_order(&self) -> [Timer; 2] {
        match (self.history.deadline(), self.resize.deadline()) {
            (Some(snapshot), Some(resize)) if resize < snapshot => [Timer::Resize, Timer::Snapshot],
            _ => [Timer::Snapshot, Timer::Resize],
        }
    }

    /// Resize every surface, keeping raster pixels anchored at the top-left.
    fn apply_resize(&mut self, width: u32, height: u32) -> SessionResult<()> {
        let mut raster = self.raster.clone();
        raster.resize(width, height)?;
        let display = Surface::new(width, height)?;
        let overlay = Surface::new(width, height)?;
        self.raster = raster;
        self.display = display;
        self.overlay = overlay;
        self.render();
        log::info!("Canvas resized to {width}x{height}");
        Ok(())
    }

    // --- Rendering and accessors ---

    fn render(&mut self) {
        let background = match &self.gesture {
            GestureState::Dragging { background, .. } => Some(background),
            _ => None,
        };
        if let Err(err) = self.renderer.render_all(
            &mut self.display,
            &self.raster,
            &self.scene,
            self.selection,
            background,
        ) {
            log::error!("Render failed: {err}");
            self.notices.push(Notice::SurfaceReadFailed(err.to_string()));
        }
    }

    /// Raster layer and objects flattened, without selection or preview.
    pub fn composite_for_export(&self) -> Surface {
        self.renderer.flatten(&self.raster, &self.scene)
    }

    pub fn selection(&self) -> Option<ObjectId> {
        self.selection
    }

    pub fn selected_object(&self) -> Option<&CanvasObject> {
        self.selection.and_then(|id| self.scene.get(id))
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn raster(&self) -> &Surface {
        &self.raster
    }

    pub fn display(&self) -> &Surface {
        &self.display
    }

    pub fn overlay(&self) -> &Surface {
        &self.overlay
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Drain queued notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::FillTruncated { iterations } => {
                write!(f, "Fill stopped after {iterations} steps and may be incomplete")
            }
            Notice::SurfaceReadFailed(msg) => write!(f, "Could not access canvas pixels: {msg}"),
            Notice::RestoreFailed(msg) => write!(f, "Could not restore history: {msg}"),
            Notice::SnapshotFailed(msg) => write!(f, "Could not save history: {msg}"),
        }
    }
}
