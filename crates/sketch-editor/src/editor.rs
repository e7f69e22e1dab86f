//! The editor controller.
//!
//! [`Editor`] owns the scene, history, viewport, gesture router, style and
//! selection. Every entry point returns the [`Effect`]s the host should act
//! on (redraw, open a text prompt, update toolbar state).
//!
//! Mutations never commit to history directly. They mark a pending commit,
//! and each entry point flushes it once after all intents of the event have
//! been applied, so one user action is one undo step.

use crate::history::History;
use crate::input::{InputEvent, Modifiers};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::{GestureRouter, Intent, ToolKind};
use sketch_core::model::{Entity, EntityRef, Point};
use sketch_core::scene::{Layer, Scene};
use sketch_core::style::Style;
use sketch_core::viewport::Viewport;
use sketch_core::{Color, Fill};
use sketch_render::{ExportOptions, hit_test, render_png, render_svg};

/// Editor settings. There are no config files; hosts construct this.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Axis-wise eraser reach, in canvas units.
    pub eraser_threshold: f64,
    pub export: ExportOptions,
    pub style: Style,
    pub initial_tool: ToolKind,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            eraser_threshold: 15.0,
            export: ExportOptions::default(),
            style: Style::default(),
            initial_tool: ToolKind::Pen,
        }
    }
}

/// The host drawing surface. Input and export need one attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    /// Device-space position of the surface's top-left corner.
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

/// Something the host should do in response to an entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Redraw,
    /// Ask the user for label text. Answer with [`Editor::commit_text`] or
    /// [`Editor::cancel_text`].
    PromptText { canvas: Point, device: Point },
    ToolChanged(ToolKind),
    SelectionChanged(Option<EntityRef>),
    TextPromptCancelled,
}

/// An exported file, ready to hand to a download.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

pub struct Editor {
    scene: Scene,
    history: History,
    viewport: Viewport,
    router: GestureRouter,
    style: Style,
    selection: Option<EntityRef>,
    surface: Option<Surface>,
    /// Canvas anchor of the text prompt awaiting an answer.
    pending_text: Option<Point>,
    commit_pending: bool,
    /// The current eraser gesture removed something.
    erased: bool,
    config: EditorConfig,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let scene = Scene::new();
        Self {
            history: History::new(scene.clone()),
            scene,
            viewport: Viewport::new(),
            router: GestureRouter::new(config.initial_tool),
            style: config.style,
            selection: None,
            surface: None,
            pending_text: None,
            commit_pending: false,
            erased: false,
            config,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn tool(&self) -> ToolKind {
        self.router.tool()
    }

    pub fn selection(&self) -> Option<EntityRef> {
        self.selection
    }

    pub fn surface(&self) -> Option<Surface> {
        self.surface
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn pending_text(&self) -> Option<Point> {
        self.pending_text
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Layer list, most recent first.
    pub fn layers(&self) -> Vec<Layer> {
        self.scene.layers()
    }

    /// Provisional entity of the gesture in progress.
    pub fn preview(&self) -> Option<Entity> {
        self.router.preview(&self.style)
    }

    // ─── Surface ─────────────────────────────────────────────────────────

    /// Attach (or re-attach after a resize) the host surface.
    pub fn attach_surface(&mut self, surface: Surface) -> Vec<Effect> {
        log::debug!(
            "surface attached at ({}, {}), {}x{}",
            surface.origin.x,
            surface.origin.y,
            surface.width,
            surface.height
        );
        self.viewport.set_origin(surface.origin);
        self.surface = Some(surface);
        vec![Effect::Redraw]
    }

    pub fn detach_surface(&mut self) {
        self.finish_erase();
        self.router.cancel();
        self.flush();
        self.surface = None;
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Feed one pointer or touch event through the active tool.
    pub fn handle_input(&mut self, event: &InputEvent) -> Vec<Effect> {
        if self.surface.is_none() {
            log::trace!("input ignored: no surface");
            return vec![];
        }
        let intents = self.router.handle(event, &self.viewport);
        let mut effects = Vec::new();
        for intent in intents {
            self.apply(intent, &mut effects);
        }
        self.flush();
        effects
    }

    /// Handle a key press. `in_text_field` suppresses every shortcut.
    pub fn handle_key(&mut self, key: &str, modifiers: &Modifiers, in_text_field: bool) -> Vec<Effect> {
        if in_text_field {
            return vec![];
        }
        let Some(action) = ShortcutMap::resolve(key, modifiers) else {
            return vec![];
        };
        log::trace!("shortcut {key:?} -> {action:?}");
        if let Some(tool) = action.tool() {
            return self.set_tool(tool);
        }
        match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Delete => self.delete_selected(),
            ShortcutAction::Deselect => {
                let mut effects = self.select(None);
                effects.extend(self.cancel_text());
                effects
            }
            ShortcutAction::ZoomIn => self.zoom_in(),
            ShortcutAction::ZoomOut => self.zoom_out(),
            ShortcutAction::ResetView => self.reset_view(),
            _ => vec![],
        }
    }

    fn apply(&mut self, intent: Intent, effects: &mut Vec<Effect>) {
        match intent {
            Intent::AddPath { points } => {
                if self.scene.add_path(points, self.style.stroke, self.style.width) {
                    self.commit_pending = true;
                    push_unique(effects, Effect::Redraw);
                }
            }
            Intent::AddShape { kind, start, end } => {
                if self.scene.add_shape(
                    kind,
                    start,
                    end,
                    self.style.stroke,
                    self.style.fill,
                    self.style.width,
                ) {
                    self.commit_pending = true;
                    push_unique(effects, Effect::Redraw);
                }
            }
            Intent::Select(point) => {
                let hit = hit_test(&self.scene, point);
                if hit != self.selection {
                    self.selection = hit;
                    effects.push(Effect::SelectionChanged(hit));
                    push_unique(effects, Effect::Redraw);
                }
            }
            Intent::EraseAt(point) => {
                let removed = self.scene.erase_hits(point, self.config.eraser_threshold);
                if !removed.is_empty() {
                    self.erased = true;
                    let before = self.selection;
                    self.selection = remap_selection(before, &removed);
                    if self.selection != before {
                        effects.push(Effect::SelectionChanged(self.selection));
                    }
                    push_unique(effects, Effect::Redraw);
                }
            }
            Intent::EraseEnd => self.finish_erase(),
            Intent::PromptText { canvas, device } => {
                self.pending_text = Some(canvas);
                effects.push(Effect::PromptText { canvas, device });
            }
            Intent::Pan { dx, dy } => {
                self.viewport.pan(dx, dy);
                push_unique(effects, Effect::Redraw);
            }
            Intent::Zoom(delta) => {
                if self.viewport.set_zoom(delta) {
                    push_unique(effects, Effect::Redraw);
                }
            }
            Intent::Redraw => push_unique(effects, Effect::Redraw),
        }
    }

    fn finish_erase(&mut self) {
        if std::mem::take(&mut self.erased) {
            self.commit_pending = true;
        }
    }

    /// Record an erase gesture that is still pressed as its own step, so
    /// the command that follows gets a step of its own too.
    fn commit_erase(&mut self) {
        self.finish_erase();
        self.flush();
    }

    /// Snapshot the scene if a mutation is pending.
    fn flush(&mut self) {
        if std::mem::take(&mut self.commit_pending) {
            self.history.commit(self.scene.clone());
        }
    }

    // ─── Commands ────────────────────────────────────────────────────────

    /// Switch tools, dropping any gesture in progress.
    pub fn set_tool(&mut self, tool: ToolKind) -> Vec<Effect> {
        if tool == self.router.tool() {
            return vec![];
        }
        self.finish_erase();
        self.router.set_tool(tool);
        self.flush();
        vec![Effect::ToolChanged(tool), Effect::Redraw]
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.style.stroke = color;
    }

    pub fn set_fill(&mut self, fill: Fill) {
        self.style.fill = fill;
    }

    /// Returns false for widths outside the fixed set.
    pub fn set_stroke_width(&mut self, width: f64) -> bool {
        self.style.set_width(width)
    }

    pub fn set_font_size(&mut self, size: f64) -> bool {
        self.style.set_font_size(size)
    }

    /// Answer the pending text prompt. Blank text places nothing.
    pub fn commit_text(&mut self, text: &str) -> Vec<Effect> {
        let Some(anchor) = self.pending_text.take() else {
            return vec![];
        };
        self.commit_erase();
        let mut effects = Vec::new();
        if self
            .scene
            .add_text(text, anchor, self.style.stroke, self.style.font_size)
        {
            self.commit_pending = true;
            effects.push(Effect::Redraw);
        }
        self.flush();
        effects
    }

    /// Abandon the pending text prompt, if any.
    pub fn cancel_text(&mut self) -> Vec<Effect> {
        match self.pending_text.take() {
            Some(_) => vec![Effect::TextPromptCancelled],
            None => vec![],
        }
    }

    pub fn undo(&mut self) -> Vec<Effect> {
        self.settle();
        let Some(snapshot) = self.history.undo() else {
            return vec![];
        };
        let restored = snapshot.clone();
        self.restore(restored)
    }

    pub fn redo(&mut self) -> Vec<Effect> {
        self.settle();
        let Some(snapshot) = self.history.redo() else {
            return vec![];
        };
        let restored = snapshot.clone();
        self.restore(restored)
    }

    /// Commit anything outstanding before moving through history.
    fn settle(&mut self) {
        self.finish_erase();
        self.router.cancel();
        self.flush();
    }

    fn restore(&mut self, mut restored: Scene) -> Vec<Effect> {
        // Visibility is a view setting: keep the live flags.
        restored.adopt_visibility(&self.scene);
        self.scene = restored;
        log::debug!(
            "history cursor {} of {}",
            self.history.cursor(),
            self.history.len()
        );
        let mut effects = self.clear_selection();
        effects.push(Effect::Redraw);
        effects
    }

    fn clear_selection(&mut self) -> Vec<Effect> {
        match self.selection.take() {
            Some(_) => vec![Effect::SelectionChanged(None)],
            None => vec![],
        }
    }

    pub fn delete_selected(&mut self) -> Vec<Effect> {
        self.commit_erase();
        if !self.scene.delete_selected(self.selection) {
            return vec![];
        }
        self.commit_pending = true;
        self.flush();
        let mut effects = self.clear_selection();
        effects.push(Effect::Redraw);
        effects
    }

    /// Remove every entity. A no-op on an empty scene.
    pub fn clear(&mut self) -> Vec<Effect> {
        self.commit_erase();
        if !self.scene.clear() {
            return vec![];
        }
        self.commit_pending = true;
        self.flush();
        let mut effects = self.clear_selection();
        effects.push(Effect::Redraw);
        effects
    }

    /// Show or hide an entity. Not recorded in history.
    pub fn toggle_visibility(&mut self, entity: EntityRef) -> Vec<Effect> {
        if self.scene.toggle_visibility(entity) {
            vec![Effect::Redraw]
        } else {
            vec![]
        }
    }

    /// Select an entity (e.g. from the layer list), or clear with `None`.
    /// Stale references are ignored.
    pub fn select(&mut self, entity: Option<EntityRef>) -> Vec<Effect> {
        if entity.is_some_and(|r| !self.scene.contains(r)) || entity == self.selection {
            return vec![];
        }
        self.selection = entity;
        vec![Effect::SelectionChanged(entity), Effect::Redraw]
    }

    pub fn zoom_in(&mut self) -> Vec<Effect> {
        redraw_if(self.viewport.zoom_in())
    }

    pub fn zoom_out(&mut self) -> Vec<Effect> {
        redraw_if(self.viewport.zoom_out())
    }

    /// Adjust zoom by `delta` percentage points.
    pub fn set_zoom(&mut self, delta: f64) -> Vec<Effect> {
        redraw_if(self.viewport.set_zoom(delta))
    }

    pub fn reset_view(&mut self) -> Vec<Effect> {
        self.viewport.reset();
        vec![Effect::Redraw]
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// PNG of the whole scene on the export page. `None` without a surface
    /// or if rasterization fails.
    pub fn export_raster(&self) -> Option<ExportFile> {
        if self.surface.is_none() {
            log::warn!("raster export skipped: no surface attached");
            return None;
        }
        match render_png(&self.scene, &self.config.export) {
            Ok(bytes) => Some(ExportFile {
                filename: "sketch.png".to_string(),
                mime: "image/png",
                bytes,
            }),
            Err(err) => {
                log::warn!("raster export failed: {err}");
                None
            }
        }
    }

    /// SVG of the whole scene. `None` without a surface.
    pub fn export_vector(&self) -> Option<ExportFile> {
        if self.surface.is_none() {
            log::warn!("vector export skipped: no surface attached");
            return None;
        }
        let svg = render_svg(&self.scene, &self.config.export);
        Some(ExportFile {
            filename: "sketch.svg".to_string(),
            mime: "image/svg+xml",
            bytes: svg.into_bytes(),
        })
    }
}

fn push_unique(effects: &mut Vec<Effect>, effect: Effect) {
    if !effects.contains(&effect) {
        effects.push(effect);
    }
}

fn redraw_if(changed: bool) -> Vec<Effect> {
    if changed { vec![Effect::Redraw] } else { vec![] }
}

/// Follow the selected entity through an erase. `removed` holds
/// pre-removal indices.
fn remap_selection(selection: Option<EntityRef>, removed: &[EntityRef]) -> Option<EntityRef> {
    let sel = selection?;
    if removed.contains(&sel) {
        return None;
    }
    let shift = removed
        .iter()
        .filter(|r| r.kind == sel.kind && r.index < sel.index)
        .count();
    Some(EntityRef::new(sel.kind, sel.index - shift))
}
