//! WASM bridge for the sketch canvas: exposes the Rust editor to
//! JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host page owns the
//! `<canvas>` element, the toolbar and the text prompt; everything else
//! goes through [`SketchCanvas`]. Event handlers return a JSON summary of
//! the editor's effects so the host knows whether to redraw, prompt for
//! text, or refresh toolbar state.

mod render2d;

use serde::Serialize;
use sketch_core::model::{EntityKind, EntityRef, Point};
use sketch_core::style::{FILL_PALETTE, STROKE_PALETTE, STROKE_WIDTHS};
use sketch_core::{Color, Fill};
use sketch_editor::{Editor, EditorConfig, Effect, InputEvent, Modifiers, Surface, ToolKind};
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// JSON shape returned by every event handler.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct EffectSummary {
    redraw: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt_text: Option<PromptJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool: Option<&'static str>,
    selection_changed: bool,
    selection: Option<EntityRef>,
    text_prompt_cancelled: bool,
    can_undo: bool,
    can_redo: bool,
}

/// Where to open the text prompt (device space) and where the label will
/// land (canvas space).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PromptJson {
    x: f64,
    y: f64,
    canvas_x: f64,
    canvas_y: f64,
}

/// The main WASM-facing canvas controller.
#[wasm_bindgen]
pub struct SketchCanvas {
    editor: Editor,
}

impl Default for SketchCanvas {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl SketchCanvas {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook_setup();
        Self {
            editor: Editor::new(EditorConfig::default()),
        }
    }

    // ─── Surface ─────────────────────────────────────────────────────────

    /// Attach the canvas element's client rect. Call again on resize or
    /// scroll so device coordinates keep mapping correctly.
    pub fn attach(&mut self, left: f64, top: f64, width: f64, height: f64) -> String {
        let effects = self.editor.attach_surface(Surface {
            origin: Point::new(left, top),
            width,
            height,
        });
        self.summarize(&effects)
    }

    pub fn detach(&mut self) {
        self.editor.detach_surface();
    }

    /// Render the scene to a Canvas2D context. No-op without a surface.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        let Some(surface) = self.editor.surface() else {
            return;
        };
        let preview = self.editor.preview();
        render2d::render_scene(
            ctx,
            &render2d::Frame {
                scene: self.editor.scene(),
                viewport: self.editor.viewport(),
                selection: self.editor.selection(),
                preview: preview.as_ref(),
                width: surface.width,
                height: surface.height,
            },
        );
    }

    // ─── Input ───────────────────────────────────────────────────────────

    pub fn handle_pointer_down(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let modifiers = modifiers(shift, ctrl, alt, meta);
        self.input(InputEvent::PointerDown { x, y, modifiers })
    }

    pub fn handle_pointer_move(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let modifiers = modifiers(shift, ctrl, alt, meta);
        self.input(InputEvent::PointerMove { x, y, modifiers })
    }

    pub fn handle_pointer_up(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let modifiers = modifiers(shift, ctrl, alt, meta);
        self.input(InputEvent::PointerUp { x, y, modifiers })
    }

    /// Touches arrive flattened as `[id, x, y, id, x, y, ...]`.
    pub fn handle_touch_start(&mut self, touches: &[f64]) -> String {
        let touches = InputEvent::touches_from_flat(touches);
        self.input(InputEvent::TouchStart { touches })
    }

    pub fn handle_touch_move(&mut self, touches: &[f64]) -> String {
        let touches = InputEvent::touches_from_flat(touches);
        self.input(InputEvent::TouchMove { touches })
    }

    /// `touches` lists the touches still down after the lift.
    pub fn handle_touch_end(&mut self, touches: &[f64]) -> String {
        let touches = InputEvent::touches_from_flat(touches);
        self.input(InputEvent::TouchEnd { touches })
    }

    /// Handle a keyboard event. `in_text_field` is true while focus is in
    /// an input or textarea, which suppresses all shortcuts.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
        in_text_field: bool,
    ) -> String {
        let effects = self
            .editor
            .handle_key(key, &modifiers(shift, ctrl, alt, meta), in_text_field);
        self.summarize(&effects)
    }

    // ─── Tools & style ───────────────────────────────────────────────────

    /// Switch tools by name (`pen`, `rectangle`, `ellipse`, `text`,
    /// `select`, `pan`, `eraser`). Unknown names are ignored.
    pub fn set_tool(&mut self, name: &str) -> String {
        let effects = match ToolKind::from_name(name) {
            Some(tool) => self.editor.set_tool(tool),
            None => {
                log::warn!("unknown tool {name:?}");
                vec![]
            }
        };
        self.summarize(&effects)
    }

    pub fn get_tool_name(&self) -> String {
        self.editor.tool().name().to_string()
    }

    /// Set the stroke color from a hex string. Returns false if unparsable.
    pub fn set_stroke_color(&mut self, hex: &str) -> bool {
        match Color::from_hex(hex) {
            Some(color) => {
                self.editor.set_stroke_color(color);
                true
            }
            None => false,
        }
    }

    /// Set the fill from a hex string, or `"none"`.
    pub fn set_fill(&mut self, value: &str) -> bool {
        match Fill::parse(value) {
            Some(fill) => {
                self.editor.set_fill(fill);
                true
            }
            None => false,
        }
    }

    pub fn set_stroke_width(&mut self, width: f64) -> bool {
        self.editor.set_stroke_width(width)
    }

    pub fn set_font_size(&mut self, size: f64) -> bool {
        self.editor.set_font_size(size)
    }

    /// Current style as JSON: `{"stroke","fill","width","fontSize"}`.
    pub fn style_json(&self) -> String {
        let style = self.editor.style();
        serde_json::json!({
            "stroke": style.stroke.to_hex(),
            "fill": style.fill.color().map(|c| c.to_hex()),
            "width": style.width,
            "fontSize": style.font_size,
        })
        .to_string()
    }

    // ─── Text prompt ─────────────────────────────────────────────────────

    pub fn commit_text(&mut self, text: &str) -> String {
        let effects = self.editor.commit_text(text);
        self.summarize(&effects)
    }

    pub fn cancel_text(&mut self) -> String {
        let effects = self.editor.cancel_text();
        self.summarize(&effects)
    }

    // ─── Edit commands ───────────────────────────────────────────────────

    pub fn undo(&mut self) -> String {
        let effects = self.editor.undo();
        self.summarize(&effects)
    }

    pub fn redo(&mut self) -> String {
        let effects = self.editor.redo();
        self.summarize(&effects)
    }

    pub fn can_undo(&self) -> bool {
        self.editor.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.editor.can_redo()
    }

    pub fn delete_selected(&mut self) -> String {
        let effects = self.editor.delete_selected();
        self.summarize(&effects)
    }

    pub fn clear(&mut self) -> String {
        let effects = self.editor.clear();
        self.summarize(&effects)
    }

    // ─── Layers ──────────────────────────────────────────────────────────

    /// Layer list, most recent first, as a JSON array of
    /// `{"entity":{"kind","index"},"id","label","visible"}`.
    pub fn layers_json(&self) -> String {
        serde_json::to_string(&self.editor.layers()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn toggle_visibility(&mut self, kind: &str, index: usize) -> String {
        let effects = match entity_ref(kind, index) {
            Some(r) => self.editor.toggle_visibility(r),
            None => vec![],
        };
        self.summarize(&effects)
    }

    pub fn select_layer(&mut self, kind: &str, index: usize) -> String {
        let effects = match entity_ref(kind, index) {
            Some(r) => self.editor.select(Some(r)),
            None => vec![],
        };
        self.summarize(&effects)
    }

    // ─── View ────────────────────────────────────────────────────────────

    pub fn zoom_in(&mut self) -> String {
        let effects = self.editor.zoom_in();
        self.summarize(&effects)
    }

    pub fn zoom_out(&mut self) -> String {
        let effects = self.editor.zoom_out();
        self.summarize(&effects)
    }

    pub fn reset_view(&mut self) -> String {
        let effects = self.editor.reset_view();
        self.summarize(&effects)
    }

    /// Zoom level in percent.
    pub fn get_zoom(&self) -> f64 {
        self.editor.viewport().zoom()
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// PNG bytes of the whole scene, or `undefined` without a surface.
    pub fn export_png(&self) -> Option<Vec<u8>> {
        self.editor.export_raster().map(|f| f.bytes)
    }

    /// SVG markup of the whole scene, or `undefined` without a surface.
    pub fn export_svg(&self) -> Option<String> {
        self.editor
            .export_vector()
            .and_then(|f| String::from_utf8(f.bytes).ok())
    }
}

impl SketchCanvas {
    fn input(&mut self, event: InputEvent) -> String {
        let effects = self.editor.handle_input(&event);
        self.summarize(&effects)
    }

    fn summarize(&self, effects: &[Effect]) -> String {
        let summary = summarize_effects(&self.editor, effects);
        serde_json::to_string(&summary).unwrap_or_else(|_| "{}".to_string())
    }
}

fn summarize_effects(editor: &Editor, effects: &[Effect]) -> EffectSummary {
    let mut summary = EffectSummary {
        selection: editor.selection(),
        can_undo: editor.can_undo(),
        can_redo: editor.can_redo(),
        ..EffectSummary::default()
    };
    for effect in effects {
        match effect {
            Effect::Redraw => summary.redraw = true,
            Effect::PromptText { canvas, device } => {
                summary.prompt_text = Some(PromptJson {
                    x: device.x,
                    y: device.y,
                    canvas_x: canvas.x,
                    canvas_y: canvas.y,
                });
            }
            Effect::ToolChanged(tool) => summary.tool = Some(tool.name()),
            Effect::SelectionChanged(_) => summary.selection_changed = true,
            Effect::TextPromptCancelled => summary.text_prompt_cancelled = true,
        }
    }
    summary
}

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        shift,
        ctrl,
        alt,
        meta,
    }
}

fn entity_ref(kind: &str, index: usize) -> Option<EntityRef> {
    EntityKind::from_name(kind).map(|k| EntityRef::new(k, index))
}

/// Toolbar palettes as JSON: `{"stroke":[hex],"fill":[hex],"widths":[n]}`.
/// `"none"` is always offered as a fill in addition to the list.
#[wasm_bindgen]
pub fn palette_json() -> String {
    serde_json::json!({
        "stroke": STROKE_PALETTE.iter().map(Color::to_hex).collect::<Vec<_>>(),
        "fill": FILL_PALETTE.iter().map(Color::to_hex).collect::<Vec<_>>(),
        "widths": STROKE_WIDTHS,
    })
    .to_string()
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("sketch WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
