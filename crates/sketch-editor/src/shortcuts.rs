//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. `key` is the
//! DOM `KeyboardEvent.key` value. Shortcuts are not consulted while focus
//! is in a text field; the editor enforces that.

use crate::input::Modifiers;
use crate::tools::ToolKind;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tool switching ──
    ToolPen,
    ToolRectangle,
    ToolEllipse,
    ToolText,
    ToolSelect,
    ToolPan,
    ToolEraser,

    // ── Edit ──
    Undo,
    Redo,
    Delete,
    /// Clear the selection and abandon pending text entry.
    Deselect,

    // ── View ──
    ZoomIn,
    ZoomOut,
    ResetView,
}

impl ShortcutAction {
    /// The tool this action switches to, if it is a tool shortcut.
    pub fn tool(self) -> Option<ToolKind> {
        match self {
            ShortcutAction::ToolPen => Some(ToolKind::Pen),
            ShortcutAction::ToolRectangle => Some(ToolKind::Rectangle),
            ShortcutAction::ToolEllipse => Some(ToolKind::Ellipse),
            ShortcutAction::ToolText => Some(ToolKind::Text),
            ShortcutAction::ToolSelect => Some(ToolKind::Select),
            ShortcutAction::ToolPan => Some(ToolKind::Pan),
            ShortcutAction::ToolEraser => Some(ToolKind::Eraser),
            _ => None,
        }
    }
}

/// Resolves key events into shortcut actions.
///
/// Platform-aware: ⌘ (`meta`) on macOS and Ctrl elsewhere both count as
/// the command modifier.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action. `None` if the combo is unbound.
    pub fn resolve(key: &str, modifiers: &Modifiers) -> Option<ShortcutAction> {
        let cmd = modifiers.command();
        let shift = modifiers.shift;

        // ── Modifier combos first (most specific) ──
        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                // "+" is shifted "=" on most layouts.
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ResetView),
                _ => None,
            };
        }

        if shift || modifiers.alt {
            return None;
        }

        // ── Single keys (no modifiers) ──
        match key {
            "p" | "P" => Some(ShortcutAction::ToolPen),
            "r" | "R" => Some(ShortcutAction::ToolRectangle),
            "c" | "C" => Some(ShortcutAction::ToolEllipse),
            "t" | "T" => Some(ShortcutAction::ToolText),
            "v" | "V" => Some(ShortcutAction::ToolSelect),
            "h" | "H" => Some(ShortcutAction::ToolPan),
            "e" | "E" => Some(ShortcutAction::ToolEraser),
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}
