//! Interactive layer of the sketch canvas: input normalization, tools and
//! gesture routing, undo/redo history, keyboard shortcuts, and the
//! [`Editor`] controller that ties them to a scene.

pub mod editor;
pub mod history;
pub mod input;
pub mod shortcuts;
pub mod tools;

pub use editor::{Editor, EditorConfig, Effect, ExportFile, Surface};
pub use history::History;
pub use input::{InputEvent, Modifiers, Touch, Touches};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::{GestureRouter, GestureState, Intent, ToolKind};
