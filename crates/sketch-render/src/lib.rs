pub mod export;
pub mod hit;
pub mod paint;

pub use export::{ExportError, ExportOptions, render_png, render_svg};
pub use hit::{hit_test, text_bounds};
pub use paint::{paint_preview, paint_scene};
