//! Scene export: SVG markup and PNG raster.
//!
//! Both outputs are in canvas coordinates on a fixed-size page and ignore
//! the current pan/zoom. Hidden entities are left out. The PNG is produced
//! by rasterizing the SVG with `resvg` onto a background-filled pixmap, so
//! the two formats never disagree about geometry.

use resvg::{tiny_skia, usvg};
use sketch_core::model::{Path, Shape, ShapeKind, TextLabel};
use sketch_core::scene::Scene;
use sketch_core::{Color, Fill};
use std::fmt::Write as _;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("generated SVG could not be parsed: {0}")]
    Svg(#[from] usvg::Error),
    #[error("cannot allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Page size and background for exported files.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub width: u32,
    pub height: u32,
    /// Raster background. The SVG is emitted without one.
    pub background: Color,
    /// Load the host's fonts so text labels rasterize. Without fonts,
    /// text is silently dropped from the PNG.
    pub load_system_fonts: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            background: Color::WHITE,
            load_system_fonts: true,
        }
    }
}

/// Emit an SVG document for the visible entities, in stacking order.
pub fn render_svg(scene: &Scene, options: &ExportOptions) -> String {
    let (w, h) = (options.width, options.height);
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">"
    );

    for path in scene.paths.iter().filter(|p| p.visible) {
        svg_path(&mut svg, path);
    }
    for shape in scene.shapes.iter().filter(|s| s.visible) {
        svg_shape(&mut svg, shape);
    }
    for label in scene.texts.iter().filter(|t| t.visible) {
        svg_text(&mut svg, label);
    }

    svg.push_str("</svg>\n");
    svg
}

/// Rasterize the scene to PNG bytes at the page size in `options`.
pub fn render_png(scene: &Scene, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
    let svg = render_svg(scene, options);

    let mut opt = usvg::Options::default();
    if options.load_system_fonts {
        opt.fontdb_mut().load_system_fonts();
    }
    let tree = usvg::Tree::from_str(&svg, &opt)?;

    let mut pixmap = tiny_skia::Pixmap::new(options.width, options.height).ok_or(
        ExportError::Pixmap {
            width: options.width,
            height: options.height,
        },
    )?;
    let bg = options.background;
    pixmap.fill(tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    let png = pixmap
        .encode_png()
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    log::debug!(
        "exported PNG {}x{} ({} bytes)",
        options.width,
        options.height,
        png.len()
    );
    Ok(png)
}

// ─── Elements ────────────────────────────────────────────────────────────

fn svg_path(out: &mut String, path: &Path) {
    let Some((first, rest)) = path.points.split_first() else {
        return;
    };
    let mut d = format!("M {} {}", first.x, first.y);
    for p in rest {
        let _ = write!(d, " L {} {}", p.x, p.y);
    }
    let _ = writeln!(
        out,
        "  <path d=\"{d}\" fill=\"none\"{} stroke-width=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>",
        paint_attr("stroke", path.color),
        path.width
    );
}

fn svg_shape(out: &mut String, shape: &Shape) {
    let b = shape.bounds();
    let fill = match shape.fill {
        Fill::None => " fill=\"none\"".to_string(),
        Fill::Solid(c) => paint_attr("fill", c),
    };
    let stroke = paint_attr("stroke", shape.color);
    match shape.kind {
        ShapeKind::Rectangle => {
            let _ = writeln!(
                out,
                "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{fill}{stroke} stroke-width=\"{}\"/>",
                b.min.x,
                b.min.y,
                b.width(),
                b.height(),
                shape.width
            );
        }
        ShapeKind::Ellipse => {
            let c = b.center();
            let _ = writeln!(
                out,
                "  <ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\"{fill}{stroke} stroke-width=\"{}\"/>",
                c.x,
                c.y,
                b.width() / 2.0,
                b.height() / 2.0,
                shape.width
            );
        }
    }
}

fn svg_text(out: &mut String, label: &TextLabel) {
    let _ = writeln!(
        out,
        "  <text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"{}\"{}>{}</text>",
        label.anchor.x,
        label.anchor.y,
        label.size,
        paint_attr("fill", label.color),
        escape_xml(&label.text)
    );
}

/// ` fill="#RRGGBB"`, plus `fill-opacity` when the color is translucent.
fn paint_attr(name: &str, color: Color) -> String {
    let opaque = Color::rgb(color.r, color.g, color.b);
    if color.is_opaque() {
        format!(" {name}=\"{}\"", opaque.to_hex())
    } else {
        format!(
            " {name}=\"{}\" {name}-opacity=\"{:.3}\"",
            opaque.to_hex(),
            color.opacity()
        )
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
